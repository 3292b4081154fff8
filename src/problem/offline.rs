use nalgebra::{DMatrix, Cholesky, Dyn};
use cpasocp_core::solver::SolverError;

//

/// Offline Riccati sequences
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Backward recursion for a fixed step \\(\lambda\\):
/// \\[
/// \begin{array}{l}
/// P_N = P + I / \lambda \\\\
/// \tilde{R}\_t = R + I / \lambda + B^T P_{t+1} B \\\\
/// K_t = -\tilde{R}\_t^{-1} B^T P_{t+1} A \\\\
/// \bar{A}\_t = A + B K_t \\\\
/// P_t = Q + I / \lambda + A^T P_{t+1} \bar{A}\_t
/// \end{array}
/// \\]
/// for \\(t = N-1, \ldots, 0\\).
pub struct OfflineSeq
{
    lambda: f64,
    p: Vec<DMatrix<f64>>,
    r_tilde: Vec<Cholesky<f64, Dyn>>,
    k: Vec<DMatrix<f64>>,
    a_bar: Vec<DMatrix<f64>>,
}

impl OfflineSeq
{
    /// Runs the backward recursion.
    /// 
    /// Returns `Ok` with [`OfflineSeq`], or `Err` if some \\(\tilde{R}\_t\\) is not positive definite.
    /// * `horizon` is \\(N\\).
    /// * `a`, `b` are the dynamics.
    /// * `q`, `r`, `p` are the stage and terminal weights.
    /// * `lambda` is the step \\(\lambda\\).
    pub fn new(horizon: usize,
        a: &DMatrix<f64>, b: &DMatrix<f64>,
        q: &DMatrix<f64>, r: &DMatrix<f64>, p: &DMatrix<f64>,
        lambda: f64) -> Result<Self, SolverError>
    {
        let n_x = a.nrows();
        let n_u = b.ncols();
        let inv_l = lambda.recip();

        let eye_x = DMatrix::<f64>::identity(n_x, n_x);
        let eye_u = DMatrix::<f64>::identity(n_u, n_u);

        let mut p_seq = vec![DMatrix::zeros(n_x, n_x); horizon + 1];
        let mut k_seq = vec![DMatrix::zeros(n_u, n_x); horizon];
        let mut a_bar_seq = vec![DMatrix::zeros(n_x, n_x); horizon];
        let mut r_seq = Vec::with_capacity(horizon);

        p_seq[horizon] = p + &eye_x * inv_l;

        for t in (0.. horizon).rev() {
            let p_next = &p_seq[t + 1];
            let bt_p = b.transpose() * p_next;

            let r_tilde = r + &eye_u * inv_l + &bt_p * b;
            let chol = r_tilde.cholesky().ok_or_else(|| {
                log::error!("R_tilde at {} is not positive definite", t);
                SolverError::InvalidOp
            })?;

            let k = -chol.solve(&(&bt_p * a));
            let a_bar = a + b * &k;
            let p_t = q + &eye_x * inv_l + a.transpose() * p_next * &a_bar;

            p_seq[t] = (&p_t + p_t.transpose()) * 0.5;
            k_seq[t] = k;
            a_bar_seq[t] = a_bar;
            r_seq.push(chol);
        }
        r_seq.reverse();

        Ok(OfflineSeq {
            lambda,
            p: p_seq,
            r_tilde: r_seq,
            k: k_seq,
            a_bar: a_bar_seq,
        })
    }

    pub fn horizon(&self) -> usize
    {
        self.k.len()
    }

    pub fn lambda(&self) -> f64
    {
        self.lambda
    }

    /// \\(P_t\\) for \\(t = 0, \ldots, N\\).
    pub fn p(&self, t: usize) -> &DMatrix<f64>
    {
        &self.p[t]
    }

    /// Cholesky factor of \\(\tilde{R}\_t\\) for \\(t = 0, \ldots, N-1\\).
    pub fn r_tilde(&self, t: usize) -> &Cholesky<f64, Dyn>
    {
        &self.r_tilde[t]
    }

    /// \\(K_t\\) for \\(t = 0, \ldots, N-1\\).
    pub fn k(&self, t: usize) -> &DMatrix<f64>
    {
        &self.k[t]
    }

    /// \\(\bar{A}\_t\\) for \\(t = 0, \ldots, N-1\\).
    pub fn a_bar(&self, t: usize) -> &DMatrix<f64>
    {
        &self.a_bar[t]
    }
}

//

#[test]
fn test_offline1()
{
    use float_eq::assert_float_eq;

    let a = DMatrix::from_row_slice(2, 2, &[1., 0.7, -0.1, 1.]);
    let b = DMatrix::from_row_slice(2, 2, &[1., 1., 0.5, 1.]);
    let q = DMatrix::<f64>::identity(2, 2) * 10.;
    let r = DMatrix::<f64>::identity(2, 2);
    let p = DMatrix::<f64>::identity(2, 2) * 5.;
    let lambda = 0.5;

    let seq = OfflineSeq::new(4, &a, &b, &q, &r, &p, lambda).unwrap();
    assert_eq!(seq.horizon(), 4);

    let p_n = &p + DMatrix::<f64>::identity(2, 2) / lambda;
    assert_float_eq!(seq.p(4).as_slice(), p_n.as_slice(), abs_all <= 1e-12);

    for t in 0.. 4 {
        let pt = seq.p(t);
        assert_float_eq!(pt.as_slice(), pt.transpose().as_slice(), abs_all <= 1e-9);
        assert!(pt.clone().cholesky().is_some());

        let a_bar = &a + &b * seq.k(t);
        assert_float_eq!(seq.a_bar(t).as_slice(), a_bar.as_slice(), abs_all <= 1e-12);

        // R_tilde K = -B^T P A
        let r_tilde = seq.r_tilde(t).l() * seq.r_tilde(t).l().transpose();
        let lhs = r_tilde * seq.k(t);
        let rhs = -(b.transpose() * seq.p(t + 1) * &a);
        assert_float_eq!(lhs.as_slice(), rhs.as_slice(), abs_all <= 1e-9);
    }
}

#[test]
fn test_offline2()
{
    let a = DMatrix::identity(1, 1);
    let b = DMatrix::identity(1, 1);
    let q = DMatrix::identity(1, 1);
    let r = DMatrix::from_element(1, 1, -10.);
    let p = DMatrix::identity(1, 1);

    let rslt = OfflineSeq::new(3, &a, &b, &q, &r, &p, 1.);
    assert_eq!(rslt.err(), Some(SolverError::InvalidOp));
}
