use nalgebra::{DMatrix, DVector};
use cpasocp_core::solver::Proximal;
use super::OfflineSeq;

//

/// Online proximal evaluator
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Implements [`Proximal`] of the quadratic cost restricted to the dynamics:
/// \\[
/// {\bf prox}\_{\lambda h}(v) = \arg\min_z
/// {1 \over 2\lambda} \\|z - v\\|^2
/// + \sum_{t=0}^{N-1} {1 \over 2} (x_t^T Q x_t + u_t^T R u_t) + {1 \over 2} x_N^T P x_N
/// \\]
/// subject to \\(x_{t+1} = A x_t + B u_t\\) and \\(x_0\\) given,
/// where \\(z = (x_0, u_0, \ldots, x_{N-1}, u_{N-1}, x_N)\\).
pub struct ProxOCP<'a>
{
    a: &'a DMatrix<f64>,
    b: &'a DMatrix<f64>,
    seq: &'a OfflineSeq,
}

impl<'a> ProxOCP<'a>
{
    /// Creates an instance.
    /// 
    /// Returns [`ProxOCP`] instance.
    /// * `a`, `b` are the dynamics the sequences were built from.
    /// * `seq` is [`OfflineSeq`].
    pub fn new(a: &'a DMatrix<f64>, b: &'a DMatrix<f64>, seq: &'a OfflineSeq) -> Self
    {
        ProxOCP {
            a, b, seq
        }
    }
}

impl<'a> Proximal for ProxOCP<'a>
{
    fn size(&self) -> usize
    {
        let (n_x, n_u) = self.b.shape();
        self.seq.horizon() * (n_x + n_u) + n_x
    }

    fn state_size(&self) -> usize
    {
        self.a.nrows()
    }

    fn step(&self) -> f64
    {
        self.seq.lambda()
    }

    fn prox(&self, x0: &DVector<f64>, v: &DVector<f64>, z: &mut DVector<f64>)
    {
        let horizon = self.seq.horizon();
        let (n_x, n_u) = self.b.shape();
        let n_xu = n_x + n_u;
        let neg_inv_l = -self.seq.lambda().recip();

        assert_eq!(x0.len(), n_x);
        assert_eq!(v.len(), self.size());
        assert_eq!(z.len(), self.size());

        // backward
        let mut d_seq = vec![DVector::zeros(n_u); horizon];
        let mut p_lin: DVector<f64> = v.rows(horizon * n_xu, n_x) * neg_inv_l;

        for t in (0.. horizon).rev() {
            let mut rhs: DVector<f64> = v.rows(t * n_xu + n_x, n_u) * neg_inv_l;
            rhs.gemv_tr(1., self.b, &p_lin, 1.);
            let d_t = -self.seq.r_tilde(t).solve(&rhs);

            let b_d = self.b * &d_t;
            let w = &p_lin + self.seq.p(t + 1) * b_d;
            let mut p_t: DVector<f64> = v.rows(t * n_xu, n_x) * neg_inv_l;
            p_t.gemv_tr(1., self.a, &w, 1.);

            p_lin = p_t;
            d_seq[t] = d_t;
        }

        // forward
        let mut x = x0.clone();
        for (t, d_t) in d_seq.iter().enumerate() {
            let u = self.seq.k(t) * &x + d_t;

            z.rows_mut(t * n_xu, n_x).copy_from(&x);
            z.rows_mut(t * n_xu + n_x, n_u).copy_from(&u);

            x = self.seq.a_bar(t) * &x + self.b * d_t;
        }
        z.rows_mut(horizon * n_xu, n_x).copy_from(&x);
    }
}
