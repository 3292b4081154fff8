use nalgebra::{DMatrix, DVector};
use cpasocp_core::solver::Operator;

//

/// Block linear operator of stage and terminal constraints
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// L z = (\Gamma_x x_0 + \Gamma_u u_0, \ldots, \Gamma_x x_{N-1} + \Gamma_u u_{N-1}, \Gamma_N x_N)
/// \\]
/// for \\(z = (x_0, u_0, \ldots, x_{N-1}, u_{N-1}, x_N)\\).
pub struct LinOpOCP<'a>
{
    horizon: usize,
    gamma_x: &'a DMatrix<f64>,
    gamma_u: &'a DMatrix<f64>,
    gamma_n: &'a DMatrix<f64>,
}

impl<'a> LinOpOCP<'a>
{
    /// Creates an instance.
    /// 
    /// Returns [`LinOpOCP`] instance.
    /// * `horizon` is \\(N\\).
    /// * `gamma_x` is \\(\Gamma_x \in \mathbb{R}^{n_c \times n_x}\\).
    /// * `gamma_u` is \\(\Gamma_u \in \mathbb{R}^{n_c \times n_u}\\).
    /// * `gamma_n` is \\(\Gamma_N \in \mathbb{R}^{n_f \times n_x}\\).
    pub fn new(horizon: usize, gamma_x: &'a DMatrix<f64>, gamma_u: &'a DMatrix<f64>, gamma_n: &'a DMatrix<f64>) -> Self
    {
        assert_eq!(gamma_x.nrows(), gamma_u.nrows());
        assert_eq!(gamma_x.ncols(), gamma_n.ncols());

        LinOpOCP {
            horizon, gamma_x, gamma_u, gamma_n
        }
    }

    fn dim(&self) -> (usize, usize, usize, usize)
    {
        let (n_c, n_x) = self.gamma_x.shape();
        (n_x, self.gamma_u.ncols(), n_c, self.gamma_n.nrows())
    }

    /// Materializes \\(L\\) column by column.
    pub fn to_dense(&self) -> DMatrix<f64>
    {
        let (n_l, n_z) = self.size();
        let mut mat = DMatrix::zeros(n_l, n_z);
        let mut e = DVector::zeros(n_z);
        let mut col = DVector::zeros(n_l);

        for c in 0.. n_z {
            e[c] = 1.;
            self.op(1., &e, 0., &mut col);
            mat.set_column(c, &col);
            e[c] = 0.;
        }
        mat
    }

    /// Operator norm \\(\\|L\\|\\), the largest singular value.
    pub fn op_norm(&self) -> f64
    {
        let (n_l, n_z) = self.size();

        if n_l == 0 || n_z == 0 {
            0.
        }
        else {
            self.to_dense().singular_values().max()
        }
    }
}

impl<'a> Operator for LinOpOCP<'a>
{
    fn size(&self) -> (usize, usize)
    {
        let (n_x, n_u, n_c, n_f) = self.dim();
        (self.horizon * n_c + n_f, self.horizon * (n_x + n_u) + n_x)
    }

    fn op(&self, alpha: f64, x: &DVector<f64>, beta: f64, y: &mut DVector<f64>)
    {
        let (n_x, n_u, n_c, n_f) = self.dim();
        let n_xu = n_x + n_u;
        let horizon = self.horizon;

        assert_eq!(x.len(), self.size().1);
        assert_eq!(y.len(), self.size().0);

        for t in 0.. horizon {
            let x_t = x.rows(t * n_xu, n_x);
            let u_t = x.rows(t * n_xu + n_x, n_u);

            let mut y_t = y.rows_mut(t * n_c, n_c);
            y_t.gemv(alpha, self.gamma_x, &x_t, beta);
            y_t.gemv(alpha, self.gamma_u, &u_t, 1.);
        }

        let x_n = x.rows(horizon * n_xu, n_x);
        y.rows_mut(horizon * n_c, n_f).gemv(alpha, self.gamma_n, &x_n, beta);
    }

    fn trans_op(&self, alpha: f64, x: &DVector<f64>, beta: f64, y: &mut DVector<f64>)
    {
        let (n_x, n_u, n_c, n_f) = self.dim();
        let n_xu = n_x + n_u;
        let horizon = self.horizon;

        assert_eq!(x.len(), self.size().0);
        assert_eq!(y.len(), self.size().1);

        for t in 0.. horizon {
            let eta_t = x.rows(t * n_c, n_c);

            y.rows_mut(t * n_xu, n_x).gemv_tr(alpha, self.gamma_x, &eta_t, beta);
            y.rows_mut(t * n_xu + n_x, n_u).gemv_tr(alpha, self.gamma_u, &eta_t, beta);
        }

        let eta_n = x.rows(horizon * n_c, n_f);
        y.rows_mut(horizon * n_xu, n_x).gemv_tr(alpha, self.gamma_n, &eta_n, beta);
    }
}

//

#[test]
fn test_linop1()
{
    use float_eq::assert_float_eq;

    let gamma_x = DMatrix::from_row_slice(1, 2, &[1., 2.]);
    let gamma_u = DMatrix::from_row_slice(1, 1, &[-1.]);
    let gamma_n = DMatrix::from_row_slice(2, 2, &[1., 0., 0., 3.]);
    let op = LinOpOCP::new(2, &gamma_x, &gamma_u, &gamma_n);
    assert_eq!(op.size(), (4, 8));

    let ref_mat = DMatrix::from_row_slice(4, 8, &[
        1., 2., -1., 0., 0., 0., 0., 0.,
        0., 0., 0., 1., 2., -1., 0., 0.,
        0., 0., 0., 0., 0., 0., 1., 0.,
        0., 0., 0., 0., 0., 0., 0., 3.,
    ]);
    let mat = op.to_dense();
    assert_float_eq!(mat.as_slice(), ref_mat.as_slice(), abs_all <= 1e-12);

    // adjoint
    let eta = DVector::from_vec(vec![1., -2., 0.5, 1.]);
    let mut y = DVector::from_element(8, 1.);
    op.trans_op(2., &eta, -1., &mut y);
    let ref_y = ref_mat.transpose() * &eta * 2. - DVector::from_element(8, 1.);
    assert_float_eq!(y.as_slice(), ref_y.as_slice(), abs_all <= 1e-12);

    assert_float_eq!(op.op_norm(), ref_mat.singular_values().max(), abs <= 1e-12);
}
