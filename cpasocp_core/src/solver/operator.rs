//! Linear operator

use nalgebra::DVector;

/// Linear operator trait
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Expresses a matrix \\(L \in {\bf R}^{m \times n}\\) as a linear operator.
pub trait Operator
{
    /// Size of \\(L\\).
    /// 
    /// Returns a tuple of \\(m\\) and \\(n\\).
    fn size(&self) -> (usize, usize);

    /// Calculate \\(\alpha L x + \beta y\\).
    /// 
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x\\).
    ///   The length of `x` shall be \\(n\\).
    /// * `beta` is a scalar \\(\beta\\).
    /// * `y` is a vector \\(y\\) before entry,
    ///   \\(\alpha L x + \beta y\\) on exit.
    ///   The length of `y` shall be \\(m\\).
    fn op(&self, alpha: f64, x: &DVector<f64>, beta: f64, y: &mut DVector<f64>);

    /// Calculate \\(\alpha L^T x + \beta y\\).
    /// 
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x\\).
    ///   The length of `x` shall be \\(m\\).
    /// * `beta` is a scalar \\(\beta\\).
    /// * `y` is a vector \\(y\\) before entry,
    ///   \\(\alpha L^T x + \beta y\\) on exit.
    ///   The length of `y` shall be \\(n\\).
    fn trans_op(&self, alpha: f64, x: &DVector<f64>, beta: f64, y: &mut DVector<f64>);
}

impl<O: Operator + ?Sized> Operator for &O
{
    fn size(&self) -> (usize, usize)
    {
        O::size(self)
    }

    fn op(&self, alpha: f64, x: &DVector<f64>, beta: f64, y: &mut DVector<f64>)
    {
        O::op(self, alpha, x, beta, y)
    }

    fn trans_op(&self, alpha: f64, x: &DVector<f64>, beta: f64, y: &mut DVector<f64>)
    {
        O::trans_op(self, alpha, x, beta, y)
    }
}
