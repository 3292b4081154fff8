//! Preconditioner metric of SuperMann

use nalgebra::DVector;
use super::Operator;
use super::fixed_point::split;

/// Inner product induced by the Chambolle-Pock preconditioner.
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// A = \left[ \begin{array}{cc}
/// I & -\alpha L^T \\\\
/// -\alpha L & I
/// \end{array} \right]
/// \\]
/// on stacked vectors \\((z, \eta)\\), evaluated through \\(L\\) without forming \\(A\\).
/// It is positive definite when \\(\alpha \\|L\\| < 1\\).
pub struct MetricA<'a, O: Operator>
{
    op_l: &'a O,
    alpha: f64,
}

impl<'a, O: Operator> MetricA<'a, O>
{
    /// Creates an instance.
    /// 
    /// Returns [`MetricA`] instance.
    /// * `op_l` is \\(L\\).
    /// * `alpha` is the step size.
    pub fn new(op_l: &'a O, alpha: f64) -> Self
    {
        MetricA {
            op_l, alpha
        }
    }

    /// Calculate \\(u^T A v\\).
    pub fn inner(&self, u: &DVector<f64>, v: &DVector<f64>) -> f64
    {
        let (n_l, n_z) = self.op_l.size();
        assert_eq!(u.len(), n_z + n_l);
        assert_eq!(v.len(), n_z + n_l);

        let (u_z, u_eta) = split(u, n_z);
        let (v_z, v_eta) = split(v, n_z);

        let mut l_uz = DVector::zeros(n_l);
        self.op_l.op(1., &u_z, 0., &mut l_uz);
        let mut l_vz = DVector::zeros(n_l);
        self.op_l.op(1., &v_z, 0., &mut l_vz);

        u_z.dot(&v_z) + u_eta.dot(&v_eta) - self.alpha * (u_eta.dot(&l_vz) + v_eta.dot(&l_uz))
    }

    /// Calculate \\(\sqrt{v^T A v}\\).
    pub fn norm(&self, v: &DVector<f64>) -> f64
    {
        self.inner(v, v).max(0.).sqrt()
    }
}

//

#[test]
fn test_metric1()
{
    use float_eq::assert_float_eq;
    use nalgebra::DMatrix;
    use crate::MatOp;

    let l = DMatrix::from_row_slice(2, 3, &[
        1., 2., 0.,
        0., -1., 3.,
    ]);
    let alpha = 0.2;
    let op_l = MatOp::new(&l);
    let metric = MetricA::new(&op_l, alpha);

    let mut a = DMatrix::<f64>::identity(5, 5);
    a.view_mut((0, 3), (3, 2)).copy_from(&(l.transpose() * -alpha));
    a.view_mut((3, 0), (2, 3)).copy_from(&(&l * -alpha));

    let u = DVector::from_vec(vec![1., -2., 0.5, 3., -1.]);
    let v = DVector::from_vec(vec![0.3, 1., -1., 2., 0.]);

    let ref_uv = u.dot(&(&a * &v));
    assert_float_eq!(metric.inner(&u, &v), ref_uv, abs <= 1e-12);
    assert_float_eq!(metric.inner(&v, &u), ref_uv, abs <= 1e-12);
    assert_float_eq!(metric.norm(&u), u.dot(&(&a * &u)).sqrt(), abs <= 1e-12);
}
