use nalgebra::{DMatrix, DVector};
use crate::solver::Operator;

//

/// Matrix operator
/// 
/// Matrix struct which borrows a dense matrix and implements [`Operator`].
#[derive(Debug)]
pub struct MatOp<'a>
{
    mat: &'a DMatrix<f64>,
}

impl<'a> MatOp<'a>
{
    /// Creates an instance
    /// 
    /// Returns [`MatOp`] instance.
    /// * `mat`: matrix to borrow.
    pub fn new(mat: &'a DMatrix<f64>) -> Self
    {
        MatOp {
            mat
        }
    }
}

impl<'a> Operator for MatOp<'a>
{
    fn size(&self) -> (usize, usize)
    {
        self.mat.shape()
    }

    fn op(&self, alpha: f64, x: &DVector<f64>, beta: f64, y: &mut DVector<f64>)
    {
        y.gemv(alpha, self.mat, x, beta);
    }

    fn trans_op(&self, alpha: f64, x: &DVector<f64>, beta: f64, y: &mut DVector<f64>)
    {
        y.gemv_tr(alpha, self.mat, x, beta);
    }
}

impl<'a> AsRef<DMatrix<f64>> for MatOp<'a>
{
    fn as_ref(&self) -> &DMatrix<f64>
    {
        self.mat
    }
}

//

#[test]
fn test_matop1()
{
    use float_eq::assert_float_eq;

    let mat = DMatrix::from_row_slice(2, 3, &[
        1., 2., 3.,
        4., 5., 6.,
    ]);
    let m = MatOp::new(&mat);
    assert_eq!(m.size(), (2, 3));

    let x = DVector::from_vec(vec![1., 0., -1.]);
    let mut y = DVector::from_vec(vec![1., 1.]);
    m.op(2., &x, 1., &mut y);
    assert_float_eq!(y.as_slice(), [-3., -3.].as_ref(), abs_all <= 1e-12);

    let x = DVector::from_vec(vec![1., -1.]);
    let mut y = DVector::zeros(3);
    m.trans_op(1., &x, 0., &mut y);
    assert_float_eq!(y.as_slice(), [-3., -3., -3.].as_ref(), abs_all <= 1e-12);
}
