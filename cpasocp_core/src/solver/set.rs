//! Closed convex set

use super::SetError;
use crate::SetCartesian;

/// Closed convex set trait
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Expresses a nonempty closed convex set \\(\mathcal{C}\\) by its Euclidean projection.
pub trait ConvexSet
{
    /// Dimension of \\(\mathcal{C}\\).
    /// 
    /// Returns `None` until the dimension is fixed,
    /// either at construction or by the first successful projection.
    fn dimension(&self) -> Option<usize>;

    /// Calculate \\(\Pi_{\mathcal{C}}(x)\\).
    /// 
    /// Returns `Ok`, or `Err` if the length of `x` does not fit.
    /// * `x` is a vector \\(x\\) before entry, \\(\Pi_{\mathcal{C}}(x)\\) on exit.
    fn proj(&mut self, x: &mut [f64]) -> Result<(), SetError>;

    /// Block-wise view as a Cartesian product.
    /// 
    /// Returns `Some` only if the set is a [`SetCartesian`].
    fn as_cartesian_mut(&mut self) -> Option<&mut SetCartesian>
    {
        None
    }
}

impl<S: ConvexSet + ?Sized> ConvexSet for Box<S>
{
    fn dimension(&self) -> Option<usize>
    {
        S::dimension(self)
    }

    fn proj(&mut self, x: &mut [f64]) -> Result<(), SetError>
    {
        S::proj(self, x)
    }

    fn as_cartesian_mut(&mut self) -> Option<&mut SetCartesian>
    {
        S::as_cartesian_mut(self)
    }
}

impl<S: ConvexSet + ?Sized> ConvexSet for &mut S
{
    fn dimension(&self) -> Option<usize>
    {
        S::dimension(self)
    }

    fn proj(&mut self, x: &mut [f64]) -> Result<(), SetError>
    {
        S::proj(self, x)
    }

    fn as_cartesian_mut(&mut self) -> Option<&mut SetCartesian>
    {
        S::as_cartesian_mut(self)
    }
}

//

/// Checks a vector length against a set dimension, fixing the dimension on first use.
/// 
/// Returns `Err` if `len` differs from an already fixed dimension.
/// * `name` is a set name for the error log.
/// * `dim` is the dimension of the set.
/// * `len` is the length of the vector to project.
pub fn fix_dimension(name: &str, dim: &mut Option<usize>, len: usize) -> Result<(), SetError>
{
    match dim {
        Some(d) if *d != len => {
            log::error!("{}: dimension {} but vector length {}", name, d, len);
            Err(SetError::DimensionMismatch)
        },
        Some(_) => Ok(()),
        None => {
            *dim = Some(len);
            Ok(())
        },
    }
}

/// Euclidean norm of a slice.
pub fn norm_slice(x: &[f64]) -> f64
{
    x.iter().map(|e| e * e).sum::<f64>().sqrt()
}

//

#[test]
fn test_fix_dimension1()
{
    let mut dim = None;

    assert_eq!(fix_dimension("test", &mut dim, 3), Ok(()));
    assert_eq!(dim, Some(3));
    assert_eq!(fix_dimension("test", &mut dim, 3), Ok(()));
    assert_eq!(fix_dimension("test", &mut dim, 4), Err(SetError::DimensionMismatch));
    assert_eq!(dim, Some(3));
}

#[test]
fn test_norm_slice1()
{
    use float_eq::assert_float_eq;

    assert_float_eq!(norm_slice(&[3., 4.]), 5., abs <= 1e-12);
    assert_float_eq!(norm_slice(&[]), 0., abs <= 1e-12);
}
