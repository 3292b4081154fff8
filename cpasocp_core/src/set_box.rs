use crate::solver::{ConvexSet, SetError, fix_dimension};

//

/// Bound of [`SetBox`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoxBound
{
    /// Same value for every coordinate.
    Scalar(f64),
    /// Value per coordinate.
    Vector(Vec<f64>),
}

impl BoxBound
{
    fn get(&self, i: usize) -> f64
    {
        match self {
            BoxBound::Scalar(v) => *v,
            BoxBound::Vector(v) => v[i],
        }
    }

    fn len(&self) -> Option<usize>
    {
        match self {
            BoxBound::Scalar(_) => None,
            BoxBound::Vector(v) => Some(v.len()),
        }
    }
}

impl From<f64> for BoxBound
{
    fn from(v: f64) -> Self
    {
        BoxBound::Scalar(v)
    }
}

impl From<Vec<f64>> for BoxBound
{
    fn from(v: Vec<f64>) -> Self
    {
        BoxBound::Vector(v)
    }
}

impl From<&[f64]> for BoxBound
{
    fn from(v: &[f64]) -> Self
    {
        BoxBound::Vector(v.to_vec())
    }
}

//

/// Box
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// \left\lbrace x \in \mathbb{R}^n
/// \ \middle|\ l_i \le x_i \le u_i,\ i = 1, \ldots, n
/// \right\rbrace
/// \\]
/// Bounds may be infinite.
#[derive(Debug, Clone)]
pub struct SetBox
{
    lo: BoxBound,
    hi: BoxBound,
    dim: Option<usize>,
}

impl SetBox
{
    /// Creates an instance.
    /// 
    /// Returns [`SetBox`] instance.
    /// Panics if vector bounds differ in length or a lower bound exceeds its upper bound.
    /// * `lo` is the lower bound \\(l\\).
    /// * `hi` is the upper bound \\(u\\).
    pub fn new<L: Into<BoxBound>, H: Into<BoxBound>>(lo: L, hi: H) -> Self
    {
        let lo = lo.into();
        let hi = hi.into();

        let dim = match (lo.len(), hi.len()) {
            (Some(n_lo), Some(n_hi)) => {
                assert_eq!(n_lo, n_hi);
                Some(n_lo)
            },
            (Some(n), None) | (None, Some(n)) => Some(n),
            (None, None) => None,
        };

        for i in 0.. dim.unwrap_or(1) {
            assert!(lo.get(i) <= hi.get(i));
        }

        SetBox {
            lo, hi, dim
        }
    }

    /// Fixes the dimension.
    /// 
    /// Panics if it differs from the length of vector bounds.
    pub fn with_dim(mut self, dim: usize) -> Self
    {
        if let Some(d) = self.dim {
            assert_eq!(d, dim);
        }
        self.dim = Some(dim);
        self
    }
}

impl ConvexSet for SetBox
{
    fn dimension(&self) -> Option<usize>
    {
        self.dim
    }

    fn proj(&mut self, x: &mut [f64]) -> Result<(), SetError>
    {
        fix_dimension("SetBox", &mut self.dim, x.len())?;

        for (i, e) in x.iter_mut().enumerate() {
            *e = e.max(self.lo.get(i)).min(self.hi.get(i));
        }
        Ok(())
    }
}

//

#[test]
fn test_set_box1()
{
    let mut s = SetBox::new(-2., 2.);
    assert_eq!(s.dimension(), None);

    let x = &mut [3., -5., 1.];
    s.proj(x).unwrap();
    assert_eq!(x, &[2., -2., 1.]);
    assert_eq!(s.dimension(), Some(3));

    // idempotent
    let y = &mut x.clone();
    s.proj(y).unwrap();
    assert_eq!(x, y);
}

#[test]
fn test_set_box2()
{
    let mut s = SetBox::new(vec![0., f64::NEG_INFINITY], vec![1., 0.5]);
    assert_eq!(s.dimension(), Some(2));

    let x = &mut [-1., -100.];
    s.proj(x).unwrap();
    assert_eq!(x, &[0., -100.]);

    let x = &mut [2., 2.];
    s.proj(x).unwrap();
    assert_eq!(x, &[1., 0.5]);

    assert_eq!(s.proj(&mut [0.; 3]), Err(SetError::DimensionMismatch));
}

#[test]
#[should_panic]
fn test_set_box3()
{
    SetBox::new(vec![0., 0.], vec![1.]);
}
