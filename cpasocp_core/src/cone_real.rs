use crate::solver::{ConvexSet, SetError, fix_dimension};

//

/// Whole space
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\(\mathbb{R}^n\\), whose projection is the identity.
#[derive(Debug, Clone, Default)]
pub struct ConeReal
{
    dim: Option<usize>,
}

impl ConeReal
{
    /// Creates an instance.
    /// 
    /// Returns [`ConeReal`] instance.
    pub fn new() -> Self
    {
        ConeReal {
            dim: None,
        }
    }

    /// Fixes the dimension.
    pub fn with_dim(mut self, dim: usize) -> Self
    {
        self.dim = Some(dim);
        self
    }
}

impl ConvexSet for ConeReal
{
    fn dimension(&self) -> Option<usize>
    {
        self.dim
    }

    fn proj(&mut self, x: &mut [f64]) -> Result<(), SetError>
    {
        fix_dimension("ConeReal", &mut self.dim, x.len())
    }
}

//

#[test]
fn test_cone_real1()
{
    let mut c = ConeReal::new();
    let x = &mut [1., -2., 3.];
    c.proj(x).unwrap();
    assert_eq!(x, &[1., -2., 3.]);
    assert_eq!(c.dimension(), Some(3));
    assert_eq!(c.proj(&mut [0.; 2]), Err(SetError::DimensionMismatch));
}
