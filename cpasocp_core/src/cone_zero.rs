use crate::solver::{ConvexSet, SetError, fix_dimension};

//

/// Zero cone
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// \lbrace 0 \rbrace^n = \lbrace 0 \rbrace \times \cdots \times \lbrace 0 \rbrace =
/// \left\lbrace x \in \mathbb{R}^n
/// \ \middle|\ x=0
/// \right\rbrace
/// \\]
#[derive(Debug, Clone, Default)]
pub struct ConeZero
{
    dim: Option<usize>,
}

impl ConeZero
{
    /// Creates an instance.
    /// 
    /// Returns [`ConeZero`] instance.
    pub fn new() -> Self
    {
        ConeZero {
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

impl ConvexSet for ConeZero
{
    fn dimension(&self) -> Option<usize>
    {
        self.dim
    }

    fn proj(&mut self, x: &mut [f64]) -> Result<(), SetError>
    {
        fix_dimension("ConeZero", &mut self.dim, x.len())?;
        x.fill(0.);
        Ok(())
    }
}

//

#[test]
fn test_cone_zero1()
{
    let mut c = ConeZero::new().with_dim(2);
    let x = &mut [1., -2.];
    c.proj(x).unwrap();
    assert_eq!(x, &[0., 0.]);
    assert_eq!(c.proj(&mut [0.; 3]), Err(SetError::DimensionMismatch));
}
