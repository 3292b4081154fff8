use crate::solver::{ConvexSet, SetError, fix_dimension};

//

/// Nonnegative orthant cone
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// \mathbb{R}\_+^n = \mathbb{R}\_+ \times \cdots \times \mathbb{R}\_+ =
/// \left\lbrace x \in \mathbb{R}^n
/// \ \middle|\ x_1 \ge 0, \ldots, x_n \ge 0
/// \right\rbrace
/// \\]
#[derive(Debug, Clone, Default)]
pub struct ConeRPos
{
    dim: Option<usize>,
}

impl ConeRPos
{
    /// Creates an instance.
    /// 
    /// Returns [`ConeRPos`] instance.
    pub fn new() -> Self
    {
        ConeRPos {
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

impl ConvexSet for ConeRPos
{
    fn dimension(&self) -> Option<usize>
    {
        self.dim
    }

    fn proj(&mut self, x: &mut [f64]) -> Result<(), SetError>
    {
        fix_dimension("ConeRPos", &mut self.dim, x.len())?;
        for e in x {
            *e = e.max(0.);
        }
        Ok(())
    }
}

//

#[test]
fn test_cone_rpos1()
{
    let mut c = ConeRPos::new();
    let x = &mut [1., -2., 0., 3.];
    c.proj(x).unwrap();
    assert_eq!(x, &[1., 0., 0., 3.]);

    // idempotent
    let y = &mut x.clone();
    c.proj(y).unwrap();
    assert_eq!(x, y);
}
