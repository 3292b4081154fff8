use crate::solver::{ConvexSet, SetError, fix_dimension, norm_slice};

//

/// Euclidean ball
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// \left\lbrace x \in \mathbb{R}^n
/// \ \middle|\ \\|x\\|_2 \le r
/// \right\rbrace
/// \\]
#[derive(Debug, Clone)]
pub struct SetBall
{
    radius: f64,
    dim: Option<usize>,
}

impl SetBall
{
    /// Creates an instance.
    /// 
    /// Returns [`SetBall`] instance.
    /// Panics if `radius` is negative.
    /// * `radius` is \\(r\\).
    pub fn new(radius: f64) -> Self
    {
        assert!(radius >= 0.);

        SetBall {
            radius,
            dim: None,
        }
    }

    /// Fixes the dimension.
    pub fn with_dim(mut self, dim: usize) -> Self
    {
        self.dim = Some(dim);
        self
    }

    pub fn radius(&self) -> f64
    {
        self.radius
    }
}

impl ConvexSet for SetBall
{
    fn dimension(&self) -> Option<usize>
    {
        self.dim
    }

    fn proj(&mut self, x: &mut [f64]) -> Result<(), SetError>
    {
        fix_dimension("SetBall", &mut self.dim, x.len())?;

        let norm = norm_slice(x);
        if norm > self.radius {
            let s = self.radius / norm;
            for e in x {
                *e *= s;
            }
        }
        Ok(())
    }
}

//

#[test]
fn test_set_ball1()
{
    use float_eq::assert_float_eq;

    let mut s = SetBall::new(1.);
    assert_eq!(s.radius(), 1.);

    let x = &mut [3., 4.];
    s.proj(x).unwrap();
    assert_float_eq!(x.as_ref(), [0.6, 0.8].as_ref(), abs_all <= 1e-12);

    let x = &mut [0.3, 0.4];
    s.proj(x).unwrap();
    assert_float_eq!(x.as_ref(), [0.3, 0.4].as_ref(), abs_all <= 1e-12);

    let x = &mut [0., 0.];
    s.proj(x).unwrap();
    assert_eq!(x, &[0., 0.]);
}

#[test]
fn test_set_ball2()
{
    let mut s = SetBall::new(0.);

    let x = &mut [0., 0., 0.];
    s.proj(x).unwrap();
    assert_eq!(x, &[0., 0., 0.]);

    let x = &mut [1., -1., 0.];
    s.proj(x).unwrap();
    assert_eq!(x, &[0., 0., 0.]);
}
