use crate::solver::{ConvexSet, SetError, fix_dimension, norm_slice};

//

/// Second-order cone
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// \mathcal{Q}^n =
/// \left\lbrace (u, t) \in \mathbb{R}^{n-1} \times \mathbb{R}
/// \ \middle|\ \\|u\\|_2 \le t
/// \right\rbrace
/// \\]
/// The last coordinate is \\(t\\).
#[derive(Debug, Clone, Default)]
pub struct ConeSOC
{
    dim: Option<usize>,
}

impl ConeSOC
{
    /// Creates an instance.
    /// 
    /// Returns [`ConeSOC`] instance.
    pub fn new() -> Self
    {
        ConeSOC {
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

impl ConvexSet for ConeSOC
{
    fn dimension(&self) -> Option<usize>
    {
        self.dim
    }

    fn proj(&mut self, x: &mut [f64]) -> Result<(), SetError>
    {
        fix_dimension("ConeSOC", &mut self.dim, x.len())?;

        if let Some((t, u)) = x.split_last_mut() {
            let norm_u = norm_slice(u);

            if norm_u <= *t {
                // as they are
            }
            else if norm_u <= -*t {
                u.fill(0.);
                *t = 0.;
            }
            else {
                let t_new = (norm_u + *t) / 2.;
                let alpha = t_new / norm_u;
                for e in u {
                    *e *= alpha;
                }
                *t = t_new;
            }
        }
        Ok(())
    }
}

//

#[test]
fn test_cone_soc1()
{
    use float_eq::assert_float_eq;

    let mut c = ConeSOC::new();

    let x = &mut [3., 4., 5.];
    c.proj(x).unwrap();
    assert_float_eq!(x.as_ref(), [3., 4., 5.].as_ref(), abs_all <= 1e-12);

    let x = &mut [3., 4., -5.];
    c.proj(x).unwrap();
    assert_float_eq!(x.as_ref(), [0., 0., 0.].as_ref(), abs_all <= 1e-12);

    let x = &mut [3., 4., 0.];
    c.proj(x).unwrap();
    assert_float_eq!(x.as_ref(), [1.5, 2., 2.5].as_ref(), abs_all <= 1e-12);

    // idempotent
    let y = &mut x.clone();
    c.proj(y).unwrap();
    assert_float_eq!(x.as_ref(), y.as_ref(), abs_all <= 1e-12);
}
