use crate::solver::{ConvexSet, SetError};

//

/// Constraint set of a finite-horizon problem
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// \mathcal{C} = \mathcal{C}\_{\rm stage} \times \mathcal{C}\_N
/// \subset \mathbb{R}^{N n_c} \times \mathbb{R}^{n_f}
/// \\]
/// If the stage set is a [`crate::SetCartesian`], it shall have \\(N\\) members,
/// each applied to one \\(n_c\\)-block. Otherwise it is applied to the stacked \\(N n_c\\) part as a whole.
pub struct ConstraintProjector
{
    horizon: usize,
    n_c: usize,
    n_f: usize,
    stage: Box<dyn ConvexSet>,
    terminal: Box<dyn ConvexSet>,
}

impl ConstraintProjector
{
    /// Creates an instance.
    /// 
    /// Returns [`ConstraintProjector`] instance.
    /// * `horizon` is \\(N\\).
    /// * `n_c` is the stage constraint dimension.
    /// * `n_f` is the terminal constraint dimension.
    /// * `stage` is \\(\mathcal{C}\_{\rm stage}\\).
    /// * `terminal` is \\(\mathcal{C}\_N\\).
    pub fn new(horizon: usize, n_c: usize, n_f: usize, stage: Box<dyn ConvexSet>, terminal: Box<dyn ConvexSet>) -> Self
    {
        ConstraintProjector {
            horizon, n_c, n_f, stage, terminal
        }
    }

    /// Checks the member sets against the block layout.
    /// 
    /// Returns `Err` if a fixed dimension or the number of stage sets does not fit.
    pub fn check(&mut self) -> Result<(), SetError>
    {
        if let Some(d) = self.terminal.dimension() {
            if d != self.n_f {
                log::error!("Terminal set dimension {} must be {}", d, self.n_f);
                return Err(SetError::DimensionMismatch);
            }
        }

        let (horizon, n_c) = (self.horizon, self.n_c);
        match self.stage.as_cartesian_mut() {
            Some(cart) => {
                if cart.num_sets() != horizon {
                    log::error!("Stage sets {} must be {}", cart.num_sets(), horizon);
                    return Err(SetError::BlockCountMismatch);
                }
                if cart.dimensions().iter().flatten().any(|d| *d != n_c) {
                    log::error!("Stage set dimensions {:?} must be {}", cart.dimensions(), n_c);
                    return Err(SetError::DimensionMismatch);
                }
            },
            None => {
                if let Some(d) = self.stage.dimension() {
                    if d != horizon * n_c {
                        log::error!("Stage set dimension {} must be {}", d, horizon * n_c);
                        return Err(SetError::DimensionMismatch);
                    }
                }
            },
        }
        Ok(())
    }
}

impl ConvexSet for ConstraintProjector
{
    fn dimension(&self) -> Option<usize>
    {
        Some(self.horizon * self.n_c + self.n_f)
    }

    fn proj(&mut self, x: &mut [f64]) -> Result<(), SetError>
    {
        let n_stage = self.horizon * self.n_c;
        if x.len() != n_stage + self.n_f {
            log::error!("ConstraintProjector: dimension {} but vector length {}", n_stage + self.n_f, x.len());
            return Err(SetError::DimensionMismatch);
        }
        self.check()?;

        let (x_stage, x_term) = x.split_at_mut(n_stage);

        if let Some(cart) = self.stage.as_cartesian_mut() {
            let mut blocks: Vec<&mut [f64]> = if self.n_c > 0 {
                x_stage.chunks_mut(self.n_c).collect()
            }
            else {
                (0.. self.horizon).map(|_| <&mut [f64]>::default()).collect()
            };
            cart.proj_blocks(&mut blocks)?;
        }
        else {
            self.stage.proj(x_stage)?;
        }

        self.terminal.proj(x_term)
    }
}

//

#[test]
fn test_projector1()
{
    use crate::{SetBox, SetCartesian, ConeRPos};

    let stage = SetCartesian::new(vec![
        Box::new(SetBox::new(-1., 1.)),
        Box::new(SetBox::new(-2., 2.)),
    ]);
    let mut p = ConstraintProjector::new(2, 2, 1, Box::new(stage), Box::new(ConeRPos::new()));
    assert_eq!(p.dimension(), Some(5));

    let x = &mut [3., -3., 3., -3., -1.];
    p.proj(x).unwrap();
    assert_eq!(x, &[1., -1., 2., -2., 0.]);
}

#[test]
fn test_projector2()
{
    use crate::{SetBall, ConeZero};

    // flat stage set
    let mut p = ConstraintProjector::new(2, 2, 2, Box::new(SetBall::new(1.)), Box::new(ConeZero::new()));

    let x = &mut [2., 0., 0., 0., 5., 5.];
    p.proj(x).unwrap();
    assert_eq!(x, &[1., 0., 0., 0., 0., 0.]);

    assert_eq!(p.proj(&mut [0.; 5]), Err(SetError::DimensionMismatch));
}

#[test]
fn test_projector3()
{
    use crate::{SetBox, SetCartesian, ConeRPos};

    let stage = SetCartesian::new(vec![
        Box::new(SetBox::new(-1., 1.)),
    ]);
    let mut p = ConstraintProjector::new(2, 2, 1, Box::new(stage), Box::new(ConeRPos::new()));
    assert_eq!(p.check(), Err(SetError::BlockCountMismatch));

    let x = &mut [3., -3., 3., -3., -1.];
    assert_eq!(p.proj(x), Err(SetError::BlockCountMismatch));
    assert_eq!(x, &[3., -3., 3., -3., -1.]);
}
