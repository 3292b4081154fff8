/*!
Constrained linear-quadratic optimal control problems solved by first-order fixed-point methods.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

This crate for Rust provides [`ProbOCP`], a finite-horizon problem with box, ball or conic constraints
that can be solved by the Chambolle-Pock, ADMM and SuperMann solvers of [`cpasocp_core`].

# General usage

1. Describe the dynamics, the quadratic cost and the constraints with [`ProbOCP::builder`].
   Constraint sets are [`cpasocp_core::solver::ConvexSet`] implementors such as [`prelude::SetBox`],
   optionally one per stage through [`prelude::SetCartesian`].
1. [`ProbOCPBuilder::build`] computes \\(\\|L\\|\\), the step size \\(\alpha\\) and the offline Riccati sequences.
1. Invoke [`ProbOCP::chambolle_pock`], [`ProbOCP::admm`], [`ProbOCP::chambolle_pock_supermann`]
   or their scaled variants to get a [`prelude::Solution`].

# Examples

```
use float_eq::assert_float_eq;
use nalgebra::{DMatrix, DVector};
use cpasocp::prelude::*;
use cpasocp::*;

//env_logger::init(); // Use any logger crate as `cpasocp` uses `log` crate.

let n = 10;
let a = DMatrix::from_row_slice(2, 2, &[1., 0.7, -0.1, 1.]);
let b = DMatrix::from_row_slice(2, 2, &[1., 1., 0.5, 1.]);

let stage: Vec<Box<dyn ConvexSet>> = (0.. n).map(|_| Box::new(SetBox::new(-2., 2.)) as Box<dyn ConvexSet>).collect();

let mut ocp = ProbOCP::builder(n)
    .dynamics(a, b)
    .cost(DMatrix::<f64>::identity(2, 2) * 10., DMatrix::<f64>::identity(2, 2), DMatrix::<f64>::identity(2, 2) * 5.)
    .constraints(
        DMatrix::<f64>::identity(2, 2), DMatrix::<f64>::identity(2, 2), DMatrix::<f64>::identity(2, 2),
        SetCartesian::new(stage), SetBox::new(-2., 2.)
    )
    .build().unwrap();

let x0 = DVector::from_vec(vec![0.2, 0.5]);
let z0 = DVector::zeros(ocp.n_z());
let eta0 = DVector::zeros(ocp.n_l());

let rslt = ocp.chambolle_pock(1e-6, &x0, &z0, &eta0).unwrap();

assert_eq!(rslt.status(), SolverStatus::Converged);
assert_float_eq!(rslt.z().as_slice()[0..2], [0.2, 0.5].as_ref(), abs_all <= 1e-6);
```
*/

mod problem;

pub use problem::*;

//

/// Prelude
pub mod prelude
{
    pub use cpasocp_core::solver::{ChambollePock, Admm, SuperMann, SuperMannParam, Direction};
    pub use cpasocp_core::solver::{SolverParam, SolverError, SolverStatus, Solution, Residual};
    pub use cpasocp_core::solver::{ConvexSet, SetError, Operator, Proximal};
    pub use cpasocp_core::{SetBox, SetBall, ConeReal, ConeZero, ConeRPos, ConeSOC, SetCartesian, ConstraintProjector};
}
