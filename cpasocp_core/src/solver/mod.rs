//! Fixed-point splitting solvers

mod operator;
mod proximal;
mod set;
mod solver_error;
mod solver_param;
mod solution;
mod fixed_point;
mod chambolle_pock;
mod admm;
mod metric;
mod direction;
mod supermann;

pub use operator::*;
pub use proximal::*;
pub use set::*;
pub use solver_error::*;
pub use solver_param::*;
pub use solution::*;
pub use fixed_point::*;
pub use chambolle_pock::*;
pub use admm::*;
pub use metric::*;
pub use direction::*;
pub use supermann::*;
