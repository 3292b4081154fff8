//! Fixed-point splitting engine
//! 
//! This crate provides [`solver::ChambollePock`], [`solver::Admm`] and [`solver::SuperMann`]
//! for problems given by a [`solver::Proximal`], a linear [`solver::Operator`] and a [`solver::ConvexSet`],
//! together with the convex sets below and their composition into [`ConstraintProjector`].

pub mod solver;

//

mod matop;

pub use matop::*;

//

mod cone_real;
mod cone_zero;
mod cone_rpos;
mod cone_soc;
mod set_box;
mod set_ball;
mod set_cartesian;

pub use cone_real::*;
pub use cone_zero::*;
pub use cone_rpos::*;
pub use cone_soc::*;
pub use set_box::*;
pub use set_ball::*;
pub use set_cartesian::*;

//

mod projector;

pub use projector::*;

//

#[cfg(test)]
mod tests;
