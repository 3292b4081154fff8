//! Proximal operator

use nalgebra::DVector;

/// Proximal operator trait
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Evaluates \\({\bf prox}_{\lambda h}(v)\\) of a closed convex function \\(h\\) which may depend on
/// an initial state \\(x_0\\).
/// The step \\(\lambda\\) is fixed when the implementor is built,
/// and solvers use it as their step size \\(\alpha\\).
pub trait Proximal
{
    /// Length of the decision vector \\(z\\).
    fn size(&self) -> usize;

    /// Length of the initial state \\(x_0\\).
    fn state_size(&self) -> usize;

    /// Step \\(\lambda\\) the evaluator is built for.
    fn step(&self) -> f64;

    /// Calculate \\(z = {\bf prox}_{\lambda h}(v)\\).
    /// 
    /// * `x0` is the initial state. The length shall be [`Proximal::state_size`].
    /// * `v` is the point to evaluate at. The length shall be [`Proximal::size`].
    /// * `z` receives the result. The length shall be [`Proximal::size`].
    fn prox(&self, x0: &DVector<f64>, v: &DVector<f64>, z: &mut DVector<f64>);
}

impl<P: Proximal + ?Sized> Proximal for &P
{
    fn size(&self) -> usize
    {
        P::size(self)
    }

    fn state_size(&self) -> usize
    {
        P::state_size(self)
    }

    fn step(&self) -> f64
    {
        P::step(self)
    }

    fn prox(&self, x0: &DVector<f64>, v: &DVector<f64>, z: &mut DVector<f64>)
    {
        P::prox(self, x0, v, z)
    }
}
