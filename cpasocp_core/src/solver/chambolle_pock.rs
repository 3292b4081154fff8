//! Chambolle-Pock primal-dual solver

use nalgebra::DVector;
use super::{Operator, Proximal, ConvexSet, SolverError, SolverParam, Solution, SolverStatus};
use super::fixed_point::{FixedPointStep, check_prob, check_scaling, scale_in, scale_out, log_trigger};

/// Chambolle-Pock solver
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// This struct abstracts a solver of
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & h(z) \\\\
/// {\rm subject \ to} & L z \in \mathcal{C},
/// \end{array}
/// \\]
/// where
/// * \\( h \\) is a closed convex function given by its [`Proximal`]
/// * \\( L \\) is a linear [`Operator`]
/// * \\( \mathcal{C} \\) is a nonempty closed [`ConvexSet`].
/// 
/// The step size \\(\alpha\\) is [`Proximal::step`], which shall satisfy \\(\alpha \\|L\\| < 1\\).
pub struct ChambollePock
{
    /// solver parameters.
    pub par: SolverParam,
}

impl ChambollePock
{
    /// Creates an instance.
    /// 
    /// Returns [`ChambollePock`] instance.
    pub fn new() -> Self
    {
        ChambollePock {
            par: SolverParam::default(),
        }
    }

    /// Changes solver parameters.
    /// 
    /// Returns [`ChambollePock`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<F>(mut self, f: F) -> Self
    where F: FnOnce(&mut SolverParam)
    {
        f(&mut self.par);
        self
    }

    /// Starts to solve.
    /// 
    /// Returns `Ok` with [`Solution`] or `Err` with [`SolverError`] type.
    /// * `prox` is \\({\bf prox}_{\alpha h}\\) as [`Proximal`].
    /// * `op_l` is \\(L\\) as a linear [`Operator`].
    /// * `set` is \\(\mathcal{C}\\) expressed by [`ConvexSet`].
    /// * `x0` is the initial state passed to `prox`.
    /// * `z0` and `eta0` are the initial iterates.
    pub fn solve<P, O, C>(self,
        (prox, op_l, set): (P, O, C),
        x0: &DVector<f64>, z0: &DVector<f64>, eta0: &DVector<f64>
    ) -> Result<Solution, SolverError>
    where P: Proximal, O: Operator, C: ConvexSet
    {
        self.solve_core((prox, op_l, set), x0, z0, eta0, None)
    }

    /// Starts to solve with a diagonal change of variables.
    /// 
    /// Same as [`ChambollePock::solve`] except that the iterates are divided by `scaling` on entry
    /// and multiplied back before every residual test and on exit.
    /// `scaling` shall be positive and as long as \\(z\\), which requires \\(L\\) to be square.
    pub fn solve_scaling<P, O, C>(self,
        (prox, op_l, set): (P, O, C),
        x0: &DVector<f64>, z0: &DVector<f64>, eta0: &DVector<f64>,
        scaling: &DVector<f64>
    ) -> Result<Solution, SolverError>
    where P: Proximal, O: Operator, C: ConvexSet
    {
        self.solve_core((prox, op_l, set), x0, z0, eta0, Some(scaling))
    }

    fn solve_core<P, O, C>(self,
        (prox, op_l, mut set): (P, O, C),
        x0: &DVector<f64>, z0: &DVector<f64>, eta0: &DVector<f64>,
        scaling: Option<&DVector<f64>>
    ) -> Result<Solution, SolverError>
    where P: Proximal, O: Operator, C: ConvexSet
    {
        log::info!("----- Initializing");
        let sz = check_prob(&prox, &op_l, &set, x0, z0, eta0)?;
        if let Some(d) = scaling {
            check_scaling(&sz, d)?;
        }
        self.par.check()?;

        log::debug!("{:?}", self.par);
        log::debug!("alpha {:.3e}", sz.alpha);

        let (x0, mut z, mut eta) = scale_in(x0, z0, eta0, scaling);
        let mut step = FixedPointStep::new(&prox, &op_l, &mut set, x0, sz.alpha);
        let excess_from = self.par.excess_iter();
        let mut residuals = Vec::new();

        log::info!("----- Started");
        let mut i = 0;
        loop {
            let excess_iter = i + 1 >= self.par.max_iter;
            let log_trig = log_trigger(self.par.log_period, i);

            let (z_next, eta_next) = step.chambolle_pock(&z, &eta)?;

            let res = match scaling {
                None => step.cp_residual(&z, &eta, &z_next, &eta_next),
                Some(_) => step.cp_residual(
                    &scale_out(&z, scaling), &scale_out(&eta, scaling),
                    &scale_out(&z_next, scaling), &scale_out(&eta_next, scaling)
                ),
            };
            let term_conv = res.max() <= self.par.eps_acc;

            if log_trig || excess_iter || term_conv {
                log::debug!("{}: pri_dual_gap {:.2e} {:.2e} {:.2e}", i, res.primal, res.dual, res.gap.unwrap_or(0.));
            }
            else {
                log::trace!("{}: pri_dual_gap {:.2e} {:.2e} {:.2e}", i, res.primal, res.dual, res.gap.unwrap_or(0.));
            }

            residuals.push(res);
            z = z_next;
            eta = eta_next;

            if excess_iter || term_conv {
                let z = scale_out(&z, scaling);
                let eta = scale_out(&eta, scaling);

                log::trace!("{}: z {:?}", i, z.as_slice());
                log::trace!("{}: eta {:?}", i, eta.as_slice());

                let status = if term_conv && i < excess_from {
                    log::info!("----- Converged");
                    SolverStatus::Converged
                }
                else {
                    log::warn!("----- ExcessIter");
                    SolverStatus::ExcessIter
                };

                return Ok(Solution::new(z, eta, status, residuals));
            }

            i += 1;
        } // end of loop
    }
}

impl Default for ChambollePock
{
    fn default() -> Self
    {
        Self::new()
    }
}
