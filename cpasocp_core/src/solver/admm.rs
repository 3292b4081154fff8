//! ADMM solver

use nalgebra::DVector;
use super::{Operator, Proximal, ConvexSet, SolverError, SolverParam, Solution, SolverStatus};
use super::fixed_point::{FixedPointStep, check_prob, check_scaling, scale_in, scale_out, log_trigger};

/// ADMM solver
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Solves the same problem as [`crate::solver::ChambollePock`] by the alternating direction method of multipliers
/// with penalty \\(\rho = 1 / \alpha\\).
/// The dual iterate \\(\eta\\) lives in the range of \\(L\\), and \\(L\\) shall be square.
pub struct Admm
{
    /// solver parameters.
    pub par: SolverParam,
}

impl Admm
{
    /// Creates an instance.
    /// 
    /// Returns [`Admm`] instance.
    pub fn new() -> Self
    {
        Admm {
            par: SolverParam::default(),
        }
    }

    /// Changes solver parameters.
    /// 
    /// Returns [`Admm`] with its parameters changed.
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
    /// Arguments are the same as [`crate::solver::ChambollePock::solve`].
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
    /// Arguments are the same as [`crate::solver::ChambollePock::solve_scaling`].
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
        if sz.n_l != sz.n_z {
            log::error!("Size mismatch: op_l{:?} must be square", op_l.size());
            return Err(SolverError::DimensionMismatch);
        }
        if let Some(d) = scaling {
            check_scaling(&sz, d)?;
        }
        self.par.check()?;

        log::debug!("{:?}", self.par);
        log::debug!("rho {:.3e}", sz.alpha.recip());

        let (x0, mut z, mut eta) = scale_in(x0, z0, eta0, scaling);
        let mut step = FixedPointStep::new(&prox, &op_l, &mut set, x0, sz.alpha);

        let mut u = z.clone();
        step.op_l().trans_op(-1., &eta, 1., &mut u);

        let excess_from = self.par.excess_iter();
        let mut residuals = Vec::new();

        log::info!("----- Started");
        let mut i = 0;
        loop {
            let excess_iter = i + 1 >= self.par.max_iter;
            let log_trig = log_trigger(self.par.log_period, i);

            let (z_next, eta_next, u_next) = step.admm(&eta, &u)?;

            let res = step.admm_residual(&eta, &z_next, &eta_next, scaling);
            let term_conv = res.max() <= self.par.eps_acc;

            if log_trig || excess_iter || term_conv {
                log::debug!("{}: pri_dual {:.2e} {:.2e}", i, res.primal, res.dual);
            }
            else {
                log::trace!("{}: pri_dual {:.2e} {:.2e}", i, res.primal, res.dual);
            }

            residuals.push(res);
            z = z_next;
            eta = eta_next;
            u = u_next;

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

impl Default for Admm
{
    fn default() -> Self
    {
        Self::new()
    }
}
