//! SuperMann accelerated Chambolle-Pock solver

use nalgebra::DVector;
use super::{Operator, Proximal, ConvexSet, SolverError, SolverParam, Solution, SolverStatus};
use super::{FixedPointMap, MetricA, Direction, DirectionMemory};
use super::fixed_point::{FixedPointStep, stack, split, check_prob, log_trigger};

/// SuperMann parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperMannParam
{
    /// Number of memory entries of the direction generator.
    pub memory: usize,
    /// Decrease factor of the blind update.
    pub c0: f64,
    /// Decrease factor of the educated update.
    pub c1: f64,
    /// Base of the summable slack added to the safeguard.
    pub q: f64,
    /// Backtracking factor of the step length.
    pub beta: f64,
    /// Sufficient decrease factor of the Krasnosel'skii-Mann fallback.
    pub sigma: f64,
    /// Relaxation of the Krasnosel'skii-Mann fallback.
    pub lambda: f64,
    /// Direction generator.
    pub direction: Direction,
    /// Max number of backtracking steps before the plain step is taken.
    pub max_backtrack: usize,
}

impl Default for SuperMannParam
{
    fn default() -> Self
    {
        SuperMannParam {
            memory: 5,
            c0: 0.99,
            c1: 0.99,
            q: 0.99,
            beta: 0.5,
            sigma: 0.1,
            lambda: 1.0,
            direction: Direction::Anderson,
            max_backtrack: 10_000,
        }
    }
}

impl SuperMannParam
{
    pub(crate) fn check(&self) -> Result<(), SolverError>
    {
        let open01 = |v: f64| v > 0. && v < 1.;

        let valid = self.memory >= 1
            && open01(self.c0) && open01(self.c1) && open01(self.q) && open01(self.beta) && open01(self.sigma)
            && self.lambda > 0. && self.lambda < 2.
            && self.max_backtrack >= 1;

        if valid {
            Ok(())
        }
        else {
            log::error!("Invalid parameter: {:?}", self);
            Err(SolverError::InvalidParam)
        }
    }
}

//

/// Safeguard state of SuperMann.
#[derive(Debug, Clone)]
pub struct SuperMannState
{
    r_safe: f64,
    eta: f64,
    memory: DirectionMemory,
}

impl SuperMannState
{
    /// Creates an instance.
    /// 
    /// Returns [`SuperMannState`] instance with an empty direction memory.
    pub fn new(par: &SuperMannParam) -> Self
    {
        SuperMannState {
            r_safe: f64::INFINITY,
            eta: f64::INFINITY,
            memory: DirectionMemory::new(par.direction, par.memory),
        }
    }

    /// Safeguard \\(r_{\rm safe}\\).
    pub fn r_safe(&self) -> f64
    {
        self.r_safe
    }

    /// Best residual norm accepted by a blind update.
    pub fn eta(&self) -> f64
    {
        self.eta
    }

    /// One SuperMann step.
    /// 
    /// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
    /// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
    /// 
    /// Returns `Ok` with the next point, or `Err` if \\(T\\) fails.
    /// * `i` is the iteration index.
    /// * `par` gives the tolerance `eps_acc` and `eps_zero`.
    /// * `sm_par` is [`SuperMannParam`].
    /// * `metric` measures residuals \\(x - T(x)\\).
    /// * `map` is \\(T\\).
    /// * `x_k` is the current point and `t_x_k` is \\(T(x_k)\\).
    pub fn step<M, O>(&mut self, i: usize,
        par: &SolverParam, sm_par: &SuperMannParam,
        metric: &MetricA<'_, O>, map: &mut M,
        x_k: &DVector<f64>, t_x_k: &DVector<f64>) -> Result<DVector<f64>, SolverError>
    where M: FixedPointMap, O: Operator
    {
        let r_k = x_k - t_x_k;
        let norm_r = metric.norm(&r_k);

        if i == 0 {
            self.r_safe = norm_r;
            self.eta = norm_r;
        }
        if norm_r <= par.eps_acc {
            return Ok(t_x_k.clone());
        }

        let d_k = self.memory.direction(i, x_k, t_x_k, map, par.eps_zero)?;

        // blind update
        if norm_r <= sm_par.c0 * self.eta {
            log::trace!("{}: blind update {:.2e}", i, norm_r);
            self.eta = norm_r;
            return Ok(x_k + d_k);
        }

        let mut tau = 1.;
        for _ in 0.. sm_par.max_backtrack {
            let w_k = x_k + &d_k * tau;
            let t_w_k = map.apply(&w_k)?;
            let r_w = &w_k - t_w_k;
            let norm_rw = metric.norm(&r_w);

            // educated update
            if norm_r <= self.r_safe && norm_rw <= sm_par.c1 * norm_r {
                log::trace!("{}: educated update tau {:.2e}", i, tau);
                let i_q = i32::try_from(i).unwrap_or(i32::MAX);
                self.r_safe = norm_rw + sm_par.q.powi(i_q);
                return Ok(w_k);
            }

            if norm_rw <= par.eps_zero {
                return Ok(w_k);
            }

            // Krasnosel'skii-Mann step
            let sq_rw = norm_rw * norm_rw;
            let rho = sq_rw - metric.inner(&r_w, &(&w_k - x_k));
            if rho >= sm_par.sigma * norm_rw * norm_r {
                log::trace!("{}: KM step tau {:.2e}", i, tau);
                return Ok(x_k - r_w * (sm_par.lambda * rho / sq_rw));
            }

            tau *= sm_par.beta;
        }

        log::debug!("{}: backtracking exhausted", i);
        Ok(t_x_k.clone())
    }
}

//

/// SuperMann solver
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Accelerates the Chambolle-Pock operator \\(T\\) on \\(x = (z, \eta)\\)
/// with quasi-Newton directions safeguarded by the norm \\(\\|\cdot\\|_A\\) of [`MetricA`].
/// The problem and arguments are the same as [`crate::solver::ChambollePock`].
pub struct SuperMann
{
    /// solver parameters.
    pub par: SolverParam,
    /// acceleration parameters.
    pub sm_par: SuperMannParam,
}

impl SuperMann
{
    /// Creates an instance.
    /// 
    /// Returns [`SuperMann`] instance.
    pub fn new() -> Self
    {
        SuperMann {
            par: SolverParam::default(),
            sm_par: SuperMannParam::default(),
        }
    }

    /// Changes solver parameters.
    /// 
    /// Returns [`SuperMann`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<F>(mut self, f: F) -> Self
    where F: FnOnce(&mut SolverParam)
    {
        f(&mut self.par);
        self
    }

    /// Changes acceleration parameters.
    /// 
    /// Returns [`SuperMann`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn sm_par<F>(mut self, f: F) -> Self
    where F: FnOnce(&mut SuperMannParam)
    {
        f(&mut self.sm_par);
        self
    }

    /// Starts to solve.
    /// 
    /// Returns `Ok` with [`Solution`] or `Err` with [`SolverError`] type.
    /// Arguments are the same as [`crate::solver::ChambollePock::solve`].
    pub fn solve<P, O, C>(self,
        (prox, op_l, mut set): (P, O, C),
        x0: &DVector<f64>, z0: &DVector<f64>, eta0: &DVector<f64>
    ) -> Result<Solution, SolverError>
    where P: Proximal, O: Operator, C: ConvexSet
    {
        log::info!("----- Initializing");
        let sz = check_prob(&prox, &op_l, &set, x0, z0, eta0)?;
        self.par.check()?;
        self.sm_par.check()?;

        log::debug!("{:?}", self.par);
        log::debug!("{:?}", self.sm_par);

        let metric = MetricA::new(&op_l, sz.alpha);
        let mut step = FixedPointStep::new(&prox, &op_l, &mut set, x0.clone(), sz.alpha);
        let mut state = SuperMannState::new(&self.sm_par);
        let excess_from = self.par.excess_iter();
        let mut residuals = Vec::new();

        let mut z = z0.clone();
        let mut eta = eta0.clone();

        log::info!("----- Started");
        let mut i = 0;
        loop {
            let excess_iter = i + 1 >= self.par.max_iter;
            let log_trig = log_trigger(self.par.log_period, i);

            let (z_t, eta_t) = step.chambolle_pock(&z, &eta)?;

            let res = step.cp_residual(&z, &eta, &z_t, &eta_t);
            let term_conv = res.max() <= self.par.eps_acc;

            if log_trig || excess_iter || term_conv {
                log::debug!("{}: pri_dual_gap {:.2e} {:.2e} {:.2e} r_safe {:.2e}", i, res.primal, res.dual, res.gap.unwrap_or(0.), state.r_safe());
            }
            else {
                log::trace!("{}: pri_dual_gap {:.2e} {:.2e} {:.2e} r_safe {:.2e}", i, res.primal, res.dual, res.gap.unwrap_or(0.), state.r_safe());
            }

            residuals.push(res);

            if excess_iter || term_conv {
                let z = z_t;
                let eta = eta_t;

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

            let x_k = stack(&z, &eta);
            let t_x_k = stack(&z_t, &eta_t);
            let x_next = state.step(i, &self.par, &self.sm_par, &metric, &mut step, &x_k, &t_x_k)?;
            (z, eta) = split(&x_next, sz.n_z);

            i += 1;
        } // end of loop
    }
}

impl Default for SuperMann
{
    fn default() -> Self
    {
        Self::new()
    }
}

//

#[cfg(test)]
fn affine_diag(d: &[f64]) -> super::direction::AffineMap
{
    use nalgebra::DMatrix;

    super::direction::AffineMap {
        a: DMatrix::from_diagonal(&DVector::from_row_slice(d)),
        b: DVector::zeros(d.len()),
    }
}

#[test]
fn test_supermann_step1()
{
    use float_eq::assert_float_eq;
    use nalgebra::DMatrix;
    use crate::MatOp;

    // L = 0 makes the metric Euclidean on (z, eta) of length 2
    let zero = DMatrix::zeros(1, 1);
    let op_l = MatOp::new(&zero);
    let metric = MetricA::new(&op_l, 0.5);
    let par = SolverParam::default();
    let sm_par = SuperMannParam {memory: 1, .. SuperMannParam::default()};
    let mut map = affine_diag(&[0.5, 0.5]);
    let mut state = SuperMannState::new(&sm_par);

    // educated update lands on the fixed point, r_safe = |r_w| + q^0
    let x = DVector::from_vec(vec![2., 0.]);
    let t_x = map.apply(&x).unwrap();
    let x_next = state.step(0, &par, &sm_par, &metric, &mut map, &x, &t_x).unwrap();
    assert_float_eq!(x_next.as_slice(), [0., 0.].as_ref(), abs_all <= 1e-12);
    assert_float_eq!(state.r_safe(), 1., abs <= 1e-12);
    assert_float_eq!(state.eta(), 1., abs <= 1e-12);

    // blind update: residual 0.5 <= c0 * 1
    let x = DVector::from_vec(vec![1., 0.]);
    let t_x = map.apply(&x).unwrap();
    let x_next = state.step(1, &par, &sm_par, &metric, &mut map, &x, &t_x).unwrap();
    assert_float_eq!(x_next.as_slice(), [0., 0.].as_ref(), abs_all <= 1e-12);
    assert_float_eq!(state.eta(), 0.5, abs <= 1e-12);
    assert_float_eq!(state.r_safe(), 1., abs <= 1e-12);
}

#[test]
fn test_supermann_step2()
{
    use float_eq::assert_float_eq;
    use nalgebra::DMatrix;
    use crate::MatOp;

    let zero = DMatrix::zeros(1, 1);
    let op_l = MatOp::new(&zero);
    let metric = MetricA::new(&op_l, 0.5);
    let par = SolverParam::default();
    let sm_par = SuperMannParam {memory: 1, .. SuperMannParam::default()};
    let mut map = affine_diag(&[0.5, 0.5]);

    // safeguards closed: w hits the fixed point and is accepted as it is
    let mut state = SuperMannState::new(&sm_par);
    state.r_safe = 0.;
    state.eta = 0.;

    let x = DVector::from_vec(vec![2., -1.]);
    let t_x = map.apply(&x).unwrap();
    let x_next = state.step(1, &par, &sm_par, &metric, &mut map, &x, &t_x).unwrap();
    assert_float_eq!(x_next.as_slice(), [0., 0.].as_ref(), abs_all <= 1e-12);
    assert_eq!(state.r_safe(), 0.);
    assert_eq!(state.eta(), 0.);

    // residual already below eps_acc: plain step
    let mut state = SuperMannState::new(&sm_par);
    let x = DVector::from_vec(vec![1e-5, 0.]);
    let t_x = map.apply(&x).unwrap();
    let x_next = state.step(0, &par, &sm_par, &metric, &mut map, &x, &t_x).unwrap();
    assert_eq!(x_next, t_x);
}

#[test]
fn test_supermann_step3()
{
    use float_eq::assert_float_eq;
    use nalgebra::DMatrix;
    use crate::MatOp;

    let zero = DMatrix::zeros(1, 1);
    let op_l = MatOp::new(&zero);
    let metric = MetricA::new(&op_l, 0.5);
    let par = SolverParam::default();
    let sm_par = SuperMannParam {memory: 1, .. SuperMannParam::default()};
    let mut map = affine_diag(&[0.5, 0.2]);

    let mut state = SuperMannState::new(&sm_par);
    state.r_safe = 0.;
    state.eta = 0.;

    let x = DVector::from_vec(vec![2., 2.]);
    let t_x = map.apply(&x).unwrap();

    // the same direction the state is going to take
    let d = state.memory.clone().direction(1, &x, &t_x, &mut map, par.eps_zero).unwrap();
    let r = &x - &t_x;
    let w = &x + &d;
    let r_w = &w - map.apply(&w).unwrap();
    let sq_rw = r_w.norm_squared();
    let rho = sq_rw - r_w.dot(&d);
    assert!(rho >= sm_par.sigma * r_w.norm() * r.norm());
    assert!(r_w.norm() > par.eps_zero);

    // Krasnosel'skii-Mann step at tau = 1
    let x_next = state.step(1, &par, &sm_par, &metric, &mut map, &x, &t_x).unwrap();
    let x_ref = &x - &r_w * (sm_par.lambda * rho / sq_rw);
    assert_float_eq!(x_next.as_slice(), x_ref.as_slice(), abs_all <= 1e-12);
    assert_eq!(state.r_safe(), 0.);
}

#[test]
fn test_supermann_step4()
{
    use nalgebra::DMatrix;
    use crate::MatOp;

    let zero = DMatrix::zeros(1, 1);
    let op_l = MatOp::new(&zero);
    let metric = MetricA::new(&op_l, 0.5);
    let par = SolverParam::default();

    // no safeguard passes within one round: plain step
    let sm_par = SuperMannParam {
        memory: 1,
        sigma: 0.999,
        max_backtrack: 1,
        .. SuperMannParam::default()
    };
    let mut map = affine_diag(&[0.5, 0.2]);

    let mut state = SuperMannState::new(&sm_par);
    state.r_safe = 0.;
    state.eta = 0.;

    let x = DVector::from_vec(vec![2., 2.]);
    let t_x = map.apply(&x).unwrap();
    let x_next = state.step(1, &par, &sm_par, &metric, &mut map, &x, &t_x).unwrap();
    assert_eq!(x_next, t_x);
}
