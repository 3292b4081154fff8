use nalgebra::{DMatrix, DVector};
use cpasocp_core::solver::{ChambollePock, Admm, SuperMann, SuperMannParam, SolverParam, SolverError, Solution, ConvexSet};
use cpasocp_core::ConstraintProjector;
use super::{OfflineSeq, ProxOCP, LinOpOCP};

//

/// Builder of [`ProbOCP`].
/// 
/// Every part but `step_ratio` and `par` shall be given before [`ProbOCPBuilder::build`].
pub struct ProbOCPBuilder
{
    horizon: usize,
    dynamics: Option<(DMatrix<f64>, DMatrix<f64>)>,
    cost: Option<(DMatrix<f64>, DMatrix<f64>, DMatrix<f64>)>,
    gammas: Option<(DMatrix<f64>, DMatrix<f64>, DMatrix<f64>)>,
    sets: Option<(Box<dyn ConvexSet>, Box<dyn ConvexSet>)>,
    step_ratio: f64,
    par: SolverParam,
}

impl ProbOCPBuilder
{
    /// Sets the dynamics \\(x_{t+1} = A x_t + B u_t\\).
    pub fn dynamics(mut self, a: DMatrix<f64>, b: DMatrix<f64>) -> Self
    {
        self.dynamics = Some((a, b));
        self
    }

    /// Sets the stage weights \\(Q, R\\) and the terminal weight \\(P\\).
    pub fn cost(mut self, q: DMatrix<f64>, r: DMatrix<f64>, p: DMatrix<f64>) -> Self
    {
        self.cost = Some((q, r, p));
        self
    }

    /// Sets the constraints
    /// \\(\Gamma_x x_t + \Gamma_u u_t \in \mathcal{C}\_{\rm stage}\\) and \\(\Gamma_N x_N \in \mathcal{C}\_N\\).
    /// 
    /// `stage` applies to all \\(N\\) stages stacked, or per stage if it is a [`cpasocp_core::SetCartesian`] of \\(N\\) sets.
    pub fn constraints<S, T>(mut self,
        gamma_x: DMatrix<f64>, gamma_u: DMatrix<f64>, gamma_n: DMatrix<f64>,
        stage: S, terminal: T) -> Self
    where S: ConvexSet + 'static, T: ConvexSet + 'static
    {
        self.gammas = Some((gamma_x, gamma_u, gamma_n));
        self.sets = Some((Box::new(stage), Box::new(terminal)));
        self
    }

    /// Sets the factor of the step size \\(\alpha\\) against \\(1 / \\|L\\|\\), 0.99 by default.
    pub fn step_ratio(mut self, ratio: f64) -> Self
    {
        self.step_ratio = ratio;
        self
    }

    /// Changes solver parameters used by the solve methods of [`ProbOCP`].
    /// 
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<F>(mut self, f: F) -> Self
    where F: FnOnce(&mut SolverParam)
    {
        f(&mut self.par);
        self
    }

    /// Builds the problem.
    /// 
    /// Returns `Ok` with [`ProbOCP`], or `Err` with [`SolverError`] type
    /// if a part is missing, shapes are inconsistent or the Riccati recursion fails.
    pub fn build(self) -> Result<ProbOCP, SolverError>
    {
        let horizon = self.horizon;

        let missing = |name: &str| {
            log::error!("{} not given", name);
            SolverError::InvalidOp
        };
        let (a, b) = self.dynamics.ok_or_else(|| missing("dynamics"))?;
        let (q, r, p) = self.cost.ok_or_else(|| missing("cost"))?;
        let (gamma_x, gamma_u, gamma_n) = self.gammas.ok_or_else(|| missing("constraints"))?;
        let (stage, terminal) = self.sets.ok_or_else(|| missing("constraint sets"))?;

        let n_x = a.nrows();
        let n_u = b.ncols();
        let n_c = gamma_x.nrows();
        let n_f = gamma_n.nrows();

        let shapes_ok = horizon >= 1
            && a.shape() == (n_x, n_x)
            && b.shape() == (n_x, n_u)
            && q.shape() == (n_x, n_x)
            && r.shape() == (n_u, n_u)
            && p.shape() == (n_x, n_x)
            && gamma_x.shape() == (n_c, n_x)
            && gamma_u.shape() == (n_c, n_u)
            && gamma_n.shape() == (n_f, n_x);

        if !shapes_ok {
            log::error!("Size mismatch: N {}, A{:?}, B{:?}, Q{:?}, R{:?}, P{:?}, Gamma_x{:?}, Gamma_u{:?}, Gamma_N{:?}",
                horizon, a.shape(), b.shape(), q.shape(), r.shape(), p.shape(),
                gamma_x.shape(), gamma_u.shape(), gamma_n.shape());
            return Err(SolverError::InvalidOp);
        }

        if !(self.step_ratio > 0. && self.step_ratio < 1.) {
            log::error!("Step ratio {} must be in (0, 1)", self.step_ratio);
            return Err(SolverError::InvalidParam);
        }

        let l_norm = LinOpOCP::new(horizon, &gamma_x, &gamma_u, &gamma_n).op_norm();
        if !(l_norm.is_finite() && l_norm > 0.) {
            log::error!("Operator norm {} must be positive", l_norm);
            return Err(SolverError::InvalidOp);
        }
        let alpha = self.step_ratio / l_norm;
        log::debug!("|L| {:.3e}, alpha {:.3e}", l_norm, alpha);

        let offline = OfflineSeq::new(horizon, &a, &b, &q, &r, &p, alpha)?;

        let mut projector = ConstraintProjector::new(horizon, n_c, n_f, stage, terminal);
        projector.check().or(Err(SolverError::DimensionMismatch))?;

        Ok(ProbOCP {
            horizon,
            a, b, q, r, p,
            gamma_x, gamma_u, gamma_n,
            projector,
            offline,
            l_norm,
            alpha,
            par: self.par,
        })
    }
}

//

/// Constrained linear-quadratic optimal control problem
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & \sum_{t=0}^{N-1} {1 \over 2} (x_t^T Q x_t + u_t^T R u_t) + {1 \over 2} x_N^T P x_N \\\\
/// {\rm subject \ to} & x_{t+1} = A x_t + B u_t, \quad x_0 \ {\rm given} \\\\
/// & \Gamma_x x_t + \Gamma_u u_t \in \mathcal{C}\_{\rm stage} \\\\
/// & \Gamma_N x_N \in \mathcal{C}\_N,
/// \end{array}
/// \\]
/// where
/// * variables \\( z = (x_0, u_0, \ldots, x_{N-1}, u_{N-1}, x_N) \\)
/// * \\( L \\) is [`LinOpOCP`] and the step size is \\( \alpha = 0.99 / \\|L\\| \\).
pub struct ProbOCP
{
    horizon: usize,
    a: DMatrix<f64>,
    b: DMatrix<f64>,
    q: DMatrix<f64>,
    r: DMatrix<f64>,
    p: DMatrix<f64>,
    gamma_x: DMatrix<f64>,
    gamma_u: DMatrix<f64>,
    gamma_n: DMatrix<f64>,

    projector: ConstraintProjector,
    offline: OfflineSeq,
    l_norm: f64,
    alpha: f64,
    par: SolverParam,
}

impl ProbOCP
{
    /// Starts to build a problem of horizon \\(N\\).
    /// 
    /// Returns [`ProbOCPBuilder`].
    pub fn builder(horizon: usize) -> ProbOCPBuilder
    {
        ProbOCPBuilder {
            horizon,
            dynamics: None,
            cost: None,
            gammas: None,
            sets: None,
            step_ratio: 0.99,
            par: SolverParam::default(),
        }
    }

    pub fn horizon(&self) -> usize
    {
        self.horizon
    }

    pub fn n_x(&self) -> usize
    {
        self.a.nrows()
    }

    pub fn n_u(&self) -> usize
    {
        self.b.ncols()
    }

    /// Length of \\(z\\).
    pub fn n_z(&self) -> usize
    {
        self.horizon * (self.n_x() + self.n_u()) + self.n_x()
    }

    /// Length of \\(\eta\\).
    pub fn n_l(&self) -> usize
    {
        self.horizon * self.gamma_x.nrows() + self.gamma_n.nrows()
    }

    /// Step size \\(\alpha\\).
    pub fn alpha(&self) -> f64
    {
        self.alpha
    }

    /// \\(\\|L\\|\\).
    pub fn l_norm(&self) -> f64
    {
        self.l_norm
    }

    pub fn offline(&self) -> &OfflineSeq
    {
        &self.offline
    }

    /// Dynamics \\((A, B)\\).
    pub fn dynamics(&self) -> (&DMatrix<f64>, &DMatrix<f64>)
    {
        (&self.a, &self.b)
    }

    /// Stage and terminal weights \\((Q, R, P)\\).
    pub fn cost(&self) -> (&DMatrix<f64>, &DMatrix<f64>, &DMatrix<f64>)
    {
        (&self.q, &self.r, &self.p)
    }

    /// Generates the problem data structures to be fed to the solvers of [`cpasocp_core::solver`].
    /// 
    /// Returns a tuple of a proximal operator, a linear operator and a convex set.
    pub fn problem(&mut self) -> (ProxOCP<'_>, LinOpOCP<'_>, &mut ConstraintProjector)
    {
        let prox = ProxOCP::new(&self.a, &self.b, &self.offline);
        let op_l = LinOpOCP::new(self.horizon, &self.gamma_x, &self.gamma_u, &self.gamma_n);

        (prox, op_l, &mut self.projector)
    }

    fn par_eps(&self, eps: f64) -> SolverParam
    {
        SolverParam {
            eps_acc: eps,
            .. self.par.clone()
        }
    }

    /// Solves by Chambolle-Pock.
    /// 
    /// Returns `Ok` with [`Solution`] or `Err` with [`SolverError`] type.
    /// * `eps` is the residual tolerance.
    /// * `x0` is the initial state.
    /// * `z0` and `eta0` are the initial iterates.
    pub fn chambolle_pock(&mut self, eps: f64,
        x0: &DVector<f64>, z0: &DVector<f64>, eta0: &DVector<f64>) -> Result<Solution, SolverError>
    {
        let s = ChambollePock { par: self.par_eps(eps) };
        s.solve(self.problem(), x0, z0, eta0)
    }

    /// Solves by Chambolle-Pock in scaled variables.
    /// 
    /// Same as [`ProbOCP::chambolle_pock`] with `scaling` of length \\(n_z\\), which requires \\(n_L = n_z\\).
    pub fn chambolle_pock_scaling(&mut self, eps: f64,
        x0: &DVector<f64>, z0: &DVector<f64>, eta0: &DVector<f64>,
        scaling: &DVector<f64>) -> Result<Solution, SolverError>
    {
        let s = ChambollePock { par: self.par_eps(eps) };
        s.solve_scaling(self.problem(), x0, z0, eta0, scaling)
    }

    /// Solves by ADMM, which requires \\(n_L = n_z\\).
    /// 
    /// Arguments are the same as [`ProbOCP::chambolle_pock`].
    pub fn admm(&mut self, eps: f64,
        x0: &DVector<f64>, z0: &DVector<f64>, eta0: &DVector<f64>) -> Result<Solution, SolverError>
    {
        let s = Admm { par: self.par_eps(eps) };
        s.solve(self.problem(), x0, z0, eta0)
    }

    /// Solves by ADMM in scaled variables.
    /// 
    /// Arguments are the same as [`ProbOCP::chambolle_pock_scaling`].
    pub fn admm_scaling(&mut self, eps: f64,
        x0: &DVector<f64>, z0: &DVector<f64>, eta0: &DVector<f64>,
        scaling: &DVector<f64>) -> Result<Solution, SolverError>
    {
        let s = Admm { par: self.par_eps(eps) };
        s.solve_scaling(self.problem(), x0, z0, eta0, scaling)
    }

    /// Solves by SuperMann-accelerated Chambolle-Pock.
    /// 
    /// Arguments are the same as [`ProbOCP::chambolle_pock`] except
    /// * `sm_par` is [`SuperMannParam`].
    pub fn chambolle_pock_supermann(&mut self, eps: f64,
        x0: &DVector<f64>, z0: &DVector<f64>, eta0: &DVector<f64>,
        sm_par: SuperMannParam) -> Result<Solution, SolverError>
    {
        let s = SuperMann { par: self.par_eps(eps), sm_par };
        s.solve(self.problem(), x0, z0, eta0)
    }
}
