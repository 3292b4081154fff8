//! Fixed-point operators of the splitting methods

use nalgebra::DVector;
use super::{Operator, Proximal, ConvexSet, SolverError, Residual};

/// Fixed-point map trait
/// 
/// Evaluates \\(T(x)\\) on a stacked vector \\(x\\).
pub trait FixedPointMap
{
    /// Length of \\(x\\).
    fn dim(&self) -> usize;

    /// Calculate \\(T(x)\\).
    /// 
    /// Returns `Ok` with \\(T(x)\\), or `Err` if the set projection fails.
    fn apply(&mut self, x: &DVector<f64>) -> Result<DVector<f64>, SolverError>;
}

//

/// One sweep of Chambolle-Pock or ADMM.
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Holds \\({\bf prox}_{\alpha h}\\), \\(L\\), \\(\mathcal{C}\\), the initial state \\(x_0\\)
/// and the step \\(\alpha\\) shared by every sweep of a solve.
/// As a [`FixedPointMap`] it is the Chambolle-Pock operator on \\((z, \eta)\\) stacked.
pub struct FixedPointStep<'a, P, O, C>
where P: Proximal, O: Operator, C: ConvexSet
{
    prox: &'a P,
    op_l: &'a O,
    set: &'a mut C,
    x0: DVector<f64>,
    alpha: f64,
}

impl<'a, P, O, C> FixedPointStep<'a, P, O, C>
where P: Proximal, O: Operator, C: ConvexSet
{
    /// Creates an instance.
    /// 
    /// Returns [`FixedPointStep`] instance.
    /// * `prox` evaluates \\({\bf prox}_{\alpha h}\\).
    /// * `op_l` is \\(L\\).
    /// * `set` is \\(\mathcal{C}\\).
    /// * `x0` is the initial state.
    /// * `alpha` is the step size.
    pub fn new(prox: &'a P, op_l: &'a O, set: &'a mut C, x0: DVector<f64>, alpha: f64) -> Self
    {
        FixedPointStep {
            prox, op_l, set, x0, alpha
        }
    }

    pub fn alpha(&self) -> f64
    {
        self.alpha
    }

    pub fn op_l(&self) -> &O
    {
        self.op_l
    }

    fn prox_at(&self, v: &DVector<f64>) -> DVector<f64>
    {
        let mut z = DVector::zeros(v.len());
        self.prox.prox(&self.x0, v, &mut z);
        z
    }

    /// Chambolle-Pock sweep.
    /// 
    /// Returns `Ok` with \\((z^+, \eta^+)\\):
    /// \\[
    /// \begin{array}{l}
    /// z^+ = {\bf prox}_{\alpha h}(z - \alpha L^T \eta) \\\\
    /// \bar\eta = \eta + \alpha L (2 z^+ - z) \\\\
    /// \eta^+ = \bar\eta - \alpha \Pi_{\mathcal{C}}(\bar\eta / \alpha)
    /// \end{array}
    /// \\]
    pub fn chambolle_pock(&mut self, z: &DVector<f64>, eta: &DVector<f64>)
    -> Result<(DVector<f64>, DVector<f64>), SolverError>
    {
        let alpha = self.alpha;

        let mut v = z.clone();
        self.op_l.trans_op(-alpha, eta, 1., &mut v);
        let z_next = self.prox_at(&v);

        let z_bar = &z_next * 2. - z;
        let mut eta_half = eta.clone();
        self.op_l.op(alpha, &z_bar, 1., &mut eta_half);

        let mut eta_proj = &eta_half / alpha;
        self.set.proj(eta_proj.as_mut_slice()).or(Err(SolverError::SetFailure))?;
        let eta_next = eta_half - eta_proj * alpha;

        Ok((z_next, eta_next))
    }

    /// ADMM sweep with \\(\rho = 1 / \alpha\\).
    /// 
    /// Returns `Ok` with \\((z^+, \eta^+, u^+)\\):
    /// \\[
    /// \begin{array}{l}
    /// z^+ = {\bf prox}_{\alpha h}(L^T \eta - u) \\\\
    /// \eta^+ = \Pi_{\mathcal{C}}(z^+ + u) \\\\
    /// u^+ = u + z^+ - L^T \eta^+
    /// \end{array}
    /// \\]
    pub fn admm(&mut self, eta: &DVector<f64>, u: &DVector<f64>)
    -> Result<(DVector<f64>, DVector<f64>, DVector<f64>), SolverError>
    {
        let mut v = -u;
        self.op_l.trans_op(1., eta, 1., &mut v);
        let z_next = self.prox_at(&v);

        let mut eta_next = &z_next + u;
        self.set.proj(eta_next.as_mut_slice()).or(Err(SolverError::SetFailure))?;

        let mut u_next = u + &z_next;
        self.op_l.trans_op(-1., &eta_next, 1., &mut u_next);

        Ok((z_next, eta_next, u_next))
    }

    /// Chambolle-Pock residuals in the infinity norm.
    /// 
    /// Returns [`Residual`] of
    /// \\(\xi_1 = (z - z^+) / \alpha - L^T (\eta - \eta^+)\\),
    /// \\(\xi_2 = (\eta - \eta^+) / \alpha + L (z^+ - z)\\)
    /// and \\(\xi_1 + L^T \xi_2\\).
    pub fn cp_residual(&self,
        z: &DVector<f64>, eta: &DVector<f64>,
        z_next: &DVector<f64>, eta_next: &DVector<f64>) -> Residual
    {
        let alpha = self.alpha;
        let dz = z - z_next;
        let deta = eta - eta_next;

        let mut xi1 = &dz / alpha;
        self.op_l.trans_op(-1., &deta, 1., &mut xi1);

        let mut xi2 = &deta / alpha;
        self.op_l.op(-1., &dz, 1., &mut xi2);

        let mut xi_gap = xi1.clone();
        self.op_l.trans_op(1., &xi2, 1., &mut xi_gap);

        Residual {
            primal: xi1.amax(),
            dual: xi2.amax(),
            gap: Some(xi_gap.amax()),
        }
    }

    /// ADMM residuals in the Euclidean norm.
    /// 
    /// Returns [`Residual`] of \\(r = D z^+ - D L^T \eta^+\\) as primal
    /// and \\(s = \rho (D L^T \eta^+ - D L^T \eta)\\) as dual,
    /// where \\(D\\) is `scaling` or the identity.
    pub fn admm_residual(&self,
        eta: &DVector<f64>, z_next: &DVector<f64>, eta_next: &DVector<f64>,
        scaling: Option<&DVector<f64>>) -> Residual
    {
        let n_z = z_next.len();

        let mut lt_eta = DVector::zeros(n_z);
        self.op_l.trans_op(1., eta, 0., &mut lt_eta);
        let mut lt_eta_next = DVector::zeros(n_z);
        self.op_l.trans_op(1., eta_next, 0., &mut lt_eta_next);
        let mut z = z_next.clone();

        if let Some(d) = scaling {
            lt_eta.component_mul_assign(d);
            lt_eta_next.component_mul_assign(d);
            z.component_mul_assign(d);
        }

        let s = (&lt_eta_next - lt_eta) / self.alpha;
        let r = z - lt_eta_next;

        Residual {
            primal: r.norm(),
            dual: s.norm(),
            gap: None,
        }
    }
}

impl<'a, P, O, C> FixedPointMap for FixedPointStep<'a, P, O, C>
where P: Proximal, O: Operator, C: ConvexSet
{
    fn dim(&self) -> usize
    {
        let (n_l, n_z) = self.op_l.size();
        n_z + n_l
    }

    fn apply(&mut self, x: &DVector<f64>) -> Result<DVector<f64>, SolverError>
    {
        let (_, n_z) = self.op_l.size();
        let (z, eta) = split(x, n_z);
        let (z_next, eta_next) = self.chambolle_pock(&z, &eta)?;

        Ok(stack(&z_next, &eta_next))
    }
}

//

/// Stacks \\(z\\) and \\(\eta\\) into one vector.
pub fn stack(z: &DVector<f64>, eta: &DVector<f64>) -> DVector<f64>
{
    let mut x = DVector::zeros(z.len() + eta.len());
    x.rows_mut(0, z.len()).copy_from(z);
    x.rows_mut(z.len(), eta.len()).copy_from(eta);
    x
}

/// Splits a stacked vector into \\(z\\) of length `n_z` and the rest \\(\eta\\).
pub fn split(x: &DVector<f64>, n_z: usize) -> (DVector<f64>, DVector<f64>)
{
    let n_eta = x.len() - n_z;
    (x.rows(0, n_z).into_owned(), x.rows(n_z, n_eta).into_owned())
}

//

/// Sizes of a validated problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProbSize
{
    pub n_z: usize,
    pub n_l: usize,
    pub n_x: usize,
    pub alpha: f64,
}

pub(crate) fn check_prob<P, O, C>(
    prox: &P, op_l: &O, set: &C,
    x0: &DVector<f64>, z0: &DVector<f64>, eta0: &DVector<f64>) -> Result<ProbSize, SolverError>
where P: Proximal, O: Operator, C: ConvexSet
{
    let (n_l, n_z) = op_l.size();
    let n_x = prox.state_size();
    let alpha = prox.step();

    if prox.size() != n_z {
        log::error!("Size mismatch: prox {}, op_l{:?}", prox.size(), op_l.size());
        return Err(SolverError::InvalidOp);
    }
    if !(alpha.is_finite() && alpha > 0.) {
        log::error!("Step size {} must be positive", alpha);
        return Err(SolverError::InvalidOp);
    }
    if let Some(d) = set.dimension() {
        if d != n_l {
            log::error!("Size mismatch: set {}, op_l{:?}", d, op_l.size());
            return Err(SolverError::InvalidOp);
        }
    }
    if x0.len() != n_x || z0.len() != n_z || eta0.len() != n_l {
        log::error!("Size mismatch: x0 {} (must be {}), z0 {} (must be {}), eta0 {} (must be {})",
            x0.len(), n_x, z0.len(), n_z, eta0.len(), n_l);
        return Err(SolverError::DimensionMismatch);
    }

    Ok(ProbSize {n_z, n_l, n_x, alpha})
}

pub(crate) fn check_scaling(sz: &ProbSize, scaling: &DVector<f64>) -> Result<(), SolverError>
{
    if scaling.len() != sz.n_z || sz.n_l != sz.n_z || sz.n_x > sz.n_z {
        log::error!("Size mismatch: scaling {}, n_z {}, n_l {}", scaling.len(), sz.n_z, sz.n_l);
        return Err(SolverError::DimensionMismatch);
    }
    if scaling.iter().any(|d| !(d.is_finite() && *d > 0.)) {
        log::error!("Scaling entries must be positive and finite");
        return Err(SolverError::InvalidScaling);
    }
    Ok(())
}

/// Divides the initial state and iterates by the scaling vector.
pub(crate) fn scale_in(
    x0: &DVector<f64>, z0: &DVector<f64>, eta0: &DVector<f64>,
    scaling: Option<&DVector<f64>>) -> (DVector<f64>, DVector<f64>, DVector<f64>)
{
    match scaling {
        None => (x0.clone(), z0.clone(), eta0.clone()),
        Some(d) => {
            let n_x = x0.len();
            let x0 = x0.component_div(&d.rows(0, n_x));
            (x0, z0.component_div(d), eta0.component_div(d))
        },
    }
}

pub(crate) fn scale_out(v: &DVector<f64>, scaling: Option<&DVector<f64>>) -> DVector<f64>
{
    match scaling {
        None => v.clone(),
        Some(d) => v.component_mul(d),
    }
}

pub(crate) fn log_trigger(log_period: usize, i: usize) -> bool
{
    if log_period > 0 {
        i % log_period == 0
    }
    else {
        if i == 0 && log::log_enabled!(log::Level::Debug) {
            log::warn!("log_period == 0: no periodic log");
        }
        false
    }
}
