use nalgebra::DVector;

/// Termination status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus
{
    /// Residuals fell below the tolerance in time.
    Converged,
    /// Iteration budget ran out, or convergence came too late.
    ExcessIter,
}

impl core::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            SolverStatus::Converged  => "Converged: residuals within tolerance",
            SolverStatus::ExcessIter => "ExcessIter: exceed max iterations",
        })
    }
}

//

/// Residuals of one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual
{
    /// Primal residual.
    pub primal: f64,
    /// Dual residual.
    pub dual: f64,
    /// Duality gap residual. `None` for ADMM.
    pub gap: Option<f64>,
}

impl Residual
{
    /// Largest of the residuals.
    pub fn max(&self) -> f64
    {
        let m = self.primal.max(self.dual);
        match self.gap {
            Some(g) => m.max(g),
            None => m,
        }
    }
}

//

/// Result of a solve.
#[derive(Debug, Clone)]
pub struct Solution
{
    z: DVector<f64>,
    eta: DVector<f64>,
    status: SolverStatus,
    residuals: Vec<Residual>,
}

impl Solution
{
    pub(crate) fn new(z: DVector<f64>, eta: DVector<f64>, status: SolverStatus, residuals: Vec<Residual>) -> Self
    {
        Solution {
            z, eta, status, residuals
        }
    }

    /// Final primal iterate \\(z\\).
    pub fn z(&self) -> &DVector<f64>
    {
        &self.z
    }

    /// Final dual iterate \\(\eta\\).
    pub fn eta(&self) -> &DVector<f64>
    {
        &self.eta
    }

    pub fn status(&self) -> SolverStatus
    {
        self.status
    }

    /// Number of executed iterations.
    pub fn iter(&self) -> usize
    {
        self.residuals.len()
    }

    /// Residual history, one entry per executed iteration.
    pub fn residuals(&self) -> &[Residual]
    {
        &self.residuals
    }

    /// Consumes the solution into its primal and dual iterates.
    pub fn into_parts(self) -> (DVector<f64>, DVector<f64>)
    {
        (self.z, self.eta)
    }
}

//

#[test]
fn test_residual1()
{
    let r = Residual {primal: 1., dual: 3., gap: Some(2.)};
    assert_eq!(r.max(), 3.);

    let r = Residual {primal: 1., dual: 0.5, gap: None};
    assert_eq!(r.max(), 1.);
}
