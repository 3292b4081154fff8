use super::SolverError;

/// Solver parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverParam
{
    /// Max iteration number of the fixed-point algorithm.
    pub max_iter: usize,
    /// Tolerance of the residuals.
    pub eps_acc: f64,
    /// Fraction of `max_iter`; convergence at or beyond this iteration index is reported as excess.
    pub excess_ratio: f64,
    /// Tolerance of small positive value to avoid division by zero.
    pub eps_zero: f64,
    /// Period of iterations to output progress log(for debug/trace level).
    pub log_period: usize,
}

impl Default for SolverParam
{
    fn default() -> Self
    {
        SolverParam {
            max_iter: 10_000,
            eps_acc: 1e-4,
            excess_ratio: 0.9,
            eps_zero: 1e-12,
            log_period: 1_000,
        }
    }
}

impl SolverParam
{
    /// Iteration index from which a termination is reported as [`crate::solver::SolverStatus::ExcessIter`].
    pub fn excess_iter(&self) -> usize
    {
        (self.max_iter as f64 * self.excess_ratio) as usize
    }

    pub(crate) fn check(&self) -> Result<(), SolverError>
    {
        let valid = self.max_iter >= 1
            && self.eps_acc.is_finite() && self.eps_acc >= 0.
            && self.excess_ratio > 0. && self.excess_ratio <= 1.
            && self.eps_zero.is_finite() && self.eps_zero >= 0.;

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

#[test]
fn test_solver_param1()
{
    let par = SolverParam::default();
    assert_eq!(par.excess_iter(), 9_000);
    assert_eq!(par.check(), Ok(()));

    let par = SolverParam {
        max_iter: 0,
        .. SolverParam::default()
    };
    assert_eq!(par.check(), Err(SolverError::InvalidParam));

    let par = SolverParam {
        excess_ratio: 1.5,
        .. SolverParam::default()
    };
    assert_eq!(par.check(), Err(SolverError::InvalidParam));
}
