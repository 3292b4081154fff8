/// Solver errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverError
{
    /// Length of an input vector is inconsistent with the problem.
    DimensionMismatch,
    /// Invalid scaling vector.
    InvalidScaling,
    /// Invalid solver parameter.
    InvalidParam,

    /// Invalid [`crate::solver::Operator`] or [`crate::solver::Proximal`].
    InvalidOp,
    /// Failure caused by [`crate::solver::ConvexSet`].
    SetFailure,
}

impl core::fmt::Display for SolverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            SolverError::DimensionMismatch => "DimensionMismatch: inconsistent vector length",
            SolverError::InvalidScaling    => "InvalidScaling: invalid scaling vector",
            SolverError::InvalidParam      => "InvalidParam: invalid solver parameter",
            SolverError::InvalidOp         => "InvalidOp: invalid Operator or Proximal",
            SolverError::SetFailure        => "SetFailure: failure caused by ConvexSet",
        })
    }
}

impl std::error::Error for SolverError {}

//

/// Set projection errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetError
{
    /// Length of a vector differs from the set dimension.
    DimensionMismatch,
    /// Dimension of a member set is needed but not fixed yet.
    UnknownDimension,
    /// Number of blocks differs from the number of member sets.
    BlockCountMismatch,
}

impl core::fmt::Display for SetError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            SetError::DimensionMismatch  => "DimensionMismatch: vector length differs from set dimension",
            SetError::UnknownDimension   => "UnknownDimension: set dimension is not fixed",
            SetError::BlockCountMismatch => "BlockCountMismatch: number of blocks differs from number of sets",
        })
    }
}

impl std::error::Error for SetError {}

impl From<SetError> for SolverError
{
    fn from(_: SetError) -> Self
    {
        SolverError::SetFailure
    }
}
