use dynopt_dynamics::DynamicsError;

/// Errors raised while configuring, initializing or querying a landscape
#[derive(Debug, thiserror::Error)]
pub enum LandscapeError {
    #[error("query point has {got} coordinates, landscape has dimension {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("missing seed data: {0}")]
    MissingSeedData(String),

    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    #[error(transparent)]
    Dynamics(#[from] DynamicsError),

    #[error("shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("json: {0}")]
    Serde(#[from] serde_json::Error),
}
