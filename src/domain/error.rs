//! Domain error types.

/// Top-level error type for payoffkit.
#[derive(Debug, thiserror::Error)]
pub enum PayoffError {
    #[error("price {price} is outside the curve domain [{low}, {high}]")]
    OutOfDomain { price: f64, low: f64, high: f64 },

    #[error(
        "curve domains differ: [{}, {}] vs [{}, {}]",
        .left.0, .left.1, .right.0, .right.1
    )]
    DomainMismatch { left: (f64, f64), right: (f64, f64) },

    #[error("missing parameter: {name}")]
    MissingParameter { name: String },

    #[error("invalid breakpoints: {reason}")]
    InvalidBreakpoints { reason: String },

    #[error("invalid contract: {reason}")]
    InvalidContract { reason: String },

    #[error("invalid strategy: {reason}")]
    InvalidStrategy { reason: String },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("solver failed: {reason}")]
    Solver { reason: String },

    #[error("statistics error: {reason}")]
    Statistics { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PayoffError {
    pub(crate) fn missing(name: &str) -> Self {
        PayoffError::MissingParameter {
            name: name.to_string(),
        }
    }
}

impl From<&PayoffError> for std::process::ExitCode {
    fn from(err: &PayoffError) -> Self {
        let code: u8 = match err {
            PayoffError::Io(_) | PayoffError::Csv(_) => 1,
            PayoffError::ConfigParse { .. }
            | PayoffError::ConfigMissing { .. }
            | PayoffError::ConfigInvalid { .. } => 2,
            PayoffError::OutOfDomain { .. }
            | PayoffError::DomainMismatch { .. }
            | PayoffError::InvalidBreakpoints { .. } => 3,
            PayoffError::MissingParameter { .. }
            | PayoffError::InvalidContract { .. }
            | PayoffError::InvalidStrategy { .. } => 4,
            PayoffError::InvalidInput { .. }
            | PayoffError::Solver { .. }
            | PayoffError::Statistics { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
