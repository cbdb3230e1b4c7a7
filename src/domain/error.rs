//! Domain error types.
//!
//! Data sparsity (short history, missing flow rows, zero denominators) is
//! handled with neutral defaults inside the engine and never surfaces here.
//! These variants cover structural failures only: unreadable inputs,
//! malformed configuration, and stores that cannot be loaded or written.

/// Top-level error type for phasewatch.
#[derive(Debug, thiserror::Error)]
pub enum PhasewatchError {
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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("invalid input for {code}: {reason}")]
    InputValidation { code: String, reason: String },

    #[error("history store error: {reason}")]
    Store { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PhasewatchError> for std::process::ExitCode {
    fn from(err: &PhasewatchError) -> Self {
        let code: u8 = match err {
            PhasewatchError::Io(_) => 1,
            PhasewatchError::ConfigParse { .. }
            | PhasewatchError::ConfigMissing { .. }
            | PhasewatchError::ConfigInvalid { .. } => 2,
            PhasewatchError::Data { .. } => 3,
            PhasewatchError::InputValidation { .. } => 4,
            PhasewatchError::Store { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
