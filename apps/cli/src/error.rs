use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] stockfolio_core::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("refusing to clear portfolio '{0}' without --yes")]
    ConfirmationRequired(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(e) if e.is_validation() => 2,
            Self::Core(e) if e.is_state_conflict() => 3,
            Self::Config(_) | Self::ConfirmationRequired(_) => 2,
            Self::Core(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
