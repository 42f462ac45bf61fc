use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Library or catalog could not be loaded; already user-facing
    #[error("{0}")]
    Load(String),

    /// Report could not be written
    #[error("Report error: {0}")]
    Report(#[from] portmatch_report::ReportError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),
}

impl CliError {
    pub(crate) fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub(crate) fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}
