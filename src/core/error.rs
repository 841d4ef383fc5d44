//! Error types for the logger system
//!
//! Logging calls themselves never fail. These errors only come out of
//! construction and management operations (`build`, `flush`, `set_output`,
//! `init`).

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Logger already stopped
    #[error("Logger already stopped")]
    LoggerStopped,

    /// The writer thread has not been started yet
    #[error("Logger writer has not been started")]
    NotStarted,

    /// The process-wide default logger was already installed
    #[error("Default logger already initialized")]
    AlreadyInitialized,

    /// The operating system refused to start the writer thread
    #[error("Failed to spawn log writer thread: {0}")]
    WriterSpawn(#[source] std::io::Error),

    /// Channel send error
    #[error("Failed to send command to log writer")]
    ChannelSendError,
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}
