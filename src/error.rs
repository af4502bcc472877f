//! Error type shared by the planners and the allow-list parser.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetError {
    /// Malformed or out-of-range network block, or inconsistent counts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl NetError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        NetError::InvalidArgument(msg.into())
    }
}
