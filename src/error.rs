use std::io;
use std::time::Duration;
use thiserror::Error;

/// Everything that can abort a remote command session.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Connection to {addr} timed out after {}s", .timeout.as_secs_f64())]
    ConnectTimeout { addr: String, timeout: Duration },

    #[error("Timed out waiting for {prompt:?} prompt")]
    AuthPromptTimeout { prompt: String },

    #[error("Authentication failed for user {user}")]
    AuthenticationFailure { user: String },

    #[error("Connection closed by remote host")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<ssh2::Error> for RunError {
    fn from(err: ssh2::Error) -> Self {
        RunError::Io(err.into())
    }
}

pub type Result<T> = std::result::Result<T, RunError>;
