//! Client error type.
//!
//! Errors are passed through to the caller as-is; the client never retries
//! or reclassifies them.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ClientError {
    /// Base URL could not be parsed or joined with an identifier.
    InvalidUrl(String),
    /// Connection, TLS or body decoding failure.
    Transport(reqwest::Error),
    /// Server answered with a non-success status.
    Server { status: u16, message: String },
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl(detail) => write!(f, "invalid API url: {detail}"),
            Self::Transport(err) => write!(f, "request failed: {err}"),
            Self::Server { status, message } => write!(f, "server returned {status}: {message}"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
