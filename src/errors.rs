use std::fmt;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// No response was received: connect failure, timeout or a broken body.
    Network(reqwest::Error),
    /// The server answered with a non-2xx status.
    Server {
        status: StatusCode,
        body: String,
        message: String,
    },
    /// The refresh exchange failed (stored credentials have been cleared), or the
    /// session was ended or replaced while it was in flight.
    AuthExpired(String),
    Config(String),
    Storage(String),
}

impl Error {
    /// Builds a server error, pulling a human-readable message out of the body when possible.
    pub fn server(status: StatusCode, body: String) -> Self {
        let message = server_message(status, &body);
        Error::Server {
            status,
            body,
            message,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Server { status, .. } => Some(*status),
            Error::Network(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Server { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Error::AuthExpired(_))
    }
}

// structured `message`, then `error`, then a generic line built from the status
fn server_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"].iter().find_map(|field| {
                value
                    .get(*field)
                    .and_then(|m| m.as_str())
                    .filter(|m| !m.trim().is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| format!("Server error: {}", status.as_u16()))
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {err}"),
            Error::Json(err) => write!(f, "json error: {err}"),
            Error::Network(err) if err.is_timeout() => write!(f, "network timeout: {err}"),
            Error::Network(err) => write!(f, "network error: {err}"),
            Error::Server { message, .. } => f.write_str(message),
            Error::AuthExpired(reason) => write!(f, "session expired: {reason}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Network(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err)
    }
}
