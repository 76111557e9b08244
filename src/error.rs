//! Unified error type.

use std::fmt;

/// The error type returned by strata's fallible operations.
///
/// Application-level failures are [`Response`](crate::Response) values, and
/// panics inside [`recover`](crate::middleware::recover) become `500`s. This
/// type only surfaces infrastructure failures: binding a listener or reading
/// its local address.
///
/// An `Error` is also a valid panic payload: a handler that panics with one
/// under `recover` gets its `Display` as the response body.
#[derive(Debug)]
pub struct Error(std::io::Error);

impl Error {
    /// The underlying I/O error kind.
    pub fn kind(&self) -> std::io::ErrorKind {
        self.0.kind()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "io: {}", self.0)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(e)
    }
}
