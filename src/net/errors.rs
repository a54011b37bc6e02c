// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("TLS error: {0}")]
    Tls(String),
    #[error("Protocol error: {0}")]
    Proto(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) | Error::Tls(e) | Error::Proto(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<crate::proto::Error> for Error {
    fn from(e: crate::proto::Error) -> Self {
        Error::Proto(e.to_string())
    }
}
