// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Cannot read {0}")]
    Io(String),
    #[error("Bad PEM material: {0}")]
    Pem(String),
    #[error("Signing failed: {0}")]
    Sign(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) | Error::Pem(e) | Error::Sign(e) => {
                write!(f, "{}", e)
            }
        }
    }
}
