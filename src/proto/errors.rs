// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Random generation failed: {0}")]
    Random(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax(e) | Error::Encode(e) | Error::Io(e) | Error::Random(e) => {
                write!(f, "{}", e)
            }
        }
    }
}
