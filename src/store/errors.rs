// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Random generation failed: {0}")]
    Random(String),
    #[error("Lock poisoned: {0}")]
    Poisoned(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax(e) | Error::Database(e) | Error::Random(e) | Error::Poisoned(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Database(e.to_string())
    }
}
