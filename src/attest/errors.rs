// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Random generation failed: {0}")]
    Random(String),
    #[error("Bad baseline firmware: {0}")]
    Baseline(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Random(e) | Error::Baseline(e) => {
                write!(f, "{}", e)
            }
        }
    }
}
