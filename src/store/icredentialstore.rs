// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;

/// Interface to the store where operator credentials are stashed.
pub trait ICredentialStore {
    /// Add an operator.  Returns `false` without writing anything if the
    /// username is already taken.
    fn add_user(&self, user: &str, salt: &str, password: &str) -> Result<bool, Error>;

    /// Check the password of a known operator against its salted hash
    fn authorize_user(&self, user: &str, password: &str) -> Result<bool, Error>;

    /// Existence check only
    fn check_user(&self, user: &str) -> Result<bool, Error>;
}
