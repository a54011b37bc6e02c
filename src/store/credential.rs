// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use openssl::sha::Sha256;

/// Length in bytes of a freshly generated salt
pub const SALT_LEN: usize = 16;

/// An administrative operator allowed to log into the sign channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorCredential {
    /// Unique username (primary key)
    pub user: String,
    /// Random salt, hex encoded
    pub salt: String,
    /// SHA-256(salt-bytes || password-bytes), hex encoded
    pub pwd_hash: String,
}

impl OperatorCredential {
    /// Build a credential by hashing `password` with the hex-encoded `salt`
    pub fn new(user: &str, salt: &str, password: &str) -> Result<Self, Error> {
        Ok(Self {
            user: user.to_string(),
            salt: salt.to_string(),
            pwd_hash: hash_password(salt, password)?,
        })
    }

    /// Returns true if `password` hashes to the stored value
    pub fn matches(&self, password: &str) -> bool {
        match hash_password(&self.salt, password) {
            Ok(h) => h == self.pwd_hash,
            Err(_) => false,
        }
    }
}

/// hex(SHA-256(salt || password)) where `salt` is given in hex
pub fn hash_password(salt: &str, password: &str) -> Result<String, Error> {
    let salt = hex::decode(salt).map_err(|e| Error::Syntax(format!("salt: {e}")))?;

    let mut h = Sha256::new();
    h.update(&salt);
    h.update(password.as_bytes());

    Ok(hex::encode(h.finish()))
}

/// A fresh random salt, hex encoded
pub fn random_salt() -> Result<String, Error> {
    let mut buf = [0u8; SALT_LEN];
    openssl::rand::rand_bytes(&mut buf).map_err(|e| Error::Random(e.to_string()))?;
    Ok(hex::encode(buf))
}
