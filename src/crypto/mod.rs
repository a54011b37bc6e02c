// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Signature verification of operator-submitted firmware metadata and
//! counter-signing of accepted records.
//!
//! All digests are SHA-256.  With an RSA key the padding is PKCS#1 v1.5, so a
//! counter-signature is a deterministic function of the record.

pub use self::errors::Error;
pub use self::identity::ServerIdentity;
pub use self::identity::{load_certificate, load_private_key, sign, verify};

mod errors;
mod identity;

#[cfg(test)]
pub(crate) mod testutil;
