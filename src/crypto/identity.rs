// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use openssl::error::ErrorStack;
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::sign::{Signer, Verifier};
use openssl::x509::X509;
use std::fs;
use std::path::{Path, PathBuf};

/// The server's signing certificate and private key, loaded once at startup
/// and read-only thereafter.
pub struct ServerIdentity {
    /// Verifies inbound client signatures
    pub cert: X509,
    pub cert_path: PathBuf,
    /// Counter-signs accepted records
    pub key: PKey<Private>,
    /// Also the file served on a certificate-fetch request
    pub key_path: PathBuf,
}

impl ServerIdentity {
    /// Load certificate and private key.  Any failure here is a fatal
    /// configuration error.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(cert_path: P, key_path: Q) -> Result<Self, Error> {
        let cert = load_certificate(&cert_path)?;
        let key = load_private_key(&key_path)?;

        tracing::info!(
            cert = %cert_path.as_ref().display(),
            key = %key_path.as_ref().display(),
            "loaded sign identity"
        );

        Ok(Self {
            cert,
            cert_path: cert_path.as_ref().to_path_buf(),
            key,
            key_path: key_path.as_ref().to_path_buf(),
        })
    }

    /// Check a client signature over `msg` with the loaded certificate
    pub fn verify(&self, sig: &[u8], msg: &[u8]) -> bool {
        verify(&self.cert, sig, msg)
    }

    /// Counter-sign `msg` with the loaded private key
    pub fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, Error> {
        sign(&self.key, msg)
    }
}

/// Read a PEM encoded X.509 certificate
pub fn load_certificate<P: AsRef<Path>>(path: P) -> Result<X509, Error> {
    let buf = read(path.as_ref())?;

    X509::from_pem(&buf)
        .map_err(|e| Error::Pem(format!("certificate {}: {e}", path.as_ref().display())))
}

/// Read a PEM encoded private key
pub fn load_private_key<P: AsRef<Path>>(path: P) -> Result<PKey<Private>, Error> {
    let buf = read(path.as_ref())?;

    PKey::private_key_from_pem(&buf)
        .map_err(|e| Error::Pem(format!("private key {}: {e}", path.as_ref().display())))
}

/// Returns true iff `sig` is a valid SHA-256 signature of `msg` under the
/// public key of `cert`.  Malformed signatures are a mismatch, not an error.
pub fn verify(cert: &X509, sig: &[u8], msg: &[u8]) -> bool {
    let check = || -> Result<bool, ErrorStack> {
        let pkey = cert.public_key()?;
        let mut v = Verifier::new(MessageDigest::sha256(), &pkey)?;
        v.update(msg)?;
        v.verify(sig)
    };

    match check() {
        Ok(ok) => ok,
        Err(e) => {
            tracing::debug!(error = %e, "signature verification error");
            false
        }
    }
}

/// SHA-256 signature of `msg` with `key`
pub fn sign(key: &PKey<Private>, msg: &[u8]) -> Result<Vec<u8>, Error> {
    let mut s = Signer::new(MessageDigest::sha256(), key).map_err(|e| Error::Sign(e.to_string()))?;
    s.update(msg).map_err(|e| Error::Sign(e.to_string()))?;
    s.sign_to_vec().map_err(|e| Error::Sign(e.to_string()))
}

fn read(path: &Path) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))
}
