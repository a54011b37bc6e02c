// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Static server configuration, read once at startup.
//!
//! The configuration is a JSON object; every member is optional and falls
//! back to the defaults below.
//!
//! ```json
//! {
//!     "admin-addr": "0.0.0.0:5005",
//!     "registration-addr": "0.0.0.0:5006",
//!     "certificate": "firmwSign/cert.pem",
//!     "private-key": "firmwSign/private.pem",
//!     "database": "firmwSign/firmwareSign.db",
//!     "tls": {
//!         "certificate": "firmwSign/tls-cert.pem",
//!         "private-key": "firmwSign/tls-key.pem"
//!     },
//!     "swatt-iterations": 300,
//!     "baseline-firmware": "firmwSign/firmware.bin",
//!     "challenge-length": 10,
//!     "default-operator": { "user": "admin", "password": "123" },
//!     "cert-fetch-requires-login": false
//! }
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Cannot read {0}")]
    Io(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax(e) | Error::Io(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Listen address of the administrative (sign) channel
    pub admin_addr: String,

    /// Listen address of the sensor registration channel
    pub registration_addr: String,

    /// PEM certificate that verifies operator signatures
    pub certificate: PathBuf,

    /// PEM private key used for counter-signatures
    pub private_key: PathBuf,

    /// SQLite database file
    pub database: PathBuf,

    /// Transport identity.  Without it both channels run over plain TCP.
    pub tls: Option<TlsConfig>,

    pub swatt_iterations: u32,

    /// Reference firmware image the SWATT responses are computed over
    pub baseline_firmware: PathBuf,

    pub challenge_length: usize,

    /// Operator seeded into a newly created database
    pub default_operator: DefaultOperator,

    pub cert_fetch_requires_login: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TlsConfig {
    pub certificate: PathBuf,
    pub private_key: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultOperator {
    pub user: String,
    pub password: String,
}

impl Default for DefaultOperator {
    fn default() -> Self {
        Self {
            user: "admin".to_string(),
            password: "123".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admin_addr: "0.0.0.0:5005".to_string(),
            registration_addr: "0.0.0.0:5006".to_string(),
            certificate: "firmwSign/cert.pem".into(),
            private_key: "firmwSign/private.pem".into(),
            database: "firmwSign/firmwareSign.db".into(),
            tls: None,
            swatt_iterations: 300,
            baseline_firmware: "firmwSign/firmware.bin".into(),
            challenge_length: 10,
            default_operator: Default::default(),
            cert_fetch_requires_login: false,
        }
    }
}

impl Config {
    /// Parse a configuration from its JSON text
    pub fn load_json(j: &str) -> Result<Self, Error> {
        serde_json::from_str(j).map_err(|e| Error::Syntax(e.to_string()))
    }

    /// Read and parse the configuration file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let j = fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Io(format!("{}: {e}", path.as_ref().display())))?;

        Self::load_json(&j)
    }
}
