// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Wiring of the two listeners around a shared store.

use crate::attest::{AttestationGateway, SwattCalculator};
use crate::config::Config;
use crate::crypto::ServerIdentity;
use crate::net::{self, Listener, TcpPlainListener, TlsListener};
use crate::proto::{JsonCodec, Policy, RegistrationEngine, SignEngine};
use crate::store::SqliteStore;
use crate::{config, crypto, store};
use std::fs;
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("configuration: {0}")]
    Config(#[from] config::Error),
    #[error("sign identity: {0}")]
    Crypto(#[from] crypto::Error),
    #[error("store: {0}")]
    Store(#[from] store::Error),
    #[error("listener: {0}")]
    Net(#[from] net::Error),
    #[error("baseline firmware: {0}")]
    Baseline(String),
}

/// Open (creating and seeding it if needed) the store named in `cfg`.  The
/// calling thread becomes the store's owner.
pub fn open_store(cfg: &Config) -> Result<SqliteStore, Error> {
    if let Some(dir) = cfg.database.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| {
            store::Error::Database(format!("cannot create {}: {e}", dir.display()))
        })?;
    }

    let s = SqliteStore::open(
        &cfg.database,
        &cfg.default_operator.user,
        &cfg.default_operator.password,
    )?;

    tracing::info!(path = %s.path().display(), "store opened");

    Ok(s)
}

fn bind(cfg: &Config) -> Result<(Listener, Listener), Error> {
    let l = match &cfg.tls {
        Some(t) => (
            Listener::Tls(TlsListener::bind(
                &cfg.admin_addr,
                &t.certificate,
                &t.private_key,
            )?),
            Listener::Tls(TlsListener::bind(
                &cfg.registration_addr,
                &t.certificate,
                &t.private_key,
            )?),
        ),
        None => {
            tracing::warn!("no TLS identity configured, serving plain TCP");
            (
                Listener::Plain(TcpPlainListener::bind(&cfg.admin_addr)?),
                Listener::Plain(TcpPlainListener::bind(&cfg.registration_addr)?),
            )
        }
    };

    Ok(l)
}

/// Load all static material, then run the registration listener on its own
/// thread and the administrative listener on the calling thread.  Returns
/// only if startup fails.
pub fn run(cfg: &Config) -> Result<(), Error> {
    let identity = ServerIdentity::load(&cfg.certificate, &cfg.private_key)?;

    let baseline = fs::read(&cfg.baseline_firmware)
        .map_err(|e| Error::Baseline(format!("{}: {e}", cfg.baseline_firmware.display())))?;

    let store = Arc::new(open_store(cfg)?);
    let (admin, registration) = bind(cfg)?;

    let gateway = AttestationGateway::new(
        SwattCalculator::new(),
        cfg.challenge_length,
        cfg.swatt_iterations,
        baseline,
    );
    let policy = Policy {
        cert_fetch_requires_login: cfg.cert_fetch_requires_login,
    };
    let engine = SignEngine::new(Arc::clone(&store), identity, gateway, policy);

    net::spawn("registration", registration, JsonCodec, RegistrationEngine::new(store))?;

    net::serve_forever("admin", admin, JsonCodec, engine)
}
