// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::handler::{IProtocolHandler, Outcome};
use super::message::{AckState, Action, Reply, Request, SignResponse};
use super::session::{Session, SessionState};
use crate::attest::{AttestationGateway, ISwattCalculator};
use crate::crypto::ServerIdentity;
use crate::store::{FirmwareSignRecord, ICredentialStore, IRecordStore};
use std::fs;
use std::sync::Arc;

/// Length in bytes of the login nonce
pub const NONCE_LEN: usize = 4;

/// Knobs that deliberately loosen or tighten the protocol
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Policy {
    /// Refuse certificate-fetch until the session has completed both login
    /// steps.  Off by default: any peer may fetch.
    pub cert_fetch_requires_login: bool,
}

/// State machine of the administrative (sign) channel
pub struct SignEngine<S, C>
where
    S: ICredentialStore + IRecordStore,
    C: ISwattCalculator,
{
    store: Arc<S>,
    identity: ServerIdentity,
    gateway: AttestationGateway<C>,
    policy: Policy,
}

impl<S, C> SignEngine<S, C>
where
    S: ICredentialStore + IRecordStore,
    C: ISwattCalculator,
{
    pub fn new(
        store: Arc<S>,
        identity: ServerIdentity,
        gateway: AttestationGateway<C>,
        policy: Policy,
    ) -> Self {
        Self {
            store,
            identity,
            gateway,
            policy,
        }
    }

    fn handle_connect(&mut self, session: &mut Session) -> Result<Outcome, Error> {
        session.state = SessionState::Connected;
        Ok(Outcome::reply(Reply::ack(Action::Connect, true)))
    }

    fn handle_login(
        &mut self,
        session: &mut Session,
        user: String,
        random1: String,
    ) -> Result<Outcome, Error> {
        let known = self.store.check_user(&user).unwrap_or_else(|e| {
            tracing::warn!(user = %user, error = %e, "user lookup failed");
            false
        });

        if !known {
            tracing::info!(user = %user, "login 1: unknown user");
            session.user = None;
            session.state = SessionState::Connected;
            return Ok(Outcome::reply(Reply::ack(Action::Login1, false)));
        }

        let mut nonce = vec![0u8; NONCE_LEN];
        openssl::rand::rand_bytes(&mut nonce).map_err(|e| Error::Random(e.to_string()))?;

        tracing::info!(user = %user, "login 1: nonce issued");

        session.user = Some(user);
        session.nonce = Some(nonce.clone());
        session.state = SessionState::LoginNonceIssued;

        Ok(Outcome::reply(Reply::LoginNonce {
            random1,
            random2: nonce,
        }))
    }

    fn handle_authorize(
        &mut self,
        session: &mut Session,
        random2: String,
        password: String,
    ) -> Result<Outcome, Error> {
        let echoed = hex::decode(random2).ok();
        let nonce_ok = session.nonce.is_some() && echoed == session.nonce;

        let ok = nonce_ok
            && match &session.user {
                Some(u) => self.store.authorize_user(u, &password).unwrap_or_else(|e| {
                    tracing::warn!(user = %u, error = %e, "password check failed");
                    false
                }),
                None => false,
            };

        // the pending user is kept on failure, so the operator may retry
        // against the same nonce
        if !ok {
            tracing::info!(user = ?session.user, nonce_ok, "login 2: rejected");
            return Ok(Outcome::reply(Reply::ack(Action::Login2, false)));
        }

        let challenge = match self.gateway.issue_challenge() {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "cannot issue SWATT challenge");
                return Ok(Outcome::reply(Reply::ack(Action::Login2, false)));
            }
        };

        tracing::info!(user = ?session.user, "login 2: challenge issued");

        session.challenge = Some(challenge.clone());
        session.state = SessionState::ChallengeIssued;

        Ok(Outcome::reply(Reply::Challenge { challenge }))
    }

    fn handle_cert_fetch(&mut self, session: &mut Session) -> Result<Outcome, Error> {
        if self.policy.cert_fetch_requires_login && !session.logged_in() {
            tracing::info!("certificate fetch refused before login");
            return Ok(Outcome::reply(Reply::ack(Action::CertFetch, false)));
        }

        let path = &self.identity.key_path;
        let data = fs::read(path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), len = data.len(), "sending certificate file");

        Ok(Outcome::reply(Reply::File { data }))
    }

    fn handle_sign_response(
        &mut self,
        session: &mut Session,
        sr: SignResponse,
    ) -> Result<Outcome, Error> {
        let reject = || -> Result<Outcome, Error> {
            Ok(Outcome::reply(Reply::ack(Action::SignResponse, false)))
        };

        if session.state != SessionState::ChallengeIssued {
            tracing::warn!(state = ?session.state, "sign response before login");
            return reject();
        }

        let sig = match hex::decode(&sr.signature) {
            Ok(s) => s,
            Err(e) => {
                tracing::info!(error = %e, "sign verify: malformed signature");
                return reject();
            }
        };

        if !self.identity.verify(&sig, sr.signed_message().as_bytes()) {
            tracing::info!(id = sr.id, "sign verify: signature does not match the data");
            return reject();
        }

        let challenge = session.challenge.clone().unwrap_or_default();

        let expected = match self.gateway.expected_response(sr.sid, &challenge) {
            Ok(e) => e,
            Err(e) => {
                tracing::error!(error = %e, "cannot compute SWATT response");
                return reject();
            }
        };
        session.expected = Some(expected.clone());

        if sr.swatt != expected {
            tracing::info!(id = sr.id, sid = sr.sid, "sign verify: SWATT mismatch");
            return reject();
        }

        let mut rcd = FirmwareSignRecord {
            id: None,
            sensor_id: sr.id,
            signer_id: sr.sid,
            challenge,
            swatt: sr.swatt,
            date: sr.date,
            sensor_type: sr.sensor_type,
            version: sr.version,
            cert_path: self.identity.cert_path.display().to_string(),
            signature_client: sr.signature,
            signature_server: String::new(),
        };

        let counter = match self.identity.sign(rcd.canonical_string().as_bytes()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "cannot counter-sign record");
                return reject();
            }
        };
        rcd.signature_server = hex::encode(&counter);

        match self.store.create_firmware_record(&rcd) {
            Ok(id) => {
                tracing::info!(id, sensor_id = rcd.sensor_id, "firmware signed");
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot store firmware sign record");
                return reject();
            }
        }

        Ok(Outcome::reply(Reply::Ack {
            acked: Action::SignResponse,
            state: AckState::Signature(counter),
        }))
    }
}

impl<S, C> IProtocolHandler for SignEngine<S, C>
where
    S: ICredentialStore + IRecordStore,
    C: ISwattCalculator,
{
    type Session = Session;

    fn handle(&mut self, session: &mut Session, req: Request) -> Result<Outcome, Error> {
        match req {
            Request::Connect => self.handle_connect(session),
            Request::Login { user, random1 } => self.handle_login(session, user, random1),
            Request::Authorize { random2, password } => {
                self.handle_authorize(session, random2, password)
            }
            Request::CertFetch => self.handle_cert_fetch(session),
            Request::SignResponse(sr) => self.handle_sign_response(session, sr),
            Request::Logout => {
                tracing::info!(user = ?session.user, "logout");
                session.reset();
                Ok(Outcome::close())
            }
            Request::Register(_) | Request::Unknown => Ok(Outcome::silent()),
        }
    }
}
