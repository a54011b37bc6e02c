// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! The firmware-sign protocol.
//!
//! Messages are tagged by a short action token (`act`).  Two independent
//! state machines consume them:
//!
//! * [`SignEngine`] drives the administrative channel: connect, two-step
//!   login, SWATT challenge, signature verification and counter-signing.
//! * [`RegistrationEngine`] drives the registration channel, where a sensor
//!   proves that a signed firmware record exists for it.
//!
//! Protocol-level rejections (bad password, nonce mismatch, bad signature,
//! attestation mismatch) are never errors: they are answered with a negative
//! `HB` acknowledgement and the session carries on.  Unknown actions are
//! silently ignored.

pub use self::codec::{ICodec, JsonCodec};
pub use self::engine::{Policy, SignEngine};
pub use self::errors::Error;
pub use self::handler::{IProtocolHandler, Outcome};
pub use self::message::{AckState, Action, Registration, Reply, Request, SignResponse};
pub use self::registration::{RegistrationEngine, RegistrationSession};
pub use self::session::{Session, SessionState};

mod codec;
mod engine;
mod errors;
mod handler;
mod message;
mod registration;
mod session;
