// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Firmware sign authorization server.
//!
//! An administrative operator logs in with a two-step challenge-response,
//! receives a SWATT challenge, and submits signed metadata about a firmware
//! version together with the SWATT response its sensor produced.  If the
//! signature verifies and the SWATT response matches the one computed over
//! the reference firmware, the server counter-signs and stores a firmware
//! sign record.  On a second channel, sensors register by presenting that
//! counter-signature.
//!
//! The crate is organised as:
//! * [`store`]: operator credentials and firmware sign records (SQLite)
//! * [`crypto`]: signature verification and counter-signing
//! * [`attest`]: SWATT challenge and expected-response computation
//! * [`proto`]: wire messages, codec and the per-channel state machines
//! * [`net`]: transports and accept loops
//! * [`server`]: wiring of all the above from a [`config::Config`]

pub mod attest;
pub mod config;
pub mod crypto;
pub mod net;
pub mod proto;
pub mod server;
pub mod store;
