// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! SWATT (software-based attestation) for the sign channel.
//!
//! A sensor proves that it runs genuine firmware by answering a
//! challenge-bound checksum over its firmware image.  The server computes the
//! same checksum over a reference ("baseline") image and compares.  The
//! calculator sits behind [`ISwattCalculator`] so that a different
//! attestation algorithm can be dropped in without touching the protocol
//! engine.

pub use self::errors::Error;
pub use self::gateway::AttestationGateway;
pub use self::iswattcalculator::ISwattCalculator;
pub use self::swatt::SwattCalculator;

mod errors;
mod gateway;
mod iswattcalculator;
mod swatt;
