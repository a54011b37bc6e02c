// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;

/// Interface to a SWATT calculator.
pub trait ISwattCalculator {
    /// A fresh challenge string of `len` characters
    fn random_challenge(&self, len: usize) -> Result<String, Error>;

    /// Bind subsequent computations to the sensor identified by `sensor_id`
    fn set_target(&mut self, sensor_id: i64);

    /// The response a genuine sensor running `baseline` would produce for
    /// `challenge`.  Deterministic in all its inputs and the current target.
    fn expected_response(
        &self,
        challenge: &str,
        iterations: u32,
        baseline: &[u8],
    ) -> Result<String, Error>;
}
