// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::ISwattCalculator;

/// Binds a SWATT calculator to the attestation parameters of this server:
/// challenge length, iteration count and the baseline firmware image.
#[derive(Debug)]
pub struct AttestationGateway<C: ISwattCalculator> {
    calc: C,
    challenge_len: usize,
    iterations: u32,
    baseline: Vec<u8>,
}

impl<C: ISwattCalculator> AttestationGateway<C> {
    pub fn new(calc: C, challenge_len: usize, iterations: u32, baseline: Vec<u8>) -> Self {
        Self {
            calc,
            challenge_len,
            iterations,
            baseline,
        }
    }

    /// A fresh challenge for a newly logged-in session
    pub fn issue_challenge(&self) -> Result<String, Error> {
        self.calc.random_challenge(self.challenge_len)
    }

    /// The response a genuine `sensor_id` would give to `challenge`
    pub fn expected_response(&mut self, sensor_id: i64, challenge: &str) -> Result<String, Error> {
        self.calc.set_target(sensor_id);
        self.calc
            .expected_response(challenge, self.iterations, &self.baseline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attest::SwattCalculator;

    #[test]
    fn challenge_has_configured_length() {
        let g = AttestationGateway::new(SwattCalculator::new(), 10, 300, b"fw".to_vec());

        assert_eq!(g.issue_challenge().unwrap().len(), 10);
    }

    #[test]
    fn expected_response_binds_target() {
        let mut g = AttestationGateway::new(SwattCalculator::new(), 10, 300, b"fw".to_vec());

        let mut c = SwattCalculator::new();
        c.set_target(5);
        let want = c.expected_response("challenge", 300, b"fw").unwrap();

        assert_eq!(g.expected_response(5, "challenge").unwrap(), want);
        assert_ne!(g.expected_response(6, "challenge").unwrap(), want);
    }
}
