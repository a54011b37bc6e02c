// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::ISwattCalculator;
use openssl::sha::{sha256, Sha256};

const CHALLENGE_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// largest multiple of the alphabet size that fits in a byte
const REJECT_ABOVE: u8 = (256 / CHALLENGE_ALPHABET.len() * CHALLENGE_ALPHABET.len() - 1) as u8;

const CHECKSUM_LEN: usize = 8;

/// Reference SWATT calculator.
///
/// The checksum walks the firmware image at pseudo-random addresses derived
/// from the challenge and a per-sensor secret, folding each visited byte into
/// an 8-byte running checksum.  The per-sensor secret stands in for the PUF
/// response of the target device.
#[derive(Debug)]
pub struct SwattCalculator {
    puf: [u8; 32],
}

impl Default for SwattCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl SwattCalculator {
    pub fn new() -> Self {
        Self {
            puf: sha256(b"0"),
        }
    }
}

impl ISwattCalculator for SwattCalculator {
    fn random_challenge(&self, len: usize) -> Result<String, Error> {
        let mut out = String::with_capacity(len);
        let mut buf = [0u8; 32];

        while out.len() < len {
            openssl::rand::rand_bytes(&mut buf).map_err(|e| Error::Random(e.to_string()))?;

            for b in buf.iter().filter(|b| **b <= REJECT_ABOVE) {
                if out.len() == len {
                    break;
                }
                out.push(CHALLENGE_ALPHABET[*b as usize % CHALLENGE_ALPHABET.len()] as char);
            }
        }

        Ok(out)
    }

    fn set_target(&mut self, sensor_id: i64) {
        self.puf = sha256(sensor_id.to_string().as_bytes());
    }

    fn expected_response(
        &self,
        challenge: &str,
        iterations: u32,
        baseline: &[u8],
    ) -> Result<String, Error> {
        if baseline.is_empty() {
            return Err(Error::Baseline("empty firmware image".to_string()));
        }

        let mut h = Sha256::new();
        h.update(challenge.as_bytes());
        h.update(&self.puf);
        let mut state = h.finish();

        let mut checksum = [0u8; CHECKSUM_LEN];
        checksum.copy_from_slice(&state[..CHECKSUM_LEN]);

        for i in 0..iterations {
            let mut h = Sha256::new();
            h.update(&state);
            h.update(&i.to_be_bytes());
            state = h.finish();

            let addr = u32::from_be_bytes([state[0], state[1], state[2], state[3]]) as usize
                % baseline.len();

            let j = i as usize % CHECKSUM_LEN;
            let prev = checksum[(j + CHECKSUM_LEN - 2) % CHECKSUM_LEN];
            checksum[j] = checksum[j]
                .wrapping_add(baseline[addr] ^ prev)
                .wrapping_add(state[4])
                .rotate_left(1);
        }

        Ok(hex::encode(checksum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FW: &[u8] = b"\x00\x01\x02\x03firmware image bytes for the reference sensor";

    #[test]
    fn challenge_length_and_alphabet() {
        let c = SwattCalculator::new();

        for len in [0, 1, 10, 100] {
            let s = c.random_challenge(len).unwrap();
            assert_eq!(s.len(), len);
            assert!(s.bytes().all(|b| CHALLENGE_ALPHABET.contains(&b)));
        }

        assert_ne!(c.random_challenge(10).unwrap(), c.random_challenge(10).unwrap());
    }

    #[test]
    fn response_is_deterministic() {
        let mut a = SwattCalculator::new();
        let mut b = SwattCalculator::new();
        a.set_target(42);
        b.set_target(42);

        let ra = a.expected_response("Ab3dEf9hIj", 300, FW).unwrap();
        let rb = b.expected_response("Ab3dEf9hIj", 300, FW).unwrap();

        assert_eq!(ra, rb);
        assert_eq!(ra.len(), 2 * CHECKSUM_LEN);
    }

    #[test]
    fn response_depends_on_every_input() {
        let mut c = SwattCalculator::new();
        c.set_target(42);
        let base = c.expected_response("Ab3dEf9hIj", 300, FW).unwrap();

        assert_ne!(base, c.expected_response("Ab3dEf9hIk", 300, FW).unwrap());
        assert_ne!(base, c.expected_response("Ab3dEf9hIj", 301, FW).unwrap());
        assert_ne!(
            base,
            c.expected_response("Ab3dEf9hIj", 300, b"another firmware image")
                .unwrap()
        );

        c.set_target(43);
        assert_ne!(base, c.expected_response("Ab3dEf9hIj", 300, FW).unwrap());
    }

    #[test]
    fn empty_baseline() {
        let c = SwattCalculator::new();

        assert!(matches!(
            c.expected_response("x", 1, b""),
            Err(Error::Baseline(_))
        ));
    }
}
