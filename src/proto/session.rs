// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

/// Progress of an administrative session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Init,
    Connected,
    LoginNonceIssued,
    ChallengeIssued,
}

/// Per-connection state of the administrative channel.
#[derive(Debug, Default)]
pub struct Session {
    pub state: SessionState,
    /// username accepted by login step 1
    pub user: Option<String>,
    /// server nonce issued by login step 1
    pub nonce: Option<Vec<u8>>,
    /// SWATT challenge issued by login step 2
    pub challenge: Option<String>,
    /// last computed expected SWATT response
    pub expected: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// True once both login steps have succeeded
    pub fn logged_in(&self) -> bool {
        self.state == SessionState::ChallengeIssued
    }
}
