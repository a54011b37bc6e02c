// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::message::{Reply, Request};

/// What a handler wants done after processing one request
#[derive(Debug, PartialEq, Eq)]
pub struct Outcome {
    /// reply to send back, if any
    pub reply: Option<Reply>,
    /// end the connection after sending the reply
    pub close: bool,
}

impl Outcome {
    pub fn reply(r: Reply) -> Self {
        Self {
            reply: Some(r),
            close: false,
        }
    }

    pub fn silent() -> Self {
        Self {
            reply: None,
            close: false,
        }
    }

    pub fn close() -> Self {
        Self {
            reply: None,
            close: true,
        }
    }
}

/// A per-channel protocol state machine.  A fresh `Session` is created for
/// every accepted connection and dropped when the connection ends.
pub trait IProtocolHandler {
    type Session: Default;

    /// Process one request.  An `Err` is a fault that ends the connection;
    /// protocol-level rejections are `Ok` with a negative acknowledgement.
    fn handle(&mut self, session: &mut Self::Session, req: Request) -> Result<Outcome, Error>;
}
