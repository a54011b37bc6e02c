// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::message::{Reply, Request};

/// Interface to the wire codec
pub trait ICodec {
    fn decode(&self, buf: &[u8]) -> Result<Request, Error>;
    fn encode(&self, reply: &Reply) -> Result<Vec<u8>, Error>;
}

/// One JSON object per message, tagged by its `act` member
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl ICodec for JsonCodec {
    fn decode(&self, buf: &[u8]) -> Result<Request, Error> {
        serde_json::from_slice(buf).map_err(|e| Error::Syntax(e.to_string()))
    }

    fn encode(&self, reply: &Reply) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(reply).map_err(|e| Error::Encode(e.to_string()))
    }
}
