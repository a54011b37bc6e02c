// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Action tokens, as they appear on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// connect request
    #[serde(rename = "CR")]
    Connect,
    /// login step 1: username and client random
    #[serde(rename = "LI1")]
    Login1,
    /// login step 2: echoed server nonce and password
    #[serde(rename = "LI2")]
    Login2,
    #[serde(rename = "LR1")]
    LoginReply1,
    #[serde(rename = "LR2")]
    LoginReply2,
    /// generic acknowledgement
    #[serde(rename = "HB")]
    Heartbeat,
    #[serde(rename = "CF")]
    CertFetch,
    /// file payload
    #[serde(rename = "FL")]
    File,
    #[serde(rename = "SR")]
    SignResponse,
    #[serde(rename = "RG")]
    Register,
    #[serde(rename = "LO")]
    Logout,
}

impl Action {
    pub fn token(&self) -> &'static str {
        match self {
            Action::Connect => "CR",
            Action::Login1 => "LI1",
            Action::Login2 => "LI2",
            Action::LoginReply1 => "LR1",
            Action::LoginReply2 => "LR2",
            Action::Heartbeat => "HB",
            Action::CertFetch => "CF",
            Action::File => "FL",
            Action::SignResponse => "SR",
            Action::Register => "RG",
            Action::Logout => "LO",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// An inbound message
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "act")]
pub enum Request {
    #[serde(rename = "CR")]
    Connect,

    #[serde(rename = "LI1")]
    Login {
        #[serde(deserialize_with = "text")]
        user: String,
        #[serde(deserialize_with = "text")]
        random1: String,
    },

    #[serde(rename = "LI2")]
    Authorize {
        /// the server nonce from `LR1`, hex encoded
        random2: String,
        #[serde(deserialize_with = "text")]
        password: String,
    },

    #[serde(rename = "CF")]
    CertFetch,

    #[serde(rename = "SR")]
    SignResponse(SignResponse),

    #[serde(rename = "RG")]
    Register(Registration),

    #[serde(rename = "LO")]
    Logout,

    #[serde(other)]
    Unknown,
}

impl Request {
    /// The action token, if the request was recognised
    pub fn action(&self) -> Option<Action> {
        match self {
            Request::Connect => Some(Action::Connect),
            Request::Login { .. } => Some(Action::Login1),
            Request::Authorize { .. } => Some(Action::Login2),
            Request::CertFetch => Some(Action::CertFetch),
            Request::SignResponse(_) => Some(Action::SignResponse),
            Request::Register(_) => Some(Action::Register),
            Request::Logout => Some(Action::Logout),
            Request::Unknown => None,
        }
    }
}

/// Firmware metadata submitted by a logged-in operator, signed with the
/// operator's key
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SignResponse {
    /// sensor id
    #[serde(deserialize_with = "int")]
    pub id: i64,

    /// signer id, also the SWATT target
    #[serde(deserialize_with = "int")]
    pub sid: i64,

    /// SWATT response to the session challenge
    #[serde(deserialize_with = "text")]
    pub swatt: String,

    #[serde(deserialize_with = "text")]
    pub date: String,

    #[serde(rename = "type", alias = "tpye", deserialize_with = "text")]
    pub sensor_type: String,

    #[serde(deserialize_with = "text")]
    pub version: String,

    /// signature over [`SignResponse::signed_message`], hex encoded
    #[serde(rename = "signStr")]
    pub signature: String,
}

impl SignResponse {
    /// id, sid, swatt, date, type and version concatenated without
    /// delimiters
    pub fn signed_message(&self) -> String {
        [
            self.id.to_string(),
            self.sid.to_string(),
            self.swatt.clone(),
            self.date.clone(),
            self.sensor_type.clone(),
            self.version.clone(),
        ]
        .concat()
    }
}

/// A sensor asking to be registered
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Registration {
    /// the server counter-signature of the sensor's firmware record, hex
    #[serde(rename = "signStr")]
    pub signature: String,

    /// sensor id; anything but a JSON integer is kept as `None` and never
    /// matches a stored record
    #[serde(deserialize_with = "strict_int")]
    pub id: Option<i64>,

    #[serde(rename = "type", deserialize_with = "text")]
    pub sensor_type: String,

    #[serde(deserialize_with = "text")]
    pub version: String,

    #[serde(default, deserialize_with = "text")]
    pub time: String,
}

/// The outcome carried by an `HB` acknowledgement
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AckState {
    Flag(bool),
    /// a successful sign response carries the counter-signature
    Signature(Vec<u8>),
}

impl Serialize for AckState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AckState::Flag(b) => serializer.serialize_bool(*b),
            AckState::Signature(s) => serializer.serialize_str(&hex::encode(s)),
        }
    }
}

/// An outbound message
#[serde_with::serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "act")]
pub enum Reply {
    #[serde(rename = "HB")]
    Ack {
        #[serde(rename = "lAct")]
        acked: Action,
        state: AckState,
    },

    #[serde(rename = "LR1")]
    LoginNonce {
        random1: String,
        #[serde_as(as = "serde_with::hex::Hex")]
        random2: Vec<u8>,
    },

    #[serde(rename = "LR2")]
    Challenge { challenge: String },

    #[serde(rename = "FL")]
    File {
        #[serde_as(as = "serde_with::hex::Hex")]
        data: Vec<u8>,
    },
}

impl Reply {
    pub fn ack(acked: Action, ok: bool) -> Self {
        Reply::Ack {
            acked,
            state: AckState::Flag(ok),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

// Accept numbers where text is expected and keep their decimal form, so a
// version sent as 1.01 compares equal to the stored "1.01".
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Text(s) => s,
        Lenient::Number(n) => n.to_string(),
        Lenient::Bool(b) => b.to_string(),
    })
}

fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Lenient::deserialize(deserializer)? {
        Lenient::Number(n) => n
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom(format!("expecting integer, got {n}"))),
        Lenient::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expecting integer, got {s:?}"))),
        Lenient::Bool(b) => Err(serde::de::Error::custom(format!(
            "expecting integer, got {b}"
        ))),
    }
}

fn strict_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Number(n) => n.as_i64(),
        Lenient::Text(_) | Lenient::Bool(_) => None,
    })
}
