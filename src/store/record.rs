// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

/// A firmware version that passed both signature verification and SWATT
/// attestation, together with the server's counter-signature.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FirmwareSignRecord {
    /// Row id, assigned by the store on insertion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(rename = "sensorID")]
    pub sensor_id: i64,

    #[serde(rename = "signerID")]
    pub signer_id: i64,

    /// The SWATT challenge issued to the operator's session
    pub challenge: String,

    /// The SWATT response submitted by the operator
    pub swatt: String,

    pub date: String,

    #[serde(rename = "type")]
    pub sensor_type: String,

    pub version: String,

    /// Path of the certificate that verified the client signature
    #[serde(rename = "certPath")]
    pub cert_path: String,

    /// Client signature, hex encoded
    #[serde(rename = "signatureClient")]
    pub signature_client: String,

    /// Server counter-signature over [`FirmwareSignRecord::canonical_string`],
    /// hex encoded
    #[serde(rename = "signatureServer")]
    pub signature_server: String,
}

impl FirmwareSignRecord {
    /// The message the server counter-signs: the first nine fields in
    /// column order, concatenated without delimiters.
    pub fn canonical_string(&self) -> String {
        [
            self.sensor_id.to_string(),
            self.signer_id.to_string(),
            self.challenge.clone(),
            self.swatt.clone(),
            self.date.clone(),
            self.sensor_type.clone(),
            self.version.clone(),
            self.cert_path.clone(),
            self.signature_client.clone(),
        ]
        .concat()
    }
}
