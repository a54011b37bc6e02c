// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::record::FirmwareSignRecord;

/// Interface to the store where firmware-sign records are stashed.
pub trait IRecordStore {
    /// Insert a new record and return its id.  Ids are strictly increasing.
    fn create_firmware_record(&self, rcd: &FirmwareSignRecord) -> Result<i64, Error>;

    /// Decide whether a sensor presenting `signature` has been signed for.
    /// Only the first record carrying that counter-signature is inspected.
    fn authorize_sensor(
        &self,
        signature: &str,
        sensor_id: i64,
        sensor_type: &str,
        version: &str,
        timestamp: &str,
    ) -> Result<bool, Error>;

    /// Rewrite the sensor id, challenge and swatt columns of record `id`.
    /// Returns `false` if no such record exists.
    fn update_record(
        &self,
        id: i64,
        sensor_id: i64,
        challenge: &str,
        swatt: &str,
    ) -> Result<bool, Error>;

    /// Number of records currently stored
    fn record_count(&self) -> Result<usize, Error>;
}
