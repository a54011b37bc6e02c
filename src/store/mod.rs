// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Persistence for operator credentials and firmware-sign records.
//!
//! Both tables live in a single SQLite file.  The [`SqliteStore`] is opened
//! once by its owning thread; calls arriving from any other thread are served
//! through a short-lived connection scoped to that call.

pub use self::credential::random_salt;
pub use self::credential::OperatorCredential;
pub use self::errors::Error;
pub use self::icredentialstore::ICredentialStore;
pub use self::irecordstore::IRecordStore;
pub use self::record::FirmwareSignRecord;
pub use self::sqlite_store::SqliteStore;

mod credential;
mod errors;
mod icredentialstore;
mod irecordstore;
mod record;
mod sqlite_store;
