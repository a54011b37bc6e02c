// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::credential::{random_salt, OperatorCredential};
use super::errors::Error;
use super::record::FirmwareSignRecord;
use super::{ICredentialStore, IRecordStore};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread::{self, ThreadId};
use std::time::Duration;

const CREATE_FIRMWARE_INFO: &str = "CREATE TABLE IF NOT EXISTS firmwareInfo (
    id integer PRIMARY KEY AUTOINCREMENT,
    sensorID integer NOT NULL,
    signerID integer NOT NULL,
    challenge text NOT NULL,
    swatt text NOT NULL,
    date text NOT NULL,
    type text,
    version text NOT NULL,
    certPath text NOT NULL,
    signatureClient text NOT NULL,
    signatureServer text NOT NULL
);";

const CREATE_USER_INFO: &str = "CREATE TABLE IF NOT EXISTS userInFo (
    user text PRIMARY KEY,
    salt text NOT NULL,
    pwdHash text NOT NULL
);";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Credential and record store backed by a SQLite file.
///
/// The connection opened by [`SqliteStore::open`] belongs to the calling
/// thread.  SQLite handles must not be shared across threads, so a call made
/// from any other thread opens its own connection for the duration of that
/// call.  Every call runs in its own transaction, committed on success and
/// rolled back on error.
#[derive(Debug)]
pub struct SqliteStore {
    path: PathBuf,
    owner: ThreadId,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the store at `path`.  If the file does not exist yet, both tables
    /// are created and the default operator is seeded with a fresh salt.
    pub fn open<P: AsRef<Path>>(
        path: P,
        default_user: &str,
        default_password: &str,
    ) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let fresh = !path.exists();

        let conn = Connection::open(&path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute(CREATE_FIRMWARE_INFO, [])?;
        conn.execute(CREATE_USER_INFO, [])?;

        let s = Self {
            path,
            owner: thread::current().id(),
            conn: Mutex::new(conn),
        };

        if fresh {
            tracing::info!(path = %s.path.display(), "created new database");
            s.add_user(default_user, &random_salt()?, default_password)?;
        }

        Ok(s)
    }

    /// Return the path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All firmware-sign records, in insertion order
    pub fn records(&self) -> Result<Vec<FirmwareSignRecord>, Error> {
        self.with_tx(|c| {
            let mut stmt = c.prepare(
                "SELECT id, sensorID, signerID, challenge, swatt, date, type, version, \
                 certPath, signatureClient, signatureServer FROM firmwareInfo ORDER BY id",
            )?;

            let rows = stmt.query_map([], |row| {
                Ok(FirmwareSignRecord {
                    id: Some(row.get(0)?),
                    sensor_id: row.get(1)?,
                    signer_id: row.get(2)?,
                    challenge: row.get(3)?,
                    swatt: row.get(4)?,
                    date: row.get(5)?,
                    sensor_type: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                    version: row.get(7)?,
                    cert_path: row.get(8)?,
                    signature_client: row.get(9)?,
                    signature_server: row.get(10)?,
                })
            })?;

            let mut v = Vec::new();
            for r in rows {
                v.push(r?);
            }

            Ok(v)
        })
    }

    fn with_tx<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Connection) -> Result<T, Error>,
    {
        if thread::current().id() == self.owner {
            let mut conn = self
                .conn
                .lock()
                .map_err(|e| Error::Poisoned(e.to_string()))?;

            return run_in_tx(&mut conn, f);
        }

        tracing::trace!(path = %self.path.display(), "scoped connection for foreign thread");

        let mut conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        run_in_tx(&mut conn, f)
    }

    fn lookup_user(c: &Connection, user: &str) -> Result<Option<OperatorCredential>, Error> {
        let r = c
            .query_row(
                "SELECT user, salt, pwdHash FROM userInFo WHERE user = ?1",
                params![user],
                |row| {
                    Ok(OperatorCredential {
                        user: row.get(0)?,
                        salt: row.get(1)?,
                        pwd_hash: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(r)
    }
}

fn run_in_tx<T, F>(conn: &mut Connection, f: F) -> Result<T, Error>
where
    F: FnOnce(&Connection) -> Result<T, Error>,
{
    let tx = conn.transaction()?;
    let v = f(&tx)?;
    tx.commit()?;
    Ok(v)
}

impl ICredentialStore for SqliteStore {
    fn add_user(&self, user: &str, salt: &str, password: &str) -> Result<bool, Error> {
        let cred = OperatorCredential::new(user, salt, password)?;

        self.with_tx(|c| {
            if Self::lookup_user(c, user)?.is_some() {
                tracing::info!(user, "user already exists");
                return Ok(false);
            }

            c.execute(
                "INSERT INTO userInFo (user, salt, pwdHash) VALUES (?1, ?2, ?3)",
                params![cred.user, cred.salt, cred.pwd_hash],
            )?;

            tracing::info!(user, "added user");

            Ok(true)
        })
    }

    fn authorize_user(&self, user: &str, password: &str) -> Result<bool, Error> {
        self.with_tx(|c| Ok(Self::lookup_user(c, user)?.is_some_and(|u| u.matches(password))))
    }

    fn check_user(&self, user: &str) -> Result<bool, Error> {
        self.with_tx(|c| Ok(Self::lookup_user(c, user)?.is_some()))
    }
}

impl IRecordStore for SqliteStore {
    fn create_firmware_record(&self, rcd: &FirmwareSignRecord) -> Result<i64, Error> {
        self.with_tx(|c| {
            c.execute(
                "INSERT INTO firmwareInfo (sensorID, signerID, challenge, swatt, date, type, \
                 version, certPath, signatureClient, signatureServer) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    rcd.sensor_id,
                    rcd.signer_id,
                    rcd.challenge,
                    rcd.swatt,
                    rcd.date,
                    rcd.sensor_type,
                    rcd.version,
                    rcd.cert_path,
                    rcd.signature_client,
                    rcd.signature_server,
                ],
            )?;

            let id = c.last_insert_rowid();

            tracing::debug!(id, sensor_id = rcd.sensor_id, "created firmware sign record");

            Ok(id)
        })
    }

    fn authorize_sensor(
        &self,
        signature: &str,
        sensor_id: i64,
        sensor_type: &str,
        version: &str,
        timestamp: &str,
    ) -> Result<bool, Error> {
        self.with_tx(|c| {
            // first match decides, even if several records share the signature
            let first = c
                .query_row(
                    "SELECT sensorID, type, version FROM firmwareInfo \
                     WHERE signatureServer = ?1 ORDER BY id LIMIT 1",
                    params![signature],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, Option<String>>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    },
                )
                .optional()?;

            let Some((id, typ, ver)) = first else {
                tracing::debug!(sensor_id, timestamp, "no record for sensor signature");
                return Ok(false);
            };

            Ok(id == sensor_id && typ.as_deref() == Some(sensor_type) && ver == version)
        })
    }

    fn update_record(
        &self,
        id: i64,
        sensor_id: i64,
        challenge: &str,
        swatt: &str,
    ) -> Result<bool, Error> {
        self.with_tx(|c| {
            let n = c.execute(
                "UPDATE firmwareInfo SET sensorID = ?1, challenge = ?2, swatt = ?3 WHERE id = ?4",
                params![sensor_id, challenge, swatt, id],
            )?;

            Ok(n == 1)
        })
    }

    fn record_count(&self) -> Result<usize, Error> {
        self.with_tx(|c| {
            let n: i64 = c.query_row("SELECT COUNT(*) FROM firmwareInfo", [], |row| row.get(0))?;
            Ok(n as usize)
        })
    }
}
