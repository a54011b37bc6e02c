// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::handler::{IProtocolHandler, Outcome};
use super::message::{Action, Registration, Reply, Request};
use crate::store::IRecordStore;
use std::sync::Arc;

/// Per-connection state of the registration channel
#[derive(Debug, Default)]
pub struct RegistrationSession {
    pub connected: bool,
}

/// State machine of the sensor registration channel.  There is no login
/// here: a sensor is registered iff a counter-signed firmware record exists
/// for it.
pub struct RegistrationEngine<S: IRecordStore> {
    store: Arc<S>,
}

impl<S: IRecordStore> RegistrationEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn handle_register(&mut self, r: Registration) -> Result<Outcome, Error> {
        let Some(id) = r.id else {
            tracing::info!(sensor_type = %r.sensor_type, "register: sensor id is not an integer");
            return Ok(Outcome::reply(Reply::ack(Action::Register, false)));
        };

        let ok = self
            .store
            .authorize_sensor(&r.signature, id, &r.sensor_type, &r.version, &r.time)
            .unwrap_or_else(|e| {
                tracing::warn!(id, error = %e, "sensor lookup failed");
                false
            });

        tracing::info!(id, sensor_type = %r.sensor_type, version = %r.version, ok, "register");

        Ok(Outcome::reply(Reply::ack(Action::Register, ok)))
    }
}

impl<S: IRecordStore> IProtocolHandler for RegistrationEngine<S> {
    type Session = RegistrationSession;

    fn handle(&mut self, session: &mut RegistrationSession, req: Request) -> Result<Outcome, Error> {
        match req {
            Request::Connect => {
                session.connected = true;
                Ok(Outcome::reply(Reply::ack(Action::Connect, true)))
            }
            Request::Register(r) => self.handle_register(r),
            Request::Logout => {
                tracing::info!("sensor logout");
                *session = Default::default();
                Ok(Outcome::close())
            }
            _ => Ok(Outcome::silent()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Error as StoreError, FirmwareSignRecord, SqliteStore};
    use std::thread;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Arc<SqliteStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::open(dir.path().join("fw.db"), "admin", "123").unwrap());

        store
            .create_firmware_record(&FirmwareSignRecord {
                sensor_id: 7,
                signer_id: 1,
                challenge: "c".to_string(),
                swatt: "s".to_string(),
                date: "d".to_string(),
                sensor_type: "T".to_string(),
                version: "1.0".to_string(),
                cert_path: "cert.pem".to_string(),
                signature_client: "aa".to_string(),
                signature_server: "cafe".to_string(),
                ..Default::default()
            })
            .unwrap();

        (dir, store)
    }

    fn register(signature: &str, id: i64, sensor_type: &str, version: &str) -> Request {
        Request::Register(Registration {
            signature: signature.to_string(),
            id: Some(id),
            sensor_type: sensor_type.to_string(),
            version: version.to_string(),
            time: "now".to_string(),
        })
    }

    #[test]
    fn connect_register_logout() {
        let (_dir, store) = fixture();
        let mut e = RegistrationEngine::new(store);
        let mut s = RegistrationSession::default();

        assert_eq!(
            e.handle(&mut s, Request::Connect).unwrap(),
            Outcome::reply(Reply::ack(Action::Connect, true))
        );
        assert!(s.connected);

        assert_eq!(
            e.handle(&mut s, register("cafe", 7, "T", "1.0")).unwrap(),
            Outcome::reply(Reply::ack(Action::Register, true))
        );

        assert_eq!(e.handle(&mut s, Request::Logout).unwrap(), Outcome::close());
        assert!(!s.connected);
    }

    #[test]
    fn register_rejections() {
        let (_dir, store) = fixture();
        let mut e = RegistrationEngine::new(store);
        let mut s = RegistrationSession::default();

        for req in [
            register("abc", 7, "T", "1.0"),
            register("cafe", 8, "T", "1.0"),
            register("cafe", 7, "U", "1.0"),
            register("cafe", 7, "T", "1.1"),
        ] {
            assert_eq!(
                e.handle(&mut s, req).unwrap(),
                Outcome::reply(Reply::ack(Action::Register, false))
            );
        }
    }

    #[test]
    fn admin_actions_are_ignored() {
        let (_dir, store) = fixture();
        let mut e = RegistrationEngine::new(store);
        let mut s = RegistrationSession::default();

        for req in [
            Request::CertFetch,
            Request::Login {
                user: "admin".to_string(),
                random1: "00".to_string(),
            },
            Request::Unknown,
        ] {
            assert_eq!(e.handle(&mut s, req).unwrap(), Outcome::silent());
        }
    }

    #[test]
    fn runs_on_a_foreign_thread() {
        let (_dir, store) = fixture();
        let mut e = RegistrationEngine::new(Arc::clone(&store));

        let ok = thread::spawn(move || {
            let mut s = RegistrationSession::default();
            e.handle(&mut s, register("cafe", 7, "T", "1.0")).unwrap()
        })
        .join()
        .unwrap();

        assert_eq!(ok, Outcome::reply(Reply::ack(Action::Register, true)));
    }

    #[test]
    fn non_integer_sensor_id() {
        let (_dir, store) = fixture();
        let mut e = RegistrationEngine::new(store);
        let mut s = RegistrationSession::default();

        let req = Request::Register(Registration {
            signature: "cafe".to_string(),
            id: None,
            sensor_type: "T".to_string(),
            version: "1.0".to_string(),
            time: "now".to_string(),
        });

        assert_eq!(
            e.handle(&mut s, req).unwrap(),
            Outcome::reply(Reply::ack(Action::Register, false))
        );
    }

    struct FailingRecords;

    impl IRecordStore for FailingRecords {
        fn create_firmware_record(&self, _: &FirmwareSignRecord) -> Result<i64, StoreError> {
            Err(StoreError::Database("disk I/O error".to_string()))
        }

        fn authorize_sensor(&self, _: &str, _: i64, _: &str, _: &str, _: &str) -> Result<bool, StoreError> {
            Err(StoreError::Database("disk I/O error".to_string()))
        }

        fn update_record(&self, _: i64, _: i64, _: &str, _: &str) -> Result<bool, StoreError> {
            Err(StoreError::Database("disk I/O error".to_string()))
        }

        fn record_count(&self) -> Result<usize, StoreError> {
            Err(StoreError::Database("disk I/O error".to_string()))
        }
    }

    #[test]
    fn store_fault_is_a_negative_ack() {
        let mut e = RegistrationEngine::new(Arc::new(FailingRecords));
        let mut s = RegistrationSession::default();

        assert_eq!(
            e.handle(&mut s, register("cafe", 7, "T", "1.0")).unwrap(),
            Outcome::reply(Reply::ack(Action::Register, false))
        );

        // and the channel carries on
        assert_eq!(
            e.handle(&mut s, Request::Connect).unwrap(),
            Outcome::reply(Reply::ack(Action::Connect, true))
        );
    }
}
