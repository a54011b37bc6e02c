// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::{IConnection, IListener, TcpPlainListener, TlsListener};
use crate::proto::{ICodec, IProtocolHandler};
use std::net::SocketAddr;
use std::thread::{self, JoinHandle};

/// Largest message read in a single receive
pub const BUFFER_SIZE: usize = 4096;

/// Either flavour of listener, chosen from configuration
pub enum Listener {
    Tls(TlsListener),
    Plain(TcpPlainListener),
}

impl IListener for Listener {
    type Conn = Box<dyn IConnection + Send>;

    fn accept(&self) -> Result<(Self::Conn, SocketAddr), Error> {
        let (c, peer): (Self::Conn, SocketAddr) = match self {
            Listener::Tls(l) => {
                let (c, peer) = l.accept()?;
                (Box::new(c), peer)
            }
            Listener::Plain(l) => {
                let (c, peer) = l.accept()?;
                (Box::new(c), peer)
            }
        };

        Ok((c, peer))
    }

    fn local_addr(&self) -> Result<SocketAddr, Error> {
        match self {
            Listener::Tls(l) => l.local_addr(),
            Listener::Plain(l) => l.local_addr(),
        }
    }
}

/// Serve a single connection until the peer disconnects or the handler asks
/// to close it.  The session lives exactly as long as this call.
pub fn serve_connection<C, K, H>(name: &str, conn: &mut C, codec: &K, handler: &mut H) -> Result<(), Error>
where
    C: IConnection + ?Sized,
    K: ICodec,
    H: IProtocolHandler,
{
    let mut session = H::Session::default();
    let mut buf = vec![0u8; BUFFER_SIZE];

    loop {
        let n = conn.recv(&mut buf)?;
        if n == 0 {
            tracing::debug!(listener = name, "peer closed the connection");
            return Ok(());
        }

        let req = codec.decode(&buf[..n])?;
        match req.action() {
            Some(action) => tracing::debug!(listener = name, %action, "received"),
            None => tracing::debug!(listener = name, "received an unknown action"),
        }

        let outcome = handler.handle(&mut session, req)?;

        if let Some(reply) = outcome.reply {
            conn.send(&codec.encode(&reply)?)?;
        }

        if outcome.close {
            conn.close();
            return Ok(());
        }
    }
}

/// Accept and serve connections one at a time, forever.  Faults are logged
/// and never end the loop.
pub fn serve_forever<L, K, H>(name: &str, listener: L, codec: K, mut handler: H) -> !
where
    L: IListener,
    K: ICodec,
    H: IProtocolHandler,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(listener = name, %addr, "listening");
    }

    loop {
        let (mut conn, peer) = match listener.accept() {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(listener = name, error = %e, "accept failed");
                continue;
            }
        };

        tracing::info!(listener = name, %peer, "connection accepted");

        match serve_connection(name, &mut conn, &codec, &mut handler) {
            Ok(()) => tracing::info!(listener = name, %peer, "connection finished"),
            Err(e) => tracing::warn!(listener = name, %peer, error = %e, "connection aborted"),
        }
    }
}

/// Run [`serve_forever`] on a dedicated, named OS thread
pub fn spawn<L, K, H>(name: &str, listener: L, codec: K, handler: H) -> Result<JoinHandle<()>, Error>
where
    L: IListener + Send + 'static,
    K: ICodec + Send + 'static,
    H: IProtocolHandler + Send + 'static,
{
    let n = name.to_string();

    let h = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || serve_forever(&n, listener, codec, handler))?;

    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{JsonCodec, RegistrationEngine};
    use crate::store::{FirmwareSignRecord, IRecordStore, SqliteStore};
    use serde_json::{json, Value};
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::sync::Arc;
    use std::time::Duration;

    fn roundtrip(s: &mut TcpStream, req: Value) -> Value {
        s.write_all(req.to_string().as_bytes()).unwrap();

        let mut buf = [0u8; BUFFER_SIZE];
        let n = s.read(&mut buf).unwrap();
        serde_json::from_slice(&buf[..n]).unwrap()
    }

    #[test]
    fn registration_channel_over_tcp() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::open(dir.path().join("fw.db"), "admin", "123").unwrap());

        store
            .create_firmware_record(&FirmwareSignRecord {
                sensor_id: 7,
                sensor_type: "T".to_string(),
                version: "1.0".to_string(),
                signature_server: "cafe".to_string(),
                ..Default::default()
            })
            .unwrap();

        let l = Listener::Plain(TcpPlainListener::bind("127.0.0.1:0").unwrap());
        let addr = l.local_addr().unwrap();

        spawn("registration", l, JsonCodec, RegistrationEngine::new(Arc::clone(&store))).unwrap();

        let mut s = TcpStream::connect(addr).unwrap();
        s.set_read_timeout(Some(Duration::from_secs(10))).unwrap();

        assert_eq!(
            roundtrip(&mut s, json!({"act": "CR"})),
            json!({"act": "HB", "lAct": "CR", "state": true})
        );

        assert_eq!(
            roundtrip(
                &mut s,
                json!({"act": "RG", "signStr": "cafe", "id": 7, "type": "T", "version": "1.0", "time": "now"})
            ),
            json!({"act": "HB", "lAct": "RG", "state": true})
        );

        assert_eq!(
            roundtrip(
                &mut s,
                json!({"act": "RG", "signStr": "abc", "id": 7, "type": "T", "version": "1.0", "time": "now"})
            ),
            json!({"act": "HB", "lAct": "RG", "state": false})
        );

        // logout closes the connection without a reply
        s.write_all(json!({"act": "LO"}).to_string().as_bytes())
            .unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(s.read(&mut buf).unwrap(), 0);

        // a garbled message aborts that connection only
        let mut s = TcpStream::connect(addr).unwrap();
        s.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
        s.write_all(b"\x00garbage").unwrap();
        assert_eq!(s.read(&mut buf).unwrap_or(0), 0);

        // and the listener keeps accepting
        let mut s = TcpStream::connect(addr).unwrap();
        s.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
        assert_eq!(
            roundtrip(&mut s, json!({"act": "CR"})),
            json!({"act": "HB", "lAct": "CR", "state": true})
        );
    }
}
