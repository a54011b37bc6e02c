// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::{IConnection, IListener};
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod, SslStream};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::path::Path;

/// TLS-terminated TCP listener
pub struct TlsListener {
    tcp: TcpListener,
    acceptor: SslAcceptor,
}

impl TlsListener {
    /// Bind `addr` and serve the PEM certificate chain and private key found
    /// at the given paths
    pub fn bind<A, P, Q>(addr: A, cert_chain: P, private_key: Q) -> Result<Self, Error>
    where
        A: ToSocketAddrs,
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let tls = |e: openssl::error::ErrorStack| Error::Tls(e.to_string());

        let mut b = SslAcceptor::mozilla_intermediate_v5(SslMethod::tls()).map_err(tls)?;
        b.set_certificate_chain_file(cert_chain).map_err(tls)?;
        b.set_private_key_file(private_key, SslFiletype::PEM)
            .map_err(tls)?;
        b.check_private_key().map_err(tls)?;

        Ok(Self {
            tcp: TcpListener::bind(addr)?,
            acceptor: b.build(),
        })
    }
}

impl IListener for TlsListener {
    type Conn = SslStream<TcpStream>;

    fn accept(&self) -> Result<(SslStream<TcpStream>, SocketAddr), Error> {
        let (stream, peer) = self.tcp.accept()?;

        let tls = self
            .acceptor
            .accept(stream)
            .map_err(|e| Error::Tls(format!("handshake with {peer}: {e}")))?;

        Ok((tls, peer))
    }

    fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.tcp.local_addr()?)
    }
}

impl IConnection for SslStream<TcpStream> {
    fn send(&mut self, buf: &[u8]) -> Result<(), Error> {
        self.write_all(buf)?;
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        Ok(self.read(buf)?)
    }

    fn close(&mut self) {
        let _ = self.shutdown();
    }
}
