// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::{IConnection, IListener};
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

/// Unencrypted TCP listener, for deployments without a TLS identity
#[derive(Debug)]
pub struct TcpPlainListener {
    tcp: TcpListener,
}

impl TcpPlainListener {
    pub fn bind<A: ToSocketAddrs>(addr: A) -> Result<Self, Error> {
        Ok(Self {
            tcp: TcpListener::bind(addr)?,
        })
    }
}

impl IListener for TcpPlainListener {
    type Conn = TcpStream;

    fn accept(&self) -> Result<(TcpStream, SocketAddr), Error> {
        Ok(self.tcp.accept()?)
    }

    fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.tcp.local_addr()?)
    }
}

impl IConnection for TcpStream {
    fn send(&mut self, buf: &[u8]) -> Result<(), Error> {
        self.write_all(buf)?;
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        Ok(self.read(buf)?)
    }

    fn close(&mut self) {
        let _ = self.shutdown(Shutdown::Both);
    }
}
