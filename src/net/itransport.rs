// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use std::net::SocketAddr;

/// One accepted connection
pub trait IConnection {
    /// Send one message in a single write
    fn send(&mut self, buf: &[u8]) -> Result<(), Error>;

    /// Receive one message.  `Ok(0)` means the peer closed the connection.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Error>;

    fn close(&mut self);
}

impl<T: IConnection + ?Sized> IConnection for Box<T> {
    fn send(&mut self, buf: &[u8]) -> Result<(), Error> {
        (**self).send(buf)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        (**self).recv(buf)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// A bound, listening endpoint
pub trait IListener {
    type Conn: IConnection;

    /// Block until the next peer connects
    fn accept(&self) -> Result<(Self::Conn, SocketAddr), Error>;

    fn local_addr(&self) -> Result<SocketAddr, Error>;
}
