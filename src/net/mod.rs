// Copyright 2026 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Transport and accept loops.
//!
//! Each listener serves exactly one connection to completion before it
//! accepts the next one.  A fault while accepting or serving a connection is
//! logged and the loop goes back to accepting.

pub use self::errors::Error;
pub use self::itransport::{IConnection, IListener};
pub use self::listener::{serve_connection, serve_forever, spawn, Listener, BUFFER_SIZE};
pub use self::tcp::TcpPlainListener;
pub use self::tls::TlsListener;

mod errors;
mod itransport;
mod listener;
mod tcp;
mod tls;
