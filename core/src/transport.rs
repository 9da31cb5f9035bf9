//! The seam between request building and the network.
//!
//! # Design
//! A transport follows a write / read / close protocol: `write` performs the
//! exchange, `read` hands back the raw body (or `None` when there is none)
//! and `error` explains a `None`. A `Connector` opens one transport per
//! send; `OpenTransport` closes it when dropped, so every exit path of a
//! send releases the connection.

use std::ops::{Deref, DerefMut};

use crate::config::TransportConfig;
use crate::http::HttpMethod;

/// One HTTP exchange.
pub trait Transport {
    fn write(&mut self, method: HttpMethod, url: &str, headers: &[String], body: &str);

    /// Raw response body, or `None` when the exchange failed.
    fn read(&mut self) -> Option<Vec<u8>>;

    /// Description of the last failure.
    fn error(&self) -> String;

    fn close(&mut self);
}

/// Opens a fresh transport for each send.
pub trait Connector {
    type Transport: Transport;

    fn connect(&self, config: &TransportConfig) -> Self::Transport;
}

impl<F, T> Connector for F
where
    F: Fn(&TransportConfig) -> T,
    T: Transport,
{
    type Transport = T;

    fn connect(&self, config: &TransportConfig) -> T {
        self(config)
    }
}

/// A transport that is closed when it goes out of scope.
pub struct OpenTransport<T: Transport> {
    inner: T,
}

impl<T: Transport> OpenTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Transport> Deref for OpenTransport<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> DerefMut for OpenTransport<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: Transport> Drop for OpenTransport<T> {
    fn drop(&mut self) {
        self.inner.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counting {
        closed: Rc<Cell<u32>>,
    }

    impl Transport for Counting {
        fn write(&mut self, _: HttpMethod, _: &str, _: &[String], _: &str) {}

        fn read(&mut self) -> Option<Vec<u8>> {
            None
        }

        fn error(&self) -> String {
            String::new()
        }

        fn close(&mut self) {
            self.closed.set(self.closed.get() + 1);
        }
    }

    #[test]
    fn dropping_open_transport_closes_once() {
        let closed = Rc::new(Cell::new(0));
        {
            let mut open = OpenTransport::new(Counting { closed: closed.clone() });
            open.write(HttpMethod::Get, "http://localhost", &[], "");
            assert_eq!(closed.get(), 0);
        }
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn closures_are_connectors() {
        let closed = Rc::new(Cell::new(0));
        let connector = |_: &TransportConfig| Counting { closed: closed.clone() };
        drop(OpenTransport::new(connector.connect(&TransportConfig::default())));
        assert_eq!(closed.get(), 1);
    }
}
