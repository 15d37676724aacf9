//! The host-supplied byte transport.
//!
//! Grounded on the teacher's `network::network_trait::Network` trait, converted from its
//! async `Future`-returning methods to plain synchronous, non-blocking-contract methods: the
//! session engine never suspends except when the host's own transport chooses to block.

/// A transport failure distinct from "nothing available right now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportError;

/// Byte-oriented, non-blocking send/receive. Implementations target POSIX sockets, TLS, or
/// bare-metal stacks identically; the session engine treats all of them the same way.
pub trait Transport {
    /// Attempts to transmit up to `buf.len()` bytes. Must make progress or error on a live
    /// connection; returns the number of bytes actually sent.
    fn send(&mut self, buf: &[u8]) -> Result<usize, TransportError>;

    /// Attempts to read up to `buf.len()` bytes without suspending. `Ok(0)` means "nothing
    /// available now", not end of stream.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;
}
