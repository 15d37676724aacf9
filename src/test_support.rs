//! An in-memory [`Transport`] for tests.
//!
//! Grounded on the teacher's `test::read::SliceReader` / `test::write::SliceWriter` pair,
//! merged into one type and converted from their async `Read`/`Write` contract to the sync,
//! non-blocking `Transport` contract this crate's session engine drives: a fixed inbound slice
//! the test pre-loads with bytes "from the broker", and a fixed outbound slice the session
//! writes "to the broker" into, both returning `0` once exhausted rather than blocking.

use crate::transport::{Transport, TransportError};

pub struct StubTransport<'a> {
    inbound: &'a [u8],
    inbound_pos: usize,
    outbound: &'a mut [u8],
    outbound_pos: usize,
}

impl<'a> StubTransport<'a> {
    pub fn new(inbound: &'a [u8], outbound: &'a mut [u8]) -> Self {
        Self {
            inbound,
            inbound_pos: 0,
            outbound,
            outbound_pos: 0,
        }
    }

    /// The bytes the session has written so far.
    pub fn written(&self) -> &[u8] {
        &self.outbound[..self.outbound_pos]
    }
}

impl<'a> Transport for StubTransport<'a> {
    fn send(&mut self, buf: &[u8]) -> Result<usize, TransportError> {
        let left = self.outbound.len().saturating_sub(self.outbound_pos);
        let n = left.min(buf.len());
        self.outbound[self.outbound_pos..self.outbound_pos + n].copy_from_slice(&buf[..n]);
        self.outbound_pos += n;
        Ok(n)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let left = self.inbound.len() - self.inbound_pos;
        let n = left.min(buf.len());
        buf[..n].copy_from_slice(&self.inbound[self.inbound_pos..self.inbound_pos + n]);
        self.inbound_pos += n;
        Ok(n)
    }
}
