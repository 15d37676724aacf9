//! Host-supplied configuration passed into the session engine.
//!
//! Grounded on the teacher's three-way `config::{client, server, shared}` split, collapsed to
//! the fields this crate's `connect`/`init` operations actually take (MQTT 3.1.1 has none of
//! the teacher's MQTT5-only session-expiry/receive-maximum machinery).

use crate::qos::QoS;

/// A will message: delivered by the broker on behalf of a client that disconnects ungracefully.
#[derive(Debug, Clone, Copy)]
pub struct Will<'a> {
    pub topic: &'a str,
    pub message: &'a [u8],
    pub qos: QoS,
    pub retain: bool,
}

/// Parameters for a single `connect()` call.
#[derive(Debug, Clone, Copy)]
pub struct ConnectConfig<'a> {
    pub client_id: &'a str,
    pub will: Option<Will<'a>>,
    pub user_name: Option<&'a str>,
    pub password: Option<&'a [u8]>,
    pub clean_session: bool,
    pub keep_alive: u16,
}

impl<'a> ConnectConfig<'a> {
    pub fn new(client_id: &'a str, keep_alive: u16) -> Self {
        Self {
            client_id,
            will: None,
            user_name: None,
            password: None,
            clean_session: true,
            keep_alive,
        }
    }
}

/// Session-wide parameters not tied to a single `connect()` call.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub response_timeout_secs: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            response_timeout_secs: 30,
        }
    }
}
