//! A minimal, allocation-free MQTT 3.1.1 client core.
//!
//! The crate never blocks and never allocates: callers supply a [`transport::Transport`] plus
//! two fixed-size buffers (one backing the outbound [`queue::SendQueue`], one backing inbound
//! frame reassembly) and drive everything forward by calling [`session::Session::sync`]
//! periodically. There is no internal thread, timer, or socket of its own.
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![allow(dead_code)]

mod fmt;

pub mod buffer;
pub mod config;
pub mod error;
pub mod header;
pub mod lock;
pub mod packet;
pub mod pid;
pub mod qos;
pub mod queue;
pub mod session;
pub mod transport;
pub mod varint;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{ConnectConfig, SessionConfig, Will};
pub use error::MqttError;
pub use header::ControlType;
pub use lock::{NoopLock, SessionLock};
pub use qos::QoS;
pub use session::Session;
pub use transport::{Transport, TransportError};
