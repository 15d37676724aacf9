//! The closed error enumeration used throughout the crate.
//!
//! A single negative-sentinel space covers every protocol, buffer, and transport failure;
//! there is deliberately one source of truth (this enum plus its `Display` impl) rather than
//! a parallel error-to-string table that could drift out of sync.

use core::fmt;

/// Every failure this crate can report, from wire-level protocol violations to transport
/// errors surfaced by the host's [`crate::transport::Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MqttError {
    // --- protocol violations on unpack ---
    /// A fixed header's control type was not in `1..=14` (or `15` without the `v5` Auth escape hatch).
    ControlForbiddenType,
    /// A fixed header's flag nibble did not match the required mask for its control type.
    ControlInvalidFlags,
    /// A CONNACK's first byte had a nonzero bit outside the session-present flag.
    ConnackForbiddenFlags,
    /// A CONNACK's return code was greater than 5.
    ConnackForbiddenCode,
    /// The response dispatcher was asked to parse a control type a client should never receive.
    ResponseInvalidControlType,
    /// A response's body did not match its declared remaining length or was otherwise malformed.
    MalformedResponse,

    // --- protocol violations on pack ---
    /// `connect()` was called with a null/empty client id.
    ConnectNullClientId,
    /// `connect()` was given a will topic but no will message.
    ConnectNullWillMessage,
    /// `connect()` was given `will_qos == 3`.
    ConnectForbiddenWillQos,
    /// `publish()` was called with `qos == 3`.
    PublishForbiddenQos,
    /// `subscribe()` was given more than eight topic filters in one call.
    SubscribeTooManyTopics,
    /// `unsubscribe()` was given more than eight topic filters in one call.
    UnsubscribeTooManyTopics,
    /// The send-half of `sync` tried to transmit a queued record of an unexpected control type.
    MalformedRequest,

    // --- queue and buffer ---
    /// The send queue is full even after compaction.
    SendBufferIsFull,
    /// The receive buffer filled up before a complete frame could be parsed.
    RecvBufferTooSmall,

    // --- session ---
    /// An operation was attempted before `connect()` completed (or after a sticky error).
    ClientNotConnected,
    /// The broker's CONNACK carried a non-zero return code.
    ConnectionRefused,
    /// A SUBACK contained at least one failure return code (`0x80`).
    SubscribeFailed,
    /// An inbound acknowledgement did not correlate with any outstanding request.
    AckOfUnknown,

    // --- transport ---
    /// The host's [`crate::transport::Transport`] reported a genuine I/O failure.
    SocketError,

    // --- generic ---
    /// A required pointer/slice argument was absent.
    Nullptr,
    /// The code path is recognized but intentionally unimplemented.
    NotImplemented,
    /// An unclassified failure.
    Unknown,
}

impl MqttError {
    /// A short human-readable name for the error kind, generated from the same match as
    /// `Display` so the two can never drift apart.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ControlForbiddenType => "control type is not a valid MQTT control packet type",
            Self::ControlInvalidFlags => "fixed header flags do not match the required mask",
            Self::ConnackForbiddenFlags => "CONNACK acknowledge flags has a reserved bit set",
            Self::ConnackForbiddenCode => "CONNACK return code is out of range",
            Self::ResponseInvalidControlType => "control type is not valid in a broker response",
            Self::MalformedResponse => "response body did not match its declared length",
            Self::ConnectNullClientId => "CONNECT requires a non-empty client id",
            Self::ConnectNullWillMessage => "CONNECT will topic given without a will message",
            Self::ConnectForbiddenWillQos => "CONNECT will QoS of 3 is forbidden",
            Self::PublishForbiddenQos => "PUBLISH QoS of 3 is forbidden",
            Self::SubscribeTooManyTopics => "SUBSCRIBE allows at most 8 topic filters per call",
            Self::UnsubscribeTooManyTopics => "UNSUBSCRIBE allows at most 8 topic filters per call",
            Self::MalformedRequest => "queued record has a control type invalid to transmit",
            Self::SendBufferIsFull => "send queue has no room even after compaction",
            Self::RecvBufferTooSmall => "receive buffer filled before a complete frame arrived",
            Self::ClientNotConnected => "client is not connected",
            Self::ConnectionRefused => "broker refused the connection",
            Self::SubscribeFailed => "broker rejected at least one subscription",
            Self::AckOfUnknown => "acknowledgement did not match any outstanding request",
            Self::SocketError => "transport reported an I/O failure",
            Self::Nullptr => "required argument was absent",
            Self::NotImplemented => "not implemented",
            Self::Unknown => "unknown error",
        }
    }
}

impl fmt::Display for MqttError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MqttError {}
