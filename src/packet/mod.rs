//! Per-packet codecs and the response dispatcher.
//!
//! Grounded on the per-type modules of the teacher's `packet/` directory (`connect_packet.rs`,
//! `mqtt_packet.rs`'s encode/decode shape), rebuilt around plain byte slices instead of the
//! teacher's MQTT5 `Packet` trait.

pub mod connack;
pub mod connect;
pub mod publish;
pub mod pubxxx;
pub mod simple;
pub mod suback;
pub mod subscribe;
pub mod unsuback;
pub mod unsubscribe;

use crate::error::MqttError;
use crate::header::{ControlType, FixedHeader};
use publish::Publish;
use suback::Suback;

/// Every control packet a client may receive from a broker, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response<'a> {
    Connack(connack::Connack),
    Publish(Publish<'a>),
    Puback { packet_id: u16 },
    Pubrec { packet_id: u16 },
    Pubrel { packet_id: u16 },
    Pubcomp { packet_id: u16 },
    Suback(Suback),
    Unsuback { packet_id: u16 },
    Pingresp,
}

/// Parses one response starting at a fixed header. Returns `Ok(None)` if `buf` does not yet
/// contain a complete frame (not an error); `Ok(Some((bytes_consumed, response)))` on success;
/// `Err` on a protocol violation.
pub fn parse_response<'a>(buf: &'a [u8]) -> Result<Option<(usize, Response<'a>)>, MqttError> {
    let (header_len, header) = FixedHeader::unpack(buf)?;
    if header_len == 0 {
        return Ok(None);
    }

    let remaining = header.remaining_length as usize;
    let frame_len = header_len + remaining;
    let Some(body) = buf.get(header_len..frame_len) else {
        return Ok(None);
    };

    let response = match header.control_type {
        ControlType::Connack => Response::Connack(connack::unpack(body)?),
        ControlType::Publish => Response::Publish(publish::unpack(
            header.control_flags,
            header.remaining_length,
            body,
        )?),
        ControlType::Puback => Response::Puback {
            packet_id: pubxxx::unpack(body)?,
        },
        ControlType::Pubrec => Response::Pubrec {
            packet_id: pubxxx::unpack(body)?,
        },
        ControlType::Pubrel => Response::Pubrel {
            packet_id: pubxxx::unpack(body)?,
        },
        ControlType::Pubcomp => Response::Pubcomp {
            packet_id: pubxxx::unpack(body)?,
        },
        ControlType::Suback => Response::Suback(suback::unpack(body)?),
        ControlType::Unsuback => Response::Unsuback {
            packet_id: unsuback::unpack(body)?,
        },
        ControlType::Pingresp => Response::Pingresp,
        ControlType::Connect
        | ControlType::Subscribe
        | ControlType::Unsubscribe
        | ControlType::Pingreq
        | ControlType::Disconnect => return Err(MqttError::ResponseInvalidControlType),
    };

    Ok(Some((frame_len, response)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_pingresp() {
        let buf = [0xD0, 0x00];
        let (n, resp) = parse_response(&buf).unwrap().unwrap();
        assert_eq!(n, 2);
        assert_eq!(resp, Response::Pingresp);
    }

    #[test]
    fn partial_frame_is_none() {
        let buf = [0xD0];
        assert_eq!(parse_response(&buf).unwrap(), None);
    }

    #[test]
    fn rejects_client_only_control_types() {
        let buf = [0x10, 0x00];
        assert_eq!(
            parse_response(&buf).unwrap_err(),
            MqttError::ResponseInvalidControlType
        );
    }

    #[test]
    fn dispatches_puback() {
        let buf = [0x40, 0x02, 0x00, 0xD5];
        let (n, resp) = parse_response(&buf).unwrap().unwrap();
        assert_eq!(n, 4);
        assert_eq!(resp, Response::Puback { packet_id: 213 });
    }
}
