//! CONNECT packer.
//!
//! Grounded on the wire layout in the teacher's `packet::connect_packet::ConnectPacket`, rebuilt
//! around `BufWriter` instead of the teacher's MQTT5-property-bearing `encode`.

use crate::buffer::BufWriter;
use crate::config::ConnectConfig;
use crate::error::MqttError;
use crate::header::{ControlType, FixedHeader};

const PROTOCOL_NAME: &str = "MQTT";
const PROTOCOL_LEVEL: u8 = 0x04;

const FLAG_CLEAN_SESSION: u8 = 0b0000_0010;
const FLAG_WILL: u8 = 0b0000_0100;
const FLAG_WILL_RETAIN: u8 = 0b0010_0000;
const FLAG_PASSWORD: u8 = 0b0100_0000;
const FLAG_USER_NAME: u8 = 0b1000_0000;

/// Packs a CONNECT request. Returns `Ok(0)` if `buf` is too small, `Err` on a protocol
/// violation, `Ok(bytes_written)` on success.
pub fn pack(buf: &mut [u8], cfg: &ConnectConfig) -> Result<usize, MqttError> {
    if cfg.client_id.is_empty() {
        return Err(MqttError::ConnectNullClientId);
    }
    if let Some(will) = &cfg.will {
        if will.qos.into_bits() > 2 {
            return Err(MqttError::ConnectForbiddenWillQos);
        }
    }

    let mut flags = 0u8;
    if cfg.clean_session {
        flags |= FLAG_CLEAN_SESSION;
    }
    if let Some(will) = &cfg.will {
        flags |= FLAG_WILL;
        flags |= will.qos.into_bits() << 3;
        if will.retain {
            flags |= FLAG_WILL_RETAIN;
        }
    }
    if cfg.user_name.is_some() {
        flags |= FLAG_USER_NAME;
    }
    if cfg.password.is_some() {
        flags |= FLAG_PASSWORD;
    }

    let mut remaining_length = 10 + 2 + cfg.client_id.len();
    if let Some(will) = &cfg.will {
        remaining_length += 2 + will.topic.len();
        remaining_length += 2 + will.message.len();
    }
    if let Some(user_name) = cfg.user_name {
        remaining_length += 2 + user_name.len();
    }
    if let Some(password) = cfg.password {
        remaining_length += 2 + password.len();
    }

    let header = FixedHeader::new(ControlType::Connect, 0, remaining_length as u32);
    let header_len = header.pack(buf)?;
    if header_len == 0 {
        return Ok(0);
    }

    let mut w = BufWriter::new(&mut buf[header_len..]);
    let ok = w.write_str(PROTOCOL_NAME)
        && w.write_u8(PROTOCOL_LEVEL)
        && w.write_u8(flags)
        && w.write_u16(cfg.keep_alive)
        && w.write_str(cfg.client_id)
        && match &cfg.will {
            Some(will) => w.write_str(will.topic) && w.write_u16(will.message.len() as u16) && w.write_bytes(will.message),
            None => true,
        }
        && match cfg.user_name {
            Some(user_name) => w.write_str(user_name),
            None => true,
        }
        && match cfg.password {
            Some(password) => w.write_u16(password.len() as u16) && w.write_bytes(password),
            None => true,
        };

    if !ok {
        return Ok(0);
    }
    Ok(header_len + w.position())
}
