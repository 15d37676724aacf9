//! The 1-5 byte fixed header shared by every MQTT control packet.
//!
//! Grounded on the teacher's `header::FixedHeader`/`packet::packet_type::PacketType` pair,
//! collapsed into one sync pack/unpack API (the teacher's newer snapshot is async and
//! `Readable`/`Writable`-trait based; the spec here wants a plain byte-slice in, byte-count
//! out interface matching the rest of this crate's codec).

use crate::error::MqttError;
use crate::varint;

/// One of the fourteen MQTT 3.1.1 control packet types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlType {
    Connect = 1,
    Connack = 2,
    Publish = 3,
    Puback = 4,
    Pubrec = 5,
    Pubrel = 6,
    Pubcomp = 7,
    Subscribe = 8,
    Suback = 9,
    Unsubscribe = 10,
    Unsuback = 11,
    Pingreq = 12,
    Pingresp = 13,
    Disconnect = 14,
}

impl ControlType {
    fn from_nibble(nibble: u8) -> Result<Self, MqttError> {
        match nibble {
            1 => Ok(Self::Connect),
            2 => Ok(Self::Connack),
            3 => Ok(Self::Publish),
            4 => Ok(Self::Puback),
            5 => Ok(Self::Pubrec),
            6 => Ok(Self::Pubrel),
            7 => Ok(Self::Pubcomp),
            8 => Ok(Self::Subscribe),
            9 => Ok(Self::Suback),
            10 => Ok(Self::Unsubscribe),
            11 => Ok(Self::Unsuback),
            12 => Ok(Self::Pingreq),
            13 => Ok(Self::Pingresp),
            14 => Ok(Self::Disconnect),
            _ => Err(MqttError::ControlForbiddenType),
        }
    }

    /// The mandatory flag bit-pattern and mask of bits that must equal it, per MQTT 3.1.1 §2.2.2.
    /// PUBLISH has no fixed requirement (DUP|QoS|RETAIN are free), expressed as mask 0.
    fn flag_mask_and_required(self) -> (u8, u8) {
        match self {
            Self::Pubrel | Self::Subscribe | Self::Unsubscribe => (0x0F, 0b0010),
            Self::Publish => (0x00, 0x00),
            _ => (0x0F, 0b0000),
        }
    }
}

/// The fixed header: control type, 4-bit control flags, and remaining length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedHeader {
    pub control_type: ControlType,
    pub control_flags: u8,
    pub remaining_length: u32,
}

impl FixedHeader {
    pub fn new(control_type: ControlType, control_flags: u8, remaining_length: u32) -> Self {
        Self {
            control_type,
            control_flags,
            remaining_length,
        }
    }

    fn validate(control_type: ControlType, control_flags: u8) -> Result<(), MqttError> {
        let (mask, required) = control_type.flag_mask_and_required();
        if control_flags & mask != required {
            return Err(MqttError::ControlInvalidFlags);
        }
        Ok(())
    }

    /// Reads a fixed header from the start of `buf`. Returns `Ok(0)` on a partial frame (not an
    /// error); `Ok(bytes_consumed)` on success; `Err` on a protocol violation.
    pub fn unpack(buf: &[u8]) -> Result<(usize, Self), MqttError> {
        let Some(&first) = buf.first() else {
            return Ok((0, Self::new(ControlType::Pingreq, 0, 0)));
        };
        let control_flags = first & 0x0F;

        match varint::decode(&buf[1..])? {
            None => Ok((0, Self::new(ControlType::Pingreq, 0, 0))),
            Some((remaining_length, len)) => {
                let control_type = ControlType::from_nibble(first >> 4)?;
                Self::validate(control_type, control_flags)?;
                Ok((1 + len, Self::new(control_type, control_flags, remaining_length)))
            }
        }
    }

    /// Writes the fixed header to the start of `buf`. Returns `Ok(0)` if `buf` is too small
    /// (not an error); `Ok(bytes_written)` on success; `Err` on a protocol violation.
    pub fn pack(&self, buf: &mut [u8]) -> Result<usize, MqttError> {
        Self::validate(self.control_type, self.control_flags)?;

        let mut enc = [0u8; 4];
        let len = varint::encode(self.remaining_length, &mut enc);
        if buf.len() < 1 + len {
            return Ok(0);
        }
        buf[0] = ((self.control_type as u8) << 4) | self.control_flags;
        buf[1..1 + len].copy_from_slice(&enc[..len]);
        Ok(1 + len)
    }
}
