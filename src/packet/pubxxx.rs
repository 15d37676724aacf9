//! PUBACK, PUBREC, PUBREL, and PUBCOMP share an identical two-byte body (packet-id only), so
//! one pack/unpack pair serves all four; the fixed header's control type and flags are supplied
//! by the caller (PUBREL requires flags 0b0010, the others 0b0000, per `ControlType`).

use crate::buffer::{BufReader, BufWriter};
use crate::error::MqttError;
use crate::header::{ControlType, FixedHeader};

/// Packs a two-byte packet-id-only body behind a fixed header of `control_type`.
pub fn pack(buf: &mut [u8], control_type: ControlType, packet_id: u16) -> Result<usize, MqttError> {
    let control_flags = if control_type == ControlType::Pubrel { 0b0010 } else { 0 };
    let header = FixedHeader::new(control_type, control_flags, 2);
    let header_len = header.pack(buf)?;
    if header_len == 0 {
        return Ok(0);
    }
    let mut w = BufWriter::new(&mut buf[header_len..]);
    if !w.write_u16(packet_id) {
        return Ok(0);
    }
    Ok(header_len + w.position())
}

/// Unpacks a two-byte packet-id-only body.
pub fn unpack(body: &[u8]) -> Result<u16, MqttError> {
    if body.len() != 2 {
        return Err(MqttError::MalformedResponse);
    }
    BufReader::new(body).read_u16()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_5_puback_round_trip() {
        let mut buf = [0u8; 8];
        let n = pack(&mut buf, ControlType::Puback, 213).unwrap();
        assert_eq!(&buf[..n], &[0x40, 0x02, 0x00, 0xD5]);
        assert_eq!(unpack(&buf[2..n]).unwrap(), 213);
    }

    #[test]
    fn pubrel_carries_mandatory_flags() {
        let mut buf = [0u8; 8];
        pack(&mut buf, ControlType::Pubrel, 1).unwrap();
        assert_eq!(buf[0] & 0x0F, 0b0010);
    }

    #[test]
    fn wrong_body_length_is_malformed() {
        assert_eq!(unpack(&[0x00]).unwrap_err(), MqttError::MalformedResponse);
    }
}
