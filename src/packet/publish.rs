//! PUBLISH packer and unpacker.
//!
//! Grounded on the wire layout implied by the teacher's `packet::mqtt_packet::Packet` trait
//! shape, reworked around `BufReader`/`BufWriter`. The packet-id field is written and read
//! unconditionally regardless of QoS, per Open Question 1 (see DESIGN.md).

use crate::buffer::{BufReader, BufWriter};
use crate::error::MqttError;
use crate::header::{ControlType, FixedHeader};
use crate::qos::QoS;

const FLAG_RETAIN: u8 = 0b0001;
const FLAG_QOS_SHIFT: u8 = 1;
const FLAG_QOS_MASK: u8 = 0b0110;
const FLAG_DUP: u8 = 0b1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PublishRequest<'a> {
    pub topic: &'a str,
    pub packet_id: u16,
    pub payload: &'a [u8],
    pub qos: QoS,
    pub retain: bool,
    pub dup: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Publish<'a> {
    pub topic: &'a str,
    pub packet_id: u16,
    pub payload: &'a [u8],
    pub qos: QoS,
    pub retain: bool,
    pub dup: bool,
}

/// Packs a PUBLISH request. Returns `Ok(0)` if `buf` is too small, `Err` on a protocol
/// violation, `Ok(bytes_written)` on success.
pub fn pack(buf: &mut [u8], req: &PublishRequest) -> Result<usize, MqttError> {
    let dup = if req.qos == QoS::AtMostOnce { false } else { req.dup };

    let mut flags = 0u8;
    if req.retain {
        flags |= FLAG_RETAIN;
    }
    flags |= req.qos.into_bits() << FLAG_QOS_SHIFT;
    if dup {
        flags |= FLAG_DUP;
    }

    let remaining_length = 2 + req.topic.len() + 2 + req.payload.len();

    let header = FixedHeader::new(ControlType::Publish, flags, remaining_length as u32);
    let header_len = header.pack(buf)?;
    if header_len == 0 {
        return Ok(0);
    }

    let mut w = BufWriter::new(&mut buf[header_len..]);
    let ok = w.write_str(req.topic) && w.write_u16(req.packet_id) && w.write_bytes(req.payload);

    if !ok {
        return Ok(0);
    }
    Ok(header_len + w.position())
}

/// Unpacks a PUBLISH body given the fixed header's flags and remaining length.
pub fn unpack<'a>(
    control_flags: u8,
    remaining_length: u32,
    body: &'a [u8],
) -> Result<Publish<'a>, MqttError> {
    let retain = control_flags & FLAG_RETAIN != 0;
    let dup = control_flags & FLAG_DUP != 0;
    let qos = QoS::from_bits((control_flags & FLAG_QOS_MASK) >> FLAG_QOS_SHIFT)
        .map_err(|_| MqttError::ControlInvalidFlags)?;

    let mut r = BufReader::new(body);
    let topic = r.read_str()?;
    let packet_id = r.read_u16()?;

    let consumed = r.position();
    let remaining = remaining_length as usize;
    if consumed > remaining {
        return Err(MqttError::MalformedResponse);
    }
    let payload = r.read_remaining(remaining - consumed)?;

    Ok(Publish {
        topic,
        packet_id,
        payload,
        qos,
        retain,
        dup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_3_publish_retain_qos0() {
        // packet_id=23 is packed and read back even at QoS 0, per Open Question 1 (DESIGN.md):
        // the original always writes htons(packet_id) with no QoS check, so this crate matches
        // that wire image rather than the MQTT 3.1.1 spec's "omit it at QoS 0" reading.
        let req = PublishRequest {
            topic: "topic1",
            packet_id: 23,
            payload: b"0123456789",
            qos: QoS::AtMostOnce,
            retain: true,
            dup: false,
        };
        let mut buf = [0u8; 64];
        let n = pack(&mut buf, &req).unwrap();
        assert_eq!(
            &buf[..n],
            &[
                0x31, 0x14, 0x00, 0x06, b't', b'o', b'p', b'i', b'c', b'1', 0x00, 0x17, b'0',
                b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9',
            ]
        );

        let header_len = 2;
        let parsed = unpack(0x01, 0x14, &buf[header_len..n]).unwrap();
        assert_eq!(parsed.qos, QoS::AtMostOnce);
        assert!(parsed.retain);
        assert!(!parsed.dup);
        assert_eq!(parsed.topic, "topic1");
        assert_eq!(parsed.packet_id, 23);
        assert_eq!(parsed.payload.len(), 10);
    }

    #[test]
    fn qos1_round_trip_carries_packet_id() {
        let req = PublishRequest {
            topic: "a/b",
            packet_id: 42,
            payload: b"hi",
            qos: QoS::AtLeastOnce,
            retain: false,
            dup: false,
        };
        let mut buf = [0u8; 32];
        let n = pack(&mut buf, &req).unwrap();
        let flags = buf[0] & 0x0F;
        let parsed = unpack(flags, (n - 2) as u32, &buf[2..n]).unwrap();
        assert_eq!(parsed.packet_id, 42);
        assert_eq!(parsed.payload, b"hi");
    }

    #[test]
    fn unpack_rejects_forbidden_qos_bits() {
        // control_flags QoS bits == 3 is a protocol violation on the wire.
        let err = unpack(0b0110, 2, &[0x00, 0x01, b'a']).unwrap_err();
        assert_eq!(err, MqttError::ControlInvalidFlags);
    }
}
