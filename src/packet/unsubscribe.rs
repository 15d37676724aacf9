//! UNSUBSCRIBE packer.

use crate::buffer::BufWriter;
use crate::error::MqttError;
use crate::header::{ControlType, FixedHeader};
use crate::packet::subscribe::MAX_TOPICS;

/// Packs an UNSUBSCRIBE request for up to [`MAX_TOPICS`] topic filters.
pub fn pack(buf: &mut [u8], packet_id: u16, topics: &[&str]) -> Result<usize, MqttError> {
    if topics.len() > MAX_TOPICS {
        return Err(MqttError::UnsubscribeTooManyTopics);
    }

    let mut remaining_length = 2;
    for topic in topics {
        remaining_length += 2 + topic.len();
    }

    let header = FixedHeader::new(ControlType::Unsubscribe, 0b0010, remaining_length as u32);
    let header_len = header.pack(buf)?;
    if header_len == 0 {
        return Ok(0);
    }

    let mut w = BufWriter::new(&mut buf[header_len..]);
    if !w.write_u16(packet_id) {
        return Ok(0);
    }
    for topic in topics {
        if !w.write_str(topic) {
            return Ok(0);
        }
    }
    Ok(header_len + w.position())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_two_topics() {
        let mut buf = [0u8; 32];
        let n = pack(&mut buf, 9, &["a", "bb"]).unwrap();
        assert_eq!(buf[0], 0xA2);
        assert_eq!(&buf[2..n], &[0x00, 0x09, 0x00, 0x01, b'a', 0x00, 0x02, b'b', b'b']);
    }

    #[test]
    fn rejects_too_many_topics() {
        let topics = ["t"; 9];
        let mut buf = [0u8; 64];
        assert_eq!(
            pack(&mut buf, 1, &topics).unwrap_err(),
            MqttError::UnsubscribeTooManyTopics
        );
    }
}
