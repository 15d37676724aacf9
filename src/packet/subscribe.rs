//! SUBSCRIBE packer.

use heapless::Vec;

use crate::buffer::BufWriter;
use crate::error::MqttError;
use crate::header::{ControlType, FixedHeader};
use crate::qos::QoS;

pub const MAX_TOPICS: usize = 8;

pub type TopicFilters<'a> = Vec<(&'a str, QoS), MAX_TOPICS>;

/// Packs a SUBSCRIBE request for up to [`MAX_TOPICS`] `(topic, max_qos)` pairs.
pub fn pack(buf: &mut [u8], packet_id: u16, topics: &[(&str, QoS)]) -> Result<usize, MqttError> {
    if topics.len() > MAX_TOPICS {
        return Err(MqttError::SubscribeTooManyTopics);
    }

    let mut remaining_length = 2;
    for (topic, _) in topics {
        remaining_length += 2 + topic.len() + 1;
    }

    let header = FixedHeader::new(ControlType::Subscribe, 0b0010, remaining_length as u32);
    let header_len = header.pack(buf)?;
    if header_len == 0 {
        return Ok(0);
    }

    let mut w = BufWriter::new(&mut buf[header_len..]);
    if !w.write_u16(packet_id) {
        return Ok(0);
    }
    for (topic, qos) in topics {
        if !(w.write_str(topic) && w.write_u8(qos.into_bits())) {
            return Ok(0);
        }
    }
    Ok(header_len + w.position())
}
