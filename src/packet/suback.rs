use heapless::Vec;

use crate::buffer::BufReader;
use crate::error::MqttError;
use crate::packet::subscribe::MAX_TOPICS;

/// A parsed SUBACK: packet-id plus one return code per requested topic, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suback {
    pub packet_id: u16,
    pub return_codes: Vec<u8, MAX_TOPICS>,
}

/// Per MQTT 3.1.1 §3.9.3, a per-topic failure.
pub const FAILURE: u8 = 0x80;

pub fn unpack(body: &[u8]) -> Result<Suback, MqttError> {
    if body.len() < 3 {
        return Err(MqttError::MalformedResponse);
    }
    let mut r = BufReader::new(body);
    let packet_id = r.read_u16()?;

    let mut return_codes = Vec::new();
    while r.remaining() > 0 {
        let code = r.read_u8()?;
        if code != FAILURE && code > 2 {
            return Err(MqttError::MalformedResponse);
        }
        return_codes
            .push(code)
            .map_err(|_| MqttError::MalformedResponse)?;
    }

    Ok(Suback {
        packet_id,
        return_codes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_return_codes() {
        let body = [0x00, 0x84, 0x01, 0x80, 0x02];
        let suback = unpack(&body).unwrap();
        assert_eq!(suback.packet_id, 0x0084);
        assert_eq!(suback.return_codes.as_slice(), &[1, 0x80, 2]);
    }

    #[test]
    fn any_failure_code_is_checked_not_only_first() {
        let body = [0x00, 0x01, 0x00, 0x00, 0x80];
        let suback = unpack(&body).unwrap();
        assert!(suback.return_codes.contains(&FAILURE));
    }
}
