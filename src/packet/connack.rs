use crate::error::MqttError;

/// A parsed CONNACK body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Connack {
    pub session_present: bool,
    pub return_code: u8,
}

/// Unpacks a CONNACK body (the two bytes following the fixed header).
pub fn unpack(body: &[u8]) -> Result<Connack, MqttError> {
    if body.len() != 2 {
        return Err(MqttError::MalformedResponse);
    }
    if body[0] & 0xFE != 0 {
        return Err(MqttError::ConnackForbiddenFlags);
    }
    if body[1] > 5 {
        return Err(MqttError::ConnackForbiddenCode);
    }
    Ok(Connack {
        session_present: body[0] & 0x01 != 0,
        return_code: body[1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_clean_connack() {
        let c = unpack(&[0x00, 0x00]).unwrap();
        assert!(!c.session_present);
        assert_eq!(c.return_code, 0);
    }

    #[test]
    fn rejects_reserved_flag_bits() {
        assert_eq!(unpack(&[0x02, 0x00]).unwrap_err(), MqttError::ConnackForbiddenFlags);
    }

    #[test]
    fn rejects_out_of_range_code() {
        assert_eq!(unpack(&[0x00, 0x06]).unwrap_err(), MqttError::ConnackForbiddenCode);
    }
}
