use core::str;

use crate::error::MqttError;

/// Reads big-endian integers, MQTT strings, and binary data from a byte slice, tracking a
/// cursor. Every read that would run past the end of the slice reports `MalformedResponse`.
pub struct BufReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> BufReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn read_u8(&mut self) -> Result<u8, MqttError> {
        let byte = *self
            .buffer
            .get(self.position)
            .ok_or(MqttError::MalformedResponse)?;
        self.position += 1;
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> Result<u16, MqttError> {
        let end = self.position + 2;
        let bytes = self
            .buffer
            .get(self.position..end)
            .ok_or(MqttError::MalformedResponse)?;
        self.position = end;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Reads an MQTT string: a two-byte big-endian length followed by that many UTF-8 bytes.
    pub fn read_str(&mut self) -> Result<&'a str, MqttError> {
        let len = self.read_u16()? as usize;
        let end = self.position + len;
        let bytes = self
            .buffer
            .get(self.position..end)
            .ok_or(MqttError::MalformedResponse)?;
        self.position = end;
        str::from_utf8(bytes).map_err(|_| MqttError::MalformedResponse)
    }

    /// Reads the remaining bytes of the frame, i.e. everything up to `remaining_length` bytes
    /// already accounted for by the caller (the payload of a PUBLISH).
    pub fn read_remaining(&mut self, len: usize) -> Result<&'a [u8], MqttError> {
        let end = self.position + len;
        let bytes = self
            .buffer
            .get(self.position..end)
            .ok_or(MqttError::MalformedResponse)?;
        self.position = end;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_scalars() {
        let buf = [0x00, 0x78, 0x01];
        let mut r = BufReader::new(&buf);
        assert_eq!(r.read_u16().unwrap(), 120);
        assert_eq!(r.read_u8().unwrap(), 1);
    }

    #[test]
    fn reads_mqtt_string() {
        let buf = [0x00, 0x03, b'a', b'/', b'b'];
        let mut r = BufReader::new(&buf);
        assert_eq!(r.read_str().unwrap(), "a/b");
    }

    #[test]
    fn short_buffer_is_malformed() {
        let buf = [0x00];
        let mut r = BufReader::new(&buf);
        assert_eq!(r.read_u16().unwrap_err(), MqttError::MalformedResponse);
    }
}
