//! Quality-of-service levels.
//!
//! Grounded on the teacher's `types::qos::QoS`, trimmed to the three levels MQTT 3.1.1 permits
//! on the wire (the value 3 is always a protocol violation, never a variant here).

use crate::error::MqttError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QoS {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

impl QoS {
    pub fn from_bits(bits: u8) -> Result<Self, MqttError> {
        match bits {
            0 => Ok(Self::AtMostOnce),
            1 => Ok(Self::AtLeastOnce),
            2 => Ok(Self::ExactlyOnce),
            _ => Err(MqttError::PublishForbiddenQos),
        }
    }

    pub fn into_bits(self) -> u8 {
        self as u8
    }
}
