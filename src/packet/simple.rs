//! PINGREQ, PINGRESP, and DISCONNECT: fixed header only, no body.

use crate::error::MqttError;
use crate::header::{ControlType, FixedHeader};

pub fn pack(buf: &mut [u8], control_type: ControlType) -> Result<usize, MqttError> {
    FixedHeader::new(control_type, 0, 0).pack(buf)
}
