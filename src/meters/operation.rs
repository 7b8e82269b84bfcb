use log::warn;
use serde::Serialize;

use crate::measurement::Measurement;
use super::{registers::RegisterWidth, MeterError, Result};

/// Modbus function codes a producer may ask the transport to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FuncCode {
    ReadHoldingRegisters,
}

impl FuncCode {
    pub fn code(&self) -> u8 {
        match self {
            FuncCode::ReadHoldingRegisters => 0x03,
        }
    }
}

/// Decodes one 16 bit big endian register
pub fn rtu_uint16_to_f64(bytes: [u8; 2]) -> f64 {
    return u16::from_be_bytes(bytes) as f64;
}

/// Decodes two registers as one 32 bit big endian value, high word first
pub fn rtu_uint32_to_f64(bytes: [u8; 4]) -> f64 {
    return u32::from_be_bytes(bytes) as f64;
}

/// Decode step of an operation: an unsigned integer of `width`, divided by `scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub width: RegisterWidth,
    pub scale: f64,
}

impl Transform {
    pub fn new(width: RegisterWidth) -> Self {
        Transform { width, scale: 1.0 }
    }

    /// Panics on a zero, negative or non finite divisor.
    pub fn scaled(width: RegisterWidth, scale: f64) -> Self {
        assert!(scale.is_finite() && scale > 0.0, "invalid scale divisor {scale}");
        Transform { width, scale }
    }

    /// Runs the decode on the register bytes of a response.
    ///
    /// The bytes must be exactly what `width` covers, anything else is reported as
    /// a malformed response for `measurement`.
    pub fn decode(&self, measurement: Measurement, bytes: &[u8]) -> Result<f64> {
        let raw = match (self.width, bytes) {
            (RegisterWidth::Single, [a, b]) => rtu_uint16_to_f64([*a, *b]),
            (RegisterWidth::Double, [a, b, c, d]) => rtu_uint32_to_f64([*a, *b, *c, *d]),
            _ => {
                return Err(MeterError::MalformedResponse {
                    measurement,
                    expected: self.width.byte_count(),
                    actual: bytes.len(),
                })
            }
        };

        return Ok(raw / self.scale);
    }
}

/// A single read the transport has to perform and how to interpret its answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub func_code: FuncCode,
    pub address: u16,
    pub read_len: u16,
    pub measurement: Measurement,
    pub transform: Transform,
}

impl Operation {
    pub fn new(measurement: Measurement, address: u16, transform: Transform) -> Self {
        Operation {
            func_code: FuncCode::ReadHoldingRegisters,
            address,
            read_len: transform.width.register_count(),
            measurement,
            transform,
        }
    }

    /// Bytes a well formed response carries for this operation.
    pub fn byte_count(&self) -> usize {
        return self.read_len as usize * 2;
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<f64> {
        let value = self.transform.decode(self.measurement, bytes);
        if let Err(e) = &value {
            warn!("Register 0x{:04X} ({}): {}", self.address, self.measurement, e);
        }
        value
    }
}
