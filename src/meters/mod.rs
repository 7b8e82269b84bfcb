use log::debug;
use thiserror::Error;

use crate::measurement::Measurement;
use operation::{Operation, Transform};
use registers::{RegisterMap, RegisterWidth};

pub mod operation;
pub mod registers;
pub mod registry;
pub mod orno1p525;

#[derive(Error, Debug)]
pub enum MeterError {
    #[error("Measurement {0:?} is not supported by this meter")]
    UnsupportedMeasurement(Measurement),
    #[error("Measurement {measurement:?} is documented as {documented:?} register(s), not {requested:?}")]
    WidthMismatch {
        measurement: Measurement,
        documented: RegisterWidth,
        requested: RegisterWidth,
    },
    #[error("Malformed response for {measurement:?}: expected {expected} bytes, got {actual}")]
    MalformedResponse {
        measurement: Measurement,
        expected: usize,
        actual: usize,
    },
    #[error("Unknown meter model {0}")]
    UnknownModel(String),
    #[error("Modbus frame error: {0}")]
    Frame(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MeterError>;

/// A device model as seen by the polling framework.
pub trait Producer: Send + Sync {
    /// Human readable model name
    fn description(&self) -> &str;

    /// Single read used to check that the device answers before polling starts.
    /// It is always one of the operations returned by [`Producer::produce`].
    fn probe(&self) -> Operation;

    /// All reads of one poll cycle in a fixed order.
    fn produce(&self) -> Vec<Operation>;
}

/// Builds read operations from a model's register map.
#[derive(Debug, Clone)]
pub struct Opcodes {
    map: RegisterMap,
}

impl Opcodes {
    pub fn new(map: RegisterMap) -> Self {
        Opcodes { map }
    }

    pub fn registers(&self) -> &RegisterMap {
        &self.map
    }

    pub fn try_build(&self, measurement: Measurement, width: RegisterWidth, scale: Option<f64>) -> Result<Operation> {
        let register = self.map.register(measurement)?;
        if register.width != width {
            return Err(MeterError::WidthMismatch { measurement, documented: register.width, requested: width });
        }

        let transform = match scale {
            Some(scale) => Transform::scaled(width, scale),
            None => Transform::new(width),
        };

        return Ok(Operation::new(measurement, register.address, transform));
    }

    /// Like [`Opcodes::try_build`], but an unmapped measurement or a width other
    /// than the documented one is a bug in the calling producer and panics.
    pub fn build(&self, measurement: Measurement, width: RegisterWidth, scale: Option<f64>) -> Operation {
        match self.try_build(measurement, width, scale) {
            Ok(op) => op,
            Err(e) => panic!("{e}"),
        }
    }

    /// Single register read
    pub fn snip16(&self, measurement: Measurement, scale: Option<f64>) -> Operation {
        self.build(measurement, RegisterWidth::Single, scale)
    }

    /// Double register read
    pub fn snip32(&self, measurement: Measurement, scale: Option<f64>) -> Operation {
        self.build(measurement, RegisterWidth::Double, scale)
    }

    /// Builds a list of `(measurement, width, scale)` rows in their given order.
    pub fn build_all(&self, rows: &[(Measurement, RegisterWidth, f64)]) -> Vec<Operation> {
        let ops: Vec<Operation> = rows
            .iter()
            .map(|(measurement, width, scale)| self.build(*measurement, *width, Some(*scale)))
            .collect();
        debug!("Built {} operations", ops.len());
        ops
    }
}
