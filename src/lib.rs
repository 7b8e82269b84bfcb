//! Modbus register maps and read operations for energy meters
//!
//! Every supported meter model is described by a register table and an ordered
//! list of reads. From those the crate builds the operations a Modbus transport
//! executes, and decodes the returned registers into physical values.

pub mod measurement;
pub mod meters;
pub mod transport;
pub mod config;
pub mod plan;
#[cfg(feature = "frame")]
pub mod frame;

// Re-export common types for easier access
pub use measurement::Measurement;
pub use meters::{MeterError, Opcodes, Producer, Result};
pub use meters::operation::{FuncCode, Operation, Transform};
pub use meters::registers::{Register, RegisterMap, RegisterWidth};
pub use meters::registry::Registry;
pub use transport::{Reading, Transport};
pub use config::MeterConfig;
pub use plan::PollPlan;
#[cfg(feature = "frame")]
pub use frame::StreamTransport;
