use log::debug;
use serde::Serialize;

use crate::{measurement::Measurement, meters::{operation::Operation, Producer, Result}};

/// The bus side of the framework.
///
/// An implementation issues the operation's function code, address and length
/// against the device `unit_id` and hands back the register payload, big endian,
/// without any framing.
pub trait Transport {
    fn read(&mut self, unit_id: u8, op: &Operation) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub measurement: Measurement,
    pub value: f64,
}

fn execute<T: Transport + ?Sized>(transport: &mut T, unit_id: u8, op: &Operation) -> Result<Reading> {
    let bytes = transport.read(unit_id, op)?;
    /* decode rejects a payload that does not match read_len */
    let value = op.decode(&bytes)?;
    debug!("Unit {unit_id} {} = {value}", op.measurement);
    return Ok(Reading { measurement: op.measurement, value });
}

/// Runs the producer's probe against a unit.
pub fn probe_device<T: Transport + ?Sized>(transport: &mut T, unit_id: u8, producer: &dyn Producer) -> Result<Reading> {
    debug!("Probing unit {unit_id} as {}", producer.description());
    execute(transport, unit_id, &producer.probe())
}

/// Reads one full poll cycle, stopping at the first failing operation.
pub fn read_cycle<T: Transport + ?Sized>(transport: &mut T, unit_id: u8, producer: &dyn Producer) -> Result<Vec<Reading>> {
    let ops = producer.produce();
    let mut readings = Vec::with_capacity(ops.len());

    for op in ops.iter() {
        readings.push(execute(transport, unit_id, op)?);
    }

    debug!("Unit {unit_id} cycle done with {} readings", readings.len());
    Ok(readings)
}
