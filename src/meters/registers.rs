use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::measurement::Measurement;
use super::{MeterError, Result};

/// Number of consecutive holding registers a value occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegisterWidth {
    /// One 16 bit register
    Single,
    /// Two registers read as one big endian 32 bit value
    Double,
}

impl RegisterWidth {
    pub fn register_count(&self) -> u16 {
        match self {
            RegisterWidth::Single => 1,
            RegisterWidth::Double => 2,
        }
    }

    pub fn byte_count(&self) -> usize {
        return self.register_count() as usize * 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Register {
    pub address: u16,
    pub width: RegisterWidth,
}

/// Measurement to register table of a single device model.
///
/// The map is filled once from the datasheet table and is read only afterwards.
/// Every model owns its own map, even when addresses happen to match another model.
#[derive(Debug, Clone)]
pub struct RegisterMap {
    registers: BTreeMap<Measurement, Register>,
}

impl RegisterMap {
    /// Builds the map from `(measurement, address, width)` rows.
    ///
    /// Panics if a measurement is listed twice, a broken table must not ship.
    pub fn new(table: &[(Measurement, u16, RegisterWidth)]) -> Self {
        let mut registers = BTreeMap::new();
        for (measurement, address, width) in table {
            let previous = registers.insert(*measurement, Register { address: *address, width: *width });
            assert!(previous.is_none(), "register table lists {measurement:?} twice");
        }

        return RegisterMap { registers };
    }

    pub fn register(&self, measurement: Measurement) -> Result<Register> {
        self.registers
            .get(&measurement)
            .copied()
            .ok_or(MeterError::UnsupportedMeasurement(measurement))
    }

    pub fn address(&self, measurement: Measurement) -> Result<u16> {
        return Ok(self.register(measurement)?.address);
    }

    pub fn contains(&self, measurement: Measurement) -> bool {
        self.registers.contains_key(&measurement)
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    /// Entries ordered by measurement.
    pub fn iter(&self) -> impl Iterator<Item = (Measurement, Register)> + '_ {
        self.registers.iter().map(|(m, r)| (*m, *r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RegisterMap {
        RegisterMap::new(&[
            (Measurement::Voltage, 0x100, RegisterWidth::Double),
            (Measurement::Frequency, 0x10A, RegisterWidth::Single),
        ])
    }

    #[test]
    fn test_width_counts() {
        assert_eq!(RegisterWidth::Single.register_count(), 1);
        assert_eq!(RegisterWidth::Double.register_count(), 2);
        assert_eq!(RegisterWidth::Single.byte_count(), 2);
        assert_eq!(RegisterWidth::Double.byte_count(), 4);
    }

    #[test]
    fn test_lookup() {
        let map = sample();
        assert_eq!(map.len(), 2);
        assert_eq!(map.address(Measurement::Voltage).unwrap(), 0x100);
        assert_eq!(map.register(Measurement::Frequency).unwrap().width, RegisterWidth::Single);
        assert!(map.contains(Measurement::Frequency));
        assert!(!map.contains(Measurement::Sum));
    }

    #[test]
    fn test_unmapped_measurement_is_an_error() {
        let map = sample();
        match map.address(Measurement::Sum) {
            Err(MeterError::UnsupportedMeasurement(m)) => assert_eq!(m, Measurement::Sum),
            other => panic!("expected UnsupportedMeasurement, got {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "twice")]
    fn test_duplicate_rows_panic() {
        RegisterMap::new(&[
            (Measurement::Voltage, 0x100, RegisterWidth::Double),
            (Measurement::Voltage, 0x102, RegisterWidth::Double),
        ]);
    }

    #[test]
    fn test_iter_is_ordered_by_measurement() {
        let kinds: Vec<Measurement> = sample().iter().map(|(m, _)| m).collect();
        assert_eq!(kinds, vec![Measurement::Frequency, Measurement::Voltage]);
    }
}
