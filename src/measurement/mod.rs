use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical quantities a meter can report.
///
/// The set is shared by every device model so readings coming from different
/// producers carry the same tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Measurement {
    Frequency,

    Voltage,
    VoltageL1,
    VoltageL2,
    VoltageL3,

    Current,
    CurrentL1,
    CurrentL2,
    CurrentL3,

    Power,
    PowerL1,
    PowerL2,
    PowerL3,
    ReactivePower,
    ApparentPower,
    Cosphi,

    Sum,
    ReactiveSum,
    Import,
    Export,
}

impl Measurement {
    pub fn description(&self) -> &'static str {
        match self {
            Measurement::Frequency => "Frequency",
            Measurement::Voltage => "Voltage",
            Measurement::VoltageL1 => "L1 Voltage",
            Measurement::VoltageL2 => "L2 Voltage",
            Measurement::VoltageL3 => "L3 Voltage",
            Measurement::Current => "Current",
            Measurement::CurrentL1 => "L1 Current",
            Measurement::CurrentL2 => "L2 Current",
            Measurement::CurrentL3 => "L3 Current",
            Measurement::Power => "Power",
            Measurement::PowerL1 => "L1 Power",
            Measurement::PowerL2 => "L2 Power",
            Measurement::PowerL3 => "L3 Power",
            Measurement::ReactivePower => "Reactive Power",
            Measurement::ApparentPower => "Apparent Power",
            Measurement::Cosphi => "Cosphi",
            Measurement::Sum => "Total Sum",
            Measurement::ReactiveSum => "Total Reactive Energy",
            Measurement::Import => "Import",
            Measurement::Export => "Export",
        }
    }

    /// Unit of the decoded value, empty for dimensionless quantities.
    pub fn unit(&self) -> &'static str {
        match self {
            Measurement::Frequency => "Hz",
            Measurement::Voltage
            | Measurement::VoltageL1
            | Measurement::VoltageL2
            | Measurement::VoltageL3 => "V",
            Measurement::Current
            | Measurement::CurrentL1
            | Measurement::CurrentL2
            | Measurement::CurrentL3 => "A",
            Measurement::Power
            | Measurement::PowerL1
            | Measurement::PowerL2
            | Measurement::PowerL3 => "W",
            Measurement::ReactivePower => "var",
            Measurement::ApparentPower => "VA",
            Measurement::Cosphi => "",
            Measurement::Sum | Measurement::Import | Measurement::Export => "Wh",
            Measurement::ReactiveSum => "varh",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.unit();
        if unit.is_empty() {
            return f.write_str(self.description());
        }
        write!(f, "{} ({})", self.description(), unit)
    }
}
