/*
    ORNO WE-524, WE-525 and WE-526 single phase meters

    Register list: https://files.orno.pl/support/Others/ORNO/ORWE525_5908254827846/OR-WE-525_rejestry.pdf
*/

use log::debug;

use crate::measurement::Measurement;
use super::{operation::Operation, registers::{RegisterMap, RegisterWidth}, Opcodes, Producer};

pub const MODEL: &str = "ORNO1P525";

const DESCRIPTION: &str = "ORNO WE-525";

use Measurement::*;
use RegisterWidth::{Double, Single};

/* Document addresses, do not reorder */
const REGISTERS: &[(Measurement, u16, RegisterWidth)] = &[
    (Voltage,       0x100, Double), // V
    (Current,       0x102, Double), // A
    (Power,         0x104, Double), // W
    (ApparentPower, 0x106, Double), // VA
    (ReactivePower, 0x108, Double), // var
    (Frequency,     0x10A, Single), // Hz
    (Cosphi,        0x10B, Single),

    (Sum,           0x10E, Double), // Wh
    (ReactiveSum,   0x140, Double), // varh
];

/* Poll cycle: measurement, width, divisor */
const POLL: &[(Measurement, RegisterWidth, f64)] = &[
    (Power,         Double, 1.0),
    (ApparentPower, Double, 1.0),
    (ReactivePower, Double, 10_000_000.0),
    (Frequency,     Single, 10.0),
    (Voltage,       Double, 1000.0),
    (Current,       Double, 1000.0),
    (Cosphi,        Single, 1000.0),
    (ReactiveSum,   Double, 100.0),
    (Sum,           Double, 100.0),
];

pub struct Orno1p525Producer {
    opcodes: Opcodes,
}

impl Orno1p525Producer {
    pub fn new() -> Self {
        debug!("Creating producer for {}", DESCRIPTION);
        Orno1p525Producer { opcodes: Opcodes::new(RegisterMap::new(REGISTERS)) }
    }

    pub fn boxed() -> Box<dyn Producer> {
        Box::new(Self::new())
    }

    pub fn opcodes(&self) -> &Opcodes {
        &self.opcodes
    }
}

impl Default for Orno1p525Producer {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer for Orno1p525Producer {
    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn probe(&self) -> Operation {
        self.opcodes.snip32(Voltage, Some(1000.0))
    }

    fn produce(&self) -> Vec<Operation> {
        self.opcodes.build_all(POLL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meters::operation::FuncCode;

    #[test]
    fn test_description() {
        assert_eq!(Orno1p525Producer::new().description(), "ORNO WE-525");
    }

    #[test]
    fn test_documented_registers() {
        let p = Orno1p525Producer::new();
        let map = p.opcodes().registers();
        assert_eq!(map.len(), REGISTERS.len());

        for (measurement, register) in map.iter() {
            let op = p.opcodes().build(measurement, register.width, None);
            assert_eq!(op.address, register.address, "{measurement:?}");
            assert_eq!(op.read_len, register.width.register_count(), "{measurement:?}");
            assert_eq!(op.func_code, FuncCode::ReadHoldingRegisters);
        }

        assert_eq!(map.address(Voltage).unwrap(), 0x100);
        assert_eq!(map.address(Sum).unwrap(), 0x10E);
        assert_eq!(map.address(ReactiveSum).unwrap(), 0x140);
    }

    #[test]
    #[should_panic(expected = "documented as Single")]
    fn test_frequency_read_as_double_panics() {
        /* would swallow Cosphi at 0x10B */
        Orno1p525Producer::new().opcodes().build(Frequency, Double, Some(10.0));
    }

    #[test]
    fn test_produce_order() {
        let kinds: Vec<Measurement> = Orno1p525Producer::new().produce().iter().map(|op| op.measurement).collect();
        assert_eq!(kinds, vec![
            Power, ApparentPower, ReactivePower, Frequency, Voltage, Current, Cosphi, ReactiveSum, Sum,
        ]);
    }

    #[test]
    fn test_produce_only_mapped_and_documented_widths() {
        let p = Orno1p525Producer::new();
        for op in p.produce() {
            let register = p.opcodes().registers().register(op.measurement).unwrap();
            assert_eq!(op.address, register.address);
            assert_eq!(op.read_len, register.width.register_count());
            assert_eq!(op.transform.width, register.width);
        }
    }

    #[test]
    fn test_produce_is_stable() {
        let p = Orno1p525Producer::new();
        assert_eq!(p.produce(), p.produce());
    }

    #[test]
    fn test_probe_is_part_of_produce() {
        let p = Orno1p525Producer::new();
        let probe = p.probe();
        assert_eq!(probe.measurement, Voltage);

        let matching: Vec<Operation> = p
            .produce()
            .into_iter()
            .filter(|op| op.address == probe.address && op.read_len == probe.read_len)
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0], probe);
    }

    #[test]
    fn test_frequency_and_sum() {
        let ops = Orno1p525Producer::new().produce();

        let freq = ops.iter().find(|op| op.measurement == Frequency).unwrap();
        assert_eq!(freq.address, 0x10A);
        assert_eq!(freq.read_len, 1);
        assert_eq!(freq.transform.scale, 10.0);
        assert_eq!(freq.decode(&500u16.to_be_bytes()).unwrap(), 50.0);

        let sum = ops.iter().find(|op| op.measurement == Sum).unwrap();
        assert_eq!(sum.address, 0x10E);
        assert_eq!(sum.read_len, 2);
        assert_eq!(sum.transform.scale, 100.0);
        assert_eq!(sum.decode(&12345u32.to_be_bytes()).unwrap(), 123.45);
    }

    #[test]
    fn test_scales() {
        let ops = Orno1p525Producer::new().produce();
        let scale = |m: Measurement| ops.iter().find(|op| op.measurement == m).unwrap().transform.scale;

        assert_eq!(scale(Power), 1.0);
        assert_eq!(scale(ApparentPower), 1.0);
        assert_eq!(scale(ReactivePower), 10_000_000.0);
        assert_eq!(scale(Voltage), 1000.0);
        assert_eq!(scale(Current), 1000.0);
        assert_eq!(scale(Cosphi), 1000.0);
        assert_eq!(scale(ReactiveSum), 100.0);
    }

    #[test]
    fn test_concurrent_use() {
        let p = Orno1p525Producer::new();
        let expected = p.produce();
        let probe = p.probe();

        let producer = &p;
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(move |_| {
                    s.spawn(move || {
                        let mut rounds = Vec::new();
                        for _ in 0..100 {
                            rounds.push((producer.probe(), producer.produce(), producer.opcodes().snip16(Frequency, Some(10.0))));
                        }
                        rounds
                    })
                })
                .collect();

            for handle in handles {
                for (pr, ops, freq) in handle.join().unwrap() {
                    assert_eq!(pr, probe);
                    assert_eq!(ops, expected);
                    assert_eq!(freq.address, 0x10A);
                }
            }
        });
    }
}
