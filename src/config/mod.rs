use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::meters::{registry::Registry, MeterError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config/meters.yaml";

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub enum ModbusProtoConfig {
    TCP,
    RTU,
    RTUoverTCP
}

fn device_slave_id_default() -> u8 { return 1 }
fn device_proto_default() -> ModbusProtoConfig { return ModbusProtoConfig::TCP }

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct DeviceConfig {
    pub name: String,
    /// Registered model name, e.g. ORNO1P525
    pub meter: String,
    #[serde(default="device_slave_id_default")]
    pub slave_id: u8,
    #[serde(default="device_proto_default")]
    pub proto: ModbusProtoConfig,
}

fn devices_default() -> Vec<DeviceConfig> { return Vec::new() }

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct MeterConfig {
    #[serde(default="devices_default")]
    pub devices: Vec<DeviceConfig>,
}

impl MeterConfig {
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: MeterConfig = serde_yml::from_str(contents)
            .map_err(|e| MeterError::Config(format!("failed to parse: {e}")))?;
        debug!("Parsed configuration with {} devices", config.devices.len());
        return Ok(config);
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        return Self::from_yaml(&contents);
    }

    /// Checks that every device names a known model, uses a valid slave id
    /// and has a unique name.
    pub fn validate(&self, registry: &Registry) -> Result<()> {
        let mut names = HashSet::new();

        for dev in self.devices.iter() {
            if !names.insert(dev.name.as_str()) {
                return Err(MeterError::Config(format!("device {} is configured twice", dev.name)));
            }

            /* 0 is broadcast, 248 and above are reserved */
            if dev.slave_id == 0 || dev.slave_id > 247 {
                return Err(MeterError::Config(format!("device {} has invalid slave id {}", dev.name, dev.slave_id)));
            }

            if !registry.contains(&dev.meter) {
                return Err(MeterError::UnknownModel(dev.meter.clone()));
            }
        }

        Ok(())
    }
}
