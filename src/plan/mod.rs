use log::info;
use serde::Serialize;

use crate::{config::DeviceConfig, meters::{operation::Operation, registry::Registry, Result}};

#[derive(Debug, Clone, Serialize)]
pub struct PlannedOperation {
    #[serde(flatten)]
    pub operation: Operation,
    /// Encoded request frame, hex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
}

/// Everything a transport needs to poll one configured device.
#[derive(Debug, Clone, Serialize)]
pub struct PollPlan {
    pub device: String,
    pub model: String,
    pub description: String,
    pub slave_id: u8,
    pub probe: PlannedOperation,
    pub operations: Vec<PlannedOperation>,
}

#[cfg(feature = "frame")]
fn plan_operation(dev: &DeviceConfig, operation: Operation) -> Result<PlannedOperation> {
    let frame = crate::frame::RequestFrame::new(dev.slave_id, dev.proto, &operation)?;
    Ok(PlannedOperation { operation, request: Some(frame.to_hex()) })
}

#[cfg(not(feature = "frame"))]
fn plan_operation(_dev: &DeviceConfig, operation: Operation) -> Result<PlannedOperation> {
    Ok(PlannedOperation { operation, request: None })
}

impl PollPlan {
    pub fn for_device(registry: &Registry, dev: &DeviceConfig) -> Result<Self> {
        let producer = registry.create(&dev.meter)?;

        let probe = plan_operation(dev, producer.probe())?;
        let operations = producer
            .produce()
            .into_iter()
            .map(|op| plan_operation(dev, op))
            .collect::<Result<Vec<_>>>()?;

        info!("Device {} ({}) polls {} registers", dev.name, producer.description(), operations.len());

        return Ok(PollPlan {
            device: dev.name.clone(),
            model: dev.meter.to_uppercase(),
            description: producer.description().to_string(),
            slave_id: dev.slave_id,
            probe,
            operations,
        });
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
