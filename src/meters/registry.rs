use std::collections::BTreeMap;
use log::{debug, warn};

use super::{orno1p525, MeterError, Producer, Result};

pub type ProducerFactory = fn() -> Box<dyn Producer>;

/// Maps model names to producer constructors.
///
/// Names are matched case insensitive. The registry is built during start up and
/// handed to whoever needs to create producers.
#[derive(Default)]
pub struct Registry {
    factories: BTreeMap<String, ProducerFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Registry { factories: BTreeMap::new() }
    }

    /// Registry with every model shipped in this crate
    pub fn with_defaults() -> Self {
        let mut registry = Registry::new();
        registry.register(orno1p525::MODEL, orno1p525::Orno1p525Producer::boxed);
        registry
    }

    /// Adds a model, replacing and returning an earlier factory of the same name.
    pub fn register(&mut self, model: &str, factory: ProducerFactory) -> Option<ProducerFactory> {
        let key = model.to_uppercase();
        debug!("Registering meter model {key}");

        let previous = self.factories.insert(key, factory);
        if previous.is_some() {
            warn!("Meter model {model} was registered twice, using the latest one");
        }
        previous
    }

    pub fn create(&self, model: &str) -> Result<Box<dyn Producer>> {
        match self.factories.get(&model.to_uppercase()) {
            Some(factory) => Ok(factory()),
            None => Err(MeterError::UnknownModel(model.to_string())),
        }
    }

    pub fn contains(&self, model: &str) -> bool {
        self.factories.contains_key(&model.to_uppercase())
    }

    /// Registered model names, sorted
    pub fn models(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}
