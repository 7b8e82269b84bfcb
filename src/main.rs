use log::{error, info};
use meter_ops::{config::DEFAULT_CONFIG_PATH, MeterConfig, PollPlan, Registry};
use std::{env, process};

fn run(config_path: &str) -> meter_ops::Result<()> {
    let registry = Registry::with_defaults();
    info!("Known meter models: {}", registry.models().join(", "));

    let config = MeterConfig::load(config_path)?;
    config.validate(&registry)?;

    if config.devices.is_empty() {
        info!("No devices configured in {config_path}");
    }

    for dev in config.devices.iter() {
        let plan = PollPlan::for_device(&registry, dev)?;
        println!("{}", plan.to_json()?);
    }

    Ok(())
}

fn main() {
    // Initialize logging
    let default_filter = env::var("METER_OPS_LOG_LEVEL").unwrap_or("info".to_string());
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    let config_path = env::args().nth(1).unwrap_or(DEFAULT_CONFIG_PATH.to_string());

    if let Err(e) = run(&config_path) {
        error!("{e}");
        process::exit(1);
    }
}
