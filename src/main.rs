use anyhow::Context as _;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, LevelFilter};
use serde_json::Value;

use secrets_inventory::config::InventoryConfig;
use secrets_inventory::handler::InventoryHandler;
use secrets_inventory::logging::{initialize_logging, LogContext};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load configuration
    let config = InventoryConfig::from_env().context("Failed to load configuration")?;
    let level = config.level_filter()?;

    // Initialize logging
    initialize_logging(level)?;

    info!("Starting secrets inventory collector (bucket {}, role {})",
          config.inventory_bucket, config.role_name);

    let handler = InventoryHandler::from_config(&config)?;

    run(service_fn(|event: LambdaEvent<Value>| invoke(event, &handler, level))).await
}

/// Run one Lambda invocation with its own logging context
async fn invoke(event: LambdaEvent<Value>, handler: &InventoryHandler, level: LevelFilter) -> Result<Value, Error> {
    let LambdaEvent { payload, context } = event;
    let log = LogContext::new(context.request_id.clone(), level)
        .with_function_arn(context.invoked_function_arn.clone())
        .with_deadline(context.deadline);

    let outcome = handler.handle(&payload, &log).await?;
    Ok(serde_json::to_value(outcome)?)
}
