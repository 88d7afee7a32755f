use anyhow::Context;
use driftwatch_dataframe::{Dataset, LinearRegressionModel};
use driftwatch_monitor::{setup_logging, MonitorDriver};
use driftwatch_settings::DriftwatchConfig;
use driftwatch_sql::PostgresClient;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    setup_logging().context("Failed to setup logging")?;

    let config = DriftwatchConfig::default();
    let settings = config.monitor_settings;
    let target = Some(settings.target_column.as_str());

    let reference = Dataset::from_parquet(
        &settings.reference_data_path,
        &settings.categorical_features,
        target,
    )
    .with_context(|| {
        format!(
            "Failed to load reference data from {:?}",
            settings.reference_data_path
        )
    })?;

    let raw = Dataset::from_parquet(&settings.raw_data_path, &settings.categorical_features, target)
        .with_context(|| format!("Failed to load raw data from {:?}", settings.raw_data_path))?;

    let model = LinearRegressionModel::from_path(&settings.model_path)
        .with_context(|| format!("Failed to load model from {:?}", settings.model_path))?;

    let store = PostgresClient::new(None, &config.database_settings)
        .await
        .context("Failed to prepare database")?;

    let mut driver = MonitorDriver::new(reference, raw, Arc::new(model), settings, store)
        .context("Failed to configure drift monitor")?;

    let reports = driver.run().await?;
    info!("Persisted {} drift records", reports.len());

    Ok(())
}
