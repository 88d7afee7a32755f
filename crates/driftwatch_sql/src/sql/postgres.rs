use crate::sql::error::SqlError;
use crate::sql::query::Queries;
use crate::sql::traits::DriftRecordStore;
use async_trait::async_trait;
use driftwatch_settings::DatabaseSettings;
use driftwatch_types::DriftRecord;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, Executor, PgConnection, Pool, Postgres};
use std::str::FromStr;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Clone)]
pub struct PostgresClient {
    pub pool: Pool<Postgres>,
}

impl PostgresClient {
    /// Create a new PostgresClient
    ///
    /// # Arguments
    ///
    /// * `pool` - An optional database pool
    /// * `database_settings` - Connection settings, used when no pool is given
    ///
    /// # Returns
    ///
    /// * `Result<Self, SqlError>` - Client with migrations applied
    pub async fn new(
        pool: Option<Pool<Postgres>>,
        database_settings: &DatabaseSettings,
    ) -> Result<Self, SqlError> {
        let pool = match pool {
            Some(pool) => pool,
            None => Self::create_db_pool(database_settings).await?,
        };

        let client = Self { pool };

        // run migrations
        client.run_migrations().await?;

        Ok(client)
    }

    /// Makes sure the database named in the connection uri exists, creating
    /// it through the admin database when `pg_database` does not list it.
    ///
    /// # Returns
    ///
    /// * `Result<PgConnectOptions, SqlError>` - Options for the target database
    #[instrument(skip(database_settings))]
    pub async fn ensure_database(
        database_settings: &DatabaseSettings,
    ) -> Result<PgConnectOptions, SqlError> {
        let options = PgConnectOptions::from_str(&database_settings.connection_uri)?;
        let database = options
            .get_database()
            .ok_or(SqlError::MissingDatabaseError)?
            .to_string();
        validate_database_name(&database)?;

        let admin_options = options
            .clone()
            .database(&database_settings.admin_database);

        let mut conn = PgConnection::connect_with(&admin_options)
            .await
            .inspect_err(|e| {
                error!("🚨 Failed to connect to admin database {:?}", e);
            })?;

        let exists = sqlx::query(&Queries::DatabaseExists.get_query().sql)
            .bind(&database)
            .fetch_optional(&mut conn)
            .await?
            .is_some();

        if !exists {
            info!("Creating database {}", database);
            // CREATE DATABASE cannot run as a prepared statement
            let create = format!(r#"CREATE DATABASE "{database}""#);
            (&mut conn).execute(create.as_str()).await?;
        }

        conn.close().await?;

        Ok(options)
    }

    /// Setup the application with the given database pool.
    ///
    /// # Returns
    ///
    /// * `Result<Pool<Postgres>, SqlError>` - Result of the database pool
    #[instrument(skip(database_settings))]
    pub async fn create_db_pool(
        database_settings: &DatabaseSettings,
    ) -> Result<Pool<Postgres>, SqlError> {
        let options = Self::ensure_database(database_settings).await?;

        let pool = PgPoolOptions::new()
            .max_connections(database_settings.max_connections)
            .connect_with(options)
            .await
            .inspect_err(|e| {
                error!("🚨 Failed to connect to database {:?}", e);
            })?;

        info!("✅ Successfully connected to database");

        Ok(pool)
    }

    async fn run_migrations(&self) -> Result<(), SqlError> {
        info!("Running migrations");
        sqlx::migrate!("src/migrations").run(&self.pool).await?;

        debug!("Migrations complete");

        Ok(())
    }
}

#[async_trait]
impl DriftRecordStore for PostgresClient {
    #[instrument(skip_all, fields(timestamp = %record.timestamp))]
    async fn insert_drift_record(&self, record: &DriftRecord) -> Result<(), SqlError> {
        let query = Queries::InsertDriftRecord.get_query();
        let mut transaction = self.pool.begin().await?;

        sqlx::query(&query.sql)
            .bind(record.timestamp.naive_utc())
            .bind(record.holiday_drift_score)
            .bind(record.weathersit_drift_score)
            .bind(record.temp_drift_score)
            .bind(record.atemp_drift_score)
            .bind(record.windspeed_drift_score)
            .bind(record.target_drift_score)
            .bind(record.dataset_drift_score)
            .bind(record.imp_var_drift_score)
            .execute(&mut *transaction)
            .await
            .inspect_err(|e| error!("Failed to insert drift record: {:?}", e))?;

        transaction.commit().await?;

        debug!("Inserted drift record");
        Ok(())
    }
}

/// Only plain identifiers are accepted since the name is interpolated into
/// `CREATE DATABASE`.
fn validate_database_name(name: &str) -> Result<(), SqlError> {
    let valid = !name.is_empty()
        && name.len() <= 63
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(SqlError::InvalidDatabaseNameError(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sqlx::Row;

    #[test]
    fn test_validate_database_name() {
        assert!(validate_database_name("drift_monitoring").is_ok());
        assert!(validate_database_name("giskard_monitoring2").is_ok());

        for name in ["", "1db", "drift-monitoring", "db\"; DROP TABLE x; --", "a b"] {
            assert!(matches!(
                validate_database_name(name),
                Err(SqlError::InvalidDatabaseNameError(_))
            ));
        }
    }

    #[test]
    fn test_queries_load() {
        let insert = Queries::InsertDriftRecord.get_query().sql;
        assert!(insert.contains("data_drift_metrics"));
        assert_eq!(insert.matches('$').count(), 9);

        let exists = Queries::DatabaseExists.get_query().sql;
        assert!(exists.contains("pg_database"));
    }

    #[tokio::test]
    #[ignore = "requires a running postgres"]
    async fn test_insert_drift_record() {
        let client = PostgresClient::new(None, &DatabaseSettings::default())
            .await
            .unwrap();

        let timestamp = Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap();
        let mut record = DriftRecord::new(timestamp);
        record.set_target_score(0.123456789);
        record.set_dataset_score(1.0);

        client.insert_drift_record(&record).await.unwrap();

        let row = sqlx::query(
            "SELECT target_drift_score, dataset_drift_score FROM data_drift_metrics WHERE timestamp = $1 ORDER BY target_drift_score DESC LIMIT 1",
        )
        .bind(timestamp.naive_utc())
        .fetch_one(&client.pool)
        .await
        .unwrap();

        let target: f64 = row.get("target_drift_score");
        let dataset: f64 = row.get("dataset_drift_score");
        assert_eq!(target, 0.12346);
        assert_eq!(dataset, 1.0);
    }
}
