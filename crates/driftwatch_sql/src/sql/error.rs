use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqlError {
    #[error(transparent)]
    SqlxError(#[from] SqlxError),

    #[error("Failed to run migrations")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Connection uri does not name a database")]
    MissingDatabaseError,

    #[error("Invalid database name: {0}")]
    InvalidDatabaseNameError(String),
}
