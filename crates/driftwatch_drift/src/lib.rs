pub mod aggregator;
pub mod error;
pub mod selector;
pub mod stats;
pub mod suite;

pub use aggregator::{dataset_drift, DatasetDriftResult, DEFAULT_PASS_RATE_THRESHOLD};
pub use error::DriftError;
pub use selector::{select_test, select_test_kind, DEFAULT_SIZE_THRESHOLD};
pub use suite::{DriftSuite, DriftTest, SuiteResult};
