pub mod clock;
pub mod driver;
pub mod error;
pub mod logging;

pub use clock::{FixedStepClock, TickClock};
pub use driver::{MonitorDriver, TickReport};
pub use error::MonitorError;
pub use logging::setup_logging;
