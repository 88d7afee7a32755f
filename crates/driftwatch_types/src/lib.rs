pub mod column;
pub mod error;
pub mod record;

pub use column::*;
pub use error::TypeError;
pub use record::*;
pub use test::*;
