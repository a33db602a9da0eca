pub mod error;
pub mod status;
pub mod traits;
pub mod value;

pub use error::{AppError, BlockingDependency, FaultKind, Result, StoreFault};
pub use status::RecordStatus;
pub use value::{Row, SqlValue};
