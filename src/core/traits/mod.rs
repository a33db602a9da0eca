pub mod entity;
pub mod executor;

pub use entity::{Entity, HardDelete};
pub use executor::{ExecOutcome, QueryExecutor, StatementRunner, TransactionScope};
