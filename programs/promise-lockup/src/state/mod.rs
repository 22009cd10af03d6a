pub mod holder_ledger;
pub mod lock_record;
pub mod registry;

pub use holder_ledger::*;
pub use lock_record::*;
pub use registry::*;
