pub mod initialize_registry;
pub mod open_ledger;
pub mod grant_lock;
pub mod purchase;
pub mod transfer_promise;
pub mod burn_promise;
pub mod swap_to_underlying;
pub mod top_up_reserve;
pub mod query_unlocked;
pub mod query_registry;

pub use initialize_registry::*;
pub use open_ledger::*;
pub use grant_lock::*;
pub use purchase::*;
pub use transfer_promise::*;
pub use burn_promise::*;
pub use swap_to_underlying::*;
pub use top_up_reserve::*;
pub use query_unlocked::*;
pub use query_registry::*;
