pub mod time;
pub mod vesting;
