//! Utility functions

pub mod precise;
pub mod validate;

pub use precise::Precise;
pub use validate::{check_coins, check_number, json_string, json_u64};
