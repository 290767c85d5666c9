//! Index Chain block, transaction and address-script parsing.

pub mod address;
pub mod block;
pub mod error;
pub mod params;
pub mod transaction;
pub mod utils;
