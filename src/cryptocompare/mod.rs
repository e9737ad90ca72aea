//! CryptoCompare market-data provider
//! Public min-api endpoints; an API key is optional.

mod client;
mod types;

pub use client::{CryptoCompareClient, API_BASE_URL};
pub use types::*;
