//! VaultBank Price Oracle
//!
//! Interface to the external price source consumed by the risk engine.
//! The bank only ever asks "latest known price for this feed"; request and
//! consensus mechanics stay on the oracle side of the boundary.
//! `MockOracle` provides deterministic prices for tests.

mod error;
mod mock;
mod types;

pub use error::OracleError;
pub use mock::MockOracle;
pub use types::{PriceOracle, PriceQuote};
