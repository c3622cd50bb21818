//! PostgreSQL implementations for the production service
//!
//! Provides the risk history store, the watch list and the description
//! table.

mod descriptions;
mod risk_store;
mod watch_list;

pub use descriptions::*;
pub use risk_store::*;
pub use watch_list::*;
