//! Domain models for the vessel risk engine
//!
//! Severity levels, the risk taxonomy, provider observations, verdicts and
//! the persisted risk record.

mod category;
mod entity;
mod level;
mod observation;
mod record;
mod verdict;

pub use category::*;
pub use entity::*;
pub use level::*;
pub use observation::*;
pub use record::*;
pub use verdict::*;
