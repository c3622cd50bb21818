//! API layer for the vessel risk engine
//!
//! REST endpoints for vessel risk aggregation, record history and entity
//! sanction classification.

pub mod error;
pub mod handlers;
mod rest;
pub mod types;

pub use error::{ApiError, ErrorCode};
pub use rest::*;
