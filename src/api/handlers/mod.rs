//! REST API handlers organized by domain.

pub mod entity;
pub mod health;
pub mod risk;

pub use entity::*;
pub use health::*;
pub use risk::*;
