//! Provider response normalization.
//!
//! Raw provider JSON goes in, typed [`Observation`](crate::domain::Observation)s
//! come out. Nothing here fails on a missing or oddly shaped field.

pub mod entity;
pub mod kpler;
pub mod lloyds;
pub mod path;
pub mod timestamp;
pub mod vocabulary;
