//! devpulse domain crate
//!
//! This crate contains the core pipeline logic following hexagonal
//! architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `categorize`: Keyword-rule topic classification
//! - `usecases`: Aggregation, dedup, recommendation, trending, filters

pub mod categorize;
pub mod model;
pub mod ports;
pub mod usecases;

pub use model::*;
pub use ports::*;
