//! Data store module for SLDC workflows
//!
//! This module provides:
//! - `DataStore` trait for slide retrieval and polygon persistence
//! - `ThyroidDataStore` trait for the two-phase thyroid classification protocol
//! - `InMemoryStore` and `InMemoryThyroidStore` reference implementations

mod memory;
mod service;
mod thyroid;
mod types;

pub use memory::InMemoryStore;
pub use service::{DataStore, ThyroidDataStore};
pub use thyroid::InMemoryThyroidStore;
pub use types::{AnnotationCollection, ClassLabel, PolygonCategory, StoreError, WorkflowPhase};
