//! SLDC Data Store Library
//!
//! Data-access contract between an SLDC (segment, locate, dispatch,
//! classify) workflow and the storage holding slides, polygons and
//! classification results, with in-memory reference stores.

pub mod config;
pub mod geometry;
pub mod publish;
pub mod slide;
pub mod store;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::StoreConfig;
pub use geometry::{Point, Polygon};
pub use publish::{ClassificationReport, ResultPublisher};
pub use slide::{CropBuffer, ImageId, Slide, SlideStream};
pub use store::{
    AnnotationCollection, DataStore, InMemoryStore, InMemoryThyroidStore, PolygonCategory,
    StoreError, ThyroidDataStore, WorkflowPhase,
};
