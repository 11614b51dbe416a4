//! Classification result publishing
//!
//! The thyroid store hands each validated set of labels to a
//! `ResultPublisher`, which forwards it to wherever results live
//! (an annotation service, a file, a test buffer).

mod publisher;
mod types;

pub use publisher::{JsonPublisher, MemoryPublisher, NoopPublisher, ResultPublisher};
pub use types::{ClassificationReport, ClassifiedPolygon, PublishError};
