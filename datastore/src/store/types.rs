//! Store-related types and error definitions

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{GeometryError, Polygon};
use crate::publish::PublishError;
use crate::slide::{ImageId, SlideError};

/// Polygons per image, in insertion order for both keys and polygons
pub type AnnotationCollection = IndexMap<ImageId, Vec<Polygon>>;

/// Class identifier assigned by an external classifier
pub type ClassLabel = u32;

/// Errors that can occur when working with a data store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unknown image: {0}")]
    UnknownImage(ImageId),

    #[error("Image already registered: {0}")]
    DuplicateImage(ImageId),

    #[error("No {0} stored yet")]
    NoDataStoredYet(&'static str),

    #[error("Operation {operation} is not allowed during {phase}")]
    InvalidPhaseOperation {
        operation: &'static str,
        phase: WorkflowPhase,
    },

    #[error("Invalid phase transition from {from} to {to}")]
    InvalidPhaseTransition {
        from: WorkflowPhase,
        to: WorkflowPhase,
    },

    #[error("Got {actual} {category} labels, expected {expected}")]
    LengthMismatch {
        category: PolygonCategory,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Slide(#[from] SlideError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Failed to publish results: {0}")]
    Publish(#[from] PublishError),
}

/// Phase of the thyroid workflow; transitions only go forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    FirstSegmentation,
    SecondSegmentation,
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstSegmentation => f.write_str("first segmentation"),
            Self::SecondSegmentation => f.write_str("second segmentation"),
        }
    }
}

/// Kind of structure a thyroid polygon outlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolygonCategory {
    Cell,
    Aggregate,
    ArchitecturalPattern,
}

impl PolygonCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cell => "cell",
            Self::Aggregate => "aggregate",
            Self::ArchitecturalPattern => "architectural_pattern",
        }
    }
}

impl fmt::Display for PolygonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
