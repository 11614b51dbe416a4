//! Published result types and error definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::Polygon;
use crate::slide::ImageId;
use crate::store::{ClassLabel, PolygonCategory};

/// Errors that can occur when publishing results
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Publisher rejected results: {0}")]
    Rejected(String),
}

/// A polygon paired with the label a classifier gave it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPolygon {
    pub image_id: ImageId,
    /// Position of the polygon among its image's polygons of the same category
    pub index: usize,
    pub polygon: Polygon,
    pub label: ClassLabel,
}

/// Final classification output of one workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub run_id: Uuid,
    pub cells: Vec<ClassifiedPolygon>,
    pub architectural_patterns: Vec<ClassifiedPolygon>,
}

impl ClassificationReport {
    /// Classified polygons of a category; aggregates are never classified
    pub fn entries(&self, category: PolygonCategory) -> &[ClassifiedPolygon] {
        match category {
            PolygonCategory::Cell => &self.cells,
            PolygonCategory::ArchitecturalPattern => &self.architectural_patterns,
            PolygonCategory::Aggregate => &[],
        }
    }

    /// Labels of a category in classification order
    pub fn labels(&self, category: PolygonCategory) -> Vec<ClassLabel> {
        self.entries(category).iter().map(|e| e.label).collect()
    }
}
