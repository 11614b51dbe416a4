//! DataStore and ThyroidDataStore trait definitions

use image::RgbaImage;

use crate::geometry::Polygon;
use crate::slide::{CropBuffer, ImageId, SlideStream};

use super::types::{AnnotationCollection, ClassLabel, PolygonCategory, StoreError, WorkflowPhase};

/// Trait for data stores backing an SLDC workflow (in-memory or remote)
pub trait DataStore {
    /// Stream of the slides the workflow must process
    fn get_main_slide_stream(&self) -> Result<SlideStream, StoreError>;

    /// Replace the stored polygons with `polygons`.
    ///
    /// This is a full replace, not a merge: keys absent from `polygons` are
    /// dropped. Polygons are in absolute coordinates of their image, origin
    /// at the bottom-left corner.
    fn store_polygons(&mut self, polygons: AnnotationCollection) -> Result<(), StoreError>;

    /// Exactly the collection last passed to `store_polygons`
    fn get_polygons(&self) -> Result<&AnnotationCollection, StoreError>;
}

/// Data store for the two-phase thyroid cell classification workflow
///
/// Segments (cells, aggregates, architectural patterns) are appended during
/// the first segmentation phase. Results can only be published once the
/// store has moved to the second segmentation phase.
pub trait ThyroidDataStore: DataStore {
    /// Current workflow phase
    fn phase(&self) -> WorkflowPhase;

    /// Append a polygon of the given category to an image's segments
    ///
    /// A polygon whose crop window cannot be cut from its slide is rejected,
    /// so every stored segment has a classification input.
    fn store_segment(
        &mut self,
        category: PolygonCategory,
        img_id: &ImageId,
        polygon: Polygon,
    ) -> Result<(), StoreError>;

    /// Store the given polygon representing a cell
    fn store_cell(&mut self, img_id: &ImageId, polygon: Polygon) -> Result<(), StoreError> {
        self.store_segment(PolygonCategory::Cell, img_id, polygon)
    }

    /// Store the given polygon representing an aggregate
    fn store_aggregate(&mut self, img_id: &ImageId, polygon: Polygon) -> Result<(), StoreError> {
        self.store_segment(PolygonCategory::Aggregate, img_id, polygon)
    }

    /// Store the given polygon representing an architectural pattern
    fn store_architectural_pattern(
        &mut self,
        img_id: &ImageId,
        polygon: Polygon,
    ) -> Result<(), StoreError> {
        self.store_segment(PolygonCategory::ArchitecturalPattern, img_id, polygon)
    }

    /// Crops of the given polygons, in request order
    fn store_crop_to_segment(
        &self,
        indices_and_polygons: &[(ImageId, Polygon)],
    ) -> Result<CropBuffer, StoreError>;

    /// One image per stored cell, ordered by image registration then insertion
    fn get_cells_to_classify(&self) -> Result<Vec<RgbaImage>, StoreError>;

    /// One image per stored architectural pattern, same ordering as cells
    fn get_arch_pattern_to_classify(&self) -> Result<Vec<RgbaImage>, StoreError>;

    /// Switch to the second segmentation phase
    fn second_segmentation(&mut self) -> Result<(), StoreError>;

    /// Record final labels, aligned by index with the `get_*_to_classify` outputs
    fn publish_results(
        &mut self,
        cell_classif: &[ClassLabel],
        arch_pattern_classif: &[ClassLabel],
    ) -> Result<(), StoreError>;
}
