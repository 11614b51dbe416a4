//! In-memory data store for the thyroid classification workflow
//!
//! The store is phase-gated:
//! - during the first segmentation phase cells, aggregates and
//!   architectural patterns are appended per image;
//! - `second_segmentation` moves the store forward once, a second call is
//!   an `InvalidPhaseTransition` error;
//! - results can only be published in the second segmentation phase.
//!
//! Classification inputs are ordered by slide registration order, then by
//! insertion order within each slide. Published labels are matched back to
//! polygons by that same order.

use image::RgbaImage;
use metrics::counter;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::geometry::Polygon;
use crate::publish::{ClassificationReport, ClassifiedPolygon, NoopPublisher, ResultPublisher};
use crate::slide::{Crop, CropBuffer, ImageId, Slide, SlideStream, crop_window, extract_crop};

use super::memory::InMemoryStore;
use super::service::{DataStore, ThyroidDataStore};
use super::types::{AnnotationCollection, ClassLabel, PolygonCategory, StoreError, WorkflowPhase};

/// Per-category segment collections
#[derive(Debug, Default)]
struct Segments {
    cells: AnnotationCollection,
    aggregates: AnnotationCollection,
    architectural_patterns: AnnotationCollection,
}

impl Segments {
    fn get(&self, category: PolygonCategory) -> &AnnotationCollection {
        match category {
            PolygonCategory::Cell => &self.cells,
            PolygonCategory::Aggregate => &self.aggregates,
            PolygonCategory::ArchitecturalPattern => &self.architectural_patterns,
        }
    }

    fn get_mut(&mut self, category: PolygonCategory) -> &mut AnnotationCollection {
        match category {
            PolygonCategory::Cell => &mut self.cells,
            PolygonCategory::Aggregate => &mut self.aggregates,
            PolygonCategory::ArchitecturalPattern => &mut self.architectural_patterns,
        }
    }
}

fn store_operation(category: PolygonCategory) -> &'static str {
    match category {
        PolygonCategory::Cell => "store_cell",
        PolygonCategory::Aggregate => "store_aggregate",
        PolygonCategory::ArchitecturalPattern => "store_architectural_pattern",
    }
}

/// Thyroid workflow store built on top of an [`InMemoryStore`]
pub struct InMemoryThyroidStore {
    run_id: Uuid,
    base: InMemoryStore,
    config: StoreConfig,
    phase: WorkflowPhase,
    segments: Segments,
    results: Option<ClassificationReport>,
    publisher: Box<dyn ResultPublisher>,
}

impl InMemoryThyroidStore {
    pub fn new(base: InMemoryStore) -> Self {
        Self::with_config(base, StoreConfig::default())
    }

    pub fn with_config(base: InMemoryStore, config: StoreConfig) -> Self {
        let run_id = Uuid::new_v4();
        debug!(
            "Created thyroid store for run {} with {} slides",
            run_id,
            base.slide_count()
        );

        Self {
            run_id,
            base,
            config,
            phase: WorkflowPhase::FirstSegmentation,
            segments: Segments::default(),
            results: None,
            publisher: Box::new(NoopPublisher),
        }
    }

    /// Replace the collaborator receiving published results
    pub fn with_publisher<P>(mut self, publisher: P) -> Self
    where
        P: ResultPublisher + 'static,
    {
        self.publisher = Box::new(publisher);
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Register a slide with the underlying store
    pub fn register_slide(&mut self, slide: Slide) -> Result<(), StoreError> {
        self.base.register_slide(slide)
    }

    pub fn base(&self) -> &InMemoryStore {
        &self.base
    }

    /// Segments of one category, keyed by image in first-insertion order
    pub fn polygons(&self, category: PolygonCategory) -> &AnnotationCollection {
        self.segments.get(category)
    }

    /// Number of stored segments of one category over all images
    pub fn segment_count(&self, category: PolygonCategory) -> usize {
        self.segments.get(category).values().map(Vec::len).sum()
    }

    /// The last successfully published report
    pub fn get_results(&self) -> Result<&ClassificationReport, StoreError> {
        self.results
            .as_ref()
            .ok_or(StoreError::NoDataStoredYet("classification results"))
    }

    fn require_phase(
        &self,
        expected: WorkflowPhase,
        operation: &'static str,
    ) -> Result<(), StoreError> {
        if self.phase != expected {
            return Err(StoreError::InvalidPhaseOperation {
                operation,
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// Segments of a category as (image, index within image, polygon), in
    /// slide registration order then insertion order
    fn ordered_segments(
        &self,
        category: PolygonCategory,
    ) -> impl Iterator<Item = (&ImageId, usize, &Polygon)> + '_ {
        let collection = self.segments.get(category);
        self.base.image_ids().flat_map(move |id| {
            collection
                .get(id)
                .into_iter()
                .flatten()
                .enumerate()
                .map(move |(index, polygon)| (id, index, polygon))
        })
    }

    fn crops_to_classify(&self, category: PolygonCategory) -> Result<Vec<RgbaImage>, StoreError> {
        let images = self
            .ordered_segments(category)
            .map(|(id, _, polygon)| -> Result<RgbaImage, StoreError> {
                let slide = self.base.slide(id)?;
                Ok(extract_crop(slide, polygon, &self.config.crop)?.image)
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        debug!("Prepared {} {} crops to classify", images.len(), category);
        Ok(images)
    }

    fn check_alignment(&self, category: PolygonCategory, actual: usize) -> Result<(), StoreError> {
        let expected = self.segment_count(category);
        if expected != actual {
            return Err(StoreError::LengthMismatch {
                category,
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn classify(&self, category: PolygonCategory, labels: &[ClassLabel]) -> Vec<ClassifiedPolygon> {
        self.ordered_segments(category)
            .zip(labels)
            .map(|((image_id, index, polygon), &label)| ClassifiedPolygon {
                image_id: image_id.clone(),
                index,
                polygon: polygon.clone(),
                label,
            })
            .collect()
    }
}

impl DataStore for InMemoryThyroidStore {
    fn get_main_slide_stream(&self) -> Result<SlideStream, StoreError> {
        self.base.get_main_slide_stream()
    }

    fn store_polygons(&mut self, polygons: AnnotationCollection) -> Result<(), StoreError> {
        self.base.store_polygons(polygons)
    }

    fn get_polygons(&self) -> Result<&AnnotationCollection, StoreError> {
        self.base.get_polygons()
    }
}

impl ThyroidDataStore for InMemoryThyroidStore {
    fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    fn store_segment(
        &mut self,
        category: PolygonCategory,
        img_id: &ImageId,
        polygon: Polygon,
    ) -> Result<(), StoreError> {
        self.require_phase(WorkflowPhase::FirstSegmentation, store_operation(category))?;
        // Every stored segment must yield a crop when classification inputs are built
        let slide = self.base.slide(img_id)?;
        crop_window(slide, &polygon, &self.config.crop)?;

        self.segments
            .get_mut(category)
            .entry(img_id.clone())
            .or_default()
            .push(polygon);

        counter!("sldc_polygons_stored_total", "category" => category.as_str()).increment(1);
        debug!("Stored {} polygon on slide {}", category, img_id);
        Ok(())
    }

    fn store_crop_to_segment(
        &self,
        indices_and_polygons: &[(ImageId, Polygon)],
    ) -> Result<CropBuffer, StoreError> {
        self.base
            .ensure_known(indices_and_polygons.iter().map(|(id, _)| id))?;

        indices_and_polygons
            .iter()
            .map(|(id, polygon)| -> Result<Crop, StoreError> {
                let slide = self.base.slide(id)?;
                Ok(extract_crop(slide, polygon, &self.config.crop)?)
            })
            .collect()
    }

    fn get_cells_to_classify(&self) -> Result<Vec<RgbaImage>, StoreError> {
        self.crops_to_classify(PolygonCategory::Cell)
    }

    fn get_arch_pattern_to_classify(&self) -> Result<Vec<RgbaImage>, StoreError> {
        self.crops_to_classify(PolygonCategory::ArchitecturalPattern)
    }

    fn second_segmentation(&mut self) -> Result<(), StoreError> {
        match self.phase {
            WorkflowPhase::FirstSegmentation => {
                self.phase = WorkflowPhase::SecondSegmentation;
                info!(
                    "Run {} entered {} with {} cells, {} aggregates, {} patterns",
                    self.run_id,
                    self.phase,
                    self.segment_count(PolygonCategory::Cell),
                    self.segment_count(PolygonCategory::Aggregate),
                    self.segment_count(PolygonCategory::ArchitecturalPattern)
                );
                Ok(())
            }
            WorkflowPhase::SecondSegmentation => Err(StoreError::InvalidPhaseTransition {
                from: self.phase,
                to: WorkflowPhase::SecondSegmentation,
            }),
        }
    }

    fn publish_results(
        &mut self,
        cell_classif: &[ClassLabel],
        arch_pattern_classif: &[ClassLabel],
    ) -> Result<(), StoreError> {
        self.require_phase(WorkflowPhase::SecondSegmentation, "publish_results")?;
        self.check_alignment(PolygonCategory::Cell, cell_classif.len())?;
        self.check_alignment(PolygonCategory::ArchitecturalPattern, arch_pattern_classif.len())?;

        let report = ClassificationReport {
            run_id: self.run_id,
            cells: self.classify(PolygonCategory::Cell, cell_classif),
            architectural_patterns: self
                .classify(PolygonCategory::ArchitecturalPattern, arch_pattern_classif),
        };

        self.publisher.publish(&report)?;

        counter!("sldc_results_published_total").increment(1);
        info!(
            "Published {} cell and {} pattern labels for run {}",
            report.cells.len(),
            report.architectural_patterns.len(),
            self.run_id
        );
        if self.results.replace(report).is_some() {
            debug!("Replaced previously published results");
        }
        Ok(())
    }
}
