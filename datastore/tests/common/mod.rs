//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

use image::{Rgba, RgbaImage};
use sldc_datastore::{
    AnnotationCollection, DataStore, InMemoryStore, InMemoryThyroidStore, Polygon, Slide,
    SlideStream, StoreError,
};

/// Install a log subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sldc_datastore=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Create a test slide with a uniform opaque colour
pub fn create_test_slide(id: &str, width: u32, height: u32) -> Slide {
    Slide::new(id, RgbaImage::from_pixel(width, height, Rgba([200, 120, 160, 255])))
}

/// Create a thyroid store over 128x128 slides registered in the given order
pub fn create_test_store(ids: &[&str]) -> InMemoryThyroidStore {
    let base = InMemoryStore::with_slides(ids.iter().map(|id| create_test_slide(id, 128, 128)))
        .expect("unique slide ids");
    InMemoryThyroidStore::new(base)
}

pub fn square(x: f64, y: f64, size: f64) -> Polygon {
    Polygon::rectangle(x, y, size, size).expect("valid square")
}

/// Stand-in for a remote store whose backend cannot be reached
pub struct UnreachableStore {
    pub host: String,
}

impl DataStore for UnreachableStore {
    fn get_main_slide_stream(&self) -> Result<SlideStream, StoreError> {
        Err(StoreError::StoreUnavailable(format!(
            "cannot reach {}",
            self.host
        )))
    }

    fn store_polygons(&mut self, _polygons: AnnotationCollection) -> Result<(), StoreError> {
        Err(StoreError::StoreUnavailable(format!(
            "cannot reach {}",
            self.host
        )))
    }

    fn get_polygons(&self) -> Result<&AnnotationCollection, StoreError> {
        Err(StoreError::NoDataStoredYet("polygons"))
    }
}
