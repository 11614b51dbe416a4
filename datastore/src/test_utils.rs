//! Test Utilities Module
//!
//! Fixtures shared by the unit tests. This module is only compiled when
//! running tests.

#![cfg(test)]

use image::{Rgba, RgbaImage};

use crate::config::CropConfig;
use crate::geometry::Polygon;
use crate::publish::{ClassificationReport, PublishError, ResultPublisher};
use crate::slide::Slide;
use crate::store::{InMemoryStore, InMemoryThyroidStore};

/// Side of the square slides created by `thyroid_store`
pub const SLIDE_SIZE: u32 = 64;

/// Opaque slide whose pixel colour encodes its position
pub fn gradient_slide(id: &str, width: u32, height: u32) -> Slide {
    let pixels = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    Slide::new(id, pixels)
}

/// Axis-aligned square with its bottom-left corner at `(x, y)`
pub fn square(x: f64, y: f64, size: f64) -> Polygon {
    Polygon::rectangle(x, y, size, size).expect("valid square")
}

/// Crop configuration without alpha masking
pub fn unmasked() -> CropConfig {
    CropConfig {
        alpha_mask: false,
        clamp_to_bounds: true,
    }
}

/// Thyroid store with one `SLIDE_SIZE` square slide per id, registered in order
pub fn thyroid_store(ids: &[&str]) -> InMemoryThyroidStore {
    let base = InMemoryStore::with_slides(
        ids.iter()
            .map(|id| gradient_slide(id, SLIDE_SIZE, SLIDE_SIZE)),
    )
    .expect("unique slide ids");
    InMemoryThyroidStore::new(base)
}

/// Publisher that rejects every report
pub struct FailingPublisher;

impl ResultPublisher for FailingPublisher {
    fn publish(&mut self, _report: &ClassificationReport) -> Result<(), PublishError> {
        Err(PublishError::Rejected("annotation service offline".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_slide_encodes_position() {
        let slide = gradient_slide("g", 10, 5);
        assert_eq!(slide.pixels().get_pixel(3, 4), &Rgba([3, 4, 128, 255]));
    }

    #[test]
    fn test_thyroid_store_registers_in_order() {
        let store = thyroid_store(&["x", "y"]);
        let ids: Vec<&str> = store.base().image_ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }
}
