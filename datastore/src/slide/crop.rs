//! Crop extraction for polygons on slides
//!
//! A crop is the pixel window boxing a polygon. With alpha masking enabled
//! the pixels whose centre falls outside the polygon are made transparent,
//! so a classifier only sees the segmented structure.

use std::time::Instant;

use image::RgbaImage;
use image::imageops;
use metrics::{counter, histogram};
use tracing::debug;

use crate::config::CropConfig;
use crate::geometry::{CropWindow, Polygon, WindowBounds};

use super::types::{ImageId, Slide, SlideError};

/// Pixels of one polygon cropped out of its slide
#[derive(Debug, Clone)]
pub struct Crop {
    pub image_id: ImageId,
    pub polygon: Polygon,
    /// Location of the crop in the slide, top-left origin
    pub window: CropWindow,
    pub image: RgbaImage,
}

/// Ordered crops, one per requested (image, polygon) pair
#[derive(Debug, Clone, Default)]
pub struct CropBuffer {
    crops: Vec<Crop>,
}

impl CropBuffer {
    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Crop> {
        self.crops.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Crop> {
        self.crops.iter()
    }

    /// Drop the provenance and keep only the pixel buffers
    pub fn into_images(self) -> Vec<RgbaImage> {
        self.crops.into_iter().map(|c| c.image).collect()
    }
}

impl FromIterator<Crop> for CropBuffer {
    fn from_iter<I: IntoIterator<Item = Crop>>(iter: I) -> Self {
        Self {
            crops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CropBuffer {
    type Item = Crop;
    type IntoIter = std::vec::IntoIter<Crop>;

    fn into_iter(self) -> Self::IntoIter {
        self.crops.into_iter()
    }
}

impl<'a> IntoIterator for &'a CropBuffer {
    type Item = &'a Crop;
    type IntoIter = std::slice::Iter<'a, Crop>;

    fn into_iter(self) -> Self::IntoIter {
        self.crops.iter()
    }
}

/// Pixel window `extract_crop` would cut for `polygon` under `config`
pub fn crop_window(
    slide: &Slide,
    polygon: &Polygon,
    config: &CropConfig,
) -> Result<CropWindow, SlideError> {
    let (width, height) = (slide.width(), slide.height());
    let bounds = WindowBounds::from_polygon(polygon, height);

    let out_of_bounds = || SlideError::CropOutOfBounds {
        image_id: slide.id().clone(),
        bounds,
        width,
        height,
    };

    if !config.clamp_to_bounds && !bounds.fits(width, height) {
        return Err(out_of_bounds());
    }
    bounds.clip(width, height).ok_or_else(out_of_bounds)
}

/// Crop the window boxing `polygon` out of `slide`
pub fn extract_crop(
    slide: &Slide,
    polygon: &Polygon,
    config: &CropConfig,
) -> Result<Crop, SlideError> {
    let start = Instant::now();
    let window = crop_window(slide, polygon, config)?;

    let mut image = imageops::crop_imm(
        slide.pixels(),
        window.x,
        window.y,
        window.width,
        window.height,
    )
    .to_image();

    if config.alpha_mask {
        apply_alpha_mask(&mut image, polygon, &window, slide.height());
    }

    debug!(
        "Cropped {}x{} at ({}, {}) from slide {}",
        window.width,
        window.height,
        window.x,
        window.y,
        slide.id()
    );
    counter!("sldc_crops_extracted_total").increment(1);
    histogram!("sldc_crop_duration_seconds").record(start.elapsed());

    Ok(Crop {
        image_id: slide.id().clone(),
        polygon: polygon.clone(),
        window,
        image,
    })
}

/// Make pixels whose centre lies outside the polygon fully transparent
fn apply_alpha_mask(
    image: &mut RgbaImage,
    polygon: &Polygon,
    window: &CropWindow,
    slide_height: u32,
) {
    for (px, py, pixel) in image.enumerate_pixels_mut() {
        if !polygon.contains(window.pixel_center(px, py, slide_height)) {
            pixel.0[3] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{gradient_slide, unmasked};

    #[test]
    fn test_crop_uses_flipped_window() {
        let slide = gradient_slide("s1", 50, 40);
        let polygon = Polygon::rectangle(10.0, 5.0, 8.0, 6.0).unwrap();

        let crop = extract_crop(&slide, &polygon, &unmasked()).unwrap();

        assert_eq!(
            crop.window,
            CropWindow {
                x: 10,
                y: 29,
                width: 8,
                height: 6
            }
        );
        assert_eq!(crop.image.dimensions(), (8, 6));
        // Top-left crop pixel is slide pixel (10, 29)
        assert_eq!(crop.image.get_pixel(0, 0), slide.pixels().get_pixel(10, 29));
    }

    #[test]
    fn test_alpha_mask_hides_outside_pixels() {
        let slide = gradient_slide("s1", 20, 20);
        // Right triangle filling the lower-left half of a 10x10 box
        let polygon = Polygon::new([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]).unwrap();

        let crop = extract_crop(&slide, &polygon, &CropConfig::default()).unwrap();

        assert_eq!(crop.image.dimensions(), (10, 10));
        // Bottom-left pixel is inside, top-right is outside
        assert_eq!(crop.image.get_pixel(0, 9).0[3], 255);
        assert_eq!(crop.image.get_pixel(9, 0).0[3], 0);
    }

    #[test]
    fn test_overflow_is_clipped_or_rejected() {
        let slide = gradient_slide("s1", 20, 20);
        let polygon = Polygon::rectangle(15.0, 15.0, 10.0, 10.0).unwrap();

        let crop = extract_crop(&slide, &polygon, &unmasked()).unwrap();
        assert_eq!(crop.image.dimensions(), (5, 5));

        let strict = CropConfig {
            alpha_mask: false,
            clamp_to_bounds: false,
        };
        assert!(matches!(
            extract_crop(&slide, &polygon, &strict),
            Err(SlideError::CropOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_disjoint_polygon_is_rejected() {
        let slide = gradient_slide("s1", 20, 20);
        let polygon = Polygon::rectangle(100.0, 100.0, 5.0, 5.0).unwrap();

        let err = extract_crop(&slide, &polygon, &unmasked()).unwrap_err();
        assert!(err.to_string().contains("s1"));
    }

    #[test]
    fn test_extreme_polygon_is_clipped() {
        let slide = gradient_slide("s1", 64, 64);
        let polygon = Polygon::new([(0.0, -1e300), (10.0, -1e300), (10.0, 5.0)]).unwrap();

        let crop = extract_crop(&slide, &polygon, &unmasked()).unwrap();
        assert_eq!(crop.image.dimensions(), (10, 5));

        let strict = CropConfig {
            alpha_mask: false,
            clamp_to_bounds: false,
        };
        assert!(matches!(
            crop_window(&slide, &polygon, &strict),
            Err(SlideError::CropOutOfBounds { .. })
        ));
    }
}
