//! Slide module for registered whole-slide images
//!
//! This module provides:
//! - `ImageId` and `Slide` for identifying and holding decoded slide pixels
//! - `SlideStream` for handing slides to a workflow lazily
//! - `extract_crop` and `CropBuffer` for cutting polygon crops out of slides
//! - `crop_window` for checking where a polygon lands before cropping

mod crop;
mod types;

pub use crop::{Crop, CropBuffer, crop_window, extract_crop};
pub use types::{ImageId, Slide, SlideError, SlideStream};
