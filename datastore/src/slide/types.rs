//! Slide-related types and error definitions

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::WindowBounds;

/// Errors that can occur when extracting pixels from slides
#[derive(Debug, Error)]
pub enum SlideError {
    #[error(
        "Crop out of bounds on slide {image_id}: window ({}, {})-({}, {}) exceeds {width}x{height}",
        .bounds.left, .bounds.top, .bounds.right, .bounds.bottom
    )]
    CropOutOfBounds {
        image_id: ImageId,
        bounds: WindowBounds,
        width: u32,
        height: u32,
    },
}

/// Opaque identifier of a slide image within a workflow run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ImageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ImageId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A decoded slide image registered with a store
///
/// Pixels are shared, cloning a slide never copies the buffer.
#[derive(Clone)]
pub struct Slide {
    id: ImageId,
    pixels: Arc<RgbaImage>,
}

impl Slide {
    pub fn new(id: impl Into<ImageId>, pixels: RgbaImage) -> Self {
        Self {
            id: id.into(),
            pixels: Arc::new(pixels),
        }
    }

    pub fn id(&self) -> &ImageId {
        &self.id
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

impl fmt::Debug for Slide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slide")
            .field("id", &self.id)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Lazy, single-pass stream of slides to process
pub struct SlideStream {
    inner: Box<dyn Iterator<Item = Slide> + Send>,
}

impl SlideStream {
    pub fn new<I>(slides: I) -> Self
    where
        I: IntoIterator<Item = Slide>,
        I::IntoIter: Send + 'static,
    {
        Self {
            inner: Box::new(slides.into_iter()),
        }
    }
}

impl Iterator for SlideStream {
    type Item = Slide;

    fn next(&mut self) -> Option<Slide> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl fmt::Debug for SlideStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlideStream")
            .field("size_hint", &self.inner.size_hint())
            .finish()
    }
}
