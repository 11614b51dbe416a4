//! Pixel windows boxing polygons
//!
//! Polygons live in a bottom-left origin coordinate system while pixel
//! buffers are addressed from the top-left corner. `CropWindow` is the
//! bridge between the two: it is computed from a polygon envelope by
//! flipping the y axis and rounding outwards.

use rstar::{AABB, RTreeObject};
use serde::{Deserialize, Serialize};

use super::types::{Point, Polygon};

/// Coordinates are clamped to this magnitude before rounding to pixels
const MAX_PIXEL_COORDINATE: f64 = u32::MAX as f64;

fn to_pixel(value: f64) -> i64 {
    value.clamp(-MAX_PIXEL_COORDINATE, MAX_PIXEL_COORDINATE) as i64
}

/// Pixel rectangle in top-left origin coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Window bounds before clipping; may extend past the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl WindowBounds {
    /// Outward-rounded pixel bounds of an envelope in an image of `image_height` rows
    pub fn from_envelope(envelope: &AABB<[f64; 2]>, image_height: u32) -> Self {
        let [min_x, min_y] = envelope.lower();
        let [max_x, max_y] = envelope.upper();
        let h = image_height as i64;

        let left = to_pixel(min_x.floor());
        let top = h - to_pixel(max_y.ceil());
        // Flat polygons still cover one pixel
        let right = to_pixel(max_x.ceil()).max(left + 1);
        let bottom = (h - to_pixel(min_y.floor())).max(top + 1);

        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_polygon(polygon: &Polygon, image_height: u32) -> Self {
        Self::from_envelope(&polygon.envelope(), image_height)
    }

    /// Whether the bounds lie entirely within a `width` x `height` image
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.left >= 0
            && self.top >= 0
            && self.right <= width as i64
            && self.bottom <= height as i64
    }

    /// Clip to a `width` x `height` image, `None` when nothing overlaps
    pub fn clip(&self, width: u32, height: u32) -> Option<CropWindow> {
        let left = self.left.max(0);
        let top = self.top.max(0);
        let right = self.right.min(width as i64);
        let bottom = self.bottom.min(height as i64);

        if right <= left || bottom <= top {
            return None;
        }

        Some(CropWindow {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

impl CropWindow {
    /// Centre of the window pixel `(px, py)` in bottom-left image coordinates
    pub fn pixel_center(&self, px: u32, py: u32, image_height: u32) -> Point {
        Point {
            x: self.x as f64 + px as f64 + 0.5,
            y: image_height as f64 - (self.y as f64 + py as f64 + 0.5),
        }
    }
}
