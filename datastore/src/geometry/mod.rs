//! Polygon geometry in absolute slide coordinates
//!
//! Handles polygon construction, envelopes and the mapping between
//! bottom-left polygon space and top-left pixel windows.

pub mod types;
pub mod window;

pub use types::{GeometryError, Point, Polygon};
pub use window::{CropWindow, WindowBounds};
