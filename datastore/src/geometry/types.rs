//! Geometry types and error definitions

use rstar::{AABB, RTreeObject};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of vertices for a closed ring
const MIN_POLYGON_POINTS: usize = 3;

/// Errors raised when building geometry values
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("Non-finite coordinate at vertex {index}: ({x}, {y})")]
    NonFiniteCoordinate { index: usize, x: f64, y: f64 },
}

/// Point in absolute image coordinates (origin at the bottom-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Immutable polygon ring expressed in absolute image coordinates.
///
/// The ring is implicitly closed: the last vertex connects back to the first.
/// Self-intersection is not checked, producers own geometric validity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Build a polygon from its vertices
    pub fn new<I, P>(points: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        let points: Vec<Point> = points.into_iter().map(Into::into).collect();

        if points.len() < MIN_POLYGON_POINTS {
            return Err(GeometryError::TooFewPoints(points.len()));
        }

        if let Some((index, p)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(GeometryError::NonFiniteCoordinate {
                index,
                x: p.x,
                y: p.y,
            });
        }

        Ok(Self { points })
    }

    /// Axis-aligned rectangle polygon with its bottom-left corner at `(x, y)`
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        Self::new([
            (x, y),
            (x + width, y),
            (x + width, y + height),
            (x, y + height),
        ])
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Even-odd test of whether `point` lies inside the ring
    pub fn contains(&self, point: Point) -> bool {
        let mut inside = false;
        let mut j = self.points.len() - 1;

        for i in 0..self.points.len() {
            let (a, b) = (self.points[i], self.points[j]);
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }
}

impl RTreeObject for Polygon {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let corners: Vec<[f64; 2]> = self.points.iter().map(|p| [p.x, p.y]).collect();
        AABB::from_points(corners.iter())
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = GeometryError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(polygon: Polygon) -> Self {
        polygon.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Polygon {
        Polygon::new([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]).unwrap()
    }

    #[test]
    fn test_polygon_rejects_degenerate_rings() {
        assert_eq!(
            Polygon::new([(0.0, 0.0), (1.0, 1.0)]),
            Err(GeometryError::TooFewPoints(2))
        );
        assert!(matches!(
            Polygon::new([(0.0, 0.0), (f64::NAN, 1.0), (2.0, 0.0)]),
            Err(GeometryError::NonFiniteCoordinate { index: 1, .. })
        ));
    }

    #[test]
    fn test_envelope_bounds_all_vertices() {
        let polygon = Polygon::new([(3.5, 2.0), (8.0, 4.25), (5.0, 9.0), (1.0, 6.0)]).unwrap();
        let envelope = polygon.envelope();
        assert_eq!(envelope.lower(), [1.0, 2.0]);
        assert_eq!(envelope.upper(), [8.0, 9.0]);
    }

    #[test]
    fn test_contains_even_odd() {
        let polygon = triangle();
        assert!(polygon.contains(Point::new(1.0, 1.0)));
        assert!(!polygon.contains(Point::new(9.0, 9.0)));
        assert!(!polygon.contains(Point::new(-1.0, 1.0)));
    }

    #[test]
    fn test_serde_validates_points() {
        let json = serde_json::to_string(&triangle()).unwrap();
        let back: Polygon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, triangle());

        let bad = r#"[{"x": 0.0, "y": 0.0}, {"x": 1.0, "y": 0.0}]"#;
        assert!(serde_json::from_str::<Polygon>(bad).is_err());
    }
}
