use std::fmt;

use geo_types::Coord;
use serde::{Deserialize, Serialize};

use crate::latlng::LatLng;
use crate::transform::recenter;

/// Precision used for encoded polyline export (Google's 1e5 format).
pub const POLYLINE_PRECISION: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Polygon,
    Polyline,
}

impl ShapeKind {
    /// Fewest vertices a finished shape of this kind can have.
    pub fn min_vertices(self) -> usize {
        match self {
            ShapeKind::Polygon => 3,
            ShapeKind::Polyline => 2,
        }
    }

    /// Parse the `layerType` string Leaflet.draw attaches to created layers.
    pub fn from_layer_type(s: &str) -> Option<ShapeKind> {
        match s {
            "polygon" => Some(ShapeKind::Polygon),
            "polyline" => Some(ShapeKind::Polyline),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Polygon => f.write_str("polygon"),
            ShapeKind::Polyline => f.write_str("polyline"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShapeError {
    TooFewVertices {
        kind: ShapeKind,
        min: usize,
        got: usize,
    },
    Encode(String),
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::TooFewVertices { kind, min, got } => {
                write!(f, "{kind} needs at least {min} vertices, got {got}")
            }
            ShapeError::Encode(e) => write!(f, "polyline encoding failed: {e}"),
        }
    }
}

impl std::error::Error for ShapeError {}

/// A drawn shape. Polygons hold their outer ring only; the ring is not closed
/// explicitly (first vertex is not repeated).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "vertices",
    rename_all = "lowercase",
    try_from = "RawShape"
)]
pub enum Shape {
    Polygon(Vec<LatLng>),
    Polyline(Vec<LatLng>),
}

/// Wire form of a [`Shape`]; parsed values go through [`Shape::new`] so the
/// vertex minimum holds for deserialized shapes too.
#[derive(Deserialize)]
struct RawShape {
    #[serde(rename = "type")]
    kind: ShapeKind,
    vertices: Vec<LatLng>,
}

impl TryFrom<RawShape> for Shape {
    type Error = ShapeError;

    fn try_from(raw: RawShape) -> Result<Self, Self::Error> {
        Shape::new(raw.kind, raw.vertices)
    }
}

impl Shape {
    pub fn new(kind: ShapeKind, vertices: Vec<LatLng>) -> Result<Shape, ShapeError> {
        let min = kind.min_vertices();
        if vertices.len() < min {
            return Err(ShapeError::TooFewVertices {
                kind,
                min,
                got: vertices.len(),
            });
        }
        Ok(Self::from_parts(kind, vertices))
    }

    pub fn polygon(ring: Vec<LatLng>) -> Result<Shape, ShapeError> {
        Self::new(ShapeKind::Polygon, ring)
    }

    pub fn polyline(path: Vec<LatLng>) -> Result<Shape, ShapeError> {
        Self::new(ShapeKind::Polyline, path)
    }

    fn from_parts(kind: ShapeKind, vertices: Vec<LatLng>) -> Shape {
        match kind {
            ShapeKind::Polygon => Shape::Polygon(vertices),
            ShapeKind::Polyline => Shape::Polyline(vertices),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Polyline(_) => ShapeKind::Polyline,
        }
    }

    pub fn into_parts(self) -> (ShapeKind, Vec<LatLng>) {
        match self {
            Shape::Polygon(v) => (ShapeKind::Polygon, v),
            Shape::Polyline(v) => (ShapeKind::Polyline, v),
        }
    }

    /// Copy of this shape translated so its bounding-box center sits on
    /// `target`.
    pub fn recentered(&self, target: LatLng) -> Shape {
        Self::from_parts(self.kind(), recenter(self.vertices(), target))
    }

    /// Vertices as an encoded polyline string (lat/lng order, 1e5 precision).
    pub fn encoded_polyline(&self) -> Result<String, ShapeError> {
        let coords = self.vertices().iter().map(|&p| Coord::from(p));
        polyline::encode_coordinates(coords, POLYLINE_PRECISION)
            .map_err(|e| ShapeError::Encode(e.to_string()))
    }
}

/// Read/write access to a shape's vertex list, shared by every shape variant
/// and by host-side layer wrappers.
pub trait Vertices {
    fn vertices(&self) -> &[LatLng];
    fn set_vertices(&mut self, vertices: Vec<LatLng>);
}

impl Vertices for Shape {
    fn vertices(&self) -> &[LatLng] {
        match self {
            Shape::Polygon(v) | Shape::Polyline(v) => v,
        }
    }

    fn set_vertices(&mut self, vertices: Vec<LatLng>) {
        match self {
            Shape::Polygon(v) | Shape::Polyline(v) => *v = vertices,
        }
    }
}
