use std::ops::{Add, Sub};

use geo::BoundingRect;
use geo_types::{Coord, LineString};
use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees. Serializes the same way Leaflet's
/// `LatLng` stringifies, so values cross the JS boundary through JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from(v: (f64, f64)) -> Self {
        LatLng { lat: v.0, lng: v.1 }
    }
}

// geo works in x/y: longitude is x, latitude is y.
impl From<LatLng> for Coord<f64> {
    fn from(p: LatLng) -> Self {
        Coord { x: p.lng, y: p.lat }
    }
}

impl From<Coord<f64>> for LatLng {
    fn from(c: Coord<f64>) -> Self {
        LatLng { lat: c.y, lng: c.x }
    }
}

/// Offset between two coordinates, applied independently per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub lat: f64,
    pub lng: f64,
}

impl Sub for LatLng {
    type Output = Delta;

    fn sub(self, rhs: LatLng) -> Delta {
        Delta {
            lat: self.lat - rhs.lat,
            lng: self.lng - rhs.lng,
        }
    }
}

impl Add<Delta> for LatLng {
    type Output = LatLng;

    fn add(self, d: Delta) -> LatLng {
        LatLng {
            lat: self.lat + d.lat,
            lng: self.lng + d.lng,
        }
    }
}

/// Translate every vertex by `d`.
pub fn translate(vertices: &[LatLng], d: Delta) -> Vec<LatLng> {
    vertices.iter().map(|&p| p + d).collect()
}

/// Center of the axis-aligned bounding box of `vertices`, or `None` when the
/// list is empty.
pub fn bounds_center(vertices: &[LatLng]) -> Option<LatLng> {
    let line: LineString<f64> = vertices.iter().map(|&p| Coord::from(p)).collect();
    line.bounding_rect().map(|r| LatLng::from(r.center()))
}
