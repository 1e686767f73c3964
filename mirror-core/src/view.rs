use crate::drag::PanControl;
use crate::latlng::LatLng;
use crate::shape::Shape;
use crate::store::ShapeCollection;

/// Viewport operations shared by the headless [`View`] and the browser maps.
pub trait MapView {
    fn set_view(&mut self, center: LatLng, zoom: f64);
    fn clear_layers(&mut self);
}

/// Handle of a shape stored in a [`View`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Headless map viewport: center, zoom, pan-drag flag and an owned shape
/// layer. The browser build backs the same contract with Leaflet; this one is
/// what the mirroring logic is exercised against natively.
#[derive(Clone, Debug)]
pub struct View {
    center: LatLng,
    zoom: f64,
    dragging: bool,
    layers: Vec<(LayerId, Shape)>,
    next_id: u64,
}

impl View {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        View {
            center,
            zoom,
            dragging: true,
            layers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan_to(&mut self, center: LatLng) {
        self.center = center;
    }

    pub fn dragging_enabled(&self) -> bool {
        self.dragging
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.layers.iter().map(|(_, s)| s)
    }

    pub fn get(&self, id: LayerId) -> Option<&Shape> {
        self.layers.iter().find(|(i, _)| *i == id).map(|(_, s)| s)
    }
}

impl ShapeCollection for View {
    type Handle = LayerId;

    fn add(&mut self, shape: Shape) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.push((id, shape));
        id
    }

    fn remove(&mut self, handle: &LayerId) {
        self.layers.retain(|(i, _)| i != handle);
    }

    fn len(&self) -> usize {
        self.layers.len()
    }
}

impl MapView for View {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }

    fn clear_layers(&mut self) {
        self.layers.clear();
    }
}

impl PanControl for View {
    fn set_dragging(&mut self, enabled: bool) {
        self.dragging = enabled;
    }
}
