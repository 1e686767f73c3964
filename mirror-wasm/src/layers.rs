use std::cell::RefCell;
use std::rc::{Rc, Weak};

use mirror_core::{
    DragController, LatLng, MapView, MirrorTarget, PanControl, Shape, ShapeCollection, ShapeKind,
    StyleSet, Vertices,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::leaflet::{self, FeatureGroup, Map, PointerPayload, Polyline};
use crate::utils::{from_js, lat_lngs_to_js, to_js};

/// The left-hand map and the group the toolbar draws into.
pub struct DrawMap {
    pub map: Map,
    pub group: FeatureGroup,
}

impl MapView for DrawMap {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.map
            .set_view(&leaflet::lat_lng_pair(center.lat, center.lng), zoom);
    }

    fn clear_layers(&mut self) {
        self.group.clear_layers();
    }
}

/// Toggles a Leaflet map's own drag-to-pan.
pub struct MapPan<'a>(pub &'a Map);

impl PanControl for MapPan<'_> {
    fn set_dragging(&mut self, enabled: bool) {
        let handler = self.0.dragging();
        if enabled {
            handler.enable();
        } else {
            handler.disable();
        }
    }
}

/// A Leaflet path plus the vertices we last gave it. The mirror layer is only
/// ever moved from Rust, so the cached list stays authoritative.
pub struct LeafletShape {
    layer: Polyline,
    kind: ShapeKind,
    vertices: Vec<LatLng>,
}

impl LeafletShape {
    pub fn to_shape(&self) -> Shape {
        match self.kind {
            ShapeKind::Polygon => Shape::Polygon(self.vertices.clone()),
            ShapeKind::Polyline => Shape::Polyline(self.vertices.clone()),
        }
    }
}

impl Vertices for LeafletShape {
    fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }

    fn set_vertices(&mut self, vertices: Vec<LatLng>) {
        self.layer.set_lat_lngs(&lat_lngs_to_js(&vertices));
        self.vertices = vertices;
    }
}

type PointerClosure = Closure<dyn FnMut(PointerPayload)>;

/// Map-level listeners installed for one drag session.
struct SessionListeners {
    on_move: PointerClosure,
    on_up: PointerClosure,
}

impl SessionListeners {
    fn detach(&self, map: &Map) {
        map.off("mousemove", self.on_move.as_ref().unchecked_ref());
        map.off("mouseup", self.on_up.as_ref().unchecked_ref());
    }
}

/// Drag wiring for one mirrored layer.
pub struct ShapeDrag {
    map: Map,
    shape: LeafletShape,
    controller: DragController,
    session: Option<SessionListeners>,
    // Detached listeners of the last session. Released on the next press, not
    // from inside their own callback.
    spent: Option<SessionListeners>,
}

impl ShapeDrag {
    fn begin(this: &Rc<RefCell<Self>>, at: LatLng) {
        let mut guard = this.borrow_mut();
        let d = &mut *guard;
        d.spent = None;
        if let Some(old) = d.session.take() {
            old.detach(&d.map);
        }
        d.controller.pointer_down(&d.shape, at, &mut MapPan(&d.map));

        let weak = Rc::downgrade(this);
        let on_move = Closure::<dyn FnMut(PointerPayload)>::wrap(Box::new(move |e: PointerPayload| {
            let Some(drag) = weak.upgrade() else { return };
            if let Some(at) = event_lat_lng(&e) {
                let mut d = drag.borrow_mut();
                let ShapeDrag {
                    controller, shape, ..
                } = &mut *d;
                controller.pointer_move(shape, at);
            }
        }));
        let weak = Rc::downgrade(this);
        let on_up = Closure::<dyn FnMut(PointerPayload)>::wrap(Box::new(move |_e: PointerPayload| {
            if let Some(drag) = weak.upgrade() {
                drag.borrow_mut().end();
            }
        }));
        d.map.on("mousemove", on_move.as_ref().unchecked_ref());
        d.map.on("mouseup", on_up.as_ref().unchecked_ref());
        d.session = Some(SessionListeners { on_move, on_up });
    }

    fn end(&mut self) {
        self.controller.pointer_up(&mut MapPan(&self.map));
        if let Some(listeners) = self.session.take() {
            listeners.detach(&self.map);
            self.spent = Some(listeners);
        }
    }
}

fn event_lat_lng(e: &PointerPayload) -> Option<LatLng> {
    match from_js::<LatLng>(&e.latlng()) {
        Ok(p) => Some(p),
        Err(err) => {
            log::warn!("pointer event without a usable latlng: {err:?}");
            None
        }
    }
}

/// Handle for the mirrored layer. Dropping it ends any drag in progress and
/// unhooks the layer's listeners.
pub struct MirrorLayer {
    layer: Polyline,
    drag: Rc<RefCell<ShapeDrag>>,
    on_down: PointerClosure,
}

impl MirrorLayer {
    fn new(map: &Map, layer: Polyline, kind: ShapeKind, vertices: Vec<LatLng>) -> Self {
        let drag = Rc::new(RefCell::new(ShapeDrag {
            map: map.clone(),
            shape: LeafletShape {
                layer: layer.clone(),
                kind,
                vertices,
            },
            controller: DragController::new(),
            session: None,
            spent: None,
        }));
        let weak: Weak<RefCell<ShapeDrag>> = Rc::downgrade(&drag);
        let on_down = Closure::<dyn FnMut(PointerPayload)>::wrap(Box::new(move |e: PointerPayload| {
            if let (Some(drag), Some(at)) = (weak.upgrade(), event_lat_lng(&e)) {
                ShapeDrag::begin(&drag, at);
            }
        }));
        layer.on_layer("mousedown", on_down.as_ref().unchecked_ref());
        MirrorLayer {
            layer,
            drag,
            on_down,
        }
    }

    /// The mirrored shape where it currently sits, drags included.
    pub fn shape(&self) -> Shape {
        self.drag.borrow().shape.to_shape()
    }
}

impl Drop for MirrorLayer {
    fn drop(&mut self) {
        self.layer
            .off_layer("mousedown", self.on_down.as_ref().unchecked_ref());
        let mut d = self.drag.borrow_mut();
        if d.controller.is_dragging() {
            d.end();
        }
    }
}

/// The right-hand map. Its feature group is the mirror's target collection.
pub struct CompareMap {
    pub map: Map,
    pub group: FeatureGroup,
    styles: StyleSet,
    count: usize,
}

impl CompareMap {
    pub fn new(map: Map, group: FeatureGroup, styles: StyleSet) -> Self {
        CompareMap {
            map,
            group,
            styles,
            count: 0,
        }
    }

    fn path_options(&self, kind: ShapeKind) -> JsValue {
        to_js(self.styles.for_kind(kind)).unwrap_or_else(|e| {
            log::warn!("falling back to default {kind} style: {e:?}");
            JsValue::UNDEFINED
        })
    }
}

impl ShapeCollection for CompareMap {
    type Handle = MirrorLayer;

    fn add(&mut self, shape: Shape) -> MirrorLayer {
        let (kind, vertices) = shape.into_parts();
        let latlngs = lat_lngs_to_js(&vertices);
        let opts = self.path_options(kind);
        let layer: Polyline = match kind {
            ShapeKind::Polygon => leaflet::polygon(&latlngs, &opts).unchecked_into(),
            ShapeKind::Polyline => leaflet::polyline(&latlngs, &opts),
        };
        self.group.add_layer(&layer);
        self.count += 1;
        MirrorLayer::new(&self.map, layer, kind, vertices)
    }

    fn remove(&mut self, handle: &MirrorLayer) {
        self.group.remove_layer(&handle.layer);
        self.count = self.count.saturating_sub(1);
    }

    fn len(&self) -> usize {
        self.count
    }
}

impl MirrorTarget for CompareMap {
    fn center(&self) -> LatLng {
        from_js(&self.map.get_center()).unwrap_or_else(|e| {
            log::warn!("could not read compare map center: {e:?}");
            LatLng::default()
        })
    }
}

impl MapView for CompareMap {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.map
            .set_view(&leaflet::lat_lng_pair(center.lat, center.lng), zoom);
    }

    fn clear_layers(&mut self) {
        self.group.clear_layers();
        self.count = 0;
    }
}
