//! Bindings for the parts of Leaflet and Leaflet.draw the demo touches.

use js_sys::{Array, Function};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = L, js_name = Map)]
    #[derive(Clone, Debug)]
    pub type Map;

    /// Throws (and so errors here) when no element has the given id.
    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    pub fn map(id: &str) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &Map, center: &Array, zoom: f64) -> Map;

    #[wasm_bindgen(method, js_name = getCenter)]
    pub fn get_center(this: &Map) -> JsValue;

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &Map, layer: &Layer) -> Map;

    #[wasm_bindgen(method, js_name = addControl)]
    pub fn add_control(this: &Map, control: &DrawControl) -> Map;

    #[wasm_bindgen(method)]
    pub fn on(this: &Map, event: &str, handler: &Function) -> Map;

    #[wasm_bindgen(method)]
    pub fn off(this: &Map, event: &str, handler: &Function) -> Map;

    #[wasm_bindgen(method, getter)]
    pub fn dragging(this: &Map) -> Handler;

    /// `map.dragging` and friends.
    pub type Handler;

    #[wasm_bindgen(method)]
    pub fn enable(this: &Handler) -> Handler;

    #[wasm_bindgen(method)]
    pub fn disable(this: &Handler) -> Handler;

    #[wasm_bindgen(js_namespace = L, js_name = Layer)]
    #[derive(Clone, Debug)]
    pub type Layer;

    #[wasm_bindgen(method, js_name = on)]
    pub fn on_layer(this: &Layer, event: &str, handler: &Function) -> Layer;

    #[wasm_bindgen(method, js_name = off)]
    pub fn off_layer(this: &Layer, event: &str, handler: &Function) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn tile_layer(url: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = LayerGroup, extends = Layer)]
    #[derive(Clone, Debug)]
    pub type LayerGroup;

    #[wasm_bindgen(method, js_name = getLayers)]
    pub fn get_layers(this: &LayerGroup) -> Array;

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &LayerGroup, layer: &Layer) -> LayerGroup;

    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &LayerGroup, layer: &Layer) -> LayerGroup;

    #[wasm_bindgen(method, js_name = clearLayers)]
    pub fn clear_layers(this: &LayerGroup) -> LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = FeatureGroup, extends = LayerGroup, extends = Layer)]
    #[derive(Clone, Debug)]
    pub type FeatureGroup;

    #[wasm_bindgen(constructor, js_namespace = L, js_class = "FeatureGroup")]
    pub fn new() -> FeatureGroup;

    #[wasm_bindgen(js_namespace = L, js_name = Polyline, extends = Layer)]
    #[derive(Clone, Debug)]
    pub type Polyline;

    #[wasm_bindgen(method, js_name = getLatLngs)]
    pub fn get_lat_lngs(this: &Polyline) -> JsValue;

    #[wasm_bindgen(method, js_name = setLatLngs)]
    pub fn set_lat_lngs(this: &Polyline, latlngs: &Array) -> Polyline;

    #[wasm_bindgen(js_namespace = L, js_name = Polygon, extends = Polyline, extends = Layer)]
    #[derive(Clone, Debug)]
    pub type Polygon;

    #[wasm_bindgen(js_namespace = L, js_name = polyline)]
    pub fn polyline(latlngs: &Array, options: &JsValue) -> Polyline;

    #[wasm_bindgen(js_namespace = L, js_name = polygon)]
    pub fn polygon(latlngs: &Array, options: &JsValue) -> Polygon;

    /// Unique id Leaflet assigns to any object on first use.
    #[wasm_bindgen(js_namespace = L)]
    pub fn stamp(obj: &JsValue) -> u32;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["L", "Control"], js_name = Draw)]
    #[derive(Clone, Debug)]
    pub type DrawControl;

    #[wasm_bindgen(constructor, js_namespace = ["L", "Control"], js_class = "Draw")]
    pub fn new(options: &JsValue) -> DrawControl;
}

// Payloads of the events we subscribe to. Only the fields read here are bound.
#[wasm_bindgen]
extern "C" {
    /// `draw:created` / `draw:edited` / `draw:deleted`.
    pub type DrawPayload;

    #[wasm_bindgen(method, getter)]
    pub fn layer(this: &DrawPayload) -> Layer;

    #[wasm_bindgen(method, getter, js_name = layerType)]
    pub fn layer_type(this: &DrawPayload) -> Option<String>;

    #[wasm_bindgen(method, getter)]
    pub fn layers(this: &DrawPayload) -> LayerGroup;

    /// Any Leaflet mouse event.
    pub type PointerPayload;

    #[wasm_bindgen(method, getter)]
    pub fn latlng(this: &PointerPayload) -> JsValue;
}

/// `[lat, lng]` pair, which Leaflet accepts wherever it wants a `LatLng`.
pub fn lat_lng_pair(lat: f64, lng: f64) -> Array {
    Array::of2(&JsValue::from_f64(lat), &JsValue::from_f64(lng))
}
