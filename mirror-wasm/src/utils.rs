use js_sys::Array;
use mirror_core::{LatLng, MirrorConfig, Shape, ShapeId, SourceShape};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Window};

use crate::leaflet::{self, Layer, Polygon, Polyline};

/// Hand a serde value to JS as a plain object.
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(v).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&text)
}

/// Read a JS value through its JSON form.
pub fn from_js<T: DeserializeOwned>(v: &JsValue) -> Result<T, JsValue> {
    let text: String = js_sys::JSON::stringify(v)?.into();
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

pub fn lat_lngs_to_js(vertices: &[LatLng]) -> Array {
    vertices
        .iter()
        .map(|p| leaflet::lat_lng_pair(p.lat, p.lng))
        .collect()
}

/// Read a drawn layer into a [`Shape`]. Polygons must be tested first since
/// `L.Polygon` extends `L.Polyline`.
pub fn read_shape(layer: &Layer) -> Result<Shape, JsValue> {
    let err = |e: mirror_core::ShapeError| JsValue::from_str(&e.to_string());
    if let Some(poly) = layer.dyn_ref::<Polygon>() {
        let rings: Vec<Vec<LatLng>> = from_js(&poly.get_lat_lngs())?;
        let outer = rings.into_iter().next().unwrap_or_default();
        Shape::polygon(outer).map_err(err)
    } else if let Some(line) = layer.dyn_ref::<Polyline>() {
        let path: Vec<LatLng> = from_js(&line.get_lat_lngs())?;
        Shape::polyline(path).map_err(err)
    } else {
        Err(JsValue::from_str("layer is neither a polygon nor a polyline"))
    }
}

pub fn read_source(layer: &Layer) -> Result<SourceShape, JsValue> {
    Ok(SourceShape {
        id: ShapeId(leaflet::stamp(layer)),
        shape: read_shape(layer)?,
    })
}

/// Build the runtime config: defaults, then `window.__MIRROR_CONFIG`, then
/// the page's query string.
pub fn load_config(window: &Window) -> MirrorConfig {
    let mut cfg = match js_sys::Reflect::get(window, &JsValue::from_str("__MIRROR_CONFIG")) {
        Ok(v) if v.is_undefined() || v.is_null() => MirrorConfig::default(),
        Ok(v) => {
            let parsed = match v.as_string() {
                Some(text) => MirrorConfig::from_json(&text).map_err(|e| e.to_string()),
                None => from_js::<MirrorConfig>(&v).map_err(|e| format!("{e:?}")),
            };
            parsed.unwrap_or_else(|e| {
                log::warn!("ignoring window.__MIRROR_CONFIG: {e}");
                MirrorConfig::default()
            })
        }
        Err(_) => MirrorConfig::default(),
    };
    if let Ok(search) = window.location().search() {
        cfg.apply_query(&search);
    }
    cfg
}

/// Replace the contents of the `.info-panel` element, if the page has one.
pub fn set_info_html(document: &Document, html: &str) {
    match document.query_selector(".info-panel") {
        Ok(Some(el)) => el.set_inner_html(html),
        _ => log::debug!("no .info-panel element"),
    }
}
