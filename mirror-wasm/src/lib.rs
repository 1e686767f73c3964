use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use log::LevelFilter;
use mirror_core::{
    DrawEvent, DrawingController, InfoMessage, Mirror, MirrorConfig, ShapeId, ShapeKind,
    ViewConfig, center_maps, clear_all,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

mod layers;
mod leaflet;
mod logger;
mod state;
mod utils;

use crate::layers::{CompareMap, DrawMap};
use crate::leaflet::{DrawControl, DrawPayload, FeatureGroup, Layer, Map};
use crate::state::{STATE, State, with_state};
use crate::utils::{load_config, read_source, set_info_html, to_js};

fn init_map(id: &str, view: &ViewConfig, cfg: &MirrorConfig) -> Result<Map, JsValue> {
    let map = leaflet::map(id)?;
    map.set_view(
        &leaflet::lat_lng_pair(view.center.lat, view.center.lng),
        view.zoom,
    );
    let tiles = leaflet::tile_layer(&cfg.tiles.url, &to_js(&cfg.tile_options())?);
    map.add_layer(&tiles);
    Ok(map)
}

fn init_draw_control(draw: &DrawMap, cfg: &MirrorConfig) -> Result<(), JsValue> {
    let opts = to_js(&cfg.draw_control_options())?;
    let edit = Reflect::get(&opts, &JsValue::from_str("edit"))?;
    Reflect::set(&edit, &JsValue::from_str("featureGroup"), &draw.group)?;
    draw.map.add_control(&DrawControl::new(&opts));
    Ok(())
}

fn layers_of(e: &DrawPayload) -> Vec<Layer> {
    e.layers()
        .get_layers()
        .iter()
        .map(|l| l.unchecked_into::<Layer>())
        .collect()
}

// Translate Leaflet.draw events into DrawEvents for the controller.
fn attach_draw_events(draw: &DrawMap, drawing: &Rc<RefCell<DrawingController>>) {
    {
        let dc = drawing.clone();
        let group = draw.group.clone();
        let created = Closure::<dyn FnMut(DrawPayload)>::wrap(Box::new(move |e: DrawPayload| {
            let layer = e.layer();
            group.add_layer(&layer);
            let reported = e.layer_type();
            match read_source(&layer) {
                Ok(src) => {
                    match reported.as_deref().map(ShapeKind::from_layer_type) {
                        Some(Some(kind)) if kind != src.shape.kind() => log::warn!(
                            "toolbar reported {kind} but layer {} reads as {}",
                            src.id,
                            src.shape.kind()
                        ),
                        Some(None) => log::debug!("unrecognized layerType {reported:?}"),
                        _ => {}
                    }
                    dc.borrow_mut().dispatch(DrawEvent::Finalized(src));
                }
                Err(err) => log::warn!("not mirroring {reported:?} layer: {err:?}"),
            }
        }));
        draw.map
            .on("draw:created", created.as_ref().unchecked_ref());
        created.forget();
    }
    {
        let dc = drawing.clone();
        let edited = Closure::<dyn FnMut(DrawPayload)>::wrap(Box::new(move |e: DrawPayload| {
            let srcs = layers_of(&e)
                .iter()
                .filter_map(|layer| match read_source(layer) {
                    Ok(src) => Some(src),
                    Err(err) => {
                        log::warn!("skipping edited layer: {err:?}");
                        None
                    }
                })
                .collect();
            dc.borrow_mut().dispatch(DrawEvent::Edited(srcs));
        }));
        draw.map
            .on("draw:edited", edited.as_ref().unchecked_ref());
        edited.forget();
    }
    {
        let dc = drawing.clone();
        let deleted = Closure::<dyn FnMut(DrawPayload)>::wrap(Box::new(move |e: DrawPayload| {
            let ids = layers_of(&e)
                .iter()
                .map(|layer| ShapeId(leaflet::stamp(layer)))
                .collect();
            dc.borrow_mut().dispatch(DrawEvent::Deleted(ids));
        }));
        draw.map
            .on("draw:deleted", deleted.as_ref().unchecked_ref());
        deleted.forget();
    }
    for (name, event) in [
        ("draw:drawstart", DrawEvent::DrawStart),
        ("draw:drawstop", DrawEvent::DrawStop),
    ] {
        let dc = drawing.clone();
        let cb = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            dc.borrow_mut().dispatch(event.clone());
        }));
        draw.map.on(name, cb.as_ref().unchecked_ref());
        cb.forget();
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if let Err(e) = logger::init(LevelFilter::Info) {
        let msg = format!("console logger not installed: {e}");
        web_sys::console::warn_1(&JsValue::from_str(&msg));
    }
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let config = load_config(&window);
    logger::set_level(config.level_filter());

    let draw = DrawMap {
        map: init_map("drawMap", &config.draw, &config)?,
        group: FeatureGroup::new(),
    };
    draw.map.add_layer(&draw.group);
    init_draw_control(&draw, &config)?;

    let compare_map = init_map("compareMap", &config.compare, &config)?;
    let compare_group = FeatureGroup::new();
    compare_map.add_layer(&compare_group);
    let compare = CompareMap::new(compare_map, compare_group, config.mirror_style.clone());
    let mirror = Rc::new(RefCell::new(Mirror::new(compare, config.delete_policy)));

    let drawing = Rc::new(RefCell::new(DrawingController::new()));
    {
        let mut dc = drawing.borrow_mut();
        Mirror::connect(&mirror, &mut dc);
        let doc = document.clone();
        dc.on_draw_start(move || set_info_html(&doc, InfoMessage::Drawing.html()));
        let doc = document.clone();
        dc.on_draw_stop(move || set_info_html(&doc, InfoMessage::Instructions.html()));
    }
    attach_draw_events(&draw, &drawing);

    log::info!(
        "mirroring onto {:.4},{:.4} (delete policy {:?})",
        config.compare.center.lat,
        config.compare.center.lng,
        config.delete_policy
    );
    let state = Rc::new(RefCell::new(State {
        config,
        draw,
        mirror,
    }));
    STATE.with(|st| st.replace(Some(state)));
    Ok(())
}

/// Remove every shape from both maps.
#[wasm_bindgen(js_name = clearPolygons)]
pub fn clear_polygons() {
    with_state(|s| {
        let mut mirror = s.mirror.borrow_mut();
        clear_all(&mut s.draw, &mut *mirror);
    });
}

/// Reset both maps to their starting view.
#[wasm_bindgen(js_name = centerMaps)]
pub fn center_maps_js() {
    with_state(|s| {
        let mut mirror = s.mirror.borrow_mut();
        center_maps(&mut s.draw, mirror.target_mut(), &s.config);
    });
}

fn current_mirror() -> Option<mirror_core::Shape> {
    with_state(|s| {
        s.mirror
            .borrow()
            .store()
            .occupant()
            .map(|o| o.handle.shape())
    })
    .flatten()
}

/// The mirrored shape, where it currently sits, as JSON.
#[wasm_bindgen(js_name = mirrorJson)]
pub fn mirror_json() -> Result<Option<String>, JsValue> {
    current_mirror()
        .map(|shape| serde_json::to_string(&shape))
        .transpose()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The mirrored shape as an encoded polyline string.
#[wasm_bindgen(js_name = mirrorPolyline)]
pub fn mirror_polyline() -> Result<Option<String>, JsValue> {
    current_mirror()
        .map(|shape| shape.encoded_polyline())
        .transpose()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
