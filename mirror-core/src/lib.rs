//! Host-independent logic for mirroring a drawn map shape onto a second map:
//! recentering, the single-slot mirror store, drag handling and the drawing
//! event hub. The browser front end lives in `mirror-wasm`.

pub mod config;
pub mod drag;
pub mod drawing;
pub mod latlng;
pub mod mirror;
pub mod shape;
pub mod store;
pub mod transform;
pub mod view;

pub use config::{MirrorConfig, ShapeStyle, StyleSet, ViewConfig};
pub use drag::{DragController, PanControl};
pub use drawing::{DrawEvent, DrawingController, ShapeId, SourceShape};
pub use latlng::{Delta, LatLng};
pub use mirror::{Mirror, MirrorTarget, center_maps, clear_all};
pub use shape::{Shape, ShapeError, ShapeKind, Vertices};
pub use store::{DeletePolicy, MirrorStore, Occupant, ShapeCollection};
pub use transform::recenter;
pub use view::{LayerId, MapView, View};

/// Text shown in the instruction panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfoMessage {
    Instructions,
    Drawing,
}

impl InfoMessage {
    pub fn html(self) -> &'static str {
        match self {
            InfoMessage::Instructions => {
                "<strong>Instructions:</strong> Use the polygon or line tools to draw shapes. \
                 They will automatically appear on the comparison map."
            }
            InfoMessage::Drawing => {
                "<strong>Drawing...</strong> Click to add points, double-click to finish the shape."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn info_panel_tracks_draw_start_and_stop() {
        let shown = Rc::new(Cell::new(InfoMessage::Instructions));
        let mut dc = DrawingController::new();
        let s = shown.clone();
        dc.on_draw_start(move || s.set(InfoMessage::Drawing));
        let s = shown.clone();
        dc.on_draw_stop(move || s.set(InfoMessage::Instructions));

        dc.dispatch(DrawEvent::DrawStart);
        assert_eq!(shown.get(), InfoMessage::Drawing);
        assert!(shown.get().html().starts_with("<strong>Drawing"));
        dc.dispatch(DrawEvent::DrawStop);
        assert_eq!(shown.get(), InfoMessage::Instructions);
    }
}
