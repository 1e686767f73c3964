use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shape::Shape;

/// Identity of a shape on the draw view (Leaflet's `L.stamp` id in the
/// browser).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SourceShape {
    pub id: ShapeId,
    pub shape: Shape,
}

/// Everything the drawing toolbar reports.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawEvent {
    Finalized(SourceShape),
    Edited(Vec<SourceShape>),
    Deleted(Vec<ShapeId>),
    DrawStart,
    DrawStop,
}

/// Subscription points for the drawing toolbar. The host translates its
/// native events into [`DrawEvent`]s and calls [`DrawingController::dispatch`];
/// handlers run synchronously in registration order.
#[derive(Default)]
pub struct DrawingController {
    finalized: Vec<Box<dyn FnMut(&SourceShape)>>,
    edited: Vec<Box<dyn FnMut(&[SourceShape])>>,
    deleted: Vec<Box<dyn FnMut(&[ShapeId])>>,
    draw_start: Vec<Box<dyn FnMut()>>,
    draw_stop: Vec<Box<dyn FnMut()>>,
}

impl DrawingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_shape_finalized(&mut self, f: impl FnMut(&SourceShape) + 'static) {
        self.finalized.push(Box::new(f));
    }

    pub fn on_shape_edited(&mut self, f: impl FnMut(&[SourceShape]) + 'static) {
        self.edited.push(Box::new(f));
    }

    pub fn on_shape_deleted(&mut self, f: impl FnMut(&[ShapeId]) + 'static) {
        self.deleted.push(Box::new(f));
    }

    pub fn on_draw_start(&mut self, f: impl FnMut() + 'static) {
        self.draw_start.push(Box::new(f));
    }

    pub fn on_draw_stop(&mut self, f: impl FnMut() + 'static) {
        self.draw_stop.push(Box::new(f));
    }

    pub fn dispatch(&mut self, event: DrawEvent) {
        match event {
            DrawEvent::Finalized(src) => {
                log::debug!("finalized {} {}", src.shape.kind(), src.id);
                self.finalized.iter_mut().for_each(|h| h(&src));
            }
            DrawEvent::Edited(srcs) => {
                log::debug!("edited {} shape(s)", srcs.len());
                self.edited.iter_mut().for_each(|h| h(srcs.as_slice()));
            }
            DrawEvent::Deleted(ids) => {
                log::debug!("deleted {} shape(s)", ids.len());
                self.deleted.iter_mut().for_each(|h| h(ids.as_slice()));
            }
            DrawEvent::DrawStart => self.draw_start.iter_mut().for_each(|h| h()),
            DrawEvent::DrawStop => self.draw_stop.iter_mut().for_each(|h| h()),
        }
    }
}
