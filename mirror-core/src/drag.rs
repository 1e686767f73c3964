use crate::latlng::{LatLng, translate};
use crate::shape::Vertices;

/// The host view's own pan-by-drag behavior.
pub trait PanControl {
    fn set_dragging(&mut self, enabled: bool);
}

/// Snapshot taken at pointer-down.
#[derive(Clone, Debug, PartialEq)]
struct DragSession {
    snapshot: Vec<LatLng>,
    start: LatLng,
}

#[derive(Clone, Debug, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Moves one shape with the pointer. Each shape owns its own controller, so
/// sessions on different shapes never interfere.
#[derive(Clone, Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Start a session. Pressing again mid-drag restarts from wherever the
    /// shape currently is.
    pub fn pointer_down<S, P>(&mut self, shape: &S, at: LatLng, pan: &mut P)
    where
        S: Vertices + ?Sized,
        P: PanControl + ?Sized,
    {
        pan.set_dragging(false);
        log::debug!("drag start at {:.5},{:.5}", at.lat, at.lng);
        self.state = DragState::Dragging(DragSession {
            snapshot: shape.vertices().to_vec(),
            start: at,
        });
    }

    /// Returns whether the shape was moved; idle controllers ignore moves.
    pub fn pointer_move<S>(&mut self, shape: &mut S, at: LatLng) -> bool
    where
        S: Vertices + ?Sized,
    {
        match &self.state {
            DragState::Idle => false,
            DragState::Dragging(session) => {
                shape.set_vertices(translate(&session.snapshot, at - session.start));
                true
            }
        }
    }

    /// End the session and hand pan-drag back to the view. Returns whether a
    /// session was actually ended.
    pub fn pointer_up<P>(&mut self, pan: &mut P) -> bool
    where
        P: PanControl + ?Sized,
    {
        match std::mem::take(&mut self.state) {
            DragState::Idle => false,
            DragState::Dragging(_) => {
                pan.set_dragging(true);
                log::debug!("drag end");
                true
            }
        }
    }
}
