use std::cell::RefCell;
use std::rc::Rc;

use mirror_core::{Mirror, MirrorConfig};

use crate::layers::{CompareMap, DrawMap};

/// Runtime state reachable from the exported functions. The draw-event
/// closures hold their own handles and do not go through here.
pub struct State {
    pub config: MirrorConfig,
    pub draw: DrawMap,
    pub mirror: Rc<RefCell<Mirror<CompareMap>>>,
}

thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}

/// Run `f` against the state, or return `None` before start-up finished.
pub fn with_state<R>(f: impl FnOnce(&mut State) -> R) -> Option<R> {
    let state = STATE.with(|st| st.borrow().clone())?;
    let mut s = state.borrow_mut();
    Some(f(&mut s))
}
