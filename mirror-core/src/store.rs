use serde::{Deserialize, Serialize};

use crate::drawing::ShapeId;
use crate::shape::Shape;

/// A layer group that shapes can be added to and removed from. The handle is
/// whatever the host needs to remove the shape again.
pub trait ShapeCollection {
    type Handle;

    fn add(&mut self, shape: Shape) -> Self::Handle;
    fn remove(&mut self, handle: &Self::Handle);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a delete event does to the mirror.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Any deletion clears the mirror.
    #[default]
    Always,
    /// Only deleting the shape the mirror was made from clears it.
    Source,
}

impl DeletePolicy {
    pub fn parse(s: &str) -> Option<DeletePolicy> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" | "all" => Some(DeletePolicy::Always),
            "source" | "match" => Some(DeletePolicy::Source),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Occupant<H> {
    pub source: ShapeId,
    pub handle: H,
}

/// Single-slot holder for the mirrored shape on the compare view.
pub struct MirrorStore<C: ShapeCollection> {
    collection: C,
    slot: Option<Occupant<C::Handle>>,
}

impl<C: ShapeCollection> MirrorStore<C> {
    pub fn new(collection: C) -> Self {
        MirrorStore {
            collection,
            slot: None,
        }
    }

    /// Evict the current mirror, if any, and put `shape` in its place.
    pub fn replace(&mut self, source: ShapeId, shape: Shape) -> &C::Handle {
        self.clear();
        log::debug!("mirror <- {} from source {}", shape.kind(), source);
        let handle = self.collection.add(shape);
        &self.slot.insert(Occupant { source, handle }).handle
    }

    /// Evict the current mirror. Clearing an empty slot does nothing.
    pub fn clear(&mut self) {
        if let Some(old) = self.slot.take() {
            log::debug!("mirror evicted (source {})", old.source);
            self.collection.remove(&old.handle);
        }
    }

    /// Apply a deletion of `deleted` source shapes under `policy`. Returns
    /// whether the mirror was cleared.
    pub fn clear_for(&mut self, deleted: &[ShapeId], policy: DeletePolicy) -> bool {
        let hit = match (&self.slot, policy) {
            (None, _) => false,
            (Some(_), DeletePolicy::Always) => true,
            (Some(o), DeletePolicy::Source) => deleted.contains(&o.source),
        };
        if hit {
            self.clear();
        }
        hit
    }

    /// Forget the occupant without touching the collection; used when the
    /// host has already emptied the collection wholesale.
    pub fn forget(&mut self) {
        self.slot = None;
    }

    pub fn occupant(&self) -> Option<&Occupant<C::Handle>> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut C {
        &mut self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlng::LatLng;
    use crate::view::View;

    fn tri(lat: f64) -> Shape {
        Shape::polygon(vec![
            LatLng::new(lat, 0.0),
            LatLng::new(lat + 1.0, 0.0),
            LatLng::new(lat + 1.0, 1.0),
        ])
        .unwrap()
    }

    fn store() -> MirrorStore<View> {
        MirrorStore::new(View::new(LatLng::new(51.5074, -0.1278), 10.0))
    }

    #[test]
    fn only_latest_replace_survives() {
        let mut s = store();
        for i in 0..5 {
            s.replace(ShapeId(i), tri(i as f64));
        }
        let view = s.collection();
        assert_eq!(view.len(), 1);
        assert_eq!(view.shapes().next(), Some(&tri(4.0)));
        assert_eq!(s.occupant().map(|o| o.source), Some(ShapeId(4)));
    }

    #[test]
    fn clear_empties_collection() {
        let mut s = store();
        s.replace(ShapeId(1), tri(0.0));
        s.clear();
        assert!(s.is_empty());
        assert!(s.collection().is_empty());
    }

    #[test]
    fn clear_on_empty_slot_is_noop() {
        let mut s = store();
        s.clear();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.collection().len(), 0);
    }

    #[test]
    fn always_policy_clears_for_unrelated_delete() {
        let mut s = store();
        s.replace(ShapeId(2), tri(0.0));
        assert!(s.clear_for(&[ShapeId(1)], DeletePolicy::Always));
        assert!(s.collection().is_empty());
    }

    #[test]
    fn source_policy_keeps_mirror_for_unrelated_delete() {
        let mut s = store();
        s.replace(ShapeId(2), tri(0.0));
        assert!(!s.clear_for(&[ShapeId(1)], DeletePolicy::Source));
        assert_eq!(s.collection().len(), 1);
        assert!(s.clear_for(&[ShapeId(1), ShapeId(2)], DeletePolicy::Source));
        assert!(s.collection().is_empty());
    }

    #[test]
    fn delete_policy_parse() {
        assert_eq!(DeletePolicy::parse("Always"), Some(DeletePolicy::Always));
        assert_eq!(DeletePolicy::parse(" source "), Some(DeletePolicy::Source));
        assert_eq!(DeletePolicy::parse("never"), None);
    }
}
