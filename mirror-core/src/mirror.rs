use std::cell::RefCell;
use std::rc::Rc;

use crate::config::MirrorConfig;
use crate::drawing::{DrawingController, ShapeId, SourceShape};
use crate::latlng::LatLng;
use crate::store::{DeletePolicy, MirrorStore, ShapeCollection};
use crate::view::{MapView, View};

/// A collection that lives on a map and can tell where that map is centered.
pub trait MirrorTarget: ShapeCollection {
    fn center(&self) -> LatLng;
}

impl MirrorTarget for View {
    fn center(&self) -> LatLng {
        View::center(self)
    }
}

/// Keeps the compare view showing a recentered copy of the most recently
/// drawn or edited source shape.
pub struct Mirror<C: MirrorTarget> {
    store: MirrorStore<C>,
    policy: DeletePolicy,
}

impl<C: MirrorTarget> Mirror<C> {
    pub fn new(target: C, policy: DeletePolicy) -> Self {
        Mirror {
            store: MirrorStore::new(target),
            policy,
        }
    }

    pub fn shape_finalized(&mut self, src: &SourceShape) -> &C::Handle {
        let center = self.store.collection().center();
        let copy = src.shape.recentered(center);
        self.store.replace(src.id, copy)
    }

    /// Each edited shape is mirrored in turn; the last one stays.
    pub fn shapes_edited(&mut self, srcs: &[SourceShape]) {
        for src in srcs {
            self.shape_finalized(src);
        }
    }

    pub fn shapes_deleted(&mut self, ids: &[ShapeId]) -> bool {
        self.store.clear_for(ids, self.policy)
    }

    pub fn store(&self) -> &MirrorStore<C> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MirrorStore<C> {
        &mut self.store
    }

    pub fn target(&self) -> &C {
        self.store.collection()
    }

    pub fn target_mut(&mut self) -> &mut C {
        self.store.collection_mut()
    }
}

impl<C: MirrorTarget + 'static> Mirror<C> {
    /// Subscribe `mirror` to the create/edit/delete events of `dc`.
    pub fn connect(mirror: &Rc<RefCell<Self>>, dc: &mut DrawingController) {
        let m = mirror.clone();
        dc.on_shape_finalized(move |src| {
            m.borrow_mut().shape_finalized(src);
        });
        let m = mirror.clone();
        dc.on_shape_edited(move |srcs| m.borrow_mut().shapes_edited(srcs));
        let m = mirror.clone();
        dc.on_shape_deleted(move |ids| {
            m.borrow_mut().shapes_deleted(ids);
        });
    }
}

/// Drop every shape from both views and empty the mirror slot.
pub fn clear_all<D, C>(draw: &mut D, mirror: &mut Mirror<C>)
where
    D: MapView,
    C: MirrorTarget + MapView,
{
    draw.clear_layers();
    mirror.target_mut().clear_layers();
    mirror.store_mut().forget();
    log::info!("cleared both maps");
}

/// Put both views back at their configured starting position.
pub fn center_maps<D, C>(draw: &mut D, compare: &mut C, cfg: &MirrorConfig)
where
    D: MapView,
    C: MapView,
{
    draw.set_view(cfg.draw.center, cfg.draw.zoom);
    compare.set_view(cfg.compare.center, cfg.compare.zoom);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::DrawEvent;
    use crate::shape::{Shape, Vertices};
    use crate::store::ShapeCollection;

    const EPS: f64 = 1e-9;

    fn london() -> View {
        View::new(LatLng::new(51.5074, -0.1278), 10.0)
    }

    fn nyc_triangle(id: u32) -> SourceShape {
        SourceShape {
            id: ShapeId(id),
            shape: Shape::polygon(vec![
                LatLng::new(40.70, -74.00),
                LatLng::new(40.72, -74.00),
                LatLng::new(40.72, -74.02),
            ])
            .unwrap(),
        }
    }

    fn wired(policy: DeletePolicy) -> (Rc<RefCell<Mirror<View>>>, DrawingController) {
        let mirror = Rc::new(RefCell::new(Mirror::new(london(), policy)));
        let mut dc = DrawingController::new();
        Mirror::connect(&mirror, &mut dc);
        (mirror, dc)
    }

    #[test]
    fn finalized_polygon_lands_on_compare_center() {
        let (mirror, mut dc) = wired(DeletePolicy::Always);
        let src = nyc_triangle(1);
        dc.dispatch(DrawEvent::Finalized(src.clone()));

        let m = mirror.borrow();
        let target = m.target();
        assert_eq!(target.len(), 1);
        let copy = target.shapes().next().unwrap();
        assert!(matches!(copy, Shape::Polygon(_)));

        let d_lat = 51.5074 - 40.71;
        let d_lng = -0.1278 - (-74.01);
        for (o, s) in copy.vertices().iter().zip(src.shape.vertices()) {
            assert!((o.lat - (s.lat + d_lat)).abs() < EPS);
            assert!((o.lng - (s.lng + d_lng)).abs() < EPS);
        }
    }

    #[test]
    fn mirror_follows_current_compare_center() {
        let (mirror, mut dc) = wired(DeletePolicy::Always);
        mirror.borrow_mut().target_mut().pan_to(LatLng::new(0.0, 0.0));
        dc.dispatch(DrawEvent::Finalized(nyc_triangle(1)));

        let m = mirror.borrow();
        let copy = m.target().shapes().next().unwrap();
        let c = crate::latlng::bounds_center(copy.vertices()).unwrap();
        assert!(c.lat.abs() < EPS && c.lng.abs() < EPS);
    }

    #[test]
    fn any_delete_clears_mirror_by_default() {
        let (mirror, mut dc) = wired(DeletePolicy::Always);
        dc.dispatch(DrawEvent::Finalized(nyc_triangle(1)));
        dc.dispatch(DrawEvent::Finalized(nyc_triangle(2)));
        dc.dispatch(DrawEvent::Deleted(vec![ShapeId(1)]));
        assert!(mirror.borrow().target().is_empty());
        assert!(mirror.borrow().store().is_empty());
    }

    #[test]
    fn source_policy_ignores_unrelated_delete() {
        let (mirror, mut dc) = wired(DeletePolicy::Source);
        dc.dispatch(DrawEvent::Finalized(nyc_triangle(1)));
        dc.dispatch(DrawEvent::Finalized(nyc_triangle(2)));
        dc.dispatch(DrawEvent::Deleted(vec![ShapeId(1)]));
        assert_eq!(mirror.borrow().target().len(), 1);
        dc.dispatch(DrawEvent::Deleted(vec![ShapeId(2)]));
        assert!(mirror.borrow().target().is_empty());
    }

    #[test]
    fn delete_with_nothing_mirrored_is_noop() {
        let (mirror, mut dc) = wired(DeletePolicy::Always);
        dc.dispatch(DrawEvent::Deleted(vec![ShapeId(9)]));
        assert!(mirror.borrow().target().is_empty());
    }

    #[test]
    fn edit_replaces_existing_mirror() {
        let (mirror, mut dc) = wired(DeletePolicy::Always);
        dc.dispatch(DrawEvent::Finalized(nyc_triangle(1)));

        let mut edited = nyc_triangle(1);
        edited.shape.set_vertices(vec![
            LatLng::new(40.0, -74.0),
            LatLng::new(41.0, -74.0),
            LatLng::new(41.0, -73.0),
            LatLng::new(40.0, -73.0),
        ]);
        dc.dispatch(DrawEvent::Edited(vec![edited]));

        let m = mirror.borrow();
        assert_eq!(m.target().len(), 1);
        assert_eq!(m.target().shapes().next().unwrap().vertices().len(), 4);
        assert_eq!(m.store().occupant().map(|o| o.source), Some(ShapeId(1)));
    }

    #[test]
    fn multi_edit_keeps_last_shape() {
        let (mirror, mut dc) = wired(DeletePolicy::Always);
        let line = SourceShape {
            id: ShapeId(5),
            shape: Shape::polyline(vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)]).unwrap(),
        };
        dc.dispatch(DrawEvent::Edited(vec![nyc_triangle(4), line]));
        let m = mirror.borrow();
        assert_eq!(m.target().len(), 1);
        assert_eq!(m.store().occupant().map(|o| o.source), Some(ShapeId(5)));
    }

    #[test]
    fn clear_all_empties_both_views() {
        let mut draw = View::new(LatLng::new(40.7128, -74.0060), 10.0);
        let mut mirror = Mirror::new(london(), DeletePolicy::Always);
        let src = nyc_triangle(1);
        draw.add(src.shape.clone());
        mirror.shape_finalized(&src);

        clear_all(&mut draw, &mut mirror);
        assert!(draw.is_empty());
        assert!(mirror.target().is_empty());
        assert!(mirror.store().is_empty());

        // slot stays usable afterwards
        mirror.shape_finalized(&src);
        assert_eq!(mirror.target().len(), 1);
    }

    #[test]
    fn center_maps_restores_configured_views() {
        let cfg = MirrorConfig::default();
        let mut draw = View::new(LatLng::new(0.0, 0.0), 3.0);
        let mut compare = View::new(LatLng::new(1.0, 1.0), 4.0);
        center_maps(&mut draw, &mut compare, &cfg);
        assert_eq!(draw.center(), cfg.draw.center);
        assert_eq!(draw.zoom(), cfg.draw.zoom);
        assert_eq!(compare.center(), LatLng::new(51.5074, -0.1278));
        assert_eq!(compare.zoom(), 10.0);
    }
}
