use crate::latlng::{LatLng, bounds_center, translate};

/// Translate `vertices` so the center of their bounding box lands on
/// `target`. Order and count are preserved; an empty list stays empty.
pub fn recenter(vertices: &[LatLng], target: LatLng) -> Vec<LatLng> {
    match bounds_center(vertices) {
        Some(center) => translate(vertices, target - center),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn recenters_new_york_triangle_onto_london() {
        let src = [
            LatLng::new(40.70, -74.00),
            LatLng::new(40.72, -74.00),
            LatLng::new(40.72, -74.02),
        ];
        let london = LatLng::new(51.5074, -0.1278);
        let out = recenter(&src, london);

        let d_lat = 51.5074 - 40.71;
        let d_lng = -0.1278 - (-74.01);
        assert_eq!(out.len(), 3);
        for (o, s) in out.iter().zip(src.iter()) {
            assert!((o.lat - (s.lat + d_lat)).abs() < EPS);
            assert!((o.lng - (s.lng + d_lng)).abs() < EPS);
        }
    }

    #[test]
    fn single_vertex_moves_onto_target() {
        let out = recenter(&[LatLng::new(1.0, 2.0)], LatLng::new(-3.0, 4.0));
        assert_eq!(out, vec![LatLng::new(-3.0, 4.0)]);
    }

    #[test]
    fn collinear_vertices_still_translate() {
        let src = [LatLng::new(0.0, 0.0), LatLng::new(0.0, 2.0), LatLng::new(0.0, 4.0)];
        let out = recenter(&src, LatLng::new(10.0, 10.0));
        assert_eq!(
            out,
            vec![LatLng::new(10.0, 8.0), LatLng::new(10.0, 10.0), LatLng::new(10.0, 12.0)]
        );
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(recenter(&[], LatLng::new(1.0, 1.0)).is_empty());
    }

    fn coord() -> impl Strategy<Value = LatLng> {
        (-85.0f64..85.0, -180.0f64..180.0).prop_map(LatLng::from)
    }

    proptest! {
        #[test]
        fn output_center_matches_target(
            src in prop::collection::vec(coord(), 1..32),
            target in coord(),
        ) {
            let out = recenter(&src, target);
            prop_assert_eq!(out.len(), src.len());

            let c = bounds_center(&out).unwrap();
            prop_assert!((c.lat - target.lat).abs() < 1e-6);
            prop_assert!((c.lng - target.lng).abs() < 1e-6);

            // uniform translation keeps every pairwise offset
            let d0 = out[0] - src[0];
            for (o, s) in out.iter().zip(src.iter()) {
                let d = *o - *s;
                prop_assert!((d.lat - d0.lat).abs() < 1e-6);
                prop_assert!((d.lng - d0.lng).abs() < 1e-6);
            }
        }
    }
}
