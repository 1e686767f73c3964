use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::latlng::LatLng;
use crate::shape::ShapeKind;
use crate::store::DeletePolicy;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Initial position of one map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub center: LatLng,
    pub zoom: f64,
}

impl ViewConfig {
    pub const fn new(lat: f64, lng: f64, zoom: f64) -> Self {
        ViewConfig {
            center: LatLng::new(lat, lng),
            zoom,
        }
    }

    /// Parse `lat,lng` or `lat,lng,zoom`; a missing zoom keeps `self.zoom`.
    pub fn parse_override(&self, s: &str) -> Option<ViewConfig> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        let (lat, lng, zoom) = match parts.as_slice() {
            [lat, lng] => (*lat, *lng, self.zoom),
            [lat, lng, zoom] => (*lat, *lng, *zoom),
            _ => return None,
        };
        if !(-90.0..=90.0).contains(&lat) || !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        if !(0.0..=24.0).contains(&zoom) {
            return None;
        }
        Some(ViewConfig::new(lat, lng, zoom))
    }
}

/// Leaflet path options. Field names serialize to what Leaflet expects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    pub weight: f64,
}

impl ShapeStyle {
    fn area(stroke: &str, fill: &str) -> Self {
        ShapeStyle {
            color: stroke.to_string(),
            fill_color: Some(fill.to_string()),
            fill_opacity: Some(0.3),
            opacity: None,
            weight: 3.0,
        }
    }

    fn line(stroke: &str) -> Self {
        ShapeStyle {
            color: stroke.to_string(),
            fill_color: None,
            fill_opacity: None,
            opacity: Some(0.8),
            weight: 4.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleSet {
    pub polygon: ShapeStyle,
    pub polyline: ShapeStyle,
}

impl StyleSet {
    pub fn for_kind(&self, kind: ShapeKind) -> &ShapeStyle {
        match kind {
            ShapeKind::Polygon => &self.polygon,
            ShapeKind::Polyline => &self.polyline,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileConfig {
    pub url: String,
    pub attribution: String,
}

impl Default for TileConfig {
    fn default() -> Self {
        TileConfig {
            url: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

/// Runtime configuration. Every field has a default, so partial JSON
/// documents are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub draw: ViewConfig,
    pub compare: ViewConfig,
    pub tiles: TileConfig,
    pub source_style: StyleSet,
    pub mirror_style: StyleSet,
    pub delete_policy: DeletePolicy,
    pub log_level: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        MirrorConfig {
            // New York
            draw: ViewConfig::new(40.7128, -74.0060, 10.0),
            // London
            compare: ViewConfig::new(51.5074, -0.1278, 10.0),
            tiles: TileConfig::default(),
            source_style: StyleSet {
                polygon: ShapeStyle::area("#ff6b6b", "#ff6b6b"),
                polyline: ShapeStyle::line("#ff6b6b"),
            },
            mirror_style: StyleSet {
                polygon: ShapeStyle::area("#6f60c0", "#6a73da"),
                polyline: ShapeStyle::line("#6f60c0"),
            },
            delete_policy: DeletePolicy::Always,
            log_level: "info".to_string(),
        }
    }
}

impl MirrorConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Apply `draw`, `compare`, `delete` and `log` overrides from a URL query
    /// string. Unknown keys are ignored; malformed values are logged and
    /// skipped. Returns how many overrides were applied.
    pub fn apply_query(&mut self, search: &str) -> usize {
        let mut applied = 0;
        for (key, value) in query_pairs(search) {
            let ok = match key.as_str() {
                "draw" => self
                    .draw
                    .parse_override(&value)
                    .map(|v| self.draw = v)
                    .is_some(),
                "compare" => self
                    .compare
                    .parse_override(&value)
                    .map(|v| self.compare = v)
                    .is_some(),
                "delete" => DeletePolicy::parse(&value)
                    .map(|p| self.delete_policy = p)
                    .is_some(),
                "log" => value
                    .parse::<log::LevelFilter>()
                    .map(|_| self.log_level = value.clone())
                    .is_ok(),
                _ => continue,
            };
            if ok {
                applied += 1;
            } else {
                log::warn!("ignoring malformed query parameter {key}={value}");
            }
        }
        applied
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Options for `L.Control.Draw`. The host fills in `edit.featureGroup`
    /// with the draw view's layer group.
    pub fn draw_control_options(&self) -> Value {
        json!({
            "edit": { "remove": true },
            "draw": {
                "polygon": {
                    "allowIntersection": false,
                    "showArea": true,
                    "shapeOptions": self.source_style.polygon,
                },
                "polyline": { "shapeOptions": self.source_style.polyline },
                "circle": false,
                "rectangle": false,
                "marker": false,
                "circlemarker": false,
            }
        })
    }

    pub fn tile_options(&self) -> Value {
        json!({ "attribution": self.tiles.attribution })
    }
}

/// Split a `?a=1&b=2` query string into percent-decoded pairs.
pub fn query_pairs(search: &str) -> impl Iterator<Item = (String, String)> + '_ {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut it = pair.splitn(2, '=');
            let k = it.next().unwrap_or("");
            let v = it.next().unwrap_or("");
            (url_decode(k), url_decode(v))
        })
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    let decoded = percent_encoding::percent_decode_str(&s)
        .decode_utf8()
        .map(|c| c.into_owned());
    decoded.unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_setup() {
        let cfg = MirrorConfig::default();
        assert_eq!(cfg.draw.center, LatLng::new(40.7128, -74.0060));
        assert_eq!(cfg.compare.center, LatLng::new(51.5074, -0.1278));
        assert_eq!(cfg.delete_policy, DeletePolicy::Always);
        assert_eq!(cfg.mirror_style.polygon.fill_color.as_deref(), Some("#6a73da"));
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = MirrorConfig::from_json(
            r#"{"compare":{"center":{"lat":48.8566,"lng":2.3522},"zoom":12},"delete_policy":"source"}"#,
        )
        .unwrap();
        assert_eq!(cfg.compare, ViewConfig::new(48.8566, 2.3522, 12.0));
        assert_eq!(cfg.delete_policy, DeletePolicy::Source);
        assert_eq!(cfg.draw, MirrorConfig::default().draw);
    }

    #[test]
    fn query_overrides_views_and_policy() {
        let mut cfg = MirrorConfig::default();
        let n = cfg.apply_query("?compare=35.6762%2C139.6503&draw=1,2,5&delete=source&log=debug");
        assert_eq!(n, 4);
        assert_eq!(cfg.compare, ViewConfig::new(35.6762, 139.6503, 10.0));
        assert_eq!(cfg.draw, ViewConfig::new(1.0, 2.0, 5.0));
        assert_eq!(cfg.delete_policy, DeletePolicy::Source);
        assert_eq!(cfg.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn malformed_query_values_are_skipped() {
        let mut cfg = MirrorConfig::default();
        let n = cfg.apply_query("compare=abc&draw=95,0&delete=never&log=loud&other=1");
        assert_eq!(n, 0);
        assert_eq!(cfg, MirrorConfig::default());
    }

    #[test]
    fn query_pairs_decode_and_skip_empty() {
        let pairs: Vec<_> = query_pairs("?a=1&&b=x%20y+z&flag").collect();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "x y z".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
        assert_eq!(query_pairs("").count(), 0);
    }

    #[test]
    fn draw_control_disables_other_tools() {
        let opts = MirrorConfig::default().draw_control_options();
        for tool in ["circle", "rectangle", "marker", "circlemarker"] {
            assert_eq!(opts["draw"][tool], false);
        }
        assert_eq!(opts["draw"]["polygon"]["allowIntersection"], false);
        assert_eq!(opts["draw"]["polygon"]["shapeOptions"]["fillOpacity"], 0.3);
        assert_eq!(opts["draw"]["polyline"]["shapeOptions"]["weight"], 4.0);
        assert!(opts["draw"]["polyline"]["shapeOptions"].get("fillColor").is_none());
    }
}
