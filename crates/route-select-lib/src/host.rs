//! Contract with the host map renderer
//!
//! The resolver never draws or projects anything itself. It asks the host to
//! project a click into screen space, to query rendered features, and to run
//! the hit-test once the map style is ready.

use geo::{Coord, LineString, Rect};

/// Layer drawing the primary route line
pub const PRIMARY_ROUTE_LAYER_ID: &str = "primary-route-layer";
/// Outline drawn under the primary route line
pub const PRIMARY_ROUTE_CASING_LAYER_ID: &str = "primary-route-casing-layer";
/// Layer drawing alternative route lines
pub const ALTERNATIVE_ROUTE_LAYER_ID: &str = "alternative-route-layer";
/// Outline drawn under alternative route lines
pub const ALTERNATIVE_ROUTE_CASING_LAYER_ID: &str = "alternative-route-casing-layer";

/// Primary line and casing layers
pub const PRIMARY_ROUTE_LAYERS: [&str; 2] = [PRIMARY_ROUTE_LAYER_ID, PRIMARY_ROUTE_CASING_LAYER_ID];
/// Alternative line and casing layers
pub const ALTERNATIVE_ROUTE_LAYERS: [&str; 2] =
    [ALTERNATIVE_ROUTE_LAYER_ID, ALTERNATIVE_ROUTE_CASING_LAYER_ID];

/// A rendered route feature as returned by a spatial query
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    /// Layer the feature was rendered on
    pub layer_id: String,
    /// Line geometry in WGS84 (x = lon, y = lat)
    pub geometry: LineString<f64>,
    /// Index of the route the feature was rendered from
    pub route_index: usize,
}

/// One-shot continuation run by the host once its style is loaded
///
/// The host passes itself in, so the continuation does not need to keep its
/// own handle to the map alive.
pub type StyleReadyCallback = Box<dyn FnOnce(&dyn MapHost) + Send>;

/// Host map renderer
pub trait MapHost: Send + Sync {
    /// Run `callback` once the visual style is loaded
    ///
    /// Must invoke the callback exactly once, and may do so before returning
    /// when the style is already loaded.
    fn run_when_style_ready(&self, callback: StyleReadyCallback);

    /// Convert a geographic coordinate to screen space
    fn project_to_screen(&self, coord: Coord<f64>) -> Coord<f64>;

    /// Rendered features on any of `layer_ids` that intersect `window`
    /// (screen space)
    fn query_features_in_window(&self, window: Rect<f64>, layer_ids: &[&str]) -> Vec<Feature>;
}
