//! In-memory map host
//!
//! `RenderedMap` keeps the features of each route layer in memory and answers
//! spatial queries against their screen-space geometry. Like a real renderer
//! it only reports features drawn inside the viewport. It stands in for a
//! real renderer in tools and tests.

use crate::host::{
    ALTERNATIVE_ROUTE_CASING_LAYER_ID, ALTERNATIVE_ROUTE_LAYER_ID, Feature, MapHost,
    PRIMARY_ROUTE_CASING_LAYER_ID, PRIMARY_ROUTE_LAYER_ID, StyleReadyCallback,
};
use crate::projection::MapView;
use crate::route_line::RouteLine;
use geo::{Coord, Intersects, LineString, Rect};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, RwLock};

/// One-shot style gate: callbacks wait until the style is loaded
#[derive(Default)]
struct StyleState {
    loaded: bool,
    pending: Vec<StyleReadyCallback>,
}

/// Map host backed by in-memory layers
#[derive(Default)]
pub struct RenderedMap {
    view: RwLock<MapView>,
    layers: RwLock<HashMap<String, Vec<Feature>>>,
    style: Mutex<StyleState>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl RenderedMap {
    /// Create a map with the given camera and no style loaded yet
    pub fn new(view: MapView) -> Self {
        Self {
            view: RwLock::new(view),
            ..Default::default()
        }
    }

    fn style(&self) -> MutexGuard<'_, StyleState> {
        self.style.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn view(&self) -> MapView {
        *self.view.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_view(&self, view: MapView) {
        *self.view.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = view;
    }

    pub fn is_style_loaded(&self) -> bool {
        self.style().loaded
    }

    /// Number of callbacks waiting for the style
    pub fn pending_callbacks(&self) -> usize {
        self.style().pending.len()
    }

    /// Mark the style as loaded and run every waiting callback in order
    pub fn set_style_loaded(&self) {
        // Callbacks may register more callbacks, so the lock is released
        // before running them.
        let pending = {
            let mut style = self.style();
            style.loaded = true;
            std::mem::take(&mut style.pending)
        };
        tracing::debug!("Style loaded, running {} pending callbacks", pending.len());
        for callback in pending {
            callback(self);
        }
    }

    /// Go back to the unloaded state, e.g. while a new style is fetched
    pub fn unload_style(&self) {
        self.style().loaded = false;
    }

    /// Replace all features of one layer
    pub fn set_layer_features(&self, layer_id: &str, features: Vec<Feature>) {
        self.layers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(layer_id.to_string(), features);
    }

    /// Rebuild the route layers from the routes currently drawn
    ///
    /// The primary route goes to the primary line and casing layers; every
    /// other route goes to the alternative ones. Hidden route lines leave all
    /// four layers empty.
    pub fn render_routes(&self, route_line: &dyn RouteLine) {
        let routes = if route_line.is_visible() {
            route_line.routes()
        } else {
            Vec::new()
        };

        let features_for = |layer_id: &str, primary: bool| -> Vec<Feature> {
            routes
                .iter()
                .enumerate()
                .filter(|(index, _)| (*index == 0) == primary)
                .map(|(route_index, route)| Feature {
                    layer_id: layer_id.to_string(),
                    geometry: route.geometry().clone(),
                    route_index,
                })
                .collect()
        };

        let mut layers = self
            .layers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for (layer_id, primary) in [
            (PRIMARY_ROUTE_LAYER_ID, true),
            (PRIMARY_ROUTE_CASING_LAYER_ID, true),
            (ALTERNATIVE_ROUTE_LAYER_ID, false),
            (ALTERNATIVE_ROUTE_CASING_LAYER_ID, false),
        ] {
            layers.insert(layer_id.to_string(), features_for(layer_id, primary));
        }
        tracing::debug!("Rendered {} routes into route layers", routes.len());
    }
}

impl MapHost for RenderedMap {
    fn run_when_style_ready(&self, callback: StyleReadyCallback) {
        {
            let mut style = self.style();
            if !style.loaded {
                style.pending.push(callback);
                return;
            }
        }
        callback(self);
    }

    fn project_to_screen(&self, coord: Coord<f64>) -> Coord<f64> {
        self.view().project(coord)
    }

    fn query_features_in_window(&self, window: Rect<f64>, layer_ids: &[&str]) -> Vec<Feature> {
        #[cfg(feature = "profiling")]
        profiling::scope!("rendered::query_features_in_window");

        let view = self.view();
        let Some(window) = view.clip_to_viewport(window) else {
            return Vec::new();
        };
        let layers = self
            .layers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        layer_ids
            .iter()
            .filter_map(|layer_id| layers.get(*layer_id))
            .flatten()
            .filter(|feature| {
                let screen_line: LineString<f64> =
                    feature.geometry.coords().map(|&c| view.project(c)).collect();
                window.intersects(&screen_line)
            })
            .cloned()
            .collect()
    }
}
