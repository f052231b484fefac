//! Route line state - the set of routes currently drawn on the map
//!
//! The resolver only reads this state and asks it to promote a route; it
//! never reorders the routes itself.

use crate::{Result, Route};
use geo::LineString;
use rayon::prelude::*;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Rendered line geometries paired with the route each one was drawn from
pub type LineMapping = Vec<(LineString<f64>, Arc<Route>)>;

/// Holder of the drawn routes, as seen by the click resolver
pub trait RouteLine: Send + Sync {
    /// Whether the route lines are currently shown
    fn is_visible(&self) -> bool;

    /// Drawn line geometries and their routes, `None` when nothing is drawn
    fn line_to_route_mapping(&self) -> Option<LineMapping>;

    /// All drawn routes, primary first
    fn routes(&self) -> Vec<Arc<Route>>;

    /// Make `route` the primary route
    ///
    /// Returns `false` when `route` is not drawn, in which case nothing changes.
    fn promote_to_primary(&self, route: &Arc<Route>) -> bool;

    /// The current primary route, if any
    fn primary_route(&self) -> Option<Arc<Route>>;
}

#[derive(Debug)]
struct RouteLineState {
    routes: Vec<Arc<Route>>,
    visible: bool,
}

/// In-memory, thread-safe [`RouteLine`]
///
/// Index 0 is always the primary route. Promoting a route moves it to the
/// front and keeps the relative order of the others.
#[derive(Debug)]
pub struct MapRouteLine {
    state: RwLock<RouteLineState>,
}

impl Default for MapRouteLine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl MapRouteLine {
    /// Create an empty, visible route line
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RouteLineState {
                routes: Vec::new(),
                visible: true,
            }),
        }
    }

    // A panic while holding the lock cannot leave the route list half
    // updated, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, RouteLineState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RouteLineState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the drawn routes; the first one becomes primary
    pub fn draw(&self, routes: Vec<Arc<Route>>) {
        tracing::debug!("Drawing {} routes", routes.len());
        self.write().routes = routes;
    }

    pub fn set_visible(&self, visible: bool) {
        self.write().visible = visible;
    }

    /// Remove all drawn routes
    pub fn clear(&self) {
        self.write().routes.clear();
    }

    #[inline]
    pub fn route_count(&self) -> usize {
        self.read().routes.len()
    }

    /// Parse GPX files in parallel and draw them, the first file as primary
    ///
    /// On error nothing is drawn and the previous routes are kept.
    pub fn load_from_files<P: AsRef<Path> + Send + Sync>(&self, paths: Vec<P>) -> Result<()> {
        #[cfg(feature = "profiling")]
        profiling::scope!("route_line::load_from_files");

        let routes: Result<Vec<Arc<Route>>> = paths
            .into_par_iter()
            .map(|path| {
                let file = std::fs::File::open(path.as_ref())?;
                let reader = std::io::BufReader::new(file);
                Route::from_gpx(gpx::read(reader)?)
            })
            .collect();

        self.draw(routes?);
        Ok(())
    }
}

impl RouteLine for MapRouteLine {
    fn is_visible(&self) -> bool {
        self.read().visible
    }

    fn line_to_route_mapping(&self) -> Option<LineMapping> {
        let state = self.read();
        if state.routes.is_empty() {
            return None;
        }
        Some(
            state
                .routes
                .iter()
                .map(|route| (route.geometry().clone(), route.clone()))
                .collect(),
        )
    }

    fn routes(&self) -> Vec<Arc<Route>> {
        self.read().routes.clone()
    }

    fn promote_to_primary(&self, route: &Arc<Route>) -> bool {
        let mut state = self.write();
        match state.routes.iter().position(|r| Arc::ptr_eq(r, route)) {
            Some(0) => true,
            Some(index) => {
                let promoted = state.routes.remove(index);
                state.routes.insert(0, promoted);
                tracing::debug!("Promoted route {} from index {}", route.label(), index);
                true
            }
            None => {
                tracing::warn!("Cannot promote route {}: not drawn", route.label());
                false
            }
        }
    }

    fn primary_route(&self) -> Option<Arc<Route>> {
        self.read().routes.first().cloned()
    }
}
