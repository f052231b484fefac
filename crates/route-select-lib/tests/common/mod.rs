#![allow(dead_code)]

use geo::LineString;
use route_select_lib::utils::lat_lon;
use route_select_lib::{
    MapRouteLine, MapView, RenderedMap, Route, RouteClickResolver, RouteLine,
};
use std::sync::{Arc, Mutex};

/// Latitude of the primary route ("main")
pub const MAIN_LAT: f64 = 51.50;
/// Latitude of the first alternative ("north"), ~750 screen units above "main"
pub const NORTH_LAT: f64 = 51.52;
/// Latitude of the second alternative ("south"), ~750 screen units below "main"
pub const SOUTH_LAT: f64 = 51.48;

/// East-west route at a fixed latitude
pub fn horizontal_route(name: &str, lat: f64) -> Arc<Route> {
    let line = LineString::from(vec![lat_lon(lat, -0.14), lat_lon(lat, -0.10)]);
    Route::new(Some(name.to_string()), line).expect("valid test route")
}

pub struct Scene {
    pub line: Arc<MapRouteLine>,
    pub map: Arc<RenderedMap>,
    pub resolver: RouteClickResolver,
    pub notified: Arc<Mutex<Vec<String>>>,
}

impl Scene {
    pub fn primary(&self) -> String {
        self.line
            .primary_route()
            .map(|r| r.label())
            .unwrap_or_default()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notified.lock().unwrap().clone()
    }

    /// Redraw layers after the selection changed, like a real map would
    pub fn rerender(&self) {
        self.map.render_routes(self.line.as_ref());
    }
}

/// Three routes rendered at zoom 15 around central London, style not loaded
///
/// The viewport is tall enough for all three routes to be on screen.
pub fn scene() -> Scene {
    let line = Arc::new(MapRouteLine::new());
    line.draw(vec![
        horizontal_route("main", MAIN_LAT),
        horizontal_route("north", NORTH_LAT),
        horizontal_route("south", SOUTH_LAT),
    ]);
    let map = Arc::new(RenderedMap::new(MapView::new(
        lat_lon(MAIN_LAT, -0.12),
        15.0,
        (1000.0, 2000.0),
    )));
    map.render_routes(line.as_ref());

    let mut resolver = RouteClickResolver::new(line.clone(), map.clone());
    let notified = Arc::new(Mutex::new(Vec::new()));
    let sink = notified.clone();
    resolver.set_selection_change_listener(move |route: &Arc<Route>| {
        sink.lock().unwrap().push(route.label());
    });

    Scene {
        line,
        map,
        resolver,
        notified,
    }
}
