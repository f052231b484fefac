//! Route storage module
//!
//! A `Route` is the immutable geometry of one navigation route, with a few
//! precomputed values. Routes are shared as `Arc<Route>` and compared by
//! pointer identity when deciding whether the selection changed.

use crate::{Result, RouteError, utils};
use geo::{Coord, LineString, Rect};
use std::sync::Arc;

/// A single navigation route with its geometry and cached metadata
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Optional human readable name (GPX `<name>` when loaded from a file)
    name: Option<String>,
    /// Route geometry in WGS84 (x = lon, y = lat)
    geometry: LineString<f64>,
    /// Precomputed bounding box in Web Mercator meters
    bounding_box_mercator: Rect<f64>,
    /// Cached length in meters
    cached_length: f64,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Route {
    /// Create a new route from a WGS84 line
    ///
    /// Points outside Web Mercator bounds are kept in the geometry but do not
    /// contribute to the bounding box or the length.
    ///
    /// # Returns
    /// An `Arc<Route>` on success, or an error if the line has fewer than two
    /// points or none of them can be projected
    pub fn new(name: Option<String>, geometry: LineString<f64>) -> Result<Arc<Self>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("route::new");

        if geometry.0.len() < 2 {
            return Err(RouteError::EmptyRoute);
        }

        let (bounding_box_mercator, cached_length) = Self::compute_metadata(&geometry)?;

        Ok(Arc::new(Route {
            name,
            geometry,
            bounding_box_mercator,
            cached_length,
        }))
    }

    /// Build a route from parsed GPX data
    ///
    /// All track segments are concatenated in file order, followed by the
    /// points of any GPX `<rte>` elements.
    pub fn from_gpx(gpx_data: gpx::Gpx) -> Result<Arc<Self>> {
        let name = gpx_data
            .metadata
            .as_ref()
            .and_then(|m| m.name.clone())
            .or_else(|| gpx_data.tracks.iter().find_map(|t| t.name.clone()))
            .or_else(|| gpx_data.routes.iter().find_map(|r| r.name.clone()));

        let track_points = gpx_data
            .tracks
            .iter()
            .flat_map(|t| t.segments.iter())
            .flat_map(|s| s.points.iter());
        let route_points = gpx_data.routes.iter().flat_map(|r| r.points.iter());

        let coords: Vec<Coord<f64>> = track_points
            .chain(route_points)
            .map(|waypoint| {
                let p = waypoint.point();
                utils::lat_lon(p.y(), p.x())
            })
            .collect();

        Self::new(name, LineString::from(coords))
    }

    /// Returns (bounding_box, length)
    fn compute_metadata(geometry: &LineString<f64>) -> Result<(Rect<f64>, f64)> {
        let mut min = Coord {
            x: f64::INFINITY,
            y: f64::INFINITY,
        };
        let mut max = Coord {
            x: f64::NEG_INFINITY,
            y: f64::NEG_INFINITY,
        };
        let mut length = 0.0;
        let mut prev: Option<Coord<f64>> = None;

        for &coord in geometry.coords() {
            if !utils::is_valid_wgs84(coord) {
                tracing::warn!(
                    "Skipping route point outside WGS84 bounds: ({}, {})",
                    coord.y,
                    coord.x
                );
                prev = None; // Break distance chain
                continue;
            }
            let mercator = utils::to_mercator(coord);
            min.x = min.x.min(mercator.x);
            min.y = min.y.min(mercator.y);
            max.x = max.x.max(mercator.x);
            max.y = max.y.max(mercator.y);

            if let Some(prev) = prev {
                length += utils::haversine_distance(prev, coord);
            }
            prev = Some(coord);
        }

        if min.x > max.x {
            return Err(RouteError::InvalidGeometry(
                "No valid points in route".to_string(),
            ));
        }

        Ok((Rect::new(min, max), length))
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Route geometry in WGS84
    #[inline]
    pub fn geometry(&self) -> &LineString<f64> {
        &self.geometry
    }

    /// Get the bounding box in Web Mercator meters
    #[inline]
    pub fn bounding_box(&self) -> Rect<f64> {
        self.bounding_box_mercator
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.geometry.0.len()
    }

    /// Length in meters (haversine, cached during construction)
    #[inline]
    pub fn length(&self) -> f64 {
        self.cached_length
    }

    /// Short label for logs: the name, or the point count when unnamed
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("<unnamed, {} points>", self.point_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpx::{Gpx, Track, TrackSegment, Waypoint};

    fn create_test_waypoint(lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(geo::Point::new(lon, lat))
    }

    fn create_test_gpx() -> Gpx {
        let mut gpx = Gpx::default();
        let mut track = Track::default();
        track.name = Some("Thames walk".to_string());
        let mut segment = TrackSegment::default();

        // Add a few test points (around London)
        segment.points.push(create_test_waypoint(51.5074, -0.1278));
        segment.points.push(create_test_waypoint(51.5076, -0.1276));
        segment.points.push(create_test_waypoint(51.5078, -0.1274));

        track.segments.push(segment);
        gpx.tracks.push(track);
        gpx
    }

    #[test]
    fn test_route_from_gpx() {
        let route = Route::from_gpx(create_test_gpx()).unwrap();

        assert_eq!(route.point_count(), 3);
        assert_eq!(route.name(), Some("Thames walk"));
    }

    #[test]
    fn test_gpx_route_points_are_appended() {
        let mut gpx = create_test_gpx();
        let mut rte = gpx::Route::default();
        rte.points.push(create_test_waypoint(51.5080, -0.1272));
        gpx.routes.push(rte);

        let route = Route::from_gpx(gpx).unwrap();
        assert_eq!(route.point_count(), 4);
        let last = route.geometry().0.last().copied().unwrap();
        assert!((last.y - 51.5080).abs() < 1e-9);
    }

    #[test]
    fn test_empty_route_fails() {
        let result = Route::from_gpx(Gpx::default());
        assert!(matches!(result, Err(RouteError::EmptyRoute)));
    }

    #[test]
    fn test_single_point_route_fails() {
        let line = LineString::from(vec![(0.0, 0.0)]);
        assert!(matches!(Route::new(None, line), Err(RouteError::EmptyRoute)));
    }

    #[test]
    fn test_all_invalid_points_fail() {
        let line = LineString::from(vec![(500.0, 100.0), (600.0, 120.0)]);
        assert!(matches!(
            Route::new(None, line),
            Err(RouteError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_bounding_box() {
        let route = Route::from_gpx(create_test_gpx()).unwrap();

        let bbox = route.bounding_box();
        assert!(bbox.width() > 0.0);
        assert!(bbox.height() > 0.0);
    }

    #[test]
    fn test_length() {
        let route = Route::from_gpx(create_test_gpx()).unwrap();

        // The test points are a few tens of meters apart
        assert!(route.length() > 0.0);
        assert!(route.length() < 1000.0);
    }

    #[test]
    fn test_label_falls_back_to_point_count() {
        let line = LineString::from(vec![(0.0, 0.0), (0.001, 0.001)]);
        let route = Route::new(None, line).unwrap();
        assert_eq!(route.label(), "<unnamed, 2 points>");
    }

    #[test]
    fn test_clones_are_distinct_identities() {
        let a = Route::from_gpx(create_test_gpx()).unwrap();
        let b = Route::from_gpx(create_test_gpx()).unwrap();
        assert!(Arc::ptr_eq(&a, &a.clone()));
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
