//! Route Select Library - Map Click Route Selection
//!
//! This library decides which drawn navigation route a click on the map
//! selects, promotes that route to primary and notifies a listener. The map
//! renderer and the holder of the drawn routes are reached through traits so
//! the resolver can sit on top of any map SDK.
//!
//! # Architecture
//!
//! - **[`RouteClickResolver`]**: Two-phase click handling (guard now, hit-test on style ready)
//! - **[`RouteLine`]** / **[`MapRouteLine`]**: The drawn routes, primary first
//! - **[`MapHost`]** / **[`RenderedMap`]**: Projection, style readiness and feature queries
//! - **[`MapView`]**: Web Mercator camera used by the in-memory host
//! - **[`Route`]**: Immutable route geometry, loadable from GPX

pub mod host;
mod projection;
mod rendered;
pub mod resolver;
mod route;
mod route_line;
pub mod utils;

// Public API exports
pub use host::{Feature, MapHost, StyleReadyCallback};
pub use projection::MapView;
pub use rendered::RenderedMap;
pub use resolver::{
    ClickOutcome, OutcomeHook, ResolverConfig, RouteClickResolver, RouteHit,
    RouteSelectionListener,
};
pub use route::Route;
pub use route_line::{LineMapping, MapRouteLine, RouteLine};

/// Error types for route loading and parsing
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("GPX parsing error: {0}")]
    GpxParse(#[from] gpx::errors::GpxError),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty route")]
    EmptyRoute,
}

pub type Result<T> = std::result::Result<T, RouteError>;

/// Parse a `LAT,LON` pair in degrees into a coordinate (x = lon, y = lat)
pub fn parse_lat_lon(s: &str) -> Result<geo::Coord<f64>> {
    let invalid = || RouteError::InvalidCoordinate(s.to_string());
    let (lat, lon) = s.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
    let coord = utils::lat_lon(lat, lon);
    if !utils::is_valid_wgs84(coord) {
        return Err(invalid());
    }
    Ok(coord)
}
