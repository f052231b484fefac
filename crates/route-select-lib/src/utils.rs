//! Coordinate helpers shared by routes and the map projection
//!
//! Geographic coordinates are `geo::Coord<f64>` with `x` = longitude and
//! `y` = latitude, in degrees (WGS84). Web Mercator values are in meters
//! (EPSG:3857).

use geo::Coord;

/// Equatorial radius used by Web Mercator (EPSG:3857)
pub const WEB_MERCATOR_RADIUS_M: f64 = 6378137.0;

/// Web Mercator bounds in meters (half the equator)
pub const EARTH_MERCATOR_MAX: f64 = std::f64::consts::PI * WEB_MERCATOR_RADIUS_M;
pub const EARTH_MERCATOR_MIN: f64 = -EARTH_MERCATOR_MAX;

/// Maximum latitude that can be represented in Web Mercator
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Mean Earth radius in meters, used for haversine lengths
pub const EARTH_RADIUS_M: f64 = 6371000.0;

const LON_TO_X_FACTOR: f64 = EARTH_MERCATOR_MAX / 180.0;
const Y_FACTOR: f64 = EARTH_MERCATOR_MAX / std::f64::consts::PI;

/// Build a geographic coordinate from latitude and longitude in degrees
#[inline(always)]
pub fn lat_lon(lat: f64, lon: f64) -> Coord<f64> {
    Coord { x: lon, y: lat }
}

/// Convert a WGS84 coordinate to Web Mercator meters
///
/// Latitude is clamped to [`MAX_LATITUDE`] so the poles stay finite.
#[inline(always)]
pub fn to_mercator(coord: Coord<f64>) -> Coord<f64> {
    let lat_rad = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    Coord {
        x: coord.x * LON_TO_X_FACTOR,
        y: (lat_rad.tan() + (1.0 / lat_rad.cos())).ln() * Y_FACTOR,
    }
}

/// Convert Web Mercator meters back to a WGS84 coordinate
#[inline(always)]
pub fn from_mercator(mercator: Coord<f64>) -> Coord<f64> {
    let lat = (std::f64::consts::FRAC_PI_2 - 2.0 * (-mercator.y / Y_FACTOR).exp().atan())
        .to_degrees();
    Coord {
        x: mercator.x / LON_TO_X_FACTOR,
        y: lat,
    }
}

/// Check if a geographic coordinate is finite and inside lat/lon ranges
#[inline(always)]
pub fn is_valid_wgs84(coord: Coord<f64>) -> bool {
    coord.x.is_finite()
        && coord.y.is_finite()
        && (-180.0..=180.0).contains(&coord.x)
        && (-90.0..=90.0).contains(&coord.y)
}

/// Great-circle distance between two WGS84 coordinates in meters
#[inline]
pub fn haversine_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let delta_lat = (b.y - a.y).to_radians();
    let delta_lon = (b.x - a.x).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}
