//! Web Mercator camera used to move between geographic and screen space

use crate::utils;
use geo::{Coord, Rect};

/// Side of one map tile in screen units at integer zoom levels
pub const TILE_SIZE: f64 = 256.0;

/// Camera over a Web Mercator map
///
/// Screen space has its origin at the top-left corner of the viewport and
/// `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapView {
    /// Geographic center of the viewport (x = lon, y = lat)
    pub center: Coord<f64>,
    /// Zoom level; the world is `TILE_SIZE * 2^zoom` units wide
    pub zoom: f64,
    /// Viewport size in screen units (width, height)
    pub viewport: (f64, f64),
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: Coord { x: 0.0, y: 0.0 },
            zoom: 0.0,
            viewport: (1024.0, 768.0),
        }
    }
}

impl MapView {
    pub fn new(center: Coord<f64>, zoom: f64, viewport: (f64, f64)) -> Self {
        Self {
            center,
            zoom,
            viewport,
        }
    }

    /// Screen units per Web Mercator meter at the current zoom
    #[inline]
    pub fn scale(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2() / (utils::EARTH_MERCATOR_MAX - utils::EARTH_MERCATOR_MIN)
    }

    /// Project a geographic coordinate to screen space
    pub fn project(&self, coord: Coord<f64>) -> Coord<f64> {
        let scale = self.scale();
        let target = utils::to_mercator(coord);
        let center = utils::to_mercator(self.center);
        Coord {
            x: (target.x - center.x) * scale + self.viewport.0 / 2.0,
            y: (center.y - target.y) * scale + self.viewport.1 / 2.0,
        }
    }

    /// Inverse of [`MapView::project`]
    pub fn unproject(&self, screen: Coord<f64>) -> Coord<f64> {
        let scale = self.scale();
        let center = utils::to_mercator(self.center);
        utils::from_mercator(Coord {
            x: center.x + (screen.x - self.viewport.0 / 2.0) / scale,
            y: center.y - (screen.y - self.viewport.1 / 2.0) / scale,
        })
    }

    /// The part of a screen-space rectangle that lies inside the viewport
    ///
    /// Returns `None` when the rectangle is entirely off screen.
    pub fn clip_to_viewport(&self, rect: Rect<f64>) -> Option<Rect<f64>> {
        let (width, height) = self.viewport;
        let min = Coord {
            x: rect.min().x.max(0.0),
            y: rect.min().y.max(0.0),
        };
        let max = Coord {
            x: rect.max().x.min(width),
            y: rect.max().y.min(height),
        };
        if min.x > max.x || min.y > max.y {
            return None;
        }
        Some(Rect::new(min, max))
    }
}
