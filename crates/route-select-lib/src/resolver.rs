//! Map click → route selection
//!
//! [`RouteClickResolver`] turns a click on the map into a "new primary route"
//! notification. It works in two phases:
//!
//! 1. **Guard** (synchronous): bail out when routes are hidden, nothing is
//!    drawn, or alternatives are hidden. Otherwise snapshot everything the
//!    hit-test needs.
//! 2. **Resolve** (deferred): once the host reports its style is ready, query
//!    the primary and alternative layer groups around the click and promote
//!    the matching route.
//!
//! Any feature on the primary layers wins. Otherwise any feature on the
//! alternative layers selects the route at index 1; which alternative was
//! actually hit is not looked at. No hit at all resolves to the primary.

use crate::Route;
use crate::host::{ALTERNATIVE_ROUTE_LAYERS, MapHost, PRIMARY_ROUTE_LAYERS, StyleReadyCallback};
use crate::route_line::RouteLine;
use geo::{Coord, Rect};
use std::sync::{Arc, Weak};

/// Half-width of the square hit window around a click, in screen units
pub const DEFAULT_HIT_TOLERANCE: f64 = 300.0;

/// Receives the route picked by a click when it differs from the previous primary
pub trait RouteSelectionListener: Send + Sync {
    fn on_new_primary_route_selected(&self, route: &Arc<Route>);
}

impl<F> RouteSelectionListener for F
where
    F: Fn(&Arc<Route>) + Send + Sync,
{
    fn on_new_primary_route_selected(&self, route: &Arc<Route>) {
        self(route)
    }
}

/// Resolver settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolverConfig {
    /// Half-width of the hit window in screen units. Route lines are thin, so
    /// the default is generous.
    pub hit_tolerance: f64,
    /// Layers making up the primary route (line and casing)
    pub primary_layers: Vec<String>,
    /// Layers making up the alternative routes (line and casing)
    pub alternative_layers: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            primary_layers: PRIMARY_ROUTE_LAYERS.iter().map(|s| s.to_string()).collect(),
            alternative_layers: ALTERNATIVE_ROUTE_LAYERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Which layer group a click resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteHit {
    Primary,
    Alternative,
}

impl RouteHit {
    /// Primary hits win over alternative hits; no hits resolve to the primary
    pub fn from_hits(primary_hits: usize, alternative_hits: usize) -> Self {
        if primary_hits == 0 && alternative_hits > 0 {
            RouteHit::Alternative
        } else {
            RouteHit::Primary
        }
    }

    /// Index into the drawn routes
    #[inline]
    pub fn index(self) -> usize {
        match self {
            RouteHit::Primary => 0,
            RouteHit::Alternative => 1,
        }
    }
}

/// Result of one deferred resolution
#[derive(Debug, Clone)]
pub enum ClickOutcome {
    /// `route` was promoted; `changed` is whether it differs from the previous primary
    Selected {
        hit: RouteHit,
        route: Arc<Route>,
        changed: bool,
    },
    /// The resolved index is past the end of the routes captured at click time
    NoSelection { hit: RouteHit, route_count: usize },
    /// The route line was redrawn before the style was ready and no longer
    /// holds `route`, so nothing was promoted
    NotDrawn { hit: RouteHit, route: Arc<Route> },
    /// The route line went away before the style was ready
    Detached,
}

/// Observer of every deferred resolution, including the ones that select nothing
pub type OutcomeHook = Arc<dyn Fn(&ClickOutcome) + Send + Sync>;

/// Square window centered on `center` extending `half_width` in each direction
pub fn hit_window(center: Coord<f64>, half_width: f64) -> Rect<f64> {
    Rect::new(
        Coord {
            x: center.x - half_width,
            y: center.y - half_width,
        },
        Coord {
            x: center.x + half_width,
            y: center.y + half_width,
        },
    )
}

/// Bounds-checked lookup of the route a hit refers to
#[inline]
pub fn select_route(routes: &[Arc<Route>], hit: RouteHit) -> Option<Arc<Route>> {
    routes.get(hit.index()).cloned()
}

/// Everything the deferred phase needs, captured when the click arrives
struct PendingClick {
    point: Coord<f64>,
    routes: Vec<Arc<Route>>,
    hit_tolerance: f64,
    primary_layers: Vec<String>,
    alternative_layers: Vec<String>,
    listener: Option<Arc<dyn RouteSelectionListener>>,
    outcome_hook: Option<OutcomeHook>,
    route_line: Weak<dyn RouteLine>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl PendingClick {
    fn resolve(self, host: &dyn MapHost) -> ClickOutcome {
        let Some(route_line) = self.route_line.upgrade() else {
            tracing::debug!("Route line dropped before the style was ready, ignoring click");
            return ClickOutcome::Detached;
        };

        let screen_point = host.project_to_screen(self.point);
        let window = hit_window(screen_point, self.hit_tolerance);

        let primary_layers: Vec<&str> = self.primary_layers.iter().map(String::as_str).collect();
        let alternative_layers: Vec<&str> =
            self.alternative_layers.iter().map(String::as_str).collect();
        let primary_hits = host.query_features_in_window(window, &primary_layers);
        let alternative_hits = host.query_features_in_window(window, &alternative_layers);
        tracing::debug!(
            "Click at ({}, {}): {} primary features, {} alternative features",
            screen_point.x,
            screen_point.y,
            primary_hits.len(),
            alternative_hits.len()
        );

        let hit = RouteHit::from_hits(primary_hits.len(), alternative_hits.len());
        let Some(route) = select_route(&self.routes, hit) else {
            tracing::warn!(
                "Click resolved to route index {} but only {} routes are drawn",
                hit.index(),
                self.routes.len()
            );
            return ClickOutcome::NoSelection {
                hit,
                route_count: self.routes.len(),
            };
        };

        let previous = route_line.primary_route();
        if !route_line.promote_to_primary(&route) {
            tracing::warn!(
                "Route {} was replaced before the click resolved, ignoring click",
                route.label()
            );
            return ClickOutcome::NotDrawn { hit, route };
        }
        let changed = !previous.is_some_and(|p| Arc::ptr_eq(&p, &route));
        tracing::debug!(
            "Click resolved to route index {} ({}), changed: {}",
            hit.index(),
            route.label(),
            changed
        );

        if changed {
            if let Some(listener) = &self.listener {
                listener.on_new_primary_route_selected(&route);
            }
        }

        ClickOutcome::Selected {
            hit,
            route,
            changed,
        }
    }
}

/// Resolves map clicks to route selections for one map view
pub struct RouteClickResolver {
    route_line: Arc<dyn RouteLine>,
    host: Arc<dyn MapHost>,
    config: ResolverConfig,
    alternatives_visible: bool,
    listener: Option<Arc<dyn RouteSelectionListener>>,
    outcome_hook: Option<OutcomeHook>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl RouteClickResolver {
    /// Bind a resolver to a route line and a map host with default settings
    pub fn new(route_line: Arc<dyn RouteLine>, host: Arc<dyn MapHost>) -> Self {
        Self::with_config(route_line, host, ResolverConfig::default())
    }

    pub fn with_config(
        route_line: Arc<dyn RouteLine>,
        host: Arc<dyn MapHost>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            route_line,
            host,
            config,
            alternatives_visible: true,
            listener: None,
            outcome_hook: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn set_selection_change_listener<L>(&mut self, listener: L)
    where
        L: RouteSelectionListener + 'static,
    {
        self.listener = Some(Arc::new(listener));
    }

    pub fn clear_selection_change_listener(&mut self) {
        self.listener = None;
    }

    /// Observe the result of every click that reaches the hit-test
    pub fn set_outcome_hook<F>(&mut self, hook: F)
    where
        F: Fn(&ClickOutcome) + Send + Sync + 'static,
    {
        self.outcome_hook = Some(Arc::new(hook));
    }

    /// Clicks are ignored while alternatives are hidden
    pub fn set_alternatives_visible(&mut self, visible: bool) {
        self.alternatives_visible = visible;
    }

    #[inline]
    pub fn alternatives_visible(&self) -> bool {
        self.alternatives_visible
    }

    /// Handle a click at a geographic coordinate (x = lon, y = lat)
    ///
    /// The hit-test runs later, once the host's style is ready. Always
    /// returns `false`: the click is never consumed, so other handlers still
    /// see it.
    pub fn handle_click(&self, point: Coord<f64>) -> bool {
        if !self.route_line.is_visible() {
            return false;
        }
        let mapping = self.route_line.line_to_route_mapping();
        if mapping.as_ref().is_none_or(|m| m.is_empty()) || !self.alternatives_visible {
            return false;
        }

        let mut pending = PendingClick {
            point,
            routes: self.route_line.routes(),
            hit_tolerance: self.config.hit_tolerance,
            primary_layers: self.config.primary_layers.clone(),
            alternative_layers: self.config.alternative_layers.clone(),
            listener: self.listener.clone(),
            outcome_hook: self.outcome_hook.clone(),
            route_line: Arc::downgrade(&self.route_line),
        };
        let callback: StyleReadyCallback = Box::new(move |host: &dyn MapHost| {
            let hook = pending.outcome_hook.take();
            let outcome = pending.resolve(host);
            if let Some(hook) = hook {
                hook(&outcome);
            }
        });
        self.host.run_when_style_ready(callback);

        false
    }
}
