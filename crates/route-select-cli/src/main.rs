//! Route Select CLI
//!
//! Draws GPX routes on an in-memory map, replays clicks through the route
//! click resolver and prints every selection change.

mod logging;
mod settings;

use clap::Parser;
use route_select_lib::{
    ClickOutcome, MapRouteLine, MapView, RenderedMap, ResolverConfig, Route, RouteClickResolver,
    RouteError, RouteLine, utils,
};
use settings::Settings;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("No routes were loaded")]
    NoRoutes,
}

fn main() -> ExitCode {
    logging::setup_logging();
    let settings = Settings::parse();

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<(), CliError> {
    profiling::scope!("route_select::run");

    let line = Arc::new(MapRouteLine::new());
    line.load_from_files(settings.gpx_files.clone())?;
    let primary = line.primary_route().ok_or(CliError::NoRoutes)?;
    tracing::info!(
        "Loaded {} routes, primary: {} ({:.0} m)",
        line.route_count(),
        primary.label(),
        primary.length()
    );

    let center = settings
        .center
        .unwrap_or_else(|| utils::from_mercator(primary.bounding_box().center()));
    let view = MapView::new(
        center,
        settings.zoom,
        (
            settings.viewport_width as f64,
            settings.viewport_height as f64,
        ),
    );
    let map = Arc::new(RenderedMap::new(view));
    map.render_routes(line.as_ref());
    map.set_style_loaded();

    let config = ResolverConfig {
        hit_tolerance: settings.hit_tolerance,
        ..ResolverConfig::default()
    };
    let mut resolver = RouteClickResolver::with_config(line.clone(), map.clone(), config);
    resolver.set_alternatives_visible(!settings.hide_alternatives);
    resolver.set_selection_change_listener(|route: &Arc<Route>| {
        println!("selected: {}", route.label());
    });
    resolver.set_outcome_hook(|outcome: &ClickOutcome| match outcome {
        ClickOutcome::Selected { hit, route, .. } => {
            tracing::debug!("Click hit {:?}, primary is {}", hit, route.label());
        }
        ClickOutcome::NoSelection { route_count, .. } => {
            tracing::info!("Click selected nothing ({} routes drawn)", route_count);
        }
        ClickOutcome::NotDrawn { route, .. } => {
            tracing::info!("Click resolved to {} after it was redrawn", route.label());
        }
        ClickOutcome::Detached => {}
    });

    for click in &settings.click {
        tracing::debug!("Replaying click at ({}, {})", click.y, click.x);
        resolver.handle_click(*click);
        // Redraw so the next click sees the new primary on the primary layers
        map.render_routes(line.as_ref());
    }

    if let Some(primary) = line.primary_route() {
        println!("primary: {}", primary.label());
    }
    Ok(())
}
