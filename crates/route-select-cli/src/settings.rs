use clap::Parser;
use geo::Coord;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Route Select - replay map clicks against GPX routes and report the selected route
pub struct Settings {
    /// GPX files to draw as routes; the first one starts as primary
    #[clap(short, long, value_name = "FILE", required = true)]
    pub gpx_files: Vec<PathBuf>,

    /// Map clicks to replay, in order
    #[clap(short, long, value_name = "LAT,LON", value_parser = parse_coord)]
    pub click: Vec<Coord<f64>>,

    /// Map center (defaults to the center of the primary route)
    #[clap(long, value_name = "LAT,LON", value_parser = parse_coord)]
    pub center: Option<Coord<f64>>,

    /// Map zoom level
    #[clap(short, long, default_value = "15.0")]
    pub zoom: f64,

    /// Viewport width in screen units
    #[clap(long, default_value = "1920")]
    pub viewport_width: u32,

    /// Viewport height in screen units
    #[clap(long, default_value = "1080")]
    pub viewport_height: u32,

    /// Half-width of the square hit window around each click, in screen units
    #[clap(long, default_value = "300.0")]
    pub hit_tolerance: f64,

    /// Hide alternative routes, which disables click selection
    #[clap(long, default_value = "false")]
    pub hide_alternatives: bool,
}

fn parse_coord(s: &str) -> Result<Coord<f64>, String> {
    route_select_lib::parse_lat_lon(s).map_err(|e| e.to_string())
}
