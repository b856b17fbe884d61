use std::{
    fs,
    path::{Path, PathBuf},
};

use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};
use serde::Serialize;
use shared::{project_onto, route_to_json, CanvasSize, GeoPoint, EXPORT_FILE_NAME};

use crate::{error::TrackerError, render::render_svg};

pub const SVG_FILE_NAME: &str = "safe-runner-route.svg";
pub const GPX_FILE_NAME: &str = "safe-runner-route.gpx";

/// Files written for one finished session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportPaths {
    pub json: PathBuf,
    pub svg: PathBuf,
    pub gpx: Option<PathBuf>,
}

pub fn encode_route_as_gpx(path: &[GeoPoint]) -> Result<Vec<u8>, gpx::errors::GpxError> {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some("safe-runner".into()),
        ..Default::default()
    };
    let mut track = Track {
        name: Some("safe-runner".into()),
        ..Default::default()
    };

    let mut segment = TrackSegment::new();
    segment.points.extend(path.iter().map(to_waypoint));
    track.segments.push(segment);
    gpx.tracks.push(track);

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(buffer)
}

fn to_waypoint(point: &GeoPoint) -> Waypoint {
    Waypoint::new(Point::new(point.lng(), point.lat()))
}

/// Write the route JSON and its SVG rendering (plus GPX when asked) into `out_dir`.
pub fn write_exports(
    out_dir: &Path,
    path: &[GeoPoint],
    canvas: CanvasSize,
    with_gpx: bool,
) -> Result<ExportPaths, TrackerError> {
    fs::create_dir_all(out_dir)?;

    let json = out_dir.join(EXPORT_FILE_NAME);
    fs::write(&json, route_to_json(path)?)?;

    let svg = out_dir.join(SVG_FILE_NAME);
    fs::write(&svg, render_svg(&project_onto(path, canvas), canvas))?;

    let gpx = if with_gpx {
        let target = out_dir.join(GPX_FILE_NAME);
        fs::write(&target, encode_route_as_gpx(path)?)?;
        Some(target)
    } else {
        None
    };

    tracing::info!("route exported to {:?}", out_dir);
    Ok(ExportPaths { json, svg, gpx })
}
