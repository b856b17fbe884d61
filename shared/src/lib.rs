//! Pure core of the tracker: distance, projection and session state.
//! No I/O happens here; the browser and native shells drive it.

pub mod display;
pub mod export;
pub mod geo;
pub mod network;
pub mod projection;
pub mod session;
pub mod simulate;

pub use export::{EXPORT_FILE_NAME, ExportError, LAST_RUN_KEY, route_from_json, route_to_json};
pub use geo::{CoordinateError, EARTH_RADIUS_M, GeoPoint, distance, path_distance};
pub use network::NetworkStatus;
pub use projection::{Bounds, CanvasSize, PixelPoint, project, project_onto};
pub use session::{INACTIVITY_POLL_INTERVAL, INACTIVITY_TIMEOUT, Sample, Session, SourceEvent};
pub use simulate::SimulatedWalk;
