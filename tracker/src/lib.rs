pub mod config;
pub mod error;
pub mod export;
pub mod render;
pub mod replay;
pub mod runner;
pub mod source;
pub mod store;

pub use config::TrackerConfig;
pub use error::{SourceError, StoreError, TrackerError};
pub use replay::ReplaySource;
pub use runner::{run_session, RunSummary};
pub use source::{LocationSource, SimulatedSource};
pub use store::FileStore;
