use std::{io, path::PathBuf};

use shared::ExportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("location source unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read replay file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid route file: {0}")]
    Route(#[from] ExportError),
    #[error("invalid GPX file: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error("unsupported replay format for {0:?} (expected .json or .gpx)")]
    UnsupportedFormat(PathBuf),
    #[error("replay file {0:?} has no usable points")]
    EmptyReplay(PathBuf),
    #[error("sample interval must be non-zero")]
    ZeroInterval,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("stored route is unreadable: {0}")]
    Export(#[from] ExportError),
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("inactivity poll interval must be non-zero")]
    ZeroPollInterval,
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode route: {0}")]
    Export(#[from] ExportError),
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
}
