//! Ingestion error type.

use thiserror::Error;

/// Errors produced by `rx-osm`.
///
/// Any of these aborts the ingestion call.  Graph changes made before the
/// failure are not rolled back.
#[derive(Debug, Error)]
pub enum OsmLoadingError {
    #[error("unable to detect OSM file format")]
    UnknownFormat,

    #[error("malformed OSM XML: {0}")]
    Xml(String),

    #[error("malformed OSM PBF: {0}")]
    Pbf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid routing profile: {0}")]
    InvalidProfile(String),

    #[error("inconsistent OSM data: {0}")]
    Inconsistent(String),
}

pub type OsmResult<T> = Result<T, OsmLoadingError>;
