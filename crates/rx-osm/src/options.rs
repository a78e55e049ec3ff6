//! Ingestion options: profile, input format, and bounding box.

use crate::profile::OsmProfile;

// ── FileFormat ────────────────────────────────────────────────────────────────

/// Encoding of the input data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileFormat {
    /// Detect from the content; see [`detect_format`](crate::detect_format).
    #[default]
    Unknown,
    Xml,
    XmlGz,
    XmlBz2,
    Pbf,
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Geographic filter applied to ways and turn restrictions.
///
/// The all-zero box (the `Default`) disables filtering.  A way is kept if
/// *any* of its nodes lies inside; kept ways are never clipped.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min_lon: f32,
    pub min_lat: f32,
    pub max_lon: f32,
    pub max_lat: f32,
}

impl BoundingBox {
    pub fn new(min_lon: f32, min_lat: f32, max_lon: f32, max_lat: f32) -> Self {
        Self { min_lon, min_lat, max_lon, max_lat }
    }

    /// `true` for the all-zero "no filter" box.
    pub fn is_none(&self) -> bool {
        self.min_lon == 0.0 && self.min_lat == 0.0 && self.max_lon == 0.0 && self.max_lat == 0.0
    }

    /// Inclusive containment test.  Always `true` for the "no filter" box.
    pub fn contains(&self, lat: f32, lon: f32) -> bool {
        self.is_none()
            || ((self.min_lat..=self.max_lat).contains(&lat)
                && (self.min_lon..=self.max_lon).contains(&lon))
    }
}

/// `[min_lon, min_lat, max_lon, max_lat]`, the usual OSM ordering.
impl From<[f32; 4]> for BoundingBox {
    fn from([min_lon, min_lat, max_lon, max_lat]: [f32; 4]) -> Self {
        Self::new(min_lon, min_lat, max_lon, max_lat)
    }
}

// ── IngestOptions ─────────────────────────────────────────────────────────────

/// Everything [`add_from_memory`](crate::add_from_memory) needs besides the
/// data itself.
///
/// ```
/// use rx_osm::{FileFormat, IngestOptions, PredefinedProfile};
///
/// let options = IngestOptions::new(PredefinedProfile::Bus)
///     .format(FileFormat::Pbf)
///     .bbox([20.85, 52.10, 21.27, 52.37]);
/// assert_eq!(options.format, FileFormat::Pbf);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IngestOptions {
    pub profile: OsmProfile,
    pub format:  FileFormat,
    pub bbox:    BoundingBox,
}

impl IngestOptions {
    /// Auto-detected format, no bounding box.
    pub fn new(profile: impl Into<OsmProfile>) -> Self {
        Self {
            profile: profile.into(),
            format:  FileFormat::Unknown,
            bbox:    BoundingBox::default(),
        }
    }

    pub fn format(mut self, format: FileFormat) -> Self {
        self.format = format;
        self
    }

    pub fn bbox(mut self, bbox: impl Into<BoundingBox>) -> Self {
        self.bbox = bbox.into();
        self
    }
}
