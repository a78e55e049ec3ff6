//! `rx-osm` — build a routable [`rx_graph::Graph`] from OpenStreetMap data.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`loader`]      | `add_from_memory`, `add_from_file` — public entry points  |
//! | [`options`]     | `IngestOptions`, `FileFormat`, `BoundingBox`              |
//! | [`profile`]     | `OsmProfile`, `PredefinedProfile`, `Profile`, `Penalty`   |
//! | [`format`]      | format detection and decompression                        |
//! | `xml`, `pbf`    | parsers producing a common feature stream                 |
//! | `builder`       | feature collector that mutates the graph                  |
//! | `restriction`   | turn-restriction resolution and phantom-node expansion    |
//! | [`error`]       | `OsmLoadingError`, `OsmResult<T>`                         |
//!
//! # Usage
//!
//! ```ignore
//! use rx_graph::Graph;
//! use rx_osm::{add_from_file, IngestOptions, PredefinedProfile};
//!
//! let mut graph = Graph::new();
//! add_from_file(&mut graph, &IngestOptions::new(PredefinedProfile::Car), "mazowieckie.osm.pbf")?;
//! ```
//!
//! Ingestion is additive: calling it again adds more ways to the same graph.
//! A failed call may leave the graph partially updated.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on profiles and options.   |

pub mod error;
pub mod format;
pub mod loader;
pub mod options;
pub mod profile;

mod builder;
mod feature;
mod pbf;
mod restriction;
mod xml;


pub use error::{OsmLoadingError, OsmResult};
pub use format::detect_format;
pub use loader::{add_from_file, add_from_memory};
pub use options::{BoundingBox, FileFormat, IngestOptions};
pub use profile::{OsmProfile, Penalty, PredefinedProfile, Profile};
