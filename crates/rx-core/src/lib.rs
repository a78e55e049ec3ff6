//! `rx-core` — foundational types for the `rust_rx` routing engine.
//!
//! This crate is a dependency of every other `rx-*` crate.  It has no `rx-*`
//! dependencies and minimal external ones (`log` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`ids`]       | `NodeId`, phantom id range                            |
//! | [`geo`]       | `earth_distance` (haversine, kilometres)              |
//! | [`logging`]   | `LogSink` trait and one-shot sink installation        |
//! | [`error`]     | `LoggingError`, `LoggingResult`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod logging;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{LoggingError, LoggingResult};
pub use geo::{earth_distance, EARTH_RADIUS_KM};
pub use ids::{NodeId, PHANTOM_ID_BASE};
pub use logging::{set_sink, LogSink};
