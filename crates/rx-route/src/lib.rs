//! `rx-route` — route finding over an [`rx_graph::Graph`].
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`astar`]  | `find_route`, `find_route_without_turn_around`, `to_osm_ids`  |
//! | [`router`] | `Router` trait, `AStarRouter`                                 |
//! | [`error`]  | `AStarError`, `RouteResult`, `DEFAULT_STEP_LIMIT`             |
//!
//! Routes are sequences of graph node ids.  They may contain phantom nodes
//! created by turn-restriction processing; map them through
//! [`to_osm_ids`] to get OpenStreetMap node ids.

pub mod astar;
pub mod error;
pub mod router;

#[cfg(test)]
mod tests;

pub use astar::{find_route, find_route_without_turn_around, to_osm_ids};
pub use error::{AStarError, RouteResult, DEFAULT_STEP_LIMIT};
pub use router::{AStarRouter, Router};
