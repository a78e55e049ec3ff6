//! `rx-graph` — routable graph storage and spatial indexing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`graph`]   | `Node`, `Edge`, `Graph` (hash-map node table + adjacency) |
//! | [`kd_tree`] | `KdTree`, R-tree nearest-node index over a snapshot     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Node` and `Edge`.      |

pub mod graph;
pub mod kd_tree;


pub use graph::{Edge, Graph, Node};
pub use kd_tree::KdTree;
