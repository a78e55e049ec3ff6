//! Routing error type.

use thiserror::Error;

use rx_core::NodeId;

/// Recommended A* step limit.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Ways in which a route query can fail.
///
/// "No route exists" is *not* an error: it is reported as an empty path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AStarError {
    /// The start or goal node is not in the graph.  When both are missing,
    /// the start is reported.
    #[error("node {0} does not exist in the graph")]
    InvalidReference(NodeId),

    /// More nodes were expanded than the step limit allows.
    #[error("A* step limit exceeded")]
    StepLimitExceeded,
}

/// Ordered node ids from start to goal, empty if the goal is unreachable.
pub type RouteResult = Result<Vec<NodeId>, AStarError>;
