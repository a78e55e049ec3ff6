//! Routing trait and the default A* configuration.
//!
//! # Pluggability
//!
//! Callers hold a `Router` rather than calling the search functions
//! directly, so an application can swap in another algorithm (or a cached
//! router) without touching query code.

use rx_core::NodeId;
use rx_graph::Graph;

use crate::astar::{find_route, find_route_without_turn_around};
use crate::{RouteResult, DEFAULT_STEP_LIMIT};

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable route-finding engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve queries
/// from several threads against a shared `&Graph`.
pub trait Router: Send + Sync {
    /// Cheapest route from `from` to `to`.  An empty path means no route
    /// exists.
    fn route(&self, graph: &Graph, from: NodeId, to: NodeId) -> RouteResult;
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// A* search settings.
///
/// | Field                 | Default                 |
/// |-----------------------|-------------------------|
/// | `without_turn_around` | `true`                  |
/// | `step_limit`          | [`DEFAULT_STEP_LIMIT`]  |
///
/// ```
/// use rx_route::{AStarRouter, Router};
///
/// let router = AStarRouter::new().without_turn_around(false).step_limit(10_000);
/// # let graph = rx_graph::Graph::new();
/// # let _ = router.route(&graph, rx_core::NodeId(1), rx_core::NodeId(2));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AStarRouter {
    /// Forbid immediate A → B → A reversals.  Needed on graphs with turn
    /// restrictions; on graphs without them it only costs time.
    pub without_turn_around: bool,
    /// Maximum number of node expansions before giving up.
    pub step_limit: usize,
}

impl AStarRouter {
    pub fn new() -> Self {
        Self {
            without_turn_around: true,
            step_limit:          DEFAULT_STEP_LIMIT,
        }
    }

    pub fn without_turn_around(mut self, enabled: bool) -> Self {
        self.without_turn_around = enabled;
        self
    }

    pub fn step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    /// Inherent shorthand for [`Router::route`].
    pub fn find(&self, graph: &Graph, from: NodeId, to: NodeId) -> RouteResult {
        if self.without_turn_around {
            find_route_without_turn_around(graph, from, to, self.step_limit)
        } else {
            find_route(graph, from, to, self.step_limit)
        }
    }
}

impl Default for AStarRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Router for AStarRouter {
    fn route(&self, graph: &Graph, from: NodeId, to: NodeId) -> RouteResult {
        self.find(graph, from, to)
    }
}
