//! A* search over the node graph.
//!
//! # Search state
//!
//! [`find_route`] searches over plain node ids.
//! [`find_route_without_turn_around`] searches over `(node, previous node)`
//! pairs and refuses to step straight back to the physical location it just
//! left (same `osm_id`).  Turn restrictions are encoded as phantom copies of
//! via nodes; without this rule a route could enter the phantom, bounce back
//! to the node it came from, and re-enter the junction through the
//! unrestricted canonical node (A → via' → A → via → forbidden exit).
//!
//! Both variants share one generic implementation parameterised by
//! [`SearchState`].
//!
//! # Heuristic
//!
//! `h(n)` is the great-circle distance from `n` to the goal.  Every edge costs
//! at least the distance between its endpoints, so `h` is admissible and
//! consistent and the first time the goal is popped its path is optimal.
//! Open-set ties are broken by insertion order, making results
//! deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use rx_core::NodeId;
use rx_graph::{Graph, Node};

use crate::{AStarError, RouteResult};

// ── Public entry points ───────────────────────────────────────────────────────

/// Cheapest route from `from` to `to`.
///
/// Returns an empty path if `to` is unreachable, and
/// [`AStarError::StepLimitExceeded`] after expanding more than `step_limit`
/// nodes.
pub fn find_route(graph: &Graph, from: NodeId, to: NodeId, step_limit: usize) -> RouteResult {
    search::<NodeId>(graph, from, to, step_limit)
}

/// Like [`find_route`], but never steps immediately back to the node just
/// departed (A → B → A).  Use this on graphs containing turn restrictions;
/// the extra state dimension makes it slower otherwise.
pub fn find_route_without_turn_around(
    graph: &Graph,
    from: NodeId,
    to: NodeId,
    step_limit: usize,
) -> RouteResult {
    search::<NodeAndPrev>(graph, from, to, step_limit)
}

/// Translate a route into OpenStreetMap node ids.
///
/// Phantom nodes map to the OSM node they duplicate.  No de-duplication is
/// performed.  Returns `None` if any id is no longer in the graph.
pub fn to_osm_ids(graph: &Graph, route: &[NodeId]) -> Option<Vec<i64>> {
    route.iter().map(|&id| graph.get(id).map(|n| n.osm_id)).collect()
}

// ── Search state ──────────────────────────────────────────────────────────────

trait SearchState: Copy + Eq + Hash {
    fn start(node: NodeId) -> Self;

    fn node(self) -> NodeId;

    /// State after moving to `next`, or `None` if the move is not allowed.
    fn advance(self, graph: &Graph, next: &Node) -> Option<Self>;
}

impl SearchState for NodeId {
    #[inline]
    fn start(node: NodeId) -> Self {
        node
    }

    #[inline]
    fn node(self) -> NodeId {
        self
    }

    #[inline]
    fn advance(self, _graph: &Graph, next: &Node) -> Option<Self> {
        Some(next.id)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
struct NodeAndPrev {
    node: NodeId,
    prev: Option<NodeId>,
}

impl SearchState for NodeAndPrev {
    #[inline]
    fn start(node: NodeId) -> Self {
        Self { node, prev: None }
    }

    #[inline]
    fn node(self) -> NodeId {
        self.node
    }

    fn advance(self, graph: &Graph, next: &Node) -> Option<Self> {
        if let Some(prev) = self.prev {
            let turn_around = next.id == prev
                || graph.get(prev).is_some_and(|p| p.osm_id == next.osm_id);
            if turn_around {
                return None;
            }
        }
        Some(Self { node: next.id, prev: Some(self.node) })
    }
}

// ── Open set entry ────────────────────────────────────────────────────────────

struct QueueItem<S> {
    /// `cost + heuristic`
    score: f32,
    cost:  f32,
    seq:   u64,
    state: S,
}

impl<S> Ord for QueueItem<S> {
    // Reversed: BinaryHeap is a max-heap, we want the lowest score, then the
    // earliest insertion.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<S> PartialOrd for QueueItem<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> PartialEq for QueueItem<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for QueueItem<S> {}

// ── A* internals ──────────────────────────────────────────────────────────────

fn search<S: SearchState>(graph: &Graph, from: NodeId, to: NodeId, step_limit: usize) -> RouteResult {
    if !graph.contains(from) {
        return Err(AStarError::InvalidReference(from));
    }
    let Some(goal) = graph.get(to) else {
        return Err(AStarError::InvalidReference(to));
    };

    let mut queue: BinaryHeap<QueueItem<S>> = BinaryHeap::new();
    let mut came_from: FxHashMap<S, S> = FxHashMap::default();
    let mut known_costs: FxHashMap<S, f32> = FxHashMap::default();
    let mut seq: u64 = 0;
    let mut steps: usize = 0;

    let start = S::start(from);
    known_costs.insert(start, 0.0);
    queue.push(QueueItem { score: 0.0, cost: 0.0, seq, state: start });

    while let Some(item) = queue.pop() {
        if item.state.node() == to {
            return Ok(reconstruct(&came_from, item.state));
        }

        // Skip stale heap entries.
        let best = known_costs.get(&item.state).copied().unwrap_or(f32::INFINITY);
        if item.cost > best {
            continue;
        }

        steps += 1;
        if steps > step_limit {
            log::debug!("A* from {from} to {to} gave up after {step_limit} steps");
            return Err(AStarError::StepLimitExceeded);
        }

        for edge in graph.edges(item.state.node()) {
            // Dangling edge: its target was deleted.
            let Some(next) = graph.get(edge.to) else {
                continue;
            };
            let Some(next_state) = item.state.advance(graph, &next) else {
                continue;
            };

            let cost = item.cost + edge.cost;
            let known = known_costs.get(&next_state).copied().unwrap_or(f32::INFINITY);
            if cost < known {
                known_costs.insert(next_state, cost);
                came_from.insert(next_state, item.state);
                seq += 1;
                queue.push(QueueItem {
                    score: cost + next.distance_to(&goal),
                    cost,
                    seq,
                    state: next_state,
                });
            }
        }
    }

    Ok(Vec::new())
}

fn reconstruct<S: SearchState>(came_from: &FxHashMap<S, S>, last: S) -> Vec<NodeId> {
    let mut route = vec![last.node()];
    let mut cur = last;
    while let Some(&prev) = came_from.get(&cur) {
        route.push(prev.node());
        cur = prev;
    }
    route.reverse();
    route
}
