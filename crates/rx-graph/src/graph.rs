//! Graph node table and adjacency lists.
//!
//! # Data layout
//!
//! Nodes live in a hash map keyed by [`NodeId`]; outgoing edges live in a
//! second map from source id to an ordered `Vec<Edge>`.  Unlike a CSR
//! layout the graph stays mutable after construction, which ingestion needs:
//! OSM data is added in several passes and turn restrictions rewrite
//! individual edges.
//!
//! `FxHashMap` (via `rustc-hash`) has no per-process random seed, so the same
//! sequence of mutations always yields the same iteration order.
//!
//! # Invariants the graph does **not** enforce
//!
//! - `Edge::cost` must be at least the great-circle distance between its
//!   endpoints, otherwise A* may return sub-optimal routes.  Overwriting a
//!   node with new coordinates keeps all its edges, so moving nodes can break
//!   this.
//! - Deleting a node leaves edges pointing *at* it in place.  Such dangling
//!   edges are skipped by the router.

use rustc_hash::FxHashMap;

use rx_core::{earth_distance, NodeId, PHANTOM_ID_BASE};

// ── Node / Edge ───────────────────────────────────────────────────────────────

/// An element of the [`Graph`].
///
/// One OSM node may be represented by several graph nodes after turn
/// restriction processing.  The unrestricted, *canonical* one has
/// `id == osm_id`; the others are phantoms with ids from
/// [`PHANTOM_ID_BASE`] upward.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id:     NodeId,
    pub osm_id: i64,
    pub lat:    f32,
    pub lon:    f32,
}

impl Node {
    /// A canonical node: `id == osm_id`.
    #[inline]
    pub fn canonical(osm_id: i64, lat: f32, lon: f32) -> Self {
        Self { id: NodeId(osm_id), osm_id, lat, lon }
    }

    #[inline]
    pub fn is_canonical(&self) -> bool {
        self.id.0 == self.osm_id
    }

    /// Great-circle distance to `other` in kilometres.
    #[inline]
    pub fn distance_to(&self, other: &Node) -> f32 {
        earth_distance(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Outgoing one-way connection from a [`Node`].
///
/// `to` may not exist in the graph (see module docs).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub to:   NodeId,
    pub cost: f32,
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// OSM-based network: a set of nodes and directed, weighted edges.
#[derive(Clone, Debug)]
pub struct Graph {
    nodes: FxHashMap<NodeId, Node>,
    edges: FxHashMap<NodeId, Vec<Edge>>,
    /// Next id handed out by [`add_phantom`](Self::add_phantom); `None` once
    /// the id space above the largest stored id is exhausted.
    next_phantom: Option<i64>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes:        FxHashMap::default(),
            edges:        FxHashMap::default(),
            next_phantom: Some(PHANTOM_ID_BASE),
        }
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<Node> {
        self.nodes.get(&id).copied()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Insert or overwrite a node.  Returns `true` if a node with the same id
    /// already existed.
    ///
    /// Overwriting preserves both outgoing and incoming edges; re-check the
    /// cost invariant if the coordinates changed.
    pub fn set(&mut self, node: Node) -> bool {
        if let Some(next) = self.next_phantom {
            if node.id.0 >= next {
                self.next_phantom = node.id.0.checked_add(1);
            }
        }
        self.nodes.insert(node.id, node).is_some()
    }

    /// Remove a node together with its outgoing edges.  Returns `false` if no
    /// such node existed.  Edges pointing at the node are left dangling.
    pub fn delete(&mut self, id: NodeId) -> bool {
        if self.nodes.remove(&id).is_some() {
            self.edges.remove(&id);
            true
        } else {
            false
        }
    }

    /// Iterator over all nodes, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Iterator over all node ids, in unspecified order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Create a non-canonical duplicate of node `of` with a fresh id, the
    /// same `osm_id` and the same position.  The duplicate has no edges.
    ///
    /// Returns `None` if `of` does not exist, or if an id of `i64::MAX` has
    /// been stored or handed out and no larger id is left.
    pub fn add_phantom(&mut self, of: NodeId) -> Option<NodeId> {
        let original = self.get(of)?;
        let id = NodeId(self.next_phantom?);
        self.next_phantom = id.0.checked_add(1);
        self.nodes.insert(id, Node { id, ..original });
        Some(id)
    }

    /// Closest canonical node to `(lat, lon)`, by linear scan.
    ///
    /// O(N); use [`KdTree`](crate::KdTree) for repeated queries.  Returns
    /// `None` when the graph holds no canonical nodes.  Equidistant
    /// candidates resolve to the smallest id.
    pub fn find_nearest_node(&self, lat: f32, lon: f32) -> Option<Node> {
        self.nodes
            .values()
            .filter(|n| n.is_canonical())
            .map(|n| (earth_distance(lat, lon, n.lat, n.lon), n))
            .min_by(|(da, a), (db, b)| da.total_cmp(db).then(a.id.cmp(&b.id)))
            .map(|(_, n)| *n)
    }

    // ── Edges ─────────────────────────────────────────────────────────────

    /// Outgoing edges of `from`; empty if the node is unknown or has none.
    #[inline]
    pub fn edges(&self, from: NodeId) -> &[Edge] {
        self.edges.get(&from).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cost of the edge `from → to`, or `f32::INFINITY` if there is none.
    pub fn get_edge(&self, from: NodeId, to: NodeId) -> f32 {
        self.edges(from)
            .iter()
            .find(|e| e.to == to)
            .map_or(f32::INFINITY, |e| e.cost)
    }

    /// Create or update the edge `from → to`.  Returns `true` if an existing
    /// edge was overwritten.
    ///
    /// `cost` is not validated against the distance between the nodes.
    pub fn set_edge(&mut self, from: NodeId, to: NodeId, cost: f32) -> bool {
        let list = self.edges.entry(from).or_default();
        match list.iter_mut().find(|e| e.to == to) {
            Some(existing) => {
                existing.cost = cost;
                true
            }
            None => {
                list.push(Edge { to, cost });
                false
            }
        }
    }

    /// Remove the edge `from → to`.  Returns `false` if it did not exist.
    pub fn delete_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        let Some(list) = self.edges.get_mut(&from) else {
            return false;
        };
        let Some(pos) = list.iter().position(|e| e.to == to) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.edges.remove(&from);
        }
        true
    }

    /// Total number of stored edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
