//! Static nearest-node index over the canonical nodes of a [`Graph`]
//! snapshot, backed by an [`rstar::RTree`].
//!
//! # Geometry
//!
//! Nodes are stored as points on the unit sphere, `(cos φ cos λ, cos φ sin λ,
//! sin φ)`.  Chord length is monotonic in great-circle distance, so the
//! R-tree's Euclidean nearest neighbour is also the great-circle nearest one,
//! with no seam at the antimeridian and no singularity at the poles.
//!
//! The R-tree orders candidates by chord in `f64`; the final pick among
//! near-ties uses the same `f32` [`earth_distance`] and smallest-id rule as
//! [`Graph::find_nearest_node`], so both lookups agree.
//!
//! The tree owns its data.  Later changes to the graph are not reflected.

use std::fmt;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use rx_core::{earth_distance, NodeId};

use crate::Graph;

/// Chord slack (relative, and absolute on the unit sphere, about 6 m) within
/// which candidates are re-ranked by `earth_distance`.  Covers the `f32`
/// rounding of the haversine.
const TIE_SLACK_REL: f64 = 1e-4;
const TIE_SLACK_ABS: f64 = 1e-6;

#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 3],
    id:    NodeId,
    lat:   f32,
    lon:   f32,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        chord_2(&self.point, point)
    }
}

/// Nearest-node index; see the module docs.
#[derive(Clone)]
pub struct KdTree {
    tree: RTree<NodeEntry>,
}

impl Default for KdTree {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl fmt::Debug for KdTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdTree").field("len", &self.len()).finish()
    }
}

impl KdTree {
    /// Index every canonical node currently in `graph`.
    pub fn build(graph: &Graph) -> Self {
        let entries: Vec<NodeEntry> = graph
            .iter()
            .filter(|n| n.is_canonical())
            .map(|n| NodeEntry { point: unit_vector(n.lat, n.lon), id: n.id, lat: n.lat, lon: n.lon })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Id of the indexed node closest to `(lat, lon)`, or `None` if the tree
    /// is empty.  Equidistant candidates resolve to the smallest id.
    pub fn find_nearest_node(&self, lat: f32, lon: f32) -> Option<NodeId> {
        let query = unit_vector(lat, lon);
        let mut candidates = self.tree.nearest_neighbor_iter(&query);

        let first = candidates.next()?;
        let cutoff = first.distance_2(&query).sqrt() * (1.0 + TIE_SLACK_REL) + TIE_SLACK_ABS;
        let cutoff_2 = cutoff * cutoff;

        std::iter::once(first)
            .chain(candidates.take_while(|e| e.distance_2(&query) <= cutoff_2))
            .map(|e| (earth_distance(lat, lon, e.lat, e.lon), e.id))
            .min_by(|(da, a), (db, b)| da.total_cmp(db).then(a.cmp(b)))
            .map(|(_, id)| id)
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

fn unit_vector(lat: f32, lon: f32) -> [f64; 3] {
    let (phi, lambda) = (f64::from(lat).to_radians(), f64::from(lon).to_radians());
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_lambda, cos_lambda) = lambda.sin_cos();
    [cos_phi * cos_lambda, cos_phi * sin_lambda, sin_phi]
}

fn chord_2(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}
