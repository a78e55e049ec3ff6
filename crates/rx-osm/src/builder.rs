//! Feature collector: buffers the parsed input, then mutates the graph.
//!
//! Ways reference nodes that may appear anywhere in the file, and
//! restrictions reference ways, so nothing is written to the graph until
//! [`GraphBuilder::finish`].  A parse error therefore leaves the graph as it
//! was.

use rustc_hash::FxHashMap;

use rx_core::{NodeId, PHANTOM_ID_BASE};
use rx_graph::{Graph, Node};

use crate::error::{OsmLoadingError, OsmResult};
use crate::feature::{Feature, OsmRelation, OsmWay};
use crate::options::BoundingBox;
use crate::profile::{Direction, Profile};
use crate::restriction::{self, Restriction};

/// Counters reported after ingestion.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct IngestStats {
    pub ways:                 usize,
    pub edges:                usize,
    pub missing_nodes:        usize,
    pub restrictions:         usize,
    pub skipped_restrictions: usize,
    pub phantoms:             usize,
}

/// A way the profile can use.
struct RoutableWay {
    id:        i64,
    nodes:     Vec<i64>,
    penalty:   f32,
    direction: Direction,
}

pub(crate) struct GraphBuilder<'p> {
    profile:      &'p Profile,
    bbox:         BoundingBox,
    nodes:        FxHashMap<i64, (f32, f32)>,
    ways:         Vec<RoutableWay>,
    /// Way id → index in `ways`.
    way_index:    FxHashMap<i64, usize>,
    restrictions: Vec<Restriction>,
    stats:        IngestStats,
}

impl<'p> GraphBuilder<'p> {
    pub fn new(profile: &'p Profile, bbox: BoundingBox) -> Self {
        Self {
            profile,
            bbox,
            nodes: FxHashMap::default(),
            ways: Vec::new(),
            way_index: FxHashMap::default(),
            restrictions: Vec::new(),
            stats: IngestStats::default(),
        }
    }

    // ── Collection ────────────────────────────────────────────────────────

    pub fn add(&mut self, feature: Feature) {
        match feature {
            Feature::Node(n) => {
                self.nodes.insert(n.id, (n.lat, n.lon));
            }
            Feature::Way(w) => self.add_way(w),
            Feature::Relation(r) => self.add_relation(r),
        }
    }

    fn add_way(&mut self, way: OsmWay) {
        if way.nodes.len() < 2 {
            return;
        }
        let Some(penalty) = self.profile.way_penalty(&way.tags) else {
            return;
        };
        let direction = self.profile.way_direction(&way.tags);
        self.way_index.insert(way.id, self.ways.len());
        self.ways.push(RoutableWay { id: way.id, nodes: way.nodes, penalty, direction });
    }

    fn add_relation(&mut self, rel: OsmRelation) {
        let Some(kind) = self.profile.restriction_kind(&rel.tags) else {
            return;
        };
        match Restriction::from_relation(&rel, kind) {
            Ok(r) => self.restrictions.push(r),
            Err(reason) => {
                log::warn!("skipping turn restriction {}: {reason}", rel.id);
                self.stats.skipped_restrictions += 1;
            }
        }
    }

    // ── Graph construction ────────────────────────────────────────────────

    /// Write the collected ways and restrictions into `graph`.
    pub fn finish(mut self, graph: &mut Graph) -> OsmResult<IngestStats> {
        self.validate()?;

        for way in &self.ways {
            if !self.bbox.is_none() && !self.touches_bbox(&way.nodes) {
                continue;
            }
            self.stats.ways += 1;
            for pair in way.nodes.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if a == b {
                    continue;
                }
                let (Some(na), Some(nb)) = (self.resolve_node(graph, a), self.resolve_node(graph, b)) else {
                    log::debug!("way {}: skipping segment {a}-{b} referencing a missing node", way.id);
                    self.stats.missing_nodes += 1;
                    continue;
                };
                for node in [na, nb] {
                    if !graph.contains(node.id) {
                        graph.set(node);
                    }
                }

                let cost = na.distance_to(&nb) * way.penalty;
                let added = match way.direction {
                    Direction::Forward => connect(graph, &na, &nb, cost) as usize,
                    Direction::Backward => connect(graph, &nb, &na, cost) as usize,
                    Direction::Both => connect(graph, &na, &nb, cost) as usize + connect(graph, &nb, &na, cost) as usize,
                };
                self.stats.edges += added;
            }
        }

        self.apply_restrictions(graph);
        Ok(self.stats)
    }

    /// Node ids must stay clear of the phantom range and coordinates must be
    /// real positions.  Only nodes referenced by routable ways are checked.
    fn validate(&self) -> OsmResult<()> {
        for way in &self.ways {
            for id in &way.nodes {
                if *id >= PHANTOM_ID_BASE {
                    return Err(OsmLoadingError::Inconsistent(format!(
                        "way {}: node id {id} collides with the phantom id range",
                        way.id
                    )));
                }
                if let Some(&(lat, lon)) = self.nodes.get(id) {
                    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                        return Err(OsmLoadingError::Inconsistent(format!(
                            "node {id} has invalid coordinates ({lat}, {lon})"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn touches_bbox(&self, nodes: &[i64]) -> bool {
        nodes
            .iter()
            .any(|id| self.nodes.get(id).is_some_and(|&(lat, lon)| self.bbox.contains(lat, lon)))
    }

    /// The node already in the graph, or a new canonical one from the input.
    /// Existing nodes are never overwritten.
    fn resolve_node(&self, graph: &Graph, osm_id: i64) -> Option<Node> {
        graph
            .get(NodeId(osm_id))
            .or_else(|| self.nodes.get(&osm_id).map(|&(lat, lon)| Node::canonical(osm_id, lat, lon)))
    }

    fn apply_restrictions(&mut self, graph: &mut Graph) {
        if self.restrictions.is_empty() {
            return;
        }
        let mut index = restriction::osm_index(graph);

        for r in &self.restrictions {
            let path = match r.node_path(|id| self.way_index.get(&id).map(|&i| self.ways[i].nodes.as_slice())) {
                Ok(path) => path,
                Err(reason) => {
                    log::warn!("skipping turn restriction {}: {reason}", r.id);
                    self.stats.skipped_restrictions += 1;
                    continue;
                }
            };

            let via = &path[1..path.len() - 1];
            if !self.bbox.is_none() && !self.touches_bbox(via) {
                continue;
            }

            self.stats.phantoms += restriction::apply(graph, &mut index, &path, r.kind);
            self.stats.restrictions += 1;
        }
    }
}

/// Add or cheapen the edge `from → to`.  Returns `true` if a new edge was
/// created.
///
/// An earlier ingestion may have redirected this edge onto a phantom copy of
/// `to`; that edge is updated instead so the restriction stays in force.
fn connect(graph: &mut Graph, from: &Node, to: &Node, cost: f32) -> bool {
    let existing = graph
        .edges(from.id)
        .iter()
        .find(|e| graph.get(e.to).is_some_and(|n| n.osm_id == to.osm_id))
        .copied();
    match existing {
        Some(edge) => {
            if cost < edge.cost {
                graph.set_edge(from.id, edge.to, cost);
            }
            false
        }
        None => {
            graph.set_edge(from.id, to.id, cost);
            true
        }
    }
}
