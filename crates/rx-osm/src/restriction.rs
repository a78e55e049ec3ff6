//! Turn restrictions: member resolution and phantom-node expansion.
//!
//! # Encoding
//!
//! A restriction becomes an OSM node path `[p0, v1, …, vk, pt]`: the node
//! before the junction on the from-way, the via node(s), and the first node
//! after it on the to-way.  For every graph node representing `p0` the path
//! is walked edge by edge; each via node is cloned into a phantom that starts
//! with a copy of the original's outgoing edges, and the walked edge is
//! redirected onto the clone.  The last clone then loses the forbidden exit
//! (`no_*`) or every exit but the mandated one (`only_*`).
//!
//! ```text
//!        B                       B
//!        ↑                       ↑
//!  A ──→ V ──→ C     ⇒     A     V ──→ C
//!                          └──→ V' ──→ C          (no_left_turn A-V-B)
//! ```
//!
//! Because later walks follow the edges as already rewritten, restrictions
//! sharing a junction compose.  The router has to forbid immediate
//! turn-arounds, or a route could leave `V'` back to `A` and re-enter
//! through the canonical `V`.

use rustc_hash::FxHashMap;

use rx_core::NodeId;
use rx_graph::Graph;

use crate::feature::{MemberType, OsmRelation};
use crate::profile::RestrictionKind;

/// Graph nodes (canonical and phantom) per OSM node id.
pub(crate) type OsmIndex = FxHashMap<i64, Vec<NodeId>>;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Via {
    Node(i64),
    /// Consecutive via ways in relation order.
    Ways(Vec<i64>),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Restriction {
    pub id:   i64,
    pub kind: RestrictionKind,
    pub from: i64,
    pub via:  Via,
    pub to:   i64,
}

// ── Member resolution ─────────────────────────────────────────────────────────

impl Restriction {
    /// Read the from/via/to members.  `Err` carries a human-readable reason.
    pub fn from_relation(rel: &OsmRelation, kind: RestrictionKind) -> Result<Self, String> {
        let mut from = None;
        let mut to = None;
        let mut via_node = None;
        let mut via_ways = Vec::new();

        for m in &rel.members {
            match (m.role.as_str(), m.kind) {
                ("from", MemberType::Way) => {
                    if from.replace(m.id).is_some() {
                        return Err("more than one from way".into());
                    }
                }
                ("to", MemberType::Way) => {
                    if to.replace(m.id).is_some() {
                        return Err("more than one to way".into());
                    }
                }
                ("via", MemberType::Node) => {
                    if via_node.replace(m.id).is_some() {
                        return Err("more than one via node".into());
                    }
                }
                ("via", MemberType::Way) => via_ways.push(m.id),
                (role @ ("from" | "to" | "via"), member_kind) => {
                    return Err(format!("{role} member {} has unsupported type {member_kind:?}", m.id));
                }
                _ => {}
            }
        }

        let from = from.ok_or("missing from way")?;
        let to = to.ok_or("missing to way")?;
        let via = match (via_node, via_ways.is_empty()) {
            (Some(node), true) => Via::Node(node),
            (None, false) => Via::Ways(via_ways),
            (Some(_), false) => return Err("both via node and via ways".into()),
            (None, true) => return Err("missing via member".into()),
        };
        Ok(Self { id: rel.id, kind, from, via, to })
    }

    /// Resolve to an OSM node path `[p0, v1, …, vk, pt]`.
    ///
    /// `way_nodes` looks up the node list of a routable way; every way it
    /// returns has at least two nodes.
    pub fn node_path<'w>(&self, way_nodes: impl Fn(i64) -> Option<&'w [i64]>) -> Result<Vec<i64>, String> {
        let lookup = |id: i64| way_nodes(id).ok_or_else(|| format!("way {id} is missing or not routable"));
        let from = lookup(self.from)?;
        let to = lookup(self.to)?;

        let (mut path, junction) = match &self.via {
            Via::Node(via) => {
                let p0 = approach(from, *via).ok_or("from way does not end at the via node")?;
                (vec![p0, *via], *via)
            }
            Via::Ways(ways) => {
                let first = lookup(ways[0])?;
                let start = [from[from.len() - 1], from[0]]
                    .into_iter()
                    .find(|&n| first[0] == n || first[first.len() - 1] == n)
                    .ok_or("from way is not connected to the via ways")?;
                let p0 = approach(from, start).ok_or("from way is not connected to the via ways")?;

                let mut path = vec![p0, start];
                let mut cur = start;
                for &way in ways {
                    let nodes = orient(lookup(way)?, cur).ok_or("via ways are not connected")?;
                    path.extend_from_slice(&nodes[1..]);
                    cur = nodes[nodes.len() - 1];
                }
                (path, cur)
            }
        };

        let pt = depart(to, junction).ok_or("to way does not start at the via")?;
        path.push(pt);
        Ok(path)
    }
}

/// Node preceding `end` when travelling along `way` towards it.
fn approach(way: &[i64], end: i64) -> Option<i64> {
    if way.last() == Some(&end) {
        way.get(way.len().wrapping_sub(2)).copied()
    } else if way.first() == Some(&end) {
        way.get(1).copied()
    } else {
        None
    }
}

/// Node following `start` when travelling along `way` away from it.
fn depart(way: &[i64], start: i64) -> Option<i64> {
    if way.first() == Some(&start) {
        way.get(1).copied()
    } else if way.last() == Some(&start) {
        way.get(way.len().wrapping_sub(2)).copied()
    } else {
        None
    }
}

/// `way` as a sequence beginning at `start`, or `None` if `start` is not one
/// of its ends.
fn orient(way: &[i64], start: i64) -> Option<Vec<i64>> {
    if way.first() == Some(&start) {
        Some(way.to_vec())
    } else if way.last() == Some(&start) {
        Some(way.iter().rev().copied().collect())
    } else {
        None
    }
}

// ── Graph expansion ───────────────────────────────────────────────────────────

pub(crate) fn osm_index(graph: &Graph) -> OsmIndex {
    let mut index = OsmIndex::default();
    for node in graph.iter() {
        index.entry(node.osm_id).or_default().push(node.id);
    }
    for ids in index.values_mut() {
        ids.sort_unstable();
    }
    index
}

/// Apply one resolved restriction path.  Returns the number of phantom nodes
/// created.
pub(crate) fn apply(graph: &mut Graph, index: &mut OsmIndex, path: &[i64], kind: RestrictionKind) -> usize {
    if path.len() < 3 {
        return 0;
    }
    let Some(starts) = index.get(&path[0]).cloned() else {
        return 0;
    };

    let mut created = 0;
    for start in starts {
        // Nothing is touched unless the whole manoeuvre exists from here.
        if !walk_exists(graph, start, path) {
            continue;
        }
        created += expand(graph, index, start, path, kind);
    }
    created
}

/// Target of the first edge from `from` to any copy of OSM node `osm`.
fn step(graph: &Graph, from: NodeId, osm: i64) -> Option<NodeId> {
    graph
        .edges(from)
        .iter()
        .map(|e| e.to)
        .find(|&to| graph.get(to).is_some_and(|n| n.osm_id == osm))
}

fn walk_exists(graph: &Graph, start: NodeId, path: &[i64]) -> bool {
    let mut cur = start;
    for &osm in &path[1..] {
        match step(graph, cur, osm) {
            Some(next) => cur = next,
            None => return false,
        }
    }
    true
}

fn expand(graph: &mut Graph, index: &mut OsmIndex, start: NodeId, path: &[i64], kind: RestrictionKind) -> usize {
    let last = path.len() - 1;
    let mut cur = start;
    let mut created = 0;

    for i in 1..last {
        let Some(target) = step(graph, cur, path[i]) else {
            return created;
        };
        let Some(clone) = graph.add_phantom(target) else {
            return created;
        };
        let cost = graph.get_edge(cur, target);
        let outgoing = graph.edges(target).to_vec();
        for edge in outgoing {
            graph.set_edge(clone, edge.to, edge.cost);
        }
        graph.delete_edge(cur, target);
        graph.set_edge(cur, clone, cost);
        index.entry(path[i]).or_default().push(clone);
        created += 1;

        if kind == RestrictionKind::Mandatory && i + 1 < last {
            let next = path[i + 1];
            retain_edges(graph, clone, |osm| osm == Some(next));
        }
        cur = clone;
    }

    let pt = path[last];
    match kind {
        RestrictionKind::Prohibitory => retain_edges(graph, cur, |osm| osm != Some(pt)),
        RestrictionKind::Mandatory => retain_edges(graph, cur, |osm| osm == Some(pt)),
    }
    created
}

/// Drop edges from `from` whose target's OSM id fails `keep`.  Dangling
/// targets are passed as `None`.
fn retain_edges(graph: &mut Graph, from: NodeId, keep: impl Fn(Option<i64>) -> bool) {
    let doomed: Vec<NodeId> = graph
        .edges(from)
        .iter()
        .map(|e| e.to)
        .filter(|&to| !keep(graph.get(to).map(|n| n.osm_id)))
        .collect();
    for to in doomed {
        graph.delete_edge(from, to);
    }
}
