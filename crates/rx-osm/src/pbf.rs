//! OSM PBF reader (`osmpbf`).
//!
//! Blocks are decoded sequentially on the calling thread so features reach
//! the collector in file order.

use std::io::Cursor;

use osmpbf::{Element, ElementReader, RelMemberType};

use crate::error::{OsmLoadingError, OsmResult};
use crate::feature::{Feature, Member, MemberType, OsmNode, OsmRelation, OsmWay, Tags};

pub(crate) fn read<F: FnMut(Feature)>(data: &[u8], mut emit: F) -> OsmResult<()> {
    let reader = ElementReader::new(Cursor::new(data));

    reader
        .for_each(|element| match element {
            Element::Node(n) => emit(Feature::Node(OsmNode {
                id:  n.id(),
                lat: n.lat() as f32,
                lon: n.lon() as f32,
            })),
            Element::DenseNode(n) => emit(Feature::Node(OsmNode {
                id:  n.id(),
                lat: n.lat() as f32,
                lon: n.lon() as f32,
            })),
            Element::Way(w) => emit(Feature::Way(OsmWay {
                id:    w.id(),
                nodes: w.refs().collect(),
                tags:  collect_tags(w.tags()),
            })),
            Element::Relation(r) => emit(Feature::Relation(OsmRelation {
                id:      r.id(),
                members: r
                    .members()
                    .map(|m| Member {
                        kind: match m.member_type {
                            RelMemberType::Node => MemberType::Node,
                            RelMemberType::Way => MemberType::Way,
                            RelMemberType::Relation => MemberType::Relation,
                        },
                        id:   m.member_id,
                        role: m.role().unwrap_or("").to_string(),
                    })
                    .collect(),
                tags:    collect_tags(r.tags()),
            })),
        })
        .map_err(|e| OsmLoadingError::Pbf(e.to_string()))
}

fn collect_tags<'a>(tags: impl Iterator<Item = (&'a str, &'a str)>) -> Tags {
    tags.map(|(k, v)| (k.to_string(), v.to_string())).collect()
}
