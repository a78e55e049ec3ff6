//! Format-independent OSM feature stream.
//!
//! Both parsers emit these owned values one by one; the builder consumes them
//! without caring where they came from.  Node tags are not kept: nothing in
//! routing depends on them.

use rustc_hash::FxHashMap;

pub(crate) type Tags = FxHashMap<String, String>;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct OsmNode {
    pub id:  i64,
    pub lat: f32,
    pub lon: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct OsmWay {
    pub id:    i64,
    pub nodes: Vec<i64>,
    pub tags:  Tags,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum MemberType {
    Node,
    Way,
    Relation,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Member {
    pub kind: MemberType,
    pub id:   i64,
    pub role: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct OsmRelation {
    pub id:      i64,
    pub members: Vec<Member>,
    pub tags:    Tags,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Feature {
    Node(OsmNode),
    Way(OsmWay),
    Relation(OsmRelation),
}
