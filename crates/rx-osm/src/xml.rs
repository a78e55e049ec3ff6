//! Streaming OSM XML reader built on `quick-xml`.
//!
//! Only the elements routing needs are interpreted: `<node>`, `<way>` with
//! its `<nd>` and `<tag>` children, `<relation>` with `<member>` and `<tag>`.
//! Everything else (`<bounds>`, `<meta>`, `<note>`, node tags…) is skipped.
//! Features marked `action="delete"` or `visible="false"` are dropped, so
//! osmChange-style exports and history dumps load cleanly.

use std::io::BufRead;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{OsmLoadingError, OsmResult};
use crate::feature::{Feature, Member, MemberType, OsmNode, OsmRelation, OsmWay};

/// Depth of `<node>`, `<way>` and `<relation>` (the root is depth 1).
const FEATURE_DEPTH: usize = 2;

pub(crate) fn read<R: BufRead, F: FnMut(Feature)>(input: R, mut emit: F) -> OsmResult<()> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    // `None` while outside a feature or inside a skipped one.
    let mut current: Option<Feature> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| read_error(e, reader.buffer_position()))?;
        match event {
            Event::Start(e) => {
                depth += 1;
                open(&e, depth, &mut saw_root, &mut current)?;
            }
            Event::Empty(e) => {
                open(&e, depth + 1, &mut saw_root, &mut current)?;
                close(e.name().as_ref(), depth + 1, &mut current, &mut emit);
            }
            Event::End(e) => {
                close(e.name().as_ref(), depth, &mut current, &mut emit);
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if depth != 0 {
        return Err(OsmLoadingError::Xml(format!("unexpected end of input with {depth} unclosed element(s)")));
    }
    if !saw_root {
        return Err(OsmLoadingError::Xml("missing <osm> root element".into()));
    }
    Ok(())
}

fn read_error(err: quick_xml::Error, position: usize) -> OsmLoadingError {
    match err {
        // Usually a corrupt gzip/bzip2 stream underneath.
        quick_xml::Error::Io(io) => OsmLoadingError::Io(std::io::Error::new(io.kind(), io.to_string())),
        other => OsmLoadingError::Xml(format!("{other} (near byte {position})")),
    }
}

// ── Element handling ──────────────────────────────────────────────────────────

fn open(e: &BytesStart<'_>, depth: usize, saw_root: &mut bool, current: &mut Option<Feature>) -> OsmResult<()> {
    let name = e.name();
    let name = name.as_ref();

    if depth == 1 {
        if name != b"osm" {
            return Err(OsmLoadingError::Xml(format!(
                "expected <osm> root element, found <{}>",
                String::from_utf8_lossy(name)
            )));
        }
        *saw_root = true;
        return Ok(());
    }

    if depth == FEATURE_DEPTH {
        if matches!(name, b"node" | b"way" | b"relation") && is_removed(e)? {
            *current = None;
            return Ok(());
        }
        *current = match name {
            b"node" => Some(Feature::Node(OsmNode {
                id:  required(e, "id")?,
                lat: required(e, "lat")?,
                lon: required(e, "lon")?,
            })),
            b"way" => Some(Feature::Way(OsmWay {
                id:    required(e, "id")?,
                nodes: Vec::new(),
                tags:  Default::default(),
            })),
            b"relation" => Some(Feature::Relation(OsmRelation {
                id:      required(e, "id")?,
                members: Vec::new(),
                tags:    Default::default(),
            })),
            _ => None,
        };
        return Ok(());
    }

    // Children of the current feature.
    match (name, current.as_mut()) {
        (b"nd", Some(Feature::Way(way))) => way.nodes.push(required(e, "ref")?),
        (b"tag", Some(Feature::Way(OsmWay { tags, .. }) | Feature::Relation(OsmRelation { tags, .. }))) => {
            let k: String = required(e, "k")?;
            let v: String = required(e, "v")?;
            tags.insert(k, v);
        }
        (b"member", Some(Feature::Relation(rel))) => {
            let kind = match attribute(e, "type")?.as_deref() {
                Some("node") => MemberType::Node,
                Some("way") => MemberType::Way,
                Some("relation") => MemberType::Relation,
                other => {
                    return Err(OsmLoadingError::Xml(format!(
                        "relation {}: invalid member type {other:?}",
                        rel.id
                    )));
                }
            };
            rel.members.push(Member {
                kind,
                id: required(e, "ref")?,
                role: attribute(e, "role")?.unwrap_or_default(),
            });
        }
        _ => {}
    }
    Ok(())
}

fn close<F: FnMut(Feature)>(name: &[u8], depth: usize, current: &mut Option<Feature>, emit: &mut F) {
    if depth == FEATURE_DEPTH && matches!(name, b"node" | b"way" | b"relation") {
        if let Some(feature) = current.take() {
            emit(feature);
        }
    }
}

// ── Attributes ────────────────────────────────────────────────────────────────

fn is_removed(e: &BytesStart<'_>) -> OsmResult<bool> {
    Ok(attribute(e, "action")?.as_deref() == Some("delete")
        || attribute(e, "visible")?.as_deref() == Some("false"))
}

fn attribute(e: &BytesStart<'_>, key: &str) -> OsmResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| OsmLoadingError::Xml(err.to_string()))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|err| OsmLoadingError::Xml(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required<T: FromStr>(e: &BytesStart<'_>, key: &str) -> OsmResult<T> {
    let element = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let raw = attribute(e, key)?
        .ok_or_else(|| OsmLoadingError::Xml(format!("<{element}> without {key:?} attribute")))?;
    raw.parse()
        .map_err(|_| OsmLoadingError::Xml(format!("<{element}> has invalid {key:?} attribute: {raw:?}")))
}
