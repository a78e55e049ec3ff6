//! Public ingestion entry points.

use std::path::Path;

use rx_graph::Graph;

use crate::builder::GraphBuilder;
use crate::error::OsmResult;
use crate::format::read_features;
use crate::options::IngestOptions;

/// Parse OSM data held in memory and add the routable part of it to `graph`.
///
/// The profile is validated before anything is parsed.  Nodes already in
/// the graph are reused, never overwritten; where an edge already exists the
/// cheaper cost wins.
///
/// # Errors
///
/// [`OsmLoadingError`](crate::OsmLoadingError) for an invalid profile, an
/// undetectable format, malformed or truncated input, or node data that
/// clashes with the graph's id scheme.
pub fn add_from_memory(graph: &mut Graph, options: &IngestOptions, data: &[u8]) -> OsmResult<()> {
    let profile = options.profile.resolve();
    profile.validate()?;

    let mut builder = GraphBuilder::new(&profile, options.bbox);
    read_features(data, options.format, |feature| builder.add(feature))?;
    let stats = builder.finish(graph)?;

    log::info!(
        "{} profile: added {} ways ({} new edges), {} turn restrictions ({} phantom nodes)",
        profile.name,
        stats.ways,
        stats.edges,
        stats.restrictions,
        stats.phantoms,
    );
    if stats.missing_nodes > 0 {
        log::debug!("skipped {} way segments referencing missing nodes", stats.missing_nodes);
    }
    if stats.skipped_restrictions > 0 {
        log::info!("skipped {} malformed turn restrictions", stats.skipped_restrictions);
    }
    Ok(())
}

/// Read `path` into memory and delegate to [`add_from_memory`].
pub fn add_from_file(graph: &mut Graph, options: &IngestOptions, path: impl AsRef<Path>) -> OsmResult<()> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    log::debug!("loaded {} ({} bytes)", path.display(), data.len());
    add_from_memory(graph, options, &data)
}
