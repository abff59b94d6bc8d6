//! Graph document loading.
//!
//! Documents follow the node-link layout exported by OSMnx:
//!
//! ```json
//! {
//!   "metadata": { "mode_info": { "mode": "car_walk" } },
//!   "graph": {
//!     "nodes": [{ "id": 1, "x": -73.56, "y": 45.50, "street_count": 3 }],
//!     "links": [{ "source": 1, "target": 2, "length": 120.5,
//!                 "maxspeed": "50 mph", "travel_time": 8.7 }]
//!   }
//! }
//! ```
//!
//! `x` is longitude and `y` is latitude. Identifiers and speeds arrive in
//! several shapes and are normalized here, once.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{Edge, Graph, GraphError, Node};
use crate::domain::{RawId, RawSpeed, TransportMode};

#[derive(Debug, Deserialize)]
struct GraphDocument {
    #[serde(default)]
    metadata: Option<Metadata>,
    graph: GraphBody,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    #[serde(default)]
    mode_info: Option<ModeInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct ModeInfo {
    #[serde(default)]
    mode: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphBody {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: RawId,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    street_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    #[serde(default)]
    source: RawId,
    #[serde(default)]
    target: RawId,
    #[serde(default)]
    length: Option<f64>,
    #[serde(default)]
    maxspeed: RawSpeed,
    #[serde(default)]
    travel_time: Option<f64>,
    #[serde(default)]
    traffic_multiplier: Option<f64>,
    #[serde(default)]
    name: Option<serde_json::Value>,
    #[serde(default)]
    mode: Option<String>,
}

impl RawLink {
    fn into_edge(self, inherited_mode: Option<TransportMode>) -> Edge {
        Edge {
            from: self.source.normalize(),
            to: self.target.normalize(),
            length_m: self.length.unwrap_or(0.0),
            max_speed_kmh: self.maxspeed.kmh(),
            travel_time_s: self.travel_time.unwrap_or(0.0),
            traffic_multiplier: self.traffic_multiplier.unwrap_or(1.0),
            mode: self
                .mode
                .as_deref()
                .map(TransportMode::parse)
                .or(inherited_mode),
            name: self.name.as_ref().and_then(street_name),
        }
    }
}

/// Merged ways carry a list of names; keep the first.
fn street_name(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => items.iter().find_map(|v| v.as_str().map(String::from)),
        _ => None,
    }
}

fn parse_document(bytes: &[u8]) -> Result<GraphDocument, GraphError> {
    serde_json::from_slice(bytes).map_err(|e| GraphError::Json {
        path: PathBuf::new(),
        message: e.to_string(),
    })
}

fn build_graph(body: GraphBody, modes: Vec<TransportMode>) -> Graph {
    let inherited_mode = match modes.as_slice() {
        [only] => Some(*only),
        _ => None,
    };

    let mut graph = Graph::new();
    for raw in body.nodes {
        graph.add_node(Node {
            id: raw.id.normalize(),
            latitude: raw.y.unwrap_or(0.0),
            longitude: raw.x.unwrap_or(0.0),
            street_count: raw.street_count.unwrap_or(0),
        });
    }
    for link in body.links {
        graph.add_edge(link.into_edge(inherited_mode));
    }
    graph.set_modes(modes);
    graph
}

/// Build a graph from an in-memory document.
///
/// Only the `graph` section is read; mode metadata is left to
/// [`load_graph_from_file`].
pub fn load_graph_from_json(bytes: &[u8]) -> Result<Graph, GraphError> {
    let document = parse_document(bytes)?;
    Ok(build_graph(document.graph, Vec::new()))
}

/// Load a graph file, including its `metadata.mode_info.mode` tag.
pub fn load_graph_from_file(path: impl AsRef<Path>) -> Result<Graph, GraphError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(&bytes).map_err(|e| e.with_path(path))?;

    let modes = document
        .metadata
        .and_then(|m| m.mode_info)
        .and_then(|info| info.mode)
        .map(|tag| TransportMode::parse_composite(&tag))
        .unwrap_or_default();
    if modes.contains(&TransportMode::Unknown) {
        warn!(path = %path.display(), "graph declares an unrecognized mode");
    }

    let graph = build_graph(document.graph, modes);
    debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}

/// Load every `.json` file under `dir`, recursively, keyed by file stem.
///
/// The first failure aborts the whole load. Files are visited in sorted
/// order, so when two files share a stem the later path wins.
pub fn load_graphs_from_directory(
    dir: impl AsRef<Path>,
) -> Result<HashMap<String, Graph>, GraphError> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    collect_json_files(dir, &mut files)?;

    let mut graphs = HashMap::with_capacity(files.len());
    for path in files {
        let key = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        let graph = load_graph_from_file(&path)?;
        if graphs.insert(key.clone(), graph).is_some() {
            warn!(name = %key, path = %path.display(), "graph name appears twice, keeping the later file");
        }
    }

    info!(dir = %dir.display(), count = graphs.len(), "loaded graphs");
    Ok(graphs)
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), GraphError> {
    let listing_error = |source| GraphError::Directory {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(listing_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(listing_error)?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}
