use super::LicenseField;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque node identifier as emitted by `conan graph info` ("0", "1", ...).
pub type NodeId = String;

/// Malformed dependency graph input.
///
/// Every variant names the offending node so the caller can locate the
/// problem in the package manager's output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("malformed dependency graph: {0}")]
    InvalidDocument(String),

    #[error("malformed dependency graph: node '{node_id}' is missing required field '{field}'")]
    MissingField {
        node_id: NodeId,
        field: &'static str,
    },

    #[error("malformed dependency graph: node '{node_id}' is invalid: {details}")]
    InvalidNode { node_id: NodeId, details: String },

    #[error("malformed dependency graph: node '{node_id}' has unknown context '{context}'")]
    UnknownContext { node_id: NodeId, context: String },

    #[error(
        "malformed dependency graph: node '{node_id}' depends on '{dependency_id}', which is not a node of the graph"
    )]
    DanglingDependency {
        node_id: NodeId,
        dependency_id: NodeId,
    },

    #[error("malformed dependency graph: node '{node_id}' appears more than once")]
    DuplicateNode { node_id: NodeId },

    #[error("malformed dependency graph: root '{node_id}' is not a node of the graph")]
    UnknownRoot { node_id: NodeId },
}

/// Whether a package ends up in the consumer's artifact (`host`) or only
/// runs while producing it (`build`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    #[default]
    Host,
    Build,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Host => write!(f, "host"),
            Context::Build => write!(f, "build"),
        }
    }
}

impl FromStr for Context {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "host" => Ok(Context::Host),
            "build" => Ok(Context::Build),
            other => Err(format!(
                "Invalid context: {}. Please specify 'host' or 'build'",
                other
            )),
        }
    }
}

/// Edge metadata attached to a dependency entry of a node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct DependencyEdge {
    #[serde(default, rename = "ref")]
    reference: Option<String>,
    #[serde(default)]
    direct: bool,
}

impl DependencyEdge {
    pub fn new(reference: Option<String>, direct: bool) -> Self {
        Self { reference, direct }
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn is_direct(&self) -> bool {
        self.direct
    }
}

/// One package node of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    id: NodeId,
    reference: String,
    context: Context,
    license: LicenseField,
    dependencies: BTreeMap<NodeId, DependencyEdge>,
}

impl GraphNode {
    pub fn new(
        id: impl Into<NodeId>,
        reference: impl Into<String>,
        context: Context,
        license: LicenseField,
    ) -> Self {
        Self {
            id: id.into(),
            reference: reference.into(),
            context,
            license,
            dependencies: BTreeMap::new(),
        }
    }

    pub fn with_dependency(mut self, id: impl Into<NodeId>, edge: DependencyEdge) -> Self {
        self.dependencies.insert(id.into(), edge);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn context(&self) -> Context {
        self.context
    }

    pub fn license(&self) -> &LicenseField {
        &self.license
    }

    pub fn dependencies(&self) -> &BTreeMap<NodeId, DependencyEdge> {
        &self.dependencies
    }
}

/// DependencyGraph aggregate built from `conan graph info --format=json`
///
/// Nodes are kept in ascending id order (numeric ids compare numerically)
/// so summaries derived from the graph are deterministic. Construction
/// checks that every dependency edge and root id points at a known node.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
    root_ids: Vec<NodeId>,
}

#[derive(Deserialize)]
struct GraphInfoDocument {
    graph: RawGraph,
}

#[derive(Deserialize)]
struct RawGraph {
    /// Decoded per node so type errors can name the node.
    nodes: BTreeMap<NodeId, serde_json::Value>,
    #[serde(default)]
    root: BTreeMap<NodeId, serde_json::Value>,
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(default, rename = "ref")]
    reference: Option<String>,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    license: LicenseField,
    #[serde(default)]
    dependencies: BTreeMap<NodeId, DependencyEdge>,
}

impl RawNode {
    fn into_node(self, id: NodeId) -> Result<GraphNode, GraphError> {
        let reference = self.reference.ok_or_else(|| GraphError::MissingField {
            node_id: id.clone(),
            field: "ref",
        })?;
        let context = self.context.ok_or_else(|| GraphError::MissingField {
            node_id: id.clone(),
            field: "context",
        })?;
        let context = context
            .parse::<Context>()
            .map_err(|_| GraphError::UnknownContext {
                node_id: id.clone(),
                context,
            })?;

        Ok(GraphNode {
            id,
            reference,
            context,
            license: self.license,
            dependencies: self.dependencies,
        })
    }
}

impl DependencyGraph {
    /// Builds a graph from already-parsed nodes.
    ///
    /// # Errors
    /// Fails on duplicate node ids, unknown root ids, and dependency edges
    /// that point outside the graph.
    pub fn new(mut nodes: Vec<GraphNode>, root_ids: Vec<NodeId>) -> Result<Self, GraphError> {
        nodes.sort_by(|a, b| compare_node_ids(&a.id, &b.id));

        let mut known: HashSet<&str> = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !known.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNode {
                    node_id: node.id.clone(),
                });
            }
        }

        for node in &nodes {
            if let Some(missing) = node
                .dependencies
                .keys()
                .find(|dep| !known.contains(dep.as_str()))
            {
                return Err(GraphError::DanglingDependency {
                    node_id: node.id.clone(),
                    dependency_id: missing.clone(),
                });
            }
        }

        if let Some(missing) = root_ids.iter().find(|id| !known.contains(id.as_str())) {
            return Err(GraphError::UnknownRoot {
                node_id: missing.clone(),
            });
        }

        Ok(Self { nodes, root_ids })
    }

    /// Parses the JSON text printed by `conan graph info --format=json`.
    pub fn from_graph_info_json(json: &str) -> Result<Self, GraphError> {
        let document: GraphInfoDocument = serde_json::from_str(json)
            .map_err(|e| GraphError::InvalidDocument(e.to_string()))?;
        Self::from_document(document)
    }

    /// Same as [`DependencyGraph::from_graph_info_json`] for an already decoded value.
    pub fn from_graph_info_value(value: serde_json::Value) -> Result<Self, GraphError> {
        let document: GraphInfoDocument = serde_json::from_value(value)
            .map_err(|e| GraphError::InvalidDocument(e.to_string()))?;
        Self::from_document(document)
    }

    fn from_document(document: GraphInfoDocument) -> Result<Self, GraphError> {
        let nodes = document
            .graph
            .nodes
            .into_iter()
            .map(|(id, value)| match serde_json::from_value::<RawNode>(value) {
                Ok(raw) => raw.into_node(id),
                Err(e) => Err(GraphError::InvalidNode {
                    node_id: id,
                    details: e.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let root_ids = document.graph.root.into_keys().collect();
        Self::new(nodes, root_ids)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn root_ids(&self) -> &[NodeId] {
        &self.root_ids
    }

    /// Nodes whose context tag equals `context`, in id order.
    pub fn nodes_in_context(&self, context: Context) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |node| node.context == context)
    }

    /// Drops the root (consumer) nodes so only real dependencies remain.
    pub fn without_roots(mut self) -> Self {
        let roots: HashSet<NodeId> = self.root_ids.drain(..).collect();
        self.nodes.retain(|node| !roots.contains(&node.id));
        for node in &mut self.nodes {
            node.dependencies.retain(|dep, _| !roots.contains(dep));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn compare_node_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
