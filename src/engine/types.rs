//! Graph entities shared by every engine stage.

use std::collections::HashMap;

use log::debug;

/// Importance bucket of a node. Drives visibility, ring placement and styling.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
	/// The monitored device itself, or a sibling device on the local network.
	RealDevice,
	/// External endpoint that carries significant traffic.
	ImportantExternal,
	/// External endpoint of lesser interest.
	SecondaryExternal,
	/// Background noise, hidden unless explicitly requested.
	LowPriority,
	/// Category string the engine does not recognise, kept verbatim.
	Other(String),
}

impl Category {
	/// Parses the wire name of a category. Unknown names become [`Category::Other`].
	pub fn parse(raw: &str) -> Self {
		match raw.trim() {
			"real_device" => Self::RealDevice,
			"important_external" => Self::ImportantExternal,
			"secondary_external" => Self::SecondaryExternal,
			"low_priority" => Self::LowPriority,
			other => Self::Other(other.to_string()),
		}
	}

	/// Wire name, also used as the color table key.
	pub fn as_str(&self) -> &str {
		match self {
			Self::RealDevice => "real_device",
			Self::ImportantExternal => "important_external",
			Self::SecondaryExternal => "secondary_external",
			Self::LowPriority => "low_priority",
			Self::Other(name) => name,
		}
	}

	/// Whether the node is an external endpoint governed by the external toggle.
	pub fn is_external(&self) -> bool {
		matches!(self, Self::ImportantExternal | Self::SecondaryExternal)
	}
}

/// Role of a node in the network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeType {
	/// End device (the default for unknown roles).
	#[default]
	Device,
	/// Router or access point.
	Gateway,
	/// Remote server.
	Server,
	/// Name resolver.
	Dns,
	/// Cloud service endpoint.
	Cloud,
}

impl NodeType {
	/// Parses the wire name, falling back to [`NodeType::Device`].
	pub fn parse(raw: &str) -> Self {
		match raw.trim().to_ascii_lowercase().as_str() {
			"gateway" => Self::Gateway,
			"server" => Self::Server,
			"dns" => Self::Dns,
			"cloud" => Self::Cloud,
			_ => Self::Device,
		}
	}
}

/// How the node's label was resolved upstream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResolutionSource {
	/// Matched against the user's registered devices.
	KnownDevice,
	/// Guessed from a MAC vendor prefix or hostname pattern.
	VendorPattern,
	/// Not resolved.
	#[default]
	None,
}

impl ResolutionSource {
	/// Parses the wire name, falling back to [`ResolutionSource::None`].
	pub fn parse(raw: &str) -> Self {
		match raw.trim() {
			"known_device" => Self::KnownDevice,
			"vendor_pattern" => Self::VendorPattern,
			_ => Self::None,
		}
	}
}

/// A device or external traffic endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Unique identifier within a [`Graph`].
	pub id: String,
	/// Display label.
	pub label: String,
	/// Importance bucket.
	pub category: Category,
	/// Network role.
	pub node_type: NodeType,
	/// Aggregated traffic volume, never negative.
	pub traffic_value: f64,
	/// Externally supplied ranking score.
	pub importance_score: f64,
	/// CSS color string.
	pub color: String,
	/// Label provenance.
	pub resolution_source: ResolutionSource,
}

/// Aggregated protocol traffic between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Composite key, unique within one ingestion.
	pub id: String,
	/// Id of the sending node.
	pub source: String,
	/// Id of the receiving node.
	pub target: String,
	/// Protocol name, e.g. `TCP`.
	pub protocol: String,
	/// Packet count.
	pub packets: u64,
	/// Byte count.
	pub bytes: u64,
	/// Normalised significance in `[0, 1]`.
	pub strength: f64,
	/// Visual weight, at least 1.
	pub weight: u32,
}

/// Node list in input order plus the edges between those nodes.
///
/// Constructed through [`Graph::new`], which keeps the first node for each id
/// and drops edges whose endpoints are not present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	index: HashMap<String, usize>,
}

impl Graph {
	/// Builds a graph, discarding duplicate node ids and dangling edges.
	pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
		let mut index = HashMap::with_capacity(nodes.len());
		let mut kept = Vec::with_capacity(nodes.len());
		for node in nodes {
			if index.contains_key(&node.id) {
				debug!("duplicate node id {:?}, keeping first", node.id);
				continue;
			}
			index.insert(node.id.clone(), kept.len());
			kept.push(node);
		}

		let edges = edges
			.into_iter()
			.filter(|e| {
				let ok = index.contains_key(&e.source) && index.contains_key(&e.target);
				if !ok {
					debug!("dropping dangling edge {}", e.id);
				}
				ok
			})
			.collect();

		Self {
			nodes: kept,
			edges,
			index,
		}
	}

	/// Nodes in input order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edges in input order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Looks up a node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// True when there are no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Visibility-filtered view of a [`Graph`].
///
/// Every edge endpoint is present in the node set. An empty view is a normal
/// result the caller renders as an empty state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilteredGraph {
	/// Visible nodes in input order.
	pub nodes: Vec<Node>,
	/// Visible edges in input order.
	pub edges: Vec<Edge>,
}

impl FilteredGraph {
	/// Whether a node with this id survived filtering.
	pub fn contains(&self, id: &str) -> bool {
		self.nodes.iter().any(|n| n.id == id)
	}

	/// True when no node survived filtering.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Canvas coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
}

impl Point {
	/// Distance to another point.
	pub fn distance(&self, other: &Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}
