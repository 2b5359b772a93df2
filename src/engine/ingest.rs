//! Permissive normalisation of raw `{nodes, edges}` payloads.
//!
//! Nothing here fails: missing or malformed fields are coerced to defaults and
//! records that cannot name an endpoint are skipped.

use std::collections::HashSet;

use log::{debug, warn};
use serde_json::Value;

use super::encode::color_for;
use super::types::{Category, Edge, Graph, Node, NodeType, ResolutionSource};

/// Label used when neither a resolved nor a raw label is present.
pub const UNKNOWN_LABEL: &str = "Unknown";
/// Protocol assumed for edges that do not name one.
pub const DEFAULT_PROTOCOL: &str = "TCP";
/// Strength assumed for edges that do not carry one.
pub const DEFAULT_STRENGTH: f64 = 0.5;

fn json_f64(v: &Value) -> Option<f64> {
	let n = v
		.as_f64()
		.or_else(|| v.as_i64().map(|n| n as f64))
		.or_else(|| v.as_u64().map(|n| n as f64))
		.or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))?;
	n.is_finite().then_some(n)
}

fn field_f64(raw: &Value, keys: &[&str]) -> Option<f64> {
	keys.iter().find_map(|k| raw.get(*k).and_then(json_f64))
}

fn field_str<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a str> {
	keys.iter().find_map(|k| {
		raw.get(*k)
			.and_then(Value::as_str)
			.map(str::trim)
			.filter(|s| !s.is_empty())
	})
}

fn field_count(raw: &Value, keys: &[&str]) -> u64 {
	field_f64(raw, keys).map_or(0, |n| n.max(0.0).floor() as u64)
}

/// Accepts either a plain id or an object that carries one.
fn endpoint(raw: &Value, keys: &[&str]) -> Option<String> {
	keys.iter().find_map(|k| {
		let v = raw.get(*k)?;
		let id = match v {
			Value::String(s) => s.trim().to_string(),
			Value::Number(n) => n.to_string(),
			Value::Object(_) => v.get("id").and_then(|id| match id {
				Value::String(s) => Some(s.trim().to_string()),
				Value::Number(n) => Some(n.to_string()),
				_ => None,
			})?,
			_ => return None,
		};
		(!id.is_empty()).then_some(id)
	})
}

fn raw_id(raw: &Value) -> Option<String> {
	match raw.get("id")? {
		Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

/// Normalises raw node records.
///
/// Records without an id get `node-{index}`, suffixed until unique among all
/// ids in the batch.
pub fn normalize_nodes(raw: &[Value]) -> Vec<Node> {
	let explicit: Vec<Option<String>> = raw.iter().map(raw_id).collect();
	let mut taken: HashSet<String> = explicit.iter().flatten().cloned().collect();

	raw.iter()
		.zip(explicit)
		.enumerate()
		.map(|(i, (r, id))| {
			let id = id.unwrap_or_else(|| {
				let mut candidate = format!("node-{i}");
				let mut suffix = 1;
				while taken.contains(&candidate) {
					candidate = format!("node-{i}-{suffix}");
					suffix += 1;
				}
				debug!("node {i} has no id, using {candidate}");
				taken.insert(candidate.clone());
				candidate
			});

			let category = field_str(r, &["category"])
				.map(Category::parse)
				.unwrap_or_else(|| Category::Other(String::new()));
			let color = field_str(r, &["color"])
				.map(str::to_string)
				.unwrap_or_else(|| color_for(category.as_str()).to_string());

			Node {
				label: field_str(r, &["resolvedLabel", "resolved_label", "label"])
					.unwrap_or(UNKNOWN_LABEL)
					.to_string(),
				node_type: field_str(r, &["type", "nodeType"])
					.map(NodeType::parse)
					.unwrap_or_default(),
				traffic_value: field_f64(r, &["trafficValue", "traffic_value"])
					.unwrap_or(0.0)
					.max(0.0),
				importance_score: field_f64(r, &["importanceScore", "importance_score"])
					.unwrap_or(0.0),
				resolution_source: field_str(r, &["resolutionSource", "resolution_source"])
					.map(ResolutionSource::parse)
					.unwrap_or_default(),
				id,
				category,
				color,
			}
		})
		.collect()
}

/// Normalises raw edge records.
///
/// The edge id combines endpoints and protocol with a running sequence number,
/// so repeated tuples (e.g. both directions of one flow) stay distinct.
pub fn normalize_edges(raw: &[Value]) -> Vec<Edge> {
	let mut edges = Vec::with_capacity(raw.len());
	for (i, r) in raw.iter().enumerate() {
		let (Some(source), Some(target)) = (
			endpoint(r, &["source", "sourceId", "source_id"]),
			endpoint(r, &["target", "targetId", "target_id"]),
		) else {
			debug!("edge {i} has no usable endpoints, skipping");
			continue;
		};
		let protocol = field_str(r, &["protocol"])
			.unwrap_or(DEFAULT_PROTOCOL)
			.to_string();
		let strength = field_f64(r, &["strength"])
			.unwrap_or(DEFAULT_STRENGTH)
			.clamp(0.0, 1.0);
		let weight = field_f64(r, &["weight"])
			.map(|w| w.max(1.0).floor() as u32)
			.unwrap_or_else(|| ((strength * 8.0).floor() as u32).max(1));

		edges.push(Edge {
			id: format!("{source}->{target}:{protocol}#{}", edges.len()),
			packets: field_count(r, &["packets"]),
			bytes: field_count(r, &["bytes"]),
			source,
			target,
			protocol,
			strength,
			weight,
		});
	}
	edges
}

/// Builds a [`Graph`] from a `{nodes, edges}` payload.
///
/// Missing arrays count as empty; a payload that is not an object yields an
/// empty graph.
pub fn ingest(payload: &Value) -> Graph {
	if !payload.is_object() {
		warn!("graph payload is not an object, rendering empty graph");
		return Graph::default();
	}
	let list = move |key: &str| {
		payload
			.get(key)
			.and_then(Value::as_array)
			.map(Vec::as_slice)
			.unwrap_or_default()
	};
	let graph = Graph::new(normalize_nodes(list("nodes")), normalize_edges(list("edges")));
	debug!(
		"ingested {} nodes and {} edges",
		graph.nodes().len(),
		graph.edges().len()
	);
	graph
}

/// Parses payload text and ingests it. Unparsable text yields an empty graph.
pub fn ingest_str(text: &str) -> Graph {
	match serde_json::from_str::<Value>(text) {
		Ok(payload) => ingest(&payload),
		Err(err) => {
			warn!("graph payload is not valid JSON: {err}");
			Graph::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn nodes_get_defaults_and_unique_fallback_ids() {
		let nodes = normalize_nodes(&[
			json!({"id": "node-1", "label": "raw", "resolvedLabel": "Thermostat", "category": "real_device"}),
			json!({"trafficValue": "oops", "importanceScore": "2.5"}),
			json!({"label": "  ", "trafficValue": -4}),
		]);

		assert_eq!(nodes[0].label, "Thermostat");
		assert_eq!(nodes[0].color, color_for("real_device"));

		assert_eq!(nodes[1].id, "node-1-1");
		assert_eq!(nodes[1].label, UNKNOWN_LABEL);
		assert_eq!(nodes[1].traffic_value, 0.0);
		assert_eq!(nodes[1].importance_score, 2.5);
		assert_eq!(nodes[1].node_type, NodeType::Device);
		assert_eq!(nodes[1].resolution_source, ResolutionSource::None);

		assert_eq!(nodes[2].id, "node-2");
		assert_eq!(nodes[2].label, UNKNOWN_LABEL);
		assert_eq!(nodes[2].traffic_value, 0.0);
	}

	#[test]
	fn explicit_color_wins_over_category_default() {
		let nodes = normalize_nodes(&[json!({"id": "a", "category": "low_priority", "color": "#123456"})]);
		assert_eq!(nodes[0].color, "#123456");
		assert_eq!(nodes[0].category, Category::LowPriority);
	}

	#[test]
	fn edges_get_defaults_and_distinct_ids() {
		let edges = normalize_edges(&[
			json!({"source": "a", "target": "b"}),
			json!({"source": "a", "target": "b"}),
			json!({"source": {"id": "b"}, "targetId": "a", "protocol": "UDP", "strength": 0.9, "packets": 12.7, "bytes": -3}),
			json!({"source": "a"}),
		]);

		assert_eq!(edges.len(), 3);
		assert_ne!(edges[0].id, edges[1].id);
		assert_eq!(edges[0].protocol, DEFAULT_PROTOCOL);
		assert_eq!(edges[0].strength, DEFAULT_STRENGTH);
		assert_eq!(edges[0].weight, 4);

		assert_eq!(edges[2].source, "b");
		assert_eq!(edges[2].target, "a");
		assert_eq!(edges[2].weight, 7);
		assert_eq!(edges[2].packets, 12);
		assert_eq!(edges[2].bytes, 0);
	}

	#[test]
	fn weight_never_drops_below_one() {
		let edges = normalize_edges(&[
			json!({"source": "a", "target": "b", "strength": 0.0}),
			json!({"source": "a", "target": "b", "strength": 7}),
			json!({"source": "a", "target": "b", "weight": 0}),
		]);
		assert_eq!(edges[0].weight, 1);
		assert_eq!(edges[1].strength, 1.0);
		assert_eq!(edges[1].weight, 8);
		assert_eq!(edges[2].weight, 1);
	}

	#[test]
	fn malformed_payloads_yield_empty_graphs() {
		assert!(ingest(&json!([1, 2, 3])).is_empty());
		assert!(ingest(&json!({"nodes": "nope"})).is_empty());
		assert!(ingest_str("{not json").is_empty());
	}

	#[test]
	fn ingest_drops_dangling_edges() {
		let graph = ingest(&json!({
			"nodes": [{"id": "a"}, {"id": "b"}],
			"edges": [{"source": "a", "target": "b"}, {"source": "a", "target": "c"}],
		}));
		assert_eq!(graph.nodes().len(), 2);
		assert_eq!(graph.edges().len(), 1);
	}
}
