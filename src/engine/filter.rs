//! Category visibility and strength threshold filtering.

use serde::Deserialize;

use super::types::{Category, FilteredGraph, Graph, Node};

/// User-controlled visibility toggles.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
	/// Show important and secondary external endpoints.
	pub show_external_nodes: bool,
	/// Show low-priority endpoints.
	pub show_low_priority_nodes: bool,
	/// Minimum edge strength, in `[0, 1]`.
	pub strength_threshold: f64,
}

impl Default for FilterConfig {
	fn default() -> Self {
		Self {
			show_external_nodes: true,
			show_low_priority_nodes: false,
			strength_threshold: 0.0,
		}
	}
}

impl FilterConfig {
	/// Threshold clamped to `[0, 1]`, with NaN treated as 0.
	pub fn threshold(&self) -> f64 {
		if self.strength_threshold.is_nan() {
			0.0
		} else {
			self.strength_threshold.clamp(0.0, 1.0)
		}
	}

	/// Whether a node passes the category toggles.
	///
	/// Real devices are always visible; unrecognised categories are kept.
	pub fn is_visible(&self, node: &Node) -> bool {
		match &node.category {
			Category::RealDevice => true,
			Category::LowPriority => self.show_low_priority_nodes,
			c if c.is_external() => self.show_external_nodes,
			_ => true,
		}
	}
}

/// Applies `config` to `graph`, returning a new view.
///
/// An edge survives when both endpoints are visible and its strength reaches
/// the threshold, checked in that order.
pub fn filter_graph(graph: &Graph, config: &FilterConfig) -> FilteredGraph {
	let threshold = config.threshold();
	let visible = |id: &str| graph.node(id).is_some_and(|n| config.is_visible(n));

	FilteredGraph {
		nodes: graph
			.nodes()
			.iter()
			.filter(|n| config.is_visible(n))
			.cloned()
			.collect(),
		edges: graph
			.edges()
			.iter()
			.filter(|e| visible(&e.source) && visible(&e.target) && e.strength >= threshold)
			.cloned()
			.collect(),
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::engine::ingest::ingest;

	fn sample() -> Graph {
		ingest(&json!({
			"nodes": [
				{"id": "hub", "category": "real_device"},
				{"id": "cdn", "category": "important_external"},
				{"id": "ads", "category": "secondary_external"},
				{"id": "ntp", "category": "low_priority"},
				{"id": "odd", "category": "experimental"},
			],
			"edges": [
				{"source": "hub", "target": "cdn", "strength": 0.9},
				{"source": "hub", "target": "ads", "strength": 0.3},
				{"source": "hub", "target": "ntp", "strength": 0.8},
				{"source": "odd", "target": "hub", "strength": 0.5},
			],
		}))
	}

	fn ids(filtered: &FilteredGraph) -> Vec<&str> {
		filtered.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn real_devices_survive_every_toggle() {
		let graph = sample();
		for ext in [false, true] {
			for low in [false, true] {
				let config = FilterConfig {
					show_external_nodes: ext,
					show_low_priority_nodes: low,
					strength_threshold: 1.0,
				};
				assert!(filter_graph(&graph, &config).contains("hub"));
			}
		}
	}

	#[test]
	fn toggles_hide_categories_and_their_edges() {
		let graph = sample();
		let hidden = filter_graph(
			&graph,
			&FilterConfig {
				show_external_nodes: false,
				show_low_priority_nodes: false,
				strength_threshold: 0.0,
			},
		);
		assert_eq!(ids(&hidden), ["hub", "odd"]);
		assert_eq!(hidden.edges.len(), 1);
		assert_eq!(hidden.edges[0].source, "odd");

		let shown = filter_graph(
			&graph,
			&FilterConfig {
				show_external_nodes: true,
				show_low_priority_nodes: true,
				strength_threshold: 0.0,
			},
		);
		assert_eq!(ids(&shown), ["hub", "cdn", "ads", "ntp", "odd"]);
		assert_eq!(shown.edges.len(), 4);
	}

	#[test]
	fn threshold_is_inclusive() {
		let graph = sample();
		let config = FilterConfig {
			strength_threshold: 0.5,
			..FilterConfig::default()
		};
		let filtered = filter_graph(&graph, &config);
		let strengths: Vec<f64> = filtered.edges.iter().map(|e| e.strength).collect();
		assert_eq!(strengths, [0.9, 0.5]);
	}

	#[test]
	fn out_of_range_thresholds_are_clamped() {
		let nan = FilterConfig {
			strength_threshold: f64::NAN,
			..FilterConfig::default()
		};
		assert_eq!(nan.threshold(), 0.0);
		let big = FilterConfig {
			strength_threshold: 3.0,
			..FilterConfig::default()
		};
		assert_eq!(big.threshold(), 1.0);
	}

	#[test]
	fn every_edge_endpoint_is_visible() {
		let graph = sample();
		let filtered = filter_graph(&graph, &FilterConfig::default());
		for edge in &filtered.edges {
			assert!(filtered.contains(&edge.source));
			assert!(filtered.contains(&edge.target));
		}
	}

	#[test]
	fn config_reads_camel_case_with_defaults() {
		let config: FilterConfig =
			serde_json::from_value(json!({"showLowPriorityNodes": true})).unwrap();
		assert!(config.show_external_nodes);
		assert!(config.show_low_priority_nodes);
		assert_eq!(config.strength_threshold, 0.0);
	}
}
