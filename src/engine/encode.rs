//! Stateless lookups from category, protocol and selection state to visual attributes.

use std::collections::HashSet;

use super::types::{Category, FilteredGraph};

/// Smallest radius a de-emphasised node shrinks to.
pub const MIN_VISIBLE_SIZE: f64 = 4.0;
/// Fallback for keys missing from the color table.
pub const NEUTRAL_COLOR: &str = "#9ca3af";
/// Opacity of nodes outside the focused neighbourhood.
pub const DIMMED_OPACITY: f64 = 0.2;

const COLOR_TABLE: &[(&str, &str)] = &[
	("real_device", "#22c55e"),
	("important_external", "#f97316"),
	("secondary_external", "#3b82f6"),
	("low_priority", "#6b7280"),
	("TCP", "#1f77b4"),
	("UDP", "#ff7f0e"),
	("HTTP", "#2ca02c"),
	("HTTPS", "#17becf"),
	("TLS", "#9467bd"),
	("DNS", "#e377c2"),
	("MQTT", "#bcbd22"),
	("ICMP", "#d62728"),
	("NTP", "#8c564b"),
];

/// Node radius for a category around a base size.
pub fn size_for(category: &Category, base: f64) -> f64 {
	match category {
		Category::RealDevice => base + 8.0,
		Category::ImportantExternal => base + 4.0,
		Category::SecondaryExternal => base,
		_ => (base - 2.0).max(MIN_VISIBLE_SIZE),
	}
}

/// Color for a category or protocol name.
///
/// Tries the key as given, then upper-cased, then lower-cased.
pub fn color_for(key: &str) -> &'static str {
	lookup(key)
		.or_else(|| lookup(&key.to_uppercase()))
		.or_else(|| lookup(&key.to_lowercase()))
		.unwrap_or(NEUTRAL_COLOR)
}

fn lookup(key: &str) -> Option<&'static str> {
	COLOR_TABLE
		.iter()
		.find(|(k, _)| *k == key)
		.map(|(_, color)| *color)
}

/// Stroke width for a link of the given weight.
pub fn link_width_for(weight: u32) -> f64 {
	0.5 + 0.25 * weight.max(1) as f64
}

/// Focused node and its direct neighbours.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
	node: Option<String>,
	neighbors: HashSet<String>,
}

impl Selection {
	/// Focuses `selected` within `graph`. Neighbours are taken in both directions.
	pub fn new(graph: &FilteredGraph, selected: Option<&str>) -> Self {
		let Some(id) = selected else {
			return Self::default();
		};
		let neighbors = graph
			.edges
			.iter()
			.filter_map(|e| {
				if e.source == id {
					Some(e.target.clone())
				} else if e.target == id {
					Some(e.source.clone())
				} else {
					None
				}
			})
			.collect();
		Self {
			node: Some(id.to_string()),
			neighbors,
		}
	}

	/// The focused node, if any.
	pub fn node(&self) -> Option<&str> {
		self.node.as_deref()
	}

	/// Whether `id` is the focused node or adjacent to it.
	pub fn is_highlighted(&self, id: &str) -> bool {
		self.node.as_deref() == Some(id) || self.neighbors.contains(id)
	}
}

/// Full opacity with no selection or inside the focused neighbourhood, dimmed otherwise.
pub fn opacity_for(selection: &Selection, id: &str) -> f64 {
	if selection.node.is_none() || selection.is_highlighted(id) {
		1.0
	} else {
		DIMMED_OPACITY
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::types::Edge;

	#[test]
	fn sizes_follow_category_emphasis() {
		assert_eq!(size_for(&Category::RealDevice, 6.0), 14.0);
		assert_eq!(size_for(&Category::ImportantExternal, 6.0), 10.0);
		assert_eq!(size_for(&Category::SecondaryExternal, 6.0), 6.0);
		assert_eq!(size_for(&Category::LowPriority, 10.0), 8.0);
		assert_eq!(size_for(&Category::LowPriority, 5.0), MIN_VISIBLE_SIZE);
		assert_eq!(size_for(&Category::Other("x".into()), 3.0), MIN_VISIBLE_SIZE);
	}

	#[test]
	fn color_lookup_falls_back_through_case_variants() {
		assert_eq!(color_for("TCP"), "#1f77b4");
		assert_eq!(color_for("tcp"), "#1f77b4");
		assert_eq!(color_for("Real_Device"), "#22c55e");
		assert_eq!(color_for("Https"), "#17becf");
		assert_eq!(color_for("gopher"), NEUTRAL_COLOR);
	}

	#[test]
	fn selection_dims_everything_outside_neighbourhood() {
		let edge = |s: &str, t: &str| Edge {
			id: format!("{s}{t}"),
			source: s.into(),
			target: t.into(),
			protocol: "TCP".into(),
			packets: 1,
			bytes: 1,
			strength: 1.0,
			weight: 8,
		};
		let graph = FilteredGraph {
			nodes: Vec::new(),
			edges: vec![edge("a", "b"), edge("c", "a"), edge("c", "d")],
		};

		let none = Selection::new(&graph, None);
		assert_eq!(opacity_for(&none, "d"), 1.0);

		let focused = Selection::new(&graph, Some("a"));
		assert_eq!(opacity_for(&focused, "a"), 1.0);
		assert_eq!(opacity_for(&focused, "b"), 1.0);
		assert_eq!(opacity_for(&focused, "c"), 1.0);
		assert_eq!(opacity_for(&focused, "d"), DIMMED_OPACITY);
	}

	#[test]
	fn link_width_grows_with_weight() {
		assert!(link_width_for(8) > link_width_for(1));
		assert_eq!(link_width_for(0), link_width_for(1));
	}
}
