use std::collections::HashMap;

use log::info;

use crate::engine::{
	FilterConfig, FilteredGraph, Graph, LayoutResult, RingLayout, Selection, filter_graph,
	opacity_for, size_for,
};

pub const BASE_NODE_SIZE: f64 = 6.0;
pub const HIT_SLOP: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub selection: Selection,
	pub highlight_t: f64,
	pub prev_selection: Option<Selection>,
	delay_t: f64,
}

pub struct TopologyState {
	pub graph: FilteredGraph,
	pub layout: LayoutResult,
	radii: HashMap<String, f64>,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

impl TopologyState {
	pub fn new(data: &Graph, config: &FilterConfig, width: f64, height: f64) -> Self {
		let graph = filter_graph(data, config);
		let layout = RingLayout::new(width, height).layout(&graph);
		info!(
			"topology ready: {} of {} nodes visible",
			graph.nodes.len(),
			data.nodes().len()
		);

		let radii = node_radii(&graph);

		Self {
			graph,
			layout,
			radii,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
		}
	}

	/// Re-filters and re-lays out after a data refresh or a filter toggle.
	pub fn reload(&mut self, data: &Graph, config: &FilterConfig) {
		self.graph = filter_graph(data, config);
		self.radii = node_radii(&self.graph);
		self.relayout();
		let hovered = self.hover.selection.node().map(str::to_string);
		match hovered {
			Some(id) if self.graph.contains(&id) => {
				self.hover.selection = Selection::new(&self.graph, Some(&id));
			}
			_ => {
				self.hover = HoverState::default();
			}
		}
	}

	fn relayout(&mut self) {
		self.layout = RingLayout::new(self.width, self.height).layout(&self.graph);
	}

	/// Drawn radius of a visible node, `BASE_NODE_SIZE` for unknown ids.
	pub fn node_radius(&self, id: &str) -> f64 {
		self.radii.get(id).copied().unwrap_or(BASE_NODE_SIZE)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		for node in &self.graph.nodes {
			let Some(p) = self.layout.get(&node.id) else {
				continue;
			};
			let (dx, dy) = (p.x - gx, p.y - gy);
			// hit radius is world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < self.node_radius(&node.id) + HIT_SLOP {
				found = Some(node.id.clone());
			}
		}
		found
	}

	pub fn set_hover(&mut self, node: Option<String>) {
		if self.hover.selection.node() == node.as_deref() {
			return;
		}
		let was_hovering = self.hover.selection.node().is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_selection = Some(std::mem::take(&mut self.hover.selection));
		} else {
			self.hover.prev_selection = None;
		}

		if node.is_some() && !was_hovering {
			self.hover.delay_t = 0.0;
		}
		self.hover.selection = Selection::new(&self.graph, node.as_deref());
	}

	/// Selection currently driving the highlight, including one fading out.
	pub fn active_selection(&self) -> Option<&Selection> {
		if self.hover.selection.node().is_some() {
			Some(&self.hover.selection)
		} else {
			self.hover.prev_selection.as_ref()
		}
	}

	/// Eased node opacity: 1.0 with no highlight, `opacity_for` at full highlight.
	pub fn node_alpha(&self, id: &str, t: f64) -> f64 {
		match self.active_selection() {
			Some(selection) => 1.0 + (opacity_for(selection, id) - 1.0) * t,
			None => 1.0,
		}
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;

		let hovering = self.hover.selection.node().is_some();
		let (target, delay, speed) = if hovering {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if hovering {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_selection = None;
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.relayout();
	}
}

fn node_radii(graph: &FilteredGraph) -> HashMap<String, f64> {
	graph
		.nodes
		.iter()
		.map(|n| (n.id.clone(), size_for(&n.category, BASE_NODE_SIZE)))
		.collect()
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::engine::{Category, DIMMED_OPACITY, ingest};

	fn data() -> Graph {
		ingest(&json!({
			"nodes": [
				{"id": "hub", "category": "real_device"},
				{"id": "cdn", "category": "important_external"},
				{"id": "ads", "category": "secondary_external"},
			],
			"edges": [{"source": "hub", "target": "cdn", "strength": 0.9}],
		}))
	}

	#[test]
	fn hit_test_finds_the_anchor_at_center() {
		let state = TopologyState::new(&data(), &FilterConfig::default(), 400.0, 400.0);
		assert_eq!(state.node_at_position(201.0, 199.0).as_deref(), Some("hub"));
		assert_eq!(state.node_at_position(5.0, 5.0), None);
	}

	#[test]
	fn hover_dims_unconnected_nodes_once_highlight_settles() {
		let mut state = TopologyState::new(&data(), &FilterConfig::default(), 400.0, 400.0);
		state.set_hover(Some("hub".into()));
		assert!((state.node_alpha("ads", 1.0) - DIMMED_OPACITY).abs() < 1e-12);
		assert_eq!(state.node_alpha("cdn", 1.0), 1.0);
		assert_eq!(state.node_alpha("ads", 0.0), 1.0);

		state.set_hover(None);
		assert!(state.active_selection().is_some());
	}

	#[test]
	fn node_radii_follow_category_and_reload() {
		let mut state = TopologyState::new(&data(), &FilterConfig::default(), 400.0, 400.0);
		assert_eq!(state.node_radius("hub"), size_for(&Category::RealDevice, BASE_NODE_SIZE));
		assert_eq!(
			state.node_radius("cdn"),
			size_for(&Category::ImportantExternal, BASE_NODE_SIZE)
		);
		assert_eq!(state.node_radius("ghost"), BASE_NODE_SIZE);

		let config = FilterConfig {
			show_external_nodes: false,
			..FilterConfig::default()
		};
		state.reload(&data(), &config);
		assert_eq!(state.node_radius("cdn"), BASE_NODE_SIZE);
	}

	#[test]
	fn reload_clears_hover_on_hidden_node() {
		let mut state = TopologyState::new(&data(), &FilterConfig::default(), 400.0, 400.0);
		state.set_hover(Some("cdn".into()));
		let config = FilterConfig {
			show_external_nodes: false,
			..FilterConfig::default()
		};
		state.reload(&data(), &config);
		assert!(state.active_selection().is_none());
		assert_eq!(state.layout.len(), 1);
	}
}
