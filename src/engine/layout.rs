//! Deterministic concentric ring placement.
//!
//! The monitored device sits at the canvas center. Other local devices form
//! the inner ring, important external endpoints the middle ring and everything
//! else the outer ring. Within a ring nodes are spread at equal angles in
//! input order, so the same input always yields the same coordinates.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::types::{Category, FilteredGraph, Node, Point, ResolutionSource};

/// Radii of the three rings, strictly increasing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingRadii {
	inner: f64,
	middle: f64,
	outer: f64,
}

impl RingRadii {
	/// Returns `None` unless `0 <= inner < middle < outer` and all are finite.
	pub fn new(inner: f64, middle: f64, outer: f64) -> Option<Self> {
		let ok = [inner, middle, outer].iter().all(|r| r.is_finite())
			&& 0.0 <= inner
			&& inner < middle
			&& middle < outer;
		ok.then_some(Self {
			inner,
			middle,
			outer,
		})
	}

	/// Radii scaled to fit a `width` x `height` canvas.
	pub fn for_extent(width: f64, height: f64) -> Self {
		let half = (width.min(height) / 2.0).max(1.0);
		Self {
			inner: half * 0.3,
			middle: half * 0.6,
			outer: half * 0.9,
		}
	}

	/// Ring for the other local devices.
	pub fn inner(&self) -> f64 {
		self.inner
	}

	/// Ring for important external endpoints.
	pub fn middle(&self) -> f64 {
		self.middle
	}

	/// Ring for everything else.
	pub fn outer(&self) -> f64 {
		self.outer
	}
}

/// Coordinates for every node of a laid-out graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutResult {
	/// Node id to position.
	pub positions: HashMap<String, Point>,
	/// Center the rings are drawn around.
	pub center: Point,
	/// Radii the rings were drawn at.
	pub radii: Option<RingRadii>,
}

impl LayoutResult {
	/// Position of a node, if it was laid out.
	pub fn get(&self, id: &str) -> Option<Point> {
		self.positions.get(id).copied()
	}

	/// Number of positioned nodes.
	pub fn len(&self) -> usize {
		self.positions.len()
	}

	/// True when nothing was positioned.
	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}
}

/// Ring layout for a fixed canvas extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingLayout {
	center: Point,
	radii: RingRadii,
}

impl RingLayout {
	/// Layout centered on a `width` x `height` canvas with proportional radii.
	pub fn new(width: f64, height: f64) -> Self {
		Self::with_radii(width, height, RingRadii::for_extent(width, height))
	}

	/// Layout centered on a `width` x `height` canvas with explicit radii.
	pub fn with_radii(width: f64, height: f64, radii: RingRadii) -> Self {
		Self {
			center: Point {
				x: width / 2.0,
				y: height / 2.0,
			},
			radii,
		}
	}

	/// Center of the canvas.
	pub fn center(&self) -> Point {
		self.center
	}

	/// Ring radii in use.
	pub fn radii(&self) -> RingRadii {
		self.radii
	}

	/// Places every node of `graph`.
	pub fn layout(&self, graph: &FilteredGraph) -> LayoutResult {
		let mut devices = Vec::new();
		let mut important = Vec::new();
		let mut outer = Vec::new();
		for node in &graph.nodes {
			match node.category {
				Category::RealDevice => devices.push(node),
				Category::ImportantExternal => important.push(node),
				_ => outer.push(node),
			}
		}

		let mut positions = HashMap::with_capacity(graph.nodes.len());

		let anchor = devices
			.iter()
			.position(|n| n.resolution_source == ResolutionSource::KnownDevice)
			.or((!devices.is_empty()).then_some(0));
		if let Some(i) = anchor {
			let node = devices.remove(i);
			positions.insert(node.id.clone(), self.center);
		}

		self.place_ring(&devices, self.radii.inner, &mut positions);
		self.place_ring(&important, self.radii.middle, &mut positions);
		self.place_ring(&outer, self.radii.outer, &mut positions);

		LayoutResult {
			positions,
			center: self.center,
			radii: Some(self.radii),
		}
	}

	fn place_ring(&self, nodes: &[&Node], radius: f64, positions: &mut HashMap<String, Point>) {
		let n = nodes.len();
		if n == 0 {
			return;
		}
		for (i, node) in nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / n as f64;
			positions.insert(
				node.id.clone(),
				Point {
					x: self.center.x + radius * angle.cos(),
					y: self.center.y + radius * angle.sin(),
				},
			);
		}
	}
}
