//! Network flow graph engine.
//!
//! Raw payload → [`ingest`] → [`filter_graph`] → [`RingLayout::layout`] or
//! [`linearize`] → visual lookups in [`encode`]. Every stage is a pure function
//! of its inputs.

pub mod encode;
pub mod filter;
pub mod flow;
pub mod ingest;
pub mod layout;
pub mod types;

pub use encode::{
	DIMMED_OPACITY, MIN_VISIBLE_SIZE, NEUTRAL_COLOR, Selection, color_for, link_width_for, opacity_for,
	size_for,
};
pub use filter::{FilterConfig, filter_graph};
pub use flow::{FlowDiagram, FlowLink, IndexedLink, cycle_nodes, is_acyclic, linearize, linearize_links};
pub use ingest::{ingest, ingest_str, normalize_edges, normalize_nodes};
pub use layout::{LayoutResult, RingLayout, RingRadii};
pub use types::{Category, Edge, FilteredGraph, Graph, Node, NodeType, Point, ResolutionSource};
