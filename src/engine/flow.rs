//! Turns traffic links into an acyclic list a layered flow diagram can consume.
//!
//! Self-loops are dropped outright. Cycles are broken coarsely: a DFS marks
//! every node on the chain that closes a cycle, and any link between two marked
//! nodes is removed. This may drop links that are not on a cycle themselves,
//! but the result is always acyclic.

use std::collections::HashMap;

use log::{debug, warn};

use super::types::{Edge, FilteredGraph};

/// Link between two node ids with a flow magnitude.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowLink {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Flow magnitude.
	pub value: f64,
}

impl FlowLink {
	/// Flow for an edge, sized by bytes, then packets, then visual weight.
	pub fn from_edge(edge: &Edge) -> Self {
		let value = if edge.bytes > 0 {
			edge.bytes as f64
		} else if edge.packets > 0 {
			edge.packets as f64
		} else {
			edge.weight as f64
		};
		Self {
			source: edge.source.clone(),
			target: edge.target.clone(),
			value,
		}
	}
}

/// Link expressed in dense node indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexedLink {
	/// Index of the source in [`FlowDiagram::nodes`].
	pub source: usize,
	/// Index of the target in [`FlowDiagram::nodes`].
	pub target: usize,
	/// Flow magnitude.
	pub value: f64,
}

/// Node ids plus an acyclic link list over their indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowDiagram {
	/// Node ids; a link's indices point into this list.
	pub nodes: Vec<String>,
	/// Acyclic links without self-loops.
	pub links: Vec<IndexedLink>,
}

impl FlowDiagram {
	/// No link survived, so there is no flow to render.
	pub fn is_empty(&self) -> bool {
		self.links.is_empty()
	}

	/// Links translated back to node ids.
	pub fn named_links(&self) -> Vec<FlowLink> {
		self.links
			.iter()
			.map(|l| FlowLink {
				source: self.nodes[l.source].clone(),
				target: self.nodes[l.target].clone(),
				value: l.value,
			})
			.collect()
	}
}

/// Linearises the edges of a filtered graph.
pub fn linearize(graph: &FilteredGraph) -> FlowDiagram {
	let links: Vec<FlowLink> = graph.edges.iter().map(FlowLink::from_edge).collect();
	linearize_links(graph.nodes.iter().map(|n| n.id.as_str()), &links)
}

/// Linearises `links` over the given node ids.
///
/// Links naming an unknown node are skipped with a warning.
pub fn linearize_links<'a>(
	node_ids: impl IntoIterator<Item = &'a str>,
	links: &[FlowLink],
) -> FlowDiagram {
	let mut nodes = Vec::new();
	let mut index: HashMap<&str, usize> = HashMap::new();
	for id in node_ids {
		if !index.contains_key(id) {
			index.insert(id, nodes.len());
			nodes.push(id.to_string());
		}
	}

	let mut indexed = Vec::with_capacity(links.len());
	for link in links {
		let (Some(&source), Some(&target)) = (
			index.get(link.source.as_str()),
			index.get(link.target.as_str()),
		) else {
			warn!(
				"flow link {} -> {} references an unknown node, skipping",
				link.source, link.target
			);
			continue;
		};
		if source == target {
			debug!("dropping self-loop on {}", link.source);
			continue;
		}
		indexed.push(IndexedLink {
			source,
			target,
			value: link.value,
		});
	}

	let in_cycle = cycle_nodes(nodes.len(), &indexed);
	let before = indexed.len();
	indexed.retain(|l| !(in_cycle[l.source] && in_cycle[l.target]));
	if indexed.len() < before {
		debug!("removed {} links to break cycles", before - indexed.len());
	}

	FlowDiagram {
		nodes,
		links: indexed,
	}
}

/// Marks nodes lying on a DFS chain that closed a cycle.
///
/// Links with an index outside `0..n` are ignored.
pub fn cycle_nodes(n: usize, links: &[IndexedLink]) -> Vec<bool> {
	let mut adjacency = vec![Vec::new(); n];
	for l in links {
		if l.source < n && l.target < n {
			adjacency[l.source].push(l.target);
		}
	}

	let mut visited = vec![false; n];
	let mut on_stack = vec![false; n];
	let mut in_cycle = vec![false; n];
	// (node, next child to visit)
	let mut chain: Vec<(usize, usize)> = Vec::new();

	for root in 0..n {
		if visited[root] {
			continue;
		}
		visited[root] = true;
		on_stack[root] = true;
		chain.push((root, 0));

		while let Some(top) = chain.last_mut() {
			let node = top.0;
			let Some(&child) = adjacency[node].get(top.1) else {
				on_stack[node] = false;
				chain.pop();
				continue;
			};
			top.1 += 1;
			if on_stack[child] {
				for &(member, _) in &chain {
					in_cycle[member] = true;
				}
			} else if !visited[child] {
				visited[child] = true;
				on_stack[child] = true;
				chain.push((child, 0));
			}
		}
	}
	in_cycle
}

/// Whether the links contain no directed cycle.
pub fn is_acyclic(n: usize, links: &[IndexedLink]) -> bool {
	!cycle_nodes(n, links).contains(&true)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn link(source: &str, target: &str, value: f64) -> FlowLink {
		FlowLink {
			source: source.into(),
			target: target.into(),
			value,
		}
	}

	fn pairs(diagram: &FlowDiagram) -> Vec<(String, String)> {
		diagram
			.named_links()
			.into_iter()
			.map(|l| (l.source, l.target))
			.collect()
	}

	#[test]
	fn three_cycle_is_removed_entirely() {
		let diagram = linearize_links(
			["X", "Y", "Z"],
			&[link("X", "Y", 10.0), link("Y", "Z", 5.0), link("Z", "X", 3.0)],
		);
		assert!(diagram.is_empty());
	}

	#[test]
	fn acyclic_links_pass_through_in_order() {
		let links = [link("a", "b", 1.0), link("b", "c", 2.0), link("a", "c", 3.0)];
		let diagram = linearize_links(["a", "b", "c"], &links);
		assert_eq!(diagram.named_links(), links);
	}

	#[test]
	fn self_loops_and_unknown_endpoints_are_dropped() {
		let diagram = linearize_links(
			["a", "b"],
			&[link("a", "a", 1.0), link("a", "ghost", 1.0), link("a", "b", 4.0)],
		);
		assert_eq!(pairs(&diagram), vec![("a".to_string(), "b".to_string())]);
	}

	#[test]
	fn link_leaving_a_cycle_to_an_unmarked_node_is_kept() {
		// a -> b -> a is the cycle; c hangs off it and keeps its inbound link.
		let diagram = linearize_links(
			["a", "b", "c"],
			&[link("a", "b", 1.0), link("b", "a", 1.0), link("b", "c", 1.0)],
		);
		assert_eq!(pairs(&diagram), vec![("b".to_string(), "c".to_string())]);
	}

	#[test]
	fn link_into_a_cycle_from_the_dfs_root_is_dropped() {
		// r is on the chain that closes a -> b -> a, so r -> a goes too.
		let diagram = linearize_links(
			["r", "a", "b"],
			&[link("r", "a", 1.0), link("a", "b", 1.0), link("b", "a", 1.0)],
		);
		assert!(diagram.is_empty());
	}

	#[test]
	fn bridge_between_two_cycles_is_dropped() {
		// b -> c lies on no cycle but joins two marked nodes.
		let diagram = linearize_links(
			["a", "b", "c", "d"],
			&[
				link("a", "b", 1.0),
				link("b", "a", 1.0),
				link("b", "c", 1.0),
				link("c", "d", 1.0),
				link("d", "c", 1.0),
			],
		);
		assert!(diagram.is_empty());
	}

	#[test]
	fn output_is_always_acyclic() {
		let ids = ["a", "b", "c", "d", "e", "f"];
		let mut links = Vec::new();
		for (i, s) in ids.iter().enumerate() {
			for (j, t) in ids.iter().enumerate() {
				if (i * 7 + j * 3) % 4 == 0 {
					links.push(link(s, t, (i + j) as f64));
				}
			}
		}
		let diagram = linearize_links(ids, &links);
		assert!(is_acyclic(diagram.nodes.len(), &diagram.links));
		for l in &diagram.links {
			assert_ne!(l.source, l.target);
		}
	}

	#[test]
	fn cycle_detection_on_raw_links() {
		let chain = [
			IndexedLink {
				source: 0,
				target: 1,
				value: 1.0,
			},
			IndexedLink {
				source: 1,
				target: 2,
				value: 1.0,
			},
		];
		assert!(is_acyclic(3, &chain));

		let mut looped = chain.to_vec();
		looped.push(IndexedLink {
			source: 2,
			target: 1,
			value: 1.0,
		});
		assert_eq!(cycle_nodes(3, &looped), [true, true, true]);
	}

	#[test]
	fn edge_value_prefers_bytes_then_packets_then_weight() {
		let mut edge = Edge {
			id: "e".into(),
			source: "a".into(),
			target: "b".into(),
			protocol: "TCP".into(),
			packets: 3,
			bytes: 900,
			strength: 0.5,
			weight: 4,
		};
		assert_eq!(FlowLink::from_edge(&edge).value, 900.0);
		edge.bytes = 0;
		assert_eq!(FlowLink::from_edge(&edge).value, 3.0);
		edge.packets = 0;
		assert_eq!(FlowLink::from_edge(&edge).value, 4.0);
	}
}
