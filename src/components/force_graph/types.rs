use crate::lineage::{GraphSubset, LineageGraph, Shape};

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub color: String,
	pub shape: Shape,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Styled view of `subset`, colored and shaped by node category.
	pub fn from_subset(graph: &LineageGraph, subset: &GraphSubset) -> Self {
		let nodes = subset
			.nodes
			.iter()
			.map(|&i| {
				let node = &graph.nodes()[i];
				let category = graph.category(node);
				GraphNode {
					id: node.id.clone(),
					label: node.display_label().to_string(),
					color: category.color().to_string(),
					shape: category.shape(),
				}
			})
			.collect();
		let links = subset
			.edges
			.iter()
			.map(|&i| {
				let edge = &graph.edges()[i];
				GraphLink {
					source: edge.from.clone(),
					target: edge.to.clone(),
				}
			})
			.collect();
		Self { nodes, links }
	}
}
