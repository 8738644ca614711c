//! Measure/column dependency graph behind the lineage view.
//!
//! The node and edge arrays are read once per page and never mutated; every
//! selection derives a [`GraphSubset`] of indices into them.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::table::compare_text;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
	Column,
	/// Anything that is not a column, including a missing `type`.
	#[default]
	#[serde(other)]
	Measure,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Node {
	pub id: String,
	#[serde(default)]
	pub label: String,
	#[serde(rename = "type", default)]
	pub kind: NodeType,
}

impl Node {
	pub fn display_label(&self) -> &str {
		if self.label.is_empty() {
			&self.id
		} else {
			&self.label
		}
	}

	pub fn is_column(&self) -> bool {
		self.kind == NodeType::Column
	}
}

/// Directed dependency: `from` feeds `to`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Edge {
	pub from: String,
	pub to: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
	Parent,
	Final,
	Column,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
	Circle,
	Box,
}

impl Category {
	pub fn color(self) -> &'static str {
		match self {
			Category::Parent => "#f1c83b",
			Category::Final => "#23c4a7",
			Category::Column => "#ADD8E6",
		}
	}

	pub fn shape(self) -> Shape {
		match self {
			Category::Column => Shape::Box,
			_ => Shape::Circle,
		}
	}

	pub fn group_label(self) -> &'static str {
		match self {
			Category::Parent => "Parent Measures",
			Category::Final => "Final Measures",
			Category::Column => "Column Nodes",
		}
	}
}

#[derive(Clone, Debug, Default)]
struct Connections {
	parents: Vec<String>,
	children: Vec<String>,
}

/// Node and edge indices into a [`LineageGraph`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphSubset {
	pub nodes: Vec<usize>,
	pub edges: Vec<usize>,
}

/// One row of the lineage table: a measure with its direct inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
	pub measure: usize,
	pub parents: Vec<usize>,
	pub columns: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionGroup {
	pub category: Category,
	/// `(id, label)` pairs in universe order.
	pub options: Vec<(String, String)>,
}

#[derive(Clone, Debug, Default)]
pub struct LineageGraph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	index: HashMap<String, usize>,
	connections: HashMap<String, Connections>,
}

impl LineageGraph {
	pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
		let index = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();

		let mut connections: HashMap<String, Connections> = HashMap::new();
		for edge in &edges {
			let from = connections.entry(edge.from.clone()).or_default();
			if !from.children.contains(&edge.to) {
				from.children.push(edge.to.clone());
			}
			let to = connections.entry(edge.to.clone()).or_default();
			if !to.parents.contains(&edge.from) {
				to.parents.push(edge.from.clone());
			}
		}

		log::debug!(
			"lineage graph: {} nodes, {} edges",
			nodes.len(),
			edges.len()
		);
		Self {
			nodes,
			edges,
			index,
			connections,
		}
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn parents_of(&self, id: &str) -> &[String] {
		self.connections
			.get(id)
			.map(|c| c.parents.as_slice())
			.unwrap_or_default()
	}

	pub fn children_of(&self, id: &str) -> &[String] {
		self.connections
			.get(id)
			.map(|c| c.children.as_slice())
			.unwrap_or_default()
	}

	pub fn category(&self, node: &Node) -> Category {
		if node.is_column() {
			Category::Column
		} else if !self.children_of(&node.id).is_empty() {
			Category::Parent
		} else {
			Category::Final
		}
	}

	/// `start` plus every ancestor reachable by walking edges backwards.
	pub fn connected_nodes(&self, start: &str) -> HashSet<String> {
		let mut visited = HashSet::new();
		let mut stack = vec![start.to_string()];
		while let Some(id) = stack.pop() {
			if !visited.insert(id.clone()) {
				continue;
			}
			stack.extend(
				self.parents_of(&id)
					.iter()
					.filter(|p| !visited.contains(*p))
					.cloned(),
			);
		}
		visited
	}

	/// Edges with both endpoints in `ids`.
	pub fn connected_edges(&self, ids: &HashSet<String>) -> Vec<usize> {
		self.edges
			.iter()
			.enumerate()
			.filter(|(_, e)| ids.contains(&e.from) && ids.contains(&e.to))
			.map(|(i, _)| i)
			.collect()
	}

	pub fn all(&self) -> GraphSubset {
		GraphSubset {
			nodes: (0..self.nodes.len()).collect(),
			edges: (0..self.edges.len()).collect(),
		}
	}

	/// The ancestor closure of `selected` plus the columns feeding it.
	/// An empty selection yields the whole graph.
	pub fn filter(&self, selected: &str) -> GraphSubset {
		if selected.is_empty() {
			return self.all();
		}
		let mut ids = self.connected_nodes(selected);
		let feeding_columns: Vec<String> = self
			.edges
			.iter()
			.filter(|e| ids.contains(&e.to))
			.filter(|e| self.node(&e.from).is_some_and(Node::is_column))
			.map(|e| e.from.clone())
			.collect();
		ids.extend(feeding_columns);

		GraphSubset {
			nodes: self
				.nodes
				.iter()
				.enumerate()
				.filter(|(_, n)| ids.contains(&n.id))
				.map(|(i, _)| i)
				.collect(),
			edges: self.connected_edges(&ids),
		}
	}

	/// Group the subset's edges by target, splitting sources into measures and
	/// columns. Rows follow the order in which targets first appear.
	pub fn relationships(&self, subset: &GraphSubset) -> Vec<Relationship> {
		let in_subset: HashSet<usize> = subset.nodes.iter().copied().collect();
		let mut rows: Vec<Relationship> = Vec::new();
		let mut row_of: HashMap<usize, usize> = HashMap::new();

		for edge in subset.edges.iter().map(|&i| &self.edges[i]) {
			let (Some(from), Some(to)) = (self.node_index(&edge.from), self.node_index(&edge.to))
			else {
				continue;
			};
			if !in_subset.contains(&from) || !in_subset.contains(&to) || self.nodes[to].is_column() {
				continue;
			}
			let row = *row_of.entry(to).or_insert_with(|| {
				rows.push(Relationship {
					measure: to,
					parents: Vec::new(),
					columns: Vec::new(),
				});
				rows.len() - 1
			});
			let bucket = if self.nodes[from].is_column() {
				&mut rows[row].columns
			} else {
				&mut rows[row].parents
			};
			if !bucket.contains(&from) {
				bucket.push(from);
			}
		}
		rows
	}

	pub fn labels(&self, indices: &[usize]) -> String {
		indices
			.iter()
			.map(|&i| self.nodes[i].display_label())
			.collect::<Vec<_>>()
			.join(", ")
	}

	/// Options for the measure picker, grouped by category. Empty groups are
	/// omitted.
	pub fn select_groups(&self) -> Vec<OptionGroup> {
		[Category::Parent, Category::Final, Category::Column]
			.into_iter()
			.map(|category| OptionGroup {
				category,
				options: self
					.nodes
					.iter()
					.filter(|n| self.category(n) == category)
					.map(|n| (n.id.clone(), n.display_label().to_string()))
					.collect(),
			})
			.filter(|g| !g.options.is_empty())
			.collect()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineageColumn {
	Measure,
	Parents,
	Columns,
}

/// Sort state of the lineage table: re-clicking a header flips direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineageSort {
	pub column: Option<usize>,
	pub ascending: bool,
}

impl LineageSort {
	pub fn click(&mut self, column: usize) {
		self.ascending = !(self.column == Some(column) && self.ascending);
		self.column = Some(column);
	}

	pub fn class_for(&self, column: usize) -> &'static str {
		match (self.column == Some(column), self.ascending) {
			(true, true) => "asc",
			(true, false) => "desc",
			_ => "",
		}
	}
}

impl LineageColumn {
	pub const ALL: [LineageColumn; 3] = [
		LineageColumn::Measure,
		LineageColumn::Parents,
		LineageColumn::Columns,
	];

	pub fn title(self) -> &'static str {
		match self {
			LineageColumn::Measure => "Measure",
			LineageColumn::Parents => "Parent Measures",
			LineageColumn::Columns => "Source Columns",
		}
	}

	pub fn cell(self, graph: &LineageGraph, row: &Relationship) -> String {
		match self {
			LineageColumn::Measure => graph.nodes[row.measure].display_label().to_string(),
			LineageColumn::Parents => graph.labels(&row.parents),
			LineageColumn::Columns => graph.labels(&row.columns),
		}
	}
}

/// Order relationship rows by the text of one lineage table column.
pub fn sort_relationships(graph: &LineageGraph, rows: &mut [Relationship], sort: LineageSort) {
	let Some(column) = sort.column.and_then(|c| LineageColumn::ALL.get(c).copied()) else {
		return;
	};
	rows.sort_by(|a, b| {
		let ord = compare_text(column.cell(graph, a).trim(), column.cell(graph, b).trim());
		if sort.ascending { ord } else { ord.reverse() }
	});
}

#[cfg(test)]
mod tests {
	use super::*;

	fn measure(id: &str) -> Node {
		Node {
			id: id.into(),
			label: id.into(),
			kind: NodeType::Measure,
		}
	}

	fn column(id: &str) -> Node {
		Node {
			id: id.into(),
			label: id.into(),
			kind: NodeType::Column,
		}
	}

	fn edge(from: &str, to: &str) -> Edge {
		Edge {
			from: from.into(),
			to: to.into(),
		}
	}

	fn ids(set: &HashSet<String>) -> Vec<&str> {
		let mut v: Vec<&str> = set.iter().map(String::as_str).collect();
		v.sort();
		v
	}

	/// Sales[Amount] -> Total -> Margin <- Cost <- Sales[Cost]
	fn sample() -> LineageGraph {
		LineageGraph::new(
			vec![
				column("Sales[Amount]"),
				column("Sales[Cost]"),
				measure("Total"),
				measure("Cost"),
				measure("Margin"),
				measure("Orphan"),
			],
			vec![
				edge("Sales[Amount]", "Total"),
				edge("Sales[Cost]", "Cost"),
				edge("Total", "Margin"),
				edge("Cost", "Margin"),
			],
		)
	}

	#[test]
	fn categories_follow_type_and_topology() {
		let g = sample();
		let cat = |id: &str| g.category(g.node(id).unwrap());
		assert_eq!(cat("Sales[Amount]"), Category::Column);
		assert_eq!(cat("Total"), Category::Parent);
		assert_eq!(cat("Margin"), Category::Final);
		assert_eq!(cat("Orphan"), Category::Final);
		assert_eq!(Category::Column.shape(), Shape::Box);
		assert_eq!(Category::Parent.color(), "#f1c83b");
	}

	#[test]
	fn adjacency_is_indexed_both_ways() {
		let g = sample();
		assert_eq!(g.parents_of("Margin"), ["Total", "Cost"]);
		assert_eq!(g.children_of("Total"), ["Margin"]);
		assert!(g.parents_of("Orphan").is_empty());
	}

	#[test]
	fn closure_walks_ancestors_only() {
		let g = sample();
		assert_eq!(
			ids(&g.connected_nodes("Margin")),
			vec!["Cost", "Margin", "Sales[Amount]", "Sales[Cost]", "Total"]
		);
		assert_eq!(ids(&g.connected_nodes("Total")), vec!["Sales[Amount]", "Total"]);
		assert_eq!(ids(&g.connected_nodes("Orphan")), vec!["Orphan"]);
	}

	#[test]
	fn closure_terminates_on_cycles() {
		let g = LineageGraph::new(
			vec![measure("A"), measure("B"), measure("C")],
			vec![edge("A", "B"), edge("B", "C"), edge("C", "A")],
		);
		assert_eq!(ids(&g.connected_nodes("A")), vec!["A", "B", "C"]);
	}

	#[test]
	fn closure_of_unknown_id_is_just_that_id() {
		let g = sample();
		assert_eq!(ids(&g.connected_nodes("nope")), vec!["nope"]);
	}

	#[test]
	fn filter_adds_sibling_columns_and_keeps_inner_edges() {
		let g = LineageGraph::new(
			vec![column("T[a]"), column("T[b]"), measure("X"), measure("Y")],
			vec![edge("T[a]", "X"), edge("X", "Y"), edge("T[b]", "Y")],
		);
		let subset = g.filter("Y");
		assert_eq!(subset.nodes, vec![0, 1, 2, 3]);
		assert_eq!(subset.edges, vec![0, 1, 2]);

		let subset = g.filter("X");
		assert_eq!(subset.nodes, vec![0, 2]);
		assert_eq!(subset.edges, vec![0]);
	}

	#[test]
	fn empty_selection_is_the_whole_universe() {
		let g = sample();
		assert_eq!(g.filter(""), g.all());
		assert_eq!(g.all().nodes.len(), 6);
	}

	#[test]
	fn filtering_never_mutates_the_universe() {
		let g = sample();
		let before = (g.nodes().to_vec(), g.edges().to_vec());
		let _ = g.filter("Margin");
		let _ = g.filter("Total");
		assert_eq!((g.nodes().to_vec(), g.edges().to_vec()), before);
	}

	#[test]
	fn relationships_group_sources_by_target() {
		let g = sample();
		let rows = g.relationships(&g.all());
		let rendered: Vec<(String, String, String)> = rows
			.iter()
			.map(|r| {
				(
					LineageColumn::Measure.cell(&g, r),
					LineageColumn::Parents.cell(&g, r),
					LineageColumn::Columns.cell(&g, r),
				)
			})
			.collect();
		assert_eq!(
			rendered,
			vec![
				("Total".into(), "".into(), "Sales[Amount]".into()),
				("Cost".into(), "".into(), "Sales[Cost]".into()),
				("Margin".into(), "Total, Cost".into(), "".into()),
			]
		);
	}

	#[test]
	fn duplicate_edges_do_not_duplicate_labels() {
		let g = LineageGraph::new(
			vec![measure("A"), measure("B")],
			vec![edge("A", "B"), edge("A", "B")],
		);
		let rows = g.relationships(&g.all());
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].parents, vec![0]);
		assert_eq!(g.connected_edges(&g.connected_nodes("B")), vec![0, 1]);
	}

	#[test]
	fn select_groups_skip_empty_categories() {
		let g = LineageGraph::new(vec![measure("A"), measure("B")], vec![edge("A", "B")]);
		let groups = g.select_groups();
		assert_eq!(groups.len(), 2);
		assert_eq!(groups[0].category.group_label(), "Parent Measures");
		assert_eq!(groups[0].options, vec![("A".to_string(), "A".to_string())]);
		assert_eq!(groups[1].category, Category::Final);
	}

	#[test]
	fn lineage_sort_toggles_on_repeat_click() {
		let g = sample();
		let mut rows = g.relationships(&g.all());
		let mut sort = LineageSort::default();
		sort.click(0);
		assert_eq!(sort.class_for(0), "asc");
		sort_relationships(&g, &mut rows, sort);
		let names: Vec<String> = rows.iter().map(|r| LineageColumn::Measure.cell(&g, r)).collect();
		assert_eq!(names, vec!["Cost", "Margin", "Total"]);

		sort.click(0);
		assert_eq!(sort.class_for(0), "desc");
		sort_relationships(&g, &mut rows, sort);
		let names: Vec<String> = rows.iter().map(|r| LineageColumn::Measure.cell(&g, r)).collect();
		assert_eq!(names, vec!["Total", "Margin", "Cost"]);

		sort.click(1);
		assert_eq!(sort.class_for(1), "asc");
		assert_eq!(sort.class_for(0), "");
	}

	#[test]
	fn nodes_deserialize_from_page_json() {
		let nodes: Vec<Node> = serde_json::from_str(
			r#"[{"id": "T[a]", "label": "T[a]", "type": "column"},
			    {"id": "M", "label": "M", "dax": "SUM(T[a])"},
			    {"id": "N", "type": "measure"},
			    {"id": "C", "type": "calculated"}]"#,
		)
		.unwrap();
		assert!(nodes[0].is_column());
		assert_eq!(nodes[1].kind, NodeType::Measure);
		assert_eq!(nodes[2].display_label(), "N");
		assert_eq!(nodes[3].kind, NodeType::Measure);

		let edges: Vec<Edge> =
			serde_json::from_str(r#"[{"id": 4, "from": "T[a]", "to": "M"}, {"from": "M", "to": "N"}]"#)
				.unwrap();
		assert_eq!(edges[0], edge("T[a]", "M"));
		assert_eq!(edges.len(), 2);
	}
}
