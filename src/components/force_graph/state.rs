use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::GraphData;
use crate::lineage::Shape;

pub const NODE_RADIUS: f64 = 7.0;
pub const HIT_RADIUS: f64 = 12.0;
/// Pointer travel (screen px) below which a press counts as a click.
pub const CLICK_SLOP: f64 = 3.0;

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: String,
	pub shape: Shape,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
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
	pub node: Option<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	/// Nodes emphasized by the current selection; everything else is dimmed.
	pub selection: HashSet<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let ring = 100.0 + 4.0 * data.nodes.len() as f64;

		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let (x, y) = ((ring * angle.cos()) as f32, (ring * angle.sin()) as f32);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: node.color.clone(),
					shape: node.shape,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		Self {
			graph,
			id_to_idx,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selection: HashSet::new(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// world-space, scales with zoom like the nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	/// Replace the emphasized node set; unknown ids are ignored.
	pub fn set_selection(&mut self, ids: &[String]) {
		self.selection = ids
			.iter()
			.filter_map(|id| self.id_to_idx.get(id).copied())
			.collect();
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the old node around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
		} else {
			self.hover.prev_node = None;
		}
		self.hover.node = node;
		if node.is_some() && !was_hovering {
			self.hover.delay_t = 0.0;
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.selection.contains(&idx) || self.is_hovered(idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		!self.selection.is_empty() || self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let engaged = self.hover.node.is_some() || !self.selection.is_empty();
		let (target, delay, speed) = if engaged {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if engaged {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn center_view(&mut self) {
		self.transform.x = self.width / 2.0;
		self.transform.y = self.height / 2.0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn data() -> GraphData {
		let node = |id: &str| GraphNode {
			id: id.into(),
			label: id.into(),
			color: "#23c4a7".into(),
			shape: Shape::Circle,
		};
		GraphData {
			nodes: vec![node("a"), node("b"), node("c")],
			links: vec![
				GraphLink {
					source: "a".into(),
					target: "b".into(),
				},
				GraphLink {
					source: "b".into(),
					target: "missing".into(),
				},
			],
		}
	}

	#[test]
	fn selection_maps_ids_to_nodes() {
		let mut state = ForceGraphState::new(&data(), 800.0, 600.0);
		state.set_selection(&["a".into(), "c".into(), "zzz".into()]);
		assert_eq!(state.selection.len(), 2);
		assert!(state.has_active_highlight());
		let highlighted: Vec<String> = state
			.selection
			.iter()
			.filter_map(|&i| state.node_id(i))
			.collect();
		assert!(highlighted.contains(&"a".to_string()));
		assert!(highlighted.contains(&"c".to_string()));
	}

	#[test]
	fn hit_test_finds_node_under_pointer() {
		let state = ForceGraphState::new(&data(), 800.0, 600.0);
		// first node starts on the ring at angle 0
		let ring = 100.0 + 4.0 * 3.0;
		let idx = state.node_at_position(400.0 + ring, 300.0).unwrap();
		assert_eq!(state.node_id(idx).as_deref(), Some("a"));
		assert!(state.node_at_position(400.0, 300.0).is_none());
	}

	#[test]
	fn hover_fades_out_through_prev_node() {
		let mut state = ForceGraphState::new(&data(), 800.0, 600.0);
		let idx = state.node_at_position(512.0, 300.0).unwrap();
		state.set_hover(Some(idx));
		assert!(state.is_hovered(idx));
		state.set_hover(None);
		assert_eq!(state.hover.prev_node, Some(idx));
		assert!(state.has_active_highlight());
	}
}
