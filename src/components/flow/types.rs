/// Stable identifier of a flow node: its index in [`FlowGraph::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
	Hexagon,
	Circle,
	Square,
}

#[derive(Clone, Debug)]
pub struct FlowNode {
	/// Horizontal position as a fraction of the canvas width.
	pub x: f64,
	/// Vertical position as a fraction of the canvas height.
	pub y: f64,
	pub label: String,
	pub shape: Shape,
}

/// Undirected connection; particles may travel it either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowEdge {
	pub a: NodeId,
	pub b: NodeId,
}

#[derive(Clone, Debug, Default)]
pub struct FlowGraph {
	pub nodes: Vec<FlowNode>,
	pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
	/// The five-backend holon diagram shown on the landing page.
	pub fn holon_stack() -> Self {
		let node = |x, y, label: &str, shape| FlowNode {
			x,
			y,
			label: label.to_string(),
			shape,
		};
		let nodes = vec![
			node(0.12, 0.50, "Holochain", Shape::Hexagon),
			node(0.35, 0.28, "Ethereum", Shape::Circle),
			node(0.50, 0.65, "OASIS API", Shape::Square),
			node(0.65, 0.35, "MongoDB", Shape::Circle),
			node(0.88, 0.50, "IPFS", Shape::Hexagon),
		];
		let edges = [(0, 1), (0, 2), (1, 2), (1, 3), (2, 3), (3, 4), (2, 4)]
			.into_iter()
			.map(|(a, b)| FlowEdge {
				a: NodeId(a),
				b: NodeId(b),
			})
			.collect();
		Self { nodes, edges }
	}
}
