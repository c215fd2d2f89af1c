use std::collections::HashSet;

use super::layout::Simulation;
use super::scene::RenderNode;

/// Tracks which nodes are held. Each node is Idle or Dragging independently.
#[derive(Clone, Debug, Default)]
pub struct DragController {
	active: HashSet<usize>,
	alpha_target: f64,
}

impl DragController {
	pub fn new(alpha_target: f64) -> Self {
		Self {
			active: HashSet::new(),
			alpha_target,
		}
	}

	#[cfg(test)]
	pub fn is_dragging(&self, node: usize) -> bool {
		self.active.contains(&node)
	}

	#[cfg(test)]
	pub fn active_count(&self) -> usize {
		self.active.len()
	}

	/// Pin `node` where it stands and wake the simulation if nothing else is held.
	pub fn start(&mut self, node: &mut RenderNode, sim: &mut Simulation) {
		if self.active.is_empty() {
			sim.reactivate(self.alpha_target);
		}
		self.active.insert(node.index);
		node.pin(node.x, node.y);
	}

	/// Follow the pointer's absolute graph-space position.
	pub fn drag(&mut self, node: &mut RenderNode, x: f64, y: f64) {
		if self.active.contains(&node.index) {
			node.pin(x, y);
		}
	}

	pub fn end(&mut self, node: &mut RenderNode, sim: &mut Simulation) {
		self.active.remove(&node.index);
		node.unpin();
		if self.active.is_empty() {
			sim.relax();
		}
	}

	/// Forget every gesture, e.g. when the scene is replaced.
	pub fn clear(&mut self) {
		self.active.clear();
	}
}

/// What a finished press resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Click {
	Node(usize),
	Background,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Press {
	Idle,
	Down {
		node: Option<usize>,
		x: f64,
		y: f64,
		moved: bool,
	},
}

/// Separates clicks from drags for a single pointer.
///
/// A press that travels further than the tolerance is a drag and never
/// produces a click; a press on a node never produces a background click.
#[derive(Clone, Debug)]
pub struct Gesture {
	press: Press,
	tolerance: f64,
}

impl Gesture {
	pub fn new(tolerance: f64) -> Self {
		Self {
			press: Press::Idle,
			tolerance,
		}
	}

	pub fn press(&mut self, node: Option<usize>, x: f64, y: f64) {
		self.press = Press::Down {
			node,
			x,
			y,
			moved: false,
		};
	}

	/// Record pointer travel. Returns the held node, if any.
	pub fn motion(&mut self, px: f64, py: f64) -> Option<usize> {
		match &mut self.press {
			Press::Idle => None,
			Press::Down { node, x, y, moved } => {
				let (dx, dy) = (px - *x, py - *y);
				if dx * dx + dy * dy > self.tolerance * self.tolerance {
					*moved = true;
				}
				*node
			}
		}
	}

	pub fn is_pressed(&self) -> bool {
		matches!(self.press, Press::Down { .. })
	}

	#[cfg(test)]
	pub fn held(&self) -> Option<usize> {
		match self.press {
			Press::Down { node, .. } => node,
			Press::Idle => None,
		}
	}

	/// Finish the press. Returns the released node and the click, if it was one.
	pub fn release(&mut self) -> (Option<usize>, Option<Click>) {
		match std::mem::replace(&mut self.press, Press::Idle) {
			Press::Idle => (None, None),
			Press::Down { node, moved, .. } => {
				let click = (!moved).then(|| node.map_or(Click::Background, Click::Node));
				(node, click)
			}
		}
	}

	/// Abandon the press without producing a click.
	pub fn cancel(&mut self) -> Option<usize> {
		match std::mem::replace(&mut self.press, Press::Idle) {
			Press::Down { node, .. } => node,
			Press::Idle => None,
		}
	}
}
