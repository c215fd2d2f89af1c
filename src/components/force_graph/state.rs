use log::{debug, info, warn};

use super::config::ForceGraphConfig;
use super::error::SceneError;
use super::interaction::{Click, DragController, Gesture};
use super::layout::{Simulation, TickListener};
use super::legend::Inspection;
use super::scene::{LinkVisual, NodeVisual, Scene};
use super::types::RawGraph;
use super::view::ViewState;

/// Extra pick slack around a node's drawn radius, in graph units.
const HIT_SLACK: f64 = 2.0;

/// Everything one canvas needs between frames.
pub struct ForceGraphState {
	pub scene: Scene,
	pub layout: Simulation,
	pub view: ViewState,
	pub drags: DragController,
	pub gesture: Gesture,
	pub selection: Option<usize>,
	pub hover: Option<usize>,
	config: ForceGraphConfig,
}

impl ForceGraphState {
	pub fn new(config: ForceGraphConfig, width: f64, height: f64) -> Self {
		Self {
			scene: Scene::default(),
			layout: Simulation::new(&config.layout, width / 2.0, height / 2.0),
			view: ViewState::new(width, height),
			drags: DragController::new(config.layout.drag_alpha_target),
			gesture: Gesture::new(config.click_tolerance),
			selection: None,
			hover: None,
			config,
		}
	}

	/// Replace the scene with one built from `raw`.
	///
	/// On an integrity error the previous scene is dropped and the canvas stays empty.
	pub fn load(&mut self, raw: RawGraph) -> Result<(), SceneError> {
		self.selection = None;
		self.hover = None;
		self.drags.clear();
		self.gesture.cancel();
		self.view.reset();
		self.layout = Simulation::new(
			&self.config.layout,
			self.view.width / 2.0,
			self.view.height / 2.0,
		);

		let scene = match Scene::build(raw, &self.config.scene) {
			Ok(scene) => scene,
			Err(e) => {
				self.scene = Scene::default();
				return Err(e);
			}
		};
		self.scene = scene;
		self.layout.attach(&mut self.scene.nodes, &self.scene.links);
		self.scene
			.visuals
			.on_tick(&self.scene.nodes, &self.scene.links);
		info!(
			"Scene built: {} {} visuals, {} {} visuals",
			self.scene.visuals.nodes.len(),
			NodeVisual::CLASS,
			self.scene.visuals.links.len(),
			LinkVisual::CLASS,
		);
		Ok(())
	}

	/// Advance the layout by one step and any view animation by `dt_ms`.
	pub fn tick(&mut self, dt_ms: f64) {
		self.layout.step(
			&mut self.scene.nodes,
			&self.scene.links,
			&mut self.scene.visuals,
		);
		self.view.advance(dt_ms);
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.view.screen_to_graph(sx, sy);
		// later visuals are drawn on top, so they win
		self.scene
			.visuals
			.nodes
			.iter()
			.enumerate()
			.rev()
			.find(|(_, v)| {
				let (dx, dy) = (v.cx - gx, v.cy - gy);
				(dx * dx + dy * dy).sqrt() < v.radius + HIT_SLACK
			})
			.map(|(i, _)| i)
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		// a press can only start once the previous one is over
		if let Some(held) = self.gesture.cancel() {
			self.drags.end(&mut self.scene.nodes[held], &mut self.layout);
		}
		let hit = self.node_at_position(sx, sy);
		self.gesture.press(hit, sx, sy);
		if let Some(idx) = hit {
			debug!("Drag start on node '{}'", self.scene.nodes[idx].id());
			self.drags.start(&mut self.scene.nodes[idx], &mut self.layout);
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if !self.gesture.is_pressed() {
			self.hover = self.node_at_position(sx, sy);
			return;
		}
		if let Some(idx) = self.gesture.motion(sx, sy) {
			let (gx, gy) = self.view.screen_to_graph(sx, sy);
			self.drags.drag(&mut self.scene.nodes[idx], gx, gy);
		}
	}

	/// Finish the current press; a click selects or deselects.
	pub fn pointer_up(&mut self) -> Option<Click> {
		let (released, click) = self.gesture.release();
		if let Some(idx) = released {
			self.drags.end(&mut self.scene.nodes[idx], &mut self.layout);
		}
		match click {
			Some(Click::Node(idx)) => {
				self.show_properties(idx);
			}
			Some(Click::Background) => self.hide_legend(),
			None => {}
		}
		click
	}

	pub fn pointer_leave(&mut self) {
		if let Some(idx) = self.gesture.cancel() {
			self.drags.end(&mut self.scene.nodes[idx], &mut self.layout);
		}
		self.hover = None;
	}

	pub fn show_properties(&mut self, idx: usize) -> Option<Inspection> {
		let node = self.scene.nodes.get(idx)?;
		debug!("Selected node '{}' of type '{}'", node.id(), node.node_type());
		self.selection = Some(idx);
		Some(Inspection::of(node))
	}

	pub fn hide_legend(&mut self) {
		self.selection = None;
	}

	pub fn inspection(&self) -> Option<Inspection> {
		self.selection
			.and_then(|idx| self.scene.nodes.get(idx))
			.map(Inspection::of)
	}

	/// Label every node sharing the selected node's type with its own `key` value.
	pub fn choose_property(&mut self, key: &str) -> usize {
		let Some(node_type) = self
			.selection
			.and_then(|idx| self.scene.nodes.get(idx))
			.map(|node| node.node_type().to_string())
		else {
			return 0;
		};
		let updated = self.scene.apply_label(&node_type, key);
		debug!("Showing '{key}' on {updated} node(s) of type '{node_type}'");
		updated
	}

	pub fn recenter(&mut self) -> bool {
		let started = self.view.recenter(
			&self.scene.nodes,
			self.config.recenter_zoom,
			self.config.recenter_duration_ms,
		);
		if started {
			debug!("Recentering to {:?}", self.view.transition().map(|t| t.target()));
		} else {
			warn!("Recenter skipped: no node positions");
		}
		started
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.view.resize(width, height);
		self.layout.set_center(width / 2.0, height / 2.0);
		if !self.scene.is_empty() {
			self.layout.reactivate(self.layout.alpha_target());
		}
	}

	pub fn width(&self) -> f64 {
		self.view.width
	}

	pub fn height(&self) -> f64 {
		self.view.height
	}
}
