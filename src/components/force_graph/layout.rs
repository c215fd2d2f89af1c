//! Velocity-Verlet force simulation with d3-force semantics: an `alpha`
//! temperature that decays toward `alpha_target`, per-tick forces that adjust
//! velocities, and `fx`/`fy` pins that override integration.

use std::f64::consts::PI;

use super::config::LayoutConfig;
use super::scene::{RenderLink, RenderNode};

const INITIAL_RADIUS: f64 = 10.0;
const DISTANCE_MIN2: f64 = 1.0;

/// Receives node and link state after every simulation step.
pub trait TickListener {
	fn on_tick(&mut self, nodes: &[RenderNode], links: &[RenderLink]);
}

pub trait Force {
	fn initialize(&mut self, _nodes: &[RenderNode], _links: &[RenderLink]) {}

	fn apply(&mut self, nodes: &mut [RenderNode], links: &[RenderLink], alpha: f64, rng: &mut Lcg);

	/// Move whatever point the force pulls toward; no-op for forces without one.
	fn retarget(&mut self, _x: f64, _y: f64) {}
}

/// Deterministic linear congruential generator.
#[derive(Clone, Debug)]
pub struct Lcg(u64);

impl Default for Lcg {
	fn default() -> Self {
		Lcg(1)
	}
}

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	pub fn next_f64(&mut self) -> f64 {
		self.0 = (Self::A.wrapping_mul(self.0).wrapping_add(Self::C)) % Self::M;
		self.0 as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

/// Pairwise charge between all nodes.
pub struct ManyBody {
	pub strength: f64,
}

impl Force for ManyBody {
	fn apply(&mut self, nodes: &mut [RenderNode], _: &[RenderLink], alpha: f64, rng: &mut Lcg) {
		for i in 0..nodes.len() {
			let (mut ax, mut ay) = (0.0, 0.0);
			for j in 0..nodes.len() {
				if i == j {
					continue;
				}
				let (mut dx, mut dy) = (nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y);
				let mut l = dx * dx + dy * dy;
				if dx == 0.0 {
					dx = rng.jiggle();
					l += dx * dx;
				}
				if dy == 0.0 {
					dy = rng.jiggle();
					l += dy * dy;
				}
				if l < DISTANCE_MIN2 {
					l = (DISTANCE_MIN2 * l).sqrt();
				}
				ax += dx * self.strength * alpha / l;
				ay += dy * self.strength * alpha / l;
			}
			nodes[i].vx += ax;
			nodes[i].vy += ay;
		}
	}
}

/// Translates the whole layout so its mean position sits on `(x, y)`.
pub struct Center {
	pub x: f64,
	pub y: f64,
	pub strength: f64,
}

impl Force for Center {
	fn apply(&mut self, nodes: &mut [RenderNode], _: &[RenderLink], _: f64, _: &mut Lcg) {
		if nodes.is_empty() {
			return;
		}
		let n = nodes.len() as f64;
		let (sx, sy) = nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (sx, sy) = (
			(sx / n - self.x) * self.strength,
			(sy / n - self.y) * self.strength,
		);
		for node in nodes.iter_mut() {
			node.x -= sx;
			node.y -= sy;
		}
	}

	fn retarget(&mut self, x: f64, y: f64) {
		self.x = x;
		self.y = y;
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
	X,
	Y,
}

/// Pulls every node toward a coordinate on one axis, independently of the other.
pub struct Position {
	pub axis: Axis,
	pub target: f64,
	pub strength: f64,
}

impl Force for Position {
	fn apply(&mut self, nodes: &mut [RenderNode], _: &[RenderLink], alpha: f64, _: &mut Lcg) {
		let k = self.strength * alpha;
		for node in nodes.iter_mut() {
			match self.axis {
				Axis::X => node.vx += (self.target - node.x) * k,
				Axis::Y => node.vy += (self.target - node.y) * k,
			}
		}
	}

	fn retarget(&mut self, x: f64, y: f64) {
		self.target = match self.axis {
			Axis::X => x,
			Axis::Y => y,
		};
	}
}

/// Spring holding linked nodes at a rest distance.
pub struct Link {
	pub distance: f64,
	pub strength: f64,
	bias: Vec<f64>,
}

impl Link {
	pub fn new(distance: f64, strength: f64) -> Self {
		Self {
			distance,
			strength,
			bias: Vec::new(),
		}
	}
}

impl Force for Link {
	fn initialize(&mut self, nodes: &[RenderNode], links: &[RenderLink]) {
		let mut count = vec![0usize; nodes.len()];
		for link in links {
			count[link.source] += 1;
			count[link.target] += 1;
		}
		self.bias = links
			.iter()
			.map(|link| {
				count[link.source] as f64 / (count[link.source] + count[link.target]) as f64
			})
			.collect();
	}

	fn apply(&mut self, nodes: &mut [RenderNode], links: &[RenderLink], alpha: f64, rng: &mut Lcg) {
		for (link, &bias) in links.iter().zip(&self.bias) {
			let (s, t) = (&nodes[link.source], &nodes[link.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 {
				dx = rng.jiggle();
			}
			if dy == 0.0 {
				dy = rng.jiggle();
			}
			let l = (dx * dx + dy * dy).sqrt();
			let l = (l - self.distance) / l * alpha * self.strength;
			let (dx, dy) = (dx * l, dy * l);

			let target = &mut nodes[link.target];
			target.vx -= dx * bias;
			target.vy -= dy * bias;
			let source = &mut nodes[link.source];
			source.vx += dx * (1.0 - bias);
			source.vy += dy * (1.0 - bias);
		}
	}
}

pub struct Simulation {
	alpha: f64,
	alpha_min: f64,
	alpha_decay: f64,
	alpha_target: f64,
	velocity_decay: f64,
	running: bool,
	center: (f64, f64),
	forces: Vec<Box<dyn Force>>,
	rng: Lcg,
}

impl Simulation {
	/// Charge, center, x/y positioning and link forces, in that order.
	pub fn new(config: &LayoutConfig, cx: f64, cy: f64) -> Self {
		Self::with_forces(
			config,
			cx,
			cy,
			vec![
				Box::new(ManyBody {
					strength: config.charge_strength,
				}),
				Box::new(Center {
					x: cx,
					y: cy,
					strength: 1.0,
				}),
				Box::new(Position {
					axis: Axis::X,
					target: cx,
					strength: config.center_strength,
				}),
				Box::new(Position {
					axis: Axis::Y,
					target: cy,
					strength: config.center_strength,
				}),
				Box::new(Link::new(config.link_distance, config.link_strength)),
			],
		)
	}

	pub fn with_forces(
		config: &LayoutConfig,
		cx: f64,
		cy: f64,
		forces: Vec<Box<dyn Force>>,
	) -> Self {
		Self {
			alpha: 1.0,
			alpha_min: config.alpha_min,
			alpha_decay: config.alpha_decay,
			alpha_target: 0.0,
			velocity_decay: config.velocity_decay,
			running: false,
			center: (cx, cy),
			forces,
			rng: Lcg::default(),
		}
	}

	/// Seed undefined positions, prepare forces and start a fresh run.
	pub fn attach(&mut self, nodes: &mut [RenderNode], links: &[RenderLink]) {
		let initial_angle = PI * (3.0 - 5f64.sqrt());
		for (i, node) in nodes.iter_mut().enumerate() {
			if let Some(fx) = node.fx {
				node.x = fx;
			}
			if let Some(fy) = node.fy {
				node.y = fy;
			}
			if !node.x.is_finite() || !node.y.is_finite() {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * initial_angle;
				node.x = self.center.0 + radius * angle.cos();
				node.y = self.center.1 + radius * angle.sin();
			}
			if !node.vx.is_finite() || !node.vy.is_finite() {
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}
		for force in &mut self.forces {
			force.initialize(nodes, links);
		}
		self.alpha = 1.0;
		self.alpha_target = 0.0;
		self.running = true;
	}

	/// Advance alpha, apply every force and integrate once.
	pub fn tick(&mut self, nodes: &mut [RenderNode], links: &[RenderLink]) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		for force in &mut self.forces {
			force.apply(nodes, links, self.alpha, &mut self.rng);
		}
		let keep = 1.0 - self.velocity_decay;
		for node in nodes.iter_mut() {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}
	}

	/// One timer step. Returns `false` without touching anything when dormant.
	pub fn step(
		&mut self,
		nodes: &mut [RenderNode],
		links: &[RenderLink],
		listener: &mut dyn TickListener,
	) -> bool {
		if !self.running {
			return false;
		}
		self.tick(nodes, links);
		listener.on_tick(nodes, links);
		if self.alpha < self.alpha_min {
			self.running = false;
		}
		true
	}

	#[cfg(test)]
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	#[cfg(test)]
	pub fn is_running(&self) -> bool {
		self.running
	}

	#[cfg(test)]
	pub fn is_dormant(&self) -> bool {
		!self.running || self.alpha < self.alpha_min
	}

	/// Raise the alpha target and resume stepping.
	pub fn reactivate(&mut self, alpha_target: f64) {
		self.alpha_target = alpha_target;
		self.running = true;
	}

	/// Let the simulation cool back down to rest.
	pub fn relax(&mut self) {
		self.alpha_target = 0.0;
	}

	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
		for force in &mut self.forces {
			force.retarget(x, y);
		}
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::force_graph::config::SceneConfig;
	use crate::components::force_graph::scene::Scene;
	use crate::components::force_graph::types::{LinkRecord, NodeRecord, RawGraph};

	#[derive(Default)]
	struct Recorder {
		ticks: usize,
		last: Vec<(f64, f64)>,
	}

	impl TickListener for Recorder {
		fn on_tick(&mut self, nodes: &[RenderNode], _: &[RenderLink]) {
			self.ticks += 1;
			self.last = nodes.iter().map(|n| (n.x, n.y)).collect();
		}
	}

	fn scene(n: usize, links: &[(usize, usize)]) -> Scene {
		let raw = RawGraph {
			nodes: (0..n)
				.map(|i| NodeRecord::new(&i.to_string(), "T", &[]))
				.collect(),
			links: links
				.iter()
				.map(|(s, t)| LinkRecord::new(&s.to_string(), &t.to_string(), 1.0))
				.collect(),
		};
		Scene::build(raw, &SceneConfig::default()).unwrap()
	}

	fn positions(scene: &Scene) -> Vec<(f64, f64)> {
		scene.nodes.iter().map(|n| (n.x, n.y)).collect()
	}

	fn settle(sim: &mut Simulation, scene: &mut Scene) -> usize {
		let mut recorder = Recorder::default();
		let mut steps = 0;
		while sim.step(&mut scene.nodes, &scene.links, &mut recorder) {
			steps += 1;
			assert!(steps < 10_000, "simulation never cooled down");
		}
		steps
	}

	#[test]
	fn attach_seeds_finite_positions_around_center() {
		let mut scene = scene(5, &[(0, 1)]);
		let mut sim = Simulation::new(&LayoutConfig::default(), 200.0, 100.0);
		sim.attach(&mut scene.nodes, &scene.links);

		assert!(sim.is_running());
		for node in &scene.nodes {
			assert!(node.x.is_finite() && node.y.is_finite());
			assert!((node.x - 200.0).abs() < 50.0 && (node.y - 100.0).abs() < 50.0);
		}
	}

	#[test]
	fn stepping_at_rest_changes_nothing() {
		let mut scene = scene(4, &[(0, 1), (1, 2), (2, 3)]);
		let mut sim = Simulation::new(&LayoutConfig::default(), 200.0, 200.0);
		sim.attach(&mut scene.nodes, &scene.links);
		assert!(settle(&mut sim, &mut scene) > 0);
		assert!(sim.is_dormant());

		let before = positions(&scene);
		let mut recorder = Recorder::default();
		assert!(!sim.step(&mut scene.nodes, &scene.links, &mut recorder));
		assert_eq!(positions(&scene), before);
		assert_eq!(recorder.ticks, 0);
	}

	#[test]
	fn settled_layout_is_centered() {
		let mut scene = scene(6, &[(0, 1), (0, 2), (3, 4)]);
		let mut sim = Simulation::new(&LayoutConfig::default(), 300.0, 150.0);
		sim.attach(&mut scene.nodes, &scene.links);
		settle(&mut sim, &mut scene);

		let n = scene.nodes.len() as f64;
		let mx = scene.nodes.iter().map(|n| n.x).sum::<f64>() / n;
		let my = scene.nodes.iter().map(|n| n.y).sum::<f64>() / n;
		assert!((mx - 300.0).abs() < 1.0, "mean x {mx}");
		assert!((my - 150.0).abs() < 1.0, "mean y {my}");
	}

	#[test]
	fn listener_sees_integrated_positions() {
		let mut scene = scene(3, &[(0, 1)]);
		let mut sim = Simulation::new(&LayoutConfig::default(), 0.0, 0.0);
		sim.attach(&mut scene.nodes, &scene.links);

		let mut recorder = Recorder::default();
		assert!(sim.step(&mut scene.nodes, &scene.links, &mut recorder));
		assert_eq!(recorder.ticks, 1);
		assert_eq!(recorder.last, positions(&scene));
	}

	#[test]
	fn pinned_node_holds_its_position() {
		let mut scene = scene(3, &[(0, 1), (1, 2)]);
		let mut sim = Simulation::new(&LayoutConfig::default(), 0.0, 0.0);
		sim.attach(&mut scene.nodes, &scene.links);
		scene.nodes[1].pin(42.0, -7.0);

		let mut recorder = Recorder::default();
		for _ in 0..25 {
			sim.step(&mut scene.nodes, &scene.links, &mut recorder);
			assert_eq!((scene.nodes[1].x, scene.nodes[1].y), (42.0, -7.0));
			assert_eq!((scene.nodes[1].vx, scene.nodes[1].vy), (0.0, 0.0));
		}
	}

	#[test]
	fn reactivation_wakes_a_dormant_simulation() {
		let mut scene = scene(2, &[(0, 1)]);
		let mut sim = Simulation::new(&LayoutConfig::default(), 0.0, 0.0);
		sim.attach(&mut scene.nodes, &scene.links);
		settle(&mut sim, &mut scene);
		let resting_alpha = sim.alpha();

		sim.reactivate(0.3);
		assert!(sim.is_running());
		let mut recorder = Recorder::default();
		assert!(sim.step(&mut scene.nodes, &scene.links, &mut recorder));
		assert!(sim.alpha() > resting_alpha);

		sim.relax();
		assert_eq!(sim.alpha_target(), 0.0);
		settle(&mut sim, &mut scene);
		assert!(sim.is_dormant());
	}

	#[test]
	fn coincident_nodes_are_separated() {
		let mut scene = scene(2, &[]);
		for node in &mut scene.nodes {
			node.x = 5.0;
			node.y = 5.0;
		}
		let mut sim = Simulation::new(&LayoutConfig::default(), 5.0, 5.0);
		sim.attach(&mut scene.nodes, &scene.links);
		sim.tick(&mut scene.nodes, &scene.links);

		let (a, b) = (&scene.nodes[0], &scene.nodes[1]);
		assert!(a.x.is_finite() && b.x.is_finite());
		assert!(a.x != b.x || a.y != b.y);
	}

	#[test]
	fn retargeting_moves_the_resting_center() {
		let mut scene = scene(3, &[(0, 1)]);
		let mut sim = Simulation::new(&LayoutConfig::default(), 0.0, 0.0);
		sim.attach(&mut scene.nodes, &scene.links);
		sim.set_center(500.0, 400.0);
		settle(&mut sim, &mut scene);

		let mx = scene.nodes.iter().map(|n| n.x).sum::<f64>() / 3.0;
		assert!((mx - 500.0).abs() < 1.0, "mean x {mx}");
	}

	#[test]
	fn lcg_is_deterministic_and_in_unit_range() {
		let (mut a, mut b) = (Lcg::default(), Lcg::default());
		for _ in 0..100 {
			let v = a.next_f64();
			assert_eq!(v, b.next_f64());
			assert!((0.0..1.0).contains(&v));
		}
	}

	proptest! {
		#[test]
		fn positions_stay_finite(n in 1usize..12, raw_links in prop::collection::vec((0usize..12, 0usize..12), 0..16)) {
			let links: Vec<_> = raw_links.into_iter().filter(|(s, t)| *s < n && *t < n).collect();
			let mut scene = scene(n, &links);
			let mut sim = Simulation::new(&LayoutConfig::default(), 200.0, 200.0);
			sim.attach(&mut scene.nodes, &scene.links);
			let mut recorder = Recorder::default();
			for _ in 0..60 {
				sim.step(&mut scene.nodes, &scene.links, &mut recorder);
			}
			for node in &scene.nodes {
				prop_assert!(node.x.is_finite() && node.y.is_finite());
			}
		}
	}
}
