use std::collections::HashMap;

use super::config::SceneConfig;
use super::error::{Endpoint, SceneError};
use super::layout::TickListener;
use super::types::{LinkRecord, NodeRecord, RawGraph};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// A node record plus the simulation state the layout engine drives.
#[derive(Clone, Debug)]
pub struct RenderNode {
	record: NodeRecord,
	pub index: usize,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl RenderNode {
	fn new(index: usize, record: NodeRecord) -> Self {
		Self {
			record,
			index,
			x: f64::NAN,
			y: f64::NAN,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	pub fn record(&self) -> &NodeRecord {
		&self.record
	}

	pub fn id(&self) -> &str {
		&self.record.id
	}

	pub fn node_type(&self) -> &str {
		&self.record.node_type
	}

	pub fn property(&self, key: &str) -> Option<&str> {
		self.record.properties.get(key).map(String::as_str)
	}

	#[cfg(test)]
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}

	pub fn pin(&mut self, x: f64, y: f64) {
		self.fx = Some(x);
		self.fy = Some(y);
	}

	pub fn unpin(&mut self) {
		self.fx = None;
		self.fy = None;
	}
}

/// A link whose endpoints have been resolved to node indices.
#[derive(Clone, Debug)]
pub struct RenderLink {
	record: LinkRecord,
	pub source: usize,
	pub target: usize,
}

impl RenderLink {
	pub fn value(&self) -> f64 {
		self.record.value
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	pub cx: f64,
	pub cy: f64,
	pub radius: f64,
	pub color: String,
	pub label: Option<String>,
	pub tooltip: String,
}

impl NodeVisual {
	pub const CLASS: &'static str = "node";
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkVisual {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub width: f64,
	pub label: Option<String>,
}

impl LinkVisual {
	pub const CLASS: &'static str = "link";
}

/// Drawable state, index-aligned with the scene's nodes and links.
#[derive(Clone, Debug, Default)]
pub struct Visuals {
	pub nodes: Vec<NodeVisual>,
	pub links: Vec<LinkVisual>,
}

impl TickListener for Visuals {
	fn on_tick(&mut self, nodes: &[RenderNode], links: &[RenderLink]) {
		for (visual, node) in self.nodes.iter_mut().zip(nodes) {
			visual.cx = node.x;
			visual.cy = node.y;
		}
		for (visual, link) in self.links.iter_mut().zip(links) {
			let (s, t) = (&nodes[link.source], &nodes[link.target]);
			visual.x1 = s.x;
			visual.y1 = s.y;
			visual.x2 = t.x;
			visual.y2 = t.y;
		}
	}
}

/// Ordinal category-10 palette: each distinct type gets the next color.
#[derive(Clone, Debug, Default)]
pub struct TypePalette {
	assigned: HashMap<String, usize>,
}

impl TypePalette {
	pub fn color(&mut self, node_type: &str) -> &'static str {
		let next = self.assigned.len();
		let slot = *self.assigned.entry(node_type.to_string()).or_insert(next);
		COLORS[slot % COLORS.len()]
	}
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
	pub nodes: Vec<RenderNode>,
	pub links: Vec<RenderLink>,
	pub visuals: Visuals,
}

impl Scene {
	pub fn build(raw: RawGraph, config: &SceneConfig) -> Result<Self, SceneError> {
		let mut id_to_idx = HashMap::with_capacity(raw.nodes.len());
		for (i, node) in raw.nodes.iter().enumerate() {
			if id_to_idx.insert(node.id.clone(), i).is_some() {
				return Err(SceneError::DuplicateNode(node.id.clone()));
			}
		}

		let resolve = |link: usize, end: Endpoint, id: &str| {
			id_to_idx
				.get(id)
				.copied()
				.ok_or_else(|| SceneError::UnresolvedEndpoint {
					link,
					end,
					id: id.to_string(),
				})
		};
		let links = raw
			.links
			.into_iter()
			.enumerate()
			.map(|(i, record)| {
				Ok(RenderLink {
					source: resolve(i, Endpoint::Source, &record.source)?,
					target: resolve(i, Endpoint::Target, &record.target)?,
					record,
				})
			})
			.collect::<Result<Vec<_>, SceneError>>()?;

		let nodes: Vec<RenderNode> = raw
			.nodes
			.into_iter()
			.enumerate()
			.map(|(i, record)| RenderNode::new(i, record))
			.collect();

		let mut palette = TypePalette::default();
		let node_visuals = nodes
			.iter()
			.map(|node| NodeVisual {
				cx: node.x,
				cy: node.y,
				radius: config.node_radius,
				color: palette.color(node.node_type()).into(),
				label: node.property(&config.label_property).map(Into::into),
				tooltip: node.id().into(),
			})
			.collect();
		let link_visuals = links
			.iter()
			.map(|link| LinkVisual {
				x1: f64::NAN,
				y1: f64::NAN,
				x2: f64::NAN,
				y2: f64::NAN,
				width: link.value().max(0.0).sqrt(),
				label: config.link_labels.then(|| link.value().to_string()),
			})
			.collect();

		Ok(Self {
			nodes,
			links,
			visuals: Visuals {
				nodes: node_visuals,
				links: link_visuals,
			},
		})
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Show `key` as the label of every node of `node_type`, each with its own value.
	pub fn apply_label(&mut self, node_type: &str, key: &str) -> usize {
		let mut updated = 0;
		for (node, visual) in self.nodes.iter().zip(self.visuals.nodes.iter_mut()) {
			if node.node_type() == node_type {
				visual.label = node.property(key).map(Into::into);
				updated += 1;
			}
		}
		updated
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn two_titled() -> RawGraph {
		RawGraph {
			nodes: vec![
				NodeRecord::new("a", "X", &[("title", "Alpha"), ("kind", "first")]),
				NodeRecord::new("b", "X", &[("title", "Beta")]),
				NodeRecord::new("c", "Y", &[("title", "Gamma"), ("kind", "other")]),
			],
			links: vec![LinkRecord::new("a", "c", 9.0)],
		}
	}

	#[test]
	fn builds_one_render_object_per_record() {
		let raw = RawGraph {
			nodes: vec![
				NodeRecord::new("a", "X", &[("title", "Alpha")]),
				NodeRecord::new("b", "X", &[("title", "Beta")]),
			],
			links: vec![],
		};
		let scene = Scene::build(raw, &SceneConfig::default()).unwrap();
		assert_eq!(scene.nodes.len(), 2);
		assert!(scene.links.is_empty());
		assert_eq!(scene.visuals.nodes.len(), 2);
		assert_eq!(scene.visuals.nodes[0].label.as_deref(), Some("Alpha"));
		assert_eq!(scene.visuals.nodes[1].tooltip, "b");
	}

	#[test]
	fn resolves_link_endpoints_by_id() {
		let scene = Scene::build(two_titled(), &SceneConfig::default()).unwrap();
		assert_eq!(scene.links.len(), 1);
		assert_eq!((scene.links[0].source, scene.links[0].target), (0, 2));
		assert_eq!(scene.visuals.links[0].width, 3.0);
		assert!(scene.visuals.links[0].label.is_none());
	}

	#[test]
	fn unresolved_endpoint_is_reported() {
		let raw = RawGraph {
			nodes: vec![NodeRecord::new("a", "X", &[])],
			links: vec![LinkRecord::new("a", "ghost", 1.0)],
		};
		assert_eq!(
			Scene::build(raw, &SceneConfig::default()).unwrap_err(),
			SceneError::UnresolvedEndpoint {
				link: 0,
				end: Endpoint::Target,
				id: "ghost".into(),
			}
		);
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let raw = RawGraph {
			nodes: vec![NodeRecord::new("a", "X", &[]), NodeRecord::new("a", "Y", &[])],
			links: vec![],
		};
		assert_eq!(
			Scene::build(raw, &SceneConfig::default()).unwrap_err(),
			SceneError::DuplicateNode("a".into())
		);
	}

	#[test]
	fn palette_colors_by_type_in_order_of_appearance() {
		let scene = Scene::build(two_titled(), &SceneConfig::default()).unwrap();
		let colors: Vec<_> = scene.visuals.nodes.iter().map(|v| v.color.as_str()).collect();
		assert_eq!(colors, [COLORS[0], COLORS[0], COLORS[1]]);
	}

	#[test]
	fn apply_label_uses_each_nodes_own_value() {
		let mut scene = Scene::build(two_titled(), &SceneConfig::default()).unwrap();
		assert_eq!(scene.apply_label("X", "kind"), 2);

		let labels: Vec<_> = scene
			.visuals
			.nodes
			.iter()
			.map(|v| v.label.as_deref())
			.collect();
		assert_eq!(labels, [Some("first"), None, Some("Gamma")]);
	}

	#[test]
	fn tick_listener_copies_positions() {
		let mut scene = Scene::build(two_titled(), &SceneConfig::default()).unwrap();
		for (i, node) in scene.nodes.iter_mut().enumerate() {
			node.x = i as f64 * 10.0;
			node.y = -(i as f64);
		}
		scene.visuals.on_tick(&scene.nodes, &scene.links);

		assert_eq!((scene.visuals.nodes[1].cx, scene.visuals.nodes[1].cy), (10.0, -1.0));
		let link = &scene.visuals.links[0];
		assert_eq!((link.x1, link.y1, link.x2, link.y2), (0.0, 0.0, 20.0, -2.0));
	}
}
