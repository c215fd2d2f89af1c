/// Tunables for the force simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Many-body strength; negative values repel.
	pub charge_strength: f64,
	/// Strength of the per-axis pull toward the viewport center.
	pub center_strength: f64,
	pub link_distance: f64,
	pub link_strength: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub velocity_decay: f64,
	/// Alpha target held while at least one node is being dragged.
	pub drag_alpha_target: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			charge_strength: -3000.0,
			center_strength: 1.0,
			link_distance: 50.0,
			link_strength: 1.0,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
	pub node_radius: f64,
	/// Property shown as the initial node label.
	pub label_property: String,
	pub link_labels: bool,
}

impl Default for SceneConfig {
	fn default() -> Self {
		Self {
			node_radius: 10.0,
			label_property: "title".into(),
			link_labels: false,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForceGraphConfig {
	pub layout: LayoutConfig,
	pub scene: SceneConfig,
	pub recenter_zoom: f64,
	pub recenter_duration_ms: f64,
	/// Pointer travel (screen px) beyond which a press becomes a drag instead of a click.
	pub click_tolerance: f64,
}

impl Default for ForceGraphConfig {
	fn default() -> Self {
		Self {
			layout: LayoutConfig::default(),
			scene: SceneConfig::default(),
			recenter_zoom: 2.0,
			recenter_duration_ms: 2000.0,
			click_tolerance: 3.0,
		}
	}
}
