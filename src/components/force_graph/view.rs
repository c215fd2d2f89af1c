use super::scene::RenderNode;

/// Screen position = `k * world + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn apply(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	pub fn invert(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	fn lerp(&self, to: &ViewTransform, t: f64) -> ViewTransform {
		ViewTransform {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn center(&self) -> (f64, f64) {
		(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

/// Extent of all finite node positions, or `None` if there are none.
pub fn bounding_box(nodes: &[RenderNode]) -> Option<Bounds> {
	nodes
		.iter()
		.filter(|n| n.x.is_finite() && n.y.is_finite())
		.fold(None, |acc: Option<Bounds>, n| {
			Some(match acc {
				None => Bounds {
					min_x: n.x,
					min_y: n.y,
					max_x: n.x,
					max_y: n.y,
				},
				Some(b) => Bounds {
					min_x: b.min_x.min(n.x),
					min_y: b.min_y.min(n.y),
					max_x: b.max_x.max(n.x),
					max_y: b.max_y.max(n.y),
				},
			})
		})
}

/// Translate-then-scale that puts the center of `bounds` on the viewport center.
pub fn recenter_transform(bounds: &Bounds, width: f64, height: f64, zoom: f64) -> ViewTransform {
	let (cx, cy) = bounds.center();
	ViewTransform {
		x: width / 2.0 - zoom * cx,
		y: height / 2.0 - zoom * cy,
		k: zoom,
	}
}

fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
	from: ViewTransform,
	to: ViewTransform,
	elapsed_ms: f64,
	duration_ms: f64,
}

impl Transition {
	pub fn new(from: ViewTransform, to: ViewTransform, duration_ms: f64) -> Self {
		Self {
			from,
			to,
			elapsed_ms: 0.0,
			duration_ms,
		}
	}

	pub fn target(&self) -> ViewTransform {
		self.to
	}

	/// Advance by `dt_ms` and return the interpolated transform.
	pub fn advance(&mut self, dt_ms: f64) -> ViewTransform {
		self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.duration_ms);
		if self.is_finished() {
			return self.to;
		}
		self.from
			.lerp(&self.to, ease_cubic_in_out(self.elapsed_ms / self.duration_ms))
	}

	pub fn is_finished(&self) -> bool {
		self.elapsed_ms >= self.duration_ms
	}
}

/// Viewport size plus the single transform applied to the whole graph.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
	pub width: f64,
	pub height: f64,
	pub transform: ViewTransform,
	transition: Option<Transition>,
}

impl ViewState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			..Default::default()
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		self.transform.invert(sx, sy)
	}

	/// Start animating toward a centered, zoomed view of `nodes`.
	/// Returns `false` and leaves the view alone when there is nothing to frame.
	pub fn recenter(&mut self, nodes: &[RenderNode], zoom: f64, duration_ms: f64) -> bool {
		let Some(bounds) = bounding_box(nodes) else {
			return false;
		};
		let target = recenter_transform(&bounds, self.width, self.height, zoom);
		if duration_ms <= 0.0 {
			self.transform = target;
			self.transition = None;
		} else {
			self.transition = Some(Transition::new(self.transform, target, duration_ms));
		}
		true
	}

	pub fn transition(&self) -> Option<&Transition> {
		self.transition.as_ref()
	}

	/// Drive any running transition forward. Returns whether one is still running.
	pub fn advance(&mut self, dt_ms: f64) -> bool {
		let Some(transition) = self.transition.as_mut() else {
			return false;
		};
		self.transform = transition.advance(dt_ms);
		if transition.is_finished() {
			self.transition = None;
			return false;
		}
		true
	}

	pub fn reset(&mut self) {
		self.transform = ViewTransform::default();
		self.transition = None;
	}
}
