use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::config::ForceGraphConfig;
use super::interaction::Click;
use super::legend::{Inspection, LegendPanel};
use super::render;
use super::state::ForceGraphState;
use super::types::RawGraph;

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;

#[component]
pub fn ForceGraphCanvas(
	/// Graph to show; every new value replaces the scene.
	#[prop(into)]
	data: Signal<Option<RawGraph>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: ForceGraphConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (inspection, set_inspection) = signal(None::<Inspection>);
	let (chosen, set_chosen) = signal(None::<String>);
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let raw = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if state_init.borrow().is_none() {
			let Some(window) = web_sys::window() else {
				error!("No window; force graph disabled");
				return;
			};
			let Some(ctx) = context_2d(&canvas) else {
				error!("Canvas has no 2d context; force graph disabled");
				return;
			};
			let (w, h) = measure(&window, &canvas, fullscreen, width, height);
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			*state_init.borrow_mut() = Some(ForceGraphState::new(config.clone(), w, h));

			if width.is_none() || height.is_none() {
				let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
				*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
					let Some(win) = web_sys::window() else {
						return;
					};
					let (nw, nh) = measure(&win, &canvas_resize, fullscreen, width, height);
					canvas_resize.set_width(nw as u32);
					canvas_resize.set_height(nh as u32);
					if let Some(ref mut s) = *state_resize.borrow_mut() {
						s.resize(nw, nh);
					}
				}));
				if let Some(ref cb) = *resize_cb_init.borrow() {
					let _ =
						window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}

			let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
			let mut last_frame: Option<f64> = None;
			*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
				if let Some(ref mut s) = *state_anim.borrow_mut() {
					let dt = last_frame.map_or(0.0, |prev| now - prev);
					last_frame = Some(now);
					s.tick(dt);
					render::render(s, &ctx);
				}
				if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}));
			if let Some(ref cb) = *animate_init.borrow() {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}

		if let Some(raw) = raw {
			if let Some(ref mut s) = *state_init.borrow_mut() {
				if let Err(e) = s.load(raw) {
					error!("Graph not rendered: {e}");
				}
			}
			set_inspection.set(None);
		}
	});

	let state_choose = state.clone();
	Effect::new(move |_| {
		let Some(key) = chosen.get() else {
			return;
		};
		if let Some(ref mut s) = *state_choose.borrow_mut() {
			s.choose_property(&key);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let update = match *state_mu.borrow_mut() {
			Some(ref mut s) => match s.pointer_up() {
				Some(Click::Node(_)) => Some(s.inspection()),
				Some(Click::Background) => Some(None),
				None => None,
			},
			None => None,
		};
		if let Some(inspected) = update {
			set_inspection.set(inspected);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_rc = state.clone();
	let on_recenter = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_rc.borrow_mut() {
			s.recenter();
		}
	};

	view! {
		<div class="force-graph">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				style="display: block; cursor: grab;"
			/>
			<button class="recenter" on:click=on_recenter>
				"Recenter"
			</button>
			<LegendPanel inspection=inspection chosen=set_chosen />
		</div>
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
}

/// Size from explicit props, else the window (fullscreen) or the parent's client box.
fn measure(
	window: &Window,
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let w = window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0);
		let h = window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0);
		return (width.unwrap_or(w), height.unwrap_or(h));
	}
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}
