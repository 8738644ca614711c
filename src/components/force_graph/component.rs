use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::frame_loop::FrameLoop;
use super::render;
use super::state::{CLICK_SLOP, ForceGraphState};
use super::types::GraphData;

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;
type FrameCallback = Option<Closure<dyn FnMut()>>;

fn request_frame(callback: &FrameCallback, frames: &FrameLoop) {
	if let (Some(cb), Some(window)) = (callback, web_sys::window()) {
		if let Ok(handle) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			frames.scheduled(handle);
		}
	}
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn parent_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_width() as f64)
				.filter(|w| *w > 0.0)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_height() as f64)
				.filter(|h| *h > 0.0)
				.unwrap_or(600.0)
		}),
	)
}

/// Force-directed canvas view of a [`GraphData`].
///
/// Nodes in `highlighted` are emphasized and the rest dimmed. Clicking a node
/// (press and release without dragging) reports its id through `on_select`.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] highlighted: Signal<Vec<String>>,
	#[prop(optional)] on_select: Option<Callback<String>>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<FrameCallback>> = Rc::new(RefCell::new(None));
	let size: Rc<RefCell<(f64, f64)>> = Rc::new(RefCell::new((800.0, 600.0)));

	let frames = FrameLoop::new();
	let frames_cleanup = frames.clone();
	on_cleanup(move || {
		if let (Some(handle), Some(window)) = (frames_cleanup.stop(), web_sys::window()) {
			let _ = window.cancel_animation_frame(handle);
		}
		log::debug!("graph canvas unmounted");
	});

	// Canvas setup and the animation loop run once per mount.
	let (state_init, animate_init, size_init) = (state.clone(), animate, size.clone());
	let frames_init = frames;
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if animate_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = parent_size(&canvas, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		*size_init.borrow_mut() = (w, h);
		if let Some(ref mut s) = *state_init.borrow_mut() {
			s.resize(w, h);
			s.center_view();
		}

		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().ok(),
			_ => None,
		};
		let Some(ctx) = ctx else {
			log::error!("canvas 2d context unavailable");
			return;
		};

		// the callback only holds a weak handle to itself, so disposing this
		// effect on unmount frees it
		let (state_anim, animate_weak, frames_anim) =
			(state_init.clone(), Rc::downgrade(&animate_init), frames_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			frames_anim.fired();
			if !frames_anim.is_running() {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let Some(animate) = animate_weak.upgrade() {
				request_frame(&animate.borrow(), &frames_anim);
			}
		}));
		request_frame(&animate_init.borrow(), &frames_init);
		log::debug!("graph canvas mounted at {w}x{h}");
	});

	// A new data set rebuilds the simulation; the loop keeps running.
	let (state_data, size_data) = (state.clone(), size.clone());
	Effect::new(move |_| {
		let data = data.get();
		let (w, h) = *size_data.borrow();
		let mut next = ForceGraphState::new(&data, w, h);
		next.set_selection(&highlighted.get_untracked());
		*state_data.borrow_mut() = Some(next);
	});

	let state_hl = state.clone();
	Effect::new(move |_| {
		let ids = highlighted.get();
		if let Some(ref mut s) = *state_hl.borrow_mut() {
			s.set_selection(&ids);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.moved = false;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if !s.drag.active {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}

			if s.drag.active {
				let (sx, sy) = (x - s.drag.start_x, y - s.drag.start_y);
				if (sx * sx + sy * sy).sqrt() > CLICK_SLOP {
					s.drag.moved = true;
				}
				if let (Some(idx), true) = (s.drag.node_idx, s.drag.moved) {
					let (nx, ny) = (
						s.drag.node_start_x + (sx / s.transform.k) as f32,
						s.drag.node_start_y + (sy / s.transform.k) as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = {
			let mut guard = state_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let clicked = match (s.drag.active, s.drag.moved, s.drag.node_idx) {
				(true, false, Some(idx)) => s.node_id(idx),
				_ => None,
			};
			s.drag.active = false;
			s.drag.moved = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			clicked
		};
		// state is released before the callback so it may update `highlighted`
		if let (Some(id), Some(cb)) = (clicked, on_select) {
			cb.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
