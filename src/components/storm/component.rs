//! Leptos component wrapping the storm canvas.
//!
//! The component creates an HTML canvas, builds a [`StormState`] sized to it,
//! and runs the animation loop via `requestAnimationFrame`: one simulation tick
//! and one render per display refresh. Phase and lightning requests arrive as
//! reactive signals and are forwarded to the state's control surface.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::render;
use super::state::StormState;
use super::theme::Theme;
use super::types::{Phase, StormConfig};

/// Simulation state plus the theme it is drawn with.
struct StormContext {
	state: StormState,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<StormContext>>>;

fn now_ms() -> f64 {
	js_sys::Date::now()
}

fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	let w = window.inner_width().ok()?.as_f64()?;
	let h = window.inner_height().ok()?.as_f64()?;
	Some((w, h))
}

/// Renders the thunderstorm animation on a canvas element.
///
/// `phase` selects the lesson step; every change of `strikes` fires a
/// lightning bolt. Phase switches the simulation makes on its own (the
/// delayed auto start) are written to `report_phase` when given. The canvas
/// sizes itself to its parent by default; set `fullscreen = true` to fill the
/// viewport and follow window resizes.
/// Explicit `width`/`height` override automatic sizing.
#[component]
pub fn StormCanvas(
	#[prop(into)] phase: Signal<Phase>,
	#[prop(into)] strikes: Signal<u32>,
	#[prop(optional)] report_phase: Option<WriteSignal<Phase>>,
	#[prop(default = StormConfig::default())] config: StormConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("storm: no window, animation disabled");
			return;
		};

		let parent_size = |f: fn(&web_sys::Element) -> i32, fallback: f64| {
			canvas
				.parent_element()
				.map(|p| f(&p) as f64)
				.unwrap_or(fallback)
		};
		let (w, h) = if fullscreen {
			viewport_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| parent_size(web_sys::Element::client_width, 800.0)),
				height.unwrap_or_else(|| parent_size(web_sys::Element::client_height, 600.0)),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("storm: 2d canvas context unavailable");
			return;
		};

		let seed = config.seed.unwrap_or_else(random_seed);
		let mut state = StormState::new(config.clone(), seed, w, h, now_ms());
		let initial = phase.get_untracked();
		if initial != Phase::Ambient {
			state.set_phase(initial, now_ms());
		}
		*context_init.borrow_mut() = Some(StormContext {
			state,
			theme: Theme::default(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let switched = match *context_anim.borrow_mut() {
				Some(ref mut c) => {
					let switched = c.state.tick(now_ms());
					render::render(&c.state, &ctx, &c.theme);
					switched
				}
				None => None,
			};
			if let (Some(p), Some(sink)) = (switched, report_phase) {
				debug!("storm: reporting phase {:?} to host", p);
				sink.set(p);
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_phase = context.clone();
	Effect::new(move |first_run_done: Option<()>| {
		let selected = phase.get();
		// The initial value was applied when the state was built.
		if first_run_done.is_some() {
			if let Some(ref mut c) = *context_phase.borrow_mut() {
				c.state.set_phase(selected, now_ms());
			}
		}
	});

	let context_strike = context.clone();
	Effect::new(move |previous: Option<u32>| {
		let count = strikes.get();
		if previous.is_some_and(|p| p != count) {
			if let Some(ref mut c) = *context_strike.borrow_mut() {
				c.state.trigger_lightning();
			}
		}
		debug!("storm: strike counter {}", count);
		count
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="storm-canvas"
			style="display: block;"
		/>
	}
}
