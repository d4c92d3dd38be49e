//! storm-sim: an animated explanation of how thunderstorms become electrified.
//!
//! This crate provides a WASM canvas component that walks through cloud
//! formation, ice growth, charge separation and lightning, one lesson phase at
//! a time.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::storm::{Phase, StormCanvas, StormConfig, Theme};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("storm-sim: logging initialized");
}

/// Load settings from a script element with id="storm-config".
/// Expected format: JSON object, every field optional.
fn load_storm_config() -> Option<StormConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("storm-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<StormConfig>(&json_text) {
		Ok(config) => {
			info!(
				"storm-sim: loaded config ({} dust, {} water)",
				config.dust_count, config.water_count
			);
			Some(config)
		}
		Err(e) => {
			warn!("storm-sim: failed to parse config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Renders the storm canvas with a phase selector and a lightning button.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_storm_config().unwrap_or_default();
	let (phase, set_phase) = signal(Phase::Ambient);
	let (strikes, set_strikes) = signal(0u32);

	let phase_buttons = Phase::ALL
		.into_iter()
		.map(|p| {
			view! {
				<button
					class="phase-item"
					class:active=move || phase.get() == p
					on:click=move |_| set_phase.set(p)
				>
					{format!("{}. {}", p.index(), p.title())}
				</button>
			}
		})
		.collect_view();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="How Thunderstorms Get Charged" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-storm">
			<StormCanvas
				phase=phase
				strikes=strikes
				report_phase=set_phase
				config=config
				fullscreen=true
			/>
			<div class="storm-overlay">
				<h1>"Thunderstorm electrification"</h1>
				<nav class="phases">
					{phase_buttons}
					<button class="strike" on:click=move |_| set_strikes.update(|n| *n += 1)>
						"Strike!"
					</button>
				</nav>
			</div>
		</div>
	}
}
