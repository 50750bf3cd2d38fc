//! lumina: mood-driven generative particle art.
//!
//! This crate provides a WASM application where a typed mood phrase is turned
//! into simulation parameters by a hosted language model, and a canvas renders
//! an interactive particle field driven by those parameters.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, KeyboardEvent, Window};

pub mod components;
pub mod error;
pub mod generate;

pub use components::art_canvas::{ArtCanvas, ArtConfig, ShapeType};
pub use generate::{ServiceSettings, generate_art_config};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("lumina: logging initialized");
}

/// Settings embedded in the page alongside the initial configuration.
#[derive(Clone, Debug, Default)]
struct PageConfig {
	config: ArtConfig,
	api_key: Option<String>,
	model: Option<String>,
}

fn config_script() -> Option<HtmlScriptElement> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("art-config")?;
	element.dyn_into().ok()
}

/// Load the starting configuration from a script element with id="art-config".
/// The element may also carry `data-api-key` and `data-model` attributes.
fn load_page_config() -> PageConfig {
	let Some(script) = config_script() else {
		return PageConfig::default();
	};
	let api_key = script.get_attribute("data-api-key");
	let model = script.get_attribute("data-model");

	let json_text = script.text().unwrap_or_default();
	if json_text.trim().is_empty() {
		return PageConfig {
			api_key,
			model,
			..PageConfig::default()
		};
	}

	let config = match ArtConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"lumina: loaded page configuration with {} particles",
				config.particle_count
			);
			config
		}
		Err(e) => {
			warn!("lumina: ignoring page configuration: {}", e);
			ArtConfig::default()
		}
	};
	PageConfig {
		config,
		api_key,
		model,
	}
}

/// Main application component.
/// Renders the canvas and the prompt overlay that drives it.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let page = load_page_config();
	let settings = StoredValue::new(ServiceSettings::from_env().with_overrides(page.api_key, page.model));
	let config = RwSignal::new(page.config);
	let prompt = RwSignal::new(String::new());
	let loading = RwSignal::new(false);
	let notice = RwSignal::new(None::<String>);
	let show_controls = RwSignal::new(true);

	let generate = move || {
		let text = prompt.get_untracked();
		if loading.get_untracked() || text.trim().is_empty() {
			return;
		}
		loading.set(true);
		notice.set(None);

		let settings = settings.get_value();
		spawn_local(async move {
			match generate_art_config(&settings, &text).await {
				Ok(next) => {
					info!("lumina: generated configuration for {:?}", text);
					config.set(next);
				}
				Err(e) => {
					warn!("lumina: failed to generate art system: {}", e);
					notice.set(Some(
						"Something went wrong generating the art. Try another prompt!".to_string(),
					));
				}
			}
			loading.set(false);
		});
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Lumina AI" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="lumina">
			<ArtCanvas config=config />

			<div class="branding">
				<h1>"LUMINA " <span class="accent">"AI"</span></h1>
			</div>

			<button
				class="controls-toggle"
				on:click=move |_| show_controls.update(|shown| *shown = !*shown)
			>
				{move || if show_controls.get() { "Hide" } else { "Controls" }}
			</button>

			<div class="control-panel" class:hidden=move || !show_controls.get()>
				<div class="prompt-row">
					<input
						type="text"
						placeholder="Describe a mood (e.g., 'A rainy Tokyo night', 'Neon explosion')"
						prop:value=move || prompt.get()
						on:input=move |ev| prompt.set(event_target_value(&ev))
						on:keydown=move |ev: KeyboardEvent| {
							if ev.key() == "Enter" {
								generate();
							}
						}
					/>
					<button on:click=move |_| generate() disabled=move || loading.get()>
						{move || if loading.get() { "Dreaming..." } else { "Evolve Vision" }}
					</button>
				</div>

				{move || notice.get().map(|msg| view! { <p class="notice">{msg}</p> })}

				<div class="status">
					<span class="chip">
						{move || format!("Particles: {}", config.with(|c| c.particle_count))}
					</span>
					<span class="chip">
						{move || format!("Mode: {}", config.with(|c| c.shape_type.label().to_uppercase()))}
					</span>
					<div class="swatches">
						{move || {
							config
								.with(|c| c.colors.clone())
								.into_iter()
								.map(|color| view! { <div class="swatch" style:background-color=color.to_css() /> })
								.collect_view()
						}}
					</div>
					<span class="hint">"Interactive Physics Playground · Move your mouse to interact"</span>
				</div>
			</div>
		</div>
	}
}
