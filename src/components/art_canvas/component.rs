//! Leptos component wrapping the particle canvas.
//!
//! The component creates a fullscreen canvas, builds the simulation state once
//! the element is mounted, and hands a tick-and-paint closure to the frame
//! driver. Window listeners feed resize and pointer input into the shared
//! state; a reactive effect forwards every new configuration. Teardown
//! removes the listeners, stops the driver and releases the frame callback
//! together with the state it captured.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::ev;
use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, TouchEvent};

use super::config::ArtConfig;
use super::driver::{DriverHandle, FrameSlot};
use super::render;
use super::state::ArtState;
use crate::error::SurfaceError;

/// Bundles the simulation state with the surface it is painted on.
struct CanvasContext {
	state: ArtState,
	ctx: CanvasRenderingContext2d,
}

type SharedContext = Rc<RefCell<Option<CanvasContext>>>;

fn viewport_size() -> Option<(f64, f64)> {
	let window = web_sys::window()?;
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, SurfaceError> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
		.ok_or(SurfaceError::NoContext)
}

/// Seed for particle placement; differs on every page load.
fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64 ^ js_sys::Date::now() as u64
}

fn first_touch(ev: &TouchEvent) -> Option<(f64, f64)> {
	let touch = ev.touches().get(0)?;
	Some((touch.client_x() as f64, touch.client_y() as f64))
}

/// Renders the particle field on a fullscreen canvas.
///
/// Pass the active configuration via the reactive `config` signal. Every new
/// value regenerates the particle set without interrupting the animation. If
/// the browser cannot provide a 2D context, nothing is animated and a single
/// warning is logged.
#[component]
pub fn ArtCanvas(#[prop(into)] config: Signal<ArtConfig>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let driver = DriverHandle::new();
	let frame_slot = StoredValue::new_local(None::<FrameSlot>);

	let (context_init, driver_init) = (context.clone(), driver.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();

		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(e) => {
				warn!("lumina: {}; animation disabled", e);
				return;
			}
		};

		let (w, h) = viewport_size().unwrap_or((800.0, 600.0));
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		*context_init.borrow_mut() = Some(CanvasContext {
			state: ArtState::new(config.get_untracked(), w, h, random_seed()),
			ctx,
		});

		let context_anim = context_init.clone();
		let started = driver_init.start(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let commands = c.state.tick();
				render::paint(&c.ctx, commands);
			}
		});
		match started {
			Ok(slot) => frame_slot.set_value(Some(slot)),
			Err(e) => warn!("lumina: frame driver failed to start: {:?}", e),
		}
	});

	let context_cfg = context.clone();
	Effect::new(move |_| {
		let next = config.get();
		if let Some(ref mut c) = *context_cfg.borrow_mut() {
			if c.state.reconfigure(next).is_ok() {
				info!("lumina: applied new configuration");
			}
		}
	});

	let context_resize = context.clone();
	let resize = window_event_listener(ev::resize, move |_| {
		let Some((w, h)) = viewport_size() else {
			return;
		};
		if let Some(canvas) = canvas_ref.get_untracked() {
			let canvas: HtmlCanvasElement = canvas.into();
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
		}
		if let Some(ref mut c) = *context_resize.borrow_mut() {
			c.state.resize(w, h);
		}
	});

	let context_mm = context.clone();
	let mousemove = window_event_listener(ev::mousemove, move |ev| {
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.state
				.pointer_moved(ev.client_x() as f64, ev.client_y() as f64);
		}
	});

	let context_tm = context.clone();
	let touchmove = window_event_listener(ev::touchmove, move |ev| {
		if let (Some((x, y)), Some(c)) = (first_touch(&ev), context_tm.borrow_mut().as_mut()) {
			c.state.pointer_moved(x, y);
		}
	});

	let context_te = context.clone();
	let touchend = window_event_listener(ev::touchend, move |_| {
		if let Some(ref mut c) = *context_te.borrow_mut() {
			c.state.pointer_left();
		}
	});

	on_cleanup(move || {
		resize.remove();
		mousemove.remove();
		touchmove.remove();
		touchend.remove();
		driver.stop();
		if let Some(Some(slot)) = frame_slot.try_update_value(Option::take) {
			slot.release();
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="art-canvas"
			style="position: fixed; inset: 0; display: block;"
		/>
	}
}
