//! Frame scheduling via `requestAnimationFrame`.
//!
//! A [`FrameLoop`] is a three-state machine (idle, running, stopped). Each
//! frame callback runs one tick and then schedules the next, so the browser
//! sees a single pending request at a time. Stopping cancels that request and
//! is final; a new loop is needed to animate again.
//!
//! The state is kept in atomics so a [`DriverHandle`] can be moved into
//! Leptos cleanup callbacks, which must be `Send + Sync`. The browser-side
//! closure lives in a [`FrameSlot`] owned by the caller; the closure only
//! holds a weak reference to it, so releasing the slot frees the closure and
//! everything it captured.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicU8, AtomicU32, Ordering};

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Lifecycle of a frame loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Idle,
	Running,
	Stopped,
}

impl Phase {
	fn from_u8(v: u8) -> Self {
		match v {
			0 => Phase::Idle,
			1 => Phase::Running,
			_ => Phase::Stopped,
		}
	}
}

/// Scheduling state shared between the frame callback and its owner.
#[derive(Debug)]
pub struct FrameLoop {
	phase: AtomicU8,
	/// Pending animation frame request id; 0 when nothing is scheduled.
	pending: AtomicI32,
	frames: AtomicU32,
}

impl Default for FrameLoop {
	fn default() -> Self {
		Self::new()
	}
}

impl FrameLoop {
	pub const fn new() -> Self {
		Self {
			phase: AtomicU8::new(Phase::Idle as u8),
			pending: AtomicI32::new(0),
			frames: AtomicU32::new(0),
		}
	}

	pub fn phase(&self) -> Phase {
		Phase::from_u8(self.phase.load(Ordering::Acquire))
	}

	pub fn frames(&self) -> u32 {
		self.frames.load(Ordering::Relaxed)
	}

	/// Idle to running. Returns false if the loop was already started or stopped.
	pub fn start(&self) -> bool {
		self.phase
			.compare_exchange(
				Phase::Idle as u8,
				Phase::Running as u8,
				Ordering::AcqRel,
				Ordering::Acquire,
			)
			.is_ok()
	}

	/// Records the request id of the next scheduled frame. Returns the id
	/// back if the loop is no longer running, so the caller can cancel it.
	pub fn scheduled(&self, request_id: i32) -> Option<i32> {
		if self.phase() == Phase::Running {
			self.pending.store(request_id, Ordering::Release);
			None
		} else {
			Some(request_id)
		}
	}

	/// Called at the top of every frame callback. Returns whether the frame
	/// should run.
	pub fn begin_frame(&self) -> bool {
		self.pending.store(0, Ordering::Release);
		if self.phase() != Phase::Running {
			return false;
		}
		self.frames.fetch_add(1, Ordering::Relaxed);
		true
	}

	/// Moves to the terminal stopped state and returns the pending request
	/// id, if any, for cancellation.
	pub fn stop(&self) -> Option<i32> {
		self.phase.store(Phase::Stopped as u8, Ordering::Release);
		match self.pending.swap(0, Ordering::AcqRel) {
			0 => None,
			id => Some(id),
		}
	}
}

type FrameCallback = Closure<dyn FnMut()>;

/// Strong owner of a frame callback.
pub struct FrameSlot<T = FrameCallback> {
	cell: Rc<RefCell<Option<T>>>,
}

impl<T> Default for FrameSlot<T> {
	fn default() -> Self {
		Self {
			cell: Rc::new(RefCell::new(None)),
		}
	}
}

impl<T> FrameSlot<T> {
	pub fn new() -> Self {
		Self::default()
	}

	fn set(&self, value: T) {
		*self.cell.borrow_mut() = Some(value);
	}

	fn downgrade(&self) -> Weak<RefCell<Option<T>>> {
		Rc::downgrade(&self.cell)
	}

	pub fn is_live(&self) -> bool {
		self.cell.borrow().is_some()
	}

	/// Takes the callback out. Call after [`DriverHandle::stop`] so no
	/// scheduled frame can reach the dropped closure.
	pub fn release(&self) -> Option<T> {
		self.cell.borrow_mut().take()
	}
}

/// Owner-side handle for a frame loop bound to the browser.
#[derive(Clone, Debug, Default)]
pub struct DriverHandle {
	frame_loop: Arc<FrameLoop>,
}

impl DriverHandle {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn phase(&self) -> Phase {
		self.frame_loop.phase()
	}

	/// Starts calling `frame` once per display refresh until [`stop`](Self::stop).
	///
	/// The returned slot keeps the callback alive; dropping or releasing it
	/// ends the animation.
	pub fn start<F>(&self, mut frame: F) -> Result<FrameSlot, JsValue>
	where
		F: FnMut() + 'static,
	{
		if !self.frame_loop.start() {
			return Err(JsValue::from_str(&format!(
				"frame driver already {:?}",
				self.phase()
			)));
		}

		let slot: FrameSlot = FrameSlot::new();
		let (frame_loop, callback) = (self.frame_loop.clone(), slot.downgrade());
		slot.set(Closure::new(move || {
			if !frame_loop.begin_frame() {
				return;
			}
			let Some(callback) = callback.upgrade() else {
				frame_loop.stop();
				return;
			};
			frame();
			match request_frame(&callback) {
				Ok(id) => {
					if let Some(id) = frame_loop.scheduled(id) {
						cancel_frame(id);
					}
				}
				Err(e) => {
					warn!("lumina: could not schedule next frame: {:?}", e);
					frame_loop.stop();
				}
			}
		}));

		let id = request_frame(&slot.cell).inspect_err(|_| {
			self.frame_loop.stop();
		})?;
		self.frame_loop.scheduled(id);
		info!("lumina: frame driver started");
		Ok(slot)
	}

	/// Cancels the pending frame. No further frames run.
	pub fn stop(&self) {
		if self.phase() == Phase::Stopped {
			return;
		}
		if let Some(id) = self.frame_loop.stop() {
			cancel_frame(id);
		}
		info!(
			"lumina: frame driver stopped after {} frames",
			self.frame_loop.frames()
		);
	}
}

fn request_frame(callback: &RefCell<Option<FrameCallback>>) -> Result<i32, JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
	match *callback.borrow() {
		Some(ref cb) => window.request_animation_frame(cb.as_ref().unchecked_ref()),
		None => Err(JsValue::from_str("frame callback missing")),
	}
}

fn cancel_frame(id: i32) {
	if let Some(window) = web_sys::window() {
		let _ = window.cancel_animation_frame(id);
	}
}
