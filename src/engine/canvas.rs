use bon::bon;
use glam::Vec2;
use tracing::*;

use crate::color::Color;
use crate::geom::Point;

use super::*;

/// Setup-time options for a `Canvas`.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
	pub capacities: Capacities,
	pub overflow_policy: OverflowPolicy,
	/// Background the frame is cleared to before strokes are drawn.
	pub clear_color: Color,
	pub initial_color: Color,
	pub initial_brightness: f32,
}

#[bon]
impl CanvasConfig {
	#[builder]
	pub fn new(
		#[builder(default)] capacities: Capacities,
		#[builder(default)] overflow_policy: OverflowPolicy,
		#[builder(default = Color::WHITE)] clear_color: Color,
		#[builder(default = Color::BLACK)] initial_color: Color,
		#[builder(default = 1.0)] initial_brightness: f32,
	) -> Self {
		Self {
			capacities,
			overflow_policy,
			clear_color,
			initial_color,
			initial_brightness,
		}
	}
}

impl Default for CanvasConfig {
	fn default() -> Self {
		Self::builder().build()
	}
}

/// The drawing surface: stroke history, its packed GPU representation and the scalar render
/// state read at frame submission.
#[derive(Debug, Clone)]
pub struct Canvas {
	config: CanvasConfig,
	store: StrokeStore,
	packer: BufferPacker,
	current_color: Color,
	current_brightness: f32,
	viewport_size: Vec2,
	redraw_requested: bool,
}

impl Default for Canvas {
	fn default() -> Self {
		Self::new(CanvasConfig::default())
	}
}

impl Canvas {
	pub fn new(config: CanvasConfig) -> Self {
		Self {
			store: StrokeStore::new(),
			packer: BufferPacker::new(config.capacities, config.overflow_policy),
			current_color: config.initial_color,
			current_brightness: config.initial_brightness,
			viewport_size: Vec2::ZERO,
			redraw_requested: true,
			config,
		}
	}

	pub fn config(&self) -> &CanvasConfig {
		&self.config
	}

	pub fn strokes(&self) -> &StrokeStore {
		&self.store
	}

	pub fn packer(&self) -> &BufferPacker {
		&self.packer
	}

	pub fn stroke_count(&self) -> u32 {
		self.store.len() as u32
	}

	pub fn total_vertex_count(&self) -> u32 {
		self.packer.total_vertex_count()
	}

	pub fn current_color(&self) -> Color {
		self.current_color
	}

	pub fn current_brightness(&self) -> f32 {
		self.current_brightness
	}

	pub fn viewport_size(&self) -> Vec2 {
		self.viewport_size
	}

	/// Sets the color used by strokes begun from now on. Existing strokes keep theirs.
	pub fn set_current_color(&mut self, color: Color) {
		self.current_color = color;
	}

	/// Sets the fraction of brightness kept when blending. Not clamped.
	pub fn set_current_brightness(&mut self, percentage: f32) {
		self.current_brightness = percentage;
		self.request_redraw();
	}

	/// Sets the drawable size in device pixels.
	pub fn set_viewport_size(&mut self, width: f32, height: f32) {
		self.viewport_size = Vec2::new(width, height);
		self.request_redraw();
	}

	/// Starts a new stroke with the current color and stamps its first quad at `point`.
	#[instrument(level = "trace", skip(self), err(level = "warn"))]
	pub fn begin_stroke(&mut self, point: Point) -> Result<StrokeId, StrokeError> {
		self.packer.reserve_stroke(self.store.next_id())?;
		let color = self.current_color;
		let (id, quad) = self.store.begin_stroke(point, color);
		self.packer.on_stroke_begun(id, color, &quad)?;
		debug!(%id, ?color, total_vertex_count = self.total_vertex_count(), "stroke begun");
		self.request_redraw();
		Ok(id)
	}

	/// Stamps another quad at `point` onto the active stroke.
	#[instrument(level = "trace", skip(self), err(level = "warn"))]
	pub fn extend_stroke(&mut self, point: Point) -> Result<StrokeId, StrokeError> {
		self.store.active().ok_or(StrokeError::NoActiveStroke)?;
		self.packer.reserve_quad()?;
		let extension = self.store.extend_stroke(point)?;
		self
			.packer
			.on_stroke_extended(extension.id, extension.vertex_count, &extension.quad)?;
		trace!(
			id = %extension.id,
			vertex_count = extension.vertex_count,
			total_vertex_count = self.total_vertex_count(),
			"stroke extended"
		);
		self.request_redraw();
		Ok(extension.id)
	}

	/// Ends the active gesture, if any.
	pub fn end_stroke(&mut self) -> Option<StrokeId> {
		let id = self.store.end_stroke();
		if let Some(id) = id {
			debug!(%id, "stroke ended");
		}
		id
	}

	pub fn request_redraw(&mut self) {
		self.redraw_requested = true;
	}

	/// Returns whether a redraw was requested since the last call. Any number of mutations
	/// between two calls collapse into one request.
	pub fn take_redraw_request(&mut self) -> bool {
		std::mem::take(&mut self.redraw_requested)
	}

	/// Packed ranges written since the previous frame.
	pub fn take_pending_uploads(&mut self) -> PendingUploads {
		self.packer.take_pending()
	}
}
