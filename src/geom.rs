use glam::Vec2;

/// A position in device pixels.
pub type Point = Vec2;

/// Number of vertices in a single quad (two triangles).
pub const QUAD_VERTEX_COUNT: usize = 6;

/// Distance from a quad's center to its edges, before scaling.
pub const HALF_EXTENT: f32 = 1.0;

/// Scale applied to every quad so it stays visible on high-density displays.
pub const QUAD_SCALE: f32 = 2.0;

/// Converts a position in logical UI points to device pixels.
pub fn to_device_pixels(logical: Vec2, scale_factor: f32) -> Point {
	logical * scale_factor
}

/// Returns the two triangles covering a square centered on `center`.
///
/// The vertices are `[top_left, bottom_left, bottom_right, top_left, bottom_right, top_right]`
/// with +y as "top". Consumers depend on this order for consistent winding.
pub fn quad_for(center: Point) -> [Point; QUAD_VERTEX_COUNT] {
	let offset = HALF_EXTENT * QUAD_SCALE;
	let top_left = center + Vec2::new(-offset, offset);
	let bottom_left = center + Vec2::new(-offset, -offset);
	let top_right = center + Vec2::new(offset, offset);
	let bottom_right = center + Vec2::new(offset, -offset);
	[
		top_left,
		bottom_left,
		bottom_right,
		top_left,
		bottom_right,
		top_right,
	]
}

/// Returns the area covered by `quad_for(center)`.
pub fn quad_bounds(center: Point) -> AABox {
	AABox::containing(quad_for(center).into_iter())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABox {
	min: Vec2,
	max: Vec2,
}

impl AABox {
	pub fn new(min: Vec2, max: Vec2) -> Self {
		Self { min, max }
	}

	pub fn empty() -> Self {
		Self::new(Vec2::MAX, Vec2::MIN)
	}

	pub fn is_empty(&self) -> bool {
		self.min.x > self.max.x || self.min.y > self.max.y
	}

	pub fn min(&self) -> Vec2 {
		self.min
	}

	pub fn max(&self) -> Vec2 {
		self.max
	}

	pub fn expanded_to_contain(self, point: Vec2) -> Self {
		Self::new(self.min.min(point), self.max.max(point))
	}

	pub fn union(self, other: AABox) -> Self {
		Self::new(self.min.min(other.min), self.max.max(other.max))
	}

	pub fn containing(points: impl Iterator<Item = Vec2>) -> Self {
		points.fold(Self::empty(), |b, p| b.expanded_to_contain(p))
	}
}
