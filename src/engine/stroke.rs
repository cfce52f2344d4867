use crate::color::Color;
use crate::geom::{self, AABox, Point, QUAD_VERTEX_COUNT};

use super::StrokeError;

/// Index of a stroke in drawing order. Also its slot in the per-stroke packed buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("stroke#{_0}")]
pub struct StrokeId(pub u32);

impl StrokeId {
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// One continuous gesture, rendered as a run of quads sharing a single color.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
	color: Color,
	positions: Vec<Point>,
}

impl Stroke {
	fn new(color: Color, quad: [Point; QUAD_VERTEX_COUNT]) -> Self {
		Self {
			color,
			positions: quad.to_vec(),
		}
	}

	pub fn color(&self) -> Color {
		self.color
	}

	/// Always a positive multiple of `QUAD_VERTEX_COUNT`.
	pub fn vertex_count(&self) -> u32 {
		self.positions.len() as u32
	}

	pub fn positions(&self) -> &[Point] {
		&self.positions
	}

	pub fn bounds(&self) -> AABox {
		AABox::containing(self.positions.iter().copied())
	}
}

/// Result of extending the active stroke by one quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extension {
	pub id: StrokeId,
	pub vertex_count: u32,
	pub quad: [Point; QUAD_VERTEX_COUNT],
}

/// Append-only drawing history plus a handle to the stroke being drawn.
#[derive(Debug, Clone, Default)]
pub struct StrokeStore {
	strokes: Vec<Stroke>,
	active: Option<StrokeId>,
}

impl StrokeStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.strokes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.strokes.is_empty()
	}

	pub fn get(&self, id: StrokeId) -> Option<&Stroke> {
		self.strokes.get(id.index())
	}

	pub fn iter(&self) -> impl ExactSizeIterator<Item = &Stroke> + '_ {
		self.strokes.iter()
	}

	pub fn active(&self) -> Option<StrokeId> {
		self.active
	}

	/// Id the next `begin_stroke` will return.
	pub fn next_id(&self) -> StrokeId {
		StrokeId(self.strokes.len() as u32)
	}

	pub fn begin_stroke(&mut self, center: Point, color: Color) -> (StrokeId, [Point; QUAD_VERTEX_COUNT]) {
		let quad = geom::quad_for(center);
		let id = self.next_id();
		self.strokes.push(Stroke::new(color, quad));
		self.active = Some(id);
		(id, quad)
	}

	pub fn extend_stroke(&mut self, center: Point) -> Result<Extension, StrokeError> {
		let id = self.active.ok_or(StrokeError::NoActiveStroke)?;
		let stroke = &mut self.strokes[id.index()];
		let quad = geom::quad_for(center);
		stroke.positions.extend_from_slice(&quad);
		Ok(Extension {
			id,
			vertex_count: stroke.vertex_count(),
			quad,
		})
	}

	/// Detaches the active stroke. It stays in the history but can no longer be extended.
	pub fn end_stroke(&mut self) -> Option<StrokeId> {
		self.active.take()
	}
}

impl<'a> IntoIterator for &'a StrokeStore {
	type Item = &'a Stroke;
	type IntoIter = std::slice::Iter<'a, Stroke>;
	fn into_iter(self) -> Self::IntoIter {
		self.strokes.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use glam::vec2;

	#[test]
	fn begin() {
		let mut store = StrokeStore::new();
		let (id, quad) = store.begin_stroke(vec2(10.0, 10.0), Color::BLACK);
		assert_eq!(id, StrokeId(0));
		assert_eq!(store.len(), 1);
		assert_eq!(store.active(), Some(id));

		let stroke = store.get(id).unwrap();
		assert_eq!(stroke.vertex_count(), 6);
		assert_eq!(stroke.positions(), &quad);
		assert_eq!(stroke.color(), Color::BLACK);

		let (id, _) = store.begin_stroke(vec2(0.0, 0.0), Color::BLUE);
		assert_eq!(id, StrokeId(1));
		assert_eq!(store.active(), Some(id));
	}

	#[test]
	fn extend_targets_active_stroke() -> anyhow::Result<()> {
		let mut store = StrokeStore::new();
		store.begin_stroke(vec2(10.0, 10.0), Color::BLACK);
		store.begin_stroke(vec2(50.0, 50.0), Color::BLUE);

		let extension = store.extend_stroke(vec2(52.0, 50.0))?;
		assert_eq!(extension.id, StrokeId(1));
		assert_eq!(extension.vertex_count, 12);
		assert_eq!(extension.quad, geom::quad_for(vec2(52.0, 50.0)));

		assert_eq!(store.len(), 2);
		assert_eq!(store.get(StrokeId(0)).unwrap().vertex_count(), 6);
		let stroke = store.get(StrokeId(1)).unwrap();
		assert_eq!(stroke.vertex_count(), 12);
		assert_eq!(&stroke.positions()[6..], &extension.quad);
		Ok(())
	}

	#[test]
	fn extend_empty() {
		let mut store = StrokeStore::new();
		assert!(matches!(
			store.extend_stroke(vec2(1.0, 1.0)),
			Err(StrokeError::NoActiveStroke)
		));
		assert!(store.is_empty());
	}

	#[test]
	fn extend_after_end() {
		let mut store = StrokeStore::new();
		let (id, _) = store.begin_stroke(vec2(1.0, 1.0), Color::GREEN);
		assert_eq!(store.end_stroke(), Some(id));
		assert!(matches!(
			store.extend_stroke(vec2(2.0, 2.0)),
			Err(StrokeError::NoActiveStroke)
		));
		assert_eq!(store.get(id).unwrap().vertex_count(), 6);
	}

	#[test]
	fn vertex_count_is_multiple_of_quad() -> anyhow::Result<()> {
		let mut store = StrokeStore::new();
		store.begin_stroke(vec2(0.0, 0.0), Color::CYAN);
		for i in 0..10 {
			store.extend_stroke(vec2(i as f32, 0.0))?;
		}
		for stroke in &store {
			assert_eq!(stroke.vertex_count() as usize % QUAD_VERTEX_COUNT, 0);
			assert_eq!(stroke.positions().len(), stroke.vertex_count() as usize);
		}
		let bounds = store.get(StrokeId(0)).unwrap().bounds();
		assert_eq!(bounds.min(), vec2(-2.0, -2.0));
		assert_eq!(bounds.max(), vec2(11.0, 2.0));
		Ok(())
	}
}
