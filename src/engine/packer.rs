use std::ops::Range;

use itertools::Itertools;

use crate::color::Color;
use crate::geom::{Point, QUAD_VERTEX_COUNT};

use super::{StrokeError, StrokeId};

/// Names one of the three packed buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BufferKind {
	#[display("colors")]
	Colors,
	#[display("vertex_counts")]
	VertexCounts,
	#[display("vertices")]
	Vertices,
}

impl BufferKind {
	pub const ALL: [BufferKind; 3] = [
		BufferKind::Colors,
		BufferKind::VertexCounts,
		BufferKind::Vertices,
	];
}

/// What to do when a write would not fit in a buffer's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
	/// Fail with `StrokeError::BufferExhausted` and leave everything untouched.
	#[default]
	Reject,
	/// Double the capacity until the write fits.
	Grow,
}

/// Element capacities of the packed buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacities {
	pub colors: usize,
	pub vertex_counts: usize,
	pub vertices: usize,
}

impl Capacities {
	pub fn get(&self, kind: BufferKind) -> usize {
		match kind {
			BufferKind::Colors => self.colors,
			BufferKind::VertexCounts => self.vertex_counts,
			BufferKind::Vertices => self.vertices,
		}
	}
}

impl Default for Capacities {
	/// 8 KiB of colors, 8 KiB of vertex counts and 64 KiB of vertices.
	fn default() -> Self {
		Self {
			colors: 8192 / std::mem::size_of::<Color>(),
			vertex_counts: 8192 / std::mem::size_of::<u32>(),
			vertices: 65536 / std::mem::size_of::<Point>(),
		}
	}
}

/// Element ranges written since the last call to `BufferPacker::take_pending`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingUploads {
	pub colors: Option<Range<usize>>,
	pub vertex_counts: Option<Range<usize>>,
	pub vertices: Option<Range<usize>>,
}

impl PendingUploads {
	pub fn is_empty(&self) -> bool {
		self.colors.is_none() && self.vertex_counts.is_none() && self.vertices.is_none()
	}

	pub fn get(&self, kind: BufferKind) -> Option<Range<usize>> {
		match kind {
			BufferKind::Colors => self.colors.clone(),
			BufferKind::VertexCounts => self.vertex_counts.clone(),
			BufferKind::Vertices => self.vertices.clone(),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (BufferKind, Range<usize>)> + '_ {
		BufferKind::ALL
			.into_iter()
			.filter_map(|kind| self.get(kind).map(|range| (kind, range)))
	}
}

/// A flat, fixed-capacity array of GPU-ready elements.
#[derive(Debug, Clone)]
pub struct PackedBuffer<T> {
	kind: BufferKind,
	data: Vec<T>,
	capacity: usize,
	dirty: Option<Range<usize>>,
}

impl<T: bytemuck::Pod> PackedBuffer<T> {
	fn new(kind: BufferKind, capacity: usize) -> Self {
		Self {
			kind,
			data: Vec::with_capacity(capacity),
			capacity,
			dirty: None,
		}
	}

	pub fn kind(&self) -> BufferKind {
		self.kind
	}

	/// Number of elements written so far.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn as_slice(&self) -> &[T] {
		&self.data
	}

	pub fn stride() -> u64 {
		std::mem::size_of::<T>() as u64
	}

	pub fn byte_capacity(&self) -> u64 {
		self.capacity as u64 * Self::stride()
	}

	pub fn byte_offset(index: usize) -> u64 {
		index as u64 * Self::stride()
	}

	pub fn bytes(&self, range: Range<usize>) -> &[u8] {
		bytemuck::cast_slice(&self.data[range])
	}

	fn check(&self, required: usize) -> Result<(), StrokeError> {
		if required <= self.capacity {
			return Ok(());
		}
		Err(StrokeError::BufferExhausted {
			buffer: self.kind,
			capacity: self.capacity,
			required,
		})
	}

	/// Capacity this buffer would need under `policy` to hold `required` elements.
	fn planned_capacity(&self, required: usize, policy: OverflowPolicy) -> Result<usize, StrokeError> {
		match policy {
			OverflowPolicy::Reject => self.check(required).map(|()| self.capacity),
			OverflowPolicy::Grow => {
				let mut capacity = self.capacity.max(1);
				while capacity < required {
					capacity *= 2;
				}
				Ok(capacity)
			}
		}
	}

	fn grow_to(&mut self, capacity: usize) {
		if capacity <= self.capacity {
			return;
		}
		tracing::info!(
			buffer = %self.kind,
			from = self.capacity,
			to = capacity,
			"growing packed buffer"
		);
		self.data.reserve_exact(capacity - self.data.len());
		self.capacity = capacity;
	}

	fn write(&mut self, offset: usize, values: &[T]) {
		let end = offset + values.len();
		debug_assert!(end <= self.capacity, "{} overflow", self.kind);
		if end > self.data.len() {
			self.data.resize(end, T::zeroed());
		}
		self.data[offset..end].copy_from_slice(values);
		self.dirty = Some(match self.dirty.take() {
			Some(dirty) => dirty.start.min(offset)..dirty.end.max(end),
			None => offset..end,
		});
	}

	fn take_dirty(&mut self) -> Option<Range<usize>> {
		self.dirty.take()
	}
}

/// The packed contents of one stroke, recovered from the flat buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedStroke<'a> {
	pub color: Color,
	pub vertices: &'a [Point],
}

/// Serializes strokes into the three flat buffers the GPU consumes.
///
/// Every operation only appends vertices or overwrites a single vertex-count slot, so the cost of
/// an update does not depend on how much has been drawn.
#[derive(Debug, Clone)]
pub struct BufferPacker {
	colors: PackedBuffer<Color>,
	vertex_counts: PackedBuffer<u32>,
	vertices: PackedBuffer<Point>,
	total_vertex_count: u32,
	policy: OverflowPolicy,
}

impl BufferPacker {
	pub fn new(capacities: Capacities, policy: OverflowPolicy) -> Self {
		Self {
			colors: PackedBuffer::new(BufferKind::Colors, capacities.colors),
			vertex_counts: PackedBuffer::new(BufferKind::VertexCounts, capacities.vertex_counts),
			vertices: PackedBuffer::new(BufferKind::Vertices, capacities.vertices),
			total_vertex_count: 0,
			policy,
		}
	}

	pub fn policy(&self) -> OverflowPolicy {
		self.policy
	}

	/// Next free slot in the vertex buffer.
	pub fn total_vertex_count(&self) -> u32 {
		self.total_vertex_count
	}

	pub fn colors(&self) -> &PackedBuffer<Color> {
		&self.colors
	}

	pub fn vertex_counts(&self) -> &PackedBuffer<u32> {
		&self.vertex_counts
	}

	pub fn vertices(&self) -> &PackedBuffer<Point> {
		&self.vertices
	}

	pub fn capacities(&self) -> Capacities {
		Capacities {
			colors: self.colors.capacity(),
			vertex_counts: self.vertex_counts.capacity(),
			vertices: self.vertices.capacity(),
		}
	}

	fn required_vertices(&self) -> usize {
		self.total_vertex_count as usize + QUAD_VERTEX_COUNT
	}

	/// Makes room for a stroke that will occupy slot `id`.
	///
	/// Either every buffer fits (possibly after growing) or nothing changes.
	pub fn reserve_stroke(&mut self, id: StrokeId) -> Result<(), StrokeError> {
		let slots = id.index() + 1;
		let colors = self.colors.planned_capacity(slots, self.policy)?;
		let vertex_counts = self.vertex_counts.planned_capacity(slots, self.policy)?;
		let vertices = self
			.vertices
			.planned_capacity(self.required_vertices(), self.policy)?;
		self.colors.grow_to(colors);
		self.vertex_counts.grow_to(vertex_counts);
		self.vertices.grow_to(vertices);
		Ok(())
	}

	/// Makes room for one more quad.
	pub fn reserve_quad(&mut self) -> Result<(), StrokeError> {
		let vertices = self
			.vertices
			.planned_capacity(self.required_vertices(), self.policy)?;
		self.vertices.grow_to(vertices);
		Ok(())
	}

	pub fn on_stroke_begun(
		&mut self,
		id: StrokeId,
		color: Color,
		quad: &[Point; QUAD_VERTEX_COUNT],
	) -> Result<(), StrokeError> {
		self.reserve_stroke(id)?;
		let offset = self.total_vertex_count as usize;
		self.colors.write(id.index(), &[color]);
		self.vertex_counts.write(id.index(), &[QUAD_VERTEX_COUNT as u32]);
		self.vertices.write(offset, quad);
		self.total_vertex_count += QUAD_VERTEX_COUNT as u32;
		Ok(())
	}

	pub fn on_stroke_extended(
		&mut self,
		id: StrokeId,
		new_vertex_count: u32,
		quad: &[Point; QUAD_VERTEX_COUNT],
	) -> Result<(), StrokeError> {
		self.reserve_quad()?;
		let offset = self.total_vertex_count as usize;
		self.vertices.write(offset, quad);
		self.vertex_counts.write(id.index(), &[new_vertex_count]);
		self.total_vertex_count += QUAD_VERTEX_COUNT as u32;
		Ok(())
	}

	/// Returns the ranges written since the previous call and forgets them.
	pub fn take_pending(&mut self) -> PendingUploads {
		PendingUploads {
			colors: self.colors.take_dirty(),
			vertex_counts: self.vertex_counts.take_dirty(),
			vertices: self.vertices.take_dirty(),
		}
	}

	/// Walks the buffers the way the vertex stage does, using only the vertex counts to find
	/// where each stroke's vertices start.
	pub fn replay(&self) -> impl Iterator<Item = PackedStroke<'_>> + '_ {
		let vertices = self.vertices.as_slice();
		let ranges = self
			.vertex_counts
			.as_slice()
			.iter()
			.scan(0usize, |start, &count| {
				let range = *start..*start + count as usize;
				*start = range.end;
				Some(range)
			});
		self
			.colors
			.as_slice()
			.iter()
			.zip_eq(ranges)
			.map(move |(&color, range)| PackedStroke {
				color,
				vertices: &vertices[range],
			})
	}
}
