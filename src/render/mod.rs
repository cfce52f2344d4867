mod resources;
pub use resources::*;

mod frame;
pub use frame::*;

use std::{borrow::Borrow, num::NonZero, ops::Deref};

use bon::{bon, builder};

use crate::util::ResultExt;

#[builder(finish_fn = create)]
pub fn render_pipeline<'a>(
	#[builder(finish_fn)] device: &wgpu::Device,
	label: Option<&str>,
	layout: Option<&wgpu::PipelineLayout>,
	vertex: wgpu::VertexState<'a>,
	fragment: Option<wgpu::FragmentState<'a>>,
	#[builder(default = wgpu::PrimitiveTopology::TriangleList)] topology: wgpu::PrimitiveTopology,
	depth_stencil: Option<wgpu::DepthStencilState>,
	#[builder(default)] multisample: wgpu::MultisampleState,
	multiview: Option<NonZero<u32>>,
	cache: Option<&wgpu::PipelineCache>,
) -> wgpu::RenderPipeline {
	device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
		label,
		layout,
		vertex,
		fragment,
		primitive: wgpu::PrimitiveState {
			topology,
			strip_index_format: None,
			front_face: wgpu::FrontFace::Ccw,
			cull_mode: None,
			polygon_mode: wgpu::PolygonMode::Fill,
			unclipped_depth: false,
			conservative: false,
		},
		depth_stencil,
		multisample,
		multiview,
		cache,
	})
}

/// Thin wrapper around a `wgpu::Buffer` that stores the a type `T` in a format suitable for binding
/// to a uniform.
pub struct BindingBuffer<T: ?Sized> {
	buffer: wgpu::Buffer,
	_t: std::marker::PhantomData<T>,
}

impl<T: ?Sized> Deref for BindingBuffer<T> {
	type Target = wgpu::Buffer;
	fn deref(&self) -> &Self::Target {
		&self.buffer
	}
}

impl<T: ?Sized> std::fmt::Debug for BindingBuffer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("BindingBuffer").field(&self.buffer).finish()
	}
}

impl<T: ?Sized> BindingBuffer<T> {
	/// Returns the underlying `wgpu::Buffer`.
	pub fn into_raw(self) -> wgpu::Buffer {
		self.buffer
	}

	fn from_buffer(buffer: wgpu::Buffer) -> Self {
		Self {
			buffer,
			_t: Default::default(),
		}
	}

	fn default_usages() -> wgpu::BufferUsages {
		wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC | wgpu::BufferUsages::UNIFORM
	}
}

#[bon]
impl<T: encase::ShaderSize + encase::internal::WriteInto> BindingBuffer<T> {
	fn value_to_data(value: &T) -> impl Borrow<[u8]> {
		let data = Vec::<u8>::with_capacity(T::SHADER_SIZE.get() as usize);
		let mut data = encase::UniformBuffer::new(data);
		data.write(value).ok_or_log();
		data.into_inner()
	}

	/// Builds an uninitialized buffer for a type which implements `encase::ShaderSize`.
	#[builder(finish_fn = "create")]
	pub fn new_sized(
		#[builder(finish_fn)] device: &wgpu::Device,
		label: Option<&str>,
		usage: Option<wgpu::BufferUsages>,
	) -> Self {
		let usage = usage.unwrap_or(Self::default_usages());
		let buffer = device.create_buffer(&wgpu::BufferDescriptor {
			label,
			size: T::SHADER_SIZE.get(),
			usage,
			mapped_at_creation: false,
		});
		Self::from_buffer(buffer)
	}

	/// Writes the given `value` to the buffer.
	pub fn write(&self, queue: &wgpu::Queue, value: impl Borrow<T>) {
		queue.write_buffer(
			&self.buffer,
			0,
			Self::value_to_data(value.borrow()).borrow(),
		)
	}
}
