use std::ops::Range;

use encase::ShaderType;
use glam::Vec2;
use tracing::*;

use super::{binding, render_pipeline, BindingBuffer, Resources};
use crate::color::Color;
use crate::engine::{BufferKind, BufferPacker, Canvas, PackedBuffer, PendingUploads};
use crate::WgpuContext;

/// Scalars shared by every stroke in a frame.
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
pub struct FrameUniforms {
	pub stroke_count: u32,
	pub brightness: f32,
	pub viewport_size: Vec2,
}

/// Everything one frame submission needs from the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
	pub uniforms: FrameUniforms,
	/// Range of the single draw call. Always starts at zero.
	pub vertices: Range<u32>,
	pub clear_color: Color,
	pub uploads: PendingUploads,
}

impl FramePlan {
	/// Snapshots the canvas and claims the packed ranges written since the last frame.
	pub fn new(canvas: &mut Canvas) -> Self {
		Self {
			uniforms: FrameUniforms {
				stroke_count: canvas.stroke_count(),
				brightness: canvas.current_brightness(),
				viewport_size: canvas.viewport_size(),
			},
			vertices: 0..canvas.total_vertex_count(),
			clear_color: canvas.config().clear_color,
			uploads: canvas.take_pending_uploads(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.vertices.is_empty()
	}
}

/// Somewhere a frame can be rendered to and then shown.
pub trait FrameTarget {
	fn texture(&self) -> &wgpu::Texture;
	fn present(self);
}

impl FrameTarget for wgpu::SurfaceTexture {
	fn texture(&self) -> &wgpu::Texture {
		&self.texture
	}

	fn present(self) {
		wgpu::SurfaceTexture::present(self)
	}
}

/// A render target with nothing to present to, for headless rendering.
#[derive(Debug)]
pub struct OffscreenTarget {
	texture: wgpu::Texture,
}

impl OffscreenTarget {
	pub fn new(device: &wgpu::Device, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
		let texture = device.create_texture(&wgpu::TextureDescriptor {
			label: Some("offscreen_target"),
			size: wgpu::Extent3d {
				width,
				height,
				depth_or_array_layers: 1,
			},
			mip_level_count: 1,
			sample_count: 1,
			dimension: wgpu::TextureDimension::D2,
			format,
			usage: wgpu::TextureUsages::RENDER_ATTACHMENT
				| wgpu::TextureUsages::COPY_SRC
				| wgpu::TextureUsages::TEXTURE_BINDING,
			view_formats: &[],
		});
		Self { texture }
	}

	pub fn texture(&self) -> &wgpu::Texture {
		&self.texture
	}
}

impl FrameTarget for &OffscreenTarget {
	fn texture(&self) -> &wgpu::Texture {
		&self.texture
	}

	fn present(self) {}
}

/// GPU copy of one packed buffer.
#[derive(Debug)]
struct GpuBuffer {
	buffer: wgpu::Buffer,
	capacity: usize,
}

impl GpuBuffer {
	fn new<T: bytemuck::Pod>(device: &wgpu::Device, packed: &PackedBuffer<T>) -> Self {
		let label = format!("packed::{}", packed.kind());
		// Zero-sized buffers cannot be bound.
		let size = packed.byte_capacity().max(PackedBuffer::<T>::stride());
		let buffer = device.create_buffer(&wgpu::BufferDescriptor {
			label: Some(&label),
			size,
			usage: wgpu::BufferUsages::STORAGE
				| wgpu::BufferUsages::COPY_DST
				| wgpu::BufferUsages::COPY_SRC,
			mapped_at_creation: false,
		});
		Self {
			buffer,
			capacity: packed.capacity(),
		}
	}

	fn upload_all<T: bytemuck::Pod>(&self, queue: &wgpu::Queue, packed: &PackedBuffer<T>) {
		if !packed.is_empty() {
			queue.write_buffer(&self.buffer, 0, packed.bytes(0..packed.len()));
		}
	}

	/// Brings the GPU copy up to date. Returns whether the buffer had to be reallocated.
	fn sync<T: bytemuck::Pod>(
		&mut self,
		device: &wgpu::Device,
		queue: &wgpu::Queue,
		packed: &PackedBuffer<T>,
		pending: Option<Range<usize>>,
	) -> bool {
		if packed.capacity() != self.capacity {
			info!(
				buffer = %packed.kind(),
				from = self.capacity,
				to = packed.capacity(),
				"reallocating GPU buffer"
			);
			*self = Self::new(device, packed);
			self.upload_all(queue, packed);
			return true;
		}
		if let Some(range) = pending {
			queue.write_buffer(
				&self.buffer,
				PackedBuffer::<T>::byte_offset(range.start),
				packed.bytes(range),
			);
		}
		false
	}
}

fn create_bind_group(
	device: &wgpu::Device,
	resources: &Resources,
	uniforms: &wgpu::Buffer,
	colors: &wgpu::Buffer,
	vertex_counts: &wgpu::Buffer,
	vertices: &wgpu::Buffer,
) -> wgpu::BindGroup {
	device.create_bind_group(&wgpu::BindGroupDescriptor {
		label: Some("stroke"),
		layout: &resources.stroke_bind_group_layout,
		entries: &[
			wgpu::BindGroupEntry {
				binding: binding::UNIFORMS,
				resource: uniforms.as_entire_binding(),
			},
			wgpu::BindGroupEntry {
				binding: binding::COLORS,
				resource: colors.as_entire_binding(),
			},
			wgpu::BindGroupEntry {
				binding: binding::VERTEX_COUNTS,
				resource: vertex_counts.as_entire_binding(),
			},
			wgpu::BindGroupEntry {
				binding: binding::VERTICES,
				resource: vertices.as_entire_binding(),
			},
		],
	})
}

fn create_pipeline(
	device: &wgpu::Device,
	resources: &Resources,
	texture_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
	let module = &resources.stroke_shader_module;
	render_pipeline()
		.label("stroke")
		.layout(&resources.stroke_pipeline_layout)
		.vertex(wgpu::VertexState {
			module,
			entry_point: "vs_main",
			compilation_options: Default::default(),
			buffers: &[],
		})
		.fragment(wgpu::FragmentState {
			module,
			entry_point: "fs_main",
			compilation_options: Default::default(),
			targets: &[Some(wgpu::ColorTargetState {
				format: texture_format,
				blend: Some(wgpu::BlendState::ALPHA_BLENDING),
				write_mask: wgpu::ColorWrites::ALL,
			})],
		})
		.create(device)
}

/// Draws the whole stroke history of a `Canvas` with one draw call per frame.
#[derive(Debug)]
pub struct StrokeRenderer {
	resources: Resources,
	pipeline: wgpu::RenderPipeline,
	uniforms: BindingBuffer<FrameUniforms>,
	colors: GpuBuffer,
	vertex_counts: GpuBuffer,
	vertices: GpuBuffer,
	bind_group: wgpu::BindGroup,
}

impl StrokeRenderer {
	pub fn new(
		device: &wgpu::Device,
		queue: &wgpu::Queue,
		resources: &Resources,
		texture_format: wgpu::TextureFormat,
		packer: &BufferPacker,
	) -> Self {
		let pipeline = create_pipeline(device, resources, texture_format);
		let uniforms = BindingBuffer::new_sized().label("frame_uniforms").create(device);
		let colors = GpuBuffer::new(device, packer.colors());
		let vertex_counts = GpuBuffer::new(device, packer.vertex_counts());
		let vertices = GpuBuffer::new(device, packer.vertices());
		colors.upload_all(queue, packer.colors());
		vertex_counts.upload_all(queue, packer.vertex_counts());
		vertices.upload_all(queue, packer.vertices());
		let bind_group = create_bind_group(
			device,
			resources,
			&uniforms,
			&colors.buffer,
			&vertex_counts.buffer,
			&vertices.buffer,
		);
		Self {
			resources: resources.clone(),
			pipeline,
			uniforms,
			colors,
			vertex_counts,
			vertices,
			bind_group,
		}
	}

	pub fn buffer(&self, kind: BufferKind) -> &wgpu::Buffer {
		match kind {
			BufferKind::Colors => &self.colors.buffer,
			BufferKind::VertexCounts => &self.vertex_counts.buffer,
			BufferKind::Vertices => &self.vertices.buffer,
		}
	}

	/// Writes the plan's pending ranges and uniforms to the GPU.
	pub fn prepare(
		&mut self,
		device: &wgpu::Device,
		queue: &wgpu::Queue,
		packer: &BufferPacker,
		plan: &FramePlan,
	) {
		let uploads = &plan.uploads;
		let reallocated = [
			self.colors.sync(device, queue, packer.colors(), uploads.colors.clone()),
			self
				.vertex_counts
				.sync(device, queue, packer.vertex_counts(), uploads.vertex_counts.clone()),
			self.vertices.sync(device, queue, packer.vertices(), uploads.vertices.clone()),
		];
		if reallocated.contains(&true) {
			self.bind_group = create_bind_group(
				device,
				&self.resources,
				&self.uniforms,
				&self.colors.buffer,
				&self.vertex_counts.buffer,
				&self.vertices.buffer,
			);
		}
		self.uniforms.write(queue, plan.uniforms);
	}

	/// Records the frame's single render pass.
	pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::Texture, plan: &FramePlan) {
		let view = target.create_view(&Default::default());
		let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
			label: Some("stroke"),
			color_attachments: &[Some(wgpu::RenderPassColorAttachment {
				view: &view,
				resolve_target: None,
				ops: wgpu::Operations {
					load: wgpu::LoadOp::Clear(plan.clear_color.into()),
					store: wgpu::StoreOp::Store,
				},
			})],
			..Default::default()
		});
		render_pass.set_pipeline(&self.pipeline);
		render_pass.set_bind_group(0, &self.bind_group, &[]);
		let viewport = plan.uniforms.viewport_size;
		if viewport.x > 0.0 && viewport.y > 0.0 {
			let width = viewport.x.min(target.width() as f32);
			let height = viewport.y.min(target.height() as f32);
			render_pass.set_viewport(0.0, 0.0, width, height, 0.0, 1.0);
		}
		render_pass.draw(plan.vertices.clone(), 0..1);
	}

	/// Uploads, draws and presents one frame of `canvas`. Does not wait for the GPU.
	#[instrument(level = "trace", skip_all)]
	pub fn submit(
		&mut self,
		context: &WgpuContext,
		canvas: &mut Canvas,
		target: impl FrameTarget,
	) -> FramePlan {
		let plan = FramePlan::new(canvas);
		self.prepare(context.device(), context.queue(), canvas.packer(), &plan);

		let mut encoder = context
			.device()
			.create_command_encoder(&wgpu::CommandEncoderDescriptor {
				label: Some("stroke_frame"),
			});
		self.encode(&mut encoder, target.texture(), &plan);
		context.queue().submit([encoder.finish()]);
		target.present();

		trace!(
			stroke_count = plan.uniforms.stroke_count,
			vertex_count = plan.vertices.end,
			"frame submitted"
		);
		plan
	}
}
