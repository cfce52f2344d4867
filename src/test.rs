use crate::*;
use std::ops::Deref;
use std::rc::Rc;

/// A GPU context for tests. Tests that need one skip themselves when no adapter is available.
pub struct WgpuTestContext {
	context: Rc<WgpuContext>,
}

impl Deref for WgpuTestContext {
	type Target = Rc<WgpuContext>;
	fn deref(&self) -> &Rc<WgpuContext> {
		&self.context
	}
}

impl WgpuTestContext {
	pub fn barrier(&self) {
		self
			.device()
			.poll(wgpu::Maintain::wait())
			.panic_on_timeout()
	}

	pub fn new() -> Result<Self, WgpuContextError> {
		let context = pollster::block_on(WgpuContext::new())?;
		Ok(Self {
			context: Rc::new(context),
		})
	}

	pub fn try_new() -> Option<Self> {
		Self::new()
			.inspect_err(|error| tracing::warn!(%error, "skipping GPU test"))
			.ok()
	}

	pub fn get_buffer_data(&self, buffer: &wgpu::Buffer) -> Vec<u8> {
		let device = self.device();
		let staging = device.create_buffer(&wgpu::BufferDescriptor {
			label: Some("test::staging"),
			size: buffer.size(),
			usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
			mapped_at_creation: false,
		});
		let mut encoder = device.create_command_encoder(&Default::default());
		encoder.copy_buffer_to_buffer(buffer, 0, &staging, 0, buffer.size());
		self.queue().submit([encoder.finish()]);

		let slice = staging.slice(..);
		slice.map_async(wgpu::MapMode::Read, |_| ());
		self.barrier();
		let data = slice.get_mapped_range().to_vec();
		data
	}

	pub fn get_texture_data(&self, texture: &wgpu::Texture) -> Vec<u8> {
		let aspect = wgpu::TextureAspect::All;
		let (block_width, block_height) = texture.format().block_dimensions();
		let bytes_per_row =
			texture.format().block_copy_size(Some(aspect)).unwrap() * (texture.width() / block_width);
		let rows_per_image = texture.height() / block_height;
		let row_stride = wgpu::util::align_to(bytes_per_row, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);

		let device = self.device();
		let buffer = device.create_buffer(&wgpu::BufferDescriptor {
			label: None,
			size: (row_stride * texture.height()) as wgpu::BufferAddress,
			usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
			mapped_at_creation: false,
		});
		let mut encoder = device.create_command_encoder(&Default::default());
		let mip_level = 0;
		encoder.copy_texture_to_buffer(
			wgpu::ImageCopyTexture {
				texture,
				mip_level,
				origin: wgpu::Origin3d::ZERO,
				aspect,
			},
			wgpu::ImageCopyBuffer {
				buffer: &buffer,
				layout: wgpu::ImageDataLayout {
					offset: 0,
					bytes_per_row: Some(row_stride),
					rows_per_image: Some(rows_per_image),
				},
			},
			texture
				.size()
				.mip_level_size(mip_level, texture.dimension()),
		);
		self.queue().submit([encoder.finish()]);

		let slice = buffer.slice(..);
		slice.map_async(wgpu::MapMode::Read, |_| ());
		self.barrier();
		let data = slice.get_mapped_range();
		let pixels = data
			.chunks_exact(row_stride as usize)
			.flat_map(|row| &row[..bytes_per_row as usize])
			.copied()
			.collect();
		pixels
	}
}
