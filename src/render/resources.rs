use std::rc::Rc;

/// Bind group slots of the stroke shader.
pub mod binding {
	pub const UNIFORMS: u32 = 0;
	pub const COLORS: u32 = 1;
	pub const VERTEX_COUNTS: u32 = 2;
	pub const VERTICES: u32 = 3;
}

fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
	wgpu::BindGroupLayoutEntry {
		binding,
		visibility: wgpu::ShaderStages::VERTEX,
		ty: wgpu::BindingType::Buffer {
			ty: wgpu::BufferBindingType::Storage { read_only: true },
			has_dynamic_offset: false,
			min_binding_size: None,
		},
		count: None,
	}
}

/// Resources that only need to be loaded once for a given device.
#[derive(Debug, Clone)]
pub struct Resources {
	pub stroke_shader_module: Rc<wgpu::ShaderModule>,
	pub stroke_bind_group_layout: Rc<wgpu::BindGroupLayout>,
	pub stroke_pipeline_layout: Rc<wgpu::PipelineLayout>,
}

impl Resources {
	pub fn new(device: &wgpu::Device) -> Self {
		let stroke_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
			label: Some("stroke"),
			entries: &[
				wgpu::BindGroupLayoutEntry {
					binding: binding::UNIFORMS,
					visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
					ty: wgpu::BindingType::Buffer {
						ty: wgpu::BufferBindingType::Uniform,
						has_dynamic_offset: false,
						min_binding_size: None,
					},
					count: None,
				},
				storage_entry(binding::COLORS),
				storage_entry(binding::VERTEX_COUNTS),
				storage_entry(binding::VERTICES),
			],
		});
		let stroke_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
			label: Some("stroke"),
			bind_group_layouts: &[&stroke_bind_group_layout],
			push_constant_ranges: &[],
		});
		Resources {
			stroke_shader_module: Rc::new(
				device.create_shader_module(wgpu::include_wgsl!("../shaders/stroke.wgsl")),
			),
			stroke_bind_group_layout: Rc::new(stroke_bind_group_layout),
			stroke_pipeline_layout: Rc::new(stroke_pipeline_layout),
		}
	}
}
