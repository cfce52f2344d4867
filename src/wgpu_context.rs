#[derive(Clone, Debug, thiserror::Error)]
pub enum WgpuContextError {
	#[error("request adapter error")]
	RequestAdapterError,

	#[error("request device error {0}")]
	RequestDeviceError(String),
}

static_assertions::assert_impl_all!(WgpuContextError: std::error::Error, Send, Sync);

impl From<wgpu::RequestDeviceError> for WgpuContextError {
	fn from(value: wgpu::RequestDeviceError) -> Self {
		WgpuContextError::RequestDeviceError(format!("{}", value))
	}
}

/// The device and queue every GPU-side object in the crate is created from.
#[derive(Debug)]
pub struct WgpuContext {
	instance: wgpu::Instance,
	adapter: wgpu::Adapter,
	device: wgpu::Device,
	queue: wgpu::Queue,
}

impl WgpuContext {
	#[tracing::instrument(err)]
	pub async fn new() -> Result<Self, WgpuContextError> {
		let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
			flags: wgpu::InstanceFlags::from_build_config().with_env(),
			..Default::default()
		});

		let adapter = instance
			.request_adapter(&Default::default())
			.await
			.ok_or(WgpuContextError::RequestAdapterError)?;
		tracing::debug!(adapter = ?adapter.get_info(), "adapter selected");

		// The stroke shader reads its per-stroke data from storage buffers in the vertex stage.
		let (device, queue) = adapter
			.request_device(
				&wgpu::DeviceDescriptor {
					label: Some("brushwork"),
					required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
					..Default::default()
				},
				None,
			)
			.await?;

		Ok(Self {
			instance,
			adapter,
			device,
			queue,
		})
	}

	pub fn instance(&self) -> &wgpu::Instance {
		&self.instance
	}

	pub fn adapter(&self) -> &wgpu::Adapter {
		&self.adapter
	}

	pub fn device(&self) -> &wgpu::Device {
		&self.device
	}

	pub fn queue(&self) -> &wgpu::Queue {
		&self.queue
	}
}
