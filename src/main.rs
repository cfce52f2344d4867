use brushwork::geom::Point;
use brushwork::*;

#[derive(thiserror::Error, Debug)]
#[error("no global tracing subscriber set")]
struct NoTracingSubscriber;

fn configure_tracing() -> anyhow::Result<()> {
	let max_level = if cfg!(debug_assertions) {
		tracing::Level::TRACE
	} else {
		tracing::Level::INFO
	};
	tracing::subscriber::set_global_default(
		tracing_subscriber::FmtSubscriber::builder()
			.with_max_level(max_level)
			.finish(),
	)
	.map_err(|_| NoTracingSubscriber)?;
	Ok(())
}

fn configure_logging() -> anyhow::Result<()> {
	configure_tracing()?;

	// Redirect `log` (wgpu logs through it) to `tracing`.
	#[cfg(feature = "log")]
	tracing_log::LogTracer::init()?;

	Ok(())
}

const VIEWPORT: (u32, u32) = (320, 240);

/// A short drag: two strokes, the second in a different color.
fn scripted_drag(canvas: &mut Canvas, accent: Color) -> Result<(), StrokeError> {
	canvas.begin_stroke(Point::new(40.0, 120.0))?;
	for step in 1..=60 {
		let t = step as f32 / 60.0;
		canvas.extend_stroke(Point::new(40.0 + 240.0 * t, 120.0 + 60.0 * (t * 6.0).sin()))?;
	}
	canvas.end_stroke();

	canvas.set_current_color(accent);
	canvas.begin_stroke(Point::new(160.0, 40.0))?;
	for step in 1..=40 {
		canvas.extend_stroke(Point::new(160.0, 40.0 + 4.0 * step as f32))?;
	}
	canvas.end_stroke();
	Ok(())
}

fn run() -> anyhow::Result<()> {
	let accent = match std::env::args().nth(1) {
		Some(input) => input.parse()?,
		None => Color::BLUE,
	};

	let context = pollster::block_on(WgpuContext::new())?;
	let device = context.device();
	let format = wgpu::TextureFormat::Rgba8Unorm;

	let mut canvas = Canvas::default();
	canvas.set_viewport_size(VIEWPORT.0 as f32, VIEWPORT.1 as f32);
	let resources = Resources::new(device);
	let mut renderer = StrokeRenderer::new(device, context.queue(), &resources, format, canvas.packer());
	let target = OffscreenTarget::new(device, VIEWPORT.0, VIEWPORT.1, format);

	scripted_drag(&mut canvas, accent)?;
	if canvas.take_redraw_request() {
		let plan = renderer.submit(&context, &mut canvas, &target);
		tracing::info!(
			strokes = plan.uniforms.stroke_count,
			vertices = plan.vertices.end,
			uploads = ?plan.uploads,
			"frame submitted"
		);
	}
	Ok(())
}

fn main() {
	if let Err(error) = configure_logging() {
		// We can technically continue without logging.
		eprintln!("{error}");
	}

	if let Err(error) = run() {
		tracing::error!(error = error.to_string(), "brushwork failed");
		std::process::exit(1);
	}
}
