use brushwork::engine::*;
use brushwork::geom::{quad_for, Point};
use brushwork::Color;

#[test]
fn two_strokes() -> anyhow::Result<()> {
	let mut canvas = Canvas::default();
	canvas.set_viewport_size(800.0, 600.0);
	assert!(canvas.take_redraw_request());

	let first = canvas.begin_stroke(Point::new(10.0, 10.0))?;
	assert_eq!(first, StrokeId(0));
	assert_eq!(canvas.extend_stroke(Point::new(12.0, 10.0))?, first);
	canvas.set_current_color(Color::BLUE);
	let second = canvas.begin_stroke(Point::new(50.0, 50.0))?;
	assert_eq!(second, StrokeId(1));
	assert!(canvas.take_redraw_request());
	assert!(!canvas.take_redraw_request());

	assert_eq!(canvas.stroke_count(), 2);
	assert_eq!(canvas.total_vertex_count(), 18);

	let packer = canvas.packer();
	assert_eq!(packer.colors().as_slice(), &[Color::BLACK, Color::BLUE]);
	assert_eq!(packer.vertex_counts().as_slice(), &[12, 6]);
	let expected: Vec<Point> = [(10.0, 10.0), (12.0, 10.0), (50.0, 50.0)]
		.into_iter()
		.flat_map(|(x, y)| quad_for(Point::new(x, y)))
		.collect();
	assert_eq!(packer.vertices().as_slice(), expected.as_slice());

	let strokes: Vec<_> = packer.replay().collect();
	assert_eq!(strokes.len(), 2);
	assert_eq!(strokes[0].color, Color::BLACK);
	assert_eq!(strokes[0].vertices, &expected[..12]);
	assert_eq!(strokes[1].vertices, &expected[12..]);
	Ok(())
}

#[test]
fn extend_needs_an_active_stroke() -> anyhow::Result<()> {
	let mut canvas = Canvas::default();
	assert_eq!(
		canvas.extend_stroke(Point::new(1.0, 1.0)),
		Err(StrokeError::NoActiveStroke)
	);
	assert_eq!(canvas.total_vertex_count(), 0);

	canvas.begin_stroke(Point::new(1.0, 1.0))?;
	assert_eq!(canvas.end_stroke(), Some(StrokeId(0)));
	assert_eq!(
		canvas.extend_stroke(Point::new(2.0, 1.0)),
		Err(StrokeError::NoActiveStroke)
	);
	assert_eq!(canvas.total_vertex_count(), 6);
	Ok(())
}

#[test]
fn full_canvas_rejects_new_strokes() -> anyhow::Result<()> {
	let config = CanvasConfig::builder()
		.capacities(Capacities {
			colors: 1,
			vertex_counts: 1,
			vertices: 6,
		})
		.build();
	let mut canvas = Canvas::new(config);
	canvas.begin_stroke(Point::new(1.0, 1.0))?;
	let error = canvas.begin_stroke(Point::new(2.0, 2.0)).unwrap_err();
	assert!(matches!(error, StrokeError::BufferExhausted { .. }));
	assert_eq!(canvas.stroke_count(), 1);
	assert_eq!(canvas.total_vertex_count(), 6);
	Ok(())
}
