use thiserror::Error;

/// Straight RGBA color as it is laid out in the per-stroke color buffer.
///
/// Channels are conventionally in `[0, 1]` but are never clamped.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
	pub red: f32,
	pub green: f32,
	pub blue: f32,
	pub alpha: f32,
}

static_assertions::assert_eq_size!(Color, [f32; 4]);

#[derive(Debug, Clone, Error)]
#[error("invalid color {input:?}: {reason}")]
pub struct ColorParseError {
	input: String,
	reason: String,
}

static_assertions::assert_impl_all!(ColorParseError: std::error::Error, Send, Sync);

impl Color {
	pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
	pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
	pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);
	pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
	pub const PINK: Color = Color::new(1.0, 0.0, 1.0, 1.0);
	pub const CYAN: Color = Color::new(0.0, 1.0, 1.0, 1.0);
	pub const GRAY: Color = Color::new(0.5, 0.5, 0.5, 1.0);

	pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
		Self {
			red,
			green,
			blue,
			alpha,
		}
	}

	pub const fn from_array([red, green, blue, alpha]: [f32; 4]) -> Self {
		Self::new(red, green, blue, alpha)
	}

	pub const fn to_array(self) -> [f32; 4] {
		[self.red, self.green, self.blue, self.alpha]
	}

	/// Parses any CSS color string, e.g. `"#ff00ff"`, `"cyan"` or `"rgb(0 0 255)"`.
	pub fn parse(input: &str) -> Result<Self, ColorParseError> {
		let color = csscolorparser::parse(input).map_err(|error| ColorParseError {
			input: input.to_owned(),
			reason: error.to_string(),
		})?;
		let [red, green, blue, alpha] = color.to_array();
		Ok(Self::new(red as f32, green as f32, blue as f32, alpha as f32))
	}
}

impl std::str::FromStr for Color {
	type Err = ColorParseError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Color::parse(s)
	}
}

impl From<Color> for wgpu::Color {
	fn from(value: Color) -> Self {
		wgpu::Color {
			r: value.red as f64,
			g: value.green as f64,
			b: value.blue as f64,
			a: value.alpha as f64,
		}
	}
}

impl From<Color> for glam::Vec4 {
	fn from(value: Color) -> Self {
		glam::Vec4::from_array(value.to_array())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn palette() {
		assert_eq!(Color::BLACK.to_array(), [0.0, 0.0, 0.0, 1.0]);
		assert_eq!(Color::PINK.to_array(), [1.0, 0.0, 1.0, 1.0]);
		assert_eq!(Color::GRAY.to_array(), [0.5, 0.5, 0.5, 1.0]);
	}

	#[test]
	fn parse() -> anyhow::Result<()> {
		assert_eq!(Color::parse("#0000ff")?, Color::BLUE);
		assert_eq!("cyan".parse::<Color>()?, Color::CYAN);
		let translucent = Color::parse("rgba(255, 255, 255, 0.5)")?;
		approx::assert_abs_diff_eq!(translucent.alpha, 0.5, epsilon = 1e-3);
		Ok(())
	}

	#[test]
	fn parse_error() {
		let error = Color::parse("not-a-color").unwrap_err();
		assert!(error.to_string().contains("not-a-color"));
	}

	#[test]
	fn byte_layout() {
		let bytes: &[u8] = bytemuck::bytes_of(&Color::GREEN);
		assert_eq!(bytes.len(), 16);
		assert_eq!(bytemuck::cast_slice::<u8, f32>(bytes), &[0.0, 1.0, 0.0, 1.0]);
	}

	#[test]
	fn unclamped() {
		let color = Color::new(2.0, -1.0, 0.5, 3.0);
		assert_eq!(wgpu::Color::from(color).r, 2.0);
		assert_eq!(glam::Vec4::from(color).y, -1.0);
	}
}
