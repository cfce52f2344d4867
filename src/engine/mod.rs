mod stroke;
pub use stroke::*;

mod packer;
pub use packer::*;

mod canvas;
pub use canvas::*;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StrokeError {
	#[error("no active stroke to extend")]
	NoActiveStroke,

	#[error("{buffer} buffer exhausted: {required} elements needed, capacity is {capacity}")]
	BufferExhausted {
		buffer: BufferKind,
		capacity: usize,
		required: usize,
	},
}

static_assertions::assert_impl_all!(StrokeError: std::error::Error, Send, Sync);
