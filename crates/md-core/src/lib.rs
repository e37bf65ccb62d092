//! Foundational types for decomposed morphology.
//!
//! ## Pixel Buffers
//! [`PixelBuffer`] is an owned, row-major `u8` raster. Channels are
//! interleaved; the morphology crates only accept single-channel buffers and
//! report [`Error::UnsupportedChannels`] otherwise.
//!
//! ## Fill Policy
//! Every read outside a buffer goes through [`read_or`] or
//! [`PixelBuffer::get_or`] and yields the fill value for the operator, which
//! defaults to its identity (255 for erosion, 0 for dilation). Out-of-bounds
//! positions therefore never influence a min/max.
//!
//! ## Codec
//! [`codec`] converts between encoded images and [`PixelBuffer`]s.

mod border;
mod buffer;
pub mod codec;
mod error;

pub use border::{FillValues, MorphOp, read_or};
pub use buffer::PixelBuffer;
pub use error::{Error, Result};
