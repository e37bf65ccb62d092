use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("out of bounds")]
    OutOfBounds,
    #[error("invalid window size {size} for a line of length {len} (must be odd, 3..=len)")]
    InvalidWindow { size: usize, len: usize },
    #[error(
        "non-symmetric structuring element: top run {top}, bottom run {bottom}, \
         left run {left}, right run {right}"
    )]
    NonSymmetricShape {
        top: usize,
        bottom: usize,
        left: usize,
        right: usize,
    },
    #[error("structuring element must have odd dimensions, got {width}x{height}")]
    EvenShape { width: usize, height: usize },
    #[error("structuring element has no foreground pixels")]
    EmptyShape,
    #[error(
        "partitions do not reproduce the structuring element \
         ({missing} pixels missing, {extra} pixels extra)"
    )]
    InexactDecomposition { missing: usize, extra: usize },
    #[error("expected a single-channel buffer, got {0} channels")]
    UnsupportedChannels(usize),
    #[error("failed to allocate {bytes} bytes")]
    AllocationFailure {
        bytes: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
    #[error("failed to decode image")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode image")]
    Encode(#[source] image::ImageError),
    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
