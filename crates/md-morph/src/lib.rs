//! Grayscale opening and closing by decomposed structuring elements.
//!
//! Two replay modes share the same partitions:
//! - Cascade ([`Replayer::cascade_opening`], [`Replayer::cascade_closing`]):
//!   opens or closes the image by each partition in queue order. Cheap, but
//!   only equal to filtering by the whole element for a single partition.
//! - Exact ([`Replayer::opening`], [`Replayer::closing`]): erodes by every
//!   partition separately and takes the pointwise minimum (maximum for
//!   dilation), which is erosion by the union of the footprints.
//!
//! [`direct`] holds the per-offset reference used to check both.
//!
//! Inputs must be single-channel. Samples are treated as grayscale; binary
//! images (0/255) stay binary.

pub mod direct;
mod replay;
mod sparse;

pub use direct::{closing_direct, dilate_direct, erode_direct, opening_direct, se_offsets};
pub use replay::Replayer;
pub use sparse::sparse_pass;
