//! Decomposition of point-symmetric binary structuring elements.
//!
//! A [`Partition`] stands for the union of four `width x height` rectangles
//! (its [`CubicFactor`]) centred at the taps of its [`SparseFactor`]:
//! `(-top, 0)`, `(bottom, 0)`, `(0, -left)` and `(0, right)` relative to the
//! element centre. Replaying one partition costs two sliding-window passes
//! and a four-tap pass, whatever the element size.
//!
//! [`decompose`] peels an element from the outside in:
//! - [`ShapeAnalyzer`] reads the first run from each edge and the midline
//!   extents of the residual, and derives the partition whose arms touch the
//!   residual's boundary.
//! - The outermost runs are cleared in the order top, left, bottom, right.
//! - The loop ends when the residual is empty or fully covered by a partition
//!   with sparse offsets of at most 1.
//!
//! The union of the resulting footprints is checked against the input, so a
//! returned [`PartitionQueue`] always reproduces the element exactly.

mod decompose;
mod partition;
mod se;
mod shape;

pub use decompose::{decompose, footprint_union, remove_partition};
pub use partition::{CubicFactor, Partition, PartitionQueue, SparseFactor};
pub use se::{diamond_se, disc_se, rect_se, se_from_buffer};
pub use shape::{Coordinate, Edge, EdgeRuns, RunLength, ShapeAnalyzer, clear_run, scan_run};
