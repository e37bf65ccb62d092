//! Sliding-window minimum and maximum in constant time per pixel.
//!
//! A window of odd size `s` centered on `u` covers `u - s/2 ..= u + s/2`.
//! Positions outside the line read the operator's fill value, so with the
//! default fills only in-bounds samples contribute.
//!
//! Kernels:
//! - `s == 1`: copy.
//! - `s == 3`: direct three-tap comparison.
//! - otherwise: Van Herk/Gil-Werman with per-block forward and backward
//!   running extrema, at most three comparisons per sample regardless of `s`.
//!
//! [`WindowEngine`] applies the kernels to every row or every column of a
//! [`md_core::PixelBuffer`] on a fixed rayon pool.

mod line;
mod pass;

pub use line::{LineScratch, apply_line, apply_line_into, dilate_line, erode_line, validate_window};
pub use pass::{Axis, EngineConfig, WindowEngine, line_chunks};
