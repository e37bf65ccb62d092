//! Umbrella crate for the `morph-decomp` workspace.
//!
//! Re-exports the pixel buffer and codec (`md-core`), the sliding-window
//! engine (`md-window`), structuring-element decomposition (`md-decomp`) and
//! the replay and reference morphology (`md-morph`).

pub use md_core::*;
pub use md_decomp::*;
pub use md_morph::*;
pub use md_window::*;
