use md_core::{MorphOp, PixelBuffer, Result};
use md_decomp::SparseFactor;
use md_window::WindowEngine;
use rayon::prelude::*;

/// `out(x, y) = op` over the four taps of `sparse` around `(x, y)`.
///
/// Taps outside the buffer read the engine's fill for `op`. An identity
/// factor leaves the buffer untouched.
pub fn sparse_pass(
    engine: &WindowEngine,
    buf: &mut PixelBuffer,
    op: MorphOp,
    sparse: &SparseFactor,
) -> Result<()> {
    buf.ensure_single_channel()?;
    if sparse.is_identity() || buf.is_empty() {
        return Ok(());
    }

    let fill = engine.fill(op);
    let taps = sparse.taps();
    let width = buf.width();
    let src = buf.clone();

    engine.install(|| {
        buf.data_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as isize;
                for (x, out) in row.iter_mut().enumerate() {
                    let x = x as isize;
                    *out = taps.iter().fold(op.identity(), |acc, &(dy, dx)| {
                        op.combine(acc, src.get_or(x + dx, y + dy, fill))
                    });
                }
            });
    });
    Ok(())
}
