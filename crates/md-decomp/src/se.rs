use md_core::{Error, PixelBuffer, Result};

/// `(2r+1) x (2r+1)` element set where the distance to the centre is below
/// `radius`. Radius 0 and 1 both give the single centre pixel.
pub fn disc_se(radius: usize) -> PixelBuffer {
    let size = 2 * radius + 1;
    let r = radius as f64;
    let mut se = PixelBuffer::new_fill(size, size, 0);
    for y in 0..size {
        let dy = y as f64 - r;
        for (x, px) in se.row_mut(y).iter_mut().enumerate() {
            let dx = x as f64 - r;
            if dy.hypot(dx) < r || (dx == 0.0 && dy == 0.0) {
                *px = u8::MAX;
            }
        }
    }
    se
}

/// Full `width x height` rectangle. Both sides must be odd.
pub fn rect_se(width: usize, height: usize) -> PixelBuffer {
    PixelBuffer::new_fill(width, height, u8::MAX)
}

/// Diamond (L1 ball) of the given radius.
pub fn diamond_se(radius: usize) -> PixelBuffer {
    let size = 2 * radius + 1;
    let mut se = PixelBuffer::new_fill(size, size, 0);
    for y in 0..size {
        for (x, px) in se.row_mut(y).iter_mut().enumerate() {
            if y.abs_diff(radius) + x.abs_diff(radius) <= radius {
                *px = u8::MAX;
            }
        }
    }
    se
}

/// Builds an element from any single-channel buffer, treating non-zero
/// samples as foreground.
pub fn se_from_buffer(buf: &PixelBuffer) -> Result<PixelBuffer> {
    buf.ensure_single_channel()?;
    if buf.width() % 2 == 0 || buf.height() % 2 == 0 {
        return Err(Error::EvenShape {
            width: buf.width(),
            height: buf.height(),
        });
    }
    Ok(buf.to_binary(1))
}
