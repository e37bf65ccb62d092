//! Reference morphology applying every structuring-element offset per pixel.

use md_core::{MorphOp, PixelBuffer, Result};
use rayon::prelude::*;

/// `(row, col)` offsets of the foreground pixels of `se`, relative to its
/// centre `(height / 2, width / 2)`.
pub fn se_offsets(se: &PixelBuffer) -> Result<Vec<(isize, isize)>> {
    se.ensure_single_channel()?;
    let cy = (se.height() / 2) as isize;
    let cx = (se.width() / 2) as isize;

    let mut out = Vec::with_capacity(se.foreground_count());
    for y in 0..se.height() {
        for (x, &v) in se.row(y).iter().enumerate() {
            if v != 0 {
                out.push((y as isize - cy, x as isize - cx));
            }
        }
    }
    Ok(out)
}

fn apply(img: &PixelBuffer, offsets: &[(isize, isize)], op: MorphOp) -> Result<PixelBuffer> {
    img.ensure_single_channel()?;
    let (width, height) = (img.width() as isize, img.height() as isize);
    let mut out = PixelBuffer::try_new_fill(img.width(), img.height(), op.identity())?;
    if img.is_empty() {
        return Ok(out);
    }

    out.data_mut()
        .par_chunks_mut(img.width())
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as isize;
            for (x, o) in row.iter_mut().enumerate() {
                let x = x as isize;
                let mut acc = op.identity();
                for &(dy, dx) in offsets {
                    let (sy, sx) = (y + dy, x + dx);
                    if (0..height).contains(&sy) && (0..width).contains(&sx) {
                        acc = op.combine(acc, img.data()[(sy * width + sx) as usize]);
                    }
                }
                *o = acc;
            }
        });
    Ok(out)
}

pub fn erode_direct(img: &PixelBuffer, se: &PixelBuffer) -> Result<PixelBuffer> {
    apply(img, &se_offsets(se)?, MorphOp::Erode)
}

/// Dilation by the reflected element.
pub fn dilate_direct(img: &PixelBuffer, se: &PixelBuffer) -> Result<PixelBuffer> {
    let reflected: Vec<_> = se_offsets(se)?
        .into_iter()
        .map(|(dy, dx)| (-dy, -dx))
        .collect();
    apply(img, &reflected, MorphOp::Dilate)
}

pub fn opening_direct(img: &PixelBuffer, se: &PixelBuffer) -> Result<PixelBuffer> {
    dilate_direct(&erode_direct(img, se)?, se)
}

pub fn closing_direct(img: &PixelBuffer, se: &PixelBuffer) -> Result<PixelBuffer> {
    erode_direct(&dilate_direct(img, se)?, se)
}

#[cfg(test)]
mod tests {
    use md_core::PixelBuffer;

    use super::{closing_direct, dilate_direct, erode_direct, opening_direct, se_offsets};

    fn binary(width: usize, height: usize, rows: &[&str]) -> PixelBuffer {
        let data = rows
            .iter()
            .flat_map(|r| r.bytes().map(|b| if b == b'#' { 255 } else { 0 }))
            .collect();
        PixelBuffer::from_vec(width, height, 1, data).expect("valid image")
    }

    #[test]
    fn offsets_are_centred() {
        let se = binary(3, 1, &["#.#"]);
        assert_eq!(se_offsets(&se).expect("offsets"), vec![(0, -1), (0, 1)]);
    }

    #[test]
    fn dilation_uses_reflected_element() {
        let se = binary(3, 1, &["##."]);
        let img = binary(5, 1, &["..#.."]);

        let out = dilate_direct(&img, &se).expect("dilate");
        assert_eq!(out.data(), &[0, 255, 255, 0, 0]);
    }

    #[test]
    fn erosion_ignores_outside_pixels() {
        let se = PixelBuffer::new_fill(3, 3, 255);
        let img = PixelBuffer::new_fill(4, 4, 255);
        let out = erode_direct(&img, &se).expect("erode");
        assert!(out.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn open_removes_single_pixel_speck() {
        let se = PixelBuffer::new_fill(3, 3, 255);
        let img = binary(5, 5, &[".....", ".....", "..#..", ".....", "....."]);

        let out = opening_direct(&img, &se).expect("opening");
        assert_eq!(out.foreground_count(), 0);
    }

    #[test]
    fn close_fills_single_pixel_hole() {
        let se = PixelBuffer::new_fill(3, 3, 255);
        let img = binary(5, 5, &["#####", "#####", "##.##", "#####", "#####"]);

        let out = closing_direct(&img, &se).expect("closing");
        assert_eq!(out.get(2, 2), Some(255));
    }
}
