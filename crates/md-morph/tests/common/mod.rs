use md_core::PixelBuffer;
use rand::prelude::*;

pub fn random_gray(width: usize, height: usize, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height).map(|_| rng.r#gen::<u8>()).collect();
    PixelBuffer::from_vec(width, height, 1, data).expect("valid image")
}

/// Sparse speckle on black, with a few filled blocks so openings keep something.
pub fn random_binary(width: usize, height: usize, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut img = PixelBuffer::new_fill(width, height, 0);
    for px in img.data_mut() {
        if rng.gen_bool(0.1) {
            *px = 255;
        }
    }
    for _ in 0..3 {
        let (x0, y0) = (rng.gen_range(0..width), rng.gen_range(0..height));
        let (w, h) = (rng.gen_range(4..12), rng.gen_range(4..12));
        for y in y0..(y0 + h).min(height) {
            for x in x0..(x0 + w).min(width) {
                *img.get_mut(x, y).expect("in bounds") = 255;
            }
        }
    }
    img
}
