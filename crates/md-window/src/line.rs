use md_core::{Error, MorphOp, Result, read_or};

/// Reusable forward/backward running-extremum arrays for one window size.
#[derive(Debug, Clone, Default)]
pub struct LineScratch {
    c: Vec<u8>,
    d: Vec<u8>,
}

impl LineScratch {
    pub fn new(size: usize) -> Self {
        let mut scratch = Self::default();
        scratch.ensure(size);
        scratch
    }

    fn ensure(&mut self, size: usize) {
        let block = size.saturating_sub(1);
        if self.c.len() < block {
            self.c.resize(block, 0);
            self.d.resize(block, 0);
        }
    }
}

pub fn validate_window(size: usize, len: usize) -> Result<()> {
    if size % 2 == 0 || size < 3 || size > len {
        return Err(Error::InvalidWindow { size, len });
    }
    Ok(())
}

/// Sliding-window minimum of width `size`, ignoring positions outside `a`.
pub fn erode_line(a: &[u8], size: usize) -> Result<Vec<u8>> {
    apply_line(MorphOp::Erode, a, size, MorphOp::Erode.identity())
}

/// Sliding-window maximum of width `size`, ignoring positions outside `a`.
pub fn dilate_line(a: &[u8], size: usize) -> Result<Vec<u8>> {
    apply_line(MorphOp::Dilate, a, size, MorphOp::Dilate.identity())
}

/// `b[u] = op(a[u - size/2 ..= u + size/2])`, reading `fill` outside `a`.
///
/// `size` must be odd and `3 <= size <= a.len()`.
pub fn apply_line(op: MorphOp, a: &[u8], size: usize, fill: u8) -> Result<Vec<u8>> {
    validate_window(size, a.len())?;
    let mut out = vec![0u8; a.len()];
    let mut scratch = LineScratch::new(size);
    apply_line_into(op, a, size, fill, &mut scratch, &mut out);
    Ok(out)
}

/// Unchecked variant used by the 2-D passes.
///
/// Accepts any odd `size`, including windows longer than the line.
pub fn apply_line_into(
    op: MorphOp,
    a: &[u8],
    size: usize,
    fill: u8,
    scratch: &mut LineScratch,
    out: &mut [u8],
) {
    assert_eq!(out.len(), a.len(), "out must match line length");
    assert!(size % 2 == 1, "window size must be odd");

    match size {
        1 => out.copy_from_slice(a),
        3 => three_tap(op, a, fill, out),
        _ => {
            scratch.ensure(size);
            let block = size - 1;
            vhgw(op, a, size, fill, &mut scratch.c[..block], &mut scratch.d[..block], out);
        }
    }
}

fn three_tap(op: MorphOp, a: &[u8], fill: u8, out: &mut [u8]) {
    for (i, o) in out.iter_mut().enumerate() {
        let i = i as isize;
        let v = op.combine(read_or(a, i - 1, fill), read_or(a, i, fill));
        *o = op.combine(v, read_or(a, i + 1, fill));
    }
}

// Van Herk/Gil-Werman. Outputs come in blocks of `size - 1` around anchors
// `u = l, l + (size - 1), ...`; within a block `d` runs forward from `u` and
// `c` runs backward from `u - 1`, so each window is `op(c[i], d[i])`.
fn vhgw(op: MorphOp, a: &[u8], size: usize, fill: u8, c: &mut [u8], d: &mut [u8], out: &mut [u8]) {
    let n = a.len();
    let l = size / 2;
    let block = size - 1;

    let mut start = 0usize;
    while start < n {
        let u = (start + l) as isize;

        d[0] = read_or(a, u, fill);
        for i in 1..block {
            d[i] = op.combine(d[i - 1], read_or(a, u + i as isize, fill));
        }

        c[block - 1] = read_or(a, u - 1, fill);
        for i in (0..block - 1).rev() {
            c[i] = op.combine(c[i + 1], read_or(a, u - (block - i) as isize, fill));
        }

        let end = (start + block).min(n);
        for (i, o) in out[start..end].iter_mut().enumerate() {
            *o = op.combine(c[i], d[i]);
        }
        start += block;
    }
}
