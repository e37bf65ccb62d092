use serde::{Deserialize, Serialize};

/// Min/max operator pair underlying erosion and dilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MorphOp {
    Erode,
    Dilate,
}

impl MorphOp {
    #[inline]
    pub fn combine(self, a: u8, b: u8) -> u8 {
        match self {
            Self::Erode => a.min(b),
            Self::Dilate => a.max(b),
        }
    }

    /// The value that never changes the result of [`MorphOp::combine`].
    #[inline]
    pub fn identity(self) -> u8 {
        match self {
            Self::Erode => u8::MAX,
            Self::Dilate => u8::MIN,
        }
    }

    pub fn dual(self) -> Self {
        match self {
            Self::Erode => Self::Dilate,
            Self::Dilate => Self::Erode,
        }
    }
}

/// Values read in place of samples that fall outside a buffer.
///
/// The defaults are the operator identities, so out-of-bounds positions
/// never influence a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillValues {
    pub erode: u8,
    pub dilate: u8,
}

impl Default for FillValues {
    fn default() -> Self {
        Self {
            erode: MorphOp::Erode.identity(),
            dilate: MorphOp::Dilate.identity(),
        }
    }
}

impl FillValues {
    #[inline]
    pub fn for_op(&self, op: MorphOp) -> u8 {
        match op {
            MorphOp::Erode => self.erode,
            MorphOp::Dilate => self.dilate,
        }
    }
}

/// Reads `line[i]`, or `fill` when `i` is outside `0..line.len()`.
#[inline]
pub fn read_or(line: &[u8], i: isize, fill: u8) -> u8 {
    if i < 0 {
        return fill;
    }
    line.get(i as usize).copied().unwrap_or(fill)
}

#[cfg(test)]
mod tests {
    use super::{FillValues, MorphOp, read_or};

    #[test]
    fn identities_do_not_change_combine() {
        for v in [0u8, 1, 17, 128, 254, 255] {
            assert_eq!(MorphOp::Erode.combine(v, MorphOp::Erode.identity()), v);
            assert_eq!(MorphOp::Dilate.combine(v, MorphOp::Dilate.identity()), v);
        }
        assert_eq!(MorphOp::Erode.dual(), MorphOp::Dilate);
        assert_eq!(MorphOp::Dilate.dual().dual(), MorphOp::Dilate);
    }

    #[test]
    fn read_or_falls_back_outside_line() {
        let line = [3u8, 4, 5];

        assert_eq!(read_or(&line, -1, 99), 99);
        assert_eq!(read_or(&line, 0, 99), 3);
        assert_eq!(read_or(&line, 2, 99), 5);
        assert_eq!(read_or(&line, 3, 99), 99);
        assert_eq!(read_or(&[], 0, 7), 7);
    }

    #[test]
    fn default_fill_is_identity() {
        let fill = FillValues::default();
        assert_eq!(fill.for_op(MorphOp::Erode), 255);
        assert_eq!(fill.for_op(MorphOp::Dilate), 0);
    }
}
