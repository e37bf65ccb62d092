use crate::{Error, Result};

const RGB_RED: f32 = 0.299;
const RGB_GREEN: f32 = 0.587;
const RGB_BLUE: f32 = 0.114;

/// Owned, row-major 8-bit raster with interleaved channels.
///
/// `data.len() == width * height * channels` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_vec(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        let expected = sample_count(width, height, channels).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Single-channel buffer filled with `value`.
    pub fn new_fill(width: usize, height: usize, value: u8) -> Self {
        let len = width.checked_mul(height).expect("image size overflow");
        Self {
            width,
            height,
            channels: 1,
            data: vec![value; len],
        }
    }

    /// Like [`PixelBuffer::new_fill`], reporting allocation failure instead of aborting.
    pub fn try_new_fill(width: usize, height: usize, value: u8) -> Result<Self> {
        let len = sample_count(width, height, 1).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: 0,
        })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|source| Error::AllocationFailure { bytes: len, source })?;
        data.resize(len, value);

        Ok(Self {
            width,
            height,
            channels: 1,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn ensure_single_channel(&self) -> Result<()> {
        if self.channels != 1 {
            return Err(Error::UnsupportedChannels(self.channels));
        }
        Ok(())
    }

    pub fn row(&self, y: usize) -> &[u8] {
        assert!(y < self.height, "row index out of bounds");
        let len = self.width * self.channels;
        let start = y * len;
        &self.data[start..start + len]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(y < self.height, "row index out of bounds");
        let len = self.width * self.channels;
        let start = y * len;
        &mut self.data[start..start + len]
    }

    /// First-channel sample at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get((y * self.width + x) * self.channels).copied()
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get_mut((y * self.width + x) * self.channels)
    }

    /// Reads `(x, y)`, or `fill` for positions outside the buffer.
    #[inline]
    pub fn get_or(&self, x: isize, y: isize, fill: u8) -> u8 {
        if x < 0 || y < 0 {
            return fill;
        }
        self.get(x as usize, y as usize).unwrap_or(fill)
    }

    /// Copies column `x` of a single-channel buffer into `out`.
    pub fn column_into(&self, x: usize, out: &mut [u8]) {
        assert!(x < self.width, "column index out of bounds");
        assert_eq!(out.len(), self.height, "out must match column length");
        for (y, o) in out.iter_mut().enumerate() {
            *o = self.data[y * self.width + x];
        }
    }

    pub fn set_column(&mut self, x: usize, values: &[u8]) {
        assert!(x < self.width, "column index out of bounds");
        assert_eq!(values.len(), self.height, "values must match column length");
        for (y, &v) in values.iter().enumerate() {
            self.data[y * self.width + x] = v;
        }
    }

    /// Copy of a single-channel buffer surrounded by `margin_x` columns and
    /// `margin_y` rows of `fill` on every side.
    pub fn padded(&self, margin_x: usize, margin_y: usize, fill: u8) -> Result<Self> {
        self.ensure_single_channel()?;
        let width = self.width + 2 * margin_x;
        let height = self.height + 2 * margin_y;
        let mut out = Self::try_new_fill(width, height, fill)?;

        for y in 0..self.height {
            let start = (y + margin_y) * width + margin_x;
            out.data[start..start + self.width].copy_from_slice(self.row(y));
        }
        Ok(out)
    }

    /// Copies the `width x height` window whose top-left corner is `(x, y)`.
    pub fn cropped(&self, x: usize, y: usize, width: usize, height: usize) -> Result<Self> {
        self.ensure_single_channel()?;
        if x > self.width
            || y > self.height
            || width > (self.width - x)
            || height > (self.height - y)
        {
            return Err(Error::OutOfBounds);
        }

        let mut data = Vec::new();
        data.try_reserve_exact(width * height)
            .map_err(|source| Error::AllocationFailure {
                bytes: width * height,
                source,
            })?;
        for row in y..y + height {
            let start = row * self.width + x;
            data.extend_from_slice(&self.data[start..start + width]);
        }

        Ok(Self {
            width,
            height,
            channels: 1,
            data,
        })
    }

    pub fn is_binary(&self) -> bool {
        self.data.iter().all(|&v| v == 0 || v == u8::MAX)
    }

    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn complement(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: self.data.iter().map(|&v| u8::MAX - v).collect(),
        }
    }

    /// Single-channel luma copy.
    ///
    /// Two-channel input is treated as gray + alpha; three or more channels
    /// as RGB(A). Fully transparent pixels become white.
    pub fn to_gray(&self) -> Self {
        if self.channels == 1 {
            return self.clone();
        }

        let data = self
            .data
            .chunks_exact(self.channels)
            .map(|px| {
                let alpha = match self.channels {
                    2 => Some(px[1]),
                    4 => Some(px[3]),
                    _ => None,
                };
                if alpha == Some(0) {
                    return u8::MAX;
                }
                if self.channels == 2 {
                    return px[0];
                }
                let luma =
                    RGB_RED * px[0] as f32 + RGB_GREEN * px[1] as f32 + RGB_BLUE * px[2] as f32;
                luma as u8
            })
            .collect();

        Self {
            width: self.width,
            height: self.height,
            channels: 1,
            data,
        }
    }

    /// Samples below `threshold` become 0, all others 255.
    pub fn to_binary(&self, threshold: u8) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: self
                .data
                .iter()
                .map(|&v| if v < threshold { 0 } else { u8::MAX })
                .collect(),
        }
    }
}

fn sample_count(width: usize, height: usize, channels: usize) -> Option<usize> {
    width.checked_mul(height)?.checked_mul(channels)
}
