//! Boundary to encoded image formats, backed by the `image` crate.
//!
//! The morphology crates only ever see [`PixelBuffer`]s; nothing here is
//! consulted once a buffer has been decoded.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{
    ColorType, DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, RgbImage, RgbaImage,
};
use log::debug;

use crate::{Error, PixelBuffer, Result};

/// Decodes any supported format, keeping gray, gray+alpha, RGB or RGBA
/// layout as 1, 2, 3 or 4 channels. Deeper samples are reduced to 8 bits.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).map_err(Error::Decode)?;
    from_dynamic(dyn_img)
}

pub fn encode(buf: &PixelBuffer, format: ImageFormat) -> Result<Vec<u8>> {
    let dyn_img = to_dynamic(buf)?;
    let mut out = Cursor::new(Vec::new());
    dyn_img.write_to(&mut out, format).map_err(Error::Encode)?;
    Ok(out.into_inner())
}

pub fn encode_png(buf: &PixelBuffer) -> Result<Vec<u8>> {
    encode(buf, ImageFormat::Png)
}

pub fn read_image(path: &Path) -> Result<PixelBuffer> {
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let buf = decode(&bytes)?;
    debug!(
        "decoded {}: {}x{}x{}",
        path.display(),
        buf.width(),
        buf.height(),
        buf.channels()
    );
    Ok(buf)
}

/// Writes `buf` in the format implied by the extension of `path`.
pub fn write_image(buf: &PixelBuffer, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path).map_err(Error::Encode)?;
    let bytes = encode(buf, format)?;
    fs::write(path, bytes).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn from_dynamic(dyn_img: DynamicImage) -> Result<PixelBuffer> {
    let (width, height) = (dyn_img.width() as usize, dyn_img.height() as usize);
    let (channels, data) = match dyn_img.color() {
        ColorType::L8 | ColorType::L16 => (1, dyn_img.to_luma8().into_raw()),
        ColorType::La8 | ColorType::La16 => (2, dyn_img.to_luma_alpha8().into_raw()),
        color if color.has_alpha() => (4, dyn_img.to_rgba8().into_raw()),
        _ => (3, dyn_img.to_rgb8().into_raw()),
    };
    PixelBuffer::from_vec(width, height, channels, data)
}

fn to_dynamic(buf: &PixelBuffer) -> Result<DynamicImage> {
    let (w, h) = (buf.width() as u32, buf.height() as u32);
    let data = buf.data().to_vec();
    let mismatch = || Error::SizeMismatch {
        expected: buf.width() * buf.height() * buf.channels(),
        actual: buf.data().len(),
    };

    let dyn_img = match buf.channels() {
        1 => DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, data).ok_or_else(mismatch)?),
        2 => DynamicImage::ImageLumaA8(
            GrayAlphaImage::from_raw(w, h, data).ok_or_else(mismatch)?,
        ),
        3 => DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, data).ok_or_else(mismatch)?),
        4 => DynamicImage::ImageRgba8(RgbaImage::from_raw(w, h, data).ok_or_else(mismatch)?),
        other => return Err(Error::UnsupportedChannels(other)),
    };
    Ok(dyn_img)
}

#[cfg(test)]
mod tests {
    use super::{decode, encode_png};
    use crate::{Error, PixelBuffer};

    #[test]
    fn png_keeps_gray_samples() {
        let img = PixelBuffer::from_vec(3, 2, 1, vec![0u8, 10, 20, 30, 40, 255])
            .expect("valid image");
        let bytes = encode_png(&img).expect("encode");
        let back = decode(&bytes).expect("decode");

        assert_eq!(back, img);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode(&[1, 2, 3, 4]).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn five_channels_cannot_be_encoded() {
        let img = PixelBuffer::from_vec(1, 1, 5, vec![0u8; 5]).expect("valid image");
        assert!(matches!(
            encode_png(&img),
            Err(Error::UnsupportedChannels(5))
        ));
    }
}
