//! Conversions between `image` crate buffers and the core [`Image`] type.

use crate::RecenterIoError;
use camera_recenter_core::{Image, ImageView};
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Channel layout requested when decoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Single-channel luma.
    Gray,
    /// Three-channel RGB.
    #[default]
    Rgb,
    /// Four-channel RGBA.
    Rgba,
}

impl ColorMode {
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Gray => 1,
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
        }
    }
}

/// Convert a decoded image into an interleaved 8-bit buffer.
pub fn image_from_dynamic(img: &DynamicImage, mode: ColorMode) -> Result<Image, RecenterIoError> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let data = match mode {
        ColorMode::Gray => img.to_luma8().into_raw(),
        ColorMode::Rgb => img.to_rgb8().into_raw(),
        ColorMode::Rgba => img.to_rgba8().into_raw(),
    };
    Ok(Image::new(w, h, mode.channels(), data)?)
}

/// Wrap an interleaved buffer back into a `DynamicImage`.
pub fn to_dynamic(img: &ImageView<'_>) -> Result<DynamicImage, RecenterIoError> {
    img.validate()?;
    let (w, h) = (img.width as u32, img.height as u32);
    let data = img.data.to_vec();
    let dynamic = match img.channels {
        1 => image::GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        2 => image::GrayAlphaImage::from_raw(w, h, data).map(DynamicImage::ImageLumaA8),
        3 => image::RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        4 => image::RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
        channels => return Err(RecenterIoError::UnsupportedChannels { channels }),
    };
    dynamic.ok_or(RecenterIoError::UnsupportedChannels {
        channels: img.channels,
    })
}

/// Decode an image file. Decoder errors surface as
/// [`RecenterIoError::ImageDecodeFailure`].
pub fn load_image(path: impl AsRef<Path>, mode: ColorMode) -> Result<Image, RecenterIoError> {
    let path = path.as_ref();
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(RecenterIoError::ImageDecodeFailure)?;
    log::debug!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    image_from_dynamic(&img, mode)
}

/// Encode an image; the format follows the file extension. Encoder errors,
/// including an unknown extension, surface as
/// [`RecenterIoError::ImageEncodeFailure`].
pub fn save_image(path: impl AsRef<Path>, img: &Image) -> Result<(), RecenterIoError> {
    let path = path.as_ref();
    to_dynamic(&img.view())?
        .save(path)
        .map_err(RecenterIoError::ImageEncodeFailure)?;
    log::debug!("wrote {} ({}x{})", path.display(), img.width, img.height);
    Ok(())
}
