use crate::RecenterError;
use serde::{Deserialize, Serialize};

/// Borrowed interleaved 8-bit image, row-major, `len = width * height * channels`.
#[derive(Clone, Copy, Debug)]
pub struct ImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: &'a [u8],
}

/// Owned interleaved 8-bit image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

/// Value used for samples that fall outside the source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// Every channel of an outside sample reads this value.
    Constant(u8),
    /// Outside samples read the nearest edge pixel. Destination pixels with
    /// no source location at all (behind the projection center) have no
    /// nearest edge and read 0.
    Replicate,
}

impl Default for BorderMode {
    fn default() -> Self {
        BorderMode::Constant(0)
    }
}

impl BorderMode {
    /// Value written where a warp has no source location to sample.
    pub fn fill_value(self) -> u8 {
        match self {
            BorderMode::Constant(v) => v,
            BorderMode::Replicate => 0,
        }
    }
}

fn check_layout(
    width: usize,
    height: usize,
    channels: usize,
    len: usize,
) -> Result<(), RecenterError> {
    if channels == 0 {
        return Err(RecenterError::InvalidImage {
            reason: "zero channels".to_string(),
        });
    }
    if width == 0 || height == 0 || len == 0 {
        return Err(RecenterError::InvalidImage {
            reason: format!("empty image ({width}x{height}, {len} bytes)"),
        });
    }
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| RecenterError::InvalidImage {
            reason: format!("dimensions overflow ({width}x{height}x{channels})"),
        })?;
    if len != expected {
        return Err(RecenterError::InvalidImage {
            reason: format!("expected {expected} bytes, got {len}"),
        });
    }
    Ok(())
}

impl<'a> ImageView<'a> {
    /// Wrap a raw buffer, checking that its length matches the shape.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: &'a [u8],
    ) -> Result<Self, RecenterError> {
        let view = Self {
            width,
            height,
            channels,
            data,
        };
        view.validate()?;
        Ok(view)
    }

    /// Re-check the shape invariants; the fields are public.
    pub fn validate(&self) -> Result<(), RecenterError> {
        check_layout(self.width, self.height, self.channels, self.data.len())
    }

    /// Channel slice of pixel `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &'a [u8] {
        let i = (y * self.width + x) * self.channels;
        &self.data[i..i + self.channels]
    }
}

impl Image {
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, RecenterError> {
        check_layout(width, height, channels, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Image filled with `value` in every channel.
    pub fn filled(
        width: usize,
        height: usize,
        channels: usize,
        value: u8,
    ) -> Result<Self, RecenterError> {
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .unwrap_or(0);
        Self::new(width, height, channels, vec![value; len])
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<const C: usize>(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> [u8; C],
    ) -> Result<Self, RecenterError> {
        let mut data = Vec::with_capacity(width * height * C);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, C, data)
    }

    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: &self.data,
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let i = (y * self.width + x) * self.channels;
        &self.data[i..i + self.channels]
    }
}

#[inline]
fn get_channel(src: &ImageView<'_>, x: i64, y: i64, c: usize, border: BorderMode) -> f32 {
    let (w, h) = (src.width as i64, src.height as i64);
    let inside = x >= 0 && y >= 0 && x < w && y < h;
    let (x, y) = match border {
        _ if inside => (x, y),
        BorderMode::Constant(v) => return v as f32,
        BorderMode::Replicate => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
    };
    src.data[(y as usize * src.width + x as usize) * src.channels + c] as f32
}

/// Bilinear sample of channel `c` at `(x, y)`; pixel centers sit on integer coordinates.
///
/// Coordinates are clamped to `[-1, width] × [-1, height]` first; beyond that
/// band every neighbour is outside the image and the result no longer changes.
#[inline]
pub fn sample_bilinear(src: &ImageView<'_>, x: f32, y: f32, c: usize, border: BorderMode) -> f32 {
    let x = x.clamp(-1.0, src.width as f32);
    let y = y.clamp(-1.0, src.height as f32);
    let x0f = x.floor();
    let y0f = y.floor();
    let fx = x - x0f;
    let fy = y - y0f;
    let x0 = x0f as i64;
    let y0 = y0f as i64;

    let p00 = get_channel(src, x0, y0, c, border);
    let p10 = get_channel(src, x0 + 1, y0, c, border);
    let p01 = get_channel(src, x0, y0 + 1, c, border);
    let p11 = get_channel(src, x0 + 1, y0 + 1, c, border);

    let a = p00 + fx * (p10 - p00);
    let b = p01 + fx * (p11 - p01);
    a + fy * (b - a)
}

/// Bilinear sample of every channel at `(x, y)` written into `out`, rounded to `u8`.
#[inline]
pub fn sample_bilinear_u8(
    src: &ImageView<'_>,
    x: f32,
    y: f32,
    border: BorderMode,
    out: &mut [u8],
) {
    for (c, px) in out.iter_mut().enumerate().take(src.channels) {
        *px = sample_bilinear(src, x, y, c, border).round().clamp(0.0, 255.0) as u8;
    }
}
