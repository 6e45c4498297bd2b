use crate::{sample_bilinear_u8, BorderMode, Homography, Image, ImageView, RecenterError};

/// Warp `src` through `h_dst_from_src` into an `out_w × out_h` image.
///
/// Each destination pixel `(u, v)` is pulled from `H⁻¹ · (u, v, 1)` in the
/// source and sampled bilinearly. Destination pixels whose source location
/// is undefined (behind the projection center) read
/// [`BorderMode::fill_value`].
pub fn warp_perspective(
    src: &ImageView<'_>,
    h_dst_from_src: &Homography,
    out_w: usize,
    out_h: usize,
    border: BorderMode,
) -> Result<Image, RecenterError> {
    src.validate()?;
    if out_w == 0 || out_h == 0 {
        return Err(RecenterError::InvalidOutputSize {
            width: out_w,
            height: out_h,
        });
    }
    let h_src_from_dst = h_dst_from_src
        .inverse()
        .ok_or(RecenterError::SingularHomography)?;
    Ok(warp_with_inverse(src, &h_src_from_dst, out_w, out_h, border))
}

/// Pull-warp with an already-inverted map (`p_src ~ H * p_dst`). Inputs are
/// assumed validated.
pub(crate) fn warp_with_inverse(
    src: &ImageView<'_>,
    h_src_from_dst: &Homography,
    out_w: usize,
    out_h: usize,
    border: BorderMode,
) -> Image {
    let ch = src.channels;
    let mut out = vec![border.fill_value(); out_w * out_h * ch];

    for (y, row) in out.chunks_exact_mut(out_w * ch).enumerate() {
        for (x, px) in row.chunks_exact_mut(ch).enumerate() {
            let Some((sx, sy)) = h_src_from_dst.try_apply(x as f64, y as f64) else {
                continue;
            };
            sample_bilinear_u8(src, sx as f32, sy as f32, border, px);
        }
    }

    Image {
        width: out_w,
        height: out_h,
        channels: ch,
        data: out,
    }
}
