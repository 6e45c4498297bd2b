//! Re-center a pinhole image on an arbitrary pixel.
//!
//! The camera is virtually rotated about its projection center so that the
//! ray through the chosen pixel becomes the optical axis:
//!
//! 1. `r = normalize(K⁻¹ · [x, y, 1]ᵗ)`
//! 2. `R` aligns `r` with `[0, 0, 1]ᵗ` ([`rotate_to_align`])
//! 3. `K_new` keeps `fx, fy` and moves the principal point to the output center
//! 4. `H = K_new · R · K⁻¹` maps source pixels to output pixels
//! 5. the output is pulled through `H⁻¹` with bilinear sampling
//!
//! Only rotation is simulated, so straight lines stay straight. Lens
//! distortion is not modelled.

use crate::warp::warp_with_inverse;
use crate::{
    rotate_to_align, BorderMode, CameraMatrix, Homography, Image, ImageView, PinholeIntrinsics,
    RecenterError,
};
use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Inputs of [`recenter_image_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecenterParams {
    /// Source pixel that becomes the new image center.
    pub target: [f64; 2],
    /// Source camera matrix.
    pub intrinsics: Matrix3<f64>,
    /// `(width, height)` of the output; `None` keeps the source size.
    pub output_size: Option<(usize, usize)>,
    pub border: BorderMode,
}

impl RecenterParams {
    pub fn new(target_x: f64, target_y: f64, intrinsics: Matrix3<f64>) -> Self {
        Self {
            target: [target_x, target_y],
            intrinsics,
            output_size: None,
            border: BorderMode::default(),
        }
    }

    pub fn with_output_size(mut self, width: usize, height: usize) -> Self {
        self.output_size = Some((width, height));
        self
    }

    pub fn with_border(mut self, border: BorderMode) -> Self {
        self.border = border;
        self
    }
}

/// Geometry of one re-centering, independent of pixel data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Recentering {
    /// Camera rotation taking the target ray onto the optical axis.
    pub rotation: Matrix3<f64>,
    /// Intrinsics of the virtual output camera.
    pub new_intrinsics: PinholeIntrinsics,
    /// Source pixels to output pixels.
    pub h_out_from_src: Homography,
    /// Output pixels to source pixels.
    pub h_src_from_out: Homography,
    pub output_width: usize,
    pub output_height: usize,
}

impl Recentering {
    /// Principal point of the output image.
    pub fn output_center(&self) -> (f64, f64) {
        (self.new_intrinsics.cx, self.new_intrinsics.cy)
    }

    /// Source location sampled by output pixel `(u, v)`.
    pub fn source_of(&self, u: f64, v: f64) -> Option<(f64, f64)> {
        self.h_src_from_out.try_apply(u, v)
    }

    /// Output location of source pixel `(x, y)`.
    pub fn output_of(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.h_out_from_src.try_apply(x, y)
    }
}

/// Output image together with the geometry that produced it.
#[derive(Clone, Debug)]
pub struct RecenterResult {
    pub image: Image,
    pub geometry: Recentering,
}

fn resolve_output_size(
    output_size: Option<(usize, usize)>,
    src_w: usize,
    src_h: usize,
) -> Result<(usize, usize), RecenterError> {
    let (w, h) = output_size.unwrap_or((src_w, src_h));
    if w == 0 || h == 0 {
        return Err(RecenterError::InvalidOutputSize {
            width: w,
            height: h,
        });
    }
    Ok((w, h))
}

/// Compute `R`, `K_new` and `H` for re-centering on `(target_x, target_y)`
/// without touching pixels.
pub fn recentering_homography(
    target_x: f64,
    target_y: f64,
    intrinsics: &Matrix3<f64>,
    output_width: usize,
    output_height: usize,
) -> Result<Recentering, RecenterError> {
    if output_width == 0 || output_height == 0 {
        return Err(RecenterError::InvalidOutputSize {
            width: output_width,
            height: output_height,
        });
    }
    let camera = CameraMatrix::new(*intrinsics)?;
    if !target_x.is_finite() || !target_y.is_finite() {
        return Err(RecenterError::InvalidVector);
    }

    let ray = camera.back_project(target_x, target_y)?;
    let rotation = rotate_to_align(ray, Vector3::z())?;

    let new_intrinsics = PinholeIntrinsics::from_matrix(camera.matrix())
        .recentered(output_width, output_height);
    let k_new = CameraMatrix::try_from(new_intrinsics)?;

    let h_out_from_src = Homography::new(k_new.matrix() * rotation * camera.inverse());
    // R is orthonormal, so H⁻¹ = K · Rᵗ · K_new⁻¹.
    let h_src_from_out =
        Homography::new(camera.matrix() * rotation.transpose() * k_new.inverse());

    log::debug!(
        "recenter target=({target_x:.2}, {target_y:.2}) ray={:?} out={}x{}",
        ray.as_slice(),
        output_width,
        output_height
    );
    log::debug!("recenter H={:?}", h_out_from_src.to_array());

    Ok(Recentering {
        rotation,
        new_intrinsics,
        h_out_from_src,
        h_src_from_out,
        output_width,
        output_height,
    })
}

/// Re-project `image` so that the ray through source pixel
/// `(target_x, target_y)` lands on the center of the output.
///
/// Output pixels that see outside the source are black. See
/// [`recenter_image_with`] for other border policies and access to the
/// derived matrices.
///
/// ```
/// use camera_recenter_core::{recenter_image, Image, PinholeIntrinsics};
///
/// let src = Image::from_fn(64, 48, |x, y| [x as u8, y as u8, 0]).unwrap();
/// let k = PinholeIntrinsics::centered(50.0, 64, 48).matrix();
/// let out = recenter_image(&src.view(), 40.0, 30.0, &k, None).unwrap();
/// assert_eq!(out.pixel(32, 24), src.pixel(40, 30));
/// ```
pub fn recenter_image(
    image: &ImageView<'_>,
    target_x: f64,
    target_y: f64,
    intrinsics: &Matrix3<f64>,
    output_size: Option<(usize, usize)>,
) -> Result<Image, RecenterError> {
    let mut params = RecenterParams::new(target_x, target_y, *intrinsics);
    params.output_size = output_size;
    Ok(recenter_image_with(image, &params)?.image)
}

/// [`recenter_image`] with an explicit border policy, also returning the
/// geometry.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(image, params),
        fields(width = image.width, height = image.height, channels = image.channels)
    )
)]
pub fn recenter_image_with(
    image: &ImageView<'_>,
    params: &RecenterParams,
) -> Result<RecenterResult, RecenterError> {
    image.validate()?;
    let (out_w, out_h) = resolve_output_size(params.output_size, image.width, image.height)?;
    let [tx, ty] = params.target;
    let geometry = recentering_homography(tx, ty, &params.intrinsics, out_w, out_h)?;

    let image = warp_with_inverse(
        image,
        &geometry.h_src_from_out,
        out_w,
        out_h,
        params.border,
    );

    Ok(RecenterResult { image, geometry })
}
