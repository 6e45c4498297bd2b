//! Core geometry for re-centering pinhole camera images.
//!
//! Given an image, its intrinsics `K` and a pixel of interest, the camera is
//! virtually rotated so that the ray through that pixel becomes the optical
//! axis, and the image is resampled through the induced homography
//! `H = K_new · R · K⁻¹`.
//!
//! The crate is purely geometric and works on in-memory interleaved 8-bit
//! buffers ([`Image`] / [`ImageView`]); decoding and encoding files is left
//! to the `camera-recenter` facade.
//!
//! ```
//! use camera_recenter_core::{rotate_to_align, RecenterError};
//! use nalgebra::Vector3;
//!
//! let r = rotate_to_align(Vector3::new(0.1, 0.2, 1.0), Vector3::z())?;
//! assert!((r * Vector3::new(0.1, 0.2, 1.0).normalize() - Vector3::z()).norm() < 1e-12);
//! # Ok::<(), RecenterError>(())
//! ```

mod error;
mod homography;
mod image;
mod intrinsics;
mod recenter;
mod rotation;
mod warp;

pub use error::RecenterError;
pub use homography::Homography;
pub use image::{sample_bilinear, sample_bilinear_u8, BorderMode, Image, ImageView};
pub use intrinsics::{CameraMatrix, PinholeIntrinsics};
pub use recenter::{
    recenter_image, recenter_image_with, recentering_homography, RecenterParams, RecenterResult,
    Recentering,
};
pub use rotation::{rotate_to_align, PARALLEL_EPS};
pub use warp::warp_perspective;
