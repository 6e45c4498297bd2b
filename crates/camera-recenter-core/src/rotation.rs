//! Minimal rotation between two directions.

use crate::RecenterError;
use nalgebra::{Matrix3, Vector3};

/// Below this cross-product magnitude the inputs are treated as parallel.
pub const PARALLEL_EPS: f64 = 1e-8;

/// Rotation `R` such that `R * a/|a| = b/|b|`, about the axis `a × b`.
///
/// Built with Rodrigues' formula `R = I + V + V² (1 - c) / s²`, where `V`
/// is the cross-product matrix of `a × b`, `s = |a × b|` and `c = a · b`.
///
/// # Parallel inputs
///
/// When `s < PARALLEL_EPS` the identity is returned. This covers the
/// anti-parallel pair as well (`b ≈ -a`), for which identity is *not* a
/// rotation that aligns the vectors: the true answer is a half turn about
/// any axis orthogonal to `a`. Rays back-projected through a pinhole `K`
/// have positive depth, so [`crate::recenter_image`] never reaches it.
///
/// # Errors
///
/// [`RecenterError::InvalidVector`] if either input has zero length or a
/// non-finite component.
pub fn rotate_to_align(a: Vector3<f64>, b: Vector3<f64>) -> Result<Matrix3<f64>, RecenterError> {
    let a = normalized(a)?;
    let b = normalized(b)?;

    let v = a.cross(&b);
    let s = v.norm();
    let c = a.dot(&b);

    if s < PARALLEL_EPS {
        if c < 0.0 {
            log::warn!("rotate_to_align: anti-parallel inputs, returning identity");
        }
        return Ok(Matrix3::identity());
    }

    let vx = v.cross_matrix();
    Ok(Matrix3::identity() + vx + vx * vx * ((1.0 - c) / (s * s)))
}

fn normalized(v: Vector3<f64>) -> Result<Vector3<f64>, RecenterError> {
    let n = v.norm();
    if !n.is_finite() || n <= 0.0 {
        return Err(RecenterError::InvalidVector);
    }
    Ok(v / n)
}
