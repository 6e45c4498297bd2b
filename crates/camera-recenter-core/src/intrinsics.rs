use crate::RecenterError;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Pinhole intrinsics without skew.
///
/// ```text
/// K = | fx  0  cx |
///     |  0 fy  cy |
///     |  0  0   1 |
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinholeIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl PinholeIntrinsics {
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Square-pixel camera with the principal point at the image center.
    pub fn centered(focal: f64, width: usize, height: usize) -> Self {
        Self::new(focal, focal, width as f64 / 2.0, height as f64 / 2.0)
    }

    /// Read fx, fy, cx, cy out of a 3×3 matrix. Skew and bottom row are ignored.
    pub fn from_matrix(k: &Matrix3<f64>) -> Self {
        Self::new(k[(0, 0)], k[(1, 1)], k[(0, 2)], k[(1, 2)])
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    /// Same focal lengths, principal point moved to the center of an
    /// `width × height` image.
    pub fn recentered(&self, width: usize, height: usize) -> Self {
        Self::new(self.fx, self.fy, width as f64 / 2.0, height as f64 / 2.0)
    }
}

/// An intrinsics matrix that passed [`CameraMatrix::new`] validation,
/// together with its inverse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraMatrix {
    k: Matrix3<f64>,
    k_inv: Matrix3<f64>,
}

impl CameraMatrix {
    /// Validate `k`: finite entries, bottom row `[0, 0, 1]`, positive focal
    /// lengths, invertible. Skew is accepted.
    pub fn new(k: Matrix3<f64>) -> Result<Self, RecenterError> {
        if k.iter().any(|v| !v.is_finite()) {
            return Err(RecenterError::InvalidIntrinsics {
                reason: "non-finite entry",
            });
        }
        if k[(2, 0)] != 0.0 || k[(2, 1)] != 0.0 || k[(2, 2)] != 1.0 {
            return Err(RecenterError::InvalidIntrinsics {
                reason: "bottom row must be [0, 0, 1]",
            });
        }
        if k[(0, 0)] <= 0.0 || k[(1, 1)] <= 0.0 {
            return Err(RecenterError::InvalidIntrinsics {
                reason: "focal lengths must be positive",
            });
        }
        let k_inv = k.try_inverse().ok_or(RecenterError::InvalidIntrinsics {
            reason: "matrix is singular",
        })?;
        Ok(Self { k, k_inv })
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.k
    }

    pub fn inverse(&self) -> &Matrix3<f64> {
        &self.k_inv
    }

    pub fn fx(&self) -> f64 {
        self.k[(0, 0)]
    }

    pub fn fy(&self) -> f64 {
        self.k[(1, 1)]
    }

    /// Unit-length camera-space ray through pixel `(x, y)`.
    pub fn back_project(&self, x: f64, y: f64) -> Result<Vector3<f64>, RecenterError> {
        let r = self.k_inv * Vector3::new(x, y, 1.0);
        let n = r.norm();
        if !n.is_finite() || n <= 0.0 {
            return Err(RecenterError::InvalidVector);
        }
        Ok(r / n)
    }
}

impl TryFrom<PinholeIntrinsics> for CameraMatrix {
    type Error = RecenterError;

    fn try_from(value: PinholeIntrinsics) -> Result<Self, Self::Error> {
        CameraMatrix::new(value.matrix())
    }
}
