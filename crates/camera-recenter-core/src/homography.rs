use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Projective map between two pixel coordinate systems, `p_dst ~ H * p_src`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity())
    }

    pub fn from_array(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        ]))
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.h[(0, 0)], self.h[(0, 1)], self.h[(0, 2)]],
            [self.h[(1, 0)], self.h[(1, 1)], self.h[(1, 2)]],
            [self.h[(2, 0)], self.h[(2, 1)], self.h[(2, 2)]],
        ]
    }

    /// Map `(x, y)` with perspective division. `None` when the homogeneous
    /// scale is not strictly positive (the point maps through or behind the
    /// projection center).
    #[inline]
    pub fn try_apply(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let v = self.h * Vector3::new(x, y, 1.0);
        let w = v[2];
        if w.is_nan() || w <= f64::EPSILON {
            return None;
        }
        let (u, v) = (v[0] / w, v[1] / w);
        (u.is_finite() && v.is_finite()).then_some((u, v))
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: (f64, f64), b: (f64, f64), tol: f64) {
        let dx = (a.0 - b.0).abs();
        let dy = (a.1 - b.1).abs();
        assert!(
            dx < tol && dy < tol,
            "expected ({:.6},{:.6}) ~ ({:.6},{:.6}) within {}",
            a.0,
            a.1,
            b.0,
            b.1,
            tol
        );
    }

    fn sample_h() -> Homography {
        Homography::new(Matrix3::new(
            1.2, 0.1, 5.0, //
            -0.05, 0.9, 3.0, //
            0.001, 0.0005, 1.0,
        ))
    }

    #[test]
    fn inverse_round_trips_points() {
        let h = sample_h();
        let inv = h.inverse().expect("invertible");

        for p in [(0.0, 0.0), (50.0, -20.0), (320.0, 200.0)] {
            let q = h.try_apply(p.0, p.1).unwrap();
            let back = inv.try_apply(q.0, q.1).unwrap();
            assert_close(back, p, 1e-9);
        }
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let h = Homography::from_array([[1.0, 2.0, 0.0], [2.0, 4.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(h.inverse().is_none());
    }

    #[test]
    fn try_apply_rejects_points_behind_center() {
        // w = 1 - x: points with x >= 1 fall on or behind the center.
        let h = Homography::from_array([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 1.0]]);
        assert!(h.try_apply(0.5, 0.0).is_some());
        assert!(h.try_apply(1.0, 0.0).is_none());
        assert!(h.try_apply(2.0, 5.0).is_none());
    }

    #[test]
    fn array_round_trip() {
        let rows = sample_h().to_array();
        assert_eq!(Homography::from_array(rows), sample_h());
    }
}
