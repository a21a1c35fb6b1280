//! # Fixed-Size Linear Algebra
//!
//! Everything in this crate works on statically-sized matrices: 3×3 for
//! plane stress (Voigt order `[11, 22, 12]`) and 6×6 for 3D
//! (`[11, 22, 33, 23, 13, 12]`). This module holds the checked inversion,
//! the ply rotation matrices, and a serde adapter that puts matrices on the
//! wire as nested row sequences.

use nalgebra::SMatrix;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{CalcError, CalcResult};
use crate::units::Degrees;

/// 3×3 plane-stress matrix
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// 6×6 three-dimensional matrix
pub type Matrix6 = nalgebra::Matrix6<f64>;

/// Below this Hadamard ratio |det| / Π‖rowᵢ‖ a matrix is treated as singular.
///
/// The ratio is scale-free, so a compliance of order 1e-5 and a stiffness of
/// order 1e5 are judged alike.
pub const SINGULARITY_TOLERANCE: f64 = 1e-12;

/// Invert a 3×3 matrix, failing with `SingularMatrix` instead of returning NaN/Inf.
///
/// `name` identifies the matrix in the error (e.g. "S", "A").
pub fn invert3(m: Matrix3, name: &str) -> CalcResult<Matrix3> {
    let ratio = hadamard_ratio(m.determinant(), m.row_iter().map(|r| r.norm()));
    let inverse = checked(ratio, name).and_then(|()| {
        m.try_inverse()
            .ok_or_else(|| CalcError::singular_matrix(name, "factorization failed"))
    })?;
    ensure_finite(inverse, name)
}

/// Invert a 6×6 matrix, failing with `SingularMatrix` instead of returning NaN/Inf.
pub fn invert6(m: Matrix6, name: &str) -> CalcResult<Matrix6> {
    let ratio = hadamard_ratio(m.determinant(), m.row_iter().map(|r| r.norm()));
    let inverse = checked(ratio, name).and_then(|()| {
        m.try_inverse()
            .ok_or_else(|| CalcError::singular_matrix(name, "factorization failed"))
    })?;
    ensure_finite(inverse, name)
}

fn hadamard_ratio(determinant: f64, row_norms: impl Iterator<Item = f64>) -> f64 {
    let scale: f64 = row_norms.product();
    if scale == 0.0 || !scale.is_finite() || !determinant.is_finite() {
        return 0.0;
    }
    (determinant / scale).abs()
}

fn checked(ratio: f64, name: &str) -> CalcResult<()> {
    if ratio < SINGULARITY_TOLERANCE {
        warn!(matrix = name, hadamard_ratio = ratio, "singular matrix");
        return Err(CalcError::singular_matrix(
            name,
            format!("determinant ratio {:.3e} below tolerance", ratio),
        ));
    }
    Ok(())
}

fn ensure_finite<const D: usize>(m: SMatrix<f64, D, D>, name: &str) -> CalcResult<SMatrix<f64, D, D>> {
    if m.iter().all(|v| v.is_finite()) {
        Ok(m)
    } else {
        warn!(matrix = name, "inverse has non-finite entries");
        Err(CalcError::singular_matrix(name, "inverse has non-finite entries"))
    }
}

// ============================================================================
// Ply Rotations
// ============================================================================

/// Plane-stress strain transformation T_ε for a ply at `angle`.
pub fn strain_rotation(angle: Degrees) -> Matrix3 {
    let (s, c) = angle.sin_cos();
    #[rustfmt::skip]
    let t = Matrix3::new(
        c * c,           s * s,           -s * c,
        s * s,           c * c,           s * c,
        2.0 * s * c,     -2.0 * s * c,    c * c - s * s,
    );
    t
}

/// Plane-stress stress transformation T_σ for a ply at `angle`.
///
/// The shear terms carry the factor of two on the opposite side from
/// [`strain_rotation`].
pub fn stress_rotation(angle: Degrees) -> Matrix3 {
    let (s, c) = angle.sin_cos();
    #[rustfmt::skip]
    let t = Matrix3::new(
        c * c,    s * s,    -2.0 * s * c,
        s * s,    c * c,    2.0 * s * c,
        s * c,    -s * c,   c * c - s * s,
    );
    t
}

/// 6×6 stress rotation about the laminate normal (3-axis).
///
/// In-plane block as in [`stress_rotation`], identity on σ33, and a 2×2
/// rotation mixing the two transverse shears σ23/σ13.
pub fn stress_rotation_3d(angle: Degrees) -> Matrix6 {
    let (s, c) = angle.sin_cos();
    #[rustfmt::skip]
    let t = Matrix6::new(
        c * c,   s * s,    0.0,  0.0,  0.0,  -2.0 * s * c,
        s * s,   c * c,    0.0,  0.0,  0.0,  2.0 * s * c,
        0.0,     0.0,      1.0,  0.0,  0.0,  0.0,
        0.0,     0.0,      0.0,  c,    s,    0.0,
        0.0,     0.0,      0.0,  -s,   c,    0.0,
        s * c,   -s * c,   0.0,  0.0,  0.0,  c * c - s * s,
    );
    t
}

// ============================================================================
// Wire Format
// ============================================================================

/// Copy a matrix into row-major nested vectors.
pub fn to_rows<const R: usize, const C: usize>(m: &SMatrix<f64, R, C>) -> Vec<Vec<f64>> {
    m.row_iter().map(|row| row.iter().copied().collect()).collect()
}

/// Build a matrix from row-major nested slices, `None` on a shape mismatch.
pub fn from_rows<const R: usize, const C: usize>(rows: &[Vec<f64>]) -> Option<SMatrix<f64, R, C>> {
    if rows.len() != R || rows.iter().any(|row| row.len() != C) {
        return None;
    }
    Some(SMatrix::<f64, R, C>::from_fn(|i, j| rows[i][j]))
}

/// Serde adapter: `#[serde(with = "crate::linalg::rows")]` on a fixed-size matrix field.
pub mod rows {
    use super::*;
    use serde::de::Error as _;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S, const R: usize, const C: usize>(
        m: &SMatrix<f64, R, C>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        to_rows(m).serialize(serializer)
    }

    pub fn deserialize<'de, D, const R: usize, const C: usize>(
        deserializer: D,
    ) -> Result<SMatrix<f64, R, C>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
        from_rows(&rows).ok_or_else(|| D::Error::custom(format!("expected a {}x{} matrix", R, C)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lamina_compliance() -> Matrix3 {
        let (e1, e2, g12, nu12) = (150000.0, 10000.0, 5000.0, 0.3);
        Matrix3::new(
            1.0 / e1, -nu12 / e1, 0.0,
            -nu12 / e1, 1.0 / e2, 0.0,
            0.0, 0.0, 1.0 / g12,
        )
    }

    #[test]
    fn test_double_inversion_roundtrip() {
        let s = lamina_compliance();
        let back = invert3(invert3(s, "S").unwrap(), "C").unwrap();
        for (a, b) in s.iter().zip(back.iter()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-9, epsilon = 1e-18);
        }
    }

    #[test]
    fn test_exactly_singular_is_rejected() {
        let s = Matrix3::new(1.0, -1.0, 0.0, -1.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        let err = invert3(s, "S").unwrap_err();
        assert_eq!(err.error_code(), "SINGULAR_MATRIX");
    }

    #[test]
    fn test_zero_matrix_is_rejected() {
        assert!(invert6(Matrix6::zeros(), "C").is_err());
    }

    #[test]
    fn test_incompressible_isotropic_compliance_is_singular() {
        // nu = 0.5 makes the normal block rank-deficient
        let (e, nu) = (1000.0, 0.5);
        let g = e / (2.0 * (1.0 + nu));
        let mut s = Matrix6::zeros();
        for i in 0..3 {
            for j in 0..3 {
                s[(i, j)] = if i == j { 1.0 / e } else { -nu / e };
            }
            s[(i + 3, i + 3)] = 1.0 / g;
        }
        assert!(invert6(s, "S").is_err());
    }

    #[test]
    fn test_rotations_at_zero_are_identity() {
        assert_relative_eq!(strain_rotation(Degrees(0.0)), Matrix3::identity());
        assert_relative_eq!(stress_rotation(Degrees(0.0)), Matrix3::identity());
        assert_relative_eq!(stress_rotation_3d(Degrees(0.0)), Matrix6::identity());
    }

    #[test]
    fn test_rotation_half_turn_periodicity() {
        let a = stress_rotation_3d(Degrees(30.0));
        let b = stress_rotation_3d(Degrees(210.0));
        // In-plane block is quadratic in (s, c) and repeats every 180°
        for i in [0, 1, 2, 5] {
            for j in [0, 1, 2, 5] {
                assert_relative_eq!(a[(i, j)], b[(i, j)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_rows_roundtrip_and_shape_check() {
        let s = lamina_compliance();
        let rows = to_rows(&s);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][1], s[(1, 1)]);
        assert_eq!(from_rows::<3, 3>(&rows), Some(s));
        assert_eq!(from_rows::<6, 6>(&rows), None);
    }
}
