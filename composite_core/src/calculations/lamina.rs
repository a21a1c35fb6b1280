//! # Lamina Transform
//!
//! Engineering constants of a single unidirectional ply viewed off-axis.
//!
//! ## Method
//!
//! 1. Plane-stress compliance S in material axes, stiffness C = S⁻¹
//! 2. Q̄ = T_σᵀ·C·T_σ and S̄ = T_εᵀ·S·T_ε for the ply angle
//! 3. Constants from S̄: E_x = 1/S̄₁₁, E_y = 1/S̄₂₂, G_xy = 1/S̄₆₆,
//!    ν_xy = −S̄₁₂·E_x, η_x,xy = S̄₆₁·E_x, η_y,xy = S̄₆₂·E_y
//!
//! ## Example
//!
//! ```rust
//! use composite_core::calculations::lamina::{calculate, LaminaInput};
//! use composite_core::materials::LaminaProperties;
//! use composite_core::validation::ValidationLimits;
//!
//! let input = LaminaInput {
//!     material: LaminaProperties { e1: 150000.0, e2: 10000.0, g12: 5000.0, nu12: 0.3 },
//!     layup_angle: 0.0,
//! };
//! let result = calculate(&input, &ValidationLimits::default()).unwrap();
//! assert!((result.e_1 - 150000.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CalcResult;
use crate::linalg::{invert3, strain_rotation, stress_rotation, Matrix3};
use crate::materials::LaminaProperties;
use crate::units::Degrees;
use crate::validation::{require_finite, ValidationLimits};

/// Input for the lamina transform.
///
/// ## JSON Example
///
/// ```json
/// { "E1": 150000, "E2": 10000, "G12": 5000, "nu12": 0.3, "layup_angle": 45 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaminaInput {
    #[serde(flatten)]
    pub material: LaminaProperties,

    /// Fiber angle relative to the reference x-axis, in degrees
    pub layup_angle: f64,
}

impl LaminaInput {
    pub fn validate(&self, limits: &ValidationLimits) -> CalcResult<()> {
        self.material.validate(limits)?;
        require_finite("layup_angle", self.layup_angle)
    }
}

/// Off-axis constants and matrices of one ply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaminaResult {
    /// Modulus along the reference x-axis
    #[serde(rename = "E_1")]
    pub e_1: f64,

    /// Modulus along the reference y-axis
    #[serde(rename = "E_2")]
    pub e_2: f64,

    #[serde(rename = "G_12")]
    pub g_12: f64,

    pub nu_12: f64,

    /// Shear-extension coupling: shear strain per unit x-strain
    pub eta_1_12: f64,

    /// Shear-extension coupling: shear strain per unit y-strain
    pub eta_2_12: f64,

    /// Transformed stiffness Q̄
    #[serde(rename = "Q", with = "crate::linalg::rows")]
    pub q: Matrix3,

    /// Transformed compliance S̄
    #[serde(rename = "S", with = "crate::linalg::rows")]
    pub s: Matrix3,
}

/// Validate the input and run the transform.
pub fn calculate(input: &LaminaInput, limits: &ValidationLimits) -> CalcResult<LaminaResult> {
    input.validate(limits)?;
    transform(&input.material, Degrees(input.layup_angle))
}

/// Rotate a ply to `angle` and extract its off-axis constants.
///
/// # Errors
///
/// `CalcError::SingularMatrix` when the material compliance is not invertible.
pub fn transform(props: &LaminaProperties, angle: Degrees) -> CalcResult<LaminaResult> {
    let s = props.compliance();
    let c = invert3(s, "S")?;

    let t_strain = strain_rotation(angle);
    let t_stress = stress_rotation(angle);

    let q = t_stress.transpose() * c * t_stress;
    let s_bar = t_strain.transpose() * s * t_strain;

    let e_x = 1.0 / s_bar[(0, 0)];
    let e_y = 1.0 / s_bar[(1, 1)];

    debug!(angle = angle.0, e_x, e_y, "lamina transformed");

    Ok(LaminaResult {
        e_1: e_x,
        e_2: e_y,
        g_12: 1.0 / s_bar[(2, 2)],
        nu_12: -s_bar[(0, 1)] * e_x,
        eta_1_12: s_bar[(2, 0)] * e_x,
        eta_2_12: s_bar[(2, 1)] * e_y,
        q,
        s: s_bar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn carbon_epoxy() -> LaminaProperties {
        LaminaProperties {
            e1: 150000.0,
            e2: 10000.0,
            g12: 5000.0,
            nu12: 0.3,
        }
    }

    #[test]
    fn test_zero_angle_returns_material_constants() {
        let r = transform(&carbon_epoxy(), Degrees(0.0)).unwrap();
        assert_relative_eq!(r.e_1, 150000.0, max_relative = 1e-12);
        assert_relative_eq!(r.e_2, 10000.0, max_relative = 1e-12);
        assert_relative_eq!(r.g_12, 5000.0, max_relative = 1e-12);
        assert_relative_eq!(r.nu_12, 0.3, max_relative = 1e-12);
        assert!(r.eta_1_12.abs() < 1e-12);
        assert!(r.eta_2_12.abs() < 1e-12);
    }

    #[test]
    fn test_45_degree_regression() {
        let r = transform(&carbon_epoxy(), Degrees(45.0)).unwrap();
        assert_relative_eq!(r.g_12, 36144.578313253, max_relative = 1e-9);
        assert_relative_eq!(r.e_1, 4431.3146233383, max_relative = 1e-9);
        assert_relative_eq!(r.e_2, r.e_1, max_relative = 1e-9);
        assert_relative_eq!(r.nu_12, 0.77252584933530, max_relative = 1e-9);
        assert_relative_eq!(r.eta_1_12, 0.10339734121123, max_relative = 1e-9);
        assert_relative_eq!(r.q[(0, 0)], 43000.503018108, max_relative = 1e-9);
        assert_relative_eq!(r.q[(2, 0)], -70422.535211268, max_relative = 1e-9);
    }

    #[test]
    fn test_30_degree_regression() {
        let r = transform(&carbon_epoxy(), Degrees(30.0)).unwrap();
        assert_relative_eq!(r.e_1, 6279.4348508634, max_relative = 1e-9);
        assert_relative_eq!(r.e_2, 4856.3334682315, max_relative = 1e-9);
        assert_relative_eq!(r.g_12, 14134.275618375, max_relative = 1e-9);
        assert_relative_eq!(r.eta_2_12, -0.26425866226365, max_relative = 1e-9);
    }

    #[test]
    fn test_half_turn_periodicity() {
        let a = transform(&carbon_epoxy(), Degrees(30.0)).unwrap();
        let b = transform(&carbon_epoxy(), Degrees(30.0) + Degrees(180.0)).unwrap();
        assert_relative_eq!(a.e_1, b.e_1, max_relative = 1e-9);
        assert_relative_eq!(a.g_12, b.g_12, max_relative = 1e-9);
        assert_relative_eq!(a.nu_12, b.nu_12, max_relative = 1e-9);
        assert_relative_eq!(a.eta_1_12, b.eta_1_12, max_relative = 1e-9);
        assert_relative_eq!(a.q, b.q, max_relative = 1e-9);
    }

    #[test]
    fn test_mirror_angle_flips_coupling_sign() {
        let plus = transform(&carbon_epoxy(), Degrees(30.0)).unwrap();
        let minus = transform(&carbon_epoxy(), -Degrees(30.0)).unwrap();
        assert_relative_eq!(plus.e_1, minus.e_1, max_relative = 1e-12);
        assert_relative_eq!(plus.eta_1_12, -minus.eta_1_12, max_relative = 1e-12);
    }

    #[test]
    fn test_singular_material_is_reported() {
        // 1/E1·1/E2 = (nu12/E1)² makes S exactly singular
        let degenerate = LaminaProperties { e1: 1.0, e2: 1.0, g12: 1.0, nu12: 1.0 };
        let err = transform(&degenerate, Degrees(0.0)).unwrap_err();
        assert_eq!(err.error_code(), "SINGULAR_MATRIX");
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn test_calculate_rejects_invalid_input() {
        let input = LaminaInput {
            material: LaminaProperties { e1: -150000.0, ..carbon_epoxy() },
            layup_angle: 45.0,
        };
        let err = calculate(&input, &ValidationLimits::default()).unwrap_err();
        assert_eq!(err.http_status(), 422);
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{"E1": 150000, "E2": 10000, "G12": 5000, "nu12": 0.3, "layup_angle": 45}"#;
        let input: LaminaInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.material.e1, 150000.0);

        let result = calculate(&input, &ValidationLimits::default()).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        for key in ["E_1", "E_2", "G_12", "nu_12", "eta_1_12", "eta_2_12", "Q", "S"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["Q"].as_array().unwrap().len(), 3);
    }
}
