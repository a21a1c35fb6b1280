//! # Laminate 3D Homogenizer
//!
//! Effective 3D stiffness, compliance and engineering constants of a
//! laminate of identical transversely isotropic plies.
//!
//! Each ply's 6×6 stiffness is rotated about the laminate normal and the
//! rotated stiffnesses are averaged with equal weight. With uniform ply
//! thickness this is the thickness-weighted average; `layer_thickness` is
//! validated but does not otherwise enter the result.
//!
//! ## Example
//!
//! ```rust
//! use composite_core::calculations::laminate_3d::{calculate, Laminate3dInput};
//! use composite_core::materials::TransverselyIsotropicProperties;
//! use composite_core::validation::ValidationLimits;
//!
//! let input = Laminate3dInput {
//!     material: TransverselyIsotropicProperties { e1: 150000.0, e2: 10000.0, g12: 5000.0, nu12: 0.3, nu23: 0.25 },
//!     layup_sequence: "[30/45]2s".to_string(),
//!     layer_thickness: 0.125,
//! };
//! let result = calculate(&input, &ValidationLimits::default()).unwrap();
//! assert!(result.constants.e3 > 0.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CalcResult;
use crate::layup::LayupSequence;
use crate::linalg::{invert6, stress_rotation_3d, Matrix6};
use crate::materials::{expand_transversely_isotropic, EngineeringConstants, TransverselyIsotropicProperties};
use crate::validation::{require_positive, ValidationLimits};

use super::ThreeDimensionalProperties;

/// Input for the 3D laminate homogenizer.
///
/// ## JSON Example
///
/// ```json
/// {
///   "E1": 150000, "E2": 10000, "G12": 5000, "nu12": 0.3, "nu23": 0.25,
///   "layup_sequence": "[30/45]2s",
///   "layer_thickness": 0.125
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laminate3dInput {
    #[serde(flatten)]
    pub material: TransverselyIsotropicProperties,

    pub layup_sequence: String,

    pub layer_thickness: f64,
}

impl Laminate3dInput {
    pub fn validate(&self, limits: &ValidationLimits) -> CalcResult<()> {
        self.material.validate("", limits)?;
        require_positive("layer_thickness", self.layer_thickness)
    }
}

/// Validate, expand the layup and homogenize.
pub fn calculate(input: &Laminate3dInput, limits: &ValidationLimits) -> CalcResult<ThreeDimensionalProperties> {
    input.validate(limits)?;
    let layup = LayupSequence::parse(&input.layup_sequence)?;
    homogenize_3d(&input.material, &layup)
}

/// Average the rotated ply stiffnesses and invert for the effective compliance.
///
/// # Errors
///
/// `CalcError::SingularMatrix` if the ply compliance or the averaged
/// stiffness cannot be inverted.
pub fn homogenize_3d(
    props: &TransverselyIsotropicProperties,
    layup: &LayupSequence,
) -> CalcResult<ThreeDimensionalProperties> {
    let ply = expand_transversely_isotropic(props);
    let c_ply = invert6(ply.compliance, "Sp")?;

    let sum = layup.angles().iter().fold(Matrix6::zeros(), |acc, &angle| {
        let r = stress_rotation_3d(angle);
        acc + r * c_ply * r.transpose()
    });
    let stiffness: Matrix6 = sum / layup.len() as f64;
    let compliance = invert6(stiffness, "C")?;

    debug!(plies = layup.len(), "3D laminate homogenized");

    Ok(ThreeDimensionalProperties {
        stiffness,
        compliance,
        constants: EngineeringConstants::from_compliance(&compliance),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn carbon_ply() -> TransverselyIsotropicProperties {
        TransverselyIsotropicProperties {
            e1: 150000.0,
            e2: 10000.0,
            g12: 5000.0,
            nu12: 0.3,
            nu23: 0.25,
        }
    }

    fn homogenize(notation: &str) -> ThreeDimensionalProperties {
        homogenize_3d(&carbon_ply(), &LayupSequence::parse(notation).unwrap()).unwrap()
    }

    #[test]
    fn test_unidirectional_recovers_ply_constants() {
        let c = homogenize("[0]").constants;
        assert_relative_eq!(c.e1, 150000.0, max_relative = 1e-9);
        assert_relative_eq!(c.e3, 10000.0, max_relative = 1e-9);
        assert_relative_eq!(c.g23, 4000.0, max_relative = 1e-9);
        assert_relative_eq!(c.nu13, 0.3, max_relative = 1e-9);
        assert_relative_eq!(c.nu23, 0.25, max_relative = 1e-9);
    }

    #[test]
    fn test_cross_angle_regression() {
        let c = homogenize("[0/90/45]").constants;
        assert_relative_eq!(c.e1, 60242.557709824, max_relative = 1e-9);
        assert_relative_eq!(c.e2, 60242.557709824, max_relative = 1e-9);
        assert_relative_eq!(c.e3, 10461.302240976, max_relative = 1e-9);
        assert_relative_eq!(c.g12, 12953.127777596, max_relative = 1e-9);
        assert_relative_eq!(c.g13, 4493.8271604938, max_relative = 1e-9);
        assert_relative_eq!(c.nu12, 0.094761825871283, max_relative = 1e-9);
        assert_relative_eq!(c.nu23, 0.27428272410650, max_relative = 1e-9);
    }

    #[test]
    fn test_symmetric_repeat_regression() {
        let c = homogenize("[30/45]2s").constants;
        assert_relative_eq!(c.e1, 21314.055446579, max_relative = 1e-9);
        assert_relative_eq!(c.e2, 14090.377244148, max_relative = 1e-9);
        assert_relative_eq!(c.g12, 8645.8662625394, max_relative = 1e-9);
        assert_relative_eq!(c.nu13, 0.21667308294683, max_relative = 1e-9);
    }

    #[test]
    fn test_stacking_order_does_not_matter() {
        let a = homogenize("0/90/45");
        let b = homogenize("45/0/90");
        assert_relative_eq!(a.stiffness, b.stiffness, epsilon = 1e-6, max_relative = 1e-12);
    }

    #[test]
    fn test_stiffness_and_compliance_are_inverse() {
        let r = homogenize("[0/45/-45/90]s");
        let product = r.stiffness * r.compliance;
        assert_relative_eq!(product, Matrix6::identity(), epsilon = 1e-9);
    }

    #[test]
    fn test_thickness_validated() {
        let input = Laminate3dInput {
            material: carbon_ply(),
            layup_sequence: "0/90".to_string(),
            layer_thickness: 0.0,
        };
        let err = calculate(&input, &ValidationLimits::default()).unwrap_err();
        assert!(err.to_string().contains("layer_thickness"));
    }
}
