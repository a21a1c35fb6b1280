//! # UDFRC Micromechanics
//!
//! Effective properties of a unidirectional fiber-reinforced composite from
//! its constituents and the fiber volume fraction, by three rules of mixture.
//!
//! | Rule   | Mixed quantity                  | Character              |
//! |--------|---------------------------------|------------------------|
//! | Voigt  | stiffness C (iso-strain)        | upper bound            |
//! | Reuss  | compliance S (iso-stress)       | lower bound            |
//! | Hybrid | per-constant mixing matrix      | axial Voigt, transverse Reuss |
//!
//! The fiber is transversely isotropic; the matrix is isotropic. Both are
//! expanded to nine engineering constants before mixing.
//!
//! ## Example
//!
//! ```rust
//! use composite_core::calculations::udfrc::{micromechanics, MixingRule};
//! use composite_core::materials::{IsotropicProperties, TransverselyIsotropicProperties};
//!
//! let fiber = TransverselyIsotropicProperties { e1: 230000.0, e2: 15000.0, g12: 15000.0, nu12: 0.2, nu23: 0.07 };
//! let matrix = IsotropicProperties { e: 3500.0, nu: 0.35 };
//! let result = micromechanics(&fiber, &matrix, 0.6).unwrap();
//! assert!(result.get(MixingRule::Voigt).constants.e1 >= result.get(MixingRule::Reuss).constants.e1);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CalcResult;
use crate::linalg::{invert6, Matrix6};
use crate::materials::{
    expand_isotropic, expand_transversely_isotropic, EngineeringConstants, ExpandedMaterial, IsotropicProperties,
    TransverselyIsotropicProperties,
};
use crate::validation::{require_fraction, ValidationLimits};

use super::ThreeDimensionalProperties;

// ============================================================================
// Input
// ============================================================================

/// Constituent properties and fiber volume fraction.
///
/// ## JSON Example
///
/// ```json
/// {
///   "fiber_E1": 150000, "fiber_E2": 10000, "fiber_G12": 5000,
///   "fiber_nu12": 0.3, "fiber_nu23": 0.25,
///   "matrix_E1": 2500, "matrix_nu": 0.35,
///   "fiber_volume_fraction": 0.6
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdfrcInput {
    #[serde(rename = "fiber_E1")]
    pub fiber_e1: f64,
    #[serde(rename = "fiber_E2")]
    pub fiber_e2: f64,
    #[serde(rename = "fiber_G12")]
    pub fiber_g12: f64,
    pub fiber_nu12: f64,
    pub fiber_nu23: f64,

    #[serde(rename = "matrix_E1")]
    pub matrix_e1: f64,
    pub matrix_nu: f64,

    /// Vf in [0, 1]
    pub fiber_volume_fraction: f64,
}

impl UdfrcInput {
    pub fn fiber(&self) -> TransverselyIsotropicProperties {
        TransverselyIsotropicProperties {
            e1: self.fiber_e1,
            e2: self.fiber_e2,
            g12: self.fiber_g12,
            nu12: self.fiber_nu12,
            nu23: self.fiber_nu23,
        }
    }

    pub fn matrix(&self) -> IsotropicProperties {
        IsotropicProperties {
            e: self.matrix_e1,
            nu: self.matrix_nu,
        }
    }

    pub fn validate(&self, limits: &ValidationLimits) -> CalcResult<()> {
        self.fiber().validate("fiber_", limits)?;
        self.matrix().validate("matrix_", limits)?;
        require_fraction("fiber_volume_fraction", self.fiber_volume_fraction)
    }
}

// ============================================================================
// Mixing Rules
// ============================================================================

/// A rule of mixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MixingRule {
    Voigt,
    Reuss,
    Hybrid,
}

impl MixingRule {
    pub const ALL: [MixingRule; 3] = [MixingRule::Voigt, MixingRule::Reuss, MixingRule::Hybrid];

    pub fn name(&self) -> &'static str {
        match self {
            MixingRule::Voigt => "Voigt",
            MixingRule::Reuss => "Reuss",
            MixingRule::Hybrid => "Hybrid",
        }
    }

    /// Apply this rule to expanded constituents at fiber fraction `vf`.
    ///
    /// # Errors
    ///
    /// `CalcError::SingularMatrix` if a constituent or mixed matrix cannot be inverted.
    pub fn mix(
        &self,
        fiber: &ExpandedMaterial,
        matrix: &ExpandedMaterial,
        vf: f64,
    ) -> CalcResult<ThreeDimensionalProperties> {
        match self {
            MixingRule::Voigt => voigt(fiber, matrix, vf),
            MixingRule::Reuss => reuss(fiber, matrix, vf),
            MixingRule::Hybrid => hybrid(fiber, matrix, vf),
        }
    }
}

impl std::fmt::Display for MixingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn voigt(fiber: &ExpandedMaterial, matrix: &ExpandedMaterial, vf: f64) -> CalcResult<ThreeDimensionalProperties> {
    let c_fiber = invert6(fiber.compliance, "Sf")?;
    let c_matrix = invert6(matrix.compliance, "Sm")?;
    let stiffness = c_fiber * vf + c_matrix * (1.0 - vf);
    let compliance = invert6(stiffness, "C")?;
    Ok(ThreeDimensionalProperties::from_matrices(stiffness, compliance))
}

fn reuss(fiber: &ExpandedMaterial, matrix: &ExpandedMaterial, vf: f64) -> CalcResult<ThreeDimensionalProperties> {
    let compliance = fiber.compliance * vf + matrix.compliance * (1.0 - vf);
    let stiffness = invert6(compliance, "S")?;
    Ok(ThreeDimensionalProperties::from_matrices(stiffness, compliance))
}

fn hybrid(fiber: &ExpandedMaterial, matrix: &ExpandedMaterial, vf: f64) -> CalcResult<ThreeDimensionalProperties> {
    let m = hybrid_mixing_matrix(&fiber.constants) * vf + hybrid_mixing_matrix(&matrix.constants) * (1.0 - vf);

    let e1 = m[(0, 0)];
    let nu12 = m[(0, 1)];
    let nu13 = m[(0, 2)];
    let e2 = 1.0 / (m[(1, 1)] + nu12 * nu12 / e1);
    let e3 = 1.0 / (m[(2, 2)] + nu13 * nu13 / e1);

    let constants = EngineeringConstants {
        e1,
        e2,
        e3,
        g12: 1.0 / m[(5, 5)],
        g13: 1.0 / m[(4, 4)],
        g23: 1.0 / m[(3, 3)],
        nu12,
        nu13,
        nu23: -e2 * (m[(1, 2)] + nu12 * nu12 / e1),
    };

    let compliance = constants.compliance();
    let stiffness = invert6(compliance, "S")?;
    Ok(ThreeDimensionalProperties {
        stiffness,
        compliance,
        constants,
    })
}

/// Quantities that mix linearly under the hybrid rule: E1 and the major
/// Poisson's ratios directly (iso-strain), transverse terms as compliances
/// corrected for the axial coupling (iso-stress).
fn hybrid_mixing_matrix(c: &EngineeringConstants) -> Matrix6 {
    let nu12_sq = c.nu12 * c.nu12;
    let nu13_sq = c.nu13 * c.nu13;
    #[rustfmt::skip]
    let m = Matrix6::new(
        c.e1,      c.nu12,                          c.nu13,                          0.0,          0.0,          0.0,
        -c.nu12,   1.0 / c.e2 - nu12_sq / c.e1,     -c.nu23 / c.e2 - nu13_sq / c.e1, 0.0,          0.0,          0.0,
        -c.nu23,   -c.nu23 / c.e2 - nu12_sq / c.e1, 1.0 / c.e3 - nu13_sq / c.e1,     0.0,          0.0,          0.0,
        0.0,       0.0,                             0.0,                             1.0 / c.g23,  0.0,          0.0,
        0.0,       0.0,                             0.0,                             0.0,          1.0 / c.g13,  0.0,
        0.0,       0.0,                             0.0,                             0.0,          0.0,          1.0 / c.g12,
    );
    m
}

// ============================================================================
// Result
// ============================================================================

/// One set of 3D properties per rule of mixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdfrcResult {
    #[serde(rename = "Voigt_Rules_of_Mixture")]
    pub voigt: ThreeDimensionalProperties,

    #[serde(rename = "Reuss_Rules_of_Mixture")]
    pub reuss: ThreeDimensionalProperties,

    #[serde(rename = "Hybrid_Rules_of_Mixture")]
    pub hybrid: ThreeDimensionalProperties,
}

impl UdfrcResult {
    pub fn get(&self, rule: MixingRule) -> &ThreeDimensionalProperties {
        match rule {
            MixingRule::Voigt => &self.voigt,
            MixingRule::Reuss => &self.reuss,
            MixingRule::Hybrid => &self.hybrid,
        }
    }
}

/// Validate and run all three rules.
pub fn calculate(input: &UdfrcInput, limits: &ValidationLimits) -> CalcResult<UdfrcResult> {
    input.validate(limits)?;
    micromechanics(&input.fiber(), &input.matrix(), input.fiber_volume_fraction)
}

/// Run all three rules on the given constituents.
pub fn micromechanics(
    fiber: &TransverselyIsotropicProperties,
    matrix: &IsotropicProperties,
    vf: f64,
) -> CalcResult<UdfrcResult> {
    let fiber = expand_transversely_isotropic(fiber);
    let matrix = expand_isotropic(matrix);

    let result = UdfrcResult {
        voigt: MixingRule::Voigt.mix(&fiber, &matrix, vf)?,
        reuss: MixingRule::Reuss.mix(&fiber, &matrix, vf)?,
        hybrid: MixingRule::Hybrid.mix(&fiber, &matrix, vf)?,
    };

    debug!(
        vf,
        voigt_e1 = result.voigt.constants.e1,
        reuss_e1 = result.reuss.constants.e1,
        "micromechanics complete"
    );

    Ok(result)
}
