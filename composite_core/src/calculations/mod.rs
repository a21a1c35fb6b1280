//! # Composite Property Calculations
//!
//! Every calculation follows the same pattern:
//!
//! - `*Input` - request parameters (JSON-serializable, service wire names)
//! - `*Result` - calculation output (JSON-serializable)
//! - `calculate(input, limits) -> CalcResult<*Result>` - validate, then compute
//!
//! Each module also exposes the unvalidated computation it wraps
//! (`transform`, `homogenize_plate`, `homogenize_3d`, `micromechanics`) for
//! callers that already hold typed, checked values.
//!
//! ## Available Calculations
//!
//! - [`lamina`] - off-axis constants of a single ply
//! - [`plate`] - ABD matrices and effective plate properties
//! - [`laminate_3d`] - 3D effective properties of a laminate
//! - [`udfrc`] - fiber/matrix micromechanics by three rules of mixture

pub mod lamina;
pub mod laminate_3d;
pub mod plate;
pub mod udfrc;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::linalg::Matrix6;
use crate::materials::EngineeringConstants;
use crate::validation::ValidationLimits;

// Re-export commonly used types
pub use lamina::{LaminaInput, LaminaResult};
pub use laminate_3d::Laminate3dInput;
pub use plate::{PlateInput, PlateProperties, PlateResult};
pub use udfrc::{MixingRule, UdfrcInput, UdfrcResult};

/// Effective 3D stiffness, compliance and engineering constants.
///
/// Output of the 3D laminate homogenizer and of each rule of mixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreeDimensionalProperties {
    #[serde(rename = "Effective_3D_Stiffness_Matrix", with = "crate::linalg::rows")]
    pub stiffness: Matrix6,

    #[serde(rename = "Effective_3D_Compliance_Matrix", with = "crate::linalg::rows")]
    pub compliance: Matrix6,

    #[serde(rename = "Engineering_Constants")]
    pub constants: EngineeringConstants,
}

impl ThreeDimensionalProperties {
    /// Pair a stiffness with its compliance and read the constants off the compliance.
    pub fn from_matrices(stiffness: Matrix6, compliance: Matrix6) -> Self {
        ThreeDimensionalProperties {
            constants: EngineeringConstants::from_compliance(&compliance),
            stiffness,
            compliance,
        }
    }
}

/// Enum wrapper for all calculation requests.
///
/// Lets a batch file mix request kinds while keeping each input strongly typed.
///
/// ## JSON Example
///
/// ```json
/// { "type": "lamina-engineering-constants", "E1": 150000, "E2": 10000, "G12": 5000, "nu12": 0.3, "layup_angle": 45 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CalculationItem {
    /// Off-axis constants of a single ply
    LaminaEngineeringConstants(LaminaInput),
    /// ABD matrices of a plate
    LaminatePlateProperties(PlateInput),
    /// 3D effective properties of a laminate
    #[serde(rename = "laminate-3d-properties")]
    Laminate3dProperties(Laminate3dInput),
    /// Micromechanics of a unidirectional composite
    #[serde(rename = "udfrc-properties")]
    UdfrcProperties(UdfrcInput),
}

/// Result of any calculation, matching [`CalculationItem`] variant for variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalculationOutput {
    Lamina(LaminaResult),
    Plate(PlateResult),
    Laminate3d(ThreeDimensionalProperties),
    Udfrc(UdfrcResult),
}

impl CalculationItem {
    /// Validate and run the wrapped calculation.
    pub fn calculate(&self, limits: &ValidationLimits) -> CalcResult<CalculationOutput> {
        Ok(match self {
            CalculationItem::LaminaEngineeringConstants(input) => {
                CalculationOutput::Lamina(lamina::calculate(input, limits)?)
            }
            CalculationItem::LaminatePlateProperties(input) => CalculationOutput::Plate(plate::calculate(input, limits)?),
            CalculationItem::Laminate3dProperties(input) => {
                CalculationOutput::Laminate3d(laminate_3d::calculate(input, limits)?)
            }
            CalculationItem::UdfrcProperties(input) => CalculationOutput::Udfrc(udfrc::calculate(input, limits)?),
        })
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::LaminaEngineeringConstants(_) => "lamina-engineering-constants",
            CalculationItem::LaminatePlateProperties(_) => "laminate-plate-properties",
            CalculationItem::Laminate3dProperties(_) => "laminate-3d-properties",
            CalculationItem::UdfrcProperties(_) => "udfrc-properties",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_request_roundtrip() {
        let json = r#"{
            "type": "laminate-3d-properties",
            "E1": 150000, "E2": 10000, "G12": 5000, "nu12": 0.3, "nu23": 0.25,
            "layup_sequence": "[0/90]s", "layer_thickness": 0.125
        }"#;
        let item: CalculationItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.calc_type(), "laminate-3d-properties");

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["type"], "laminate-3d-properties");
        assert_eq!(back["layup_sequence"], "[0/90]s");
    }

    #[test]
    fn test_calc_type_matches_serde_tag() {
        let item = CalculationItem::UdfrcProperties(UdfrcInput {
            fiber_e1: 150000.0,
            fiber_e2: 10000.0,
            fiber_g12: 5000.0,
            fiber_nu12: 0.3,
            fiber_nu23: 0.25,
            matrix_e1: 2500.0,
            matrix_nu: 0.35,
            fiber_volume_fraction: 0.6,
        });
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], item.calc_type());
    }

    #[test]
    fn test_dispatch_runs_the_matching_calculation() {
        let item = CalculationItem::LaminaEngineeringConstants(LaminaInput {
            material: crate::materials::LaminaProperties {
                e1: 150000.0,
                e2: 10000.0,
                g12: 5000.0,
                nu12: 0.3,
            },
            layup_angle: 0.0,
        });
        match item.calculate(&ValidationLimits::default()).unwrap() {
            CalculationOutput::Lamina(r) => assert!((r.e_1 - 150000.0).abs() < 1e-6),
            other => panic!("unexpected output: {other:?}"),
        }
    }
}
