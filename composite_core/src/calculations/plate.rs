//! # Laminate Plate Homogenizer
//!
//! Classical laminate theory for a stack of identical plies of uniform
//! thickness: in-plane (A), coupling (B) and flexural (D) stiffness, plus
//! effective in-plane and flexural engineering properties.
//!
//! ## Assumptions
//!
//! - All plies share one material and one thickness
//! - Plies are stacked about a z = 0 midplane
//! - Effective properties come from A and D only; B is reported but does
//!   not enter them (coupled stretching-bending response is not reduced to
//!   constants here)
//!
//! ## Example
//!
//! ```rust
//! use composite_core::calculations::plate::{calculate, PlateInput};
//! use composite_core::materials::LaminaProperties;
//! use composite_core::validation::ValidationLimits;
//!
//! let input = PlateInput {
//!     material: LaminaProperties { e1: 150000.0, e2: 10000.0, g12: 5000.0, nu12: 0.3 },
//!     layup_sequence: "[45/90/-45]s".to_string(),
//!     layer_thickness: 0.125,
//! };
//! let result = calculate(&input, &ValidationLimits::default()).unwrap();
//! println!("Ex = {:.0}", result.in_plane_properties.e1);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CalcResult;
use crate::layup::LayupSequence;
use crate::linalg::{invert3, stress_rotation, Matrix3};
use crate::materials::LaminaProperties;
use crate::validation::{require_positive, ValidationLimits};

/// Input for the plate homogenizer.
///
/// ## JSON Example
///
/// ```json
/// {
///   "E1": 150000, "E2": 10000, "G12": 5000, "nu12": 0.3,
///   "layup_sequence": "[45/90/-45]s",
///   "layer_thickness": 0.125
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateInput {
    #[serde(flatten)]
    pub material: LaminaProperties,

    /// Stacking notation, e.g. "[30/45]2s" or "0/90/45"
    pub layup_sequence: String,

    /// Thickness of every ply
    pub layer_thickness: f64,
}

impl PlateInput {
    pub fn validate(&self, limits: &ValidationLimits) -> CalcResult<()> {
        self.material.validate(limits)?;
        require_positive("layer_thickness", self.layer_thickness)
    }
}

/// Effective plate constants read off a normalized 3×3 compliance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateProperties {
    pub e1: f64,
    pub e2: f64,
    pub g12: f64,
    pub nu12: f64,
    /// −S₁₆/S₆₆
    pub eta121: f64,
    /// −S₂₆/S₆₆
    pub eta122: f64,
}

impl PlateProperties {
    pub fn from_compliance(s: &Matrix3) -> Self {
        PlateProperties {
            e1: 1.0 / s[(0, 0)],
            e2: 1.0 / s[(1, 1)],
            g12: 1.0 / s[(2, 2)],
            nu12: -s[(0, 1)] / s[(0, 0)],
            eta121: -s[(0, 2)] / s[(2, 2)],
            eta122: -s[(1, 2)] / s[(2, 2)],
        }
    }
}

/// ABD matrices and effective plate properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateResult {
    /// In-plane stiffness Σ Q̄ₖ·t
    #[serde(rename = "A", with = "crate::linalg::rows")]
    pub a: Matrix3,

    /// Coupling stiffness Σ Q̄ₖ·t·zₖ
    #[serde(rename = "B", with = "crate::linalg::rows")]
    pub b: Matrix3,

    /// Flexural stiffness Σ Q̄ₖ·(t·zₖ² + t³/12)
    #[serde(rename = "D", with = "crate::linalg::rows")]
    pub d: Matrix3,

    /// From A⁻¹·h
    pub in_plane_properties: PlateProperties,

    /// From D⁻¹·h³/12
    pub flexural_properties: PlateProperties,
}

/// Validate, expand the layup and homogenize.
pub fn calculate(input: &PlateInput, limits: &ValidationLimits) -> CalcResult<PlateResult> {
    input.validate(limits)?;
    let layup = LayupSequence::parse(&input.layup_sequence)?;
    homogenize_plate(&input.material, &layup, input.layer_thickness)
}

/// Assemble A, B, D for `layup` and extract effective properties.
///
/// # Errors
///
/// `CalcError::SingularMatrix` if the ply compliance, A, or D cannot be inverted.
pub fn homogenize_plate(
    props: &LaminaProperties,
    layup: &LayupSequence,
    layer_thickness: f64,
) -> CalcResult<PlateResult> {
    let t = layer_thickness;
    let q_ply = invert3(props.compliance(), "S")?;

    let mut a = Matrix3::zeros();
    let mut b = Matrix3::zeros();
    let mut d = Matrix3::zeros();

    for ply in layup.plies(t) {
        let r = stress_rotation(ply.angle);
        let q = r * q_ply * r.transpose();
        let z = ply.z_mid;

        a += q * t;
        b += q * (t * z);
        d += q * (t * z * z + t.powi(3) / 12.0);
    }

    let h = layup.total_thickness(t);
    let in_plane = invert3(a, "A")? * h;
    let flexural = invert3(d, "D")? * (h.powi(3) / 12.0);

    debug!(plies = layup.len(), thickness = h, "plate homogenized");

    Ok(PlateResult {
        a,
        b,
        d,
        in_plane_properties: PlateProperties::from_compliance(&in_plane),
        flexural_properties: PlateProperties::from_compliance(&flexural),
    })
}
