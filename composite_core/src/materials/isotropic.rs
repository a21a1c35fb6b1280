//! Isotropic constituent (matrix resin).

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::validation::{require_poisson, require_positive, ValidationLimits};

use super::EngineeringConstants;

/// Isotropic material described by a modulus and a Poisson's ratio.
///
/// ## JSON Example
///
/// ```json
/// { "E1": 3500.0, "nu": 0.35 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsotropicProperties {
    /// Young's modulus
    #[serde(rename = "E1")]
    pub e: f64,

    /// Poisson's ratio
    pub nu: f64,
}

impl IsotropicProperties {
    pub fn validate(&self, prefix: &str, limits: &ValidationLimits) -> CalcResult<()> {
        require_positive(&format!("{prefix}E1"), self.e)?;
        require_poisson(&format!("{prefix}nu"), self.nu, limits)
    }

    /// Shear modulus G = E / (2(1 + ν)).
    pub fn shear_modulus(&self) -> f64 {
        self.e / (2.0 * (1.0 + self.nu))
    }

    /// Treat the material as a degenerate orthotropic one: equal moduli,
    /// equal shear moduli, equal Poisson's ratios.
    pub fn expand(&self) -> EngineeringConstants {
        let g = self.shear_modulus();
        EngineeringConstants {
            e1: self.e,
            e2: self.e,
            e3: self.e,
            g12: g,
            g13: g,
            g23: g,
            nu12: self.nu,
            nu13: self.nu,
            nu23: self.nu,
        }
    }
}
