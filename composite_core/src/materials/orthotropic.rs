//! Orthotropic and transversely isotropic ply/fiber properties.

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::linalg::{Matrix3, Matrix6};
use crate::validation::{require_poisson, require_positive, ValidationLimits};

/// In-plane properties of a unidirectional ply (plane stress).
///
/// ## JSON Example
///
/// ```json
/// { "E1": 150000.0, "E2": 10000.0, "G12": 5000.0, "nu12": 0.3 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaminaProperties {
    /// Longitudinal modulus (fiber direction)
    #[serde(rename = "E1")]
    pub e1: f64,

    /// Transverse modulus
    #[serde(rename = "E2")]
    pub e2: f64,

    /// In-plane shear modulus
    #[serde(rename = "G12")]
    pub g12: f64,

    /// Major in-plane Poisson's ratio
    pub nu12: f64,
}

impl LaminaProperties {
    /// Validate moduli and Poisson's ratio.
    pub fn validate(&self, limits: &ValidationLimits) -> CalcResult<()> {
        require_positive("E1", self.e1)?;
        require_positive("E2", self.e2)?;
        require_positive("G12", self.g12)?;
        require_poisson("nu12", self.nu12, limits)
    }

    /// Plane-stress compliance in material axes.
    pub fn compliance(&self) -> Matrix3 {
        let (e1, e2, g12, nu12) = (self.e1, self.e2, self.g12, self.nu12);
        #[rustfmt::skip]
        let s = Matrix3::new(
            1.0 / e1,     -nu12 / e1,   0.0,
            -nu12 / e1,   1.0 / e2,     0.0,
            0.0,          0.0,          1.0 / g12,
        );
        s
    }
}

/// Properties of a transversely isotropic material (1 = fiber axis, 2-3 plane isotropic).
///
/// Used for laminate plies in the 3D homogenizer and for fibers in the
/// micromechanics rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransverselyIsotropicProperties {
    #[serde(rename = "E1")]
    pub e1: f64,

    #[serde(rename = "E2")]
    pub e2: f64,

    #[serde(rename = "G12")]
    pub g12: f64,

    pub nu12: f64,

    /// Transverse Poisson's ratio, fixes G23 = E2 / (2(1 + nu23))
    pub nu23: f64,
}

impl TransverselyIsotropicProperties {
    /// Validate moduli and both Poisson's ratios.
    ///
    /// `prefix` is prepended to field names in errors (e.g. "fiber_").
    pub fn validate(&self, prefix: &str, limits: &ValidationLimits) -> CalcResult<()> {
        require_positive(&format!("{prefix}E1"), self.e1)?;
        require_positive(&format!("{prefix}E2"), self.e2)?;
        require_positive(&format!("{prefix}G12"), self.g12)?;
        require_poisson(&format!("{prefix}nu12"), self.nu12, limits)?;
        require_poisson(&format!("{prefix}nu23"), self.nu23, limits)
    }

    /// The in-plane subset used by plate theory.
    pub fn in_plane(&self) -> LaminaProperties {
        LaminaProperties {
            e1: self.e1,
            e2: self.e2,
            g12: self.g12,
            nu12: self.nu12,
        }
    }

    /// Full 9-constant set: E3 = E2, G13 = G12, nu13 = nu12, G23 from E2 and nu23.
    pub fn expand(&self) -> EngineeringConstants {
        EngineeringConstants {
            e1: self.e1,
            e2: self.e2,
            e3: self.e2,
            g12: self.g12,
            g13: self.g12,
            g23: self.e2 / (2.0 * (1.0 + self.nu23)),
            nu12: self.nu12,
            nu13: self.nu12,
            nu23: self.nu23,
        }
    }
}

/// The nine engineering constants of an orthotropic solid.
///
/// Shear ordering in the 6×6 matrices is 3 = 23, 4 = 13, 5 = 12.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineeringConstants {
    #[serde(rename = "E1")]
    pub e1: f64,
    #[serde(rename = "E2")]
    pub e2: f64,
    #[serde(rename = "E3")]
    pub e3: f64,
    #[serde(rename = "G12")]
    pub g12: f64,
    #[serde(rename = "G13")]
    pub g13: f64,
    #[serde(rename = "G23")]
    pub g23: f64,
    pub nu12: f64,
    pub nu13: f64,
    pub nu23: f64,
}

impl EngineeringConstants {
    /// Assemble the orthotropic compliance matrix.
    pub fn compliance(&self) -> Matrix6 {
        let c = self;
        #[rustfmt::skip]
        let s = Matrix6::new(
            1.0 / c.e1,        -c.nu12 / c.e1,   -c.nu13 / c.e1,   0.0,          0.0,          0.0,
            -c.nu12 / c.e1,    1.0 / c.e2,       -c.nu23 / c.e2,   0.0,          0.0,          0.0,
            -c.nu13 / c.e1,    -c.nu23 / c.e2,   1.0 / c.e3,       0.0,          0.0,          0.0,
            0.0,               0.0,              0.0,              1.0 / c.g23,  0.0,          0.0,
            0.0,               0.0,              0.0,              0.0,          1.0 / c.g13,  0.0,
            0.0,               0.0,              0.0,              0.0,          0.0,          1.0 / c.g12,
        );
        s
    }

    /// Read the constants back off a compliance matrix.
    pub fn from_compliance(s: &Matrix6) -> Self {
        EngineeringConstants {
            e1: 1.0 / s[(0, 0)],
            e2: 1.0 / s[(1, 1)],
            e3: 1.0 / s[(2, 2)],
            g12: 1.0 / s[(5, 5)],
            g13: 1.0 / s[(4, 4)],
            g23: 1.0 / s[(3, 3)],
            nu12: -s[(0, 1)] / s[(0, 0)],
            nu13: -s[(0, 2)] / s[(0, 0)],
            nu23: -s[(1, 2)] / s[(1, 1)],
        }
    }
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

    #[test]
    fn test_transverse_isotropy_expansion() {
        let c = carbon_ply().expand();
        assert_eq!(c.e3, c.e2);
        assert_eq!(c.g13, c.g12);
        assert_eq!(c.nu13, c.nu12);
        // G23 = 10000 / (2 * 1.25)
        assert_relative_eq!(c.g23, 4000.0);
    }

    #[test]
    fn test_constants_survive_compliance_roundtrip() {
        let c = carbon_ply().expand();
        let back = EngineeringConstants::from_compliance(&c.compliance());
        assert_relative_eq!(back.e1, c.e1, max_relative = 1e-12);
        assert_relative_eq!(back.g23, c.g23, max_relative = 1e-12);
        assert_relative_eq!(back.nu23, c.nu23, max_relative = 1e-12);
    }

    #[test]
    fn test_lamina_compliance_entries() {
        let s = carbon_ply().in_plane().compliance();
        assert_relative_eq!(s[(0, 0)], 1.0 / 150000.0);
        assert_relative_eq!(s[(0, 1)], -0.3 / 150000.0);
        assert_eq!(s[(0, 1)], s[(1, 0)]);
        assert_eq!(s[(0, 2)], 0.0);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(carbon_ply().expand()).unwrap();
        assert!(json.get("E3").is_some());
        assert!(json.get("G23").is_some());
        assert!(json.get("nu13").is_some());
    }

    #[test]
    fn test_validation_prefixes_field_names() {
        let mut fiber = carbon_ply();
        fiber.e2 = -1.0;
        let err = fiber.validate("fiber_", &ValidationLimits::default()).unwrap_err();
        assert!(err.to_string().contains("fiber_E2"));
    }
}
