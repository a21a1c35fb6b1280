//! # Materials
//!
//! Constituent and ply property sets, and the one place where a handful of
//! input constants is expanded into the full orthotropic description.
//!
//! ## Material Types
//!
//! - **Lamina**: plane-stress ply (`E1, E2, G12, nu12`)
//! - **Transversely isotropic**: ply or fiber with `nu23` (`E3 = E2`, `G13 = G12`, `nu13 = nu12`)
//! - **Isotropic**: matrix resin (`E1, nu`)
//!
//! ## Example
//!
//! ```rust
//! use composite_core::materials::{expand_transversely_isotropic, TransverselyIsotropicProperties};
//!
//! let ply = TransverselyIsotropicProperties { e1: 150000.0, e2: 10000.0, g12: 5000.0, nu12: 0.3, nu23: 0.25 };
//! let expanded = expand_transversely_isotropic(&ply);
//! assert_eq!(expanded.constants.e3, 10000.0);
//! assert!((expanded.compliance[(3, 3)] - 1.0 / 4000.0).abs() < 1e-15);
//! ```

pub mod isotropic;
pub mod orthotropic;

pub use isotropic::IsotropicProperties;
pub use orthotropic::{EngineeringConstants, LaminaProperties, TransverselyIsotropicProperties};

use crate::linalg::Matrix6;

/// Nine engineering constants together with their assembled 6×6 compliance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandedMaterial {
    pub constants: EngineeringConstants,
    pub compliance: Matrix6,
}

impl From<EngineeringConstants> for ExpandedMaterial {
    fn from(constants: EngineeringConstants) -> Self {
        ExpandedMaterial {
            compliance: constants.compliance(),
            constants,
        }
    }
}

/// Expand `(E1, E2, G12, nu12, nu23)` into the full constant set and compliance.
///
/// Shared by the 3D laminate homogenizer and the fiber side of every
/// micromechanics rule.
pub fn expand_transversely_isotropic(props: &TransverselyIsotropicProperties) -> ExpandedMaterial {
    props.expand().into()
}

/// Expand an isotropic matrix into the same representation as a fiber.
pub fn expand_isotropic(props: &IsotropicProperties) -> ExpandedMaterial {
    props.expand().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isotropic_compliance_is_symmetric() {
        let m = expand_isotropic(&IsotropicProperties { e: 3500.0, nu: 0.35 });
        assert_eq!(m.compliance, m.compliance.transpose());
        assert_eq!(m.compliance[(0, 1)], m.compliance[(1, 2)]);
    }
}
