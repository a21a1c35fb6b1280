//! # Unit Types
//!
//! Lightweight newtype wrappers for the few quantities where unit confusion
//! is a real risk. Moduli, thicknesses and volume fractions stay plain `f64`:
//! the mechanics is unit-consistent, so any coherent system (MPa/mm, psi/in)
//! works as long as inputs agree.
//!
//! Ply orientations arrive in degrees and the trigonometry wants radians,
//! which is where the wrappers earn their keep.
//!
//! ## Example
//!
//! ```rust
//! use composite_core::units::{Degrees, Radians};
//!
//! let angle = Degrees(180.0);
//! let rad: Radians = angle.into();
//! assert!((rad.0 - std::f64::consts::PI).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg};

// ============================================================================
// Angle Units
// ============================================================================

/// Angle in degrees (ply orientation relative to the laminate x-axis)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Radians(pub f64);

impl From<Degrees> for Radians {
    fn from(deg: Degrees) -> Self {
        Radians(deg.0.to_radians())
    }
}

impl From<Radians> for Degrees {
    fn from(rad: Radians) -> Self {
        Degrees(rad.0.to_degrees())
    }
}

impl Degrees {
    /// Returns `(sin, cos)` of the angle, the pair every rotation matrix needs.
    pub fn sin_cos(self) -> (f64, f64) {
        Radians::from(self).0.sin_cos()
    }
}

impl Add for Degrees {
    type Output = Degrees;
    fn add(self, rhs: Degrees) -> Degrees {
        Degrees(self.0 + rhs.0)
    }
}

impl Neg for Degrees {
    type Output = Degrees;
    fn neg(self) -> Degrees {
        Degrees(-self.0)
    }
}

impl std::fmt::Display for Degrees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.0)
    }
}
