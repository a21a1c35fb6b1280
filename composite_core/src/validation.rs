//! # Input Validation
//!
//! Range checks applied to every request before it reaches the mechanics.
//! The pure computations assume validated input and only guard against
//! singular matrices.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Admissible ranges for request values.
///
/// Only the Poisson window is configurable; positivity of moduli and
/// thicknesses and the `[0, 1]` volume-fraction range are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationLimits {
    /// Smallest accepted Poisson's ratio
    #[serde(default = "default_poisson_min")]
    pub poisson_min: f64,

    /// Largest accepted Poisson's ratio
    #[serde(default = "default_poisson_max")]
    pub poisson_max: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            poisson_min: default_poisson_min(),
            poisson_max: default_poisson_max(),
        }
    }
}

fn default_poisson_min() -> f64 {
    -1.0
}

fn default_poisson_max() -> f64 {
    0.5
}

impl ValidationLimits {
    /// Check that the limits themselves form a usable window.
    pub fn check(&self) -> CalcResult<()> {
        if !(self.poisson_min.is_finite() && self.poisson_max.is_finite()) || self.poisson_min > self.poisson_max {
            return Err(CalcError::invalid_input(
                "poisson_min/poisson_max",
                format!("[{}, {}]", self.poisson_min, self.poisson_max),
                "Poisson window must be finite with min <= max",
            ));
        }
        Ok(())
    }
}

/// Require a finite, strictly positive value (moduli, thickness).
pub fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be greater than 0"));
    }
    Ok(())
}

/// Require a Poisson's ratio inside the configured window.
pub fn require_poisson(field: &str, value: f64, limits: &ValidationLimits) -> CalcResult<()> {
    if !value.is_finite() || value < limits.poisson_min || value > limits.poisson_max {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            format!("Must be between {} and {}", limits.poisson_min, limits.poisson_max),
        ));
    }
    Ok(())
}

/// Require a fraction in `[0, 1]`.
pub fn require_fraction(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be between 0 and 1"));
    }
    Ok(())
}

/// Require a finite value (angles).
pub fn require_finite(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be a finite number"));
    }
    Ok(())
}
