//! # Layup Sequences
//!
//! Expands compact stacking notation into an ordered list of ply angles.
//!
//! ## Notation
//!
//! ```text
//! 0/90/45          three plies, as written
//! [0/90/45]        same; brackets alone change nothing
//! [0/90]3          base repeated 3 times
//! [30/45]s         base followed by its mirror image
//! [30/45]2s        base repeated twice, then mirrored
//! [30/45]s2        base mirrored, then the whole stack repeated twice
//! [0/45]2s3        repeat 2, mirror, repeat 3
//! ```
//!
//! Expansion order is always: base → pre-repeat → mirror → post-repeat.
//!
//! ## Example
//!
//! ```rust
//! use composite_core::layup::LayupSequence;
//!
//! let layup = LayupSequence::parse("[30/45]2s").unwrap();
//! assert_eq!(layup.angles_deg(), vec![30.0, 45.0, 30.0, 45.0, 45.0, 30.0, 45.0, 30.0]);
//! ```

use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};
use crate::units::Degrees;

/// Upper bound on expanded ply count
pub const MAX_PLIES: usize = 10_000;

/// An expanded stacking sequence, bottom ply first.
#[derive(Debug, Clone, PartialEq)]
pub struct LayupSequence {
    /// The notation this sequence was expanded from
    pub notation: String,
    angles: Vec<Degrees>,
}

/// One ply of a uniform-thickness laminate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ply {
    pub angle: Degrees,
    pub thickness: f64,
    /// Midplane z-coordinate of this ply relative to the laminate midplane
    pub z_mid: f64,
}

impl LayupSequence {
    /// Parse and expand a layup notation.
    ///
    /// # Errors
    ///
    /// `CalcError::InvalidLayup` for empty lists, non-numeric angles, zero or
    /// non-integer repeat counts, repeated symmetry markers, or expansions
    /// beyond [`MAX_PLIES`].
    pub fn parse(notation: &str) -> CalcResult<Self> {
        let invalid = |reason: String| CalcError::invalid_layup(notation, reason);
        let trimmed = notation.trim();

        let (base, suffix) = match trimmed.split_once(']') {
            Some((head, tail)) if !tail.trim().is_empty() => (head.replace('[', ""), Some(tail.trim())),
            _ => (trimmed.replace(['[', ']'], ""), None),
        };

        let base_angles = base
            .split('/')
            .map(|token| {
                let token = token.trim();
                token
                    .parse::<f64>()
                    .ok()
                    .filter(|a| a.is_finite())
                    .map(Degrees)
                    .ok_or_else(|| invalid(format!("'{}' is not a ply angle", token)))
            })
            .collect::<CalcResult<Vec<_>>>()?;

        let mut before = 1;
        let mut symmetric = false;
        let mut after = 1;

        if let Some(suffix) = suffix {
            if suffix.contains('s') {
                let parts: Vec<&str> = suffix.split('s').collect();
                if parts.len() != 2 {
                    return Err(invalid("only one symmetry marker 's' is allowed".to_string()));
                }
                symmetric = true;
                before = parse_count(parts[0]).map_err(&invalid)?.unwrap_or(1);
                after = parse_count(parts[1]).map_err(&invalid)?.unwrap_or(1);
            } else {
                before = parse_count(suffix)
                    .map_err(&invalid)?
                    .ok_or_else(|| invalid("missing repeat count".to_string()))?;
            }
        }

        let mirrored = if symmetric { 2 } else { 1 };
        let total = base_angles
            .len()
            .checked_mul(before)
            .and_then(|n| n.checked_mul(mirrored))
            .and_then(|n| n.checked_mul(after))
            .filter(|n| *n <= MAX_PLIES)
            .ok_or_else(|| invalid(format!("expands to more than {} plies", MAX_PLIES)))?;

        let mut angles = base_angles.repeat(before);
        if symmetric {
            let mirror: Vec<Degrees> = angles.iter().rev().copied().collect();
            angles.extend(mirror);
        }
        let angles = angles.repeat(after);
        debug_assert_eq!(angles.len(), total);

        Ok(LayupSequence {
            notation: notation.to_string(),
            angles,
        })
    }

    /// Ply angles, bottom first.
    pub fn angles(&self) -> &[Degrees] {
        &self.angles
    }

    /// Ply angles as plain degrees.
    pub fn angles_deg(&self) -> Vec<f64> {
        self.angles.iter().map(|a| a.0).collect()
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// Total laminate thickness h = N·t.
    pub fn total_thickness(&self, layer_thickness: f64) -> f64 {
        self.angles.len() as f64 * layer_thickness
    }

    /// Plies with midplane coordinates z_i = −(N+1)·t/2 + i·t, i = 1..=N.
    pub fn plies(&self, layer_thickness: f64) -> impl Iterator<Item = Ply> + '_ {
        let n = self.angles.len() as f64;
        let t = layer_thickness;
        self.angles.iter().enumerate().map(move |(idx, &angle)| Ply {
            angle,
            thickness: t,
            z_mid: -(n + 1.0) * t / 2.0 + (idx + 1) as f64 * t,
        })
    }
}

impl FromStr for LayupSequence {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayupSequence::parse(s)
    }
}

impl std::fmt::Display for LayupSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let angles: Vec<String> = self.angles.iter().map(|a| a.0.to_string()).collect();
        write!(f, "[{}]", angles.join("/"))
    }
}

/// Parse an optional repeat count; empty text means "not given".
fn parse_count(text: &str) -> Result<Option<usize>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<usize>() {
        Ok(0) => Err("repeat count must be at least 1".to_string()),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(format!("'{}' is not a repeat count", text)),
    }
}
