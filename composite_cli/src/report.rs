//! Human-readable terminal reports.
//!
//! Each report wraps a borrowed result and renders through `Display`, so the
//! same text can go to stdout or be captured in tests.

use std::fmt;

use composite_core::calculations::udfrc::MixingRule;
use composite_core::calculations::{LaminaResult, PlateProperties, PlateResult, ThreeDimensionalProperties, UdfrcResult};
use composite_core::linalg::{to_rows, Matrix3, Matrix6};
use composite_core::materials::EngineeringConstants;

const RULE: &str = "═══════════════════════════════════════";

fn banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{RULE}")?;
    writeln!(f, "  {title}")?;
    writeln!(f, "{RULE}")
}

fn matrix_rows(f: &mut fmt::Formatter<'_>, name: &str, rows: Vec<Vec<f64>>) -> fmt::Result {
    writeln!(f, "{name}:")?;
    for row in rows {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>13.5e}")).collect();
        writeln!(f, "  [{}]", cells.join(" "))?;
    }
    Ok(())
}

fn matrix3(f: &mut fmt::Formatter<'_>, name: &str, m: &Matrix3) -> fmt::Result {
    matrix_rows(f, name, to_rows(m))
}

fn matrix6(f: &mut fmt::Formatter<'_>, name: &str, m: &Matrix6) -> fmt::Result {
    matrix_rows(f, name, to_rows(m))
}

fn constants(f: &mut fmt::Formatter<'_>, c: &EngineeringConstants) -> fmt::Result {
    writeln!(f, "  E1   = {:>12.1}    G12  = {:>10.1}    nu12 = {:.4}", c.e1, c.g12, c.nu12)?;
    writeln!(f, "  E2   = {:>12.1}    G13  = {:>10.1}    nu13 = {:.4}", c.e2, c.g13, c.nu13)?;
    writeln!(f, "  E3   = {:>12.1}    G23  = {:>10.1}    nu23 = {:.4}", c.e3, c.g23, c.nu23)
}

fn plate_properties(f: &mut fmt::Formatter<'_>, title: &str, p: &PlateProperties) -> fmt::Result {
    writeln!(f, "{title}:")?;
    writeln!(f, "  Ex   = {:>12.1}    Ey   = {:>12.1}    Gxy = {:.1}", p.e1, p.e2, p.g12)?;
    writeln!(f, "  nuxy = {:>12.4}    eta121 = {:>10.4}    eta122 = {:.4}", p.nu12, p.eta121, p.eta122)
}

/// Off-axis ply constants.
pub struct LaminaReport<'a> {
    pub angle: f64,
    pub result: &'a LaminaResult,
}

impl fmt::Display for LaminaReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        banner(f, &format!("LAMINA AT {}°", self.angle))?;
        writeln!(f)?;
        writeln!(f, "  Ex   = {:>12.1}", r.e_1)?;
        writeln!(f, "  Ey   = {:>12.1}", r.e_2)?;
        writeln!(f, "  Gxy  = {:>12.1}", r.g_12)?;
        writeln!(f, "  nuxy = {:>12.4}", r.nu_12)?;
        writeln!(f, "  eta_x,xy = {:.4}    eta_y,xy = {:.4}", r.eta_1_12, r.eta_2_12)?;
        writeln!(f)?;
        matrix3(f, "Q (transformed stiffness)", &r.q)?;
        matrix3(f, "S (transformed compliance)", &r.s)
    }
}

/// ABD matrices and plate properties.
pub struct PlateReport<'a> {
    pub layup: &'a str,
    pub result: &'a PlateResult,
}

impl fmt::Display for PlateReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        banner(f, &format!("PLATE {}", self.layup))?;
        writeln!(f)?;
        matrix3(f, "A", &r.a)?;
        matrix3(f, "B", &r.b)?;
        matrix3(f, "D", &r.d)?;
        writeln!(f)?;
        plate_properties(f, "In-plane", &r.in_plane_properties)?;
        plate_properties(f, "Flexural", &r.flexural_properties)
    }
}

/// Effective 3D properties under a heading.
pub struct SolidReport<'a> {
    pub title: &'a str,
    pub result: &'a ThreeDimensionalProperties,
}

impl fmt::Display for SolidReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, self.title)?;
        writeln!(f)?;
        constants(f, &self.result.constants)?;
        writeln!(f)?;
        matrix6(f, "Effective stiffness", &self.result.stiffness)
    }
}

/// All three rules of mixture, side by side.
pub struct UdfrcReport<'a> {
    pub fiber_volume_fraction: f64,
    pub result: &'a UdfrcResult,
}

impl fmt::Display for UdfrcReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, &format!("UDFRC, Vf = {}", self.fiber_volume_fraction))?;
        writeln!(f)?;
        writeln!(
            f,
            "  {:<8}{:>12}{:>12}{:>10}{:>10}{:>9}{:>9}",
            "Rule", "E1", "E2", "G12", "G23", "nu12", "nu23"
        )?;
        for rule in MixingRule::ALL {
            let c = self.result.get(rule).constants;
            writeln!(
                f,
                "  {:<8}{:>12.1}{:>12.1}{:>10.1}{:>10.1}{:>9.4}{:>9.4}",
                rule.name(),
                c.e1,
                c.e2,
                c.g12,
                c.g23,
                c.nu12,
                c.nu23
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use composite_core::calculations::udfrc::micromechanics;
    use composite_core::materials::{IsotropicProperties, TransverselyIsotropicProperties};

    #[test]
    fn udfrc_report_lists_every_rule() {
        let fiber = TransverselyIsotropicProperties {
            e1: 150000.0,
            e2: 10000.0,
            g12: 5000.0,
            nu12: 0.3,
            nu23: 0.25,
        };
        let matrix = IsotropicProperties { e: 2500.0, nu: 0.35 };
        let result = micromechanics(&fiber, &matrix, 0.6).unwrap();

        let text = UdfrcReport {
            fiber_volume_fraction: 0.6,
            result: &result,
        }
        .to_string();

        assert!(text.contains("Vf = 0.6"));
        for rule in ["Voigt", "Reuss", "Hybrid"] {
            assert!(text.contains(rule), "{rule} missing");
        }
        assert!(text.contains("91000.0"));
    }
}
