//! Thermal via array conduction.
//!
//! Treats each plated via barrel as a copper tube and the array as tubes in
//! parallel:
//!
//! ```text
//! Do = Di + 2t
//! A  = n × π/4 × (Do² − Di²)
//! Rθ = h / (k × A)
//! ```
//!
//! Only conduction through the barrel copper is counted. Spreading
//! resistance, pad contact resistance, solder or resin fill and conduction
//! through the surrounding dielectric are left out, so the result is a lower
//! bound on the real thermal resistance.

use std::f64::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::calc::constants::{floor_area, CopperProperties};
use crate::calc::report::{fixed, scientific, Report};
use crate::calc::units;
use crate::calc::Calculator;

/// Inputs to the thermal via calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThermalViaInput {
    /// Number of vias in the array.
    pub via_count: u32,
    /// Finished (plated) hole diameter in millimetres.
    pub finished_hole_diameter_mm: f64,
    /// Barrel plating thickness in millimetres.
    pub plating_thickness_mm: f64,
    /// Board thickness (barrel length) in millimetres.
    pub board_thickness_mm: f64,
    /// Thermal conductivity of the plating in W/(m·K).
    pub thermal_conductivity: f64,
}

impl ThermalViaInput {
    /// Default geometry with the thermal conductivity of `material`.
    #[must_use]
    pub fn for_material(material: &CopperProperties) -> Self {
        Self {
            thermal_conductivity: material.thermal_conductivity,
            ..Self::default()
        }
    }
}

impl Default for ThermalViaInput {
    fn default() -> Self {
        Self {
            via_count: 16,
            finished_hole_diameter_mm: 0.3,
            plating_thickness_mm: 0.025,
            board_thickness_mm: 1.6,
            thermal_conductivity: CopperProperties::ANNEALED.thermal_conductivity,
        }
    }
}

/// Quantities derived from a [`ThermalViaInput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermalViaResult {
    /// Barrel outer diameter in millimetres.
    pub outer_diameter_mm: f64,
    /// Annular copper area of one via in mm².
    pub per_via_copper_area_mm2: f64,
    /// Copper area of the whole array in m².
    pub total_copper_area_m2: f64,
    /// Conductive thermal resistance through the board, in K/W.
    pub thermal_resistance_k_per_w: f64,
}

impl ThermalViaResult {
    /// Renders the result for display.
    #[must_use]
    pub fn report(&self) -> Report {
        Report::new("Thermal via array")
            .line("Outer diameter", fixed(self.outer_diameter_mm, 4, "mm"))
            .line(
                "Copper area per via",
                fixed(self.per_via_copper_area_mm2, 6, "mm²"),
            )
            .line(
                "Total copper area",
                format!(
                    "{} ({:.6} mm²)",
                    scientific(self.total_copper_area_m2, "m²"),
                    units::m2_to_mm2(self.total_copper_area_m2)
                ),
            )
            .line(
                "Thermal resistance",
                fixed(self.thermal_resistance_k_per_w, 3, "K/W"),
            )
    }
}

/// Calculator for the vertical conductive resistance of a via array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThermalViaEngine;

impl ThermalViaEngine {
    /// Creates a new thermal via calculator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Calculator for ThermalViaEngine {
    type Input = ThermalViaInput;
    type Output = ThermalViaResult;

    fn compute(&self, input: &ThermalViaInput) -> ThermalViaResult {
        let inner = input.finished_hole_diameter_mm;
        let outer_diameter_mm = 2.0f64.mul_add(input.plating_thickness_mm, inner);

        // Factored so that zero plating gives an area of exactly zero
        let per_via_copper_area_mm2 =
            FRAC_PI_4 * (outer_diameter_mm - inner) * (outer_diameter_mm + inner);

        let total_copper_area_m2 =
            floor_area(units::mm2_to_m2(per_via_copper_area_mm2 * f64::from(input.via_count)));

        let thermal_resistance_k_per_w = units::mm_to_m(input.board_thickness_mm)
            / (input.thermal_conductivity * total_copper_area_m2);

        ThermalViaResult {
            outer_diameter_mm,
            per_via_copper_area_mm2,
            total_copper_area_m2,
            thermal_resistance_k_per_w,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario() {
        let result = ThermalViaEngine::new().compute(&ThermalViaInput::default());

        let per_via = std::f64::consts::PI / 4.0 * (0.35f64.powi(2) - 0.3f64.powi(2));
        let total = 16.0 * per_via * 1e-6;
        let r_theta = 0.0016 / (385.0 * total);

        assert!((result.outer_diameter_mm - 0.35).abs() < 1e-12);
        assert!((result.per_via_copper_area_mm2 - per_via).abs() < 1e-12);
        assert!((result.total_copper_area_m2 - total).abs() < 1e-18);
        assert!((result.thermal_resistance_k_per_w - r_theta).abs() < 1e-9 * r_theta);
    }

    #[test]
    fn zero_vias_is_large_but_finite() {
        let input = ThermalViaInput {
            via_count: 0,
            ..ThermalViaInput::default()
        };
        let result = ThermalViaEngine::new().compute(&input);
        assert!(result.thermal_resistance_k_per_w.is_finite());
        assert!(result.thermal_resistance_k_per_w > 1e9);
    }

    #[test]
    fn doubling_vias_halves_resistance() {
        let engine = ThermalViaEngine::new();
        let base = engine.compute(&ThermalViaInput::default());
        let doubled = engine.compute(&ThermalViaInput {
            via_count: 32,
            ..ThermalViaInput::default()
        });
        let ratio = base.thermal_resistance_k_per_w / doubled.thermal_resistance_k_per_w;
        assert!((ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn report_lists_thermal_resistance() {
        let report = ThermalViaEngine::new()
            .compute(&ThermalViaInput::default())
            .report();
        assert!(report.value("Thermal resistance").unwrap().ends_with("K/W"));
        assert_eq!(report.value("Outer diameter"), Some("0.3500 mm"));
    }
}
