//! Conductor resistance at two temperatures.
//!
//! `R(T) = ρ20 × (1 + α × (T − 20)) × L / A` with the cross-section taken
//! as width × thickness of a rectangular conductor.

use serde::{Deserialize, Serialize};

use crate::calc::constants::{rect_area, temperature_factor, CopperProperties};
use crate::calc::report::{scientific, Report};
use crate::calc::units;
use crate::calc::Calculator;

/// Inputs to the resistance vs. temperature calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResistanceTempInput {
    /// Resistivity at 20 °C in Ω·m.
    pub resistivity_20c: f64,
    /// Temperature coefficient of resistance in 1/°C.
    pub temp_coefficient: f64,
    /// First evaluation temperature in °C.
    pub temp1_c: f64,
    /// Second evaluation temperature in °C.
    pub temp2_c: f64,
    /// Conductor length in millimetres.
    pub length_mm: f64,
    /// Conductor width in millimetres.
    pub width_mm: f64,
    /// Conductor thickness in millimetres.
    pub thickness_mm: f64,
}

impl ResistanceTempInput {
    /// Default geometry with the resistivity and coefficient of `material`.
    #[must_use]
    pub fn for_material(material: &CopperProperties) -> Self {
        Self {
            resistivity_20c: material.resistivity_20c,
            temp_coefficient: material.temp_coefficient,
            ..Self::default()
        }
    }
}

impl Default for ResistanceTempInput {
    fn default() -> Self {
        Self {
            resistivity_20c: CopperProperties::ANNEALED.resistivity_20c,
            temp_coefficient: CopperProperties::ANNEALED.temp_coefficient,
            temp1_c: 20.0,
            temp2_c: 80.0,
            length_mm: 100.0,
            width_mm: 3.0,
            thickness_mm: 0.070,
        }
    }
}

/// Quantities derived from a [`ResistanceTempInput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResistanceTempResult {
    /// Conductor cross-section in m².
    pub cross_section_m2: f64,
    /// Resistance at `temp1_c`, in ohms.
    pub resistance_temp1_ohm: f64,
    /// Resistance at `temp2_c`, in ohms.
    pub resistance_temp2_ohm: f64,
}

impl ResistanceTempResult {
    /// Renders the result for display, labelled with the input temperatures.
    #[must_use]
    pub fn report(&self, input: &ResistanceTempInput) -> Report {
        Report::new("Resistance vs. temperature")
            .line(
                "Cross-section",
                format!(
                    "{} ({:.4} mm²)",
                    scientific(self.cross_section_m2, "m²"),
                    units::m2_to_mm2(self.cross_section_m2)
                ),
            )
            .line(
                format!("Resistance @ {:.1} °C", input.temp1_c),
                scientific(self.resistance_temp1_ohm, "Ω"),
            )
            .line(
                format!("Resistance @ {:.1} °C", input.temp2_c),
                scientific(self.resistance_temp2_ohm, "Ω"),
            )
    }
}

/// Calculator for conductor resistance at two temperatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResistanceTemperatureEngine;

impl ResistanceTemperatureEngine {
    /// Creates a new resistance calculator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resistance of the conductor described by `input` at `temp_c`, in ohms.
    #[must_use]
    pub fn resistance_at(&self, input: &ResistanceTempInput, temp_c: f64) -> f64 {
        let area_m2 = Self::cross_section_m2(input);
        input.resistivity_20c
            * temperature_factor(input.temp_coefficient, temp_c)
            * units::mm_to_m(input.length_mm)
            / area_m2
    }

    fn cross_section_m2(input: &ResistanceTempInput) -> f64 {
        rect_area(units::mm_to_m(input.width_mm), units::mm_to_m(input.thickness_mm))
    }
}

impl Calculator for ResistanceTemperatureEngine {
    type Input = ResistanceTempInput;
    type Output = ResistanceTempResult;

    fn compute(&self, input: &ResistanceTempInput) -> ResistanceTempResult {
        ResistanceTempResult {
            cross_section_m2: Self::cross_section_m2(input),
            resistance_temp1_ohm: self.resistance_at(input, input.temp1_c),
            resistance_temp2_ohm: self.resistance_at(input, input.temp2_c),
        }
    }
}
