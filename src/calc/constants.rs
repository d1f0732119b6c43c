//! Material properties and curve-fit coefficients shared by the calculators.
//!
//! Every value here has a documented default and can be overridden through
//! the configuration file, so tests and users can evaluate other materials
//! without touching the formulas.

use serde::{Deserialize, Serialize};

/// Copper thickness in mil per oz/ft² of copper weight.
pub const MIL_PER_OZ: f64 = 1.378;

/// Copper thickness in millimetres per oz/ft² of copper weight.
pub const MM_PER_OZ: f64 = 0.0348;

/// Millimetres per mil (thousandth of an inch).
pub const MM_PER_MIL: f64 = 0.0254;

/// Reference temperature for resistivity values, in °C.
pub const REFERENCE_TEMP_C: f64 = 20.0;

/// Smallest cross-section used as a denominator, in m².
///
/// Substituted for an exactly zero area so that resistances and current
/// densities stay finite.
pub const AREA_FLOOR_M2: f64 = 1e-18;

/// Applies the zero-area floor to a cross-section in m².
///
/// Only an exact zero is replaced. Negative or NaN areas are returned
/// unchanged and show up as non-physical results.
#[must_use]
#[allow(clippy::float_cmp)] // Exact zero is the only value the floor replaces
pub fn floor_area(area_m2: f64) -> f64 {
    if area_m2 == 0.0 {
        AREA_FLOOR_M2
    } else {
        area_m2
    }
}

/// Cross-section of a rectangular conductor in m², with the zero-area floor.
///
/// A side of exactly zero makes the area zero even when the other side is
/// infinite, so a zero-thickness foil is floored instead of giving NaN.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn rect_area(width_m: f64, thickness_m: f64) -> f64 {
    if width_m == 0.0 || thickness_m == 0.0 {
        AREA_FLOOR_M2
    } else {
        floor_area(width_m * thickness_m)
    }
}

/// Resistivity scaling factor `1 + α·(T − 20)` at `temp_c`.
#[must_use]
pub fn temperature_factor(temp_coefficient: f64, temp_c: f64) -> f64 {
    temp_coefficient.mul_add(temp_c - REFERENCE_TEMP_C, 1.0)
}

/// IPC-2221 curve-fit coefficients for `I = k × ΔT^b × A^c`.
///
/// `A` is the conductor cross-section in mil², `ΔT` the temperature rise
/// in °C and `I` the current in amperes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Ipc2221Coefficients {
    /// Calibration constant for external (outer) layers.
    pub k_external: f64,
    /// Calibration constant for internal layers.
    pub k_internal: f64,
    /// Temperature-rise exponent `b`.
    pub rise_exponent: f64,
    /// Cross-section exponent `c`.
    pub area_exponent: f64,
}

impl Ipc2221Coefficients {
    /// The coefficients published in IPC-2221.
    pub const STANDARD: Self = Self {
        k_external: 0.048,
        k_internal: 0.024,
        rise_exponent: 0.44,
        area_exponent: 0.725,
    };
}

impl Default for Ipc2221Coefficients {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Bulk properties of the conductor material (annealed copper by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopperProperties {
    /// Resistivity at 20 °C in Ω·m.
    pub resistivity_20c: f64,
    /// Temperature coefficient of resistance in 1/°C.
    pub temp_coefficient: f64,
    /// Thermal conductivity in W/(m·K).
    pub thermal_conductivity: f64,
}

impl CopperProperties {
    /// Handbook values for annealed copper.
    pub const ANNEALED: Self = Self {
        resistivity_20c: 1.68e-8,
        temp_coefficient: 0.0039,
        thermal_conductivity: 385.0,
    };

    /// Resistivity scaling factor `1 + α·(T − 20)` at `temp_c`.
    #[must_use]
    pub fn temperature_factor(&self, temp_c: f64) -> f64 {
        temperature_factor(self.temp_coefficient, temp_c)
    }
}

impl Default for CopperProperties {
    fn default() -> Self {
        Self::ANNEALED
    }
}
