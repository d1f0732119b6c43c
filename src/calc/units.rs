//! Unit conversions between the engineering units used on PCB drawings
//! and the SI units used inside the formulas.

use crate::calc::constants::{MIL_PER_OZ, MM_PER_MIL, MM_PER_OZ};

/// Converts a copper weight in oz/ft² to a foil thickness in millimetres.
#[must_use]
pub fn oz_to_mm(oz: f64) -> f64 {
    oz * MM_PER_OZ
}

/// Converts a foil thickness in millimetres to a copper weight in oz/ft².
#[must_use]
pub fn mm_to_oz(mm: f64) -> f64 {
    mm / MM_PER_OZ
}

/// Converts a copper weight in oz/ft² to a foil thickness in mil.
#[must_use]
pub fn oz_to_mil(oz: f64) -> f64 {
    oz * MIL_PER_OZ
}

#[must_use]
pub fn mil_to_mm(mil: f64) -> f64 {
    mil * MM_PER_MIL
}

#[must_use]
pub fn mm_to_mil(mm: f64) -> f64 {
    mm / MM_PER_MIL
}

#[must_use]
pub fn mm_to_m(mm: f64) -> f64 {
    mm * 1e-3
}

#[must_use]
pub fn mm2_to_m2(mm2: f64) -> f64 {
    mm2 * 1e-6
}

#[must_use]
pub fn m2_to_mm2(m2: f64) -> f64 {
    m2 * 1e6
}

/// Converts an area in mil² to mm².
#[must_use]
pub fn mil2_to_mm2(mil2: f64) -> f64 {
    mil2 * MM_PER_MIL * MM_PER_MIL
}
