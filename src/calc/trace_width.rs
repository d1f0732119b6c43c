//! IPC-2221 trace width calculator.
//!
//! Solves the IPC-2221 curve fit
//!
//! ```text
//! I = k × ΔT^0.44 × A^0.725
//! ```
//!
//! for the cross-section `A` (mil²) that carries current `I` with a
//! temperature rise of `ΔT`, turns that area into a trace width for the
//! given copper weight, and then estimates the DC resistance and I²R loss of
//! a trace of that width at 20 °C and at the raised operating temperature.
//!
//! Internal layers use a smaller `k` than external layers: heat leaves an
//! inner trace only through the dielectric, so the same rise needs more
//! copper.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calc::constants::{rect_area, CopperProperties, Ipc2221Coefficients};
use crate::calc::report::{dual, fixed, scientific, Report};
use crate::calc::units;
use crate::calc::Calculator;

/// Which side of the stack-up a trace is routed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Outer layer, exposed to air.
    #[default]
    External,
    /// Inner layer, buried in dielectric.
    Internal,
}

impl LayerKind {
    /// Parses a layer kind from a string.
    ///
    /// Accepts: "external", "ext", "outer", "internal", "int", "inner" (case-insensitive).
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "external" | "ext" | "outer" => Some(Self::External),
            "internal" | "int" | "inner" => Some(Self::Internal),
            _ => None,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External => write!(f, "external"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Inputs to the trace width calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceWidthInput {
    /// Current the trace must carry, in amperes.
    pub current_a: f64,
    /// Allowed temperature rise above ambient, in °C.
    pub allowed_rise_c: f64,
    /// Layer the trace is routed on.
    pub layer: LayerKind,
    /// Copper weight in oz/ft².
    pub copper_weight_oz: f64,
    /// Trace length in millimetres.
    pub trace_length_mm: f64,
    /// Ambient temperature in °C.
    pub ambient_temp_c: f64,
}

impl Default for TraceWidthInput {
    fn default() -> Self {
        Self {
            current_a: 30.0,
            allowed_rise_c: 10.0,
            layer: LayerKind::External,
            copper_weight_oz: 2.0,
            trace_length_mm: 50.0,
            ambient_temp_c: 25.0,
        }
    }
}

/// Quantities derived from a [`TraceWidthInput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceWidthResult {
    /// Minimum trace width in millimetres.
    pub required_width_mm: f64,
    /// Minimum trace width in mil.
    pub required_width_mil: f64,
    /// Minimum conductor cross-section in mil².
    pub required_area_mil2: f64,
    /// Conductor cross-section used for resistance, in m².
    pub cross_section_m2: f64,
    /// DC resistance at 20 °C, in ohms.
    pub resistance_20c_ohm: f64,
    /// Operating temperature (ambient plus allowed rise), in °C.
    pub rise_temp_c: f64,
    /// DC resistance at the operating temperature, in ohms.
    pub resistance_rise_ohm: f64,
    /// I²R loss at 20 °C, in watts.
    pub power_loss_20c_w: f64,
    /// I²R loss at the operating temperature, in watts.
    pub power_loss_rise_w: f64,
    /// Current density in A/m².
    pub current_density_a_per_m2: f64,
}

impl TraceWidthResult {
    /// Current density in A/mm².
    #[must_use]
    pub fn current_density_a_per_mm2(&self) -> f64 {
        self.current_density_a_per_m2 * 1e-6
    }

    /// Renders the result for display.
    #[must_use]
    pub fn report(&self) -> Report {
        Report::new("IPC-2221 trace width")
            .line(
                "Required width",
                dual(self.required_width_mm, "mm", self.required_width_mil, "mil"),
            )
            .line("Required area", fixed(self.required_area_mil2, 2, "mil²"))
            .line("Cross-section", scientific(self.cross_section_m2, "m²"))
            .line("Resistance @ 20 °C", scientific(self.resistance_20c_ohm, "Ω"))
            .line(
                format!("Resistance @ {:.1} °C", self.rise_temp_c),
                scientific(self.resistance_rise_ohm, "Ω"),
            )
            .line("Power loss @ 20 °C", fixed(self.power_loss_20c_w, 4, "W"))
            .line(
                format!("Power loss @ {:.1} °C", self.rise_temp_c),
                fixed(self.power_loss_rise_w, 4, "W"),
            )
            .line(
                "Current density",
                fixed(self.current_density_a_per_mm2(), 2, "A/mm²"),
            )
    }
}

/// Calculator for IPC-2221 trace width, resistance and power loss.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TraceWidthEngine {
    coefficients: Ipc2221Coefficients,
    copper: CopperProperties,
}

impl TraceWidthEngine {
    /// Creates a calculator with the given curve fit and conductor properties.
    #[must_use]
    pub const fn new(coefficients: Ipc2221Coefficients, copper: CopperProperties) -> Self {
        Self {
            coefficients,
            copper,
        }
    }

    /// Returns the curve-fit coefficients in use.
    #[must_use]
    pub const fn coefficients(&self) -> &Ipc2221Coefficients {
        &self.coefficients
    }

    /// Returns the conductor properties in use.
    #[must_use]
    pub const fn copper(&self) -> &CopperProperties {
        &self.copper
    }

    /// Calibration constant `k` for the layer.
    #[must_use]
    pub const fn k(&self, layer: LayerKind) -> f64 {
        match layer {
            LayerKind::External => self.coefficients.k_external,
            LayerKind::Internal => self.coefficients.k_internal,
        }
    }

    /// Minimum cross-section in mil² for `current_a` at `allowed_rise_c`.
    ///
    /// `A = (I / (k × ΔT^b))^(1/c)`
    #[must_use]
    pub fn required_area_mil2(&self, current_a: f64, allowed_rise_c: f64, layer: LayerKind) -> f64 {
        let c = &self.coefficients;
        let denominator = self.k(layer) * allowed_rise_c.powf(c.rise_exponent);
        (current_a / denominator).powf(c.area_exponent.recip())
    }

    /// Maximum current of a trace of the given width, in amperes.
    ///
    /// This is the forward IPC-2221 relation `I = k × ΔT^b × A^c`, the
    /// inverse of the width calculation.
    #[must_use]
    pub fn ampacity(
        &self,
        width_mm: f64,
        copper_weight_oz: f64,
        allowed_rise_c: f64,
        layer: LayerKind,
    ) -> f64 {
        let c = &self.coefficients;
        let area_mil2 = units::mm_to_mil(width_mm) * units::oz_to_mil(copper_weight_oz);
        self.k(layer) * allowed_rise_c.powf(c.rise_exponent) * area_mil2.powf(c.area_exponent)
    }
}

impl Calculator for TraceWidthEngine {
    type Input = TraceWidthInput;
    type Output = TraceWidthResult;

    fn compute(&self, input: &TraceWidthInput) -> TraceWidthResult {
        let required_area_mil2 =
            self.required_area_mil2(input.current_a, input.allowed_rise_c, input.layer);

        let required_width_mil = required_area_mil2 / units::oz_to_mil(input.copper_weight_oz);
        let required_width_mm = units::mil_to_mm(required_width_mil);

        let thickness_m = units::mm_to_m(units::oz_to_mm(input.copper_weight_oz));
        let cross_section_m2 = rect_area(units::mm_to_m(required_width_mm), thickness_m);

        let length_m = units::mm_to_m(input.trace_length_mm);
        let resistance_20c_ohm = self.copper.resistivity_20c * length_m / cross_section_m2;

        let rise_temp_c = input.ambient_temp_c + input.allowed_rise_c;
        let resistance_rise_ohm = resistance_20c_ohm * self.copper.temperature_factor(rise_temp_c);

        let current_sq = input.current_a * input.current_a;

        trace!(
            area_mil2 = required_area_mil2,
            width_mm = required_width_mm,
            "trace width evaluated"
        );

        TraceWidthResult {
            required_width_mm,
            required_width_mil,
            required_area_mil2,
            cross_section_m2,
            resistance_20c_ohm,
            rise_temp_c,
            resistance_rise_ohm,
            power_loss_20c_w: current_sq * resistance_20c_ohm,
            power_loss_rise_w: current_sq * resistance_rise_ohm,
            current_density_a_per_m2: input.current_a / cross_section_m2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::constants::AREA_FLOOR_M2;

    fn engine() -> TraceWidthEngine {
        TraceWidthEngine::default()
    }

    #[test]
    fn layer_from_string() {
        assert_eq!(LayerKind::from_str_loose("External"), Some(LayerKind::External));
        assert_eq!(LayerKind::from_str_loose("outer"), Some(LayerKind::External));
        assert_eq!(LayerKind::from_str_loose("INTERNAL"), Some(LayerKind::Internal));
        assert_eq!(LayerKind::from_str_loose("inner"), Some(LayerKind::Internal));
        assert_eq!(LayerKind::from_str_loose("top"), None);
    }

    #[test]
    fn layer_serde_is_lowercase() {
        let json = serde_json::to_string(&LayerKind::Internal).unwrap();
        assert_eq!(json, r#""internal""#);
        let layer: LayerKind = serde_json::from_str(r#""external""#).unwrap();
        assert_eq!(layer, LayerKind::External);
    }

    #[test]
    fn default_scenario_width() {
        let result = engine().compute(&TraceWidthInput::default());

        let area = (30.0 / (0.048 * 10f64.powf(0.44))).powf(1.0 / 0.725);
        let width_mil = area / (2.0 * 1.378);

        assert!((result.required_area_mil2 - area).abs() < 1e-9 * area);
        assert!((result.required_width_mil - width_mil).abs() < 1e-9 * width_mil);
        assert!((result.required_width_mm - width_mil * 0.0254).abs() < 1e-9);
        assert!((result.rise_temp_c - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn internal_layer_needs_more_copper() {
        let external = engine().compute(&TraceWidthInput::default());
        let internal = engine().compute(&TraceWidthInput {
            layer: LayerKind::Internal,
            ..TraceWidthInput::default()
        });
        assert!(internal.required_width_mm > external.required_width_mm);
        assert!(internal.resistance_20c_ohm < external.resistance_20c_ohm);
    }

    #[test]
    fn hot_resistance_exceeds_reference() {
        let result = engine().compute(&TraceWidthInput::default());
        let factor = 0.0039f64.mul_add(15.0, 1.0);
        assert!((result.resistance_rise_ohm / result.resistance_20c_ohm - factor).abs() < 1e-12);
        assert!(result.power_loss_rise_w > result.power_loss_20c_w);
    }

    #[test]
    fn power_is_i_squared_r() {
        let input = TraceWidthInput::default();
        let result = engine().compute(&input);
        let expected = input.current_a * input.current_a * result.resistance_20c_ohm;
        assert!((result.power_loss_20c_w - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_current_uses_area_floor() {
        let result = engine().compute(&TraceWidthInput {
            current_a: 0.0,
            ..TraceWidthInput::default()
        });
        assert!(result.required_width_mm.abs() < f64::EPSILON);
        assert!(result.resistance_20c_ohm.is_finite());
        assert!(result.resistance_20c_ohm > 0.0);
        assert!(result.current_density_a_per_m2.abs() < f64::EPSILON);
    }

    #[test]
    fn zero_copper_weight_uses_area_floor() {
        let result = engine().compute(&TraceWidthInput {
            copper_weight_oz: 0.0,
            ..TraceWidthInput::default()
        });
        assert!(result.required_width_mm.is_infinite());
        assert!((result.cross_section_m2 - AREA_FLOOR_M2).abs() < f64::EPSILON);
        assert!(result.resistance_20c_ohm.is_finite());
        assert!(result.resistance_rise_ohm.is_finite());
        assert!(result.power_loss_rise_w.is_finite());
        assert!(result.current_density_a_per_m2.is_finite());
    }

    #[test]
    fn negative_current_is_not_rejected() {
        let result = engine().compute(&TraceWidthInput {
            current_a: -5.0,
            ..TraceWidthInput::default()
        });
        assert!(result.required_width_mm.is_nan());
    }

    #[test]
    fn ampacity_inverts_width() {
        let input = TraceWidthInput {
            current_a: 3.0,
            layer: LayerKind::Internal,
            copper_weight_oz: 1.0,
            ..TraceWidthInput::default()
        };
        let result = engine().compute(&input);
        let current = engine().ampacity(
            result.required_width_mm,
            input.copper_weight_oz,
            input.allowed_rise_c,
            input.layer,
        );
        assert!((current - 3.0).abs() < 1e-9);
    }

    #[test]
    fn report_contains_both_width_units() {
        let report = engine().compute(&TraceWidthInput::default()).report();
        let width = report.value("Required width").unwrap();
        assert!(width.contains("mm"));
        assert!(width.contains("mil"));
        assert!(report.value("Resistance @ 35.0 °C").is_some());
        assert!(report.value("Current density").unwrap().ends_with("A/mm²"));
    }
}
