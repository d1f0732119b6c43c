//! Closed-form PCB engineering calculators.
//!
//! Each calculator is a pure function of its input record: the same input
//! always produces a bit-identical result, and nothing is cached between
//! calls.
//!
//! # Calculators
//!
//! - [`trace_width`] - IPC-2221 trace width, resistance and I²R loss
//! - [`resistance`] - Conductor resistance at two temperatures
//! - [`thermal_via`] - Conductive thermal resistance of a via array
//!
//! # Input validation
//!
//! Inputs are not range-checked. Negative or otherwise non-physical values
//! flow through the formulas and come out as non-physical results (negative
//! widths, NaN). The one guarded case is a cross-section of exactly zero,
//! which is replaced by [`constants::AREA_FLOOR_M2`] so the result stays
//! finite.
//!
//! # Example
//!
//! ```
//! use pcb_calc_mcp::calc::{
//!     trace_width::{LayerKind, TraceWidthEngine, TraceWidthInput},
//!     Calculator,
//! };
//!
//! let input = TraceWidthInput {
//!     current_a: 2.0,
//!     layer: LayerKind::Internal,
//!     ..TraceWidthInput::default()
//! };
//! let result = TraceWidthEngine::default().compute(&input);
//!
//! println!("{}", result.report());
//! ```

pub mod constants;
pub mod report;
pub mod resistance;
pub mod thermal_via;
pub mod trace_width;
pub mod units;

pub use constants::{CopperProperties, Ipc2221Coefficients};
pub use report::Report;
pub use resistance::{ResistanceTempInput, ResistanceTempResult, ResistanceTemperatureEngine};
pub use thermal_via::{ThermalViaEngine, ThermalViaInput, ThermalViaResult};
pub use trace_width::{LayerKind, TraceWidthEngine, TraceWidthInput, TraceWidthResult};

/// Common interface of the calculators.
pub trait Calculator {
    /// Input record.
    type Input;
    /// Derived result record.
    type Output;

    /// Derives the result from the input.
    fn compute(&self, input: &Self::Input) -> Self::Output;
}

/// The three calculators configured with one set of material constants.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Calculators {
    /// IPC-2221 trace width calculator.
    pub trace_width: TraceWidthEngine,
    /// Resistance vs. temperature calculator.
    pub resistance: ResistanceTemperatureEngine,
    /// Thermal via calculator.
    pub thermal_via: ThermalViaEngine,
}

impl Calculators {
    /// Creates the calculators for the given curve fit and conductor.
    #[must_use]
    pub const fn new(coefficients: Ipc2221Coefficients, copper: CopperProperties) -> Self {
        Self {
            trace_width: TraceWidthEngine::new(coefficients, copper),
            resistance: ResistanceTemperatureEngine::new(),
            thermal_via: ThermalViaEngine::new(),
        }
    }

    /// Conductor properties in use.
    #[must_use]
    pub const fn copper(&self) -> &CopperProperties {
        self.trace_width.copper()
    }

    /// Default resistance input, carrying the configured conductor properties.
    #[must_use]
    pub fn default_resistance_input(&self) -> ResistanceTempInput {
        ResistanceTempInput::for_material(self.copper())
    }

    /// Default thermal via input, carrying the configured conductivity.
    #[must_use]
    pub fn default_thermal_via_input(&self) -> ThermalViaInput {
        ThermalViaInput::for_material(self.copper())
    }
}
