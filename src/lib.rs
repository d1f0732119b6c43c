//! pcb-calc-mcp: PCB engineering calculators as a library, CLI and MCP server
//!
//! Three independent, closed-form calculators for board design:
//!
//! - **Trace width**: IPC-2221 minimum width for a current and temperature
//!   rise, with resistance and power loss at 20 °C and at the raised
//!   temperature
//! - **Resistance vs. temperature**: conductor resistance at two
//!   temperatures from resistivity, temperature coefficient and geometry
//! - **Thermal vias**: conductive thermal resistance of a via array
//!
//! # Modules
//!
//! - [`calc`] — The calculators, material constants and unit conversions
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types
//! - [`mcp`] — MCP protocol implementation

pub mod calc;
pub mod config;
pub mod error;
pub mod mcp;
