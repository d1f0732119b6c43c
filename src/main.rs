//! pcb-calc-mcp: PCB engineering calculators as a CLI and MCP server
//!
//! Without a subcommand the MCP server runs on stdio. The `trace-width`,
//! `resistance` and `thermal-via` subcommands evaluate one calculator and
//! print the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error, info, Level};
use tracing_subscriber::EnvFilter;

use pcb_calc_mcp::calc::report::non_finite_fields;
use pcb_calc_mcp::calc::{
    Calculator, Calculators, LayerKind, Report, ResistanceTempInput, ThermalViaInput,
    TraceWidthInput,
};
use pcb_calc_mcp::config;
use pcb_calc_mcp::mcp::server::McpServer;

/// PCB trace width, copper resistance and thermal via calculators.
///
/// Runs as an MCP server on stdio by default, or evaluates one calculator
/// when given a subcommand. Omitted inputs take their documented defaults.
#[derive(Parser, Debug)]
#[command(name = "pcb-calc-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server on stdio (default)
    Serve,
    /// IPC-2221 trace width, resistance and power loss
    TraceWidth(TraceWidthArgs),
    /// Conductor resistance at two temperatures
    Resistance(ResistanceArgs),
    /// Conductive thermal resistance of a via array
    ThermalVia(ThermalViaArgs),
}

#[derive(ClapArgs, Debug)]
struct TraceWidthArgs {
    /// Current in A
    #[arg(long)]
    current: Option<f64>,
    /// Allowed temperature rise in °C
    #[arg(long)]
    rise: Option<f64>,
    /// Layer: external or internal
    #[arg(long, value_parser = parse_layer)]
    layer: Option<LayerKind>,
    /// Copper weight in oz/ft²
    #[arg(long)]
    copper_oz: Option<f64>,
    /// Trace length in mm
    #[arg(long)]
    length_mm: Option<f64>,
    /// Ambient temperature in °C
    #[arg(long, allow_negative_numbers = true)]
    ambient_c: Option<f64>,
    /// Print JSON instead of a text report
    #[arg(long)]
    json: bool,
}

#[derive(ClapArgs, Debug)]
struct ResistanceArgs {
    /// Resistivity at 20 °C in Ω·m
    #[arg(long)]
    resistivity: Option<f64>,
    /// Temperature coefficient in 1/°C
    #[arg(long)]
    alpha: Option<f64>,
    /// First temperature in °C
    #[arg(long, allow_negative_numbers = true)]
    temp1: Option<f64>,
    /// Second temperature in °C
    #[arg(long, allow_negative_numbers = true)]
    temp2: Option<f64>,
    /// Conductor length in mm
    #[arg(long)]
    length_mm: Option<f64>,
    /// Conductor width in mm
    #[arg(long)]
    width_mm: Option<f64>,
    /// Conductor thickness in mm
    #[arg(long)]
    thickness_mm: Option<f64>,
    /// Print JSON instead of a text report
    #[arg(long)]
    json: bool,
}

#[derive(ClapArgs, Debug)]
struct ThermalViaArgs {
    /// Number of vias
    #[arg(long)]
    vias: Option<u32>,
    /// Finished hole diameter in mm
    #[arg(long)]
    hole_mm: Option<f64>,
    /// Plating thickness in mm
    #[arg(long)]
    plating_mm: Option<f64>,
    /// Board thickness in mm
    #[arg(long)]
    board_mm: Option<f64>,
    /// Plating thermal conductivity in W/(m·K)
    #[arg(long)]
    conductivity: Option<f64>,
    /// Print JSON instead of a text report
    #[arg(long)]
    json: bool,
}

fn parse_layer(s: &str) -> Result<LayerKind, String> {
    LayerKind::from_str_loose(s).ok_or_else(|| format!("unknown layer '{s}' (external, internal)"))
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints one calculation as a text report or JSON document.
fn emit<I: Serialize, O: Serialize>(json: bool, input: &I, result: &O, report: &Report) -> ExitCode {
    if !json {
        print!("{report}");
        return ExitCode::SUCCESS;
    }

    let result = serde_json::to_value(result).unwrap_or_default();
    let mut document = serde_json::json!({
        "input": input,
        "result": result,
        "report": report,
    });
    let non_finite = non_finite_fields(&result);
    if !non_finite.is_empty() {
        document["non_finite"] = serde_json::json!(non_finite);
    }
    match serde_json::to_string_pretty(&document) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Failed to serialise result");
            ExitCode::FAILURE
        }
    }
}

fn run_trace_width(calcs: &Calculators, args: &TraceWidthArgs) -> ExitCode {
    let defaults = TraceWidthInput::default();
    let input = TraceWidthInput {
        current_a: args.current.unwrap_or(defaults.current_a),
        allowed_rise_c: args.rise.unwrap_or(defaults.allowed_rise_c),
        layer: args.layer.unwrap_or(defaults.layer),
        copper_weight_oz: args.copper_oz.unwrap_or(defaults.copper_weight_oz),
        trace_length_mm: args.length_mm.unwrap_or(defaults.trace_length_mm),
        ambient_temp_c: args.ambient_c.unwrap_or(defaults.ambient_temp_c),
    };
    debug!(?input, "trace-width");

    let result = calcs.trace_width.compute(&input);
    emit(args.json, &input, &result, &result.report())
}

fn run_resistance(calcs: &Calculators, args: &ResistanceArgs) -> ExitCode {
    let defaults = calcs.default_resistance_input();
    let input = ResistanceTempInput {
        resistivity_20c: args.resistivity.unwrap_or(defaults.resistivity_20c),
        temp_coefficient: args.alpha.unwrap_or(defaults.temp_coefficient),
        temp1_c: args.temp1.unwrap_or(defaults.temp1_c),
        temp2_c: args.temp2.unwrap_or(defaults.temp2_c),
        length_mm: args.length_mm.unwrap_or(defaults.length_mm),
        width_mm: args.width_mm.unwrap_or(defaults.width_mm),
        thickness_mm: args.thickness_mm.unwrap_or(defaults.thickness_mm),
    };
    debug!(?input, "resistance");

    let result = calcs.resistance.compute(&input);
    emit(args.json, &input, &result, &result.report(&input))
}

fn run_thermal_via(calcs: &Calculators, args: &ThermalViaArgs) -> ExitCode {
    let defaults = calcs.default_thermal_via_input();
    let input = ThermalViaInput {
        via_count: args.vias.unwrap_or(defaults.via_count),
        finished_hole_diameter_mm: args.hole_mm.unwrap_or(defaults.finished_hole_diameter_mm),
        plating_thickness_mm: args.plating_mm.unwrap_or(defaults.plating_thickness_mm),
        board_thickness_mm: args.board_mm.unwrap_or(defaults.board_thickness_mm),
        thermal_conductivity: args.conductivity.unwrap_or(defaults.thermal_conductivity),
    };
    debug!(?input, "thermal-via");

    let result = calcs.thermal_via.compute(&input);
    emit(args.json, &input, &result, &result.report())
}

/// Runs the MCP server until the client disconnects or a signal arrives.
fn serve(calcs: Calculators) -> ExitCode {
    // Display GPL license notice (required by GPLv3 Section 5d)
    eprintln!(
        "pcb-calc-mcp {}  Copyright (C) 2026  The Embedded Society",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("This program comes with ABSOLUTELY NO WARRANTY.");
    eprintln!("This is free software, licensed under GPL-3.0-or-later.");
    eprintln!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
    eprintln!();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting pcb-calc-mcp server"
    );

    let mut server = McpServer::new(calcs);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!("MCP server ready, waiting for client connection...");

    match runtime.block_on(server.run()) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

/// Entry point for pcb-calc-mcp.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(
        copper = ?cfg.copper,
        ipc2221 = ?cfg.ipc2221,
        "Material constants configured"
    );

    let calcs = cfg.calculators();

    match args.command {
        None | Some(Command::Serve) => serve(calcs),
        Some(Command::TraceWidth(ref a)) => run_trace_width(&calcs, a),
        Some(Command::Resistance(ref a)) => run_resistance(&calcs, a),
        Some(Command::ThermalVia(ref a)) => run_thermal_via(&calcs, a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn log_level_precedence() {
        assert_eq!(get_log_level(0, true, "trace"), Level::ERROR);
        assert_eq!(get_log_level(2, false, "error"), Level::DEBUG);
        assert_eq!(get_log_level(0, false, "info"), Level::INFO);
        assert_eq!(get_log_level(0, false, "bogus"), Level::WARN);
    }

    #[test]
    fn parses_trace_width_subcommand() {
        let args = Args::try_parse_from([
            "pcb-calc-mcp",
            "trace-width",
            "--current",
            "5",
            "--layer",
            "inner",
            "--ambient-c",
            "-10",
        ])
        .unwrap();

        let Some(Command::TraceWidth(tw)) = args.command else {
            panic!("Expected trace-width subcommand");
        };
        assert_eq!(tw.current, Some(5.0));
        assert_eq!(tw.layer, Some(LayerKind::Internal));
        assert_eq!(tw.ambient_c, Some(-10.0));
        assert!(tw.rise.is_none());
    }

    #[test]
    fn rejects_unknown_layer() {
        let result = Args::try_parse_from(["pcb-calc-mcp", "trace-width", "--layer", "top"]);
        assert!(result.is_err());
    }

    #[test]
    fn no_subcommand_means_serve() {
        let args = Args::try_parse_from(["pcb-calc-mcp", "-vv"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.verbose, 2);
    }
}
