//! # composite CLI
//!
//! Command-line front end for composite_core: one subcommand per
//! calculation, a layup expander, and a batch runner for JSON request
//! documents.
//!
//! ```text
//! composite lamina --e1 150000 --e2 10000 --g12 5000 --nu12 0.3 --angle 45
//! composite plate --e1 150000 --e2 10000 --g12 5000 --nu12 0.3 --layup "[0/90]s" --thickness 0.125
//! composite run requests.json --output responses.json
//! ```

mod config;
mod report;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{debug, error, info, Level};
use tracing_subscriber::EnvFilter;

use composite_core::api::{handle, handle_batch_json};
use composite_core::calculations::{
    CalculationItem, CalculationOutput, Laminate3dInput, LaminaInput, PlateInput, UdfrcInput,
};
use composite_core::file_io::{load_request_text, save_responses};
use composite_core::layup::LayupSequence;
use composite_core::materials::{LaminaProperties, TransverselyIsotropicProperties};

use crate::config::Config;
use crate::report::{LaminaReport, PlateReport, SolidReport, UdfrcReport};

/// Effective elastic properties of fiber-reinforced composites.
#[derive(Parser, Debug)]
#[command(name = "composite")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Off-axis engineering constants of a single ply
    Lamina {
        #[command(flatten)]
        ply: PlyArgs,

        /// Fiber angle in degrees
        #[arg(long, allow_hyphen_values = true)]
        angle: f64,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// ABD matrices and effective plate properties
    Plate {
        #[command(flatten)]
        ply: PlyArgs,

        #[command(flatten)]
        stack: StackArgs,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Effective 3D properties of a laminate
    Laminate3d {
        #[command(flatten)]
        ply: PlyArgs,

        /// Transverse Poisson's ratio
        #[arg(long, allow_hyphen_values = true)]
        nu23: f64,

        #[command(flatten)]
        stack: StackArgs,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Fiber/matrix micromechanics by the Voigt, Reuss and Hybrid rules
    Udfrc {
        #[arg(long = "fiber-e1")]
        fiber_e1: f64,
        #[arg(long = "fiber-e2")]
        fiber_e2: f64,
        #[arg(long = "fiber-g12")]
        fiber_g12: f64,
        #[arg(long = "fiber-nu12", allow_hyphen_values = true)]
        fiber_nu12: f64,
        #[arg(long = "fiber-nu23", allow_hyphen_values = true)]
        fiber_nu23: f64,
        #[arg(long = "matrix-e")]
        matrix_e: f64,
        #[arg(long = "matrix-nu", allow_hyphen_values = true)]
        matrix_nu: f64,

        /// Fiber volume fraction in [0, 1]
        #[arg(long)]
        vf: f64,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Print the ply angles a layup notation expands to
    ExpandLayup {
        /// Layup notation, e.g. "[30/45]2s"
        sequence: String,
    },

    /// Answer a JSON request document (one request or an array)
    Run {
        /// Request file, or "-" for stdin
        input: PathBuf,

        /// Write a versioned response document here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// In-plane ply constants shared by the ply-based commands.
#[derive(ClapArgs, Debug)]
struct PlyArgs {
    /// Longitudinal modulus
    #[arg(long)]
    e1: f64,

    /// Transverse modulus
    #[arg(long)]
    e2: f64,

    /// In-plane shear modulus
    #[arg(long)]
    g12: f64,

    /// Major Poisson's ratio
    #[arg(long, allow_hyphen_values = true)]
    nu12: f64,
}

impl PlyArgs {
    fn lamina(&self) -> LaminaProperties {
        LaminaProperties {
            e1: self.e1,
            e2: self.e2,
            g12: self.g12,
            nu12: self.nu12,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct StackArgs {
    /// Layup notation, e.g. "[0/90]s"
    #[arg(long, allow_hyphen_values = true)]
    layup: String,

    /// Thickness of every ply
    #[arg(long)]
    thickness: f64,
}

#[derive(ClapArgs, Debug)]
struct FormatArgs {
    /// Print the JSON response envelope instead of a report
    #[arg(long)]
    json: bool,
}

/// Determines the log level from CLI arguments.
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
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

fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(get_log_level(args.verbose, args.quiet, &cfg.logging.level));
    debug!(version = env!("CARGO_PKG_VERSION"), "composite starting");

    match args.command {
        Command::Lamina { ply, angle, format } => {
            let item = CalculationItem::LaminaEngineeringConstants(LaminaInput {
                material: ply.lamina(),
                layup_angle: angle,
            });
            answer_one(&item, &cfg, format.json, |output| match output {
                CalculationOutput::Lamina(result) => Some(LaminaReport { angle, result }.to_string()),
                _ => None,
            })
        }
        Command::Plate { ply, stack, format } => {
            let item = CalculationItem::LaminatePlateProperties(PlateInput {
                material: ply.lamina(),
                layup_sequence: stack.layup.clone(),
                layer_thickness: stack.thickness,
            });
            answer_one(&item, &cfg, format.json, |output| match output {
                CalculationOutput::Plate(result) => Some(
                    PlateReport {
                        layup: &stack.layup,
                        result,
                    }
                    .to_string(),
                ),
                _ => None,
            })
        }
        Command::Laminate3d {
            ply,
            nu23,
            stack,
            format,
        } => {
            let item = CalculationItem::Laminate3dProperties(Laminate3dInput {
                material: TransverselyIsotropicProperties {
                    e1: ply.e1,
                    e2: ply.e2,
                    g12: ply.g12,
                    nu12: ply.nu12,
                    nu23,
                },
                layup_sequence: stack.layup.clone(),
                layer_thickness: stack.thickness,
            });
            let title = format!("3D LAMINATE {}", stack.layup);
            answer_one(&item, &cfg, format.json, |output| match output {
                CalculationOutput::Laminate3d(result) => Some(SolidReport { title: &title, result }.to_string()),
                _ => None,
            })
        }
        Command::Udfrc {
            fiber_e1,
            fiber_e2,
            fiber_g12,
            fiber_nu12,
            fiber_nu23,
            matrix_e,
            matrix_nu,
            vf,
            format,
        } => {
            let item = CalculationItem::UdfrcProperties(UdfrcInput {
                fiber_e1,
                fiber_e2,
                fiber_g12,
                fiber_nu12,
                fiber_nu23,
                matrix_e1: matrix_e,
                matrix_nu,
                fiber_volume_fraction: vf,
            });
            answer_one(&item, &cfg, format.json, |output| match output {
                CalculationOutput::Udfrc(result) => Some(
                    UdfrcReport {
                        fiber_volume_fraction: vf,
                        result,
                    }
                    .to_string(),
                ),
                _ => None,
            })
        }
        Command::ExpandLayup { sequence } => expand_layup(&sequence),
        Command::Run { input, output } => run_document(&input, output.as_deref(), &cfg),
    }
}

/// Answer a single request and print either the report or the envelope.
fn answer_one<F>(item: &CalculationItem, cfg: &Config, json: bool, render: F) -> ExitCode
where
    F: FnOnce(&CalculationOutput) -> Option<String>,
{
    let response = handle(item, &cfg.validation);

    if json {
        return print_json(&response, cfg.output.pretty, response.is_success());
    }

    match (&response.result, &response.error) {
        (Some(output), _) => match render(output) {
            Some(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            None => {
                error!(calc_type = %response.calc_type, "result kind does not match request");
                ExitCode::FAILURE
            }
        },
        (None, Some(body)) => {
            eprintln!("Error [{}]: {}", body.code, body.message);
            ExitCode::FAILURE
        }
        (None, None) => ExitCode::FAILURE,
    }
}

fn expand_layup(sequence: &str) -> ExitCode {
    match LayupSequence::parse(sequence) {
        Ok(layup) => {
            println!("{layup}");
            println!("{} plies", layup.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error [{}]: {e}", e.error_code());
            ExitCode::FAILURE
        }
    }
}

fn run_document(input: &Path, output: Option<&Path>, cfg: &Config) -> ExitCode {
    let text = if input == Path::new("-") {
        let mut buffer = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
            eprintln!("Error reading stdin: {e}");
            return ExitCode::FAILURE;
        }
        buffer
    } else {
        match load_request_text(input) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error [{}]: {e}", e.error_code());
                return ExitCode::FAILURE;
            }
        }
    };

    let responses = handle_batch_json(&text, &cfg.validation);
    let failed = responses.iter().filter(|r| !r.is_success()).count();
    info!(total = responses.len(), failed, "request document answered");

    match output {
        Some(path) => {
            if let Err(e) = save_responses(&responses, path) {
                eprintln!("Error [{}]: {e}", e.error_code());
                return ExitCode::FAILURE;
            }
            eprintln!("{} responses written to {} ({} failed)", responses.len(), path.display(), failed);
            exit_code(failed == 0)
        }
        None => print_json(&responses, cfg.output.pretty, failed == 0),
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool, success: bool) -> ExitCode {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(json) => {
            println!("{json}");
            exit_code(success)
        }
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            ExitCode::FAILURE
        }
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
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
        assert_eq!(get_log_level(0, false, "nonsense"), Level::WARN);
    }

    #[test]
    fn parse_plate_command() {
        let args = Args::try_parse_from([
            "composite", "-v", "plate", "--e1", "150000", "--e2", "10000", "--g12", "5000", "--nu12", "0.3",
            "--layup", "[45/-45]s", "--thickness", "0.125", "--json",
        ])
        .unwrap();
        assert_eq!(args.verbose, 1);
        match args.command {
            Command::Plate { stack, format, .. } => {
                assert_eq!(stack.layup, "[45/-45]s");
                assert!(format.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_negative_angle() {
        let args = Args::try_parse_from([
            "composite", "lamina", "--e1", "150000", "--e2", "10000", "--g12", "5000", "--nu12", "0.3", "--angle",
            "-30",
        ])
        .unwrap();
        assert!(matches!(args.command, Command::Lamina { angle, .. } if angle == -30.0));
    }
}
