// Licensed under the Apache-2.0 license

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cpsw_converter::logging::build_logger;
use cpsw_converter::{BatchDriver, Overrides, Settings};
use log::LevelFilter;
use registers_cpsw_yaml::config::DEFAULT_SCHEMA_VERSION;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cpsw-converter",
    author,
    version,
    about = "Convert register-map device descriptions to CPSW YAML"
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Convert every description file under a directory.
    Convert(ConvertArgs),
    /// Print the CPSW YAML schema version written by default.
    SchemaVersion,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Directory searched recursively for description files
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<String>,

    /// Directory receiving the YAML files [default: output]
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: Option<String>,

    /// Settings file (TOML)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Exclusions file (JSON) [default: settings/exclusions.json]
    #[arg(long, value_name = "FILE")]
    exclusions: Option<String>,

    /// Log file, appended to [default: logs/cpsw-converter.log]
    #[arg(long, value_name = "FILE")]
    log_file: Option<String>,

    /// Log level: off, error, warn, info, debug or trace [default: info]
    #[arg(long, value_name = "LEVEL", value_parser = parse_level)]
    log_level: Option<LevelFilter>,

    /// CPSW YAML schema version to write
    #[arg(long, value_name = "VERSION")]
    schema_version: Option<String>,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("unknown log level '{s}'"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Cmd::Convert(args) => convert(args),
        Cmd::SchemaVersion => {
            println!("{DEFAULT_SCHEMA_VERSION}");
            Ok(())
        }
    }
}

fn convert(args: ConvertArgs) -> Result<()> {
    let overrides = Overrides {
        input_dir: args.input_dir,
        output_dir: args.output_dir,
        exclusions: args.exclusions,
        log_file: args.log_file,
        log_level: args.log_level,
        schema_version: args.schema_version,
    };
    let settings = Settings::load(args.settings.as_deref(), overrides)?;
    let logger = build_logger(&settings.log_file, settings.log_level)?;

    BatchDriver::new(&settings, &*logger).run()?;
    Ok(())
}
