//! CLI argument definitions for `wfd`.

use clap::{value_parser, Arg, ArgAction, Command};

fn input_arg() -> Arg {
    Arg::new("INPUT")
        .help("Peak data file (packed binary or JSON), or - to use standard input")
        .required(true)
        .index(1)
}

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    Command::new("wfd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and resample precomputed waveform peak data")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Suppress all log output"),
        )
        .subcommand(
            Command::new("info")
                .about("Print the header fields and derived timings")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("peaks")
                .about("Output the min/max peaks of a column window as JSON")
                .arg(input_arg())
                .arg(
                    Arg::new("start")
                        .long("start")
                        .value_name("COLUMN")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64))
                        .help("First column of the window (inclusive)"),
                )
                .arg(
                    Arg::new("end")
                        .long("end")
                        .value_name("COLUMN")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64))
                        .help("End column of the window (exclusive), clamped to the length"),
                ),
        )
        .subcommand(
            Command::new("resample")
                .about("Derive a coarser peak series")
                .arg(input_arg())
                .arg(
                    Arg::new("width")
                        .long("width")
                        .short('w')
                        .value_name("PIXELS")
                        .value_parser(value_parser!(usize))
                        .conflicts_with("scale")
                        .help("Target width in columns"),
                )
                .arg(
                    Arg::new("scale")
                        .long("scale")
                        .short('s')
                        .value_name("SAMPLES")
                        .value_parser(value_parser!(u32))
                        .help("Target samples per pixel"),
                )
                .arg(
                    Arg::new("start-time")
                        .long("start-time")
                        .value_name("SECONDS")
                        .value_parser(value_parser!(f64))
                        .help("Start resampling at this time"),
                )
                .arg(
                    Arg::new("length")
                        .long("length")
                        .short('l')
                        .value_name("COLUMNS")
                        .value_parser(value_parser!(usize))
                        .help("Maximum number of output columns"),
                )
                .arg(
                    Arg::new("options")
                        .long("options")
                        .short('O')
                        .value_name("PATH")
                        .help("Path to a JSON file containing resample options"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_name("FORMAT")
                        .value_parser(["json", "binary"])
                        .default_value("json")
                        .help("Output encoding"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("PATH")
                        .help("Write to this file instead of standard output"),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Emit default JSON payloads")
                .subcommand_required(true)
                .subcommand(
                    Command::new("options-json")
                        .about("Print a default resample options JSON payload"),
                ),
        )
}
