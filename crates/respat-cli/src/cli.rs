//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use respat_core::CtRescale;
use respat_model::LabId;

#[derive(Parser)]
#[command(
    name = "respat",
    version,
    about = "Combine respiratory pathogen test exports from diagnostic labs into one table",
    long_about = "Combine respiratory pathogen test exports from diagnostic labs into one table.\n\n\
                  Each lab subcommand reads <DATADIR>/<lab id>/, reconciles every export\n\
                  into one record per test request and writes a tab-separated table\n\
                  with a fixed column set."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stdout.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process DASA exports (viral panel and Thermo covid layouts).
    Dasa(JobArgs),
    /// Process DB Molecular exports (respiratory panel, covid and omicron layouts).
    Db(JobArgs),
    /// Process Fleury exports (single, antigen and panel exams).
    Fleury(JobArgs),
    /// Process HLAGyn exports (wide panels and covid layout).
    Hlagyn(JobArgs),
    /// Process SABIN exports.
    Sabin(JobArgs),
    /// List supported labs and their policies.
    Labs(LabsArgs),
}

impl Command {
    /// The lab job this command runs, if any.
    pub fn job(&self) -> Option<(LabId, &JobArgs)> {
        match self {
            Command::Dasa(args) => Some((LabId::Dasa, args)),
            Command::Db(args) => Some((LabId::DbMolecular, args)),
            Command::Fleury(args) => Some((LabId::Fleury, args)),
            Command::Hlagyn(args) => Some((LabId::HlaGyn, args)),
            Command::Sabin(args) => Some((LabId::Sabin, args)),
            Command::Labs(_) => None,
        }
    }
}

#[derive(Args)]
pub struct JobArgs {
    /// Root directory with one subdirectory per lab.
    #[arg(long, value_name = "DIR")]
    pub datadir: PathBuf,

    /// Rename catalog (columns: lab_id, column_name, new_name).
    #[arg(long, value_name = "FILE")]
    pub rename: Option<PathBuf>,

    /// Correction catalog (columns: lab_id, column_name, old_data, new_data).
    #[arg(long, value_name = "FILE")]
    pub correction: Option<PathBuf>,

    /// Previous output, used as the baseline of already processed samples.
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Destination of the combined tab-separated table.
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,

    #[command(flatten)]
    pub ct: CtArgs,
}

/// Tuning of the malformed Ct repair heuristic.
#[derive(Args)]
pub struct CtArgs {
    /// Digit count a dotted Ct is padded to before rescaling.
    #[arg(long = "ct-digit-width", default_value_t = 5)]
    pub digit_width: usize,

    /// Divisor applied to the padded digits.
    #[arg(long = "ct-scale", default_value_t = 1000.0, value_parser = positive_f64)]
    pub scale: f64,

    /// Values above this are divided once more.
    #[arg(long = "ct-cutoff", default_value_t = 50.0)]
    pub cutoff: f64,

    /// Extra divisor for values above the cutoff.
    #[arg(long = "ct-divisor", default_value_t = 10.0, value_parser = positive_f64)]
    pub divisor: f64,
}

/// Parse a finite number greater than zero.
fn positive_f64(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("`{raw}` must be a number greater than zero"))
    }
}

impl From<&CtArgs> for CtRescale {
    fn from(args: &CtArgs) -> Self {
        CtRescale {
            digit_width: args.digit_width,
            scale: args.scale,
            cutoff: args.cutoff,
            divisor: args.divisor,
        }
    }
}

#[derive(Args)]
pub struct LabsArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn job_flags_parse() {
        let cli = Cli::parse_from([
            "respat",
            "db",
            "--datadir",
            "data",
            "--output",
            "out/combined.tsv",
            "--ct-cutoff",
            "45",
        ]);
        let (lab, args) = cli.command.job().expect("job command");
        assert_eq!(lab, LabId::DbMolecular);
        assert!(args.cache.is_none());
        let ct = CtRescale::from(&args.ct);
        assert_eq!(ct.cutoff, 45.0);
        assert_eq!(ct.digit_width, 5);
    }

    #[test]
    fn output_is_required() {
        assert!(Cli::try_parse_from(["respat", "sabin", "--datadir", "data"]).is_err());
    }

    #[test]
    fn ct_divisors_must_be_positive() {
        let job = |flag: &str, value: &str| {
            Cli::try_parse_from([
                "respat", "db", "--datadir", "data", "--output", "out.tsv", flag, value,
            ])
        };
        assert!(job("--ct-scale", "0").is_err());
        assert!(job("--ct-scale", "-10").is_err());
        assert!(job("--ct-divisor", "0").is_err());
        assert!(job("--ct-divisor", "NaN").is_err());
        let cli = job("--ct-scale", "100").expect("positive scale");
        let (_, args) = cli.command.job().expect("job command");
        assert_eq!(CtRescale::from(&args.ct).scale, 100.0);
    }
}
