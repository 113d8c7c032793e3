//! Patchbay CLI: compiles exported DSP patches for embedded audio hardware.
//!
//! Provides `patchbay gen` to render the firmware sources of a build,
//! `patchbay inspect` to print what the analyzer extracts from a patch, and
//! `patchbay check` to compile a hardware descriptor and list its signals.

#![warn(missing_docs)]

mod check;
mod gen;
mod inspect;
mod pipeline;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Patchbay: a hardware-mapping compiler for exported DSP patches.
#[derive(Parser, Debug)]
#[command(name = "patchbay", version, about = "Patchbay hardware-mapping compiler")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log more; repeat for debug output.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Directory containing `patchbay.toml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the firmware sources of a build.
    Gen(GenArgs),
    /// Print the descriptor extracted from a patch source.
    Inspect(InspectArgs),
    /// Compile a hardware descriptor and list its signals.
    Check(CheckArgs),
}

/// Build parameters shared by commands that evaluate patch constants.
#[derive(Args, Debug, Default)]
pub struct BuildFlags {
    /// Sample rate in kHz (32, 48 or 96).
    #[arg(long)]
    pub samplerate: Option<u32>,

    /// Audio block size in frames.
    #[arg(long)]
    pub blocksize: Option<u32>,
}

/// Arguments for the `patchbay gen` subcommand.
#[derive(Parser, Debug)]
pub struct GenArgs {
    /// Patch source files; taken from `patchbay.toml` when omitted.
    pub patches: Vec<PathBuf>,

    /// Hardware descriptor JSON.
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Build parameters.
    #[command(flatten)]
    pub build: BuildFlags,

    /// Run the MCU at 480 MHz.
    #[arg(long)]
    pub boost: bool,

    /// Use fast math approximations.
    #[arg(long)]
    pub fastmath: bool,

    /// Disable OLED support.
    #[arg(long)]
    pub nooled: bool,

    /// Output directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `patchbay inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Patch source file.
    pub patch: PathBuf,

    /// Build parameters.
    #[command(flatten)]
    pub build: BuildFlags,
}

/// Arguments for the `patchbay check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Hardware descriptor JSON.
    #[arg(short, long)]
    pub target: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format of reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Verbosity level.
    pub verbose: u8,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional project directory.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// The log filter used when `RUST_LOG` is unset.
    pub fn default_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

fn init_tracing(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(global.default_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Gen(ref args) => gen::run(args, &global),
        Command::Inspect(ref args) => inspect::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_gen_defaults() {
        let cli = Cli::parse_from(["patchbay", "gen", "reverb.cpp"]);
        match cli.command {
            Command::Gen(ref args) => {
                assert_eq!(args.patches, vec![PathBuf::from("reverb.cpp")]);
                assert!(args.target.is_none());
                assert!(args.build.samplerate.is_none());
                assert!(!args.boost);
            }
            _ => panic!("expected Gen command"),
        }
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parse_gen_with_args() {
        let cli = Cli::parse_from([
            "patchbay",
            "gen",
            "--target",
            "pod.json",
            "--samplerate",
            "96",
            "--blocksize",
            "48",
            "--boost",
            "--nooled",
            "-o",
            "out",
            "a.cpp",
            "b.cpp",
        ]);
        match cli.command {
            Command::Gen(ref args) => {
                assert_eq!(args.target.as_deref(), Some(std::path::Path::new("pod.json")));
                assert_eq!(args.build.samplerate, Some(96));
                assert_eq!(args.build.blocksize, Some(48));
                assert!(args.boost && args.nooled && !args.fastmath);
                assert_eq!(args.output.as_deref(), Some(std::path::Path::new("out")));
                assert_eq!(args.patches.len(), 2);
            }
            _ => panic!("expected Gen command"),
        }
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["patchbay", "check", "-t", "pod.json", "--format", "json"]);
        match cli.command {
            Command::Check(ref args) => {
                assert_eq!(args.target, PathBuf::from("pod.json"));
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_inspect() {
        let cli = Cli::parse_from(["patchbay", "inspect", "reverb.cpp"]);
        assert!(matches!(cli.command, Command::Inspect(ref a) if a.patch == PathBuf::from("reverb.cpp")));
    }

    #[test]
    fn parse_globals() {
        let cli = Cli::parse_from(["patchbay", "-vv", "--color", "never", "check", "-t", "x.json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn filter_levels() {
        let mut g = GlobalArgs {
            quiet: false,
            verbose: 0,
            color: false,
            config: None,
        };
        assert_eq!(g.default_filter(), "warn");
        g.verbose = 1;
        assert_eq!(g.default_filter(), "info");
        g.verbose = 3;
        assert_eq!(g.default_filter(), "debug");
        g.quiet = true;
        assert_eq!(g.default_filter(), "error");
    }
}
