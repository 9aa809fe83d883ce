// SPDX-License-Identifier: PMPL-1.0-or-later
//! wcag-zoo CLI - WCAG 2.0 accessibility validators for HTML documents

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wcag_zoo::config::{load_config, Config, WcagLevel};
use wcag_zoo::report::{generate_report, OutputFormat, ReportOptions};
use wcag_zoo::scanner::{self, FileReport, STDIN_NAME};
use wcag_zoo::validators::parade::Parade;
use wcag_zoo::validators::{registry, Suite};

/// WCAG 2.0 accessibility validators for HTML documents
#[derive(Parser)]
#[command(name = "wcag-zoo")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check images for alt text (WCAG 1.1.1)
    Anteater(CommonArgs),

    /// Check accesskey attributes are present and unique (WCAG 2.1.1)
    Ayeaye(CommonArgs),

    /// Check focus outlines are not suppressed (WCAG 2.4.7)
    Glowworm(CommonArgs),

    /// Check text color contrast (WCAG 1.4.3, 1.4.6)
    Molerat(CommonArgs),

    /// Check heading levels are in order (WCAG 1.3.1)
    Tarsier(CommonArgs),

    /// Run every validator together
    Parade {
        #[command(flatten)]
        common: CommonArgs,

        /// Validators to leave out (repeatable)
        #[arg(short = 'E', long = "exclude-validators")]
        exclude: Vec<String>,
    },

    /// List the available validators
    List,
}

/// Options shared by every validator command
#[derive(Args, Debug)]
struct CommonArgs {
    /// HTML files or directories to validate (stdin if none)
    files: Vec<PathBuf>,

    /// WCAG level to test against [default: AA]
    #[arg(long, value_enum, ignore_case = true)]
    level: Option<WcagLevelArg>,

    /// Shortcut for the level, repeatable (-A, -AA, -AAA)
    #[arg(short = 'A', action = ArgAction::Count)]
    short_level: u8,

    /// Directory that linked stylesheets are resolved against
    #[arg(long = "staticpath")]
    static_path: Option<PathBuf>,

    /// CSS class of elements to not validate (repeatable)
    #[arg(short = 'C', long = "skip-these-classes")]
    skip_classes: Vec<String>,

    /// Id of elements to not validate (repeatable)
    #[arg(short = 'I', long = "skip-these-ids")]
    skip_ids: Vec<String>,

    /// Skip elements hidden by display or visibility rules
    #[arg(short = 'H', long)]
    ignore_hidden: bool,

    /// Media rule whose @media blocks should apply (repeatable)
    #[arg(short = 'M', long = "media-rules")]
    media_rules: Vec<String>,

    /// Treat warnings as errors
    #[arg(short = 'W', long)]
    warnings_as_errors: bool,

    /// How much text to output while processing [default: 1]
    #[arg(short = 'v', long)]
    verbosity: Option<u8>,

    /// Print results as JSON nested by guideline and technique
    #[arg(short = 'J', long, conflicts_with_all = ["flat_json", "sarif"])]
    json: bool,

    /// Print results as JSON with flat lists
    #[arg(short = 'F', long, conflicts_with = "sarif")]
    flat_json: bool,

    /// Print results as SARIF
    #[arg(long)]
    sarif: bool,

    /// Output format: text, json, flat-json or sarif
    #[arg(long, value_parser = OutputFormat::from_str, conflicts_with_all = ["json", "flat_json", "sarif"])]
    format: Option<OutputFormat>,

    /// Print a little about the animal and exit
    #[arg(long)]
    animal: bool,

    /// Configuration file (TOML or YAML) providing defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

/// WCAG conformance level CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum WcagLevelArg {
    /// Level A - minimum
    A,
    /// Level AA - standard
    Aa,
    /// Level AAA - enhanced
    Aaa,
}

impl From<WcagLevelArg> for WcagLevel {
    fn from(arg: WcagLevelArg) -> Self {
        match arg {
            WcagLevelArg::A => WcagLevel::A,
            WcagLevelArg::Aa => WcagLevel::AA,
            WcagLevelArg::Aaa => WcagLevel::AAA,
        }
    }
}

impl CommonArgs {
    fn output_format(&self) -> OutputFormat {
        if let Some(format) = self.format {
            format
        } else if self.json {
            OutputFormat::Json
        } else if self.flat_json {
            OutputFormat::FlatJson
        } else if self.sarif {
            OutputFormat::Sarif
        } else {
            OutputFormat::Text
        }
    }

    /// Config file defaults with command-line flags on top
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match self.config {
            Some(ref path) => load_config(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(level) = self.level {
            config.level = level.into();
        } else if self.short_level > 0 {
            config.level = match self.short_level {
                1 => WcagLevel::A,
                2 => WcagLevel::AA,
                _ => WcagLevel::AAA,
            };
        }
        if let Some(ref path) = self.static_path {
            config.static_path = path.clone();
        }
        if let Some(verbosity) = self.verbosity {
            config.verbosity = verbosity;
        }
        if self.ignore_hidden {
            config.ignore_hidden = true;
        }

        Ok(config
            .skip_classes(self.skip_classes.iter().cloned())
            .skip_ids(self.skip_ids.iter().cloned())
            .with_media_rules(self.media_rules.iter().cloned()))
    }
}

fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbosity >= 3 {
            EnvFilter::new("wcag_zoo=debug")
        } else {
            EnvFilter::new("wcag_zoo=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (suite, args) = match cli.command {
        Commands::Anteater(args) => (Suite::Single(registry::lookup("anteater")?), args),
        Commands::Ayeaye(args) => (Suite::Single(registry::lookup("ayeaye")?), args),
        Commands::Glowworm(args) => (Suite::Single(registry::lookup("glowworm")?), args),
        Commands::Molerat(args) => (Suite::Single(registry::lookup("molerat")?), args),
        Commands::Tarsier(args) => (Suite::Single(registry::lookup("tarsier")?), args),
        Commands::Parade { common, exclude } => (Suite::Parade(Parade::new().excluding(exclude)?), common),
        Commands::List => {
            for validator in registry::all() {
                println!("{:<10} {}", validator.name(), validator.description());
            }
            return Ok(());
        }
    };

    if args.animal {
        println!("{}", suite.animal());
        return Ok(());
    }

    let config = args.resolve_config()?;
    init_logging(config.verbosity);

    let reports: Vec<FileReport> = if args.files.is_empty() {
        vec![scanner::scan_reader(std::io::stdin().lock(), STDIN_NAME, &suite, &config)]
    } else {
        scanner::scan_paths(&args.files, &suite, &config)
    };

    let options = ReportOptions {
        level: config.level,
        verbosity: config.verbosity,
        warnings_as_errors: args.warnings_as_errors,
    };
    let format = args.output_format();
    debug!("Writing {} report for {} files", format, reports.len());
    println!("{}", generate_report(&reports, format, options));

    if reports.iter().any(|r| r.is_failure(args.warnings_as_errors)) {
        std::process::exit(1);
    }

    Ok(())
}
