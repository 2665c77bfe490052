//! CLI argument definitions for the competency self-assessment.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pgcf-assess",
    version,
    about = "Pathogen Genomics Competency Framework self-assessment",
    long_about = "Rate yourself against the Pathogen Genomics Competency Framework.\n\n\
                  Choose the domains relevant to you, pick one proficiency level per topic\n\
                  and save the result as competency_selections.csv."
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

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow respondent details in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Configuration file (default: ./pgcf.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Framework CSV (overrides the config file; default: PGCF.csv).
    #[arg(long = "framework", value_name = "PATH", global = true)]
    pub framework: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the framework's domains and their topic counts.
    Domains,

    /// Run the interactive self-assessment.
    Assess(AssessArgs),

    /// Show the contents of a saved export.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct AssessArgs {
    /// Name or ID (skips the prompt).
    #[arg(long = "name", value_name = "TEXT")]
    pub name: Option<String>,

    /// Job title (skips the prompt).
    #[arg(long = "job-title", value_name = "TEXT")]
    pub job_title: Option<String>,

    /// Role (skips the prompt).
    #[arg(long = "role", value_name = "TEXT")]
    pub role: Option<String>,

    /// Domain to assess, by header or number. Repeat for several.
    ///
    /// When omitted, the domains are offered as a numbered list.
    #[arg(long = "domain", value_name = "HEADER|N")]
    pub domains: Vec<String>,

    /// Export path (default: the config's export file name).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also upload the export to the configured object store.
    #[arg(long = "upload")]
    pub upload: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Export file to read.
    #[arg(value_name = "EXPORT")]
    pub export: PathBuf,
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
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_assess_args() {
        let cli = Cli::parse_from([
            "pgcf-assess",
            "--framework",
            "data/PGCF.csv",
            "assess",
            "--name",
            "JS-001",
            "--domain",
            "1",
            "--domain",
            "3. Data analysis",
            "--upload",
        ]);
        assert_eq!(cli.framework, Some(PathBuf::from("data/PGCF.csv")));
        let Command::Assess(args) = cli.command else {
            panic!("expected assess");
        };
        assert_eq!(args.name.as_deref(), Some("JS-001"));
        assert_eq!(args.domains, vec!["1", "3. Data analysis"]);
        assert!(args.upload);
        assert!(args.output.is_none());
    }
}
