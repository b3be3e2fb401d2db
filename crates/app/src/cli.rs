//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kvconform_domain::conformance::CaseFilter;

/// Conformance harness for key/value HTTP APIs.
#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON); environment variables override it
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output results as JSON
    #[clap(long, global = true)]
    pub json: bool,

    /// Subcommand to execute.
    #[clap(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Runs the suite against the configured service
    Run(RunArgs),
    /// Lists the cases that would run
    List(SuiteArgs),
    /// Validates the configuration and prints it with secrets redacted
    CheckConfig,
}

/// Suite source and case selection.
#[derive(Debug, Clone, Default, Args)]
pub struct SuiteArgs {
    /// Suite file (YAML or JSON); the built-in suite is used when omitted
    #[clap(long)]
    pub suite: Option<PathBuf>,

    /// Only run cases carrying this tag (repeatable)
    #[clap(long = "tag")]
    pub tags: Vec<String>,

    /// Skip cases carrying this tag (repeatable)
    #[clap(long = "exclude-tag")]
    pub exclude_tags: Vec<String>,

    /// Only run cases whose name contains this text
    #[clap(long)]
    pub filter: Option<String>,
}

impl SuiteArgs {
    /// Case filter built from the flags.
    #[must_use]
    pub fn case_filter(&self) -> CaseFilter {
        CaseFilter {
            include_tags: self.tags.clone(),
            exclude_tags: self.exclude_tags.clone(),
            name_contains: self.filter.clone(),
        }
    }
}

/// Arguments of `run`.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Suite selection.
    #[clap(flatten)]
    pub suite: SuiteArgs,

    /// Write the JSON report to this path
    #[clap(long)]
    pub report: Option<PathBuf>,

    /// Stop scheduling cases after the first one that does not pass
    #[clap(long)]
    pub stop_on_failure: bool,

    /// Deadline for the whole run, overriding the configured one
    #[clap(long)]
    pub run_timeout_ms: Option<u64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_run_flags() {
        let cli = Cli::try_parse_from([
            "kvconform",
            "--config",
            "harness.toml",
            "run",
            "--tag",
            "bug",
            "--tag",
            "auth",
            "--exclude-tag",
            "performance",
            "--filter",
            "post_",
            "--stop-on-failure",
            "--run-timeout-ms",
            "30000",
            "--report",
            "out/report.json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("harness.toml")));
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.suite.tags, vec!["bug", "auth"]);
        assert!(args.stop_on_failure);
        assert_eq!(args.run_timeout_ms, Some(30_000));
        assert_eq!(args.report, Some(PathBuf::from("out/report.json")));

        let filter = args.suite.case_filter();
        assert_eq!(filter.exclude_tags, vec!["performance"]);
        assert_eq!(filter.name_contains.as_deref(), Some("post_"));
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["kvconform", "list", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::List(_)));
    }

    #[test]
    fn check_config_takes_no_arguments() {
        assert!(Cli::try_parse_from(["kvconform", "check-config", "extra"]).is_err());
    }
}
