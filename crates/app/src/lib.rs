//! kvconform - Conformance harness for key/value HTTP APIs
//!
//! Wires configuration, adapters and the runner together for the binary.

pub mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use kvconform_application::{ConformanceRunner, RunOptions, reference_suite};
use kvconform_domain::conformance::{ConformanceSuite, DEFAULT_TIMING_THRESHOLD_MS};
use kvconform_domain::{HarnessConfig, RunReport};
use kvconform_infrastructure::{
    ConfigLoader, RedisStore, ReqwestHttpClient, SystemClock, load_suite, render_console,
    to_json_stable, write_json_report,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::cli::{Cli, Command, RunArgs, SuiteArgs};

/// Exit code when every selected case passed.
pub const EXIT_PASSED: u8 = 0;
/// Exit code when a case failed, errored or did not run.
pub const EXIT_FAILED: u8 = 1;
/// Exit code for configuration and startup errors.
pub const EXIT_STARTUP_ERROR: u8 = 2;

/// Executes a parsed command line and returns the process exit code.
///
/// # Errors
///
/// Returns an error for configuration or startup failures; the caller maps
/// those to [`EXIT_STARTUP_ERROR`].
pub async fn execute(cli: Cli) -> Result<u8> {
    match cli.command {
        Command::Run(ref args) => run(&cli, args).await,
        Command::List(ref args) => list(&cli, args).await,
        Command::CheckConfig => check_config(&cli),
    }
}

fn config_loader(cli: &Cli) -> ConfigLoader {
    let loader = ConfigLoader::new();
    match &cli.config {
        Some(path) => loader.with_file(path),
        None => loader,
    }
}

fn load_config(cli: &Cli) -> Result<HarnessConfig> {
    config_loader(cli).load().context("invalid configuration")
}

/// Loads the suite file or builds the reference suite, then applies the filters.
///
/// # Errors
///
/// Returns an error if the suite file cannot be loaded.
pub async fn select_suite(args: &SuiteArgs, timing_threshold_ms: u64) -> Result<ConformanceSuite> {
    let suite = match &args.suite {
        Some(path) => load_suite(path)
            .await
            .with_context(|| format!("failed to load suite {}", path.display()))?,
        None => reference_suite(timing_threshold_ms),
    };
    Ok(suite.filtered(&args.case_filter()))
}

async fn run(cli: &Cli, args: &RunArgs) -> Result<u8> {
    let config = load_config(cli)?;
    let suite = select_suite(&args.suite, config.timing_threshold_ms).await?;
    if suite.is_empty() {
        warn!(suite = %suite.name, "No cases match the selection");
        return Ok(EXIT_FAILED);
    }

    let http = ReqwestHttpClient::new().context("failed to create HTTP client")?;
    let store = RedisStore::connect(&config.store)
        .await
        .with_context(|| format!("failed to connect to store at {}", config.store.endpoint()))?;

    let run_timeout = args
        .run_timeout_ms
        .map(Duration::from_millis)
        .or(config.run_timeout);
    let options = RunOptions::default()
        .with_stop_on_failure(args.stop_on_failure)
        .with_run_timeout(run_timeout);

    info!(endpoint = %config.keys_endpoint(), cases = suite.len(), "Running suite");
    let report = ConformanceRunner::new(
        Arc::new(http),
        Arc::new(store),
        Arc::new(SystemClock::new()),
        config.keys_endpoint(),
        config.api_token.clone(),
    )
    .with_request_timeout(config.request_timeout)
    .with_options(options)
    .run(&suite)
    .await?;

    print_report(&report, cli.json)?;
    if let Some(path) = &args.report {
        save_report(&report, path).await;
    }

    Ok(exit_code(&report))
}

/// Writes the JSON report; a failure is logged and does not change the verdict.
pub async fn save_report(report: &RunReport, path: &Path) -> bool {
    match write_json_report(report, path).await {
        Ok(()) => true,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to write report");
            false
        }
    }
}

/// Exit code for a finished run. A run with no cases is not a pass.
#[must_use]
pub const fn exit_code(report: &RunReport) -> u8 {
    if report.summary.total > 0 && report.all_passed() {
        EXIT_PASSED
    } else {
        EXIT_FAILED
    }
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        print!("{}", to_json_stable(report)?);
    } else {
        print!("{}", render_console(report));
    }
    Ok(())
}

/// One row of `list` output.
#[derive(Debug, Serialize)]
struct CaseListing<'a> {
    name: &'a str,
    description: &'a str,
    method: String,
    tags: &'a [String],
}

async fn list(cli: &Cli, args: &SuiteArgs) -> Result<u8> {
    let threshold = list_threshold(cli)?;
    let suite = select_suite(args, threshold).await?;

    let rows: Vec<CaseListing<'_>> = suite
        .cases
        .iter()
        .map(|case| CaseListing {
            name: &case.name,
            description: case.display_name(),
            method: case.method.to_string(),
            tags: &case.tags,
        })
        .collect();

    if cli.json {
        print!("{}", to_json_stable(&rows)?);
    } else {
        for row in &rows {
            let tags = if row.tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", row.tags.join(", "))
            };
            println!("{:<26} {:<7} {}{tags}", row.name, row.method, row.description);
        }
    }
    Ok(EXIT_PASSED)
}

/// Listing needs no connection settings; only the timing threshold is read.
fn list_threshold(cli: &Cli) -> Result<u64> {
    match config_loader(cli).load_raw() {
        Ok(raw) => Ok(raw.timing_threshold_ms.unwrap_or(DEFAULT_TIMING_THRESHOLD_MS)),
        Err(e) => match &cli.config {
            Some(path) => Err(e)
                .with_context(|| format!("failed to read configuration {}", path.display())),
            None => {
                warn!(error = %e, "Ignoring unreadable configuration");
                Ok(DEFAULT_TIMING_THRESHOLD_MS)
            }
        },
    }
}

fn check_config(cli: &Cli) -> Result<u8> {
    let config = load_config(cli)?;
    for warning in config.store.tls.security_warnings() {
        warn!("{}", warning.message());
    }
    println!("{config:#?}");
    println!("keys endpoint: {}", config.keys_endpoint());
    Ok(EXIT_PASSED)
}
