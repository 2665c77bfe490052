use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use pgcf_cli::config::AppConfig;
use pgcf_cli::interactive::{AssessOptions, AssessOutcome, run_assessment};
use pgcf_cli::summary::{domains_table, respondent_table, results_table};
use pgcf_ingest::FrameworkCache;
use pgcf_output::read_export;

use crate::cli::AssessArgs;

pub fn run_domains(cache: &FrameworkCache) -> Result<()> {
    let framework = cache.get().context("load framework")?;
    println!("{}", domains_table(framework));
    Ok(())
}

pub fn run_assess(
    args: &AssessArgs,
    cache: &FrameworkCache,
    config: &AppConfig,
) -> Result<AssessOutcome> {
    let framework = cache.get().context("load framework")?;
    if framework.is_empty() {
        warn!(path = %cache.path().display(), "framework has no domains");
    }

    // A misconfigured sink must not block the local export.
    let sink = if args.upload {
        match config.build_sink() {
            Ok(sink) => Some(sink),
            Err(error) => {
                eprintln!("Upload disabled: {} ({error})", error.user_message());
                None
            }
        }
    } else {
        None
    };

    let options = AssessOptions {
        name: args.name.clone(),
        job_title: args.job_title.clone(),
        role: args.role.clone(),
        domains: args.domains.clone(),
        output: args
            .output
            .clone()
            .unwrap_or_else(|| config.export.file_name.clone()),
        sink: sink.as_deref(),
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    let outcome = run_assessment(framework, &options, &mut input, &mut output)?;
    if let AssessOutcome::Completed {
        export_path,
        answered,
        ..
    } = &outcome
    {
        info!(path = %export_path.display(), answered, "assessment completed");
    }
    Ok(outcome)
}

pub fn run_inspect(path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let export = read_export(&bytes).with_context(|| format!("parse {}", path.display()))?;
    println!("{}", respondent_table(&export.respondent));
    println!("{}", results_table(&export.rows));
    Ok(())
}
