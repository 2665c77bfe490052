//! Line-oriented assessment flow.
//!
//! Reads answers from any `BufRead` and writes prompts to any `Write`, so the
//! whole flow runs unchanged against stdin/stdout or in-memory buffers.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span, trace};

use pgcf_model::{AssessmentSession, Framework, ProficiencyLevel, RenderedTopic, Respondent};
use pgcf_output::{
    ObjectSink, UploadError, UploadReceipt, render_export, upload_export, write_export,
};

use crate::logging::redact_value;
use crate::summary::results_table;

/// Shown when the respondent picks no domain.
pub const NO_DOMAIN_MESSAGE: &str = "Please select at least one domain to continue.";

/// Settings for one assessment run.
pub struct AssessOptions<'s> {
    pub name: Option<String>,
    pub job_title: Option<String>,
    pub role: Option<String>,
    /// Pre-chosen domains (header text or leading number). Empty means prompt.
    pub domains: Vec<String>,
    pub output: PathBuf,
    pub sink: Option<&'s dyn ObjectSink>,
}

/// How an assessment run ended.
#[derive(Debug)]
pub enum AssessOutcome {
    /// No domain was chosen; nothing was rendered or written.
    NoDomains,
    Completed {
        export_path: PathBuf,
        answered: usize,
        upload: Option<Result<UploadReceipt, UploadError>>,
    },
}

/// Runs a full assessment: details, domains, one answer per topic, results,
/// export and optional upload.
pub fn run_assessment<R, W>(
    framework: &Framework,
    options: &AssessOptions<'_>,
    input: &mut R,
    out: &mut W,
) -> Result<AssessOutcome>
where
    R: BufRead,
    W: Write,
{
    let span = info_span!("assessment");
    let _guard = span.enter();

    let mut session = AssessmentSession::new(framework);

    writeln!(out, "Pathogen Genomics Competency Framework self-assessment")?;
    writeln!(out)?;
    let respondent = Respondent {
        identity: field(input, out, "Name / ID", options.name.as_deref())?,
        job_title: field(input, out, "Job Title", options.job_title.as_deref())?,
        role: field(input, out, "Role", options.role.as_deref())?,
    };
    trace!(identity = redact_value(&respondent.identity), "respondent details entered");
    session.set_respondent(respondent);

    let sections = if options.domains.is_empty() {
        prompt_domains(framework, input, out)?
    } else {
        resolve_domains(framework, &options.domains)?
    };
    if sections.is_empty() {
        writeln!(out, "{NO_DOMAIN_MESSAGE}")?;
        info!("no domain selected, assessment halted");
        return Ok(AssessOutcome::NoDomains);
    }
    session.choose_sections(sections)?;

    // Empty domains still show their header.
    let topics = session.rendered_topics();
    for (index, section) in session.chosen_sections() {
        writeln!(out)?;
        writeln!(out, "== {} ==", section.header)?;
        for topic in topics.iter().filter(|topic| topic.key.section == index) {
            let level = prompt_level(topic, input, out)?;
            let selection = session.select(topic.key, level)?;
            debug!(key = %topic.key, level = %selection.level, "selection recorded");
        }
    }

    let rows = session.results()?;
    writeln!(out)?;
    writeln!(out, "Your selections:")?;
    writeln!(out, "{}", results_table(&rows))?;

    let bytes = render_export(session.respondent(), &rows).context("render export")?;
    write_export(&options.output, &bytes)
        .with_context(|| format!("write export to {}", options.output.display()))?;
    writeln!(out, "Export saved to {}", options.output.display())?;

    let upload = options.sink.map(|sink| {
        let result = upload_export(sink, &bytes);
        report_upload(out, sink, &result).map(|()| result)
    });
    let upload = upload.transpose()?;

    Ok(AssessOutcome::Completed {
        export_path: options.output.clone(),
        answered: rows.len(),
        upload,
    })
}

fn report_upload<W: Write>(
    out: &mut W,
    sink: &dyn ObjectSink,
    result: &Result<UploadReceipt, UploadError>,
) -> io::Result<()> {
    match result {
        Ok(receipt) => writeln!(out, "Uploaded to {}", receipt.location),
        Err(error) => writeln!(
            out,
            "Upload to {} failed: {} ({error})",
            sink.describe(),
            error.user_message()
        ),
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn field<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    prefilled: Option<&str>,
) -> Result<String> {
    if let Some(value) = prefilled {
        return Ok(value.to_string());
    }
    write!(out, "{label}: ")?;
    out.flush()?;
    Ok(read_line(input)?.unwrap_or_default())
}

/// Section indices for header text or leading numbers; a repeated header
/// names every section that carries it.
fn resolve_domains(framework: &Framework, references: &[String]) -> Result<Vec<usize>> {
    let mut sections = Vec::new();
    for reference in references {
        let indices = framework.resolve_domain(reference);
        if indices.is_empty() {
            bail!("unknown domain: {reference}");
        }
        sections.extend(indices);
    }
    Ok(sections)
}

fn prompt_domains<R: BufRead, W: Write>(
    framework: &Framework,
    input: &mut R,
    out: &mut W,
) -> Result<Vec<usize>> {
    writeln!(out)?;
    writeln!(out, "Domains:")?;
    for (index, section) in framework.sections.iter().enumerate() {
        writeln!(out, "  {:>2}) {}", index + 1, section.header)?;
    }
    loop {
        write!(out, "Select domains (numbers separated by commas, blank for none): ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(Vec::new());
        };
        match parse_domain_numbers(&line, framework.sections.len()) {
            Some(indices) => return Ok(indices),
            None => writeln!(
                out,
                "Enter numbers between 1 and {}.",
                framework.sections.len()
            )?,
        }
    }
}

/// Parses `"1, 3 4"` into zero-based indices. `None` if any token is invalid.
fn parse_domain_numbers(line: &str, count: usize) -> Option<Vec<usize>> {
    line.split([',', ' ', '\t'])
        .filter(|token| !token.is_empty())
        .map(|token| match token.parse::<usize>() {
            Ok(number) if (1..=count).contains(&number) => Some(number - 1),
            _ => None,
        })
        .collect()
}

fn prompt_level<R: BufRead, W: Write>(
    topic: &RenderedTopic<'_>,
    input: &mut R,
    out: &mut W,
) -> Result<ProficiencyLevel> {
    writeln!(out)?;
    writeln!(out, "{}", topic.topic())?;
    for (index, option) in topic.options.iter().enumerate() {
        writeln!(out, "  {}) {}", index + 1, option.label())?;
    }
    let count = topic.options.len();
    loop {
        write!(out, "Choice [1-{count}]: ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            bail!("input ended before '{}' was answered", topic.topic());
        };
        if let Some(level) = parse_choice(line.trim(), topic) {
            return Ok(level);
        }
        writeln!(out, "Please choose one of the options 1-{count}.")?;
    }
}

/// Accepts an option number or a level name.
fn parse_choice(answer: &str, topic: &RenderedTopic<'_>) -> Option<ProficiencyLevel> {
    if let Ok(number) = answer.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| topic.options.get(index))
            .map(|option| option.level);
    }
    answer
        .parse::<ProficiencyLevel>()
        .ok()
        .filter(|level| topic.options.iter().any(|option| option.level == *level))
}
