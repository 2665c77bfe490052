//! Integration tests for the interactive assessment flow.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use tempfile::TempDir;

use pgcf_cli::interactive::{AssessOptions, AssessOutcome, NO_DOMAIN_MESSAGE, run_assessment};
use pgcf_model::{Framework, ProficiencyLevel, Section, TopicRow};
use pgcf_output::{DirectorySink, EXPORT_FILE_NAME, read_export};

fn framework() -> Framework {
    let mut domain_a = Section::new("1. Domain A");
    domain_a.rows.push(
        TopicRow::new("Sequencing QC")
            .with_description(ProficiencyLevel::Understand, "Can interpret QC metrics"),
    );
    let mut domain_c = Section::new("3. Domain C");
    domain_c.rows.push(TopicRow::new("Phylogenetics"));
    Framework::new(vec![domain_a, Section::new("2. Domain B"), domain_c])
}

fn options<'s>(output: &Path) -> AssessOptions<'s> {
    AssessOptions {
        name: None,
        job_title: None,
        role: None,
        domains: Vec::new(),
        output: output.to_path_buf(),
        sink: None,
    }
}

fn run(
    framework: &Framework,
    options: &AssessOptions<'_>,
    input: &str,
) -> (AssessOutcome, String) {
    let mut input = Cursor::new(input.to_string());
    let mut out = Vec::new();
    let outcome = run_assessment(framework, options, &mut input, &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[test]
fn single_topic_assessment_writes_export() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);
    let framework = framework();

    let (outcome, _) = run(&framework, &options(&path), "JS-001\n\n\n1\n3\n");

    assert!(matches!(
        outcome,
        AssessOutcome::Completed {
            answered: 1,
            upload: None,
            ..
        }
    ));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# Name / ID: JS-001\n\
         # Job Title: \n\
         # Role: \n\
         Competency,Selected Level,Description\n\
         Sequencing QC,Understand,Can interpret QC metrics\n"
    );
}

#[test]
fn zero_domains_halts_without_export() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);
    let framework = framework();

    let (outcome, out) = run(&framework, &options(&path), "JS-001\nScientist\nQC\n\n");

    assert!(matches!(outcome, AssessOutcome::NoDomains));
    assert!(out.contains(NO_DOMAIN_MESSAGE));
    assert!(!out.contains("Choice ["));
    assert!(!path.exists());
}

#[test]
fn invalid_answers_are_prompted_again() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);
    let framework = framework();

    let (_, out) = run(
        &framework,
        &options(&path),
        "JS-001\n\n\n7\n1,3\nmaybe\n0\n9\nunderstand\n8\n",
    );

    assert!(out.contains("Enter numbers between 1 and 3."));
    assert_eq!(out.matches("Please choose one of the options 1-8.").count(), 3);

    let export = read_export(&fs::read(&path).unwrap()).unwrap();
    let answers: Vec<(&str, ProficiencyLevel, &str)> = export
        .rows
        .iter()
        .map(|row| (row.competency.as_str(), row.level, row.description.as_str()))
        .collect();
    assert_eq!(
        answers,
        vec![
            (
                "Sequencing QC",
                ProficiencyLevel::Understand,
                "Can interpret QC metrics"
            ),
            ("Phylogenetics", ProficiencyLevel::NotApplicable, "Not applicable"),
        ]
    );
}

#[test]
fn empty_domain_renders_header_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);
    let framework = framework();
    let mut options = options(&path);
    options.name = Some("JS-001".to_string());
    options.job_title = Some(String::new());
    options.role = Some(String::new());
    options.domains = vec!["2".to_string()];

    let (outcome, out) = run(&framework, &options, "");

    assert!(out.contains("== 2. Domain B =="));
    assert!(!out.contains("Choice ["));
    assert!(matches!(
        outcome,
        AssessOutcome::Completed { answered: 0, .. }
    ));
    let export = read_export(&fs::read(&path).unwrap()).unwrap();
    assert!(export.rows.is_empty());
}

#[test]
fn prefilled_details_and_domain_skip_prompts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);
    let framework = framework();
    let mut options = options(&path);
    options.name = Some("JS-001".to_string());
    options.job_title = Some("Bioinformatician".to_string());
    options.role = Some("Surveillance".to_string());
    options.domains = vec!["3. Domain C".to_string()];

    let (_, out) = run(&framework, &options, "1\n");

    assert!(!out.contains("Name / ID: "));
    let export = read_export(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(export.respondent.job_title, "Bioinformatician");
    assert_eq!(export.rows.len(), 1);
    assert_eq!(export.rows[0].level, ProficiencyLevel::Unfamiliar);
    assert_eq!(export.rows[0].description, pgcf_model::UNFAMILIAR_DESCRIPTION);
}

#[test]
fn unknown_prefilled_domain_is_an_error() {
    let dir = TempDir::new().unwrap();
    let framework = framework();
    let mut options = options(&dir.path().join(EXPORT_FILE_NAME));
    options.domains = vec!["9. Missing".to_string()];

    let mut input = Cursor::new("\n\n\n".to_string());
    let mut out = Vec::new();
    let error = run_assessment(&framework, &options, &mut input, &mut out).unwrap_err();
    assert!(error.to_string().contains("unknown domain"));
}

#[test]
fn upload_follows_local_export() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);
    let sink = DirectorySink::new(dir.path().join("bucket"));
    let framework = framework();
    let mut options = options(&path);
    options.sink = Some(&sink);

    let (outcome, out) = run(&framework, &options, "JS-001\n\n\n1\n3\n");

    let AssessOutcome::Completed {
        upload: Some(Ok(receipt)),
        ..
    } = outcome
    else {
        panic!("expected a successful upload");
    };
    assert_eq!(receipt.bytes, fs::read(&path).unwrap().len());
    assert!(out.contains("Uploaded to"));
    assert_eq!(
        fs::read(dir.path().join("bucket").join(EXPORT_FILE_NAME)).unwrap(),
        fs::read(&path).unwrap()
    );
}

fn repeated_header_framework() -> Framework {
    let mut first = Section::new("1. A");
    first.rows.push(TopicRow::new("X"));
    let mut second = Section::new("1. A");
    second.rows.push(TopicRow::new("Y"));
    Framework::new(vec![first, second])
}

#[test]
fn numbered_choice_picks_that_section_among_repeated_headers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);
    let framework = repeated_header_framework();

    let (_, out) = run(&framework, &options(&path), "JS-001\n\n\n2\n4\n");

    assert_eq!(out.matches("== 1. A ==").count(), 1);
    let export = read_export(&fs::read(&path).unwrap()).unwrap();
    let topics: Vec<&str> = export.rows.iter().map(|row| row.competency.as_str()).collect();
    assert_eq!(topics, vec!["Y"]);
}

#[test]
fn prefilled_header_selects_every_matching_section() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);
    let framework = repeated_header_framework();
    let mut options = options(&path);
    options.domains = vec!["1. A".to_string()];

    let (_, out) = run(&framework, &options, "JS-001\n\n\n2\n3\n");

    assert_eq!(out.matches("== 1. A ==").count(), 2);
    let export = read_export(&fs::read(&path).unwrap()).unwrap();
    let answers: Vec<(&str, ProficiencyLevel)> = export
        .rows
        .iter()
        .map(|row| (row.competency.as_str(), row.level))
        .collect();
    assert_eq!(
        answers,
        vec![
            ("X", ProficiencyLevel::Remember),
            ("Y", ProficiencyLevel::Understand)
        ]
    );
}

#[test]
fn input_ending_mid_assessment_is_an_error() {
    let dir = TempDir::new().unwrap();
    let framework = framework();
    let options = options(&dir.path().join(EXPORT_FILE_NAME));

    let mut input = Cursor::new("JS-001\n\n\n1\n".to_string());
    let mut out = Vec::new();
    let error = run_assessment(&framework, &options, &mut input, &mut out).unwrap_err();
    assert!(error.to_string().contains("Sequencing QC"));
}
