//! Integration tests for export rendering and upload.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;

use proptest::prelude::*;

use pgcf_model::{ProficiencyLevel, Respondent, ResultRow};
use pgcf_output::{
    EXPORT_FILE_NAME, GcsCredential, GcsSink, ServiceAccountKey, UploadError, read_export,
    render_export, upload_export,
};

fn rows() -> Vec<ResultRow> {
    vec![
        ResultRow {
            competency: "Sequencing QC".to_string(),
            level: ProficiencyLevel::Understand,
            description: "Can interpret QC metrics".to_string(),
        },
        ResultRow {
            competency: "Outbreak detection, clustering".to_string(),
            level: ProficiencyLevel::Unfamiliar,
            description: pgcf_model::UNFAMILIAR_DESCRIPTION.to_string(),
        },
        ResultRow {
            competency: "Phylogenetics".to_string(),
            level: ProficiencyLevel::NotApplicable,
            description: "Not applicable".to_string(),
        },
    ]
}

#[test]
fn export_table_snapshot() {
    let respondent = Respondent::new("JS-001", "Bioinformatician", "Surveillance");
    let bytes = render_export(&respondent, &rows()).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    insta::assert_snapshot!(text, @r#"
    # Name / ID: JS-001
    # Job Title: Bioinformatician
    # Role: Surveillance
    Competency,Selected Level,Description
    Sequencing QC,Understand,Can interpret QC metrics
    "Outbreak detection, clustering",Unfamiliar,I have not encountered this concept before or have had limited education or training in this area
    Phylogenetics,N/A,Not applicable
    "#);
}

/// A request seen by the stub server: lowercased head and raw body.
struct SeenRequest {
    head: String,
    body: String,
}

/// Serves one request per reply, in order, and returns what it received.
fn serve(
    replies: Vec<(&'static str, &'static str)>,
) -> (String, thread::JoinHandle<Vec<SeenRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status_line, reply) in replies {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                let lower = line.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                head.push_str(&lower);
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();

            let mut stream = stream;
            write!(
                stream,
                "{status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{reply}",
                reply.len()
            )
            .unwrap();
            stream.flush().unwrap();
            seen.push(SeenRequest {
                head,
                body: String::from_utf8(body).unwrap(),
            });
        }
        seen
    });
    (endpoint, handle)
}

fn access_token(value: &str) -> GcsCredential {
    GcsCredential::AccessToken(value.to_string())
}

#[test]
fn gcs_upload_sends_media_request() {
    let (endpoint, server) = serve(vec![("HTTP/1.1 200 OK", "{}")]);
    let sink = GcsSink::new("pgcf-results", access_token("secret-token"))
        .unwrap()
        .with_endpoint(endpoint);

    let receipt = upload_export(&sink, b"payload").unwrap();
    let seen = server.join().unwrap();

    assert!(seen[0].head.starts_with(&format!(
        "post /upload/storage/v1/b/pgcf-results/o?uploadtype=media&name={}",
        EXPORT_FILE_NAME
    )));
    assert!(seen[0].head.contains("authorization: bearer secret-token"));
    assert!(seen[0].head.contains("content-type: text/csv"));
    assert_eq!(seen[0].body, "payload");
    assert_eq!(
        receipt.location,
        format!("gs://pgcf-results/{EXPORT_FILE_NAME}")
    );
    assert_eq!(receipt.bytes, 7);
}

#[test]
fn gcs_upload_reports_rejection() {
    let (endpoint, server) = serve(vec![("HTTP/1.1 403 Forbidden", "denied")]);
    let sink = GcsSink::new("pgcf-results", access_token("expired"))
        .unwrap()
        .with_endpoint(endpoint);

    let error = upload_export(&sink, b"payload").unwrap_err();
    server.join().unwrap();

    match error {
        UploadError::Rejected { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "denied");
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn service_account(token_uri: &str) -> GcsCredential {
    let json = serde_json::json!({
        "type": "service_account",
        "client_email": "uploader@pgcf.iam.gserviceaccount.com",
        "private_key": include_str!("fixtures/service_account_key.pem"),
        "token_uri": token_uri,
    })
    .to_string();
    GcsCredential::ServiceAccount(ServiceAccountKey::from_json(&json).unwrap())
}

#[test]
fn gcs_upload_exchanges_service_account_key_for_token() {
    let (endpoint, server) = serve(vec![
        (
            "HTTP/1.1 200 OK",
            r#"{"access_token":"minted-token","expires_in":3599,"token_type":"Bearer"}"#,
        ),
        ("HTTP/1.1 200 OK", "{}"),
    ]);
    let sink = GcsSink::new("pgcf-results", service_account(&format!("{endpoint}/token")))
        .unwrap()
        .with_endpoint(endpoint);

    upload_export(&sink, b"payload").unwrap();
    let seen = server.join().unwrap();

    assert!(seen[0].head.starts_with("post /token "));
    assert!(seen[0].head.contains("content-type: application/x-www-form-urlencoded"));
    let assertion = seen[0]
        .body
        .strip_prefix("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer&assertion=")
        .unwrap();
    assert_eq!(assertion.split('.').count(), 3);

    assert!(seen[1].head.starts_with("post /upload/storage/v1/b/pgcf-results/o"));
    assert!(seen[1].head.contains("authorization: bearer minted-token"));
}

#[test]
fn gcs_upload_stops_when_token_is_refused() {
    let (endpoint, server) = serve(vec![(
        "HTTP/1.1 400 Bad Request",
        r#"{"error":"invalid_grant"}"#,
    )]);
    let sink = GcsSink::new("pgcf-results", service_account(&format!("{endpoint}/token")))
        .unwrap()
        .with_endpoint(endpoint);

    let error = upload_export(&sink, b"payload").unwrap_err();
    let seen = server.join().unwrap();

    assert_eq!(seen.len(), 1);
    match error {
        UploadError::TokenRejected { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("invalid_grant"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,\"'/().-]{0,24}"
}

fn level_strategy() -> impl Strategy<Value = ProficiencyLevel> {
    prop::sample::select(ProficiencyLevel::ALL.to_vec())
}

proptest! {
    #[test]
    fn parsed_export_matches_rendered_rows(
        identity in "[A-Za-z0-9 -]{0,12}",
        entries in prop::collection::vec((text_strategy(), level_strategy(), text_strategy()), 0..12),
    ) {
        let respondent = Respondent::new(identity, "", "");
        let rows: Vec<ResultRow> = entries
            .into_iter()
            .map(|(competency, level, description)| ResultRow { competency, level, description })
            .collect();

        let bytes = render_export(&respondent, &rows).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        prop_assert!(text.lines().take(3).all(|line| line.starts_with("# ")));

        let parsed = read_export(&bytes).unwrap();
        prop_assert_eq!(parsed.respondent, respondent);
        prop_assert_eq!(parsed.rows, rows);
    }
}
