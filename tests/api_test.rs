//! Router-level tests that need no database.
//!
//! The pool points at a port nothing listens on, so any handler that reaches
//! the database fails with a 500. Everything checked here must be decided
//! before that point.

#![cfg(unix)]

mod common;

use std::path::Path;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use blockscan::parsers::{findings, normalize_output, summary};
use blockscan::services::slither::SlitherRunner;
use blockscan::{db, routes, AppState};
use common::{
    fake_slither, file_count, multipart_body, silent_slither, test_config, BOUNDARY,
    SAMPLE_CONTRACT, UNREACHABLE_DATABASE_URL,
};

fn app(upload_dir: &Path, slither_bin: &Path) -> Router {
    let config = test_config(UNREACHABLE_DATABASE_URL, upload_dir, slither_bin);
    let options = db::connect_options(&config.database_url, &config.database_anon_key)
        .expect("connect options");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(options);
    routes::router(AppState::new(pool, config))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

fn upload_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    Request::post("/contract-upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn analyze_request(body: Value) -> Request<Body> {
    Request::post("/contract-analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Session-Id", "session-abc")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_running() {
    let dir = tempfile::tempdir().unwrap();
    let slither = fake_slither(dir.path());

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(dir.path(), &slither), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "message": "Server is running" }));
}

#[tokio::test]
async fn readiness_reports_each_dependency() {
    let dir = tempfile::tempdir().unwrap();
    let slither = fake_slither(dir.path());

    let request = Request::get("/health/ready").body(Body::empty()).unwrap();
    let (status, body) = send(app(dir.path(), &slither), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slither"], "0.10.0");
    assert!(body["data"]["database"].as_str().unwrap().starts_with("error"));
}

#[tokio::test]
async fn upload_stores_sol_file_under_generated_name() {
    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir(&uploads).unwrap();
    let slither = fake_slither(dir.path());

    let request = upload_request(&[
        ("note", None, b"ignored text field".as_slice()),
        ("contractFile", Some("Vault.SOL"), SAMPLE_CONTRACT),
    ]);
    let (status, body) = send(app(&uploads, &slither), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "File uploaded successfully");
    let filename = body["data"]["filename"].as_str().unwrap();
    assert!(filename.starts_with("Vault-"));
    assert!(filename.ends_with(".sol"));
    assert_eq!(std::fs::read(uploads.join(filename)).unwrap(), SAMPLE_CONTRACT);
}

#[tokio::test]
async fn upload_rejects_other_extensions_without_storing() {
    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir(&uploads).unwrap();
    let slither = fake_slither(dir.path());

    for _ in 0..3 {
        let request = upload_request(&[("contractFile", Some("notes.txt"), b"hello".as_slice())]);
        let (status, body) = send(app(&uploads, &slither), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Only .sol files are allowed");
    }
    assert_eq!(file_count(&uploads), 0);
}

#[tokio::test]
async fn upload_requires_exactly_one_contract_file() {
    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir(&uploads).unwrap();
    let slither = fake_slither(dir.path());

    let (status, body) = send(app(&uploads, &slither), upload_request(&[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file uploaded");

    let request = upload_request(&[
        ("contractFile", Some("A.sol"), b"contract A {}".as_slice()),
        ("contractFile", Some("B.sol"), b"contract B {}".as_slice()),
    ]);
    let (status, _) = send(app(&uploads, &slither), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = upload_request(&[("attachment", Some("A.sol"), b"contract A {}".as_slice())]);
    let (status, _) = send(app(&uploads, &slither), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(file_count(&uploads), 0);
}

#[tokio::test]
async fn upload_enforces_size_limit() {
    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir(&uploads).unwrap();
    let slither = fake_slither(dir.path());

    let big = vec![b'a'; 4096];
    let request = upload_request(&[("contractFile", Some("Big.sol"), big.as_slice())]);
    let (status, body) = send(app(&uploads, &slither), request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["status"], "error");
    assert_eq!(file_count(&uploads), 0);
}

#[tokio::test]
async fn analyze_requires_project_name_and_filename() {
    let dir = tempfile::tempdir().unwrap();
    let slither = fake_slither(dir.path());

    for body in [
        json!({}),
        json!({ "projectName": "Vault" }),
        json!({ "filename": "A.sol" }),
        json!({ "projectName": "", "filename": "A.sol" }),
        json!({ "projectName": "   ", "filename": "A.sol" }),
    ] {
        let (status, response) = send(app(dir.path(), &slither), analyze_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "Project name and filename are required");
    }
}

#[tokio::test]
async fn analyze_rejects_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let slither = fake_slither(dir.path());

    let request = Request::post("/contract-analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(dir.path(), &slither), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn analyze_unknown_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let slither = fake_slither(dir.path());

    for filename in ["never-uploaded.sol", "../Cargo.toml", "nested/file.sol"] {
        let request = analyze_request(json!({ "projectName": "Vault", "filename": filename }));
        let (status, body) = send(app(dir.path(), &slither), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{filename}");
        assert_eq!(body["message"], "Contract file not found");
    }
}

#[tokio::test]
async fn analyze_failure_still_removes_the_upload() {
    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir(&uploads).unwrap();
    let slither = fake_slither(dir.path());
    std::fs::write(uploads.join("Vault-1-1.sol"), SAMPLE_CONTRACT).unwrap();

    // The analyzer runs, then persistence fails against the unreachable database.
    let request = analyze_request(json!({ "projectName": "Vault", "filename": "Vault-1-1.sol" }));
    let (status, body) = send(app(&uploads, &slither), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "An internal error occurred");
    assert_eq!(file_count(&uploads), 0);
}

#[tokio::test]
async fn analyze_without_summary_output_fails_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir(&uploads).unwrap();
    let slither = silent_slither(dir.path());
    std::fs::write(uploads.join("Vault-1-1.sol"), SAMPLE_CONTRACT).unwrap();

    let request = analyze_request(json!({ "projectName": "Vault", "filename": "Vault-1-1.sol" }));
    let (status, body) = send(app(&uploads, &slither), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Analysis failed");
    assert_eq!(file_count(&uploads), 0);
}

#[tokio::test]
async fn polluted_contract_ids_redirect_permanently() {
    let dir = tempfile::tempdir().unwrap();
    let slither = fake_slither(dir.path());

    let request = Request::get("/contract/Object%200b6f3a52-3c1e-4e0c-9d8e-2f4c7b1a9e10")
        .body(Body::empty())
        .unwrap();
    let response = app(dir.path(), &slither).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/contract/0b6f3a52-3c1e-4e0c-9d8e-2f4c7b1a9e10"
    );
}

#[tokio::test]
async fn non_uuid_contract_id_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let slither = fake_slither(dir.path());

    let request = Request::get("/contract/42").body(Body::empty()).unwrap();
    let (status, body) = send(app(dir.path(), &slither), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Contract not found");

    let request = Request::get("/contract/42/vulnerabilities").body(Body::empty()).unwrap();
    let (status, _) = send(app(dir.path(), &slither), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn projects_require_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let slither = fake_slither(dir.path());

    let request = Request::get("/projects").body(Body::empty()).unwrap();
    let (status, body) = send(app(dir.path(), &slither), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "status": "error", "message": "No session ID found" }));
}

#[tokio::test]
async fn cors_allows_configured_origin_with_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let slither = fake_slither(dir.path());

    let request = Request::get("/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app(dir.path(), &slither).oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );

    let request = Request::get("/health")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app(dir.path(), &slither).oneshot(request).await.unwrap();
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn fake_analyzer_output_parses_like_slither() {
    let dir = tempfile::tempdir().unwrap();
    let slither = fake_slither(dir.path());
    let contract = dir.path().join("Vault.sol");
    std::fs::write(&contract, SAMPLE_CONTRACT).unwrap();
    let runner = SlitherRunner::new(slither.display().to_string(), 1024 * 1024);

    let summary_text = runner.summary(&contract).await.unwrap();
    let scan = summary::parse_summary(&normalize_output(&summary_text), 0);
    assert_eq!(scan.total_contracts, 1);
    assert_eq!(scan.source_lines, 40);
    assert_eq!(scan.issues.high, 1);
    assert_eq!(scan.issues.medium, 1);
    assert_eq!(scan.ercs, "ERC20");

    let full_text = runner.full(&contract).await.unwrap();
    let found = findings::parse_findings(&normalize_output(&full_text));
    let ids: Vec<&str> = found.iter().map(|f| f.entry.id).collect();
    assert_eq!(ids, vec!["reentrancy-vulnerabilities", "tx-origin"]);

    assert!(runner.checklist(&contract).await.contains("## Summary"));
    assert_eq!(runner.version().await.unwrap(), "0.10.0");
}
