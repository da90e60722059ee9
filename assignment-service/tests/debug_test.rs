mod common;

use common::{file_part, PanickingToolkit, RecordingProvider, TestApp};
use reqwest::multipart::Form;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

const SALES: &[u8] = br#"[
    {"city": "Istanbul", "product": "Shirt", "sales": 40},
    {"city": "Istanboul", "product": "Shirt", "sales": 36},
    {"city": "Istambul", "product": "Shirt", "sales": 12},
    {"city": "Shanghai", "product": "Shirt", "sales": 80}
]"#;

async fn json_body(response: reqwest::Response) -> Value {
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.expect("Failed to parse JSON")
}

#[tokio::test]
async fn prettier_hash_without_file_is_soft_error() {
    let (app, _) = TestApp::spawn().await;

    let form = Form::new().text("params", "{}");
    let body = json_body(app.post_form("/debug/calculate_prettier_sha256", form).await).await;

    assert_eq!(
        body,
        json!({"error": "No file provided for calculate_prettier_sha256"})
    );
}

#[tokio::test]
async fn empty_params_fall_back_to_default() {
    let (app, _) = TestApp::spawn().await;

    let form = Form::new().text("params", "");
    let body = json_body(app.post_form("/debug/calculate_prettier_sha256", form).await).await;

    assert_eq!(
        body,
        json!({"error": "No file provided for calculate_prettier_sha256"})
    );
}

#[tokio::test]
async fn unknown_function_is_soft_error() {
    let (app, _) = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/debug/unknown_fn", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(
        json_body(response).await,
        json!({"error": "Function unknown_fn not supported for direct testing"})
    );
}

#[tokio::test]
async fn malformed_params_return_traceback() {
    let (app, _) = TestApp::spawn().await;

    let form = Form::new().text("params", "{not json");
    let body = json_body(
        app.post_form("/debug/analyze_sales_with_phonetic_clustering", form)
            .await,
    )
    .await;

    let error = body["error"].as_str().expect("error message");
    assert!(error.contains("parsing params as JSON"));
    let traceback = body["traceback"].as_str().expect("traceback");
    assert!(!traceback.is_empty());
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn sales_analysis_receives_uploaded_file_path() {
    let (app, _) = TestApp::spawn().await;

    let form = Form::new()
        .part("file", file_part("sales.json", SALES))
        .text(
            "params",
            r#"{"product": "Shirt", "city": "Istanbul", "min_sales": 36}"#,
        );
    let body = json_body(
        app.post_form("/debug/analyze_sales_with_phonetic_clustering", form)
            .await,
    )
    .await;

    let result = &body["result"];
    assert_eq!(result["total_sales"], 76);
    assert_eq!(result["matched_transactions"], 2);
    assert_eq!(result["matched_city_names"], json!(["Istanboul", "Istanbul"]));
}

#[tokio::test]
async fn sales_analysis_without_file_reports_missing_parameter() {
    let (app, _) = TestApp::spawn().await;

    let form = Form::new().text("params", r#"{"product": "Shirt", "city": "Istanbul"}"#);
    let body = json_body(
        app.post_form("/debug/analyze_sales_with_phonetic_clustering", form)
            .await,
    )
    .await;

    assert!(body["error"].as_str().unwrap().contains("file_path"));
    assert!(!body["traceback"].as_str().unwrap().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn prettier_hash_of_uploaded_file() {
    let (app, _) = TestApp::spawn().await;

    let form = Form::new().part("file", file_part("README.md", b"abc"));
    let body = json_body(app.post_form("/debug/calculate_prettier_sha256", form).await).await;

    assert_eq!(
        body,
        json!({"result": {"hash": "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"}})
    );
}

#[tokio::test]
async fn non_object_params_with_file_are_reported() {
    let (app, _) = TestApp::spawn().await;

    let form = Form::new()
        .part("file", file_part("README.md", b"abc"))
        .text("params", "[1, 2]");
    let body = json_body(app.post_form("/debug/calculate_prettier_sha256", form).await).await;

    assert_eq!(body["error"], "params must be a JSON object");
    assert!(body["traceback"].is_string());
}

#[tokio::test]
async fn collaborator_errors_are_enveloped() {
    let app = TestApp::spawn_with(
        Arc::new(RecordingProvider::default()),
        Arc::new(PanickingToolkit),
    )
    .await;

    let form = Form::new().part("file", file_part("README.md", b"abc"));
    let body = json_body(app.post_form("/debug/calculate_prettier_sha256", form).await).await;

    assert_eq!(
        body["error"],
        "running calculate_prettier_sha256: Command failed: formatter unavailable"
    );
    assert!(body["traceback"].as_str().unwrap().contains("Caused by"));
}

#[tokio::test]
async fn panics_are_caught() {
    let app = TestApp::spawn_with(
        Arc::new(RecordingProvider::default()),
        Arc::new(PanickingToolkit),
    )
    .await;

    let body = json_body(
        app.post_form(
            "/debug/analyze_sales_with_phonetic_clustering",
            Form::new().text("params", "{}"),
        )
        .await,
    )
    .await;

    assert_eq!(body["error"], "analysis blew up");
    assert!(body["traceback"]
        .as_str()
        .unwrap()
        .contains("analyze_sales_with_phonetic_clustering"));
}
