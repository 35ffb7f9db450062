//! File upload, retrieval and download

use super::*;
use integrations_finetune::services::files::{FilePurpose, FileUploadRequest};
use integrations_finetune::FinetuneError;
use std::io::Write;
use wiremock::matchers::{body_string_contains, method, path};

#[tokio::test]
async fn test_upload_sends_multipart_with_purpose() {
    let server = setup_mock_server().await;

    mock_with_auth("POST", "/files")
        .and(body_string_contains("name=\"purpose\""))
        .and(body_string_contains("fine-tune"))
        .and(body_string_contains("filename=\"train.jsonl\""))
        .and(body_string_contains("\"messages\""))
        .respond_with(success_response(file_body(
            "file-train",
            "train.jsonl",
            "fine-tune",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("train.jsonl");
    let mut file = std::fs::File::create(&file_path).unwrap();
    writeln!(file, r#"{{"messages":[{{"role":"user","content":"hi"}}]}}"#).unwrap();

    let client = openai_client(&server);
    let request = FileUploadRequest::from_path(&file_path, FilePurpose::FineTune).unwrap();
    let uploaded = client.files().upload(request).await.unwrap();

    assert_eq!(uploaded.id, "file-train");
    assert_eq!(uploaded.filename, "train.jsonl");
    assert!(uploaded.is_ready());
}

#[tokio::test]
async fn test_upload_rejects_non_jsonl_training_file_locally() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(success_response(file_body("file-x", "x", "fine-tune")))
        .expect(0)
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let request = FileUploadRequest::new(
        bytes::Bytes::from_static(b"a,b\n1,2\n"),
        "train.csv",
        FilePurpose::FineTune,
    );

    let result = client.files().upload(request).await;

    assert!(matches!(result, Err(FinetuneError::Validation(_))));
}

#[tokio::test]
async fn test_download_file_content() {
    let server = setup_mock_server().await;
    let csv = "step,train_loss,train_accuracy,valid_loss,valid_mean_token_accuracy\n1,2.0,0.3,,\n";

    mock_with_auth("GET", "/files/file-results/content")
        .respond_with(ResponseTemplate::new(200).set_body_string(csv))
        .expect(1)
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let content = client.files().content("file-results").await.unwrap();

    assert_eq!(&content[..], csv.as_bytes());
}

#[tokio::test]
async fn test_retrieve_missing_file_is_not_found() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/files/file-missing"))
        .respond_with(error_response(404, "not_found", "No such File object"))
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let error = client.files().retrieve("file-missing").await.unwrap_err();

    assert_eq!(error.status_code(), Some(404));
}
