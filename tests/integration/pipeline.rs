//! End-to-end workflow: convert, submit, poll, metrics and evaluation

use super::*;
use integrations_finetune::pipeline::{
    fetch_result_metrics, parse_metrics_csv, cases_from_records, read_jsonl, read_source_rows, smooth_metrics,
    write_jsonl_file, DatasetConverter, EvaluationHarness, ImageMode, JobPoller,
    JobSubmission, JudgeVerdict, Metric,
};
use integrations_finetune::services::fine_tuning::FineTuningJobStatus;
use integrations_finetune::FinetuneError;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};

const RESULTS_CSV: &str = "step,train_loss,train_accuracy,valid_loss,valid_mean_token_accuracy\n\
1,2.0,0.30,,\n\
2,1.6,0.40,1.9,0.35\n\
3,1.2,0.55,,\n\
4,1.0,0.60,1.1,0.62\n";

#[tokio::test]
async fn test_submit_poll_and_fetch_metrics() {
    let server = setup_mock_server().await;

    mock_with_auth("POST", "/files")
        .and(body_string_contains("filename=\"train.jsonl\""))
        .respond_with(success_response(file_body("file-train", "train.jsonl", "fine-tune")))
        .expect(1)
        .mount(&server)
        .await;
    mock_with_auth("POST", "/files")
        .and(body_string_contains("filename=\"validation.jsonl\""))
        .respond_with(success_response(file_body(
            "file-valid",
            "validation.jsonl",
            "fine-tune",
        )))
        .expect(1)
        .mount(&server)
        .await;
    mock_with_auth("POST", "/fine_tuning/jobs")
        .and(body_partial_json(json!({
            "model": "gpt-4o-2024-08-06",
            "training_file": "file-train",
            "validation_file": "file-valid"
        })))
        .respond_with(success_response(job_body("ftjob-e2e", "validating_files")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fine_tuning/jobs/ftjob-e2e"))
        .respond_with(success_response(job_body("ftjob-e2e", "running")))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fine_tuning/jobs/ftjob-e2e"))
        .respond_with(success_response(job_body("ftjob-e2e", "succeeded")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/file-results/content"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_CSV))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let line = r#"{"messages":[{"role":"user","content":"q"},{"role":"assistant","content":"a"}]}"#;
    std::fs::write(dir.path().join("train.jsonl"), format!("{}\n", line)).unwrap();
    std::fs::write(dir.path().join("validation.jsonl"), format!("{}\n", line)).unwrap();

    let client = openai_client(&server);
    let submission = JobSubmission::new("gpt-4o-2024-08-06", dir.path().join("train.jsonl"))
        .with_validation_file(dir.path().join("validation.jsonl"));

    let job = submit(client.as_ref(), submission).await;
    assert_eq!(job.id, "ftjob-e2e");

    let finished = JobPoller::new(Duration::from_millis(10))
        .wait(client.fine_tuning(), &job.id)
        .await
        .unwrap();
    assert_eq!(finished.status, FineTuningJobStatus::Succeeded);

    let content = fetch_result_metrics(client.files(), &finished).await.unwrap();
    let rows = parse_metrics_csv(&content[..]).unwrap();
    let series = smooth_metrics(&rows, 2).unwrap();

    let validation_loss = series
        .iter()
        .find(|s| s.metric == Metric::ValidationLoss)
        .unwrap();
    assert_eq!(validation_loss.steps, vec![2, 4]);
    assert!((validation_loss.last_smoothed().unwrap() - 1.5).abs() < 1e-9);
}

async fn submit(
    client: &dyn FinetuneClient,
    submission: JobSubmission,
) -> integrations_finetune::FineTuningJob {
    integrations_finetune::pipeline::submit_job(client.files(), client.fine_tuning(), submission)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_poller_times_out_on_stuck_job() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/fine_tuning/jobs/ftjob-stuck"))
        .respond_with(success_response(job_body("ftjob-stuck", "queued")))
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let result = JobPoller::new(Duration::from_millis(20))
        .with_timeout(Duration::from_millis(50))
        .wait(client.fine_tuning(), "ftjob-stuck")
        .await;

    assert!(matches!(result, Err(FinetuneError::Timeout { timeout_ms: 50 })));
}

#[tokio::test]
async fn test_convert_then_evaluate_with_judge() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "ft:vqa", "temperature": 0.0 })))
        .respond_with(success_response(chat_body("Red")))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "judge-model" })))
        .respond_with(success_response(chat_body("Yes.")))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("rows.csv");
    std::fs::write(
        &source,
        "image,question,answer\n\
         car.png,What colour is the car?,Red\n\
         ,No image here,\n\
         ,Too short\n\
         bus.png,What colour is the bus?,Red\n",
    )
    .unwrap();

    let table = read_source_rows(&source).unwrap();
    assert!(table.skipped.is_empty());
    let rows = table.rows;
    let base = Url::parse("https://images.example.com/vqa/").unwrap();
    let converter = DatasetConverter::new("Answer briefly.").with_image_mode(ImageMode::Url(base));
    let report = converter.convert_rows(&rows).unwrap();
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.skipped.len(), 2);

    let test_file = dir.path().join("test.jsonl");
    write_jsonl_file(&test_file, &report.records).unwrap();
    let records = read_jsonl(&test_file).unwrap();
    let set = cases_from_records(&records);
    assert!(set.skipped.is_empty());
    let cases = set.cases;
    assert_eq!(
        cases[0].image_url.as_deref(),
        Some("https://images.example.com/vqa/car.png")
    );

    let client = openai_client(&server);
    let harness = EvaluationHarness::new(client.chat(), "ft:vqa", "judge-model")
        .with_system_prompt(converter.system_prompt());
    let evaluation = harness.evaluate(&cases).await.unwrap();

    assert_eq!(evaluation.tally.evaluated, 2);
    assert!(evaluation
        .results
        .iter()
        .all(|r| r.verdict == JudgeVerdict::Correct));
    assert_eq!(evaluation.accuracy(), Some(1.0));
}

#[tokio::test]
async fn test_evaluation_of_nothing_reports_no_accuracy() {
    let server = setup_mock_server().await;
    let client = openai_client(&server);

    let harness = EvaluationHarness::new(client.chat(), "ft:vqa", "judge-model");
    let evaluation = harness.evaluate(&[]).await.unwrap();

    assert_eq!(evaluation.accuracy(), None);
    assert_eq!(evaluation.tally.to_string(), "n/a (no rows evaluated)");
}
