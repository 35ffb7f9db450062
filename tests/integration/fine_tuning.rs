//! Fine-tuning job lifecycle calls

use super::*;
use integrations_finetune::services::fine_tuning::{
    FineTuningJobRequest, FineTuningJobStatus, HyperparameterValue, Hyperparameters,
};
use wiremock::matchers::{body_json, method, path, query_param};

#[tokio::test]
async fn test_create_job_posts_request_body() {
    let server = setup_mock_server().await;

    mock_with_auth("POST", "/fine_tuning/jobs")
        .and(body_json(json!({
            "model": "gpt-4o-2024-08-06",
            "training_file": "file-train",
            "validation_file": "file-valid",
            "hyperparameters": { "n_epochs": 3.0 },
            "suffix": "vqa"
        })))
        .respond_with(success_response(job_body("ftjob-abc", "validating_files")))
        .expect(1)
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let request = FineTuningJobRequest::new("gpt-4o-2024-08-06", "file-train")
        .with_validation_file("file-valid")
        .with_hyperparameters(Hyperparameters {
            n_epochs: Some(HyperparameterValue::Number(3.0)),
            ..Default::default()
        })
        .with_suffix("vqa");

    let job = client.fine_tuning().create(request).await.unwrap();

    assert_eq!(job.id, "ftjob-abc");
    assert_eq!(job.status, FineTuningJobStatus::ValidatingFiles);
    assert!(!job.is_terminal());
}

#[tokio::test]
async fn test_retrieve_succeeded_job() {
    let server = setup_mock_server().await;

    mock_with_auth("GET", "/fine_tuning/jobs/ftjob-abc")
        .respond_with(success_response(job_body("ftjob-abc", "succeeded")))
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let job = client.fine_tuning().retrieve("ftjob-abc").await.unwrap();

    assert_eq!(job.status, FineTuningJobStatus::Succeeded);
    assert_eq!(
        job.fine_tuned_model.as_deref(),
        Some("ft:gpt-4o-2024-08-06:org-test:vqa:abc123")
    );
    assert_eq!(job.result_files, vec!["file-results".to_string()]);
}

#[tokio::test]
async fn test_list_jobs_passes_pagination() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/fine_tuning/jobs"))
        .and(query_param("limit", "2"))
        .and(query_param("after", "ftjob-prev"))
        .respond_with(success_response(json!({
            "object": "list",
            "data": [job_body("ftjob-1", "running"), job_body("ftjob-2", "queued")],
            "has_more": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let jobs = client
        .fine_tuning()
        .list(Some(2), Some("ftjob-prev".to_string()))
        .await
        .unwrap();

    assert_eq!(jobs.data.len(), 2);
    assert!(jobs.has_more);
    assert_eq!(jobs.data[1].status, FineTuningJobStatus::Queued);
}

#[tokio::test]
async fn test_cancel_and_events() {
    let server = setup_mock_server().await;

    mock_with_auth("POST", "/fine_tuning/jobs/ftjob-abc/cancel")
        .respond_with(success_response(job_body("ftjob-abc", "cancelled")))
        .expect(1)
        .mount(&server)
        .await;
    mock_with_auth("GET", "/fine_tuning/jobs/ftjob-abc/events")
        .and(query_param("limit", "1"))
        .respond_with(success_response(json!({
            "object": "list",
            "data": [{
                "id": "ftevent-1",
                "object": "fine_tuning.job.event",
                "created_at": 1700000100,
                "level": "info",
                "message": "Job cancelled",
                "type": "message"
            }],
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let job = client.fine_tuning().cancel("ftjob-abc").await.unwrap();
    let events = client
        .fine_tuning()
        .events("ftjob-abc", Some(1), None)
        .await
        .unwrap();

    assert_eq!(job.status, FineTuningJobStatus::Cancelled);
    assert!(job.is_terminal());
    assert_eq!(events.data[0].message, "Job cancelled");
    assert_eq!(events.data[0].event_type.as_deref(), Some("message"));
}
