//
// (C) Copyright IBM 2026
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

mod common;
use assert_json_diff::assert_json_include;
use mockito::Matcher;
use serde_json::json;
use skillsync_api::models::GenerateRequest;
use skillsync_api::{ApiError, JobStatus};

#[tokio::test]
async fn test_generate_recommendations() {
    common::setup();

    let mut server = mockito::Server::new_async().await;
    let generate_mock = server
        .mock("POST", "/api/opensource/generate")
        .match_header("x-xsrf-token", "test-token")
        .match_body(Matcher::Json(json!({
            "forceRefresh": false,
            "maxRecommendations": 10,
            "analyzeStructures": true
        })))
        .with_status(202)
        .with_header("content-type", "application/json")
        .with_body(json!({ "jobId": "job-7" }).to_string())
        .create_async()
        .await;

    let client = common::client(&server);
    let resp = client
        .generate_recommendations(&GenerateRequest::default())
        .await
        .unwrap();
    assert_eq!(resp.job_id.as_deref(), Some("job-7"));
    generate_mock.assert_async().await;
}

#[tokio::test]
async fn test_job_status_reports_failure_message() {
    common::setup();

    let mut server = mockito::Server::new_async().await;
    let _status_mock = server
        .mock("GET", "/api/opensource/status/job-7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "status": "FAILED", "errorMessage": "quota exceeded" }).to_string())
        .create_async()
        .await;

    let client = common::client(&server);
    let status = client.job_status("job-7").await.unwrap();
    assert_eq!(status.status, JobStatus::Failed);
    assert_eq!(status.error_message.as_deref(), Some("quota exceeded"));
}

#[tokio::test]
async fn test_job_results_keep_untyped_fields() {
    common::setup();

    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "recommendations": [{
            "projectName": "tokio",
            "owner": "tokio-rs",
            "stars": 25000,
            "topics": ["async", "runtime"],
            "contributionAreas": ["docs"]
        }]
    });
    let _result_mock = server
        .mock("GET", "/api/opensource/result/job-7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = common::client(&server);
    let results = client.job_results("job-7").await.unwrap();
    assert_eq!(results.recommendations.len(), 1);
    let project = &results.recommendations[0];
    assert_eq!(project.project_name.as_deref(), Some("tokio"));
    assert_eq!(project.stars, Some(25000));
    assert_json_include!(
        actual: serde_json::to_value(&results).unwrap(),
        expected: body
    );
}

#[tokio::test]
async fn test_error_message_falls_back_to_error_field() {
    common::setup();

    let mut server = mockito::Server::new_async().await;
    let _saved_mock = server
        .mock("GET", "/api/opensource/saved")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(json!({ "error": "database offline" }).to_string())
        .create_async()
        .await;

    let client = common::client(&server);
    let err = client.saved_recommendations().await.unwrap_err();
    assert_eq!(err.to_string(), "database offline");
    let api_err = err.downcast_ref::<ApiError>().unwrap();
    assert_eq!(api_err.status().map(|s| s.as_u16()), Some(500));
}

#[tokio::test]
async fn test_non_json_error_body() {
    common::setup();

    let mut server = mockito::Server::new_async().await;
    let _status_mock = server
        .mock("GET", "/api/opensource/status/job-7")
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html>bad gateway</html>")
        .create_async()
        .await;

    let client = common::client(&server);
    let err = client.job_status("job-7").await.unwrap_err();
    assert_eq!(err.to_string(), "Server error: 502 Bad Gateway");
}

#[tokio::test]
async fn test_empty_error_body_uses_status_code() {
    common::setup();

    let mut server = mockito::Server::new_async().await;
    let _status_mock = server
        .mock("GET", "/api/opensource/status/job-7")
        .with_status(503)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let client = common::client(&server);
    let err = client.job_status("job-7").await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed: 503");
}

#[tokio::test]
async fn test_delete_recommendations_no_content() {
    common::setup();

    let mut server = mockito::Server::new_async().await;
    let delete_mock = server
        .mock("DELETE", "/api/opensource/recommendations")
        .match_header("x-xsrf-token", "test-token")
        .with_status(204)
        .create_async()
        .await;

    let client = common::client(&server);
    client.delete_recommendations().await.unwrap();
    delete_mock.assert_async().await;
}
