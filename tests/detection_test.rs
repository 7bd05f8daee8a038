//! Detection protocol tests against a local fake service.

use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tiny_http::{Header, Response, Server, StatusCode};

use veritext::progress::{ProgressEvent, ProgressStep};
use veritext::{ChunkedDetector, DetectionClient, DetectorConfig, Error};

/// Spawn a fake detection service. The handler receives `(path, body)` for
/// each request and returns the response to send. Returns the base URL.
fn spawn_service<F>(mut handler: F) -> String
where
    F: FnMut(&str, &str) -> Response<std::io::Cursor<Vec<u8>>> + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").expect("bind fake service");
    let port = server.server_addr().to_ip().expect("ip addr").port();

    std::thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let path = request.url().to_string();
            let response = handler(&path, &body);
            let _ = request.respond(response);
        }
    });

    format!("http://127.0.0.1:{port}")
}

fn json_response(body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body).with_header(
        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
    )
}

fn test_client(base_url: &str) -> DetectionClient {
    let config = DetectorConfig::new(base_url)
        .with_poll_interval(Duration::from_millis(2))
        .with_request_timeout(Duration::from_secs(5));
    DetectionClient::with_config(config).unwrap()
}

const SAMPLE: &str = "This is a sufficiently long sample text. It has two sentences.";

#[tokio::test]
async fn test_detect_legacy_result_shape() {
    let base = spawn_service(|path, _body| {
        if path.ends_with("/getId") {
            json_response(r#"{"id": "task-1"}"#)
        } else {
            json_response(r#"{"status": "done", "result": 42}"#)
        }
    });

    let client = test_client(&base);
    let mut events: Vec<ProgressEvent> = Vec::new();
    let result = {
        let mut observer = veritext::ProgressFn(|event: ProgressEvent| events.push(event));
        client.detect(SAMPLE, &mut observer).await.unwrap()
    };

    assert_eq!(result.ai_probability, 42);
    assert_eq!(result.human_probability, 58);
    assert!(result.tool_scores.is_none());
    assert_eq!(result.stats.sentence_count, 2);

    let steps: Vec<ProgressStep> = events.iter().map(|e| e.step).collect();
    assert_eq!(
        steps,
        vec![
            ProgressStep::Submitting,
            ProgressStep::Processing,
            ProgressStep::Completed
        ]
    );
}

#[tokio::test]
async fn test_detect_detailed_scores_shape() {
    let base = spawn_service(|path, _body| {
        if path.ends_with("/getId") {
            json_response(r#"{"id": "task-2"}"#)
        } else {
            json_response(
                r#"{"success": true, "detection_scores": {"gptzero": 80, "sapling": 61}, "overall_score": 75}"#,
            )
        }
    });

    let client = test_client(&base);
    let result = client
        .detect(SAMPLE, &mut veritext::NoProgress)
        .await
        .unwrap();

    // Mean of 80 and 61 rounds to 71; overall_score is ignored when tool
    // scores are numeric
    assert_eq!(result.ai_probability, 71);
    assert_eq!(result.human_probability, 29);
    let tools = result.tool_scores.unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools["gptzero"], 80.0);
}

#[tokio::test]
async fn test_poll_succeeds_on_final_attempt() {
    let polls = Arc::new(AtomicUsize::new(0));
    let polls_handler = Arc::clone(&polls);

    let base = spawn_service(move |path, _body| {
        if path.ends_with("/getId") {
            json_response(r#"{"id": "slow-task"}"#)
        } else {
            let n = polls_handler.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 20 {
                json_response(r#"{"status": "running"}"#)
            } else {
                json_response(r#"{"status": "done", "result": 63}"#)
            }
        }
    });

    let client = test_client(&base);
    let result = client
        .detect(SAMPLE, &mut veritext::NoProgress)
        .await
        .unwrap();

    assert_eq!(result.ai_probability, 63);
    assert_eq!(polls.load(Ordering::SeqCst), 20);
}

#[tokio::test]
async fn test_poll_times_out_after_max_attempts() {
    let polls = Arc::new(AtomicUsize::new(0));
    let polls_handler = Arc::clone(&polls);

    let base = spawn_service(move |path, _body| {
        if path.ends_with("/getId") {
            json_response(r#"{"id": "stuck-task"}"#)
        } else {
            polls_handler.fetch_add(1, Ordering::SeqCst);
            json_response(r#"{"status": "running"}"#)
        }
    });

    let client = test_client(&base);
    let result = client.detect(SAMPLE, &mut veritext::NoProgress).await;

    assert!(matches!(result, Err(Error::PollTimeout)));
    assert_eq!(polls.load(Ordering::SeqCst), 20);
}

#[tokio::test]
async fn test_task_not_found_is_terminal_immediately() {
    let polls = Arc::new(AtomicUsize::new(0));
    let polls_handler = Arc::clone(&polls);

    let base = spawn_service(move |path, _body| {
        if path.ends_with("/getId") {
            json_response(r#"{"id": "ghost-task"}"#)
        } else {
            polls_handler.fetch_add(1, Ordering::SeqCst);
            json_response(r#"{"error": "unknown id"}"#).with_status_code(StatusCode(404))
        }
    });

    let client = test_client(&base);
    let result = client.detect(SAMPLE, &mut veritext::NoProgress).await;

    assert!(matches!(result, Err(Error::TaskNotFound)));
    // No retries burned on a dead task
    assert_eq!(polls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_remote_error_shape_is_terminal() {
    let base = spawn_service(|path, _body| {
        if path.ends_with("/getId") {
            json_response(r#"{"id": "doomed-task"}"#)
        } else {
            json_response(r#"{"status": "error", "message": "model crashed"}"#)
        }
    });

    let client = test_client(&base);
    let result = client.detect(SAMPLE, &mut veritext::NoProgress).await;

    match result {
        Err(Error::RemoteAnalysis(message)) => assert_eq!(message, "model crashed"),
        other => panic!("expected RemoteAnalysis, got {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_maps_http_statuses() {
    let base = spawn_service(|_path, body| {
        if body.contains("ratelimit") {
            json_response("{}").with_status_code(StatusCode(429))
        } else if body.contains("forbidden") {
            json_response("{}").with_status_code(StatusCode(403))
        } else {
            json_response("{}").with_status_code(StatusCode(500))
        }
    });

    let client = test_client(&base);
    assert!(matches!(
        client.submit("please ratelimit this").await,
        Err(Error::RateLimited)
    ));
    assert!(matches!(
        client.submit("please forbidden this").await,
        Err(Error::Forbidden)
    ));
    assert!(matches!(
        client.submit("anything else").await,
        Err(Error::SubmitRejected(_))
    ));
}

#[tokio::test]
async fn test_submit_rejects_missing_task_id() {
    let base = spawn_service(|_path, _body| json_response(r#"{"ok": true}"#));

    let client = test_client(&base);
    let result = client.submit("some text to score").await;
    assert!(matches!(result, Err(Error::SubmitRejected(_))));
}

#[tokio::test]
async fn test_detect_validates_before_submitting() {
    let base = spawn_service(|_path, _body| json_response(r#"{"id": "should-not-happen"}"#));

    let client = test_client(&base);
    let result = client.detect("short", &mut veritext::NoProgress).await;
    assert!(matches!(result, Err(Error::TextTooShort(_))));
}

#[tokio::test]
async fn test_chunked_detection_records_partial_failures() {
    let base = spawn_service(|path, body| {
        if path.ends_with("/getId") {
            if body.contains("boomboom") {
                json_response(r#"{"id": "bad-chunk"}"#)
            } else {
                json_response(r#"{"id": "good-chunk"}"#)
            }
        } else if body.contains("bad-chunk") {
            json_response(r#"{"status": "error", "message": "chunk failed"}"#)
        } else {
            json_response(r#"{"status": "done", "result": 25}"#)
        }
    });

    let client = test_client(&base);
    let text = "alphaalpha betabeta boomboom gammagamma deltadelta omegaomega";

    let mut events: Vec<ProgressEvent> = Vec::new();
    let outcomes = {
        let mut observer = veritext::ProgressFn(|event: ProgressEvent| events.push(event));
        ChunkedDetector::new(&client)
            .with_max_words(2)
            .detect(text, &mut observer)
            .await
    };

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].index, 0);
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(Error::RemoteAnalysis(_))
    ));
    assert!(outcomes[2].result.is_ok());
    assert_eq!(outcomes[2].result.as_ref().unwrap().ai_probability, 25);

    // One "part" event per chunk, in order
    let parts: Vec<&ProgressEvent> = events
        .iter()
        .filter(|e| e.step == ProgressStep::Part)
        .collect();
    assert_eq!(parts.len(), 3);
    assert!(parts[0].message.contains("1 of 3"));
    assert!(parts[2].message.contains("3 of 3"));
}
