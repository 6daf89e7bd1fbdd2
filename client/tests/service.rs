//! Probe and submission behavior against a canned HTTP stub service.

use client::{
    ClientConfig, Connectivity, ConnectivityProbe, InferenceClient, ParsePolicy, RequestError,
    Session, SubmitError, build_soil_profile, build_weather_series, demo,
};
use shared::{Horizon, ImageAsset, NUM_CLASSES};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

struct StubService {
    base: String,
    hits: Arc<AtomicUsize>,
}

/// Serve the same canned response to every request, counting hits.
async fn spawn_stub(status: &'static str, content_type: &'static str, body: String) -> StubService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let hit_counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            hit_counter.fetch_add(1, Ordering::SeqCst);
            read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    StubService {
        base: format!("http://{addr}"),
        hits,
    }
}

/// Read one full request (headers plus Content-Length body) so the client
/// never sees a reset while still writing.
async fn read_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_string();
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() - (end + 4) >= content_length {
                return;
            }
        }
    }
}

fn test_config(base: &str) -> ClientConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    ClientConfig {
        base_endpoint: base.to_string(),
        probe_retry_delay: Duration::from_millis(20),
        ..ClientConfig::default()
    }
}

/// Probability vector with dyadic values so the f32 round trip through
/// JSON is exact; the peak sits at the given index.
fn predictions_peaked_at(peak: usize) -> Vec<f32> {
    (0..NUM_CLASSES)
        .map(|i| if i == peak { 0.5 } else { 0.0078125 })
        .collect()
}

fn predictions_body(predictions: &[f32]) -> String {
    serde_json::to_string(&serde_json::json!({
        "success": true,
        "predictions": predictions,
    }))
    .unwrap()
}

fn test_image() -> ImageAsset {
    ImageAsset::new("leaf.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}

async fn submit_against(stub: &StubService) -> Result<Vec<f32>, RequestError> {
    let config = test_config(&stub.base);
    let client = InferenceClient::new(reqwest::Client::new(), &config);
    let empty = HashMap::new();
    let soil = build_soil_profile(&empty, ParsePolicy::Permissive);
    let short = build_weather_series(Horizon::Short, &empty, ParsePolicy::Permissive);
    let full = build_weather_series(Horizon::Full, &empty, ParsePolicy::Permissive);
    client.submit(&test_image(), &soil, &short, &full).await
}

#[tokio::test]
async fn probe_succeeds_on_first_healthy_response() {
    let stub = spawn_stub(
        "200 OK",
        "application/json",
        r#"{"status":"ok","message":"API is running"}"#.to_string(),
    )
    .await;
    let config = test_config(&stub.base);
    let probe = ConnectivityProbe::new(reqwest::Client::new(), &config);

    let mut statuses = Vec::new();
    let outcome = probe.probe(|s| statuses.push(s.to_string())).await;

    assert_eq!(outcome, Connectivity::Connected);
    assert_eq!(stub.hits.load(Ordering::SeqCst), 1);
    assert_eq!(statuses.len(), 1);
    assert!(statuses[0].contains("attempt 1/3"));
}

#[tokio::test]
async fn probe_makes_exactly_three_attempts_before_giving_up() {
    let stub = spawn_stub(
        "500 Internal Server Error",
        "application/json",
        r#"{"error":"down"}"#.to_string(),
    )
    .await;
    let config = test_config(&stub.base);
    let probe = ConnectivityProbe::new(reqwest::Client::new(), &config);

    let mut statuses = Vec::new();
    let outcome = probe.probe(|s| statuses.push(s.to_string())).await;

    assert_eq!(outcome, Connectivity::Unreachable);
    assert_eq!(stub.hits.load(Ordering::SeqCst), 3);
    assert!(statuses[2].contains("attempt 3/3"));
}

#[tokio::test]
async fn probe_rejects_a_health_body_that_is_not_json() {
    let stub = spawn_stub("200 OK", "text/html", "<html>ok</html>".to_string()).await;
    let config = test_config(&stub.base);
    let probe = ConnectivityProbe::new(reqwest::Client::new(), &config);

    let outcome = probe.probe(|_| {}).await;

    assert_eq!(outcome, Connectivity::Unreachable);
    assert_eq!(stub.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn probe_reports_unreachable_when_nothing_listens() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = test_config(&format!("http://{addr}"));
    let probe = ConnectivityProbe::new(reqwest::Client::new(), &config);

    assert_eq!(probe.probe(|_| {}).await, Connectivity::Unreachable);
}

#[tokio::test]
async fn submit_returns_the_probability_vector_untouched() {
    let predictions = predictions_peaked_at(1);
    let stub = spawn_stub(
        "200 OK",
        "application/json",
        predictions_body(&predictions),
    )
    .await;

    let returned = submit_against(&stub).await.unwrap();

    assert_eq!(returned, predictions);
}

#[tokio::test]
async fn submit_surfaces_a_service_reported_error() {
    let stub = spawn_stub(
        "200 OK",
        "application/json",
        r#"{"error":"bad input"}"#.to_string(),
    )
    .await;

    let err = submit_against(&stub).await.unwrap_err();

    match err {
        RequestError::ServiceReported(message) => assert_eq!(message, "bad input"),
        other => panic!("expected ServiceReported, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_classifies_a_rejection_status() {
    let stub = spawn_stub(
        "422 Unprocessable Entity",
        "application/json",
        r#"{"error":"Soil data must have 6 features"}"#.to_string(),
    )
    .await;

    let err = submit_against(&stub).await.unwrap_err();

    match err {
        RequestError::ServerRejected { status, body } => {
            assert_eq!(status, 422);
            assert!(body.contains("6 features"));
        }
        other => panic!("expected ServerRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn service_error_wins_over_a_broken_predictions_field() {
    let stub = spawn_stub(
        "200 OK",
        "application/json",
        r#"{"error":"bad input","predictions":42}"#.to_string(),
    )
    .await;

    let err = submit_against(&stub).await.unwrap_err();

    match err {
        RequestError::ServiceReported(message) => assert_eq!(message, "bad input"),
        other => panic!("expected ServiceReported, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_flags_an_unparseable_body() {
    let stub = spawn_stub("200 OK", "text/plain", "not json at all".to_string()).await;

    let err = submit_against(&stub).await.unwrap_err();

    assert!(matches!(err, RequestError::MalformedResponse));
}

#[tokio::test]
async fn submit_flags_a_body_without_predictions() {
    let stub = spawn_stub("200 OK", "application/json", r#"{"success":true}"#.to_string()).await;

    let err = submit_against(&stub).await.unwrap_err();

    assert!(matches!(err, RequestError::MalformedResponse));
}

#[tokio::test]
async fn session_runs_the_full_pipeline() {
    let predictions = predictions_peaked_at(1);
    let stub = spawn_stub(
        "200 OK",
        "application/json",
        predictions_body(&predictions),
    )
    .await;

    let mut session = Session::new(test_config(&stub.base));
    let outcome = session.connect(|_| {}).await;
    assert_eq!(outcome, Connectivity::Connected);

    session.select_image(test_image());
    let classification = session.classify(&demo::sample_fields()).await.unwrap();

    assert_eq!(classification.probabilities, predictions);
    assert!(classification.ranked.len() <= 10);
    // index 1 of the default table is Apple Black rot
    let top = classification.top().unwrap();
    assert_eq!(top.label, "Apple___Black_rot");
    assert_eq!(top.rank, 1);
    assert_eq!(top.percentage, "50.0%");
    assert_eq!(top.display_name(), "Apple   Black rot");
}

#[tokio::test]
async fn session_refuses_to_submit_without_an_image() {
    let stub = spawn_stub(
        "200 OK",
        "application/json",
        r#"{"status":"ok"}"#.to_string(),
    )
    .await;

    let mut session = Session::new(test_config(&stub.base));
    session.connect(|_| {}).await;

    let err = session.classify(&HashMap::new()).await.unwrap_err();
    assert!(matches!(err, SubmitError::NoImage));
}

#[tokio::test]
async fn session_unlocks_in_degraded_mode_after_a_failed_probe() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = Session::new(test_config(&format!("http://{addr}")));
    assert_eq!(session.connect(|_| {}).await, Connectivity::Unreachable);

    session.select_image(test_image());
    let err = session.classify(&HashMap::new()).await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Request(RequestError::Unreachable { .. })
    ));
}
