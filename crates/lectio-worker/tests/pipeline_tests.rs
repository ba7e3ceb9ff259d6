//! End-to-end pipeline runs against a mock provider and an in-memory
//! store.

use std::io::Write;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lectio_gemini::{GeminiConfig, PollBudget};
use lectio_models::{FileArea, SummaryFormat, TaskDescriptor, TaskKind, Topic};
use lectio_worker::{LectureStore, MemoryStore, TaskExecutor, WorkerConfig, WorkerError};

fn test_config(server: &MockServer) -> WorkerConfig {
    let gemini = GeminiConfig::new("test-key").with_bases(
        format!("{}/v1beta", server.uri()),
        format!("{}/upload/v1beta", server.uri()),
    );
    let mut config = WorkerConfig::new(gemini);
    config.pre_poll_delay = Duration::ZERO;
    config.video_poll = PollBudget::new(5, Duration::from_millis(5));
    config.slides_poll = PollBudget::new(5, Duration::from_millis(5));
    config.work_dir = std::env::temp_dir().to_string_lossy().into_owned();
    config
}

fn staged_pdf(content: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

async fn mount_happy_provider(server: &MockServer, candidate_text: &str) {
    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-goog-upload-url", format!("{}/session", server.uri()).as_str()),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "file": {
                "name": "files/deck1",
                "uri": format!("{}/v1beta/files/deck1", server.uri())
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1beta/files/deck1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"state": "ACTIVE"})))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [ { "content": { "parts": [ { "text": candidate_text } ] } } ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn slides_pipeline_persists_html_summary() {
    let server = MockServer::start().await;
    mount_happy_provider(&server, "```html\n<h3>Lecture Overview</h3><p>Graphs.</p>\n```").await;

    let file = staged_pdf(b"%PDF-1.4 fake deck");
    let store = MemoryStore::new();
    store.add_file(7, FileArea::Slides, file.path());

    let executor = TaskExecutor::new(test_config(&server));
    let task = TaskDescriptor::new(7, TaskKind::SlidesSummary);

    executor.execute(&task, &store).await.unwrap();

    let summary = store.summary_for(7).unwrap();
    assert_eq!(summary.html, "<h3>Lecture Overview</h3><p>Graphs.</p>");
    assert_eq!(summary.format, SummaryFormat::Html);
    // Only the video pipeline advances the ready status.
    assert!(!store.is_ready(7));
}

#[tokio::test]
async fn slides_pipeline_rerun_overwrites_previous_summary() {
    let server = MockServer::start().await;
    mount_happy_provider(&server, "<p>take two</p>").await;

    let file = staged_pdf(b"%PDF-1.4 fake deck");
    let store = MemoryStore::new();
    store.add_file(7, FileArea::Slides, file.path());
    store
        .save_summary(7, &lectio_models::Summary::html("<p>take one</p>"))
        .await
        .unwrap();

    let executor = TaskExecutor::new(test_config(&server));
    let task = TaskDescriptor::new(7, TaskKind::SlidesSummary);
    executor.execute(&task, &store).await.unwrap();

    assert_eq!(store.summary_for(7).unwrap().html, "<p>take two</p>");
}

#[tokio::test]
async fn zero_byte_staged_file_aborts_before_any_network_call() {
    let server = MockServer::start().await;

    let file = staged_pdf(b"");
    let store = MemoryStore::new();
    store.add_file(9, FileArea::Slides, file.path());

    let executor = TaskExecutor::new(test_config(&server));
    let task = TaskDescriptor::new(9, TaskKind::SlidesSummary);

    let result = executor.execute(&task, &store).await;
    assert!(matches!(
        result,
        Err(WorkerError::Gemini(lectio_gemini::GeminiError::EmptyFile(_)))
    ));

    // Entity untouched, provider never contacted.
    assert!(store.summary_for(9).is_none());
    assert!(!store.is_ready(9));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_source_file_is_an_input_error() {
    let server = MockServer::start().await;
    let store = MemoryStore::new();

    let executor = TaskExecutor::new(test_config(&server));
    let task = TaskDescriptor::new(3, TaskKind::SlidesSummary);

    let result = executor.execute(&task, &store).await;
    match result {
        Err(err) => {
            assert!(err.is_input_error());
        }
        Ok(_) => panic!("expected missing-file failure"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn generation_failure_leaves_entity_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider down"))
        .mount(&server)
        .await;

    let file = staged_pdf(b"%PDF-1.4 fake deck");
    let store = MemoryStore::new();
    store.add_file(11, FileArea::Slides, file.path());

    let executor = TaskExecutor::new(test_config(&server));
    let task = TaskDescriptor::new(11, TaskKind::SlidesSummary);

    let result = executor.execute(&task, &store).await;
    assert!(matches!(
        result,
        Err(WorkerError::Gemini(lectio_gemini::GeminiError::HandshakeRejected { .. }))
    ));
    assert!(store.summary_for(11).is_none());
}

#[test]
fn model_response_text_normalizes_to_one_topic() {
    let text = "```json\n[{\"topic\":\"Intro\",\"timestamp_seconds\":0,\"keywords\":[\"a\",\"b\"]}]\n```";
    let raw = lectio_gemini::parse_topics(text).unwrap();
    let topics = lectio_worker::topics::build_topics(raw, 300);

    assert_eq!(
        topics,
        vec![Topic {
            title: "Intro".to_string(),
            start_seconds: 0,
            keywords: "a, b".to_string(),
        }]
    );
}

#[tokio::test]
async fn replacing_topics_twice_never_accumulates() {
    let store = MemoryStore::new();

    let first_run = vec![
        Topic {
            title: "Intro".to_string(),
            start_seconds: 0,
            keywords: "a, b".to_string(),
        },
        Topic {
            title: "Middle".to_string(),
            start_seconds: 120,
            keywords: String::new(),
        },
    ];
    let second_run = vec![Topic {
        title: "Intro (revised)".to_string(),
        start_seconds: 5,
        keywords: "a".to_string(),
    }];

    store.replace_topics(42, &first_run).await.unwrap();
    store.replace_topics(42, &second_run).await.unwrap();

    let stored = store.topics_for(42).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Intro (revised)");
}
