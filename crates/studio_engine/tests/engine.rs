use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use studio_engine::{
    AllowlistSanitizer, ClientError, Clipboard, ClipboardError, EngineHandle, EngineEvent,
    EngineServices, FailureKind, GenerationClient, ReadmeRequest, RenderClient,
};
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(5);

/// Answers `# <name>`; a project named "slow" takes a while, "broken" fails.
struct FakeGenerator;

#[async_trait]
impl GenerationClient for FakeGenerator {
    async fn generate(&self, request: &ReadmeRequest) -> Result<String, ClientError> {
        match request.project_name.as_str() {
            "slow" => {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Ok("# slow".to_string())
            }
            "broken" => Err(ClientError {
                kind: FailureKind::ServiceStatus(500),
                message: "generation service error: 500".to_string(),
            }),
            name => Ok(format!("# {name}")),
        }
    }
}

struct FakeRenderer;

#[async_trait]
impl RenderClient for FakeRenderer {
    async fn render(&self, markdown: &str) -> Result<String, ClientError> {
        let title = markdown.trim_start_matches("# ");
        Ok(format!("<h1>{title}</h1><script>alert(1)</script>"))
    }
}

#[derive(Default)]
struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
    fail: bool,
}

impl Clipboard for RecordingClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Unavailable("no display".to_string()));
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn engine_with(clipboard: Arc<RecordingClipboard>) -> EngineHandle {
    EngineHandle::with_services(EngineServices {
        generator: Arc::new(FakeGenerator),
        renderer: Arc::new(FakeRenderer),
        sanitizer: Arc::new(AllowlistSanitizer),
        clipboard,
    })
    .unwrap()
}

fn request(name: &str) -> ReadmeRequest {
    ReadmeRequest {
        project_name: name.to_string(),
        description: "d".to_string(),
        ..ReadmeRequest::default()
    }
}

#[test]
fn generation_result_is_reported_with_its_request_id() {
    let engine = engine_with(Arc::default());
    engine.generate(7, request("x"));

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::GenerationCompleted { request_id, result }) => {
            assert_eq!(request_id, 7);
            assert_eq!(result.unwrap(), "# x");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn generation_failure_keeps_its_classification() {
    let engine = engine_with(Arc::default());
    engine.generate(1, request("broken"));

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::GenerationCompleted { result, .. }) => {
            let err = result.unwrap_err();
            assert_eq!(err.kind, FailureKind::ServiceStatus(500));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn results_arrive_in_completion_order_and_nothing_is_cancelled() {
    let engine = engine_with(Arc::default());
    engine.generate(1, request("slow"));
    engine.generate(2, request("fast"));

    let mut order = Vec::new();
    for _ in 0..2 {
        match engine.recv_timeout(WAIT) {
            Some(EngineEvent::GenerationCompleted { request_id, .. }) => order.push(request_id),
            other => panic!("unexpected event: {other:?}"),
        }
    }
    assert_eq!(order, vec![2, 1]);
}

#[test]
fn rendered_html_is_sanitized_before_it_is_reported() {
    let engine = engine_with(Arc::default());
    engine.render(3, "# x");

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::RenderCompleted { request_id, result }) => {
            assert_eq!(request_id, 3);
            assert_eq!(result.unwrap(), "<h1>x</h1>");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn copy_writes_exact_text_to_clipboard() {
    let clipboard = Arc::new(RecordingClipboard::default());
    let engine = engine_with(clipboard.clone());
    engine.copy("# x\n\nbody");

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::CopyCompleted(result)) => assert!(result.is_ok()),
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(*clipboard.writes.lock().unwrap(), vec!["# x\n\nbody".to_string()]);
}

#[test]
fn copy_failure_is_reported() {
    let clipboard = Arc::new(RecordingClipboard {
        fail: true,
        ..RecordingClipboard::default()
    });
    let engine = engine_with(clipboard);
    engine.copy("text");

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::CopyCompleted(result)) => assert_eq!(
            result,
            Err(ClipboardError::Unavailable("no display".to_string()))
        ),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn save_writes_document_to_disk() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("docs").join("README.md");
    let engine = engine_with(Arc::default());
    engine.save(&target, "# saved");

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::SaveCompleted { path, result }) => {
            assert_eq!(path, target);
            assert_eq!(result.unwrap(), target);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "# saved");
}

#[test]
fn try_recv_is_empty_when_nothing_was_requested() {
    let engine = engine_with(Arc::default());
    assert!(engine.try_recv().is_none());
}
