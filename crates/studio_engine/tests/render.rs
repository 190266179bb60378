use pretty_assertions::assert_eq;
use serde_json::json;
use studio_engine::{ClientSettings, FailureKind, GithubRenderClient, RenderClient};
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GithubRenderClient {
    let endpoint = format!("{}/markdown", server.uri());
    GithubRenderClient::new(&endpoint, &ClientSettings::default()).unwrap()
}

#[tokio::test]
async fn renderer_sends_gfm_request_and_returns_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/markdown"))
        .and(header_exists("user-agent"))
        .and(body_json(json!({ "text": "# x", "mode": "gfm" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<h1>x</h1><script>alert(1)</script>", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let html = client_for(&server).render("# x").await.expect("render ok");
    // The client itself never post-processes; sanitizing happens in the engine.
    assert_eq!(html, "<h1>x</h1><script>alert(1)</script>");
}

#[tokio::test]
async fn renderer_reports_quota_exhaustion_as_status_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/markdown"))
        .respond_with(ResponseTemplate::new(403).set_body_string("rate limit exceeded"))
        .mount(&server)
        .await;

    let err = client_for(&server).render("# x").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::ServiceStatus(403));
    assert_eq!(err.message, "GitHub API error: 403");
}

#[tokio::test]
async fn renderer_is_idempotent_against_stable_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/markdown"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>same</p>", "text/html"))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.render("same").await.unwrap();
    let second = client.render("same").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn renderer_reports_transport_failure() {
    let client =
        GithubRenderClient::new("http://127.0.0.1:1/markdown", &ClientSettings::default())
            .unwrap();

    let err = client.render("# x").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Transport);
}

#[test]
fn renderer_rejects_invalid_endpoint() {
    assert!(GithubRenderClient::new("api.github.com/markdown", &ClientSettings::default()).is_err());
}
