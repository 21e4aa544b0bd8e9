//! End-to-end submissions through the reqwest transport against a local
//! one-shot HTTP server.

use std::sync::Arc;

use formgate_core::{
    BannerKind, CredentialStore, Form, FormRole, FormSubmitter, MemoryStore, ReqwestTransport,
    SubmitEvent, SubmitOutcome,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

/// Accept one connection, answer it, and hand back the raw request text.
async fn serve_once(status_line: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });
    (Url::parse(&format!("http://{}/", addr)).unwrap(), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn submitter(base: Url, store: Arc<MemoryStore>) -> FormSubmitter {
    // Ignore any proxy configured in the environment; the server is local
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let transport = ReqwestTransport::from_client(client);
    FormSubmitter::new(Arc::new(transport), store).with_base_url(base)
}

#[tokio::test]
async fn test_login_request_has_no_authorization_and_stores_token() {
    let (base, server) = serve_once("200 OK", "tok-abc123").await;
    let store = Arc::new(MemoryStore::new());
    let submitter = submitter(base, store.clone());

    let form = Form::new("post", "/login")
        .with_id("form-login")
        .with_field("username", "admin")
        .with_field("password", "s3cret!");
    let mut event = SubmitEvent::new(form, FormRole::Login);
    let outcome = submitter.handle(&mut event).await;

    let request = server.await.unwrap();
    let lowered = request.to_lowercase();
    assert!(request.starts_with("POST /login HTTP/1.1\r\n"));
    assert!(!lowered.contains("\r\nauthorization:"));
    assert!(lowered.contains("content-type: application/x-www-form-urlencoded"));
    assert!(request.ends_with("username=admin&password=s3cret%21"));

    assert_eq!(store.load().unwrap().as_deref(), Some("tok-abc123"));
    assert_eq!(outcome.banner().unwrap().kind, BannerKind::Success);
}

#[tokio::test]
async fn test_generic_request_sends_token_verbatim() {
    let (base, server) = serve_once("200 OK", "ignored").await;
    let submitter = submitter(base, Arc::new(MemoryStore::with_token("tok-abc123")));

    let form = Form::new("post", "/groups/add").with_field("groupname", "ops");
    let mut event = SubmitEvent::new(form, FormRole::Generic);
    let outcome = submitter.handle(&mut event).await;

    let request = server.await.unwrap().to_lowercase();
    assert!(request.contains("\r\nauthorization: tok-abc123\r\n"));
    assert!(request.ends_with("groupname=ops"));
    assert_eq!(
        outcome.banner().unwrap().text,
        "Success doing what you tried to do"
    );
}

#[tokio::test]
async fn test_view_users_get_uses_query_string() {
    let (base, server) = serve_once("200 OK", "<li>alice</li>").await;
    let submitter = submitter(base, Arc::new(MemoryStore::with_token("tok")));

    let form = Form::new("GET", "/users").with_field("filter", "a");
    let mut event = SubmitEvent::new(form, FormRole::ViewUsers);
    let outcome = submitter.handle(&mut event).await;

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /users?filter=a HTTP/1.1\r\n"));
    assert!(matches!(outcome, SubmitOutcome::Rendered(ref m) if m.as_str() == "<h1><li>alice</li></h1>"));
}

#[tokio::test]
async fn test_server_error_body_is_shown() {
    let (base, server) = serve_once("403 Forbidden", "Invalid Credentials").await;
    let store = Arc::new(MemoryStore::with_token("tok-old"));
    let submitter = submitter(base, store.clone());

    let form = Form::new("post", "/login").with_field("username", "admin");
    let mut event = SubmitEvent::new(form, FormRole::Login);
    let outcome = submitter.handle(&mut event).await;
    server.await.unwrap();

    assert!(outcome.is_failure());
    let banner = submitter.notifier().current().unwrap();
    assert_eq!(banner.kind, BannerKind::Error);
    assert_eq!(banner.text, "Invalid Credentials");
    assert_eq!(store.load().unwrap().as_deref(), Some("tok-old"));
}

#[tokio::test]
async fn test_connection_failure_shows_empty_error() {
    // Bind and release a port so nothing is listening on it
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{}/", addr)).unwrap();
    let submitter = submitter(base, Arc::new(MemoryStore::new()));

    let mut event = SubmitEvent::new(Form::new("post", "/groups/add"), FormRole::Generic);
    let outcome = submitter.handle(&mut event).await;

    assert!(event.default_prevented());
    assert!(outcome.is_failure());
    assert_eq!(outcome.banner().unwrap().text, "");
    assert_eq!(outcome.banner().unwrap().kind, BannerKind::Error);
}

#[tokio::test]
async fn test_token_with_trailing_newline_still_authorizes() {
    let (login_base, login_server) = serve_once("200 OK", "tok-abc123\n").await;
    let (api_base, api_server) = serve_once("200 OK", "ok").await;
    let store = Arc::new(MemoryStore::new());
    let submitter = submitter(login_base, store.clone());

    let login = Form::new("post", "/login").with_field("username", "admin");
    let mut event = SubmitEvent::new(login, FormRole::Login);
    submitter.handle(&mut event).await;
    login_server.await.unwrap();

    // Stored exactly as received
    assert_eq!(store.load().unwrap().as_deref(), Some("tok-abc123\n"));

    let action = api_base.join("/groups/add").unwrap();
    let form = Form::new("post", action.as_str()).with_field("groupname", "ops");
    let mut event = SubmitEvent::new(form, FormRole::Generic);
    let outcome = submitter.handle(&mut event).await;

    let request = api_server.await.unwrap().to_lowercase();
    assert!(request.contains("\r\nauthorization: tok-abc123\r\n"));
    assert_eq!(outcome.banner().unwrap().kind, BannerKind::Success);
}
