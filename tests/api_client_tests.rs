use std::time::Duration;

use dashwiz::api::{NaturalSqlClient, SqlGenerator};
use dashwiz::config::Config;
use dashwiz::errors::WorkbenchError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

fn client_for(base_url: &str, timeout_ms: u64) -> NaturalSqlClient {
    let config = Config {
        api_base_url: base_url.to_string(),
        api_timeout: Duration::from_millis(timeout_ms),
        ..Config::default()
    };
    NaturalSqlClient::new(&config).unwrap()
}

fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
}

/// Reads one full HTTP request (headers plus Content-Length body).
async fn read_request(socket: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&raw);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if raw.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&raw).into_owned()
}

/// Serves a single canned response and hands back the request it received.
async fn serve_once(response: String) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(request);
    });

    (format!("http://{}", addr), rx)
}

#[tokio::test]
async fn test_generate_sql_posts_schema_and_question() {
    let body = r#"{"sql_query":"SELECT COUNT(*) FROM users;","rowCount":1,"columns":["count"]}"#;
    let (base_url, request) = serve_once(http_response("200 OK", body)).await;
    let client = client_for(&base_url, 2_000);

    let response = client
        .generate_sql("CREATE TABLE users (\n  id INTEGER PRIMARY KEY\n);", "how many users?")
        .await
        .unwrap();

    assert_eq!(response.sql_query, "SELECT COUNT(*) FROM users;");
    assert_eq!(response.row_count, Some(1));
    assert_eq!(response.columns, Some(vec!["count".to_string()]));

    let request = request.await.unwrap();
    assert!(request.starts_with("POST /generate-sql HTTP/1.1"));
    assert!(request.contains("\"db_schema\""));
    assert!(request.contains("\"question\":\"how many users?\""));
}

#[tokio::test]
async fn test_missing_parameters_fail_without_a_request() {
    let client = client_for("http://127.0.0.1:9", 500);

    let err = client.generate_sql("", "anything").await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let err = client.generate_sql("CREATE TABLE t (\n  id INT\n);", "").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_http_error_carries_status_and_body() {
    let (base_url, _request) =
        serve_once(http_response("500 Internal Server Error", r#"{"detail":"model offline"}"#)).await;
    let client = client_for(&base_url, 2_000);

    let err = client.generate_sql("CREATE TABLE t (\n  id INT\n);", "q").await.unwrap_err();

    match err {
        WorkbenchError::Api {
            status,
            message,
            data,
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to generate SQL");
            assert_eq!(data["detail"], "model offline");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_error_in_success_body_is_reported() {
    let (base_url, _request) =
        serve_once(http_response("200 OK", r#"{"sql_query":"","error":"Model not loaded"}"#)).await;
    let client = client_for(&base_url, 2_000);

    let err = client.generate_sql("CREATE TABLE t (\n  id INT\n);", "q").await.unwrap_err();

    assert!(matches!(
        err,
        WorkbenchError::Api { status: 200, ref message, .. } if message == "Model not loaded"
    ));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let client = client_for(&format!("http://{}", addr), 200);
    let err = client.health().await.unwrap_err();

    assert_eq!(err.status(), Some(408));
    assert!(err.to_string().contains("Request timeout"));
}

#[tokio::test]
async fn test_health_and_reachability() {
    let (base_url, request) = serve_once(http_response("200 OK", r#"{"status":"healthy"}"#)).await;
    let client = client_for(&base_url, 2_000);

    let health = client.health().await.unwrap();
    assert_eq!(health["status"], "healthy");
    assert!(request.await.unwrap().starts_with("GET /health HTTP/1.1"));

    // Nothing listens on a port we just released.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let offline = client_for(&format!("http://{}", addr), 1_000);
    assert!(!offline.is_backend_reachable().await);
    assert!(matches!(offline.service_info().await, Err(WorkbenchError::Http(_))));
}
