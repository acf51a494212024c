use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wp_client::{Config, WpClient, WpClientError};

const TOKEN_BODY: &str = r#"{"token":"stub.jwt.token"}"#;
const FORBIDDEN_BODY: &str =
    r#"{"code":"rest_forbidden","message":"Извините, вам это не разрешено.","data":{"status":403}}"#;

// Мини-сервер: одно соединение на запрос, ответы выдаются в заданном
// порядке, принятые запросы считаются.
async fn spawn_stub(responses: Vec<(&'static str, &'static str)>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("stub must bind");
    let addr = listener.local_addr().expect("stub must expose its addr");
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&hits);
    tokio::spawn(async move {
        for (status_line, body) in responses {
            let (mut stream, _) = match listener.accept().await {
                Ok(connection) => connection,
                Err(_) => return,
            };
            counter.fetch_add(1, Ordering::SeqCst);
            read_request(&mut stream).await;
            write_response(&mut stream, status_line, body).await;
        }
    });

    (format!("http://{addr}"), hits)
}

async fn read_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = stream
            .read(&mut chunk)
            .await
            .expect("stub must read request");
        if read == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..read]);

        if let Some(headers_end) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..headers_end]);
            if buf.len() >= headers_end + 4 + content_length(&headers) {
                return;
            }
        }
    }
}

fn content_length(headers: &str) -> usize {
    headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}

async fn write_response(stream: &mut TcpStream, status_line: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream
        .write_all(response.as_bytes())
        .await
        .expect("stub must write response");
    stream.shutdown().await.ok();
}

async fn connect_stub(base_url: String) -> WpClient {
    let config = Config {
        site_url: base_url,
        username: "admin".to_string(),
        password: "secret".to_string(),
        gemini_api_key: "key".to_string(),
    };
    WpClient::connect(&config)
        .await
        .expect("connect must succeed")
}

#[tokio::test]
async fn non_2xx_with_error_body_surfaces_as_remote() {
    let (base_url, hits) = spawn_stub(vec![
        ("200 OK", TOKEN_BODY),
        ("403 Forbidden", FORBIDDEN_BODY),
    ])
    .await;

    let client = connect_stub(base_url).await;
    assert_eq!(client.token(), "stub.jwt.token");

    let err = client.list_themes().await.expect_err("must fail");
    match err {
        WpClientError::Remote { status, message } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(message, "Извините, вам это не разрешено.");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // ровно два запроса: токен и темы, повторов нет
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn non_2xx_without_decodable_body_falls_back_to_status_line() {
    let (base_url, hits) = spawn_stub(vec![
        ("200 OK", TOKEN_BODY),
        ("500 Internal Server Error", "site exploded"),
    ])
    .await;

    let client = connect_stub(base_url).await;

    let err = client
        .activate_theme("twentytwentyfive")
        .await
        .expect_err("must fail");
    match err {
        WpClientError::Remote { status, message } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, "http status 500 Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
