//! `OpenSextantClient` against a throwaway local HTTP server.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use opensextant_tagger::config::TaggerConfig;
use opensextant_tagger::services::tagging::{ExtractClient, OpenSextantClient, TaggingError};

/// Read one request: headers plus a `Content-Length` body.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
            let length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= pos + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Answer exactly one request with `status` and `body`; the handle yields
/// the raw request.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });
    (address, handle)
}

fn client(address: &str) -> OpenSextantClient {
    OpenSextantClient::new(&TaggerConfig::default().with_network_address(address)).unwrap()
}

#[tokio::test]
async fn extract_posts_raw_text() {
    let body = r#"{"annoList": [{"start": 13, "end": 18, "matchText": "Paris",
        "features": {"isEntity": true, "hierarchy": "Geo.featureType.PopulatedPlace"}}]}"#;
    let (address, server) = serve_once("200 OK", body).await;

    let result = client(&address)
        .extract("Traveling to Paris, Texas.")
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert_eq!(result.annotations.len(), 1);
    assert_eq!(result.annotations[0].match_text, "Paris");
    assert!(request.starts_with("POST /opensextant/extract/general/json HTTP/1.1\r\n"));
    assert!(request.ends_with("\r\n\r\nTraveling to Paris, Texas."));
    assert!(!request.to_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn extract_sends_basic_auth() {
    let (address, server) = serve_once("200 OK", r#"{"annoList": []}"#).await;
    let config = TaggerConfig {
        username: Some("user".to_string()),
        password: Some("pass".to_string()),
        ..TaggerConfig::default().with_network_address(&address)
    };

    let result = OpenSextantClient::new(&config)
        .unwrap()
        .extract("text")
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert!(result.annotations.is_empty());
    assert!(request.to_lowercase().contains("authorization: basic "));
    assert!(request.contains("dXNlcjpwYXNz"));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (address, server) = serve_once("503 Service Unavailable", r#"{"annoList": []}"#).await;

    let err = client(&address).extract("text").await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, TaggingError::Status { status: 503, .. }));
}

#[tokio::test]
async fn invalid_json_is_an_error() {
    let (address, server) = serve_once("200 OK", "<html>oops</html>").await;

    let err = client(&address).extract("text").await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, TaggingError::InvalidJson(_)));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    let c = client(&address);
    let err = c.extract("text").await.unwrap_err();
    assert!(matches!(err, TaggingError::Http { .. }));
    assert!(!c.is_available().await);
}

#[tokio::test]
async fn probe_requires_general_extractor() {
    let (address, server) = serve_once("200 OK", r#"["general", "geo"]"#).await;
    assert!(client(&address).is_available().await);
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /opensextant/extract/ HTTP/1.1\r\n"));

    let (address, server) = serve_once("200 OK", r#"["geo"]"#).await;
    assert!(!client(&address).is_available().await);
    server.await.unwrap();

    let (address, server) = serve_once("200 OK", r#"{"general": true}"#).await;
    assert!(!client(&address).is_available().await);
    server.await.unwrap();
}
