//! End-to-end tests driving a bound server over raw TCP.
//!
//! Each test builds its own scratch root under the system temp directory,
//! binds port 0 on the loopback interface, and talks plain HTTP/1.1 with
//! `Connection: close` so a response is complete at EOF.

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use staticd::config::{Config, LoggingConfig, PortSource, ServerConfig, SiteConfig};
use staticd::server::Server;

fn test_config(root: PathBuf, port: u16) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
            workers: None,
        },
        site: SiteConfig {
            root,
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
        },
        logging: LoggingConfig {
            log_file: None,
            error_log_file: None,
        },
        port_source: PortSource::Literal,
    }
}

/// Fresh scratch directory, unique per test
fn scratch_root(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("staticd-test-{}-{name}", std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Bind the server on port 0 and run it in the background
fn spawn_server(root: PathBuf) -> SocketAddr {
    let config = test_config(root, 0);
    let addr = config.socket_addr().unwrap();
    let server = Server::bind(&config, addr).unwrap();
    let bound = server.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.serve().await;
    });
    bound
}

async fn raw_request(addr: SocketAddr, request: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

async fn get(addr: SocketAddr, path: &str) -> String {
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    String::from_utf8_lossy(&raw_request(addr, &request).await).into_owned()
}

fn body_of(response: &str) -> &str {
    response
        .split_once("\r\n\r\n")
        .map_or("", |(_, body)| body)
}

#[tokio::test]
async fn serves_index_and_exact_path() {
    let root = scratch_root("index");
    std::fs::write(root.join("index.html"), "hello").unwrap();
    let addr = spawn_server(root);

    let response = get(addr, "/").await;
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert!(response.to_lowercase().contains("content-type: text/html"));
    assert_eq!(body_of(&response), "hello");

    let response = get(addr, "/index.html").await;
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert_eq!(body_of(&response), "hello");
}

#[tokio::test]
async fn missing_path_returns_404() {
    let root = scratch_root("missing");
    std::fs::write(root.join("index.html"), "hello").unwrap();
    let addr = spawn_server(root);

    let response = get(addr, "/missing.txt").await;
    assert!(response.starts_with("HTTP/1.1 404"), "got: {response}");
}

#[tokio::test]
async fn file_contents_are_byte_identical() {
    let root = scratch_root("bytes");
    let payload: Vec<u8> = vec![0, 1, 2, 3, 250, 251, 252, 253, 254, 255];
    std::fs::write(root.join("data.bin"), &payload).unwrap();
    let addr = spawn_server(root);

    let request = "GET /data.bin HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
    let response = raw_request(addr, request).await;

    let header_end = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("complete header section")
        + 4;
    assert_eq!(&response[header_end..], payload.as_slice());

    let headers = String::from_utf8_lossy(&response[..header_end]).to_lowercase();
    assert!(headers.contains("content-type: application/octet-stream"));
    assert!(headers.contains(&format!("content-length: {}", payload.len())));
}

#[tokio::test]
async fn traversal_never_escapes_root() {
    let outer = scratch_root("traversal");
    std::fs::write(outer.join("secret.txt"), "top secret").unwrap();
    let root = outer.join("public");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("index.html"), "public page").unwrap();
    let addr = spawn_server(root);

    for path in ["/../secret.txt", "/%2e%2e/secret.txt", "/a/../../secret.txt"] {
        let response = get(addr, path).await;
        assert!(
            !response.contains("top secret"),
            "{path} leaked file contents"
        );
        assert!(response.starts_with("HTTP/1.1 404"), "{path} got: {response}");
    }
}

#[tokio::test]
async fn empty_root_lists_directory() {
    let root = scratch_root("empty");
    let addr = spawn_server(root);

    let response = get(addr, "/").await;
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert!(response.contains("Index of /"));

    let response = get(addr, "/missing.txt").await;
    assert!(response.starts_with("HTTP/1.1 404"));
}

#[tokio::test]
async fn directory_redirects_then_lists() {
    let root = scratch_root("dirs");
    std::fs::create_dir_all(root.join("docs")).unwrap();
    std::fs::write(root.join("docs").join("page.html"), "<p>doc</p>").unwrap();
    let addr = spawn_server(root);

    let response = get(addr, "/docs").await;
    assert!(response.starts_with("HTTP/1.1 301"), "got: {response}");
    assert!(response.to_lowercase().contains("location: /docs/"));

    // No index file in docs/, so the slashed form serves a listing
    let response = get(addr, "/docs/").await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("page.html"));
}

#[tokio::test]
async fn percent_encoded_names_resolve() {
    let root = scratch_root("encoded");
    std::fs::write(root.join("hello world.txt"), "spaced").unwrap();
    let addr = spawn_server(root);

    let response = get(addr, "/hello%20world.txt").await;
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert_eq!(body_of(&response), "spaced");
}

#[tokio::test]
async fn head_returns_headers_without_body() {
    let root = scratch_root("head");
    std::fs::write(root.join("index.html"), "hello").unwrap();
    let addr = spawn_server(root);

    let request = "HEAD /index.html HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
    let response = String::from_utf8_lossy(&raw_request(addr, request).await).into_owned();

    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert!(response.to_lowercase().contains("content-length: 5"));
    assert_eq!(body_of(&response), "");
}

#[tokio::test]
async fn non_get_methods_are_rejected() {
    let root = scratch_root("methods");
    let addr = spawn_server(root);

    let request = "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
    let response = String::from_utf8_lossy(&raw_request(addr, request).await).into_owned();
    assert!(response.starts_with("HTTP/1.1 405"), "got: {response}");
    assert!(response.to_lowercase().contains("allow: get, head, options"));
}

#[tokio::test]
async fn binding_a_taken_port_fails() {
    let occupant = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let taken = occupant.local_addr().unwrap();

    let root = scratch_root("conflict");
    let config = test_config(root, taken.port());
    let result = Server::bind(&config, taken);
    assert!(result.is_err(), "second bind on {taken} should fail");
}

#[tokio::test]
async fn configured_port_is_the_bound_port() {
    // Reserve a free port, release it, then bind it explicitly
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = probe.local_addr().unwrap().port();
    drop(probe);

    let root = scratch_root("port");
    let config = test_config(root, port);
    let server = Server::bind(&config, config.socket_addr().unwrap()).unwrap();
    assert_eq!(server.local_addr().unwrap().port(), port);
}
