//! End-to-end behavior of the handler chain behind a real listener.

use std::net::SocketAddr;
use std::time::Duration;

use strata::{middleware, Error, Request, Response, Router, Server, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct Running {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), Error>>,
}

impl Running {
    async fn start(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(Server::from_listener(listener).serve_with_shutdown(
            router,
            async move {
                let _ = stopped.await;
            },
        ));
        Self { addr, stop, handle }
    }

    async fn shutdown(self) {
        self.stop.send(()).unwrap();
        self.handle.await.unwrap().unwrap();
    }
}

/// Sends one HTTP/1.1 request and returns the raw response text.
/// An empty string means the server dropped the connection.
async fn send(addr: SocketAddr, method: &str, target: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let head = format!("{method} {target} HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n");
    stream.write_all(head.as_bytes()).await.unwrap();
    let mut raw = Vec::new();
    let _ = stream.read_to_end(&mut raw).await;
    String::from_utf8(raw).unwrap()
}

fn status(raw: &str) -> u16 {
    raw.get(9..12).and_then(|s| s.parse().ok()).unwrap_or(0)
}

fn body(raw: &str) -> &str {
    raw.split_once("\r\n\r\n").map_or("", |(_, body)| body)
}

async fn hello(_req: Request) -> &'static str {
    "hello"
}

async fn boom(_req: Request) -> Response {
    panic!("boom")
}

async fn echo(req: Request) -> String {
    let n: u64 = req.param("n").and_then(|n| n.parse().ok()).unwrap_or(0);
    tokio::time::sleep(Duration::from_millis(n % 7)).await;
    req.path_and_query().to_owned()
}

fn app() -> Router {
    Router::new()
        .with(middleware::recover)
        .with(middleware::timing)
        .get("/hello", hello)
        .get("/boom", boom)
        .get("/echo/{n}", echo)
}

#[tokio::test]
async fn serves_through_the_chain() {
    let server = Running::start(app()).await;

    let raw = send(server.addr, "GET", "/hello").await;
    assert_eq!(status(&raw), 200, "{raw}");
    assert_eq!(body(&raw), "hello");

    server.shutdown().await;
}

#[tokio::test]
async fn panic_becomes_500_with_message() {
    let server = Running::start(app()).await;

    let raw = send(server.addr, "GET", "/boom").await;
    assert_eq!(status(&raw), 500, "{raw}");
    assert_eq!(body(&raw), "boom");
    assert!(!raw.to_ascii_lowercase().contains("content-type"), "{raw}");

    // The server is unaffected.
    let raw = send(server.addr, "GET", "/hello").await;
    assert_eq!(status(&raw), 200);

    server.shutdown().await;
}

#[tokio::test]
async fn unrecovered_panic_drops_only_that_connection() {
    let server = Running::start(Router::new().get("/boom", boom).get("/hello", hello)).await;

    let raw = send(server.addr, "GET", "/boom").await;
    assert_eq!(status(&raw), 0, "{raw}");

    let raw = send(server.addr, "GET", "/hello").await;
    assert_eq!(status(&raw), 200, "{raw}");

    server.shutdown().await;
}

#[tokio::test]
async fn unknown_routes_and_methods() {
    let server = Running::start(app()).await;

    assert_eq!(status(&send(server.addr, "GET", "/missing").await), 404);
    assert_eq!(status(&send(server.addr, "POST", "/hello").await), 405);

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_do_not_interfere() {
    let server = Running::start(app()).await;

    let mut requests = tokio::task::JoinSet::new();
    for n in 0..32 {
        let addr = server.addr;
        requests.spawn(async move {
            let target = format!("/echo/{n}?tag={n}");
            let raw = send(addr, "GET", &target).await;
            (target, raw)
        });
    }

    while let Some(joined) = requests.join_next().await {
        let (target, raw) = joined.unwrap();
        assert_eq!(status(&raw), 200, "{raw}");
        assert_eq!(body(&raw), target);
    }

    server.shutdown().await;
}

#[tokio::test]
async fn shutdown_closes_idle_keep_alive_connections() {
    let server = Running::start(app()).await;

    // No `connection: close`: the socket stays open after the response.
    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream
        .write_all(b"GET /hello HTTP/1.1\r\nhost: localhost\r\n\r\n")
        .await
        .unwrap();
    let mut buf = [0u8; 1024];
    let n = stream.read(&mut buf).await.unwrap();
    let head = String::from_utf8_lossy(&buf[..n]);
    assert!(head.starts_with("HTTP/1.1 200"), "{head}");

    server.stop.send(()).unwrap();
    let served = tokio::time::timeout(Duration::from_secs(3), server.handle)
        .await
        .expect("serve did not return while a keep-alive connection was idle");
    served.unwrap().unwrap();

    // The server closed its end.
    let mut rest = Vec::new();
    let _ = stream.read_to_end(&mut rest).await;
    assert!(rest.is_empty());
}
