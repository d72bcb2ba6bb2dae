//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cache_proxy::cache::{CacheStore, MemoryStore};
use cache_proxy::config::ProxyConfig;
use cache_proxy::http::HttpServer;
use cache_proxy::lifecycle::Shutdown;
use cache_proxy::origin::HttpOrigin;
use cache_proxy::CacheProxy;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A raw-TCP origin that always answers with the same canned response.
#[allow(dead_code)]
pub struct MockOrigin {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    cookies: Arc<Mutex<Vec<Option<String>>>>,
}

#[allow(dead_code)]
impl MockOrigin {
    pub fn base_url(&self) -> String {
        format!("http://{}/exist/apps/prodomo", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// The `cookie` header of every request received, in order.
    pub fn cookies(&self) -> Vec<Option<String>> {
        self.cookies.lock().unwrap().clone()
    }
}

/// Start a mock origin returning `status`, `headers` and `body` to every request.
pub async fn start_origin(status: &'static str, headers: &[&str], body: &[u8]) -> MockOrigin {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        body.len()
    );
    for header in headers {
        response.push_str(header);
        response.push_str("\r\n");
    }
    response.push_str("\r\n");
    let mut response = response.into_bytes();
    response.extend_from_slice(body);
    let response = Arc::new(response);

    let hits = Arc::new(AtomicUsize::new(0));
    let cookies = Arc::new(Mutex::new(Vec::new()));
    let (hits_task, cookies_task) = (hits.clone(), cookies.clone());

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let response = response.clone();
            let hits = hits_task.clone();
            let cookies = cookies_task.clone();
            tokio::spawn(async move {
                let head = read_head(&mut socket).await;
                let cookie = head.lines().find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("cookie").then(|| value.trim().to_string())
                });
                cookies.lock().unwrap().push(cookie);
                hits.fetch_add(1, Ordering::SeqCst);

                let _ = socket.write_all(&response).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockOrigin { addr, hits, cookies }
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8_lossy(&head).into_owned()
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A running proxy in front of `origin_base`, caching into `store`.
pub struct TestProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestProxy {
    pub async fn start(origin_base: &str, store: &MemoryStore) -> Self {
        let mut config = ProxyConfig::default();
        config.origin.base_url = origin_base.to_string();

        let origin = Arc::new(HttpOrigin::new(&config.origin).unwrap());
        let store: Arc<dyn CacheStore> = Arc::new(store.clone());
        let proxy = CacheProxy::from_config(&config, origin, Some(store));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let server = HttpServer::new(config, proxy);
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        Self { addr, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Wait for the detached cache write of a miss to land.
#[allow(dead_code)]
pub async fn wait_for_entries(store: &MemoryStore, expected: usize) {
    for _ in 0..200 {
        if store.len() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("store never reached {} entries (has {})", expected, store.len());
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
