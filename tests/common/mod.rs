//! Shared utilities for integration tests: stub codecs and a relay harness.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lepton_relay::config::RelayConfig;
use lepton_relay::{RelayServer, Shutdown};
use tempfile::TempDir;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;

/// Read the whole request (until the relay half-closes), then answer.
async fn serve_one<S, F, Fut>(mut socket: S, f: Arc<F>)
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: Fn(Vec<u8>) -> Fut,
    Fut: Future<Output = Vec<u8>>,
{
    let mut input = Vec::new();
    if socket.read_to_end(&mut input).await.is_err() {
        return;
    }
    let reply = f(input).await;
    let _ = socket.write_all(&reply).await;
    let _ = socket.shutdown().await;
}

/// Start a TCP codec whose reply is computed from the full input.
pub async fn start_programmable_codec<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(Vec<u8>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Vec<u8>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(serve_one(socket, f.clone()));
        }
    });

    addr
}

/// Start a TCP codec that answers every request with `reply`.
pub async fn start_fixed_codec(reply: Vec<u8>) -> SocketAddr {
    let reply = Arc::new(reply);
    start_programmable_codec(move |_| {
        let reply = reply.clone();
        async move { reply.to_vec() }
    })
    .await
}

/// Start a Unix socket codec that answers every request with `reply`.
#[cfg(unix)]
pub async fn start_unix_codec(path: &Path, reply: Vec<u8>) {
    let listener = tokio::net::UnixListener::bind(path).unwrap();
    let reply = Arc::new(reply);
    let f = Arc::new(move |_: Vec<u8>| {
        let reply = reply.clone();
        async move { reply.to_vec() }
    });

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(serve_one(socket, f.clone()));
        }
    });
}

/// Start a codec that accepts, reads the input, then sends nothing at all.
pub async fn start_silent_codec() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut input = Vec::new();
                let _ = socket.read_to_end(&mut input).await;
                tokio::time::sleep(Duration::from_secs(60)).await;
            });
        }
    });

    addr
}

/// Start a codec that sends `prefix`, then trickles one byte every
/// `interval` forever.
pub async fn start_trickling_codec(prefix: Vec<u8>, interval: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let prefix = prefix.clone();
            tokio::spawn(async move {
                let mut input = Vec::new();
                let _ = socket.read_to_end(&mut input).await;
                if socket.write_all(&prefix).await.is_err() {
                    return;
                }
                loop {
                    tokio::time::sleep(interval).await;
                    if socket.write_all(b".").await.is_err() {
                        return;
                    }
                }
            });
        }
    });

    addr
}

/// An address with nothing listening on it.
pub async fn unused_addr() -> SocketAddr {
    TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap()
}

/// A running relay serving files from a temporary root.
pub struct TestRelay {
    pub addr: SocketAddr,
    /// Parent of `root`, for files that must stay unreachable.
    pub outside: PathBuf,
    pub root: PathBuf,
    shutdown: Shutdown,
    _dir: TempDir,
}

impl TestRelay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn write_file(&self, relative: &str, contents: &[u8]) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a relay pointed at `endpoint`, letting the test adjust config.
pub async fn start_relay<F>(endpoint: String, configure: F) -> TestRelay
where
    F: FnOnce(&mut RelayConfig),
{
    let dir = tempfile::tempdir().unwrap();
    let outside = dir.path().to_path_buf();
    let root = outside.join("root");
    std::fs::create_dir(&root).unwrap();

    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.files.root = root.clone();
    config.codec.endpoint = endpoint;
    configure(&mut config);

    let server = RelayServer::new(&config).unwrap();
    let listener = TcpListener::bind(config.listener.bind_address.as_str()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestRelay {
        addr,
        outside,
        root,
        shutdown,
        _dir: dir,
    }
}

/// A client that never pools connections or uses a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
