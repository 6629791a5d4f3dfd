//! A single connection type over TCP or Unix domain sockets.
//!
//! # Responsibilities
//! - Dial the configured endpoint (the only place TCP and Unix differ)
//! - Send a whole input stream, then half-close the write side
//! - Read the codec's reply
//!
//! # Design Decisions
//! - One connection per request, never pooled
//! - Dropping the connection closes both directions

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;

use crate::codec::endpoint::CodecEndpoint;
use crate::resilience::timeouts::with_deadline;

/// [`CodecConnection`] is a unified connection. Either
/// a [`TcpStream`] or a [`UnixStream`].
#[derive(Debug)]
pub enum CodecConnection {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl CodecConnection {
    /// Dial `endpoint`, giving up after `timeout`.
    pub async fn connect(endpoint: &CodecEndpoint, timeout: Duration) -> io::Result<Self> {
        with_deadline(timeout, async {
            match endpoint {
                CodecEndpoint::Tcp { authority } => {
                    let stream = TcpStream::connect(authority.as_str()).await?;
                    stream.set_nodelay(true)?;
                    Ok(Self::Tcp(stream))
                }
                #[cfg(unix)]
                CodecEndpoint::Unix { path } => Ok(Self::Unix(UnixStream::connect(path).await?)),
                #[cfg(not(unix))]
                CodecEndpoint::Unix { .. } => Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "unix sockets are not available on this platform",
                )),
            }
        })
        .await
    }

    /// Copy everything from `input` into the connection, then shut down the
    /// write direction so the codec sees end-of-input.
    ///
    /// Returns the number of bytes sent.
    pub async fn send_all<R>(&mut self, input: &mut R, timeout: Duration) -> io::Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        with_deadline(timeout, async {
            let sent = tokio::io::copy(input, &mut *self).await?;
            self.shutdown().await?;
            Ok(sent)
        })
        .await
    }

    /// A single read of at most `buf.len()` bytes. `Ok(0)` means the codec
    /// closed its side.
    pub async fn read_chunk(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
        with_deadline(timeout, self.read(buf)).await
    }
}

impl AsyncRead for CodecConnection {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(s) => Pin::new(s).poll_read(cx, buf),
            #[cfg(unix)]
            Self::Unix(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for CodecConnection {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Tcp(s) => Pin::new(s).poll_write(cx, buf),
            #[cfg(unix)]
            Self::Unix(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(s) => Pin::new(s).poll_flush(cx),
            #[cfg(unix)]
            Self::Unix(s) => Pin::new(s).poll_flush(cx),
        }
    }

    // tokio implements shutdown for both stream types as a write-side
    // half-close.
    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(s) => Pin::new(s).poll_shutdown(cx),
            #[cfg(unix)]
            Self::Unix(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}

impl From<TcpStream> for CodecConnection {
    fn from(s: TcpStream) -> Self {
        Self::Tcp(s)
    }
}

#[cfg(unix)]
impl From<UnixStream> for CodecConnection {
    fn from(s: UnixStream) -> Self {
        Self::Unix(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    const SECS: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn tcp_send_then_read() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let codec = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            socket.write_all(b"reply").await.unwrap();
            received
        });

        let endpoint = CodecEndpoint::Tcp {
            authority: addr.to_string(),
        };
        let mut conn = CodecConnection::connect(&endpoint, SECS).await.unwrap();
        let mut input: &[u8] = b"input bytes";
        let sent = conn.send_all(&mut input, SECS).await.unwrap();
        assert_eq!(sent, 11);

        let mut buf = [0u8; 100];
        let n = conn.read_chunk(&mut buf, SECS).await.unwrap();
        assert_eq!(&buf[..n], b"reply");

        assert_eq!(codec.await.unwrap(), b"input bytes");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unix_send_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codec.sock");
        let listener = tokio::net::UnixListener::bind(&path).unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received.reverse();
            socket.write_all(&received).await.unwrap();
        });

        let endpoint = CodecEndpoint::Unix { path };
        let mut conn = CodecConnection::connect(&endpoint, SECS).await.unwrap();
        let mut input: &[u8] = b"abc";
        conn.send_all(&mut input, SECS).await.unwrap();

        let mut reply = Vec::new();
        conn.read_to_end(&mut reply).await.unwrap();
        assert_eq!(reply, b"cba");
    }

    #[tokio::test]
    async fn connect_refused() {
        // Bind then drop to get a port nobody listens on.
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let endpoint = CodecEndpoint::Tcp {
            authority: addr.to_string(),
        };
        assert!(CodecConnection::connect(&endpoint, SECS).await.is_err());
    }

    #[tokio::test]
    async fn read_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _codec = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let endpoint = CodecEndpoint::Tcp {
            authority: addr.to_string(),
        };
        let mut conn = CodecConnection::connect(&endpoint, SECS).await.unwrap();
        let mut buf = [0u8; 8];
        let err = conn
            .read_chunk(&mut buf, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }
}
