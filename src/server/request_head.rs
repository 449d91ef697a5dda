// Request head module
// Reads and checks a request head before hyper sees it, so requests hyper
// would reject itself are answered by this server with the usual headers

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use http_body_util::BodyExt;
use hyper::body::Bytes;
use hyper::Response;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};

use crate::http::ServeBody;

/// Largest request head read before answering 431
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

/// Same header count limit hyper applies
const MAX_HEADERS: usize = 100;

/// Outcome of reading a request head
#[derive(Debug, PartialEq, Eq)]
pub enum HeadStatus {
    /// A full, well-formed head is buffered
    Complete,
    /// Request line or headers don't parse (400)
    Malformed,
    /// Head too big or too many headers (431)
    TooLarge,
    /// Peer closed before sending a full head
    Closed,
}

/// Read from `reader` into `buf` until a whole request head is buffered
///
/// Bytes past the head (a pipelined request or a body) may end up in `buf`
/// too; replay all of it with [`Rewind`].
pub async fn read_request_head<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<HeadStatus>
where
    R: AsyncRead + Unpin,
{
    loop {
        if let Some(status) = check_head(buf) {
            return Ok(status);
        }
        if buf.len() >= MAX_HEAD_SIZE {
            return Ok(HeadStatus::TooLarge);
        }
        if reader.read_buf(buf).await? == 0 {
            return Ok(HeadStatus::Closed);
        }
    }
}

/// `None` while the head is still incomplete
fn check_head(buf: &[u8]) -> Option<HeadStatus> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut request = httparse::Request::new(&mut headers);

    match request.parse(buf) {
        Ok(httparse::Status::Complete(_)) => Some(HeadStatus::Complete),
        Ok(httparse::Status::Partial) => None,
        Err(httparse::Error::TooManyHeaders) => Some(HeadStatus::TooLarge),
        Err(_) => Some(HeadStatus::Malformed),
    }
}

/// Write a response hyper never saw and close the write side
pub async fn write_rejection<W>(writer: &mut W, response: Response<ServeBody>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let (parts, body) = response.into_parts();
    let body = body.collect().await?.to_bytes();

    let mut head = format!("HTTP/1.1 {}\r\n", parts.status).into_bytes();
    for (name, value) in &parts.headers {
        head.extend_from_slice(name.as_str().as_bytes());
        head.extend_from_slice(b": ");
        head.extend_from_slice(value.as_bytes());
        head.extend_from_slice(b"\r\n");
    }
    head.extend_from_slice(b"connection: close\r\n\r\n");

    writer.write_all(&head).await?;
    writer.write_all(&body).await?;
    writer.shutdown().await
}

/// Stream wrapper that yields already-read bytes before reading `inner`
pub struct Rewind<T> {
    prefix: Bytes,
    inner: T,
}

impl<T> Rewind<T> {
    pub fn new(prefix: Vec<u8>, inner: T) -> Self {
        Self {
            prefix: Bytes::from(prefix),
            inner,
        }
    }
}

impl<T: AsyncRead + Unpin> AsyncRead for Rewind<T> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if !this.prefix.is_empty() {
            let n = this.prefix.len().min(buf.remaining());
            buf.put_slice(&this.prefix.split_to(n));
            return Poll::Ready(Ok(()));
        }
        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}

impl<T: AsyncWrite + Unpin> AsyncWrite for Rewind<T> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write(cx, buf)
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write_vectored(cx, bufs)
    }

    fn is_write_vectored(&self) -> bool {
        self.inner.is_write_vectored()
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
