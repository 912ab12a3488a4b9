//! The response body type of the OSS service.
//!
//! Every response is fully buffered: objects live in memory, so a `GetObject`
//! body is the stored `Bytes` handle rather than a copy.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::Full;

/// Response body: a buffered payload or nothing.
#[derive(Debug, Default)]
pub enum OssResponseBody {
    /// XML documents, error bodies and object content.
    Buffered(Full<Bytes>),
    /// 204 responses, HEAD responses and 304 Not Modified.
    #[default]
    Empty,
}

impl OssResponseBody {
    /// Wrap a byte payload.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Buffered(Full::new(data.into()))
    }

    /// An empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }

    /// Wrap a serialized XML document.
    #[must_use]
    pub fn xml(document: Vec<u8>) -> Self {
        Self::from_bytes(document)
    }
}

impl http_body::Body for OssResponseBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Buffered(full) => Pin::new(full)
                .poll_frame(cx)
                .map_err(|never| match never {}),
            Self::Empty => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Buffered(full) => full.is_end_stream(),
            Self::Empty => true,
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            Self::Buffered(full) => full.size_hint(),
            Self::Empty => http_body::SizeHint::with_exact(0),
        }
    }
}
