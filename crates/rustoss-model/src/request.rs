//! Request envelopes and credentials.

/// A wrapper around `bytes::Bytes` for object payloads.
#[derive(Debug, Clone, Default)]
pub struct StreamingBlob {
    /// The underlying bytes data.
    pub data: bytes::Bytes,
}

impl StreamingBlob {
    /// Create a new `StreamingBlob` from bytes.
    #[must_use]
    pub fn new(data: impl Into<bytes::Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Returns true if the blob is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the length of the blob.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

impl From<bytes::Bytes> for StreamingBlob {
    fn from(data: bytes::Bytes) -> Self {
        Self { data }
    }
}

impl From<Vec<u8>> for StreamingBlob {
    fn from(data: Vec<u8>) -> Self {
        Self { data: data.into() }
    }
}

/// An OSS access key pair.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// The access key id.
    pub access_key_id: String,
    /// The access key secret.
    pub access_key_secret: String,
    /// Optional STS security token, sent as `x-oss-security-token`.
    pub security_token: Option<String>,
}

impl Credentials {
    /// Create a long-term key pair without a security token.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            security_token: None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"[REDACTED]")
            .field(
                "security_token",
                &self.security_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// An OSS request wrapping an input with the identity that issued it.
#[derive(Debug, Clone)]
pub struct OssRequest<T> {
    /// The input payload.
    pub input: T,
    /// The verified access key id of the caller, if the request was signed.
    pub requester: Option<String>,
    /// The original HTTP headers.
    pub headers: http::HeaderMap,
}

impl<T: Default> Default for OssRequest<T> {
    fn default() -> Self {
        Self {
            input: T::default(),
            requester: None,
            headers: http::HeaderMap::new(),
        }
    }
}

impl<T> OssRequest<T> {
    /// Create a new anonymous OssRequest with the given input.
    #[must_use]
    pub fn new(input: T) -> Self {
        Self {
            input,
            requester: None,
            headers: http::HeaderMap::new(),
        }
    }

    /// Attach the caller's access key id.
    #[must_use]
    pub fn with_requester(mut self, access_key_id: impl Into<String>) -> Self {
        self.requester = Some(access_key_id.into());
        self
    }

    /// Map the input type to a different type.
    pub fn map_input<U>(self, f: impl FnOnce(T) -> U) -> OssRequest<U> {
        OssRequest {
            input: f(self.input),
            requester: self.requester,
            headers: self.headers,
        }
    }
}
