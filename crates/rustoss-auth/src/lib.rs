//! OSS request authentication for RustOSS.
//!
//! Both sides of the OSS V1 signature live here: the client signs requests and
//! presigned URLs, the server verifies them against a [`CredentialProvider`].
//!
//! # Usage
//!
//! ```rust
//! use rustoss_auth::canonical::canonicalized_resource;
//! use rustoss_auth::signature::sign_request;
//!
//! let mut headers = http::HeaderMap::new();
//! headers.insert("date", http::HeaderValue::from_static("Thu, 17 Nov 2005 18:49:58 GMT"));
//!
//! let resource = canonicalized_resource(Some("bucket"), None, [("logging", "")]);
//! let authorization = sign_request("ak", "sk", "GET", &headers, &resource);
//! assert!(authorization.starts_with("OSS ak:"));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - String to sign and canonicalized resource construction
//! - [`credentials`] - Credential provider trait and in-memory implementation
//! - [`error`] - Authentication error types
//! - [`presigned`] - Presigned URL signing and verification
//! - [`signature`] - `Authorization` header signing and verification

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod presigned;
pub mod signature;

pub use credentials::{CredentialProvider, StaticCredentialProvider};
pub use error::AuthError;
pub use presigned::{PresignedParams, presign, verify_presigned};
pub use signature::{AuthMethod, AuthResult, compute_signature, sign_request, verify_request};
