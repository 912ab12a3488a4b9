//! In-memory OSS service for RustOSS.
//!
//! [`RustOss`] implements the bucket, object and multipart operations of an
//! OSS endpoint on top of an in-memory namespace. The HTTP layer in
//! `rustoss-http` decodes requests into `rustoss-model` inputs and the server
//! binary bridges them to the `handle_*` methods defined here.
//!
//! # Architecture
//!
//! ```text
//! rustoss-http (routing, auth, XML)
//!        |
//!        v
//! RustOss (handle_* methods)
//!        |
//!        v
//!   OssServiceState (buckets, objects and uploads, bodies inline)
//! ```

pub mod checksums;
pub mod config;
pub mod error;
mod ops;
pub mod provider;
pub mod state;
pub mod storage;
pub mod utils;
pub mod validation;

pub use config::OssConfig;
pub use provider::RustOss;
