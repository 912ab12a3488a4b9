//! Data model for RustOSS: error codes, operations, and the typed inputs and
//! outputs exchanged between the HTTP layer, the service and the client.
#![allow(missing_docs)]

pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod request;
pub mod types;
pub mod validation;

pub use error::{OssError, OssErrorCode};
pub use operations::OssOperation;
pub use request::{Credentials, OssRequest, StreamingBlob};
