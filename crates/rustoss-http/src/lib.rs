//! OSS HTTP routing, request decoding, response encoding and the hyper service.
//!
//! - **Routing** ([`router`]): maps a request to an [`OssOperation`](rustoss_model::OssOperation)
//!   from the method, the bucket and key, and the sub-resource query keys.
//!   Path-style and virtual-hosted-style addressing are both accepted.
//! - **Request decoding** ([`request`]): builds typed inputs from headers,
//!   query parameters and XML bodies.
//! - **Response encoding** ([`response`]): turns typed outputs and errors into
//!   HTTP responses.
//! - **Dispatch** ([`dispatch`]): the [`OssHandler`] seam to the provider.
//! - **Service** ([`service`]): [`OssHttpService`], the hyper `Service`.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> OssHttpService (hyper Service)
//!     -> Health check interception
//!     -> OssRouter (virtual hosting + operation identification)
//!     -> Body collection
//!     -> OSS V1 signature verification (optional)
//!     -> dispatch_operation (OssHandler trait)
//!     -> Common response headers (x-oss-request-id, Server)
//!   <- HTTP Response
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use rustoss_http::dispatch::NotImplementedHandler;
//! use rustoss_http::service::{OssHttpConfig, OssHttpService};
//!
//! let service = OssHttpService::new(NotImplementedHandler, OssHttpConfig::default());
//! // Serve `service` with hyper.
//! ```

// OssError is returned on every path; boxing it would only add indirection.
#![allow(clippy::result_large_err)]

pub mod body;
pub mod dispatch;
pub mod request;
pub mod response;
pub mod router;
pub mod service;

pub use body::OssResponseBody;
pub use dispatch::{NotImplementedHandler, OssHandler};
pub use request::FromOssRequest;
pub use response::IntoOssResponse;
pub use router::{OssRouter, RoutingContext};
pub use service::{OssHttpConfig, OssHttpService};
