//! OSS operation handlers.
//!
//! Each submodule adds `handle_*` methods to [`crate::provider::RustOss`].
//! The server binary bridges them to the HTTP layer through the
//! `OssHandler` trait from `rustoss-http`.

mod bucket;
mod bucket_config;
mod list;
mod multipart;
mod object;
