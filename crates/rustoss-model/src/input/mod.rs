//! Operation inputs, one struct per [`OssOperation`](crate::OssOperation).

mod bucket;
mod config;
mod list;
mod multipart;
mod object;

pub use bucket::*;
pub use config::*;
pub use list::*;
pub use multipart::*;
pub use object::*;
