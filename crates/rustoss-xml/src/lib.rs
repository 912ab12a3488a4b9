//! OSS XML serialization/deserialization for `RustOSS`.
//!
//! This crate converts between the OSS model types and the XML wire format.
//! Both directions are implemented for every document so the server and the
//! client share one codec.
//!
//! # Key components
//!
//! - [`OssSerialize`] trait and [`to_xml`] function for writing XML bodies
//! - [`OssDeserialize`] trait and [`from_xml`] function for parsing XML bodies
//! - [`error_to_xml`] and [`ErrorResponse`] for the `<Error>` document
//!
//! # OSS XML conventions
//!
//! - No namespace on the root element
//! - Booleans: lowercase `true`/`false`
//! - Timestamps: ISO 8601 format (`2015-12-17T18:12:43.000Z`)
//! - XML declaration: `<?xml version="1.0" encoding="UTF-8"?>`

pub mod deserialize;
pub mod error;
pub mod serialize;

pub use deserialize::{OssDeserialize, from_xml};
pub use error::{ErrorResponse, XmlError, error_to_xml};
pub use serialize::{OssSerialize, format_timestamp, to_xml};
