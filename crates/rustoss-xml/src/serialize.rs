//! OSS XML serialization: converting Rust types to OSS-compatible XML.
//!
//! OSS documents carry no namespace. Booleans are lowercase and timestamps use
//! ISO 8601 with milliseconds (`2015-12-17T18:12:43.000Z`).

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use rustoss_model::output::{
    CompleteMultipartUploadOutput, DeleteObjectsOutput, GetBucketLocationOutput,
    GetBucketLoggingOutput, GetBucketWebsiteOutput, InitiateMultipartUploadOutput,
    ListBucketsOutput, ListMultipartUploadsOutput, ListObjectsOutput,
};
use rustoss_model::types::{
    Bucket, BucketLoggingStatus, CompletedMultipartUpload, CreateBucketConfiguration, Delete,
    MultipartUpload, ObjectSummary, Owner, WebsiteConfiguration,
};

use crate::error::XmlError;

/// Trait for serializing OSS types to XML.
///
/// Implementors write their content as child elements inside the current XML context.
/// The root element name is handled by the top-level [`to_xml`] function.
pub trait OssSerialize {
    /// Serialize this value as XML child elements into the given writer.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if writing to the underlying writer fails.
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()>;
}

/// Serialize a value as an OSS XML document with declaration.
///
/// # Errors
///
/// Returns `XmlError` if serialization fails.
pub fn to_xml<T: OssSerialize>(root_element: &str, value: &T) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer
        .create_element(root_element)
        .write_inner_content(|w| value.serialize_xml(w))?;

    Ok(buf)
}

// ---------------------------------------------------------------------------
// Helper functions for writing common XML patterns
// ---------------------------------------------------------------------------

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

/// Write `<tag>text</tag>` only if the value is `Some`.
fn write_optional_text<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<&str>,
) -> io::Result<()> {
    if let Some(v) = value {
        write_text_element(writer, tag, v)?;
    }
    Ok(())
}

/// Write `<tag>text</tag>`, emitting an empty element for `None`.
fn write_text_or_empty<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<&str>,
) -> io::Result<()> {
    write_text_element(writer, tag, value.unwrap_or_default())
}

fn write_bool<W: Write>(writer: &mut Writer<W>, tag: &str, value: bool) -> io::Result<()> {
    write_text_element(writer, tag, if value { "true" } else { "false" })
}

fn write_timestamp<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: &chrono::DateTime<chrono::Utc>,
) -> io::Result<()> {
    write_text_element(writer, tag, &format_timestamp(value))
}

/// Format a `DateTime<Utc>` as ISO 8601 with milliseconds and `Z` suffix.
#[must_use]
pub fn format_timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

// ---------------------------------------------------------------------------
// Shared types
// ---------------------------------------------------------------------------

impl OssSerialize for Owner {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "ID", &self.id)?;
        write_text_element(writer, "DisplayName", &self.display_name)
    }
}

impl OssSerialize for Bucket {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_timestamp(writer, "CreationDate", &self.creation_date)?;
        write_text_element(writer, "ExtranetEndpoint", &format!("{}.aliyuncs.com", self.location))?;
        write_text_element(writer, "Location", &self.location)?;
        write_text_element(writer, "Name", &self.name)?;
        write_text_element(writer, "StorageClass", "Standard")
    }
}

impl OssSerialize for ObjectSummary {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Key", &self.key)?;
        write_timestamp(writer, "LastModified", &self.last_modified)?;
        write_text_element(writer, "ETag", &self.etag)?;
        write_text_element(writer, "Type", "Normal")?;
        write_text_element(writer, "Size", &self.size.to_string())?;
        write_text_element(writer, "StorageClass", &self.storage_class)?;
        if let Some(owner) = &self.owner {
            writer
                .create_element("Owner")
                .write_inner_content(|w| owner.serialize_xml(w))?;
        }
        Ok(())
    }
}

impl OssSerialize for MultipartUpload {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Key", &self.key)?;
        write_text_element(writer, "UploadId", &self.upload_id)?;
        write_text_element(writer, "StorageClass", &self.storage_class)?;
        write_timestamp(writer, "Initiated", &self.initiated)
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

impl OssSerialize for CreateBucketConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_optional_text(
            writer,
            "LocationConstraint",
            self.location_constraint.as_deref(),
        )?;
        write_optional_text(writer, "StorageClass", self.storage_class.as_deref())
    }
}

impl OssSerialize for BucketLoggingStatus {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        if let Some(enabled) = &self.logging_enabled {
            writer
                .create_element("LoggingEnabled")
                .write_inner_content(|w| {
                    write_text_element(w, "TargetBucket", &enabled.target_bucket)?;
                    write_text_or_empty(w, "TargetPrefix", enabled.target_prefix.as_deref())
                })?;
        }
        Ok(())
    }
}

impl OssSerialize for WebsiteConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        if let Some(index) = &self.index_document {
            writer
                .create_element("IndexDocument")
                .write_inner_content(|w| write_text_element(w, "Suffix", &index.suffix))?;
        }
        if let Some(error) = &self.error_document {
            writer
                .create_element("ErrorDocument")
                .write_inner_content(|w| write_text_element(w, "Key", &error.key))?;
        }
        Ok(())
    }
}

impl OssSerialize for CompletedMultipartUpload {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        for part in &self.parts {
            writer.create_element("Part").write_inner_content(|w| {
                write_text_element(w, "PartNumber", &part.part_number.to_string())?;
                write_text_element(w, "ETag", &part.etag)
            })?;
        }
        Ok(())
    }
}

impl OssSerialize for Delete {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_bool(writer, "Quiet", self.quiet)?;
        for key in &self.keys {
            writer
                .create_element("Object")
                .write_inner_content(|w| write_text_element(w, "Key", key))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

impl OssSerialize for GetBucketLocationOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.write_event(Event::Text(BytesText::new(&self.location_constraint)))?;
        Ok(())
    }
}

impl OssSerialize for GetBucketLoggingOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        self.status.serialize_xml(writer)
    }
}

impl OssSerialize for GetBucketWebsiteOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        self.configuration.serialize_xml(writer)
    }
}

impl OssSerialize for ListBucketsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_or_empty(writer, "Prefix", self.prefix.as_deref())?;
        write_text_or_empty(writer, "Marker", self.marker.as_deref())?;
        if let Some(max_keys) = self.max_keys {
            write_text_element(writer, "MaxKeys", &max_keys.to_string())?;
        }
        write_bool(writer, "IsTruncated", self.is_truncated)?;
        write_optional_text(writer, "NextMarker", self.next_marker.as_deref())?;
        writer
            .create_element("Owner")
            .write_inner_content(|w| self.owner.serialize_xml(w))?;
        writer.create_element("Buckets").write_inner_content(|w| {
            for bucket in &self.buckets {
                w.create_element("Bucket")
                    .write_inner_content(|w| bucket.serialize_xml(w))?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl OssSerialize for ListObjectsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Name", &self.bucket)?;
        write_text_or_empty(writer, "Prefix", self.prefix.as_deref())?;
        write_text_or_empty(writer, "Marker", self.marker.as_deref())?;
        write_text_element(writer, "MaxKeys", &self.max_keys.to_string())?;
        write_text_or_empty(writer, "Delimiter", self.delimiter.as_deref())?;
        write_bool(writer, "IsTruncated", self.is_truncated)?;
        write_optional_text(writer, "EncodingType", self.encoding_type.as_param())?;
        write_optional_text(writer, "NextMarker", self.next_marker.as_deref())?;
        for object in &self.contents {
            writer
                .create_element("Contents")
                .write_inner_content(|w| object.serialize_xml(w))?;
        }
        for prefix in &self.common_prefixes {
            writer
                .create_element("CommonPrefixes")
                .write_inner_content(|w| write_text_element(w, "Prefix", prefix))?;
        }
        Ok(())
    }
}

impl OssSerialize for ListMultipartUploadsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Bucket", &self.bucket)?;
        write_optional_text(writer, "EncodingType", self.encoding_type.as_param())?;
        write_text_or_empty(writer, "KeyMarker", self.key_marker.as_deref())?;
        write_text_or_empty(writer, "UploadIdMarker", self.upload_id_marker.as_deref())?;
        write_text_or_empty(writer, "NextKeyMarker", self.next_key_marker.as_deref())?;
        write_text_or_empty(
            writer,
            "NextUploadIdMarker",
            self.next_upload_id_marker.as_deref(),
        )?;
        write_text_or_empty(writer, "Prefix", self.prefix.as_deref())?;
        write_text_element(writer, "MaxUploads", &self.max_uploads.to_string())?;
        write_bool(writer, "IsTruncated", self.is_truncated)?;
        for upload in &self.uploads {
            writer
                .create_element("Upload")
                .write_inner_content(|w| upload.serialize_xml(w))?;
        }
        Ok(())
    }
}

impl OssSerialize for InitiateMultipartUploadOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Bucket", &self.bucket)?;
        write_text_element(writer, "Key", &self.key)?;
        write_text_element(writer, "UploadId", &self.upload_id)
    }
}

impl OssSerialize for CompleteMultipartUploadOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Location", &self.location)?;
        write_text_element(writer, "Bucket", &self.bucket)?;
        write_text_element(writer, "Key", &self.key)?;
        write_text_element(writer, "ETag", &self.etag)
    }
}

impl OssSerialize for DeleteObjectsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_optional_text(writer, "EncodingType", self.encoding_type.as_param())?;
        for key in &self.deleted {
            writer
                .create_element("Deleted")
                .write_inner_content(|w| write_text_element(w, "Key", key))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rustoss_model::types::{IndexDocument, LoggingEnabled};

    use super::*;

    #[test]
    fn test_should_serialize_logging_status_with_empty_prefix() {
        let status = BucketLoggingStatus {
            logging_enabled: Some(LoggingEnabled {
                target_bucket: "logs".to_owned(),
                target_prefix: None,
            }),
        };

        let xml = to_xml("BucketLoggingStatus", &status).expect("serialization should succeed");
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(xml_str.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml_str.contains("<TargetBucket>logs</TargetBucket>"));
        assert!(xml_str.contains("<TargetPrefix></TargetPrefix>"));
    }

    #[test]
    fn test_should_serialize_disabled_logging_as_empty_root() {
        let xml = to_xml("BucketLoggingStatus", &BucketLoggingStatus::default())
            .expect("serialization should succeed");
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");
        assert!(!xml_str.contains("LoggingEnabled"));
    }

    #[test]
    fn test_should_serialize_website_without_error_document() {
        let config = WebsiteConfiguration {
            index_document: Some(IndexDocument {
                suffix: "index.html".to_owned(),
            }),
            error_document: None,
        };
        let xml = to_xml("WebsiteConfiguration", &config).expect("serialization should succeed");
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(xml_str.contains("<IndexDocument><Suffix>index.html</Suffix></IndexDocument>"));
        assert!(!xml_str.contains("ErrorDocument"));
    }

    #[test]
    fn test_should_serialize_bucket_listing() {
        let output = ListBucketsOutput {
            owner: Owner::from_access_key("ak"),
            buckets: vec![Bucket {
                name: "photos".to_owned(),
                location: "oss-cn-hangzhou".to_owned(),
                creation_date: chrono::Utc.with_ymd_and_hms(2015, 12, 17, 18, 12, 43).unwrap(),
                owner: None,
            }],
            prefix: Some("ph".to_owned()),
            marker: None,
            max_keys: Some(3),
            is_truncated: true,
            next_marker: Some("photos".to_owned()),
        };

        let xml = to_xml("ListAllMyBucketsResult", &output).expect("serialization should succeed");
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(xml_str.contains("<Prefix>ph</Prefix>"));
        assert!(xml_str.contains("<Marker></Marker>"));
        assert!(xml_str.contains("<MaxKeys>3</MaxKeys>"));
        assert!(xml_str.contains("<IsTruncated>true</IsTruncated>"));
        assert!(xml_str.contains("<NextMarker>photos</NextMarker>"));
        assert!(xml_str.contains("<CreationDate>2015-12-17T18:12:43.000Z</CreationDate>"));
        assert!(xml_str.contains("<Location>oss-cn-hangzhou</Location>"));
    }

    #[test]
    fn test_should_serialize_location_as_root_text() {
        let output = GetBucketLocationOutput {
            location_constraint: "oss-cn-hangzhou".to_owned(),
        };
        let xml = to_xml("LocationConstraint", &output).expect("serialization should succeed");
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");
        assert!(xml_str.ends_with("<LocationConstraint>oss-cn-hangzhou</LocationConstraint>"));
    }
}
