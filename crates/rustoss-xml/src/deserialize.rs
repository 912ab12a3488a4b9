//! OSS XML deserialization: parsing OSS XML documents into Rust types.
//!
//! The server parses request bodies with these implementations and the client
//! parses response bodies with the same ones.

use quick_xml::Reader;
use quick_xml::events::Event;
use rustoss_model::output::{
    CompleteMultipartUploadOutput, DeleteObjectsOutput, GetBucketLocationOutput,
    GetBucketLoggingOutput, GetBucketWebsiteOutput, InitiateMultipartUploadOutput,
    ListBucketsOutput, ListMultipartUploadsOutput, ListObjectsOutput,
};
use rustoss_model::types::{
    Bucket, BucketLoggingStatus, CompletedMultipartUpload, CompletedPart,
    CreateBucketConfiguration, Delete, EncodingType, ErrorDocument, IndexDocument,
    LoggingEnabled, MultipartUpload, ObjectSummary, Owner, WebsiteConfiguration,
};

use crate::error::XmlError;

/// Trait for deserializing OSS types from XML.
///
/// The root element has already been consumed by the caller; the implementation
/// reads child elements until the matching end tag.
pub trait OssDeserialize: Sized {
    /// Deserialize an instance from the given XML reader.
    ///
    /// # Errors
    ///
    /// Returns `XmlError` if the XML is malformed or required fields are missing.
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError>;
}

/// Deserialize an OSS XML document into a typed value.
///
/// # Errors
///
/// Returns `XmlError` if the XML is malformed or deserialization fails.
pub fn from_xml<T: OssDeserialize>(xml: &[u8]) -> Result<T, XmlError> {
    // Text is kept verbatim: keys and prefixes may start or end with spaces.
    let mut reader = Reader::from_reader(xml);

    loop {
        match reader.read_event()? {
            Event::Start(_) => {
                return T::deserialize_xml(&mut reader);
            }
            // `<Root/>` carries no children; parse it as an empty element.
            Event::Empty(_) => {
                let mut empty = Reader::from_reader(b"<_></_>".as_slice());
                empty.read_event()?;
                return T::deserialize_xml(&mut empty);
            }
            Event::Eof => {
                return Err(XmlError::MissingElement("root element".to_string()));
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Helper functions for reading common XML patterns
// ---------------------------------------------------------------------------

/// Read the text content of the current element and consume its end tag.
pub(crate) fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::GeneralRef(e) => {
                if let Some(ch) = e
                    .resolve_char_ref()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?
                {
                    text.push(ch);
                    continue;
                }
                let name = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                let resolved = quick_xml::escape::resolve_predefined_entity(&name)
                    .ok_or_else(|| XmlError::ParseError(format!("unknown entity &{name};")))?;
                text.push_str(resolved);
            }
            Event::End(_) => {
                return Ok(text);
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while reading text content".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while skipping element".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Walk the children of the current element.
///
/// `visit` is called with each child's tag name and returns `false` when it
/// did not consume the child, in which case the child is skipped. Empty
/// children (`<Tag/>`) are reported with `empty = true` and must not be read.
fn for_each_child<F>(reader: &mut Reader<&[u8]>, context: &str, mut visit: F) -> Result<(), XmlError>
where
    F: FnMut(&str, bool, &mut Reader<&[u8]>) -> Result<bool, XmlError>,
{
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag_name = std::str::from_utf8(e.name().as_ref())
                    .map_err(|e| XmlError::ParseError(e.to_string()))?
                    .to_owned();
                if !visit(&tag_name, false, reader)? {
                    skip_element(reader)?;
                }
            }
            Event::Empty(e) => {
                let tag_name = std::str::from_utf8(e.name().as_ref())
                    .map_err(|e| XmlError::ParseError(e.to_string()))?
                    .to_owned();
                visit(&tag_name, true, reader)?;
            }
            Event::End(_) => return Ok(()),
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(format!(
                    "unexpected EOF in {context}"
                )));
            }
            _ => {}
        }
    }
}

/// Read text, or return an empty string for a self-closing element.
fn text_or_empty(reader: &mut Reader<&[u8]>, empty: bool) -> Result<String, XmlError> {
    if empty {
        Ok(String::new())
    } else {
        read_text_content(reader)
    }
}

/// Read text and map an empty value to `None`.
fn optional_text(reader: &mut Reader<&[u8]>, empty: bool) -> Result<Option<String>, XmlError> {
    let text = text_or_empty(reader, empty)?;
    Ok(if text.is_empty() { None } else { Some(text) })
}

fn parse_bool(s: &str) -> Result<bool, XmlError> {
    match s.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(XmlError::ParseError(format!("invalid boolean: {s}"))),
    }
}

fn parse_i64(s: &str) -> Result<i64, XmlError> {
    s.trim()
        .parse::<i64>()
        .map_err(|e| XmlError::ParseError(format!("invalid i64 '{s}': {e}")))
}

fn parse_u64(s: &str) -> Result<u64, XmlError> {
    s.trim()
        .parse::<u64>()
        .map_err(|e| XmlError::ParseError(format!("invalid u64 '{s}': {e}")))
}

/// Parse an ISO 8601 timestamp from XML text.
fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>, XmlError> {
    let s = s.trim();
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ")
                .map(|ndt| ndt.and_utc())
        })
        .map_err(|e| XmlError::ParseError(format!("invalid timestamp '{s}': {e}")))
}

// ---------------------------------------------------------------------------
// Shared types
// ---------------------------------------------------------------------------

impl OssDeserialize for Owner {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut owner = Owner::default();
        for_each_child(reader, "Owner", |tag, empty, r| {
            match tag {
                "ID" => owner.id = text_or_empty(r, empty)?,
                "DisplayName" => owner.display_name = text_or_empty(r, empty)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(owner)
    }
}

impl OssDeserialize for Bucket {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut name = None;
        let mut location = String::new();
        let mut creation_date = None;
        for_each_child(reader, "Bucket", |tag, empty, r| {
            match tag {
                "Name" => name = Some(text_or_empty(r, empty)?),
                "Location" => location = text_or_empty(r, empty)?,
                "CreationDate" => {
                    creation_date = Some(parse_timestamp(&text_or_empty(r, empty)?)?);
                }
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(Bucket {
            name: name.ok_or_else(|| XmlError::MissingElement("Bucket/Name".to_string()))?,
            location,
            creation_date: creation_date.unwrap_or_default(),
            owner: None,
        })
    }
}

impl OssDeserialize for ObjectSummary {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut key = None;
        let mut etag = String::new();
        let mut size = 0;
        let mut last_modified = None;
        let mut storage_class = String::new();
        let mut owner = None;
        for_each_child(reader, "Contents", |tag, empty, r| {
            match tag {
                "Key" => key = Some(text_or_empty(r, empty)?),
                "ETag" => etag = text_or_empty(r, empty)?,
                "Size" => size = parse_u64(&text_or_empty(r, empty)?)?,
                "LastModified" => {
                    last_modified = Some(parse_timestamp(&text_or_empty(r, empty)?)?);
                }
                "StorageClass" => storage_class = text_or_empty(r, empty)?,
                "Owner" if !empty => owner = Some(Owner::deserialize_xml(r)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(ObjectSummary {
            key: key.ok_or_else(|| XmlError::MissingElement("Contents/Key".to_string()))?,
            etag,
            size,
            last_modified: last_modified.unwrap_or_default(),
            storage_class,
            owner,
        })
    }
}

impl OssDeserialize for MultipartUpload {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut key = None;
        let mut upload_id = None;
        let mut initiated = None;
        let mut storage_class = String::new();
        for_each_child(reader, "Upload", |tag, empty, r| {
            match tag {
                "Key" => key = Some(text_or_empty(r, empty)?),
                "UploadId" => upload_id = Some(text_or_empty(r, empty)?),
                "Initiated" => initiated = Some(parse_timestamp(&text_or_empty(r, empty)?)?),
                "StorageClass" => storage_class = text_or_empty(r, empty)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(MultipartUpload {
            key: key.ok_or_else(|| XmlError::MissingElement("Upload/Key".to_string()))?,
            upload_id: upload_id
                .ok_or_else(|| XmlError::MissingElement("Upload/UploadId".to_string()))?,
            initiated: initiated.unwrap_or_default(),
            storage_class,
        })
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

impl OssDeserialize for CreateBucketConfiguration {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut config = CreateBucketConfiguration::default();
        for_each_child(reader, "CreateBucketConfiguration", |tag, empty, r| {
            match tag {
                "LocationConstraint" => config.location_constraint = optional_text(r, empty)?,
                "StorageClass" => config.storage_class = optional_text(r, empty)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(config)
    }
}

impl OssDeserialize for LoggingEnabled {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut target_bucket = None;
        let mut target_prefix = None;
        for_each_child(reader, "LoggingEnabled", |tag, empty, r| {
            match tag {
                "TargetBucket" => target_bucket = Some(text_or_empty(r, empty)?),
                "TargetPrefix" => target_prefix = Some(text_or_empty(r, empty)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(LoggingEnabled {
            target_bucket: target_bucket.ok_or_else(|| {
                XmlError::MissingElement("LoggingEnabled/TargetBucket".to_string())
            })?,
            target_prefix,
        })
    }
}

impl OssDeserialize for BucketLoggingStatus {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut logging_enabled = None;
        for_each_child(reader, "BucketLoggingStatus", |tag, empty, r| {
            match tag {
                "LoggingEnabled" if !empty => {
                    logging_enabled = Some(LoggingEnabled::deserialize_xml(r)?);
                }
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(BucketLoggingStatus { logging_enabled })
    }
}

impl OssDeserialize for WebsiteConfiguration {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut config = WebsiteConfiguration::default();
        for_each_child(reader, "WebsiteConfiguration", |tag, empty, r| {
            match (tag, empty) {
                ("IndexDocument", false) => {
                    let mut suffix = None;
                    for_each_child(r, "IndexDocument", |tag, empty, r| {
                        if tag == "Suffix" {
                            suffix = Some(text_or_empty(r, empty)?);
                            return Ok(true);
                        }
                        Ok(false)
                    })?;
                    config.index_document = suffix.map(|suffix| IndexDocument { suffix });
                }
                ("ErrorDocument", false) => {
                    let mut key = None;
                    for_each_child(r, "ErrorDocument", |tag, empty, r| {
                        if tag == "Key" {
                            key = Some(text_or_empty(r, empty)?);
                            return Ok(true);
                        }
                        Ok(false)
                    })?;
                    config.error_document = key.map(|key| ErrorDocument { key });
                }
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(config)
    }
}

impl OssDeserialize for CompletedMultipartUpload {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut parts = Vec::new();
        for_each_child(reader, "CompleteMultipartUpload", |tag, empty, r| {
            if tag != "Part" || empty {
                return Ok(false);
            }
            let mut part_number = None;
            let mut etag = String::new();
            for_each_child(r, "Part", |tag, empty, r| {
                match tag {
                    "PartNumber" => {
                        let text = text_or_empty(r, empty)?;
                        let number = text.trim().parse::<u32>().map_err(|e| {
                            XmlError::ParseError(format!("invalid PartNumber '{text}': {e}"))
                        })?;
                        part_number = Some(number);
                    }
                    "ETag" => etag = text_or_empty(r, empty)?,
                    _ => return Ok(false),
                }
                Ok(true)
            })?;
            parts.push(CompletedPart {
                part_number: part_number
                    .ok_or_else(|| XmlError::MissingElement("Part/PartNumber".to_string()))?,
                etag,
            });
            Ok(true)
        })?;
        Ok(CompletedMultipartUpload { parts })
    }
}

impl OssDeserialize for Delete {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut delete = Delete::default();
        for_each_child(reader, "Delete", |tag, empty, r| {
            match (tag, empty) {
                ("Quiet", _) => delete.quiet = parse_bool(&text_or_empty(r, empty)?)?,
                ("Object", false) => {
                    for_each_child(r, "Object", |tag, empty, r| {
                        if tag == "Key" {
                            delete.keys.push(text_or_empty(r, empty)?);
                            return Ok(true);
                        }
                        Ok(false)
                    })?;
                }
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(delete)
    }
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

impl OssDeserialize for GetBucketLocationOutput {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        Ok(GetBucketLocationOutput {
            location_constraint: read_text_content(reader)?,
        })
    }
}

impl OssDeserialize for GetBucketLoggingOutput {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        Ok(GetBucketLoggingOutput {
            status: BucketLoggingStatus::deserialize_xml(reader)?,
        })
    }
}

impl OssDeserialize for GetBucketWebsiteOutput {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        Ok(GetBucketWebsiteOutput {
            configuration: WebsiteConfiguration::deserialize_xml(reader)?,
        })
    }
}

impl OssDeserialize for ListBucketsOutput {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut output = ListBucketsOutput::default();
        for_each_child(reader, "ListAllMyBucketsResult", |tag, empty, r| {
            match (tag, empty) {
                ("Prefix", _) => output.prefix = optional_text(r, empty)?,
                ("Marker", _) => output.marker = optional_text(r, empty)?,
                ("MaxKeys", _) => output.max_keys = Some(parse_i64(&text_or_empty(r, empty)?)?),
                ("IsTruncated", _) => {
                    output.is_truncated = parse_bool(&text_or_empty(r, empty)?)?;
                }
                ("NextMarker", _) => output.next_marker = optional_text(r, empty)?,
                ("Owner", false) => output.owner = Owner::deserialize_xml(r)?,
                ("Buckets", false) => {
                    for_each_child(r, "Buckets", |tag, empty, r| {
                        if tag == "Bucket" && !empty {
                            output.buckets.push(Bucket::deserialize_xml(r)?);
                            return Ok(true);
                        }
                        Ok(false)
                    })?;
                }
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(output)
    }
}

impl OssDeserialize for ListObjectsOutput {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut output = ListObjectsOutput::default();
        for_each_child(reader, "ListBucketResult", |tag, empty, r| {
            match (tag, empty) {
                ("Name", _) => output.bucket = text_or_empty(r, empty)?,
                ("Prefix", _) => output.prefix = optional_text(r, empty)?,
                ("Marker", _) => output.marker = optional_text(r, empty)?,
                ("Delimiter", _) => output.delimiter = optional_text(r, empty)?,
                ("MaxKeys", _) => output.max_keys = parse_i64(&text_or_empty(r, empty)?)?,
                ("IsTruncated", _) => {
                    output.is_truncated = parse_bool(&text_or_empty(r, empty)?)?;
                }
                ("NextMarker", _) => output.next_marker = optional_text(r, empty)?,
                ("EncodingType", _) => {
                    output.encoding_type = EncodingType::from(text_or_empty(r, empty)?.as_str());
                }
                ("Contents", false) => output.contents.push(ObjectSummary::deserialize_xml(r)?),
                ("CommonPrefixes", false) => {
                    for_each_child(r, "CommonPrefixes", |tag, empty, r| {
                        if tag == "Prefix" {
                            output.common_prefixes.push(text_or_empty(r, empty)?);
                            return Ok(true);
                        }
                        Ok(false)
                    })?;
                }
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(output)
    }
}

impl OssDeserialize for ListMultipartUploadsOutput {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut output = ListMultipartUploadsOutput::default();
        for_each_child(reader, "ListMultipartUploadsResult", |tag, empty, r| {
            match (tag, empty) {
                ("Bucket", _) => output.bucket = text_or_empty(r, empty)?,
                ("Prefix", _) => output.prefix = optional_text(r, empty)?,
                ("KeyMarker", _) => output.key_marker = optional_text(r, empty)?,
                ("UploadIdMarker", _) => output.upload_id_marker = optional_text(r, empty)?,
                ("NextKeyMarker", _) => output.next_key_marker = optional_text(r, empty)?,
                ("NextUploadIdMarker", _) => {
                    output.next_upload_id_marker = optional_text(r, empty)?;
                }
                ("MaxUploads", _) => output.max_uploads = parse_i64(&text_or_empty(r, empty)?)?,
                ("IsTruncated", _) => {
                    output.is_truncated = parse_bool(&text_or_empty(r, empty)?)?;
                }
                ("EncodingType", _) => {
                    output.encoding_type = EncodingType::from(text_or_empty(r, empty)?.as_str());
                }
                ("Upload", false) => output.uploads.push(MultipartUpload::deserialize_xml(r)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(output)
    }
}

impl OssDeserialize for InitiateMultipartUploadOutput {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut output = InitiateMultipartUploadOutput::default();
        for_each_child(reader, "InitiateMultipartUploadResult", |tag, empty, r| {
            match tag {
                "Bucket" => output.bucket = text_or_empty(r, empty)?,
                "Key" => output.key = text_or_empty(r, empty)?,
                "UploadId" => output.upload_id = text_or_empty(r, empty)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(output)
    }
}

impl OssDeserialize for CompleteMultipartUploadOutput {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut output = CompleteMultipartUploadOutput::default();
        for_each_child(reader, "CompleteMultipartUploadResult", |tag, empty, r| {
            match tag {
                "Location" => output.location = text_or_empty(r, empty)?,
                "Bucket" => output.bucket = text_or_empty(r, empty)?,
                "Key" => output.key = text_or_empty(r, empty)?,
                "ETag" => output.etag = text_or_empty(r, empty)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(output)
    }
}

impl OssDeserialize for DeleteObjectsOutput {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut output = DeleteObjectsOutput::default();
        for_each_child(reader, "DeleteResult", |tag, empty, r| {
            match (tag, empty) {
                ("EncodingType", _) => {
                    output.encoding_type = EncodingType::from(text_or_empty(r, empty)?.as_str());
                }
                ("Deleted", false) => {
                    for_each_child(r, "Deleted", |tag, empty, r| {
                        if tag == "Key" {
                            output.deleted.push(text_or_empty(r, empty)?);
                            return Ok(true);
                        }
                        Ok(false)
                    })?;
                }
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(output)
    }
}
