//! OSS error documents and XML error types.
//!
//! The server renders failures with [`error_to_xml`]; the client parses them
//! back with [`ErrorResponse::from_xml`].

use std::io;

use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Errors that can occur during OSS XML serialization or deserialization.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// An unexpected XML element was encountered.
    #[error("unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// An error parsing a value from XML text content.
    #[error("failed to parse value: {0}")]
    ParseError(String),
}

/// Fields of an OSS `<Error>` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error code, e.g. `NoSuchBucket`.
    pub code: String,
    /// Human readable message.
    pub message: String,
    /// Request id assigned by the service.
    pub request_id: String,
    /// Host that served the request.
    pub host_id: String,
    /// Bucket or object the error refers to.
    pub resource: Option<String>,
}

impl ErrorResponse {
    /// Parse an `<Error>` document.
    ///
    /// Unknown children are ignored.
    ///
    /// # Errors
    ///
    /// Returns `XmlError` when the body is not well-formed or has no `Code`.
    pub fn from_xml(xml: &[u8]) -> Result<Self, XmlError> {
        let mut reader = Reader::from_reader(xml);

        let mut response = Self::default();
        let mut current: Option<String> = None;
        let mut saw_code = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    current = Some(name);
                }
                Event::Text(e) => {
                    let decoded = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    let text = quick_xml::escape::unescape(&decoded)
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    if let Some(field) = current.as_deref() {
                        response.push_text(field, &text);
                    }
                    saw_code |= current.as_deref() == Some("Code");
                }
                Event::GeneralRef(e) => {
                    let name = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    if let Some(resolved) = quick_xml::escape::resolve_predefined_entity(&name) {
                        if let Some(field) = current.as_deref() {
                            response.push_text(field, resolved);
                        }
                    }
                }
                Event::End(_) => current = None,
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_code {
            return Err(XmlError::MissingElement("Error/Code".to_string()));
        }
        Ok(response)
    }

    fn push_text(&mut self, field: &str, text: &str) {
        match field {
            "Code" => self.code.push_str(text),
            "Message" => self.message.push_str(text),
            "RequestId" => self.request_id.push_str(text),
            "HostId" => self.host_id.push_str(text),
            "Resource" => self.resource.get_or_insert_with(String::new).push_str(text),
            _ => {}
        }
    }
}

/// Format an OSS error as XML.
///
/// # Example output
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Error>
///   <Code>NoSuchBucket</Code>
///   <Message>The specified bucket does not exist.</Message>
///   <RequestId>5C3D8B2A1F0E4D6C7B8A9F01</RequestId>
///   <HostId>mybucket.oss-cn-hangzhou.aliyuncs.com</HostId>
///   <BucketName>mybucket</BucketName>
/// </Error>
/// ```
pub fn error_to_xml(
    code: &str,
    message: &str,
    resource: Option<&str>,
    request_id: &str,
    host_id: &str,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);
    if let Err(e) = write_error_xml(&mut buf, code, message, resource, request_id, host_id) {
        tracing::error!(error = %e, "failed to serialize OSS error XML");
        buf.clear();
    }
    buf
}

fn write_error_xml(
    buf: &mut Vec<u8>,
    code: &str,
    message: &str,
    resource: Option<&str>,
    request_id: &str,
    host_id: &str,
) -> io::Result<()> {
    let mut writer = Writer::new(buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer.create_element("Error").write_inner_content(|w| {
        w.create_element("Code")
            .write_text_content(BytesText::new(code))?;
        w.create_element("Message")
            .write_text_content(BytesText::new(message))?;
        w.create_element("RequestId")
            .write_text_content(BytesText::new(request_id))?;
        w.create_element("HostId")
            .write_text_content(BytesText::new(host_id))?;
        if let Some(res) = resource {
            w.create_element("Resource")
                .write_text_content(BytesText::new(res))?;
        }
        Ok(())
    })?;

    Ok(())
}
