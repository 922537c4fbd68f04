//! OData error envelope: `{ "error": { "code", "message", "target", "details", "innerError" } }`.

use std::fmt;
use std::sync::LazyLock;

use edugraph_core::serialization::{AdditionalData, FieldDeserializers, field, parse_object};

use crate::{
    ErrorMappings, ErrorPayload, Parsable, ParseNode, Result, SerializationWriter, StatusPattern,
};

/// Top-level error body returned by the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ODataError {
    /// The main error.
    pub error: Option<MainError>,
    /// Undeclared properties.
    pub additional_data: AdditionalData,
}

impl ODataError {
    /// Build from a parse node.
    pub fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }

    /// Error factory producing an [`ODataError`] payload.
    pub fn error_factory(node: &dyn ParseNode) -> Result<Box<dyn ErrorPayload>> {
        let error = Self::create_from_discriminator_value(node)?;
        Ok(Box::new(error))
    }

    /// The error code, e.g. `Forbidden`.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.error.as_ref().and_then(|error| error.code.as_deref())
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.error.as_ref().and_then(|error| error.message.as_deref())
    }
}

impl fmt::Display for ODataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code(), self.message()) {
            (Some(code), Some(message)) => write!(f, "{code}: {message}"),
            (Some(text), None) | (None, Some(text)) => f.write_str(text),
            (None, None) => f.write_str("unknown service error"),
        }
    }
}

impl Parsable for ODataError {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![field("error", |target: &mut Self, node| {
            target.error = node.object_value(MainError::create_from_discriminator_value)?;
            Ok(())
        })]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_object(Some("error"), self.error.as_ref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

/// The `error` object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MainError {
    /// Service-defined error code.
    pub code: Option<String>,
    /// Human-readable message.
    pub message: Option<String>,
    /// Target of the error.
    pub target: Option<String>,
    /// Nested details.
    pub details: Option<Vec<ErrorDetails>>,
    /// Diagnostics.
    pub inner_error: Option<InnerError>,
    /// Undeclared properties.
    pub additional_data: AdditionalData,
}

impl MainError {
    /// Build from a parse node.
    pub fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }

    /// Services spell the key `innerError` or `innererror`.
    fn read_inner_error(&mut self, node: &dyn ParseNode) -> Result<()> {
        self.inner_error = node.object_value(InnerError::create_from_discriminator_value)?;
        Ok(())
    }
}

impl Parsable for MainError {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![
            field("code", |target: &mut Self, node| {
                target.code = node.string_value()?;
                Ok(())
            }),
            field("message", |target: &mut Self, node| {
                target.message = node.string_value()?;
                Ok(())
            }),
            field("target", |target: &mut Self, node| {
                target.target = node.string_value()?;
                Ok(())
            }),
            field("details", |target: &mut Self, node| {
                target.details =
                    node.collection_of_object_values(ErrorDetails::create_from_discriminator_value)?;
                Ok(())
            }),
            field("innerError", Self::read_inner_error),
            field("innererror", Self::read_inner_error),
        ]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("code"), self.code.as_deref())?;
        writer.write_string_value(Some("message"), self.message.as_deref())?;
        writer.write_string_value(Some("target"), self.target.as_deref())?;
        writer.write_collection_of_objects(Some("details"), self.details.as_deref())?;
        writer.write_object(Some("innerError"), self.inner_error.as_ref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

/// One entry of `details`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorDetails {
    /// Error code.
    pub code: Option<String>,
    /// Message.
    pub message: Option<String>,
    /// Target.
    pub target: Option<String>,
    /// Undeclared properties.
    pub additional_data: AdditionalData,
}

impl ErrorDetails {
    /// Build from a parse node.
    pub fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }
}

impl Parsable for ErrorDetails {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![
            field("code", |target: &mut Self, node| {
                target.code = node.string_value()?;
                Ok(())
            }),
            field("message", |target: &mut Self, node| {
                target.message = node.string_value()?;
                Ok(())
            }),
            field("target", |target: &mut Self, node| {
                target.target = node.string_value()?;
                Ok(())
            }),
        ]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("code"), self.code.as_deref())?;
        writer.write_string_value(Some("message"), self.message.as_deref())?;
        writer.write_string_value(Some("target"), self.target.as_deref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

/// Request diagnostics attached by the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InnerError {
    /// Request id.
    pub request_id: Option<String>,
    /// Client request id.
    pub client_request_id: Option<String>,
    /// Date of the request.
    pub date: Option<String>,
    /// Undeclared properties.
    pub additional_data: AdditionalData,
}

impl InnerError {
    /// Build from a parse node.
    pub fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }
}

impl Parsable for InnerError {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![
            field("request-id", |target: &mut Self, node| {
                target.request_id = node.string_value()?;
                Ok(())
            }),
            field("client-request-id", |target: &mut Self, node| {
                target.client_request_id = node.string_value()?;
                Ok(())
            }),
            field("date", |target: &mut Self, node| {
                target.date = node.string_value()?;
                Ok(())
            }),
        ]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("request-id"), self.request_id.as_deref())?;
        writer.write_string_value(Some("client-request-id"), self.client_request_id.as_deref())?;
        writer.write_string_value(Some("date"), self.date.as_deref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

static ODATA_ERRORS: LazyLock<ErrorMappings> = LazyLock::new(|| {
    let mut mappings = ErrorMappings::new();
    mappings.insert(StatusPattern::Any, ODataError::error_factory);
    mappings
});

/// Error mappings shared by every education endpoint: any error status reads an
/// [`ODataError`].
#[must_use]
pub fn odata_error_mappings() -> &'static ErrorMappings {
    &ODATA_ERRORS
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use edugraph_core::serialization::JsonParseNode;

    use super::*;

    #[test]
    fn reads_envelope() {
        let body = br#"{"error":{"code":"Forbidden","message":"Access denied","details":[{"code":"x","message":"y"}],"innerError":{"request-id":"r1","date":"2024-01-01T00:00:00"}}}"#;
        let_assert!(Ok(root) = JsonParseNode::from_slice(body));
        let_assert!(Ok(error) = ODataError::create_from_discriminator_value(&root));

        check!(error.code() == Some("Forbidden"));
        check!(error.to_string() == "Forbidden: Access denied");
        let_assert!(Some(main) = &error.error);
        check!(main.details.as_ref().map(Vec::len) == Some(1));
        check!(main.inner_error.as_ref().and_then(|inner| inner.request_id.as_deref()) == Some("r1"));
    }

    #[test]
    fn inner_error_accepts_both_spellings() {
        for body in [
            &br#"{"error":{"code":"Forbidden","message":"no","innererror":{"request-id":"r1"}}}"#[..],
            &br#"{"error":{"code":"Forbidden","message":"no","innerError":{"request-id":"r1"}}}"#[..],
        ] {
            let_assert!(Ok(root) = JsonParseNode::from_slice(body));
            let_assert!(Ok(error) = ODataError::create_from_discriminator_value(&root));
            let_assert!(Some(main) = &error.error);
            check!(main.inner_error.as_ref().and_then(|inner| inner.request_id.as_deref()) == Some("r1"));
            check!(main.additional_data.is_empty());
        }
    }

    #[test]
    fn every_error_status_maps() {
        let mappings = odata_error_mappings();
        check!(mappings.find(403).is_some());
        check!(mappings.find(503).is_some());
        check!(mappings.find(200).is_none());
    }
}
