//! `text/plain` reader and writer for scalar payloads.

use bytes::Bytes;
use serde_json::Value;

use crate::serialization::{
    AdditionalData, Parsable, ParseNode, ParseNodeFactory, SerializationWriter,
    SerializationWriterFactory, TEXT_CONTENT_TYPE,
};
use crate::{Error, Result};

fn unsupported(what: &str) -> Error {
    Error::serialization(format!("{TEXT_CONTENT_TYPE} does not support {what}"))
}

/// A scalar text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextParseNode {
    text: String,
}

impl TextParseNode {
    /// Wrap a text body. Surrounding quotes are removed.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let text = text.trim();
        let text = text
            .strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
            .unwrap_or(text);
        Self {
            text: text.to_string(),
        }
    }

    fn parse_error(&self, expected: &str) -> Error {
        Error::deserialization(
            TEXT_CONTENT_TYPE,
            ".",
            format!("expected {expected}, found '{}'", self.text),
        )
    }
}

impl ParseNode for TextParseNode {
    fn media_type(&self) -> &str {
        TEXT_CONTENT_TYPE
    }

    fn path(&self) -> &str {
        "."
    }

    fn is_null(&self) -> bool {
        self.text.is_empty()
    }

    fn child_node(&self, _name: &str) -> Option<Box<dyn ParseNode + '_>> {
        None
    }

    fn fields(&self) -> Result<Vec<(String, Box<dyn ParseNode + '_>)>> {
        Err(self.parse_error("an object"))
    }

    fn elements(&self) -> Result<Option<Vec<Box<dyn ParseNode + '_>>>> {
        Err(self.parse_error("a collection"))
    }

    fn string_value(&self) -> Result<Option<String>> {
        Ok((!self.text.is_empty()).then(|| self.text.clone()))
    }

    fn bool_value(&self) -> Result<Option<bool>> {
        if self.text.is_empty() {
            return Ok(None);
        }
        self.text
            .parse()
            .map(Some)
            .map_err(|_| self.parse_error("a boolean"))
    }

    fn i32_value(&self) -> Result<Option<i32>> {
        if self.text.is_empty() {
            return Ok(None);
        }
        self.text
            .parse()
            .map(Some)
            .map_err(|_| self.parse_error("a 32-bit integer"))
    }

    fn i64_value(&self) -> Result<Option<i64>> {
        if self.text.is_empty() {
            return Ok(None);
        }
        self.text
            .parse()
            .map(Some)
            .map_err(|_| self.parse_error("an integer"))
    }

    fn f64_value(&self) -> Result<Option<f64>> {
        if self.text.is_empty() {
            return Ok(None);
        }
        self.text
            .parse()
            .map(Some)
            .map_err(|_| self.parse_error("a number"))
    }

    fn to_json_value(&self) -> Result<Value> {
        Ok(Value::String(self.text.clone()))
    }
}

/// Creates [`TextParseNode`] roots.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextParseNodeFactory;

impl ParseNodeFactory for TextParseNodeFactory {
    fn valid_content_type(&self) -> &str {
        TEXT_CONTENT_TYPE
    }

    fn root_parse_node(&self, _content_type: &str, content: &[u8]) -> Result<Box<dyn ParseNode>> {
        let text = std::str::from_utf8(content).map_err(|err| {
            Error::deserialization(TEXT_CONTENT_TYPE, ".", err.to_string())
        })?;
        Ok(Box::new(TextParseNode::new(text)))
    }
}

/// Writes a single scalar as text.
#[derive(Debug, Default)]
pub struct TextSerializationWriter {
    text: Option<String>,
}

impl TextSerializationWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&mut self, key: Option<&str>, text: String) -> Result<()> {
        if key.is_some() {
            return Err(unsupported("named values"));
        }
        if self.text.is_some() {
            return Err(Error::serialization("a text writer holds a single value"));
        }
        self.text = Some(text);
        Ok(())
    }
}

impl SerializationWriter for TextSerializationWriter {
    fn write_string_value(&mut self, key: Option<&str>, value: Option<&str>) -> Result<()> {
        value.map_or(Ok(()), |value| self.put(key, value.to_string()))
    }

    fn write_bool_value(&mut self, key: Option<&str>, value: Option<bool>) -> Result<()> {
        value.map_or(Ok(()), |value| self.put(key, value.to_string()))
    }

    fn write_i64_value(&mut self, key: Option<&str>, value: Option<i64>) -> Result<()> {
        value.map_or(Ok(()), |value| self.put(key, value.to_string()))
    }

    fn write_f64_value(&mut self, key: Option<&str>, value: Option<f64>) -> Result<()> {
        value.map_or(Ok(()), |value| self.put(key, value.to_string()))
    }

    fn write_null_value(&mut self, key: Option<&str>) -> Result<()> {
        self.put(key, "null".to_string())
    }

    fn write_object_value(
        &mut self,
        _key: Option<&str>,
        _value: Option<&dyn Parsable>,
    ) -> Result<()> {
        Err(unsupported("objects"))
    }

    fn write_collection_of_object_values(
        &mut self,
        _key: Option<&str>,
        _values: Option<&[&dyn Parsable]>,
    ) -> Result<()> {
        Err(unsupported("collections"))
    }

    fn write_collection_of_string_values(
        &mut self,
        _key: Option<&str>,
        _values: Option<&[String]>,
    ) -> Result<()> {
        Err(unsupported("collections"))
    }

    fn write_any_value(&mut self, key: Option<&str>, value: &Value) -> Result<()> {
        match value {
            Value::String(text) => self.put(key, text.clone()),
            Value::Bool(_) | Value::Number(_) | Value::Null => self.put(key, value.to_string()),
            Value::Array(_) | Value::Object(_) => Err(unsupported("structured values")),
        }
    }

    fn write_additional_data(&mut self, data: &AdditionalData) -> Result<()> {
        if data.is_empty() {
            Ok(())
        } else {
            Err(unsupported("additional data"))
        }
    }

    fn content(&mut self) -> Result<Bytes> {
        Ok(Bytes::from(self.text.take().unwrap_or_default()))
    }
}

/// Creates [`TextSerializationWriter`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSerializationWriterFactory;

impl SerializationWriterFactory for TextSerializationWriterFactory {
    fn valid_content_type(&self) -> &str {
        TEXT_CONTENT_TYPE
    }

    fn serialization_writer(&self, _content_type: &str) -> Result<Box<dyn SerializationWriter>> {
        Ok(Box::new(TextSerializationWriter::new()))
    }
}
