//! `application/x-www-form-urlencoded` writer for flat models.
//!
//! Pairs are collected in write order and encoded with `serde_html_form`; string
//! collections become repeated keys. Nested objects are rejected.

use bytes::Bytes;
use serde_json::Value;

use crate::serialization::{
    FORM_CONTENT_TYPE, Parsable, SerializationWriter, SerializationWriterFactory,
};
use crate::{Error, Result};

/// Collects `key=value` pairs.
#[derive(Debug, Default)]
pub struct FormSerializationWriter {
    pairs: Vec<(String, String)>,
    depth: usize,
}

impl FormSerializationWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, key: Option<&str>, value: String) -> Result<()> {
        let key = key.ok_or_else(|| {
            Error::serialization(format!("{FORM_CONTENT_TYPE} values need a name"))
        })?;
        self.pairs.push((key.to_string(), value));
        Ok(())
    }
}

impl SerializationWriter for FormSerializationWriter {
    fn write_string_value(&mut self, key: Option<&str>, value: Option<&str>) -> Result<()> {
        value.map_or(Ok(()), |value| self.push(key, value.to_string()))
    }

    fn write_bool_value(&mut self, key: Option<&str>, value: Option<bool>) -> Result<()> {
        value.map_or(Ok(()), |value| self.push(key, value.to_string()))
    }

    fn write_i64_value(&mut self, key: Option<&str>, value: Option<i64>) -> Result<()> {
        value.map_or(Ok(()), |value| self.push(key, value.to_string()))
    }

    fn write_f64_value(&mut self, key: Option<&str>, value: Option<f64>) -> Result<()> {
        value.map_or(Ok(()), |value| self.push(key, value.to_string()))
    }

    fn write_null_value(&mut self, key: Option<&str>) -> Result<()> {
        self.push(key, "null".to_string())
    }

    fn write_object_value(
        &mut self,
        key: Option<&str>,
        value: Option<&dyn Parsable>,
    ) -> Result<()> {
        if key.is_some() || self.depth > 0 {
            return Err(Error::serialization(format!(
                "{FORM_CONTENT_TYPE} does not support nested objects"
            )));
        }
        let Some(value) = value else {
            return Ok(());
        };
        self.depth += 1;
        let result = value.serialize(self);
        self.depth -= 1;
        result
    }

    fn write_collection_of_object_values(
        &mut self,
        _key: Option<&str>,
        _values: Option<&[&dyn Parsable]>,
    ) -> Result<()> {
        Err(Error::serialization(format!(
            "{FORM_CONTENT_TYPE} does not support collections of objects"
        )))
    }

    fn write_collection_of_string_values(
        &mut self,
        key: Option<&str>,
        values: Option<&[String]>,
    ) -> Result<()> {
        for value in values.unwrap_or_default() {
            self.push(key, value.clone())?;
        }
        Ok(())
    }

    fn write_any_value(&mut self, key: Option<&str>, value: &Value) -> Result<()> {
        match value {
            Value::String(text) => self.push(key, text.clone()),
            Value::Bool(_) | Value::Number(_) | Value::Null => self.push(key, value.to_string()),
            Value::Array(_) | Value::Object(_) => Err(Error::serialization(format!(
                "{FORM_CONTENT_TYPE} does not support structured values"
            ))),
        }
    }

    fn content(&mut self) -> Result<Bytes> {
        let pairs = std::mem::take(&mut self.pairs);
        let encoded = serde_html_form::to_string(&pairs)?;
        Ok(Bytes::from(encoded))
    }
}

/// Creates [`FormSerializationWriter`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormSerializationWriterFactory;

impl SerializationWriterFactory for FormSerializationWriterFactory {
    fn valid_content_type(&self) -> &str {
        FORM_CONTENT_TYPE
    }

    fn serialization_writer(&self, _content_type: &str) -> Result<Box<dyn SerializationWriter>> {
        Ok(Box::new(FormSerializationWriter::new()))
    }
}
