//! `application/json` reader and writer over [`serde_json::Value`].

use std::borrow::Cow;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::serialization::{
    JSON_CONTENT_TYPE, Parsable, ParseNode, ParseNodeFactory, SerializationWriter,
    SerializationWriterFactory,
};
use crate::{Error, Result};

// ============================================================================
// Reader
// ============================================================================

/// A node of a JSON document.
#[derive(Debug, Clone)]
pub struct JsonParseNode<'a> {
    value: Cow<'a, Value>,
    path: String,
}

impl JsonParseNode<'static> {
    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error carrying the JSON path and position of the failure.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        let value: Value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            Error::deserialization(
                JSON_CONTENT_TYPE,
                err.path().to_string(),
                err.inner().to_string(),
            )
        })?;
        Ok(Self::new(value))
    }

    /// Wrap an owned value as a root node.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self {
            value: Cow::Owned(value),
            path: String::new(),
        }
    }
}

impl JsonParseNode<'_> {
    fn child_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.path)
        }
    }

    fn mismatch(&self, expected: &str) -> Error {
        let found = match self.value.as_ref() {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        };
        Error::deserialization(
            JSON_CONTENT_TYPE,
            self.path(),
            format!("expected {expected}, found {found}"),
        )
    }

    /// The underlying value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl ParseNode for JsonParseNode<'_> {
    fn media_type(&self) -> &str {
        JSON_CONTENT_TYPE
    }

    fn path(&self) -> &str {
        if self.path.is_empty() { "." } else { &self.path }
    }

    fn is_null(&self) -> bool {
        self.value.is_null()
    }

    fn child_node(&self, name: &str) -> Option<Box<dyn ParseNode + '_>> {
        let value = self.value.as_object()?.get(name)?;
        Some(Box::new(JsonParseNode {
            value: Cow::Borrowed(value),
            path: self.child_path(name),
        }))
    }

    fn fields(&self) -> Result<Vec<(String, Box<dyn ParseNode + '_>)>> {
        let object = match self.value.as_ref() {
            Value::Object(object) => object,
            Value::Null => return Ok(Vec::new()),
            _ => return Err(self.mismatch("an object")),
        };
        Ok(object
            .iter()
            .map(|(name, value)| {
                let node: Box<dyn ParseNode + '_> = Box::new(JsonParseNode {
                    value: Cow::Borrowed(value),
                    path: self.child_path(name),
                });
                (name.clone(), node)
            })
            .collect())
    }

    fn elements(&self) -> Result<Option<Vec<Box<dyn ParseNode + '_>>>> {
        let array = match self.value.as_ref() {
            Value::Array(array) => array,
            Value::Null => return Ok(None),
            _ => return Err(self.mismatch("an array")),
        };
        Ok(Some(
            array
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    let node: Box<dyn ParseNode + '_> = Box::new(JsonParseNode {
                        value: Cow::Borrowed(value),
                        path: format!("{}[{index}]", self.path),
                    });
                    node
                })
                .collect(),
        ))
    }

    fn string_value(&self) -> Result<Option<String>> {
        match self.value.as_ref() {
            Value::Null => Ok(None),
            Value::String(value) => Ok(Some(value.clone())),
            _ => Err(self.mismatch("a string")),
        }
    }

    fn bool_value(&self) -> Result<Option<bool>> {
        match self.value.as_ref() {
            Value::Null => Ok(None),
            Value::Bool(value) => Ok(Some(*value)),
            _ => Err(self.mismatch("a boolean")),
        }
    }

    fn i32_value(&self) -> Result<Option<i32>> {
        let Some(value) = self.i64_value()? else {
            return Ok(None);
        };
        i32::try_from(value).map(Some).map_err(|_| {
            Error::deserialization(
                JSON_CONTENT_TYPE,
                self.path(),
                format!("{value} does not fit in a 32-bit integer"),
            )
        })
    }

    fn i64_value(&self) -> Result<Option<i64>> {
        match self.value.as_ref() {
            Value::Null => Ok(None),
            Value::Number(number) => number
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.mismatch("an integer")),
            _ => Err(self.mismatch("an integer")),
        }
    }

    fn f64_value(&self) -> Result<Option<f64>> {
        match self.value.as_ref() {
            Value::Null => Ok(None),
            Value::Number(number) => Ok(number.as_f64()),
            _ => Err(self.mismatch("a number")),
        }
    }

    fn to_json_value(&self) -> Result<Value> {
        Ok(self.value.as_ref().clone())
    }
}

/// Creates [`JsonParseNode`] roots.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParseNodeFactory;

impl ParseNodeFactory for JsonParseNodeFactory {
    fn valid_content_type(&self) -> &str {
        JSON_CONTENT_TYPE
    }

    fn root_parse_node(&self, _content_type: &str, content: &[u8]) -> Result<Box<dyn ParseNode>> {
        Ok(Box::new(JsonParseNode::from_slice(content)?))
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Builds a [`serde_json::Value`] tree, then renders it.
#[derive(Debug, Default)]
pub struct JsonSerializationWriter {
    value: Option<Value>,
}

impl JsonSerializationWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&mut self, key: Option<&str>, value: Value) {
        let Some(key) = key else {
            self.value = Some(value);
            return;
        };
        if !matches!(self.value, Some(Value::Object(_))) {
            self.value = Some(Value::Object(Map::new()));
        }
        if let Some(Value::Object(object)) = &mut self.value {
            object.insert(key.to_string(), value);
        }
    }

    fn object_to_value(value: &dyn Parsable) -> Result<Value> {
        let mut nested = Self::new();
        value.serialize(&mut nested)?;
        Ok(nested.into_value().unwrap_or_else(|| Value::Object(Map::new())))
    }

    /// The tree written so far.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        self.value
    }
}

impl SerializationWriter for JsonSerializationWriter {
    fn write_string_value(&mut self, key: Option<&str>, value: Option<&str>) -> Result<()> {
        if let Some(value) = value {
            self.put(key, Value::String(value.to_string()));
        }
        Ok(())
    }

    fn write_bool_value(&mut self, key: Option<&str>, value: Option<bool>) -> Result<()> {
        if let Some(value) = value {
            self.put(key, Value::Bool(value));
        }
        Ok(())
    }

    fn write_i64_value(&mut self, key: Option<&str>, value: Option<i64>) -> Result<()> {
        if let Some(value) = value {
            self.put(key, Value::from(value));
        }
        Ok(())
    }

    fn write_f64_value(&mut self, key: Option<&str>, value: Option<f64>) -> Result<()> {
        if let Some(value) = value {
            let number = serde_json::Number::from_f64(value).ok_or_else(|| {
                Error::serialization(format!("{value} cannot be represented in JSON"))
            })?;
            self.put(key, Value::Number(number));
        }
        Ok(())
    }

    fn write_null_value(&mut self, key: Option<&str>) -> Result<()> {
        self.put(key, Value::Null);
        Ok(())
    }

    fn write_object_value(
        &mut self,
        key: Option<&str>,
        value: Option<&dyn Parsable>,
    ) -> Result<()> {
        if let Some(value) = value {
            let value = Self::object_to_value(value)?;
            self.put(key, value);
        }
        Ok(())
    }

    fn write_collection_of_object_values(
        &mut self,
        key: Option<&str>,
        values: Option<&[&dyn Parsable]>,
    ) -> Result<()> {
        if let Some(values) = values {
            let items = values
                .iter()
                .map(|value| Self::object_to_value(*value))
                .collect::<Result<Vec<_>>>()?;
            self.put(key, Value::Array(items));
        }
        Ok(())
    }

    fn write_collection_of_string_values(
        &mut self,
        key: Option<&str>,
        values: Option<&[String]>,
    ) -> Result<()> {
        if let Some(values) = values {
            let items = values.iter().cloned().map(Value::String).collect();
            self.put(key, Value::Array(items));
        }
        Ok(())
    }

    fn write_any_value(&mut self, key: Option<&str>, value: &Value) -> Result<()> {
        self.put(key, value.clone());
        Ok(())
    }

    fn content(&mut self) -> Result<Bytes> {
        let value = self
            .value
            .take()
            .unwrap_or_else(|| Value::Object(Map::new()));
        Ok(Bytes::from(serde_json::to_vec(&value)?))
    }
}

/// Creates [`JsonSerializationWriter`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializationWriterFactory;

impl SerializationWriterFactory for JsonSerializationWriterFactory {
    fn valid_content_type(&self) -> &str {
        JSON_CONTENT_TYPE
    }

    fn serialization_writer(&self, _content_type: &str) -> Result<Box<dyn SerializationWriter>> {
        Ok(Box::new(JsonSerializationWriter::new()))
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::json;

    use super::*;
    use crate::serialization::test_support::{AnyPet, Dog, Pet};

    fn write(value: &dyn Parsable) -> Value {
        let mut writer = JsonSerializationWriter::new();
        writer
            .write_object_value(None, Some(value))
            .expect("serializable");
        let bytes = writer.content().expect("content");
        serde_json::from_slice(&bytes).expect("valid JSON")
    }

    #[test]
    fn round_trip_keeps_additional_data() {
        let mut pet = Pet {
            id: Some("1".to_string()),
            name: Some("Rex".to_string()),
            tags: Some(vec!["a".to_string(), "b".to_string()]),
            ..Pet::default()
        };
        pet.additional_data
            .insert("serverAdded".to_string(), json!({"nested": [1, 2]}));

        let root = JsonParseNode::new(write(&pet));
        let_assert!(Ok(read) = Pet::create_from_discriminator_value(&root));
        check!(read == pet);
    }

    #[test]
    fn round_trip_polymorphic() {
        let mut dog = Dog {
            good_boy: Some(true),
            ..Dog::default()
        };
        dog.pet.id = Some("7".to_string());
        dog.pet
            .additional_data
            .insert("@odata.type".to_string(), json!("#example.dog"));

        let root = JsonParseNode::new(write(&dog));
        let_assert!(Ok(AnyPet::Dog(read)) = AnyPet::create_from_discriminator_value(&root));
        check!(read == dog);
    }

    #[test]
    fn none_fields_are_omitted() {
        let pet = Pet {
            id: Some("1".to_string()),
            ..Pet::default()
        };
        check!(write(&pet) == json!({"id": "1"}));
    }

    #[test]
    fn empty_object_writes_braces() {
        check!(write(&Pet::default()) == json!({}));
    }

    #[test]
    fn collection_of_objects() {
        let pets = [
            Pet {
                id: Some("1".to_string()),
                ..Pet::default()
            },
            Pet {
                id: Some("2".to_string()),
                ..Pet::default()
            },
        ];
        let mut writer = JsonSerializationWriter::new();
        let writer_ref: &mut dyn SerializationWriter = &mut writer;
        writer_ref
            .write_collection_of_objects(None, Some(&pets[..]))
            .expect("serializable");
        let bytes = writer.content().expect("content");
        check!(bytes.as_ref() == br#"[{"id":"1"},{"id":"2"}]"#);

        let root = JsonParseNode::from_slice(&bytes).expect("valid JSON");
        let node: &dyn ParseNode = &root;
        let_assert!(
            Ok(Some(read)) = node.collection_of_object_values(Pet::create_from_discriminator_value)
        );
        check!(read.len() == 2);
    }

    #[test]
    fn scalar_getters() {
        let root = JsonParseNode::from_slice(
            br#"{"s":"x","b":true,"i":42,"f":1.5,"n":null,"big":9999999999}"#,
        )
        .expect("valid JSON");
        let child = |name: &str| root.child_node(name).expect("present");

        check!(child("s").string_value().ok() == Some(Some("x".to_string())));
        check!(child("b").bool_value().ok() == Some(Some(true)));
        check!(child("i").i32_value().ok() == Some(Some(42)));
        check!(child("f").f64_value().ok() == Some(Some(1.5)));
        check!(child("n").string_value().ok() == Some(None));
        check!(child("n").is_null());
        check!(child("big").i32_value().is_err());
        check!(child("big").i64_value().ok() == Some(Some(9_999_999_999)));
        check!(root.child_node("missing").is_none());
    }

    #[test]
    fn element_paths() {
        let root = JsonParseNode::from_slice(br#"{"value":[{"id":1}]}"#).expect("valid JSON");
        let value = root.child_node("value").expect("present");
        let_assert!(Ok(Some(elements)) = value.elements());
        let_assert!(Some(id) = elements.first().and_then(|element| element.child_node("id")));
        let_assert!(Err(Error::Deserialization { path, .. }) = id.string_value());
        check!(path == "value[0].id");
    }

    #[test]
    fn syntax_error_is_deserialization_error() {
        let_assert!(
            Err(Error::Deserialization { media_type, .. }) = JsonParseNode::from_slice(b"not json")
        );
        check!(media_type == JSON_CONTENT_TYPE);
    }

    #[test]
    fn non_finite_float_is_rejected() {
        let mut writer = JsonSerializationWriter::new();
        check!(writer.write_f64_value(Some("x"), Some(f64::NAN)).is_err());
    }
}
