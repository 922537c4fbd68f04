//! Writer side of the serialization contract.

use bytes::Bytes;

use crate::Result;
use crate::serialization::{AdditionalData, Parsable, ParsableEnum, Primitive};

/// Drains models into bytes of one media type.
///
/// `key` is the property name inside the enclosing object, `None` at the root or inside a
/// collection. `None` values are skipped entirely.
pub trait SerializationWriter: Send {
    /// Write a string.
    fn write_string_value(&mut self, key: Option<&str>, value: Option<&str>) -> Result<()>;

    /// Write a boolean.
    fn write_bool_value(&mut self, key: Option<&str>, value: Option<bool>) -> Result<()>;

    /// Write an integer.
    fn write_i64_value(&mut self, key: Option<&str>, value: Option<i64>) -> Result<()>;

    /// Write a floating point number.
    fn write_f64_value(&mut self, key: Option<&str>, value: Option<f64>) -> Result<()>;

    /// Write an explicit null.
    fn write_null_value(&mut self, key: Option<&str>) -> Result<()>;

    /// Write a nested object.
    fn write_object_value(&mut self, key: Option<&str>, value: Option<&dyn Parsable>)
    -> Result<()>;

    /// Write a collection of objects.
    fn write_collection_of_object_values(
        &mut self,
        key: Option<&str>,
        values: Option<&[&dyn Parsable]>,
    ) -> Result<()>;

    /// Write a collection of strings.
    fn write_collection_of_string_values(
        &mut self,
        key: Option<&str>,
        values: Option<&[String]>,
    ) -> Result<()>;

    /// Write an untyped value.
    fn write_any_value(&mut self, key: Option<&str>, value: &serde_json::Value) -> Result<()>;

    /// Write every undeclared property.
    fn write_additional_data(&mut self, data: &AdditionalData) -> Result<()> {
        for (key, value) in data {
            self.write_any_value(Some(key), value)?;
        }
        Ok(())
    }

    /// The serialized bytes.
    fn content(&mut self) -> Result<Bytes>;
}

impl dyn SerializationWriter + '_ {
    /// Write an enum member by its wire name.
    pub fn write_enum_value<E: ParsableEnum>(
        &mut self,
        key: Option<&str>,
        value: Option<&E>,
    ) -> Result<()> {
        self.write_string_value(key, value.map(ParsableEnum::as_str))
    }

    /// Write a collection of enum members.
    pub fn write_collection_of_enum_values<E: ParsableEnum>(
        &mut self,
        key: Option<&str>,
        values: Option<&[E]>,
    ) -> Result<()> {
        let names = values.map(|values| {
            values
                .iter()
                .map(|value| value.as_str().to_string())
                .collect::<Vec<_>>()
        });
        self.write_collection_of_string_values(key, names.as_deref())
    }

    /// Write a typed nested object.
    pub fn write_object<T: Parsable>(&mut self, key: Option<&str>, value: Option<&T>) -> Result<()> {
        self.write_object_value(key, value.map(|value| value as &dyn Parsable))
    }

    /// Write a typed collection of objects.
    pub fn write_collection_of_objects<T: Parsable>(
        &mut self,
        key: Option<&str>,
        values: Option<&[T]>,
    ) -> Result<()> {
        let items = values.map(|values| {
            values
                .iter()
                .map(|value| value as &dyn Parsable)
                .collect::<Vec<_>>()
        });
        self.write_collection_of_object_values(key, items.as_deref())
    }

    /// Write a scalar.
    pub fn write_primitive<P: Primitive>(&mut self, key: Option<&str>, value: Option<&P>) -> Result<()> {
        match value {
            Some(value) => value.write(self, key),
            None => Ok(()),
        }
    }
}
