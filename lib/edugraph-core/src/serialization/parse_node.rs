//! Reader side of the serialization contract.

use crate::Result;
use crate::serialization::{Parsable, ParsableEnum, ParsableFactory, Primitive};

/// A node of a parsed response body.
///
/// Scalar getters return `Ok(None)` for null or absent values and a deserialization error
/// when the value has another type.
pub trait ParseNode: Send + Sync {
    /// Media type of the reader that produced this node.
    fn media_type(&self) -> &str;

    /// Position of this node in the document, used in error reports.
    fn path(&self) -> &str;

    /// Returns `true` if the node holds no value.
    fn is_null(&self) -> bool;

    /// Child node for a property, if present.
    fn child_node(&self, name: &str) -> Option<Box<dyn ParseNode + '_>>;

    /// Every property of an object node, in document order.
    fn fields(&self) -> Result<Vec<(String, Box<dyn ParseNode + '_>)>>;

    /// Every element of a collection node. Null yields `None`.
    fn elements(&self) -> Result<Option<Vec<Box<dyn ParseNode + '_>>>>;

    /// String value.
    fn string_value(&self) -> Result<Option<String>>;

    /// Boolean value.
    fn bool_value(&self) -> Result<Option<bool>>;

    /// 32-bit integer value.
    fn i32_value(&self) -> Result<Option<i32>>;

    /// 64-bit integer value.
    fn i64_value(&self) -> Result<Option<i64>>;

    /// Floating point value.
    fn f64_value(&self) -> Result<Option<f64>>;

    /// Raw enum member name.
    fn enum_value(&self) -> Result<Option<String>> {
        self.string_value()
    }

    /// The node as an untyped JSON value, used for additional data.
    fn to_json_value(&self) -> Result<serde_json::Value>;
}

impl dyn ParseNode + '_ {
    /// Materialize an object through `factory`. Null yields `None`.
    pub fn object_value<T: Parsable>(&self, factory: ParsableFactory<T>) -> Result<Option<T>> {
        if self.is_null() {
            return Ok(None);
        }
        factory(self).map(Some)
    }

    /// Materialize a collection of objects, each element through `factory`.
    pub fn collection_of_object_values<T: Parsable>(
        &self,
        factory: ParsableFactory<T>,
    ) -> Result<Option<Vec<T>>> {
        let Some(elements) = self.elements()? else {
            return Ok(None);
        };
        elements
            .iter()
            .map(|element| factory(element.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Read a scalar.
    pub fn primitive_value<P: Primitive>(&self) -> Result<Option<P>> {
        P::read(self)
    }

    /// Read a collection of scalars; null elements are skipped.
    pub fn collection_of_primitive_values<P: Primitive>(&self) -> Result<Option<Vec<P>>> {
        let Some(elements) = self.elements()? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(elements.len());
        for element in &elements {
            if let Some(value) = P::read(element.as_ref())? {
                values.push(value);
            }
        }
        Ok(Some(values))
    }

    /// Read an enum member.
    pub fn enum_value_of<E: ParsableEnum>(&self) -> Result<Option<E>> {
        Ok(self.enum_value()?.map(|value| E::parse(&value)))
    }

    /// Read a collection of enum members.
    pub fn collection_of_enum_values<E: ParsableEnum>(&self) -> Result<Option<Vec<E>>> {
        let Some(elements) = self.elements()? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(elements.len());
        for element in &elements {
            if let Some(value) = element.enum_value()? {
                values.push(E::parse(&value));
            }
        }
        Ok(Some(values))
    }
}
