//! Media-type keyed serialization.
//!
//! Models implement [`Parsable`]: they list their field deserializers and serialize
//! themselves by driving a [`SerializationWriter`]. Readers produce a [`ParseNode`] tree
//! from bytes. Both sides are looked up by media type through the registries in
//! [`registry`].
//!
//! Fields a model does not declare land in its [`AdditionalData`], which is written back
//! out on serialization, so server-added properties (and the `@odata.type` discriminator)
//! survive a round trip.

use std::fmt;

mod form;
mod json;
mod parse_node;
pub mod registry;
mod text;
mod writer;

pub use form::{FormSerializationWriter, FormSerializationWriterFactory};
pub use json::{
    JsonParseNode, JsonParseNodeFactory, JsonSerializationWriter, JsonSerializationWriterFactory,
};
pub use parse_node::ParseNode;
pub use registry::{
    ParseNodeFactory, ParseNodeFactoryRegistry, SerializationWriterFactory,
    SerializationWriterFactoryRegistry, normalize_content_type,
};
pub use text::{
    TextParseNode, TextParseNodeFactory, TextSerializationWriter, TextSerializationWriterFactory,
};
pub use writer::SerializationWriter;

use crate::Result;

/// `application/json`
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// `text/plain`
pub const TEXT_CONTENT_TYPE: &str = "text/plain";
/// `application/x-www-form-urlencoded`
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// `application/octet-stream`
pub const OCTET_STREAM_CONTENT_TYPE: &str = "application/octet-stream";

/// Name of the discriminator property.
pub const ODATA_TYPE_KEY: &str = "@odata.type";

/// Properties a model does not declare, kept verbatim.
pub type AdditionalData = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Parsable
// ============================================================================

/// Assigns one field of `T` from a parse node.
pub type FieldDeserializer<T> = Box<dyn Fn(&mut T, &dyn ParseNode) -> Result<()>>;

/// Field name to deserializer, as reported by [`Parsable::field_deserializers`].
pub type FieldDeserializers<T> = Vec<(&'static str, FieldDeserializer<T>)>;

/// Builds a value of `T` from a parse node, resolving the discriminator if `T` is polymorphic.
pub type ParsableFactory<T> = fn(&dyn ParseNode) -> Result<T>;

/// A model that can be read from a [`ParseNode`] and written to a [`SerializationWriter`].
pub trait Parsable: fmt::Debug + Send + Sync + 'static {
    /// The declared fields with their deserializers.
    fn field_deserializers() -> FieldDeserializers<Self>
    where
        Self: Sized;

    /// Write the declared fields, then the additional data.
    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()>;

    /// Properties not declared by the model.
    fn additional_data(&self) -> &AdditionalData;

    /// Mutable access to the undeclared properties.
    fn additional_data_mut(&mut self) -> &mut AdditionalData;
}

/// Pair a field name with its deserializer.
pub fn field<T, F>(name: &'static str, deserialize: F) -> (&'static str, FieldDeserializer<T>)
where
    F: Fn(&mut T, &dyn ParseNode) -> Result<()> + 'static,
{
    (name, Box::new(deserialize))
}

/// Reuse the deserializers of an embedded base model.
///
/// `project` reaches the base inside the derived model.
pub fn inherit<B, T>(
    base: FieldDeserializers<B>,
    project: fn(&mut T) -> &mut B,
) -> FieldDeserializers<T>
where
    B: 'static,
    T: 'static,
{
    base.into_iter()
        .map(|(name, deserialize)| {
            let deserialize: FieldDeserializer<T> =
                Box::new(move |target: &mut T, node: &dyn ParseNode| {
                    deserialize(project(target), node)
                });
            (name, deserialize)
        })
        .collect()
}

/// Assign every field of `node` to `target`.
///
/// Declared fields go through their deserializer, the rest into the additional data.
pub fn populate<T: Parsable>(target: &mut T, node: &dyn ParseNode) -> Result<()> {
    let deserializers = T::field_deserializers();
    for (name, child) in node.fields()? {
        match deserializers.iter().find(|(field, _)| *field == name) {
            Some((_, deserialize)) => deserialize(target, child.as_ref())?,
            None => {
                let value = child.to_json_value()?;
                target.additional_data_mut().insert(name, value);
            }
        }
    }
    Ok(())
}

/// Build a `T` from its default value and the fields of `node`.
pub fn parse_object<T: Parsable + Default>(node: &dyn ParseNode) -> Result<T> {
    let mut value = T::default();
    populate(&mut value, node)?;
    Ok(value)
}

// ============================================================================
// Discriminators
// ============================================================================

/// Discriminator value to concrete factory, for one polymorphic family.
///
/// Names are written without the leading `#`.
pub type DiscriminatorTable<T> = &'static [(&'static str, ParsableFactory<T>)];

/// Read the discriminator of `node`, without the leading `#`.
pub fn discriminator_value(node: &dyn ParseNode) -> Result<Option<String>> {
    let Some(child) = node.child_node(ODATA_TYPE_KEY) else {
        return Ok(None);
    };
    Ok(child
        .string_value()?
        .map(|value| value.trim_start_matches('#').to_string()))
}

/// Construct through the table entry matching the discriminator of `node`.
///
/// Missing or unknown discriminator values use `base`.
pub fn resolve_discriminator<T>(
    node: &dyn ParseNode,
    table: DiscriminatorTable<T>,
    base: ParsableFactory<T>,
) -> Result<T> {
    let factory = discriminator_value(node)?
        .and_then(|name| {
            table
                .iter()
                .find(|(candidate, _)| *candidate == name)
                .map(|(_, factory)| *factory)
        })
        .unwrap_or(base);
    factory(node)
}

// ============================================================================
// Enums and Primitives
// ============================================================================

/// A string-valued enumeration.
pub trait ParsableEnum: Sized + Send + Sync + 'static {
    /// Parse a wire value. Unknown values map to a forward-compatible fallback.
    fn parse(value: &str) -> Self;

    /// The wire value.
    fn as_str(&self) -> &'static str;
}

/// A scalar readable from a parse node and writable to a writer.
pub trait Primitive: Sized + Send + Sync + 'static {
    /// Read the node as this scalar.
    fn read(node: &dyn ParseNode) -> Result<Option<Self>>;

    /// Write the scalar.
    fn write(&self, writer: &mut dyn SerializationWriter, key: Option<&str>) -> Result<()>;
}

impl Primitive for String {
    fn read(node: &dyn ParseNode) -> Result<Option<Self>> {
        node.string_value()
    }

    fn write(&self, writer: &mut dyn SerializationWriter, key: Option<&str>) -> Result<()> {
        writer.write_string_value(key, Some(self))
    }
}

impl Primitive for bool {
    fn read(node: &dyn ParseNode) -> Result<Option<Self>> {
        node.bool_value()
    }

    fn write(&self, writer: &mut dyn SerializationWriter, key: Option<&str>) -> Result<()> {
        writer.write_bool_value(key, Some(*self))
    }
}

impl Primitive for i32 {
    fn read(node: &dyn ParseNode) -> Result<Option<Self>> {
        node.i32_value()
    }

    fn write(&self, writer: &mut dyn SerializationWriter, key: Option<&str>) -> Result<()> {
        writer.write_i64_value(key, Some(i64::from(*self)))
    }
}

impl Primitive for i64 {
    fn read(node: &dyn ParseNode) -> Result<Option<Self>> {
        node.i64_value()
    }

    fn write(&self, writer: &mut dyn SerializationWriter, key: Option<&str>) -> Result<()> {
        writer.write_i64_value(key, Some(*self))
    }
}

impl Primitive for f64 {
    fn read(node: &dyn ParseNode) -> Result<Option<Self>> {
        node.f64_value()
    }

    fn write(&self, writer: &mut dyn SerializationWriter, key: Option<&str>) -> Result<()> {
        writer.write_f64_value(key, Some(*self))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A small polymorphic family used by the serialization tests.

    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Pet {
        pub id: Option<String>,
        pub name: Option<String>,
        pub tags: Option<Vec<String>>,
        pub additional_data: AdditionalData,
    }

    impl Pet {
        pub fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
            parse_object(node)
        }
    }

    impl Parsable for Pet {
        fn field_deserializers() -> FieldDeserializers<Self> {
            vec![
                field("id", |pet: &mut Self, node| {
                    pet.id = node.string_value()?;
                    Ok(())
                }),
                field("name", |pet: &mut Self, node| {
                    pet.name = node.string_value()?;
                    Ok(())
                }),
                field("tags", |pet: &mut Self, node| {
                    pet.tags = node.collection_of_primitive_values()?;
                    Ok(())
                }),
            ]
        }

        fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
            writer.write_string_value(Some("id"), self.id.as_deref())?;
            writer.write_string_value(Some("name"), self.name.as_deref())?;
            writer.write_collection_of_string_values(Some("tags"), self.tags.as_deref())?;
            writer.write_additional_data(&self.additional_data)
        }

        fn additional_data(&self) -> &AdditionalData {
            &self.additional_data
        }

        fn additional_data_mut(&mut self) -> &mut AdditionalData {
            &mut self.additional_data
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Dog {
        pub pet: Pet,
        pub good_boy: Option<bool>,
    }

    impl Parsable for Dog {
        fn field_deserializers() -> FieldDeserializers<Self> {
            let mut fields = inherit(Pet::field_deserializers(), |dog: &mut Self| &mut dog.pet);
            fields.push(field("goodBoy", |dog: &mut Self, node| {
                dog.good_boy = node.bool_value()?;
                Ok(())
            }));
            fields
        }

        fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
            writer.write_string_value(Some("id"), self.pet.id.as_deref())?;
            writer.write_string_value(Some("name"), self.pet.name.as_deref())?;
            writer.write_collection_of_string_values(Some("tags"), self.pet.tags.as_deref())?;
            writer.write_bool_value(Some("goodBoy"), self.good_boy)?;
            writer.write_additional_data(&self.pet.additional_data)
        }

        fn additional_data(&self) -> &AdditionalData {
            &self.pet.additional_data
        }

        fn additional_data_mut(&mut self) -> &mut AdditionalData {
            &mut self.pet.additional_data
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum AnyPet {
        Pet(Pet),
        Dog(Dog),
    }

    const PETS: DiscriminatorTable<AnyPet> = &[("example.dog", |node| {
        parse_object(node).map(AnyPet::Dog)
    })];

    impl AnyPet {
        pub fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
            resolve_discriminator(node, PETS, |node| parse_object(node).map(AnyPet::Pet))
        }

        fn pet(&self) -> &Pet {
            match self {
                Self::Pet(pet) => pet,
                Self::Dog(dog) => &dog.pet,
            }
        }

        fn pet_mut(&mut self) -> &mut Pet {
            match self {
                Self::Pet(pet) => pet,
                Self::Dog(dog) => &mut dog.pet,
            }
        }
    }

    impl Default for AnyPet {
        fn default() -> Self {
            Self::Pet(Pet::default())
        }
    }

    impl Parsable for AnyPet {
        fn field_deserializers() -> FieldDeserializers<Self> {
            inherit(Pet::field_deserializers(), Self::pet_mut)
        }

        fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
            match self {
                Self::Pet(pet) => pet.serialize(writer),
                Self::Dog(dog) => dog.serialize(writer),
            }
        }

        fn additional_data(&self) -> &AdditionalData {
            &self.pet().additional_data
        }

        fn additional_data_mut(&mut self) -> &mut AdditionalData {
            &mut self.pet_mut().additional_data
        }
    }
}
