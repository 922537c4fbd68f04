//! Media type to factory registries.
//!
//! Registries are assembled once through their builder and shared behind an [`Arc`]
//! afterwards; there is no way to register a factory on a built registry.
//!
//! ```
//! use edugraph_core::serialization::{JsonParseNodeFactory, ParseNodeFactoryRegistry};
//!
//! let registry = ParseNodeFactoryRegistry::builder()
//!     .register(JsonParseNodeFactory)
//!     .build();
//!
//! let node = registry
//!     .root_parse_node("application/vnd.example+json; charset=utf-8", br#"{"id":"1"}"#)
//!     .expect("JSON is registered");
//! assert!(node.child_node("id").is_some());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::serialization::{
    FormSerializationWriterFactory, JsonParseNodeFactory, JsonSerializationWriterFactory,
    ParseNode, SerializationWriter, TextParseNodeFactory, TextSerializationWriterFactory,
};
use crate::{Error, Result};

/// Produces parse node roots for one media type.
pub trait ParseNodeFactory: Send + Sync {
    /// The media type handled.
    fn valid_content_type(&self) -> &str;

    /// Parse `content` into a root node.
    fn root_parse_node(&self, content_type: &str, content: &[u8]) -> Result<Box<dyn ParseNode>>;
}

/// Produces writers for one media type.
pub trait SerializationWriterFactory: Send + Sync {
    /// The media type handled.
    fn valid_content_type(&self) -> &str;

    /// A fresh writer.
    fn serialization_writer(&self, content_type: &str) -> Result<Box<dyn SerializationWriter>>;
}

/// Lowercase the media type and drop its parameters.
///
/// `Application/JSON; charset=utf-8` yields `application/json`.
#[must_use]
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// `application/vnd.example+json` falls back to `application/json`.
fn structured_suffix_fallback(content_type: &str) -> Option<String> {
    let (kind, subtype) = content_type.split_once('/')?;
    let (_, suffix) = subtype.rsplit_once('+')?;
    Some(format!("{kind}/{suffix}"))
}

fn lookup<'a, F: ?Sized>(
    factories: &'a BTreeMap<String, Arc<F>>,
    content_type: &str,
) -> Result<&'a Arc<F>> {
    let normalized = normalize_content_type(content_type);
    if normalized.is_empty() {
        return Err(Error::configuration("content type cannot be empty"));
    }
    factories
        .get(&normalized)
        .or_else(|| {
            structured_suffix_fallback(&normalized).and_then(|fallback| factories.get(&fallback))
        })
        .ok_or_else(|| {
            Error::configuration(format!(
                "content type {normalized} does not have a factory registered"
            ))
        })
}

// ============================================================================
// Readers
// ============================================================================

/// Reader factories keyed by media type.
#[derive(Clone, Default)]
pub struct ParseNodeFactoryRegistry {
    factories: BTreeMap<String, Arc<dyn ParseNodeFactory>>,
}

impl ParseNodeFactoryRegistry {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> ParseNodeFactoryRegistryBuilder {
        ParseNodeFactoryRegistryBuilder::default()
    }

    /// JSON and text readers.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::builder()
            .register(JsonParseNodeFactory)
            .register(TextParseNodeFactory)
            .build()
    }

    /// Registered media types.
    pub fn content_types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Returns `true` if a reader handles `content_type`.
    #[must_use]
    pub fn supports(&self, content_type: &str) -> bool {
        lookup(&self.factories, content_type).is_ok()
    }

    /// Parse `content` with the reader for `content_type`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no reader is registered, or the reader's
    /// deserialization error.
    pub fn root_parse_node(&self, content_type: &str, content: &[u8]) -> Result<Box<dyn ParseNode>> {
        let factory = lookup(&self.factories, content_type)?;
        factory.root_parse_node(&normalize_content_type(content_type), content)
    }
}

impl fmt::Debug for ParseNodeFactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseNodeFactoryRegistry")
            .field("content_types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`ParseNodeFactoryRegistry`].
#[derive(Default)]
pub struct ParseNodeFactoryRegistryBuilder {
    factories: BTreeMap<String, Arc<dyn ParseNodeFactory>>,
}

impl ParseNodeFactoryRegistryBuilder {
    /// Register a reader under its media type, replacing any previous one.
    #[must_use]
    pub fn register(mut self, factory: impl ParseNodeFactory + 'static) -> Self {
        let content_type = normalize_content_type(factory.valid_content_type());
        self.factories.insert(content_type, Arc::new(factory));
        self
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> ParseNodeFactoryRegistry {
        ParseNodeFactoryRegistry {
            factories: self.factories,
        }
    }
}

// ============================================================================
// Writers
// ============================================================================

/// Writer factories keyed by media type.
#[derive(Clone, Default)]
pub struct SerializationWriterFactoryRegistry {
    factories: BTreeMap<String, Arc<dyn SerializationWriterFactory>>,
}

impl SerializationWriterFactoryRegistry {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> SerializationWriterFactoryRegistryBuilder {
        SerializationWriterFactoryRegistryBuilder::default()
    }

    /// JSON, text and form writers.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::builder()
            .register(JsonSerializationWriterFactory)
            .register(TextSerializationWriterFactory)
            .register(FormSerializationWriterFactory)
            .build()
    }

    /// Registered media types.
    pub fn content_types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// A fresh writer for `content_type`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no writer is registered.
    pub fn serialization_writer(&self, content_type: &str) -> Result<Box<dyn SerializationWriter>> {
        let factory = lookup(&self.factories, content_type)?;
        factory.serialization_writer(&normalize_content_type(content_type))
    }
}

impl fmt::Debug for SerializationWriterFactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationWriterFactoryRegistry")
            .field("content_types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`SerializationWriterFactoryRegistry`].
#[derive(Default)]
pub struct SerializationWriterFactoryRegistryBuilder {
    factories: BTreeMap<String, Arc<dyn SerializationWriterFactory>>,
}

impl SerializationWriterFactoryRegistryBuilder {
    /// Register a writer under its media type, replacing any previous one.
    #[must_use]
    pub fn register(mut self, factory: impl SerializationWriterFactory + 'static) -> Self {
        let content_type = normalize_content_type(factory.valid_content_type());
        self.factories.insert(content_type, Arc::new(factory));
        self
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> SerializationWriterFactoryRegistry {
        SerializationWriterFactoryRegistry {
            factories: self.factories,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::serialization::JSON_CONTENT_TYPE;

    #[test]
    fn normalizes_content_types() {
        check!(normalize_content_type("Application/JSON; charset=utf-8") == "application/json");
        check!(normalize_content_type(" text/plain ") == "text/plain");
    }

    #[test]
    fn vendor_types_fall_back_to_suffix() {
        let registry = ParseNodeFactoryRegistry::with_defaults();
        check!(registry.supports("application/vnd.api+json"));
        check!(registry.supports("application/json;odata.metadata=minimal"));
        check!(!registry.supports("application/xml"));
    }

    #[test]
    fn unknown_content_type_is_configuration_error() {
        let registry = SerializationWriterFactoryRegistry::with_defaults();
        let_assert!(
            Err(Error::Configuration(message)) = registry.serialization_writer("application/xml")
        );
        check!(message.contains("application/xml"));
    }

    #[test]
    fn empty_content_type_is_rejected() {
        let registry = ParseNodeFactoryRegistry::with_defaults();
        let_assert!(Err(Error::Configuration(_)) = registry.root_parse_node("", b"{}"));
    }

    #[test]
    fn registered_types_are_listed() {
        let registry = SerializationWriterFactoryRegistry::with_defaults();
        check!(
            registry.content_types().collect::<Vec<_>>()
                == vec![JSON_CONTENT_TYPE, "application/x-www-form-urlencoded", "text/plain"]
        );
    }
}
