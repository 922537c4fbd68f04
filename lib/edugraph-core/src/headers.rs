//! Case-insensitive, insertion-ordered header store.
//!
//! Header names are canonicalized to lowercase on write. Each name maps to an ordered set of
//! values: adding a value already present is a no-op. Iteration follows the order in which
//! names were first added.

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::{Error, Result};

/// Header collection shared by requests and responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

/// Headers attached to an outgoing request.
pub type RequestHeaders = Headers;

/// Headers received with a response.
pub type ResponseHeaders = Headers;

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = normalize(name);
        self.entries.iter().position(|(key, _)| *key == name)
    }

    /// Adds a value under `name`, keeping values already present.
    ///
    /// Empty names are ignored.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if name.trim().is_empty() {
            return;
        }
        match self.position(name) {
            Some(index) => {
                if let Some((_, values)) = self.entries.get_mut(index)
                    && !values.contains(&value)
                {
                    values.push(value);
                }
            }
            None => self.entries.push((normalize(name), vec![value])),
        }
    }

    /// Adds every value under `name`.
    pub fn add_all_values<I, V>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        for value in values {
            self.add(name, value);
        }
    }

    /// Adds `value` only if `name` is not present yet.
    ///
    /// Returns `true` when the value was added.
    pub fn try_add(&mut self, name: &str, value: impl Into<String>) -> bool {
        if name.trim().is_empty() || self.contains_key(name) {
            return false;
        }
        self.entries.push((normalize(name), vec![value.into()]));
        true
    }

    /// Merges every header of `other` into this collection.
    pub fn add_all(&mut self, other: &Self) {
        for (name, values) in &other.entries {
            self.add_all_values(name, values.iter().cloned());
        }
    }

    /// Replaces all values of `name` with a single value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.remove(name);
        self.add(name, value);
    }

    /// Removes `name` and all of its values.
    ///
    /// Returns the removed values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let index = self.position(name)?;
        Some(self.entries.remove(index).1)
    }

    /// Removes a single value of `name`; the name goes away with its last value.
    ///
    /// Returns `true` when the value was present.
    pub fn remove_value(&mut self, name: &str, value: &str) -> bool {
        let Some(index) = self.position(name) else {
            return false;
        };
        let Some((_, values)) = self.entries.get_mut(index) else {
            return false;
        };
        let before = values.len();
        values.retain(|existing| existing != value);
        let removed = values.len() != before;
        if values.is_empty() {
            self.entries.remove(index);
        }
        removed
    }

    /// Removes every header.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All values of `name`, in insertion order.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        let index = self.position(name)?;
        self.entries.get(index).map(|(_, values)| values.as_slice())
    }

    /// First value of `name`.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns `true` if `name` is present.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Header names, lowercase, in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(name, values)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert into an [`http::HeaderMap`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error for names or values that are not valid HTTP.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, values) in &self.entries {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| Error::configuration(format!("invalid header name '{name}': {err}")))?;
            for value in values {
                let header_value = HeaderValue::from_str(value).map_err(|err| {
                    Error::configuration(format!("invalid value for header '{name}': {err}"))
                })?;
                map.append(header_name.clone(), header_value);
            }
        }
        Ok(map)
    }
}

impl From<&HeaderMap> for Headers {
    fn from(map: &HeaderMap) -> Self {
        let mut headers = Self::new();
        for (name, value) in map {
            if let Ok(value) = value.to_str() {
                headers.add(name.as_str(), value);
            }
        }
        headers
    }
}

impl<N, V> FromIterator<(N, V)> for Headers
where
    N: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.add(name.as_ref(), value);
        }
        headers
    }
}
