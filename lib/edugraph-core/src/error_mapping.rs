//! Status code to typed error payload mapping.
//!
//! Lookup order for a status of 400 or above: the exact code, then its class (`4XX`,
//! `5XX`), then the catch-all `XXX`.

use std::fmt;
use std::str::FromStr;

use crate::serialization::{ParseNode, ParseNodeFactoryRegistry};
use crate::{ApiError, Error, ErrorPayload, Response, Result};

/// Status selector of an error mapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusPattern {
    /// One status code, e.g. `404`.
    Exact(u16),
    /// A status class, e.g. `4XX` is `Class(4)`.
    Class(u8),
    /// Every error status: `XXX`.
    Any,
}

impl StatusPattern {
    /// Returns `true` if `status` is selected.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(code) => *code == status,
            Self::Class(class) => status / 100 == u16::from(*class),
            Self::Any => (400..600).contains(&status),
        }
    }
}

impl FromStr for StatusPattern {
    type Err = Error;

    fn from_str(pattern: &str) -> Result<Self> {
        let invalid = || Error::configuration(format!("invalid error mapping pattern '{pattern}'"));
        let upper = pattern.trim().to_ascii_uppercase();
        match upper.as_bytes() {
            b"XXX" => Ok(Self::Any),
            [class @ (b'4' | b'5'), b'X', b'X'] => Ok(Self::Class(class - b'0')),
            [_, _, _] => {
                let code = upper.parse::<u16>().map_err(|_| invalid())?;
                if (400..600).contains(&code) {
                    Ok(Self::Exact(code))
                } else {
                    Err(invalid())
                }
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for StatusPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(code) => write!(f, "{code}"),
            Self::Class(class) => write!(f, "{class}XX"),
            Self::Any => f.write_str("XXX"),
        }
    }
}

/// Builds a typed error payload from the response body.
pub type ErrorFactory = fn(&dyn ParseNode) -> Result<Box<dyn ErrorPayload>>;

/// Ordered list of (pattern, factory) entries.
#[derive(Clone, Default)]
pub struct ErrorMappings {
    entries: Vec<(StatusPattern, ErrorFactory)>,
}

impl ErrorMappings {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `pattern` is not a code in 400–599, `4XX`, `5XX`
    /// or `XXX`.
    pub fn with(mut self, pattern: &str, factory: ErrorFactory) -> Result<Self> {
        let pattern = pattern.parse()?;
        self.insert(pattern, factory);
        Ok(self)
    }

    /// Add an entry, replacing one with the same pattern.
    pub fn insert(&mut self, pattern: StatusPattern, factory: ErrorFactory) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == pattern) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((pattern, factory)),
        }
    }

    /// The factory selected for `status`, if any.
    #[must_use]
    pub fn find(&self, status: u16) -> Option<ErrorFactory> {
        if status < 400 {
            return None;
        }
        let class = u8::try_from(status / 100).ok()?;
        [
            StatusPattern::Exact(status),
            StatusPattern::Class(class),
            StatusPattern::Any,
        ]
        .iter()
        .find_map(|wanted| {
            self.entries
                .iter()
                .find(|(pattern, _)| pattern == wanted && pattern.matches(status))
                .map(|(_, factory)| *factory)
        })
    }

    /// Patterns in insertion order.
    pub fn patterns(&self) -> impl Iterator<Item = StatusPattern> + '_ {
        self.entries.iter().map(|(pattern, _)| *pattern)
    }

    /// Returns `true` if there is no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ErrorMappings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(pattern, _)| pattern.to_string()))
            .finish()
    }
}

/// Turn an error response into an [`Error::Api`].
///
/// The typed payload is produced when a mapping matches and the body can be read; otherwise
/// the error carries the raw body.
#[must_use]
pub fn error_from_response(
    response: Response,
    mappings: &ErrorMappings,
    parsers: &ParseNodeFactoryRegistry,
) -> Error {
    let status = response.status();
    let content_type = response.content_type();
    let no_content = response.has_no_content();
    let (_, headers, body) = response.into_parts();

    let Some(factory) = mappings.find(status) else {
        tracing::debug!(status, "no error factory registered");
        let message = "the server returned an unexpected status code and no error factory is registered for this code";
        return ApiError::new(status, message).headers(headers).body(body).into();
    };

    let Some(content_type) = content_type.filter(|_| !no_content) else {
        return ApiError::new(
            status,
            "the server returned an unexpected status code with no response body",
        )
        .headers(headers)
        .into();
    };

    let payload = parsers
        .root_parse_node(&content_type, &body)
        .and_then(|node| factory(node.as_ref()));
    match payload {
        Ok(payload) => ApiError::with_payload(status, payload).headers(headers).into(),
        Err(err) => {
            tracing::debug!(status, error = %err, "error body could not be read");
            ApiError::new(
                status,
                format!("the server returned an unexpected status code and the error body could not be read: {err}"),
            )
            .headers(headers)
            .body(body)
            .into()
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use bytes::Bytes;

    use super::*;
    use crate::ResponseHeaders;
    use crate::serialization::{
        AdditionalData, FieldDeserializers, Parsable, SerializationWriter, field, parse_object,
    };

    #[derive(Debug, Default)]
    struct Problem {
        source: &'static str,
        code: Option<String>,
        additional_data: AdditionalData,
    }

    impl fmt::Display for Problem {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}: {}", self.source, self.code.as_deref().unwrap_or("unknown"))
        }
    }

    impl Parsable for Problem {
        fn field_deserializers() -> FieldDeserializers<Self> {
            vec![field("code", |problem: &mut Self, node| {
                problem.code = node.string_value()?;
                Ok(())
            })]
        }

        fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
            writer.write_string_value(Some("code"), self.code.as_deref())
        }

        fn additional_data(&self) -> &AdditionalData {
            &self.additional_data
        }

        fn additional_data_mut(&mut self) -> &mut AdditionalData {
            &mut self.additional_data
        }
    }

    fn problem(source: &'static str, node: &dyn ParseNode) -> Result<Box<dyn ErrorPayload>> {
        let mut problem: Problem = parse_object(node)?;
        problem.source = source;
        Ok(Box::new(problem))
    }

    fn exact(node: &dyn ParseNode) -> Result<Box<dyn ErrorPayload>> {
        problem("exact", node)
    }

    fn class(node: &dyn ParseNode) -> Result<Box<dyn ErrorPayload>> {
        problem("class", node)
    }

    fn any(node: &dyn ParseNode) -> Result<Box<dyn ErrorPayload>> {
        problem("any", node)
    }

    fn mappings() -> ErrorMappings {
        ErrorMappings::new()
            .with("404", exact)
            .and_then(|m| m.with("4XX", class))
            .and_then(|m| m.with("XXX", any))
            .expect("valid patterns")
    }

    fn json_response(status: u16, body: &'static str) -> Response {
        let headers: ResponseHeaders = [("Content-Type", "application/json")].into_iter().collect();
        Response::new(status, headers, Bytes::from_static(body.as_bytes()))
    }

    fn source_of(err: &Error) -> Option<&'static str> {
        err.api_error()?.payload::<Problem>().map(|problem| problem.source)
    }

    #[test]
    fn parses_patterns() {
        check!("404".parse::<StatusPattern>().ok() == Some(StatusPattern::Exact(404)));
        check!("4XX".parse::<StatusPattern>().ok() == Some(StatusPattern::Class(4)));
        check!("5xx".parse::<StatusPattern>().ok() == Some(StatusPattern::Class(5)));
        check!("XXX".parse::<StatusPattern>().ok() == Some(StatusPattern::Any));

        for invalid in ["", "200", "3XX", "4X", "40X", "abc", "1000"] {
            check!(invalid.parse::<StatusPattern>().is_err(), "pattern {invalid:?}");
        }
    }

    #[test]
    fn precedence_is_exact_then_class_then_any() {
        let parsers = ParseNodeFactoryRegistry::with_defaults();
        let mappings = mappings();

        let err = error_from_response(json_response(404, r#"{"code":"a"}"#), &mappings, &parsers);
        check!(source_of(&err) == Some("exact"));

        let err = error_from_response(json_response(401, r#"{"code":"b"}"#), &mappings, &parsers);
        check!(source_of(&err) == Some("class"));

        let err = error_from_response(json_response(503, r#"{"code":"c"}"#), &mappings, &parsers);
        check!(source_of(&err) == Some("any"));
        check!(err.status() == Some(503));
        check!(err.to_string() == "API error 503: any: c");
    }

    #[test]
    fn declaration_order_does_not_matter() {
        let mappings = ErrorMappings::new()
            .with("XXX", any)
            .and_then(|m| m.with("4XX", class))
            .and_then(|m| m.with("404", exact))
            .expect("valid patterns");

        let parsers = ParseNodeFactoryRegistry::with_defaults();
        let err = error_from_response(json_response(404, "{}"), &mappings, &parsers);
        check!(source_of(&err) == Some("exact"));
    }

    #[test]
    fn no_mapping_keeps_raw_body() {
        let parsers = ParseNodeFactoryRegistry::with_defaults();
        let mappings = ErrorMappings::new().with("404", exact).expect("valid");

        let err = error_from_response(json_response(500, "boom"), &mappings, &parsers);
        let_assert!(Some(api) = err.api_error());
        check!(api.status() == 500);
        check!(!api.has_payload());
        check!(api.raw_body().map(|body| body.as_ref()) == Some(&b"boom"[..]));
        check!(api.message().contains("no error factory is registered"));
    }

    #[test]
    fn empty_error_body() {
        let parsers = ParseNodeFactoryRegistry::with_defaults();
        let response = Response::new(403, ResponseHeaders::new(), Bytes::new());

        let err = error_from_response(response, &mappings(), &parsers);
        let_assert!(Some(api) = err.api_error());
        check!(api.message().contains("no response body"));
    }

    #[test]
    fn unreadable_error_body_is_kept_raw() {
        let parsers = ParseNodeFactoryRegistry::with_defaults();
        let err = error_from_response(json_response(400, "<html>"), &mappings(), &parsers);

        let_assert!(Some(api) = err.api_error());
        check!(!api.has_payload());
        check!(api.raw_body().is_some());
    }

    #[test]
    fn success_status_has_no_factory() {
        check!(mappings().find(200).is_none());
        check!(mappings().find(302).is_none());
    }
}
