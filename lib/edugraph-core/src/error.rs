//! Error types for edugraph.

use std::any::Any;
use std::fmt;

use bytes::Bytes;
use derive_more::{Display, Error, From};

use crate::ResponseHeaders;

// ============================================================================
// Typed Error Payloads
// ============================================================================

/// A typed error body produced by an error mapping factory.
///
/// Every [`Parsable`](crate::Parsable) model that also implements [`fmt::Display`]
/// can be carried inside an [`ApiError`]. Use [`ApiError::payload`] to get the
/// concrete type back.
pub trait ErrorPayload: fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Upcast for downcasting to the concrete payload type.
    fn as_any(&self) -> &dyn Any;
}

impl<T> ErrorPayload for T
where
    T: crate::Parsable + fmt::Display,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Error raised for a response with a status code of 400 or above.
///
/// Carries the status, the response headers, the raw body when no typed payload could
/// be produced, and the typed payload when an error mapping matched.
#[derive(Debug)]
pub struct ApiError {
    status: u16,
    message: String,
    headers: ResponseHeaders,
    body: Option<Bytes>,
    payload: Option<Box<dyn ErrorPayload>>,
}

impl ApiError {
    /// Create an API error without a typed payload.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            headers: ResponseHeaders::new(),
            body: None,
            payload: None,
        }
    }

    /// Create an API error around a typed payload.
    ///
    /// The payload's display text becomes the error message.
    #[must_use]
    pub fn with_payload(status: u16, payload: Box<dyn ErrorPayload>) -> Self {
        Self {
            status,
            message: payload.to_string(),
            headers: ResponseHeaders::new(),
            body: None,
            payload: Some(payload),
        }
    }

    /// Attach the response headers.
    #[must_use]
    pub fn headers(mut self, headers: ResponseHeaders) -> Self {
        self.headers = headers;
        self
    }

    /// Attach the raw response body.
    #[must_use]
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Response headers.
    #[must_use]
    pub fn response_headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    /// Raw response body, kept when no typed payload was produced.
    #[must_use]
    pub fn raw_body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns `true` if a typed payload was produced by an error mapping.
    #[must_use]
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// The typed payload, if it is a `T`.
    #[must_use]
    pub fn payload<T: 'static>(&self) -> Option<&T> {
        self.payload
            .as_deref()
            .and_then(|payload| payload.as_any().downcast_ref::<T>())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error {}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for edugraph operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Malformed URL template.
    #[display("invalid URL template at {position}: {message}")]
    #[from(skip)]
    InvalidTemplate {
        /// Byte offset of the offending character.
        position: usize,
        /// What is wrong.
        message: String,
    },

    /// Invalid client or request configuration.
    #[display("configuration error: {_0}")]
    #[from(skip)]
    Configuration(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Outbound body could not be written.
    #[display("serialization error: {_0}")]
    #[from(skip)]
    Serialization(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// Query or form serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// The authentication provider failed; the request was never sent.
    #[display("authentication error: {_0}")]
    #[from(skip)]
    Authentication(#[error(not(source))] String),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Too many redirects.
    #[display("too many redirects ({count} exceeded max of {max})")]
    #[from(skip)]
    TooManyRedirects {
        /// Number of redirects followed.
        count: usize,
        /// Maximum allowed redirects.
        max: usize,
    },

    /// Invalid redirect response.
    #[display("invalid redirect: {_0}")]
    #[from(skip)]
    InvalidRedirect(#[error(not(source))] String),

    /// Response with a 4xx or 5xx status.
    #[display("{_0}")]
    #[from]
    Api(ApiError),

    /// Response body could not be parsed.
    #[display("deserialization error ({media_type}) at '{path}': {message}")]
    #[from(skip)]
    Deserialization {
        /// Media type of the reader in use.
        media_type: String,
        /// Position of the failure (JSON path for JSON bodies).
        path: String,
        /// Error message.
        message: String,
    },

    /// The cancellation token fired.
    #[display("request cancelled")]
    #[from(skip)]
    Cancelled,
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid template error.
    #[must_use]
    pub fn invalid_template(position: usize, message: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            position,
            message: message.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a deserialization error.
    #[must_use]
    pub fn deserialization(
        media_type: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Deserialization {
            media_type: media_type.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the request was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` for network, DNS, TLS, timeout and redirect failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Connection(_)
                | Self::Tls(_)
                | Self::Timeout
                | Self::TooManyRedirects { .. }
                | Self::InvalidRedirect(_)
        )
    }

    /// Returns the API error if the server answered with an error status.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this is an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status()),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
