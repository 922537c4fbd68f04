//! Transport-level HTTP request.
//!
//! [`Request`] is what flows through the middleware pipeline: the fully expanded URL,
//! headers, the serialized body, and [`http::Extensions`] carrying the per-call
//! [`RequestOptions`](crate::RequestOptions) so middleware can read them.
//!
//! # Example
//!
//! ```
//! use edugraph_core::{Request, Method};
//! use bytes::Bytes;
//!
//! let url = "https://g.example/education/me".parse().expect("valid URL");
//! let request = Request::<Bytes>::builder(Method::Get, url)
//!     .header("Accept", "application/json")
//!     .query("$select", "id")
//!     .build();
//!
//! assert_eq!(request.url().as_str(), "https://g.example/education/me?%24select=id");
//! ```

use bytes::Bytes;
use http::Extensions;

use crate::{Method, RequestHeaders};

/// An HTTP request with method, URL, headers, optional body and extensions.
#[derive(Debug, Clone)]
pub struct Request<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: RequestHeaders,
    body: Option<B>,
    extensions: Extensions,
}

impl<B> Request<B> {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder<B> {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Mutable access to the URL.
    #[must_use]
    pub fn url_mut(&mut self) -> &mut url::Url {
        &mut self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &RequestHeaders {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut RequestHeaders {
        &mut self.headers
    }

    /// First value of a header, by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.first(name)
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Request extensions; holds the per-call options.
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to extensions.
    #[must_use]
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Consume into (method, url, headers, body, extensions).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, RequestHeaders, Option<B>, Extensions) {
        (
            self.method,
            self.url,
            self.headers,
            self.body,
            self.extensions,
        )
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: RequestHeaders,
    body: Option<B>,
    extensions: Extensions,
}

impl<B> RequestBuilder<B> {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: RequestHeaders::new(),
            body: None,
            extensions: Extensions::new(),
        }
    }

    /// Adds a header value.
    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Merges a header collection.
    #[must_use]
    pub fn headers(mut self, headers: &RequestHeaders) -> Self {
        self.headers.add_all(headers);
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Replaces the extensions.
    #[must_use]
    pub fn extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request<B> {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            extensions: self.extensions,
        }
    }
}

impl Request<Bytes> {
    /// Convert into an [`http::Request`], carrying the extensions along.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a header is not valid HTTP.
    pub fn into_http(self) -> crate::Result<http::Request<Bytes>> {
        let header_map = self.headers.to_header_map()?;
        let mut builder = http::Request::builder()
            .method(http::Method::from(self.method))
            .uri(self.url.as_str());
        if let Some(headers) = builder.headers_mut() {
            *headers = header_map;
        }
        let mut request = builder
            .body(self.body.unwrap_or_default())
            .map_err(|err| crate::Error::configuration(err.to_string()))?;
        *request.extensions_mut() = self.extensions;
        Ok(request)
    }
}
