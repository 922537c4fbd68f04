//! Transport-neutral description of one outbound call.
//!
//! A [`RequestInformation`] is assembled in a fixed order (method, template and path
//! parameters, caller headers, caller options, query parameters, body) and handed to a
//! [`RequestAdapter`](crate::RequestAdapter). From then on it is read-only.
//!
//! ```
//! use edugraph_core::{Method, ParameterMap, RequestInformation};
//!
//! let mut path = ParameterMap::new();
//! path.insert("baseurl".into(), "https://g.example".into());
//! path.insert("educationUser%2Did".into(), "u1".into());
//!
//! let mut info = RequestInformation::new(
//!     Method::Get,
//!     "{+baseurl}/education/users/{educationUser%2Did}{?%24select}",
//!     path,
//! );
//! info.set_query_parameter("%24select", vec!["id".to_string(), "displayName".to_string()])
//!     .expect("draft request");
//!
//! let url = info.url().expect("valid url");
//! assert_eq!(url.as_str(), "https://g.example/education/users/u1?%24select=id,displayName");
//! ```

use std::fmt;

use bytes::Bytes;
use url::Url;

use crate::serialization::{
    OCTET_STREAM_CONTENT_TYPE, Parsable, Primitive, SerializationWriter,
    SerializationWriterFactoryRegistry,
};
use crate::{
    BASE_URL_KEY, Error, Method, ParameterMap, ParameterValue, RAW_URL_KEY, Request,
    RequestHeaders, RequestOption, RequestOptions, Result, UriTemplate,
};

const CONTENT_TYPE_HEADER: &str = "content-type";

/// Typed query parameters of an endpoint.
pub trait ToQueryParameters {
    /// Query parameters keyed by their template name, e.g. `%24select`.
    fn to_query_parameters(&self) -> ParameterMap;
}

impl ToQueryParameters for ParameterMap {
    fn to_query_parameters(&self) -> ParameterMap {
        self.clone()
    }
}

impl ToQueryParameters for () {
    fn to_query_parameters(&self) -> ParameterMap {
        ParameterMap::new()
    }
}

/// Lifecycle of a [`RequestInformation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestState {
    /// Being assembled.
    #[default]
    Draft,
    /// The URL has been resolved at least once.
    Assembled,
    /// Taken by an adapter. Read-only from here.
    InFlight,
    /// The call completed.
    Succeeded,
    /// The call failed.
    Failed,
}

impl RequestState {
    /// Returns `true` once the request has been handed to an adapter.
    #[must_use]
    pub const fn is_frozen(self) -> bool {
        matches!(self, Self::InFlight | Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Draft => "draft",
            Self::Assembled => "assembled",
            Self::InFlight => "in flight",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One outbound call.
#[derive(Debug, Clone)]
pub struct RequestInformation {
    method: Method,
    url_template: String,
    path_parameters: ParameterMap,
    query_parameters: ParameterMap,
    headers: RequestHeaders,
    content: Option<Bytes>,
    options: RequestOptions,
    state: RequestState,
}

impl RequestInformation {
    /// Start a request from a method, a URL template and the builder's path parameters.
    #[must_use]
    pub fn new(method: Method, url_template: impl Into<String>, path_parameters: ParameterMap) -> Self {
        Self {
            method,
            url_template: url_template.into(),
            path_parameters,
            query_parameters: ParameterMap::new(),
            headers: RequestHeaders::new(),
            content: None,
            options: RequestOptions::new(),
            state: RequestState::Draft,
        }
    }

    /// Start a request bound to a literal URL; the template is ignored.
    #[must_use]
    pub fn from_raw_url(method: Method, raw_url: impl Into<String>) -> Self {
        let mut path_parameters = ParameterMap::new();
        path_parameters.insert(RAW_URL_KEY.to_string(), ParameterValue::String(raw_url.into()));
        Self::new(method, String::new(), path_parameters)
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.state.is_frozen() {
            return Err(Error::configuration(format!(
                "request information is read-only once {}",
                self.state
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// The URL template.
    #[must_use]
    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Path parameters, including `baseurl` once set.
    #[must_use]
    pub fn path_parameters(&self) -> &ParameterMap {
        &self.path_parameters
    }

    /// Query parameters.
    #[must_use]
    pub fn query_parameters(&self) -> &ParameterMap {
        &self.query_parameters
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &RequestHeaders {
        &self.headers
    }

    /// The serialized body.
    #[must_use]
    pub fn content(&self) -> Option<&Bytes> {
        self.content.as_ref()
    }

    /// The `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.first(CONTENT_TYPE_HEADER)
    }

    /// Per-call options.
    #[must_use]
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// The option of type `T`.
    #[must_use]
    pub fn option<T: RequestOption>(&self) -> Option<&T> {
        self.options.get::<T>()
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RequestState {
        self.state
    }

    /// Returns `true` when the request targets a literal URL.
    #[must_use]
    pub fn is_raw_url(&self) -> bool {
        self.path_parameters.contains_key(RAW_URL_KEY)
    }

    /// The final URL.
    ///
    /// The first successful call moves a draft request to [`RequestState::Assembled`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the template references `baseurl` and no base URL
    /// was set, [`Error::InvalidTemplate`] for a malformed template, or
    /// [`Error::InvalidUrl`] if the expansion is not an absolute URL.
    pub fn url(&mut self) -> Result<Url> {
        let url = self.compose_url()?;
        if self.state == RequestState::Draft {
            self.state = RequestState::Assembled;
        }
        Ok(url)
    }

    /// The final URL, without touching the lifecycle state.
    ///
    /// # Errors
    ///
    /// Same as [`RequestInformation::url`].
    pub fn compose_url(&self) -> Result<Url> {
        let expanded = match self.path_parameters.get(RAW_URL_KEY) {
            Some(raw) => raw.to_string(),
            None => {
                let template = UriTemplate::parse(&self.url_template)?;
                if template.variables().contains(&BASE_URL_KEY) && !self.has_base_url() {
                    return Err(Error::configuration(format!(
                        "{BASE_URL_KEY} is required by '{}' but missing from the path parameters",
                        self.url_template
                    )));
                }
                let mut params = self.path_parameters.clone();
                params.extend(
                    self.query_parameters
                        .iter()
                        .map(|(key, value)| (key.clone(), value.clone())),
                );
                template.expand(&params)
            }
        };
        Ok(Url::parse(&expanded)?)
    }

    fn has_base_url(&self) -> bool {
        self.path_parameters
            .get(BASE_URL_KEY)
            .is_some_and(|value| !value.to_string().is_empty())
    }

    // ========================================================================
    // Assembly
    // ========================================================================

    /// Set one path parameter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the request is in flight.
    pub fn set_path_parameter(&mut self, key: &str, value: impl Into<ParameterValue>) -> Result<()> {
        self.ensure_mutable()?;
        self.path_parameters.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Set the base URL used by `{+baseurl}`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the request is in flight.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.set_path_parameter(BASE_URL_KEY, base_url.trim_end_matches('/'))
    }

    /// Mutable headers.
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the request is in flight.
    pub fn headers_mut(&mut self) -> Result<&mut RequestHeaders> {
        self.ensure_mutable()?;
        Ok(&mut self.headers)
    }

    /// Merge caller headers.
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the request is in flight.
    pub fn add_headers(&mut self, headers: &RequestHeaders) -> Result<()> {
        self.ensure_mutable()?;
        self.headers.add_all(headers);
        Ok(())
    }

    /// Merge caller options, replacing options of the same type.
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the request is in flight.
    pub fn add_request_options(&mut self, options: &RequestOptions) -> Result<()> {
        self.ensure_mutable()?;
        self.options.merge(options);
        Ok(())
    }

    /// Add one option.
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the request is in flight.
    pub fn add_request_option<T: RequestOption>(&mut self, option: T) -> Result<()> {
        self.ensure_mutable()?;
        self.options.add(option);
        Ok(())
    }

    /// Remove an option.
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the request is in flight.
    pub fn remove_request_option<T: RequestOption>(&mut self) -> Result<Option<T>> {
        self.ensure_mutable()?;
        Ok(self.options.remove::<T>())
    }

    /// Merge typed query parameters.
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the request is in flight.
    pub fn add_query_parameters<Q: ToQueryParameters + ?Sized>(&mut self, query: &Q) -> Result<()> {
        self.ensure_mutable()?;
        self.query_parameters.extend(query.to_query_parameters());
        Ok(())
    }

    /// Set one query parameter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the request is in flight.
    pub fn set_query_parameter(&mut self, key: &str, value: impl Into<ParameterValue>) -> Result<()> {
        self.ensure_mutable()?;
        self.query_parameters.insert(key.to_string(), value.into());
        Ok(())
    }

    // ========================================================================
    // Body
    // ========================================================================

    fn set_content(&mut self, content: Bytes, content_type: &str) {
        self.headers.try_add(CONTENT_TYPE_HEADER, content_type);
        self.content = Some(content);
    }

    fn write_content(
        &mut self,
        writers: &SerializationWriterFactoryRegistry,
        content_type: &str,
        write: impl FnOnce(&mut dyn SerializationWriter) -> Result<()>,
    ) -> Result<()> {
        self.ensure_mutable()?;
        let mut writer = writers.serialization_writer(content_type)?;
        write(writer.as_mut())?;
        let content = writer.content()?;
        tracing::trace!(content_type, length = content.len(), "request body serialized");
        self.set_content(content, content_type);
        Ok(())
    }

    /// Serialize a model as the body.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no writer handles `content_type` or the request is
    /// in flight, or the writer's serialization error.
    pub fn set_content_from_parsable<T: Parsable>(
        &mut self,
        writers: &SerializationWriterFactoryRegistry,
        content_type: &str,
        value: &T,
    ) -> Result<()> {
        self.write_content(writers, content_type, |writer| {
            writer.write_object(None, Some(value))
        })
    }

    /// Serialize a collection of models as the body.
    ///
    /// # Errors
    ///
    /// See [`RequestInformation::set_content_from_parsable`].
    pub fn set_content_from_parsables<T: Parsable>(
        &mut self,
        writers: &SerializationWriterFactoryRegistry,
        content_type: &str,
        values: &[T],
    ) -> Result<()> {
        self.write_content(writers, content_type, |writer| {
            writer.write_collection_of_objects(None, Some(values))
        })
    }

    /// Serialize a scalar as the body.
    ///
    /// # Errors
    ///
    /// See [`RequestInformation::set_content_from_parsable`].
    pub fn set_content_from_scalar<P: Primitive>(
        &mut self,
        writers: &SerializationWriterFactoryRegistry,
        content_type: &str,
        value: &P,
    ) -> Result<()> {
        self.write_content(writers, content_type, |writer| {
            writer.write_primitive(None, Some(value))
        })
    }

    /// Use raw bytes as an `application/octet-stream` body.
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the request is in flight.
    pub fn set_stream_content(&mut self, content: impl Into<Bytes>) -> Result<()> {
        self.set_stream_content_and_type(content, OCTET_STREAM_CONTENT_TYPE)
    }

    /// Use raw bytes with an explicit media type.
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the request is in flight.
    pub fn set_stream_content_and_type(
        &mut self,
        content: impl Into<Bytes>,
        content_type: &str,
    ) -> Result<()> {
        self.ensure_mutable()?;
        self.set_content(content.into(), content_type);
        Ok(())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Hand the request to an adapter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the request was already sent.
    pub fn mark_in_flight(&mut self) -> Result<()> {
        self.ensure_mutable()?;
        self.state = RequestState::InFlight;
        Ok(())
    }

    /// Record the outcome of an in-flight request.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the request is not in flight.
    pub fn complete(&mut self, succeeded: bool) -> Result<()> {
        if self.state != RequestState::InFlight {
            return Err(Error::configuration(format!(
                "cannot complete a request that is {}",
                self.state
            )));
        }
        self.state = if succeeded {
            RequestState::Succeeded
        } else {
            RequestState::Failed
        };
        Ok(())
    }

    /// Return an in-flight request to [`RequestState::Assembled`] so it can be
    /// authenticated again after a claims challenge.
    pub fn reopen(&mut self) {
        if self.state == RequestState::InFlight {
            self.state = RequestState::Assembled;
        }
    }

    /// Build the transport-neutral request.
    ///
    /// Options travel in the request extensions so middleware can read them.
    ///
    /// # Errors
    ///
    /// See [`RequestInformation::compose_url`].
    pub fn to_request(&self) -> Result<Request> {
        let url = self.compose_url()?;
        let mut builder = Request::builder(self.method, url)
            .headers(&self.headers)
            .extensions(self.options.extensions().clone());
        if let Some(content) = &self.content {
            builder = builder.body(content.clone());
        }
        Ok(builder.build())
    }
}
