//! Transport-neutral runtime for typed REST request builders.
//!
//! This crate provides what generated builders and transports share:
//! - [`UriTemplate`] - RFC 6570 URL templates with path and query parameters
//! - [`RequestInformation`] - one outbound call, assembled then frozen
//! - [`Headers`] - case-insensitive, order-preserving header store
//! - [`RequestOptions`] - type-keyed per-call options read by middleware
//! - [`serialization`] - media-type keyed readers and writers, discriminator dispatch
//! - [`ErrorMappings`] - status code to typed error payload selection
//! - [`RequestAdapter`] - the transport seam, with typed helpers in [`RequestAdapterExt`]
//! - [`AuthenticationProvider`] - credential injection
//! - [`CancellationToken`] - cooperative cancellation
//! - [`Error`] and [`Result`] - error handling

mod adapter;
mod auth;
mod cancellation;
mod error;
mod error_mapping;
mod headers;
mod method;
mod options;
pub mod prelude;
mod request;
mod request_information;
mod response;
pub mod serialization;
mod uri_template;

pub use adapter::{AdapterFuture, RequestAdapter, RequestAdapterExt, request_span};
pub use auth::{
    AccessTokenProvider, AllowedHostsValidator, AnonymousAuthenticationProvider,
    ApiKeyAuthenticationProvider, ApiKeyLocation, AuthenticationProvider,
    BaseBearerTokenAuthenticationProvider, StaticAccessTokenProvider,
};
pub use cancellation::{CancellationToken, check_cancelled, run_cancellable};
pub use error::{ApiError, Error, ErrorPayload, Result};
pub use error_mapping::{ErrorFactory, ErrorMappings, StatusPattern, error_from_response};
pub use headers::{Headers, RequestHeaders, ResponseHeaders};
pub use method::Method;
pub use options::{
    RedirectOption, RequestOption, RequestOptions, ResponseHandler, ResponseHandlerOption,
    RetryOption, TimeoutOption, UserAgentOption,
};
pub use request::{Request, RequestBuilder};
pub use request_information::{RequestInformation, RequestState, ToQueryParameters};
pub use response::Response;
pub use serialization::{Parsable, ParsableEnum, ParseNode, Primitive, SerializationWriter};
pub use uri_template::{
    BASE_URL_KEY, ParameterMap, ParameterValue, RAW_URL_KEY, UriTemplate, expand_template,
};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
