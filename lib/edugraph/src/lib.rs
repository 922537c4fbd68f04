//! Typed request builders for the education endpoints of a Graph-style REST API.
//!
//! The [`GraphServiceClient`] is the root of a tree of request builders, one per URL
//! template. Builders assemble a [`RequestInformation`] and hand it to a
//! [`RequestAdapter`]; the bundled [`HyperRequestAdapter`] sends it through a tower
//! middleware pipeline on top of hyper.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use edugraph::models::ODataError;
//! use edugraph::{
//!     AllowedHostsValidator, BaseBearerTokenAuthenticationProvider, GraphServiceClient,
//!     HyperRequestAdapter, StaticAccessTokenProvider,
//! };
//!
//! # async fn run() -> edugraph::Result<()> {
//! let auth = BaseBearerTokenAuthenticationProvider::new(StaticAccessTokenProvider::new("token"))
//!     .with_allowed_hosts(AllowedHostsValidator::new(["graph.microsoft.com"])?);
//! let adapter = HyperRequestAdapter::builder()
//!     .authentication_provider(auth)
//!     .with_default_middleware()
//!     .build();
//! let client = GraphServiceClient::new(Arc::new(adapter));
//!
//! match client.education().users().by_education_user_id("u1").get(None).await {
//!     Ok(user) => println!("{user:?}"),
//!     Err(error) => {
//!         if let Some(odata) = error.api_error().and_then(|api| api.payload::<ODataError>()) {
//!             eprintln!("service error {odata}");
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod adapter;
mod builder;
mod client;
mod config;
mod connector;
pub mod education;
pub mod middleware;
pub mod models;
pub mod prelude;
mod transport;

// Re-export adapter and transport types
pub use adapter::{HyperRequestAdapter, HyperRequestAdapterBuilder};
pub use config::{DEFAULT_TRANSPORT_TIMEOUT, TransportConfig};
pub use transport::{BoxedService, HyperTransport, ServiceFuture};

// Re-export builder types
pub use builder::{
    BaseRequestBuilder, CollectionQueryParameters, CollectionRequestConfiguration,
    ItemQueryParameters, ItemRequestConfiguration, RequestConfiguration,
};
pub use client::{DEFAULT_BASE_URL, GraphServiceClient};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use edugraph_core::{
    AccessTokenProvider, AdapterFuture, AllowedHostsValidator, AnonymousAuthenticationProvider,
    ApiError, ApiKeyAuthenticationProvider, ApiKeyLocation, AuthenticationProvider,
    BASE_URL_KEY, BaseBearerTokenAuthenticationProvider, CancellationToken, Error, ErrorFactory,
    ErrorMappings, ErrorPayload, Headers, Method, ParameterMap, ParameterValue, Parsable,
    ParsableEnum, ParseNode, RAW_URL_KEY, RedirectOption, Request, RequestAdapter,
    RequestAdapterExt, RequestBuilder, RequestHeaders, RequestInformation, RequestOption,
    RequestOptions, RequestState, Response, ResponseHandler, ResponseHandlerOption,
    ResponseHeaders, Result, RetryOption, SerializationWriter, StaticAccessTokenProvider,
    StatusPattern, TimeoutOption, ToQueryParameters, UserAgentOption, check_cancelled,
    error_from_response, run_cancellable,
};

// Re-export http types for status codes and headers
pub use edugraph_core::{StatusCode, header};

// Re-export the serialization module for custom models
pub use edugraph_core::serialization;
