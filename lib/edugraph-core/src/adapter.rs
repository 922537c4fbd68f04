//! The seam between request builders and a transport.
//!
//! [`RequestAdapter`] is object safe so builders can hold an `Arc<dyn RequestAdapter>`.
//! Typed results come from the blanket [`RequestAdapterExt`] helpers, which read the root
//! parse node with the caller's factory.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use percent_encoding::percent_decode_str;
use tracing::Instrument;
use tracing::field::Empty;

use crate::serialization::{
    ParsableEnum, ParsableFactory, ParseNode, ParseNodeFactoryRegistry, Primitive,
    SerializationWriterFactoryRegistry,
};
use crate::{CancellationToken, ErrorMappings, Parsable, RequestInformation, Result};

/// Boxed future returned by [`RequestAdapter`] methods.
pub type AdapterFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Executes [`RequestInformation`]s.
pub trait RequestAdapter: Send + Sync {
    /// Send and return the root parse node of the response body.
    ///
    /// Returns `None` for a 204, an empty body, or when a
    /// [`ResponseHandlerOption`](crate::ResponseHandlerOption) consumed the response.
    fn send_for_root_node<'a>(
        &'a self,
        info: RequestInformation,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> AdapterFuture<'a, Option<Box<dyn ParseNode>>>;

    /// Send and return the raw response body.
    fn send_for_bytes<'a>(
        &'a self,
        info: RequestInformation,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> AdapterFuture<'a, Option<Bytes>>;

    /// Send and discard the response body.
    fn send_no_content<'a>(
        &'a self,
        info: RequestInformation,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> AdapterFuture<'a, ()>;

    /// Authenticate and convert to the request the transport would send, without sending it.
    fn convert_to_native_request<'a>(
        &'a self,
        info: RequestInformation,
        cancel: Option<&'a CancellationToken>,
    ) -> AdapterFuture<'a, http::Request<Bytes>>;

    /// The base URL injected as `baseurl`; empty when unset.
    fn base_url(&self) -> &str;

    /// Writers used for request bodies.
    fn serialization_writers(&self) -> &SerializationWriterFactoryRegistry;

    /// Readers used for response bodies.
    fn parse_nodes(&self) -> &ParseNodeFactoryRegistry;
}

/// The tracing span of one adapter call.
///
/// Adapters record `http.status_code`, `http.response.content_type`,
/// `http.response.content_length` and `error_mapping_found` on it.
#[must_use]
pub fn request_span(operation: &'static str, info: &RequestInformation) -> tracing::Span {
    let template = percent_decode_str(info.url_template()).decode_utf8_lossy();
    tracing::info_span!(
        "request",
        operation,
        http.method = %info.method(),
        url.template = %template,
        http.status_code = Empty,
        http.response.content_type = Empty,
        http.response.content_length = Empty,
        error_mapping_found = Empty,
    )
}

/// Typed helpers over any [`RequestAdapter`].
pub trait RequestAdapterExt: RequestAdapter {
    /// Send and read one model.
    fn send<'a, T: Parsable>(
        &'a self,
        info: RequestInformation,
        factory: ParsableFactory<T>,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Result<Option<T>>> + Send + 'a {
        let span = request_span("send", &info);
        async move {
            let node = self.send_for_root_node(info, error_mappings, cancel).await?;
            node.map_or(Ok(None), |node| node.object_value(factory))
        }
        .instrument(span)
    }

    /// Send and read a collection of models.
    fn send_collection<'a, T: Parsable>(
        &'a self,
        info: RequestInformation,
        factory: ParsableFactory<T>,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Result<Option<Vec<T>>>> + Send + 'a {
        let span = request_span("send_collection", &info);
        async move {
            let node = self.send_for_root_node(info, error_mappings, cancel).await?;
            node.map_or(Ok(None), |node| node.collection_of_object_values(factory))
        }
        .instrument(span)
    }

    /// Send and read a scalar.
    fn send_primitive<'a, P: Primitive>(
        &'a self,
        info: RequestInformation,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Result<Option<P>>> + Send + 'a {
        let span = request_span("send_primitive", &info);
        async move {
            let node = self.send_for_root_node(info, error_mappings, cancel).await?;
            node.map_or(Ok(None), |node| node.primitive_value::<P>())
        }
        .instrument(span)
    }

    /// Send and read a collection of scalars.
    fn send_primitive_collection<'a, P: Primitive>(
        &'a self,
        info: RequestInformation,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Result<Option<Vec<P>>>> + Send + 'a {
        let span = request_span("send_primitive_collection", &info);
        async move {
            let node = self.send_for_root_node(info, error_mappings, cancel).await?;
            node.map_or(Ok(None), |node| node.collection_of_primitive_values::<P>())
        }
        .instrument(span)
    }

    /// Send and read an enum member.
    fn send_enum<'a, E: ParsableEnum>(
        &'a self,
        info: RequestInformation,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Result<Option<E>>> + Send + 'a {
        let span = request_span("send_enum", &info);
        async move {
            let node = self.send_for_root_node(info, error_mappings, cancel).await?;
            node.map_or(Ok(None), |node| node.enum_value_of::<E>())
        }
        .instrument(span)
    }

    /// Send and read a collection of enum members.
    fn send_enum_collection<'a, E: ParsableEnum>(
        &'a self,
        info: RequestInformation,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Result<Option<Vec<E>>>> + Send + 'a {
        let span = request_span("send_enum_collection", &info);
        async move {
            let node = self.send_for_root_node(info, error_mappings, cancel).await?;
            node.map_or(Ok(None), |node| node.collection_of_enum_values::<E>())
        }
        .instrument(span)
    }

    /// Send and return the raw body.
    fn send_bytes<'a>(
        &'a self,
        info: RequestInformation,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Result<Option<Bytes>>> + Send + 'a {
        let span = request_span("send_bytes", &info);
        self.send_for_bytes(info, error_mappings, cancel)
            .instrument(span)
    }

    /// Send and discard the body.
    fn send_empty<'a>(
        &'a self,
        info: RequestInformation,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Result<()>> + Send + 'a {
        let span = request_span("send_no_content", &info);
        self.send_no_content(info, error_mappings, cancel)
            .instrument(span)
    }
}

impl<A: RequestAdapter + ?Sized> RequestAdapterExt for A {}
