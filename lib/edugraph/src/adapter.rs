//! hyper-backed [`RequestAdapter`].
//!
//! [`HyperRequestAdapter`] authenticates each [`RequestInformation`], sends it through a
//! tower middleware stack ending in [`HyperTransport`], maps error statuses through the
//! caller's [`ErrorMappings`] and hands success bodies to the parse-node registry.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use edugraph::{GraphServiceClient, HyperRequestAdapter};
//!
//! let adapter = HyperRequestAdapter::builder()
//!     .base_url("https://graph.microsoft.com/v1.0")
//!     .with_default_middleware()
//!     .build();
//! let client = GraphServiceClient::new(Arc::new(adapter));
//! ```

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tower::Layer;
use tower::retry::RetryLayer;
use tower::ServiceExt;
use tower_service::Service;
use tracing::Span;

use crate::middleware::{
    FollowRedirectLayer, LoggingLayer, RetryPolicy, TimeoutLayer, UserAgentLayer,
};
use crate::transport::{BoxedService, HyperTransport};
use crate::{
    AdapterFuture, AnonymousAuthenticationProvider, AuthenticationProvider, CancellationToken,
    Error, ErrorMappings, ParseNode, RedirectOption, Request, RequestAdapter, RequestInformation,
    Response, ResponseHandlerOption, Result, RetryOption, TimeoutOption, TransportConfig,
    UserAgentOption, check_cancelled, error_from_response, run_cancellable,
};
use edugraph_core::serialization::{ParseNodeFactoryRegistry, SerializationWriterFactoryRegistry};

/// Extract the claims of a continuous access evaluation challenge.
///
/// Only a 401 whose `WWW-Authenticate` header is a Bearer challenge with a `claims`
/// parameter qualifies.
fn claims_challenge(response: &Response) -> Option<String> {
    if response.status() != 401 {
        return None;
    }
    let challenge = response.header("www-authenticate")?.trim();
    let scheme = challenge.get(..6)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let start = challenge.find("claims=\"")? + "claims=\"".len();
    let rest = challenge.get(start..)?;
    let end = rest.find('"')?;
    let claims = rest.get(..end)?;
    (!claims.is_empty()).then(|| claims.to_string())
}

// ============================================================================
// Adapter
// ============================================================================

/// Request adapter sending through hyper and a tower middleware stack.
#[derive(Clone)]
pub struct HyperRequestAdapter {
    service: BoxedService,
    base_url: String,
    authentication: Arc<dyn AuthenticationProvider>,
    parse_nodes: Arc<ParseNodeFactoryRegistry>,
    writers: Arc<SerializationWriterFactoryRegistry>,
}

impl std::fmt::Debug for HyperRequestAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperRequestAdapter")
            .field("base_url", &self.base_url)
            .field("parse_nodes", &self.parse_nodes)
            .field("writers", &self.writers)
            .finish_non_exhaustive()
    }
}

impl Default for HyperRequestAdapter {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl HyperRequestAdapter {
    /// Create an adapter builder.
    #[must_use]
    pub fn builder() -> HyperRequestAdapterBuilder {
        HyperRequestAdapterBuilder::default()
    }

    /// Resolve the URL and authenticate.
    ///
    /// Cancellation is checked before and after authentication, and raced against it.
    async fn prepare(
        &self,
        info: &mut RequestInformation,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        check_cancelled(cancel)?;
        if !self.base_url.is_empty() {
            info.set_base_url(&self.base_url)?;
        }
        info.url()?;
        run_cancellable(cancel, self.authentication.authenticate(info, None)).await?;
        check_cancelled(cancel)
    }

    async fn dispatch(
        &self,
        info: &mut RequestInformation,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response> {
        info.mark_in_flight()?;
        let request = info.to_request()?;
        let result = run_cancellable(cancel, self.service.clone().oneshot(request)).await;
        if result.is_err() {
            info.complete(false)?;
        }
        result
    }

    /// Authenticate, send and answer at most one claims challenge.
    async fn get_response(
        &self,
        mut info: RequestInformation,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response> {
        self.prepare(&mut info, cancel).await?;
        let mut response = self.dispatch(&mut info, cancel).await?;

        if let Some(claims) = claims_challenge(&response) {
            tracing::debug!("retrying after a claims challenge");
            info.reopen();
            info.headers_mut()?.remove("authorization");
            run_cancellable(cancel, self.authentication.authenticate(&mut info, Some(&claims)))
                .await?;
            check_cancelled(cancel)?;
            response = self.dispatch(&mut info, cancel).await?;
        }

        let span = Span::current();
        span.record("http.status_code", response.status());
        if let Some(content_type) = response.content_type() {
            span.record("http.response.content_type", content_type.as_str());
        }
        if let Some(length) = response.content_length() {
            span.record("http.response.content_length", length);
        }

        info.complete(!response.is_error())?;
        Ok(response)
    }

    /// Send and apply the shared response handling.
    ///
    /// Returns `None` when a [`ResponseHandlerOption`] consumed the response.
    async fn send_and_check(
        &self,
        info: RequestInformation,
        error_mappings: Option<&ErrorMappings>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<Response>> {
        let handler = info.option::<ResponseHandlerOption>().cloned();
        let response = self.get_response(info, cancel).await?;

        let empty = ErrorMappings::new();
        let mappings = error_mappings.unwrap_or(&empty);

        if let Some(handler) = handler {
            handler.handler().handle_response(response, mappings)?;
            return Ok(None);
        }

        if response.is_error() {
            let found = mappings.find(response.status()).is_some();
            Span::current().record("error_mapping_found", found);
            return Err(error_from_response(response, mappings, &self.parse_nodes));
        }

        Ok(Some(response))
    }
}

impl RequestAdapter for HyperRequestAdapter {
    fn send_for_root_node<'a>(
        &'a self,
        info: RequestInformation,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> AdapterFuture<'a, Option<Box<dyn ParseNode>>> {
        Box::pin(async move {
            let Some(response) = self.send_and_check(info, error_mappings, cancel).await? else {
                return Ok(None);
            };
            if response.has_no_content() {
                return Ok(None);
            }
            let Some(content_type) = response.content_type() else {
                return Ok(None);
            };
            self.parse_nodes
                .root_parse_node(&content_type, response.body())
                .map(Some)
        })
    }

    fn send_for_bytes<'a>(
        &'a self,
        info: RequestInformation,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> AdapterFuture<'a, Option<Bytes>> {
        Box::pin(async move {
            let response = self.send_and_check(info, error_mappings, cancel).await?;
            Ok(response
                .filter(|response| !response.has_no_content())
                .map(Response::into_body))
        })
    }

    fn send_no_content<'a>(
        &'a self,
        info: RequestInformation,
        error_mappings: Option<&'a ErrorMappings>,
        cancel: Option<&'a CancellationToken>,
    ) -> AdapterFuture<'a, ()> {
        Box::pin(async move {
            self.send_and_check(info, error_mappings, cancel).await?;
            Ok(())
        })
    }

    fn convert_to_native_request<'a>(
        &'a self,
        mut info: RequestInformation,
        cancel: Option<&'a CancellationToken>,
    ) -> AdapterFuture<'a, http::Request<Bytes>> {
        Box::pin(async move {
            self.prepare(&mut info, cancel).await?;
            info.to_request()?.into_http()
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn serialization_writers(&self) -> &SerializationWriterFactoryRegistry {
        &self.writers
    }

    fn parse_nodes(&self) -> &ParseNodeFactoryRegistry {
        &self.parse_nodes
    }
}

// ============================================================================
// Builder
// ============================================================================

type LayerFn = Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>;

/// Builder for [`HyperRequestAdapter`].
///
/// Layers added first are outermost: they see the request first and the response last.
///
/// ```no_run
/// use std::time::Duration;
/// use edugraph::HyperRequestAdapter;
/// use edugraph::middleware::LoggingLayer;
///
/// let adapter = HyperRequestAdapter::builder()
///     .base_url("https://graph.microsoft.com/v1.0")
///     .timeout(Duration::from_secs(30))
///     .with_retry()
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Default)]
pub struct HyperRequestAdapterBuilder {
    config: TransportConfig,
    layers: Vec<LayerFn>,
    base_url: String,
    authentication: Option<Arc<dyn AuthenticationProvider>>,
    parse_nodes: Option<ParseNodeFactoryRegistry>,
    writers: Option<SerializationWriterFactoryRegistry>,
    transport: Option<BoxedService>,
}

impl std::fmt::Debug for HyperRequestAdapterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperRequestAdapterBuilder")
            .field("config", &self.config)
            .field("layers_count", &self.layers.len())
            .field("base_url", &self.base_url)
            .field("custom_transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}

impl HyperRequestAdapterBuilder {
    // ========================================================================
    // Runtime Configuration
    // ========================================================================

    /// Set the base URL injected as `baseurl` into every request.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the authentication provider. Requests are sent anonymously by default.
    #[must_use]
    pub fn authentication_provider(mut self, provider: impl AuthenticationProvider + 'static) -> Self {
        self.authentication = Some(Arc::new(provider));
        self
    }

    /// Replace the readers used for response bodies.
    #[must_use]
    pub fn parse_nodes(mut self, registry: ParseNodeFactoryRegistry) -> Self {
        self.parse_nodes = Some(registry);
        self
    }

    /// Replace the writers used for request bodies.
    #[must_use]
    pub fn serialization_writers(mut self, registry: SerializationWriterFactoryRegistry) -> Self {
        self.writers = Some(registry);
        self
    }

    // ========================================================================
    // Transport Configuration
    // ========================================================================

    /// Set the transport deadline for one exchange. Zero disables it.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Send without a transport deadline.
    ///
    /// Cancellation tokens and the timeout middleware still apply.
    #[must_use]
    pub fn without_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_max_idle_per_host(mut self, count: usize) -> Self {
        self.config.pool_max_idle_per_host = count;
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Send through `transport` instead of hyper.
    ///
    /// Middleware still applies.
    #[must_use]
    pub fn with_transport<S>(mut self, transport: S) -> Self
    where
        S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        self.transport = Some(BoxedService::new(transport));
        self
    }

    // ========================================================================
    // Generic Middleware API
    // ========================================================================

    /// Add a Tower layer.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <L::Service as Service<Request<Bytes>>>::Future: Send + 'static,
    {
        self.layers.push(Arc::new(move |service| {
            BoxedService::new(layer.layer(service))
        }));
        self
    }

    /// Alias for [`layer`](Self::layer), in the reqwest-middleware style.
    #[must_use]
    pub fn with<L>(self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <L::Service as Service<Request<Bytes>>>::Future: Send + 'static,
    {
        self.layer(layer)
    }

    // ========================================================================
    // Middleware Helpers
    // ========================================================================

    /// Retry transport errors and 429/503/504 responses, three times by default.
    #[must_use]
    pub fn with_retry(self) -> Self {
        self.with_retry_option(RetryOption::default())
    }

    /// Retry with the given defaults; a per-call [`RetryOption`] still wins.
    #[must_use]
    pub fn with_retry_option(self, option: RetryOption) -> Self {
        self.layer(RetryLayer::new(RetryPolicy::new(option)))
    }

    /// Add request/response logging.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Add debug-level logging (redacted headers and body sizes).
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Bound each attempt by `timeout` unless the call carries a [`TimeoutOption`].
    #[must_use]
    pub fn with_timeout_middleware(self, timeout: Duration) -> Self {
        self.layer(TimeoutLayer::new(TimeoutOption::new(timeout)))
    }

    /// Follow up to five redirects.
    #[must_use]
    pub fn with_redirects(self) -> Self {
        self.layer(FollowRedirectLayer::with_option(RedirectOption::default()))
    }

    /// Append the `edugraph/<version>` product token to `User-Agent`.
    #[must_use]
    pub fn with_user_agent(self) -> Self {
        self.layer(UserAgentLayer::new(UserAgentOption::default()))
    }

    /// Install the standard chain: retry, redirects, user agent, timeout, logging.
    #[must_use]
    pub fn with_default_middleware(self) -> Self {
        self.with_retry()
            .with_redirects()
            .with_user_agent()
            .with_timeout_middleware(TimeoutOption::default().duration())
            .with_logging()
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the adapter.
    #[must_use]
    pub fn build(self) -> HyperRequestAdapter {
        let mut service = match self.transport {
            Some(transport) => transport,
            None => BoxedService::new(HyperTransport::new(self.config)),
        };

        for layer_fn in self.layers.into_iter().rev() {
            service = layer_fn(service);
        }

        HyperRequestAdapter {
            service,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            authentication: self
                .authentication
                .unwrap_or_else(|| Arc::new(AnonymousAuthenticationProvider)),
            parse_nodes: Arc::new(
                self.parse_nodes
                    .unwrap_or_else(ParseNodeFactoryRegistry::with_defaults),
            ),
            writers: Arc::new(
                self.writers
                    .unwrap_or_else(SerializationWriterFactoryRegistry::with_defaults),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use assert2::{check, let_assert};
    use tower::service_fn;

    use super::*;
    use crate::{Method, ParameterMap, ResponseHeaders};

    fn response(status: u16, headers: &[(&str, &str)], body: &'static str) -> Response {
        let headers: ResponseHeaders = headers.iter().copied().collect();
        Response::new(status, headers, Bytes::from_static(body.as_bytes()))
    }

    fn info(template: &str) -> RequestInformation {
        RequestInformation::new(Method::Get, template, ParameterMap::new())
    }

    /// Transport answering from a queue and recording what it was sent.
    #[derive(Clone, Default)]
    struct Scripted {
        replies: Arc<Mutex<Vec<Response>>>,
        seen: Arc<Mutex<Vec<Request<Bytes>>>>,
    }

    impl Scripted {
        fn new(replies: Vec<Response>) -> Self {
            Self {
                replies: Arc::new(Mutex::new(replies.into_iter().rev().collect())),
                seen: Arc::default(),
            }
        }

        fn adapter(&self) -> HyperRequestAdapterBuilder {
            let script = self.clone();
            HyperRequestAdapter::builder()
                .base_url("https://g.example/")
                .with_transport(service_fn(move |request: Request<Bytes>| {
                    let script = script.clone();
                    async move {
                        script.seen.lock().expect("lock").push(request);
                        script
                            .replies
                            .lock()
                            .expect("lock")
                            .pop()
                            .ok_or_else(|| Error::connection("no scripted reply"))
                    }
                }))
        }

        fn seen(&self) -> Vec<Request<Bytes>> {
            self.seen.lock().expect("lock").clone()
        }
    }

    /// Records the claims it is called with and adds a bearer header.
    #[derive(Default)]
    struct RecordingAuth {
        claims: Mutex<Vec<Option<String>>>,
        cancel: Option<CancellationToken>,
    }

    impl AuthenticationProvider for RecordingAuth {
        fn authenticate<'a>(
            &'a self,
            info: &'a mut RequestInformation,
            claims: Option<&'a str>,
        ) -> AdapterFuture<'a, ()> {
            Box::pin(async move {
                self.claims
                    .lock()
                    .expect("lock")
                    .push(claims.map(ToString::to_string));
                if let Some(cancel) = &self.cancel {
                    cancel.cancel();
                }
                let token = if claims.is_some() { "Bearer fresh" } else { "Bearer stale" };
                info.headers_mut()?.try_add("Authorization", token);
                Ok(())
            })
        }
    }

    #[test]
    fn builder_fills_transport_config() {
        let builder = HyperRequestAdapter::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(3))
            .pool_max_idle_per_host(4);
        check!(builder.config.deadline() == Some(Duration::from_secs(30)));
        check!(builder.config.connect_timeout == Duration::from_secs(3));
        check!(builder.config.pool_max_idle_per_host == 4);

        let builder = builder.without_timeout();
        check!(builder.config.deadline().is_none());
        check!(HyperRequestAdapter::builder().timeout(Duration::ZERO).config.deadline().is_none());
    }

    #[test]
    fn parses_claims_challenge() {
        let challenge = response(
            401,
            &[(
                "WWW-Authenticate",
                r#"Bearer authorization_uri="https://login.example", error="insufficient_claims", claims="eyJhY2Nlc3MiOnt9fQ==""#,
            )],
            "",
        );
        check!(claims_challenge(&challenge).as_deref() == Some("eyJhY2Nlc3MiOnt9fQ=="));

        let plain = response(401, &[("WWW-Authenticate", "Bearer realm=\"g\"")], "");
        check!(claims_challenge(&plain).is_none());
        let basic = response(401, &[("WWW-Authenticate", "Basic claims=\"x\"")], "");
        check!(claims_challenge(&basic).is_none());
        let forbidden = response(403, &[("WWW-Authenticate", "Bearer claims=\"x\"")], "");
        check!(claims_challenge(&forbidden).is_none());
    }

    #[tokio::test]
    async fn injects_base_url_and_parses_json() {
        let script = Scripted::new(vec![response(
            200,
            &[("Content-Type", "application/json; charset=utf-8")],
            r#"{"id":"c1"}"#,
        )]);
        let adapter = script.adapter().build();

        let result = adapter
            .send_for_root_node(info("{+baseurl}/education/classes"), None, None)
            .await;
        let_assert!(Ok(Some(node)) = result);
        let_assert!(Some(id) = node.child_node("id"));
        check!(id.string_value().ok().flatten().as_deref() == Some("c1"));

        let seen = script.seen();
        check!(seen.len() == 1);
        check!(seen[0].url().as_str() == "https://g.example/education/classes");
    }

    #[tokio::test]
    async fn no_content_yields_none() {
        let script = Scripted::new(vec![
            response(204, &[("Content-Type", "application/json")], ""),
            response(200, &[("Content-Type", "application/json"), ("Content-Length", "0")], ""),
        ]);
        let adapter = script.adapter().build();

        let_assert!(Ok(None) = adapter.send_for_root_node(info("{+baseurl}/a"), None, None).await);
        let_assert!(Ok(None) = adapter.send_for_bytes(info("{+baseurl}/b"), None, None).await);
    }

    #[tokio::test]
    async fn error_status_without_mapping_keeps_raw_body() {
        let script = Scripted::new(vec![response(
            500,
            &[("Content-Type", "text/plain")],
            "boom",
        )]);
        let adapter = script.adapter().build();

        let result = adapter.send_no_content(info("{+baseurl}/a"), None, None).await;
        let_assert!(Err(Error::Api(api)) = result);
        check!(api.status() == 500);
        check!(api.raw_body().map(|body| body.as_ref()) == Some(&b"boom"[..]));
    }

    #[tokio::test]
    async fn pre_cancelled_token_never_reaches_transport() {
        let script = Scripted::new(vec![]);
        let adapter = script.adapter().build();
        let token = CancellationToken::new();
        token.cancel();

        let result = adapter
            .send_for_root_node(info("{+baseurl}/a"), None, Some(&token))
            .await;
        let_assert!(Err(Error::Cancelled) = result);
        check!(script.seen().is_empty());
    }

    #[tokio::test]
    async fn cancelled_during_authentication_never_reaches_transport() {
        let script = Scripted::new(vec![]);
        let token = CancellationToken::new();
        let auth = Arc::new(RecordingAuth {
            cancel: Some(token.clone()),
            ..RecordingAuth::default()
        });
        let adapter = script.adapter().authentication_provider(Arc::clone(&auth)).build();

        let result = adapter
            .send_no_content(info("{+baseurl}/a"), None, Some(&token))
            .await;
        let_assert!(Err(Error::Cancelled) = result);
        check!(auth.claims.lock().expect("lock").len() == 1);
        check!(script.seen().is_empty());
    }

    #[tokio::test]
    async fn claims_challenge_reauthenticates_once() {
        let challenge = (
            "WWW-Authenticate",
            r#"Bearer error="insufficient_claims", claims="c2VjcmV0""#,
        );
        let script = Scripted::new(vec![
            response(401, &[challenge], ""),
            response(401, &[challenge], ""),
        ]);
        let auth = Arc::new(RecordingAuth::default());
        let adapter = script.adapter().authentication_provider(Arc::clone(&auth)).build();

        let result = adapter.send_no_content(info("{+baseurl}/a"), None, None).await;
        let_assert!(Err(Error::Api(api)) = result);
        check!(api.status() == 401);

        check!(*auth.claims.lock().expect("lock") == vec![None, Some("c2VjcmV0".to_string())]);
        let seen = script.seen();
        check!(seen.len() == 2);
        check!(seen[0].header("authorization") == Some("Bearer stale"));
        check!(seen[1].header("authorization") == Some("Bearer fresh"));
    }

    #[tokio::test]
    async fn response_handler_takes_over() {
        let script = Scripted::new(vec![response(
            418,
            &[("Content-Type", "application/json")],
            "{}",
        )]);
        let adapter = script.adapter().build();
        let handled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&handled);

        let mut request = info("{+baseurl}/a");
        let_assert!(Ok(()) = request.add_request_option(ResponseHandlerOption::new(
            move |response: Response, _: &ErrorMappings| {
                counter.store(usize::from(response.status()), Ordering::SeqCst);
                Ok(())
            },
        )));

        let_assert!(Ok(None) = adapter.send_for_root_node(request, None, None).await);
        check!(handled.load(Ordering::SeqCst) == 418);
    }

    #[tokio::test]
    async fn middleware_sees_request_options() {
        let script = Scripted::new(vec![response(200, &[], "")]);
        let adapter = script.adapter().with_user_agent().build();

        let mut request = info("{+baseurl}/a");
        let_assert!(Ok(()) = request.add_request_option(UserAgentOption::new("tests", "9")));
        let_assert!(Ok(()) = adapter.send_no_content(request, None, None).await);

        let seen = script.seen();
        check!(seen[0].header("user-agent") == Some("tests/9"));
        check!(seen[0].extensions().get::<UserAgentOption>().is_some());
    }

    #[tokio::test]
    async fn native_request_is_authenticated_but_not_sent() {
        let script = Scripted::new(vec![]);
        let adapter = script
            .adapter()
            .authentication_provider(RecordingAuth::default())
            .build();

        let result = adapter
            .convert_to_native_request(info("{+baseurl}/education/me"), None)
            .await;
        let_assert!(Ok(native) = result);
        check!(native.uri() == "https://g.example/education/me");
        check!(native.headers().get("authorization").map(|v| v.as_bytes()) == Some(&b"Bearer stale"[..]));
        check!(script.seen().is_empty());
    }

    #[test]
    fn builder_debug_and_defaults() {
        let adapter = HyperRequestAdapter::builder().base_url("https://g.example/v1/").build();
        check!(adapter.base_url() == "https://g.example/v1");
        check!(adapter.parse_nodes().supports("application/json"));
        check!(format!("{adapter:?}").contains("HyperRequestAdapter"));
    }
}
