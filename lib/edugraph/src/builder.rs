//! Shared plumbing of the generated request builders.
//!
//! A [`BaseRequestBuilder`] binds a URL template to a [`RequestAdapter`] and a copy of the
//! path parameters collected while navigating. Child builders always receive their own
//! copy of the map.

use std::fmt;
use std::sync::Arc;

use edugraph_core::serialization::{JSON_CONTENT_TYPE, ParsableFactory};

use crate::models::odata_error_mappings;
use crate::{
    CancellationToken, Method, Parsable, ParameterMap, ParameterValue, RAW_URL_KEY,
    RequestAdapter, RequestAdapterExt, RequestHeaders, RequestInformation, RequestOption,
    RequestOptions, Result, ToQueryParameters,
};

// ============================================================================
// Request Configuration
// ============================================================================

/// Per-call headers, options, query parameters and cancellation.
///
/// ```
/// use edugraph::{CollectionQueryParameters, RequestConfiguration, RetryOption};
///
/// let config = RequestConfiguration::new()
///     .header("ConsistencyLevel", "eventual")
///     .option(RetryOption::new(0))
///     .query(CollectionQueryParameters::new().select(["id", "displayName"]).top(5));
/// assert_eq!(config.headers.first("consistencylevel"), Some("eventual"));
/// ```
#[derive(Clone)]
pub struct RequestConfiguration<Q = ()> {
    /// Headers merged into the request.
    pub headers: RequestHeaders,
    /// Options handed to the middleware.
    pub options: RequestOptions,
    /// Typed query parameters.
    pub query_parameters: Option<Q>,
    /// Cancels the call when fired.
    pub cancellation: Option<CancellationToken>,
}

/// Configuration of collection and delta reads.
pub type CollectionRequestConfiguration = RequestConfiguration<CollectionQueryParameters>;

/// Configuration of single-item reads.
pub type ItemRequestConfiguration = RequestConfiguration<ItemQueryParameters>;

impl<Q> Default for RequestConfiguration<Q> {
    fn default() -> Self {
        Self {
            headers: RequestHeaders::new(),
            options: RequestOptions::new(),
            query_parameters: None,
            cancellation: None,
        }
    }
}

impl<Q: fmt::Debug> fmt::Debug for RequestConfiguration<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestConfiguration")
            .field("headers", &self.headers)
            .field("options", &self.options.keys().collect::<Vec<_>>())
            .field("query_parameters", &self.query_parameters)
            .field("cancellable", &self.cancellation.is_some())
            .finish()
    }
}

impl<Q> RequestConfiguration<Q> {
    /// An empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header value.
    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Add a request option.
    #[must_use]
    pub fn option<T: RequestOption>(mut self, option: T) -> Self {
        self.options.add(option);
        self
    }

    /// Set the query parameters.
    #[must_use]
    pub fn query(mut self, query: Q) -> Self {
        self.query_parameters = Some(query);
        self
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// The cancellation token of an optional configuration.
pub(crate) fn cancellation<Q>(config: Option<&RequestConfiguration<Q>>) -> Option<&CancellationToken> {
    config.and_then(|config| config.cancellation.as_ref())
}

// ============================================================================
// Query Parameters
// ============================================================================

fn insert_list(params: &mut ParameterMap, key: &str, values: &[String]) {
    if !values.is_empty() {
        params.insert(key.to_string(), ParameterValue::List(values.to_vec()));
    }
}

fn insert_opt(params: &mut ParameterMap, key: &str, value: Option<impl Into<ParameterValue> + Clone>) {
    if let Some(value) = value {
        params.insert(key.to_string(), value.into());
    }
}

/// OData query options of a collection endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionQueryParameters {
    /// Include count of items.
    pub count: Option<bool>,
    /// Expand related entities.
    pub expand: Vec<String>,
    /// Filter items by property values.
    pub filter: Option<String>,
    /// Order items by property values.
    pub orderby: Vec<String>,
    /// Search items by search phrases.
    pub search: Option<String>,
    /// Select properties to be returned.
    pub select: Vec<String>,
    /// Skip the first n items.
    pub skip: Option<i32>,
    /// Show only the first n items.
    pub top: Option<i32>,
}

impl CollectionQueryParameters {
    /// No query options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the total count.
    #[must_use]
    pub const fn count(mut self, count: bool) -> Self {
        self.count = Some(count);
        self
    }

    /// Expand related entities.
    #[must_use]
    pub fn expand<I: IntoIterator<Item = S>, S: Into<String>>(mut self, expand: I) -> Self {
        self.expand = expand.into_iter().map(Into::into).collect();
        self
    }

    /// Filter expression.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Ordering.
    #[must_use]
    pub fn orderby<I: IntoIterator<Item = S>, S: Into<String>>(mut self, orderby: I) -> Self {
        self.orderby = orderby.into_iter().map(Into::into).collect();
        self
    }

    /// Search phrase.
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Properties to return.
    #[must_use]
    pub fn select<I: IntoIterator<Item = S>, S: Into<String>>(mut self, select: I) -> Self {
        self.select = select.into_iter().map(Into::into).collect();
        self
    }

    /// Items to skip.
    #[must_use]
    pub const fn skip(mut self, skip: i32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Page size.
    #[must_use]
    pub const fn top(mut self, top: i32) -> Self {
        self.top = Some(top);
        self
    }
}

impl ToQueryParameters for CollectionQueryParameters {
    fn to_query_parameters(&self) -> ParameterMap {
        let mut params = ParameterMap::new();
        insert_opt(&mut params, "%24count", self.count);
        insert_list(&mut params, "%24expand", &self.expand);
        insert_opt(&mut params, "%24filter", self.filter.as_deref());
        insert_list(&mut params, "%24orderby", &self.orderby);
        insert_opt(&mut params, "%24search", self.search.as_deref());
        insert_list(&mut params, "%24select", &self.select);
        insert_opt(&mut params, "%24skip", self.skip);
        insert_opt(&mut params, "%24top", self.top);
        params
    }
}

/// OData query options of a single entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQueryParameters {
    /// Expand related entities.
    pub expand: Vec<String>,
    /// Select properties to be returned.
    pub select: Vec<String>,
}

impl ItemQueryParameters {
    /// No query options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand related entities.
    #[must_use]
    pub fn expand<I: IntoIterator<Item = S>, S: Into<String>>(mut self, expand: I) -> Self {
        self.expand = expand.into_iter().map(Into::into).collect();
        self
    }

    /// Properties to return.
    #[must_use]
    pub fn select<I: IntoIterator<Item = S>, S: Into<String>>(mut self, select: I) -> Self {
        self.select = select.into_iter().map(Into::into).collect();
        self
    }
}

impl ToQueryParameters for ItemQueryParameters {
    fn to_query_parameters(&self) -> ParameterMap {
        let mut params = ParameterMap::new();
        insert_list(&mut params, "%24expand", &self.expand);
        insert_list(&mut params, "%24select", &self.select);
        params
    }
}

// ============================================================================
// Base Request Builder
// ============================================================================

/// URL template, path parameters and adapter of one endpoint.
#[derive(Clone)]
pub struct BaseRequestBuilder {
    adapter: Arc<dyn RequestAdapter>,
    url_template: &'static str,
    path_parameters: ParameterMap,
}

impl fmt::Debug for BaseRequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseRequestBuilder")
            .field("url_template", &self.url_template)
            .field("path_parameters", &self.path_parameters)
            .finish_non_exhaustive()
    }
}

impl BaseRequestBuilder {
    /// Bind `url_template` to a copy of `path_parameters`.
    #[must_use]
    pub fn new(
        adapter: Arc<dyn RequestAdapter>,
        url_template: &'static str,
        path_parameters: &ParameterMap,
    ) -> Self {
        Self {
            adapter,
            url_template,
            path_parameters: path_parameters.clone(),
        }
    }

    /// Bind to a literal URL, such as an `@odata.nextLink`.
    #[must_use]
    pub fn with_raw_url(
        adapter: Arc<dyn RequestAdapter>,
        url_template: &'static str,
        raw_url: impl Into<String>,
    ) -> Self {
        let mut path_parameters = ParameterMap::new();
        path_parameters.insert(RAW_URL_KEY.to_string(), ParameterValue::String(raw_url.into()));
        Self {
            adapter,
            url_template,
            path_parameters,
        }
    }

    /// The adapter.
    #[must_use]
    pub fn adapter(&self) -> &Arc<dyn RequestAdapter> {
        &self.adapter
    }

    /// The URL template.
    #[must_use]
    pub const fn url_template(&self) -> &'static str {
        self.url_template
    }

    /// The path parameters.
    #[must_use]
    pub fn path_parameters(&self) -> &ParameterMap {
        &self.path_parameters
    }

    /// A builder for `url_template` with the same parameters.
    #[must_use]
    pub fn navigate(&self, url_template: &'static str) -> Self {
        Self::new(Arc::clone(&self.adapter), url_template, &self.path_parameters)
    }

    /// A builder for `url_template` with the same parameters plus `key = id`.
    #[must_use]
    pub fn child(&self, url_template: &'static str, key: &str, id: impl Into<ParameterValue>) -> Self {
        let mut child = self.navigate(url_template);
        child.path_parameters.insert(key.to_string(), id.into());
        child
    }

    /// Same endpoint, bound to `raw_url`.
    #[must_use]
    pub fn with_url(&self, raw_url: impl Into<String>) -> Self {
        Self::with_raw_url(Arc::clone(&self.adapter), self.url_template, raw_url)
    }

    // ========================================================================
    // Request Information
    // ========================================================================

    /// Assemble a request for `url_template`: caller headers, then options, then query,
    /// then the default `Accept: application/json`.
    pub fn request_information_for<Q: ToQueryParameters>(
        &self,
        method: Method,
        url_template: &'static str,
        config: Option<&RequestConfiguration<Q>>,
    ) -> Result<RequestInformation> {
        let mut info = RequestInformation::new(method, url_template, self.path_parameters.clone());
        if let Some(config) = config {
            info.add_headers(&config.headers)?;
            info.add_request_options(&config.options)?;
            if let Some(query) = &config.query_parameters {
                info.add_query_parameters(query)?;
            }
        }
        info.headers_mut()?.try_add("Accept", JSON_CONTENT_TYPE);
        Ok(info)
    }

    /// Assemble a request for this builder's template.
    pub fn request_information<Q: ToQueryParameters>(
        &self,
        method: Method,
        config: Option<&RequestConfiguration<Q>>,
    ) -> Result<RequestInformation> {
        self.request_information_for(method, self.url_template, config)
    }

    /// Assemble a request carrying `body` as JSON.
    pub fn request_information_with_body<T: Parsable, Q: ToQueryParameters>(
        &self,
        method: Method,
        url_template: &'static str,
        body: &T,
        config: Option<&RequestConfiguration<Q>>,
    ) -> Result<RequestInformation> {
        let mut info = self.request_information_for(method, url_template, config)?;
        info.set_content_from_parsable(
            self.adapter.serialization_writers(),
            JSON_CONTENT_TYPE,
            body,
        )?;
        Ok(info)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Send and read one model; error statuses map to [`ODataError`](crate::models::ODataError).
    pub async fn send<T: Parsable, Q: Sync>(
        &self,
        info: RequestInformation,
        factory: ParsableFactory<T>,
        config: Option<&RequestConfiguration<Q>>,
    ) -> Result<Option<T>> {
        self.adapter
            .as_ref()
            .send(info, factory, Some(odata_error_mappings()), cancellation(config))
            .await
    }

    /// Send and discard the body; error statuses map to [`ODataError`](crate::models::ODataError).
    pub async fn send_no_content<Q: Sync>(
        &self,
        info: RequestInformation,
        config: Option<&RequestConfiguration<Q>>,
    ) -> Result<()> {
        self.adapter
            .as_ref()
            .send_empty(info, Some(odata_error_mappings()), cancellation(config))
            .await
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::HyperRequestAdapter;

    fn base() -> BaseRequestBuilder {
        let adapter: Arc<dyn RequestAdapter> = Arc::new(HyperRequestAdapter::default());
        let mut params = ParameterMap::new();
        params.insert("baseurl".into(), "https://g.example".into());
        BaseRequestBuilder::new(adapter, "{+baseurl}/education/users{?%24select}", &params)
    }

    #[test]
    fn child_builders_copy_parameters() {
        let users = base();
        let user = users.child(
            "{+baseurl}/education/users/{educationUser%2Did}",
            "educationUser%2Did",
            "u1",
        );
        let other = users.child(
            "{+baseurl}/education/users/{educationUser%2Did}",
            "educationUser%2Did",
            "u2",
        );

        check!(!users.path_parameters().contains_key("educationUser%2Did"));
        check!(user.path_parameters().get("educationUser%2Did") == Some(&"u1".into()));
        check!(other.path_parameters().get("educationUser%2Did") == Some(&"u2".into()));
    }

    #[test]
    fn collection_query_names_are_encoded() {
        let query = CollectionQueryParameters::new()
            .count(true)
            .select(["id", "displayName"])
            .filter("startswith(displayName,'A')")
            .top(10);
        let params = query.to_query_parameters();

        check!(params.keys().collect::<Vec<_>>() == vec!["%24count", "%24filter", "%24select", "%24top"]);
        check!(params.get("%24select") == Some(&ParameterValue::List(vec!["id".into(), "displayName".into()])));
        check!(ItemQueryParameters::new().to_query_parameters().is_empty());
    }

    #[test]
    fn request_information_order_and_accept() {
        let config = RequestConfiguration::new()
            .header("Accept", "application/xml")
            .query(ItemQueryParameters::new().select(["id"]));

        let_assert!(Ok(mut info) = base().request_information(Method::Get, Some(&config)));
        check!(info.headers().first("accept") == Some("application/xml"));
        let_assert!(Ok(url) = info.url());
        check!(url.as_str() == "https://g.example/education/users?%24select=id");

        let_assert!(Ok(info) = base().request_information::<()>(Method::Get, None));
        check!(info.headers().first("accept") == Some("application/json"));
    }

    #[test]
    fn raw_url_builder_ignores_template() {
        let next = base().with_url("https://g.example/next?$deltatoken=T");
        let_assert!(Ok(mut info) = next.request_information::<()>(Method::Get, None));
        let_assert!(Ok(url) = info.url());
        check!(url.as_str() == "https://g.example/next?$deltatoken=T");
    }

    #[test]
    fn configuration_debug_hides_token() {
        let config = RequestConfiguration::<()>::new().cancellation(CancellationToken::new());
        check!(format!("{config:?}").contains("cancellable: true"));
    }
}
