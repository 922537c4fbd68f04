//! Entry point of the generated API surface.

use std::sync::Arc;

use crate::education::EducationRequestBuilder;
use crate::{BASE_URL_KEY, BaseRequestBuilder, ParameterMap, ParameterValue, RequestAdapter};

/// Base URL used when the adapter has none.
pub const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Root of the request builder tree.
///
/// ```
/// use std::sync::Arc;
///
/// use edugraph::{GraphServiceClient, HyperRequestAdapter};
///
/// let client = GraphServiceClient::new(Arc::new(HyperRequestAdapter::default()));
/// let users = client.education().users().by_education_user_id("u1");
/// assert!(users.base().path_parameters().contains_key("educationUser%2Did"));
/// ```
#[derive(Debug, Clone)]
pub struct GraphServiceClient {
    base: BaseRequestBuilder,
}

impl GraphServiceClient {
    /// URL template of the root.
    pub const URL_TEMPLATE: &'static str = "{+baseurl}";

    /// Create a client on top of `adapter`.
    ///
    /// The adapter's base URL is used when set, [`DEFAULT_BASE_URL`] otherwise.
    #[must_use]
    pub fn new(adapter: Arc<dyn RequestAdapter>) -> Self {
        let base_url = match adapter.base_url() {
            "" => DEFAULT_BASE_URL,
            configured => configured,
        };
        let mut path_parameters = ParameterMap::new();
        path_parameters.insert(
            BASE_URL_KEY.to_string(),
            ParameterValue::String(base_url.trim_end_matches('/').to_string()),
        );
        Self {
            base: BaseRequestBuilder::new(adapter, Self::URL_TEMPLATE, &path_parameters),
        }
    }

    /// `/education`
    #[must_use]
    pub fn education(&self) -> EducationRequestBuilder {
        EducationRequestBuilder::navigate_from(&self.base)
    }

    /// The adapter every builder sends through.
    #[must_use]
    pub fn adapter(&self) -> &Arc<dyn RequestAdapter> {
        self.base.adapter()
    }

    /// The base URL in effect.
    #[must_use]
    pub fn base_url(&self) -> Option<String> {
        self.base
            .path_parameters()
            .get(BASE_URL_KEY)
            .map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::HyperRequestAdapter;

    #[test]
    fn default_base_url() {
        let client = GraphServiceClient::new(Arc::new(HyperRequestAdapter::default()));
        check!(client.base_url().as_deref() == Some(DEFAULT_BASE_URL));

        let_assert!(Ok(mut info) = client.education().to_get_request_information(None));
        let_assert!(Ok(url) = info.url());
        check!(url.as_str() == "https://graph.microsoft.com/v1.0/education");
    }

    #[test]
    fn adapter_base_url_wins() {
        let adapter = HyperRequestAdapter::builder()
            .base_url("https://graph.example/beta/")
            .build();
        let client = GraphServiceClient::new(Arc::new(adapter));
        check!(client.base_url().as_deref() == Some("https://graph.example/beta"));
    }
}
