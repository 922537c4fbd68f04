//! Authentication providers.
//!
//! A provider receives each [`RequestInformation`] before it is sent and adds credentials
//! to it. Token acquisition is delegated to an [`AccessTokenProvider`]; the runtime never
//! stores credentials.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::{AdapterFuture, Error, RAW_URL_KEY, RequestInformation, Result};

const AUTHORIZATION_HEADER: &str = "authorization";
const LOCAL_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// Adds credentials to outgoing requests.
pub trait AuthenticationProvider: Send + Sync {
    /// Authenticate `info`.
    ///
    /// `claims` carries the claims of a continuous access evaluation challenge when the
    /// previous attempt was rejected with one.
    fn authenticate<'a>(
        &'a self,
        info: &'a mut RequestInformation,
        claims: Option<&'a str>,
    ) -> AdapterFuture<'a, ()>;
}

impl<P: AuthenticationProvider + ?Sized> AuthenticationProvider for Arc<P> {
    fn authenticate<'a>(
        &'a self,
        info: &'a mut RequestInformation,
        claims: Option<&'a str>,
    ) -> AdapterFuture<'a, ()> {
        (**self).authenticate(info, claims)
    }
}

/// Sends requests as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousAuthenticationProvider;

impl AuthenticationProvider for AnonymousAuthenticationProvider {
    fn authenticate<'a>(
        &'a self,
        _info: &'a mut RequestInformation,
        _claims: Option<&'a str>,
    ) -> AdapterFuture<'a, ()> {
        Box::pin(async { Ok(()) })
    }
}

// ============================================================================
// Allowed hosts
// ============================================================================

/// Case-insensitive host allow-list. An empty list allows every host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedHostsValidator {
    hosts: BTreeSet<String>,
}

impl AllowedHostsValidator {
    /// Creates a validator from host names (no scheme).
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an entry carries a scheme.
    pub fn new<I, S>(hosts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut validator = Self::default();
        for host in hosts {
            let host = host.as_ref().trim();
            if host.contains("://") {
                return Err(Error::configuration(format!(
                    "allowed host '{host}' must not contain a scheme"
                )));
            }
            if !host.is_empty() {
                validator.hosts.insert(host.to_ascii_lowercase());
            }
        }
        Ok(validator)
    }

    /// Allowed hosts, lowercase.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    /// Returns `true` if `url` targets an allowed host.
    #[must_use]
    pub fn is_url_host_valid(&self, url: &Url) -> bool {
        if self.hosts.is_empty() {
            return true;
        }
        url.host_str()
            .is_some_and(|host| self.hosts.contains(&host.to_ascii_lowercase()))
    }
}

fn is_local(url: &Url) -> bool {
    url.host_str()
        .is_some_and(|host| LOCAL_HOSTS.iter().any(|local| host.eq_ignore_ascii_case(local)))
}

// ============================================================================
// Bearer tokens
// ============================================================================

/// Acquires access tokens.
pub trait AccessTokenProvider: Send + Sync {
    /// A token for `url`. An empty token means the request stays anonymous.
    fn get_authorization_token<'a>(
        &'a self,
        url: &'a Url,
        claims: Option<&'a str>,
    ) -> AdapterFuture<'a, String>;
}

/// Returns the same token for every request.
#[derive(Clone)]
pub struct StaticAccessTokenProvider {
    token: String,
}

impl StaticAccessTokenProvider {
    /// Wrap a token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticAccessTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAccessTokenProvider")
            .field("token", &"***")
            .finish()
    }
}

impl AccessTokenProvider for StaticAccessTokenProvider {
    fn get_authorization_token<'a>(
        &'a self,
        _url: &'a Url,
        _claims: Option<&'a str>,
    ) -> AdapterFuture<'a, String> {
        Box::pin(async move { Ok(self.token.clone()) })
    }
}

/// Adds `Authorization: Bearer <token>` to requests for allowed hosts.
///
/// Only `https` URLs receive a token, except for loopback hosts. When called with claims,
/// an existing `Authorization` header is dropped and a fresh token is requested.
#[derive(Debug, Clone)]
pub struct BaseBearerTokenAuthenticationProvider<P> {
    provider: P,
    allowed_hosts: AllowedHostsValidator,
}

impl<P: AccessTokenProvider> BaseBearerTokenAuthenticationProvider<P> {
    /// Wrap a token provider; every host is allowed.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            allowed_hosts: AllowedHostsValidator::default(),
        }
    }

    /// Restrict the hosts that receive a token.
    #[must_use]
    pub fn with_allowed_hosts(mut self, allowed_hosts: AllowedHostsValidator) -> Self {
        self.allowed_hosts = allowed_hosts;
        self
    }

    /// The token provider.
    #[must_use]
    pub fn access_token_provider(&self) -> &P {
        &self.provider
    }
}

impl<P: AccessTokenProvider> AuthenticationProvider for BaseBearerTokenAuthenticationProvider<P> {
    fn authenticate<'a>(
        &'a self,
        info: &'a mut RequestInformation,
        claims: Option<&'a str>,
    ) -> AdapterFuture<'a, ()> {
        Box::pin(async move {
            if claims.is_some() {
                info.headers_mut()?.remove(AUTHORIZATION_HEADER);
            }
            if info.headers().contains_key(AUTHORIZATION_HEADER) {
                return Ok(());
            }

            let url = info.compose_url()?;
            if !self.allowed_hosts.is_url_host_valid(&url) {
                tracing::debug!(host = url.host_str(), "host not allowed, no token added");
                return Ok(());
            }
            if url.scheme() != "https" && !is_local(&url) {
                return Err(Error::authentication("only https is supported"));
            }

            let token = self
                .provider
                .get_authorization_token(&url, claims)
                .await
                .map_err(|err| match err {
                    Error::Authentication(_) | Error::Cancelled => err,
                    other => Error::authentication(other.to_string()),
                })?;
            if token.is_empty() {
                return Ok(());
            }
            tracing::debug!(host = url.host_str(), with_claims = claims.is_some(), "bearer token added");
            info.headers_mut()?
                .insert(AUTHORIZATION_HEADER, format!("Bearer {token}"));
            Ok(())
        })
    }
}

// ============================================================================
// API keys
// ============================================================================

/// Where an API key is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyLocation {
    /// As a request header.
    Header,
    /// As a query parameter appended to the final URL.
    QueryParameter,
}

/// Adds a fixed API key to requests for allowed hosts.
#[derive(Clone)]
pub struct ApiKeyAuthenticationProvider {
    key: String,
    name: String,
    location: ApiKeyLocation,
    allowed_hosts: AllowedHostsValidator,
}

impl ApiKeyAuthenticationProvider {
    /// Creates a provider.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `key` or `name` is empty.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        location: ApiKeyLocation,
        allowed_hosts: AllowedHostsValidator,
    ) -> Result<Self> {
        let key = key.into();
        let name = name.into();
        if key.is_empty() {
            return Err(Error::configuration("api key cannot be empty"));
        }
        if name.is_empty() {
            return Err(Error::configuration("api key parameter name cannot be empty"));
        }
        Ok(Self {
            key,
            name,
            location,
            allowed_hosts,
        })
    }
}

impl fmt::Debug for ApiKeyAuthenticationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAuthenticationProvider")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("allowed_hosts", &self.allowed_hosts)
            .finish_non_exhaustive()
    }
}

impl AuthenticationProvider for ApiKeyAuthenticationProvider {
    fn authenticate<'a>(
        &'a self,
        info: &'a mut RequestInformation,
        _claims: Option<&'a str>,
    ) -> AdapterFuture<'a, ()> {
        Box::pin(async move {
            let mut url = info.compose_url()?;
            if !self.allowed_hosts.is_url_host_valid(&url) {
                return Ok(());
            }
            match self.location {
                ApiKeyLocation::Header => {
                    info.headers_mut()?.insert(&self.name, self.key.clone());
                }
                ApiKeyLocation::QueryParameter => {
                    url.query_pairs_mut().append_pair(&self.name, &self.key);
                    info.set_path_parameter(RAW_URL_KEY, url.to_string())?;
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert2::{check, let_assert};

    use super::*;
    use crate::Method;

    /// Hands out numbered tokens and remembers the claims it was asked for.
    #[derive(Default)]
    struct CountingProvider {
        calls: Mutex<Vec<Option<String>>>,
    }

    impl AccessTokenProvider for CountingProvider {
        fn get_authorization_token<'a>(
            &'a self,
            _url: &'a Url,
            claims: Option<&'a str>,
        ) -> AdapterFuture<'a, String> {
            Box::pin(async move {
                let mut calls = self.calls.lock().expect("not poisoned");
                calls.push(claims.map(str::to_string));
                Ok(format!("token-{}", calls.len()))
            })
        }
    }

    fn info(url: &str) -> RequestInformation {
        RequestInformation::from_raw_url(Method::Get, url)
    }

    #[tokio::test]
    async fn anonymous_leaves_request_untouched() {
        let mut request = info("https://g.example/education");
        AnonymousAuthenticationProvider
            .authenticate(&mut request, None)
            .await
            .expect("anonymous");
        check!(request.headers().is_empty());
    }

    #[tokio::test]
    async fn bearer_token_is_added_once() {
        let provider = BaseBearerTokenAuthenticationProvider::new(CountingProvider::default());
        let mut request = info("https://g.example/education");

        provider.authenticate(&mut request, None).await.expect("token");
        provider.authenticate(&mut request, None).await.expect("token");

        check!(request.headers().first("Authorization") == Some("Bearer token-1"));
        check!(provider.access_token_provider().calls.lock().expect("not poisoned").len() == 1);
    }

    #[tokio::test]
    async fn claims_challenge_replaces_token() {
        let provider = BaseBearerTokenAuthenticationProvider::new(CountingProvider::default());
        let mut request = info("https://g.example/education");

        provider.authenticate(&mut request, None).await.expect("token");
        provider
            .authenticate(&mut request, Some("eyJhY2Nlc3NfdG9rZW4iOnt9fQ=="))
            .await
            .expect("token");

        check!(request.headers().get("authorization").map(<[String]>::len) == Some(1));
        check!(request.headers().first("authorization") == Some("Bearer token-2"));
        let calls = provider.access_token_provider().calls.lock().expect("not poisoned").clone();
        check!(calls == vec![None, Some("eyJhY2Nlc3NfdG9rZW4iOnt9fQ==".to_string())]);
    }

    #[tokio::test]
    async fn disallowed_host_gets_no_token() {
        let hosts = AllowedHostsValidator::new(["graph.example"]).expect("valid hosts");
        let provider = BaseBearerTokenAuthenticationProvider::new(StaticAccessTokenProvider::new("t"))
            .with_allowed_hosts(hosts);
        let mut request = info("https://elsewhere.example/education");

        provider.authenticate(&mut request, None).await.expect("skipped");
        check!(!request.headers().contains_key("authorization"));
    }

    #[tokio::test]
    async fn plain_http_is_rejected_except_loopback() {
        let provider = BaseBearerTokenAuthenticationProvider::new(StaticAccessTokenProvider::new("t"));

        let mut request = info("http://g.example/education");
        let_assert!(Err(Error::Authentication(_)) = provider.authenticate(&mut request, None).await);

        let mut request = info("http://127.0.0.1:8080/education");
        provider.authenticate(&mut request, None).await.expect("loopback");
        check!(request.headers().first("authorization") == Some("Bearer t"));
    }

    #[test]
    fn allowed_hosts_reject_schemes() {
        check!(AllowedHostsValidator::new(["https://graph.example"]).is_err());
        let_assert!(Ok(validator) = AllowedHostsValidator::new(["Graph.Example"]));
        check!(validator.hosts().collect::<Vec<_>>() == ["graph.example"]);
    }

    #[tokio::test]
    async fn api_key_in_header_and_query() {
        let header = ApiKeyAuthenticationProvider::new(
            "secret",
            "X-Api-Key",
            ApiKeyLocation::Header,
            AllowedHostsValidator::default(),
        )
        .expect("valid");
        let mut request = info("https://g.example/education");
        header.authenticate(&mut request, None).await.expect("header");
        check!(request.headers().first("x-api-key") == Some("secret"));

        let query = ApiKeyAuthenticationProvider::new(
            "secret",
            "code",
            ApiKeyLocation::QueryParameter,
            AllowedHostsValidator::default(),
        )
        .expect("valid");
        let mut request = info("https://g.example/education?%24top=1");
        query.authenticate(&mut request, None).await.expect("query");
        check!(request.compose_url().map(String::from).ok() == Some("https://g.example/education?%24top=1&code=secret".to_string()));
    }

    #[test]
    fn api_key_requires_values() {
        check!(
            ApiKeyAuthenticationProvider::new("", "code", ApiKeyLocation::Header, AllowedHostsValidator::default())
                .is_err()
        );
    }
}
