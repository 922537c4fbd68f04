//! Per-call request options.
//!
//! Options are type-keyed: a call holds at most one value per option type. Middleware reads
//! its own option from the transport request's extensions, the adapter never interprets them.
//!
//! ```
//! use std::time::Duration;
//! use edugraph_core::{RequestOptions, TimeoutOption};
//!
//! let mut options = RequestOptions::new();
//! options.add(TimeoutOption::new(Duration::from_secs(5)));
//!
//! assert_eq!(options.get::<TimeoutOption>().map(TimeoutOption::duration), Some(Duration::from_secs(5)));
//! assert_eq!(options.keys().collect::<Vec<_>>(), vec!["TimeoutOption"]);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::Extensions;

use crate::{ErrorMappings, Response, Result};

/// A value that can travel with a request as an option.
pub trait RequestOption: Clone + Send + Sync + 'static {
    /// Stable identifier, used in logs.
    const KEY: &'static str;
}

/// Type-keyed option registry.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    extensions: Extensions,
    keys: Vec<&'static str>,
}

impl RequestOptions {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option, replacing any previous value of the same type.
    pub fn add<T: RequestOption>(&mut self, option: T) {
        if self.extensions.insert(option).is_none() {
            self.keys.push(T::KEY);
        }
    }

    /// Returns the option of type `T`.
    #[must_use]
    pub fn get<T: RequestOption>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }

    /// Removes and returns the option of type `T`.
    pub fn remove<T: RequestOption>(&mut self) -> Option<T> {
        let removed = self.extensions.remove::<T>();
        if removed.is_some() {
            self.keys.retain(|key| *key != T::KEY);
        }
        removed
    }

    /// Returns `true` if an option of type `T` is present.
    #[must_use]
    pub fn contains<T: RequestOption>(&self) -> bool {
        self.extensions.get::<T>().is_some()
    }

    /// Keys of the options present, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keys.iter().copied()
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Merges `other` into this registry; options of `other` win.
    pub fn merge(&mut self, other: &Self) {
        for key in &other.keys {
            if !self.keys.contains(key) {
                self.keys.push(key);
            }
        }
        self.extensions.extend(other.extensions.clone());
    }

    /// The options as [`http::Extensions`], for transport requests.
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

// ============================================================================
// Known Options
// ============================================================================

/// Per-request timeout, enforced by the timeout middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutOption(Duration);

impl TimeoutOption {
    /// Create a timeout option.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    /// The timeout.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.0
    }
}

impl Default for TimeoutOption {
    fn default() -> Self {
        Self(Duration::from_secs(100))
    }
}

impl RequestOption for TimeoutOption {
    const KEY: &'static str = "TimeoutOption";
}

/// Retry behavior for transport errors and throttling statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOption {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Base delay, doubled after each attempt when the server sends no `Retry-After`.
    pub delay: Duration,
    /// Statuses that trigger a retry.
    pub retry_on_statuses: Vec<u16>,
}

impl RetryOption {
    /// Create a retry option with default delay and statuses.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Set the base delay.
    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the statuses that trigger a retry.
    #[must_use]
    pub fn retry_on_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.retry_on_statuses = statuses.into();
        self
    }

    /// Returns `true` if `status` should be retried.
    #[must_use]
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_statuses.contains(&status)
    }
}

impl Default for RetryOption {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(3),
            retry_on_statuses: vec![429, 503, 504],
        }
    }
}

impl RequestOption for RetryOption {
    const KEY: &'static str = "RetryOption";
}

/// Redirect following behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectOption {
    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
    /// Whether redirects are followed at all.
    pub enabled: bool,
}

impl RedirectOption {
    /// Follow up to `max_redirects` redirects.
    #[must_use]
    pub const fn new(max_redirects: usize) -> Self {
        Self {
            max_redirects,
            enabled: true,
        }
    }

    /// Do not follow redirects.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            max_redirects: 0,
            enabled: false,
        }
    }
}

impl Default for RedirectOption {
    fn default() -> Self {
        Self::new(5)
    }
}

impl RequestOption for RedirectOption {
    const KEY: &'static str = "RedirectOption";
}

/// `User-Agent` product token added by the user-agent middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentOption {
    /// Product name.
    pub product: String,
    /// Product version.
    pub version: String,
    /// Whether the token is added.
    pub enabled: bool,
}

impl UserAgentOption {
    /// Create a user-agent option.
    #[must_use]
    pub fn new(product: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            version: version.into(),
            enabled: true,
        }
    }

    /// The `product/version` token.
    #[must_use]
    pub fn token(&self) -> String {
        format!("{}/{}", self.product, self.version)
    }
}

impl Default for UserAgentOption {
    fn default() -> Self {
        Self::new("edugraph", env!("CARGO_PKG_VERSION"))
    }
}

impl RequestOption for UserAgentOption {
    const KEY: &'static str = "UserAgentOption";
}

/// Takes over response processing from the adapter.
pub trait ResponseHandler: Send + Sync + 'static {
    /// Handle the raw response. The adapter returns an empty payload afterwards.
    fn handle_response(&self, response: Response, error_mappings: &ErrorMappings) -> Result<()>;
}

impl<F> ResponseHandler for F
where
    F: Fn(Response, &ErrorMappings) -> Result<()> + Send + Sync + 'static,
{
    fn handle_response(&self, response: Response, error_mappings: &ErrorMappings) -> Result<()> {
        self(response, error_mappings)
    }
}

/// Hands the raw response to a caller-supplied [`ResponseHandler`].
#[derive(Clone)]
pub struct ResponseHandlerOption(Arc<dyn ResponseHandler>);

impl ResponseHandlerOption {
    /// Wrap a handler.
    #[must_use]
    pub fn new(handler: impl ResponseHandler) -> Self {
        Self(Arc::new(handler))
    }

    /// The handler.
    #[must_use]
    pub fn handler(&self) -> &dyn ResponseHandler {
        self.0.as_ref()
    }
}

impl fmt::Debug for ResponseHandlerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResponseHandlerOption").finish_non_exhaustive()
    }
}

impl RequestOption for ResponseHandlerOption {
    const KEY: &'static str = "ResponseHandlerOption";
}
