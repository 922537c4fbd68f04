//! Tower middleware layers for the request adapter.
//!
//! Every layer wraps the transport service of a
//! [`HyperRequestAdapter`](crate::HyperRequestAdapter) and reads its own
//! [`RequestOption`](crate::RequestOption) from the request extensions, falling back to
//! the value the layer was built with. The adapter copies per-call options into those
//! extensions and never interprets them.
//!
//! # Available Layers
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//! - [`RetryPolicy`] - Retry policy for [`RetryLayer`], driven by [`RetryOption`](crate::RetryOption)
//! - [`TimeoutLayer`] - Per-attempt deadline from [`TimeoutOption`](crate::TimeoutOption)
//! - [`FollowRedirectLayer`] - Follows 3xx responses per [`RedirectOption`](crate::RedirectOption)
//! - [`UserAgentLayer`] - Adds the product token from [`UserAgentOption`](crate::UserAgentOption)
//!
//! # Example: Using the Builder API
//!
//! ```no_run
//! use edugraph::HyperRequestAdapter;
//!
//! let adapter = HyperRequestAdapter::builder()
//!     .with_retry()
//!     .with_redirects()
//!     .with_logging()
//!     .build();
//! ```

mod follow_redirect;
mod logging;
mod retry;
mod timeout;
mod user_agent;

pub use follow_redirect::{FollowRedirect, FollowRedirectLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};
pub use retry::RetryPolicy;
pub use timeout::{Timeout, TimeoutLayer};
pub use user_agent::{UserAgent, UserAgentLayer};

// Re-export tower types for convenience
pub use tower::retry::RetryLayer;
pub use tower::{Layer, ServiceBuilder};
