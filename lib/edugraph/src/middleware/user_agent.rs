//! `User-Agent` product token middleware.

use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};

use crate::{Request, UserAgentOption};

/// Layer that appends the [`UserAgentOption`] token to the `User-Agent` header.
#[derive(Debug, Clone, Default)]
pub struct UserAgentLayer {
    defaults: UserAgentOption,
}

impl UserAgentLayer {
    /// Create a layer with the token used when a request carries no [`UserAgentOption`].
    #[must_use]
    pub fn new(defaults: UserAgentOption) -> Self {
        Self { defaults }
    }
}

impl<S> Layer<S> for UserAgentLayer {
    type Service = UserAgent<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UserAgent {
            inner,
            defaults: self.defaults.clone(),
        }
    }
}

/// Service that tags requests with a product token.
#[derive(Debug, Clone)]
pub struct UserAgent<S> {
    inner: S,
    defaults: UserAgentOption,
}

/// The `User-Agent` value with `token` appended once.
fn with_token(current: Option<&str>, token: &str) -> String {
    match current {
        Some(value) if value.split_whitespace().any(|part| part == token) => value.to_string(),
        Some(value) if !value.trim().is_empty() => format!("{} {token}", value.trim()),
        _ => token.to_string(),
    }
}

impl<S> Service<Request<Bytes>> for UserAgent<S>
where
    S: Service<Request<Bytes>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Bytes>) -> Self::Future {
        let option = request
            .extensions()
            .get::<UserAgentOption>()
            .cloned()
            .unwrap_or_else(|| self.defaults.clone());

        if option.enabled {
            let value = with_token(request.header("user-agent"), &option.token());
            request.headers_mut().insert("User-Agent", value);
        }
        self.inner.call(request)
    }
}
