//! Follow redirect middleware.
//!
//! This middleware follows 3xx responses carrying a `Location` header, up to the limit of
//! the request's [`RedirectOption`]. Relative locations resolve against the current URL.
//! The `Authorization` header is dropped when the redirect leaves the original host.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};
use url::Url;

use crate::{Error, Method, RedirectOption, Request, Response, Result};

/// Layer that follows HTTP redirects.
#[derive(Debug, Clone, Default)]
pub struct FollowRedirectLayer {
    defaults: RedirectOption,
}

impl FollowRedirectLayer {
    /// Create a layer following up to five redirects.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layer with the option used when a request carries none.
    #[must_use]
    pub fn with_option(defaults: RedirectOption) -> Self {
        Self { defaults }
    }
}

impl<S> Layer<S> for FollowRedirectLayer {
    type Service = FollowRedirect<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FollowRedirect {
            inner,
            defaults: self.defaults,
        }
    }
}

/// Service that follows HTTP redirects.
#[derive(Debug, Clone)]
pub struct FollowRedirect<S> {
    inner: S,
    defaults: RedirectOption,
}

/// Check if a status code is a redirect.
fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Determine the method for the redirected request.
///
/// - 301, 302, 303: GET
/// - 307, 308: original method
fn redirect_method(status: u16, original: Method) -> Method {
    match status {
        307 | 308 => original,
        _ => Method::Get,
    }
}

/// Resolve a redirect Location URL relative to the current request URL.
fn resolve_redirect_url(base_url: &Url, location: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(location) {
        return Ok(url);
    }
    base_url.join(location).map_err(Error::InvalidUrl)
}

fn same_origin(left: &Url, right: &Url) -> bool {
    left.scheme() == right.scheme()
        && left.host_str() == right.host_str()
        && left.port_or_known_default() == right.port_or_known_default()
}

/// Build the request sent to `location`.
fn redirected(current: Request<Bytes>, status: u16, location: &str) -> Result<Request<Bytes>> {
    let new_url = resolve_redirect_url(current.url(), location)?;
    let new_method = redirect_method(status, current.method());
    let keep_credentials = same_origin(current.url(), &new_url);

    let (original_method, _, mut headers, body, extensions) = current.into_parts();
    if !keep_credentials {
        headers.remove("authorization");
    }
    let body = if new_method == original_method {
        body
    } else {
        headers.remove("content-type");
        None
    };

    let builder = Request::builder(new_method, new_url)
        .headers(&headers)
        .extensions(extensions);
    Ok(match body {
        Some(body) => builder.body(body).build(),
        None => builder.build(),
    })
}

impl<S> Service<Request<Bytes>> for FollowRedirect<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let mut inner = self.inner.clone();
        let option = request
            .extensions()
            .get::<RedirectOption>()
            .copied()
            .unwrap_or(self.defaults);

        Box::pin(async move {
            let mut current_request = request;
            let mut redirects = 0;

            loop {
                let response = inner.call(current_request.clone()).await?;

                if !option.enabled || !is_redirect(response.status()) {
                    return Ok(response);
                }

                if redirects >= option.max_redirects {
                    return Err(Error::TooManyRedirects {
                        count: redirects,
                        max: option.max_redirects,
                    });
                }

                let location = response.header("location").ok_or_else(|| {
                    Error::InvalidRedirect("redirect response missing Location header".into())
                })?;

                current_request = redirected(current_request, response.status(), location)?;
                redirects += 1;
                tracing::debug!(redirects, url = %current_request.url(), "following redirect");
            }
        })
    }
}
