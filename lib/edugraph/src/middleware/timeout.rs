//! Per-request timeout middleware.
//!
//! The deadline comes from the request's [`TimeoutOption`], or from the layer default.
//! Placed inside the retry layer, each attempt gets its own deadline.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};

use crate::{Error, Request, Response, Result, TimeoutOption};

/// Layer that bounds the duration of each request.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutLayer {
    defaults: TimeoutOption,
}

impl TimeoutLayer {
    /// Create a layer with the deadline used when a request carries no [`TimeoutOption`].
    #[must_use]
    pub const fn new(defaults: TimeoutOption) -> Self {
        Self { defaults }
    }
}

impl<S> Layer<S> for TimeoutLayer {
    type Service = Timeout<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Timeout {
            inner,
            defaults: self.defaults,
        }
    }
}

/// Service that fails with [`Error::Timeout`] past the deadline.
#[derive(Debug, Clone)]
pub struct Timeout<S> {
    inner: S,
    defaults: TimeoutOption,
}

impl<S> Service<Request<Bytes>> for Timeout<S>
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
        let deadline = request
            .extensions()
            .get::<TimeoutOption>()
            .copied()
            .unwrap_or(self.defaults)
            .duration();
        let future = self.inner.call(request);

        Box::pin(async move {
            tokio::time::timeout(deadline, future)
                .await
                .map_err(|_| Error::Timeout)?
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert2::{check, let_assert};
    use tower::{ServiceExt, service_fn};

    use super::*;
    use crate::{Method, ResponseHeaders};

    fn slow_service(
        delay: Duration,
    ) -> impl Service<Request<Bytes>, Response = Response<Bytes>, Error = Error, Future: Send>
    + Clone
    + Send
    + 'static {
        service_fn(move |_request: Request<Bytes>| async move {
            tokio::time::sleep(delay).await;
            Ok::<_, Error>(Response::new(200, ResponseHeaders::new(), Bytes::new()))
        })
    }

    fn request(timeout: Option<Duration>) -> Request<Bytes> {
        let url = url::Url::parse("https://g.example/").expect("valid url");
        let mut extensions = http::Extensions::new();
        if let Some(timeout) = timeout {
            extensions.insert(TimeoutOption::new(timeout));
        }
        Request::builder(Method::Get, url)
            .extensions(extensions)
            .build()
    }

    #[tokio::test(start_paused = true)]
    async fn request_option_overrides_default() {
        let service = TimeoutLayer::default().layer(slow_service(Duration::from_secs(2)));
        let result = service
            .oneshot(request(Some(Duration::from_secs(1))))
            .await;
        let_assert!(Err(Error::Timeout) = result);
    }

    #[tokio::test(start_paused = true)]
    async fn completes_within_default() {
        let service = TimeoutLayer::new(TimeoutOption::new(Duration::from_secs(5)))
            .layer(slow_service(Duration::from_secs(2)));
        let_assert!(Ok(response) = service.oneshot(request(None)).await);
        check!(response.status() == 200);
    }
}
