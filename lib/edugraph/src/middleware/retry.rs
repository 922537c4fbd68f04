//! Retry policy for transport failures and throttling responses.
//!
//! The policy reads [`RetryOption`] from each request's extensions, so a single call can
//! tighten or disable retries. The wait before the next attempt honours `Retry-After`
//! (in seconds) and otherwise doubles the option's base delay. Every retried request
//! carries a `Retry-Attempt` header.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use tower::retry::Policy;

use crate::{Error, Request, Response, RetryOption};

const RETRY_ATTEMPT_HEADER: &str = "retry-attempt";
const MAX_DELAY: Duration = Duration::from_secs(180);

/// Retry policy for [`RetryLayer`](tower::retry::RetryLayer).
///
/// By default, retries:
/// - connection errors and timeouts
/// - 429, 503 and 504 responses
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    defaults: RetryOption,
    attempts: u32,
}

impl RetryPolicy {
    /// Create a policy used when a request carries no [`RetryOption`].
    #[must_use]
    pub fn new(defaults: RetryOption) -> Self {
        Self {
            defaults,
            attempts: 0,
        }
    }

    /// Returns `true` if the outcome should be retried under `option`.
    fn should_retry(option: &RetryOption, result: &Result<Response<Bytes>, Error>) -> bool {
        match result {
            Ok(response) => option.should_retry_status(response.status()),
            Err(error) => error.is_connection() || error.is_timeout(),
        }
    }

    /// Delay before the next attempt.
    fn delay(option: &RetryOption, attempt: u32, result: &Result<Response<Bytes>, Error>) -> Duration {
        let retry_after = result
            .as_ref()
            .ok()
            .and_then(|response| response.header("retry-after"))
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        retry_after
            .unwrap_or_else(|| option.delay.saturating_mul(2_u32.saturating_pow(attempt)))
            .min(MAX_DELAY)
    }
}

impl Policy<Request<Bytes>, Response<Bytes>, Error> for RetryPolicy {
    type Future = Pin<Box<dyn Future<Output = ()> + Send>>;

    fn retry(
        &mut self,
        req: &mut Request<Bytes>,
        result: &mut Result<Response<Bytes>, Error>,
    ) -> Option<Self::Future> {
        let option = req
            .extensions()
            .get::<RetryOption>()
            .cloned()
            .unwrap_or_else(|| self.defaults.clone());

        if self.attempts >= option.max_retries || !Self::should_retry(&option, result) {
            return None;
        }

        let delay = Self::delay(&option, self.attempts, result);
        self.attempts += 1;
        req.headers_mut()
            .insert(RETRY_ATTEMPT_HEADER, self.attempts.to_string());
        tracing::debug!(attempt = self.attempts, delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), "retrying request");

        Some(Box::pin(tokio::time::sleep(delay)))
    }

    fn clone_request(&mut self, req: &Request<Bytes>) -> Option<Request<Bytes>> {
        Some(req.clone())
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;
    use crate::ResponseHeaders;

    fn response(status: u16) -> Result<Response<Bytes>, Error> {
        Ok(Response::new(status, ResponseHeaders::new(), Bytes::new()))
    }

    #[test]
    fn retries_throttling_statuses() {
        let option = RetryOption::default();
        check!(RetryPolicy::should_retry(&option, &response(429)));
        check!(RetryPolicy::should_retry(&option, &response(503)));
        check!(RetryPolicy::should_retry(&option, &response(504)));
        check!(!RetryPolicy::should_retry(&option, &response(500)));
        check!(!RetryPolicy::should_retry(&option, &response(404)));
        check!(!RetryPolicy::should_retry(&option, &response(200)));
    }

    #[test]
    fn retries_transport_errors() {
        let option = RetryOption::default();
        check!(RetryPolicy::should_retry(&option, &Err(Error::connection("refused"))));
        check!(RetryPolicy::should_retry(&option, &Err(Error::Timeout)));
        check!(!RetryPolicy::should_retry(&option, &Err(Error::serialization("bad body"))));
    }

    #[test]
    fn delay_prefers_retry_after() {
        let option = RetryOption::default().delay(Duration::from_millis(100));
        let headers: ResponseHeaders = [("Retry-After", "2")].into_iter().collect();
        let throttled = Ok(Response::new(429, headers, Bytes::new()));

        check!(RetryPolicy::delay(&option, 0, &throttled) == Duration::from_secs(2));
        check!(RetryPolicy::delay(&option, 0, &response(503)) == Duration::from_millis(100));
        check!(RetryPolicy::delay(&option, 2, &response(503)) == Duration::from_millis(400));
        check!(RetryPolicy::delay(&option.delay(Duration::from_secs(100)), 3, &response(503)) == MAX_DELAY);
    }

    #[test]
    fn request_option_overrides_defaults() {
        let url = url::Url::parse("https://g.example/").expect("valid url");
        let mut extensions = http::Extensions::new();
        extensions.insert(RetryOption::new(0));
        let mut request = Request::builder(crate::Method::Get, url)
            .extensions(extensions)
            .build();

        let mut policy = RetryPolicy::new(RetryOption::new(5));
        check!(policy.retry(&mut request, &mut response(503)).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn attempts_are_counted_and_tagged() {
        let url = url::Url::parse("https://g.example/").expect("valid url");
        let mut request = Request::builder(crate::Method::Get, url).build();
        let mut policy = RetryPolicy::new(RetryOption::new(1).delay(Duration::from_millis(10)));

        let wait = policy.retry(&mut request, &mut response(503));
        check!(wait.is_some());
        if let Some(wait) = wait {
            wait.await;
        }
        check!(request.header("retry-attempt") == Some("1"));
        check!(policy.retry(&mut request, &mut response(503)).is_none());
    }
}
