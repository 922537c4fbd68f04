//! Integration tests for the middleware pipeline of `HyperRequestAdapter`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert2::{check, let_assert};
use bytes::Bytes;
use edugraph::{
    AdapterFuture, AuthenticationProvider, Error, ErrorMappings, HyperRequestAdapter, Method,
    ParameterMap, RedirectOption, RequestAdapter, RequestAdapterExt, RequestInformation, Response,
    ResponseHandlerOption, RetryOption, TimeoutOption, UserAgentOption,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, header_exists, method, path},
};

fn request(server: &MockServer, method: Method, segment: &str) -> RequestInformation {
    let mut params = ParameterMap::new();
    params.insert("baseurl".into(), server.uri().into());
    params.insert("segment".into(), segment.into());
    RequestInformation::new(method, "{+baseurl}/{segment}", params)
}

async fn send(
    adapter: &HyperRequestAdapter,
    info: RequestInformation,
) -> edugraph::Result<Option<Bytes>> {
    adapter.send_bytes(info, None, None).await
}

#[tokio::test]
async fn retries_throttled_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(503).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .and(header_exists("retry-attempt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = HyperRequestAdapter::builder().with_retry().build();
    let_assert!(Ok(Some(body)) = send(&adapter, request(&server, Method::Get, "busy")).await);
    check!(body.as_ref() == b"ok");
}

#[tokio::test]
async fn retry_option_disables_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = HyperRequestAdapter::builder().with_retry().build();
    let mut info = request(&server, Method::Get, "busy");
    let_assert!(Ok(()) = info.add_request_option(RetryOption::new(0)));

    let_assert!(Err(error) = send(&adapter, info).await);
    check!(error.status() == Some(429));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = HyperRequestAdapter::builder().with_retry().build();
    let_assert!(Err(error) = send(&adapter, request(&server, Method::Get, "missing")).await);
    check!(error.is_not_found());
}

#[tokio::test]
async fn timeout_option_bounds_the_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let adapter = HyperRequestAdapter::builder()
        .with_timeout_middleware(Duration::from_secs(30))
        .build();
    let mut info = request(&server, Method::Get, "slow");
    let_assert!(Ok(()) = info.add_request_option(TimeoutOption::new(Duration::from_millis(50))));

    let_assert!(Err(error) = send(&adapter, info).await);
    check!(error.is_timeout());
}

#[tokio::test]
async fn follows_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = HyperRequestAdapter::builder().with_redirects().build();
    let_assert!(Ok(Some(body)) = send(&adapter, request(&server, Method::Get, "old")).await);
    check!(body.as_ref() == b"moved");
}

#[tokio::test]
async fn redirect_option_limits_hops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .mount(&server)
        .await;

    let adapter = HyperRequestAdapter::builder().with_redirects().build();
    let mut info = request(&server, Method::Get, "loop");
    let_assert!(Ok(()) = info.add_request_option(RedirectOption::new(2)));

    let_assert!(Err(Error::TooManyRedirects { max, .. }) = send(&adapter, info).await);
    check!(max == 2);
}

#[tokio::test]
async fn post_becomes_get_after_302() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/done"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/done"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = HyperRequestAdapter::builder().with_redirects().build();
    let mut info = request(&server, Method::Post, "submit");
    let_assert!(Ok(()) = info.set_stream_content(Bytes::from_static(b"payload")));

    let_assert!(Ok(Some(body)) = send(&adapter, info).await);
    check!(body.as_ref() == b"done");
}

#[tokio::test]
async fn user_agent_token_is_added() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/agent"))
        .and(header("user-agent", "school-sync/2.1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = HyperRequestAdapter::builder().with_user_agent().build();
    let mut info = request(&server, Method::Get, "agent");
    let_assert!(Ok(()) = info.add_request_option(UserAgentOption::new("school-sync", "2.1")));

    let_assert!(Ok(None) = send(&adapter, info).await);
}

#[tokio::test]
async fn default_middleware_chain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = HyperRequestAdapter::builder().with_default_middleware().build();
    let_assert!(Ok(Some(body)) = send(&adapter, request(&server, Method::Get, "ping")).await);
    check!(body.as_ref() == b"pong");
}

#[tokio::test]
async fn response_handler_takes_over() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teapot"))
        .respond_with(ResponseTemplate::new(418).set_body_string("short and stout"))
        .mount(&server)
        .await;

    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let handler = move |response: Response, _mappings: &ErrorMappings| -> edugraph::Result<()> {
        if let Ok(mut slot) = sink.lock() {
            *slot = Some(response.status());
        }
        Ok(())
    };

    let adapter = HyperRequestAdapter::default();
    let mut info = request(&server, Method::Get, "teapot");
    let_assert!(Ok(()) = info.add_request_option(ResponseHandlerOption::new(handler)));

    let_assert!(Ok(None) = send(&adapter, info).await);
    check!(*seen.lock().expect("lock") == Some(418));
}

/// Hands out a new token when asked with claims.
#[derive(Debug, Default)]
struct ClaimsAwareAuth {
    claims: Mutex<Vec<Option<String>>>,
}

impl AuthenticationProvider for ClaimsAwareAuth {
    fn authenticate<'a>(
        &'a self,
        info: &'a mut RequestInformation,
        claims: Option<&'a str>,
    ) -> AdapterFuture<'a, ()> {
        Box::pin(async move {
            if let Ok(mut seen) = self.claims.lock() {
                seen.push(claims.map(ToString::to_string));
            }
            let token = if claims.is_some() { "Bearer fresh" } else { "Bearer stale" };
            info.headers_mut()?.insert("Authorization", token);
            Ok(())
        })
    }
}

#[tokio::test]
async fn claims_challenge_reauthenticates_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).insert_header(
            "WWW-Authenticate",
            r#"Bearer realm="", error="insufficient_claims", claims="eyJhY2Nlc3NfdG9rZW4iOnt9fQ==""#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string("granted"))
        .expect(1)
        .mount(&server)
        .await;

    let auth = Arc::new(ClaimsAwareAuth::default());
    let adapter = HyperRequestAdapter::builder()
        .authentication_provider(Arc::clone(&auth))
        .build();

    let_assert!(Ok(Some(body)) = send(&adapter, request(&server, Method::Get, "secure")).await);
    check!(body.as_ref() == b"granted");
    let claims = auth.claims.lock().expect("lock").clone();
    check!(claims == vec![None, Some("eyJhY2Nlc3NfdG9rZW4iOnt9fQ==".to_string())]);
}

#[tokio::test]
async fn native_request_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let adapter = HyperRequestAdapter::default();
    let info = request(&server, Method::Get, "x");
    let_assert!(Ok(native) = adapter.convert_to_native_request(info, None).await);
    check!(native.uri().path() == "/x");
}
