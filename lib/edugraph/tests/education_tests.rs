//! End-to-end tests of the education builders against a wiremock server.

use std::sync::Arc;

use assert2::{check, let_assert};
use edugraph::models::{
    AnyEducationOrganization, EducationClass, EducationSubmissionStatus, ModelFactory, ODataError,
    UsersDeltaGetResponse,
};
use edugraph::{
    AdapterFuture, AuthenticationProvider, CancellationToken, CollectionQueryParameters, Error,
    GraphServiceClient, HyperRequestAdapter, ItemQueryParameters, Method, ParameterMap,
    RequestAdapterExt, RequestConfiguration, RequestInformation,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

fn client(server: &MockServer) -> GraphServiceClient {
    let adapter = HyperRequestAdapter::builder()
        .base_url(server.uri())
        .build();
    GraphServiceClient::new(Arc::new(adapter))
}

#[tokio::test]
async fn get_nested_school_with_select() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/education/users/u1/schools/s7"))
        .and(query_param("$select", "id,displayName"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "s7",
            "displayName": "North High",
            "principalName": "Dr. Vance"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = RequestConfiguration::new().query(ItemQueryParameters::new().select(["id", "displayName"]));
    let school = client(&server)
        .education()
        .users()
        .by_education_user_id("u1")
        .schools()
        .by_education_school_id("s7");

    let_assert!(Ok(mut info) = school.to_get_request_information(Some(&config)));
    let_assert!(Ok(url) = info.url());
    check!(url.path() == "/education/users/u1/schools/s7");
    check!(url.query() == Some("%24select=id,displayName"));

    let_assert!(Ok(Some(school)) = school.get(Some(&config)).await);
    check!(school.id() == Some("s7"));
    check!(school.organization.display_name.as_deref() == Some("North High"));
    check!(school.principal_name.as_deref() == Some("Dr. Vance"));
}

#[tokio::test]
async fn excuse_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/education/me/assignments/A/submissions/S/excuse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": "S", "status": "excused"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let action = client(&server)
        .education()
        .me()
        .assignments()
        .by_education_assignment_id("A")
        .submissions()
        .by_education_submission_id("S")
        .excuse();

    let_assert!(Ok(info) = action.to_post_request_information(None));
    check!(info.content().is_none());

    let_assert!(Ok(Some(submission)) = action.post(None).await);
    check!(submission.id.as_deref() == Some("S"));
    check!(submission.status == Some(EducationSubmissionStatus::Excused));
}

#[tokio::test]
async fn forbidden_maps_to_odata_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/education/me/assignments/A/submissions/S/excuse"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {
                "code": "Forbidden",
                "message": "Only teachers can excuse submissions",
                "innerError": {"request-id": "req-1"}
            }
        })))
        .mount(&server)
        .await;

    let result = client(&server)
        .education()
        .me()
        .assignments()
        .by_education_assignment_id("A")
        .submissions()
        .by_education_submission_id("S")
        .excuse()
        .post(None)
        .await;

    let_assert!(Err(error) = result);
    check!(error.status() == Some(403));
    check!(error.is_client_error());
    let_assert!(Some(api) = error.api_error());
    let_assert!(Some(odata) = api.payload::<ODataError>());
    check!(odata.code() == Some("Forbidden"));
    check!(odata.to_string() == "Forbidden: Only teachers can excuse submissions");
}

#[tokio::test]
async fn error_without_json_keeps_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/education/classes/c1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let result = client(&server)
        .education()
        .classes()
        .by_education_class_id("c1")
        .get(None)
        .await;

    let_assert!(Err(error) = result);
    check!(error.is_server_error());
    let_assert!(Some(api) = error.api_error());
    check!(api.payload::<ODataError>().is_none());
    check!(api.raw_body().map(|body| body.to_vec()) == Some(b"bad gateway".to_vec()));
}

#[tokio::test]
async fn delta_pagination_follows_next_link() {
    let server = MockServer::start().await;
    let next = format!("{}/next?$deltatoken=T", server.uri());
    Mock::given(method("GET"))
        .and(path("/education/users/delta()"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{"id": "u1"}],
            "@odata.nextLink": next
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .and(query_param("$deltatoken", "T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{"id": "u2"}],
            "@odata.deltaLink": "https://g.example/delta?$deltatoken=U"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let delta = client(&server).education().users().delta();
    let_assert!(Ok(Some(first)) = delta.get_as_delta_get_response(None).await);
    let_assert!(Some(next_link) = first.odata_next_link.clone());
    check!(next_link == next);

    let follow = delta.with_url(next_link.clone());
    let_assert!(Ok(mut info) = follow.to_get_request_information(None));
    let_assert!(Ok(url) = info.url());
    check!(url.as_str() == next_link);

    let_assert!(Ok(Some(last)) = follow.get_as_delta_get_response(None).await);
    check!(last.items().first().and_then(|user| user.id.as_deref()) == Some("u2"));
    check!(last.odata_delta_link.as_deref() == Some("https://g.example/delta?$deltatoken=U"));
}

#[tokio::test]
#[allow(deprecated)]
async fn deprecated_delta_reads_same_page() {
    let server = MockServer::start().await;
    let page = serde_json::json!({
        "value": [{"id": "u1", "displayName": "Ada"}],
        "@odata.deltaLink": "https://g.example/delta?$deltatoken=V"
    });
    Mock::given(method("GET"))
        .and(path("/education/users/delta()"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page))
        .expect(2)
        .mount(&server)
        .await;

    let delta = client(&server).education().users().delta();
    let_assert!(Ok(Some(current)) = delta.get_as_delta_get_response(None).await);
    let_assert!(Ok(Some(legacy)) = delta.get(None).await);

    check!(UsersDeltaGetResponse::from(legacy) == current);
}

#[tokio::test]
async fn unknown_discriminator_reads_base_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/education/organizations/X"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "@odata.type": "#microsoft.graph.futureType",
            "id": "X",
            "displayName": "Somewhere"
        })))
        .mount(&server)
        .await;

    let adapter = HyperRequestAdapter::default();
    let mut params = ParameterMap::new();
    params.insert("baseurl".into(), server.uri().into());
    params.insert("id".into(), "X".into());
    let info = RequestInformation::new(Method::Get, "{+baseurl}/education/organizations/{id}", params);

    let result = adapter
        .send(
            info,
            AnyEducationOrganization::create_from_discriminator_value,
            None,
            None,
        )
        .await;
    let_assert!(Ok(Some(AnyEducationOrganization::Organization(organization))) = result);
    check!(organization.id.as_deref() == Some("X"));
    check!(organization.display_name.as_deref() == Some("Somewhere"));
    check!(
        organization.additional_data.get("@odata.type")
            == Some(&serde_json::json!("#microsoft.graph.futureType"))
    );
}

#[tokio::test]
async fn delete_returns_unit_on_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/education/classes/c1/assignments/a1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .education()
        .classes()
        .by_education_class_id("c1")
        .assignments()
        .by_education_assignment_id("a1")
        .delete(None)
        .await;
    let_assert!(Ok(()) = result);
}

#[tokio::test]
async fn empty_body_yields_no_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/education/me"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let_assert!(Ok(None) = client(&server).education().me().get(None).await);
}

#[tokio::test]
async fn post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/education/classes"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"displayName": "Physics", "grade": "10"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "c9",
            "displayName": "Physics",
            "grade": "10"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let body = EducationClass {
        display_name: Some("Physics".into()),
        grade: Some("10".into()),
        ..EducationClass::default()
    };
    let_assert!(Ok(Some(created)) = client(&server).education().classes().post(&body, None).await);
    check!(created.id.as_deref() == Some("c9"));
}

#[tokio::test]
async fn collection_query_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/education/classes"))
        .and(query_param("$count", "true"))
        .and(query_param("$top", "2"))
        .and(header("consistencylevel", "eventual"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "@odata.count": 7,
            "value": [{"id": "c1"}, {"id": "c2"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = RequestConfiguration::new()
        .header("ConsistencyLevel", "eventual")
        .query(CollectionQueryParameters::new().count(true).top(2));
    let_assert!(Ok(Some(page)) = client(&server).education().classes().get(Some(&config)).await);
    check!(page.odata_count == Some(7));
    check!(page.items().len() == 2);
}

#[tokio::test]
async fn pre_cancelled_call_never_connects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let config = RequestConfiguration::new().cancellation(token);
    let result = client(&server).education().classes().get(Some(&config)).await;
    let_assert!(Err(Error::Cancelled) = result);
}

/// Cancels the call once credentials are attached.
#[derive(Debug)]
struct CancellingAuth {
    token: CancellationToken,
}

impl AuthenticationProvider for CancellingAuth {
    fn authenticate<'a>(
        &'a self,
        info: &'a mut RequestInformation,
        _claims: Option<&'a str>,
    ) -> AdapterFuture<'a, ()> {
        Box::pin(async move {
            info.headers_mut()?.insert("Authorization", "Bearer t");
            self.token.cancel();
            Ok(())
        })
    }
}

#[tokio::test]
async fn cancelled_after_authentication_never_sends() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let adapter = HyperRequestAdapter::builder()
        .base_url(server.uri())
        .authentication_provider(CancellingAuth {
            token: token.clone(),
        })
        .build();
    let client = GraphServiceClient::new(Arc::new(adapter));

    let config = RequestConfiguration::new().cancellation(token);
    let result = client.education().schools().get(Some(&config)).await;
    let_assert!(Err(Error::Cancelled) = result);
}
