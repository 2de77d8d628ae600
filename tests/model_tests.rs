//! Integration tests for the resource model against a mock AccountRight server.
//!
//! Tests cover:
//! - Query-string and URL building as seen by the server
//! - `NextPageLink` pagination and `all_items` concatenation
//! - `records` / `first` response unwrapping
//! - create-vs-update dispatch in `save`, `find` and `destroy`
//! - Header derivation on the wire
//! - Error propagation for status and parse failures

use chrono::NaiveDate;
use myob_api::rest::{ModelError, QueryParams, Record};
use myob_api::session::CompanyFileContext;
use myob_api::{HttpError, MyobConfig, Session};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CUSTOMERS: &str = "/accountright/cf-1/Contact/Customer";

fn direct_session(server: &MockServer) -> Session {
    let config = MyobConfig::builder()
        .server_url(format!("{}/accountright", server.uri()))
        .build()
        .unwrap();
    let session = Session::new(config);
    session.set_company_file(CompanyFileContext::new(
        "cf-1",
        "dG9rZW4=",
        Some(format!("{}/accountright/cf-1", server.uri())),
    ));
    session
}

fn page(items: serde_json::Value, next: Option<String>) -> serde_json::Value {
    json!({
        "Items": items,
        "NextPageLink": next,
        "Count": 6
    })
}

#[tokio::test]
async fn test_all_items_follows_next_page_links() {
    let server = MockServer::start().await;
    let next = |skip: u32| Some(format!("{}{CUSTOMERS}?$top=2&$skip={skip}", server.uri()));

    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .and(query_param("$skip", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([{"UID": "c"}, {"UID": "d"}]), next(4))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .and(query_param("$skip", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([{"UID": "e"}, {"UID": "f"}]), None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([{"UID": "a"}, {"UID": "b"}]), next(2))))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let mut customers = session.model("Customer").unwrap();
    let items = customers.all_items(None).await.unwrap();

    let ids: Vec<&str> = items.iter().filter_map(|item| item["UID"].as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e", "f"]);
    assert!(!customers.has_next_page());
}

#[tokio::test]
async fn test_all_sets_and_clears_cursor() {
    let server = MockServer::start().await;
    let next = format!("{}{CUSTOMERS}?$top=2&$skip=2", server.uri());

    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .and(query_param("$skip", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), None)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), Some(next.clone()))))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let mut customers = session.model("Customer").unwrap();
    assert!(!customers.has_next_page());

    customers.all(None).await.unwrap();
    assert!(customers.has_next_page());
    assert_eq!(customers.next_page_link(), Some(next.as_str()));

    customers.next_page(None).await.unwrap();
    assert!(!customers.has_next_page());
}

#[tokio::test]
async fn test_next_page_appends_extra_params() {
    let server = MockServer::start().await;
    let next = format!("{}{CUSTOMERS}?$top=2&$skip=2", server.uri());

    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .and(query_param("$skip", "2"))
        .and(query_param("returnBalances", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), Some(next))))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let mut customers = session.model("Customer").unwrap();
    customers.all(None).await.unwrap();

    let extra = QueryParams::new().param("returnBalances", "true");
    customers.next_page(Some(&extra)).await.unwrap();
}

#[tokio::test]
async fn test_root_all_never_reports_next_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accountright/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Id": "cf-1", "Name": "Acme", "Uri": "http://x/cf-1"}
        ])))
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let mut company_files = session.model("CompanyFile").unwrap();
    let files = company_files.all(None).await.unwrap();

    assert_eq!(files[0]["Name"], "Acme");
    assert!(!company_files.has_next_page());
}

#[tokio::test]
async fn test_query_params_reach_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .and(query_param("$orderby", "CompanyName"))
        .and(query_param("$top", "5"))
        .and(query_param("$filter", "LastName eq 'O\\'Brien'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), None)))
        .expect(1)
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let mut customers = session.model("Customer").unwrap();
    let params = QueryParams::new()
        .orderby("CompanyName")
        .top(5)
        .filter_eq("LastName", "O'Brien");

    let url = customers.build_url(None, Some(&params)).unwrap();
    assert!(url.ends_with("?$orderby=CompanyName&$top=5&$filter=LastName%20eq%20%27O%5C%27Brien%27"));

    customers.all(Some(&params)).await.unwrap();
}

#[tokio::test]
async fn test_records_and_first_unwrap_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{"UID": "a", "CompanyName": "Acme"}, {"UID": "b"}]),
            None,
        )))
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let mut customers = session.model("Customer").unwrap();

    let records = customers.records(None).await.unwrap();
    assert_eq!(records.as_array().unwrap().len(), 2);

    let first = customers.first(None).await.unwrap().unwrap();
    assert_eq!(first["CompanyName"], "Acme");
}

#[tokio::test]
async fn test_first_of_empty_collection_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), None)))
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let mut customers = session.model("Customer").unwrap();
    assert!(customers.first(None).await.unwrap().is_none());
}

#[tokio::test]
async fn test_first_rejects_unexpected_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Message": "hello"})))
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let mut customers = session.model("Customer").unwrap();
    assert!(matches!(
        customers.first(None).await,
        Err(ModelError::UnexpectedShape { operation: "first", .. })
    ));
}

#[tokio::test]
async fn test_save_posts_new_record_with_typecast_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CUSTOMERS))
        .and(header("x-myobapi-version", "v2"))
        .and(body_json(json!({
            "CompanyName": "Acme",
            "LastPaymentDate": "2024-03-01T00:00:00"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let customers = session.model("Customer").unwrap();
    let record = Record::new()
        .with("CompanyName", "Acme")
        .with("LastPaymentDate", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

    let response = customers.save(&record).await.unwrap();
    assert!(response.is_null());
    assert!(record.get("UID").is_none());
}

#[tokio::test]
async fn test_save_puts_existing_record_to_id_url() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{CUSTOMERS}/uid-1")))
        .and(body_json(json!({"UID": "uid-1", "CompanyName": "Acme Pty"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let customers = session.model("Customer").unwrap();
    let record = Record::with_id("uid-1").with("CompanyName", "Acme Pty");

    customers.save(&record).await.unwrap();
}

#[tokio::test]
async fn test_find_and_destroy_use_id_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{CUSTOMERS}/uid-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"UID": "uid-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{CUSTOMERS}/uid-1")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let customers = session.model("Customer").unwrap();

    let found = customers.find("uid-1").await.unwrap();
    assert_eq!(found["UID"], "uid-1");

    let record = Record::try_from(found).unwrap();
    customers.destroy(&record).await.unwrap();
}

#[tokio::test]
async fn test_requests_carry_company_file_token_but_no_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .and(header("x-myobapi-cftoken", "dG9rZW4="))
        .and(header("x-myobapi-version", "v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), None)))
        .expect(1)
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let mut customers = session.model("Customer").unwrap();
    customers.all(None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0]
        .headers
        .iter()
        .any(|(name, _)| name.as_str().eq_ignore_ascii_case("x-myobapi-key")));
}

#[tokio::test]
async fn test_status_error_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"{"Errors":[{"Name":"NotFound"}]}"#),
        )
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let customers = session.model("Customer").unwrap();
    let error = customers.find("missing").await.unwrap_err();

    match error {
        ModelError::Http(HttpError::Response(response)) => {
            assert_eq!(response.code, 404);
            assert!(response.message.contains("NotFound"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_invalid_json_surfaces_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let session = direct_session(&server);
    let mut customers = session.model("Customer").unwrap();
    assert!(matches!(
        customers.all(None).await,
        Err(ModelError::Http(HttpError::Parse { .. }))
    ));
}

#[tokio::test]
async fn test_company_file_kinds_fail_fast_without_selection() {
    let server = MockServer::start().await;
    let config = MyobConfig::builder()
        .server_url(format!("{}/accountright", server.uri()))
        .build()
        .unwrap();
    let session = Session::new(config);
    let mut customers = session.model("Customer").unwrap();

    assert!(matches!(
        customers.all(None).await,
        Err(ModelError::NoCompanyFileSelected)
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}
