//! Which routes the login gate guards.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;

use travelmap::domain::{AllowList, AllowListPolicy};

mod support;

use support::{ScriptedProviderClient, json_store_state, location, travel_app};

#[rstest]
#[case("/api/visited?whichMap=world")]
#[case("/api/links")]
#[case("/api/savings/latest")]
#[case("/api/days_left")]
#[actix_web::test]
async fn anonymous_api_requests_are_redirected_to_login(#[case] uri: &str) {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test::init_service(travel_app(
        json_store_state(dir.path(), ScriptedProviderClient::returning("john@example.com")),
        Arc::new(AllowListPolicy::new(AllowList::parse("john@example.com"))),
    ))
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/authorize/google");
}

#[rstest]
#[actix_web::test]
async fn login_routes_stay_public() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test::init_service(travel_app(
        json_store_state(dir.path(), ScriptedProviderClient::returning("john@example.com")),
        Arc::new(AllowListPolicy::new(AllowList::default())),
    ))
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/email").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await, "Unauthenticated");

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/authorize/google").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(location(&res).starts_with("https://accounts.google.com/"));

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/authorize/github").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
