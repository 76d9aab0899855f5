//! Visited places and links over HTTP, persisted in the JSON store.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use travelmap::domain::BypassPolicy;
use travelmap::outbound::json_store::{LINKS_FILE, VISITED_FILE};

mod support;

use support::{ScriptedProviderClient, json_store_state, travel_app};

macro_rules! open_app {
    ($dir:expr) => {
        test::init_service(travel_app(
            json_store_state($dir, ScriptedProviderClient::returning("john@example.com")),
            Arc::new(BypassPolicy),
        ))
        .await
    };
}

#[rstest]
#[actix_web::test]
async fn visited_upsert_matches_names_case_insensitively() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = open_app!(dir.path());

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/visited")
            .set_json(json!({"name": "France", "which_map": "world", "john": true}))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(created).await;

    let updated = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/visited")
            .set_json(json!({"name": "FRANCE", "which_map": "world", "marcia": true}))
            .to_request(),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(updated).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["name"], "France");
    assert_eq!(updated["marcia"], true);

    let other_map = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/visited")
            .set_json(json!({"name": "France", "which_map": "states"}))
            .to_request(),
    )
    .await;
    assert_eq!(other_map.status(), StatusCode::CREATED);

    let world = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/visited?whichMap=world")
            .to_request(),
    )
    .await;
    let world: Vec<Value> = test::read_body_json(world).await;
    assert_eq!(world.len(), 1);

    let stored = std::fs::read_to_string(dir.path().join(VISITED_FILE)).expect("visited file");
    let stored: Vec<Value> = serde_json::from_str(&stored).expect("stored JSON");
    assert_eq!(stored.len(), 2);
}

#[rstest]
#[actix_web::test]
async fn deleted_place_is_gone() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = open_app!(dir.path());

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/visited")
            .set_json(json!({"name": "Texas", "which_map": "states"}))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(created).await;
    let uri = format!("/api/visited/{}", created["id"].as_str().expect("id"));

    let deleted =
        test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let fetched = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);

    let again = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn link_positions_keep_growing_and_survive_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let first_id = {
        let app = open_app!(dir.path());
        let mut ids = Vec::new();
        for name in ["Flights", "Hotels", "Trains"] {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/links")
                    .set_json(json!({"name": name, "url": "https://example.com", "position": 99}))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::CREATED);
            let link: Value = test::read_body_json(res).await;
            ids.push(link["id"].as_str().expect("id").to_owned());
        }
        ids.swap_remove(0)
    };

    let app = open_app!(dir.path());
    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/links/{first_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/links")
            .set_json(json!({"name": "Ferries", "url": "https://ferries.example"}))
            .to_request(),
    )
    .await;
    let ferries: Value = test::read_body_json(res).await;
    assert_eq!(ferries["position"], 4);
    assert_eq!(ferries["notes"], "");

    let res = test::call_service(&app, test::TestRequest::get().uri("/api/links").to_request()).await;
    let names: Vec<String> = test::read_body_json::<Vec<Value>, _>(res)
        .await
        .into_iter()
        .map(|link| link["name"].as_str().expect("name").to_owned())
        .collect();
    assert_eq!(names, ["Hotels", "Trains", "Ferries"]);
    assert!(dir.path().join(LINKS_FILE).exists());
}

#[rstest]
#[actix_web::test]
async fn deleting_the_top_link_does_not_free_its_position() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = open_app!(dir.path());

    let mut created = Vec::new();
    for name in ["Flights", "Hotels"] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/links")
                .set_json(json!({"name": name, "url": "https://example.com"}))
                .to_request(),
        )
        .await;
        created.push(test::read_body_json::<Value, _>(res).await);
    }
    let top = created.pop().expect("second link");
    assert_eq!(top["position"], 2);

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/links/{}", top["id"].as_str().expect("id")))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/links")
            .set_json(json!({"name": "Trains", "url": "https://trains.example"}))
            .to_request(),
    )
    .await;
    let trains: Value = test::read_body_json(res).await;
    assert_eq!(trains["position"], 3);
}

#[rstest]
#[case(json!({"url": "https://example.com"}))]
#[case(json!({"name": "Maps"}))]
#[actix_web::test]
async fn link_without_name_or_url_is_rejected(#[case] body: Value) {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = open_app!(dir.path());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/links")
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn finance_without_database_reports_unavailable() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = open_app!(dir.path());

    let res = test::call_service(&app, test::TestRequest::get().uri("/api/savings").to_request()).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(res.headers().contains_key("trace-id"));
}
