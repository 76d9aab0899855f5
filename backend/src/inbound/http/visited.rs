//! Visited places API handlers.
//!
//! ```text
//! GET    /api/visited?whichMap=Visited%20World
//! GET    /api/visited/{id}
//! POST   /api/visited {"name":"France","which_map":"world","john":true}
//! PUT    /api/visited/{id} {"todo":false}
//! DELETE /api/visited/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::UpsertOutcome;
use crate::domain::{
    Error, UnknownMapError, VisitFlags, VisitedDraft, VisitedPatch, VisitedPlace,
    VisitedValidationError, WhichMap,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Query for `GET /api/visited`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VisitedQuery {
    /// `world`, `states`, or the UI labels `Visited World` / `Visited States`.
    #[serde(rename = "whichMap")]
    pub which_map: Option<String>,
}

/// Body for `POST` and `PUT /api/visited`.
///
/// Example JSON:
/// `{"name":"France","which_map":"world","john":true,"marcia":false,"todo":false}`
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct VisitedRequest {
    pub name: Option<String>,
    pub which_map: Option<String>,
    pub john: Option<bool>,
    pub marcia: Option<bool>,
    pub todo: Option<bool>,
}

impl VisitedRequest {
    fn flags(&self) -> VisitFlags {
        VisitFlags {
            john: self.john,
            marcia: self.marcia,
            todo: self.todo,
        }
    }

    fn which_map(&self) -> Result<Option<WhichMap>, VisitedValidationError> {
        self.which_map
            .as_deref()
            .map(|raw| WhichMap::from_query_label(Some(raw)))
            .transpose()
            .map_err(VisitedValidationError::from)
    }

    fn into_draft(self) -> Result<VisitedDraft, VisitedValidationError> {
        let which_map = self.which_map()?.ok_or(VisitedValidationError::MissingMap)?;
        let name = self.name.as_deref().ok_or(VisitedValidationError::EmptyName)?;
        VisitedDraft::try_new(name, which_map, self.flags())
    }

    fn into_patch(self) -> Result<VisitedPatch, VisitedValidationError> {
        let which_map = self.which_map()?;
        VisitedPatch::try_new(self.name.as_deref(), which_map, self.flags())
    }
}

fn map_validation_error(err: VisitedValidationError) -> Error {
    match err {
        VisitedValidationError::EmptyName => Error::invalid_request("name is required")
            .with_details(json!({ "field": "name", "code": "empty_name" })),
        VisitedValidationError::MissingMap => Error::invalid_request("which_map is required")
            .with_details(json!({ "field": "which_map", "code": "missing_map" })),
        VisitedValidationError::UnknownMap(UnknownMapError(value)) => {
            Error::invalid_request(format!("unknown map '{value}'"))
                .with_details(json!({ "field": "which_map", "code": "unknown_map" }))
        }
    }
}

/// List places on one map.
#[utoipa::path(
    get,
    path = "/api/visited",
    params(VisitedQuery),
    responses(
        (status = 200, description = "Places on the map", body = [VisitedPlace]),
        (status = 400, description = "Unknown map", body = Error),
        (status = 302, description = "Not signed in")
    ),
    tags = ["visited"],
    operation_id = "listVisited"
)]
#[get("/visited")]
pub async fn list_visited(
    state: web::Data<HttpState>,
    query: web::Query<VisitedQuery>,
) -> ApiResult<web::Json<Vec<VisitedPlace>>> {
    let which_map = WhichMap::from_query_label(query.which_map.as_deref())
        .map_err(|err| map_validation_error(err.into()))?;
    Ok(web::Json(state.visited.list(which_map).await?))
}

/// Fetch one place.
#[utoipa::path(
    get,
    path = "/api/visited/{id}",
    params(("id" = Uuid, Path, description = "Place identifier")),
    responses(
        (status = 200, description = "Place", body = VisitedPlace),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["visited"],
    operation_id = "getVisited"
)]
#[get("/visited/{id}")]
pub async fn get_visited(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<VisitedPlace>> {
    Ok(web::Json(state.visited.get(id.into_inner()).await?))
}

/// Create a place, or update the flags of the place with the same name.
#[utoipa::path(
    post,
    path = "/api/visited",
    request_body = VisitedRequest,
    responses(
        (status = 201, description = "Created", body = VisitedPlace),
        (status = 200, description = "Existing place updated", body = VisitedPlace),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["visited"],
    operation_id = "upsertVisited"
)]
#[post("/visited")]
pub async fn upsert_visited(
    state: web::Data<HttpState>,
    payload: web::Json<VisitedRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft().map_err(map_validation_error)?;
    Ok(match state.visited.upsert(draft).await? {
        UpsertOutcome::Created(place) => HttpResponse::Created().json(place),
        UpsertOutcome::Updated(place) => HttpResponse::Ok().json(place),
    })
}

/// Merge fields into a place.
#[utoipa::path(
    put,
    path = "/api/visited/{id}",
    params(("id" = Uuid, Path, description = "Place identifier")),
    request_body = VisitedRequest,
    responses(
        (status = 200, description = "Updated", body = VisitedPlace),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Name already used on that map", body = Error)
    ),
    tags = ["visited"],
    operation_id = "updateVisited"
)]
#[put("/visited/{id}")]
pub async fn update_visited(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
    payload: web::Json<VisitedRequest>,
) -> ApiResult<web::Json<VisitedPlace>> {
    let patch = payload.into_inner().into_patch().map_err(map_validation_error)?;
    Ok(web::Json(state.visited.update(id.into_inner(), patch).await?))
}

/// Remove a place.
#[utoipa::path(
    delete,
    path = "/api/visited/{id}",
    params(("id" = Uuid, Path, description = "Place identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["visited"],
    operation_id = "deleteVisited"
)]
#[delete("/visited/{id}")]
pub async fn delete_visited(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.visited.delete(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::MockVisitedPlaces;
    use crate::inbound::http::test_utils::{fixture_state, read_json};

    fn france(which_map: WhichMap) -> VisitedPlace {
        VisitedPlace {
            id: Uuid::nil(),
            name: "France".to_owned(),
            which_map,
            john: true,
            marcia: false,
            todo: false,
        }
    }

    fn app(
        visited: MockVisitedPlaces,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(HttpState {
                visited: Arc::new(visited),
                ..fixture_state()
            }))
            .service(
                web::scope("/api")
                    .service(list_visited)
                    .service(get_visited)
                    .service(upsert_visited)
                    .service(update_visited)
                    .service(delete_visited),
            )
    }

    #[rstest]
    #[case("/api/visited", WhichMap::World)]
    #[case("/api/visited?whichMap=Visited%20States", WhichMap::States)]
    #[case("/api/visited?whichMap=world", WhichMap::World)]
    #[actix_web::test]
    async fn list_resolves_map_label(#[case] uri: &str, #[case] expected: WhichMap) {
        let mut visited = MockVisitedPlaces::new();
        visited
            .expect_list()
            .with(eq(expected))
            .times(1)
            .returning(move |which_map| Ok(vec![france(which_map)]));
        let app = test::init_service(app(visited)).await;

        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = read_json(res).await;
        assert_eq!(body[0]["which_map"], expected.as_str());
        assert_eq!(body[0]["name"], "France");
    }

    #[actix_web::test]
    async fn list_rejects_unknown_map() {
        let app = test::init_service(app(MockVisitedPlaces::new())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/visited?whichMap=Visited%20Moon")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case(UpsertOutcome::Created(france(WhichMap::World)), StatusCode::CREATED)]
    #[case(UpsertOutcome::Updated(france(WhichMap::World)), StatusCode::OK)]
    #[actix_web::test]
    async fn upsert_status_reflects_outcome(
        #[case] outcome: UpsertOutcome,
        #[case] expected: StatusCode,
    ) {
        let mut visited = MockVisitedPlaces::new();
        visited
            .expect_upsert()
            .withf(|draft| {
                draft.name() == "france"
                    && draft.which_map() == WhichMap::World
                    && draft.flags().john == Some(true)
                    && draft.flags().marcia.is_none()
            })
            .times(1)
            .return_once(move |_| Ok(outcome));
        let app = test::init_service(app(visited)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/visited")
                .set_json(json!({ "name": "france", "which_map": "world", "john": true }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), expected);
    }

    #[rstest]
    #[case(json!({ "which_map": "world" }), "name")]
    #[case(json!({ "name": "  ", "which_map": "world" }), "name")]
    #[case(json!({ "name": "France" }), "which_map")]
    #[case(json!({ "name": "France", "which_map": "moon" }), "which_map")]
    #[actix_web::test]
    async fn upsert_rejects_incomplete_payloads(#[case] payload: Value, #[case] field: &str) {
        let app = test::init_service(app(MockVisitedPlaces::new())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/visited")
                .set_json(payload)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = read_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn update_conflict_is_reported() {
        let mut visited = MockVisitedPlaces::new();
        visited
            .expect_update()
            .withf(|id, patch| id.is_nil() && patch.name.as_deref() == Some("Spain"))
            .returning(|_, _| Err(Error::conflict("a place named Spain already exists")));
        let app = test::init_service(app(visited)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/visited/{}", Uuid::nil()))
                .set_json(json!({ "name": "Spain" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn get_and_delete_pass_through_not_found() {
        let mut visited = MockVisitedPlaces::new();
        visited
            .expect_delete()
            .returning(|_| Ok(()));
        visited
            .expect_get()
            .returning(|_| Err(Error::not_found("visited place not found")));
        let app = test::init_service(app(visited)).await;
        let uri = format!("/api/visited/{}", Uuid::new_v4());

        let res = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let res = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
