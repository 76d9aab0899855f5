//! Travel links API handlers.
//!
//! ```text
//! GET    /api/links
//! POST   /api/links {"name":"Rail passes","url":"https://www.seat61.com/"}
//! PUT    /api/links/{id} {"position":3}
//! DELETE /api/links/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, Link, LinkDraft, LinkPatch, LinkValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Body for `POST` and `PUT /api/links`.
///
/// `position` is ignored on create; the server appends new links.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LinkRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub position: Option<i64>,
}

impl LinkRequest {
    fn into_draft(self) -> Result<LinkDraft, LinkValidationError> {
        LinkDraft::try_new(
            self.name.as_deref().unwrap_or_default(),
            self.url.as_deref().unwrap_or_default(),
            self.notes.as_deref(),
        )
    }

    fn into_patch(self) -> Result<LinkPatch, LinkValidationError> {
        LinkPatch::try_new(
            self.name.as_deref(),
            self.url.as_deref(),
            self.notes.as_deref(),
            self.position,
        )
    }
}

fn map_validation_error(err: LinkValidationError) -> Error {
    match err {
        LinkValidationError::EmptyName => Error::invalid_request("name is required")
            .with_details(json!({ "field": "name", "code": "empty_name" })),
        LinkValidationError::EmptyUrl => Error::invalid_request("url is required")
            .with_details(json!({ "field": "url", "code": "empty_url" })),
    }
}

/// List links by position.
#[utoipa::path(
    get,
    path = "/api/links",
    responses((status = 200, description = "Links ordered by position", body = [Link])),
    tags = ["links"],
    operation_id = "listLinks"
)]
#[get("/links")]
pub async fn list_links(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Link>>> {
    Ok(web::Json(state.links.list().await?))
}

/// Append a link.
#[utoipa::path(
    post,
    path = "/api/links",
    request_body = LinkRequest,
    responses(
        (status = 201, description = "Created", body = Link),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["links"],
    operation_id = "createLink"
)]
#[post("/links")]
pub async fn create_link(
    state: web::Data<HttpState>,
    payload: web::Json<LinkRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft().map_err(map_validation_error)?;
    let link = state.links.create(draft).await?;
    Ok(HttpResponse::Created().json(link))
}

/// Merge fields into a link.
#[utoipa::path(
    put,
    path = "/api/links/{id}",
    params(("id" = Uuid, Path, description = "Link identifier")),
    request_body = LinkRequest,
    responses(
        (status = 200, description = "Updated", body = Link),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["links"],
    operation_id = "updateLink"
)]
#[put("/links/{id}")]
pub async fn update_link(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
    payload: web::Json<LinkRequest>,
) -> ApiResult<web::Json<Link>> {
    let patch = payload.into_inner().into_patch().map_err(map_validation_error)?;
    Ok(web::Json(state.links.update(id.into_inner(), patch).await?))
}

/// Remove a link.
#[utoipa::path(
    delete,
    path = "/api/links/{id}",
    params(("id" = Uuid, Path, description = "Link identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["links"],
    operation_id = "deleteLink"
)]
#[delete("/links/{id}")]
pub async fn delete_link(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.links.delete(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::MockTravelLinks;
    use crate::inbound::http::test_utils::{fixture_state, read_json};

    fn app(
        links: MockTravelLinks,
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
                links: Arc::new(links),
                ..fixture_state()
            }))
            .service(
                web::scope("/api")
                    .service(list_links)
                    .service(create_link)
                    .service(update_link)
                    .service(delete_link),
            )
    }

    #[actix_web::test]
    async fn create_ignores_client_position() {
        let mut links = MockTravelLinks::new();
        links
            .expect_create()
            .withf(|draft| draft.name() == "Rail" && draft.notes().is_empty())
            .times(1)
            .returning(|draft| Ok(draft.into_link(Uuid::nil(), 7)));
        let app = test::init_service(app(links)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/links")
                .set_json(json!({ "name": "Rail", "url": "https://rail.example", "position": 1 }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = read_json(res).await;
        assert_eq!(body["position"], 7);
        assert_eq!(body["notes"], "");
    }

    #[rstest]
    #[case(json!({ "url": "https://rail.example" }), "name")]
    #[case(json!({ "name": "Rail" }), "url")]
    #[case(json!({ "name": "Rail", "url": "   " }), "url")]
    #[actix_web::test]
    async fn create_requires_name_and_url(#[case] payload: Value, #[case] field: &str) {
        let app = test::init_service(app(MockTravelLinks::new())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/links")
                .set_json(payload)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(res).await["details"]["field"], field);
    }

    #[actix_web::test]
    async fn update_unknown_link_is_not_found() {
        let mut links = MockTravelLinks::new();
        links
            .expect_update()
            .withf(|_, patch| patch.position == Some(3) && patch.name.is_none())
            .returning(|_, _| Err(Error::not_found("link not found")));
        let app = test::init_service(app(links)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/links/{}", Uuid::new_v4()))
                .set_json(json!({ "position": 3 }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn list_and_delete() {
        let mut links = MockTravelLinks::new();
        links.expect_list().returning(|| {
            Ok(vec![
                LinkDraft::try_new("Maps", "https://maps.example", None)
                    .expect("draft")
                    .into_link(Uuid::nil(), 1),
            ])
        });
        links.expect_delete().times(1).returning(|_| Ok(()));
        let app = test::init_service(app(links)).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/api/links").to_request()).await;
        assert_eq!(read_json(res).await[0]["name"], "Maps");

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/links/{}", Uuid::nil()))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
