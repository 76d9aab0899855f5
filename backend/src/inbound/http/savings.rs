//! Savings balance API handlers.
//!
//! `/api/savings/latest` is registered ahead of `/api/savings/{id}`; the
//! numeric path extractor would otherwise reject `latest` with a 404.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::finance::{Savings, SavingsBalance};
use crate::inbound::http::ApiResult;
use crate::inbound::http::finance::StatusMessage;
use crate::inbound::http::state::HttpState;

/// Body for `POST` and `PUT /api/savings`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SavingsRequest {
    #[schema(example = 15250.75)]
    pub balance: Option<f64>,
}

impl SavingsRequest {
    fn into_balance(self) -> Result<SavingsBalance, Error> {
        let raw = self.balance.ok_or_else(|| {
            Error::invalid_request("balance is required")
                .with_details(json!({ "field": "balance", "code": "missing_field" }))
        })?;
        SavingsBalance::try_new(raw).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "balance", "code": "non_finite" }))
        })
    }
}

/// List savings snapshots, newest first.
#[utoipa::path(
    get,
    path = "/api/savings",
    responses((status = 200, description = "Snapshots", body = [Savings])),
    tags = ["finance"],
    operation_id = "listSavings"
)]
#[get("/savings")]
pub async fn list_savings(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Savings>>> {
    Ok(web::Json(state.savings.list_savings().await?))
}

/// Most recently recorded snapshot.
#[utoipa::path(
    get,
    path = "/api/savings/latest",
    responses(
        (status = 200, description = "Current balance", body = Savings),
        (status = 404, description = "Nothing recorded yet", body = Error)
    ),
    tags = ["finance"],
    operation_id = "latestSavings"
)]
#[get("/savings/latest")]
pub async fn latest_savings(state: web::Data<HttpState>) -> ApiResult<web::Json<Savings>> {
    Ok(web::Json(state.savings.latest_savings().await?))
}

#[utoipa::path(
    get,
    path = "/api/savings/{id}",
    params(("id" = i32, Path, description = "Snapshot identifier")),
    responses(
        (status = 200, description = "Snapshot", body = Savings),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["finance"],
    operation_id = "getSavings"
)]
#[get("/savings/{id}")]
pub async fn get_savings(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
) -> ApiResult<web::Json<Savings>> {
    Ok(web::Json(state.savings.get_savings(id.into_inner()).await?))
}

#[utoipa::path(
    post,
    path = "/api/savings",
    request_body = SavingsRequest,
    responses(
        (status = 201, description = "Recorded", body = Savings),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["finance"],
    operation_id = "createSavings"
)]
#[post("/savings")]
pub async fn create_savings(
    state: web::Data<HttpState>,
    payload: web::Json<SavingsRequest>,
) -> ApiResult<HttpResponse> {
    let balance = payload.into_inner().into_balance()?;
    let created = state.savings.create_savings(balance).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    put,
    path = "/api/savings/{id}",
    params(("id" = i32, Path, description = "Snapshot identifier")),
    request_body = SavingsRequest,
    responses(
        (status = 200, description = "Updated", body = Savings),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["finance"],
    operation_id = "updateSavings"
)]
#[put("/savings/{id}")]
pub async fn update_savings(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
    payload: web::Json<SavingsRequest>,
) -> ApiResult<web::Json<Savings>> {
    let balance = payload.into_inner().into_balance()?;
    Ok(web::Json(
        state.savings.update_savings(id.into_inner(), balance).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/savings/{id}",
    params(("id" = i32, Path, description = "Snapshot identifier")),
    responses(
        (status = 200, description = "Deleted", body = StatusMessage),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["finance"],
    operation_id = "deleteSavings"
)]
#[delete("/savings/{id}")]
pub async fn delete_savings(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
) -> ApiResult<web::Json<StatusMessage>> {
    state.savings.delete_savings(id.into_inner()).await?;
    Ok(web::Json(StatusMessage::success("Savings record deleted.")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::MockSavingsLedger;
    use crate::inbound::http::test_utils::{fixture_state, read_json};

    fn snapshot(id: i32, balance: f64) -> Savings {
        Savings {
            id,
            balance,
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
                .single()
                .expect("timestamp"),
        }
    }

    fn app(
        savings: MockSavingsLedger,
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
                savings: Arc::new(savings),
                ..fixture_state()
            }))
            .service(
                web::scope("/api")
                    .service(list_savings)
                    .service(latest_savings)
                    .service(get_savings)
                    .service(create_savings)
                    .service(update_savings)
                    .service(delete_savings),
            )
    }

    #[actix_web::test]
    async fn latest_is_not_shadowed_by_id_route() {
        let mut savings = MockSavingsLedger::new();
        savings
            .expect_latest_savings()
            .times(1)
            .returning(|| Ok(snapshot(3, 900.0)));
        let app = test::init_service(app(savings)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/savings/latest").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(read_json(res).await["id"], 3);
    }

    #[actix_web::test]
    async fn latest_without_records_is_not_found() {
        let mut savings = MockSavingsLedger::new();
        savings
            .expect_latest_savings()
            .returning(|| Err(Error::not_found("No savings recorded yet.")));
        let app = test::init_service(app(savings)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/savings/latest").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn create_records_balance() {
        let mut savings = MockSavingsLedger::new();
        savings
            .expect_create_savings()
            .withf(|balance| balance.value() == -120.5)
            .times(1)
            .returning(|balance| Ok(snapshot(1, balance.value())));
        let app = test::init_service(app(savings)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/savings")
                .set_json(json!({ "balance": -120.5 }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(read_json(res).await["balance"], -120.5);
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "balance": null }))]
    #[actix_web::test]
    async fn balance_is_required(#[case] payload: Value) {
        let app = test::init_service(app(MockSavingsLedger::new())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/savings")
                .set_json(payload)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn update_and_delete_by_id() {
        let mut savings = MockSavingsLedger::new();
        savings
            .expect_update_savings()
            .withf(|id, balance| *id == 5 && balance.value() == 10.0)
            .returning(|id, balance| Ok(snapshot(id, balance.value())));
        savings
            .expect_delete_savings()
            .with(eq(5))
            .returning(|_| Ok(()));
        let app = test::init_service(app(savings)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/savings/5")
                .set_json(json!({ "balance": 10 }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = test::call_service(
            &app,
            test::TestRequest::delete().uri("/api/savings/5").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(read_json(res).await["status"], "success");
    }
}
