// src/api/payments.rs
//
// The webhook surface polled by the game client. Validation happens before
// any store mutation; validation failures never touch the store.

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::payload::deep_link;
use crate::store::StatusCheck;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct InitiatePaymentRequest {
    pub user_id: Option<String>,
    pub item_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckPaymentStatusRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaymentStatusRequest {
    pub user_id: Option<String>,
    pub item_id: Option<String>,
    pub status: Option<String>,
}

// Blank fields count as missing.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validation_error(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "success": false, "message": message }))
}

#[utoipa::path(
    post,
    path = "/initiate_payment",
    tag = "payments",
    request_body = InitiatePaymentRequest,
    responses(
        (status = 200, description = "Pending purchase recorded, deep link returned"),
        (status = 400, description = "Missing fields or unknown item")
    )
)]
#[post("/initiate_payment")]
pub async fn initiate_payment(
    payload: web::Json<InitiatePaymentRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let payload = payload.into_inner();

    let (Some(user_id), Some(item_id)) = (non_empty(payload.user_id), non_empty(payload.item_id))
    else {
        return validation_error("Missing user_id or item_id");
    };

    if state.catalog.lookup(&item_id).is_none() {
        return validation_error("Invalid item_id");
    }

    state.store.put(&user_id, &item_id).await;
    log::info!("purchase initiated user_id={user_id} item_id={item_id}");

    // The actual payment happens when the user returns to Telegram.
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Payment initiated",
        "telegram_link": deep_link(&state.bot_username, &item_id, &user_id),
    }))
}

#[utoipa::path(
    post,
    path = "/check_payment_status",
    tag = "payments",
    request_body = CheckPaymentStatusRequest,
    responses(
        (status = 200, description = "Current status; a completed record is consumed by this call"),
        (status = 400, description = "Missing user_id")
    )
)]
#[post("/check_payment_status")]
pub async fn check_payment_status(
    payload: web::Json<CheckPaymentStatusRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let Some(user_id) = non_empty(payload.into_inner().user_id) else {
        return validation_error("Missing user_id");
    };

    let check = state.store.consume_if_completed(&user_id).await;
    match check {
        StatusCheck::Completed { item_id } => {
            log::info!("completed purchase delivered user_id={user_id} item_id={item_id}");
            HttpResponse::Ok().json(json!({
                "success": true,
                "status": "completed",
                "item_id": item_id,
            }))
        }
        _ => HttpResponse::Ok().json(json!({ "success": true, "status": check.as_str() })),
    }
}

#[utoipa::path(
    post,
    path = "/update_payment_status",
    tag = "payments",
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Completion recorded; `updated` is false when no record existed"),
        (status = 400, description = "Missing fields, unknown item, or a status other than completed")
    )
)]
#[post("/update_payment_status")]
pub async fn update_payment_status(
    payload: web::Json<UpdatePaymentStatusRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let payload = payload.into_inner();

    let (Some(user_id), Some(item_id), Some(status)) = (
        non_empty(payload.user_id),
        non_empty(payload.item_id),
        non_empty(payload.status),
    ) else {
        return validation_error("Missing user_id, item_id or status");
    };

    // Completion is the only transition the webhook path may drive; it can
    // never un-complete or re-pend a record.
    if status != "completed" {
        return validation_error("Invalid status");
    }

    if state.catalog.lookup(&item_id).is_none() {
        return validation_error("Invalid item_id");
    }

    let updated = state.store.mark_completed(&user_id, &item_id).await;
    if updated {
        log::info!("purchase completed user_id={user_id} item_id={item_id}");
    } else {
        log::warn!(
            "completion with no pending record user_id={user_id} item_id={item_id}; \
             treated as no-op"
        );
    }

    HttpResponse::Ok().json(json!({ "success": true, "updated": updated }))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Liveness"))
)]
#[get("/")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok", "message": "Server is running" }))
}
