use actix_web::test::TestRequest;
use actix_web::{test, web, App};
use serde_json::json;

use stars_shop::api::payments::{
    check_payment_status, health, initiate_payment, update_payment_status,
};

mod support;

macro_rules! shop_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state)
                .service(health)
                .service(initiate_payment)
                .service(check_payment_status)
                .service(update_payment_status),
        )
        .await
    };
}

#[actix_web::test]
async fn initiate_then_check_reports_pending() {
    let state = web::Data::new(support::build_state());
    let app = shop_app!(state);

    let req = TestRequest::post()
        .uri("/initiate_payment")
        .set_json(json!({ "user_id": "42", "item_id": "coins_100" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Payment initiated"));
    assert_eq!(
        body["telegram_link"],
        json!("https://t.me/TestShopBot?start=pay_coins_100_42")
    );

    let req = TestRequest::post()
        .uri("/check_payment_status")
        .set_json(json!({ "user_id": "42" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["status"], json!("pending"));
}

#[actix_web::test]
async fn check_without_initiate_reports_not_found() {
    let state = web::Data::new(support::build_state());
    let app = shop_app!(state);

    let req = TestRequest::post()
        .uri("/check_payment_status")
        .set_json(json!({ "user_id": "nobody" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], json!("not_found"));
}

#[actix_web::test]
async fn completed_purchase_is_delivered_exactly_once() {
    let state = web::Data::new(support::build_state());
    let app = shop_app!(state);

    let req = TestRequest::post()
        .uri("/initiate_payment")
        .set_json(json!({ "user_id": "7", "item_id": "special_character" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = TestRequest::post()
        .uri("/update_payment_status")
        .set_json(json!({
            "user_id": "7",
            "item_id": "special_character",
            "status": "completed"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["updated"], json!(true));

    // First poll gets the completion and the item.
    let req = TestRequest::post()
        .uri("/check_payment_status")
        .set_json(json!({ "user_id": "7" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], json!("completed"));
    assert_eq!(body["item_id"], json!("special_character"));

    // Second poll finds nothing: delivery consumed the record.
    let req = TestRequest::post()
        .uri("/check_payment_status")
        .set_json(json!({ "user_id": "7" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], json!("not_found"));
}

#[actix_web::test]
async fn initiate_with_unknown_item_rejects_and_stores_nothing() {
    let state = web::Data::new(support::build_state());
    let app = shop_app!(state);

    let req = TestRequest::post()
        .uri("/initiate_payment")
        .set_json(json!({ "user_id": "9", "item_id": "gold_9999" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid item_id"));

    let req = TestRequest::post()
        .uri("/check_payment_status")
        .set_json(json!({ "user_id": "9" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], json!("not_found"));
}

#[actix_web::test]
async fn initiate_with_missing_fields_rejects() {
    let state = web::Data::new(support::build_state());
    let app = shop_app!(state);

    for payload in [
        json!({ "item_id": "coins_100" }),
        json!({ "user_id": "42" }),
        json!({ "user_id": "", "item_id": "coins_100" }),
        json!({ "user_id": "42", "item_id": "  " }),
    ] {
        let req = TestRequest::post()
            .uri("/initiate_payment")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], json!("Missing user_id or item_id"));
    }
}

#[actix_web::test]
async fn reinitiate_replaces_previous_pending_purchase() {
    let state = web::Data::new(support::build_state());
    let app = shop_app!(state);

    for item_id in ["coins_100", "coins_500"] {
        let req = TestRequest::post()
            .uri("/initiate_payment")
            .set_json(json!({ "user_id": "11", "item_id": item_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = TestRequest::post()
        .uri("/update_payment_status")
        .set_json(json!({ "user_id": "11", "item_id": "coins_500", "status": "completed" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["updated"], json!(true));

    let req = TestRequest::post()
        .uri("/check_payment_status")
        .set_json(json!({ "user_id": "11" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["item_id"], json!("coins_500"));
}

#[actix_web::test]
async fn update_without_record_is_accepted_but_not_applied() {
    let state = web::Data::new(support::build_state());
    let app = shop_app!(state);

    let req = TestRequest::post()
        .uri("/update_payment_status")
        .set_json(json!({ "user_id": "ghost", "item_id": "coins_100", "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["updated"], json!(false));
}

#[actix_web::test]
async fn update_rejects_statuses_other_than_completed() {
    let state = web::Data::new(support::build_state());
    let app = shop_app!(state);

    let req = TestRequest::post()
        .uri("/update_payment_status")
        .set_json(json!({ "user_id": "42", "item_id": "coins_100", "status": "pending" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("Invalid status"));
}

#[actix_web::test]
async fn health_reports_ok() {
    let state = web::Data::new(support::build_state());
    let app = shop_app!(state);

    let req = TestRequest::get().uri("/").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["message"], json!("Server is running"));
}
