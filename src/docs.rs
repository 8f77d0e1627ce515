use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::payments::initiate_payment,
        crate::api::payments::check_payment_status,
        crate::api::payments::update_payment_status,
        crate::api::payments::health
    ),
    components(
        schemas(
            crate::api::payments::InitiatePaymentRequest,
            crate::api::payments::CheckPaymentStatusRequest,
            crate::api::payments::UpdatePaymentStatusRequest,
            crate::catalog::Item
        )
    ),
    tags(
        (name = "payments", description = "Purchase initiation and polling for the game client"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
