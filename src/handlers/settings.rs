use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::shipment_service::ShipmentService;
use crate::errors::AppError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCarrierTokenRequest {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CarrierTokenStatusResponse {
    pub configured: bool,
}

/// PUT /settings/carrier-token
#[utoipa::path(
    put,
    path = "/settings/carrier-token",
    request_body = UpdateCarrierTokenRequest,
    responses(
        (status = 204, description = "Token stored"),
        (status = 400, description = "Token is empty"),
    ),
    tag = "settings"
)]
pub async fn update_carrier_token(
    service: web::Data<ShipmentService>,
    body: web::Json<UpdateCarrierTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let token = body.into_inner().token;

    web::block(move || service.set_api_token(&token))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /settings/carrier-token
///
/// Tells whether a token is stored. The token itself is never returned.
#[utoipa::path(
    get,
    path = "/settings/carrier-token",
    responses(
        (status = 200, description = "Token presence", body = CarrierTokenStatusResponse),
    ),
    tag = "settings"
)]
pub async fn carrier_token_status(
    service: web::Data<ShipmentService>,
) -> Result<HttpResponse, AppError> {
    let configured = web::block(move || service.api_token_configured())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CarrierTokenStatusResponse { configured }))
}
