use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::shipment_service::{ShipmentService, ShipmentStatus};
use crate::domain::shipment::ShipmentOutcome;
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitShipmentsRequest {
    /// Orders to send, processed in this order.
    pub order_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentResponse {
    pub order_id: Uuid,
    pub tracking_code: Option<String>,
    pub status: String,
}

impl From<ShipmentOutcome> for ShipmentResponse {
    fn from(o: ShipmentOutcome) -> Self {
        Self {
            order_id: o.order_id,
            tracking_code: o.tracking_code,
            status: o.status,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitShipmentsResponse {
    pub shipments: Vec<ShipmentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentStatusResponse {
    pub order_id: Uuid,
    pub order_name: String,
    /// Null until the order has been sent successfully.
    pub tracking_code: Option<String>,
    pub status: Option<String>,
}

impl From<ShipmentStatus> for ShipmentStatusResponse {
    fn from(s: ShipmentStatus) -> Self {
        Self {
            order_id: s.order_id,
            order_name: s.order_name,
            tracking_code: s.tracking_code,
            status: s.status,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders/shipments
///
/// Sends the given orders to GHTK one after the other. The first failure
/// stops the batch and is returned; orders sent before it keep their
/// tracking code.
#[utoipa::path(
    post,
    path = "/orders/shipments",
    request_body = SubmitShipmentsRequest,
    responses(
        (status = 200, description = "All orders were accepted by the carrier", body = SubmitShipmentsResponse),
        (status = 404, description = "An order does not exist"),
        (status = 422, description = "An order cannot be shipped or the carrier refused it"),
        (status = 502, description = "The carrier answered with an unusable response"),
        (status = 504, description = "The carrier did not answer in time"),
    ),
    tag = "shipments"
)]
pub async fn submit_shipments(
    service: web::Data<ShipmentService>,
    body: web::Json<SubmitShipmentsRequest>,
) -> Result<HttpResponse, AppError> {
    let order_ids = body.into_inner().order_ids;

    let outcomes = web::block(move || service.submit(&order_ids))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(SubmitShipmentsResponse {
        shipments: outcomes.into_iter().map(Into::into).collect(),
    }))
}

/// POST /orders/{id}/shipment
///
/// Sends a single order to GHTK. Sending an order again creates a new
/// carrier shipment and replaces the stored tracking code.
#[utoipa::path(
    post,
    path = "/orders/{id}/shipment",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order accepted by the carrier", body = ShipmentResponse),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Order cannot be shipped or the carrier refused it"),
        (status = 502, description = "The carrier answered with an unusable response"),
        (status = 504, description = "The carrier did not answer in time"),
    ),
    tag = "shipments"
)]
pub async fn submit_shipment(
    service: web::Data<ShipmentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let outcome = web::block(move || service.submit_one(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ShipmentResponse::from(outcome)))
}

/// GET /orders/{id}/shipment
///
/// Returns the tracking code and carrier status stored on the order.
#[utoipa::path(
    get,
    path = "/orders/{id}/shipment",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Stored shipment fields", body = ShipmentStatusResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "shipments"
)]
pub async fn get_shipment(
    service: web::Data<ShipmentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let status = web::block(move || service.shipment_status(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ShipmentStatusResponse::from(status)))
}
