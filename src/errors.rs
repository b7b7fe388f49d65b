use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::{DomainError, ShipmentError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Shipment(#[from] ShipmentError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

fn shipment_status(e: &ShipmentError) -> StatusCode {
    match e {
        ShipmentError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        ShipmentError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ShipmentError::CarrierHttp { .. } | ShipmentError::Transport(_) => StatusCode::BAD_GATEWAY,
        ShipmentError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ShipmentError::MissingConfiguration
        | ShipmentError::IncompleteCompanyAddress { .. }
        | ShipmentError::MissingDestination { .. }
        | ShipmentError::IncompleteDestinationAddress { .. }
        | ShipmentError::NoDeliverableProducts { .. }
        | ShipmentError::CarrierInvalidData(_)
        | ShipmentError::CarrierRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Shipment(e) => shipment_status(e),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let kind = match self {
            AppError::NotFound => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Shipment(e) => e.kind(),
            AppError::Internal(_) => "internal",
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("{}", self);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error",
                "kind": kind
            }));
        }
        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "kind": kind
        }))
    }
}
