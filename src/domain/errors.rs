use thiserror::Error;
use uuid::Uuid;

/// Failures raised by the record store and settings store.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found")]
    NotFound,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Every way a shipment submission can fail. Each variant is terminal for
/// the order being submitted and carries a message meant for the user who
/// triggered the submission.
#[derive(Debug, Error)]
pub enum ShipmentError {
    #[error(
        "The GHTK API token is not configured. Set it under Settings > Shipping > GHTK before sending orders."
    )]
    MissingConfiguration,

    #[error(
        "The address of company '{company}' is incomplete (missing: {}). Update the company's street, ward (street 2), district (city), province and phone.",
        .missing.join(", ")
    )]
    IncompleteCompanyAddress {
        company: String,
        missing: Vec<&'static str>,
    },

    #[error("Order {order} has no delivery address")]
    MissingDestination { order: String },

    #[error(
        "The delivery address of '{partner}' is incomplete (missing: {}). Update the street, ward (street 2), district (city), province and phone.",
        .missing.join(", ")
    )]
    IncompleteDestinationAddress {
        partner: String,
        missing: Vec<&'static str>,
    },

    #[error("Order {order} has no deliverable products")]
    NoDeliverableProducts { order: String },

    #[error("Could not reach the GHTK server (timeout)")]
    Timeout,

    #[error("GHTK rejected the request data: {0}")]
    CarrierInvalidData(String),

    #[error("GHTK API error: {status} - {body}")]
    CarrierHttp { status: u16, body: String },

    #[error("GHTK API connection error: {0}")]
    Transport(String),

    #[error("GHTK reported an error: {0}")]
    CarrierRejected(String),

    #[error("Order {0} not found")]
    OrderNotFound(Uuid),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ShipmentError {
    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ShipmentError::MissingConfiguration => "missing_configuration",
            ShipmentError::IncompleteCompanyAddress { .. } => "incomplete_company_address",
            ShipmentError::MissingDestination { .. } => "missing_destination",
            ShipmentError::IncompleteDestinationAddress { .. } => "incomplete_destination_address",
            ShipmentError::NoDeliverableProducts { .. } => "no_deliverable_products",
            ShipmentError::Timeout => "carrier_timeout",
            ShipmentError::CarrierInvalidData(_) => "carrier_invalid_data",
            ShipmentError::CarrierHttp { .. } => "carrier_http",
            ShipmentError::Transport(_) => "transport",
            ShipmentError::CarrierRejected(_) => "carrier_rejected",
            ShipmentError::OrderNotFound(_) => "order_not_found",
            ShipmentError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<DomainError> for ShipmentError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => ShipmentError::Unexpected("record not found".to_string()),
            DomainError::InvalidInput(msg) | DomainError::Internal(msg) => {
                ShipmentError::Unexpected(msg)
            }
        }
    }
}
