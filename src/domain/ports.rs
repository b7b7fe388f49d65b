use uuid::Uuid;

use super::errors::{DomainError, ShipmentError};
use super::shipment::{CarrierOrder, ShipmentOutcome, ShipmentRequest, ShippableOrder};

/// Read access to orders and their related records, plus the single write
/// the submitter performs.
pub trait OrderRepository: Send + Sync + 'static {
    fn find_shippable(&self, id: Uuid) -> Result<Option<ShippableOrder>, DomainError>;
    /// Overwrite the tracking code and carrier status of `outcome.order_id`.
    fn record_shipment(&self, outcome: &ShipmentOutcome) -> Result<(), DomainError>;
}

/// Persisted key/value configuration.
pub trait SettingsRepository: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
}

/// The carrier's order-creation endpoint.
pub trait ShipmentCarrier: Send + Sync + 'static {
    fn create_order(
        &self,
        token: &str,
        request: &ShipmentRequest,
    ) -> Result<CarrierOrder, ShipmentError>;
}
