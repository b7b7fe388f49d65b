use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::{DomainError, ShipmentError};
use crate::domain::ports::{OrderRepository, SettingsRepository, ShipmentCarrier};
use crate::domain::shipment::{validate_and_build, ShipmentOutcome};

/// Settings key under which the carrier API token is stored.
pub const API_TOKEN_KEY: &str = "carrier.ghtk.api_token";

/// What is currently stored on an order about its carrier shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentStatus {
    pub order_id: Uuid,
    pub order_name: String,
    pub tracking_code: Option<String>,
    pub status: Option<String>,
}

/// Submits orders to the carrier and records the result on each order.
#[derive(Clone)]
pub struct ShipmentService {
    orders: Arc<dyn OrderRepository>,
    settings: Arc<dyn SettingsRepository>,
    carrier: Arc<dyn ShipmentCarrier>,
}

impl ShipmentService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        settings: Arc<dyn SettingsRepository>,
        carrier: Arc<dyn ShipmentCarrier>,
    ) -> Self {
        Self {
            orders,
            settings,
            carrier,
        }
    }

    /// Submit every order in `order_ids`, one after the other.
    ///
    /// The first failure aborts the batch: orders already submitted keep
    /// their recorded result and the remaining ones are not attempted.
    pub fn submit(&self, order_ids: &[Uuid]) -> Result<Vec<ShipmentOutcome>, ShipmentError> {
        let token = self.api_token().inspect_err(|e| {
            log::warn!("Shipment submission refused ({}): {}", e.kind(), e);
        })?;

        let mut outcomes = Vec::with_capacity(order_ids.len());
        for &order_id in order_ids {
            let outcome = self.submit_with_token(&token, order_id).inspect_err(|e| {
                log::warn!(
                    "Shipment submission for order {} failed ({}): {}",
                    order_id,
                    e.kind(),
                    e
                );
            })?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    pub fn submit_one(&self, order_id: Uuid) -> Result<ShipmentOutcome, ShipmentError> {
        let mut outcomes = self.submit(&[order_id])?;
        outcomes
            .pop()
            .ok_or_else(|| ShipmentError::Unexpected("no shipment recorded".to_string()))
    }

    pub fn shipment_status(&self, order_id: Uuid) -> Result<ShipmentStatus, ShipmentError> {
        let order = self
            .orders
            .find_shippable(order_id)?
            .ok_or(ShipmentError::OrderNotFound(order_id))?;
        Ok(ShipmentStatus {
            order_id: order.id,
            order_name: order.name,
            tracking_code: order.tracking_code,
            status: order.carrier_status,
        })
    }

    pub fn set_api_token(&self, token: &str) -> Result<(), DomainError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::InvalidInput(
                "API token must not be empty".to_string(),
            ));
        }
        self.settings.set(API_TOKEN_KEY, token)?;
        log::info!("Carrier API token updated");
        Ok(())
    }

    pub fn api_token_configured(&self) -> Result<bool, DomainError> {
        Ok(self
            .settings
            .get(API_TOKEN_KEY)?
            .is_some_and(|t| !t.is_empty()))
    }

    // Read at every call so a token changed in the settings takes effect
    // on the next submission.
    fn api_token(&self) -> Result<String, ShipmentError> {
        self.settings
            .get(API_TOKEN_KEY)?
            .filter(|t| !t.is_empty())
            .ok_or(ShipmentError::MissingConfiguration)
    }

    fn submit_with_token(
        &self,
        token: &str,
        order_id: Uuid,
    ) -> Result<ShipmentOutcome, ShipmentError> {
        let order = self
            .orders
            .find_shippable(order_id)?
            .ok_or(ShipmentError::OrderNotFound(order_id))?;

        let request = validate_and_build(&order)?;
        log::info!(
            "Sending order {} to GHTK ({} products)",
            order.name,
            request.products.len()
        );

        let carrier_order = self.carrier.create_order(token, &request)?;
        let outcome = ShipmentOutcome::from_carrier(order.id, carrier_order);
        self.orders.record_shipment(&outcome)?;

        log::info!(
            "Order {} shipped: tracking code {:?}, {}",
            order.name,
            outcome.tracking_code,
            outcome.status
        );
        Ok(outcome)
    }
}
