use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::{OrderRepository, SettingsRepository};
use crate::domain::shipment::{ShipmentOutcome, ShippableOrder};

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, DomainError> {
    m.lock()
        .map_err(|e| DomainError::Internal(format!("store lock poisoned: {e}")))
}

/// Order store kept in process memory. Used for local runs without a
/// database and by the test suites.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<HashMap<Uuid, ShippableOrder>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, order: ShippableOrder) -> Result<(), DomainError> {
        lock(&self.orders)?.insert(order.id, order);
        Ok(())
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn find_shippable(&self, id: Uuid) -> Result<Option<ShippableOrder>, DomainError> {
        Ok(lock(&self.orders)?.get(&id).cloned())
    }

    fn record_shipment(&self, outcome: &ShipmentOutcome) -> Result<(), DomainError> {
        let mut orders = lock(&self.orders)?;
        let order = orders.get_mut(&outcome.order_id).ok_or(DomainError::NotFound)?;
        order.tracking_code = outcome.tracking_code.clone();
        order.carrier_status = Some(outcome.status.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySettingsRepository {
    values: Mutex<HashMap<String, String>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsRepository for InMemorySettingsRepository {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(lock(&self.values)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        lock(&self.values)?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
