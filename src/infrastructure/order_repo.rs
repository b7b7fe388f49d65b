use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::OrderRepository;
use crate::domain::shipment::{LineItem, Party, ShipmentOutcome, ShippableOrder};
use crate::schema::{order_lines, orders, partners, products, states};

use super::models::{OrderLineRow, OrderRow, PartnerRow, ProductRow, StateRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn find_party(conn: &mut PgConnection, id: Uuid) -> Result<Option<Party>, DomainError> {
    let row = partners::table
        .left_join(states::table)
        .filter(partners::id.eq(id))
        .select((PartnerRow::as_select(), Option::<StateRow>::as_select()))
        .first::<(PartnerRow, Option<StateRow>)>(conn)
        .optional()?;
    Ok(row.map(|(partner, state)| partner.into_party(state)))
}

impl OrderRepository for DieselOrderRepository {
    fn find_shippable(&self, id: Uuid) -> Result<Option<ShippableOrder>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order = orders::table
                .find(id)
                .select(OrderRow::as_select())
                .first(conn)
                .optional()?;

            let Some(order) = order else {
                return Ok(None);
            };

            let company = find_party(conn, order.company_id)?.ok_or_else(|| {
                DomainError::Internal(format!(
                    "company {} of order {} does not exist",
                    order.company_id, order.name
                ))
            })?;

            // A dangling reference reads as "no destination".
            let shipping_partner = match order.shipping_partner_id {
                Some(partner_id) => find_party(conn, partner_id)?,
                None => None,
            };

            let lines = order_lines::table
                .left_join(products::table)
                .filter(order_lines::order_id.eq(order.id))
                .order((order_lines::created_at.asc(), order_lines::id.asc()))
                .select((OrderLineRow::as_select(), Option::<ProductRow>::as_select()))
                .load::<(OrderLineRow, Option<ProductRow>)>(conn)?;

            Ok(Some(ShippableOrder {
                id: order.id,
                name: order.name,
                amount_total: order.amount_total,
                note: order.note,
                company,
                shipping_partner,
                lines: lines
                    .into_iter()
                    .map(|(line, product)| LineItem {
                        id: line.id,
                        product: product.map(Into::into),
                        quantity: line.quantity,
                    })
                    .collect(),
                tracking_code: order.carrier_tracking_code,
                carrier_status: order.carrier_status,
            }))
        })
    }

    fn record_shipment(&self, outcome: &ShipmentOutcome) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(orders::table.find(outcome.order_id))
            .set((
                orders::carrier_tracking_code.eq(outcome.tracking_code.as_deref()),
                orders::carrier_status.eq(outcome.status.as_str()),
                orders::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}
