use bigdecimal::{BigDecimal, ToPrimitive};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::errors::ShipmentError;

/// Weight in kilograms sent for products that carry no weight of their own.
pub const DEFAULT_PRODUCT_WEIGHT: f64 = 0.1;
/// Hamlet value GHTK accepts when the address has no hamlet ("Other").
pub const DEFAULT_HAMLET: &str = "Khác";
/// Courier note used when the order has none ("handle with care").
pub const DEFAULT_NOTE: &str = "Giao hàng cẩn thận";
const FREESHIP_DISABLED: &str = "0";

// ── Records read from the order store ────────────────────────────────────────

/// A company or customer address as the carrier needs it.
///
/// `street2` is used as the ward and `city` as the district; `state_name` is
/// the display name of the province the party references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Party {
    pub id: Uuid,
    pub name: String,
    pub street: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub state_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Party {
    /// Names of the required address fields that are absent or empty.
    pub fn missing_address_fields(&self) -> Vec<&'static str> {
        [
            ("street", &self.street),
            ("street2", &self.street2),
            ("city", &self.city),
            ("state", &self.state_name),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| !is_filled(value))
        .map(|(field, _)| field)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub id: Uuid,
    pub product: Option<Product>,
    pub quantity: f64,
}

/// An order together with everything needed to submit it to the carrier.
#[derive(Debug, Clone)]
pub struct ShippableOrder {
    pub id: Uuid,
    pub name: String,
    pub amount_total: BigDecimal,
    pub note: Option<String>,
    pub company: Party,
    pub shipping_partner: Option<Party>,
    pub lines: Vec<LineItem>,
    pub tracking_code: Option<String>,
    pub carrier_status: Option<String>,
}

// ── Carrier request ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentProduct {
    pub name: String,
    pub quantity: f64,
    pub weight: f64,
}

/// The `order` section of the GHTK order-creation request. Fields prefixed
/// with `pick_` describe the pickup side (issuing company), the others the
/// delivery side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentOrder {
    pub id: String,
    pub pick_name: String,
    pub pick_address: String,
    pub pick_province: String,
    pub pick_district: String,
    pub pick_ward: String,
    pub pick_tel: String,
    pub name: String,
    pub address: String,
    pub province: String,
    pub district: String,
    pub ward: String,
    pub hamlet: String,
    pub tel: String,
    pub email: String,
    pub is_freeship: String,
    pub pick_money: f64,
    pub note: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentRequest {
    pub order: ShipmentOrder,
    pub products: Vec<ShipmentProduct>,
}

/// Product entries for every line that references a product. Lines without
/// a product are skipped.
pub fn build_shipment_products(lines: &[LineItem]) -> Vec<ShipmentProduct> {
    lines
        .iter()
        .filter_map(|line| {
            let product = line.product.as_ref()?;
            let weight = match product.weight {
                Some(w) if w != 0.0 => w,
                _ => DEFAULT_PRODUCT_WEIGHT,
            };
            Some(ShipmentProduct {
                name: product.name.clone(),
                quantity: line.quantity,
                weight,
            })
        })
        .collect()
}

/// Check that `order` can be shipped and build the carrier request for it.
///
/// Checks run in a fixed order and the first failing one is reported:
/// company address, presence of a destination, destination address, then
/// deliverable products.
pub fn validate_and_build(order: &ShippableOrder) -> Result<ShipmentRequest, ShipmentError> {
    let company = &order.company;
    let missing = company.missing_address_fields();
    if !missing.is_empty() {
        return Err(ShipmentError::IncompleteCompanyAddress {
            company: company.name.clone(),
            missing,
        });
    }

    let partner = order
        .shipping_partner
        .as_ref()
        .ok_or_else(|| ShipmentError::MissingDestination {
            order: order.name.clone(),
        })?;
    let missing = partner.missing_address_fields();
    if !missing.is_empty() {
        return Err(ShipmentError::IncompleteDestinationAddress {
            partner: partner.name.clone(),
            missing,
        });
    }

    let products = build_shipment_products(&order.lines);
    if products.is_empty() {
        return Err(ShipmentError::NoDeliverableProducts {
            order: order.name.clone(),
        });
    }

    let amount = order.amount_total.to_f64().ok_or_else(|| {
        ShipmentError::Unexpected(format!(
            "amount {} of order {} cannot be sent to the carrier",
            order.amount_total, order.name
        ))
    })?;

    Ok(ShipmentRequest {
        order: ShipmentOrder {
            id: order.name.clone(),
            pick_name: company.name.clone(),
            pick_address: text(&company.street),
            pick_province: text(&company.state_name),
            pick_district: text(&company.city),
            pick_ward: text(&company.street2),
            pick_tel: text(&company.phone),
            name: partner.name.clone(),
            address: text(&partner.street),
            province: text(&partner.state_name),
            district: text(&partner.city),
            ward: text(&partner.street2),
            hamlet: DEFAULT_HAMLET.to_string(),
            tel: text(&partner.phone),
            email: text(&partner.email),
            is_freeship: FREESHIP_DISABLED.to_string(),
            pick_money: amount,
            note: or_default(&order.note, DEFAULT_NOTE),
            value: amount,
        },
        products,
    })
}

fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn or_default(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

// ── Carrier response ─────────────────────────────────────────────────────────

/// The shipment GHTK created for an order.
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierOrder {
    pub label: Option<String>,
    pub status_id: Option<String>,
}

/// Interpret the body of a 2xx reply from the order-creation endpoint.
pub fn interpret_reply(body: &str) -> Result<CarrierOrder, ShipmentError> {
    let reply: Value = serde_json::from_str(body)
        .map_err(|e| ShipmentError::Unexpected(format!("invalid GHTK response: {e}")))?;
    if !reply.is_object() {
        return Err(ShipmentError::Unexpected(format!(
            "invalid GHTK response: expected a JSON object, got {reply}"
        )));
    }

    if !is_truthy(&reply["success"]) {
        let message =
            message_text(&reply["message"]).unwrap_or_else(|| "unspecified error".to_string());
        return Err(ShipmentError::CarrierRejected(message));
    }

    let order = &reply["order"];
    Ok(CarrierOrder {
        label: scalar_text(&order["label"]),
        status_id: scalar_text(&order["status_id"]),
    })
}

/// Extract the `message` of a JSON error body, if the body is JSON at all.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    Some(message_text(&value["message"]).unwrap_or_else(|| "unknown carrier error".to_string()))
}

/// Carrier messages are normally strings; anything else is passed on as JSON.
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ── Result written back onto the order ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentOutcome {
    pub order_id: Uuid,
    pub tracking_code: Option<String>,
    pub status: String,
}

impl ShipmentOutcome {
    pub fn from_carrier(order_id: Uuid, carrier: CarrierOrder) -> Self {
        Self {
            order_id,
            tracking_code: carrier.label,
            status: format!(
                "GHTK Status ID: {}",
                carrier.status_id.as_deref().unwrap_or("unknown")
            ),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn complete_party_has_no_missing_fields() {
        assert!(party("A").missing_address_fields().is_empty());
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let mut p = party("A");
        p.street2 = Some(String::new());
        p.state_name = None;
        assert_eq!(p.missing_address_fields(), vec!["street2", "state"]);
    }

    #[test]
    fn zero_or_unset_weight_defaults() {
        let lines = vec![
            line("Zero", Some(0.0), 1.0),
            line("Unset", None, 3.0),
            line("Heavy", Some(2.5), 1.0),
        ];
        let products = build_shipment_products(&lines);
        assert_eq!(products[0].weight, DEFAULT_PRODUCT_WEIGHT);
        assert_eq!(products[1].weight, DEFAULT_PRODUCT_WEIGHT);
        assert_eq!(products[1].quantity, 3.0);
        assert_eq!(products[2].weight, 2.5);
    }

    #[test]
    fn lines_without_product_are_skipped() {
        let mut o = order("S00042");
        o.lines.push(LineItem {
            id: Uuid::new_v4(),
            product: None,
            quantity: 1.0,
        });
        let request = validate_and_build(&o).expect("should build");
        assert_eq!(request.products.len(), 1);
        assert_eq!(request.products[0].name, "Coffee beans");
    }

    #[test]
    fn payload_maps_pickup_and_delivery_blocks() {
        let mut o = order("S00042");
        o.shipping_partner.as_mut().unwrap().email = Some("a@example.com".to_string());
        o.note = Some("Call before delivery".to_string());

        let request = validate_and_build(&o).expect("should build");
        let body = serde_json::to_value(&request).unwrap();
        let order = &body["order"];

        assert_eq!(order["id"], "S00042");
        assert_eq!(order["pick_name"], "KTQ Warehouse");
        assert_eq!(order["pick_address"], "52 Co Bac");
        assert_eq!(order["pick_province"], "TP Da Nang");
        assert_eq!(order["pick_district"], "Quan Hai Chau");
        assert_eq!(order["pick_ward"], "Phuong Hai Chau");
        assert_eq!(order["pick_tel"], "0905000000");
        assert_eq!(order["name"], "Nguyen Van A");
        assert_eq!(order["hamlet"], DEFAULT_HAMLET);
        assert_eq!(order["email"], "a@example.com");
        assert_eq!(order["is_freeship"], "0");
        assert_eq!(order["pick_money"], 250000.0);
        assert_eq!(order["value"], 250000.0);
        assert_eq!(order["note"], "Call before delivery");
        assert_eq!(body["products"][0]["quantity"], 2.0);
        assert_eq!(body["products"][0]["weight"], 0.5);
    }

    #[test]
    fn missing_note_and_email_get_defaults() {
        let mut o = order("S1");
        o.note = Some(String::new());
        let request = validate_and_build(&o).expect("should build");
        assert_eq!(request.order.note, DEFAULT_NOTE);
        assert_eq!(request.order.email, "");
    }

    #[test]
    fn company_checked_before_destination() {
        let mut o = order("S1");
        o.company.phone = None;
        o.shipping_partner = None;
        let err = validate_and_build(&o).unwrap_err();
        assert!(matches!(err, ShipmentError::IncompleteCompanyAddress { .. }));
    }

    #[test]
    fn each_missing_destination_field_is_reported() {
        for field in ["street", "street2", "city", "state", "phone"] {
            let mut o = order("S1");
            let p = o.shipping_partner.as_mut().unwrap();
            match field {
                "street" => p.street = None,
                "street2" => p.street2 = None,
                "city" => p.city = Some(String::new()),
                "state" => p.state_name = None,
                _ => p.phone = None,
            }
            match validate_and_build(&o) {
                Err(ShipmentError::IncompleteDestinationAddress { partner, missing }) => {
                    assert_eq!(partner, "Nguyen Van A");
                    assert_eq!(missing, vec![field]);
                }
                other => panic!("expected incomplete destination for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_destination_names_the_order() {
        let mut o = order("S00077");
        o.shipping_partner = None;
        match validate_and_build(&o) {
            Err(ShipmentError::MissingDestination { order }) => assert_eq!(order, "S00077"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn order_without_products_is_rejected() {
        let mut o = order("S1");
        o.lines = vec![LineItem {
            id: Uuid::new_v4(),
            product: None,
            quantity: 4.0,
        }];
        let err = validate_and_build(&o).unwrap_err();
        assert_eq!(err.kind(), "no_deliverable_products");
    }

    #[test]
    fn successful_reply_yields_label_and_status() {
        let carrier =
            interpret_reply(r#"{"success": true, "order": {"label": "LP123", "status_id": 5}}"#)
                .expect("should succeed");
        assert_eq!(carrier.label.as_deref(), Some("LP123"));
        assert_eq!(carrier.status_id.as_deref(), Some("5"));

        let outcome = ShipmentOutcome::from_carrier(Uuid::nil(), carrier);
        assert_eq!(outcome.status, "GHTK Status ID: 5");
    }

    #[test]
    fn falsy_success_surfaces_carrier_message() {
        let err = interpret_reply(r#"{"success": false, "message": "Invalid phone"}"#).unwrap_err();
        match err {
            ShipmentError::CarrierRejected(msg) => assert_eq!(msg, "Invalid phone"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn falsy_success_without_message_is_unspecified() {
        let err = interpret_reply(r#"{"success": 0}"#).unwrap_err();
        assert!(err.to_string().contains("unspecified error"));
    }

    #[test]
    fn undecodable_reply_is_unexpected() {
        let err = interpret_reply("<html>").unwrap_err();
        assert_eq!(err.kind(), "unexpected");
    }

    #[test]
    fn error_message_only_for_json_bodies() {
        assert_eq!(
            error_message(r#"{"message": "Wrong token"}"#).as_deref(),
            Some("Wrong token")
        );
        assert_eq!(
            error_message("{}").as_deref(),
            Some("unknown carrier error")
        );
        assert_eq!(error_message("Service Unavailable"), None);
    }

    #[test]
    fn non_string_error_message_is_passed_through() {
        assert_eq!(error_message(r#"{"message": 42}"#).as_deref(), Some("42"));
        assert_eq!(
            error_message(r#"{"message": {"field": "tel"}}"#).as_deref(),
            Some(r#"{"field":"tel"}"#)
        );
        assert_eq!(
            error_message("[]").as_deref(),
            Some("unknown carrier error")
        );
    }

    #[test]
    fn non_object_reply_is_unexpected() {
        for body in ["[]", r#""ok""#, "true"] {
            let err = interpret_reply(body).unwrap_err();
            assert_eq!(err.kind(), "unexpected", "body {body}");
        }
    }

    #[test]
    fn fractional_quantity_is_sent_as_is() {
        let mut o = order("S00050");
        o.lines = vec![line("Rice", Some(1.0), 1.5)];
        let request = validate_and_build(&o).expect("should build");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["products"][0]["quantity"], 1.5);
    }
}
