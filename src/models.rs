//! Backend records
//!
//! Every entity is exchanged verbatim with the sales backend. Fields the
//! backend may omit are optional or defaulted, and numeric fields accept
//! numbers sent as strings.

use serde::{Deserialize, Deserializer, Serialize};

/// Decode a number that may arrive as a JSON string (`"12.50"`).
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrText {
        Num(f64),
        Text(String),
        Null(()),
    }

    match NumOrText::deserialize(deserializer)? {
        NumOrText::Num(n) => Ok(n),
        NumOrText::Text(s) if s.trim().is_empty() => Ok(0.0),
        NumOrText::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
        NumOrText::Null(()) => Ok(0.0),
    }
}

pub(crate) fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrText {
        Num(f64),
        Text(String),
    }

    match Option::<NumOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumOrText::Num(n)) => Ok(Some(n)),
        Some(NumOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?;
    Ok(value.trunc() as i64)
}

/// A list endpoint that answers either `[...]` or `{"<key>": [...]}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListShape<T> {
    Bare(Vec<T>),
    Wrapped(std::collections::HashMap<String, serde_json::Value>),
}

impl<T: serde::de::DeserializeOwned> ListShape<T> {
    /// Unwrap into items, looking under `key` for the wrapped form.
    /// A wrapped body without the key yields an empty list.
    pub fn into_items(self, key: &str) -> Result<Vec<T>, serde_json::Error> {
        match self {
            ListShape::Bare(items) => Ok(items),
            ListShape::Wrapped(mut map) => match map.remove(key) {
                Some(value) => serde_json::from_value(value),
                None => Ok(Vec::new()),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "lenient_f64", default)]
    pub price: f64,
    #[serde(deserialize_with = "lenient_opt_f64", default)]
    pub cost_price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_i64", default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    pub fn is_out_of_stock(&self) -> bool {
        self.stock_quantity == 0
    }

    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock_quantity < threshold
    }

    pub fn barcode_str(&self) -> &str {
        self.barcode.as_deref().unwrap_or("")
    }

    pub fn code_str(&self) -> &str {
        self.product_code.as_deref().unwrap_or("")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn not_available() -> String {
    String::from("N/A")
}

/// Purchase order row as returned by the list endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: i64,
    #[serde(default = "not_available")]
    pub po_number: String,
    #[serde(default = "not_available")]
    pub supplier: String,
    #[serde(deserialize_with = "lenient_f64", default)]
    pub total_cost: f64,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderItem {
    #[serde(deserialize_with = "lenient_i64")]
    pub product_id: i64,
    #[serde(deserialize_with = "lenient_i64", default)]
    pub quantity: i64,
    #[serde(deserialize_with = "lenient_f64", default)]
    pub cost_price: f64,
}

/// Full purchase order, used both as the detail response and as the
/// create/update payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient_i64", default)]
    pub supplier_id: i64,
    #[serde(default)]
    pub order_date: String,
    #[serde(default)]
    pub expected_delivery_date: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub items: Vec<PurchaseOrderItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_i64", default)]
    pub loyalty_points: i64,
}

/// Signed-in cashier as known to the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub branch: Option<serde_json::Value>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Cashier,
    Manager,
    Admin,
}

impl Role {
    pub fn parse(role: &str) -> Option<Role> {
        match role.trim().to_lowercase().as_str() {
            "cashier" => Some(Role::Cashier),
            "manager" => Some(Role::Manager),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Cashier => "cashier",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    pub fn next(&self) -> Role {
        match self {
            Role::Cashier => Role::Manager,
            Role::Manager => Role::Admin,
            Role::Admin => Role::Cashier,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Body of `POST /Auth/register/`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub phone_number: String,
    pub email: String,
    pub role: String,
    pub branch: String,
    pub firebase_user_id: String,
    pub password: String,
}

/// Body of create/update product calls
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub stock_quantity: i64,
    pub category: Option<i64>,
}

/// Body of `POST /Sales/transfer_stock/{id}/`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransferRequest {
    pub target_branch: i64,
    pub quantity: i64,
    #[serde(rename = "firebaseId")]
    pub firebase_id: String,
}

/// Body of create/update supplier calls
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SupplierPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub tax_id: String,
    pub payment_terms: String,
    pub notes: String,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_price_accepts_string() {
        let json = r#"{"id": 3, "name": "Milk", "price": "1.25", "stock_quantity": "7"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, 1.25);
        assert_eq!(product.stock_quantity, 7);
        assert!(product.barcode.is_none());
    }

    #[test]
    fn purchase_order_defaults_missing_fields() {
        let order: PurchaseOrder = serde_json::from_str(r#"{"id": 9, "total_cost": null}"#).unwrap();
        assert_eq!(order.po_number, "N/A");
        assert_eq!(order.supplier, "N/A");
        assert_eq!(order.total_cost, 0.0);
    }

    #[test]
    fn list_shape_handles_bare_and_wrapped() {
        let bare: ListShape<Branch> = serde_json::from_str(r#"[{"id": 1, "name": "Main"}]"#).unwrap();
        assert_eq!(bare.into_items("branches").unwrap().len(), 1);

        let wrapped: ListShape<Branch> =
            serde_json::from_str(r#"{"branches": [{"id": 1, "name": "Main"}, {"id": 2, "name": "East"}]}"#)
                .unwrap();
        let items = wrapped.into_items("branches").unwrap();
        assert_eq!(items[1].name, "East");

        let missing: ListShape<Branch> = serde_json::from_str(r#"{"other": []}"#).unwrap();
        assert!(missing.into_items("branches").unwrap().is_empty());
    }

    #[test]
    fn supplier_is_active_defaults_true() {
        let supplier: Supplier = serde_json::from_str(r#"{"id": 1, "name": "Acme", "phone": "555"}"#).unwrap();
        assert!(supplier.is_active);
    }

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!(Role::parse("Cashier"), Some(Role::Cashier));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("janitor"), None);
    }

    #[test]
    fn transfer_request_uses_camel_case_uid() {
        let body = serde_json::to_value(TransferRequest {
            target_branch: 2,
            quantity: 5,
            firebase_id: "uid-1".into(),
        })
        .unwrap();
        assert_eq!(body["firebaseId"], "uid-1");
    }
}
