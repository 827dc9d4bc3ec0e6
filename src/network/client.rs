//! Sales backend client - one typed method per REST endpoint

use std::time::Duration;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::checkout::TransactionRequest;
use crate::models::{
    Branch, Category, Company, Customer, ListShape, Product, ProductPayload, PurchaseOrder,
    PurchaseOrderDetail, RegisterRequest, Supplier, SupplierPayload, TransferRequest, UserProfile,
};

/// Client-side API error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Server { status: u16, message: String },

    /// HTTP 409, body kept for callers that inspect the conflicting record
    #[error("{message}")]
    Conflict { message: String, body: serde_json::Value },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("User not authenticated")]
    NotSignedIn,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Conflict { .. } => Some(409),
            _ => None,
        }
    }
}

/// Result of a product create/update
#[derive(Debug, Clone, PartialEq)]
pub enum ProductSaveOutcome {
    Saved(Option<Product>),
    /// A similar product already exists
    Duplicate(Product),
}

/// Result of a supplier create/update
#[derive(Debug, Clone, PartialEq)]
pub enum SupplierSaveOutcome {
    Saved(Option<Supplier>),
    Duplicate(String),
}

#[derive(Debug, Deserialize)]
struct TransferResponse {
    #[serde(default)]
    product_created: bool,
}

#[derive(Debug, Deserialize)]
struct RateResponse {
    #[serde(default, deserialize_with = "crate::models::lenient_opt_f64")]
    rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    order_id: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SavedProduct {
    product: Option<Product>,
}

#[derive(Debug, Deserialize)]
struct SavedSupplier {
    supplier: Option<Supplier>,
}

/// Pull the most useful message out of an error body:
/// `error`, then `message`, then the raw text, then `fallback`.
pub fn error_message(body: &str, fallback: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message", "detail"] {
            if let Some(text) = json.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Create an HTTP client with the configured timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Typed client for the `/Sales` and `/Auth` backend.
///
/// Almost every call is keyed by the signed-in user's identity UID; calls made
/// before sign-in fail with [`ApiError::NotSignedIn`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    uid: Option<String>,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        ApiClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            uid: None,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn set_uid(&mut self, uid: Option<String>) {
        self.uid = uid;
    }

    pub fn uid(&self) -> Result<&str, ApiError> {
        self.uid.as_deref().ok_or(ApiError::NotSignedIn)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a response to `R`, turning non-2xx statuses into `ApiError`
    async fn parse<R: DeserializeOwned>(resp: reqwest::Response, fallback: &str) -> Result<R, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::failure(resp, fallback).await);
        }
        let text = resp.text().await?;
        serde_json::from_str::<R>(&text).map_err(|e| ApiError::Decode(format!("response body: {}", e)))
    }

    async fn failure(resp: reqwest::Response, fallback: &str) -> ApiError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body, fallback);
        if status == 409 {
            let json = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
            return ApiError::Conflict { message, body: json };
        }
        ApiError::Server { status, message }
    }

    /// Accept any 2xx, ignore the body
    async fn expect_ok(resp: reqwest::Response, fallback: &str) -> Result<(), ApiError> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::failure(resp, fallback).await)
        }
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<R, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let resp = self.http.get(&url).send().await?;
        Self::parse(resp, fallback).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, %method, "Sending");
        Ok(self.http.request(method, &url).json(body).send().await?)
    }

    async fn delete(&self, path: &str, fallback: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "DELETE");
        let resp = self.http.delete(&url).send().await?;
        Self::expect_ok(resp, fallback).await
    }

    // ========================
    // Auth
    // ========================

    pub async fn user_profile(&self) -> Result<UserProfile, ApiError> {
        let uid = self.uid()?;
        self.get_json(&format!("/Auth/get_user_role/{}/", uid), "Failed to fetch user role.")
            .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let resp = self.send_json(reqwest::Method::POST, "/Auth/register/", request).await?;
        Self::expect_ok(resp, "Profile creation failed in backend.").await
    }

    // ========================
    // Products
    // ========================

    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let uid = self.uid()?;
        self.get_json(&format!("/Sales/products/{}/", uid), "Failed to fetch products")
            .await
    }

    pub async fn low_stock(&self) -> Result<Vec<Product>, ApiError> {
        let uid = self.uid()?;
        self.get_json(&format!("/Sales/low_stock/{}/", uid), "Failed to fetch low stock products")
            .await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_json("/Sales/categories/", "Failed to load categories").await
    }

    pub async fn branches(&self) -> Result<Vec<Branch>, ApiError> {
        let uid = self.uid()?;
        let shape: ListShape<Branch> = self
            .get_json(&format!("/Sales/branches/{}/", uid), "Failed to load branches")
            .await?;
        shape
            .into_items("branches")
            .map_err(|e| ApiError::Decode(format!("branches: {}", e)))
    }

    /// Create (`id == None`) or update a product
    pub async fn save_product(&self, payload: &ProductPayload) -> Result<ProductSaveOutcome, ApiError> {
        let resp = match payload.id {
            Some(id) => {
                self.send_json(reqwest::Method::PUT, &format!("/Sales/update_products/{}/", id), payload)
                    .await?
            }
            None => {
                let uid = self.uid()?;
                self.send_json(reqwest::Method::POST, &format!("/Sales/Add_products/{}/", uid), payload)
                    .await?
            }
        };

        match Self::parse::<serde_json::Value>(resp, "Failed to save product").await {
            Ok(body) => {
                let product = serde_json::from_value::<SavedProduct>(body.clone())
                    .ok()
                    .and_then(|s| s.product)
                    .or_else(|| serde_json::from_value::<Product>(body).ok());
                Ok(ProductSaveOutcome::Saved(product))
            }
            Err(ApiError::Conflict { message, body }) => {
                match body.get("existing_product").cloned().map(serde_json::from_value::<Product>) {
                    Some(Ok(existing)) => Ok(ProductSaveOutcome::Duplicate(existing)),
                    _ => Err(ApiError::Conflict { message, body }),
                }
            }
            Err(e) => Err(e),
        }
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/Sales/products/{}/delete/", id), "Failed to delete product")
            .await
    }

    /// Move stock to another branch; returns whether the target branch got
    /// a newly created product
    pub async fn transfer_stock(&self, product_id: i64, target_branch: i64, quantity: i64) -> Result<bool, ApiError> {
        let body = TransferRequest {
            target_branch,
            quantity,
            firebase_id: self.uid()?.to_string(),
        };
        let resp = self
            .send_json(reqwest::Method::POST, &format!("/Sales/transfer_stock/{}/", product_id), &body)
            .await?;
        let parsed: TransferResponse = Self::parse(resp, "Failed to transfer stock").await?;
        Ok(parsed.product_created)
    }

    // ========================
    // Suppliers
    // ========================

    pub async fn suppliers(&self) -> Result<Vec<Supplier>, ApiError> {
        let uid = self.uid()?;
        let shape: ListShape<Supplier> = self
            .get_json(&format!("/Sales/suppliers/{}/", uid), "Failed to fetch suppliers")
            .await?;
        shape
            .into_items("suppliers")
            .map_err(|e| ApiError::Decode(format!("suppliers: {}", e)))
    }

    pub async fn save_supplier(&self, payload: &SupplierPayload) -> Result<SupplierSaveOutcome, ApiError> {
        let uid = self.uid()?;
        let resp = match payload.id {
            Some(id) => {
                self.send_json(reqwest::Method::PUT, &format!("/Sales/suppliers/{}/{}/update/", uid, id), payload)
                    .await?
            }
            None => {
                self.send_json(reqwest::Method::POST, &format!("/Sales/suppliers/{}/create/", uid), payload)
                    .await?
            }
        };

        match Self::parse::<serde_json::Value>(resp, "Failed to save supplier").await {
            Ok(body) => {
                let supplier = serde_json::from_value::<SavedSupplier>(body.clone())
                    .ok()
                    .and_then(|s| s.supplier)
                    .or_else(|| serde_json::from_value::<Supplier>(body).ok());
                Ok(SupplierSaveOutcome::Saved(supplier))
            }
            Err(ApiError::Conflict { message, .. }) => Ok(SupplierSaveOutcome::Duplicate(message)),
            Err(e) => Err(e),
        }
    }

    pub async fn delete_supplier(&self, id: i64) -> Result<(), ApiError> {
        let uid = self.uid()?;
        self.delete(&format!("/Sales/suppliers/{}/{}/delete/", uid, id), "Failed to delete supplier")
            .await
    }

    // ========================
    // Purchase orders
    // ========================

    pub async fn purchase_orders(&self) -> Result<Vec<PurchaseOrder>, ApiError> {
        let uid = self.uid()?;
        self.get_json(&format!("/Sales/purchase-orders/{}/", uid), "Failed to fetch purchase orders")
            .await
    }

    pub async fn purchase_order(&self, id: i64) -> Result<PurchaseOrderDetail, ApiError> {
        let uid = self.uid()?;
        self.get_json(
            &format!("/Sales/purchase-orders/detail/{}/{}/", id, uid),
            "Failed to load order details.",
        )
        .await
    }

    /// Create (`order.id == None`) or update a purchase order
    pub async fn save_purchase_order(&self, order: &PurchaseOrderDetail) -> Result<(), ApiError> {
        let uid = self.uid()?;
        let resp = match order.id {
            Some(id) => {
                self.send_json(reqwest::Method::PUT, &format!("/Sales/purchase-orders/update/{}/{}/", id, uid), order)
                    .await?
            }
            None => {
                self.send_json(reqwest::Method::POST, &format!("/Sales/purchase-orders/create/{}/", uid), order)
                    .await?
            }
        };
        Self::expect_ok(resp, "Failed to save purchase order.").await
    }

    pub async fn delete_purchase_order(&self, id: i64) -> Result<(), ApiError> {
        let uid = self.uid()?;
        self.delete(
            &format!("/Sales/purchase-orders/delete/{}/{}/", id, uid),
            "Failed to delete purchase order.",
        )
        .await
    }

    /// Download the server-rendered PDF for a purchase order
    pub async fn purchase_order_pdf(&self, id: i64) -> Result<Vec<u8>, ApiError> {
        let uid = self.uid()?;
        let url = self.url(&format!("/Sales/purchase-orders/pdf/{}/{}/", id, uid));
        tracing::debug!(%url, "Downloading PDF");
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(Self::failure(resp, "Failed to generate PDF.").await);
        }

        let mut stream = resp.bytes_stream();
        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk?);
        }
        Ok(bytes)
    }

    // ========================
    // Checkout
    // ========================

    pub async fn customers(&self) -> Result<Vec<Customer>, ApiError> {
        let url = self.url("/Sales/fetch_customer/");
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(Self::failure(resp, "Unable to fetch customers.").await);
        }
        let is_json = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            return Err(ApiError::Decode("The server did not return valid JSON.".to_string()));
        }
        let customers: Option<Vec<Customer>> = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("customers: {}", e)))?;
        Ok(customers.unwrap_or_default())
    }

    /// Rate from USD to `currency`
    pub async fn exchange_rate(&self, currency: &str) -> Result<f64, ApiError> {
        let parsed: RateResponse = self
            .get_json(&format!("/Sales/exchange_rate/{}", currency), "Exchange rate not found.")
            .await?;
        match parsed.rate {
            Some(rate) if rate > 0.0 => Ok(rate),
            _ => Err(ApiError::Decode("Exchange rate not found in the response.".to_string())),
        }
    }

    /// Submit a sale; returns the backend order id used as receipt number
    pub async fn create_transaction(&self, transaction: &TransactionRequest) -> Result<String, ApiError> {
        let resp = self
            .send_json(reqwest::Method::POST, "/Sales/create_transaction/", transaction)
            .await?;
        let parsed: TransactionResponse = Self::parse(resp, "Please try again").await?;
        Ok(match parsed.order_id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
    }

    pub async fn company(&self) -> Result<Company, ApiError> {
        self.get_json("/Sales/company/", "Failed to load company profile").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{CashierInfo, CustomerInfo, OrderLine, TransactionInfo};
    use axum::extract::Path;
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::{delete, get, post, put};
    use axum::{Json, Router};
    use serde_json::json;

    fn product_json(id: i64, name: &str) -> serde_json::Value {
        json!({ "id": id, "name": name, "price": "2.50", "stock_quantity": 4, "barcode": "600100", "product_code": "P-1" })
    }

    async fn start_backend() -> String {
        let app = Router::new()
            .route("/Auth/get_user_role/{uid}/", get(|Path(uid): Path<String>| async move {
                Json(json!({ "id": 1, "role": "cashier", "first_name": format!("user-{}", uid) }))
            }))
            .route("/Sales/products/{uid}/", get(|Path(uid): Path<String>| async move {
                assert_eq!(uid, "uid-1");
                Json(json!([product_json(1, "Bread"), product_json(2, "Milk")]))
            }))
            .route("/Sales/Add_products/{uid}/", post(|Json(body): Json<serde_json::Value>| async move {
                if body["name"] == "Bread" {
                    (StatusCode::CONFLICT, Json(json!({
                        "error": "Product exists",
                        "existing_product": product_json(1, "Bread"),
                    }))).into_response()
                } else if body["name"] == "Flour" {
                    (StatusCode::CONFLICT, Json(json!({ "error": "Barcode already in use" }))).into_response()
                } else {
                    (StatusCode::CREATED, Json(json!({ "product": product_json(3, "Eggs") }))).into_response()
                }
            }))
            .route("/Sales/update_products/{id}/", put(|Path(id): Path<i64>| async move {
                Json(product_json(id, "Renamed"))
            }))
            .route("/Sales/products/{id}/delete/", delete(|Path(id): Path<i64>| async move {
                if id == 404 {
                    (StatusCode::NOT_FOUND, Json(json!({ "error": "Product not found" }))).into_response()
                } else {
                    StatusCode::NO_CONTENT.into_response()
                }
            }))
            .route("/Sales/transfer_stock/{id}/", post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["firebaseId"], "uid-1");
                Json(json!({ "product_created": body["target_branch"] == 2 }))
            }))
            .route("/Sales/branches/{uid}/", get(|| async {
                Json(json!({ "branches": [{ "id": 2, "name": "East" }] }))
            }))
            .route("/Sales/suppliers/{uid}/", get(|| async {
                Json(json!({ "suppliers": [{ "id": 5, "name": "Acme", "phone": "555" }] }))
            }))
            .route("/Sales/suppliers/{uid}/create/", post(|| async {
                (StatusCode::CONFLICT, Json(json!({ "error": "Supplier with this name already exists" })))
            }))
            .route("/Sales/suppliers/{uid}/{id}/update/", put(|Path((_uid, id)): Path<(String, i64)>| async move {
                Json(json!({ "supplier": { "id": id, "name": "Acme Ltd", "phone": "555" } }))
            }))
            .route("/Sales/purchase-orders/{uid}/", get(|| async {
                Json(json!([{ "id": 7, "po_number": "PO-0007", "supplier": "Acme", "total_cost": "120.5" }]))
            }))
            .route("/Sales/purchase-orders/detail/{id}/{uid}/", get(|Path((id, _uid)): Path<(i64, String)>| async move {
                Json(json!({ "id": id, "supplier_id": 5, "order_date": "2024-01-02",
                    "items": [{ "product_id": 1, "quantity": 3, "cost_price": "1.10" }] }))
            }))
            .route("/Sales/purchase-orders/create/{uid}/", post(|Json(body): Json<serde_json::Value>| async move {
                assert!(body.get("id").is_none());
                StatusCode::CREATED
            }))
            .route("/Sales/purchase-orders/pdf/{id}/{uid}/", get(|| async {
                ([(header::CONTENT_TYPE, "application/pdf")], b"%PDF-1.4 test".to_vec())
            }))
            .route("/Sales/fetch_customer/", get(|| async {
                Json(json!([{ "id": 1, "full_name": "Jane Doe", "loyalty_points": 12 }]))
            }))
            .route("/Sales/exchange_rate/{currency}", get(|Path(currency): Path<String>| async move {
                if currency == "zig" {
                    Json(json!({ "rate": "13.5" }))
                } else {
                    Json(json!({ "detail": "unknown currency" }))
                }
            }))
            .route("/Sales/create_transaction/", post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["order_items"][0]["product_id"], 1);
                Json(json!({ "order_id": 1001 }))
            }))
            .route("/Sales/company/", get(|| async {
                Json(json!({ "name": "Corner Shop", "city": "Harare" }))
            }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn client() -> ApiClient {
        let base = start_backend().await;
        ApiClient::new(create_client(Duration::from_secs(5)), base).with_uid("uid-1")
    }

    #[test]
    fn error_message_prefers_error_then_message() {
        assert_eq!(error_message(r#"{"error": "boom", "message": "x"}"#, "fb"), "boom");
        assert_eq!(error_message(r#"{"message": "nope"}"#, "fb"), "nope");
        assert_eq!(error_message("plain failure", "fb"), "plain failure");
        assert_eq!(error_message("  ", "fb"), "fb");
    }

    #[tokio::test]
    async fn calls_without_uid_fail_fast() {
        let api = ApiClient::new(reqwest::Client::new(), "http://127.0.0.1:1");
        assert!(matches!(api.products().await, Err(ApiError::NotSignedIn)));
    }

    #[tokio::test]
    async fn fetches_profile_and_products() {
        let api = client().await;
        let profile = api.user_profile().await.unwrap();
        assert_eq!(profile.first_name, "user-uid-1");

        let products = api.products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].price, 2.5);
    }

    #[tokio::test]
    async fn duplicate_product_returns_existing_record() {
        let api = client().await;
        let mut payload = ProductPayload {
            id: None,
            name: "Bread".into(),
            price: 1.0,
            description: String::new(),
            stock_quantity: 1,
            category: None,
        };
        match api.save_product(&payload).await.unwrap() {
            ProductSaveOutcome::Duplicate(existing) => assert_eq!(existing.id, 1),
            other => panic!("unexpected outcome: {:?}", other),
        }

        payload.name = "Eggs".into();
        match api.save_product(&payload).await.unwrap() {
            ProductSaveOutcome::Saved(Some(p)) => assert_eq!(p.id, 3),
            other => panic!("unexpected outcome: {:?}", other),
        }

        payload.id = Some(9);
        match api.save_product(&payload).await.unwrap() {
            ProductSaveOutcome::Saved(Some(p)) => assert_eq!(p.name, "Renamed"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn conflict_without_record_keeps_server_message() {
        let api = client().await;
        let payload = ProductPayload {
            id: None,
            name: "Flour".into(),
            price: 1.0,
            description: String::new(),
            stock_quantity: 1,
            category: None,
        };
        let err = api.save_product(&payload).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "Barcode already in use");
    }

    #[tokio::test]
    async fn delete_failure_passes_server_message() {
        let api = client().await;
        api.delete_product(3).await.unwrap();
        let err = api.delete_product(404).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Product not found");
    }

    #[tokio::test]
    async fn transfer_and_wrapped_lists() {
        let api = client().await;
        assert!(api.transfer_stock(1, 2, 3).await.unwrap());
        assert!(!api.transfer_stock(1, 4, 3).await.unwrap());
        assert_eq!(api.branches().await.unwrap()[0].name, "East");
        assert_eq!(api.suppliers().await.unwrap()[0].name, "Acme");
    }

    #[tokio::test]
    async fn supplier_conflict_and_update() {
        let api = client().await;
        let mut payload = SupplierPayload {
            id: None,
            name: "Acme".into(),
            contact_person: String::new(),
            email: String::new(),
            phone: "555".into(),
            address: String::new(),
            tax_id: String::new(),
            payment_terms: String::new(),
            notes: String::new(),
            is_active: true,
        };
        assert_eq!(
            api.save_supplier(&payload).await.unwrap(),
            SupplierSaveOutcome::Duplicate("Supplier with this name already exists".into())
        );

        payload.id = Some(5);
        match api.save_supplier(&payload).await.unwrap() {
            SupplierSaveOutcome::Saved(Some(s)) => assert_eq!(s.name, "Acme Ltd"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn purchase_order_round() {
        let api = client().await;
        let orders = api.purchase_orders().await.unwrap();
        assert_eq!(orders[0].total_cost, 120.5);

        let detail = api.purchase_order(7).await.unwrap();
        assert_eq!(detail.items[0].cost_price, 1.1);

        let new_order = PurchaseOrderDetail { id: None, ..detail };
        api.save_purchase_order(&new_order).await.unwrap();

        let pdf = api.purchase_order_pdf(7).await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn checkout_endpoints() {
        let api = client().await;
        assert_eq!(api.customers().await.unwrap()[0].loyalty_points, 12);
        assert_eq!(api.exchange_rate("zig").await.unwrap(), 13.5);
        assert!(matches!(api.exchange_rate("gbp").await, Err(ApiError::Decode(_))));

        let transaction = TransactionRequest {
            customer: CustomerInfo { id: 1, first_name: "Jane Doe".into(), email: None, loyalty_points: 12 },
            cashier: CashierInfo { id: 1, role: "cashier".into(), first_name: "Sam".into(), phone_number: None },
            order_items: vec![OrderLine { product_id: 1, quantity: 2, price: 2.5 }],
            transaction: TransactionInfo {
                total_amount: 5.25,
                date: "2024-01-02T10:00:00Z".into(),
                currency: None,
                change: 4.75,
                amount_paid: 10.0,
            },
        };
        assert_eq!(api.create_transaction(&transaction).await.unwrap(), "1001");
        assert_eq!(api.company().await.unwrap().name, "Corner Shop");
    }
}
