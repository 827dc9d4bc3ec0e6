//! Network messages - communication between App and Network layers

use crate::checkout::TransactionRequest;
use crate::config::PrinterSettings;
use crate::forms::SignUpData;
use crate::identity::Session;
use crate::models::{
    Branch, Category, Company, Customer, Product, ProductPayload, PurchaseOrder, PurchaseOrderDetail,
    Supplier, SupplierPayload, UserProfile,
};
use crate::network::client::{ProductSaveOutcome, SupplierSaveOutcome};

/// One backend, identity or printer operation
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    // Identity
    SignIn { email: String, password: String },
    SignUp(SignUpData),
    SendPasswordReset(String),
    ChangePassword { current: String, new_password: String },

    // Backend
    Profile,
    Products,
    Categories,
    Branches,
    LowStock,
    SaveProduct(ProductPayload),
    DeleteProduct(i64),
    TransferStock { product_id: i64, target_branch: i64, quantity: i64 },
    Suppliers,
    SaveSupplier(SupplierPayload),
    DeleteSupplier(i64),
    PurchaseOrders,
    PurchaseOrder(i64),
    SavePurchaseOrder(PurchaseOrderDetail),
    DeletePurchaseOrder(i64),
    PurchaseOrderPdf(i64),
    Customers,
    ExchangeRate(String),
    CreateTransaction(TransactionRequest),
    Company,

    // Printer
    Print { printer: PrinterSettings, bytes: Vec<u8> },
    TestPrint(PrinterSettings),
}

impl Request {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Request::SignIn { .. } => "sign_in",
            Request::SignUp(_) => "sign_up",
            Request::SendPasswordReset(_) => "password_reset",
            Request::ChangePassword { .. } => "change_password",
            Request::Profile => "profile",
            Request::Products => "products",
            Request::Categories => "categories",
            Request::Branches => "branches",
            Request::LowStock => "low_stock",
            Request::SaveProduct(_) => "save_product",
            Request::DeleteProduct(_) => "delete_product",
            Request::TransferStock { .. } => "transfer_stock",
            Request::Suppliers => "suppliers",
            Request::SaveSupplier(_) => "save_supplier",
            Request::DeleteSupplier(_) => "delete_supplier",
            Request::PurchaseOrders => "purchase_orders",
            Request::PurchaseOrder(_) => "purchase_order",
            Request::SavePurchaseOrder(_) => "save_purchase_order",
            Request::DeletePurchaseOrder(_) => "delete_purchase_order",
            Request::PurchaseOrderPdf(_) => "purchase_order_pdf",
            Request::Customers => "customers",
            Request::ExchangeRate(_) => "exchange_rate",
            Request::CreateTransaction(_) => "create_transaction",
            Request::Company => "company",
            Request::Print { .. } => "print",
            Request::TestPrint(_) => "test_print",
        }
    }
}

/// Successful outcome of a [`Request`]
#[derive(Debug, Clone)]
pub enum Reply {
    SignedIn(Session),
    SignedUp,
    PasswordResetSent,
    PasswordChanged(Session),
    Profile(UserProfile),
    Products(Vec<Product>),
    Categories(Vec<Category>),
    Branches(Vec<Branch>),
    LowStock(Vec<Product>),
    ProductSaved(ProductSaveOutcome),
    ProductDeleted(i64),
    StockTransferred { product_created: bool },
    Suppliers(Vec<Supplier>),
    SupplierSaved(SupplierSaveOutcome),
    SupplierDeleted(i64),
    PurchaseOrders(Vec<PurchaseOrder>),
    PurchaseOrder(PurchaseOrderDetail),
    PurchaseOrderSaved,
    PurchaseOrderDeleted(i64),
    PurchaseOrderPdf { id: i64, bytes: Vec<u8> },
    Customers(Vec<Customer>),
    ExchangeRate { currency: String, rate: f64 },
    TransactionCreated { order_id: String },
    Company(Company),
    Printed,
    PrinterTested,
}

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    Execute { id: u64, request: Request },
    /// Install or drop the signed-in session used to key backend calls
    SetSession(Option<Session>),
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Completed { id: u64, reply: Reply },
    /// Intermediate status for long-running requests (sign-up verification)
    Progress { id: u64, message: String },
    /// The failed request travels back so the user can retry it
    Failed { id: u64, request: Request, message: String },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Completed { id, .. } => *id,
            NetworkResponse::Progress { id, .. } => *id,
            NetworkResponse::Failed { id, .. } => *id,
        }
    }

    /// Check if this is a terminal response (no more messages expected for this id)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NetworkResponse::Progress { .. })
    }
}
