//! Network actor - runs backend, identity and printer calls in the Tokio runtime

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::constants::{VERIFY_POLL_ATTEMPTS, VERIFY_POLL_INTERVAL_SECS};
use crate::forms::SignUpData;
use crate::identity::{IdentityProvider, Session};
use crate::messages::{NetworkCommand, NetworkResponse, Reply, Request};
use crate::models::RegisterRequest;
use crate::network::client::ApiClient;
use crate::printer::NetworkPrinter;

/// How long sign-up waits for the user to click the verification link
#[derive(Clone, Copy, Debug)]
pub struct VerifyPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for VerifyPolicy {
    fn default() -> Self {
        VerifyPolicy {
            attempts: VERIFY_POLL_ATTEMPTS,
            interval: Duration::from_secs(VERIFY_POLL_INTERVAL_SECS),
        }
    }
}

/// Everything a spawned request needs, cloned per task
#[derive(Clone)]
struct TaskContext {
    api: ApiClient,
    identity: Arc<dyn IdentityProvider>,
    session: Option<Session>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    printer_timeout: Duration,
    verify: VerifyPolicy,
}

/// Network actor that processes request commands
pub struct NetworkActor {
    api: ApiClient,
    identity: Arc<dyn IdentityProvider>,
    session: Option<Session>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
    printer_timeout: Duration,
    verify: VerifyPolicy,
}

impl NetworkActor {
    pub fn new(
        api: ApiClient,
        identity: Arc<dyn IdentityProvider>,
        response_tx: mpsc::UnboundedSender<NetworkResponse>,
        printer_timeout: Duration,
    ) -> Self {
        NetworkActor {
            api,
            identity,
            session: None,
            response_tx,
            active_requests: JoinSet::new(),
            printer_timeout,
            verify: VerifyPolicy::default(),
        }
    }

    pub fn with_verify_policy(mut self, verify: VerifyPolicy) -> Self {
        self.verify = verify;
        self
    }

    fn context(&self) -> TaskContext {
        TaskContext {
            api: self.api.clone(),
            identity: Arc::clone(&self.identity),
            session: self.session.clone(),
            response_tx: self.response_tx.clone(),
            printer_timeout: self.printer_timeout,
            verify: self.verify,
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Execute { id, request }) => {
                            let ctx = self.context();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, request = request.name(), "Executing request");
                                let response = match execute(&ctx, id, request.clone()).await {
                                    Ok(reply) => {
                                        tracing::info!(id, request = request.name(), "Request completed");
                                        NetworkResponse::Completed { id, reply }
                                    }
                                    Err(message) => {
                                        tracing::warn!(id, request = request.name(), %message, "Request failed");
                                        NetworkResponse::Failed { id, request, message }
                                    }
                                };
                                let _ = ctx.response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::SetSession(session)) => {
                            tracing::info!(signed_in = session.is_some(), "Session changed");
                            self.api.set_uid(session.as_ref().map(|s| s.uid.clone()));
                            self.session = session;
                        }

                        Some(NetworkCommand::Shutdown) => {
                            self.active_requests.abort_all();
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

async fn execute(ctx: &TaskContext, id: u64, request: Request) -> Result<Reply, String> {
    let api = &ctx.api;
    let reply = match request {
        Request::SignIn { email, password } => {
            let session = ctx.identity.sign_in(&email, &password).await.map_err(|e| e.to_string())?;
            Reply::SignedIn(session)
        }
        Request::SignUp(data) => sign_up(ctx, id, data).await?,
        Request::SendPasswordReset(email) => {
            ctx.identity.send_password_reset(&email).await.map_err(|e| e.to_string())?;
            Reply::PasswordResetSent
        }
        Request::ChangePassword { current, new_password } => {
            let session = ctx.session.as_ref().ok_or("User not authenticated")?;
            let updated = ctx
                .identity
                .change_password(session, &current, &new_password)
                .await
                .map_err(|e| e.to_string())?;
            Reply::PasswordChanged(updated)
        }

        Request::Profile => Reply::Profile(api.user_profile().await.map_err(|e| e.to_string())?),
        Request::Products => Reply::Products(api.products().await.map_err(|e| e.to_string())?),
        Request::Categories => Reply::Categories(api.categories().await.map_err(|e| e.to_string())?),
        Request::Branches => Reply::Branches(api.branches().await.map_err(|e| e.to_string())?),
        Request::LowStock => Reply::LowStock(api.low_stock().await.map_err(|e| e.to_string())?),
        Request::SaveProduct(payload) => {
            Reply::ProductSaved(api.save_product(&payload).await.map_err(|e| e.to_string())?)
        }
        Request::DeleteProduct(product_id) => {
            api.delete_product(product_id).await.map_err(|e| e.to_string())?;
            Reply::ProductDeleted(product_id)
        }
        Request::TransferStock { product_id, target_branch, quantity } => {
            let product_created = api
                .transfer_stock(product_id, target_branch, quantity)
                .await
                .map_err(|e| e.to_string())?;
            Reply::StockTransferred { product_created }
        }
        Request::Suppliers => Reply::Suppliers(api.suppliers().await.map_err(|e| e.to_string())?),
        Request::SaveSupplier(payload) => {
            Reply::SupplierSaved(api.save_supplier(&payload).await.map_err(|e| e.to_string())?)
        }
        Request::DeleteSupplier(supplier_id) => {
            api.delete_supplier(supplier_id).await.map_err(|e| e.to_string())?;
            Reply::SupplierDeleted(supplier_id)
        }
        Request::PurchaseOrders => {
            Reply::PurchaseOrders(api.purchase_orders().await.map_err(|e| e.to_string())?)
        }
        Request::PurchaseOrder(order_id) => {
            Reply::PurchaseOrder(api.purchase_order(order_id).await.map_err(|e| e.to_string())?)
        }
        Request::SavePurchaseOrder(order) => {
            let verb = if order.id.is_some() { "update" } else { "create" };
            api.save_purchase_order(&order).await.map_err(|e| {
                tracing::debug!(error = %e, "Purchase order save failed");
                format!("Failed to {} purchase order. Please try again.", verb)
            })?;
            Reply::PurchaseOrderSaved
        }
        Request::DeletePurchaseOrder(order_id) => {
            api.delete_purchase_order(order_id).await.map_err(|e| {
                tracing::debug!(error = %e, "Purchase order delete failed");
                String::from("Failed to delete purchase order. Please try again.")
            })?;
            Reply::PurchaseOrderDeleted(order_id)
        }
        Request::PurchaseOrderPdf(order_id) => {
            let bytes = api.purchase_order_pdf(order_id).await.map_err(|e| {
                tracing::debug!(error = %e, "PDF download failed");
                String::from("Failed to generate PDF. Please try again.")
            })?;
            Reply::PurchaseOrderPdf { id: order_id, bytes }
        }
        Request::Customers => Reply::Customers(api.customers().await.map_err(|e| e.to_string())?),
        Request::ExchangeRate(currency) => {
            let rate = api.exchange_rate(&currency).await.map_err(|e| {
                tracing::debug!(error = %e, %currency, "Exchange rate lookup failed");
                String::from("Exchange rate not found. USD only transactions allowed.")
            })?;
            Reply::ExchangeRate { currency, rate }
        }
        Request::CreateTransaction(transaction) => {
            let order_id = api
                .create_transaction(&transaction)
                .await
                .map_err(|e| format!("Failed to submit transaction: {}", e))?;
            Reply::TransactionCreated { order_id }
        }
        Request::Company => Reply::Company(api.company().await.map_err(|e| e.to_string())?),

        Request::Print { printer, bytes } => {
            match NetworkPrinter::from_settings(&printer, ctx.printer_timeout).map_err(|e| e.to_string())? {
                Some(device) => device.send(&bytes).await.map_err(|e| e.to_string())?,
                None => tracing::debug!("No printer configured, skipping print"),
            }
            Reply::Printed
        }
        Request::TestPrint(printer) => {
            let device = NetworkPrinter::from_settings(&printer, ctx.printer_timeout)
                .map_err(|e| e.to_string())?
                .ok_or("Please select a printer type")?;
            device
                .test_print()
                .await
                .map_err(|e| format!("Failed to connect to printer: {}", e))?;
            Reply::PrinterTested
        }
    };
    Ok(reply)
}

/// Create the account, wait for email verification, then register the
/// profile with the backend. The identity account is removed again when
/// any later step fails.
async fn sign_up(ctx: &TaskContext, id: u64, data: SignUpData) -> Result<Reply, String> {
    let identity = &ctx.identity;
    let session = identity
        .sign_up(&data.email, &data.password)
        .await
        .map_err(|e| e.to_string())?;

    if let Err(e) = identity.send_email_verification(&session.id_token).await {
        let _ = identity.delete_account(&session.id_token).await;
        return Err(e.to_string());
    }
    let _ = ctx.response_tx.send(NetworkResponse::Progress {
        id,
        message: String::from("Verification email sent. Please verify your email to complete the signup process."),
    });

    let mut verified = false;
    for attempt in 1..=ctx.verify.attempts {
        tokio::time::sleep(ctx.verify.interval).await;
        verified = identity.is_email_verified(&session.id_token).await.unwrap_or(false);
        tracing::debug!(attempt, verified, "Checked email verification");
        if verified {
            break;
        }
    }

    if !verified {
        if let Err(e) = identity.delete_account(&session.id_token).await {
            tracing::warn!(error = %e, "Failed to delete unverified account");
        }
        return Err(String::from("Email not verified in time. Your account has been deleted."));
    }

    let request = RegisterRequest {
        first_name: data.full_name,
        phone_number: data.phone_number,
        email: data.email,
        role: data.role.as_str().to_string(),
        branch: data.branch,
        firebase_user_id: session.uid.clone(),
        password: data.password,
    };
    if let Err(e) = ctx.api.register(&request).await {
        tracing::warn!(error = %e, "Backend registration failed");
        if let Err(e) = identity.delete_account(&session.id_token).await {
            tracing::warn!(error = %e, "Failed to delete account after registration failure");
        }
        return Err(String::from("Profile creation failed in backend. Your account has been deleted."));
    }

    Ok(Reply::SignedUp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityError;
    use crate::models::Role;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    #[derive(Default)]
    struct FakeIdentity {
        verify_after: u32,
        checks: AtomicU32,
        deleted: AtomicBool,
    }

    fn session() -> Session {
        Session {
            uid: "uid-new".into(),
            email: "new@example.com".into(),
            id_token: "token".into(),
            refresh_token: String::new(),
        }
    }

    #[async_trait::async_trait]
    impl IdentityProvider for FakeIdentity {
        async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, IdentityError> {
            Ok(session())
        }
        async fn sign_up(&self, _email: &str, _password: &str) -> Result<Session, IdentityError> {
            Ok(session())
        }
        async fn send_email_verification(&self, _id_token: &str) -> Result<(), IdentityError> {
            Ok(())
        }
        async fn is_email_verified(&self, _id_token: &str) -> Result<bool, IdentityError> {
            let n = self.checks.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(self.verify_after > 0 && n >= self.verify_after)
        }
        async fn delete_account(&self, _id_token: &str) -> Result<(), IdentityError> {
            self.deleted.store(true, Ordering::SeqCst);
            Ok(())
        }
        async fn send_password_reset(&self, _email: &str) -> Result<(), IdentityError> {
            Ok(())
        }
        async fn change_password(
            &self,
            session: &Session,
            _current: &str,
            _new_password: &str,
        ) -> Result<Session, IdentityError> {
            Ok(session.clone())
        }
    }

    fn context(identity: Arc<FakeIdentity>) -> (TaskContext, mpsc::UnboundedReceiver<NetworkResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ctx = TaskContext {
            api: ApiClient::new(reqwest::Client::new(), "http://127.0.0.1:1"),
            identity,
            session: None,
            response_tx: tx,
            printer_timeout: Duration::from_millis(200),
            verify: VerifyPolicy {
                attempts: 3,
                interval: Duration::from_millis(1),
            },
        };
        (ctx, rx)
    }

    fn sign_up_data() -> SignUpData {
        SignUpData {
            full_name: "New User".into(),
            phone_number: "0771".into(),
            email: "new@example.com".into(),
            password: "secret1".into(),
            role: Role::Cashier,
            branch: "Main".into(),
        }
    }

    #[tokio::test]
    async fn unverified_sign_up_deletes_account() {
        let identity = Arc::new(FakeIdentity::default());
        let (ctx, mut rx) = context(Arc::clone(&identity));

        let err = sign_up(&ctx, 1, sign_up_data()).await.unwrap_err();
        assert_eq!(err, "Email not verified in time. Your account has been deleted.");
        assert_eq!(identity.checks.load(Ordering::SeqCst), 3);
        assert!(identity.deleted.load(Ordering::SeqCst));
        assert!(matches!(rx.try_recv(), Ok(NetworkResponse::Progress { id: 1, .. })));
    }

    #[tokio::test]
    async fn failed_registration_deletes_account() {
        let identity = Arc::new(FakeIdentity {
            verify_after: 2,
            ..FakeIdentity::default()
        });
        let (ctx, _rx) = context(Arc::clone(&identity));

        let err = sign_up(&ctx, 1, sign_up_data()).await.unwrap_err();
        assert_eq!(err, "Profile creation failed in backend. Your account has been deleted.");
        assert_eq!(identity.checks.load(Ordering::SeqCst), 2);
        assert!(identity.deleted.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn change_password_needs_session() {
        let (ctx, _rx) = context(Arc::new(FakeIdentity::default()));
        let err = execute(
            &ctx,
            1,
            Request::ChangePassword {
                current: "a".into(),
                new_password: "bbbbbb".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err, "User not authenticated");
    }

    #[tokio::test]
    async fn test_print_without_printer_is_rejected() {
        let (ctx, _rx) = context(Arc::new(FakeIdentity::default()));
        let err = execute(&ctx, 1, Request::TestPrint(Default::default())).await.unwrap_err();
        assert_eq!(err, "Please select a printer type");
    }
}
