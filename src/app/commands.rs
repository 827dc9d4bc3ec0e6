//! Command handlers - business logic for processing UI events and responses

use chrono::{Local, Utc};

use crate::app::state::{
    ConfirmPrompt, Notice, PendingAction, ProductView, SalesEntry, SettingsView, SubmittedSale, SupplierView,
};
use crate::app::AppState;
use crate::cart::AddOutcome;
use crate::checkout::{build_transaction, Sale};
use crate::config::{PrinterKind, Settings};
use crate::constants::CURRENCIES;
use crate::filters;
use crate::forms::{
    ChangePasswordForm, Form, PrinterForm, ProductForm, PurchaseOrderForm, SignUpForm, SupplierForm, TextInput,
    TransferForm,
};
use crate::identity::Session;
use crate::messages::ui_events::Screen;
use crate::messages::{NetworkCommand, NetworkResponse, Reply, Request};
use crate::models::{Product, ProductPayload, PurchaseOrderDetail, Role, SupplierPayload, UserProfile};
use crate::network::client::{ProductSaveOutcome, SupplierSaveOutcome};
use crate::receipt::Receipt;

impl AppState {
    // ========================
    // Session
    // ========================

    /// Resume a persisted session: install it and re-fetch the profile
    pub fn restore_session(&mut self) {
        if let Some(session) = self.storage.load_session() {
            tracing::info!(email = %session.email, "Restoring saved session");
            self.outbox.push(NetworkCommand::SetSession(Some(session.clone())));
            self.session = Some(session);
            self.status = String::from("Restoring session...");
            self.send(Request::Profile);
        }
    }

    fn install_session(&mut self, session: Session) {
        if let Err(e) = self.storage.save_session(&session) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
        self.outbox.push(NetworkCommand::SetSession(Some(session.clone())));
        self.session = Some(session);
    }

    fn route_by_role(&mut self, profile: UserProfile) {
        if self.session.is_none() {
            tracing::debug!("Ignoring profile reply after sign-out");
            return;
        }
        match Role::parse(&profile.role) {
            Some(Role::Cashier) | Some(Role::Manager) => {
                self.profile = Some(profile);
                self.switch_screen(Screen::Sales);
            }
            Some(Role::Admin) => {
                self.profile = Some(profile);
                self.switch_screen(Screen::Settings);
            }
            None => {
                tracing::warn!(role = %profile.role, "Unknown role");
                self.show_error("Role not found.");
            }
        }
    }

    pub fn sign_out(&mut self) {
        if let Err(e) = self.storage.clear_session() {
            tracing::warn!(error = %e, "Failed to remove session file");
        }
        self.outbox.push(NetworkCommand::SetSession(None));
        self.session = None;
        self.profile = None;
        self.catalog = Default::default();
        self.auth = Default::default();
        self.sales = Default::default();
        self.cart = Default::default();
        self.products = Default::default();
        self.suppliers = Default::default();
        self.orders = Default::default();
        self.low_stock = Default::default();
        self.settings_screen = Default::default();
        self.screen = Screen::SignIn;
        self.status = String::from("Signed out");
    }

    // ========================
    // Navigation
    // ========================

    pub fn switch_screen(&mut self, screen: Screen) {
        if !screen.is_auth() && self.session.is_none() {
            return;
        }
        self.screen = screen;
        self.load_screen(screen);
    }

    /// Fetch what a screen shows
    fn load_screen(&mut self, screen: Screen) {
        let requests = match screen {
            Screen::SignIn | Screen::SignUp => vec![],
            Screen::Sales => vec![Request::Products, Request::Categories],
            Screen::Cart => vec![Request::Customers],
            Screen::Products => vec![Request::Products, Request::Categories, Request::Branches],
            Screen::Suppliers => vec![Request::Suppliers],
            Screen::PurchaseOrders => vec![Request::PurchaseOrders, Request::Suppliers, Request::Products],
            Screen::LowStock => vec![Request::LowStock],
            Screen::Settings => vec![Request::Company],
        };
        for request in requests {
            self.request_once(request);
        }
    }

    /// Send unless an identical request is already in flight
    fn request_once(&mut self, request: Request) {
        if !self.pending.values().any(|r| *r == request) {
            self.send(request);
        }
    }

    pub fn refresh(&mut self) {
        self.load_screen(self.screen);
    }

    /// Low-stock auto-refresh, driven by the app actor's interval
    pub fn tick(&mut self) {
        if self.screen == Screen::LowStock && self.session.is_some() {
            self.request_once(Request::LowStock);
        }
    }

    fn list_len(&self) -> usize {
        match self.screen {
            Screen::Sales => self.visible_catalogue().len(),
            Screen::Cart if self.cart.picking_customer => self.visible_customers().len(),
            Screen::Cart => self.cart.cart.items().len(),
            Screen::Products => self.visible_products().len(),
            Screen::Suppliers => self.visible_suppliers().len(),
            Screen::PurchaseOrders => self.orders.orders.len(),
            Screen::LowStock => self.low_stock.products.len(),
            _ => 0,
        }
    }

    fn selected_mut(&mut self) -> Option<&mut usize> {
        match self.screen {
            Screen::Sales => Some(&mut self.sales.selected),
            Screen::Cart if self.cart.picking_customer => Some(&mut self.cart.customer_selected),
            Screen::Cart => Some(&mut self.cart.selected),
            Screen::Products => Some(&mut self.products.selected),
            Screen::Suppliers => Some(&mut self.suppliers.selected),
            Screen::PurchaseOrders => Some(&mut self.orders.selected),
            Screen::LowStock => Some(&mut self.low_stock.selected),
            _ => None,
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.list_len();
        if let Some(selected) = self.selected_mut() {
            *selected = (*selected).min(len.saturating_sub(1)).saturating_sub(1);
        }
    }

    pub fn select_next(&mut self) {
        let len = self.list_len();
        if let Some(selected) = self.selected_mut() {
            if *selected + 1 < len {
                *selected += 1;
            }
        }
    }

    fn reset_selection(&mut self) {
        if let Some(selected) = self.selected_mut() {
            *selected = 0;
        }
    }

    // ========================
    // Input editing
    // ========================

    fn active_form(&mut self) -> Option<&mut dyn Form> {
        match self.screen {
            Screen::SignIn => Some(&mut self.auth.sign_in as &mut dyn Form),
            Screen::SignUp => Some(&mut self.auth.sign_up as &mut dyn Form),
            Screen::Products => match &mut self.products.view {
                ProductView::Create(form) | ProductView::Edit(form) => Some(form as &mut dyn Form),
                ProductView::Transfer(form) => Some(form as &mut dyn Form),
                ProductView::List => None,
            },
            Screen::Suppliers => match &mut self.suppliers.view {
                SupplierView::Create(form) | SupplierView::Edit(form) => Some(form as &mut dyn Form),
                _ => None,
            },
            Screen::PurchaseOrders => self.orders.form.as_mut().map(|form| form as &mut dyn Form),
            Screen::Settings => match &mut self.settings_screen.view {
                SettingsView::Printer(form) => Some(form as &mut dyn Form),
                SettingsView::ChangePassword(form) => Some(form as &mut dyn Form),
                SettingsView::Overview => None,
            },
            _ => None,
        }
    }

    /// Single-line input outside forms (search, scanner, payment)
    fn active_input(&mut self) -> Option<&mut TextInput> {
        match self.screen {
            Screen::Sales => match self.sales.entry {
                Some(SalesEntry::Search) => Some(&mut self.sales.search),
                Some(SalesEntry::Scan) => Some(&mut self.sales.scanner),
                None => None,
            },
            Screen::Cart if self.cart.is_submitting() => None,
            Screen::Cart if self.cart.picking_customer => Some(&mut self.cart.customer_search),
            Screen::Cart if self.cart.entering_payment => Some(&mut self.cart.payment),
            Screen::Products if self.products.searching => Some(&mut self.products.search),
            Screen::Suppliers if self.suppliers.searching => Some(&mut self.suppliers.search),
            _ => None,
        }
    }

    pub fn start_search(&mut self) {
        match self.screen {
            Screen::Sales => self.sales.entry = Some(SalesEntry::Search),
            Screen::Products if matches!(self.products.view, ProductView::List) => self.products.searching = true,
            Screen::Suppliers if matches!(self.suppliers.view, SupplierView::List) => self.suppliers.searching = true,
            _ => {}
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(form) = self.active_form() {
            form.enter_char(c);
        } else if let Some(input) = self.active_input() {
            input.insert(c);
            self.reset_selection();
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(form) = self.active_form() {
            form.backspace();
        } else if let Some(input) = self.active_input() {
            input.backspace();
            self.reset_selection();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(form) = self.active_form() {
            form.cursor_left();
        } else if let Some(input) = self.active_input() {
            input.left();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(form) = self.active_form() {
            form.cursor_right();
        } else if let Some(input) = self.active_input() {
            input.right();
        }
    }

    pub fn next_field(&mut self) {
        match self.active_form() {
            Some(form) => form.next_field(),
            None => self.select_next(),
        }
    }

    pub fn prev_field(&mut self) {
        match self.active_form() {
            Some(form) => form.prev_field(),
            None => self.select_prev(),
        }
    }

    pub fn submit(&mut self) {
        match self.screen {
            Screen::SignIn => self.sign_in(),
            Screen::SignUp => self.sign_up(),
            Screen::Sales => match self.sales.entry {
                Some(SalesEntry::Scan) => self.scan_barcode(),
                _ => self.sales.entry = None,
            },
            Screen::Cart if self.cart.picking_customer => self.pick_customer(),
            Screen::Cart => self.cart.entering_payment = false,
            Screen::Products if self.products.searching => self.products.searching = false,
            Screen::Products => self.submit_product_view(),
            Screen::Suppliers if self.suppliers.searching => self.suppliers.searching = false,
            Screen::Suppliers => self.save_supplier(),
            Screen::PurchaseOrders => self.save_purchase_order(),
            Screen::LowStock => {}
            Screen::Settings => self.submit_settings_view(),
        }
    }

    pub fn cancel(&mut self) {
        match self.screen {
            Screen::SignIn => {}
            Screen::SignUp => self.screen = Screen::SignIn,
            Screen::Sales => {
                match self.sales.entry {
                    Some(SalesEntry::Search) => self.sales.search.clear(),
                    Some(SalesEntry::Scan) => self.sales.scanner.clear(),
                    None => {}
                }
                self.sales.entry = None;
            }
            Screen::Cart => {
                self.cart.picking_customer = false;
                self.cart.entering_payment = false;
            }
            Screen::Products => {
                if self.products.searching {
                    self.products.searching = false;
                    self.products.search.clear();
                } else {
                    self.products.view = ProductView::List;
                }
            }
            Screen::Suppliers => {
                if self.suppliers.searching {
                    self.suppliers.searching = false;
                    self.suppliers.search.clear();
                } else {
                    self.suppliers.view = SupplierView::List;
                }
            }
            Screen::PurchaseOrders => self.orders.form = None,
            Screen::LowStock => self.low_stock.detail = None,
            Screen::Settings => self.settings_screen.view = SettingsView::Overview,
        }
    }

    // ========================
    // Sign in / sign up
    // ========================

    fn sign_in(&mut self) {
        match self.auth.sign_in.validate() {
            Ok((email, password)) => {
                self.status = String::from("Signing in...");
                self.send(Request::SignIn { email, password });
            }
            Err(e) => self.show_error(e.to_string()),
        }
    }

    pub fn go_to_sign_up(&mut self) {
        self.auth.sign_up = SignUpForm::default();
        self.screen = Screen::SignUp;
    }

    pub fn reset_password(&mut self) {
        match self.auth.sign_in.reset_email() {
            Ok(email) => {
                self.send(Request::SendPasswordReset(email));
            }
            Err(e) => self.show_error(e.to_string()),
        }
    }

    fn sign_up(&mut self) {
        if self.is_pending("sign_up") {
            return;
        }
        match self.auth.sign_up.validate() {
            Ok(data) => {
                self.status = String::from("Creating account...");
                self.send(Request::SignUp(data));
            }
            Err(e) => self.show_error(e.to_string()),
        }
    }

    // ========================
    // Lists
    // ========================

    pub fn open_selected(&mut self) {
        match self.screen {
            Screen::Suppliers => {
                let supplier = self.visible_suppliers().get(self.suppliers.selected).map(|s| (*s).clone());
                if let Some(supplier) = supplier {
                    self.suppliers.view = SupplierView::Detail(supplier);
                }
            }
            Screen::LowStock => {
                self.low_stock.detail = self.low_stock.products.get(self.low_stock.selected).cloned();
            }
            _ => {}
        }
    }

    pub fn new_record(&mut self) {
        match self.screen {
            Screen::Products => {
                self.products.view = ProductView::Create(ProductForm::new(&self.catalog.categories));
            }
            Screen::Suppliers => self.suppliers.view = SupplierView::Create(SupplierForm::default()),
            Screen::PurchaseOrders => {
                self.orders.form = Some(PurchaseOrderForm::new(
                    &self.catalog.suppliers,
                    &self.catalog.products,
                    Local::now().date_naive(),
                ));
            }
            _ => {}
        }
    }

    pub fn edit_selected(&mut self) {
        match self.screen {
            Screen::Products => {
                let product = self.visible_products().get(self.products.selected).map(|p| (*p).clone());
                if let Some(product) = product {
                    self.products.view =
                        ProductView::Edit(ProductForm::from_product(&product, &self.catalog.categories));
                }
            }
            Screen::Suppliers => {
                let supplier = match &self.suppliers.view {
                    SupplierView::Detail(supplier) => Some(supplier.clone()),
                    _ => self.visible_suppliers().get(self.suppliers.selected).map(|s| (*s).clone()),
                };
                if let Some(supplier) = supplier {
                    self.suppliers.view = SupplierView::Edit(SupplierForm::from_supplier(&supplier));
                }
            }
            Screen::PurchaseOrders => {
                if let Some(order) = self.orders.orders.get(self.orders.selected) {
                    let id = order.id;
                    self.status = String::from("Loading purchase order...");
                    self.send(Request::PurchaseOrder(id));
                }
            }
            _ => {}
        }
    }

    pub fn delete_selected(&mut self) {
        let prompt = match self.screen {
            Screen::Products => self
                .visible_products()
                .get(self.products.selected)
                .map(|p| ("Are you sure you want to delete this product?", PendingAction::DeleteProduct(p.id))),
            Screen::Suppliers => {
                let id = match &self.suppliers.view {
                    SupplierView::Detail(supplier) => Some(supplier.id),
                    _ => self.visible_suppliers().get(self.suppliers.selected).map(|s| s.id),
                };
                id.map(|id| ("Are you sure you want to delete this supplier?", PendingAction::DeleteSupplier(id)))
            }
            Screen::PurchaseOrders => self.orders.orders.get(self.orders.selected).map(|o| {
                (
                    "Are you sure you want to delete this purchase order?",
                    PendingAction::DeletePurchaseOrder(o.id),
                )
            }),
            _ => None,
        };
        if let Some((message, action)) = prompt {
            self.confirm = Some(ConfirmPrompt {
                message: message.to_string(),
                action,
            });
        }
    }

    // ========================
    // Sales
    // ========================

    pub fn cycle_category(&mut self) {
        let categories = &self.catalog.categories;
        self.sales.category = match self.sales.category {
            None => categories.first().map(|c| c.id),
            Some(current) => categories
                .iter()
                .position(|c| c.id == current)
                .and_then(|i| categories.get(i + 1))
                .map(|c| c.id),
        };
        self.sales.selected = 0;
    }

    pub fn start_scan(&mut self) {
        self.sales.scanner.clear();
        self.sales.entry = Some(SalesEntry::Scan);
    }

    fn scan_barcode(&mut self) {
        let code = self.sales.scanner.trimmed().to_string();
        self.sales.scanner.clear();
        if code.is_empty() {
            return;
        }
        match filters::find_by_barcode(&self.catalog.products, &code).cloned() {
            Some(product) => self.add_to_cart(&product),
            None => self.show_notice("Not found", format!("No product matches barcode {}", code)),
        }
    }

    pub fn add_selected_to_cart(&mut self) {
        let product = self.visible_catalogue().get(self.sales.selected).map(|p| (*p).clone());
        if let Some(product) = product {
            self.add_to_cart(&product);
        }
    }

    fn add_to_cart(&mut self, product: &Product) {
        if self.cart.is_submitting() {
            return;
        }
        match self.cart.cart.add(product) {
            AddOutcome::Added => self.status = format!("{} added to cart", product.name),
            AddOutcome::AlreadyInCart => self.status = format!("{} is already in the cart", product.name),
            AddOutcome::OutOfStock => {
                self.show_notice("Out of stock", format!("{} is out of stock", product.name));
            }
        }
    }

    // ========================
    // Cart & checkout
    // ========================

    fn selected_line_id(&self) -> Option<i64> {
        self.cart.cart.items().get(self.cart.selected).map(|item| item.product.id)
    }

    pub fn increase_quantity(&mut self) {
        if let Some(id) = self.selected_line_id().filter(|_| !self.cart.is_submitting()) {
            self.cart.cart.increment(id);
        }
    }

    pub fn decrease_quantity(&mut self) {
        if let Some(id) = self.selected_line_id().filter(|_| !self.cart.is_submitting()) {
            self.cart.cart.decrement(id);
        }
    }

    pub fn remove_line(&mut self) {
        if self.cart.is_submitting() {
            return;
        }
        if self.cart.cart.remove(self.cart.selected).is_some() {
            let len = self.cart.cart.items().len();
            self.cart.selected = self.cart.selected.min(len.saturating_sub(1));
        }
    }

    /// none -> usd -> zig -> rand -> none
    pub fn cycle_currency(&mut self) {
        if self.cart.is_submitting() {
            return;
        }
        let next = match self.cart.currency.as_deref() {
            None => CURRENCIES.first(),
            Some(current) => CURRENCIES
                .iter()
                .position(|c| *c == current)
                .and_then(|i| CURRENCIES.get(i + 1)),
        };
        self.cart.currency = next.map(|c| c.to_string());
        self.cart.rate = None;
        if let Some(currency) = self.cart.currency.clone() {
            self.send(Request::ExchangeRate(currency));
        }
    }

    pub fn choose_customer(&mut self) {
        if self.cart.is_submitting() {
            return;
        }
        self.cart.picking_customer = true;
        self.cart.entering_payment = false;
        self.cart.customer_search.clear();
        self.cart.customer_selected = 0;
        if self.catalog.customers.is_empty() {
            self.request_once(Request::Customers);
        }
    }

    fn pick_customer(&mut self) {
        if self.cart.is_submitting() {
            return;
        }
        let customer = self
            .visible_customers()
            .get(self.cart.customer_selected)
            .map(|c| (*c).clone());
        if let Some(customer) = customer {
            self.status = format!("Customer: {}", customer.full_name);
            self.cart.customer = Some(customer);
            self.cart.picking_customer = false;
        }
    }

    pub fn enter_payment(&mut self) {
        if self.cart.is_submitting() {
            return;
        }
        self.cart.picking_customer = false;
        self.cart.entering_payment = true;
    }

    pub fn submit_sale(&mut self) {
        if self.cart.is_submitting() {
            return;
        }
        if self.cart.currency.is_some() && self.cart.rate.is_none() {
            self.show_error("Waiting for the exchange rate.");
            return;
        }
        let Some(cashier) = self.profile.as_ref() else {
            self.show_error("User not authenticated");
            return;
        };
        let payment = self.payment();
        let sale = Sale {
            cart: &self.cart.cart,
            totals: self.totals(),
            customer: self.cart.customer.as_ref(),
            cashier,
            currency: self.cart.currency.as_deref(),
            rate: self.cart.rate,
            payment: &payment,
        };
        let receipt = Receipt::from_sale(
            &sale,
            String::new(),
            &self.settings.store,
            self.settings.tax_label(),
            Local::now().naive_local(),
        );
        match build_transaction(sale, Utc::now()) {
            Ok(transaction) => {
                self.cart.entering_payment = false;
                self.cart.picking_customer = false;
                self.cart.in_flight = Some(SubmittedSale {
                    transaction: transaction.clone(),
                    receipt,
                });
                self.status = String::from("Submitting transaction...");
                self.send(Request::CreateTransaction(transaction));
            }
            Err(e) => self.show_error(e.to_string()),
        }
    }

    /// Number the frozen receipt, save it, print it, and start a new sale
    fn complete_sale(&mut self, order_id: String) {
        let Some(SubmittedSale { transaction, mut receipt }) = self.cart.in_flight.take() else {
            tracing::warn!(order_id = %order_id, "Transaction reply without a submitted sale");
            return;
        };
        receipt.number = order_id.clone();
        let width = self.settings.printer.paper.columns();

        let mut saved_to = None;
        for (extension, bytes) in [
            ("html", receipt.to_html().into_bytes()),
            ("txt", receipt.to_text(width).into_bytes()),
        ] {
            match self.storage.save_document(&receipt.file_name(extension), &bytes) {
                Ok(path) if extension == "html" => saved_to = Some(path),
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, extension, "Failed to save receipt"),
            }
        }

        if self.settings.printer.kind == PrinterKind::Network {
            self.send(Request::Print {
                printer: self.settings.printer.clone(),
                bytes: receipt.to_escpos(width),
            });
        }

        let change = crate::cart::format_money(receipt.currency.as_deref(), receipt.change);
        self.storage.add_sale(receipt);
        tracing::info!(order_id = %order_id, total = transaction.transaction.total_amount, "Sale completed");

        self.cart.cart.clear();
        self.cart.customer = None;
        self.cart.payment.clear();
        self.cart.selected = 0;
        self.send(Request::Products);

        let mut message = format!("Order {} recorded.\nChange: {}", order_id, change);
        if let Some(path) = saved_to {
            message.push_str(&format!("\nReceipt saved to {}", path.display()));
        }
        self.show_notice("Sale complete", message);
    }

    pub fn print_receipt(&mut self) {
        let Some(receipt) = self.storage.last_sale().cloned() else {
            self.show_notice("Receipt", "No completed sale to print yet.");
            return;
        };
        if self.settings.printer.kind == PrinterKind::None {
            self.show_notice(
                "Receipt",
                format!(
                    "No printer configured. Receipts are saved to {}",
                    self.storage.documents_dir().display()
                ),
            );
            return;
        }
        let width = self.settings.printer.paper.columns();
        self.send(Request::Print {
            printer: self.settings.printer.clone(),
            bytes: receipt.to_escpos(width),
        });
    }

    // ========================
    // Products
    // ========================

    fn submit_product_view(&mut self) {
        match &self.products.view {
            ProductView::Create(form) | ProductView::Edit(form) => match form.validate() {
                Ok(payload) => {
                    self.send(Request::SaveProduct(payload));
                }
                Err(e) => self.show_error(e.to_string()),
            },
            ProductView::Transfer(form) => match form.validate() {
                Ok((target_branch, quantity)) => {
                    let product_id = form.product.id;
                    self.send(Request::TransferStock {
                        product_id,
                        target_branch,
                        quantity,
                    });
                }
                Err(e) => self.show_error(e.to_string()),
            },
            ProductView::List => {}
        }
    }

    pub fn start_transfer(&mut self) {
        if !matches!(self.products.view, ProductView::List) {
            return;
        }
        let product = self.visible_products().get(self.products.selected).map(|p| (*p).clone());
        if let Some(product) = product {
            if self.catalog.branches.is_empty() {
                self.request_once(Request::Branches);
            }
            self.products.view = ProductView::Transfer(TransferForm::new(product, &self.catalog.branches));
        }
    }

    // ========================
    // Suppliers
    // ========================

    fn save_supplier(&mut self) {
        let form = match &self.suppliers.view {
            SupplierView::Create(form) | SupplierView::Edit(form) => form,
            _ => return,
        };
        match form.validate() {
            Ok(payload) => {
                self.send(Request::SaveSupplier(payload));
            }
            Err(e) => self.show_error(e.to_string()),
        }
    }

    // ========================
    // Purchase orders
    // ========================

    fn save_purchase_order(&mut self) {
        let Some(form) = &self.orders.form else {
            return;
        };
        match form.validate() {
            Ok(order) => {
                self.send(Request::SavePurchaseOrder(order));
            }
            Err(e) => self.show_error(e.to_string()),
        }
    }

    pub fn add_order_item(&mut self) {
        if let Some(form) = self.orders.form.as_mut() {
            form.add_item();
        }
    }

    pub fn remove_order_item(&mut self) {
        if let Some(form) = self.orders.form.as_mut() {
            form.remove_focused_item();
        }
    }

    pub fn download_pdf(&mut self) {
        if self.orders.form.is_some() {
            return;
        }
        if let Some(order) = self.orders.orders.get(self.orders.selected) {
            let id = order.id;
            self.status = String::from("Downloading PDF...");
            self.send(Request::PurchaseOrderPdf(id));
        }
    }

    fn save_pdf(&mut self, id: i64, bytes: Vec<u8>) {
        let label = self
            .orders
            .orders
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.po_number.clone())
            .filter(|n| n != "N/A")
            .unwrap_or_else(|| id.to_string());
        match self.storage.save_document(&format!("PurchaseOrder_{}.pdf", label), &bytes) {
            Ok(path) => self.status = format!("PDF saved to {}", path.display()),
            Err(e) => {
                tracing::error!(error = %e, "Failed to save PDF");
                self.show_error("Failed to generate PDF. Please try again.");
            }
        }
    }

    // ========================
    // Settings
    // ========================

    pub fn edit_printer(&mut self) {
        self.settings_screen.view = SettingsView::Printer(PrinterForm::from_settings(&self.settings.printer));
    }

    pub fn change_password(&mut self) {
        self.settings_screen.view = SettingsView::ChangePassword(ChangePasswordForm::default());
    }

    pub fn test_print(&mut self) {
        self.status = String::from("Sending test page...");
        self.send(Request::TestPrint(self.settings.printer.clone()));
    }

    fn submit_settings_view(&mut self) {
        match &self.settings_screen.view {
            SettingsView::Printer(form) => match form.validate() {
                Ok(printer) => match Settings::save_printer(self.storage.data_dir(), &printer) {
                    Ok(()) => {
                        self.settings.printer = printer;
                        self.status = String::from("Printer settings saved");
                        self.settings_screen.view = SettingsView::Overview;
                    }
                    Err(e) => self.show_error(format!("Failed to save settings: {}", e)),
                },
                Err(e) => self.show_error(e.to_string()),
            },
            SettingsView::ChangePassword(form) => match form.validate() {
                Ok((current, new_password)) => {
                    self.send(Request::ChangePassword { current, new_password });
                }
                Err(e) => self.show_error(e.to_string()),
            },
            SettingsView::Overview => {}
        }
    }

    // ========================
    // Modals & popups
    // ========================

    pub fn show_notice(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notice = Some(Notice {
            title: title.into(),
            message: message.into(),
            retry: None,
        });
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.show_notice("Error", message);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn retry(&mut self) {
        if let Some(request) = self.notice.take().and_then(|n| n.retry) {
            tracing::info!(request = request.name(), "Retrying request");
            self.send(request);
        }
    }

    pub fn confirm(&mut self) {
        let Some(prompt) = self.confirm.take() else {
            return;
        };
        match prompt.action {
            PendingAction::DeleteProduct(id) => {
                self.send(Request::DeleteProduct(id));
            }
            PendingAction::DeleteSupplier(id) => {
                self.send(Request::DeleteSupplier(id));
            }
            PendingAction::DeletePurchaseOrder(id) => {
                self.send(Request::DeletePurchaseOrder(id));
            }
            PendingAction::EditExistingProduct(product) => {
                self.screen = Screen::Products;
                self.products.view = ProductView::Edit(ProductForm::from_product(&product, &self.catalog.categories));
            }
        }
    }

    pub fn deny(&mut self) {
        self.confirm = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        match response {
            NetworkResponse::Progress { message, .. } => self.status = message,
            NetworkResponse::Completed { id, reply } => {
                let request = self.pending.remove(&id);
                self.apply_reply(request, reply);
            }
            NetworkResponse::Failed { id, request, message } => {
                self.pending.remove(&id);
                self.apply_failure(request, message);
            }
        }
    }

    fn apply_reply(&mut self, request: Option<Request>, reply: Reply) {
        match reply {
            Reply::SignedIn(session) => {
                self.auth.sign_in.password.clear();
                self.install_session(session);
                self.status = String::from("Signed in");
                self.send(Request::Profile);
            }
            Reply::SignedUp => {
                self.auth.sign_up = SignUpForm::default();
                self.screen = Screen::SignIn;
                self.status.clear();
                self.show_notice("Success", "Account created successfully!");
            }
            Reply::PasswordResetSent => self.show_notice("Password reset", "Password reset email sent!"),
            Reply::PasswordChanged(session) => {
                self.install_session(session);
                self.settings_screen.view = SettingsView::Overview;
                self.show_notice("Success", "Password changed successfully");
            }
            Reply::Profile(profile) => {
                self.status.clear();
                self.route_by_role(profile);
            }

            Reply::Products(products) => self.catalog.products = products,
            Reply::Categories(categories) => self.catalog.categories = categories,
            Reply::Branches(branches) => {
                if let ProductView::Transfer(form) = &mut self.products.view {
                    form.branch.set_options(crate::forms::branch_choices(&branches));
                }
                self.catalog.branches = branches;
            }
            Reply::LowStock(products) => {
                self.low_stock.products = products;
                self.low_stock.loaded = true;
            }
            Reply::ProductSaved(ProductSaveOutcome::Saved(_)) => {
                let updated = matches!(request, Some(Request::SaveProduct(ProductPayload { id: Some(_), .. })));
                self.status = String::from(if updated {
                    "Product updated successfully"
                } else {
                    "Product created successfully"
                });
                self.products.view = ProductView::List;
                self.send(Request::Products);
            }
            Reply::ProductSaved(ProductSaveOutcome::Duplicate(existing)) => {
                self.confirm = Some(ConfirmPrompt {
                    message: format!(
                        "A similar product already exists:\n\nName: {}\nBarcode: {}\n\nEdit the existing product?",
                        existing.name,
                        existing.barcode.as_deref().unwrap_or("N/A"),
                    ),
                    action: PendingAction::EditExistingProduct(existing),
                });
            }
            Reply::ProductDeleted(_) => {
                self.status = String::from("Product deleted successfully");
                self.send(Request::Products);
            }
            Reply::StockTransferred { product_created } => {
                self.status = String::from(if product_created {
                    "Stock transferred successfully (new product created in target branch)"
                } else {
                    "Stock transferred successfully"
                });
                self.products.view = ProductView::List;
                self.send(Request::Products);
            }

            Reply::Suppliers(suppliers) => self.catalog.suppliers = suppliers,
            Reply::SupplierSaved(SupplierSaveOutcome::Saved(_)) => {
                let updated = matches!(request, Some(Request::SaveSupplier(SupplierPayload { id: Some(_), .. })));
                self.status = String::from(if updated {
                    "Supplier updated successfully"
                } else {
                    "Supplier created successfully"
                });
                self.suppliers.view = SupplierView::List;
                self.send(Request::Suppliers);
            }
            Reply::SupplierSaved(SupplierSaveOutcome::Duplicate(message)) => {
                self.show_notice("Duplicate supplier", message);
            }
            Reply::SupplierDeleted(_) => {
                self.status = String::from("Supplier deleted successfully");
                self.suppliers.view = SupplierView::List;
                self.send(Request::Suppliers);
            }

            Reply::PurchaseOrders(orders) => self.orders.orders = orders,
            Reply::PurchaseOrder(detail) => {
                self.status.clear();
                self.orders.form = Some(PurchaseOrderForm::from_detail(
                    &detail,
                    &self.catalog.suppliers,
                    &self.catalog.products,
                    Local::now().date_naive(),
                ));
            }
            Reply::PurchaseOrderSaved => {
                let updated = matches!(
                    request,
                    Some(Request::SavePurchaseOrder(PurchaseOrderDetail { id: Some(_), .. }))
                );
                self.status = String::from(if updated {
                    "Purchase order updated successfully"
                } else {
                    "Purchase order created successfully"
                });
                self.orders.form = None;
                self.send(Request::PurchaseOrders);
            }
            Reply::PurchaseOrderDeleted(_) => {
                self.status = String::from("Purchase order deleted successfully");
                self.send(Request::PurchaseOrders);
            }
            Reply::PurchaseOrderPdf { id, bytes } => self.save_pdf(id, bytes),

            Reply::Customers(customers) => self.catalog.customers = customers,
            Reply::ExchangeRate { currency, rate } => {
                if self.cart.currency.as_deref() == Some(currency.as_str()) && !self.cart.is_submitting() {
                    self.cart.rate = Some(rate);
                }
            }
            Reply::TransactionCreated { order_id } => self.complete_sale(order_id),
            Reply::Company(company) => self.settings_screen.company = Some(company),

            Reply::Printed => self.status = String::from("Receipt sent to printer"),
            Reply::PrinterTested => self.show_notice("Printer", "Test page sent to printer"),
        }
    }

    fn apply_failure(&mut self, request: Request, message: String) {
        self.status.clear();
        match &request {
            Request::Profile => {
                tracing::warn!(%message, "Profile fetch failed");
                self.show_error("Failed to fetch user role.");
                return;
            }
            Request::ExchangeRate(currency) => {
                if self.cart.currency.as_deref() == Some(currency.as_str()) {
                    self.cart.currency = None;
                    self.cart.rate = None;
                }
            }
            Request::CreateTransaction(_) => self.cart.in_flight = None,
            _ => {}
        }

        let retry = matches!(
            request,
            Request::SaveProduct(_) | Request::SaveSupplier(_) | Request::LowStock
        );
        let title = match &request {
            Request::SignIn { .. } => "Sign in failed",
            Request::SignUp(_) => "Sign up failed",
            Request::Print { .. } | Request::TestPrint(_) => "Printer error",
            _ => "Error",
        };
        self.notice = Some(Notice {
            title: title.to_string(),
            message,
            retry: retry.then_some(request),
        });
    }
}
