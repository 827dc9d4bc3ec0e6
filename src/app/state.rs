//! App state - pure data structure with no network I/O

use std::collections::HashMap;

use crate::cart::{currency_label, format_money, Cart, Totals};
use crate::checkout::{Change, Payment, TransactionRequest};
use crate::config::{PrinterKind, Settings};
use crate::filters;
use crate::forms::{
    ChangePasswordForm, Form, PrinterForm, ProductForm, PurchaseOrderForm, SignInForm, SignUpForm,
    SupplierForm, TextInput, TransferForm,
};
use crate::identity::Session;
use crate::messages::render::{DetailView, FormView, InputLine, NoticeView, RowTone, TableView};
use crate::messages::ui_events::{InputMode, Overlay, Screen};
use crate::messages::{NetworkCommand, RenderState, Request};
use crate::models::{Branch, Category, Company, Customer, Product, PurchaseOrder, Supplier, UserProfile};
use crate::receipt::Receipt;
use crate::storage::Storage;

/// Modal message; `retry` holds the request to re-issue on `r`
#[derive(Clone, Debug)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub retry: Option<Request>,
}

/// What a confirmed prompt does
#[derive(Clone, Debug, PartialEq)]
pub enum PendingAction {
    DeleteProduct(i64),
    DeleteSupplier(i64),
    DeletePurchaseOrder(i64),
    EditExistingProduct(Product),
}

#[derive(Clone, Debug)]
pub struct ConfirmPrompt {
    pub message: String,
    pub action: PendingAction,
}

/// Records shared by several screens
#[derive(Default)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub branches: Vec<Branch>,
    pub suppliers: Vec<Supplier>,
    pub customers: Vec<Customer>,
}

#[derive(Default)]
pub struct AuthState {
    pub sign_in: SignInForm,
    pub sign_up: SignUpForm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SalesEntry {
    Search,
    Scan,
}

#[derive(Default)]
pub struct SalesState {
    pub category: Option<i64>,
    pub search: TextInput,
    pub scanner: TextInput,
    pub entry: Option<SalesEntry>,
    pub selected: usize,
}

/// A sale posted to the backend, frozen at submit time. The receipt only
/// lacks the order number, which arrives with the reply.
#[derive(Clone, Debug)]
pub struct SubmittedSale {
    pub transaction: TransactionRequest,
    pub receipt: Receipt,
}

#[derive(Default)]
pub struct CartState {
    pub cart: Cart,
    pub currency: Option<String>,
    pub rate: Option<f64>,
    pub customer: Option<Customer>,
    pub picking_customer: bool,
    pub customer_search: TextInput,
    pub customer_selected: usize,
    pub payment: TextInput,
    pub entering_payment: bool,
    pub in_flight: Option<SubmittedSale>,
    pub selected: usize,
}

impl CartState {
    /// The cart is frozen while a transaction is in flight
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }
}

pub enum ProductView {
    List,
    Create(ProductForm),
    Edit(ProductForm),
    Transfer(TransferForm),
}

pub struct ProductsState {
    pub view: ProductView,
    pub search: TextInput,
    pub searching: bool,
    pub selected: usize,
}

impl Default for ProductsState {
    fn default() -> Self {
        ProductsState {
            view: ProductView::List,
            search: TextInput::default(),
            searching: false,
            selected: 0,
        }
    }
}

pub enum SupplierView {
    List,
    Create(SupplierForm),
    Edit(SupplierForm),
    Detail(Supplier),
}

pub struct SuppliersState {
    pub view: SupplierView,
    pub search: TextInput,
    pub searching: bool,
    pub selected: usize,
}

impl Default for SuppliersState {
    fn default() -> Self {
        SuppliersState {
            view: SupplierView::List,
            search: TextInput::default(),
            searching: false,
            selected: 0,
        }
    }
}

#[derive(Default)]
pub struct OrdersState {
    pub orders: Vec<PurchaseOrder>,
    pub form: Option<PurchaseOrderForm>,
    pub selected: usize,
}

#[derive(Default)]
pub struct LowStockState {
    pub products: Vec<Product>,
    pub detail: Option<Product>,
    pub selected: usize,
    pub loaded: bool,
}

pub enum SettingsView {
    Overview,
    Printer(PrinterForm),
    ChangePassword(ChangePasswordForm),
}

pub struct SettingsState {
    pub view: SettingsView,
    pub company: Option<Company>,
}

impl Default for SettingsState {
    fn default() -> Self {
        SettingsState {
            view: SettingsView::Overview,
            company: None,
        }
    }
}

/// Main application state
pub struct AppState {
    pub screen: Screen,
    pub settings: Settings,
    pub storage: Storage,

    pub session: Option<Session>,
    pub profile: Option<UserProfile>,

    // Requests in flight, keyed by id
    pub next_request_id: u64,
    pub pending: HashMap<u64, Request>,
    pub outbox: Vec<NetworkCommand>,

    // Popups
    pub notice: Option<Notice>,
    pub confirm: Option<ConfirmPrompt>,
    pub show_help: bool,
    pub status: String,

    pub catalog: Catalog,
    pub auth: AuthState,
    pub sales: SalesState,
    pub cart: CartState,
    pub products: ProductsState,
    pub suppliers: SuppliersState,
    pub orders: OrdersState,
    pub low_stock: LowStockState,
    pub settings_screen: SettingsState,
}

impl AppState {
    pub fn new(settings: Settings, storage: Storage) -> Self {
        AppState {
            screen: Screen::SignIn,
            settings,
            storage,
            session: None,
            profile: None,
            next_request_id: 1,
            pending: HashMap::new(),
            outbox: Vec::new(),
            notice: None,
            confirm: None,
            show_help: false,
            status: String::new(),
            catalog: Catalog::default(),
            auth: AuthState::default(),
            sales: SalesState::default(),
            cart: CartState::default(),
            products: ProductsState::default(),
            suppliers: SuppliersState::default(),
            orders: OrdersState::default(),
            low_stock: LowStockState::default(),
            settings_screen: SettingsState::default(),
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Queue a request for the network actor
    pub fn send(&mut self, request: Request) -> u64 {
        let id = self.next_id();
        self.pending.insert(id, request.clone());
        self.outbox.push(NetworkCommand::Execute { id, request });
        id
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.values().any(|r| r.name() == name)
    }

    /// Drain commands queued since the last call
    pub fn take_commands(&mut self) -> Vec<NetworkCommand> {
        std::mem::take(&mut self.outbox)
    }

    pub fn overlay(&self) -> Overlay {
        if self.notice.is_some() {
            Overlay::Notice
        } else if self.confirm.is_some() {
            Overlay::Confirm
        } else if self.show_help {
            Overlay::Help
        } else {
            Overlay::None
        }
    }

    pub fn input_mode(&self) -> InputMode {
        let editing = match self.screen {
            Screen::SignIn | Screen::SignUp => true,
            Screen::Sales => self.sales.entry.is_some(),
            Screen::Cart => self.cart.picking_customer || self.cart.entering_payment,
            Screen::Products => self.products.searching || !matches!(self.products.view, ProductView::List),
            Screen::Suppliers => {
                self.suppliers.searching
                    || matches!(self.suppliers.view, SupplierView::Create(_) | SupplierView::Edit(_))
            }
            Screen::PurchaseOrders => self.orders.form.is_some(),
            Screen::LowStock => false,
            Screen::Settings => !matches!(self.settings_screen.view, SettingsView::Overview),
        };
        if editing {
            InputMode::Editing
        } else {
            InputMode::Normal
        }
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(self.cart.cart.items(), self.cart.rate, self.settings.tax_rate)
    }

    pub fn payment(&self) -> Payment {
        Payment::evaluate(self.cart.payment.value(), self.totals().total)
    }

    // Filtered views, shared by command handlers and rendering

    pub fn visible_catalogue(&self) -> Vec<&Product> {
        filters::filter_catalogue(&self.catalog.products, self.sales.category, self.sales.search.value())
    }

    pub fn visible_products(&self) -> Vec<&Product> {
        filters::filter_products(&self.catalog.products, self.products.search.value())
    }

    pub fn visible_suppliers(&self) -> Vec<&Supplier> {
        filters::filter_suppliers(&self.catalog.suppliers, self.suppliers.search.value())
    }

    pub fn visible_customers(&self) -> Vec<&Customer> {
        filters::filter_customers(&self.catalog.customers, self.cart.customer_search.value())
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let mut render = RenderState {
            screen: self.screen,
            input_mode: self.input_mode(),
            overlay: self.overlay(),
            user: self.profile.as_ref().map(|p| format!("{} ({})", p.first_name, p.role)),
            status: self.status.clone(),
            loading: !self.pending.is_empty(),
            notice: self.notice.as_ref().map(|n| NoticeView {
                title: n.title.clone(),
                message: n.message.clone(),
                can_retry: n.retry.is_some(),
            }),
            confirm: self.confirm.as_ref().map(|c| c.message.clone()),
            ..RenderState::default()
        };

        match self.screen {
            Screen::SignIn => self.render_sign_in(&mut render),
            Screen::SignUp => self.render_sign_up(&mut render),
            Screen::Sales => self.render_sales(&mut render),
            Screen::Cart => self.render_cart(&mut render),
            Screen::Products => self.render_products(&mut render),
            Screen::Suppliers => self.render_suppliers(&mut render),
            Screen::PurchaseOrders => self.render_orders(&mut render),
            Screen::LowStock => self.render_low_stock(&mut render),
            Screen::Settings => self.render_settings(&mut render),
        }
        render
    }

    fn render_sign_in(&self, render: &mut RenderState) {
        render.form = Some(form_view("Sign in", &self.auth.sign_in));
        render.key_hints = String::from("Enter sign in | Tab next | Ctrl-u sign up | Ctrl-r reset password | Ctrl-c quit");
    }

    fn render_sign_up(&self, render: &mut RenderState) {
        render.form = Some(form_view("Create account", &self.auth.sign_up));
        render.key_hints = String::from("Enter submit | Tab next | Space/←/→ role | Esc back");
    }

    fn render_sales(&self, render: &mut RenderState) {
        let products = self.visible_catalogue();
        let category = self
            .sales
            .category
            .and_then(|id| self.catalog.categories.iter().find(|c| c.id == id))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| String::from("All"));

        render.input = Some(match self.sales.entry {
            Some(SalesEntry::Scan) => InputLine {
                label: String::from("Barcode"),
                value: self.sales.scanner.value().to_string(),
                cursor: self.sales.scanner.cursor(),
                active: true,
            },
            _ => InputLine {
                label: String::from("Search"),
                value: self.sales.search.value().to_string(),
                cursor: self.sales.search.cursor(),
                active: self.sales.entry == Some(SalesEntry::Search),
            },
        });
        render.table = Some(TableView {
            title: format!("Products [{}]", category),
            columns: strings(&["Code", "Name", "Price", "Stock", ""]),
            rows: products
                .iter()
                .map(|p| {
                    vec![
                        p.code_str().to_string(),
                        p.name.clone(),
                        format!("${:.2}", p.price),
                        p.stock_quantity.to_string(),
                        String::from(if self.cart.cart.contains(p.id) { "in cart" } else { "" }),
                    ]
                })
                .collect(),
            tones: products
                .iter()
                .map(|p| if p.is_out_of_stock() { RowTone::Muted } else { RowTone::Normal })
                .collect(),
            selected: selection(self.sales.selected, products.len()),
            empty_message: String::from("No products found"),
        });
        render.summary = vec![
            (String::from("Items in cart"), self.cart.cart.item_count().to_string()),
            (String::from("Cart total"), format!("${:.2}", self.cart.cart.raw_total())),
        ];
        render.key_hints = String::from("Enter add | / search | b scan | c category | 2 cart | r refresh | ? help");
    }

    fn render_cart(&self, render: &mut RenderState) {
        let currency = self.cart.currency.as_deref();
        let totals = self.totals();

        if self.cart.picking_customer {
            let customers = self.visible_customers();
            render.input = Some(InputLine {
                label: String::from("Customer"),
                value: self.cart.customer_search.value().to_string(),
                cursor: self.cart.customer_search.cursor(),
                active: true,
            });
            render.table = Some(TableView {
                title: String::from("Select customer"),
                columns: strings(&["Name", "Email", "Points"]),
                rows: customers
                    .iter()
                    .map(|c| {
                        vec![
                            c.full_name.clone(),
                            c.email.clone().unwrap_or_default(),
                            c.loyalty_points.to_string(),
                        ]
                    })
                    .collect(),
                tones: Vec::new(),
                selected: selection(self.cart.customer_selected, customers.len()),
                empty_message: String::from("No customers found"),
            });
            render.key_hints = String::from("Type to search | ↑/↓ move | Enter select | Esc close");
            return;
        }

        render.input = Some(InputLine {
            label: format!("Amount paid ({})", currency_label(currency)),
            value: self.cart.payment.value().to_string(),
            cursor: self.cart.payment.cursor(),
            active: self.cart.entering_payment,
        });
        render.table = Some(TableView {
            title: String::from("Cart"),
            columns: strings(&["Product", "Qty", "Price", "Total"]),
            rows: self
                .cart
                .cart
                .items()
                .iter()
                .map(|item| {
                    let unit = item.unit_price(self.cart.rate);
                    vec![
                        item.product.name.clone(),
                        item.quantity.to_string(),
                        format_money(currency, unit),
                        format_money(currency, unit * item.quantity as f64),
                    ]
                })
                .collect(),
            tones: Vec::new(),
            selected: selection(self.cart.selected, self.cart.cart.items().len()),
            empty_message: String::from("Cart is empty"),
        });

        let change = if self.cart.payment.is_blank() {
            String::new()
        } else {
            match self.payment().change {
                Change::Amount(amount) => format_money(currency, amount),
                Change::Insufficient => String::from("Insufficient amount"),
            }
        };
        let rate = match (currency, self.cart.rate) {
            (Some(_), Some(rate)) => format!("{:.4}", rate),
            (Some(_), None) => String::from("loading..."),
            (None, _) => String::from("-"),
        };
        render.summary = vec![
            (
                String::from("Customer"),
                self.cart
                    .customer
                    .as_ref()
                    .map(|c| c.full_name.clone())
                    .unwrap_or_else(|| String::from("none selected")),
            ),
            (String::from("Currency"), currency_label(currency)),
            (String::from("Rate"), rate),
            (String::from("Subtotal"), format_money(currency, totals.subtotal)),
            (self.settings.tax_label(), format_money(currency, totals.tax)),
            (String::from("Total"), format_money(currency, totals.total)),
            (String::from("Change"), change),
        ];

        if self.cart.cart.is_empty() {
            render.preview = self
                .storage
                .last_sale()
                .map(|receipt| receipt.to_text(self.settings.printer.paper.columns()));
        }
        render.key_hints = String::from(
            "+/- qty | x remove | u currency | c customer | p payment | s submit | P reprint | Esc sales",
        );
    }

    fn render_products(&self, render: &mut RenderState) {
        match &self.products.view {
            ProductView::Create(form) => {
                render.form = Some(form_view("New product", form));
                render.key_hints = form_hints();
            }
            ProductView::Edit(form) => {
                render.form = Some(form_view("Edit product", form));
                render.key_hints = form_hints();
            }
            ProductView::Transfer(form) => {
                render.form = Some(form_view(&format!("Transfer {}", form.product.name), form));
                render.detail = Some(DetailView {
                    title: String::from("Stock"),
                    lines: vec![(String::from("Available"), form.product.stock_quantity.to_string())],
                });
                render.key_hints = form_hints();
            }
            ProductView::List => {
                let threshold = self.settings.low_stock_threshold;
                let products = self.visible_products();
                render.input = Some(InputLine {
                    label: String::from("Search"),
                    value: self.products.search.value().to_string(),
                    cursor: self.products.search.cursor(),
                    active: self.products.searching,
                });
                render.table = Some(TableView {
                    title: String::from("Products"),
                    columns: strings(&["Name", "Barcode", "Code", "Price", "Stock"]),
                    rows: products
                        .iter()
                        .map(|p| {
                            vec![
                                p.name.clone(),
                                p.barcode_str().to_string(),
                                p.code_str().to_string(),
                                format!("${:.2}", p.price),
                                p.stock_quantity.to_string(),
                            ]
                        })
                        .collect(),
                    tones: products
                        .iter()
                        .map(|p| if p.is_low_stock(threshold) { RowTone::Warning } else { RowTone::Normal })
                        .collect(),
                    selected: selection(self.products.selected, products.len()),
                    empty_message: String::from("No products found"),
                });
                render.summary = vec![
                    (String::from("Products"), self.catalog.products.len().to_string()),
                    (
                        String::from("Low stock"),
                        filters::low_stock(&self.catalog.products, threshold).len().to_string(),
                    ),
                ];
                render.key_hints =
                    String::from("/ search | n new | e edit | t transfer | d delete | r refresh | ? help");
            }
        }
    }

    fn render_suppliers(&self, render: &mut RenderState) {
        match &self.suppliers.view {
            SupplierView::Create(form) => {
                render.form = Some(form_view("New supplier", form));
                render.key_hints = form_hints();
            }
            SupplierView::Edit(form) => {
                render.form = Some(form_view("Edit supplier", form));
                render.key_hints = form_hints();
            }
            SupplierView::Detail(supplier) => {
                render.detail = Some(supplier_detail(supplier));
                render.key_hints = String::from("e edit | d delete | Esc back");
            }
            SupplierView::List => {
                let suppliers = self.visible_suppliers();
                render.input = Some(InputLine {
                    label: String::from("Search"),
                    value: self.suppliers.search.value().to_string(),
                    cursor: self.suppliers.search.cursor(),
                    active: self.suppliers.searching,
                });
                render.table = Some(TableView {
                    title: String::from("Suppliers"),
                    columns: strings(&["Name", "Contact", "Phone", "Email", "Status"]),
                    rows: suppliers
                        .iter()
                        .map(|s| {
                            vec![
                                s.name.clone(),
                                s.contact_person.clone().unwrap_or_default(),
                                s.phone.clone(),
                                s.email.clone().unwrap_or_default(),
                                String::from(if s.is_active { "Active" } else { "Inactive" }),
                            ]
                        })
                        .collect(),
                    tones: suppliers
                        .iter()
                        .map(|s| if s.is_active { RowTone::Normal } else { RowTone::Muted })
                        .collect(),
                    selected: selection(self.suppliers.selected, suppliers.len()),
                    empty_message: String::from("No suppliers found"),
                });
                render.key_hints =
                    String::from("/ search | Enter details | n new | e edit | d delete | r refresh | ? help");
            }
        }
    }

    fn render_orders(&self, render: &mut RenderState) {
        if let Some(form) = &self.orders.form {
            let title = if form.is_edit() { "Edit purchase order" } else { "New purchase order" };
            render.form = Some(form_view(title, form));
            render.summary = vec![
                (String::from("Items"), form.items.len().to_string()),
                (String::from("Total"), format!("${:.2}", form.total())),
            ];
            render.key_hints =
                String::from("Enter save | Tab next | Space/←/→ pick | Ctrl-n add item | Ctrl-d remove item | Esc cancel");
            return;
        }

        let orders = &self.orders.orders;
        render.table = Some(TableView {
            title: String::from("Purchase orders"),
            columns: strings(&["PO number", "Supplier", "Date", "Status", "Total"]),
            rows: orders
                .iter()
                .map(|o| {
                    vec![
                        o.po_number.clone(),
                        o.supplier.clone(),
                        o.order_date.clone().unwrap_or_default(),
                        o.status.clone().unwrap_or_default(),
                        format!("${:.2}", o.total_cost),
                    ]
                })
                .collect(),
            tones: Vec::new(),
            selected: selection(self.orders.selected, orders.len()),
            empty_message: String::from("No purchase orders"),
        });
        render.key_hints = String::from("n new | e edit | d delete | f download PDF | r refresh | ? help");
    }

    fn render_low_stock(&self, render: &mut RenderState) {
        if let Some(product) = &self.low_stock.detail {
            render.detail = Some(DetailView {
                title: product.name.clone(),
                lines: vec![
                    (String::from("Stock"), product.stock_quantity.to_string()),
                    (String::from("Price"), format!("${:.2}", product.price)),
                    (String::from("Barcode"), product.barcode_str().to_string()),
                    (String::from("Product code"), product.code_str().to_string()),
                    (String::from("Description"), product.description.clone().unwrap_or_default()),
                ],
            });
            render.key_hints = String::from("Esc back");
            return;
        }

        let products = &self.low_stock.products;
        render.table = Some(TableView {
            title: format!("Low stock (refreshes every {}s)", self.settings.low_stock_refresh_secs),
            columns: strings(&["Name", "Code", "Stock"]),
            rows: products
                .iter()
                .map(|p| vec![p.name.clone(), p.code_str().to_string(), p.stock_quantity.to_string()])
                .collect(),
            tones: products
                .iter()
                .map(|p| if p.is_out_of_stock() { RowTone::Warning } else { RowTone::Normal })
                .collect(),
            selected: selection(self.low_stock.selected, products.len()),
            empty_message: String::from(if self.low_stock.loaded {
                "All products are well stocked"
            } else {
                "Loading..."
            }),
        });
        render.key_hints = String::from("Enter details | r refresh | ? help");
    }

    fn render_settings(&self, render: &mut RenderState) {
        match &self.settings_screen.view {
            SettingsView::Printer(form) => {
                render.form = Some(form_view("Printer", form));
                render.key_hints = String::from("Enter save | Tab next | Space toggle | Esc cancel");
            }
            SettingsView::ChangePassword(form) => {
                render.form = Some(form_view("Change password", form));
                render.key_hints = form_hints();
            }
            SettingsView::Overview => {
                let mut lines = Vec::new();
                if let Some(profile) = &self.profile {
                    lines.push((String::from("Signed in as"), profile.first_name.clone()));
                    lines.push((String::from("Role"), profile.role.clone()));
                    if let Some(email) = &profile.email {
                        lines.push((String::from("Email"), email.clone()));
                    }
                }
                match &self.settings_screen.company {
                    Some(company) => {
                        lines.push((String::from("Company"), company.name.clone()));
                        let location = [&company.address, &company.city, &company.country]
                            .iter()
                            .filter_map(|v| v.as_deref())
                            .filter(|v| !v.is_empty())
                            .collect::<Vec<_>>()
                            .join(", ");
                        lines.push((String::from("Address"), location));
                        lines.push((String::from("Phone"), company.phone.clone().unwrap_or_default()));
                        lines.push((String::from("Company email"), company.email.clone().unwrap_or_default()));
                        lines.push((String::from("Website"), company.website.clone().unwrap_or_default()));
                    }
                    None => lines.push((String::from("Company"), String::from("not loaded"))),
                }
                render.detail = Some(DetailView {
                    title: String::from("Account & company"),
                    lines,
                });

                let printer = &self.settings.printer;
                let address = match printer.kind {
                    PrinterKind::Network => format!("{}:{}", printer.ip_address, printer.port),
                    PrinterKind::None => String::from("-"),
                };
                render.summary = vec![
                    (String::from("Printer"), printer.kind.as_str().to_string()),
                    (String::from("Address"), address),
                    (String::from("Paper"), printer.paper.as_str().to_string()),
                    (String::from("Documents"), self.storage.documents_dir().display().to_string()),
                    (String::from("Backend"), self.settings.backend_url().to_string()),
                ];
                render.key_hints =
                    String::from("p printer | t test print | w change password | o sign out | r refresh | ? help");
            }
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn form_hints() -> String {
    String::from("Enter save | Tab/↑/↓ move | Space/←/→ pick | Esc cancel")
}

fn form_view<F: Form>(title: &str, form: &F) -> FormView {
    FormView {
        title: title.to_string(),
        rows: form.rows(),
        hint: String::new(),
    }
}

fn selection(selected: usize, len: usize) -> Option<usize> {
    (len > 0).then(|| selected.min(len - 1))
}

fn supplier_detail(supplier: &Supplier) -> DetailView {
    let field = |v: &Option<String>| v.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| String::from("-"));
    DetailView {
        title: supplier.name.clone(),
        lines: vec![
            (String::from("Contact person"), field(&supplier.contact_person)),
            (String::from("Phone"), supplier.phone.clone()),
            (String::from("Email"), field(&supplier.email)),
            (String::from("Address"), field(&supplier.address)),
            (String::from("Tax ID"), field(&supplier.tax_id)),
            (String::from("Payment terms"), field(&supplier.payment_terms)),
            (String::from("Notes"), field(&supplier.notes)),
            (
                String::from("Status"),
                String::from(if supplier.is_active { "Active" } else { "Inactive" }),
            ),
        ],
    }
}
