//! Editable forms
//!
//! Every form is a list of fields (text inputs, pickers or toggles) behind the
//! [`Form`] trait, so the app layer can move focus and route keystrokes without
//! knowing which form is open. Each concrete form validates itself into the
//! payload the backend or identity provider expects.

use chrono::NaiveDate;

use crate::config::{PaperSize, PrinterKind, PrinterSettings};
use crate::constants::{DEFAULT_PRINTER_PORT, MIN_PASSWORD_LEN};
use crate::models::{
    Branch, Category, Product, ProductPayload, PurchaseOrderDetail, PurchaseOrderItem, Role, Supplier,
    SupplierPayload,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("Product name and price are required")]
    ProductRequired,
    #[error("Please enter a valid price")]
    InvalidPrice,
    #[error("Please enter a valid stock quantity")]
    InvalidStock,
    #[error("Please select a branch")]
    BranchRequired,
    #[error("Please enter a valid quantity")]
    InvalidQuantity,
    #[error("Not enough stock available")]
    NotEnoughStock,
    #[error("Supplier name and phone are required")]
    SupplierRequired,
    #[error("Please select a supplier")]
    SupplierNotSelected,
    #[error("Please select a product for every item")]
    ItemProductRequired,
    #[error("Please enter a valid cost price")]
    InvalidCost,
    #[error("Please enter both email and password.")]
    CredentialsRequired,
    #[error("Please enter your email address.")]
    EmailRequired,
    #[error("Please fill all fields")]
    SignUpIncomplete,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please fill in all fields")]
    PasswordFieldsRequired,
    #[error("New passwords do not match")]
    NewPasswordMismatch,
    #[error("Password should be at least 6 characters")]
    PasswordTooShort,
    #[error("Please enter IP address and port")]
    PrinterAddressRequired,
}

// ========================
// Field primitives
// ========================

/// Single-line text input with a byte-indexed cursor
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextInput {
    value: String,
    cursor: usize,
    secret: bool,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        TextInput {
            cursor: value.len(),
            value,
            secret: false,
        }
    }

    /// Masked input for passwords
    pub fn secret() -> Self {
        TextInput {
            secret: true,
            ..TextInput::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        if self.cursor <= self.value.len() {
            self.value.insert(self.cursor, c);
            self.cursor += c.len_utf8();
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.value.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.value[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.value[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.value.len());
        }
    }

    pub fn display(&self) -> String {
        if self.secret {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub id: i64,
    pub label: String,
}

impl Choice {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Choice { id, label: label.into() }
    }
}

/// Pick one of a list of options, or nothing
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Picker {
    options: Vec<Choice>,
    selected: Option<usize>,
}

impl Picker {
    pub fn new(options: Vec<Choice>) -> Self {
        Picker { options, selected: None }
    }

    /// Replace the options, keeping the current selection when it still exists
    pub fn set_options(&mut self, options: Vec<Choice>) {
        let keep = self.selected_id();
        self.options = options;
        self.selected = None;
        if let Some(id) = keep {
            self.select_id(id);
        }
    }

    pub fn options(&self) -> &[Choice] {
        &self.options
    }

    pub fn select_id(&mut self, id: i64) -> bool {
        self.selected = self.options.iter().position(|c| c.id == id);
        self.selected.is_some()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Choice> {
        self.selected.and_then(|i| self.options.get(i))
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected().map(|c| c.id)
    }

    pub fn next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.options.len(),
            None => 0,
        });
    }

    pub fn prev(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => self.options.len() - 1,
            Some(i) => i - 1,
        });
    }

    pub fn display(&self) -> String {
        match self.selected() {
            Some(choice) => format!("< {} >", choice.label),
            None if self.options.is_empty() => String::from("(no options)"),
            None => String::from("< select >"),
        }
    }
}

pub enum FieldRef<'a> {
    Text(&'a TextInput),
    Pick(&'a Picker),
    Toggle(bool),
}

pub enum FieldMut<'a> {
    Text(&'a mut TextInput),
    Pick(&'a mut Picker),
    Toggle(&'a mut bool),
}

/// One rendered form line
#[derive(Clone, Debug, PartialEq)]
pub struct FormRow {
    pub label: String,
    pub value: String,
    pub focused: bool,
    /// Cursor column, for focused text inputs only
    pub cursor: Option<usize>,
}

pub trait Form {
    fn labels(&self) -> Vec<String>;
    fn focus(&self) -> usize;
    fn set_focus(&mut self, index: usize);
    fn field(&self, index: usize) -> Option<FieldRef<'_>>;
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>>;

    /// Called after a picker changed its selection
    fn picked(&mut self, _index: usize) {}

    fn field_count(&self) -> usize {
        self.labels().len()
    }

    fn next_field(&mut self) {
        let count = self.field_count();
        if count > 0 {
            self.set_focus((self.focus() + 1) % count);
        }
    }

    fn prev_field(&mut self) {
        let count = self.field_count();
        if count > 0 {
            self.set_focus((self.focus() + count - 1) % count);
        }
    }

    /// Type into the focused field. Space cycles pickers and flips toggles.
    fn enter_char(&mut self, c: char) {
        let index = self.focus();
        let picked = match self.field_mut(index) {
            Some(FieldMut::Text(input)) => {
                input.insert(c);
                false
            }
            Some(FieldMut::Pick(picker)) if c == ' ' => {
                picker.next();
                true
            }
            Some(FieldMut::Toggle(flag)) if c == ' ' => {
                *flag = !*flag;
                false
            }
            _ => false,
        };
        if picked {
            self.picked(index);
        }
    }

    fn backspace(&mut self) {
        let index = self.focus();
        if let Some(FieldMut::Text(input)) = self.field_mut(index) {
            input.backspace();
        }
    }

    fn cursor_left(&mut self) {
        let index = self.focus();
        let picked = match self.field_mut(index) {
            Some(FieldMut::Text(input)) => {
                input.left();
                false
            }
            Some(FieldMut::Pick(picker)) => {
                picker.prev();
                true
            }
            Some(FieldMut::Toggle(flag)) => {
                *flag = !*flag;
                false
            }
            None => false,
        };
        if picked {
            self.picked(index);
        }
    }

    fn cursor_right(&mut self) {
        let index = self.focus();
        let picked = match self.field_mut(index) {
            Some(FieldMut::Text(input)) => {
                input.right();
                false
            }
            Some(FieldMut::Pick(picker)) => {
                picker.next();
                true
            }
            Some(FieldMut::Toggle(flag)) => {
                *flag = !*flag;
                false
            }
            None => false,
        };
        if picked {
            self.picked(index);
        }
    }

    fn rows(&self) -> Vec<FormRow> {
        let focus = self.focus();
        self.labels()
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                let (value, cursor) = match self.field(i) {
                    Some(FieldRef::Text(input)) => {
                        let cursor = (i == focus).then(|| input.value()[..input.cursor()].chars().count());
                        (input.display(), cursor)
                    }
                    Some(FieldRef::Pick(picker)) => (picker.display(), None),
                    Some(FieldRef::Toggle(on)) => (String::from(if on { "[x]" } else { "[ ]" }), None),
                    None => (String::new(), None),
                };
                FormRow {
                    label,
                    value,
                    focused: i == focus,
                    cursor,
                }
            })
            .collect()
    }
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn category_choices(categories: &[Category]) -> Vec<Choice> {
    categories.iter().map(|c| Choice::new(c.id, c.name.clone())).collect()
}

pub fn branch_choices(branches: &[Branch]) -> Vec<Choice> {
    branches.iter().map(|b| Choice::new(b.id, b.name.clone())).collect()
}

pub fn supplier_choices(suppliers: &[Supplier]) -> Vec<Choice> {
    suppliers.iter().map(|s| Choice::new(s.id, s.name.clone())).collect()
}

// ========================
// Sign in / sign up
// ========================

#[derive(Clone, Debug, PartialEq)]
pub struct SignInForm {
    pub email: TextInput,
    pub password: TextInput,
    focus: usize,
}

impl Default for SignInForm {
    fn default() -> Self {
        SignInForm {
            email: TextInput::default(),
            password: TextInput::secret(),
            focus: 0,
        }
    }
}

impl SignInForm {
    pub fn validate(&self) -> Result<(String, String), FormError> {
        if self.email.is_blank() || self.password.value().is_empty() {
            return Err(FormError::CredentialsRequired);
        }
        Ok((self.email.trimmed().to_string(), self.password.value().to_string()))
    }

    /// Email for a password reset
    pub fn reset_email(&self) -> Result<String, FormError> {
        if self.email.is_blank() {
            return Err(FormError::EmailRequired);
        }
        Ok(self.email.trimmed().to_string())
    }
}

impl Form for SignInForm {
    fn labels(&self) -> Vec<String> {
        labels(&["Email", "Password"])
    }
    fn focus(&self) -> usize {
        self.focus
    }
    fn set_focus(&mut self, index: usize) {
        self.focus = index;
    }
    fn field(&self, index: usize) -> Option<FieldRef<'_>> {
        match index {
            0 => Some(FieldRef::Text(&self.email)),
            1 => Some(FieldRef::Text(&self.password)),
            _ => None,
        }
    }
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
        match index {
            0 => Some(FieldMut::Text(&mut self.email)),
            1 => Some(FieldMut::Text(&mut self.password)),
            _ => None,
        }
    }
}

/// Validated sign-up input
#[derive(Clone, Debug, PartialEq)]
pub struct SignUpData {
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub branch: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignUpForm {
    pub full_name: TextInput,
    pub phone_number: TextInput,
    pub email: TextInput,
    pub password: TextInput,
    pub confirm: TextInput,
    pub role: Picker,
    pub branch: TextInput,
    focus: usize,
}

const ROLES: [Role; 3] = [Role::Cashier, Role::Manager, Role::Admin];

impl Default for SignUpForm {
    fn default() -> Self {
        let roles = ROLES
            .iter()
            .enumerate()
            .map(|(i, r)| Choice::new(i as i64, r.as_str()))
            .collect();
        SignUpForm {
            full_name: TextInput::default(),
            phone_number: TextInput::default(),
            email: TextInput::default(),
            password: TextInput::secret(),
            confirm: TextInput::secret(),
            role: Picker::new(roles),
            branch: TextInput::default(),
            focus: 0,
        }
    }
}

impl SignUpForm {
    pub fn validate(&self) -> Result<SignUpData, FormError> {
        let role = self
            .role
            .selected_id()
            .and_then(|i| ROLES.get(i as usize).copied());
        let role = match role {
            Some(role)
                if !self.full_name.is_blank()
                    && !self.phone_number.is_blank()
                    && !self.email.is_blank()
                    && !self.password.value().is_empty()
                    && !self.confirm.value().is_empty()
                    && !self.branch.is_blank() =>
            {
                role
            }
            _ => return Err(FormError::SignUpIncomplete),
        };
        if self.password.value() != self.confirm.value() {
            return Err(FormError::PasswordMismatch);
        }
        Ok(SignUpData {
            full_name: self.full_name.trimmed().to_string(),
            phone_number: self.phone_number.trimmed().to_string(),
            email: self.email.trimmed().to_string(),
            password: self.password.value().to_string(),
            role,
            branch: self.branch.trimmed().to_string(),
        })
    }
}

impl Form for SignUpForm {
    fn labels(&self) -> Vec<String> {
        labels(&["Full name", "Phone", "Email", "Password", "Confirm password", "Role", "Branch"])
    }
    fn focus(&self) -> usize {
        self.focus
    }
    fn set_focus(&mut self, index: usize) {
        self.focus = index;
    }
    fn field(&self, index: usize) -> Option<FieldRef<'_>> {
        match index {
            0 => Some(FieldRef::Text(&self.full_name)),
            1 => Some(FieldRef::Text(&self.phone_number)),
            2 => Some(FieldRef::Text(&self.email)),
            3 => Some(FieldRef::Text(&self.password)),
            4 => Some(FieldRef::Text(&self.confirm)),
            5 => Some(FieldRef::Pick(&self.role)),
            6 => Some(FieldRef::Text(&self.branch)),
            _ => None,
        }
    }
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
        match index {
            0 => Some(FieldMut::Text(&mut self.full_name)),
            1 => Some(FieldMut::Text(&mut self.phone_number)),
            2 => Some(FieldMut::Text(&mut self.email)),
            3 => Some(FieldMut::Text(&mut self.password)),
            4 => Some(FieldMut::Text(&mut self.confirm)),
            5 => Some(FieldMut::Pick(&mut self.role)),
            6 => Some(FieldMut::Text(&mut self.branch)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChangePasswordForm {
    pub current: TextInput,
    pub new_password: TextInput,
    pub confirm: TextInput,
    focus: usize,
}

impl Default for ChangePasswordForm {
    fn default() -> Self {
        ChangePasswordForm {
            current: TextInput::secret(),
            new_password: TextInput::secret(),
            confirm: TextInput::secret(),
            focus: 0,
        }
    }
}

impl ChangePasswordForm {
    /// Returns `(current, new)`
    pub fn validate(&self) -> Result<(String, String), FormError> {
        if self.current.value().is_empty() || self.new_password.value().is_empty() || self.confirm.value().is_empty() {
            return Err(FormError::PasswordFieldsRequired);
        }
        if self.new_password.value() != self.confirm.value() {
            return Err(FormError::NewPasswordMismatch);
        }
        if self.new_password.value().chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        Ok((self.current.value().to_string(), self.new_password.value().to_string()))
    }
}

impl Form for ChangePasswordForm {
    fn labels(&self) -> Vec<String> {
        labels(&["Current password", "New password", "Confirm new password"])
    }
    fn focus(&self) -> usize {
        self.focus
    }
    fn set_focus(&mut self, index: usize) {
        self.focus = index;
    }
    fn field(&self, index: usize) -> Option<FieldRef<'_>> {
        match index {
            0 => Some(FieldRef::Text(&self.current)),
            1 => Some(FieldRef::Text(&self.new_password)),
            2 => Some(FieldRef::Text(&self.confirm)),
            _ => None,
        }
    }
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
        match index {
            0 => Some(FieldMut::Text(&mut self.current)),
            1 => Some(FieldMut::Text(&mut self.new_password)),
            2 => Some(FieldMut::Text(&mut self.confirm)),
            _ => None,
        }
    }
}

// ========================
// Products
// ========================

#[derive(Clone, Debug, PartialEq)]
pub struct ProductForm {
    pub id: Option<i64>,
    pub name: TextInput,
    pub price: TextInput,
    pub description: TextInput,
    pub stock_quantity: TextInput,
    pub category: Picker,
    focus: usize,
}

impl ProductForm {
    pub fn new(categories: &[Category]) -> Self {
        ProductForm {
            id: None,
            name: TextInput::default(),
            price: TextInput::default(),
            description: TextInput::default(),
            stock_quantity: TextInput::new("1"),
            category: Picker::new(category_choices(categories)),
            focus: 0,
        }
    }

    /// Pre-filled form for editing `product`
    pub fn from_product(product: &Product, categories: &[Category]) -> Self {
        let mut form = ProductForm::new(categories);
        form.id = Some(product.id);
        form.name.set(product.name.clone());
        form.price.set(format!("{}", product.price));
        form.description.set(product.description.clone().unwrap_or_default());
        form.stock_quantity.set(product.stock_quantity.to_string());
        if let Some(category) = product.category {
            form.category.select_id(category);
        }
        form
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn validate(&self) -> Result<ProductPayload, FormError> {
        if self.name.is_blank() || self.price.is_blank() {
            return Err(FormError::ProductRequired);
        }
        let price = self
            .price
            .trimmed()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or(FormError::InvalidPrice)?;
        let stock_quantity = if self.stock_quantity.is_blank() {
            0
        } else {
            self.stock_quantity
                .trimmed()
                .parse::<i64>()
                .ok()
                .filter(|q| *q >= 0)
                .ok_or(FormError::InvalidStock)?
        };
        Ok(ProductPayload {
            id: self.id,
            name: self.name.trimmed().to_string(),
            price,
            description: self.description.trimmed().to_string(),
            stock_quantity,
            category: self.category.selected_id(),
        })
    }
}

impl Form for ProductForm {
    fn labels(&self) -> Vec<String> {
        labels(&["Name", "Price", "Description", "Stock quantity", "Category"])
    }
    fn focus(&self) -> usize {
        self.focus
    }
    fn set_focus(&mut self, index: usize) {
        self.focus = index;
    }
    fn field(&self, index: usize) -> Option<FieldRef<'_>> {
        match index {
            0 => Some(FieldRef::Text(&self.name)),
            1 => Some(FieldRef::Text(&self.price)),
            2 => Some(FieldRef::Text(&self.description)),
            3 => Some(FieldRef::Text(&self.stock_quantity)),
            4 => Some(FieldRef::Pick(&self.category)),
            _ => None,
        }
    }
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
        match index {
            0 => Some(FieldMut::Text(&mut self.name)),
            1 => Some(FieldMut::Text(&mut self.price)),
            2 => Some(FieldMut::Text(&mut self.description)),
            3 => Some(FieldMut::Text(&mut self.stock_quantity)),
            4 => Some(FieldMut::Pick(&mut self.category)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransferForm {
    pub product: Product,
    pub branch: Picker,
    pub quantity: TextInput,
    focus: usize,
}

impl TransferForm {
    pub fn new(product: Product, branches: &[Branch]) -> Self {
        TransferForm {
            product,
            branch: Picker::new(branch_choices(branches)),
            quantity: TextInput::default(),
            focus: 0,
        }
    }

    /// Returns `(target_branch, quantity)`
    pub fn validate(&self) -> Result<(i64, i64), FormError> {
        let branch = self.branch.selected_id().ok_or(FormError::BranchRequired)?;
        let quantity = self
            .quantity
            .trimmed()
            .parse::<i64>()
            .ok()
            .filter(|q| *q > 0)
            .ok_or(FormError::InvalidQuantity)?;
        if quantity > self.product.stock_quantity {
            return Err(FormError::NotEnoughStock);
        }
        Ok((branch, quantity))
    }
}

impl Form for TransferForm {
    fn labels(&self) -> Vec<String> {
        labels(&["Target branch", "Quantity"])
    }
    fn focus(&self) -> usize {
        self.focus
    }
    fn set_focus(&mut self, index: usize) {
        self.focus = index;
    }
    fn field(&self, index: usize) -> Option<FieldRef<'_>> {
        match index {
            0 => Some(FieldRef::Pick(&self.branch)),
            1 => Some(FieldRef::Text(&self.quantity)),
            _ => None,
        }
    }
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
        match index {
            0 => Some(FieldMut::Pick(&mut self.branch)),
            1 => Some(FieldMut::Text(&mut self.quantity)),
            _ => None,
        }
    }
}

// ========================
// Suppliers
// ========================

#[derive(Clone, Debug, PartialEq)]
pub struct SupplierForm {
    pub id: Option<i64>,
    pub name: TextInput,
    pub contact_person: TextInput,
    pub email: TextInput,
    pub phone: TextInput,
    pub address: TextInput,
    pub tax_id: TextInput,
    pub payment_terms: TextInput,
    pub notes: TextInput,
    pub is_active: bool,
    focus: usize,
}

impl Default for SupplierForm {
    fn default() -> Self {
        SupplierForm {
            id: None,
            name: TextInput::default(),
            contact_person: TextInput::default(),
            email: TextInput::default(),
            phone: TextInput::default(),
            address: TextInput::default(),
            tax_id: TextInput::default(),
            payment_terms: TextInput::default(),
            notes: TextInput::default(),
            is_active: true,
            focus: 0,
        }
    }
}

impl SupplierForm {
    pub fn from_supplier(supplier: &Supplier) -> Self {
        let text = |v: &Option<String>| TextInput::new(v.clone().unwrap_or_default());
        SupplierForm {
            id: Some(supplier.id),
            name: TextInput::new(supplier.name.clone()),
            contact_person: text(&supplier.contact_person),
            email: text(&supplier.email),
            phone: TextInput::new(supplier.phone.clone()),
            address: text(&supplier.address),
            tax_id: text(&supplier.tax_id),
            payment_terms: text(&supplier.payment_terms),
            notes: text(&supplier.notes),
            is_active: supplier.is_active,
            focus: 0,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn validate(&self) -> Result<SupplierPayload, FormError> {
        if self.name.is_blank() || self.phone.is_blank() {
            return Err(FormError::SupplierRequired);
        }
        Ok(SupplierPayload {
            id: self.id,
            name: self.name.trimmed().to_string(),
            contact_person: self.contact_person.trimmed().to_string(),
            email: self.email.trimmed().to_string(),
            phone: self.phone.trimmed().to_string(),
            address: self.address.trimmed().to_string(),
            tax_id: self.tax_id.trimmed().to_string(),
            payment_terms: self.payment_terms.trimmed().to_string(),
            notes: self.notes.trimmed().to_string(),
            is_active: self.is_active,
        })
    }
}

impl Form for SupplierForm {
    fn labels(&self) -> Vec<String> {
        labels(&[
            "Name",
            "Contact person",
            "Email",
            "Phone",
            "Address",
            "Tax ID",
            "Payment terms",
            "Notes",
            "Active",
        ])
    }
    fn focus(&self) -> usize {
        self.focus
    }
    fn set_focus(&mut self, index: usize) {
        self.focus = index;
    }
    fn field(&self, index: usize) -> Option<FieldRef<'_>> {
        match index {
            0 => Some(FieldRef::Text(&self.name)),
            1 => Some(FieldRef::Text(&self.contact_person)),
            2 => Some(FieldRef::Text(&self.email)),
            3 => Some(FieldRef::Text(&self.phone)),
            4 => Some(FieldRef::Text(&self.address)),
            5 => Some(FieldRef::Text(&self.tax_id)),
            6 => Some(FieldRef::Text(&self.payment_terms)),
            7 => Some(FieldRef::Text(&self.notes)),
            8 => Some(FieldRef::Toggle(self.is_active)),
            _ => None,
        }
    }
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
        match index {
            0 => Some(FieldMut::Text(&mut self.name)),
            1 => Some(FieldMut::Text(&mut self.contact_person)),
            2 => Some(FieldMut::Text(&mut self.email)),
            3 => Some(FieldMut::Text(&mut self.phone)),
            4 => Some(FieldMut::Text(&mut self.address)),
            5 => Some(FieldMut::Text(&mut self.tax_id)),
            6 => Some(FieldMut::Text(&mut self.payment_terms)),
            7 => Some(FieldMut::Text(&mut self.notes)),
            8 => Some(FieldMut::Toggle(&mut self.is_active)),
            _ => None,
        }
    }
}

// ========================
// Purchase orders
// ========================

#[derive(Clone, Debug, PartialEq)]
pub struct OrderItemRow {
    pub product: Picker,
    pub quantity: TextInput,
    pub cost_price: TextInput,
}

impl OrderItemRow {
    fn blank(products: &[Product]) -> Self {
        OrderItemRow {
            product: Picker::new(product_choices(products)),
            quantity: TextInput::new("1"),
            cost_price: TextInput::new("0"),
        }
    }

    fn quantity(&self) -> Option<i64> {
        if self.quantity.is_blank() {
            return Some(1);
        }
        self.quantity.trimmed().parse::<i64>().ok().filter(|q| *q > 0)
    }

    fn cost(&self) -> Option<f64> {
        if self.cost_price.is_blank() {
            return Some(0.0);
        }
        self.cost_price
            .trimmed()
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite() && *c >= 0.0)
    }
}

fn product_choices(products: &[Product]) -> Vec<Choice> {
    products
        .iter()
        .map(|p| Choice::new(p.id, format!("{} (${:.2})", p.name, p.cost_price.unwrap_or(0.0))))
        .collect()
}

const ORDER_HEADER_FIELDS: usize = 4;
const ORDER_ITEM_FIELDS: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseOrderForm {
    pub id: Option<i64>,
    pub supplier: Picker,
    pub order_date: TextInput,
    pub expected_delivery_date: TextInput,
    pub notes: TextInput,
    pub items: Vec<OrderItemRow>,
    products: Vec<Product>,
    focus: usize,
}

impl PurchaseOrderForm {
    pub fn new(suppliers: &[Supplier], products: &[Product], today: NaiveDate) -> Self {
        PurchaseOrderForm {
            id: None,
            supplier: Picker::new(supplier_choices(suppliers)),
            order_date: TextInput::new(today.format("%Y-%m-%d").to_string()),
            expected_delivery_date: TextInput::default(),
            notes: TextInput::default(),
            items: vec![OrderItemRow::blank(products)],
            products: products.to_vec(),
            focus: 0,
        }
    }

    pub fn from_detail(
        detail: &PurchaseOrderDetail,
        suppliers: &[Supplier],
        products: &[Product],
        today: NaiveDate,
    ) -> Self {
        let mut form = PurchaseOrderForm::new(suppliers, products, today);
        form.id = detail.id;
        form.supplier.select_id(detail.supplier_id);
        if !detail.order_date.is_empty() {
            form.order_date.set(detail.order_date.clone());
        }
        form.expected_delivery_date
            .set(detail.expected_delivery_date.clone().unwrap_or_default());
        form.notes.set(detail.notes.clone());
        if !detail.items.is_empty() {
            form.items = detail
                .items
                .iter()
                .map(|item| {
                    let mut row = OrderItemRow::blank(products);
                    row.product.select_id(item.product_id);
                    row.quantity.set(item.quantity.to_string());
                    row.cost_price.set(item.cost_price.to_string());
                    row
                })
                .collect();
        }
        form
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn add_item(&mut self) {
        self.items.push(OrderItemRow::blank(&self.products));
        self.focus = ORDER_HEADER_FIELDS + (self.items.len() - 1) * ORDER_ITEM_FIELDS;
    }

    /// Drop the item under focus; the last remaining item stays
    pub fn remove_focused_item(&mut self) -> bool {
        let Some(index) = self.focused_item() else {
            return false;
        };
        if self.items.len() <= 1 {
            return false;
        }
        self.items.remove(index);
        self.focus = self.focus.min(self.field_count() - 1);
        true
    }

    pub fn focused_item(&self) -> Option<usize> {
        self.focus
            .checked_sub(ORDER_HEADER_FIELDS)
            .map(|offset| offset / ORDER_ITEM_FIELDS)
    }

    /// Σ quantity × cost over items with readable numbers
    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|row| row.quantity().unwrap_or(0) as f64 * row.cost().unwrap_or(0.0))
            .sum()
    }

    pub fn validate(&self) -> Result<PurchaseOrderDetail, FormError> {
        let supplier_id = self.supplier.selected_id().ok_or(FormError::SupplierNotSelected)?;
        let mut items = Vec::with_capacity(self.items.len());
        for row in &self.items {
            let product_id = row.product.selected_id().ok_or(FormError::ItemProductRequired)?;
            let quantity = row.quantity().ok_or(FormError::InvalidQuantity)?;
            let cost_price = row.cost().ok_or(FormError::InvalidCost)?;
            items.push(PurchaseOrderItem {
                product_id,
                quantity,
                cost_price,
            });
        }
        if items.is_empty() {
            return Err(FormError::ItemProductRequired);
        }
        let expected = self.expected_delivery_date.trimmed();
        Ok(PurchaseOrderDetail {
            id: self.id,
            supplier_id,
            order_date: self.order_date.trimmed().to_string(),
            expected_delivery_date: (!expected.is_empty()).then(|| expected.to_string()),
            notes: self.notes.trimmed().to_string(),
            items,
        })
    }
}

impl Form for PurchaseOrderForm {
    fn labels(&self) -> Vec<String> {
        let mut out = labels(&["Supplier", "Order date", "Expected delivery", "Notes"]);
        for i in 1..=self.items.len() {
            out.push(format!("Item {} product", i));
            out.push(format!("Item {} quantity", i));
            out.push(format!("Item {} cost", i));
        }
        out
    }
    fn focus(&self) -> usize {
        self.focus
    }
    fn set_focus(&mut self, index: usize) {
        self.focus = index;
    }
    fn field(&self, index: usize) -> Option<FieldRef<'_>> {
        match index {
            0 => Some(FieldRef::Pick(&self.supplier)),
            1 => Some(FieldRef::Text(&self.order_date)),
            2 => Some(FieldRef::Text(&self.expected_delivery_date)),
            3 => Some(FieldRef::Text(&self.notes)),
            _ => {
                let offset = index - ORDER_HEADER_FIELDS;
                let row = self.items.get(offset / ORDER_ITEM_FIELDS)?;
                match offset % ORDER_ITEM_FIELDS {
                    0 => Some(FieldRef::Pick(&row.product)),
                    1 => Some(FieldRef::Text(&row.quantity)),
                    _ => Some(FieldRef::Text(&row.cost_price)),
                }
            }
        }
    }
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
        match index {
            0 => Some(FieldMut::Pick(&mut self.supplier)),
            1 => Some(FieldMut::Text(&mut self.order_date)),
            2 => Some(FieldMut::Text(&mut self.expected_delivery_date)),
            3 => Some(FieldMut::Text(&mut self.notes)),
            _ => {
                let offset = index - ORDER_HEADER_FIELDS;
                let row = self.items.get_mut(offset / ORDER_ITEM_FIELDS)?;
                match offset % ORDER_ITEM_FIELDS {
                    0 => Some(FieldMut::Pick(&mut row.product)),
                    1 => Some(FieldMut::Text(&mut row.quantity)),
                    _ => Some(FieldMut::Text(&mut row.cost_price)),
                }
            }
        }
    }

    /// Choosing a product fills in its cost price
    fn picked(&mut self, index: usize) {
        if index < ORDER_HEADER_FIELDS || (index - ORDER_HEADER_FIELDS) % ORDER_ITEM_FIELDS != 0 {
            return;
        }
        let row_index = (index - ORDER_HEADER_FIELDS) / ORDER_ITEM_FIELDS;
        let Some(row) = self.items.get_mut(row_index) else {
            return;
        };
        let cost = row
            .product
            .selected_id()
            .and_then(|id| self.products.iter().find(|p| p.id == id))
            .and_then(|p| p.cost_price)
            .unwrap_or(0.0);
        row.cost_price.set(cost.to_string());
    }
}

// ========================
// Printer settings
// ========================

#[derive(Clone, Debug, PartialEq)]
pub struct PrinterForm {
    pub network: bool,
    pub paper_58mm: bool,
    pub ip_address: TextInput,
    pub port: TextInput,
    focus: usize,
}

impl PrinterForm {
    pub fn from_settings(settings: &PrinterSettings) -> Self {
        PrinterForm {
            network: settings.kind == PrinterKind::Network,
            paper_58mm: settings.paper == PaperSize::Mm58,
            ip_address: TextInput::new(settings.ip_address.clone()),
            port: TextInput::new(settings.port.to_string()),
            focus: 0,
        }
    }

    pub fn validate(&self) -> Result<PrinterSettings, FormError> {
        let kind = if self.network { PrinterKind::Network } else { PrinterKind::None };
        let paper = if self.paper_58mm { PaperSize::Mm58 } else { PaperSize::Mm80 };
        let port = if kind == PrinterKind::Network {
            if self.ip_address.is_blank() || self.port.is_blank() {
                return Err(FormError::PrinterAddressRequired);
            }
            self.port
                .trimmed()
                .parse::<u16>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or(FormError::PrinterAddressRequired)?
        } else {
            self.port.trimmed().parse::<u16>().unwrap_or(DEFAULT_PRINTER_PORT)
        };
        Ok(PrinterSettings {
            kind,
            paper,
            ip_address: self.ip_address.trimmed().to_string(),
            port,
        })
    }
}

impl Form for PrinterForm {
    fn labels(&self) -> Vec<String> {
        labels(&["Network printer", "58mm paper", "IP address", "Port"])
    }
    fn focus(&self) -> usize {
        self.focus
    }
    fn set_focus(&mut self, index: usize) {
        self.focus = index;
    }
    fn field(&self, index: usize) -> Option<FieldRef<'_>> {
        match index {
            0 => Some(FieldRef::Toggle(self.network)),
            1 => Some(FieldRef::Toggle(self.paper_58mm)),
            2 => Some(FieldRef::Text(&self.ip_address)),
            3 => Some(FieldRef::Text(&self.port)),
            _ => None,
        }
    }
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
        match index {
            0 => Some(FieldMut::Toggle(&mut self.network)),
            1 => Some(FieldMut::Toggle(&mut self.paper_58mm)),
            2 => Some(FieldMut::Text(&mut self.ip_address)),
            3 => Some(FieldMut::Text(&mut self.port)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printer_form_needs_address_for_network() {
        let mut form = PrinterForm::from_settings(&PrinterSettings::default());
        assert_eq!(form.validate().unwrap().kind, PrinterKind::None);

        form.enter_char(' ');
        form.ip_address.clear();
        assert_eq!(form.validate().unwrap_err().to_string(), "Please enter IP address and port");

        form.ip_address.set("192.168.1.20");
        form.port.set("9100");
        form.set_focus(1);
        form.enter_char(' ');
        let settings = form.validate().unwrap();
        assert_eq!(settings.kind, PrinterKind::Network);
        assert_eq!(settings.paper, PaperSize::Mm58);
        assert_eq!(settings.port, 9100);
    }

    fn product(id: i64, stock: i64, cost: Option<f64>) -> Product {
        Product {
            id,
            name: format!("P{}", id),
            price: 2.0,
            cost_price: cost,
            description: Some("desc".into()),
            stock_quantity: stock,
            category: Some(2),
            barcode: None,
            product_code: None,
            image: None,
        }
    }

    fn type_str<F: Form>(form: &mut F, text: &str) {
        for c in text.chars() {
            form.enter_char(c);
        }
    }

    #[test]
    fn text_input_editing_handles_multibyte() {
        let mut input = TextInput::new("ab");
        input.left();
        input.insert('é');
        assert_eq!(input.value(), "aéb");
        input.right();
        input.backspace();
        assert_eq!(input.value(), "aé");
        input.backspace();
        assert_eq!(input.value(), "a");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn picker_cycles_and_keeps_selection_on_reload() {
        let mut picker = Picker::new(vec![Choice::new(1, "Main"), Choice::new(2, "East")]);
        assert_eq!(picker.selected_id(), None);
        picker.prev();
        assert_eq!(picker.selected_id(), Some(2));
        picker.next();
        assert_eq!(picker.selected_id(), Some(1));

        picker.set_options(vec![Choice::new(9, "North"), Choice::new(1, "Main")]);
        assert_eq!(picker.selected_id(), Some(1));
        picker.set_options(vec![Choice::new(9, "North")]);
        assert_eq!(picker.selected_id(), None);
    }

    #[test]
    fn product_form_requires_name_and_price() {
        let categories = vec![Category { id: 2, name: "Bakery".into() }];
        let mut form = ProductForm::new(&categories);
        assert_eq!(form.stock_quantity.value(), "1");
        assert_eq!(form.validate(), Err(FormError::ProductRequired));

        type_str(&mut form, "Bread");
        form.next_field();
        type_str(&mut form, "abc");
        assert_eq!(form.validate(), Err(FormError::InvalidPrice));

        form.price.set("2.5");
        form.set_focus(4);
        form.enter_char(' ');
        let payload = form.validate().unwrap();
        assert_eq!(payload.name, "Bread");
        assert_eq!(payload.price, 2.5);
        assert_eq!(payload.stock_quantity, 1);
        assert_eq!(payload.category, Some(2));
        assert_eq!(payload.id, None);
    }

    #[test]
    fn product_form_prefills_for_edit() {
        let categories = vec![Category { id: 2, name: "Bakery".into() }];
        let form = ProductForm::from_product(&product(7, 12, None), &categories);
        assert!(form.is_edit());
        let payload = form.validate().unwrap();
        assert_eq!(payload.id, Some(7));
        assert_eq!(payload.stock_quantity, 12);
        assert_eq!(payload.category, Some(2));
    }

    #[test]
    fn transfer_rules_in_order() {
        let branches = vec![Branch { id: 3, name: "East".into(), location: None }];
        let mut form = TransferForm::new(product(1, 5, None), &branches);
        form.quantity.set("2");
        assert_eq!(form.validate(), Err(FormError::BranchRequired));

        form.branch.next();
        form.quantity.set("0");
        assert_eq!(form.validate(), Err(FormError::InvalidQuantity));
        form.quantity.set("six");
        assert_eq!(form.validate(), Err(FormError::InvalidQuantity));
        form.quantity.set("6");
        assert_eq!(form.validate(), Err(FormError::NotEnoughStock));
        form.quantity.set("5");
        assert_eq!(form.validate(), Ok((3, 5)));
    }

    #[test]
    fn supplier_form_requires_name_and_phone() {
        let mut form = SupplierForm::default();
        assert!(form.is_active);
        form.name.set("Acme");
        assert_eq!(form.validate().unwrap_err().to_string(), "Supplier name and phone are required");

        form.phone.set(" 555 ");
        form.set_focus(8);
        form.enter_char(' ');
        let payload = form.validate().unwrap();
        assert_eq!(payload.phone, "555");
        assert!(!payload.is_active);
    }

    #[test]
    fn purchase_order_fills_cost_and_totals() {
        let suppliers = vec![Supplier {
            id: 5,
            name: "Acme".into(),
            contact_person: None,
            email: None,
            phone: "555".into(),
            address: None,
            tax_id: None,
            payment_terms: None,
            notes: None,
            is_active: true,
        }];
        let products = vec![product(1, 3, Some(1.5)), product(2, 3, None)];
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut form = PurchaseOrderForm::new(&suppliers, &products, today);
        assert_eq!(form.order_date.value(), "2024-06-01");
        assert_eq!(form.validate(), Err(FormError::SupplierNotSelected));

        form.supplier.next();
        assert_eq!(form.validate(), Err(FormError::ItemProductRequired));

        form.set_focus(4);
        form.cursor_right();
        assert_eq!(form.items[0].cost_price.value(), "1.5");
        form.items[0].quantity.set("4");

        form.add_item();
        assert_eq!(form.focused_item(), Some(1));
        form.enter_char(' ');
        form.cursor_right();
        assert_eq!(form.items[1].cost_price.value(), "0");
        form.items[1].quantity.clear();
        form.items[1].cost_price.set("2");
        assert!((form.total() - 8.0).abs() < 1e-9);

        let detail = form.validate().unwrap();
        assert_eq!(detail.supplier_id, 5);
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.items[1].quantity, 1);
        assert_eq!(detail.expected_delivery_date, None);

        assert!(form.remove_focused_item());
        assert!(!form.remove_focused_item());
        assert_eq!(form.items.len(), 1);
    }

    #[test]
    fn sign_up_and_password_rules() {
        let mut form = SignUpForm::default();
        form.full_name.set("Sam");
        form.phone_number.set("0771");
        form.email.set("sam@example.com");
        form.password.set("secret1");
        form.confirm.set("secret2");
        form.branch.set("Main");
        assert_eq!(form.validate(), Err(FormError::SignUpIncomplete));
        form.role.next();
        assert_eq!(form.validate(), Err(FormError::PasswordMismatch));
        form.confirm.set("secret1");
        let data = form.validate().unwrap();
        assert_eq!(data.role, Role::Cashier);
        assert_eq!(form.rows()[3].value, "*******");

        let mut change = ChangePasswordForm::default();
        assert_eq!(change.validate(), Err(FormError::PasswordFieldsRequired));
        change.current.set("old");
        change.new_password.set("abc");
        change.confirm.set("abd");
        assert_eq!(change.validate(), Err(FormError::NewPasswordMismatch));
        change.confirm.set("abc");
        assert_eq!(change.validate(), Err(FormError::PasswordTooShort));
        change.new_password.set("abcdef");
        change.confirm.set("abcdef");
        assert_eq!(change.validate(), Ok(("old".into(), "abcdef".into())));
    }

    #[test]
    fn sign_in_requires_both_fields() {
        let mut form = SignInForm::default();
        form.email.set("a@b.c");
        assert_eq!(form.validate(), Err(FormError::CredentialsRequired));
        assert_eq!(form.reset_email(), Ok("a@b.c".into()));
        form.password.set("pw");
        assert!(form.validate().is_ok());
    }
}
