//! Shopping cart and checkout arithmetic

use crate::models::Product;

#[derive(Clone, Debug, PartialEq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: i64,
}

impl CartItem {
    /// Unit price after currency conversion
    pub fn unit_price(&self, rate: Option<f64>) -> f64 {
        match rate {
            Some(rate) => self.product.price * rate,
            None => self.product.price,
        }
    }
}

/// What happened when a product was scanned or picked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyInCart,
    OutOfStock,
}

#[derive(Clone, Debug, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, product_id: i64) -> bool {
        self.items.iter().any(|i| i.product.id == product_id)
    }

    /// Add one unit of `product`, unless it is already a line or out of stock
    pub fn add(&mut self, product: &Product) -> AddOutcome {
        if self.contains(product.id) {
            return AddOutcome::AlreadyInCart;
        }
        if product.is_out_of_stock() {
            return AddOutcome::OutOfStock;
        }
        self.items.push(CartItem {
            product: product.clone(),
            quantity: 1,
        });
        AddOutcome::Added
    }

    pub fn increment(&mut self, product_id: i64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity += 1;
        }
    }

    /// Remove one unit; a line never drops below 1
    pub fn decrement(&mut self, product_id: i64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            if item.quantity > 1 {
                item.quantity -= 1;
            }
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<CartItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of lines, not units
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Untaxed USD total shown under the catalogue
    pub fn raw_total(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.product.price * i.quantity as f64)
            .sum()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl Totals {
    pub fn compute(items: &[CartItem], rate: Option<f64>, tax_rate: f64) -> Totals {
        let subtotal: f64 = items
            .iter()
            .map(|i| i.unit_price(rate) * i.quantity as f64)
            .sum();
        let tax = subtotal * tax_rate;
        Totals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Prefix shown before amounts: the upper-cased currency, or `$`
pub fn currency_label(currency: Option<&str>) -> String {
    match currency {
        Some(c) => c.to_uppercase(),
        None => String::from("$"),
    }
}

/// Format an amount with its currency prefix, e.g. `ZIG 12.00` or `$3.50`
pub fn format_money(currency: Option<&str>, amount: f64) -> String {
    match currency {
        Some(c) => format!("{} {:.2}", c.to_uppercase(), amount),
        None => format!("${:.2}", amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price: f64, stock: i64) -> Product {
        Product {
            id,
            name: format!("Item {}", id),
            price,
            cost_price: None,
            description: None,
            stock_quantity: stock,
            category: None,
            barcode: None,
            product_code: None,
            image: None,
        }
    }

    #[test]
    fn adding_twice_keeps_one_line() {
        let mut cart = Cart::new();
        let bread = product(1, 2.0, 5);
        assert_eq!(cart.add(&bread), AddOutcome::Added);
        assert_eq!(cart.add(&bread), AddOutcome::AlreadyInCart);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn out_of_stock_is_rejected() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(&product(1, 2.0, 0)), AddOutcome::OutOfStock);
        assert!(cart.is_empty());
    }

    #[test]
    fn decrement_stops_at_one() {
        let mut cart = Cart::new();
        cart.add(&product(1, 2.0, 5));
        cart.increment(1);
        cart.increment(1);
        assert_eq!(cart.items()[0].quantity, 3);
        cart.decrement(1);
        cart.decrement(1);
        cart.decrement(1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn remove_by_index_and_raw_total() {
        let mut cart = Cart::new();
        cart.add(&product(1, 2.0, 5));
        cart.add(&product(2, 1.5, 5));
        cart.increment(2);
        assert_eq!(cart.raw_total(), 5.0);
        assert_eq!(cart.remove(0).map(|i| i.product.id), Some(1));
        assert!(cart.remove(5).is_none());
        assert_eq!(cart.item_count(), 1);
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn totals_apply_rate_and_tax() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10.0, 5));
        cart.increment(1);

        let usd = Totals::compute(cart.items(), None, 0.05);
        assert!((usd.subtotal - 20.0).abs() < 1e-9);
        assert!((usd.tax - 1.0).abs() < 1e-9);
        assert!((usd.total - 21.0).abs() < 1e-9);

        let zig = Totals::compute(cart.items(), Some(13.5), 0.05);
        assert!((zig.subtotal - 270.0).abs() < 1e-9);
        assert!((zig.total - 283.5).abs() < 1e-9);
    }

    #[test]
    fn currency_labels() {
        assert_eq!(currency_label(None), "$");
        assert_eq!(currency_label(Some("zig")), "ZIG");
        assert_eq!(format_money(None, 3.5), "$3.50");
        assert_eq!(format_money(Some("rand"), 12.0), "RAND 12.00");
    }
}
