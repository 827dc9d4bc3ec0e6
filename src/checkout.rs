//! Payment evaluation and the transaction payload

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, Totals};
use crate::models::{Customer, UserProfile};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckoutError {
    #[error("Please make sure customer and cart data are valid.")]
    InvalidOrder,
    #[error("Insufficient amount")]
    InsufficientPayment,
}

/// Change due for an entered amount
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Change {
    Amount(f64),
    Insufficient,
}

impl Change {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Change::Amount(a) => Some(*a),
            Change::Insufficient => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Payment {
    pub amount_paid: f64,
    pub change: Change,
}

impl Payment {
    /// Parse what the cashier typed and work out the change against `total`.
    /// Unparseable input is treated as insufficient.
    pub fn evaluate(entered: &str, total: f64) -> Payment {
        match entered.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() && amount >= total => Payment {
                amount_paid: amount,
                change: Change::Amount(amount - total),
            },
            Ok(amount) if amount.is_finite() => Payment {
                amount_paid: amount,
                change: Change::Insufficient,
            },
            _ => Payment {
                amount_paid: 0.0,
                change: Change::Insufficient,
            },
        }
    }

    pub fn is_sufficient(&self) -> bool {
        matches!(self.change, Change::Amount(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub id: i64,
    pub first_name: String,
    pub email: Option<String>,
    pub loyalty_points: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashierInfo {
    pub id: i64,
    pub role: String,
    pub first_name: String,
    pub phone_number: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub total_amount: f64,
    pub date: String,
    pub currency: Option<String>,
    pub change: f64,
    pub amount_paid: f64,
}

/// Body of `POST /Sales/create_transaction/`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub customer: CustomerInfo,
    pub cashier: CashierInfo,
    pub order_items: Vec<OrderLine>,
    pub transaction: TransactionInfo,
}

/// Everything needed to submit a sale
pub struct Sale<'a> {
    pub cart: &'a Cart,
    pub totals: Totals,
    pub customer: Option<&'a Customer>,
    pub cashier: &'a UserProfile,
    pub currency: Option<&'a str>,
    pub rate: Option<f64>,
    pub payment: &'a Payment,
}

pub fn build_transaction(sale: Sale<'_>, now: DateTime<Utc>) -> Result<TransactionRequest, CheckoutError> {
    let customer = match sale.customer {
        Some(c) if !sale.cart.is_empty() => c,
        _ => return Err(CheckoutError::InvalidOrder),
    };
    let change = sale
        .payment
        .change
        .amount()
        .ok_or(CheckoutError::InsufficientPayment)?;

    Ok(TransactionRequest {
        customer: CustomerInfo {
            id: customer.id,
            first_name: customer.full_name.clone(),
            email: customer.email.clone(),
            loyalty_points: customer.loyalty_points,
        },
        cashier: CashierInfo {
            id: sale.cashier.id,
            role: sale.cashier.role.clone(),
            first_name: sale.cashier.first_name.clone(),
            phone_number: sale.cashier.phone_number.clone(),
        },
        order_items: sale
            .cart
            .items()
            .iter()
            .map(|item| OrderLine {
                product_id: item.product.id,
                quantity: item.quantity,
                price: item.unit_price(sale.rate),
            })
            .collect(),
        transaction: TransactionInfo {
            total_amount: sale.totals.total,
            date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            currency: sale.currency.map(str::to_string),
            change,
            amount_paid: sale.payment.amount_paid,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use chrono::TimeZone;

    fn cashier() -> UserProfile {
        UserProfile {
            id: 4,
            role: "cashier".into(),
            first_name: "Sam".into(),
            phone_number: Some("0771".into()),
            email: None,
            branch: None,
            token: None,
        }
    }

    fn customer() -> Customer {
        Customer {
            id: 9,
            full_name: "Jane Doe".into(),
            email: Some("jane@example.com".into()),
            loyalty_points: 3,
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(&Product {
            id: 1,
            name: "Bread".into(),
            price: 2.0,
            cost_price: None,
            description: None,
            stock_quantity: 10,
            category: None,
            barcode: None,
            product_code: None,
            image: None,
        });
        cart.increment(1);
        cart
    }

    #[test]
    fn payment_change_and_insufficient() {
        let paid = Payment::evaluate("10", 4.2);
        assert!(paid.is_sufficient());
        assert!((paid.change.amount().unwrap() - 5.8).abs() < 1e-9);

        assert_eq!(Payment::evaluate("4.2", 4.2).change, Change::Amount(0.0));
        assert_eq!(Payment::evaluate("3", 4.2).change, Change::Insufficient);
        assert_eq!(Payment::evaluate("abc", 4.2).change, Change::Insufficient);
        assert_eq!(Payment::evaluate("", 0.5).change, Change::Insufficient);
    }

    #[test]
    fn builds_payload_with_converted_prices() {
        let cart = cart();
        let rate = Some(10.0);
        let totals = Totals::compute(cart.items(), rate, 0.05);
        let payment = Payment::evaluate("50", totals.total);
        let customer = customer();
        let cashier = cashier();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let request = build_transaction(
            Sale {
                cart: &cart,
                totals,
                customer: Some(&customer),
                cashier: &cashier,
                currency: Some("zig"),
                rate,
                payment: &payment,
            },
            now,
        )
        .unwrap();

        assert_eq!(request.customer.first_name, "Jane Doe");
        assert_eq!(request.cashier.first_name, "Sam");
        assert_eq!(request.order_items[0].quantity, 2);
        assert!((request.order_items[0].price - 20.0).abs() < 1e-9);
        assert!((request.transaction.total_amount - 42.0).abs() < 1e-9);
        assert!((request.transaction.change - 8.0).abs() < 1e-9);
        assert_eq!(request.transaction.currency.as_deref(), Some("zig"));
        assert_eq!(request.transaction.date, "2024-03-01T12:00:00.000Z");
    }

    #[test]
    fn rejects_missing_customer_empty_cart_and_short_payment() {
        let cashier = cashier();
        let customer = customer();
        let payment = Payment::evaluate("100", 1.0);
        let empty = Cart::new();

        let err = build_transaction(
            Sale {
                cart: &empty,
                totals: Totals::default(),
                customer: Some(&customer),
                cashier: &cashier,
                currency: None,
                rate: None,
                payment: &payment,
            },
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Please make sure customer and cart data are valid.");

        let cart = cart();
        assert_eq!(
            build_transaction(
                Sale {
                    cart: &cart,
                    totals: Totals::default(),
                    customer: None,
                    cashier: &cashier,
                    currency: None,
                    rate: None,
                    payment: &payment,
                },
                Utc::now(),
            ),
            Err(CheckoutError::InvalidOrder)
        );

        let short = Payment::evaluate("1", 4.2);
        assert_eq!(
            build_transaction(
                Sale {
                    cart: &cart,
                    totals: Totals::compute(cart.items(), None, 0.05),
                    customer: Some(&customer),
                    cashier: &cashier,
                    currency: None,
                    rate: None,
                    payment: &short,
                },
                Utc::now(),
            ),
            Err(CheckoutError::InsufficientPayment)
        );
    }
}
