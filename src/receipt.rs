//! Sale receipts
//!
//! A [`Receipt`] is frozen at checkout and rendered three ways: plain text for
//! the screen and `.txt` file, HTML for the saved document, and ESC/POS bytes
//! for a thermal printer.

use chrono::NaiveDateTime;

use crate::cart::currency_label;
use crate::checkout::Sale;
use crate::config::StoreInfo;

const ESC_INIT: [u8; 2] = [0x1B, 0x40];
const FEED_LINES: [u8; 3] = [0x1B, 0x64, 0x04];
const PARTIAL_CUT: [u8; 4] = [0x1D, 0x56, 0x42, 0x00];

#[derive(Clone, Debug, PartialEq)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    /// Converted unit price, rounded to cents
    pub price: f64,
    pub total: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
    pub number: String,
    pub date: String,
    pub store: StoreInfo,
    pub cashier: String,
    pub customer: String,
    pub currency: Option<String>,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: f64,
    pub tax_label: String,
    pub tax: f64,
    pub total: f64,
    pub amount_paid: f64,
    pub change: f64,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Receipt {
    pub fn from_sale(
        sale: &Sale<'_>,
        number: impl Into<String>,
        store: &StoreInfo,
        tax_label: impl Into<String>,
        date: NaiveDateTime,
    ) -> Receipt {
        let lines = sale
            .cart
            .items()
            .iter()
            .map(|item| {
                let price = round_cents(item.unit_price(sale.rate));
                ReceiptLine {
                    name: item.product.name.clone(),
                    quantity: item.quantity,
                    price,
                    total: round_cents(price * item.quantity as f64),
                }
            })
            .collect();

        let cashier = if sale.cashier.first_name.trim().is_empty() {
            String::from("N/A")
        } else {
            sale.cashier.first_name.clone()
        };

        Receipt {
            number: number.into(),
            date: date.format("%Y-%m-%d %H:%M:%S").to_string(),
            store: store.clone(),
            cashier,
            customer: sale
                .customer
                .map(|c| c.full_name.clone())
                .unwrap_or_else(|| String::from("Walk-in")),
            currency: sale.currency.map(str::to_string),
            lines,
            subtotal: sale.totals.subtotal,
            tax_label: tax_label.into(),
            tax: sale.totals.tax,
            total: sale.totals.total,
            amount_paid: sale.payment.amount_paid,
            change: sale.payment.change.amount().unwrap_or(0.0),
        }
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("Receipt_{}.{}", self.number, extension)
    }

    fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", currency_label(self.currency.as_deref()), amount)
    }

    fn summary_rows(&self) -> Vec<(String, String)> {
        vec![
            (String::from("Subtotal"), self.money(self.subtotal)),
            (self.tax_label.clone(), self.money(self.tax)),
            (String::from("Total"), self.money(self.total)),
            (String::from("Amount Paid"), self.money(self.amount_paid)),
            (String::from("Change"), self.money(self.change)),
        ]
    }

    /// Fixed-width rendering; no line is wider than `width` characters
    pub fn to_text(&self, width: usize) -> String {
        let width = width.max(20);
        let rule = "-".repeat(width);
        let mut out: Vec<String> = Vec::new();

        out.push(center(&self.store.name, width));
        out.push(center(&self.store.address, width));
        out.push(center(&format!("Tel: {}", self.store.phone), width));
        out.push(rule.clone());
        out.push(fit(&format!("Receipt #{}", self.number), width));
        out.push(fit(&format!("Date: {}", self.date), width));
        out.push(fit(&format!("Cashier: {}", self.cashier), width));
        out.push(fit(&format!("Customer: {}", self.customer), width));
        out.push(rule.clone());

        for line in &self.lines {
            out.push(fit(&line.name, width));
            let left = format!("  {} x {}", line.quantity, self.money(line.price));
            out.push(two_columns(&left, &self.money(line.total), width));
        }

        out.push(rule.clone());
        for (label, value) in self.summary_rows() {
            out.push(two_columns(&label, &value, width));
        }
        out.push(rule);
        out.push(center("Thank you for your purchase!", width));
        out.push(center("Please come again", width));

        let mut text = out.join("\n");
        text.push('\n');
        text
    }

    pub fn to_html(&self) -> String {
        let rows: String = self
            .lines
            .iter()
            .map(|line| {
                format!(
                    "      <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    escape_html(&line.name),
                    line.quantity,
                    self.money(line.price),
                    self.money(line.total)
                )
            })
            .collect();

        let summary: String = self
            .summary_rows()
            .into_iter()
            .map(|(label, value)| {
                let class = if label == "Subtotal" || label == "Total" {
                    " class=\"total\""
                } else {
                    ""
                };
                format!(
                    "      <tr{}><td colspan=\"3\">{}</td><td>{}</td></tr>\n",
                    class,
                    escape_html(&label),
                    value
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Receipt #{number}</title>
    <style>
      body {{ font-family: Arial, sans-serif; padding: 20px; }}
      table {{ width: 100%; border-collapse: collapse; margin-top: 20px; }}
      th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
      th {{ background-color: #f2f2f2; }}
      .total {{ font-weight: bold; }}
      .header {{ text-align: center; margin-bottom: 20px; }}
      .footer {{ margin-top: 30px; font-size: 12px; text-align: center; }}
    </style>
  </head>
  <body>
    <div class="header">
      <h1>{store}</h1>
      <p>{address}</p>
      <p>Tel: {phone}</p>
    </div>
    <h2>Receipt #{number}</h2>
    <p>Date: {date}</p>
    <p>Cashier: {cashier}</p>
    <p>Customer: {customer}</p>
    <table>
      <tr><th>Item</th><th>Qty</th><th>Price</th><th>Total</th></tr>
{rows}{summary}    </table>
    <div class="footer">
      <p>Thank you for your purchase!</p>
      <p>Please come again</p>
    </div>
  </body>
</html>
"#,
            number = escape_html(&self.number),
            store = escape_html(&self.store.name),
            address = escape_html(&self.store.address),
            phone = escape_html(&self.store.phone),
            date = escape_html(&self.date),
            cashier = escape_html(&self.cashier),
            customer = escape_html(&self.customer),
            rows = rows,
            summary = summary,
        )
    }

    /// Text receipt wrapped in printer init, feed and cut commands
    pub fn to_escpos(&self, width: usize) -> Vec<u8> {
        let text = self.to_text(width);
        let mut bytes = Vec::with_capacity(text.len() + 16);
        bytes.extend_from_slice(&ESC_INIT);
        bytes.extend_from_slice(text.as_bytes());
        bytes.extend_from_slice(&FEED_LINES);
        bytes.extend_from_slice(&PARTIAL_CUT);
        bytes
    }
}

fn fit(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn center(text: &str, width: usize) -> String {
    let text = fit(text, width);
    let pad = (width - text.chars().count()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// `left` and `right` on one line, right-aligned; `left` is cut to make room
fn two_columns(left: &str, right: &str, width: usize) -> String {
    let right = fit(right, width);
    let right_len = right.chars().count();
    let room = width.saturating_sub(right_len + 1);
    let left = fit(left, room);
    let gap = width - left.chars().count() - right_len;
    format!("{}{}{}", left, " ".repeat(gap), right)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Cart, Totals};
    use crate::checkout::Payment;
    use crate::models::{Customer, Product, UserProfile};
    use chrono::NaiveDate;

    fn product(id: i64, name: &str, price: f64) -> Product {
        Product {
            id,
            name: name.into(),
            price,
            cost_price: None,
            description: None,
            stock_quantity: 10,
            category: None,
            barcode: None,
            product_code: None,
            image: None,
        }
    }

    fn receipt(rate: Option<f64>, currency: Option<&str>, customer: Option<&Customer>) -> Receipt {
        let mut cart = Cart::new();
        cart.add(&product(1, "Bread", 1.333));
        cart.add(&product(2, "A product with a very long descriptive name", 2.0));
        cart.increment(1);
        cart.increment(1);

        let cashier = UserProfile {
            id: 1,
            role: "cashier".into(),
            first_name: String::new(),
            phone_number: None,
            email: None,
            branch: None,
            token: None,
        };
        let totals = Totals::compute(cart.items(), rate, 0.05);
        let payment = Payment::evaluate("100", totals.total);
        let sale = Sale {
            cart: &cart,
            totals,
            customer,
            cashier: &cashier,
            currency,
            rate,
            payment: &payment,
        };
        let date = NaiveDate::from_ymd_opt(2024, 5, 6)
            .and_then(|d| d.and_hms_opt(14, 30, 0))
            .unwrap();
        Receipt::from_sale(&sale, "1001", &StoreInfo::default(), "Tax (5%)", date)
    }

    #[test]
    fn line_math_uses_rounded_unit_price() {
        let r = receipt(None, None, None);
        assert_eq!(r.lines[0].price, 1.33);
        assert_eq!(r.lines[0].total, 3.99);
        assert_eq!(r.cashier, "N/A");
        assert_eq!(r.customer, "Walk-in");
        assert_eq!(r.date, "2024-05-06 14:30:00");
        assert_eq!(r.file_name("html"), "Receipt_1001.html");
    }

    #[test]
    fn converted_prices_and_labels() {
        let jane = Customer {
            id: 2,
            full_name: "Jane <Doe>".into(),
            email: None,
            loyalty_points: 0,
        };
        let r = receipt(Some(10.0), Some("zig"), Some(&jane));
        assert_eq!(r.lines[0].price, 13.33);
        assert_eq!(r.customer, "Jane <Doe>");

        let html = r.to_html();
        assert!(html.contains("Customer: Jane &lt;Doe&gt;"));
        assert!(html.contains("<td>ZIG13.33</td>"));
        assert!(html.contains("Tax (5%)"));
    }

    #[test]
    fn text_respects_paper_width() {
        let r = receipt(None, None, None);
        for width in [32, 48] {
            let text = r.to_text(width);
            assert!(text.lines().all(|l| l.chars().count() <= width), "width {}", width);
            assert!(text.contains("Receipt #1001"));
            assert!(text.contains("Thank you for your purchase!"));
        }
        let total_line = r.to_text(32).lines().find(|l| l.starts_with("Total")).unwrap().to_string();
        assert_eq!(total_line.chars().count(), 32);
        assert!(total_line.ends_with(&format!("${:.2}", r.total)));
    }

    #[test]
    fn escpos_is_framed_by_init_and_cut() {
        let bytes = receipt(None, None, None).to_escpos(32);
        assert!(bytes.starts_with(&ESC_INIT));
        assert!(bytes.ends_with(&PARTIAL_CUT));
    }
}
