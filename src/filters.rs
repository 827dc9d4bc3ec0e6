//! List search and lookup

use crate::models::{Customer, Product, Supplier};

/// Inventory search: name (case-insensitive), barcode or product code
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let lowered = query.to_lowercase();
    products
        .iter()
        .filter(|p| {
            query.is_empty()
                || p.name.to_lowercase().contains(&lowered)
                || p.barcode_str().contains(query)
                || p.code_str().contains(query)
        })
        .collect()
}

/// Sales catalogue: category (when chosen) and code or name
pub fn filter_catalogue<'a>(products: &'a [Product], category: Option<i64>, query: &str) -> Vec<&'a Product> {
    let lowered = query.to_lowercase();
    products
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == Some(c)))
        .filter(|p| p.code_str().to_lowercase().contains(&lowered) || p.name.to_lowercase().contains(&lowered))
        .collect()
}

pub fn filter_suppliers<'a>(suppliers: &'a [Supplier], query: &str) -> Vec<&'a Supplier> {
    let lowered = query.to_lowercase();
    suppliers
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&lowered)
                || s.contact_person
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&lowered))
                || s.phone.contains(query)
        })
        .collect()
}

pub fn filter_customers<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    let lowered = query.to_lowercase();
    customers
        .iter()
        .filter(|c| c.full_name.to_lowercase().contains(&lowered))
        .collect()
}

/// Scanner lookup: exact barcode first, then exact product code
pub fn find_by_barcode<'a>(products: &'a [Product], code: &str) -> Option<&'a Product> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    products
        .iter()
        .find(|p| p.barcode_str() == code)
        .or_else(|| products.iter().find(|p| p.code_str() == code))
}

pub fn low_stock<'a>(products: &'a [Product], threshold: i64) -> Vec<&'a Product> {
    products.iter().filter(|p| p.is_low_stock(threshold)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, barcode: Option<&str>, code: Option<&str>, category: Option<i64>, stock: i64) -> Product {
        Product {
            id,
            name: name.into(),
            price: 1.0,
            cost_price: None,
            description: None,
            stock_quantity: stock,
            category,
            barcode: barcode.map(String::from),
            product_code: code.map(String::from),
            image: None,
        }
    }

    fn catalogue() -> Vec<Product> {
        vec![
            product(1, "White Bread", Some("600100"), Some("BR-01"), Some(1), 4),
            product(2, "Milk", Some("600200"), Some("DA-01"), Some(2), 30),
            product(3, "Brown Bread", None, None, Some(1), 10),
        ]
    }

    fn ids(products: Vec<&Product>) -> Vec<i64> {
        products.into_iter().map(|p| p.id).collect()
    }

    #[test]
    fn product_search_matches_name_barcode_or_code() {
        let products = catalogue();
        assert_eq!(ids(filter_products(&products, "")), vec![1, 2, 3]);
        assert_eq!(ids(filter_products(&products, "BREAD")), vec![1, 3]);
        assert_eq!(ids(filter_products(&products, "6002")), vec![2]);
        assert_eq!(ids(filter_products(&products, "DA-")), vec![2]);
        // codes are case-sensitive here
        assert!(filter_products(&products, "da-").is_empty());
    }

    #[test]
    fn catalogue_combines_category_and_text() {
        let products = catalogue();
        assert_eq!(ids(filter_catalogue(&products, Some(1), "")), vec![1, 3]);
        assert_eq!(ids(filter_catalogue(&products, Some(1), "br-")), vec![1]);
        assert_eq!(ids(filter_catalogue(&products, None, "milk")), vec![2]);
        assert!(filter_catalogue(&products, Some(2), "bread").is_empty());
    }

    #[test]
    fn supplier_and_customer_search() {
        let suppliers = vec![Supplier {
            id: 1,
            name: "Acme".into(),
            contact_person: Some("Tariro Moyo".into()),
            email: None,
            phone: "0771 234".into(),
            address: None,
            tax_id: None,
            payment_terms: None,
            notes: None,
            is_active: true,
        }];
        assert_eq!(filter_suppliers(&suppliers, "moyo").len(), 1);
        assert_eq!(filter_suppliers(&suppliers, "234").len(), 1);
        assert!(filter_suppliers(&suppliers, "zzz").is_empty());

        let customers = vec![Customer { id: 1, full_name: "Jane Doe".into(), email: None, loyalty_points: 0 }];
        assert_eq!(filter_customers(&customers, "JANE").len(), 1);
        assert!(filter_customers(&customers, "john").is_empty());
    }

    #[test]
    fn barcode_lookup_prefers_barcode() {
        let mut products = catalogue();
        products.push(product(4, "Odd", None, Some("600100"), None, 1));
        assert_eq!(find_by_barcode(&products, " 600100 ").map(|p| p.id), Some(1));
        assert_eq!(find_by_barcode(&products, "DA-01").map(|p| p.id), Some(2));
        assert!(find_by_barcode(&products, "").is_none());
    }

    #[test]
    fn low_stock_is_strictly_below_threshold() {
        let products = catalogue();
        assert_eq!(ids(low_stock(&products, 10)), vec![1]);
    }
}
