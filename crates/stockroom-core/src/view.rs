//! # View Module
//!
//! Row projections of the entity snapshots, ready for a table renderer.
//!
//! Every cell is already text: absent or blank values read "N/A", prices are
//! formatted with their currency symbol, and product rows carry the
//! low-stock flag so the renderer only decides how to highlight it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::aggregate::is_low_stock;
use crate::currency::CurrencyTable;
use crate::types::{Category, EntityId, Product, Supplier};

/// Text shown for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder of the product form's category selector.
pub const CATEGORY_PLACEHOLDER: &str = "-- Select Category --";

/// Placeholder of the product form's supplier selector.
pub const SUPPLIER_PLACEHOLDER: &str = "-- Select Supplier --";

fn or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierRow {
    pub id: EntityId,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
}

impl SupplierRow {
    pub fn from_supplier(supplier: &Supplier) -> Self {
        SupplierRow {
            id: supplier.id,
            name: supplier.name.clone(),
            contact_person: or_na(supplier.contact_person.as_deref()),
            phone: or_na(supplier.phone.as_deref()),
            email: or_na(supplier.email.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryRow {
    pub id: EntityId,
    pub name: String,
    pub description: String,
}

impl CategoryRow {
    pub fn from_category(category: &Category) -> Self {
        CategoryRow {
            id: category.id,
            name: category.name.clone(),
            description: or_na(category.description.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductRow {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    /// Symbol and two-decimal amount, e.g. "$19.50".
    pub price: String,
    /// The stored code, even one the currency table does not know.
    pub currency_code: String,
    pub stock: i64,
    pub safe_stock: i64,
    /// Highlight the stock cell.
    pub low_stock: bool,
    pub category: String,
    pub supplier: String,
}

impl ProductRow {
    /// Projects a product.
    ///
    /// The server-joined names win. Without one, the foreign key is looked
    /// up in the given snapshots; a reference found in neither reads "N/A".
    pub fn from_product(
        product: &Product,
        currencies: &CurrencyTable,
        categories: &[Category],
        suppliers: &[Supplier],
    ) -> Self {
        let category = product.category_name.as_deref().or_else(|| {
            product
                .category_id
                .and_then(|id| categories.iter().find(|c| c.id == id))
                .map(|c| c.name.as_str())
        });
        let supplier = product.supplier_name.as_deref().or_else(|| {
            product
                .supplier_id
                .and_then(|id| suppliers.iter().find(|s| s.id == id))
                .map(|s| s.name.as_str())
        });

        ProductRow {
            id: product.id,
            name: product.name.clone(),
            description: or_na(product.description.as_deref()),
            price: currencies.format_price(product.price, &product.currency_code),
            currency_code: product.currency_code.clone(),
            stock: product.stock,
            safe_stock: product.safe_stock,
            low_stock: is_low_stock(product),
            category: or_na(category),
            supplier: or_na(supplier),
        }
    }
}

// =============================================================================
// Reference Options
// =============================================================================

/// One option of a category/supplier selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReferenceOption {
    /// Empty for the placeholder.
    pub value: String,
    pub label: String,
}

/// The product form's category and supplier selectors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReferenceOptions {
    pub categories: Vec<ReferenceOption>,
    pub suppliers: Vec<ReferenceOption>,
}

impl ReferenceOptions {
    /// Builds both selectors, each headed by its placeholder, in snapshot
    /// order.
    pub fn build(categories: &[Category], suppliers: &[Supplier]) -> Self {
        fn options<'a>(
            placeholder: &str,
            items: impl Iterator<Item = (EntityId, &'a str)>,
        ) -> Vec<ReferenceOption> {
            std::iter::once(ReferenceOption {
                value: String::new(),
                label: placeholder.to_string(),
            })
            .chain(items.map(|(id, name)| ReferenceOption {
                value: id.to_string(),
                label: name.to_string(),
            }))
            .collect()
        }

        ReferenceOptions {
            categories: options(
                CATEGORY_PLACEHOLDER,
                categories.iter().map(|c| (c.id, c.name.as_str())),
            ),
            suppliers: options(
                SUPPLIER_PLACEHOLDER,
                suppliers.iter().map(|s| (s.id, s.name.as_str())),
            ),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn product() -> Product {
        Product {
            id: 1,
            name: "Widget".to_string(),
            description: Some("  ".to_string()),
            price: Money::from_cents(1950),
            currency_code: "USD".to_string(),
            stock: 2,
            safe_stock: 10,
            category_id: None,
            supplier_id: Some(3),
            category_name: None,
            supplier_name: None,
        }
    }

    #[test]
    fn test_supplier_row_na() {
        let row = SupplierRow::from_supplier(&Supplier {
            id: 1,
            name: "Acme".to_string(),
            contact_person: None,
            phone: Some(String::new()),
            email: Some("a@b.test".to_string()),
        });
        assert_eq!(row.contact_person, "N/A");
        assert_eq!(row.phone, "N/A");
        assert_eq!(row.email, "a@b.test");
    }

    #[test]
    fn test_product_row_formatting() {
        let suppliers = vec![Supplier {
            id: 3,
            name: "Acme".to_string(),
            contact_person: None,
            phone: None,
            email: None,
        }];
        let row = ProductRow::from_product(&product(), &CurrencyTable::new(), &[], &suppliers);

        assert_eq!(row.price, "$19.50");
        assert_eq!(row.currency_code, "USD");
        assert!(row.low_stock);
        assert_eq!(row.description, "N/A");
        assert_eq!(row.category, "N/A");
        assert_eq!(row.supplier, "Acme");
    }

    #[test]
    fn test_unknown_currency_keeps_its_code() {
        let mut odd = product();
        odd.currency_code = "ZZZ".to_string();
        let row = ProductRow::from_product(&odd, &CurrencyTable::new(), &[], &[]);

        assert_eq!(row.price, "ZZZ19.50");
        assert_eq!(row.currency_code, "ZZZ");
    }

    #[test]
    fn test_deleted_category_renders_na() {
        let mut orphan = product();
        orphan.category_id = Some(99);
        let row = ProductRow::from_product(&orphan, &CurrencyTable::new(), &[], &[]);
        assert_eq!(row.category, "N/A");
    }

    #[test]
    fn test_reference_options() {
        let categories = vec![Category {
            id: 4,
            name: "Tools".to_string(),
            description: None,
        }];
        let options = ReferenceOptions::build(&categories, &[]);

        assert_eq!(options.categories.len(), 2);
        assert_eq!(options.categories[0].label, CATEGORY_PLACEHOLDER);
        assert_eq!(options.categories[1].value, "4");
        assert_eq!(options.suppliers[0].label, SUPPLIER_PLACEHOLDER);
        assert_eq!(options.suppliers.len(), 1);
    }
}
