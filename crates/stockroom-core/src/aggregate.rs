//! # Aggregate Module
//!
//! Derived values shown on the dashboard: collection counts and the
//! low-stock alert.
//!
//! ## Low-Stock Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  low stock  ⇔  safe_stock > 0  AND  stock < safe_stock × 0.5            │
//! │                                                                         │
//! │  Evaluated as 2 × stock < safe_stock (no floats):                       │
//! │                                                                         │
//! │    safe_stock = 10   stock = 5  ──►  10 < 10  false                     │
//! │    safe_stock = 10   stock = 4  ──►   8 < 10  true                      │
//! │    safe_stock = 0    stock = 0  ──►  disabled, false                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Category, Product, Supplier};

/// Returns true when the product should be restocked.
#[inline]
pub fn is_low_stock(product: &Product) -> bool {
    stock_below_threshold(product.stock, product.safe_stock)
}

/// The low-stock rule on raw numbers.
pub fn stock_below_threshold(stock: i64, safe_stock: i64) -> bool {
    safe_stock > 0 && stock.saturating_mul(2) < safe_stock
}

// =============================================================================
// Dashboard Summary
// =============================================================================

/// Counts shown on the dashboard.
///
/// The wire names are those of `/api/dashboard_summary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    #[serde(rename = "total_employees", default)]
    pub employee_count: u64,
    #[serde(rename = "total_categories", default)]
    pub category_count: u64,
    #[serde(rename = "total_suppliers", default)]
    pub supplier_count: u64,
    #[serde(rename = "total_products", default)]
    pub product_count: u64,
    #[serde(rename = "products_needing_restock", default)]
    pub restock_count: u64,
}

impl DashboardSummary {
    /// Computes the summary from local snapshots.
    ///
    /// Employees are not a managed collection, so their count is passed in.
    pub fn from_snapshots(
        employee_count: u64,
        categories: &[Category],
        suppliers: &[Supplier],
        products: &[Product],
    ) -> Self {
        DashboardSummary {
            employee_count,
            category_count: categories.len() as u64,
            supplier_count: suppliers.len() as u64,
            product_count: products.len() as u64,
            restock_count: products.iter().filter(|p| is_low_stock(p)).count() as u64,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
