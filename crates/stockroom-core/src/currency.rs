//! # Currency Module
//!
//! Static reference data for the currencies a product can be priced in, and
//! the price formatting built on it.
//!
//! ## Lookup Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  format_price(Money(1950), "USD")  ──►  "$" + "19.50"   = "$19.50"     │
//! │  format_price(Money(10000), "ZZZ") ──►  "ZZZ" + "100.00" = "ZZZ100.00" │
//! │                                                                         │
//! │  Unknown codes are never an error: the code doubles as its symbol.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The table is a plain value. Whoever renders prices owns one and passes it
//! around; there is no global instance.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::DEFAULT_CURRENCY;

/// Placeholder option shown first in the currency selector.
pub const CURRENCY_PLACEHOLDER: &str = "-- Select Currency --";

/// (code, symbol, name)
const CURRENCIES: &[(&str, &str, &str)] = &[
    ("USD", "$", "US Dollar"),
    ("EUR", "€", "Euro"),
    ("GBP", "£", "British Pound"),
    ("JPY", "¥", "Japanese Yen"),
    ("CAD", "C$", "Canadian Dollar"),
    ("AUD", "A$", "Australian Dollar"),
    ("CHF", "CHF", "Swiss Franc"),
    ("CNY", "¥", "Chinese Yuan"),
    ("INR", "₹", "Indian Rupee"),
    ("BRL", "R$", "Brazilian Real"),
    ("ZAR", "R", "South African Rand"),
    ("AED", "د.إ", "UAE Dirham"),
    ("SAR", "﷼", "Saudi Riyal"),
    ("MXN", "Mex$", "Mexican Peso"),
    ("SGD", "S$", "Singapore Dollar"),
    ("NZD", "NZ$", "New Zealand Dollar"),
    ("KRW", "₩", "South Korean Won"),
    ("SEK", "kr", "Swedish Krona"),
    ("RUB", "₽", "Russian Ruble"),
    ("TRY", "₺", "Turkish Lira"),
    ("THB", "฿", "Thai Baht"),
    ("IDR", "Rp", "Indonesian Rupiah"),
    ("PLN", "zł", "Polish Złoty"),
    ("CZK", "Kč", "Czech Koruna"),
    ("DKK", "kr", "Danish Krone"),
    ("NOK", "kr", "Norwegian Krone"),
    ("MYR", "RM", "Malaysian Ringgit"),
    ("PHP", "₱", "Philippine Peso"),
    ("EGP", "E£", "Egyptian Pound"),
    ("CLF", "UF", "Chilean Unidad de Fomento"),
    ("KWD", "KD", "Kuwaiti Dinar"),
    ("OMR", "ر.ع.", "Omani Rial"),
    ("QAR", "ر.ق", "Qatari Riyal"),
];

// =============================================================================
// Currency
// =============================================================================

/// One entry of the currency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    pub name: String,
}

impl Currency {
    /// Selector label: `"EUR - € Euro"`.
    pub fn option_label(&self) -> String {
        format!("{} - {} {}", self.code, self.symbol, self.name)
    }
}

/// One entry of the rendered currency selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurrencyOption {
    /// Empty for the placeholder.
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// The currency selector as the product form shows it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurrencySelector {
    pub options: Vec<CurrencyOption>,
}

impl CurrencySelector {
    /// The code of the selected option, if any.
    pub fn selected(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.selected)
            .map(|o| o.value.as_str())
    }
}

// =============================================================================
// Currency Table
// =============================================================================

/// Code -> {symbol, name} reference table.
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    currencies: Vec<Currency>,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyTable {
    /// Builds the standard 33-currency table.
    pub fn new() -> Self {
        let currencies = CURRENCIES
            .iter()
            .map(|(code, symbol, name)| Currency {
                code: (*code).to_string(),
                symbol: (*symbol).to_string(),
                name: (*name).to_string(),
            })
            .collect();
        CurrencyTable { currencies }
    }

    /// Number of known currencies.
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// Looks up a currency by exact code.
    pub fn get(&self, code: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.code == code)
    }

    /// Symbol for `code`, or the code itself when unknown.
    pub fn symbol_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).map(|c| c.symbol.as_str()).unwrap_or(code)
    }

    /// Formats a price: symbol immediately followed by a two-decimal amount.
    pub fn format_price(&self, amount: Money, code: &str) -> String {
        format!("{}{}", self.symbol_for(code), amount.to_decimal_string())
    }

    /// Currencies ordered by display name.
    ///
    /// Case-insensitive on the name, then case-sensitive name, then code, so
    /// the order is total and repeatable.
    pub fn sorted_for_display(&self) -> Vec<&Currency> {
        let mut sorted: Vec<&Currency> = self.currencies.iter().collect();
        sorted.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.code.cmp(&b.code))
        });
        sorted
    }

    /// Builds the selector: placeholder, then every currency in display
    /// order, with USD selected.
    pub fn selector(&self) -> CurrencySelector {
        let mut options = Vec::with_capacity(self.currencies.len() + 1);
        options.push(CurrencyOption {
            value: String::new(),
            label: CURRENCY_PLACEHOLDER.to_string(),
            selected: false,
        });
        options.extend(self.sorted_for_display().into_iter().map(|c| CurrencyOption {
            value: c.code.clone(),
            label: c.option_label(),
            selected: c.code == DEFAULT_CURRENCY,
        }));
        CurrencySelector { options }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_all_currencies() {
        let table = CurrencyTable::new();
        assert_eq!(table.len(), 33);
        assert_eq!(table.get("INR").map(|c| c.symbol.as_str()), Some("₹"));
        assert!(table.get("usd").is_none());
    }

    #[test]
    fn test_format_price_known_code() {
        let table = CurrencyTable::new();
        assert_eq!(table.format_price(Money::from_cents(1950), "USD"), "$19.50");
        assert_eq!(table.format_price(Money::from_cents(5), "GBP"), "£0.05");
    }

    #[test]
    fn test_format_price_unknown_code() {
        let table = CurrencyTable::new();
        assert_eq!(
            table.format_price(Money::from_major(100), "ZZZ"),
            "ZZZ100.00"
        );
    }

    #[test]
    fn test_sorted_for_display() {
        let table = CurrencyTable::new();
        let names: Vec<&str> = table
            .sorted_for_display()
            .iter()
            .map(|c| c.name.as_str())
            .collect();

        let aud = names.iter().position(|n| *n == "Australian Dollar").unwrap();
        let usd = names.iter().position(|n| *n == "US Dollar").unwrap();
        assert!(aud < usd);
        assert_eq!(names.first(), Some(&"Australian Dollar"));
        assert_eq!(names.len(), 33);
    }

    #[test]
    fn test_selector() {
        let selector = CurrencyTable::new().selector();

        assert_eq!(selector.options.len(), 34);
        assert_eq!(selector.options[0].label, CURRENCY_PLACEHOLDER);
        assert_eq!(selector.selected(), Some("USD"));
        assert!(selector
            .options
            .iter()
            .any(|o| o.label == "EUR - € Euro"));
        assert_eq!(selector.options.iter().filter(|o| o.selected).count(), 1);
    }
}
