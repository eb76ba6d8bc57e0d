//! # Product Types
//!
//! Money types and the compiled-in price table that maps coaching programs
//! to Stripe price identifiers.

use crate::error::{PaymentError, PaymentResult};
use crate::order::{CartItem, LineItem};
use serde::Deserialize;
use std::collections::HashMap;

/// Charge currency (ISO 4217). Every charge is in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
        }
    }

    /// Minor units per major unit (cents per dollar)
    fn minor_units(&self) -> f64 {
        match self {
            Currency::USD => 100.0,
        }
    }

    /// Convert a decimal amount to the smallest currency unit
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        (amount * self.minor_units()).round() as i64
    }

    /// Convert from smallest unit back to decimal
    pub fn from_smallest_unit(&self, amount: i64) -> f64 {
        amount as f64 / self.minor_units()
    }

    fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    /// Amount in smallest currency unit (cents for USD)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a new price from a decimal amount in major units
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_smallest_unit(amount),
            currency,
        }
    }

    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Parse a caller-supplied major-unit amount, rejecting anything that
    /// would not produce a positive charge.
    pub fn from_major_units(amount: f64, currency: Currency) -> PaymentResult<Self> {
        if !amount.is_finite() {
            return Err(PaymentError::InvalidPrice {
                message: "amount must be a finite number".to_string(),
            });
        }
        let price = Self::new(amount, currency);
        if !price.is_positive() {
            return Err(PaymentError::InvalidPrice {
                message: format!("amount must be greater than zero, got {}", amount),
            });
        }
        Ok(price)
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_smallest_unit(self.amount)
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// Format for display (e.g., "$10.00")
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency.symbol(), self.as_decimal())
    }
}

/// Coaching programs sold through hosted checkout, keyed to their Stripe prices.
const BUILTIN_PRICES: &[(&str, &str)] = &[
    ("bodybuilding", "price_1R5y0qF1ymj85A8b6TJcqZhY"),
    ("powerlifting", "price_1RHaelF1ymj85A8bTrxiIaEG"),
    ("powerbuilding", "price_1RHaf1F1ymj85A8bmwNTIOHp"),
];

/// Immutable mapping from product id to Stripe price id.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<String, String>,
}

impl PriceTable {
    /// Build a table from `(product_id, price_id)` pairs
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prices: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The compiled-in program price table
    pub fn builtin() -> Self {
        Self::new(BUILTIN_PRICES.iter().copied())
    }

    /// Look up the Stripe price id for a product
    pub fn get(&self, product_id: &str) -> Option<&str> {
        self.prices.get(product_id).map(String::as_str)
    }

    /// Priced product ids, sorted
    pub fn product_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.prices.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Resolve a cart into Stripe line items.
    ///
    /// The whole cart is rejected if it is empty, if any quantity is zero or
    /// if any id is missing from the table; nothing is forwarded partially.
    pub fn resolve(&self, items: &[CartItem]) -> PaymentResult<Vec<LineItem>> {
        if items.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "Cart has no items".to_string(),
            ));
        }

        items
            .iter()
            .map(|item| {
                if item.quantity == 0 {
                    return Err(PaymentError::InvalidRequest(format!(
                        "Quantity for {} must be greater than zero",
                        item.id
                    )));
                }
                let price_id = self.get(&item.id).ok_or_else(|| PaymentError::ProductNotFound {
                    product_id: item.id.clone(),
                })?;
                Ok(LineItem::new(price_id, item.quantity))
            })
            .collect()
    }
}
