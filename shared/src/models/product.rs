//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Category, Supplier};
use crate::types::timestamp;

/// A product as stored by the inventory service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub supplier_id: Option<i64>,
    pub stock_current: i64,
    pub stock_min: i64,
    pub cost: Decimal,
    pub price: Decimal,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Margin over price as a percentage; zero when the price is zero
    pub fn profit_margin(&self) -> Decimal {
        profit_margin(self.cost, self.price)
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock_current < self.stock_min
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.stock_current, self.stock_min)
    }

    /// Units missing to reach the minimum
    pub fn deficit(&self) -> i64 {
        (self.stock_min - self.stock_current).max(0)
    }
}

/// Product listing entry with its relations and server-derived fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductWithRelations {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub supplier: Option<Supplier>,
    #[serde(default)]
    pub is_low_stock: bool,
    #[serde(default)]
    pub profit_margin: Decimal,
}

impl From<ProductWithRelations> for Product {
    fn from(p: ProductWithRelations) -> Self {
        p.product
    }
}

/// Calculate profit margin percentage, `(price - cost) / price * 100`
pub fn profit_margin(cost: Decimal, price: Decimal) -> Decimal {
    if price.is_zero() {
        return Decimal::ZERO;
    }
    ((price - cost) / price * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Stock severity of a single product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Out of stock
    Critical,
    /// Below the minimum but not empty
    Warning,
    Ok,
}

impl StockStatus {
    /// Critical when empty, warning when `0 < stock < min`, ok otherwise
    pub fn classify(stock_current: i64, stock_min: i64) -> Self {
        if stock_current <= 0 {
            StockStatus::Critical
        } else if stock_current < stock_min {
            StockStatus::Warning
        } else {
            StockStatus::Ok
        }
    }

    pub fn is_flagged(&self) -> bool {
        !matches!(self, StockStatus::Ok)
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::Critical => write!(f, "Out of stock"),
            StockStatus::Warning => write!(f, "Low stock"),
            StockStatus::Ok => write!(f, "In stock"),
        }
    }
}

/// Payload for creating a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 100))]
    pub sku: String,
    #[validate(length(min = 2, max = 255))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
    #[validate(range(min = 0))]
    pub stock_current: i64,
    #[validate(range(min = 0))]
    pub stock_min: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "crate::validation::validate_money")]
    pub cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "crate::validation::validate_money")]
    pub price: Decimal,
}

impl ProductCreate {
    /// Upper-case and trim the SKU the way the service stores it
    pub fn normalized(mut self) -> Self {
        self.sku = normalize_sku(&self.sku);
        self
    }
}

/// Payload for updating a product; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 255))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub stock_min: Option<i64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option",
        default
    )]
    #[validate(custom = "crate::validation::validate_money")]
    pub cost: Option<Decimal>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option",
        default
    )]
    #[validate(custom = "crate::validation::validate_money")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ProductUpdate {
    pub fn normalized(mut self) -> Self {
        self.sku = self.sku.as_deref().map(normalize_sku);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &ProductUpdate::default()
    }
}

/// Product list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub is_active: Option<bool>,
    pub low_stock_only: bool,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ProductFilter {
    /// Query parameters for the filters that are set
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(id) = self.category_id {
            pairs.push(("category_id", id.to_string()));
        }
        if let Some(id) = self.supplier_id {
            pairs.push(("supplier_id", id.to_string()));
        }
        if let Some(active) = self.is_active {
            pairs.push(("is_active", active.to_string()));
        }
        if self.low_stock_only {
            pairs.push(("low_stock_only", "true".to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        pairs
    }
}

pub fn normalize_sku(sku: &str) -> String {
    sku.trim().to_uppercase()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn product(id: i64, stock_current: i64, stock_min: i64) -> Product {
        let now = Utc::now();
        Product {
            id,
            sku: format!("SKU-{:03}", id),
            name: format!("Product {}", id),
            description: None,
            category_id: None,
            supplier_id: None,
            stock_current,
            stock_min,
            cost: Decimal::from(60),
            price: Decimal::from(100),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
