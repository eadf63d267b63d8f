//! Inventory movement models and the movement taxonomy

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::timestamp;

/// Types of inventory movements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Entry,
    Exit,
    Adjustment,
    /// Display only; the console never creates transfers
    Transfer,
}

/// Reasons sub-classifying a movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementReason {
    // Entries
    Purchase,
    CustomerReturn,
    InitialStock,
    // Exits
    Sale,
    SupplierReturn,
    Damaged,
    Expired,
    Theft,
    // Adjustments
    PhysicalCount,
    Correction,
    Other,
}

pub const ENTRY_REASONS: &[MovementReason] = &[
    MovementReason::Purchase,
    MovementReason::CustomerReturn,
    MovementReason::InitialStock,
];

pub const EXIT_REASONS: &[MovementReason] = &[
    MovementReason::Sale,
    MovementReason::SupplierReturn,
    MovementReason::Damaged,
    MovementReason::Expired,
    MovementReason::Theft,
];

pub const ADJUSTMENT_REASONS: &[MovementReason] = &[
    MovementReason::PhysicalCount,
    MovementReason::Correction,
    MovementReason::Other,
];

pub const TRANSFER_REASONS: &[MovementReason] = &[MovementReason::Other];

impl MovementType {
    pub const ALL: [MovementType; 4] = [
        MovementType::Entry,
        MovementType::Exit,
        MovementType::Adjustment,
        MovementType::Transfer,
    ];

    /// Types offered when creating a movement
    pub fn selectable() -> &'static [MovementType] {
        &[
            MovementType::Entry,
            MovementType::Exit,
            MovementType::Adjustment,
        ]
    }

    /// Allowed reasons in display order; the first one is the default
    pub fn allowed_reasons(&self) -> &'static [MovementReason] {
        match self {
            MovementType::Entry => ENTRY_REASONS,
            MovementType::Exit => EXIT_REASONS,
            MovementType::Adjustment => ADJUSTMENT_REASONS,
            MovementType::Transfer => TRANSFER_REASONS,
        }
    }

    pub fn default_reason(&self) -> MovementReason {
        self.allowed_reasons()[0]
    }

    pub fn allows(&self, reason: MovementReason) -> bool {
        self.allowed_reasons().contains(&reason)
    }

    /// Keep `current` if this type allows it, otherwise fall back to the default
    pub fn reconcile_reason(&self, current: MovementReason) -> MovementReason {
        if self.allows(current) {
            current
        } else {
            self.default_reason()
        }
    }

    pub fn direction(&self) -> StockDirection {
        match self {
            MovementType::Entry => StockDirection::Increase,
            MovementType::Exit | MovementType::Adjustment => StockDirection::Decrease,
            MovementType::Transfer => StockDirection::Neutral,
        }
    }

    /// Whether the movement takes stock out and must be covered by stock on hand
    pub fn requires_available_stock(&self) -> bool {
        self.direction() == StockDirection::Decrease
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entry => "entry",
            MovementType::Exit => "exit",
            MovementType::Adjustment => "adjustment",
            MovementType::Transfer => "transfer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MovementType::Entry => "Entry",
            MovementType::Exit => "Exit",
            MovementType::Adjustment => "Adjustment",
            MovementType::Transfer => "Transfer",
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for MovementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MovementType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown movement type: {}", s))
    }
}

impl MovementReason {
    pub const ALL: [MovementReason; 11] = [
        MovementReason::Purchase,
        MovementReason::CustomerReturn,
        MovementReason::InitialStock,
        MovementReason::Sale,
        MovementReason::SupplierReturn,
        MovementReason::Damaged,
        MovementReason::Expired,
        MovementReason::Theft,
        MovementReason::PhysicalCount,
        MovementReason::Correction,
        MovementReason::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementReason::Purchase => "purchase",
            MovementReason::CustomerReturn => "customer_return",
            MovementReason::InitialStock => "initial_stock",
            MovementReason::Sale => "sale",
            MovementReason::SupplierReturn => "supplier_return",
            MovementReason::Damaged => "damaged",
            MovementReason::Expired => "expired",
            MovementReason::Theft => "theft",
            MovementReason::PhysicalCount => "physical_count",
            MovementReason::Correction => "correction",
            MovementReason::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MovementReason::Purchase => "Purchase",
            MovementReason::CustomerReturn => "Customer return",
            MovementReason::InitialStock => "Initial stock",
            MovementReason::Sale => "Sale",
            MovementReason::SupplierReturn => "Return to supplier",
            MovementReason::Damaged => "Damaged",
            MovementReason::Expired => "Expired",
            MovementReason::Theft => "Theft/Loss",
            MovementReason::PhysicalCount => "Physical count",
            MovementReason::Correction => "Correction",
            MovementReason::Other => "Other",
        }
    }
}

impl std::fmt::Display for MovementReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for MovementReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MovementReason::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown movement reason: {}", s))
    }
}

/// Effect of a movement on stock on hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    Increase,
    Decrease,
    Neutral,
}

/// Stock after applying `quantity` to `stock_current`, for preview only.
/// Saturates at the `i64` bounds.
pub fn preview_stock(movement_type: MovementType, stock_current: i64, quantity: i64) -> i64 {
    match movement_type.direction() {
        StockDirection::Increase => stock_current.saturating_add(quantity),
        StockDirection::Decrease => stock_current.saturating_sub(quantity),
        StockDirection::Neutral => stock_current,
    }
}

/// Signed change submitted when setting an absolute stock level
pub fn stock_difference(stock_current: i64, new_stock: i64) -> i64 {
    new_stock.saturating_sub(stock_current)
}

/// An inventory movement as recorded by the service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryMovement {
    pub id: i64,
    pub product_id: i64,
    pub movement_type: MovementType,
    pub reason: MovementReason,
    pub quantity: i64,
    pub stock_before: i64,
    pub stock_after: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub product: Option<ProductSummary>,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

impl InventoryMovement {
    /// Signed change this movement applied to stock
    pub fn stock_delta(&self) -> i64 {
        self.stock_after - self.stock_before
    }

    /// Whether `stock_after` agrees with `stock_before` and the movement type
    pub fn is_consistent(&self) -> bool {
        match self.movement_type {
            MovementType::Entry => self.stock_after == self.stock_before + self.quantity,
            MovementType::Exit => self.stock_after == self.stock_before - self.quantity,
            // Adjustments may go either way
            MovementType::Adjustment => self.stock_delta().abs() == self.quantity,
            MovementType::Transfer => true,
        }
    }
}

/// Minimal product embedded in movement responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSummary {
    pub id: i64,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub stock_current: Option<i64>,
}

/// Minimal user embedded in movement responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: i64,
    pub full_name: String,
}

/// Movement list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovementFilter {
    pub product_id: Option<i64>,
    pub movement_type: Option<MovementType>,
    pub reason: Option<MovementReason>,
    pub user_id: Option<i64>,
    pub reference: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl MovementFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.product_id {
            pairs.push(("product_id", id.to_string()));
        }
        if let Some(t) = self.movement_type {
            pairs.push(("movement_type", t.as_str().to_string()));
        }
        if let Some(r) = self.reason {
            pairs.push(("reason", r.as_str().to_string()));
        }
        if let Some(id) = self.user_id {
            pairs.push(("user_id", id.to_string()));
        }
        if let Some(reference) = self.reference.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("reference", reference.to_string()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("date_from", from.to_rfc3339()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("date_to", to.to_rfc3339()));
        }
        pairs
    }
}

/// Product row of the low-stock alert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LowStockProduct {
    #[serde(alias = "id")]
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub stock_current: i64,
    pub stock_min: i64,
    #[serde(default, alias = "stock_deficit", alias = "difference")]
    pub deficit: i64,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub supplier_name: Option<String>,
}

/// Low-stock alert snapshot as fetched from the service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LowStockAlert {
    pub critical_count: u64,
    pub warning_count: u64,
    pub products: Vec<LowStockProduct>,
}

/// Inventory dashboard statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryStats {
    pub total_products: u64,
    #[serde(alias = "total_stock_value")]
    pub total_value: Decimal,
    pub low_stock_count: u64,
    pub out_of_stock_count: u64,
    pub movements_today: u64,
    #[serde(alias = "movements_this_week")]
    pub movements_week: u64,
    #[serde(alias = "movements_this_month")]
    pub movements_month: u64,
}

/// Stock availability check result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockCheck {
    pub product_id: i64,
    pub quantity_requested: i64,
    pub available: bool,
}
