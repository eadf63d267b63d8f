//! Form drafts and the request payloads built from them
//!
//! A draft mirrors raw form state. Building a draft validates it and produces
//! the payload the inventory service accepts. Quantities are sent as positive
//! magnitudes with the movement type carrying the direction, except for the
//! stock-delta update, which takes a signed change.

use serde::{Deserialize, Serialize};

use crate::models::{preview_stock, stock_difference, MovementReason, MovementType, Product};
use crate::validation::{
    is_valid_batch_line, require_product, validate_absolute_stock, validate_movement,
    validate_reason, ValidationError, ValidationResult,
};

/// Empty form text means "not provided" and is sent as `null`
pub fn normalize_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Reason recorded for a raw stock delta when the caller gives none
pub fn infer_delta_reason(delta: i64) -> MovementReason {
    if delta > 0 {
        MovementReason::Purchase
    } else {
        MovementReason::Sale
    }
}

// ============================================================================
// Single movement
// ============================================================================

/// Body of `POST /inventory/movements`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovementCreate {
    pub product_id: i64,
    pub movement_type: MovementType,
    pub reason: MovementReason,
    pub quantity: i64,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementDraft {
    pub product_id: Option<i64>,
    pub movement_type: MovementType,
    pub reason: MovementReason,
    pub quantity: i64,
    pub reference: String,
    pub notes: String,
}

impl MovementDraft {
    pub fn new(movement_type: MovementType) -> Self {
        Self {
            product_id: None,
            movement_type,
            reason: movement_type.default_reason(),
            quantity: 1,
            reference: String::new(),
            notes: String::new(),
        }
    }

    pub fn for_product(product_id: i64, movement_type: MovementType) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::new(movement_type)
        }
    }

    /// Switch type, resetting the reason when the new type does not allow it
    pub fn set_movement_type(&mut self, movement_type: MovementType) {
        self.movement_type = movement_type;
        self.reason = movement_type.reconcile_reason(self.reason);
    }

    /// Stock the selected product would have after this movement
    pub fn preview(&self, product: Option<&Product>) -> Option<i64> {
        let product = product.filter(|p| Some(p.id) == self.product_id)?;
        Some(preview_stock(
            self.movement_type,
            product.stock_current,
            self.quantity,
        ))
    }

    pub fn build(&self, product: Option<&Product>) -> ValidationResult<MovementCreate> {
        let product_id = validate_movement(
            self.product_id,
            self.movement_type,
            self.reason,
            self.quantity,
            product,
        )?;
        Ok(MovementCreate {
            product_id,
            movement_type: self.movement_type,
            reason: self.reason,
            quantity: self.quantity,
            reference: normalize_text(&self.reference),
            notes: normalize_text(&self.notes),
        })
    }
}

impl Default for MovementDraft {
    fn default() -> Self {
        Self::new(MovementType::Entry)
    }
}

// ============================================================================
// Absolute stock adjustment
// ============================================================================

/// Body of `POST /inventory/adjust`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockAdjustment {
    pub product_id: i64,
    pub new_stock: i64,
    pub reason: MovementReason,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentDraft {
    pub product_id: Option<i64>,
    /// Stock on hand when the form was opened
    pub stock_current: i64,
    pub new_stock: i64,
    pub reason: MovementReason,
    pub notes: String,
}

impl AdjustmentDraft {
    /// Start from the product's current stock, which is not yet submittable
    pub fn for_product(product: &Product) -> Self {
        Self {
            product_id: Some(product.id),
            stock_current: product.stock_current,
            new_stock: product.stock_current,
            reason: MovementType::Adjustment.default_reason(),
            notes: String::new(),
        }
    }

    /// Signed change shown next to the input
    pub fn difference(&self) -> i64 {
        stock_difference(self.stock_current, self.new_stock)
    }

    pub fn build(&self) -> ValidationResult<StockAdjustment> {
        let product_id = require_product(self.product_id)?;
        validate_absolute_stock(self.stock_current, self.new_stock)?;
        validate_reason(MovementType::Adjustment, self.reason)?;
        Ok(StockAdjustment {
            product_id,
            new_stock: self.new_stock,
            reason: self.reason,
            notes: normalize_text(&self.notes),
        })
    }
}

// ============================================================================
// Batch stock entry
// ============================================================================

/// One line of `POST /inventory/batch-entry`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchStockLine {
    pub product_id: i64,
    pub quantity: i64,
    pub notes: Option<String>,
}

/// Body of `POST /inventory/batch-entry`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchStockEntryRequest {
    #[serde(alias = "entries")]
    pub items: Vec<BatchStockLine>,
    pub reason: MovementReason,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLineDraft {
    pub product_id: Option<i64>,
    pub quantity: i64,
    pub notes: String,
}

impl Default for BatchLineDraft {
    fn default() -> Self {
        Self {
            product_id: None,
            quantity: 1,
            notes: String::new(),
        }
    }
}

impl BatchLineDraft {
    pub fn is_valid(&self) -> bool {
        is_valid_batch_line(self.product_id, self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDraft {
    pub reason: MovementReason,
    pub reference: String,
    lines: Vec<BatchLineDraft>,
}

impl Default for BatchDraft {
    fn default() -> Self {
        Self {
            reason: MovementType::Entry.default_reason(),
            reference: String::new(),
            lines: vec![BatchLineDraft::default()],
        }
    }
}

impl BatchDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[BatchLineDraft] {
        &self.lines
    }

    pub fn line_mut(&mut self, index: usize) -> Option<&mut BatchLineDraft> {
        self.lines.get_mut(index)
    }

    pub fn add_line(&mut self) -> &mut BatchLineDraft {
        self.lines.push(BatchLineDraft::default());
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    pub fn push_line(&mut self, line: BatchLineDraft) {
        self.lines.push(line);
    }

    /// Remove a line; the draft always keeps at least one
    pub fn remove_line(&mut self, index: usize) -> bool {
        if self.lines.len() <= 1 || index >= self.lines.len() {
            return false;
        }
        self.lines.remove(index);
        true
    }

    /// Drop the placeholder lines left without a product
    pub fn clear_blank_lines(&mut self) {
        let kept: Vec<_> = self
            .lines
            .iter()
            .filter(|l| l.product_id.is_some() || !l.notes.is_empty())
            .cloned()
            .collect();
        self.lines = if kept.is_empty() {
            vec![BatchLineDraft::default()]
        } else {
            kept
        };
    }

    pub fn valid_lines(&self) -> impl Iterator<Item = &BatchLineDraft> {
        self.lines.iter().filter(|l| l.is_valid())
    }

    pub fn total_units(&self) -> i64 {
        self.valid_lines().map(|l| l.quantity).sum()
    }

    /// Lines that will be silently left out of the submission
    pub fn dropped_count(&self) -> usize {
        self.lines.len() - self.valid_lines().count()
    }

    pub fn build(&self) -> ValidationResult<BatchStockEntryRequest> {
        validate_reason(MovementType::Entry, self.reason)?;
        let items: Vec<BatchStockLine> = self
            .valid_lines()
            .filter_map(|l| {
                l.product_id.map(|product_id| BatchStockLine {
                    product_id,
                    quantity: l.quantity,
                    notes: normalize_text(&l.notes),
                })
            })
            .collect();
        if items.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }
        Ok(BatchStockEntryRequest {
            items,
            reason: self.reason,
            reference: normalize_text(&self.reference),
        })
    }
}

// ============================================================================
// Raw stock delta
// ============================================================================

/// Query of `PATCH /products/{id}/stock`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockDeltaUpdate {
    pub product_id: i64,
    /// Signed `new - current`
    pub quantity: i64,
    pub reason: MovementReason,
}

impl StockDeltaUpdate {
    pub fn new(product_id: i64, delta: i64, reason: Option<MovementReason>) -> Self {
        Self {
            product_id,
            quantity: delta,
            reason: reason.unwrap_or_else(|| infer_delta_reason(delta)),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("quantity", self.quantity.to_string()),
            ("reason", self.reason.as_str().to_string()),
        ]
    }
}

/// How the stock-update form interprets its quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StockOperation {
    #[default]
    Add,
    Remove,
    Set,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockUpdateDraft {
    pub product_id: Option<i64>,
    pub stock_current: i64,
    pub operation: StockOperation,
    pub quantity: i64,
    pub reason: Option<MovementReason>,
}

impl StockUpdateDraft {
    pub fn for_product(product: &Product, operation: StockOperation, quantity: i64) -> Self {
        Self {
            product_id: Some(product.id),
            stock_current: product.stock_current,
            operation,
            quantity,
            reason: None,
        }
    }

    /// Resulting stock, or `None` when it does not fit in an `i64`.
    /// Removing more than is on hand floors at zero.
    fn resulting_stock(&self) -> Option<i64> {
        match self.operation {
            StockOperation::Add => self.stock_current.checked_add(self.quantity),
            StockOperation::Remove => self
                .stock_current
                .checked_sub(self.quantity)
                .map(|stock| stock.max(0)),
            StockOperation::Set => Some(self.quantity),
        }
    }

    /// Resulting stock for display, saturating at the `i64` bounds
    pub fn preview(&self) -> i64 {
        self.resulting_stock().unwrap_or(match self.operation {
            StockOperation::Remove => 0,
            StockOperation::Add | StockOperation::Set => i64::MAX,
        })
    }

    pub fn build(&self) -> ValidationResult<StockDeltaUpdate> {
        let product_id = require_product(self.product_id)?;
        if self.quantity < 0 {
            return Err(ValidationError::InvalidQuantity);
        }
        let new_stock = self
            .resulting_stock()
            .ok_or(ValidationError::InvalidQuantity)?;
        if new_stock < 0 {
            return Err(ValidationError::NegativeStock);
        }
        let delta = new_stock
            .checked_sub(self.stock_current)
            .ok_or(ValidationError::InvalidQuantity)?;
        Ok(StockDeltaUpdate::new(product_id, delta, self.reason))
    }
}
