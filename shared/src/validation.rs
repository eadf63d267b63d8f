//! Validation rules for inventory movements and catalog payloads
//!
//! Every check here runs before a request is built; a failure never reaches
//! the network.

use rust_decimal::Decimal;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::models::{MovementReason, MovementType, Product};

/// Client-side validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select a product")]
    MissingProduct,

    #[error("Quantity must be greater than 0")]
    InvalidQuantity,

    #[error("Insufficient stock. Available: {available}")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("Stock cannot be negative")]
    NegativeStock,

    #[error("New stock is the same as the current stock")]
    NoChange,

    #[error("Add at least one product with a quantity greater than 0")]
    EmptyBatch,

    #[error("Reason {reason} is not allowed for {movement_type} movements")]
    ReasonNotAllowed {
        movement_type: MovementType,
        reason: MovementReason,
    },

    #[error("Transfers cannot be created from the console")]
    TransferNotSupported,

    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

impl ValidationError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingProduct => "MISSING_PRODUCT",
            ValidationError::InvalidQuantity => "INVALID_QUANTITY",
            ValidationError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            ValidationError::NegativeStock => "NEGATIVE_STOCK",
            ValidationError::NoChange => "NO_CHANGE",
            ValidationError::EmptyBatch => "EMPTY_BATCH",
            ValidationError::ReasonNotAllowed { .. } => "REASON_NOT_ALLOWED",
            ValidationError::TransferNotSupported => "TRANSFER_NOT_SUPPORTED",
            ValidationError::InvalidField { .. } => "INVALID_FIELD",
        }
    }

    /// Form field the error belongs to
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingProduct => "product_id",
            ValidationError::InvalidQuantity | ValidationError::InsufficientStock { .. } => {
                "quantity"
            }
            ValidationError::NegativeStock | ValidationError::NoChange => "new_stock",
            ValidationError::EmptyBatch => "items",
            ValidationError::ReasonNotAllowed { .. } => "reason",
            ValidationError::TransferNotSupported => "movement_type",
            ValidationError::InvalidField { field, .. } => field,
        }
    }
}

impl From<ValidationErrors> for ValidationError {
    fn from(errors: ValidationErrors) -> Self {
        // Report the first failing field, in field-name order
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| {
                        errs.first()
                            .map(|e| format!("invalid value ({})", e.code))
                            .unwrap_or_else(|| "invalid value".to_string())
                    });
                ValidationError::InvalidField {
                    field: field.to_string(),
                    message,
                }
            }
            None => ValidationError::InvalidField {
                field: "payload".to_string(),
                message: "invalid value".to_string(),
            },
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

// ============================================================================
// Movement Validations
// ============================================================================

/// Product must be selected
pub fn require_product(product_id: Option<i64>) -> ValidationResult<i64> {
    product_id.ok_or(ValidationError::MissingProduct)
}

/// Quantity must be a positive integer
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::InvalidQuantity);
    }
    Ok(())
}

/// Reason must belong to the movement type's closed set
pub fn validate_reason(movement_type: MovementType, reason: MovementReason) -> ValidationResult<()> {
    if !movement_type.allows(reason) {
        return Err(ValidationError::ReasonNotAllowed {
            movement_type,
            reason,
        });
    }
    Ok(())
}

/// Decrementing movements must be covered by the stock on hand
pub fn validate_available_stock(
    movement_type: MovementType,
    quantity: i64,
    stock_current: i64,
) -> ValidationResult<()> {
    if movement_type.requires_available_stock() && quantity > stock_current {
        return Err(ValidationError::InsufficientStock {
            available: stock_current,
            requested: quantity,
        });
    }
    Ok(())
}

/// Validate a single movement before submission.
///
/// `product` is the cached copy of the selected product; when it is not in
/// the cache the stock check is left to the service.
pub fn validate_movement(
    product_id: Option<i64>,
    movement_type: MovementType,
    reason: MovementReason,
    quantity: i64,
    product: Option<&Product>,
) -> ValidationResult<i64> {
    let product_id = require_product(product_id)?;
    validate_quantity(quantity)?;
    if movement_type == MovementType::Transfer {
        return Err(ValidationError::TransferNotSupported);
    }
    validate_reason(movement_type, reason)?;
    if let Some(product) = product.filter(|p| p.id == product_id) {
        validate_available_stock(movement_type, quantity, product.stock_current)?;
    }
    Ok(product_id)
}

/// Validate setting an absolute stock level, returning the signed delta
pub fn validate_absolute_stock(stock_current: i64, new_stock: i64) -> ValidationResult<i64> {
    if new_stock < 0 {
        return Err(ValidationError::NegativeStock);
    }
    if new_stock == stock_current {
        return Err(ValidationError::NoChange);
    }
    new_stock
        .checked_sub(stock_current)
        .ok_or(ValidationError::InvalidQuantity)
}

/// A batch line counts only with a product and a positive quantity
pub fn is_valid_batch_line(product_id: Option<i64>, quantity: i64) -> bool {
    product_id.is_some() && quantity > 0
}

// ============================================================================
// Catalog Validations
// ============================================================================

/// Money amounts must be non-negative with at most two decimal places
pub fn validate_money(value: &Decimal) -> Result<(), validator::ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = validator::ValidationError::new("range");
        err.message = Some("must be greater than or equal to 0".into());
        return Err(err);
    }
    if value.normalize().scale() > 2 {
        let mut err = validator::ValidationError::new("decimal_places");
        err.message = Some("must have at most 2 decimal places".into());
        return Err(err);
    }
    Ok(())
}

/// Run `validator` derives and map the first failure to [`ValidationError`]
pub fn validate_payload<T: Validate>(payload: &T) -> ValidationResult<()> {
    payload.validate().map_err(ValidationError::from)
}
