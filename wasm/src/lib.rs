//! WebAssembly bindings for the inventory console
//!
//! Exposes the movement rules and request builders to a browser UI so it
//! validates and previews exactly like the native client. Requests and
//! products cross the boundary as JSON strings; a rejected form throws a
//! JSON object `{code, field, message}`.

use rust_decimal::Decimal;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use shared::{
    AdjustmentDraft, AlertSummary, BatchDraft, BatchLineDraft, MovementDraft, MovementReason,
    MovementType, Product, StockOperation, StockStatus, StockUpdateDraft, ValidationError,
    TOKEN_STORAGE_KEY,
};

/// Failure of an exported call, thrown to JavaScript as JSON
#[derive(Debug, Clone, PartialEq)]
struct Failure {
    code: &'static str,
    field: String,
    message: String,
}

impl Failure {
    fn input(what: &str, err: impl std::fmt::Display) -> Self {
        Self {
            code: "INVALID_INPUT",
            field: what.to_string(),
            message: format!("Invalid {}: {}", what, err),
        }
    }
}

impl From<ValidationError> for Failure {
    fn from(err: ValidationError) -> Self {
        Self {
            code: err.code(),
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<Failure> for JsValue {
    fn from(failure: Failure) -> Self {
        let body = serde_json::json!({
            "code": failure.code,
            "field": failure.field,
            "message": failure.message,
        });
        JsValue::from_str(&body.to_string())
    }
}

type Outcome<T> = Result<T, Failure>;

fn parse_json<'a, T: Deserialize<'a>>(what: &str, raw: &'a str) -> Outcome<T> {
    serde_json::from_str(raw).map_err(|e| Failure::input(what, e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Outcome<String> {
    serde_json::to_string(value).map_err(|e| Failure::input("output", e))
}

fn parse_type(raw: &str) -> Outcome<MovementType> {
    raw.parse().map_err(|e| Failure::input("movement_type", e))
}

fn parse_reason(raw: &str) -> Outcome<MovementReason> {
    raw.parse().map_err(|e| Failure::input("reason", e))
}

fn parse_product(raw: Option<String>) -> Outcome<Option<Product>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| parse_json("product", &s))
        .transpose()
}

// ============================================================================
// Movement rules
// ============================================================================

/// Reasons a movement type accepts, as wire names
#[wasm_bindgen]
pub fn movement_reasons(movement_type: &str) -> Result<js_sys::Array, JsValue> {
    let movement_type = parse_type(movement_type)?;
    Ok(movement_type
        .allowed_reasons()
        .iter()
        .map(|r| JsValue::from_str(r.as_str()))
        .collect())
}

#[wasm_bindgen]
pub fn default_reason(movement_type: &str) -> Result<String, JsValue> {
    Ok(parse_type(movement_type)?.default_reason().as_str().to_string())
}

/// Reason to keep after the type changes: the current one if still allowed
#[wasm_bindgen]
pub fn reconcile_reason(movement_type: &str, current: &str) -> Result<String, JsValue> {
    let movement_type = parse_type(movement_type)?;
    let current = parse_reason(current)?;
    Ok(movement_type.reconcile_reason(current).as_str().to_string())
}

#[wasm_bindgen]
pub fn preview_stock(movement_type: &str, stock_current: i32, quantity: i32) -> Result<i32, JsValue> {
    let movement_type = parse_type(movement_type)?;
    let preview = shared::preview_stock(movement_type, stock_current.into(), quantity.into());
    Ok(clamp_i32(preview))
}

/// `ok`, `warning` or `critical`
#[wasm_bindgen]
pub fn classify_stock(stock_current: i32, stock_min: i32) -> String {
    match StockStatus::classify(stock_current.into(), stock_min.into()) {
        StockStatus::Critical => "critical",
        StockStatus::Warning => "warning",
        StockStatus::Ok => "ok",
    }
    .to_string()
}

/// Margin percentage as a decimal string, e.g. `"33.33"`
#[wasm_bindgen]
pub fn profit_margin(cost: &str, price: &str) -> Result<String, JsValue> {
    Ok(margin(cost, price)?)
}

fn margin(cost: &str, price: &str) -> Outcome<String> {
    let cost: Decimal = cost.trim().parse().map_err(|e| Failure::input("cost", e))?;
    let price: Decimal = price.trim().parse().map_err(|e| Failure::input("price", e))?;
    Ok(shared::profit_margin(cost, price).to_string())
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

// ============================================================================
// Request builders
// ============================================================================

#[derive(Deserialize)]
struct MovementForm {
    product_id: Option<i64>,
    movement_type: MovementType,
    reason: Option<MovementReason>,
    quantity: i64,
    #[serde(default)]
    reference: String,
    #[serde(default)]
    notes: String,
}

/// Validate a movement form and return the request body as JSON.
/// `product_json` is the cached product, used for the stock check.
#[wasm_bindgen]
pub fn build_movement(form_json: &str, product_json: Option<String>) -> Result<String, JsValue> {
    Ok(movement_request(form_json, product_json)?)
}

fn movement_request(form_json: &str, product_json: Option<String>) -> Outcome<String> {
    let form: MovementForm = parse_json("movement", form_json)?;
    let product = parse_product(product_json)?;

    let mut draft = MovementDraft::new(form.movement_type);
    draft.product_id = form.product_id;
    if let Some(reason) = form.reason {
        draft.reason = reason;
    }
    draft.quantity = form.quantity;
    draft.reference = form.reference;
    draft.notes = form.notes;

    let request = draft.build(product.as_ref())?;
    to_json(&request)
}

#[derive(Deserialize)]
struct AdjustmentForm {
    new_stock: i64,
    reason: Option<MovementReason>,
    #[serde(default)]
    notes: String,
}

#[wasm_bindgen]
pub fn build_adjustment(product_json: &str, form_json: &str) -> Result<String, JsValue> {
    Ok(adjustment_request(product_json, form_json)?)
}

fn adjustment_request(product_json: &str, form_json: &str) -> Outcome<String> {
    let product: Product = parse_json("product", product_json)?;
    let form: AdjustmentForm = parse_json("adjustment", form_json)?;

    let mut draft = AdjustmentDraft::for_product(&product);
    draft.new_stock = form.new_stock;
    if let Some(reason) = form.reason {
        draft.reason = reason;
    }
    draft.notes = form.notes;
    to_json(&draft.build()?)
}

#[derive(Deserialize)]
struct BatchForm {
    reason: Option<MovementReason>,
    #[serde(default)]
    reference: String,
    lines: Vec<BatchLineForm>,
}

#[derive(Deserialize)]
struct BatchLineForm {
    product_id: Option<i64>,
    quantity: i64,
    #[serde(default)]
    notes: String,
}

/// Build a batch entry; incomplete lines are left out
#[wasm_bindgen]
pub fn build_batch(form_json: &str) -> Result<String, JsValue> {
    Ok(batch_request(form_json)?)
}

fn batch_request(form_json: &str) -> Outcome<String> {
    let form: BatchForm = parse_json("batch", form_json)?;
    let mut draft = BatchDraft::new();
    if let Some(reason) = form.reason {
        draft.reason = reason;
    }
    draft.reference = form.reference;
    for (index, line) in form.lines.into_iter().enumerate() {
        let line = BatchLineDraft {
            product_id: line.product_id,
            quantity: line.quantity,
            notes: line.notes,
        };
        match draft.line_mut(index) {
            Some(slot) => *slot = line,
            None => draft.push_line(line),
        }
    }
    to_json(&draft.build()?)
}

/// Build the `PATCH /products/{id}/stock` query for add, remove or set
#[wasm_bindgen]
pub fn build_stock_update(
    product_json: &str,
    operation: &str,
    quantity: i32,
    reason: Option<String>,
) -> Result<String, JsValue> {
    Ok(stock_update_request(product_json, operation, quantity, reason)?)
}

fn stock_update_request(
    product_json: &str,
    operation: &str,
    quantity: i32,
    reason: Option<String>,
) -> Outcome<String> {
    let product: Product = parse_json("product", product_json)?;
    let operation: StockOperation =
        serde_json::from_value(serde_json::Value::String(operation.to_string()))
            .map_err(|e| Failure::input("operation", e))?;

    let mut draft = StockUpdateDraft::for_product(&product, operation, quantity.into());
    draft.reason = reason
        .filter(|r| !r.is_empty())
        .map(|r| parse_reason(&r))
        .transpose()?;
    to_json(&draft.build()?)
}

/// Classified low-stock summary of a product list, as JSON
#[wasm_bindgen]
pub fn alert_summary(products_json: &str) -> Result<String, JsValue> {
    Ok(summarize(products_json)?)
}

fn summarize(products_json: &str) -> Outcome<String> {
    let products: Vec<Product> = parse_json("products", products_json)?;
    to_json(&AlertSummary::from_products(&products))
}

// ============================================================================
// Token storage
// ============================================================================

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[wasm_bindgen]
pub fn load_token() -> Option<String> {
    local_storage()?.get_item(TOKEN_STORAGE_KEY).ok().flatten()
}

#[wasm_bindgen]
pub fn save_token(token: &str) -> Result<(), JsValue> {
    let storage = local_storage().ok_or_else(|| JsValue::from_str("localStorage unavailable"))?;
    storage.set_item(TOKEN_STORAGE_KEY, token)
}

/// Forget the token, e.g. after the service answered 401
#[wasm_bindgen]
pub fn clear_token() {
    match local_storage() {
        Some(storage) => {
            if storage.remove_item(TOKEN_STORAGE_KEY).is_err() {
                web_sys::console::warn_1(&JsValue::from_str("failed to clear access token"));
            }
        }
        None => web_sys::console::warn_1(&JsValue::from_str("localStorage unavailable")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn product(id: i64, stock_current: i64, stock_min: i64) -> String {
        json!({
            "id": id,
            "sku": format!("SKU-{}", id),
            "name": "Beans",
            "stock_current": stock_current,
            "stock_min": stock_min,
            "cost": "6.00",
            "price": "9.00",
            "is_active": true,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
        })
        .to_string()
    }

    #[test]
    fn test_classify_stock() {
        assert_eq!(classify_stock(0, 0), "critical");
        assert_eq!(classify_stock(3, 5), "warning");
        assert_eq!(classify_stock(5, 5), "ok");
    }

    #[test]
    fn test_margin() {
        assert_eq!(margin("6.00", "9.00").unwrap(), "33.33");
        assert_eq!(margin("1", "0").unwrap(), "0");
        assert_eq!(margin("x", "1").unwrap_err().field, "cost");
    }

    #[test]
    fn test_movement_request_checks_cached_stock() {
        let form = r#"{"product_id": 4, "movement_type": "exit", "quantity": 6}"#;
        let err = movement_request(form, Some(product(4, 5, 1))).unwrap_err();
        assert_eq!(err.code, "INSUFFICIENT_STOCK");
        assert_eq!(err.field, "quantity");

        let ok = movement_request(form, Some(product(4, 6, 1))).unwrap();
        let body: Value = serde_json::from_str(&ok).unwrap();
        assert_eq!(body["reason"], json!("sale"));
        assert_eq!(body["reference"], Value::Null);
    }

    #[test]
    fn test_adjustment_request() {
        let err = adjustment_request(&product(2, 5, 1), r#"{"new_stock": 5}"#).unwrap_err();
        assert_eq!(err.code, "NO_CHANGE");

        let ok = adjustment_request(&product(2, 5, 1), r#"{"new_stock": 8}"#).unwrap();
        let body: Value = serde_json::from_str(&ok).unwrap();
        assert_eq!(body["new_stock"], json!(8));
        assert_eq!(body["reason"], json!("physical_count"));
    }

    #[test]
    fn test_batch_request_drops_incomplete_lines() {
        let form = r#"{
            "reference": "PO-7",
            "lines": [
                {"product_id": 1, "quantity": 3},
                {"product_id": null, "quantity": 2},
                {"product_id": 2, "quantity": 0}
            ]
        }"#;
        let body: Value = serde_json::from_str(&batch_request(form).unwrap()).unwrap();
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["reason"], json!("purchase"));

        let empty = r#"{"lines": [{"product_id": null, "quantity": 1}]}"#;
        assert_eq!(batch_request(empty).unwrap_err().code, "EMPTY_BATCH");
    }

    #[test]
    fn test_stock_update_request() {
        let body: Value = serde_json::from_str(
            &stock_update_request(&product(3, 10, 1), "remove", 4, None).unwrap(),
        )
        .unwrap();
        assert_eq!(body["quantity"], json!(-4));
        assert_eq!(body["reason"], json!("sale"));

        let err = stock_update_request(&product(3, 10, 1), "add", 1, Some("bogus".into()));
        assert_eq!(err.unwrap_err().field, "reason");
    }

    #[test]
    fn test_summarize() {
        let products = format!("[{}, {}]", product(1, 0, 2), product(2, 9, 2));
        let summary: AlertSummary = serde_json::from_str(&summarize(&products).unwrap()).unwrap();
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.warning_count, 0);
    }
}
