//! Inventory movement service

use shared::{
    BatchStockEntryRequest, InventoryMovement, InventoryStats, LowStockAlert, MovementCreate,
    MovementFilter, Page, Pagination, StockAdjustment, StockCheck,
};

use crate::error::ClientResult;
use crate::http::ApiClient;

const BASE: &str = "/inventory";

/// Default size of a product's movement history
pub const HISTORY_LIMIT: u32 = 50;

#[derive(Clone, Debug)]
pub struct InventoryService {
    api: ApiClient,
}

impl InventoryService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_movements(
        &self,
        pagination: Pagination,
        filter: &MovementFilter,
    ) -> ClientResult<Page<InventoryMovement>> {
        let mut query = filter.query_pairs();
        query.push(("page", pagination.page.to_string()));
        query.push(("page_size", pagination.page_size.to_string()));
        self.api.get(&format!("{}/movements", BASE), &query).await
    }

    pub async fn get_movement(&self, id: i64) -> ClientResult<InventoryMovement> {
        self.api
            .get(&format!("{}/movements/{}", BASE, id), &[])
            .await
    }

    pub async fn create_movement(&self, request: &MovementCreate) -> ClientResult<InventoryMovement> {
        let movement: InventoryMovement = self
            .api
            .post(&format!("{}/movements", BASE), request)
            .await?;
        tracing::info!(
            movement_id = movement.id,
            product_id = movement.product_id,
            movement_type = movement.movement_type.as_str(),
            quantity = movement.quantity,
            stock_after = movement.stock_after,
            "movement recorded"
        );
        Ok(movement)
    }

    pub async fn product_movements(
        &self,
        product_id: i64,
        limit: u32,
    ) -> ClientResult<Vec<InventoryMovement>> {
        self.api
            .get(
                &format!("{}/products/{}/movements", BASE, product_id),
                &[("limit", limit.to_string())],
            )
            .await
    }

    pub async fn adjust_stock(&self, request: &StockAdjustment) -> ClientResult<InventoryMovement> {
        let movement: InventoryMovement =
            self.api.post(&format!("{}/adjust", BASE), request).await?;
        tracing::info!(
            movement_id = movement.id,
            product_id = request.product_id,
            new_stock = request.new_stock,
            "stock adjusted"
        );
        Ok(movement)
    }

    /// One movement per submitted line; the call succeeds or fails as a whole
    pub async fn batch_entry(
        &self,
        request: &BatchStockEntryRequest,
    ) -> ClientResult<Vec<InventoryMovement>> {
        let movements: Vec<InventoryMovement> = self
            .api
            .post(&format!("{}/batch-entry", BASE), request)
            .await?;
        tracing::info!(
            lines = request.items.len(),
            movements = movements.len(),
            reference = request.reference.as_deref().unwrap_or(""),
            "batch entry recorded"
        );
        Ok(movements)
    }

    pub async fn low_stock_alerts(&self) -> ClientResult<LowStockAlert> {
        self.api
            .get(&format!("{}/alerts/low-stock", BASE), &[])
            .await
    }

    pub async fn stats(&self) -> ClientResult<InventoryStats> {
        self.api.get(&format!("{}/stats", BASE), &[]).await
    }

    pub async fn check_stock(&self, product_id: i64, quantity: i64) -> ClientResult<StockCheck> {
        self.api
            .get(
                &format!("{}/check-stock/{}", BASE, product_id),
                &[("quantity", quantity.to_string())],
            )
            .await
    }
}
