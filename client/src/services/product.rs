//! Product service

use shared::{
    normalize_sku, validate_payload, Page, Pagination, Product, ProductCreate, ProductFilter,
    ProductUpdate, ProductWithRelations, StockDeltaUpdate,
};

use crate::error::ClientResult;
use crate::http::ApiClient;

const BASE: &str = "/products";

#[derive(Clone, Debug)]
pub struct ProductService {
    api: ApiClient,
}

impl ProductService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(
        &self,
        pagination: Pagination,
        filter: &ProductFilter,
    ) -> ClientResult<Page<ProductWithRelations>> {
        let mut query = filter.query_pairs();
        query.push(("page", pagination.page.to_string()));
        query.push(("page_size", pagination.page_size.to_string()));
        self.api.get(BASE, &query).await
    }

    /// Every product matching `filter`, for pickers and the local cache
    pub async fn list_all(&self, filter: &ProductFilter) -> ClientResult<Vec<ProductWithRelations>> {
        let products = self.api.get_all_pages(BASE, &filter.query_pairs()).await?;
        tracing::debug!(count = products.len(), "products loaded");
        Ok(products)
    }

    pub async fn low_stock(&self, limit: u32) -> ClientResult<Vec<ProductWithRelations>> {
        self.api
            .get(&format!("{}/low-stock", BASE), &[("limit", limit.to_string())])
            .await
    }

    pub async fn get(&self, id: i64) -> ClientResult<ProductWithRelations> {
        self.api.get(&format!("{}/{}", BASE, id), &[]).await
    }

    pub async fn get_by_sku(&self, sku: &str) -> ClientResult<Product> {
        self.api
            .get(&format!("{}/sku/{}", BASE, normalize_sku(sku)), &[])
            .await
    }

    pub async fn create(&self, data: ProductCreate) -> ClientResult<Product> {
        let data = data.normalized();
        validate_payload(&data)?;
        let product: Product = self.api.post(BASE, &data).await?;
        tracing::info!(product_id = product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    pub async fn update(&self, id: i64, data: ProductUpdate) -> ClientResult<Product> {
        let data = data.normalized();
        validate_payload(&data)?;
        self.api.put(&format!("{}/{}", BASE, id), &data).await
    }

    /// Apply a signed stock change; the service records the movement
    pub async fn update_stock(&self, update: &StockDeltaUpdate) -> ClientResult<Product> {
        let product: Product = self
            .api
            .patch(
                &format!("{}/{}/stock", BASE, update.product_id),
                &update.query_pairs(),
            )
            .await?;
        tracing::info!(
            product_id = product.id,
            delta = update.quantity,
            reason = update.reason.as_str(),
            stock = product.stock_current,
            "stock updated"
        );
        Ok(product)
    }

    /// Soft delete deactivates the product; hard delete removes it
    pub async fn delete(&self, id: i64, soft: bool) -> ClientResult<()> {
        self.api
            .delete(&format!("{}/{}", BASE, id), &[("soft", soft.to_string())])
            .await?;
        tracing::info!(product_id = id, soft, "product deleted");
        Ok(())
    }
}
