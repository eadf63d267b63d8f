//! Category service

use shared::{validate_payload, Category, CategoryCreate, CategoryUpdate};

use crate::error::ClientResult;
use crate::http::ApiClient;

const BASE: &str = "/categories";

#[derive(Clone, Debug)]
pub struct CategoryService {
    api: ApiClient,
}

impl CategoryService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, with_product_count: bool) -> ClientResult<Vec<Category>> {
        let mut query = vec![("skip", "0".to_string()), ("limit", "500".to_string())];
        if with_product_count {
            query.push(("with_product_count", "true".to_string()));
        }
        self.api.get(BASE, &query).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Category> {
        self.api.get(&format!("{}/{}", BASE, id), &[]).await
    }

    pub async fn create(&self, data: &CategoryCreate) -> ClientResult<Category> {
        validate_payload(data)?;
        let category: Category = self.api.post(BASE, data).await?;
        tracing::info!(category_id = category.id, "category created");
        Ok(category)
    }

    pub async fn update(&self, id: i64, data: &CategoryUpdate) -> ClientResult<Category> {
        validate_payload(data)?;
        self.api.put(&format!("{}/{}", BASE, id), data).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.api.delete(&format!("{}/{}", BASE, id), &[]).await?;
        tracing::info!(category_id = id, "category deleted");
        Ok(())
    }
}
