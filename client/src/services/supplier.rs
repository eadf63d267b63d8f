//! Supplier service

use shared::{validate_payload, Supplier, SupplierCreate, SupplierUpdate};

use crate::error::ClientResult;
use crate::http::ApiClient;

const BASE: &str = "/suppliers";

#[derive(Clone, Debug)]
pub struct SupplierService {
    api: ApiClient,
}

impl SupplierService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(
        &self,
        is_active: Option<bool>,
        with_product_count: bool,
    ) -> ClientResult<Vec<Supplier>> {
        let mut query = vec![("skip", "0".to_string()), ("limit", "500".to_string())];
        if let Some(active) = is_active {
            query.push(("is_active", active.to_string()));
        }
        if with_product_count {
            query.push(("with_product_count", "true".to_string()));
        }
        self.api.get(BASE, &query).await
    }

    pub async fn search(&self, term: &str) -> ClientResult<Vec<Supplier>> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.api
            .get(&format!("{}/search", BASE), &[("q", term.trim().to_string())])
            .await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Supplier> {
        self.api.get(&format!("{}/{}", BASE, id), &[]).await
    }

    pub async fn create(&self, data: &SupplierCreate) -> ClientResult<Supplier> {
        validate_payload(data)?;
        let supplier: Supplier = self.api.post(BASE, data).await?;
        tracing::info!(supplier_id = supplier.id, "supplier created");
        Ok(supplier)
    }

    pub async fn update(&self, id: i64, data: &SupplierUpdate) -> ClientResult<Supplier> {
        validate_payload(data)?;
        self.api.put(&format!("{}/{}", BASE, id), data).await
    }

    /// The service deactivates suppliers rather than removing them
    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.api.delete(&format!("{}/{}", BASE, id), &[]).await?;
        tracing::info!(supplier_id = id, "supplier deactivated");
        Ok(())
    }
}
