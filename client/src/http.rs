//! HTTP client for the inventory service
//!
//! One `reqwest::Client` with fixed timeouts, shared by every service. No
//! retries: a failed call is reported once.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use shared::{Page, PageAccumulator};

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::middleware;
use crate::session::Session;

pub const API_PREFIX: &str = "/api/v1";

pub type Query = [(&'static str, String)];

/// Inventory service client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<Session>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "sending request");
        middleware::authorize(self.client.request(method, url), &self.session)
    }

    async fn execute(&self, request: RequestBuilder) -> ClientResult<reqwest::Response> {
        let request = request
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let authenticated = request.headers().contains_key(AUTHORIZATION);
        let response = self.client.execute(request).await.map_err(|e| {
            tracing::warn!(error = %e, "request failed without a response");
            ClientError::Network(e.to_string())
        })?;
        middleware::check_response(response, &self.session, authenticated).await
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.execute(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &Query) -> ClientResult<T> {
        self.execute_json(self.request(Method::GET, path).query(query))
            .await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(self.request(Method::POST, path).json(body))
            .await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(self.request(Method::PUT, path).json(body))
            .await
    }

    /// PATCH with parameters in the query string and no body
    pub async fn patch<T: DeserializeOwned>(&self, path: &str, query: &Query) -> ClientResult<T> {
        self.execute_json(self.request(Method::PATCH, path).query(query))
            .await
    }

    pub async fn delete(&self, path: &str, query: &Query) -> ClientResult<()> {
        self.execute(self.request(Method::DELETE, path).query(query))
            .await?;
        Ok(())
    }

    /// Fetch every page of a paginated listing, stopping at the first short page
    pub async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> ClientResult<Vec<T>> {
        let mut pages = PageAccumulator::new();
        while let Some(next) = pages.next_request() {
            let mut params = query.to_vec();
            params.push(("page", next.page.to_string()));
            params.push(("page_size", next.page_size.to_string()));
            let page: Page<T> = self.get(path, &params).await?;
            tracing::debug!(path, page = next.page, items = page.items.len(), "page fetched");
            pages.push(page);
        }
        pages
            .into_items()
            .ok_or_else(|| ClientError::Decode("page accumulation did not complete".to_string()))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
