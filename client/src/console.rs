//! Inventory console container
//!
//! Drives each mutation through validate, build, call and reconcile. Local
//! views are never spliced; after a mutation the affected views are
//! refetched, with the single exception of the optimistic stock patch after
//! a direct adjustment.

use std::sync::Arc;

use shared::{
    AdjustmentDraft, AlertSummary, BatchDraft, Effect, InventoryMovement, InventoryStats,
    Invalidation, MovementDraft, MovementFilter, MutationKind, Notice, Outcome, Page, Pagination,
    Product, ProductCache, ProductFilter, StockUpdateDraft, SubmissionEvent, SubmissionState,
    ValidationResult,
};

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;
use crate::services::{InventoryService, ProductService};
use crate::session::Session;

/// Console state and the services it talks to
pub struct InventoryConsole {
    inventory: InventoryService,
    products: ProductService,
    cache: ProductCache,
    alerts: AlertSummary,
    stats: Option<InventoryStats>,
    movements: Option<Page<InventoryMovement>>,
    movement_filter: MovementFilter,
    movement_page: Pagination,
    submission: SubmissionState,
    form_open: bool,
    notices: Vec<Notice>,
}

impl InventoryConsole {
    pub fn new(api: ApiClient) -> Self {
        Self {
            inventory: InventoryService::new(api.clone()),
            products: ProductService::new(api),
            cache: ProductCache::new(),
            alerts: AlertSummary::default(),
            stats: None,
            movements: None,
            movement_filter: MovementFilter::default(),
            movement_page: Pagination::default(),
            submission: SubmissionState::Idle,
            form_open: false,
            notices: Vec::new(),
        }
    }

    pub fn from_config(config: &Config, session: Arc<Session>) -> ClientResult<Self> {
        Ok(Self::new(ApiClient::new(&config.api, session)?))
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    pub fn products(&self) -> &ProductCache {
        &self.cache
    }

    pub fn alerts(&self) -> &AlertSummary {
        &self.alerts
    }

    pub fn stats(&self) -> Option<&InventoryStats> {
        self.stats.as_ref()
    }

    pub fn movements(&self) -> Option<&Page<InventoryMovement>> {
        self.movements.as_ref()
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    /// Notices produced since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn set_movement_filter(&mut self, filter: MovementFilter, pagination: Pagination) {
        self.movement_filter = filter;
        self.movement_page = pagination;
    }

    /// Load every view from scratch
    pub async fn load(&mut self) -> ClientResult<()> {
        self.load_products().await?;
        self.load_movements().await?;
        self.load_stats().await?;
        self.load_alerts().await
    }

    /// Replace the product cache with every page of the catalog
    pub async fn load_products(&mut self) -> ClientResult<()> {
        let products = self.products.list_all(&ProductFilter::default()).await?;
        self.cache
            .replace_all(products.into_iter().map(Product::from).collect());
        Ok(())
    }

    pub async fn load_movements(&mut self) -> ClientResult<()> {
        let page = self
            .inventory
            .list_movements(self.movement_page, &self.movement_filter)
            .await?;
        self.movements = Some(page);
        Ok(())
    }

    pub async fn load_stats(&mut self) -> ClientResult<()> {
        self.stats = Some(self.inventory.stats().await?);
        Ok(())
    }

    pub async fn load_alerts(&mut self) -> ClientResult<()> {
        let alert = self.inventory.low_stock_alerts().await?;
        self.alerts = AlertSummary::from_alert(&alert);
        Ok(())
    }

    /// Refetch the views in `invalidation`. A failed refetch is logged and
    /// leaves that view stale; the mutation that caused it already succeeded.
    pub async fn refresh(&mut self, invalidation: Invalidation) {
        if invalidation.products {
            if let Err(e) = self.load_products().await {
                tracing::warn!(error = %e, "failed to refresh products");
            }
        }
        if invalidation.movements {
            if let Err(e) = self.load_movements().await {
                tracing::warn!(error = %e, "failed to refresh movements");
            }
        }
        if invalidation.stats {
            if let Err(e) = self.load_stats().await {
                tracing::warn!(error = %e, "failed to refresh stats");
            }
        }
        if invalidation.alerts {
            if let Err(e) = self.load_alerts().await {
                tracing::warn!(error = %e, "failed to refresh alerts");
            }
        }
    }

    // ------------------------------------------------------------------------
    // Form lifecycle
    // ------------------------------------------------------------------------

    pub fn open_form(&mut self) {
        self.form_open = true;
        self.submission = self.submission.transition(SubmissionEvent::Open).state;
    }

    /// Discard the form; a result still in flight only updates data
    pub fn close_form(&mut self) {
        let transition = self.submission.transition(SubmissionEvent::Close);
        self.submission = transition.state;
        self.form_open = false;
    }

    /// Clear a validation error after the user edits the form
    pub fn edit_form(&mut self) {
        self.submission = self.submission.transition(SubmissionEvent::Edit).state;
    }

    /// Feed one event through the state machine and carry out its effects
    pub async fn dispatch(&mut self, event: SubmissionEvent) {
        let transition = self.submission.transition(event);
        self.submission = transition.state;
        for effect in transition.effects {
            match effect {
                Effect::PatchStock(patch) => {
                    if !self
                        .cache
                        .apply_optimistic_stock(patch.product_id, patch.new_stock)
                    {
                        tracing::debug!(product_id = patch.product_id, "patched product not cached");
                    }
                }
                Effect::Refetch(invalidation) => self.refresh(invalidation).await,
                Effect::Notify(notice) => self.notices.push(notice),
                Effect::CloseForm => self.form_open = false,
            }
        }
    }

    fn begin(&mut self) {
        // Only a dropped submission future can leave the machine busy here
        if self.submission.is_busy() {
            tracing::warn!(state = ?self.submission, "previous submission never finished");
            self.submission = SubmissionState::Idle;
        }
        if !self.form_open {
            self.open_form();
        }
        self.submission = self.submission.transition(SubmissionEvent::Submit).state;
    }

    async fn validated<T>(&mut self, built: ValidationResult<T>) -> ClientResult<T> {
        match built {
            Ok(request) => {
                self.dispatch(SubmissionEvent::Validated).await;
                Ok(request)
            }
            Err(err) => {
                tracing::debug!(code = err.code(), "submission rejected before sending");
                self.dispatch(SubmissionEvent::Rejected(err.clone())).await;
                Err(ClientError::Validation(err))
            }
        }
    }

    async fn finish<T>(
        &mut self,
        result: ClientResult<T>,
        outcome: impl FnOnce(&T) -> Outcome,
    ) -> ClientResult<T> {
        match result {
            Ok(value) => {
                self.dispatch(SubmissionEvent::Succeeded(outcome(&value)))
                    .await;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(code = err.code(), error = %err, "submission failed");
                self.dispatch(SubmissionEvent::Failed(err.user_message()))
                    .await;
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    pub async fn create_movement(&mut self, draft: &MovementDraft) -> ClientResult<InventoryMovement> {
        self.begin();
        let cached = draft.product_id.and_then(|id| self.cache.get(id));
        let built = draft.build(cached);
        let request = self.validated(built).await?;
        let result = self.inventory.create_movement(&request).await;
        self.finish(result, |_| Outcome::new(MutationKind::CreateMovement))
            .await
    }

    /// Set an absolute stock level. On success the cached product shows the
    /// new stock right away.
    pub async fn adjust_stock(&mut self, draft: &AdjustmentDraft) -> ClientResult<InventoryMovement> {
        self.begin();
        let request = self.validated(draft.build()).await?;
        let result = self.inventory.adjust_stock(&request).await;
        self.finish(result, |_| {
            Outcome::stock_adjusted(request.product_id, request.new_stock)
        })
        .await
    }

    pub async fn batch_entry(&mut self, draft: &BatchDraft) -> ClientResult<Vec<InventoryMovement>> {
        self.begin();
        if draft.dropped_count() > 0 {
            tracing::debug!(dropped = draft.dropped_count(), "batch lines left out");
        }
        let request = self.validated(draft.build()).await?;
        let result = self.inventory.batch_entry(&request).await;
        self.finish(result, |_| Outcome::new(MutationKind::BatchEntry))
            .await
    }

    pub async fn update_stock(&mut self, draft: &StockUpdateDraft) -> ClientResult<Product> {
        self.begin();
        let request = self.validated(draft.build()).await?;
        let result = self.products.update_stock(&request).await;
        self.finish(result, |_| Outcome::new(MutationKind::UpdateStock))
            .await
    }
}
