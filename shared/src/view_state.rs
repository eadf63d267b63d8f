//! Projection of fetched inventory state into what the console shows
//!
//! Nothing here talks to the service. The console feeds fetched data and
//! submission events in, and executes the effects that come back out.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{LowStockAlert, Product, StockStatus};
use crate::types::{Page, Pagination, MAX_PAGE_SIZE};
use crate::validation::ValidationError;

/// Alert rows shown before the "+N more" indicator
pub const ALERT_DISPLAY_LIMIT: usize = 10;

// ============================================================================
// Low-stock alert
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertEntry {
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub stock_current: i64,
    pub stock_min: i64,
    pub deficit: i64,
    pub status: StockStatus,
}

/// Classified low-stock view with counts derived from its own rows
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertSummary {
    pub critical_count: usize,
    pub warning_count: usize,
    pub entries: Vec<AlertEntry>,
}

impl AlertSummary {
    pub fn from_products(products: &[Product]) -> Self {
        Self::from_entries(products.iter().map(|p| AlertEntry {
            product_id: p.id,
            sku: p.sku.clone(),
            name: p.name.clone(),
            stock_current: p.stock_current,
            stock_min: p.stock_min,
            deficit: p.deficit(),
            status: p.stock_status(),
        }))
    }

    /// Re-derive counts from the fetched rows rather than trusting the totals
    pub fn from_alert(alert: &LowStockAlert) -> Self {
        Self::from_entries(alert.products.iter().map(|row| AlertEntry {
            product_id: row.product_id,
            sku: row.sku.clone(),
            name: row.name.clone(),
            stock_current: row.stock_current,
            stock_min: row.stock_min,
            deficit: (row.stock_min - row.stock_current).max(0),
            status: StockStatus::classify(row.stock_current, row.stock_min),
        }))
    }

    fn from_entries(entries: impl Iterator<Item = AlertEntry>) -> Self {
        let mut entries: Vec<AlertEntry> = entries.filter(|e| e.status.is_flagged()).collect();
        // critical first, then emptiest first
        entries.sort_by(|a, b| {
            a.status
                .cmp(&b.status)
                .then(a.stock_current.cmp(&b.stock_current))
                .then(a.product_id.cmp(&b.product_id))
        });

        let critical_count = entries
            .iter()
            .filter(|e| e.status == StockStatus::Critical)
            .count();
        Self {
            critical_count,
            warning_count: entries.len() - critical_count,
            entries,
        }
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn visible(&self) -> &[AlertEntry] {
        &self.entries[..self.entries.len().min(ALERT_DISPLAY_LIMIT)]
    }

    pub fn hidden_count(&self) -> usize {
        self.entries.len().saturating_sub(ALERT_DISPLAY_LIMIT)
    }
}

// ============================================================================
// Invalidation
// ============================================================================

/// Views backed by the service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Movements,
    Stats,
    Alerts,
    Products,
}

/// The four mutations the console can submit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    CreateMovement,
    AdjustStock,
    BatchEntry,
    UpdateStock,
}

impl MutationKind {
    pub fn invalidation(&self) -> Invalidation {
        match self {
            MutationKind::CreateMovement | MutationKind::AdjustStock | MutationKind::BatchEntry => {
                Invalidation::AFTER_MOVEMENT
            }
            MutationKind::UpdateStock => Invalidation::AFTER_STOCK_UPDATE,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            MutationKind::CreateMovement => "Movement recorded",
            MutationKind::AdjustStock => "Stock adjusted",
            MutationKind::BatchEntry => "Batch entry recorded",
            MutationKind::UpdateStock => "Stock updated",
        }
    }
}

/// Set of views to refetch after a mutation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invalidation {
    pub movements: bool,
    pub stats: bool,
    pub alerts: bool,
    pub products: bool,
}

impl Invalidation {
    pub const NONE: Invalidation = Invalidation {
        movements: false,
        stats: false,
        alerts: false,
        products: false,
    };

    pub const AFTER_MOVEMENT: Invalidation = Invalidation {
        movements: true,
        stats: true,
        alerts: true,
        products: false,
    };

    pub const AFTER_STOCK_UPDATE: Invalidation = Invalidation {
        movements: false,
        stats: true,
        alerts: true,
        products: true,
    };

    pub fn contains(&self, view: View) -> bool {
        match view {
            View::Movements => self.movements,
            View::Stats => self.stats,
            View::Alerts => self.alerts,
            View::Products => self.products,
        }
    }

    pub fn union(self, other: Invalidation) -> Invalidation {
        Invalidation {
            movements: self.movements || other.movements,
            stats: self.stats || other.stats,
            alerts: self.alerts || other.alerts,
            products: self.products || other.products,
        }
    }

    pub fn views(&self) -> Vec<View> {
        [View::Movements, View::Stats, View::Alerts, View::Products]
            .into_iter()
            .filter(|v| self.contains(*v))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == Invalidation::NONE
    }
}

// ============================================================================
// Product cache
// ============================================================================

/// Local advisory copy of the product list
#[derive(Debug, Clone, Default)]
pub struct ProductCache {
    products: Vec<Product>,
    patched: HashSet<i64>,
}

impl ProductCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a full refetch; any optimistic patch is superseded
    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.products = products;
        self.patched.clear();
    }

    /// Set a product's stock ahead of the next refetch. Only used after a
    /// direct stock adjustment; returns false when the product is not cached.
    pub fn apply_optimistic_stock(&mut self, product_id: i64, new_stock: i64) -> bool {
        match self.products.iter_mut().find(|p| p.id == product_id) {
            Some(product) => {
                product.stock_current = new_stock;
                self.patched.insert(product_id);
                true
            }
            None => false,
        }
    }

    pub fn is_patched(&self, product_id: i64) -> bool {
        self.patched.contains(&product_id)
    }

    pub fn get(&self, product_id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn alert_summary(&self) -> AlertSummary {
        AlertSummary::from_products(&self.products)
    }
}

// ============================================================================
// Page accumulation
// ============================================================================

/// Collects every page of a listing until a short page arrives
#[derive(Debug, Clone)]
pub struct PageAccumulator<T> {
    items: Vec<T>,
    next: Pagination,
    complete: bool,
}

impl<T> PageAccumulator<T> {
    pub fn new() -> Self {
        Self::with_page_size(MAX_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            next: Pagination::new(1, page_size),
            complete: false,
        }
    }

    /// Parameters of the next page to fetch, `None` once complete
    pub fn next_request(&self) -> Option<Pagination> {
        if self.complete {
            None
        } else {
            Some(self.next)
        }
    }

    /// Add a fetched page; returns true when accumulation is complete
    pub fn push(&mut self, page: Page<T>) -> bool {
        if self.complete {
            return true;
        }
        let last = page.is_last(self.next.page_size);
        self.items.extend(page.items);
        if last {
            self.complete = true;
        } else {
            self.next = self.next.next();
        }
        self.complete
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Items are only handed out once every page is in
    pub fn into_items(self) -> Option<Vec<T>> {
        if self.complete {
            Some(self.items)
        } else {
            None
        }
    }
}

impl<T> Default for PageAccumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Submission state machine
// ============================================================================

/// Where a mutation form is in its submit cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Invalid { error: ValidationError },
    Submitting,
    /// Form dismissed; `in_flight` is set when a request is still pending
    Closed { in_flight: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPatch {
    pub product_id: i64,
    pub new_stock: i64,
}

/// A successful mutation and the data effects it carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub kind: MutationKind,
    pub stock_patch: Option<StockPatch>,
}

impl Outcome {
    pub fn new(kind: MutationKind) -> Self {
        Self {
            kind,
            stock_patch: None,
        }
    }

    pub fn stock_adjusted(product_id: i64, new_stock: i64) -> Self {
        Self {
            kind: MutationKind::AdjustStock,
            stock_patch: Some(StockPatch {
                product_id,
                new_stock,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    Submit,
    Validated,
    Rejected(ValidationError),
    Succeeded(Outcome),
    Failed(String),
    /// User edited the form after a validation error
    Edit,
    Close,
    Open,
}

/// Message for the form's user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Invalid(ValidationError),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Refetch(Invalidation),
    PatchStock(StockPatch),
    Notify(Notice),
    CloseForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SubmissionState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: SubmissionState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

fn data_effects(outcome: &Outcome) -> Vec<Effect> {
    let mut effects = Vec::new();
    if let Some(patch) = outcome.stock_patch {
        effects.push(Effect::PatchStock(patch));
    }
    effects.push(Effect::Refetch(outcome.kind.invalidation()));
    effects
}

impl SubmissionState {
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SubmissionState::Validating
                | SubmissionState::Submitting
                | SubmissionState::Closed { in_flight: true }
        )
    }

    /// Apply an event. Events that make no sense in the current state leave
    /// it unchanged with no effects.
    pub fn transition(&self, event: SubmissionEvent) -> Transition {
        use SubmissionEvent as E;
        use SubmissionState as S;

        match (self, event) {
            (S::Idle | S::Invalid { .. }, E::Submit) => Transition::to(S::Validating),
            (S::Invalid { .. }, E::Edit) => Transition::to(S::Idle),

            (S::Validating, E::Validated) => Transition::to(S::Submitting),
            (S::Validating, E::Rejected(error)) => Transition::to(S::Invalid {
                error: error.clone(),
            })
            .with(Effect::Notify(Notice::Invalid(error))),

            (S::Submitting, E::Succeeded(outcome)) => {
                let mut t = Transition::to(S::Idle);
                t.effects = data_effects(&outcome);
                t.with(Effect::Notify(Notice::Success(
                    outcome.kind.success_message().to_string(),
                )))
                .with(Effect::CloseForm)
            }
            (S::Submitting, E::Failed(message)) => {
                Transition::to(S::Idle).with(Effect::Notify(Notice::Error(message)))
            }

            // A late result still reconciles data but the form is gone
            (S::Closed { in_flight: true }, E::Succeeded(outcome)) => Transition {
                state: S::Closed { in_flight: false },
                effects: data_effects(&outcome),
            },
            (S::Closed { in_flight: true }, E::Failed(_)) => {
                Transition::to(S::Closed { in_flight: false })
            }

            (S::Closed { in_flight }, E::Open) => {
                if *in_flight {
                    Transition::to(S::Submitting)
                } else {
                    Transition::to(S::Idle)
                }
            }
            (S::Closed { .. }, E::Close) => Transition::to(self.clone()),
            (state, E::Close) => Transition::to(S::Closed {
                in_flight: matches!(state, S::Submitting),
            })
            .with(Effect::CloseForm),

            (state, _) => Transition::to(state.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::product;
    use crate::models::LowStockProduct;

    #[test]
    fn test_alert_summary_orders_and_counts() {
        let products = vec![
            product(1, 3, 10),
            product(2, 0, 5),
            product(3, 20, 10),
            product(4, 1, 10),
            product(5, 0, 0),
        ];
        let summary = AlertSummary::from_products(&products);

        assert_eq!(summary.critical_count, 2);
        assert_eq!(summary.warning_count, 2);
        let ids: Vec<i64> = summary.entries.iter().map(|e| e.product_id).collect();
        assert_eq!(ids, vec![2, 5, 4, 1]);
        assert_eq!(summary.entries[3].deficit, 7);
    }

    #[test]
    fn test_alert_summary_from_fetched_rows() {
        let alert = LowStockAlert {
            // stale totals are ignored
            critical_count: 9,
            warning_count: 9,
            products: vec![
                LowStockProduct {
                    product_id: 7,
                    sku: "A".to_string(),
                    name: "A".to_string(),
                    stock_current: 2,
                    stock_min: 4,
                    deficit: 0,
                    category_name: None,
                    supplier_name: None,
                },
                LowStockProduct {
                    product_id: 8,
                    sku: "B".to_string(),
                    name: "B".to_string(),
                    stock_current: 0,
                    stock_min: 4,
                    deficit: 4,
                    category_name: None,
                    supplier_name: None,
                },
            ],
        };
        let summary = AlertSummary::from_alert(&alert);
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.warning_count, 1);
        assert_eq!(summary.entries[0].product_id, 8);
        assert_eq!(summary.entries[1].deficit, 2);
    }

    #[test]
    fn test_alert_display_limit() {
        let products: Vec<Product> = (1..=13).map(|id| product(id, 1, 5)).collect();
        let summary = AlertSummary::from_products(&products);
        assert_eq!(summary.visible().len(), ALERT_DISPLAY_LIMIT);
        assert_eq!(summary.hidden_count(), 3);

        let few = AlertSummary::from_products(&products[..4]);
        assert_eq!(few.visible().len(), 4);
        assert_eq!(few.hidden_count(), 0);
    }

    #[test]
    fn test_invalidation_per_mutation() {
        for kind in [
            MutationKind::CreateMovement,
            MutationKind::AdjustStock,
            MutationKind::BatchEntry,
        ] {
            assert_eq!(
                kind.invalidation().views(),
                vec![View::Movements, View::Stats, View::Alerts]
            );
        }
        assert_eq!(
            MutationKind::UpdateStock.invalidation().views(),
            vec![View::Stats, View::Alerts, View::Products]
        );
        assert!(Invalidation::NONE.is_empty());
        assert_eq!(
            Invalidation::AFTER_MOVEMENT
                .union(Invalidation::AFTER_STOCK_UPDATE)
                .views()
                .len(),
            4
        );
    }

    #[test]
    fn test_product_cache_optimistic_patch() {
        let mut cache = ProductCache::new();
        cache.replace_all(vec![product(1, 5, 2), product(2, 9, 2)]);

        assert!(cache.apply_optimistic_stock(1, 12));
        assert!(!cache.apply_optimistic_stock(99, 1));
        assert_eq!(cache.get(1).unwrap().stock_current, 12);
        assert!(cache.is_patched(1));
        assert!(!cache.is_patched(2));

        cache.replace_all(vec![product(1, 11, 2)]);
        assert!(!cache.is_patched(1));
        assert_eq!(cache.get(1).unwrap().stock_current, 11);
        assert!(cache.get(2).is_none());
    }

    fn page_of(ids: std::ops::Range<i64>) -> Page<i64> {
        let items: Vec<i64> = ids.collect();
        Page {
            total: 0,
            page: 1,
            page_size: MAX_PAGE_SIZE,
            pages: 0,
            items,
        }
    }

    #[test]
    fn test_page_accumulation_stops_on_short_page() {
        let mut acc = PageAccumulator::new();
        assert_eq!(acc.next_request(), Some(Pagination::new(1, 100)));

        assert!(!acc.push(page_of(0..100)));
        assert_eq!(acc.next_request().unwrap().page, 2);
        assert!(acc.clone().into_items().is_none());

        assert!(acc.push(page_of(100..130)));
        assert_eq!(acc.next_request(), None);
        assert_eq!(acc.into_items().unwrap().len(), 130);
    }

    #[test]
    fn test_page_accumulation_empty_first_page() {
        let mut acc: PageAccumulator<i64> = PageAccumulator::new();
        assert!(acc.push(page_of(0..0)));
        assert_eq!(acc.into_items(), Some(vec![]));
    }

    #[test]
    fn test_submission_happy_path() {
        let state = SubmissionState::Idle;
        let t = state.transition(SubmissionEvent::Submit);
        assert_eq!(t.state, SubmissionState::Validating);
        let t = t.state.transition(SubmissionEvent::Validated);
        assert_eq!(t.state, SubmissionState::Submitting);
        assert!(t.state.is_busy());

        let t = t
            .state
            .transition(SubmissionEvent::Succeeded(Outcome::stock_adjusted(3, 12)));
        assert_eq!(t.state, SubmissionState::Idle);
        assert_eq!(
            t.effects,
            vec![
                Effect::PatchStock(StockPatch {
                    product_id: 3,
                    new_stock: 12
                }),
                Effect::Refetch(Invalidation::AFTER_MOVEMENT),
                Effect::Notify(Notice::Success("Stock adjusted".to_string())),
                Effect::CloseForm,
            ]
        );
    }

    #[test]
    fn test_submission_invalid_then_edit() {
        let t = SubmissionState::Validating
            .transition(SubmissionEvent::Rejected(ValidationError::InvalidQuantity));
        assert_eq!(
            t.state,
            SubmissionState::Invalid {
                error: ValidationError::InvalidQuantity
            }
        );
        assert_eq!(
            t.effects,
            vec![Effect::Notify(Notice::Invalid(ValidationError::InvalidQuantity))]
        );
        assert_eq!(
            t.state.transition(SubmissionEvent::Edit).state,
            SubmissionState::Idle
        );
    }

    #[test]
    fn test_submission_failure_keeps_form_open() {
        let t = SubmissionState::Submitting
            .transition(SubmissionEvent::Failed("Insufficient stock".to_string()));
        assert_eq!(t.state, SubmissionState::Idle);
        assert_eq!(
            t.effects,
            vec![Effect::Notify(Notice::Error("Insufficient stock".to_string()))]
        );
    }

    #[test]
    fn test_result_after_close_applies_data_only() {
        let t = SubmissionState::Submitting.transition(SubmissionEvent::Close);
        assert_eq!(t.state, SubmissionState::Closed { in_flight: true });

        let t = t
            .state
            .transition(SubmissionEvent::Succeeded(Outcome::new(MutationKind::UpdateStock)));
        assert_eq!(t.state, SubmissionState::Closed { in_flight: false });
        assert_eq!(
            t.effects,
            vec![Effect::Refetch(Invalidation::AFTER_STOCK_UPDATE)]
        );

        let t = SubmissionState::Closed { in_flight: true }
            .transition(SubmissionEvent::Failed("boom".to_string()));
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_double_submit_is_ignored() {
        let t = SubmissionState::Submitting.transition(SubmissionEvent::Submit);
        assert_eq!(t.state, SubmissionState::Submitting);
        assert!(t.effects.is_empty());
    }
}
