use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::catalog::{CatalogError, ProductCatalog, ValidatedProduct};
use crate::domain::order::{
    aggregate, distinct, transition, CreateOrder, OrderError, OrderStatus, OrderStatusSet,
    Pagination, ProductId,
};
use crate::metrics::Metrics;
use crate::models::{Order, OrderDetail, OrderWithItems};
use crate::store::{NewOrder, OrderStore, Page, StoreError};

// ============================================================================
// Order Service - composition root for the public order operations
// ============================================================================
//
// Orchestrates:
//   create        → catalog → aggregator → store (one transaction) → names
//   find_all      → store
//   find_one      → store → catalog (current names)
//   change_status → store → status machine → store (only when changed)
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Order with id: {0} not found")]
    OrderNotFound(Uuid),

    /// Opaque on purpose: the cause is logged, never returned
    #[error("Check logs")]
    OrderCreationFailed,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Order store failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::OrderNotFound(id),
            other => ServiceError::Store(other),
        }
    }
}

/// Everything that can go wrong while creating an order
#[derive(Debug, thiserror::Error)]
enum CreateFailure {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Aggregation(#[from] OrderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CreateFailure {
    fn reason(&self) -> &'static str {
        match self {
            CreateFailure::Catalog(_) => "catalog",
            CreateFailure::Aggregation(_) => "aggregation",
            CreateFailure::Store(_) => "store",
        }
    }
}

pub struct OrderService {
    store: Arc<dyn OrderStore>,
    catalog: Arc<dyn ProductCatalog>,
    statuses: OrderStatusSet,
    metrics: Arc<Metrics>,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn OrderStore>,
        catalog: Arc<dyn ProductCatalog>,
        statuses: OrderStatusSet,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            store,
            catalog,
            statuses,
            metrics,
        }
    }

    pub fn statuses(&self) -> &OrderStatusSet {
        &self.statuses
    }

    /// Create an order from already validated input.
    ///
    /// Catalog, aggregation and store failures all collapse into
    /// `OrderCreationFailed`; the cause only reaches the logs.
    pub async fn create(&self, request: CreateOrder) -> Result<OrderDetail, ServiceError> {
        match self.try_create(&request).await {
            Ok(detail) => {
                self.metrics.record_order_created();
                tracing::info!(
                    order_id = %detail.order.id,
                    total_amount = %detail.order.total_amount,
                    total_items = detail.order.total_items,
                    "Order created"
                );
                Ok(detail)
            }
            Err(failure) => {
                self.metrics.record_order_creation_failure(failure.reason());
                tracing::error!(
                    error = %failure,
                    reason = failure.reason(),
                    item_count = request.items.len(),
                    "Order creation failed"
                );
                Err(ServiceError::OrderCreationFailed)
            }
        }
    }

    async fn try_create(&self, request: &CreateOrder) -> Result<OrderDetail, CreateFailure> {
        let product_ids = request.distinct_product_ids();
        let products = self.validate_products(&product_ids).await?;

        let totals = aggregate(&request.items, &products)?;

        let record = self
            .store
            .create_with_items(NewOrder {
                total_amount: totals.total_amount,
                total_items: totals.total_items,
                status: self.statuses.initial().clone(),
                items: totals.items,
            })
            .await?;

        Ok(OrderDetail::with_names(record, |id| name_of(&products, id)))
    }

    pub async fn find_all(&self, pagination: &Pagination) -> Result<Page<Order>, ServiceError> {
        Ok(self.store.find_page(pagination).await?)
    }

    /// Fetch an order and attach the products' current names
    pub async fn find_one(&self, id: Uuid) -> Result<OrderDetail, ServiceError> {
        let record = self.store.find_by_id(id).await?;

        let product_ids = distinct(record.items.iter().map(|i| i.product_id));
        let products = if product_ids.is_empty() {
            Vec::new()
        } else {
            self.validate_products(&product_ids).await?
        };

        Ok(OrderDetail::with_names(record, |id| name_of(&products, id)))
    }

    pub async fn change_status(
        &self,
        id: Uuid,
        requested: OrderStatus,
    ) -> Result<OrderWithItems, ServiceError> {
        let current = self.store.find_by_id(id).await?;

        let outcome = transition(&current.order.status, &requested);
        if !outcome.changed {
            tracing::debug!(order_id = %id, status = %outcome.status, "Status unchanged");
            return Ok(current);
        }

        let order = self.store.update_status(id, &outcome.status).await?;
        self.metrics
            .record_status_change(current.order.status.as_str(), order.status.as_str());

        tracing::info!(
            order_id = %id,
            from = %current.order.status,
            to = %order.status,
            "Order status changed"
        );

        Ok(OrderWithItems {
            order,
            items: current.items,
        })
    }

    async fn validate_products(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<ValidatedProduct>, CatalogError> {
        let started = Instant::now();
        let result = self.catalog.validate(ids).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(CatalogError::UpstreamUnavailable(_)) => "unavailable",
            Err(CatalogError::ValidationRejected(_)) => "rejected",
        };
        self.metrics
            .record_catalog_request(outcome, started.elapsed().as_secs_f64());

        result
    }
}

fn name_of(products: &[ValidatedProduct], id: ProductId) -> Option<&str> {
    products.iter().find(|p| p.id == id).map(|p| p.name.as_str())
}
