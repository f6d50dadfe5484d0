use async_trait::async_trait;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::ProductResult;
use crate::models::{Product, ProductPayload};
use crate::query::ProductQuery;

/// Storage contract for products.
///
/// Every call runs under `ctx`; a cancelled or expired context yields
/// `ProductError::Cancelled` and a call that never started has no effect.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// `NotFound` when no product has `id`
    async fn find(&self, ctx: &RequestContext, id: Uuid) -> ProductResult<Product>;

    /// One page of products matching `query`, in its sort order, plus the
    /// number of matches overall. Both come from the same snapshot.
    async fn find_all(
        &self,
        ctx: &RequestContext,
        query: &ProductQuery,
        skip: u64,
        take: u64,
    ) -> ProductResult<(Vec<Product>, u64)>;

    /// Persists a new product under a freshly assigned id.
    async fn store(&self, ctx: &RequestContext, payload: ProductPayload) -> ProductResult<Product>;

    /// Replaces the mutable fields of the product with `product.id`, keeping
    /// its `created_at`, and returns the stored result. `NotFound` leaves the
    /// store untouched.
    async fn update(&self, ctx: &RequestContext, product: &Product) -> ProductResult<Product>;

    async fn delete_by_id(&self, ctx: &RequestContext, id: Uuid) -> ProductResult<()>;
}
