use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductPayload};
use crate::query::ProductQuery;
use crate::repository::ProductRepository;

/// Process-local repository. Reads share the lock; writes hold it exclusively,
/// so each call observes and produces a consistent map.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store, keyed by each product's own id
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: RwLock::new(products.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    async fn find(&self, ctx: &RequestContext, id: Uuid) -> ProductResult<Product> {
        ctx.run("find", async {
            self.products
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or(ProductError::NotFound(id))
        })
        .await
    }

    #[instrument(skip(self, ctx, query), fields(request_id = %ctx.request_id()))]
    async fn find_all(
        &self,
        ctx: &RequestContext,
        query: &ProductQuery,
        skip: u64,
        take: u64,
    ) -> ProductResult<(Vec<Product>, u64)> {
        ctx.run("find_all", async {
            let products = self.products.read().await;
            let mut matching: Vec<&Product> =
                products.values().filter(|p| query.matches(p)).collect();
            matching.sort_by(|a, b| query.compare(a, b));

            let total = matching.len() as u64;
            let page = matching
                .into_iter()
                .skip(usize::try_from(skip).unwrap_or(usize::MAX))
                .take(usize::try_from(take).unwrap_or(usize::MAX))
                .cloned()
                .collect::<Vec<_>>();
            debug!(total, returned = page.len(), "Listed products");
            Ok((page, total))
        })
        .await
    }

    #[instrument(skip(self, ctx, payload), fields(request_id = %ctx.request_id()))]
    async fn store(&self, ctx: &RequestContext, payload: ProductPayload) -> ProductResult<Product> {
        ctx.run("store", async {
            let product = Product::new(payload);
            self.products
                .write()
                .await
                .insert(product.id, product.clone());
            debug!(product_id = %product.id, "Stored product");
            Ok(product)
        })
        .await
    }

    #[instrument(skip(self, ctx, product), fields(request_id = %ctx.request_id(), product_id = %product.id))]
    async fn update(&self, ctx: &RequestContext, product: &Product) -> ProductResult<Product> {
        ctx.run("update", async {
            let mut products = self.products.write().await;
            match products.get_mut(&product.id) {
                Some(stored) => {
                    stored.replace_with(product);
                    Ok(stored.clone())
                }
                None => Err(ProductError::NotFound(product.id)),
            }
        })
        .await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    async fn delete_by_id(&self, ctx: &RequestContext, id: Uuid) -> ProductResult<()> {
        ctx.run("delete", async {
            self.products
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or(ProductError::NotFound(id))
        })
        .await
    }
}
