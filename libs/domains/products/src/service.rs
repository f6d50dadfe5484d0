//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::context::RequestContext;
use crate::error::{ProductError, ProductResult};
use crate::filter::{normalize, RawFilter};
use crate::models::{Product, ProductPage, ProductPayload};
use crate::pagination::{paginate, Pagination};
use crate::query::QueryBuilder;
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Parses identifiers, validates payloads and turns listing parameters into a
/// storage query before anything reaches the repository.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    query_builder: QueryBuilder,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            query_builder: self.query_builder,
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the default search radius
    pub fn new(repository: R) -> Self {
        Self::with_query_builder(repository, QueryBuilder::default())
    }

    pub fn with_search_radius(repository: R, radius_meters: f64) -> Self {
        Self::with_query_builder(repository, QueryBuilder::new(radius_meters))
    }

    pub fn with_query_builder(repository: R, query_builder: QueryBuilder) -> Self {
        Self {
            repository: Arc::new(repository),
            query_builder,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Get a product by ID
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn get_product(&self, ctx: &RequestContext, id: &str) -> ProductResult<Product> {
        let id = parse_id(id)?;
        self.repository
            .find(ctx, id)
            .await
            .map_err(|e| e.within("find", Some(id)))
    }

    /// List one page of products matching the query-string filter
    #[instrument(skip(self, ctx, raw), fields(request_id = %ctx.request_id()))]
    pub async fn list_products(&self, ctx: &RequestContext, raw: RawFilter) -> ProductResult<ProductPage> {
        let filter = normalize(raw)?;
        let query = self.query_builder.build(&filter);
        let window = Pagination::window(filter.page(), filter.limit());

        let (items, total_items) = self
            .repository
            .find_all(ctx, &query, window.skip, window.take)
            .await
            .map_err(|e| e.within("find_all", None))?;

        let pagination = paginate(filter.page(), filter.limit(), total_items);
        debug!(
            total_items,
            page = pagination.meta.page,
            total_pages = pagination.meta.total_pages,
            "Listed products"
        );
        Ok(ProductPage {
            items,
            pagination: pagination.meta,
        })
    }

    /// Create a new product
    #[instrument(skip(self, ctx, payload), fields(request_id = %ctx.request_id(), product_name = %payload.name))]
    pub async fn create_product(&self, ctx: &RequestContext, payload: ProductPayload) -> ProductResult<Product> {
        payload.validate()?;
        self.repository
            .store(ctx, payload)
            .await
            .map_err(|e| e.within("store", None))
    }

    /// Replace every mutable field of an existing product
    #[instrument(skip(self, ctx, payload), fields(request_id = %ctx.request_id()))]
    pub async fn update_product(
        &self,
        ctx: &RequestContext,
        id: &str,
        payload: ProductPayload,
    ) -> ProductResult<Product> {
        let id = parse_id(id)?;
        payload.validate()?;

        let replacement = Product::with_id(id, payload);
        self.repository
            .update(ctx, &replacement)
            .await
            .map_err(|e| e.within("update", Some(id)))
    }

    /// Delete a product
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn delete_product(&self, ctx: &RequestContext, id: &str) -> ProductResult<()> {
        let id = parse_id(id)?;
        self.repository
            .delete_by_id(ctx, id)
            .await
            .map_err(|e| e.within("delete", Some(id)))
    }
}

fn parse_id(raw: &str) -> ProductResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ProductError::MalformedIdentifier(raw.to_string()))
}
