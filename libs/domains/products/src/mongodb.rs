//! MongoDB implementation of [`ProductRepository`]

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, spec::BinarySubtype, to_bson, Binary, Bson, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use serde::Deserialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::{ProductError, ProductResult};
use crate::models::{timestamp, Product, ProductPayload};
use crate::query::{ProductQuery, SortOrder};
use crate::repository::ProductRepository;

pub const DEFAULT_COLLECTION: &str = "products";

const DISTANCE_FIELD: &str = "distance_meters";

/// Products stored one document per product, keyed by `_id`.
///
/// Geo listings use `$geoNear`, which needs the `2dsphere` index created by
/// [`init_indexes`](Self::init_indexes).
#[derive(Debug, Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

#[derive(Debug, Deserialize)]
struct FacetPage {
    #[serde(default)]
    items: Vec<Product>,
    #[serde(default)]
    total: Vec<FacetCount>,
}

#[derive(Debug, Deserialize)]
struct FacetCount {
    count: u64,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Product>(collection_name),
        }
    }

    /// Creates the geo and recency indexes. Idempotent.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "location": "2dsphere" })
                .options(
                    IndexOptions::builder()
                        .name("idx_location_2dsphere".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "created_at": -1, "_id": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at_desc".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        info!(collection = %self.collection.name(), "Product indexes ensured");
        Ok(())
    }

    async fn find_inner(&self, id: Uuid) -> ProductResult<Product> {
        self.collection
            .find_one(id_filter(id))
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    async fn find_all_inner(
        &self,
        query: &ProductQuery,
        skip: u64,
        take: u64,
    ) -> ProductResult<(Vec<Product>, u64)> {
        let mut cursor = self
            .collection
            .aggregate(list_pipeline(query, skip, take))
            .with_type::<FacetPage>()
            .await?;

        let Some(page) = cursor.try_next().await? else {
            return Ok((Vec::new(), 0));
        };
        let total = page.total.first().map_or(0, |c| c.count);
        debug!(total, returned = page.items.len(), "Listed products");
        Ok((page.items, total))
    }

    async fn store_inner(&self, payload: ProductPayload) -> ProductResult<Product> {
        let product = Product::new(payload);
        self.collection.insert_one(&product).await?;
        info!(product_id = %product.id, "Product stored");
        Ok(product)
    }

    async fn update_inner(&self, product: &Product) -> ProductResult<Product> {
        self.collection
            .find_one_and_update(id_filter(product.id), replacement_update(product)?)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(ProductError::NotFound(product.id))
    }

    async fn delete_inner(&self, id: Uuid) -> ProductResult<()> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        if result.deleted_count == 0 {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    async fn find(&self, ctx: &RequestContext, id: Uuid) -> ProductResult<Product> {
        ctx.run("find", self.find_inner(id)).await
    }

    #[instrument(skip(self, ctx, query), fields(request_id = %ctx.request_id()))]
    async fn find_all(
        &self,
        ctx: &RequestContext,
        query: &ProductQuery,
        skip: u64,
        take: u64,
    ) -> ProductResult<(Vec<Product>, u64)> {
        ctx.run("find_all", self.find_all_inner(query, skip, take))
            .await
    }

    #[instrument(skip(self, ctx, payload), fields(request_id = %ctx.request_id()))]
    async fn store(&self, ctx: &RequestContext, payload: ProductPayload) -> ProductResult<Product> {
        ctx.run("store", self.store_inner(payload)).await
    }

    #[instrument(skip(self, ctx, product), fields(request_id = %ctx.request_id(), product_id = %product.id))]
    async fn update(&self, ctx: &RequestContext, product: &Product) -> ProductResult<Product> {
        ctx.run("update", self.update_inner(product)).await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    async fn delete_by_id(&self, ctx: &RequestContext, id: Uuid) -> ProductResult<()> {
        ctx.run("delete", self.delete_inner(id)).await
    }
}

/// `_id` as `insert_one` writes it: the raw serializer stores a `Uuid` as
/// generic-subtype binary, not as the string `to_bson` would produce.
fn id_bson(id: Uuid) -> Bson {
    Bson::Binary(Binary {
        subtype: BinarySubtype::Generic,
        bytes: id.as_bytes().to_vec(),
    })
}

fn id_filter(id: Uuid) -> Document {
    doc! { "_id": id_bson(id) }
}

/// `$set` for present mutable fields, `$unset` for absent optional ones.
/// `created_at` is never written.
fn replacement_update(product: &Product) -> ProductResult<Document> {
    let mut set = doc! {
        "name": product.name.as_str(),
        "price": product.price,
        "updated_at": timestamp::format(&product.updated_at),
    };
    let mut unset = Document::new();

    match product.location {
        Some(location) => {
            set.insert("location", to_bson(&location)?);
        }
        None => {
            unset.insert("location", "");
        }
    }
    match &product.description {
        Some(description) => {
            set.insert("description", description.as_str());
        }
        None => {
            unset.insert("description", "");
        }
    }

    let mut update = doc! { "$set": set };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    Ok(update)
}

fn keyword_filter(query: &ProductQuery) -> Document {
    match query.keyword() {
        Some(keyword) => {
            let pattern = regex::escape(keyword);
            doc! {
                "$or": [
                    { "name": { "$regex": pattern.as_str(), "$options": "i" } },
                    { "description": { "$regex": pattern.as_str(), "$options": "i" } },
                ]
            }
        }
        None => Document::new(),
    }
}

/// Aggregation producing one document `{ items: [...], total: [{count}] }`,
/// so the page and the count share a snapshot.
fn list_pipeline(query: &ProductQuery, skip: u64, take: u64) -> Vec<Document> {
    let matcher = keyword_filter(query);
    let mut pipeline = Vec::with_capacity(4);

    if let Some((center, radius_meters)) = query.within_radius() {
        pipeline.push(doc! {
            "$geoNear": {
                "near": { "type": "Point", "coordinates": [center.longitude(), center.latitude()] },
                "key": "location",
                "distanceField": DISTANCE_FIELD,
                "maxDistance": radius_meters,
                "spherical": true,
                "query": matcher,
            }
        });
    } else if !matcher.is_empty() {
        pipeline.push(doc! { "$match": matcher });
    }

    let sort = match query.sort() {
        SortOrder::NearestTo(_) => doc! { "distance_meters": 1, "created_at": -1, "_id": -1 },
        SortOrder::NewestFirst => doc! { "created_at": -1, "_id": -1 },
    };
    pipeline.push(doc! { "$sort": sort });

    pipeline.push(doc! {
        "$facet": {
            "items": [
                { "$skip": i64::try_from(skip).unwrap_or(i64::MAX) },
                { "$limit": i64::try_from(take.max(1)).unwrap_or(i64::MAX) },
                { "$unset": DISTANCE_FIELD },
            ],
            "total": [ { "$count": "count" } ],
        }
    });
    pipeline
}
