//! Products Domain
//!
//! Product catalog with geo-radius and keyword listing, backed by MongoDB or
//! an in-process map.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, RequestContext extraction
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Id parsing, validation, filter normalization
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + MongoDB and in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, payloads, GeoJSON points
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers,
//!     mongodb::MongoProductRepository,
//!     service::ProductService,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ::mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//! let service = ProductService::new(repository);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod pagination;
pub mod query;
pub mod repository;
pub mod service;

pub use context::{CancellationHandle, CancellationSignal, RequestContext};
pub use error::{ErrorKind, ProductError, ProductResult};
pub use filter::{Filter, RawFilter};
pub use handlers::{ApiDoc, RequestTimeout};
pub use memory::InMemoryProductRepository;
pub use models::{DeleteResponse, GeoPoint, Product, ProductPage, ProductPayload};
pub use mongodb::MongoProductRepository;
pub use pagination::PaginationMeta;
pub use query::{ProductQuery, QueryBuilder};
pub use repository::ProductRepository;
pub use service::ProductService;
