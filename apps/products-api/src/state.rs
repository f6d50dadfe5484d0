//! Application state management

use domain_products::{MongoProductRepository, ProductService};
use mongodb::{Client, Database};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
}

impl AppState {
    pub fn repository(&self) -> MongoProductRepository {
        MongoProductRepository::with_collection(&self.db, &self.config.products.collection)
    }

    pub fn product_service(&self) -> ProductService<MongoProductRepository> {
        ProductService::with_search_radius(self.repository(), self.config.products.search_radius_meters)
    }
}
