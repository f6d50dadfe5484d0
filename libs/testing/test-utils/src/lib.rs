//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let db = mongo.database();
//!     let builder = TestDataBuilder::from_test_name("my_mongo_test");
//!
//!     let name = builder.name("product", "main");
//!     let price = builder.price();
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Meters per degree of latitude on the mean Earth sphere
const METERS_PER_DEGREE: f64 = 111_195.0;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A deterministic UUID for this seed
    pub fn id(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Generate a unique name for testing
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let name = builder.name("product", "main");
    /// assert!(name.starts_with("test-product-"));
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A price between 1.00 and 1000.99 with cent precision
    pub fn price(&self) -> f64 {
        let cents = self.seed % 100_000;
        1.0 + cents as f64 / 100.0
    }

    /// `(latitude, longitude)` roughly `meters` due north of the given point
    pub fn north_of(latitude: f64, longitude: f64, meters: f64) -> (f64, f64) {
        (latitude + meters / METERS_PER_DEGREE, longitude)
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    /// Assert that two UUIDs are equal with a nice error message
    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Assert that `values` is sorted ascending
    pub fn assert_ascending<T: PartialOrd + std::fmt::Debug>(values: &[T], context: &str) {
        assert!(
            values.windows(2).all(|w| w[0] <= w[1]),
            "{}: expected ascending order, got {:?}",
            context,
            values
        );
    }

    /// Assert that two floats differ by no more than `tolerance`
    pub fn assert_close(actual: f64, expected: f64, tolerance: f64, context: &str) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "{}: expected {} ± {}, got {}",
            context,
            expected,
            tolerance,
            actual
        );
    }
}
