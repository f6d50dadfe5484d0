//! MongoDB repository tests. Require Docker: `cargo test -- --ignored`.

use domain_products::{
    ErrorKind, Filter, GeoPoint, MongoProductRepository, Product, ProductPayload,
    ProductRepository, QueryBuilder, RequestContext,
};
use test_utils::{assertions, TestDataBuilder, TestMongo};

fn payload(name: &str, location: Option<(f64, f64)>) -> ProductPayload {
    ProductPayload {
        name: name.to_string(),
        price: 10.0,
        location: location.map(|(lat, lon)| GeoPoint::new(lat, lon).unwrap()),
        description: None,
    }
}

async fn repository(mongo: &TestMongo) -> MongoProductRepository {
    let repository = MongoProductRepository::new(&mongo.database());
    repository.init_indexes().await.unwrap();
    repository
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn store_find_update_delete() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;
    let ctx = RequestContext::background();

    let stored = repo
        .store(&ctx, payload("Chair", Some((1.0, 2.0))))
        .await
        .unwrap();
    assert_eq!(repo.find(&ctx, stored.id).await.unwrap(), stored);

    let replacement = Product::with_id(stored.id, payload("Stool", None));
    let updated = repo.update(&ctx, &replacement).await.unwrap();
    assert_eq!(updated.name, "Stool");
    assert_eq!(updated.created_at, stored.created_at);
    assert!(updated.location.is_none());

    repo.delete_by_id(&ctx, stored.id).await.unwrap();
    let err = repo.delete_by_id(&ctx, stored.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn update_missing_is_not_found() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;
    let ctx = RequestContext::background();

    let ghost = Product::new(payload("Ghost", None));
    let err = repo.update(&ctx, &ghost).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = repo.find(&ctx, ghost.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn find_all_pages_with_total() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;
    let ctx = RequestContext::background();
    let builder = TestDataBuilder::from_test_name("find_all_pages_with_total");

    for i in 0..12 {
        repo.store(&ctx, payload(&builder.name("product", &i.to_string()), None))
            .await
            .unwrap();
    }

    let query = QueryBuilder::default().build(&Filter::default());
    let (items, total) = repo.find_all(&ctx, &query, 10, 10).await.unwrap();
    assert_eq!(total, 12);
    assert_eq!(items.len(), 2);

    let (beyond, total) = repo.find_all(&ctx, &query, 50, 10).await.unwrap();
    assert!(beyond.is_empty());
    assert_eq!(total, 12);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn geo_and_keyword_filters() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;
    let ctx = RequestContext::background();
    let (lat, lon) = (48.85, 2.35);

    repo.store(&ctx, payload("far desk", Some(TestDataBuilder::north_of(lat, lon, 4_000.0))))
        .await
        .unwrap();
    repo.store(&ctx, payload("near desk", Some(TestDataBuilder::north_of(lat, lon, 300.0))))
        .await
        .unwrap();
    repo.store(&ctx, payload("near lamp", Some(TestDataBuilder::north_of(lat, lon, 100.0))))
        .await
        .unwrap();
    repo.store(&ctx, payload("remote desk", Some(TestDataBuilder::north_of(lat, lon, 50_000.0))))
        .await
        .unwrap();
    repo.store(&ctx, payload("unplaced desk", None)).await.unwrap();

    let builder = QueryBuilder::new(5_000.0);
    let query = builder.build(&Filter::new(1, 10, Some(lat), Some(lon), Some("DESK")).unwrap());
    let (items, total) = repo.find_all(&ctx, &query, 0, 10).await.unwrap();

    let names: Vec<_> = items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["near desk", "far desk"]);
    assert_eq!(total, 2);

    let center = GeoPoint::new(lat, lon).unwrap();
    let distances: Vec<f64> = items
        .iter()
        .map(|p| center.distance_meters(&p.location.unwrap()))
        .collect();
    assertions::assert_ascending(&distances, "mongo geo listing");
}
