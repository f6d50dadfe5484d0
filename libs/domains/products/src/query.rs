//! Storage-agnostic description of a product listing.

use std::cmp::Ordering;

use crate::filter::Filter;
use crate::models::{GeoPoint, Product};

pub const DEFAULT_SEARCH_RADIUS_METERS: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Products with a location no further than `radius_meters` from `center`
    WithinRadius { center: GeoPoint, radius_meters: f64 },
    /// Case-insensitive substring of the name or the description
    Keyword(String),
}

impl Predicate {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Predicate::WithinRadius {
                center,
                radius_meters,
            } => product
                .location
                .is_some_and(|at| center.distance_meters(&at) <= *radius_meters),
            Predicate::Keyword(keyword) => {
                let needle = keyword.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortOrder {
    /// Ascending distance from the point
    NearestTo(GeoPoint),
    /// Descending `created_at`
    NewestFirst,
}

/// Conjunction of predicates plus an ordering. Ties are broken by newest
/// first, then by descending id, so every order is total.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    predicates: Vec<Predicate>,
    sort: SortOrder,
}

impl ProductQuery {
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn within_radius(&self) -> Option<(GeoPoint, f64)> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::WithinRadius {
                center,
                radius_meters,
            } => Some((*center, *radius_meters)),
            Predicate::Keyword(_) => None,
        })
    }

    pub fn keyword(&self) -> Option<&str> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::Keyword(k) => Some(k.as_str()),
            Predicate::WithinRadius { .. } => None,
        })
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.predicates.iter().all(|p| p.matches(product))
    }

    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let primary = match self.sort {
            SortOrder::NearestTo(center) => {
                distance_from(center, a).total_cmp(&distance_from(center, b))
            }
            SortOrder::NewestFirst => Ordering::Equal,
        };
        primary
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    }
}

// Unlocated products sort after every located one.
fn distance_from(center: GeoPoint, product: &Product) -> f64 {
    product
        .location
        .map_or(f64::INFINITY, |at| center.distance_meters(&at))
}

/// Builds [`ProductQuery`] values with a fixed search radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryBuilder {
    radius_meters: f64,
}

impl QueryBuilder {
    pub fn new(radius_meters: f64) -> Self {
        Self { radius_meters }
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub fn build(&self, filter: &Filter) -> ProductQuery {
        let mut predicates = Vec::with_capacity(2);
        let mut sort = SortOrder::NewestFirst;

        if let Some(center) = filter.location() {
            predicates.push(Predicate::WithinRadius {
                center,
                radius_meters: self.radius_meters,
            });
            sort = SortOrder::NearestTo(center);
        }
        if let Some(keyword) = filter.keyword() {
            predicates.push(Predicate::Keyword(keyword.to_string()));
        }

        ProductQuery { predicates, sort }
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_RADIUS_METERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductPayload;
    use chrono::Duration;

    fn product(name: &str, description: Option<&str>, at: Option<(f64, f64)>) -> Product {
        Product::new(ProductPayload {
            name: name.to_string(),
            price: 10.0,
            location: at.map(|(lat, lon)| GeoPoint::new(lat, lon).unwrap()),
            description: description.map(str::to_string),
        })
    }

    fn geo_filter(lat: f64, lon: f64, keyword: Option<&str>) -> Filter {
        Filter::new(1, 10, Some(lat), Some(lon), keyword).unwrap()
    }

    #[test]
    fn test_empty_filter_builds_unfiltered_newest_first() {
        let query = QueryBuilder::default().build(&Filter::default());
        assert!(query.predicates().is_empty());
        assert_eq!(query.sort(), SortOrder::NewestFirst);
        assert!(query.matches(&product("anything", None, None)));
    }

    #[test]
    fn test_geo_and_keyword_are_combined() {
        let query = QueryBuilder::new(500.0).build(&geo_filter(1.0, 2.0, Some("lamp")));
        let center = GeoPoint::new(1.0, 2.0).unwrap();
        assert_eq!(
            query.predicates(),
            &[
                Predicate::WithinRadius {
                    center,
                    radius_meters: 500.0
                },
                Predicate::Keyword("lamp".to_string()),
            ]
        );
        assert_eq!(query.sort(), SortOrder::NearestTo(center));
        assert_eq!(query.within_radius(), Some((center, 500.0)));
        assert_eq!(query.keyword(), Some("lamp"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = QueryBuilder::default();
        let filter = geo_filter(-6.2, 106.8, Some("desk"));
        assert_eq!(builder.build(&filter), builder.build(&filter));
    }

    #[test]
    fn test_keyword_matches_name_or_description_case_insensitively() {
        let query = QueryBuilder::default().build(&Filter::new(1, 10, None, None, Some("CHAIR")).unwrap());
        assert!(query.matches(&product("Office chair", None, None)));
        assert!(query.matches(&product("Seat", Some("a comfy Chair"), None)));
        assert!(!query.matches(&product("Table", Some("oak"), None)));
    }

    #[test]
    fn test_radius_excludes_far_and_unlocated_products() {
        // 0.05 degrees of latitude is roughly 5.6 km
        let query = QueryBuilder::default().build(&geo_filter(0.0, 0.0, None));
        assert!(query.matches(&product("near", None, Some((0.05, 0.0)))));
        assert!(!query.matches(&product("far", None, Some((0.2, 0.0)))));
        assert!(!query.matches(&product("nowhere", None, None)));
    }

    #[test]
    fn test_nearest_first_ordering() {
        let query = QueryBuilder::default().build(&geo_filter(0.0, 0.0, None));
        let near = product("near", None, Some((0.01, 0.0)));
        let far = product("far", None, Some((0.03, 0.0)));
        let mut items = vec![far.clone(), near.clone()];
        items.sort_by(|a, b| query.compare(a, b));
        assert_eq!(items, vec![near, far]);
    }

    #[test]
    fn test_newest_first_with_id_tiebreak() {
        let query = QueryBuilder::default().build(&Filter::default());
        let old = product("old", None, None);
        let mut new = product("new", None, None);
        new.created_at = old.created_at + Duration::seconds(5);
        let mut twin = product("twin", None, None);
        twin.created_at = new.created_at;

        let mut items = vec![old.clone(), new.clone(), twin.clone()];
        items.sort_by(|a, b| query.compare(a, b));
        // twin was created after new, so its v7 id is larger
        assert_eq!(items, vec![twin, new, old]);
    }
}
