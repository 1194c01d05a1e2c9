//! Catalog access for request handlers.
//!
//! Filter results are memoized with `moka` on the normalized
//! `(query, category)` pair. The cache stores catalog positions rather than
//! product copies, and since the catalog never changes an entry never goes
//! stale; the idle timeout only bounds memory for one-off queries.

use std::sync::Arc;
use std::time::Duration;

use loja_core::{Catalog, CatalogFilter, Product};
use moka::future::Cache;
use tracing::{debug, instrument};

/// Upper bound on distinct filters kept in memory.
const MAX_CACHED_FILTERS: u64 = 1024;

/// How long an unused filter result is kept.
const FILTER_IDLE: Duration = Duration::from_secs(600);

/// Shared, cheaply cloneable catalog handle.
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogServiceInner>,
}

struct CatalogServiceInner {
    catalog: Catalog,
    cache: Cache<CatalogFilter, Arc<[usize]>>,
}

impl CatalogService {
    /// Wrap a validated catalog.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_CACHED_FILTERS)
            .time_to_idle(FILTER_IDLE)
            .build();

        Self {
            inner: Arc::new(CatalogServiceInner { catalog, cache }),
        }
    }

    /// The underlying catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Products passing `filter`, in catalog order.
    #[instrument(skip(self))]
    pub async fn filter(&self, filter: &CatalogFilter) -> Vec<&Product> {
        let key = filter.normalized();
        let catalog = &self.inner.catalog;

        let positions = self
            .inner
            .cache
            .get_with_by_ref(&key, async {
                debug!("filter cache miss");
                Arc::from(key.positions(catalog))
            })
            .await;

        positions
            .iter()
            .filter_map(|&position| catalog.products().get(position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use loja_core::CategoryId;

    use super::*;

    #[tokio::test]
    async fn test_cached_filter_matches_pure_filter() {
        let service = CatalogService::new(Catalog::builtin());
        let filter = CatalogFilter::new("VIP", None);

        let first: Vec<_> = service.filter(&filter).await;
        let second: Vec<_> = service.filter(&filter).await;
        let pure = filter.apply(service.catalog());

        assert_eq!(first, pure);
        assert_eq!(second, pure);
    }

    #[tokio::test]
    async fn test_normalized_variants_share_results() {
        let service = CatalogService::new(Catalog::builtin());
        let loose = CatalogFilter::new("  Drift ", Some(CategoryId::new("handling")));
        let tight = CatalogFilter::new("drift", Some(CategoryId::new("handling")));

        let a = service.filter(&loose).await;
        let b = service.filter(&tight).await;
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
    }

    #[tokio::test]
    async fn test_no_match_is_empty() {
        let service = CatalogService::new(Catalog::builtin());
        let hits = service
            .filter(&CatalogFilter::new("helicóptero", None))
            .await;
        assert!(hits.is_empty());
    }
}
