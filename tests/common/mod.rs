#![allow(dead_code)]

use checkout::application::service::CheckoutService;
use checkout::config::LockerConfig;
use checkout::infrastructure::in_memory::{InMemoryBasketStore, InMemoryCatalogStore};
use checkout::infrastructure::locker::InMemoryLocker;
use checkout::infrastructure::seed::CatalogSeed;
use std::time::Duration;

/// A service over fresh in-memory adapters and the stock catalog.
///
/// The catalog handle is returned too; it shares state with the one inside the
/// service, so tests can change prices or promotions mid-scenario.
pub fn service_with(locker: LockerConfig) -> (CheckoutService, InMemoryCatalogStore) {
    let catalog = InMemoryCatalogStore::from_seed(CatalogSeed::default_catalog()).unwrap();
    let service = CheckoutService::new(
        Box::new(InMemoryBasketStore::new()),
        Box::new(catalog.clone()),
        Box::new(InMemoryLocker::new(locker)),
    );
    (service, catalog)
}

pub fn service() -> CheckoutService {
    service_with(LockerConfig::default()).0
}

/// A locker patient enough for every contender of a busy basket to get in.
pub fn patient_locker() -> LockerConfig {
    LockerConfig {
        ttl: Duration::from_secs(5),
        max_attempts: 1_000,
        retry_delay: Duration::from_millis(1),
    }
}
