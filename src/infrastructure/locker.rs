use crate::config::LockerConfig;
use crate::domain::context::Context;
use crate::domain::ports::Locker;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct LockEntry {
    ttl: Duration,
    created_at: Instant,
}

impl LockEntry {
    fn expired(&self) -> bool {
        self.created_at + self.ttl <= Instant::now()
    }
}

/// An in-memory, TTL-bounded lock table.
///
/// This lock is advisory and only covers callers inside this process. Several
/// service instances sharing one backing store each get their own table, so a
/// shared lock service (Redis, ZooKeeper, DynamoDB...) is required before
/// running more than one instance.
///
/// Expired entries count as free; nothing sweeps them in the background.
#[derive(Clone)]
pub struct InMemoryLocker {
    locks: Arc<Mutex<HashMap<String, LockEntry>>>,
    config: LockerConfig,
}

impl InMemoryLocker {
    pub fn new(config: LockerConfig) -> Self {
        Self {
            locks: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    async fn try_lock(&self, resource: &str) -> Result<()> {
        let mut locks = self.locks.lock().await;
        if let Some(entry) = locks.get(resource)
            && !entry.expired()
        {
            return Err(CheckoutError::ResourceLocked(resource.to_string()));
        }
        locks.insert(
            resource.to_string(),
            LockEntry {
                ttl: self.config.ttl,
                created_at: Instant::now(),
            },
        );
        Ok(())
    }
}

impl Default for InMemoryLocker {
    fn default() -> Self {
        Self::new(LockerConfig::default())
    }
}

#[async_trait]
impl Locker for InMemoryLocker {
    async fn lock(&self, ctx: &Context, resource: &str) -> Result<()> {
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.try_lock(resource).await {
                Ok(()) => {
                    debug!(request_id = %ctx.request_id(), resource, attempt, "lock acquired");
                    return Ok(());
                }
                Err(err) if attempt >= attempts => return Err(err),
                Err(_) => {
                    warn!(request_id = %ctx.request_id(), resource, attempt, "resource busy, retrying");
                    tokio::time::sleep(self.config.retry_delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn unlock(&self, ctx: &Context, resource: &str) -> Result<()> {
        self.locks.lock().await.remove(resource);
        debug!(request_id = %ctx.request_id(), resource, "lock released");
        Ok(())
    }
}
