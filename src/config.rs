use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(5);
pub const DEFAULT_LOCK_ATTEMPTS: u32 = 3;
pub const DEFAULT_LOCK_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Tuning for the in-memory resource locker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockerConfig {
    /// How long a lock stays held without an explicit unlock.
    pub ttl: Duration,
    /// Acquisition attempts before giving up with `ResourceLocked`.
    pub max_attempts: u32,
    /// Fixed pause between two attempts.
    pub retry_delay: Duration,
}

impl Default for LockerConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_LOCK_TTL,
            max_attempts: DEFAULT_LOCK_ATTEMPTS,
            retry_delay: DEFAULT_LOCK_RETRY_DELAY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub locker: LockerConfig,
    /// JSON catalog to seed from. The stock catalog is used when absent.
    pub catalog_path: Option<PathBuf>,
}
