use chrono::{DateTime, Utc};

/// Canonical UTC clock.
///
/// All expiry comparisons go through this port; services never read wall
/// time directly, so tests and the reconciler can control it.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
