use crate::github::{GitHubClient, GitHubConfig};
use crate::shutdown::Shutdown;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, warn};

/// Snapshot of the core API quota
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaState {
    /// Remaining requests
    pub remaining: u32,

    /// Total rate limit (0 when unknown)
    pub limit: u32,

    /// Unix timestamp when the quota resets
    pub reset_epoch: i64,
}

impl QuotaState {
    /// Assumed quota when the rate limit endpoint cannot be reached
    pub const fn fallback() -> Self {
        Self {
            remaining: 1000,
            limit: 0,
            reset_epoch: 0,
        }
    }

    pub fn reset_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.reset_epoch, 0).unwrap_or_else(Utc::now)
    }
}

/// Proactive quota check run before each fetch burst
#[derive(Debug, Clone)]
pub struct RateGuard {
    floor: u32,
    margin_secs: i64,
    max_waits: u32,
    shutdown: Shutdown,
}

impl RateGuard {
    pub fn new(config: &GitHubConfig, shutdown: Shutdown) -> Self {
        Self {
            floor: config.quota_floor,
            margin_secs: config.quota_margin_secs,
            max_waits: config.quota_max_waits,
            shutdown,
        }
    }

    /// Seconds to wait before the quota is safe again, if any
    pub fn wait_needed(&self, quota: &QuotaState, now: i64) -> Option<u64> {
        if quota.remaining >= self.floor {
            return None;
        }
        let wait_secs = quota.reset_epoch - now + self.margin_secs;
        (wait_secs > 0).then_some(wait_secs as u64)
    }

    /// Make sure enough quota remains, sleeping until the reset if it does not.
    ///
    /// Never fails: when the quota cannot be read a permissive fallback is
    /// returned so the caller's request goes ahead.
    pub async fn ensure_quota(&self, client: &GitHubClient) -> QuotaState {
        let mut waits = 0;

        loop {
            let quota = match client.rate_limit().await {
                Ok(quota) => quota,
                Err(e) => {
                    warn!("Error checking rate limit: {}", e.log_safe());
                    return QuotaState::fallback();
                }
            };
            debug!(
                "Rate limit: {}/{} remaining (resets at {})",
                quota.remaining, quota.limit, quota.reset_epoch
            );

            let Some(wait_secs) = self.wait_needed(&quota, Utc::now().timestamp()) else {
                return quota;
            };

            if waits >= self.max_waits {
                warn!(
                    "Rate limit still low after {} waits, continuing with {} requests left",
                    waits, quota.remaining
                );
                return quota;
            }

            warn!(
                "Rate limit approaching ({}/{}), waiting {} seconds until reset",
                quota.remaining, quota.limit, wait_secs
            );
            waits += 1;

            if !self.shutdown.sleep(Duration::from_secs(wait_secs)).await {
                return quota;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> RateGuard {
        RateGuard::new(&GitHubConfig::default(), Shutdown::new())
    }

    fn quota(remaining: u32, reset_epoch: i64) -> QuotaState {
        QuotaState {
            remaining,
            limit: 5000,
            reset_epoch,
        }
    }

    #[test]
    fn test_no_wait_with_enough_quota() {
        assert_eq!(guard().wait_needed(&quota(5, 2_000), 1_000), None);
        assert_eq!(guard().wait_needed(&quota(4_000, 2_000), 1_000), None);
    }

    #[test]
    fn test_wait_includes_margin() {
        assert_eq!(guard().wait_needed(&quota(4, 1_100), 1_000), Some(105));
    }

    #[test]
    fn test_no_wait_when_reset_passed() {
        assert_eq!(guard().wait_needed(&quota(0, 900), 1_000), None);
        assert_eq!(guard().wait_needed(&quota(0, 995), 1_000), None);
    }

    #[test]
    fn test_fallback_is_permissive() {
        let fallback = QuotaState::fallback();
        assert_eq!(fallback.remaining, 1000);
        assert_eq!(fallback.reset_epoch, 0);
        assert_eq!(guard().wait_needed(&fallback, 1_000), None);
    }
}
