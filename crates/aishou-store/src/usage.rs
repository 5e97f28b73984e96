//! Calendar-day reading quota.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::kv::KeyValueStore;
use crate::session::SessionStore;
use crate::StoreError;

/// Readings permitted per calendar day.
pub const DAILY_QUOTA: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageRecord {
    pub date: NaiveDate,
    pub count: u32,
}

impl UsageRecord {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            date: today,
            count: 0,
        }
    }

    /// This record as seen on `today`: unchanged on the same day, zeroed otherwise.
    pub fn on(self, today: NaiveDate) -> Self {
        if self.date == today {
            self
        } else {
            Self::fresh(today)
        }
    }
}

/// Gates reading requests against a per-day counter held in the [`SessionStore`].
#[derive(Debug, Clone, Copy)]
pub struct UsageLimiter {
    quota: u32,
}

impl Default for UsageLimiter {
    fn default() -> Self {
        Self::new(DAILY_QUOTA)
    }
}

impl UsageLimiter {
    pub fn new(quota: u32) -> Self {
        Self { quota }
    }

    pub fn quota(&self) -> u32 {
        self.quota
    }

    /// Roll the stored record over to `today`, persisting the reset if the
    /// stored date is stale or missing. Called once per session load.
    pub fn refresh<S: KeyValueStore>(
        &self,
        store: &mut SessionStore<S>,
        today: NaiveDate,
    ) -> Result<UsageRecord, StoreError> {
        match store.usage_record() {
            Some(record) if record.date == today => Ok(record),
            stale => {
                let fresh = UsageRecord::fresh(today);
                store.save_usage_record(&fresh)?;
                if let Some(old) = stale {
                    info!(previous = %old.date, today = %today, "usage counter reset for new day");
                }
                Ok(fresh)
            }
        }
    }

    /// Today's count, capped at the quota.
    pub fn count<S: KeyValueStore>(&self, store: &SessionStore<S>, today: NaiveDate) -> u32 {
        store
            .usage_record()
            .map(|r| r.on(today).count)
            .unwrap_or(0)
            .min(self.quota)
    }

    pub fn remaining<S: KeyValueStore>(&self, store: &SessionStore<S>, today: NaiveDate) -> u32 {
        self.quota.saturating_sub(self.count(store, today))
    }

    pub fn can_submit<S: KeyValueStore>(&self, store: &SessionStore<S>, today: NaiveDate) -> bool {
        self.remaining(store, today) > 0
    }

    /// Count one reading against today. Returns the new count.
    ///
    /// Refuses once the quota is reached, so the stored count never exceeds it.
    pub fn record_submission<S: KeyValueStore>(
        &self,
        store: &mut SessionStore<S>,
        today: NaiveDate,
    ) -> Result<u32, StoreError> {
        let current = store
            .usage_record()
            .map(|r| r.on(today))
            .unwrap_or_else(|| UsageRecord::fresh(today));
        if current.count >= self.quota {
            return Err(StoreError::QuotaExceeded { quota: self.quota });
        }
        let next = UsageRecord {
            date: today,
            count: current.count + 1,
        };
        store.save_usage_record(&next)?;
        debug!(count = next.count, quota = self.quota, "recorded reading");
        Ok(next.count)
    }
}
