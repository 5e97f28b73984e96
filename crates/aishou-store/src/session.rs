//! Typed access to the persisted session records.
//!
//! [`SessionStore`] is the only component that touches the key-value backend.
//! Reads never fail: a missing or unparsable record degrades to its default
//! and is logged.

use aishou_core::{DisplayedResult, FixedProfile};
use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::history::NameHistory;
use crate::kv::KeyValueStore;
use crate::usage::UsageRecord;
use crate::StoreError;

pub const FIXED_PROFILE_KEY: &str = "person1FixedData";
pub const NAME_HISTORY_KEY: &str = "pastFortuneNames";
pub const LATEST_RESULT_KEY: &str = "latest_fortune_result";
pub const USAGE_DATE_KEY: &str = "usageDate";
pub const USAGE_COUNT_KEY: &str = "usageCount";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SessionStore<S> {
    backend: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    // ── Fixed profile ──

    /// The saved self profile, if "keep fixed" was left on.
    pub fn fixed_profile(&self) -> Option<FixedProfile> {
        self.read_json::<FixedProfile>(FIXED_PROFILE_KEY)
            .filter(|p| p.is_fixed)
    }

    pub fn save_fixed_profile(&mut self, profile: &FixedProfile) -> Result<(), StoreError> {
        self.write_json(FIXED_PROFILE_KEY, profile)
    }

    pub fn clear_fixed_profile(&mut self) -> Result<(), StoreError> {
        self.backend.remove(FIXED_PROFILE_KEY)
    }

    // ── Name history ──

    pub fn name_history(&self) -> NameHistory {
        self.read_json(NAME_HISTORY_KEY).unwrap_or_default()
    }

    pub fn save_name_history(&mut self, history: &NameHistory) -> Result<(), StoreError> {
        self.write_json(NAME_HISTORY_KEY, history)
    }

    // ── Latest result ──

    pub fn latest_result(&self) -> Option<DisplayedResult> {
        self.read_json(LATEST_RESULT_KEY)
    }

    /// Overwrites any previous result; only one is ever kept.
    pub fn save_latest_result(&mut self, result: &DisplayedResult) -> Result<(), StoreError> {
        self.write_json(LATEST_RESULT_KEY, result)
    }

    // ── Usage ──

    /// The stored usage record, or `None` when no valid date is stored.
    pub fn usage_record(&self) -> Option<UsageRecord> {
        let raw_date = self.backend.get(USAGE_DATE_KEY)?;
        let date = match NaiveDate::parse_from_str(raw_date.trim(), DATE_FORMAT) {
            Ok(d) => d,
            Err(e) => {
                warn!(key = USAGE_DATE_KEY, value = %raw_date, error = %e, "ignoring unparsable usage date");
                return None;
            }
        };
        let count = match self.backend.get(USAGE_COUNT_KEY) {
            None => 0,
            Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|e| {
                warn!(key = USAGE_COUNT_KEY, value = %raw, error = %e, "ignoring unparsable usage count");
                0
            }),
        };
        Some(UsageRecord { date, count })
    }

    pub fn save_usage_record(&mut self, record: &UsageRecord) -> Result<(), StoreError> {
        self.backend
            .set(USAGE_DATE_KEY, &record.date.format(DATE_FORMAT).to_string())?;
        self.backend
            .set(USAGE_COUNT_KEY, &record.count.to_string())
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.backend.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(key, error = %e, "ignoring unparsable stored record");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key, &json)
    }
}
