use aishou_core::{FortuneResult, PartnerRef, Profile};
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::FortuneError;

/// Everything the oracle needs for one reading. `date` is the resolved target day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FortuneRequest {
    pub profile: Profile,
    pub partner: PartnerRef,
    pub date: NaiveDate,
}

/// Source of compatibility readings. One call per user-initiated submission;
/// implementations do not retry.
#[async_trait]
pub trait FortuneOracle: Send + Sync {
    async fn tell(&self, request: &FortuneRequest) -> Result<FortuneResult, FortuneError>;
}
