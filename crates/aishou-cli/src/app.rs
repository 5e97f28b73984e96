//! One reading session: form, persisted records, and the submission state machine.
//!
//! ```text
//! Idle → Validating → (Rejected | Submitting) → (Fulfilled | Failed) → Idle
//! ```
//!
//! Rejected and Failed leave the displayed result and every stored record
//! untouched. Fulfilled stores the new latest result, pushes the partner name
//! onto the history, and counts one reading against today's quota.

#[cfg(test)]
use aishou_ai::FortuneOracle;
use aishou_ai::{FortuneError, FortuneRequest};
use aishou_core::{
    DisplayNames, DisplayedResult, FormError, FormState, FortuneResult, format_reading_date,
};
use aishou_store::{KeyValueStore, NameHistory, SessionStore, StoreError, UsageLimiter};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

pub const LEAVE_WARNING: &str =
    "Your input and any reading in progress will be cleared when you leave.";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("You have reached today's limit of {quota} readings. Please try again tomorrow.")]
    QuotaExceeded { quota: u32 },

    #[error("A reading is already in progress.")]
    Busy,

    #[error("No reading is pending.")]
    NotPending,

    #[error(transparent)]
    Invalid(#[from] FormError),

    #[error("{}", .0.user_message())]
    Fortune(#[from] FortuneError),

    #[error("could not save the reading: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Submitting,
}

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub struct Session<S> {
    store: SessionStore<S>,
    limiter: UsageLimiter,
    today: NaiveDate,
    form: FormState,
    keep_fixed: bool,
    history: NameHistory,
    displayed: Option<DisplayedResult>,
    error: Option<String>,
    phase: Phase,
}

impl<S: KeyValueStore> Session<S> {
    /// Restore persisted state and roll the usage counter over to `today`.
    ///
    /// `today` holds for the whole session, so a reading that completes after
    /// midnight still counts against the day it was started on. Never fails:
    /// unreadable records fall back to defaults.
    pub fn load(mut store: SessionStore<S>, limiter: UsageLimiter, today: NaiveDate) -> Self {
        let mut form = FormState::new();
        let keep_fixed = match store.fixed_profile() {
            Some(fixed) => {
                form.apply_fixed(&fixed);
                true
            }
            None => false,
        };
        let history = store.name_history();
        let displayed = store.latest_result();

        if let Err(e) = limiter.refresh(&mut store, today) {
            warn!(error = %e, "could not persist usage reset");
        }

        Self {
            store,
            limiter,
            today,
            form,
            keep_fixed,
            history,
            displayed,
            error: None,
            phase: Phase::Idle,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn keep_fixed(&self) -> bool {
        self.keep_fixed
    }

    pub fn history(&self) -> &NameHistory {
        &self.history
    }

    pub fn displayed(&self) -> Option<&DisplayedResult> {
        self.displayed.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    #[cfg(test)]
    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    /// Edit the form. While "keep fixed" is on, the self profile is re-saved.
    pub fn update_form(&mut self, edit: impl FnOnce(&mut FormState)) -> Result<(), StoreError> {
        edit(&mut self.form);
        if self.keep_fixed {
            self.store.save_fixed_profile(&self.form.fixed_snapshot())?;
        }
        Ok(())
    }

    /// Turning "keep fixed" off deletes the saved profile; turning it on saves
    /// whatever the form currently holds.
    pub fn set_keep_fixed(&mut self, keep: bool) -> Result<(), StoreError> {
        self.keep_fixed = keep;
        if keep {
            self.store.save_fixed_profile(&self.form.fixed_snapshot())
        } else {
            self.store.clear_fixed_profile()
        }
    }

    pub fn pick_history_name(&mut self, name: &str) {
        self.form.partner_name = name.to_string();
    }

    /// Returns whether the name was in the history.
    pub fn delete_history_name(&mut self, name: &str) -> Result<bool, StoreError> {
        let removed = self.history.remove(name);
        if removed {
            self.store.save_name_history(&self.history)?;
        }
        Ok(removed)
    }

    #[cfg(test)]
    pub fn usage_count(&self) -> u32 {
        self.limiter.count(&self.store, self.today())
    }

    pub fn remaining(&self) -> u32 {
        self.limiter.remaining(&self.store, self.today())
    }

    pub fn quota(&self) -> u32 {
        self.limiter.quota()
    }

    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Idle && self.limiter.can_submit(&self.store, self.today())
    }

    /// Warning to show before the user leaves, if leaving would lose work.
    pub fn leave_warning(&self) -> Option<&'static str> {
        let pending = self.phase == Phase::Submitting;
        let unanswered = self.form.has_partner_name() && self.displayed.is_none();
        (pending || unanswered).then_some(LEAVE_WARNING)
    }

    /// Gate and validate the form. On success the session is `Submitting` and
    /// the returned request must be resolved with [`finish_submit`](Self::finish_submit)
    /// or [`abandon`](Self::abandon).
    pub fn begin_submit(&mut self) -> Result<FortuneRequest, SubmitError> {
        if self.phase != Phase::Idle {
            return Err(SubmitError::Busy);
        }
        if !self.limiter.can_submit(&self.store, self.today()) {
            return Err(self.reject(SubmitError::QuotaExceeded {
                quota: self.limiter.quota(),
            }));
        }

        self.phase = Phase::Validating;
        let (profile, partner) = match self.form.validate() {
            Ok(v) => v,
            Err(e) => return Err(self.reject(e.into())),
        };

        self.error = None;
        self.phase = Phase::Submitting;
        let date = self.form.target.resolve(self.today());
        info!(partner = %partner.name, relationship = partner.relationship.key(), %date, "submitting reading");
        Ok(FortuneRequest {
            profile,
            partner,
            date,
        })
    }

    /// Apply the oracle's outcome for the request from [`begin_submit`](Self::begin_submit).
    pub fn finish_submit(
        &mut self,
        request: &FortuneRequest,
        outcome: Result<FortuneResult, FortuneError>,
    ) -> Result<&DisplayedResult, SubmitError> {
        if self.phase != Phase::Submitting {
            return Err(SubmitError::NotPending);
        }
        let result = match outcome {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "reading failed");
                return Err(self.reject(e.into()));
            }
        };

        let bundle = DisplayedResult {
            result,
            names: DisplayNames::for_partner(&request.partner.name),
            date_str: format_reading_date(request.date),
        };
        if let Err(e) = self.commit(&bundle, &request.partner.name) {
            return Err(self.reject(e.into()));
        }

        self.phase = Phase::Idle;
        let shown: &DisplayedResult = self.displayed.insert(bundle);
        Ok(shown)
    }

    /// Drop an in-flight request without touching any state.
    pub fn abandon(&mut self) {
        if self.phase == Phase::Submitting {
            info!("pending reading abandoned");
            self.phase = Phase::Idle;
        }
    }

    /// Validate, call the oracle once, and apply the outcome.
    #[cfg(test)]
    pub async fn submit(
        &mut self,
        oracle: &dyn FortuneOracle,
    ) -> Result<&DisplayedResult, SubmitError> {
        let request = self.begin_submit()?;
        let outcome = oracle.tell(&request).await;
        self.finish_submit(&request, outcome)
    }

    fn commit(&mut self, bundle: &DisplayedResult, partner_name: &str) -> Result<(), StoreError> {
        let today = self.today;
        let count = self.limiter.record_submission(&mut self.store, today)?;
        self.store.save_latest_result(bundle)?;

        let mut history = self.history.clone();
        history.push(partner_name);
        self.store.save_name_history(&history)?;
        self.history = history;

        info!(count, quota = self.limiter.quota(), "reading stored");
        Ok(())
    }

    fn reject(&mut self, err: SubmitError) -> SubmitError {
        self.error = Some(err.to_string());
        self.phase = Phase::Idle;
        err
    }
}
