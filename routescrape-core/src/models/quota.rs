//! Daily quota bookkeeping.
//!
//! [`QuotaRecord`] is the pure state machine behind the quota store: it knows
//! how to roll over on a new calendar day and how to spend one request. It
//! never touches disk; persistence is the store's job.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::provider::ProviderKind;

/// Remaining daily requests for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRecord {
    /// Provider this allowance belongs to.
    pub provider: ProviderKind,
    /// Requests left for `last_reset_date`.
    pub requests_remaining: u32,
    /// Requests granted per calendar day.
    pub daily_limit: u32,
    /// Day the allowance was last refilled.
    pub last_reset_date: NaiveDate,
}

impl QuotaRecord {
    /// A full allowance for `today`.
    pub fn fresh(provider: ProviderKind, daily_limit: u32, today: NaiveDate) -> Self {
        Self {
            provider,
            requests_remaining: daily_limit,
            daily_limit,
            last_reset_date: today,
        }
    }

    /// Refills the allowance if `today` is after the last reset.
    ///
    /// Returns true if the record changed.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.last_reset_date < today {
            self.requests_remaining = self.daily_limit;
            self.last_reset_date = today;
            true
        } else {
            false
        }
    }

    /// Spends one request. Returns false, unchanged, when nothing is left.
    pub fn try_consume(&mut self) -> bool {
        if self.requests_remaining == 0 {
            return false;
        }
        self.requests_remaining -= 1;
        true
    }

    /// Applies a (possibly changed) daily limit.
    ///
    /// Returns true if the record changed.
    pub fn apply_limit(&mut self, daily_limit: u32) -> bool {
        let before = (self.daily_limit, self.requests_remaining);
        self.daily_limit = daily_limit;
        self.requests_remaining = self.requests_remaining.min(daily_limit);
        before != (self.daily_limit, self.requests_remaining)
    }
}
