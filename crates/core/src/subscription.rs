//! Subscription records.

use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};

use crate::lenient;

/// Billing cadence of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Monthly,
    Yearly,
    #[serde(other)]
    Other,
}

/// References to the payment processors that bill a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillingRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paypal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub braintree_id: Option<String>,
}

/// One paid (or trial) entitlement period.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Subscription {
    /// Display title of the plan.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub title: String,
    /// Plan type.
    #[serde(default, rename = "type", deserialize_with = "lenient::or_default")]
    pub kind: String,
    /// Length of the period in calendar days.
    #[serde(default, rename = "duration")]
    pub duration_days: Option<u32>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_trial: bool,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Flag maintained by the billing side; independent of the dates.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub active: bool,
    /// Absent when the record never stated a cadence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(flatten)]
    pub billing: BillingRef,
}

impl Subscription {
    /// Create a subscription starting at `start_date` for `duration_days`.
    #[must_use]
    pub fn starting(start_date: DateTime<Utc>, duration_days: u32) -> Self {
        Self {
            start_date: Some(start_date),
            duration_days: Some(duration_days),
            ..Self::default()
        }
    }

    /// Builder-style setter for the `active` flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// End of the period: the start date plus `duration_days` calendar days.
    ///
    /// Day addition is calendar arithmetic on the start date, so month and
    /// year rollover follow the calendar. Returns `None` when either the
    /// start date or the duration is missing, or the result is out of range.
    #[must_use]
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        let start = self.start_date?;
        let days = self.duration_days?;
        start.checked_add_days(Days::new(u64::from(days)))
    }
}
