//! Entitlement computed from a subscription history.
//!
//! `has_expired` and `is_active` answer different questions and are never
//! derived from each other: expiry looks only at the current subscription's
//! dates, while activity looks at the `active` flag across the whole history.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::subscription::Subscription;

/// The subscription with the latest start date.
///
/// Ties on the start date go to the element that appears first in `subs`.
/// Undated subscriptions rank below every dated one; if none is dated, the
/// first subscription is returned. An empty slice yields `None`.
#[must_use]
pub fn current_subscription(subs: &[Subscription]) -> Option<&Subscription> {
    subs.iter().fold(None, |best, candidate| match best {
        Some(current) if candidate.start_date <= current.start_date => Some(current),
        _ => Some(candidate),
    })
}

/// Whether the current subscription ended before `now`.
///
/// Not expired when there is no current subscription, or when it lacks a
/// start date or a non-zero duration.
#[must_use]
pub fn has_expired_at(subs: &[Subscription], now: DateTime<Utc>) -> bool {
    let Some(current) = current_subscription(subs) else {
        return false;
    };

    if current.duration_days == Some(0) {
        return false;
    }

    let Some(end) = current.end_date() else {
        return false;
    };

    let expired = end < now;
    debug!(%end, %now, expired, "Evaluated subscription expiry");
    expired
}

/// [`has_expired_at`] evaluated against the wall clock.
#[must_use]
pub fn has_expired(subs: &[Subscription]) -> bool {
    has_expired_at(subs, Utc::now())
}

/// Whether any subscription in the history is flagged active.
#[must_use]
pub fn is_active(subs: &[Subscription]) -> bool {
    subs.iter().any(|sub| sub.active)
}
