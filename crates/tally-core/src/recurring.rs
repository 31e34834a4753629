//! Recurring transaction detection
//!
//! Groups a batch by merchant identity and absolute amount, then inspects
//! the calendar gaps between consecutive dates within each group. A group
//! of at least three whose gaps all fall inside the weekly or monthly band
//! is recurring.
//!
//! Grouping deliberately ignores the amount's sign, so a recurring charge
//! and a same-magnitude refund for the same merchant share a group.
//! Detection is batch-local: it runs once per ingestion call over that
//! call's transactions and never rescans the historical ledger.

use std::collections::HashMap;

use crate::models::NewTransaction;

/// Minimum observations before a cadence can be called recurring.
pub const MIN_GROUP_SIZE: usize = 3;

/// Inclusive day-gap band for a monthly cadence.
pub const MONTHLY_GAP_DAYS: std::ops::RangeInclusive<i64> = 27..=33;

/// Inclusive day-gap band for a weekly cadence.
pub const WEEKLY_GAP_DAYS: std::ops::RangeInclusive<i64> = 6..=8;

/// Mark recurring transactions in a batch.
///
/// Qualifying group members get `recurring = true`; everything else is left
/// untouched. Total over well-formed input.
pub fn detect_recurring(batch: &mut [NewTransaction]) {
    // f64 has no Hash; keying on the bit pattern of the absolute amount
    // reproduces exact-equality grouping.
    let mut groups: HashMap<(String, u64), Vec<usize>> = HashMap::new();
    for (idx, tx) in batch.iter().enumerate() {
        let key = (tx.merchant_canonical.clone(), tx.amount.abs().to_bits());
        groups.entry(key).or_default().push(idx);
    }

    for indices in groups.into_values() {
        if indices.len() < MIN_GROUP_SIZE {
            continue;
        }

        let mut dates: Vec<_> = indices.iter().map(|&i| batch[i].date).collect();
        dates.sort();

        let gaps: Vec<i64> = dates
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_days())
            .collect();

        let monthly = gaps.iter().all(|gap| MONTHLY_GAP_DAYS.contains(gap));
        let weekly = gaps.iter().all(|gap| WEEKLY_GAP_DAYS.contains(gap));

        if monthly || weekly {
            for idx in indices {
                batch[idx].recurring = true;
            }
        }
    }
}
