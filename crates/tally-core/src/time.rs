//! Reference timezone helpers
//!
//! All wall-clock decisions (import timestamps, the daily summary window)
//! are anchored to one fixed reference timezone rather than the server's
//! local zone.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// The fixed reference timezone for the ledger.
pub const REFERENCE_TZ: Tz = chrono_tz::Asia::Jakarta;

/// Current instant in the reference timezone.
pub fn now_reference() -> DateTime<Tz> {
    Utc::now().with_timezone(&REFERENCE_TZ)
}

/// Today's calendar date in the reference timezone.
pub fn today_reference() -> NaiveDate {
    now_reference().date_naive()
}
