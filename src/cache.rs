//! HTTP cache freshness decisions tuned to the day-ahead auction schedule.
//!
//! Once the auction for a day is final its prices never change again, so a
//! response that already covers days beyond the requested one can be cached
//! for a long time. Until then, responses must not outlive the next
//! scheduled publication.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::types::PriceEntry;

/// Day boundaries follow the bidding area's wall-clock time, DST included.
pub const MARKET_TZ: Tz = chrono_tz::Europe::Helsinki;

pub const CACHE_PUBLIC: &str = "public";
pub const CACHE_LONG: &str = "public, max-age=604800, immutable";

/// Nominal wall-clock instant (UTC) at which the day-ahead auction results
/// become available upstream.
const PUBLICATION_HOUR_UTC: u32 = 11;
const PUBLICATION_MINUTE_UTC: u32 = 57;

/// Cache headers to attach to a price response. Computed per request,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheDirective {
    pub control: String,
    pub expires: Option<DateTime<Utc>>,
}

/// Decide cache headers for a request of `date`, given the stored entries
/// overlapping its query window.
///
/// When the newest stored entry starts on a later local calendar day than
/// `date`, everything up to and including the requested day is final and
/// the response is immutable. Otherwise publication for the requested day
/// is still pending: before the publication instant, expire exactly then;
/// after it, use a short poll interval until the backend has ingested the
/// new data. An empty window deliberately reuses the pending branch.
pub fn cache_directive(
    now: DateTime<Utc>,
    date: NaiveDate,
    prices: &[PriceEntry],
) -> CacheDirective {
    if let Some(last) = prices.last() {
        let last_date = last.delivery_start.with_timezone(&MARKET_TZ).date_naive();
        if last_date > date {
            return CacheDirective {
                control: CACHE_LONG.to_string(),
                expires: None,
            };
        }
    }

    let publication_at = publication_time(date);
    if now > publication_at {
        CacheDirective {
            control: format!("{}, max-age=60", CACHE_PUBLIC),
            expires: None,
        }
    } else {
        CacheDirective {
            control: CACHE_PUBLIC.to_string(),
            expires: Some(publication_at),
        }
    }
}

/// The instant the auction results for `date` are published, in UTC
/// regardless of the market timezone's DST rules.
pub fn publication_time(date: NaiveDate) -> DateTime<Utc> {
    let time = date
        .and_hms_opt(PUBLICATION_HOUR_UTC, PUBLICATION_MINUTE_UTC, 0)
        .expect("publication time is a valid wall-clock time");
    Utc.from_utc_datetime(&time)
}

/// Store query window for a requested date: local midnight one day before
/// up to local midnight three days after, half-open. The latest day-ahead
/// data reaches into the following day, hence the wide upper bound.
pub fn query_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let from = local_midnight(date - Duration::days(1));
    let to = local_midnight(date + Duration::days(3));
    (from.with_timezone(&Utc), to.with_timezone(&Utc))
}

fn local_midnight(date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is a valid time");
    // EU DST transitions happen at 03:00/04:00 local, never at midnight.
    MARKET_TZ
        .from_local_datetime(&midnight)
        .single()
        .expect("midnight is unambiguous in the market timezone")
}

/// RFC 1123 GMT formatting for HTTP date headers.
/// Example: "Sat, 29 Mar 2025 11:57:00 GMT"
pub fn gmt_string_for_cache(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
