//! Decides whether an upstream auction payload is trustworthy and converts
//! it into normalized price entries for the configured delivery area.

use rust_decimal::Decimal;
use tracing::warn;

use crate::types::{PriceDataResponse, PriceEntry};

/// Auction state label that marks a day's prices as published and immutable.
const FINAL_STATE: &str = "Final";

/// Validate a raw payload and extract the entries priced for `delivery_area`.
///
/// `None` means the payload is not usable yet (absent, wrong market or
/// currency, or the area's auction is not final). That is a normal outcome
/// during the morning hours, not an error; the specific reason is only
/// logged.
pub fn validate_and_extract(
    payload: Option<&PriceDataResponse>,
    delivery_area: &str,
    market: &str,
    currency: &str,
) -> Option<Vec<PriceEntry>> {
    let prices = match payload {
        Some(prices) => prices,
        None => {
            warn!("Expected to find prices but payload was empty");
            return None;
        }
    };

    if prices.market != market {
        warn!("Expected market {} but got {}", market, prices.market);
        return None;
    }
    if prices.currency != currency {
        warn!("Expected currency {} but got {}", currency, prices.currency);
        return None;
    }
    if prices.area_states.is_empty() {
        warn!("Expected areaStates to not be empty");
        return None;
    }

    // Area lists can contain duplicates; scan in listed order, first match
    // wins.
    let area_state = prices
        .area_states
        .iter()
        .find(|state| state.areas.iter().any(|area| area == delivery_area));
    let area_state = match area_state {
        Some(state) => state,
        None => {
            warn!("Couldn't find {} area from area states", delivery_area);
            return None;
        }
    };
    if area_state.state != FINAL_STATE {
        warn!(
            "Expected state {} but got {}",
            FINAL_STATE, area_state.state
        );
        return None;
    }

    // Entries without a price for the area are skipped silently; order is
    // preserved.
    let entries = prices
        .multi_area_entries
        .iter()
        .filter_map(|entry| {
            let price = entry.entry_per_area.get(delivery_area)?;
            Some(PriceEntry {
                price: Decimal::try_from(*price).ok()?,
                delivery_start: entry.delivery_start,
                delivery_end: entry.delivery_end,
            })
        })
        .collect();

    Some(entries)
}
