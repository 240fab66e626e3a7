//! Market overview derived from a snapshot

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::MarketListing;

/// How many listings the market-cap leaderboard holds
const TOP_MARKET_CAP_LEN: usize = 5;

/// Highlights of a market snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    /// Listing with the largest 24h gain
    pub top_gainer: Option<MarketListing>,
    /// Listing with the largest 24h loss
    pub top_loser: Option<MarketListing>,
    /// Largest listings by market cap, largest first
    pub top_market_cap: Vec<MarketListing>,
}

/// Builds a summary of `listings`
///
/// Listings without a known 24h change are skipped when picking the gainer
/// and loser; listings without a market cap sort after all others.
pub fn summarize(listings: &[MarketListing]) -> MarketSummary {
    let with_change = || {
        listings
            .iter()
            .filter_map(|l| l.price_change_percentage_24h.map(|change| (change, l)))
    };

    let top_gainer = with_change()
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, l)| l.clone());
    let top_loser = with_change()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, l)| l.clone());

    let mut by_cap: Vec<&MarketListing> = listings.iter().collect();
    by_cap.sort_by(|a, b| match (a.market_cap, b.market_cap) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    MarketSummary {
        top_gainer,
        top_loser,
        top_market_cap: by_cap
            .into_iter()
            .take(TOP_MARKET_CAP_LEN)
            .cloned()
            .collect(),
    }
}
