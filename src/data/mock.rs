//! Synthetic market data used as the last-resort fallback
//!
//! Served only when the upstream API failed and nothing usable is cached.

use chrono::{DateTime, Duration, Utc};

use super::{HistoryPoint, MarketListing};

/// Number of daily points in a mock history series
const MOCK_HISTORY_DAYS: i64 = 30;

/// Price step between consecutive mock history points
const MOCK_PRICE_STEP: f64 = 100.0;

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    symbol: &str,
    name: &str,
    image: &str,
    price: f64,
    market_cap: f64,
    rank: u32,
    change_24h: f64,
) -> MarketListing {
    MarketListing {
        id: id.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        image: image.to_string(),
        current_price: Some(price),
        market_cap: Some(market_cap),
        market_cap_rank: Some(rank),
        price_change_percentage_24h: Some(change_24h),
    }
}

/// Fixed three-asset snapshot: bitcoin, ethereum, tether
pub fn mock_snapshot() -> Vec<MarketListing> {
    vec![
        listing(
            "bitcoin",
            "btc",
            "Bitcoin",
            "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            67000.0,
            1_320_000_000_000.0,
            1,
            2.5,
        ),
        listing(
            "ethereum",
            "eth",
            "Ethereum",
            "https://assets.coingecko.com/coins/images/279/large/ethereum.png",
            3500.0,
            420_000_000_000.0,
            2,
            1.8,
        ),
        listing(
            "tether",
            "usdt",
            "Tether",
            "https://assets.coingecko.com/coins/images/325/large/Tether.png",
            1.0,
            118_000_000_000.0,
            3,
            0.1,
        ),
    ]
}

/// Starting price of the mock series for an asset
fn base_price(asset_id: &str) -> f64 {
    match asset_id {
        "bitcoin" => 50000.0,
        "ethereum" => 3000.0,
        _ => 1.0,
    }
}

/// Mock daily price history ending now
pub fn mock_history(asset_id: &str) -> Vec<HistoryPoint> {
    mock_history_at(asset_id, Utc::now())
}

/// Mock daily price history ending at `now`
///
/// Returns 30 points, oldest first, one per day from 29 days before `now` up
/// to `now`. The k-th point (1-based) is priced `base + k * 100`, so prices
/// rise steadily toward the present.
pub fn mock_history_at(asset_id: &str, now: DateTime<Utc>) -> Vec<HistoryPoint> {
    let base = base_price(asset_id);

    (1..=MOCK_HISTORY_DAYS)
        .map(|k| HistoryPoint {
            date: (now - Duration::days(MOCK_HISTORY_DAYS - k)).timestamp(),
            price: base + k as f64 * MOCK_PRICE_STEP,
        })
        .collect()
}
