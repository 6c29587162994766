//! Market Types
//!
//! Static instrument configuration and per-tick market views.

use serde::{Deserialize, Serialize};

/// A tradable instrument with its synthetic price parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Ticker symbol (e.g. "BTC")
    pub symbol: String,
    /// Price the synthetic series is seeded around
    pub base_price: f64,
    /// Per-tick volatility coefficient for the random walk
    pub volatility: f64,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, base_price: f64, volatility: f64) -> Self {
        Self {
            symbol: symbol.into(),
            base_price,
            volatility,
        }
    }
}

/// Snapshot of a single instrument's latest tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerView {
    pub symbol: String,
    /// Latest price
    pub last: f64,
    /// Percent change versus the previous tick
    pub change_pct: f64,
    /// Recent price series for charting, oldest first
    pub series: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_construction() {
        let inst = Instrument::new("BTC", 0.023, 0.002);
        assert_eq!(inst.symbol, "BTC");
        assert_eq!(inst.base_price, 0.023);
        assert_eq!(inst.volatility, 0.002);
    }

    #[test]
    fn test_ticker_view_serialization() {
        let view = TickerView {
            symbol: "ETH".to_string(),
            last: 0.0065,
            change_pct: 1.25,
            series: vec![0.0064, 0.0065],
        };

        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"changePct\":1.25"));
        assert!(json.contains("\"symbol\":\"ETH\""));
    }
}
