//! Render Layer
//!
//! Pure projection of game state into view structures: no business
//! logic, no UI dependency. Consumers (HTTP handlers, observers) get a
//! [`GameSnapshot`] and decide how to display it.

use crate::services::MarketSimulator;
use crate::types::{AccountState, HistoryEntry, Position, RankingEntry, TickerView};
use serde::{Deserialize, Serialize};

/// Capability invoked after every state mutation and every tick.
pub trait StateObserver: Send + Sync {
    fn on_state_changed(&self, snapshot: &GameSnapshot);
}

/// View of the active position with its derived display values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePositionView {
    pub symbol: String,
    pub side: crate::types::PositionSide,
    pub margin: f64,
    pub leverage: f64,
    pub notional: f64,
    pub quantity: f64,
    pub entry_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    pub last_price: f64,
    /// Unrealized P&L, rounded to 2 decimals
    pub profit: f64,
    /// Signed P&L percentage
    pub pnl_pct: f64,
    /// P&L formatted with an explicit sign, e.g. "+50"
    pub pnl_label: String,
    /// Display-only liquidation level
    pub liquidation_price: f64,
}

impl ActivePositionView {
    pub fn project(position: &Position, last_price: f64) -> Self {
        let profit = position.profit(last_price);
        Self {
            symbol: position.symbol.clone(),
            side: position.side,
            margin: position.margin,
            leverage: position.leverage,
            notional: position.notional,
            quantity: position.quantity,
            entry_price: position.entry_price,
            take_profit: position.take_profit,
            last_price,
            profit,
            pnl_pct: position.pnl_pct(last_price) * 100.0,
            pnl_label: signed_amount(profit),
            liquidation_price: position.liquidation_price(),
        }
    }
}

/// Full state projection pushed to observers and served over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub balance: f64,
    pub free: f64,
    pub tickers: Vec<TickerView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<ActivePositionView>,
    pub history: Vec<HistoryEntry>,
    pub ranking: Vec<RankingEntry>,
}

impl GameSnapshot {
    pub fn project(
        account: &AccountState,
        market: &MarketSimulator,
        active: Option<&Position>,
        history: &[HistoryEntry],
        ranking: &[RankingEntry],
    ) -> Self {
        let active = active.and_then(|position| {
            let last = market.last_price(&position.symbol)?;
            Some(ActivePositionView::project(position, last))
        });
        Self {
            balance: account.balance,
            free: account.free,
            tickers: market.tickers(),
            active,
            history: history.to_vec(),
            ranking: ranking.to_vec(),
        }
    }
}

/// Format a price with up to 6 decimal places, trailing zeros trimmed.
pub fn format_price(value: f64) -> String {
    let rounded = (value * 1_000_000.0).round() / 1_000_000.0;
    let mut s = format!("{:.6}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Format an amount with an explicit sign, trimming like
/// [`format_price`] (e.g. "+50", "-12.5").
pub fn signed_amount(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", format_price(value))
    } else {
        format!("-{}", format_price(-value))
    }
}
