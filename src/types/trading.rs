//! Trading Types
//!
//! Types for the single-position leveraged trading game: the account,
//! the active position, and the trade history records.

use serde::{Deserialize, Serialize};

/// Prices never walk below this floor.
pub const MIN_PRICE: f64 = 0.000_001;

// =============================================================================
// Enums
// =============================================================================

/// Position side (long or short).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// P&L sign multiplier: +1 for long, -1 for short.
    pub fn direction(&self) -> f64 {
        match self {
            PositionSide::Long => 1.0,
            PositionSide::Short => -1.0,
        }
    }
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionSide::Long => write!(f, "long"),
            PositionSide::Short => write!(f, "short"),
        }
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// Closed by the player
    Manual,
    /// Take-profit level reached
    Take,
    /// Unrealized loss consumed the entire margin
    Liquidation,
}

impl CloseReason {
    /// History tag for this close. Take-profit exits are recorded as a
    /// plain close; only forced closes get the liquidation tag.
    pub fn history_kind(&self) -> HistoryKind {
        match self {
            CloseReason::Liquidation => HistoryKind::Liquidation,
            _ => HistoryKind::Close,
        }
    }
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloseReason::Manual => write!(f, "manual"),
            CloseReason::Take => write!(f, "take"),
            CloseReason::Liquidation => write!(f, "liquidation"),
        }
    }
}

/// Kind of event a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Open,
    Close,
    Liquidation,
}

impl std::fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryKind::Open => write!(f, "open"),
            HistoryKind::Close => write!(f, "close"),
            HistoryKind::Liquidation => write!(f, "liquidation"),
        }
    }
}

// =============================================================================
// Account
// =============================================================================

/// Account balances. `free` is the uncommitted capital available to open
/// positions; `balance` is recomputed from `free` after every close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountState {
    pub balance: f64,
    pub free: f64,
}

impl AccountState {
    pub fn new(balance: f64) -> Self {
        Self {
            balance,
            free: balance,
        }
    }
}

// =============================================================================
// Position
// =============================================================================

/// The single active leveraged position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Instrument symbol
    pub symbol: String,
    /// Long or short
    pub side: PositionSide,
    /// Margin reserved from free balance
    pub margin: f64,
    /// Leverage multiplier
    pub leverage: f64,
    /// Price at open
    pub entry_price: f64,
    /// Effective exposure: margin * leverage
    pub notional: f64,
    /// Quantity of the instrument: notional / entry price
    pub quantity: f64,
    /// Optional automatic favorable exit level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    /// Open timestamp (ms since epoch)
    pub opened_at: i64,
}

impl Position {
    /// Create a position at the given entry price. Notional and quantity
    /// are derived from margin and leverage.
    pub fn open(
        symbol: String,
        side: PositionSide,
        margin: f64,
        leverage: f64,
        entry_price: f64,
        take_profit: Option<f64>,
    ) -> Self {
        let notional = margin * leverage;
        Self {
            symbol,
            side,
            margin,
            leverage,
            entry_price,
            notional,
            quantity: notional / entry_price,
            take_profit,
            opened_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Signed P&L fraction at the given price: price move relative to
    /// entry, sign-flipped for shorts.
    pub fn pnl_pct(&self, price: f64) -> f64 {
        (price - self.entry_price) / self.entry_price * self.side.direction()
    }

    /// Unrounded P&L in quote currency at the given price.
    pub fn raw_pnl(&self, price: f64) -> f64 {
        self.notional * self.pnl_pct(price)
    }

    /// P&L rounded to 2 decimal places (half away from zero on the
    /// scaled integer).
    pub fn profit(&self, price: f64) -> f64 {
        (self.raw_pnl(price) * 100.0).round() / 100.0
    }

    /// Magnitude of the unrealized loss at the given price (0 when the
    /// position is in profit).
    pub fn unrealized_loss(&self, price: f64) -> f64 {
        -self.raw_pnl(price).min(0.0)
    }

    /// Whether the take-profit level has been reached at the given price.
    pub fn take_profit_hit(&self, price: f64) -> bool {
        match self.take_profit {
            Some(take) => match self.side {
                PositionSide::Long => price >= take,
                PositionSide::Short => price <= take,
            },
            None => false,
        }
    }

    /// Display-only liquidation level, derived from loss == margin.
    /// The long-side level is clamped to the price floor.
    pub fn liquidation_price(&self) -> f64 {
        let frac = -self.margin / self.notional;
        match self.side {
            PositionSide::Long => (self.entry_price * (1.0 + frac)).max(MIN_PRICE),
            PositionSide::Short => self.entry_price * (1.0 - frac),
        }
    }
}

// =============================================================================
// History & requests
// =============================================================================

/// Immutable record of an open/close/liquidation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub symbol: String,
    pub side: PositionSide,
    pub margin: f64,
    pub leverage: f64,
    /// Entry price (open events record it as the traded price)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Entry price at close time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<f64>,
    /// Exit price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,
    /// Realized profit (rounded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pnl: Option<f64>,
    /// Event timestamp (ms since epoch)
    pub time: i64,
}

impl HistoryEntry {
    /// Record for a freshly opened position.
    pub fn opened(position: &Position) -> Self {
        Self {
            kind: HistoryKind::Open,
            symbol: position.symbol.clone(),
            side: position.side,
            margin: position.margin,
            leverage: position.leverage,
            price: Some(position.entry_price),
            entry: None,
            close: None,
            pnl: None,
            time: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Record for a closed (or liquidated) position.
    pub fn closed(position: &Position, reason: CloseReason, exit_price: f64, pnl: f64) -> Self {
        Self {
            kind: reason.history_kind(),
            symbol: position.symbol.clone(),
            side: position.side,
            margin: position.margin,
            leverage: position.leverage,
            price: None,
            entry: Some(position.entry_price),
            close: Some(exit_price),
            pnl: Some(pnl),
            time: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Request to open a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRequest {
    pub symbol: String,
    pub side: PositionSide,
    pub margin: f64,
    pub leverage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
}

/// Outcome of a closed trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedTrade {
    pub reason: CloseReason,
    pub symbol: String,
    pub side: PositionSide,
    pub entry_price: f64,
    pub exit_price: f64,
    /// Realized profit, rounded to 2 decimals
    pub profit: f64,
    /// Margin + profit returned to the account (0 on wipeout)
    pub returned: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_position() -> Position {
        Position::open("BTC".to_string(), PositionSide::Long, 100.0, 10.0, 0.02, None)
    }

    #[test]
    fn test_position_derives_notional_and_quantity() {
        let p = long_position();
        assert_eq!(p.notional, 1000.0);
        assert_eq!(p.quantity, 1000.0 / 0.02);
    }

    #[test]
    fn test_long_pnl_signs() {
        let p = long_position();
        assert!(p.raw_pnl(0.021) > 0.0);
        assert!(p.raw_pnl(0.019) < 0.0);
    }

    #[test]
    fn test_short_pnl_sign_flipped() {
        let p = Position::open("BTC".to_string(), PositionSide::Short, 100.0, 10.0, 0.02, None);
        assert!(p.raw_pnl(0.019) > 0.0);
        assert!(p.raw_pnl(0.021) < 0.0);
    }

    #[test]
    fn test_profit_rounds_to_cents() {
        let p = long_position();
        // +5% on a 1000 notional
        assert_eq!(p.profit(0.021), 50.0);
    }

    #[test]
    fn test_unrealized_loss_zero_in_profit() {
        let p = long_position();
        assert_eq!(p.unrealized_loss(0.021), 0.0);
        assert!(p.unrealized_loss(0.019) > 0.0);
    }

    #[test]
    fn test_take_profit_hit_by_side() {
        let mut long = long_position();
        long.take_profit = Some(0.022);
        assert!(!long.take_profit_hit(0.021));
        assert!(long.take_profit_hit(0.022));

        let mut short =
            Position::open("BTC".to_string(), PositionSide::Short, 100.0, 10.0, 0.02, None);
        short.take_profit = Some(0.018);
        assert!(!short.take_profit_hit(0.019));
        assert!(short.take_profit_hit(0.018));
    }

    #[test]
    fn test_liquidation_price_asymmetry() {
        let long = long_position();
        // margin/notional = 0.1 -> 10% adverse move
        assert!((long.liquidation_price() - 0.018).abs() < 1e-12);

        let short = Position::open("BTC".to_string(), PositionSide::Short, 100.0, 10.0, 0.02, None);
        assert!((short.liquidation_price() - 0.022).abs() < 1e-12);
    }

    #[test]
    fn test_long_liquidation_price_clamped_to_floor() {
        // 1x leverage long: loss == margin only at price 0, clamp kicks in
        let p = Position::open("BTC".to_string(), PositionSide::Long, 100.0, 1.0, 0.02, None);
        assert_eq!(p.liquidation_price(), MIN_PRICE);
    }

    #[test]
    fn test_history_entry_tags() {
        let p = long_position();
        let open = HistoryEntry::opened(&p);
        assert_eq!(open.kind, HistoryKind::Open);
        assert_eq!(open.price, Some(0.02));
        assert!(open.pnl.is_none());

        let take = HistoryEntry::closed(&p, CloseReason::Take, 0.022, 100.0);
        assert_eq!(take.kind, HistoryKind::Close);

        let liq = HistoryEntry::closed(&p, CloseReason::Liquidation, 0.018, -100.0);
        assert_eq!(liq.kind, HistoryKind::Liquidation);
        assert_eq!(liq.close, Some(0.018));
    }

    #[test]
    fn test_position_serialization_round_trip() {
        let p = long_position();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"entryPrice\""));
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
