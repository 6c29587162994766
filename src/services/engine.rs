//! Game Session
//!
//! Owns the whole game state: account balances, the synthetic market,
//! the single active position, trade history and the local leaderboard.
//! Every mutation persists the state wholesale and notifies observers.
//!
//! The session is driven by [`tick`](GameSession::tick) once per second
//! and by direct player actions (open, close, reset, set balance).

use crate::config::{Config, HISTORY_CAP};
use crate::render::{GameSnapshot, StateObserver};
use crate::services::market::MarketSimulator;
use crate::services::ranking::Leaderboard;
use crate::services::store::{JsonStore, StoredState};
use crate::services::{HostNotifier, NoopNotifier, NoopReporter, ScoreReporter};
use crate::types::{
    AccountState, CloseReason, ClosedTrade, HistoryEntry, OpenRequest, Position,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Game session errors.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Invalid margin: requested {requested}, free {available}")]
    InvalidMargin { requested: f64, available: f64 },

    #[error("A position is already open")]
    PositionAlreadyOpen,

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Balance must be positive, got {0}")]
    InvalidBalance(f64),
}

/// The single-player trading game session.
pub struct GameSession {
    account: AccountState,
    history: Vec<HistoryEntry>,
    leaderboard: Leaderboard,
    market: MarketSimulator,
    active: Option<Position>,
    store: Arc<JsonStore>,
    notifier: Arc<dyn HostNotifier>,
    reporter: Arc<dyn ScoreReporter>,
    observers: Vec<Arc<dyn StateObserver>>,
    player_name: String,
    player_id: String,
    default_balance: f64,
    rng: StdRng,
}

impl GameSession {
    /// Restore a session from the store, seeding fresh price series.
    /// Missing or malformed records start from defaults.
    pub fn restore(config: &Config, store: Arc<JsonStore>) -> Self {
        let state = store.load_state(config.default_balance);

        let mut market = MarketSimulator::new(config.instruments.clone());
        market.seed();
        market.backfill_missing();

        if let Some(ref position) = state.active {
            if !market.has_symbol(&position.symbol) {
                warn!(
                    "Restored position references unknown symbol {}, keeping it anyway",
                    position.symbol
                );
            }
        }

        Self {
            account: state.account,
            history: state.history,
            leaderboard: Leaderboard::from_entries(state.ranking),
            market,
            active: state.active,
            store,
            notifier: Arc::new(NoopNotifier),
            reporter: Arc::new(NoopReporter),
            observers: Vec::new(),
            player_name: config.player_name.clone(),
            player_id: config.player_id.clone(),
            default_balance: config.default_balance,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the random source (seeded rng in tests).
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn set_notifier(&mut self, notifier: Arc<dyn HostNotifier>) {
        self.notifier = notifier;
    }

    pub fn set_reporter(&mut self, reporter: Arc<dyn ScoreReporter>) {
        self.reporter = reporter;
    }

    pub fn add_observer(&mut self, observer: Arc<dyn StateObserver>) {
        self.observers.push(observer);
    }

    /// Announce the session to the host surface and push the initial
    /// state to observers.
    pub fn start(&self) {
        self.notifier.ready();
        self.notifier.show_balance(self.account.balance);
        self.notify_observers();
    }

    // ==========================================================================
    // Tick loop
    // ==========================================================================

    /// One game tick: advance prices, check the active position's
    /// triggers, re-render.
    pub fn tick(&mut self) -> Option<ClosedTrade> {
        self.market.advance(&mut self.rng);
        let closed = self.check_triggers();
        self.notify_observers();
        closed
    }

    /// Inject a price for a symbol and run the trigger check against it.
    pub fn apply_price(&mut self, symbol: &str, price: f64) -> Option<ClosedTrade> {
        self.market.push_price(symbol, price);
        let closed = self.check_triggers();
        self.notify_observers();
        closed
    }

    /// Check take-profit and liquidation for the active position.
    /// Take-profit is checked first; when both conditions hold on the
    /// same tick, the close reason is `take`.
    pub fn check_triggers(&mut self) -> Option<ClosedTrade> {
        let position = self.active.as_ref()?;
        let last = self.market.last_price(&position.symbol)?;

        if position.take_profit_hit(last) {
            return self.close_position(CloseReason::Take, Some(last));
        }

        if position.unrealized_loss(last) >= position.margin {
            return self.close_position(CloseReason::Liquidation, Some(last));
        }

        None
    }

    // ==========================================================================
    // Player actions
    // ==========================================================================

    /// Open a leveraged position, reserving the margin from the free
    /// balance. Only one position may exist at a time.
    pub fn open_position(&mut self, request: OpenRequest) -> Result<Position, GameError> {
        if request.margin <= 0.0 || request.margin > self.account.free {
            return Err(GameError::InvalidMargin {
                requested: request.margin,
                available: self.account.free,
            });
        }
        if self.active.is_some() {
            return Err(GameError::PositionAlreadyOpen);
        }
        let price = self
            .market
            .last_price(&request.symbol)
            .ok_or_else(|| GameError::UnknownSymbol(request.symbol.clone()))?;

        let position = Position::open(
            request.symbol,
            request.side,
            request.margin,
            request.leverage,
            price,
            request.take_profit,
        );

        self.account.free -= position.margin;
        self.push_history(HistoryEntry::opened(&position));
        self.active = Some(position.clone());
        self.persist();
        self.notify_observers();

        info!(
            "Opened {} {} {}x: margin {} @ {}",
            position.symbol, position.side, position.leverage, position.margin, price
        );
        Ok(position)
    }

    /// Close the active position. No-op when none is open. A return of
    /// margin + profit at or below zero wipes the whole account to zero.
    pub fn close_position(
        &mut self,
        reason: CloseReason,
        override_price: Option<f64>,
    ) -> Option<ClosedTrade> {
        let position = self.active.take()?;
        let exit_price = override_price
            .or_else(|| self.market.last_price(&position.symbol))
            .unwrap_or(position.entry_price);

        let profit = position.profit(exit_price);
        let returned = position.margin + profit;

        if returned <= 0.0 {
            self.account.balance = 0.0;
            self.account.free = 0.0;
        } else {
            self.account.free += returned;
            self.account.balance = self.account.free.max(0.0);
        }

        self.push_history(HistoryEntry::closed(&position, reason, exit_price, profit));
        self.leaderboard
            .upsert(&self.player_name, self.account.balance);
        self.reporter
            .report_score(&self.player_id, &self.player_name, self.account.balance);
        self.persist();
        self.notify_observers();

        info!(
            "Closed {} {} ({}): pnl {} @ {}",
            position.symbol, position.side, reason, profit, exit_price
        );

        Some(ClosedTrade {
            reason,
            symbol: position.symbol,
            side: position.side,
            entry_price: position.entry_price,
            exit_price,
            profit,
            returned: if returned <= 0.0 { 0.0 } else { returned },
        })
    }

    /// Set the account balance to a fresh starting value.
    pub fn set_balance(&mut self, balance: f64) -> Result<(), GameError> {
        if balance <= 0.0 {
            return Err(GameError::InvalidBalance(balance));
        }
        self.account.balance = balance;
        self.account.free = balance;
        self.leaderboard.upsert(&self.player_name, balance);
        self.persist();
        self.notify_observers();
        Ok(())
    }

    /// Erase all persisted records and start over from defaults.
    pub fn reset(&mut self) {
        self.store.wipe();
        self.account = AccountState::new(self.default_balance);
        self.history.clear();
        self.leaderboard = Leaderboard::new();
        self.active = None;
        self.market.seed();
        self.notify_observers();
        info!("Game reset to a fresh state");
    }

    // ==========================================================================
    // Projection & internals
    // ==========================================================================

    /// Project the full state for rendering.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::project(
            &self.account,
            &self.market,
            self.active.as_ref(),
            &self.history,
            self.leaderboard.entries(),
        )
    }

    fn push_history(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
        self.history.truncate(HISTORY_CAP);
    }

    fn persist(&self) {
        self.store.save_state(&StoredState {
            account: self.account,
            history: self.history.clone(),
            ranking: self.leaderboard.entries().to_vec(),
            active: self.active.clone(),
        });
    }

    fn notify_observers(&self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer.on_state_changed(&snapshot);
        }
    }

    pub fn account(&self) -> AccountState {
        self.account
    }

    pub fn active(&self) -> Option<&Position> {
        self.active.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn market(&self) -> &MarketSimulator {
        &self.market
    }
}
