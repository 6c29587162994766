//! Synthetic Market Simulator
//!
//! Maintains a bounded rolling price history per instrument and advances
//! it once per tick with a bounded random walk. Purely deterministic
//! given the injected random source.

use crate::config::PRICE_HISTORY_LEN;
use crate::types::{Instrument, TickerView, MIN_PRICE};
use rand::Rng;
use std::collections::HashMap;
use std::collections::VecDeque;

/// Per-instrument synthetic price series.
pub struct MarketSimulator {
    instruments: Vec<Instrument>,
    series: HashMap<String, VecDeque<f64>>,
    capacity: usize,
}

impl MarketSimulator {
    /// Create a simulator for the given instruments. Series start empty;
    /// call [`seed`](Self::seed) before the first tick.
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self {
            instruments,
            series: HashMap::new(),
            capacity: PRICE_HISTORY_LEN,
        }
    }

    /// Seed every instrument's series with a smoothed sine-based
    /// synthetic history of full capacity.
    pub fn seed(&mut self) {
        for inst in &self.instruments {
            let series = (0..self.capacity)
                .map(|i| inst.base_price * (1.0 + 0.001 * (i as f64 / 5.0).sin()))
                .collect();
            self.series.insert(inst.symbol.clone(), series);
        }
    }

    /// Backfill a flat series at the base price for any configured
    /// instrument that has none (e.g. added to the config after a
    /// restore).
    pub fn backfill_missing(&mut self) {
        for inst in &self.instruments {
            self.series
                .entry(inst.symbol.clone())
                .or_insert_with(|| (0..self.capacity).map(|_| inst.base_price).collect());
        }
    }

    /// Advance every series by one tick. The perturbation is scaled by
    /// the instrument volatility and a secondary dampening factor of
    /// +/-25% of the volatility-scaled step.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) {
        for inst in &self.instruments {
            let Some(series) = self.series.get_mut(&inst.symbol) else {
                continue;
            };
            let last = series.back().copied().unwrap_or(inst.base_price);
            let change = (rng.gen::<f64>() - 0.5)
                * inst.volatility
                * (1.0 + (rng.gen::<f64>() - 0.5) * 0.5);
            let next = (last * (1.0 + change)).max(MIN_PRICE);
            series.push_back(next);
            while series.len() > self.capacity {
                series.pop_front();
            }
        }
    }

    /// Append a specific price for a symbol, clamped to the floor and
    /// subject to the same eviction as the random walk.
    pub fn push_price(&mut self, symbol: &str, price: f64) {
        let Some(series) = self.series.get_mut(symbol) else {
            return;
        };
        series.push_back(price.max(MIN_PRICE));
        while series.len() > self.capacity {
            series.pop_front();
        }
    }

    /// Latest price for a symbol.
    pub fn last_price(&self, symbol: &str) -> Option<f64> {
        self.series.get(symbol)?.back().copied()
    }

    /// Price one tick before the latest (falls back to the latest for a
    /// single-element series).
    pub fn prev_price(&self, symbol: &str) -> Option<f64> {
        let series = self.series.get(symbol)?;
        let last = series.back().copied()?;
        Some(series.iter().rev().nth(1).copied().unwrap_or(last))
    }

    /// Full series for a symbol, oldest first.
    pub fn series(&self, symbol: &str) -> Option<&VecDeque<f64>> {
        self.series.get(symbol)
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.instruments.iter().any(|i| i.symbol == symbol)
    }

    /// Per-instrument tick views for rendering.
    pub fn tickers(&self) -> Vec<TickerView> {
        self.instruments
            .iter()
            .filter_map(|inst| {
                let last = self.last_price(&inst.symbol)?;
                let prev = self.prev_price(&inst.symbol)?;
                Some(TickerView {
                    symbol: inst.symbol.clone(),
                    last,
                    change_pct: (last - prev) / prev * 100.0,
                    series: self.series.get(&inst.symbol)?.iter().copied().collect(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_instruments;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_market() -> MarketSimulator {
        let mut market = MarketSimulator::new(default_instruments());
        market.seed();
        market
    }

    #[test]
    fn test_seed_fills_every_series_to_capacity() {
        let market = seeded_market();
        for inst in market.instruments() {
            assert_eq!(market.series(&inst.symbol).unwrap().len(), PRICE_HISTORY_LEN);
        }
    }

    #[test]
    fn test_seed_is_sine_shaped_around_base() {
        let market = seeded_market();
        let series = market.series("BTC").unwrap();
        // First element is exactly the base price (sin(0) == 0)
        assert!((series[0] - 0.023).abs() < 1e-12);
        // All seeded prices stay within the 0.1% envelope
        for price in series {
            assert!((price / 0.023 - 1.0).abs() <= 0.001 + 1e-12);
        }
    }

    #[test]
    fn test_advance_respects_capacity_and_floor() {
        let mut market = seeded_market();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            market.advance(&mut rng);
        }
        for inst in market.instruments() {
            let series = market.series(&inst.symbol).unwrap();
            assert_eq!(series.len(), PRICE_HISTORY_LEN);
            assert!(series.iter().all(|p| *p >= MIN_PRICE));
        }
    }

    #[test]
    fn test_advance_is_deterministic_for_a_seeded_rng() {
        let mut a = seeded_market();
        let mut b = seeded_market();
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            a.advance(&mut rng_a);
            b.advance(&mut rng_b);
        }
        assert_eq!(a.last_price("BTC"), b.last_price("BTC"));
        assert_eq!(a.last_price("XRP"), b.last_price("XRP"));
    }

    #[test]
    fn test_step_is_bounded_by_volatility() {
        let mut market = seeded_market();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let before: Vec<(String, f64)> = market
                .instruments()
                .iter()
                .map(|i| (i.symbol.clone(), market.last_price(&i.symbol).unwrap()))
                .collect();
            market.advance(&mut rng);
            for (symbol, last) in before {
                let inst = market
                    .instruments()
                    .iter()
                    .find(|i| i.symbol == symbol)
                    .unwrap()
                    .clone();
                let next = market.last_price(&symbol).unwrap();
                // |change| <= 0.5 * vol * 1.25
                let bound = 0.5 * inst.volatility * 1.25 + 1e-12;
                assert!((next / last - 1.0).abs() <= bound);
            }
        }
    }

    #[test]
    fn test_backfill_missing_is_flat_at_base() {
        let mut market = seeded_market();
        market.instruments.push(Instrument::new("DOGE", 0.0001, 0.005));
        market.backfill_missing();
        let series = market.series("DOGE").unwrap();
        assert_eq!(series.len(), PRICE_HISTORY_LEN);
        assert!(series.iter().all(|p| *p == 0.0001));
        // Existing series untouched
        assert!((market.series("BTC").unwrap()[0] - 0.023).abs() < 1e-12);
    }

    #[test]
    fn test_tickers_report_change_vs_previous_tick() {
        let mut market = seeded_market();
        let mut rng = StdRng::seed_from_u64(9);
        market.advance(&mut rng);
        for ticker in market.tickers() {
            let prev = market.prev_price(&ticker.symbol).unwrap();
            let expected = (ticker.last - prev) / prev * 100.0;
            assert!((ticker.change_pct - expected).abs() < 1e-12);
            assert_eq!(ticker.series.len(), PRICE_HISTORY_LEN);
        }
    }
}
