// flow-core/src/backtest/ledger.rs

use flow_common::utils::decimal_to_f64;
use flow_common::TradeOutcome;
use rust_decimal::Decimal;

/// Running account state across the trades of a single backtest.
#[derive(Debug, Clone)]
pub struct Ledger {
    initial_capital: Decimal,
    capital: Decimal,
    peak_capital: Decimal,
    total_profit: Decimal,
    max_drawdown: f64,
    wins: usize,
    losses: usize,
    consecutive_wins: u32,
    consecutive_losses: u32,
    max_consecutive_wins: u32,
    max_consecutive_losses: u32,
}

impl Ledger {
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            capital: initial_capital,
            peak_capital: initial_capital,
            total_profit: Decimal::ZERO,
            max_drawdown: 0.0,
            wins: 0,
            losses: 0,
            consecutive_wins: 0,
            consecutive_losses: 0,
            max_consecutive_wins: 0,
            max_consecutive_losses: 0,
        }
    }

    /// Book a closed trade and return the drawdown from peak in percent.
    pub fn record(&mut self, outcome: TradeOutcome, profit: Decimal) -> f64 {
        match outcome {
            TradeOutcome::Win => {
                self.wins += 1;
                self.consecutive_wins += 1;
                self.consecutive_losses = 0;
                self.max_consecutive_wins = self.max_consecutive_wins.max(self.consecutive_wins);
            }
            TradeOutcome::Loss => {
                self.losses += 1;
                self.consecutive_losses += 1;
                self.consecutive_wins = 0;
                self.max_consecutive_losses =
                    self.max_consecutive_losses.max(self.consecutive_losses);
            }
        }

        self.capital += profit;
        self.total_profit += profit;

        if self.capital > self.peak_capital {
            self.peak_capital = self.capital;
        }

        let drawdown = self.current_drawdown();
        self.max_drawdown = self.max_drawdown.max(drawdown);
        drawdown
    }

    fn current_drawdown(&self) -> f64 {
        if self.peak_capital <= Decimal::ZERO {
            return 0.0;
        }
        let drawdown = (self.peak_capital - self.capital) / self.peak_capital * Decimal::ONE_HUNDRED;
        decimal_to_f64(drawdown).max(0.0)
    }

    pub fn initial_capital(&self) -> Decimal {
        self.initial_capital
    }

    pub fn capital(&self) -> Decimal {
        self.capital
    }

    pub fn total_profit(&self) -> Decimal {
        self.total_profit
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    pub fn wins(&self) -> usize {
        self.wins
    }

    pub fn losses(&self) -> usize {
        self.losses
    }

    pub fn total_trades(&self) -> usize {
        self.wins + self.losses
    }

    pub fn max_consecutive_wins(&self) -> u32 {
        self.max_consecutive_wins
    }

    pub fn max_consecutive_losses(&self) -> u32 {
        self.max_consecutive_losses
    }
}
