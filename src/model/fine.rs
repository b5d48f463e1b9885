use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use super::leg::PlayerCounters;

/// Whole pence. Fines are computed in pence so the two-decimal result is exact.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pence(pub i64);

impl Pence {
    pub const ZERO: Pence = Pence(0);

    /// Amount in pounds, two decimal places.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_pounds(self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Pence {
    type Output = Pence;

    fn add(self, rhs: Pence) -> Pence {
        Pence(self.0 + rhs.0)
    }
}

impl Sum for Pence {
    fn sum<I: Iterator<Item = Pence>>(iter: I) -> Pence {
        iter.fold(Pence::ZERO, Add::add)
    }
}

impl fmt::Display for Pence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{sign}£{}.{:02}", abs / 100, abs % 100)
    }
}

/// Fixed fine rates, all in pence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FineRateTable {
    pub score_26: i64,
    pub miss: i64,
    pub dotd: i64,
    /// Tens tokens strictly below this value are fined at face value.
    pub tens_cap: i64,
}

pub const FINE_RATES: FineRateTable = FineRateTable {
    score_26: 26,
    miss: 50,
    dotd: 250,
    tens_cap: 10,
};

impl Default for FineRateTable {
    fn default() -> Self {
        FINE_RATES
    }
}

/// Sum of the tens tokens that count towards a fine.
///
/// Tokens are comma separated. Empty, non-numeric or capped tokens are skipped. Negative
/// tokens count, so they lower the fine.
#[must_use]
pub fn tens_pence(tens: &str, rates: &FineRateTable) -> i64 {
    tens.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<i64>().ok())
        .filter(|value| *value < rates.tens_cap)
        .sum()
}

/// Fine owed by one player for one leg.
#[must_use]
pub fn compute_fine(counters: &PlayerCounters, rates: &FineRateTable) -> Pence {
    let pence = i64::from(counters.score_26) * rates.score_26
        + i64::from(counters.miss) * rates.miss
        + i64::from(counters.dotd) * rates.dotd
        + tens_pence(&counters.tens, rates);
    Pence(pence)
}
