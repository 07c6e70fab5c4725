//! Score aggregation and the seismograph
//!
//! The weighted confluence matrix folds into the global scores; the rescaled
//! aggregate is sampled per symbol into a short history whose velocity and
//! acceleration flag sudden regime shifts.

use crate::alignment::{entries, Matrix};
use crate::kinematics::derivatives;
use crate::level::Level;
use bigdecimal::BigDecimal;
use confluence_utils::BoundedHistory;
use num_traits::ToPrimitive;
use serde_derive::*;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// Samples kept per symbol.
pub const HISTORY_CAPACITY: usize = 10;

/// Scalars produced by one aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalScores {
    pub global_alignment_score: f64,
    pub final_signal_quality_score: f64,
    pub side_struggle_score: f64,
    pub struggle_score_velocity: f64,
    pub struggle_score_acceleration: f64,
}

/// Per-symbol history of `(timestamp ms, side struggle score)` samples.
#[derive(Debug, Clone, Default)]
pub struct Seismograph {
    histories: HashMap<String, BoundedHistory<(i64, f64)>>,
}

impl Seismograph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, creating the symbol's history on first use.
    pub fn record(&mut self, symbol: &str, ts: i64, score: f64) -> &BoundedHistory<(i64, f64)> {
        let history = self
            .histories
            .entry(symbol.to_owned())
            .or_insert_with(|| BoundedHistory::new(HISTORY_CAPACITY));
        history.push((ts, score));
        history
    }

    pub fn history(&self, symbol: &str) -> Option<&BoundedHistory<(i64, f64)>> {
        self.histories.get(symbol)
    }

    /// Fold the weighted matrix and health scores into the final scalars and
    /// sample the result.
    ///
    /// An empty matrix yields all zeros and leaves the history untouched.
    pub fn aggregate(
        &mut self,
        symbol: &str,
        now_ms: i64,
        weighted: &Matrix,
        health: &BTreeMap<Level, f64>,
    ) -> FinalScores {
        let scores: Vec<f64> = entries(weighted).collect();
        if scores.is_empty() {
            return FinalScores::default();
        }
        let global_alignment_score = scores.iter().sum::<f64>() / scores.len() as f64;

        let positive: Vec<f64> = health.values().cloned().filter(|h| *h > 0.0).collect();
        let health_product = if positive.is_empty() {
            0.0
        } else {
            positive.iter().product()
        };
        let side_struggle_score = global_alignment_score * 100.0;

        let history = self.record(symbol, now_ms, side_struggle_score);
        let (timestamps, values): (Vec<i64>, Vec<BigDecimal>) = history
            .iter()
            .map(|&(ts, score)| (ts, to_decimal(score)))
            .unzip();
        let k = derivatives(&values, &timestamps);

        FinalScores {
            global_alignment_score,
            final_signal_quality_score: global_alignment_score * health_product,
            side_struggle_score,
            struggle_score_velocity: k.velocity.to_f64().unwrap_or(0.0),
            struggle_score_acceleration: k.acceleration.to_f64().unwrap_or(0.0),
        }
    }
}

// shortest decimal form of the float, non-finite scores count as zero
fn to_decimal(score: f64) -> BigDecimal {
    BigDecimal::from_str(&score.to_string()).unwrap_or_default()
}
