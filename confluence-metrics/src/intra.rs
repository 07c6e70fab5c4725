//! Intra-period alignment
//!
//! How consistently the non-zero metrics of one period point the same way,
//! reduced to a single health score per period.

use crate::alignment::{set_symmetric, Matrix};
use crate::collector::ActivePeriods;
use crate::level::Level;
use crate::period::Period;
use bigdecimal::BigDecimal;
use num_traits::{Signed, ToPrimitive, Zero};
use std::collections::BTreeMap;

lazy_static! {
    /// Metric magnitudes are scaled by this before clamping to 1.
    static ref MAGNITUDE_SCALE: BigDecimal = BigDecimal::from(1000);
    static ref ONE: BigDecimal = BigDecimal::from(1);
}

/// Alignment of one period with itself.
#[derive(Debug, Clone, PartialEq)]
pub struct IntraAlignment {
    pub matrix: Matrix,
    pub health: f64,
}

/// Matrices and health scores of every period that had a non-zero metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntraAlignments {
    pub matrices: BTreeMap<Level, Matrix>,
    pub health: BTreeMap<Level, f64>,
}

/// Score one pair of metric values.
///
/// Positive only when both share a strict sign; zero in either value counts as
/// disagreement.
pub fn pair_score(a: &BigDecimal, b: &BigDecimal) -> f64 {
    let same_sign = (a.is_positive() && b.is_positive()) || (a.is_negative() && b.is_negative());
    let direction = if same_sign { 1.0 } else { -1.0 };
    let magnitude = (normalized(a) * normalized(b)).to_f64().unwrap_or(0.0);
    direction * magnitude
}

fn normalized(v: &BigDecimal) -> BigDecimal {
    let scaled = v.abs() * &*MAGNITUDE_SCALE;
    if scaled > *ONE {
        ONE.clone()
    } else {
        scaled
    }
}

/// Align the non-zero metrics of one period.
///
/// `None` when every metric is zero. The health score is the level-weighted
/// mean of the off-diagonal pair scores, zero with fewer than two metrics.
pub fn align_period(period: &Period) -> Option<IntraAlignment> {
    let values: Vec<(&'static str, &BigDecimal)> = period
        .metric_values()
        .into_iter()
        .filter(|(_, v)| !v.is_zero())
        .collect();
    if values.is_empty() {
        return None;
    }

    let level_weight = period.level.cosmic_weight();
    let mut matrix = Matrix::new();
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (i, (name1, v1)) in values.iter().enumerate() {
        for (j, (name2, v2)) in values.iter().enumerate().skip(i) {
            let score = pair_score(v1, v2);
            set_symmetric(&mut matrix, name1, name2, score);
            if i != j {
                weighted_sum += score * level_weight;
                total_weight += level_weight;
            }
        }
    }
    let health = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    };
    Some(IntraAlignment { matrix, health })
}

/// Align every collected period, skipping those without any non-zero metric.
pub fn align_periods(periods: &ActivePeriods<'_>) -> IntraAlignments {
    let mut out = IntraAlignments::default();
    for (&level, period) in periods {
        match align_period(period) {
            Some(ia) => {
                out.matrices.insert(level, ia.matrix);
                out.health.insert(level, ia.health);
            }
            None => log::trace!("{} skipped: no non-zero metric", level),
        }
    }
    out
}
