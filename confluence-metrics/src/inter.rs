//! Inter-period confluence
//!
//! Agreement between every pair of periods: side against side, scaled by both
//! health scores, then weighted by configured level importance and by how much
//! of the outer period's window the inner one covers.

use crate::alignment::{round4, set_symmetric, Matrix};
use crate::collector::ActivePeriods;
use crate::config::WeightConfig;
use crate::level::Level;
use crate::period::{Period, Side};
use std::collections::BTreeMap;

/// Weight of the learning feedback loop, neutral until that loop exists.
pub const FEEDBACK_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterAlignment {
    pub matrix: Matrix,
    pub weighted: Matrix,
}

/// +1 on the same defined side, -1 on opposite defined sides, 0 if either is undefined.
pub fn side_direction(a: Side, b: Side) -> f64 {
    if !a.is_defined() || !b.is_defined() {
        0.0
    } else if a == b {
        1.0
    } else {
        -1.0
    }
}

/// Fraction of the outer window covered by the inner one when either period
/// contains the other, 1.0 otherwise.
pub fn temporal_relevance(a: &Period, b: &Period) -> f64 {
    let (duration_a, duration_b) = (a.duration(), b.duration());
    if a.is_contained_in(b) && duration_b > 0 {
        duration_a as f64 / duration_b as f64
    } else if b.is_contained_in(a) && duration_a > 0 {
        duration_b as f64 / duration_a as f64
    } else {
        1.0
    }
}

/// Confluence of every pair of periods holding a health score, self-pairs included.
pub fn align_periods(
    periods: &ActivePeriods<'_>,
    health: &BTreeMap<Level, f64>,
    weights: &WeightConfig,
) -> InterAlignment {
    let scored: Vec<(&Period, f64)> = health
        .iter()
        .filter_map(|(lv, &h)| periods.get(lv).map(|p| (*p, h)))
        .collect();

    let mut out = InterAlignment::default();
    for (i, &(a, health_a)) in scored.iter().enumerate() {
        for &(b, health_b) in scored.iter().skip(i) {
            let base = round4(side_direction(a.side, b.side) * (health_a * health_b).abs());
            set_symmetric(&mut out.matrix, a.name(), b.name(), base);

            let cosmic = weights.weight(a.name()) * weights.weight(b.name());
            let weight = cosmic * temporal_relevance(a, b) * FEEDBACK_WEIGHT;
            set_symmetric(&mut out.weighted, a.name(), b.name(), round4(base * weight));
        }
    }
    out
}
