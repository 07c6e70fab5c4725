use bigdecimal::BigDecimal;
use serde_derive::*;
use std::collections::BTreeMap;

/// Symmetric name-keyed score matrix.
pub type Matrix = BTreeMap<String, BTreeMap<String, f64>>;

/// Store a score under both `[a][b]` and `[b][a]`.
pub fn set_symmetric(matrix: &mut Matrix, a: &str, b: &str, score: f64) {
    matrix
        .entry(a.to_owned())
        .or_default()
        .insert(b.to_owned(), score);
    matrix
        .entry(b.to_owned())
        .or_default()
        .insert(a.to_owned(), score);
}

/// Every entry of the matrix, row by row.
pub fn entries(matrix: &Matrix) -> impl Iterator<Item = f64> + '_ {
    matrix.values().flat_map(|row| row.values().cloned())
}

/// Round half away from zero to 4 decimal places.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Per-symbol alignment record, rewritten in place by every engine cycle
/// and read by ranking and reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentOutput {
    pub symbol: String,
    pub last_update_ts: i64,

    /// period name -> metric name -> metric name -> score
    pub intra_period_matrix: BTreeMap<String, Matrix>,
    pub weighted_intra_period_matrix: BTreeMap<String, Matrix>,
    pub inter_period_matrix: Matrix,
    pub weighted_inter_period_matrix: Matrix,

    pub period_health_scores: BTreeMap<String, f64>,
    pub global_alignment_score: f64,
    pub final_signal_quality_score: f64,
    pub side_struggle_score: f64,
    pub struggle_score_velocity: f64,
    pub struggle_score_acceleration: f64,

    // category scores fed back by downstream consumers, never computed here
    pub global_directional_power_score: BigDecimal,
    pub global_impulse_vs_trend_score: BigDecimal,
    pub global_short_vs_long_tf_score: BigDecimal,
    pub global_side_consistency_score: BigDecimal,
}

impl AlignmentOutput {
    pub fn new(symbol: impl Into<String>) -> Self {
        AlignmentOutput {
            symbol: symbol.into(),
            ..Default::default()
        }
    }
}
