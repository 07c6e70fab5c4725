use crate::alignment::AlignmentOutput;
use crate::collector::{active_levels, collect_periods, PeriodSource};
use crate::config::WeightConfig;
use crate::seismograph::{FinalScores, Seismograph};
use crate::{inter, intra};
use confluence_utils::{millis_to_datetime, now_millis};
use std::collections::BTreeMap;

/// Wall clock in unix milliseconds.
pub type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// Runs the alignment pipeline for any number of symbols.
///
/// The engine owns the per-symbol seismograph histories. Cycles for the same
/// symbol must not run concurrently, the `&mut self` receiver enforces it for
/// a single engine.
pub struct MetricsEngine {
    weights: WeightConfig,
    seismograph: Seismograph,
    clock: Clock,
}

impl MetricsEngine {
    pub fn new(weights: WeightConfig) -> Self {
        Self::with_clock(weights, Box::new(now_millis))
    }

    pub fn with_clock(weights: WeightConfig, clock: Clock) -> Self {
        MetricsEngine {
            weights,
            seismograph: Seismograph::new(),
            clock,
        }
    }

    pub fn weights(&self) -> &WeightConfig {
        &self.weights
    }

    pub fn seismograph(&self) -> &Seismograph {
        &self.seismograph
    }

    /// One update cycle for a symbol.
    ///
    /// Refreshes the kinematics of every active period in place, aligns the
    /// periods within and across themselves, aggregates and writes everything
    /// into `output`. Returns `None` without touching anything when no period
    /// is active.
    pub fn update_all_metrics<S: PeriodSource + ?Sized>(
        &mut self,
        symbol: &str,
        source: &mut S,
        output: &mut AlignmentOutput,
    ) -> Option<FinalScores> {
        let levels = active_levels(source);
        if levels.is_empty() {
            return None;
        }
        for &lv in &levels {
            if let Some(period) = source.period_mut(lv) {
                period.update_kinematics();
            }
        }

        let periods = collect_periods(&*source);
        let intra = intra::align_periods(&periods);
        let inter = inter::align_periods(&periods, &intra.health, &self.weights);
        let now = (self.clock)();
        let scores = self
            .seismograph
            .aggregate(symbol, now, &inter.weighted, &intra.health);

        let intra_matrices: BTreeMap<_, _> = intra
            .matrices
            .into_iter()
            .map(|(lv, m)| (lv.name().to_owned(), m))
            .collect();
        output.weighted_intra_period_matrix = intra_matrices.clone();
        output.intra_period_matrix = intra_matrices;
        output.inter_period_matrix = inter.matrix;
        output.weighted_inter_period_matrix = inter.weighted;
        output.period_health_scores = intra
            .health
            .iter()
            .map(|(lv, h)| (lv.name().to_owned(), *h))
            .collect();
        output.global_alignment_score = scores.global_alignment_score;
        output.final_signal_quality_score = scores.final_signal_quality_score;
        output.side_struggle_score = scores.side_struggle_score;
        output.struggle_score_velocity = scores.struggle_score_velocity;
        output.struggle_score_acceleration = scores.struggle_score_acceleration;
        output.last_update_ts = now;

        log::debug!(
            "[{}] {} active periods aligned at {}, supernova accel {:.4}",
            symbol,
            periods.len(),
            millis_to_datetime(now)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default(),
            scores.struggle_score_acceleration
        );
        Some(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::tests::MapSource;
    use crate::level::Level;
    use crate::period::{Period, Side};
    use bigdecimal::BigDecimal;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    fn period(level: Level, side: Side, prices: &[i64]) -> Period {
        let mut p = Period::new(level);
        p.active = true;
        p.side = side;
        for (i, price) in prices.iter().enumerate() {
            p.push_price(i as i64 * 1_000, BigDecimal::from(*price));
        }
        p.entry_ts = 0;
        p.exit_ts = p.timestamps.last().cloned().unwrap_or(0);
        p
    }

    fn ticking_engine(weights: WeightConfig) -> MetricsEngine {
        let clock = Arc::new(AtomicI64::new(1_000_000));
        MetricsEngine::with_clock(
            weights,
            Box::new(move || clock.fetch_add(1_000, Ordering::SeqCst)),
        )
    }

    #[test]
    fn test_no_active_period_is_noop() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut engine = ticking_engine(WeightConfig::default());
        let mut source = MapSource::default().with(Period::new(Level::Phase));
        let mut output = AlignmentOutput::new("BTC-USDT");
        assert!(engine
            .update_all_metrics("BTC-USDT", &mut source, &mut output)
            .is_none());
        assert_eq!(AlignmentOutput::new("BTC-USDT"), output);
        assert!(engine.seismograph().history("BTC-USDT").is_none());
    }

    #[test]
    fn test_full_cycle() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut engine = ticking_engine(WeightConfig::default());
        // wave: v 5, a -5 => mixed signs; tide: v 3, a 1 => all positive
        let mut source = MapSource::default()
            .with(period(Level::Phase, Side::Bullish, &[0, 15, 25, 30]))
            .with(period(Level::PartialImpulse, Side::Bullish, &[0, 1, 3, 6]));
        let mut output = AlignmentOutput::new("BTC-USDT");

        let scores = engine
            .update_all_metrics("BTC-USDT", &mut source, &mut output)
            .unwrap();

        let wave = &source.0[&Level::Phase];
        assert_eq!(BigDecimal::from(5), wave.metrics.price_velocity);
        assert_eq!(BigDecimal::from(-5), wave.metrics.peak_price_acceleration);
        assert_eq!(BigDecimal::from(30), wave.metrics.price_net_abs_change);

        assert!((output.period_health_scores["Wave"] + 0.2).abs() < 1e-9);
        assert_eq!(1.0, output.period_health_scores["Tide"]);
        assert_eq!(5, output.intra_period_matrix["Wave"].len());
        assert_eq!(output.intra_period_matrix, output.weighted_intra_period_matrix);

        assert_eq!(0.04, output.inter_period_matrix["Wave"]["Wave"]);
        assert_eq!(0.2, output.inter_period_matrix["Wave"]["Tide"]);
        assert_eq!(0.2, output.weighted_inter_period_matrix["Tide"]["Wave"]);
        assert_eq!(1.0, output.weighted_inter_period_matrix["Tide"]["Tide"]);

        // (0.04 + 0.2 + 0.2 + 1.0) / 4, product of positive health = 1.0
        assert!((scores.global_alignment_score - 0.36).abs() < 1e-12);
        assert!((scores.final_signal_quality_score - 0.36).abs() < 1e-12);
        assert!((output.side_struggle_score - 36.0).abs() < 1e-9);
        assert_eq!(scores.global_alignment_score, output.global_alignment_score);
        assert_eq!(1_000_000, output.last_update_ts);
        assert_eq!(Some(1), engine.seismograph().history("BTC-USDT").map(|h| h.len()));
    }

    #[test]
    fn test_all_zero_metrics_still_stamps_output() {
        let mut engine = ticking_engine(WeightConfig::default());
        let mut source = MapSource::default().with(period(Level::TotalTrend1m, Side::Bearish, &[7]));
        let mut output = AlignmentOutput::new("ETH-USDT");
        output.global_alignment_score = 0.9;

        let scores = engine
            .update_all_metrics("ETH-USDT", &mut source, &mut output)
            .unwrap();
        assert_eq!(FinalScores::default(), scores);
        assert_eq!(0.0, output.global_alignment_score);
        assert!(output.intra_period_matrix.is_empty());
        assert!(output.period_health_scores.is_empty());
        assert_eq!(1_000_000, output.last_update_ts);
        assert!(engine.seismograph().history("ETH-USDT").is_none());
    }

    #[test]
    fn test_configured_weights_scale_confluence() -> crate::Result<()> {
        let weights = WeightConfig::from_json(r#"{"cosmic_weights": {"Tide": 2.0}}"#)?;
        let mut engine = ticking_engine(weights);
        let mut source =
            MapSource::default().with(period(Level::PartialImpulse, Side::Bearish, &[0, 1, 3, 6]));
        let mut output = AlignmentOutput::new("SOL-USDT");
        engine.update_all_metrics("SOL-USDT", &mut source, &mut output);
        assert_eq!(1.0, output.inter_period_matrix["Tide"]["Tide"]);
        assert_eq!(4.0, output.weighted_inter_period_matrix["Tide"]["Tide"]);
        assert_eq!(4.0, output.global_alignment_score);
        Ok(())
    }

    #[test]
    fn test_seismograph_across_cycles() {
        let mut engine = ticking_engine(WeightConfig::default());
        let mut source =
            MapSource::default().with(period(Level::PartialImpulse, Side::Bullish, &[0, 1, 3, 6]));
        let mut output = AlignmentOutput::new("BTC-USDT");
        for _ in 0..12 {
            engine.update_all_metrics("BTC-USDT", &mut source, &mut output);
        }
        let history = engine.seismograph().history("BTC-USDT").unwrap();
        assert_eq!(10, history.len());
        assert_eq!(Some(&(1_002_000, 100.0)), history.first());
        // constant score, zero derivatives
        assert_eq!(0.0, output.struggle_score_velocity);
        assert_eq!(0.0, output.struggle_score_acceleration);
        assert_eq!(1_011_000, output.last_update_ts);
    }
}
