use crate::kinematics::derivatives;
use crate::level::{Level, MetricsKind};
use crate::metrics::{
    read_fields, BaseMetrics, MacroMetrics, MicroMetrics, BASE_FIELDS, MACRO_FIELDS, MICRO_FIELDS,
};
use crate::{Error, Result};
use bigdecimal::BigDecimal;
use serde_derive::*;
use std::fmt;
use std::str::FromStr;

/// Directional classification of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bullish,
    Bearish,
    Undefined,
}

impl Default for Side {
    fn default() -> Self {
        Side::Undefined
    }
}

impl Side {
    pub fn is_defined(&self) -> bool {
        *self != Side::Undefined
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Bullish => "bullish",
            Side::Bearish => "bearish",
            Side::Undefined => "undefined",
        }
    }

    /// Lenient parse: any unknown label, empty included, is undefined.
    pub fn from_label(s: &str) -> Side {
        s.parse().unwrap_or(Side::Undefined)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bullish" | "alcista" => Ok(Side::Bullish),
            "bearish" | "bajista" => Ok(Side::Bearish),
            "undefined" | "indefinido" => Ok(Side::Undefined),
            _ => Err(Error(format!("invalid side: {}", s))),
        }
    }
}

/// Raw indicator histories of a 1m period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MicroIndicators {
    pub entry_macd: BigDecimal,
    pub exit_macd: BigDecimal,
    pub macd_history: Vec<BigDecimal>,
    pub ema200_history: Vec<BigDecimal>,
}

/// Raw indicator history of a trend or higher-timeframe period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroIndicators {
    pub entry_ema200: BigDecimal,
    pub exit_ema200: BigDecimal,
    pub ema200_history: Vec<BigDecimal>,
}

/// Metrics-kind specific part of a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Extension {
    Micro {
        indicators: MicroIndicators,
        metrics: MicroMetrics,
    },
    Macro {
        indicators: MacroIndicators,
        metrics: MacroMetrics,
    },
}

impl Extension {
    pub fn new(kind: MetricsKind) -> Self {
        match kind {
            MetricsKind::Micro => Extension::Micro {
                indicators: MicroIndicators::default(),
                metrics: MicroMetrics::default(),
            },
            MetricsKind::Macro => Extension::Macro {
                indicators: MacroIndicators::default(),
                metrics: MacroMetrics::default(),
            },
        }
    }

    pub fn kind(&self) -> MetricsKind {
        match self {
            Extension::Micro { .. } => MetricsKind::Micro,
            Extension::Macro { .. } => MetricsKind::Macro,
        }
    }
}

/// One detected market period: lifecycle, raw history and the derived metrics.
/// Histories grow append-only while the period is active and are owned by the
/// external orchestrator that detects the period boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub level: Level,
    pub active: bool,
    pub side: Side,
    pub entry_ts: i64,
    pub exit_ts: i64,
    pub entry_price: BigDecimal,
    pub exit_price: BigDecimal,
    pub timestamps: Vec<i64>,
    pub price_history: Vec<BigDecimal>,
    pub metrics: BaseMetrics,
    pub ext: Extension,
}

impl Period {
    /// Empty inactive period with the extension its level requires.
    pub fn new(level: Level) -> Self {
        Period {
            level,
            active: false,
            side: Side::Undefined,
            entry_ts: 0,
            exit_ts: 0,
            entry_price: BigDecimal::default(),
            exit_price: BigDecimal::default(),
            timestamps: Vec::new(),
            price_history: Vec::new(),
            metrics: BaseMetrics::default(),
            ext: Extension::new(level.metrics_kind()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.level.name()
    }

    /// Length of the active window in milliseconds, zero when the window is empty or inverted.
    pub fn duration(&self) -> i64 {
        if self.exit_ts > self.entry_ts {
            self.exit_ts - self.entry_ts
        } else {
            0
        }
    }

    /// Whether this period's window lies entirely within `outer`'s.
    ///
    /// Inactive periods are never contained nor containing.
    pub fn is_contained_in(&self, outer: &Period) -> bool {
        if !self.active || !outer.active {
            return false;
        }
        outer.entry_ts <= self.entry_ts && outer.exit_ts >= self.exit_ts
    }

    /// Append one raw sample.
    pub fn push_price(&mut self, ts: i64, price: BigDecimal) {
        self.timestamps.push(ts);
        self.price_history.push(price);
    }

    pub fn macd_history(&self) -> Option<&[BigDecimal]> {
        match &self.ext {
            Extension::Micro { indicators, .. } => Some(&indicators.macd_history),
            Extension::Macro { .. } => None,
        }
    }

    pub fn micro_metrics(&self) -> Option<&MicroMetrics> {
        match &self.ext {
            Extension::Micro { metrics, .. } => Some(metrics),
            Extension::Macro { .. } => None,
        }
    }

    pub fn macro_metrics(&self) -> Option<&MacroMetrics> {
        match &self.ext {
            Extension::Macro { metrics, .. } => Some(metrics),
            Extension::Micro { .. } => None,
        }
    }

    /// Recompute the kinematics of every raw series and grow the peaks.
    ///
    /// Price first, then MACD for micro periods or EMA200 for macro periods,
    /// all sampled at `timestamps`.
    pub fn update_kinematics(&mut self) {
        let k = derivatives(&self.price_history, &self.timestamps);
        self.metrics.record_price(&k);
        if let (Some(first), Some(last)) = (self.price_history.first(), self.price_history.last()) {
            if self.price_history.len() >= 2 {
                self.metrics.price_net_abs_change = (last - first).abs();
            }
        }
        match &mut self.ext {
            Extension::Micro {
                indicators,
                metrics,
            } => {
                let k = derivatives(&indicators.macd_history, &self.timestamps);
                metrics.record_macd(&k);
            }
            Extension::Macro {
                indicators,
                metrics,
            } => {
                let k = derivatives(&indicators.ema200_history, &self.timestamps);
                metrics.record_ema200(&k);
            }
        }
    }

    /// Every decimal metric of this period in table order: base fields first,
    /// then the extension's.
    pub fn metric_values(&self) -> Vec<(&'static str, &BigDecimal)> {
        let mut values: Vec<(&'static str, &BigDecimal)> =
            read_fields(BASE_FIELDS, &self.metrics).collect();
        match &self.ext {
            Extension::Micro { metrics, .. } => values.extend(read_fields(MICRO_FIELDS, metrics)),
            Extension::Macro { metrics, .. } => values.extend(read_fields(MACRO_FIELDS, metrics)),
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_parse() -> Result<()> {
        assert_eq!(Side::Bullish, "bullish".parse()?);
        assert_eq!(Side::Bearish, "bajista".parse()?);
        assert!("".parse::<Side>().is_err());
        assert_eq!(Side::Undefined, Side::from_label(""));
        assert_eq!(Side::Bullish, Side::from_label("alcista"));
        Ok(())
    }

    #[test]
    fn test_new_period_extension_follows_level() {
        let p = Period::new(Level::Phase);
        assert_eq!(MetricsKind::Micro, p.ext.kind());
        assert!(p.macd_history().is_some());
        assert!(p.macro_metrics().is_none());

        let p = Period::new(Level::GlobalTrend4h);
        assert_eq!(MetricsKind::Macro, p.ext.kind());
        assert!(p.macd_history().is_none());
        assert!(p.macro_metrics().is_some());
        assert_eq!("Universe4h", p.name());
    }

    #[test]
    fn test_metric_values_layout() {
        let micro = Period::new(Level::TotalImpulse1m);
        let values = micro.metric_values();
        assert_eq!(21, values.len());
        assert_eq!("price_velocity", values[0].0);
        assert_eq!("macd_velocity", values[10].0);

        let macro_ = Period::new(Level::TotalTrend1m);
        let values = macro_.metric_values();
        assert_eq!(21, values.len());
        assert_eq!("ema200_velocity", values[10].0);
    }

    #[test]
    fn test_containment() {
        let mut outer = window(Level::TotalTrend1m, 1_000, 10_000);
        let mut inner = window(Level::TotalImpulse1m, 2_000, 5_000);
        assert!(inner.is_contained_in(&outer));
        assert!(!outer.is_contained_in(&inner));
        assert!(outer.is_contained_in(&outer.clone()));

        inner.active = false;
        assert!(!inner.is_contained_in(&outer));
        inner.active = true;
        outer.active = false;
        assert!(!inner.is_contained_in(&outer));
    }

    #[test]
    fn test_duration() {
        assert_eq!(9_000, window(Level::Phase, 1_000, 10_000).duration());
        assert_eq!(0, window(Level::Phase, 10_000, 1_000).duration());
    }

    #[test]
    fn test_update_kinematics_micro() {
        let mut p = Period::new(Level::TotalImpulse1m);
        for (i, price) in [10, 12, 15, 19].iter().enumerate() {
            p.push_price(i as i64 * 1000, BigDecimal::from(*price));
        }
        if let Extension::Micro { indicators, .. } = &mut p.ext {
            indicators.macd_history = vec![0, 1, 3, 6].into_iter().map(BigDecimal::from).collect();
        }
        p.update_kinematics();
        assert_eq!(BigDecimal::from(4), p.metrics.price_velocity);
        assert_eq!(BigDecimal::from(1), p.metrics.price_acceleration);
        assert_eq!(BigDecimal::from(9), p.metrics.price_net_abs_change);
        let micro = p.micro_metrics().unwrap();
        assert_eq!(BigDecimal::from(3), micro.macd_velocity);
        assert_eq!(BigDecimal::from(3), micro.peak_macd_velocity);
    }

    #[test]
    fn test_update_kinematics_macro_keeps_peaks() {
        let mut p = Period::new(Level::GlobalImpulse5m);
        p.timestamps = vec![0, 1000, 2000, 3000];
        p.price_history = vec![19, 15, 12, 10].into_iter().map(BigDecimal::from).collect();
        if let Extension::Macro { indicators, .. } = &mut p.ext {
            indicators.ema200_history = vec![1, 1, 1, 2].into_iter().map(BigDecimal::from).collect();
        }
        p.update_kinematics();
        assert_eq!(BigDecimal::from(-2), p.metrics.peak_price_velocity);
        assert_eq!(BigDecimal::from(9), p.metrics.price_net_abs_change);
        assert_eq!(BigDecimal::from(1), p.macro_metrics().unwrap().ema200_velocity);

        p.timestamps.push(4000);
        p.price_history.push(BigDecimal::from(11));
        if let Extension::Macro { indicators, .. } = &mut p.ext {
            indicators.ema200_history.push(BigDecimal::from(2));
        }
        p.update_kinematics();
        assert_eq!(BigDecimal::from(1), p.metrics.price_velocity);
        assert_eq!(BigDecimal::from(-2), p.metrics.peak_price_velocity);
        assert_eq!(BigDecimal::from(0), p.macro_metrics().unwrap().ema200_velocity);
        assert_eq!(BigDecimal::from(1), p.macro_metrics().unwrap().peak_ema200_velocity);
    }

    #[test]
    fn test_update_kinematics_short_history() {
        let mut p = Period::new(Level::Phase);
        p.push_price(0, BigDecimal::from(5));
        p.update_kinematics();
        assert_eq!(BigDecimal::from(0), p.metrics.price_net_abs_change);
        assert_eq!(BigDecimal::from(0), p.metrics.price_velocity);
    }

    fn window(level: Level, entry_ts: i64, exit_ts: i64) -> Period {
        let mut p = Period::new(level);
        p.active = true;
        p.entry_ts = entry_ts;
        p.exit_ts = exit_ts;
        p
    }
}
