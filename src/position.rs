use crate::ranking::SymbolRankingMetrics;
use confluence_metrics::hierarchy::{
    GlobalImpulse, GlobalTrend, MacdCycle, PartialImpulse, TotalImpulse, TotalTrend,
};
use confluence_metrics::level::PeriodKind;
use confluence_metrics::seismograph::FinalScores;
use confluence_metrics::{Level, MetricsEngine, Period, PeriodSource, Side};
use confluence_utils::Timeframe;
use serde_derive::*;
use std::collections::BTreeMap;

/// Current record of every hierarchy level of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmicHierarchy {
    pub phase: Period,
    pub partial_impulse: PartialImpulse,
    pub macd_cycle: MacdCycle,
    pub total_impulse: TotalImpulse,
    pub total_trend: TotalTrend,
    pub global_impulses: BTreeMap<Timeframe, GlobalImpulse>,
    pub global_trends: BTreeMap<Timeframe, GlobalTrend>,
}

impl Default for CosmicHierarchy {
    fn default() -> Self {
        CosmicHierarchy {
            phase: Period::new(Level::Phase),
            partial_impulse: PartialImpulse::new(Side::Undefined),
            macd_cycle: MacdCycle::new(),
            total_impulse: TotalImpulse::new(),
            total_trend: TotalTrend::new(),
            global_impulses: Timeframe::GLOBAL
                .iter()
                .filter_map(|&tf| GlobalImpulse::new(tf).ok().map(|gi| (tf, gi)))
                .collect(),
            global_trends: Timeframe::GLOBAL
                .iter()
                .filter_map(|&tf| GlobalTrend::new(tf).ok().map(|gt| (tf, gt)))
                .collect(),
        }
    }
}

impl PeriodSource for CosmicHierarchy {
    fn period(&self, level: Level) -> Option<&Period> {
        match level.kind() {
            PeriodKind::Phase => Some(&self.phase),
            PeriodKind::PartialImpulse => Some(&self.partial_impulse.period),
            PeriodKind::MacdCycle => Some(&self.macd_cycle.period),
            PeriodKind::TotalImpulse => Some(&self.total_impulse.period),
            PeriodKind::TotalTrend => Some(&self.total_trend.period),
            PeriodKind::GlobalImpulse => self
                .global_impulses
                .get(&level.timeframe())
                .map(|gi| &gi.period),
            PeriodKind::GlobalTrend => self
                .global_trends
                .get(&level.timeframe())
                .map(|gt| &gt.period),
        }
    }

    fn period_mut(&mut self, level: Level) -> Option<&mut Period> {
        match level.kind() {
            PeriodKind::Phase => Some(&mut self.phase),
            PeriodKind::PartialImpulse => Some(&mut self.partial_impulse.period),
            PeriodKind::MacdCycle => Some(&mut self.macd_cycle.period),
            PeriodKind::TotalImpulse => Some(&mut self.total_impulse.period),
            PeriodKind::TotalTrend => Some(&mut self.total_trend.period),
            PeriodKind::GlobalImpulse => self
                .global_impulses
                .get_mut(&level.timeframe())
                .map(|gi| &mut gi.period),
            PeriodKind::GlobalTrend => self
                .global_trends
                .get_mut(&level.timeframe())
                .map(|gt| &mut gt.period),
        }
    }
}

/// Everything tracked for one traded symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionState {
    pub symbol: String,
    pub hierarchy: CosmicHierarchy,
    pub ranking: SymbolRankingMetrics,
}

impl PositionState {
    pub fn new(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        PositionState {
            ranking: SymbolRankingMetrics::new(symbol.clone()),
            hierarchy: CosmicHierarchy::default(),
            symbol,
        }
    }

    /// Run one engine cycle over the hierarchy into the ranking dossier.
    pub fn refresh_alignment(&mut self, engine: &mut MetricsEngine) -> Option<FinalScores> {
        let scores = engine.update_all_metrics(
            &self.symbol,
            &mut self.hierarchy,
            &mut self.ranking.alignment,
        );
        if scores.is_none() {
            log::debug!("[{}] no active period, alignment unchanged", self.symbol);
        }
        scores
    }
}
