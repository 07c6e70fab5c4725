use crate::{Error, Result};
use confluence_utils::Timeframe;
use serde_derive::*;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 13 fixed levels of the period hierarchy, ordered bottom-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    Phase,
    PartialImpulse,
    MacdCycle,
    TotalImpulse1m,
    TotalTrend1m,
    GlobalImpulse5m,
    GlobalImpulse15m,
    GlobalImpulse1h,
    GlobalImpulse4h,
    GlobalTrend5m,
    GlobalTrend15m,
    GlobalTrend1h,
    GlobalTrend4h,
}

/// Structural kind of a period, shared by levels of different timeframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    Phase,
    PartialImpulse,
    MacdCycle,
    TotalImpulse,
    TotalTrend,
    GlobalImpulse,
    GlobalTrend,
}

/// Which metrics extension a level carries on top of the base metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricsKind {
    /// 1m levels, MACD kinematics
    Micro,
    /// trend and higher-timeframe levels, EMA200 kinematics
    Macro,
}

lazy_static! {
    static ref COSMIC_LEVEL_WEIGHTS: HashMap<&'static str, f64> = {
        let mut m = HashMap::new();
        m.insert("Wave", 0.8);
        m.insert("Tide", 1.0);
        m.insert("TideStruggle", 1.2);
        m.insert("Current1m", 1.5);
        m.insert("Earth1m", 1.8);
        m.insert("Moon5m", 2.0);
        m.insert("Sun15m", 2.5);
        m.insert("SolarSystem1h", 3.0);
        m.insert("MilkyWay4h", 3.5);
        m.insert("LocalGroup5m", 4.0);
        m.insert("VirgoCluster15m", 4.2);
        m.insert("Andromeda1h", 4.5);
        m.insert("Universe4h", 5.0);
        m
    };
}

/// Static importance of a hierarchy level used inside the intra-period health score.
///
/// Unknown names weigh 1.0.
pub fn cosmic_level_weight(name: &str) -> f64 {
    COSMIC_LEVEL_WEIGHTS.get(name).cloned().unwrap_or(1.0)
}

impl Level {
    pub const ALL: [Level; 13] = [
        Level::Phase,
        Level::PartialImpulse,
        Level::MacdCycle,
        Level::TotalImpulse1m,
        Level::TotalTrend1m,
        Level::GlobalImpulse5m,
        Level::GlobalImpulse15m,
        Level::GlobalImpulse1h,
        Level::GlobalImpulse4h,
        Level::GlobalTrend5m,
        Level::GlobalTrend15m,
        Level::GlobalTrend1h,
        Level::GlobalTrend4h,
    ];

    /// Stable label used as key in every matrix and in the weight configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Level::Phase => "Wave",
            Level::PartialImpulse => "Tide",
            Level::MacdCycle => "TideStruggle",
            Level::TotalImpulse1m => "Current1m",
            Level::TotalTrend1m => "Earth1m",
            Level::GlobalImpulse5m => "Moon5m",
            Level::GlobalImpulse15m => "Sun15m",
            Level::GlobalImpulse1h => "SolarSystem1h",
            Level::GlobalImpulse4h => "MilkyWay4h",
            Level::GlobalTrend5m => "LocalGroup5m",
            Level::GlobalTrend15m => "VirgoCluster15m",
            Level::GlobalTrend1h => "Andromeda1h",
            Level::GlobalTrend4h => "Universe4h",
        }
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            Level::Phase => PeriodKind::Phase,
            Level::PartialImpulse => PeriodKind::PartialImpulse,
            Level::MacdCycle => PeriodKind::MacdCycle,
            Level::TotalImpulse1m => PeriodKind::TotalImpulse,
            Level::TotalTrend1m => PeriodKind::TotalTrend,
            Level::GlobalImpulse5m
            | Level::GlobalImpulse15m
            | Level::GlobalImpulse1h
            | Level::GlobalImpulse4h => PeriodKind::GlobalImpulse,
            Level::GlobalTrend5m
            | Level::GlobalTrend15m
            | Level::GlobalTrend1h
            | Level::GlobalTrend4h => PeriodKind::GlobalTrend,
        }
    }

    pub fn timeframe(&self) -> Timeframe {
        match self {
            Level::Phase
            | Level::PartialImpulse
            | Level::MacdCycle
            | Level::TotalImpulse1m
            | Level::TotalTrend1m => Timeframe::M1,
            Level::GlobalImpulse5m | Level::GlobalTrend5m => Timeframe::M5,
            Level::GlobalImpulse15m | Level::GlobalTrend15m => Timeframe::M15,
            Level::GlobalImpulse1h | Level::GlobalTrend1h => Timeframe::H1,
            Level::GlobalImpulse4h | Level::GlobalTrend4h => Timeframe::H4,
        }
    }

    pub fn metrics_kind(&self) -> MetricsKind {
        match self.kind() {
            PeriodKind::Phase
            | PeriodKind::PartialImpulse
            | PeriodKind::MacdCycle
            | PeriodKind::TotalImpulse => MetricsKind::Micro,
            _ => MetricsKind::Macro,
        }
    }

    pub fn cosmic_weight(&self) -> f64 {
        cosmic_level_weight(self.name())
    }

    /// Global impulse level of a timeframe, none for 1m.
    pub fn global_impulse(tf: Timeframe) -> Option<Level> {
        match tf {
            Timeframe::M1 => None,
            Timeframe::M5 => Some(Level::GlobalImpulse5m),
            Timeframe::M15 => Some(Level::GlobalImpulse15m),
            Timeframe::H1 => Some(Level::GlobalImpulse1h),
            Timeframe::H4 => Some(Level::GlobalImpulse4h),
        }
    }

    /// Global trend level of a timeframe, none for 1m.
    pub fn global_trend(tf: Timeframe) -> Option<Level> {
        match tf {
            Timeframe::M1 => None,
            Timeframe::M5 => Some(Level::GlobalTrend5m),
            Timeframe::M15 => Some(Level::GlobalTrend15m),
            Timeframe::H1 => Some(Level::GlobalTrend1h),
            Timeframe::H4 => Some(Level::GlobalTrend4h),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Level::ALL
            .iter()
            .find(|lv| lv.name() == s)
            .cloned()
            .ok_or_else(|| Error(format!("invalid level: {}", s)))
    }
}
