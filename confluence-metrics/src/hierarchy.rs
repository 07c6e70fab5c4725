//! Hierarchy composition
//!
//! Each level owns the finished periods of the level below it in a bounded
//! history. The orchestrator detecting period boundaries archives a child into
//! its parent when the child closes, the engine only reads the current period
//! of each level.

use crate::level::Level;
use crate::period::{Period, Side};
use crate::{Error, Result};
use confluence_utils::{BoundedHistory, Timeframe};
use serde_derive::*;

/// Phases kept by one partial impulse.
pub const PHASE_HISTORY_CAPACITY: usize = 20;
/// Children kept by every level from the MACD cycle upwards.
pub const CHILD_HISTORY_CAPACITY: usize = 50;

/// Short impulse made of phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialImpulse {
    pub period: Period,
    pub phases: BoundedHistory<Period>,
}

impl PartialImpulse {
    pub fn new(side: Side) -> Self {
        let mut period = Period::new(Level::PartialImpulse);
        period.side = side;
        PartialImpulse {
            period,
            phases: BoundedHistory::new(PHASE_HISTORY_CAPACITY),
        }
    }

    /// Archive a closed phase, returning the one evicted if the history was full.
    pub fn archive_phase(&mut self, phase: Period) -> Result<Option<Period>> {
        expect_level(&phase, Level::Phase)?;
        Ok(self.phases.push(phase))
    }
}

/// One full MACD cycle: a bullish and a bearish partial impulse fighting each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdCycle {
    pub period: Period,
    pub bullish_impulse: Option<PartialImpulse>,
    pub bearish_impulse: Option<PartialImpulse>,
    pub predicted_dominance_side: Side,
}

impl Default for MacdCycle {
    fn default() -> Self {
        MacdCycle {
            period: Period::new(Level::MacdCycle),
            bullish_impulse: None,
            bearish_impulse: None,
            predicted_dominance_side: Side::Undefined,
        }
    }
}

impl MacdCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn impulse(&self, side: Side) -> Option<&PartialImpulse> {
        match side {
            Side::Bullish => self.bullish_impulse.as_ref(),
            Side::Bearish => self.bearish_impulse.as_ref(),
            Side::Undefined => None,
        }
    }

    /// Put a partial impulse into the slot of its side, returning the replaced one.
    pub fn set_impulse(&mut self, impulse: PartialImpulse) -> Result<Option<PartialImpulse>> {
        let slot = match impulse.period.side {
            Side::Bullish => &mut self.bullish_impulse,
            Side::Bearish => &mut self.bearish_impulse,
            Side::Undefined => {
                return Err(Error("partial impulse without side".to_owned()));
            }
        };
        Ok(slot.replace(impulse))
    }

    /// Both sides have fought.
    pub fn is_complete(&self) -> bool {
        self.bullish_impulse.is_some() && self.bearish_impulse.is_some()
    }
}

/// Main 1m momentum made of MACD cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalImpulse {
    pub period: Period,
    pub macd_cycles: BoundedHistory<MacdCycle>,
}

impl Default for TotalImpulse {
    fn default() -> Self {
        TotalImpulse {
            period: Period::new(Level::TotalImpulse1m),
            macd_cycles: BoundedHistory::new(CHILD_HISTORY_CAPACITY),
        }
    }
}

impl TotalImpulse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn archive_cycle(&mut self, cycle: MacdCycle) -> Option<MacdCycle> {
        self.macd_cycles.push(cycle)
    }
}

/// Structural 1m trend made of total impulses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalTrend {
    pub period: Period,
    pub total_impulses: BoundedHistory<TotalImpulse>,
}

impl Default for TotalTrend {
    fn default() -> Self {
        TotalTrend {
            period: Period::new(Level::TotalTrend1m),
            total_impulses: BoundedHistory::new(CHILD_HISTORY_CAPACITY),
        }
    }
}

impl TotalTrend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn archive_impulse(&mut self, impulse: TotalImpulse) -> Option<TotalImpulse> {
        self.total_impulses.push(impulse)
    }
}

/// Impulse on a higher timeframe, built from 1m total impulses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalImpulse {
    pub timeframe: Timeframe,
    pub period: Period,
    pub total_impulses: BoundedHistory<TotalImpulse>,
}

impl GlobalImpulse {
    /// Fails for 1m, which has no global level.
    pub fn new(timeframe: Timeframe) -> Result<Self> {
        let level = Level::global_impulse(timeframe)
            .ok_or_else(|| Error(format!("no global impulse on {}", timeframe)))?;
        Ok(GlobalImpulse {
            timeframe,
            period: Period::new(level),
            total_impulses: BoundedHistory::new(CHILD_HISTORY_CAPACITY),
        })
    }

    pub fn archive_impulse(&mut self, impulse: TotalImpulse) -> Option<TotalImpulse> {
        self.total_impulses.push(impulse)
    }
}

/// Master trend on a higher timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalTrend {
    pub timeframe: Timeframe,
    pub period: Period,
    pub global_impulses: BoundedHistory<GlobalImpulse>,
    pub total_trends: BoundedHistory<TotalTrend>,
}

impl GlobalTrend {
    pub fn new(timeframe: Timeframe) -> Result<Self> {
        let level = Level::global_trend(timeframe)
            .ok_or_else(|| Error(format!("no global trend on {}", timeframe)))?;
        Ok(GlobalTrend {
            timeframe,
            period: Period::new(level),
            global_impulses: BoundedHistory::new(CHILD_HISTORY_CAPACITY),
            total_trends: BoundedHistory::new(CHILD_HISTORY_CAPACITY),
        })
    }

    pub fn archive_impulse(&mut self, impulse: GlobalImpulse) -> Result<Option<GlobalImpulse>> {
        if impulse.timeframe != self.timeframe {
            return Err(Error(format!(
                "global impulse on {} archived into trend on {}",
                impulse.timeframe, self.timeframe
            )));
        }
        Ok(self.global_impulses.push(impulse))
    }

    pub fn archive_trend(&mut self, trend: TotalTrend) -> Option<TotalTrend> {
        self.total_trends.push(trend)
    }
}

fn expect_level(period: &Period, level: Level) -> Result<()> {
    if period.level != level {
        return Err(Error(format!(
            "expected {} period, got {}",
            level, period.level
        )));
    }
    Ok(())
}
