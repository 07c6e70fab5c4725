use crate::level::Level;
use crate::period::Period;
use std::collections::BTreeMap;

/// The owning context of one symbol's periods.
///
/// Implemented by whatever holds the orchestrators; the engine reaches the
/// periods only through this interface.
pub trait PeriodSource {
    /// Current period at the level, active or not.
    fn period(&self, level: Level) -> Option<&Period>;

    fn period_mut(&mut self, level: Level) -> Option<&mut Period>;
}

/// Active periods keyed by level, in hierarchy order.
pub type ActivePeriods<'a> = BTreeMap<Level, &'a Period>;

/// Gather the active period of every level, skipping absent and inactive ones.
pub fn collect_periods<S: PeriodSource + ?Sized>(source: &S) -> ActivePeriods<'_> {
    let periods: ActivePeriods<'_> = Level::ALL
        .iter()
        .filter_map(|&lv| source.period(lv).filter(|p| p.active).map(|p| (lv, p)))
        .collect();
    log::trace!(
        "collected periods: {:?}",
        periods.keys().map(|lv| lv.name()).collect::<Vec<_>>()
    );
    periods
}

/// Levels whose current period is active.
pub fn active_levels<S: PeriodSource + ?Sized>(source: &S) -> Vec<Level> {
    collect_periods(source).keys().cloned().collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Test source holding one period per configured level.
    #[derive(Default)]
    pub struct MapSource(pub HashMap<Level, Period>);

    impl MapSource {
        pub fn with(mut self, period: Period) -> Self {
            self.0.insert(period.level, period);
            self
        }
    }

    impl PeriodSource for MapSource {
        fn period(&self, level: Level) -> Option<&Period> {
            self.0.get(&level)
        }

        fn period_mut(&mut self, level: Level) -> Option<&mut Period> {
            self.0.get_mut(&level)
        }
    }

    fn active(level: Level) -> Period {
        let mut p = Period::new(level);
        p.active = true;
        p
    }

    #[test]
    fn test_collect_skips_inactive_and_absent() {
        let source = MapSource::default()
            .with(active(Level::GlobalTrend4h))
            .with(Period::new(Level::TotalTrend1m))
            .with(active(Level::Phase));
        let periods = collect_periods(&source);
        assert_eq!(
            vec![Level::Phase, Level::GlobalTrend4h],
            periods.keys().cloned().collect::<Vec<_>>()
        );
        assert_eq!(Level::GlobalTrend4h, periods[&Level::GlobalTrend4h].level);
    }

    #[test]
    fn test_collect_empty() {
        let source = MapSource::default().with(Period::new(Level::Phase));
        assert!(collect_periods(&source).is_empty());
        assert!(active_levels(&source).is_empty());
    }
}
