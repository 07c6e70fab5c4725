//! Per-symbol owning context around the alignment engine: the current period
//! of every hierarchy level and the ranking dossier the scores land in.

mod position;
mod ranking;

pub use confluence_metrics as metrics;
pub use confluence_utils as utils;
pub use position::{CosmicHierarchy, PositionState};
pub use ranking::{assign_ranks, SymbolRankingMetrics, TradeSimulation};
