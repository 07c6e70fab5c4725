//! Multi-timeframe alignment metrics.
//!
//! Kinematics of every active period, the alignment of each period's metrics
//! with each other, the confluence across periods, and the aggregate scores
//! with their seismograph.

#[macro_use]
extern crate lazy_static;

pub mod alignment;
pub mod collector;
pub mod config;
pub mod engine;
mod error;
pub mod hierarchy;
pub mod inter;
pub mod intra;
pub mod kinematics;
pub mod level;
pub mod metrics;
pub mod period;
pub mod seismograph;

pub use alignment::{AlignmentOutput, Matrix};
pub use collector::PeriodSource;
pub use config::WeightConfig;
pub use engine::MetricsEngine;
pub use error::Error;
pub use level::Level;
pub use period::{Period, Side};
pub use seismograph::FinalScores;
pub type Result<T> = std::result::Result<T, Error>;
