//! Metrics containers
//!
//! Every period owns one base container plus the extension of its metrics kind.
//! Each container exposes an ordered table of its decimal fields, which is what
//! the intra-period aligner iterates over.

use crate::kinematics::{track_peak, Kinematics};
use crate::period::Side;
use bigdecimal::BigDecimal;
use serde_derive::*;

/// Name and accessor of one decimal metric field.
pub type MetricField<M> = (&'static str, fn(&M) -> &BigDecimal);

macro_rules! metric_fields {
    ($ty:ty: $($field:ident),+ $(,)?) => {
        &[$((stringify!($field), {
            fn get(m: &$ty) -> &BigDecimal {
                &m.$field
            }
            get as fn(&$ty) -> &BigDecimal
        })),+]
    };
}

/// Price kinematics, their peaks and the price state of a period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseMetrics {
    pub price_velocity: BigDecimal,
    pub price_acceleration: BigDecimal,
    pub price_jerk: BigDecimal,

    pub peak_price_velocity: BigDecimal,
    pub peak_price_acceleration: BigDecimal,
    pub peak_price_jerk: BigDecimal,

    pub net_price_change: BigDecimal,
    pub net_price_change_side: Side,
    pub price_net_abs_change: BigDecimal,
    pub absolute_max_price: BigDecimal,
    pub absolute_min_price: BigDecimal,
}

pub const BASE_FIELDS: &[MetricField<BaseMetrics>] = metric_fields!(BaseMetrics:
    price_velocity,
    price_acceleration,
    price_jerk,
    peak_price_velocity,
    peak_price_acceleration,
    peak_price_jerk,
    net_price_change,
    price_net_abs_change,
    absolute_max_price,
    absolute_min_price,
);

impl BaseMetrics {
    /// Store the latest price kinematics and grow the peaks.
    pub fn record_price(&mut self, k: &Kinematics) {
        self.price_velocity = k.velocity.clone();
        self.price_acceleration = k.acceleration.clone();
        self.price_jerk = k.jerk.clone();
        track_peak(&mut self.peak_price_velocity, &k.velocity);
        track_peak(&mut self.peak_price_acceleration, &k.acceleration);
        track_peak(&mut self.peak_price_jerk, &k.jerk);
    }
}

/// MACD kinematics of the 1m levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MicroMetrics {
    pub macd_velocity: BigDecimal,
    pub macd_acceleration: BigDecimal,
    pub macd_jerk: BigDecimal,

    pub peak_macd_velocity: BigDecimal,
    pub peak_macd_acceleration: BigDecimal,
    pub peak_macd_jerk: BigDecimal,

    pub macd_slope: BigDecimal,
    pub macd_to_zero_distance: BigDecimal,
    pub peak_macd_to_zero_distance: BigDecimal,

    pub absolute_max_macd: BigDecimal,
    pub absolute_min_macd: BigDecimal,
}

pub const MICRO_FIELDS: &[MetricField<MicroMetrics>] = metric_fields!(MicroMetrics:
    macd_velocity,
    macd_acceleration,
    macd_jerk,
    peak_macd_velocity,
    peak_macd_acceleration,
    peak_macd_jerk,
    macd_slope,
    macd_to_zero_distance,
    peak_macd_to_zero_distance,
    absolute_max_macd,
    absolute_min_macd,
);

impl MicroMetrics {
    pub fn record_macd(&mut self, k: &Kinematics) {
        self.macd_velocity = k.velocity.clone();
        self.macd_acceleration = k.acceleration.clone();
        self.macd_jerk = k.jerk.clone();
        track_peak(&mut self.peak_macd_velocity, &k.velocity);
        track_peak(&mut self.peak_macd_acceleration, &k.acceleration);
        track_peak(&mut self.peak_macd_jerk, &k.jerk);
    }
}

/// EMA200 kinematics and the price-to-EMA relation of the higher levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroMetrics {
    pub ema200_velocity: BigDecimal,
    pub ema200_acceleration: BigDecimal,
    pub ema200_jerk: BigDecimal,

    pub peak_ema200_velocity: BigDecimal,
    pub peak_ema200_acceleration: BigDecimal,
    pub peak_ema200_jerk: BigDecimal,

    pub ema200_slope: BigDecimal,
    pub price_to_ema200_distance: BigDecimal,
    pub peak_price_to_ema200_distance: BigDecimal,

    pub absolute_max_ema200: BigDecimal,
    pub absolute_min_ema200: BigDecimal,
}

pub const MACRO_FIELDS: &[MetricField<MacroMetrics>] = metric_fields!(MacroMetrics:
    ema200_velocity,
    ema200_acceleration,
    ema200_jerk,
    peak_ema200_velocity,
    peak_ema200_acceleration,
    peak_ema200_jerk,
    ema200_slope,
    price_to_ema200_distance,
    peak_price_to_ema200_distance,
    absolute_max_ema200,
    absolute_min_ema200,
);

impl MacroMetrics {
    pub fn record_ema200(&mut self, k: &Kinematics) {
        self.ema200_velocity = k.velocity.clone();
        self.ema200_acceleration = k.acceleration.clone();
        self.ema200_jerk = k.jerk.clone();
        track_peak(&mut self.peak_ema200_velocity, &k.velocity);
        track_peak(&mut self.peak_ema200_acceleration, &k.acceleration);
        track_peak(&mut self.peak_ema200_jerk, &k.jerk);
    }
}

/// Read every field of a table against one container, keeping table order.
pub fn read_fields<'m, M: 'static>(
    table: &'static [MetricField<M>],
    metrics: &'m M,
) -> impl Iterator<Item = (&'static str, &'m BigDecimal)> + 'm {
    table.iter().map(move |&(name, get)| (name, get(metrics)))
}
