//! Kinematic derivatives
//!
//! Velocity, acceleration and jerk of a value series sampled at irregular times.
//! The same calculator serves price, MACD, EMA200 and the aggregate alignment score.

use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde_derive::*;

/// Minimum number of samples for a jerk.
pub const MIN_POINTS: usize = 4;

lazy_static! {
    /// Time deltas (seconds) at or below this are treated as degenerate.
    pub static ref SAFE_DIVISION_THRESHOLD: BigDecimal =
        BigDecimal::from(1) / BigDecimal::from(1_000_000);
    static ref MILLIS_PER_SECOND: BigDecimal = BigDecimal::from(1000);
}

/// First three time derivatives at the newest sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub velocity: BigDecimal,
    pub acceleration: BigDecimal,
    pub jerk: BigDecimal,
}

impl Kinematics {
    pub fn is_zero(&self) -> bool {
        self.velocity.is_zero() && self.acceleration.is_zero() && self.jerk.is_zero()
    }
}

/// Derive kinematics from the last four samples.
///
/// Values and timestamps are ordered oldest to newest, timestamps in milliseconds.
/// Too few samples, a non-positive time step or any failed lookup/division
/// yields the all-zero result, this never fails.
pub fn derivatives(values: &[BigDecimal], timestamps: &[i64]) -> Kinematics {
    if values.len() < MIN_POINTS {
        return Kinematics::default();
    }
    match try_derivatives(values, timestamps) {
        Some(k) => k,
        None => {
            log::trace!(
                "degenerate derivative input: {} values, {} timestamps",
                values.len(),
                timestamps.len()
            );
            Kinematics::default()
        }
    }
}

fn try_derivatives(values: &[BigDecimal], timestamps: &[i64]) -> Option<Kinematics> {
    let dt1 = seconds_between(timestamps, 1)?;
    let dt2 = seconds_between(timestamps, 2)?;
    let dt3 = seconds_between(timestamps, 3)?;

    let v_now = checked_div(&(back(values, 1)? - back(values, 2)?), &dt1)?;
    let v_prev = checked_div(&(back(values, 2)? - back(values, 3)?), &dt2)?;
    let v_before_prev = checked_div(&(back(values, 3)? - back(values, 4)?), &dt3)?;

    let a_now = checked_div(&(&v_now - &v_prev), &dt2)?;
    let a_prev = checked_div(&(&v_prev - &v_before_prev), &dt3)?;

    let jerk = checked_div(&(&a_now - &a_prev), &dt3)?;
    Some(Kinematics {
        velocity: v_now,
        acceleration: a_now,
        jerk,
    })
}

// delta between the n-th and (n+1)-th newest timestamps, in seconds
fn seconds_between(timestamps: &[i64], n: usize) -> Option<BigDecimal> {
    let later = *back(timestamps, n)?;
    let earlier = *back(timestamps, n + 1)?;
    let dt = BigDecimal::from(later.checked_sub(earlier)?) / &*MILLIS_PER_SECOND;
    if dt <= *SAFE_DIVISION_THRESHOLD {
        return None;
    }
    Some(dt)
}

// n-th element counted from the end, 1-based
#[inline]
fn back<T>(xs: &[T], n: usize) -> Option<&T> {
    xs.len().checked_sub(n).and_then(|i| xs.get(i))
}

#[inline]
fn checked_div(num: &BigDecimal, den: &BigDecimal) -> Option<BigDecimal> {
    if den.is_zero() {
        return None;
    }
    Some(num / den)
}

/// Replace the peak when the new value is larger in magnitude, keeping its sign.
pub fn track_peak(peak: &mut BigDecimal, value: &BigDecimal) -> bool {
    if value.abs() > peak.abs() {
        *peak = value.clone();
        return true;
    }
    false
}
