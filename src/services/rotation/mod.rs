//! Time-bucketed rotation of the featured slots.
//!
//! Every `interval_secs` the starting index advances by `slots_to_show`,
//! wrapping over the eligible pool. Within one bucket the value is stable,
//! so repeated renders show the same window.

use crate::services::{PlacementError, Result};
use chrono::Utc;

/// Rotation start index for the current wall-clock bucket.
///
/// Callers must guard `total_count > 0` before invoking; zero eligible
/// items is rejected rather than defaulted.
pub fn rotation_start(
    total_count: usize,
    slots_to_show: usize,
    interval_secs: u64,
) -> Result<usize> {
    rotation_start_at(Utc::now().timestamp(), total_count, slots_to_show, interval_secs)
}

/// Rotation start index for an explicit unix-seconds timestamp.
pub fn rotation_start_at(
    now_unix: i64,
    total_count: usize,
    slots_to_show: usize,
    interval_secs: u64,
) -> Result<usize> {
    if total_count == 0 {
        return Err(PlacementError::EmptyRotationPool);
    }
    if interval_secs == 0 {
        return Err(PlacementError::InvalidInput(
            "rotation interval must be positive".to_string(),
        ));
    }

    let bucket = now_unix.div_euclid(interval_secs as i64);
    Ok((bucket * slots_to_show as i64).rem_euclid(total_count as i64) as usize)
}
