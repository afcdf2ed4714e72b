//! Cycle detection and elapsed-time normalization.
//!
//! The setpoint channel alternates between a low and a high regime. A cycle
//! starts at each rising edge of the setpoint across an auto-computed
//! threshold; all timestamps are then rebased to minutes elapsed since the
//! first cycle start.

use crate::config::ThresholdParams;
use crate::data::Sample;
use serde::Serialize;

/// One sample with its timestamp rebased to elapsed minutes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSample {
    pub elapsed_min: f64,
    pub pv: Option<f64>,
    pub sp: Option<f64>,
}

/// Result of normalizing a series: the rebased samples, the elapsed times of
/// the detected cycle starts (strictly ascending, first one at 0.0 when any
/// exist) and the threshold that separated the regimes.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub samples: Vec<NormalizedSample>,
    pub boundaries: Vec<f64>,
    pub threshold: f64,
}

impl Analysis {
    /// Elapsed time of the last sample, if any.
    pub fn last_elapsed(&self) -> Option<f64> {
        self.samples.last().map(|sample| sample.elapsed_min)
    }
}

/// Compute the threshold separating the low and high setpoint regimes.
///
/// The midpoint of the extreme setpoint values inside the valid range, or
/// the configured default when no valid values exist or the spread of the
/// valid values is below the configured minimum (a flat signal must not
/// produce a noise-level threshold).
pub fn compute_threshold(samples: &[Sample], params: &ThresholdParams) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for sample in samples {
        if let Some(sp) = sample.sp
            && sp >= params.valid_min
            && sp <= params.valid_max
        {
            min = min.min(sp);
            max = max.max(sp);
        }
    }

    if min > max || max - min < params.min_spread {
        return params.default;
    }
    (max + min) / 2.0
}

/// Detect cycle starts and rebase the series to elapsed minutes.
///
/// A cycle starts wherever `sp > threshold` holds and did not hold for the
/// previous sample; a first sample that is already high therefore counts as
/// a cycle start (recording began mid-cycle). Missing setpoints are never
/// high. The base time is the first cycle start, or the first sample when no
/// cycle was detected.
///
/// Pure function of its inputs; an empty series yields an empty result.
pub fn normalize(samples: &[Sample], params: &ThresholdParams) -> Analysis {
    let threshold = compute_threshold(samples, params);

    let mut boundary_times = Vec::new();
    let mut prev_high = false;
    for sample in samples {
        let high = sample.sp.is_some_and(|sp| sp > threshold);
        if high && !prev_high {
            boundary_times.push(sample.time);
        }
        prev_high = high;
    }

    let base_time = boundary_times
        .first()
        .copied()
        .or_else(|| samples.first().map(|sample| sample.time));

    let elapsed = |time: chrono::NaiveDateTime| match base_time {
        Some(base) => (time - base).num_milliseconds() as f64 / 60_000.0,
        None => 0.0,
    };

    Analysis {
        samples: samples
            .iter()
            .map(|sample| NormalizedSample {
                elapsed_min: elapsed(sample.time),
                pv: sample.pv,
                sp: sample.sp,
            })
            .collect(),
        boundaries: boundary_times.into_iter().map(elapsed).collect(),
        threshold,
    }
}

/// Elapsed-time interval owned by cycle `index` (0-based).
///
/// Starts at `boundaries[index]` and ends at the next boundary, or at
/// `last_elapsed` for the final open-ended cycle. `None` when the index is
/// out of range.
pub fn cycle_span(boundaries: &[f64], last_elapsed: f64, index: usize) -> Option<(f64, f64)> {
    let start = *boundaries.get(index)?;
    let end = boundaries.get(index + 1).copied().unwrap_or(last_elapsed);
    Some((start, end))
}
