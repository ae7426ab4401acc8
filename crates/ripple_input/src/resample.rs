//! Touch resampling
//!
//! Input drivers deliver samples on their own cadence while frames are
//! produced on vsync. Resampling reconstructs where a finger most plausibly
//! was at the frame's target time so moves render smoothly.
//!
//! ```text
//!   history avg ──────── current avg ─ ─ ─ ▶ target (extrapolated)
//!        t0        ▲          t1
//!                  └── target (interpolated)
//! ```
//!
//! The functions here are pure: identical inputs always produce bit-identical
//! outputs, which lets the dispatcher resample the same batch more than once.

use crate::geometry::Offset;
use crate::input::TouchEvent;
use crate::time::Timestamp;

/// How far outside the sampled window a target time may fall, in nanoseconds.
pub const INTERPOLATION_THRESHOLD_NS: u64 = 100_000_000;

/// A reconstructed pointer sample
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResamplePoint {
    pub x: f32,
    pub y: f32,
    pub screen_x: f32,
    pub screen_y: f32,
    pub time: Timestamp,
    /// Velocity in pixels per millisecond
    pub velocity: Offset,
}

/// Stateless resampling helpers
pub struct Resampler;

impl Resampler {
    /// Average a coalesced batch of samples into one point.
    ///
    /// Returns `None` for an empty batch.
    pub fn average_point(events: &[TouchEvent]) -> Option<ResamplePoint> {
        if events.is_empty() {
            return None;
        }
        let count = events.len() as f64;
        let (mut x, mut y, mut sx, mut sy, mut t) = (0.0f64, 0.0f64, 0.0f64, 0.0f64, 0u128);
        for event in events {
            x += event.x as f64;
            y += event.y as f64;
            sx += event.screen_x as f64;
            sy += event.screen_y as f64;
            t += event.time.as_nanos() as u128;
        }
        Some(ResamplePoint {
            x: (x / count) as f32,
            y: (y / count) as f32,
            screen_x: (sx / count) as f32,
            screen_y: (sy / count) as f32,
            time: Timestamp((t / events.len() as u128) as u64),
            velocity: Offset::ZERO,
        })
    }

    /// Interpolate (or extrapolate) between two samples at `target`.
    ///
    /// `current` must be strictly newer than `history`, and `target` must lie
    /// within [`INTERPOLATION_THRESHOLD_NS`] of the sampled window.
    pub fn linear_interpolation(
        history: &ResamplePoint,
        current: &ResamplePoint,
        target: Timestamp,
    ) -> Option<ResamplePoint> {
        let t0 = history.time.as_nanos();
        let t1 = current.time.as_nanos();
        let tt = target.as_nanos();
        if t1 <= t0 {
            return None;
        }
        if tt > t1.saturating_add(INTERPOLATION_THRESHOLD_NS)
            || tt < t0.saturating_sub(INTERPOLATION_THRESHOLD_NS)
        {
            return None;
        }

        let span = (t1 - t0) as f64;
        let alpha = (tt as f64 - t0 as f64) / span;
        let lerp = |a: f32, b: f32| (a as f64 + alpha * (b as f64 - a as f64)) as f32;

        let span_ms = span / 1_000_000.0;
        let velocity = Offset::new(
            ((current.x - history.x) as f64 / span_ms) as f32,
            ((current.y - history.y) as f64 / span_ms) as f32,
        );

        Some(ResamplePoint {
            x: lerp(history.x, current.x),
            y: lerp(history.y, current.y),
            screen_x: lerp(history.screen_x, current.screen_x),
            screen_y: lerp(history.screen_y, current.screen_y),
            time: target,
            velocity,
        })
    }

    /// Resample the averages of two batches.
    pub fn resample_coord(
        history: &[TouchEvent],
        current: &[TouchEvent],
        target: Timestamp,
    ) -> Option<ResamplePoint> {
        let history = Self::average_point(history)?;
        let current = Self::average_point(current)?;
        Self::linear_interpolation(&history, &current, target)
    }

    /// Build an interpolated copy of `current` positioned at `target`.
    ///
    /// `history` holds earlier samples of the same finger, oldest first. The
    /// newest history sample older than `current` anchors the interpolation.
    /// Returns `None` when no such sample exists or `target` is out of range.
    pub fn resample(history: &[TouchEvent], current: &TouchEvent, target: Timestamp) -> Option<TouchEvent> {
        let anchor = history
            .iter()
            .rev()
            .find(|sample| sample.id == current.id && sample.time < current.time)?;
        let point = Self::resample_coord(
            std::slice::from_ref(anchor),
            std::slice::from_ref(current),
            target,
        )?;

        let mut event = current.clone();
        event.x = point.x;
        event.y = point.y;
        event.screen_x = point.screen_x;
        event.screen_y = point.screen_y;
        event.time = target;
        event.history.clear();
        event.is_interpolated = true;
        tracing::trace!(finger = current.id, x = point.x, y = point.y, "resampled touch");
        Some(event)
    }
}
