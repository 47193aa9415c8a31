// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Aggregated smoothness records and the reporting sink.
//!
//! The engine does not talk to any telemetry transport itself. When a
//! smoothness-relevant drop occurs it assembles a [`SmoothnessReport`] from
//! the accumulated histogram and counters and hands it to the injected
//! [`SmoothnessSink`]. Sink methods default to no-ops, so an implementation
//! only overrides the events it cares about.

use crate::time::Duration;

/// Number of coarse smoothness buckets carried in a report.
pub const SMOOTHNESS_BUCKET_COUNT: usize = 7;

/// Snapshot of the aggregate smoothness metrics at report time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothnessReport {
    /// Smoothness-relevant dropped frames as a percentage of all recorded
    /// frames.
    pub avg_percent_dropped: f64,
    /// Worst (maximum) per-window percent dropped seen since activation.
    pub worst_percent_dropped: f64,
    /// 95th-percentile per-window percent dropped, from the histogram's
    /// upper-tail walk.
    pub percentile_95: u32,
    /// Percentage of window samples falling in each coarse smoothness
    /// bucket.
    pub bucket_percentages: [f64; SMOOTHNESS_BUCKET_COUNT],
    /// Worst window percentage observed more than one second after
    /// activation, if any window has closed that late.
    pub worst_after_1s: Option<f64>,
    /// As above, past the two-second mark.
    pub worst_after_2s: Option<f64>,
    /// As above, past the five-second mark.
    pub worst_after_5s: Option<f64>,
    /// Elapsed time from activation to the window that set the current
    /// worst-case percentage.
    pub time_of_worst: Duration,
    /// Frames recorded in the outcome ring since the last reset.
    pub total_frames: u64,
    /// Dropped frames recorded in the outcome ring since the last reset.
    pub total_dropped: u64,
    /// Whether `worst_percent_dropped` changed since the previous report.
    pub worst_changed: bool,
    /// Whether `percentile_95` changed since the previous report.
    pub percentile_95_changed: bool,
}

/// Timing of a dropped frame relative to the scroll gesture it landed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollJankDiagnostic {
    /// Time from the scroll gesture's first frame to this frame.
    pub time_since_scroll_start: Duration,
    /// Frames issued between the scroll gesture's first frame and this one.
    pub frames_since_scroll_start: u64,
}

/// Receives aggregate smoothness records from the engine.
///
/// All methods have default no-op implementations.
pub trait SmoothnessSink {
    /// Called with the per-session report on the default reporting path.
    fn on_report(&mut self, report: &SmoothnessReport) {
        _ = report;
    }

    /// Called instead of [`on_report`](Self::on_report) when the UI-shell
    /// reporting path is selected.
    fn on_ui_report(&mut self, report: &SmoothnessReport) {
        _ = report;
    }

    /// Called when a frame that began during a scroll gesture completes.
    fn on_scroll_jank(&mut self, diagnostic: &ScrollJankDiagnostic) {
        _ = diagnostic;
    }
}

/// A [`SmoothnessSink`] that discards all records.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl SmoothnessSink for NoopSink {}
