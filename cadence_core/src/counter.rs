// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dropped-frame counter: windowed smoothness aggregation.
//!
//! [`DroppedFrameCounter`] ingests per-frame begin/end notifications from
//! the embedder's frame scheduler and maintains three views of recent
//! smoothness:
//!
//! - a fixed-capacity ring of the most recent frame outcomes, for the
//!   simple [`average_throughput`](DroppedFrameCounter::average_throughput)
//!   estimate,
//! - a FIFO of the frames inside the trailing one-second window, from which
//!   each window's percent-dropped sample is computed, and
//! - a [`SlidingWindowHistogram`] accumulating the time series of those
//!   samples for percentile and bucket queries.
//!
//! Tracking is inactive until [`on_fcp_received`](DroppedFrameCounter::on_fcp_received)
//! marks the activation milestone; before that only the outcome ring runs.
//! Results arriving out of completion order pass through a [`FrameSorter`]
//! so window maintenance always sees non-decreasing frame times.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, VecDeque};

use crate::frame::{FrameArgs, FrameId, FrameOutcome};
use crate::histogram::SlidingWindowHistogram;
use crate::report::{ScrollJankDiagnostic, SmoothnessReport, SmoothnessSink};
use crate::sorter::FrameSorter;
use crate::time::{Duration, Timestamp};

/// Span of the trailing window from which each percent-dropped sample is
/// computed.
pub const SLIDING_WINDOW_INTERVAL: Duration = Duration::from_secs(1);

/// Nominal 60 Hz frame interval, the expected-frames estimate before any
/// real interval has been observed.
const DEFAULT_FRAME_INTERVAL: Duration = Duration(16_666_667);

/// One window's worth of frames at the nominal rate.
const RING_CAPACITY: usize = 60;

/// Fixed-capacity cyclic store of the most recent frame outcomes.
#[derive(Clone, Debug)]
struct OutcomeRing {
    slots: [FrameOutcome; RING_CAPACITY],
    cursor: usize,
    saved: usize,
}

impl OutcomeRing {
    const fn new() -> Self {
        Self {
            slots: [FrameOutcome::Complete; RING_CAPACITY],
            cursor: 0,
            saved: 0,
        }
    }

    fn save(&mut self, outcome: FrameOutcome) {
        self.slots[self.cursor] = outcome;
        self.cursor = (self.cursor + 1) % RING_CAPACITY;
        self.saved = (self.saved + 1).min(RING_CAPACITY);
    }

    fn complete_count(&self) -> usize {
        self.slots[..self.saved]
            .iter()
            .filter(|outcome| **outcome == FrameOutcome::Complete)
            .count()
    }

    fn clear(&mut self) {
        self.cursor = 0;
        self.saved = 0;
    }
}

/// Where and when the current scroll gesture began.
#[derive(Clone, Copy, Debug)]
struct ScrollStartInfo {
    timestamp: Timestamp,
    frame_id: FrameId,
}

/// Metric values already handed to the sink, for change detection.
#[derive(Clone, Copy, Debug, Default)]
struct LastReported {
    worst: Option<f64>,
    percentile_95: Option<u32>,
}

/// Aggregates per-frame outcomes into windowed smoothness statistics.
pub struct DroppedFrameCounter {
    ring: OutcomeRing,
    total_frames: u64,
    total_partial: u64,
    total_dropped: u64,
    total_smoothness_dropped: u64,

    fcp: Option<Timestamp>,

    sorter: FrameSorter,
    sliding_window: VecDeque<(FrameArgs, bool)>,
    dropped_frame_count_in_window: u32,
    total_frames_in_window: f64,
    latest_sliding_window_start: Option<Timestamp>,
    latest_sliding_window_interval: Duration,

    histogram: SlidingWindowHistogram,
    max_percent_dropped: f64,
    max_percent_dropped_after_1s: Option<f64>,
    max_percent_dropped_after_2s: Option<f64>,
    max_percent_dropped_after_5s: Option<f64>,
    time_of_worst: Duration,

    scroll_start: Option<ScrollStartInfo>,
    scroll_start_per_frame: BTreeMap<FrameId, ScrollStartInfo>,

    report_for_ui: bool,
    sink: Option<Box<dyn SmoothnessSink>>,
    last_reported: LastReported,
    last_report: Option<SmoothnessReport>,
}

impl core::fmt::Debug for DroppedFrameCounter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DroppedFrameCounter")
            .field("total_frames", &self.total_frames)
            .field("total_dropped", &self.total_dropped)
            .field("frames_in_window", &self.sliding_window.len())
            .field("max_percent_dropped", &self.max_percent_dropped)
            .field("active", &self.fcp.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for DroppedFrameCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl DroppedFrameCounter {
    /// Creates an inactive counter with no report destination.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ring: OutcomeRing::new(),
            total_frames: 0,
            total_partial: 0,
            total_dropped: 0,
            total_smoothness_dropped: 0,
            fcp: None,
            sorter: FrameSorter::new(),
            sliding_window: VecDeque::new(),
            dropped_frame_count_in_window: 0,
            total_frames_in_window: SLIDING_WINDOW_INTERVAL.ratio(DEFAULT_FRAME_INTERVAL),
            latest_sliding_window_start: None,
            latest_sliding_window_interval: Duration::ZERO,
            histogram: SlidingWindowHistogram::new(),
            max_percent_dropped: 0.0,
            max_percent_dropped_after_1s: None,
            max_percent_dropped_after_2s: None,
            max_percent_dropped_after_5s: None,
            time_of_worst: Duration::ZERO,
            scroll_start: None,
            scroll_start_per_frame: BTreeMap::new(),
            report_for_ui: false,
            sink: None,
            last_reported: LastReported::default(),
            last_report: None,
        }
    }

    // -- outcome recording -------------------------------------------------

    /// Records a frame presented on time.
    pub fn add_good_frame(&mut self) {
        self.ring.save(FrameOutcome::Complete);
        self.total_frames += 1;
    }

    /// Records a frame presented outside ideal timing.
    pub fn add_partial_frame(&mut self) {
        self.ring.save(FrameOutcome::Partial);
        self.total_frames += 1;
        self.total_partial += 1;
    }

    /// Records a frame that missed its deadline entirely.
    pub fn add_dropped_frame(&mut self) {
        self.ring.save(FrameOutcome::Dropped);
        self.total_frames += 1;
        self.total_dropped += 1;
    }

    /// Percentage of the outcome ring occupied by on-time frames.
    ///
    /// The denominator is the ring capacity, so the estimate ramps up from
    /// zero while the ring fills and returns to zero after a reset.
    #[must_use]
    pub fn average_throughput(&self) -> u32 {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "complete count never exceeds the ring capacity of 60"
        )]
        let percent = (self.ring.complete_count() * 100 / RING_CAPACITY) as u32;
        percent
    }

    // -- lifecycle ---------------------------------------------------------

    /// Marks the activation milestone and starts sliding-window tracking.
    ///
    /// Must not be called twice without an intervening
    /// [`reset`](Self::reset).
    pub fn on_fcp_received(&mut self, timestamp: Timestamp) {
        debug_assert!(self.fcp.is_none(), "activation reported twice");
        self.fcp = Some(timestamp);
    }

    /// Selects the UI-shell reporting path instead of the default one.
    pub fn enable_report_for_ui(&mut self) {
        self.report_for_ui = true;
    }

    /// Injects the destination for aggregate reports. `None` disables
    /// reporting.
    pub fn set_report_destination(&mut self, sink: Option<Box<dyn SmoothnessSink>>) {
        self.sink = sink;
    }

    // -- frame ingestion ---------------------------------------------------

    /// Notes that a frame's interval has begun.
    ///
    /// Scroll bookkeeping runs even before activation; the sorter only sees
    /// frames once tracking is active.
    pub fn on_begin_frame(&mut self, args: &FrameArgs, is_scroll_active: bool) {
        if !is_scroll_active {
            self.scroll_start = None;
        } else if self.scroll_start.is_none() {
            self.scroll_start = Some(ScrollStartInfo {
                timestamp: args.frame_time,
                frame_id: args.id,
            });
        }

        if self.fcp.is_some() {
            self.sorter.add_new_frame(args);
            if is_scroll_active {
                debug_assert!(self.scroll_start.is_some(), "scroll start not recorded");
                if let Some(start) = self.scroll_start {
                    self.scroll_start_per_frame.insert(args.id, start);
                }
            }
            self.drain_sorter();
        }
    }

    /// Notes a frame's raw completion, possibly out of start order.
    pub fn on_end_frame(&mut self, args: &FrameArgs, is_dropped: bool) {
        if !args.interval.is_zero() {
            self.total_frames_in_window = SLIDING_WINDOW_INTERVAL.ratio(args.interval);
        }

        // Frames that began before activation, and repeated drop signals
        // for the same frame, do not count against smoothness.
        if is_dropped
            && self.fcp.is_some_and(|fcp| args.frame_time >= fcp)
            && !self.sorter.is_frame_dropped(args.id)
        {
            self.total_smoothness_dropped += 1;
            #[cfg(feature = "tracing")]
            tracing::trace!(
                frame = args.id.sequence_number,
                total = self.total_smoothness_dropped,
                "smoothness drop"
            );
            if self.report_for_ui {
                self.report_frames_for_ui();
            } else {
                self.report_frames();
            }
        }

        if let Some(start) = self.scroll_start_per_frame.remove(&args.id) {
            if args.id.source_id == start.frame_id.source_id {
                let diagnostic = ScrollJankDiagnostic {
                    time_since_scroll_start: args
                        .frame_time
                        .saturating_duration_since(start.timestamp),
                    frames_since_scroll_start: args
                        .id
                        .sequence_number
                        .saturating_sub(start.frame_id.sequence_number),
                };
                if let Some(sink) = self.sink.as_mut() {
                    sink.on_scroll_jank(&diagnostic);
                }
            }
        }

        if self.fcp.is_some() {
            self.sorter.add_frame_result(args, is_dropped);
            self.drain_sorter();
        }
    }

    /// Drains the window at a teardown boundary (navigation, freeze).
    ///
    /// Pending sorter results are resolved first. Window samples are
    /// reported for every frame older than one window before `timestamp`,
    /// and the untracked remainder up to `timestamp` is filled with
    /// zero-percent samples so an idle teardown gap does not bias the
    /// distribution toward drops.
    pub fn reset_pending_frames(&mut self, timestamp: Timestamp) {
        self.sorter.flush();
        self.drain_sorter();

        if self.latest_sliding_window_start.is_some() {
            let report_until = timestamp.saturating_sub(SLIDING_WINDOW_INTERVAL);
            while let Some(&(front, _)) = self.sliding_window.front() {
                if front.frame_time > report_until {
                    break;
                }
                self.pop_sliding_window();
            }
            if self.sliding_window.is_empty() {
                debug_assert_eq!(
                    self.dropped_frame_count_in_window, 0,
                    "drop count out of sync with the window"
                );
            }

            if let Some(latest_start) = self.latest_sliding_window_start {
                if latest_start < report_until && !self.latest_sliding_window_interval.is_zero() {
                    let gap = report_until.saturating_duration_since(latest_start);
                    #[expect(
                        clippy::cast_possible_truncation,
                        clippy::cast_sign_loss,
                        reason = "ceil of a positive finite ratio"
                    )]
                    let count =
                        libm::ceil(gap.ratio(self.latest_sliding_window_interval)) as u64;
                    if count > 0 {
                        self.histogram.add_percent_dropped(0.0, count);
                    }
                }
            }
        }

        self.dropped_frame_count_in_window = 0;
        self.sliding_window.clear();
        self.latest_sliding_window_start = None;
        self.latest_sliding_window_interval = Duration::ZERO;
    }

    /// Returns every piece of session state to its initial value.
    ///
    /// The report destination and the UI-path switch are configuration and
    /// survive.
    pub fn reset(&mut self) {
        self.sorter.clear();
        self.ring.clear();
        self.total_frames = 0;
        self.total_partial = 0;
        self.total_dropped = 0;
        self.total_smoothness_dropped = 0;
        self.fcp = None;
        self.sliding_window.clear();
        self.dropped_frame_count_in_window = 0;
        self.latest_sliding_window_start = None;
        self.latest_sliding_window_interval = Duration::ZERO;
        self.histogram.clear();
        self.max_percent_dropped = 0.0;
        self.max_percent_dropped_after_1s = None;
        self.max_percent_dropped_after_2s = None;
        self.max_percent_dropped_after_5s = None;
        self.time_of_worst = Duration::ZERO;
        self.last_reported = LastReported::default();
        self.last_report = None;
    }

    // -- queries -----------------------------------------------------------

    /// Worst per-window percent dropped since activation.
    #[must_use]
    pub fn sliding_window_max_percent_dropped(&self) -> f64 {
        self.max_percent_dropped
    }

    /// Worst window percentage from windows starting over a second after
    /// activation.
    #[must_use]
    pub fn max_percent_dropped_after_1s(&self) -> Option<f64> {
        self.max_percent_dropped_after_1s
    }

    /// Worst window percentage from windows starting over two seconds after
    /// activation.
    #[must_use]
    pub fn max_percent_dropped_after_2s(&self) -> Option<f64> {
        self.max_percent_dropped_after_2s
    }

    /// Worst window percentage from windows starting over five seconds
    /// after activation.
    #[must_use]
    pub fn max_percent_dropped_after_5s(&self) -> Option<f64> {
        self.max_percent_dropped_after_5s
    }

    /// Elapsed time from activation to the worst window.
    #[must_use]
    pub fn time_of_worst(&self) -> Duration {
        self.time_of_worst
    }

    /// The accumulated window-sample distribution.
    #[must_use]
    pub fn histogram(&self) -> &SlidingWindowHistogram {
        &self.histogram
    }

    /// Average smoothness from the most recent report, if one has fired.
    #[must_use]
    pub fn most_recent_average_smoothness(&self) -> Option<f64> {
        self.last_report.map(|report| report.avg_percent_dropped)
    }

    /// 95th-percentile window percentage from the most recent report, if
    /// one has fired.
    #[must_use]
    pub fn most_recent_95th_percentile(&self) -> Option<f64> {
        self.last_report
            .map(|report| f64::from(report.percentile_95))
    }

    /// Total frames recorded in the outcome ring since the last reset.
    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Total partial frames recorded since the last reset.
    #[must_use]
    pub fn total_partial(&self) -> u64 {
        self.total_partial
    }

    /// Total dropped frames recorded since the last reset.
    #[must_use]
    pub fn total_dropped(&self) -> u64 {
        self.total_dropped
    }

    /// Dropped frames that counted against smoothness since activation.
    #[must_use]
    pub fn total_smoothness_dropped(&self) -> u64 {
        self.total_smoothness_dropped
    }

    /// Number of frames currently inside the sliding window.
    #[must_use]
    pub fn frames_in_window(&self) -> usize {
        self.sliding_window.len()
    }

    /// Dropped frames currently inside the sliding window.
    #[must_use]
    pub fn dropped_in_window(&self) -> u32 {
        self.dropped_frame_count_in_window
    }

    /// Time span covered by the sliding window, from the oldest frame's
    /// start to the newest frame's interval end.
    #[must_use]
    pub fn current_window_span(&self) -> Duration {
        match (self.sliding_window.front(), self.sliding_window.back()) {
            (Some(&(front, _)), Some(&(back, _))) => {
                back.ends_at().saturating_duration_since(front.frame_time)
            }
            _ => Duration::ZERO,
        }
    }

    // -- window maintenance ------------------------------------------------

    fn drain_sorter(&mut self) {
        while let Some((args, is_dropped)) = self.sorter.pop_ready() {
            self.notify_frame_result(&args, is_dropped);
        }
    }

    /// Accepts one in-order frame result and maintains the window span.
    fn notify_frame_result(&mut self, args: &FrameArgs, is_dropped: bool) {
        // Intervals at or above the window span violate the windowing
        // assumptions; they occur only under external frame control where
        // dropped-frame statistics are not meaningful.
        if args.interval >= SLIDING_WINDOW_INTERVAL {
            return;
        }

        self.sliding_window.push_back((*args, is_dropped));
        if is_dropped {
            self.dropped_frame_count_in_window += 1;
        }
        if self.current_window_span() < SLIDING_WINDOW_INTERVAL {
            return;
        }

        debug_assert!(
            self.sliding_window.len() >= self.dropped_frame_count_in_window as usize,
            "drop count out of sync with the window"
        );

        while self.current_window_span() > SLIDING_WINDOW_INTERVAL {
            self.pop_sliding_window();
        }
        debug_assert!(!self.sliding_window.is_empty(), "window drained too far");
    }

    /// Retires the oldest window entry and records one (or, across a quiet
    /// gap, several) percent-dropped samples.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "gap-fill count is the ceil of a positive finite ratio"
    )]
    fn pop_sliding_window(&mut self) {
        let Some((removed_args, removed_was_dropped)) = self.sliding_window.pop_front() else {
            return;
        };
        if removed_was_dropped {
            debug_assert!(
                self.dropped_frame_count_in_window > 0,
                "drop count out of sync with the window"
            );
            self.dropped_frame_count_in_window =
                self.dropped_frame_count_in_window.saturating_sub(1);
        }
        let (remaining_oldest, newest_args, newest_was_dropped) =
            match (self.sliding_window.front(), self.sliding_window.back()) {
                (Some(&(oldest, _)), Some(&(newest, newest_dropped))) => {
                    (oldest, newest, newest_dropped)
                }
                _ => return,
            };

        // The newest entry may still lie past the window edge; it belongs
        // to the next window, not this one.
        let mut dropped = self.dropped_frame_count_in_window;
        if self.current_window_span() > SLIDING_WINDOW_INTERVAL && newest_was_dropped {
            dropped -= 1;
        }

        // Two completed frames far apart in time stand for a run of
        // near-identical windows; weight the sample by how many. The window
        // start can advance at most to one window before the newest frame.
        let max_window_start = newest_args.frame_time.saturating_sub(SLIDING_WINDOW_INTERVAL);
        let max_difference = newest_args.interval.mul_f64(1.5);
        let last_timestamp = core::cmp::min(remaining_oldest.frame_time, max_window_start);
        let difference = last_timestamp.saturating_duration_since(removed_args.frame_time);
        let count = if difference > max_difference && !newest_args.interval.is_zero() {
            libm::ceil(difference.ratio(newest_args.interval)) as u64
        } else {
            1
        };

        let percent_dropped =
            f64::min(f64::from(dropped) * 100.0 / self.total_frames_in_window, 100.0);
        self.histogram.add_percent_dropped(percent_dropped, count);

        if percent_dropped > self.max_percent_dropped {
            if let Some(fcp) = self.fcp {
                self.time_of_worst = newest_args.frame_time.saturating_duration_since(fcp);
            }
            self.max_percent_dropped = percent_dropped;
        }

        self.latest_sliding_window_start = Some(last_timestamp);
        self.latest_sliding_window_interval = remaining_oldest.interval;

        self.update_maxima_past_milestones(percent_dropped);
    }

    fn update_maxima_past_milestones(&mut self, percent_dropped: f64) {
        let Some(fcp) = self.fcp else {
            return;
        };
        let Some(latest_start) = self.latest_sliding_window_start else {
            return;
        };
        let since_activation = latest_start.saturating_duration_since(fcp);

        if since_activation > Duration::from_secs(1) {
            self.max_percent_dropped_after_1s = Some(f64::max(
                self.max_percent_dropped_after_1s.unwrap_or(0.0),
                percent_dropped,
            ));
        }
        if since_activation > Duration::from_secs(2) {
            self.max_percent_dropped_after_2s = Some(f64::max(
                self.max_percent_dropped_after_2s.unwrap_or(0.0),
                percent_dropped,
            ));
        }
        if since_activation > Duration::from_secs(5) {
            self.max_percent_dropped_after_5s = Some(f64::max(
                self.max_percent_dropped_after_5s.unwrap_or(0.0),
                percent_dropped,
            ));
        }
    }

    // -- reporting ---------------------------------------------------------

    fn build_report(
        &self,
        percentile_95: u32,
        worst_changed: bool,
        percentile_95_changed: bool,
    ) -> SmoothnessReport {
        let avg_percent_dropped = if self.total_frames == 0 {
            0.0
        } else {
            self.total_smoothness_dropped as f64 * 100.0 / self.total_frames as f64
        };
        SmoothnessReport {
            avg_percent_dropped,
            worst_percent_dropped: self.max_percent_dropped,
            percentile_95,
            bucket_percentages: self.histogram.bucket_percentages(),
            worst_after_1s: self.max_percent_dropped_after_1s,
            worst_after_2s: self.max_percent_dropped_after_2s,
            worst_after_5s: self.max_percent_dropped_after_5s,
            time_of_worst: self.time_of_worst,
            total_frames: self.total_frames,
            total_dropped: self.total_dropped,
            worst_changed,
            percentile_95_changed,
        }
    }

    fn report_frames(&mut self) {
        debug_assert!(!self.report_for_ui, "default path with UI reporting on");
        let percentile_95 = self.histogram.percentile(0.95);
        debug_assert!(
            f64::from(percentile_95) <= libm::round(self.max_percent_dropped),
            "95th percentile above the recorded maximum"
        );
        let worst_changed = self.last_reported.worst != Some(self.max_percent_dropped);
        let percentile_95_changed = self.last_reported.percentile_95 != Some(percentile_95);
        self.last_reported.worst = Some(self.max_percent_dropped);
        self.last_reported.percentile_95 = Some(percentile_95);

        if self.total_frames == 0 {
            return;
        }
        let report = self.build_report(percentile_95, worst_changed, percentile_95_changed);
        self.last_report = Some(report);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            worst = report.worst_percent_dropped,
            percentile_95 = report.percentile_95,
            "smoothness report"
        );
        if let Some(sink) = self.sink.as_mut() {
            sink.on_report(&report);
        }
    }

    fn report_frames_for_ui(&mut self) {
        debug_assert!(self.report_for_ui, "UI path with UI reporting off");
        let percentile_95 = self.histogram.percentile(0.95);
        let worst_changed = self.last_reported.worst != Some(self.max_percent_dropped);
        self.last_reported.worst = Some(self.max_percent_dropped);
        let report = self.build_report(percentile_95, worst_changed, false);
        if let Some(sink) = self.sink.as_mut() {
            sink.on_ui_report(&report);
        }
    }
}
