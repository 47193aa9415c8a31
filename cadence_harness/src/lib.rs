// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthetic frame streams and smoothness grading for tests and demos.
//!
//! [`FrameScript`] generates fixed-cadence frame descriptors with optional
//! idle stretches, and [`submit_frame`] / [`run_frames`] replay them through
//! a [`DroppedFrameCounter`] the way an embedder's frame scheduler would.
//! [`SmoothnessGrade`] condenses a [`SmoothnessReport`] into a letter grade
//! for HUD display.

#![no_std]

extern crate alloc;

use cadence_core::counter::DroppedFrameCounter;
use cadence_core::frame::{FrameArgs, FrameId};
use cadence_core::report::SmoothnessReport;
use cadence_core::time::{Duration, Timestamp};

/// Generates a fixed-cadence stream of frame descriptors from one source.
#[derive(Clone, Debug)]
pub struct FrameScript {
    source_id: u64,
    next_sequence: u64,
    cursor: Timestamp,
    interval: Duration,
}

impl FrameScript {
    /// Creates a script starting at `start` with the given frame interval.
    #[must_use]
    pub const fn new(source_id: u64, start: Timestamp, interval: Duration) -> Self {
        Self {
            source_id,
            next_sequence: 1,
            cursor: start,
            interval,
        }
    }

    /// A 60 Hz script, the common case in tests.
    #[must_use]
    pub const fn at_60hz(start: Timestamp) -> Self {
        Self::new(1, start, Duration(16_666_667))
    }

    /// Returns the next frame descriptor and advances the cadence.
    pub fn next_frame(&mut self) -> FrameArgs {
        let args = FrameArgs {
            id: FrameId {
                source_id: self.source_id,
                sequence_number: self.next_sequence,
            },
            frame_time: self.cursor,
            interval: self.interval,
        };
        self.next_sequence += 1;
        self.cursor = self.cursor + self.interval;
        args
    }

    /// Inserts an idle stretch: no frames are produced for `gap`.
    pub fn idle(&mut self, gap: Duration) {
        self.cursor = self.cursor + gap;
    }

    /// The script's frame interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// The timestamp the next frame will carry.
    #[must_use]
    pub const fn cursor(&self) -> Timestamp {
        self.cursor
    }
}

/// Runs one frame through begin, outcome recording, and end, the way an
/// embedder's scheduler drives the counter.
pub fn submit_frame(counter: &mut DroppedFrameCounter, args: &FrameArgs, dropped: bool) {
    counter.on_begin_frame(args, false);
    if dropped {
        counter.add_dropped_frame();
    } else {
        counter.add_good_frame();
    }
    counter.on_end_frame(args, dropped);
}

/// Drives `count` frames from the script, dropping those for which the
/// predicate returns true. The predicate receives each frame's sequence
/// number.
pub fn run_frames(
    counter: &mut DroppedFrameCounter,
    script: &mut FrameScript,
    count: u64,
    mut dropped: impl FnMut(u64) -> bool,
) {
    for _ in 0..count {
        let args = script.next_frame();
        submit_frame(counter, &args, dropped(args.id.sequence_number));
    }
}

/// Letter grade for perceived smoothness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmoothnessGrade {
    /// Essentially no visible jank.
    A,
    /// Occasional short stutters.
    B,
    /// Noticeable jank.
    C,
    /// Sustained jank.
    D,
}

impl SmoothnessGrade {
    /// Returns a short label for HUD rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Grades a report on its worst-window and 95th-percentile percentages.
///
/// Thresholds follow the coarse smoothness bucket bounds: a session whose
/// worst window stays under the light-jank bound and whose 95th percentile
/// stays under the barely-visible bound earns an A, and so on down.
#[must_use]
pub fn grade(report: &SmoothnessReport) -> SmoothnessGrade {
    let worst = report.worst_percent_dropped;
    let p95 = f64::from(report.percentile_95);
    if worst < 6.0 && p95 < 3.0 {
        SmoothnessGrade::A
    } else if worst < 25.0 && p95 < 12.0 {
        SmoothnessGrade::B
    } else if worst < 50.0 && p95 < 25.0 {
        SmoothnessGrade::C
    } else {
        SmoothnessGrade::D
    }
}
