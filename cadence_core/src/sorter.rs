// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Start-order delivery of out-of-order frame results.
//!
//! Frames can complete in a different order than they began (the display
//! pipeline runs several frames deep), but the windowing math requires
//! outcomes in non-decreasing frame-time order. [`FrameSorter`] buffers
//! frames in the order they began, records results as they arrive, and
//! releases each frame exactly once, in start order, as soon as every
//! earlier frame has resolved.
//!
//! Delivery is pull-based: after any mutation the owner drains
//! [`pop_ready`](FrameSorter::pop_ready) until it returns `None`. Each
//! frame is yielded exactly once.

use alloc::collections::VecDeque;

use crate::frame::{FrameArgs, FrameId};

#[derive(Clone, Copy, Debug)]
struct PendingFrame {
    args: FrameArgs,
    result: Option<bool>,
}

/// Reorders per-frame results into frame-start order.
#[derive(Debug, Default)]
pub struct FrameSorter {
    current_source_id: Option<u64>,
    pending: VecDeque<PendingFrame>,
    ready: VecDeque<(FrameArgs, bool)>,
}

impl FrameSorter {
    /// Creates an empty sorter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a frame in start order.
    ///
    /// A frame from a newer source flushes the current source first (frames
    /// with known results are released, unresolved ones are discarded).
    /// Frames from older sources are ignored. Within a source, sequence
    /// numbers must be increasing.
    pub fn add_new_frame(&mut self, args: &FrameArgs) {
        match self.current_source_id {
            Some(current) if args.id.source_id < current => return,
            Some(current) if args.id.source_id > current => {
                self.flush();
                self.current_source_id = Some(args.id.source_id);
            }
            Some(_) => {}
            None => self.current_source_id = Some(args.id.source_id),
        }
        if let Some(back) = self.pending.back() {
            debug_assert!(
                args.id.sequence_number > back.args.id.sequence_number,
                "frames must begin in increasing sequence order"
            );
        }
        self.pending.push_back(PendingFrame {
            args: *args,
            result: None,
        });
    }

    /// Records the outcome for a previously registered frame.
    ///
    /// Results for unknown frames and duplicate results for the same frame
    /// are ignored. Once the oldest pending frames have all resolved they
    /// move, in start order, onto the ready queue.
    pub fn add_frame_result(&mut self, args: &FrameArgs, is_dropped: bool) {
        if self.current_source_id != Some(args.id.source_id) {
            return;
        }
        let Some(entry) = self
            .pending
            .iter_mut()
            .find(|entry| entry.args.id == args.id)
        else {
            return;
        };
        if entry.result.is_some() {
            return;
        }
        entry.result = Some(is_dropped);
        self.release_resolved_prefix();
    }

    /// Dequeues the next in-order frame result, if one is available.
    pub fn pop_ready(&mut self) -> Option<(FrameArgs, bool)> {
        self.ready.pop_front()
    }

    /// Whether a drop has already been recorded for the given frame.
    #[must_use]
    pub fn is_frame_dropped(&self, id: FrameId) -> bool {
        self.pending
            .iter()
            .any(|entry| entry.args.id == id && entry.result == Some(true))
    }

    /// Resolves the pipeline at a teardown boundary: every pending frame
    /// with a known result is released in start order, the rest are
    /// discarded.
    pub fn flush(&mut self) {
        while let Some(entry) = self.pending.pop_front() {
            if let Some(is_dropped) = entry.result {
                self.ready.push_back((entry.args, is_dropped));
            }
        }
    }

    /// Discards all pending and ready state.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.ready.clear();
        self.current_source_id = None;
    }

    /// Number of frames still awaiting a result or delivery.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    fn release_resolved_prefix(&mut self) {
        while let Some(front) = self.pending.front() {
            let Some(is_dropped) = front.result else {
                break;
            };
            self.ready.push_back((front.args, is_dropped));
            self.pending.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{Duration, Timestamp};

    fn frame(source: u64, seq: u64) -> FrameArgs {
        FrameArgs {
            id: FrameId {
                source_id: source,
                sequence_number: seq,
            },
            frame_time: Timestamp(seq * 16_666_667),
            interval: Duration(16_666_667),
        }
    }

    fn drain(sorter: &mut FrameSorter) -> alloc::vec::Vec<(u64, bool)> {
        let mut out = alloc::vec::Vec::new();
        while let Some((args, dropped)) = sorter.pop_ready() {
            out.push((args.id.sequence_number, dropped));
        }
        out
    }

    #[test]
    fn in_order_results_release_immediately() {
        let mut sorter = FrameSorter::new();
        for seq in 1..=3 {
            sorter.add_new_frame(&frame(1, seq));
        }
        sorter.add_frame_result(&frame(1, 1), false);
        assert_eq!(drain(&mut sorter), &[(1, false)]);
        sorter.add_frame_result(&frame(1, 2), true);
        assert_eq!(drain(&mut sorter), &[(2, true)]);
    }

    #[test]
    fn out_of_order_results_wait_for_the_head() {
        let mut sorter = FrameSorter::new();
        for seq in 1..=3 {
            sorter.add_new_frame(&frame(1, seq));
        }
        sorter.add_frame_result(&frame(1, 3), true);
        sorter.add_frame_result(&frame(1, 2), false);
        assert!(drain(&mut sorter).is_empty(), "head still unresolved");
        sorter.add_frame_result(&frame(1, 1), false);
        assert_eq!(
            drain(&mut sorter),
            &[(1, false), (2, false), (3, true)],
            "whole run releases in start order"
        );
    }

    #[test]
    fn duplicate_results_are_ignored() {
        let mut sorter = FrameSorter::new();
        sorter.add_new_frame(&frame(1, 1));
        sorter.add_new_frame(&frame(1, 2));
        sorter.add_frame_result(&frame(1, 2), true);
        assert!(sorter.is_frame_dropped(frame(1, 2).id));
        sorter.add_frame_result(&frame(1, 2), false);
        assert!(
            sorter.is_frame_dropped(frame(1, 2).id),
            "first result wins"
        );
        sorter.add_frame_result(&frame(1, 1), false);
        assert_eq!(drain(&mut sorter), &[(1, false), (2, true)]);
    }

    #[test]
    fn flush_releases_resolved_and_discards_the_rest() {
        let mut sorter = FrameSorter::new();
        for seq in 1..=4 {
            sorter.add_new_frame(&frame(1, seq));
        }
        sorter.add_frame_result(&frame(1, 2), true);
        sorter.add_frame_result(&frame(1, 4), false);
        sorter.flush();
        assert_eq!(
            drain(&mut sorter),
            &[(2, true), (4, false)],
            "unresolved frames 1 and 3 are skipped"
        );
        assert_eq!(sorter.pending_frames(), 0);
    }

    #[test]
    fn newer_source_flushes_the_old_one() {
        let mut sorter = FrameSorter::new();
        sorter.add_new_frame(&frame(1, 1));
        sorter.add_frame_result(&frame(1, 1), true);
        assert_eq!(drain(&mut sorter), &[(1, true)]);

        sorter.add_new_frame(&frame(1, 2));
        sorter.add_new_frame(&frame(2, 1));
        assert_eq!(sorter.pending_frames(), 1, "old unresolved frame dropped");

        // Results for the old source no longer land.
        sorter.add_frame_result(&frame(1, 2), true);
        assert!(drain(&mut sorter).is_empty());

        sorter.add_frame_result(&frame(2, 1), false);
        assert_eq!(drain(&mut sorter), &[(1, false)]);
    }

    #[test]
    fn results_for_unknown_frames_are_ignored() {
        let mut sorter = FrameSorter::new();
        sorter.add_frame_result(&frame(1, 1), true);
        assert!(drain(&mut sorter).is_empty());
        assert!(!sorter.is_frame_dropped(frame(1, 1).id));
    }

    #[test]
    fn clear_discards_everything() {
        let mut sorter = FrameSorter::new();
        sorter.add_new_frame(&frame(1, 1));
        sorter.add_frame_result(&frame(1, 1), true);
        sorter.clear();
        assert_eq!(sorter.pop_ready(), None);
        assert_eq!(sorter.pending_frames(), 0);
    }
}
