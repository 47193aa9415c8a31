// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Windowed dropped-frame statistics and smoothness metrics.
//!
//! `cadence_core` turns a stream of per-frame begin/end notifications into
//! aggregate smoothness statistics: average throughput, worst and
//! 95th-percentile trailing-window dropped percentages, and a coarse-bucket
//! distribution of window samples. It is `no_std` compatible (with `alloc`)
//! and performs no I/O; aggregated records leave through an injected sink.
//!
//! # Architecture
//!
//! Frame events flow through a short pipeline:
//!
//! ```text
//!   Embedder (frame scheduler)
//!       │ on_begin_frame / on_end_frame
//!       ▼
//!   DroppedFrameCounter ──► FrameSorter (start-order delivery)
//!       │                        │ pop_ready
//!       │◄───────────────────────┘
//!       ▼
//!   sliding window FIFO ──► per-window percent dropped
//!       │                        │
//!       ▼                        ▼
//!   outcome ring          SlidingWindowHistogram
//!       │                        │
//!       └────────► SmoothnessReport ──► SmoothnessSink
//! ```
//!
//! **[`frame`]**: Per-frame descriptors ([`FrameArgs`](frame::FrameArgs))
//! and the tri-state [`FrameOutcome`](frame::FrameOutcome).
//!
//! **[`time`]**: Nanosecond [`Timestamp`](time::Timestamp) and
//! [`Duration`](time::Duration) newtypes. The engine never reads a clock;
//! all times come from the embedder.
//!
//! **[`sorter`]**: [`FrameSorter`](sorter::FrameSorter) reorders
//! out-of-completion-order results into frame-start order.
//!
//! **[`histogram`]**: Weighted percent-dropped distribution with an
//! upper-tail percentile walk and coarse smoothness buckets.
//!
//! **[`counter`]**: [`DroppedFrameCounter`](counter::DroppedFrameCounter),
//! the orchestrator: outcome ring, trailing one-second window, reporting.
//!
//! **[`report`]**: [`SmoothnessReport`](report::SmoothnessReport) records
//! and the [`SmoothnessSink`](report::SmoothnessSink) trait through which
//! they leave the engine.
//!
//! # Crate features
//!
//! - `std` (disabled by default): reserved for std-only conveniences in
//!   dependent crates; the engine itself never needs it.
//! - `tracing` (disabled by default): emits trace-level events on
//!   smoothness drops and report emission.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod counter;
pub mod frame;
pub mod histogram;
pub mod report;
pub mod sorter;
pub mod time;
