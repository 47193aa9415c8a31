// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for cadence
//! diagnostics.
//!
//! This crate provides [`SmoothnessSink`](cadence_core::report::SmoothnessSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-record
//!   output.
//! - [`recorder::RecorderSink`]: in-memory recording with a shared handle
//!   for later inspection.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from a
//!   recorded session.

pub mod chrome;
pub mod pretty;
pub mod recorder;
