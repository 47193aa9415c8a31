// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory recording of smoothness records.
//!
//! [`RecorderSink`] implements
//! [`SmoothnessSink`](cadence_core::report::SmoothnessSink) and appends
//! every record to a buffer shared with a [`RecorderHandle`]. The counter
//! takes ownership of the boxed sink; the handle stays with the caller for
//! later inspection or export.

use std::cell::RefCell;
use std::rc::Rc;

use cadence_core::report::{ScrollJankDiagnostic, SmoothnessReport, SmoothnessSink};

/// One recorded record, in arrival order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A report from the default reporting path.
    Report(SmoothnessReport),
    /// A report from the UI-shell reporting path.
    UiReport(SmoothnessReport),
    /// A scroll jank diagnostic.
    ScrollJank(ScrollJankDiagnostic),
}

type SharedEvents = Rc<RefCell<Vec<RecordedEvent>>>;

/// A [`SmoothnessSink`] that appends every record to a shared buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: SharedEvents,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle onto the recording, valid after the sink itself has
    /// been handed to a counter.
    #[must_use]
    pub fn handle(&self) -> RecorderHandle {
        RecorderHandle {
            events: Rc::clone(&self.events),
        }
    }
}

impl SmoothnessSink for RecorderSink {
    fn on_report(&mut self, report: &SmoothnessReport) {
        self.events.borrow_mut().push(RecordedEvent::Report(*report));
    }

    fn on_ui_report(&mut self, report: &SmoothnessReport) {
        self.events
            .borrow_mut()
            .push(RecordedEvent::UiReport(*report));
    }

    fn on_scroll_jank(&mut self, diagnostic: &ScrollJankDiagnostic) {
        self.events
            .borrow_mut()
            .push(RecordedEvent::ScrollJank(*diagnostic));
    }
}

/// Read access to a [`RecorderSink`]'s buffer.
#[derive(Clone, Debug)]
pub struct RecorderHandle {
    events: SharedEvents,
}

impl RecorderHandle {
    /// Copies out everything recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    /// Number of records so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}
