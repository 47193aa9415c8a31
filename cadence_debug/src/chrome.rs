// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] turns a recorded session from a
//! [`RecorderSink`](super::recorder::RecorderSink) into [Chrome Trace Event
//! Format][spec] JSON, suitable for loading into `chrome://tracing` or
//! [Perfetto](https://ui.perfetto.dev/).
//!
//! Smoothness reports carry no wall-clock timestamp of their own (they fire
//! on drop events), so each record's ordinal serves as its timestamp: one
//! microsecond per record, in arrival order.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Exports recorded smoothness records as Chrome Trace Event Format JSON.
///
/// Reports become counter events (`ph: "C"`) tracking the worst-window,
/// 95th-percentile, and average series; a report whose worst-window value
/// changed additionally emits a global instant event. Scroll jank
/// diagnostics become instant events.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::new();

    for (ordinal, recorded) in events.iter().enumerate() {
        let ts = ordinal as u64;
        match recorded {
            RecordedEvent::Report(report) => {
                out.push(json!({
                    "ph": "C",
                    "name": "Smoothness",
                    "cat": "Metrics",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "worst_percent_dropped": report.worst_percent_dropped,
                        "percentile_95": report.percentile_95,
                        "avg_percent_dropped": report.avg_percent_dropped,
                    }
                }));
                if report.worst_changed {
                    out.push(json!({
                        "ph": "i",
                        "name": "WorstWindow",
                        "cat": "Metrics",
                        "ts": ts,
                        "pid": 0,
                        "tid": 0,
                        "s": "g",
                        "args": {
                            "worst_percent_dropped": report.worst_percent_dropped,
                            "time_of_worst_us": report.time_of_worst.as_nanos() / 1_000,
                        }
                    }));
                }
            }
            RecordedEvent::UiReport(report) => {
                out.push(json!({
                    "ph": "C",
                    "name": "SmoothnessUi",
                    "cat": "Metrics",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "worst_percent_dropped": report.worst_percent_dropped,
                    }
                }));
            }
            RecordedEvent::ScrollJank(diagnostic) => {
                out.push(json!({
                    "ph": "i",
                    "name": "ScrollJank",
                    "cat": "Input",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "since_scroll_start_us":
                            diagnostic.time_since_scroll_start.as_nanos() / 1_000,
                        "frames_since_scroll_start": diagnostic.frames_since_scroll_start,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use cadence_core::report::{ScrollJankDiagnostic, SmoothnessReport};
    use cadence_core::time::Duration;

    use super::*;

    fn sample_report(worst: f64, changed: bool) -> SmoothnessReport {
        SmoothnessReport {
            avg_percent_dropped: 1.5,
            worst_percent_dropped: worst,
            percentile_95: 10,
            bucket_percentages: [0.0; 7],
            worst_after_1s: None,
            worst_after_2s: None,
            worst_after_5s: None,
            time_of_worst: Duration::from_millis(900),
            total_frames: 600,
            total_dropped: 9,
            worst_changed: changed,
            percentile_95_changed: false,
        }
    }

    #[test]
    fn export_produces_valid_json() {
        let events = vec![
            RecordedEvent::Report(sample_report(12.0, true)),
            RecordedEvent::Report(sample_report(12.0, false)),
            RecordedEvent::ScrollJank(ScrollJankDiagnostic {
                time_since_scroll_start: Duration::from_millis(80),
                frames_since_scroll_start: 5,
            }),
        ];

        let mut out = Vec::new();
        export(&events, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&String::from_utf8(out).unwrap()).unwrap();

        // First report emits a counter plus a worst-window instant; the
        // second, unchanged, emits only the counter.
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[0]["ph"], "C");
        assert_eq!(parsed[0]["name"], "Smoothness");
        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "WorstWindow");
        assert_eq!(parsed[2]["ph"], "C");
        assert_eq!(parsed[3]["name"], "ScrollJank");
        assert_eq!(parsed[3]["args"]["since_scroll_start_us"], 80_000);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&String::from_utf8(out).unwrap()).unwrap();
        assert!(parsed.is_empty());
    }
}
