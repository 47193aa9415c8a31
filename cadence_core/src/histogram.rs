// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frequency histogram over per-window percent-dropped samples.
//!
//! [`SlidingWindowHistogram`] keeps two parallel tallies of every window
//! sample fed to it: a fine-grained bin per integer percent (0 through 100)
//! and a small set of coarse smoothness buckets. Insertions are weighted, so
//! a single call can stand in for a run of identical windows (the counter
//! uses this to account for idle gaps in frame production).
//!
//! The percentile query is an upper-tail walk: it scans from the highest bin
//! downward, accumulating counts until the requested fraction of samples has
//! been excluded from the top, and returns the bin where the threshold is
//! crossed. This is tuned for high-end percentiles such as the 95th.

use core::fmt;

/// Lower bound of each coarse smoothness bucket, up to but not including the
/// next bound. The last bucket takes everything at or above 75 percent.
pub const SMOOTHNESS_BUCKET_BOUNDS: [f64; 7] = [0.0, 3.0, 6.0, 12.0, 25.0, 50.0, 75.0];

/// One bin per integer percent value, 0 through 100 inclusive.
const PERCENT_BINS: usize = 101;

/// Searches backwards through the bucket bounds. A value sitting exactly on
/// a bound belongs to that bound's bucket.
fn smoothness_bucket(percent_dropped: f64) -> usize {
    let mut i = SMOOTHNESS_BUCKET_BOUNDS.len() - 1;
    while percent_dropped < SMOOTHNESS_BUCKET_BOUNDS[i] {
        i -= 1;
    }
    i
}

/// Weighted frequency distribution of per-window percent-dropped values.
#[derive(Clone)]
pub struct SlidingWindowHistogram {
    bins: [u64; PERCENT_BINS],
    smoothness_buckets: [u64; SMOOTHNESS_BUCKET_BOUNDS.len()],
    total_count: u64,
}

impl Default for SlidingWindowHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl SlidingWindowHistogram {
    /// Creates an empty histogram.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bins: [0; PERCENT_BINS],
            smoothness_buckets: [0; SMOOTHNESS_BUCKET_BOUNDS.len()],
            total_count: 0,
        }
    }

    /// Records `count` window samples with the given percent-dropped value.
    ///
    /// `percent_dropped` must be within `0.0..=100.0`; values outside that
    /// range are a caller bug. Binning rounds half away from zero.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "rounded percent is within 0..=100 by the precondition"
    )]
    pub fn add_percent_dropped(&mut self, percent_dropped: f64, count: u64) {
        debug_assert!(
            (0.0..=100.0).contains(&percent_dropped),
            "percent-dropped sample out of range: {percent_dropped}"
        );
        let percent_dropped = percent_dropped.clamp(0.0, 100.0);
        self.bins[libm::round(percent_dropped) as usize] += count;
        self.smoothness_buckets[smoothness_bucket(percent_dropped)] += count;
        self.total_count += count;
    }

    /// Returns the percent-dropped value below which the top `1 - percentile`
    /// fraction of samples lies, or 0 when the histogram is empty.
    ///
    /// Walks from the highest bin downward, excluding samples from the top,
    /// and stops at the bin where the excluded count first reaches the
    /// target fraction. `percentile` is a fraction in `0.0..=1.0`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "bin index never exceeds 100"
    )]
    pub fn percentile(&self, percentile: f64) -> u32 {
        if self.total_count == 0 {
            return 0;
        }
        debug_assert!(
            (0.0..=1.0).contains(&percentile),
            "percentile fraction out of range: {percentile}"
        );
        let mut current_index = PERCENT_BINS - 1;
        let mut skipped = self.bins[current_index];
        let samples_to_skip = (1.0 - percentile) * self.total_count as f64;
        while (skipped as f64) < samples_to_skip && current_index > 0 {
            current_index -= 1;
            skipped += self.bins[current_index];
        }
        current_index as u32
    }

    /// Returns, per coarse bucket, the percentage of all samples that fall
    /// in it. All zero when the histogram is empty.
    #[must_use]
    pub fn bucket_percentages(&self) -> [f64; SMOOTHNESS_BUCKET_BOUNDS.len()] {
        let mut out = [0.0; SMOOTHNESS_BUCKET_BOUNDS.len()];
        if self.total_count == 0 {
            return out;
        }
        for (pct, count) in out.iter_mut().zip(self.smoothness_buckets) {
            *pct = count as f64 * 100.0 / self.total_count as f64;
        }
        out
    }

    /// Weight recorded in the bin for the given integer percent value.
    ///
    /// Returns 0 for out-of-range indices.
    #[must_use]
    pub fn bin_count(&self, percent: u32) -> u64 {
        self.bins.get(percent as usize).copied().unwrap_or(0)
    }

    /// Total weight of all samples recorded since the last clear.
    #[inline]
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Zeroes every bin, bucket, and the total.
    pub fn clear(&mut self) {
        self.bins = [0; PERCENT_BINS];
        self.smoothness_buckets = [0; SMOOTHNESS_BUCKET_BOUNDS.len()];
        self.total_count = 0;
    }
}

impl fmt::Debug for SlidingWindowHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlidingWindowHistogram")
            .field("total_count", &self.total_count)
            .field("smoothness_buckets", &self.smoothness_buckets)
            .finish_non_exhaustive()
    }
}

/// One `index: count` line per bin, then the total.
impl fmt::Display for SlidingWindowHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, count) in self.bins.iter().enumerate() {
            writeln!(f, "{i}: {count}")?;
        }
        write!(f, "Total: {}", self.total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin_sum(h: &SlidingWindowHistogram) -> u64 {
        h.bins.iter().sum()
    }

    fn bucket_sum(h: &SlidingWindowHistogram) -> u64 {
        h.smoothness_buckets.iter().sum()
    }

    #[test]
    fn weighted_inserts_conserve_counts() {
        let mut h = SlidingWindowHistogram::new();
        h.add_percent_dropped(0.0, 100);
        h.add_percent_dropped(20.4, 3);
        h.add_percent_dropped(99.7, 2);
        assert_eq!(h.total_count(), 105);
        assert_eq!(bin_sum(&h), 105);
        assert_eq!(bucket_sum(&h), 105);
        // 20.4 rounds to bin 20, 99.7 to bin 100.
        assert_eq!(h.bins[20], 3);
        assert_eq!(h.bins[100], 2);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let mut h = SlidingWindowHistogram::new();
        h.add_percent_dropped(2.5, 1);
        h.add_percent_dropped(2.4, 1);
        assert_eq!(h.bins[3], 1);
        assert_eq!(h.bins[2], 1);
    }

    #[test]
    fn bucket_boundary_belongs_to_higher_bucket() {
        let mut h = SlidingWindowHistogram::new();
        h.add_percent_dropped(3.0, 1);
        h.add_percent_dropped(2.999, 1);
        h.add_percent_dropped(75.0, 1);
        assert_eq!(h.smoothness_buckets[1], 1, "3.0 lands in the [3,6) bucket");
        assert_eq!(h.smoothness_buckets[0], 1);
        assert_eq!(h.smoothness_buckets[6], 1, "75.0 lands in the top bucket");
    }

    #[test]
    fn percentile_of_empty_is_zero() {
        let h = SlidingWindowHistogram::new();
        assert_eq!(h.percentile(0.95), 0);
        assert_eq!(h.percentile(0.0), 0);
    }

    #[test]
    fn percentile_upper_tail_walk() {
        // 100 samples at 0 and a single sample at 100. Skipping the top
        // 5 percent (5.05 samples) walks past the lone high sample all the
        // way down to bin 0.
        let mut h = SlidingWindowHistogram::new();
        h.add_percent_dropped(0.0, 100);
        h.add_percent_dropped(100.0, 1);
        assert_eq!(h.percentile(0.95), 0);

        // Inverted distribution: the top bin alone already exceeds the
        // skip threshold, so the walk stops there immediately.
        let mut h = SlidingWindowHistogram::new();
        h.add_percent_dropped(0.0, 1);
        h.add_percent_dropped(100.0, 100);
        assert_eq!(h.percentile(0.95), 100);
    }

    #[test]
    fn percentile_crosses_at_expected_bin() {
        let mut h = SlidingWindowHistogram::new();
        h.add_percent_dropped(10.0, 50);
        h.add_percent_dropped(40.0, 40);
        h.add_percent_dropped(90.0, 10);
        // total 100; p95 skips 5 samples, all inside bin 90.
        assert_eq!(h.percentile(0.95), 90);
        // p50 skips 50: bins 90 (10) and 40 (40) together reach it.
        assert_eq!(h.percentile(0.5), 40);
        // p0 skips everything and walks to the lowest occupied bin.
        assert_eq!(h.percentile(0.0), 10);
    }

    #[test]
    fn bucket_percentages_sum_to_hundred() {
        let mut h = SlidingWindowHistogram::new();
        h.add_percent_dropped(1.0, 25);
        h.add_percent_dropped(10.0, 25);
        h.add_percent_dropped(30.0, 25);
        h.add_percent_dropped(80.0, 25);
        let buckets = h.bucket_percentages();
        let sum: f64 = buckets.iter().sum();
        assert!((sum - 100.0).abs() < 1e-9, "got {sum}");
        assert!((buckets[0] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn clear_restores_fresh_state() {
        let mut h = SlidingWindowHistogram::new();
        h.add_percent_dropped(55.0, 7);
        h.clear();
        assert_eq!(h.total_count(), 0);
        assert_eq!(h.percentile(0.95), 0);
        assert_eq!(h.bucket_percentages(), [0.0; 7]);
    }

    #[test]
    fn display_dumps_bins_and_total() {
        let mut h = SlidingWindowHistogram::new();
        h.add_percent_dropped(2.0, 4);
        let dump = alloc::format!("{h}");
        assert!(dump.contains("2: 4"), "got: {dump}");
        assert!(dump.ends_with("Total: 4"), "got: {dump}");
    }
}
