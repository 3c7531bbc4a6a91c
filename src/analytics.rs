//! Per-run analytics: category counts and sizes plus the raw size distribution.

use crate::file_category::CategoryRules;
use serde::Serialize;

/// Count and total size of the files assigned to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub name: String,
    pub count: usize,
    pub total_size: u64,
}

/// Aggregated results of one organize run.
///
/// Categories appear in classification order, including unused ones with zero
/// counts. `sizes` holds the size of every analyzed file in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalyticsSnapshot {
    pub categories: Vec<CategoryStats>,
    pub sizes: Vec<u64>,
}

/// One bucket of [`AnalyticsSnapshot::size_histogram`]. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistogramBin {
    pub lower: u64,
    pub upper: u64,
    pub count: usize,
}

impl AnalyticsSnapshot {
    /// An all-zero snapshot with one entry per category.
    pub fn for_rules(rules: &CategoryRules) -> Self {
        Self {
            categories: rules
                .names()
                .map(|name| CategoryStats {
                    name: name.to_string(),
                    count: 0,
                    total_size: 0,
                })
                .collect(),
            sizes: Vec::new(),
        }
    }

    /// Records one file of `size` bytes under `category`.
    ///
    /// Unknown categories are appended, which keeps the snapshot consistent if
    /// it is fed from a different rule table.
    pub fn record(&mut self, category: &str, size: u64) {
        match self.categories.iter_mut().find(|c| c.name == category) {
            Some(stats) => {
                stats.count += 1;
                stats.total_size += size;
            }
            None => self.categories.push(CategoryStats {
                name: category.to_string(),
                count: 1,
                total_size: size,
            }),
        }
        self.sizes.push(size);
    }

    pub fn get(&self, category: &str) -> Option<&CategoryStats> {
        self.categories.iter().find(|c| c.name == category)
    }

    pub fn total_files(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }

    pub fn total_size(&self) -> u64 {
        self.categories.iter().map(|c| c.total_size).sum()
    }

    /// True when no file was analyzed.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty() && self.total_files() == 0
    }

    /// Categories that received at least one file, in classification order.
    pub fn non_empty(&self) -> impl Iterator<Item = &CategoryStats> {
        self.categories.iter().filter(|c| c.count > 0)
    }

    /// Fraction of the total size taken by `category`, in `0.0..=1.0`.
    pub fn share_of_size(&self, category: &str) -> f64 {
        let total = self.total_size();
        match self.get(category) {
            Some(stats) if total > 0 => stats.total_size as f64 / total as f64,
            _ => 0.0,
        }
    }

    /// Log-scaled histogram of the non-zero file sizes.
    ///
    /// Bin edges are spaced evenly in log space between the smallest and the
    /// largest size. Zero-byte files are left out since they have no place on
    /// a log axis. Returns an empty vector when there is nothing to bin.
    pub fn size_histogram(&self, bins: usize) -> Vec<HistogramBin> {
        let sizes: Vec<u64> = self.sizes.iter().copied().filter(|&s| s > 0).collect();
        let (Some(&min), Some(&max)) = (sizes.iter().min(), sizes.iter().max()) else {
            return Vec::new();
        };
        if bins == 0 {
            return Vec::new();
        }
        if min == max {
            return vec![HistogramBin {
                lower: min,
                upper: max,
                count: sizes.len(),
            }];
        }

        let log_min = (min as f64).ln();
        let width = ((max as f64).ln() - log_min) / bins as f64;
        let edge = |i: usize| (log_min + width * i as f64).exp().round() as u64;

        let mut histogram: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: if i == 0 { min } else { edge(i) },
                upper: if i + 1 == bins { max } else { edge(i + 1) },
                count: 0,
            })
            .collect();

        for size in sizes {
            let index = (((size as f64).ln() - log_min) / width).floor() as usize;
            histogram[index.min(bins - 1)].count += 1;
        }
        histogram
    }
}

/// Formats a byte count with 1024-based units.
///
/// ```
/// use dirsort::analytics::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(2048), "2.00 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_rules_has_every_category() {
        let snapshot = AnalyticsSnapshot::for_rules(&CategoryRules::default());
        assert_eq!(snapshot.categories.len(), 7);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.non_empty().count(), 0);
    }

    #[test]
    fn test_record_accumulates() {
        let mut snapshot = AnalyticsSnapshot::for_rules(&CategoryRules::default());
        snapshot.record("Images", 2048);
        snapshot.record("Images", 1024);
        snapshot.record("Others", 500);

        let images = snapshot.get("Images").unwrap();
        assert_eq!(images.count, 2);
        assert_eq!(images.total_size, 3072);
        assert_eq!(snapshot.total_files(), 3);
        assert_eq!(snapshot.total_size(), 3572);
        assert_eq!(snapshot.sizes, vec![2048, 1024, 500]);

        let used: Vec<_> = snapshot.non_empty().map(|c| c.name.as_str()).collect();
        assert_eq!(used, vec!["Images", "Others"]);
    }

    #[test]
    fn test_record_unknown_category_is_appended() {
        let mut snapshot = AnalyticsSnapshot::default();
        snapshot.record("Custom", 10);
        assert_eq!(snapshot.get("Custom").map(|c| c.count), Some(1));
    }

    #[test]
    fn test_share_of_size() {
        let mut snapshot = AnalyticsSnapshot::for_rules(&CategoryRules::default());
        assert_eq!(snapshot.share_of_size("Images"), 0.0);
        snapshot.record("Images", 300);
        snapshot.record("Audio", 100);
        assert!((snapshot.share_of_size("Images") - 0.75).abs() < f64::EPSILON);
        assert_eq!(snapshot.share_of_size("Missing"), 0.0);
    }

    #[test]
    fn test_histogram_empty_and_zero_sizes() {
        let mut snapshot = AnalyticsSnapshot::default();
        assert!(snapshot.size_histogram(10).is_empty());
        snapshot.record("Others", 0);
        assert!(snapshot.size_histogram(10).is_empty());
    }

    #[test]
    fn test_histogram_single_value() {
        let mut snapshot = AnalyticsSnapshot::default();
        snapshot.record("Others", 100);
        snapshot.record("Others", 100);
        let histogram = snapshot.size_histogram(10);
        assert_eq!(histogram.len(), 1);
        assert_eq!(histogram[0].count, 2);
    }

    #[test]
    fn test_histogram_log_buckets() {
        let mut snapshot = AnalyticsSnapshot::default();
        for size in [1, 10, 100, 1000, 0] {
            snapshot.record("Others", size);
        }
        let histogram = snapshot.size_histogram(3);
        assert_eq!(histogram.len(), 3);
        assert_eq!(histogram[0].lower, 1);
        assert_eq!(histogram[2].upper, 1000);
        assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), 4);
        // the largest value lands in the last bin, not past it
        assert!(histogram[2].count >= 1);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
