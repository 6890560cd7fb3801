//! Repair counters.

use liveblog_core::FeedId;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Corrections for one feed, or summed over many.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairReport {
    pub entries_corrected: usize,
    pub content_replaced: usize,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        self.entries_corrected == 0 && self.content_replaced == 0
    }
}

impl Add for RepairReport {
    type Output = RepairReport;

    fn add(self, other: RepairReport) -> RepairReport {
        RepairReport {
            entries_corrected: self.entries_corrected + other.entries_corrected,
            content_replaced: self.content_replaced + other.content_replaced,
        }
    }
}

impl AddAssign for RepairReport {
    fn add_assign(&mut self, other: RepairReport) {
        *self = *self + other;
    }
}

impl Sum for RepairReport {
    fn sum<I: Iterator<Item = RepairReport>>(iter: I) -> Self {
        iter.fold(RepairReport::default(), Add::add)
    }
}

/// Result of repairing every feed in a store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub dry_run: bool,
    pub feeds: Vec<(FeedId, RepairReport)>,
}

impl BatchReport {
    pub fn total(&self) -> RepairReport {
        self.feeds.iter().map(|(_, report)| *report).sum()
    }

    /// Feeds that needed at least one correction.
    pub fn touched(&self) -> impl Iterator<Item = &(FeedId, RepairReport)> {
        self.feeds.iter().filter(|(_, report)| !report.is_clean())
    }
}
