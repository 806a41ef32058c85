//! Run statistics over a set of cases

use casebook_core::{CaseOutcome, TestCase};
use serde::Serialize;

/// Counts of case outcomes
///
/// A case with both failed and skipped steps counts towards both `failed`
/// and `skipped`, so the buckets do not have to add up to `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Cases considered
    pub total: usize,
    /// Cases with no executed steps
    pub pending: usize,
    /// Cases whose steps all passed
    pub passed: usize,
    /// Cases with at least one failed step
    pub failed: usize,
    /// Cases with at least one skipped step
    pub skipped: usize,
}

impl Statistics {
    /// Tally the outcomes of `cases`
    pub fn collect<'a, I>(cases: I) -> Self
    where
        I: IntoIterator<Item = &'a TestCase>,
    {
        let mut stats = Statistics::default();
        for case in cases {
            stats.add(case.outcome());
        }
        stats
    }

    fn add(&mut self, outcome: CaseOutcome) {
        self.total += 1;
        match outcome {
            CaseOutcome::Pending => self.pending += 1,
            CaseOutcome::Passed => self.passed += 1,
            CaseOutcome::Ran { failed, skipped } => {
                self.failed += usize::from(failed);
                self.skipped += usize::from(skipped);
            }
        }
    }
}
