//! Execution verdict derived from step statuses

use crate::model::{StepStatus, TestCase};

/// What the step statuses of a case say about its last run
///
/// A run case may report failed and skipped steps at the same time, so those
/// are flags rather than separate variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseOutcome {
    /// No steps, or every step still pending
    Pending,
    /// Every step passed
    Passed,
    /// Some steps ran; reports whether any failed and whether any were skipped
    Ran {
        /// At least one step failed
        failed: bool,
        /// At least one step was skipped
        skipped: bool,
    },
}

impl CaseOutcome {
    /// Derive the outcome from a sequence of step statuses
    pub fn from_statuses<'a, I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = &'a StepStatus>,
    {
        let mut any = false;
        let mut all_pending = true;
        let mut all_passed = true;
        let mut failed = false;
        let mut skipped = false;

        for status in statuses {
            any = true;
            all_pending &= *status == StepStatus::Pending;
            all_passed &= *status == StepStatus::Passed;
            failed |= *status == StepStatus::Failed;
            skipped |= *status == StepStatus::Skipped;
        }

        if !any || all_pending {
            CaseOutcome::Pending
        } else if all_passed {
            CaseOutcome::Passed
        } else {
            CaseOutcome::Ran { failed, skipped }
        }
    }
}

impl TestCase {
    /// Execution verdict of this case
    pub fn outcome(&self) -> CaseOutcome {
        CaseOutcome::from_statuses(self.steps.iter().map(|s| &s.status))
    }
}
