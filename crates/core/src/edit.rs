//! Field-level editing by key
//!
//! Front ends address fields with the same camelCase keys used on disk
//! (`testLayer`, `expectedResult`, ...). snake_case and kebab-case spellings
//! are accepted as well.

use crate::error::{Error, Result};
use crate::lenient::split_list;
use crate::model::{StepStatus, TestCase, TestCaseStep};

/// Keys accepted by [`TestCase::set_field`]
pub const CASE_FIELDS: &[&str] = &[
    "name",
    "description",
    "preconditions",
    "expectedResult",
    "epic",
    "feature",
    "story",
    "component",
    "testLayer",
    "severity",
    "priority",
    "environment",
    "browser",
    "owner",
    "author",
    "reviewer",
    "testCaseId",
    "issueLinks",
    "testCaseLinks",
    "tags",
    "status",
    "testType",
];

/// Keys accepted by [`TestCaseStep::set_field`]
pub const STEP_FIELDS: &[&str] = &[
    "name",
    "description",
    "expectedResult",
    "status",
    "bugLink",
    "skipReason",
    "attachments",
];

/// Normalise a key to lower-case without separators
fn canonical(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_ascii_lowercase()
}

fn resolve(key: &str, known: &[&'static str]) -> Result<&'static str> {
    let wanted = canonical(key);
    known
        .iter()
        .copied()
        .find(|k| k.to_ascii_lowercase() == wanted)
        .ok_or_else(|| Error::InvalidName(format!("unknown field '{}'", key.trim())))
}

impl TestCase {
    /// Set a string field (or `tags`, given comma separated) by key
    ///
    /// The value is trimmed. Clearing `name` is rejected.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim().to_string();
        let slot = match resolve(key, CASE_FIELDS)? {
            "name" => {
                if value.is_empty() {
                    return Err(Error::ValidationError(
                        "test case name must not be empty".to_string(),
                    ));
                }
                &mut self.name
            }
            "tags" => {
                self.tags = split_list(&value);
                return Ok(());
            }
            "description" => &mut self.description,
            "preconditions" => &mut self.preconditions,
            "expectedResult" => &mut self.expected_result,
            "epic" => &mut self.epic,
            "feature" => &mut self.feature,
            "story" => &mut self.story,
            "component" => &mut self.component,
            "testLayer" => &mut self.test_layer,
            "severity" => &mut self.severity,
            "priority" => &mut self.priority,
            "environment" => &mut self.environment,
            "browser" => &mut self.browser,
            "owner" => &mut self.owner,
            "author" => &mut self.author,
            "reviewer" => &mut self.reviewer,
            "testCaseId" => &mut self.test_case_id,
            "issueLinks" => &mut self.issue_links,
            "testCaseLinks" => &mut self.test_case_links,
            "status" => &mut self.status,
            "testType" => &mut self.test_type,
            other => return Err(Error::InvalidName(format!("unknown field '{}'", other))),
        };
        *slot = value;
        Ok(())
    }

    /// Append a step, returning its index
    pub fn add_step(&mut self, step: TestCaseStep) -> usize {
        self.steps.push(step);
        self.steps.len() - 1
    }

    /// Insert a step before `index` (or at the end when `index` is past it)
    pub fn insert_step(&mut self, index: usize, step: TestCaseStep) -> usize {
        let index = index.min(self.steps.len());
        self.steps.insert(index, step);
        index
    }

    /// Remove and return the step at `index`
    pub fn remove_step(&mut self, index: usize) -> Result<TestCaseStep> {
        if !self.has_step(index) {
            return Err(Error::NotFound(format!(
                "step {} (case has {} steps)",
                index + 1,
                self.steps.len()
            )));
        }
        Ok(self.steps.remove(index))
    }

    /// Move the step at `from` to position `to`
    pub fn move_step(&mut self, from: usize, to: usize) -> Result<()> {
        let step = self.remove_step(from)?;
        self.insert_step(to, step);
        Ok(())
    }

    /// Give every step `status` and clear its skip reason
    ///
    /// Returns `false` for a case without steps.
    pub fn set_step_statuses(&mut self, status: StepStatus) -> bool {
        for step in &mut self.steps {
            step.status = status.clone();
            step.skip_reason.clear();
        }
        !self.steps.is_empty()
    }
}

impl TestCaseStep {
    /// Set a step field by key; `attachments` takes a comma separated list
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match resolve(key, STEP_FIELDS)? {
            "name" => self.name = value.to_string(),
            "description" => self.description = value.to_string(),
            "expectedResult" => self.expected_result = value.to_string(),
            "status" => self.status = StepStatus::parse(value),
            "bugLink" => self.bug_link = value.to_string(),
            "skipReason" => self.skip_reason = value.to_string(),
            "attachments" => self.attachments = split_list(value),
            other => return Err(Error::InvalidName(format!("unknown field '{}'", other))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_case_fields() {
        let mut case = TestCase::new_blank();
        case.set_field("test_layer", " API ").unwrap();
        case.set_field("expected-result", "Works").unwrap();
        case.set_field("TAGS", "smoke, api").unwrap();
        assert_eq!(case.test_layer, "API");
        assert_eq!(case.expected_result, "Works");
        assert_eq!(case.tags, vec!["smoke", "api"]);
    }

    #[test]
    fn test_set_case_field_errors() {
        let mut case = TestCase::new_blank();
        assert!(matches!(
            case.set_field("name", "  "),
            Err(Error::ValidationError(_))
        ));
        assert!(matches!(
            case.set_field("steps", "x"),
            Err(Error::InvalidName(_))
        ));
        assert_eq!(case.name, crate::NEW_CASE_NAME);
    }

    #[test]
    fn test_set_step_fields() {
        let mut step = TestCaseStep::new("Open");
        step.set_field("status", "FAILED").unwrap();
        step.set_field("bug_link", "https://bugs/1").unwrap();
        assert_eq!(step.status, StepStatus::Failed);
        assert_eq!(step.bug_link, "https://bugs/1");
        assert!(step.set_field("unknown", "x").is_err());
    }

    #[test]
    fn test_step_list_editing() {
        let mut case = TestCase::new_blank();
        assert_eq!(case.add_step(TestCaseStep::new("Step 2")), 1);
        assert_eq!(case.insert_step(0, TestCaseStep::new("Step 0")), 0);
        case.move_step(0, 2).unwrap();
        let names: Vec<_> = case.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Step 1", "Step 2", "Step 0"]);
        assert_eq!(case.remove_step(1).unwrap().name, "Step 2");
        assert!(case.remove_step(9).unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_step_statuses() {
        let mut case = TestCase::new_blank();
        case.add_step(TestCaseStep::new("Step 2"));
        case.steps[0].status = StepStatus::Skipped;
        case.steps[0].skip_reason = "no device".into();
        case.steps[1].status = StepStatus::Failed;

        assert!(case.set_step_statuses(StepStatus::Passed));
        assert!(case.steps.iter().all(|s| s.status == StepStatus::Passed));
        assert!(case.steps.iter().all(|s| s.skip_reason.is_empty()));

        assert!(case.set_step_statuses(StepStatus::Pending));
        assert!(case.steps.iter().all(|s| s.status == StepStatus::Pending));

        case.steps.clear();
        assert!(!case.set_step_statuses(StepStatus::Passed));
    }
}
