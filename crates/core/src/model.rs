//! Test-case records
//!
//! [`TestCase`] and [`TestCaseStep`] map one-to-one onto the camelCase JSON
//! documents kept on disk. Reading is forgiving: strings are trimmed, missing
//! or null fields take defaults, tag and attachment lists may be given either
//! as arrays or as comma separated strings. Writing always produces the
//! canonical shape.

use crate::lenient;
use crate::types::{new_id, Timestamp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Name given to freshly created cases
pub const NEW_CASE_NAME: &str = "New test case";
/// Name given to cases whose file has no usable name
pub const UNTITLED_CASE_NAME: &str = "Untitled";

const DEFAULT_TEST_LAYER: &str = "E2E";
const DEFAULT_SEVERITY: &str = "NORMAL";
const DEFAULT_PRIORITY: &str = "MEDIUM";
const DEFAULT_STATUS: &str = "Draft";
const DEFAULT_TEST_TYPE: &str = "manual";

// =============================================================================
// StepStatus
// =============================================================================

/// Execution status of a single step
///
/// Unknown strings are kept verbatim in [`StepStatus::Other`] so files written
/// by other tools survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StepStatus {
    /// Not executed yet (also the reading of an empty status)
    #[default]
    Pending,
    /// Executed and matched the expectation
    Passed,
    /// Executed and did not match
    Failed,
    /// Deliberately not executed
    Skipped,
    /// Any other value found in a file
    Other(String),
}

impl StepStatus {
    /// Parse a status string, case-insensitively
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "pending" => StepStatus::Pending,
            "passed" => StepStatus::Passed,
            "failed" => StepStatus::Failed,
            "skipped" => StepStatus::Skipped,
            _ => StepStatus::Other(trimmed.to_string()),
        }
    }

    /// Canonical string form
    pub fn as_str(&self) -> &str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Passed => "passed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
            StepStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StepStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StepStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::string(deserializer)?;
        Ok(StepStatus::parse(&raw))
    }
}

// =============================================================================
// CaseStatus
// =============================================================================

/// Known workflow states of a test case
///
/// The record itself stores the status as a free string; this enum gives the
/// known values a type for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseStatus {
    /// Being written
    Draft,
    /// Under active work
    InProgress,
    /// Ready
    Done,
    /// Cannot proceed
    Blocked,
    /// No longer relevant
    Deprecated,
}

impl CaseStatus {
    /// All known states, in workflow order
    pub const ALL: [CaseStatus; 5] = [
        CaseStatus::Draft,
        CaseStatus::InProgress,
        CaseStatus::Done,
        CaseStatus::Blocked,
        CaseStatus::Deprecated,
    ];

    /// Match a stored status string
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Draft" => Some(CaseStatus::Draft),
            "In Progress" => Some(CaseStatus::InProgress),
            "Done" => Some(CaseStatus::Done),
            "Blocked" => Some(CaseStatus::Blocked),
            "Deprecated" => Some(CaseStatus::Deprecated),
            _ => None,
        }
    }

    /// String stored in files
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Draft => "Draft",
            CaseStatus::InProgress => "In Progress",
            CaseStatus::Done => "Done",
            CaseStatus::Blocked => "Blocked",
            CaseStatus::Deprecated => "Deprecated",
        }
    }

    /// One-character marker used in tree listings
    pub fn marker(&self) -> char {
        match self {
            CaseStatus::Draft => '○',
            CaseStatus::InProgress => '⟳',
            CaseStatus::Done => '✓',
            CaseStatus::Blocked => '⚠',
            CaseStatus::Deprecated => '×',
        }
    }
}

// =============================================================================
// TestCaseStep
// =============================================================================

/// One action/expectation pair inside a test case
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawStep")]
pub struct TestCaseStep {
    /// Stable step identifier
    pub id: String,
    /// Short title; falls back to the first description line when written
    pub name: String,
    /// Action to perform
    pub description: String,
    /// Expected observation
    pub expected_result: String,
    /// Execution status
    pub status: StepStatus,
    /// Link to a bug filed for this step
    pub bug_link: String,
    /// Why the step was skipped
    pub skip_reason: String,
    /// Attachment file names, relative to the case's attachment folder
    pub attachments: Vec<String>,
}

impl TestCaseStep {
    /// Empty pending step with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Step name as written to disk
    pub fn effective_name(&self) -> &str {
        if self.name.is_empty() {
            self.description.lines().next().unwrap_or("")
        } else {
            &self.name
        }
    }
}

impl Default for TestCaseStep {
    fn default() -> Self {
        Self {
            id: new_id(),
            name: String::new(),
            description: String::new(),
            expected_result: String::new(),
            status: StepStatus::Pending,
            bug_link: String::new(),
            skip_reason: String::new(),
            attachments: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawStep {
    #[serde(deserialize_with = "lenient::string")]
    id: String,
    #[serde(deserialize_with = "lenient::string")]
    name: String,
    #[serde(deserialize_with = "lenient::string")]
    description: String,
    #[serde(deserialize_with = "lenient::string")]
    expected_result: String,
    status: StepStatus,
    #[serde(deserialize_with = "lenient::string")]
    bug_link: String,
    #[serde(deserialize_with = "lenient::string")]
    skip_reason: String,
    #[serde(deserialize_with = "lenient::list")]
    attachments: Vec<String>,
}

impl Default for RawStep {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            expected_result: String::new(),
            status: StepStatus::Pending,
            bug_link: String::new(),
            skip_reason: String::new(),
            attachments: Vec::new(),
        }
    }
}

impl From<RawStep> for TestCaseStep {
    fn from(raw: RawStep) -> Self {
        Self {
            id: if raw.id.is_empty() { new_id() } else { raw.id },
            name: raw.name,
            description: raw.description,
            expected_result: raw.expected_result,
            status: raw.status,
            bug_link: raw.bug_link,
            skip_reason: raw.skip_reason,
            attachments: raw.attachments,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StepDoc<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    expected_result: &'a str,
    status: &'a StepStatus,
    bug_link: &'a str,
    skip_reason: &'a str,
    #[serde(serialize_with = "lenient::serialize_list")]
    attachments: &'a [String],
}

impl Serialize for TestCaseStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StepDoc {
            id: &self.id,
            name: self.effective_name(),
            description: &self.description,
            expected_result: &self.expected_result,
            status: &self.status,
            bug_link: &self.bug_link,
            skip_reason: &self.skip_reason,
            attachments: &self.attachments,
        }
        .serialize(serializer)
    }
}

// =============================================================================
// TestCase
// =============================================================================

/// A test case record
///
/// The file location is not part of the record; see `casebook_storage::CaseFile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTestCase")]
pub struct TestCase {
    pub id: String,
    pub name: String,
    pub description: String,
    pub preconditions: String,
    pub expected_result: String,
    pub epic: String,
    pub feature: String,
    pub story: String,
    pub component: String,
    pub test_layer: String,
    pub severity: String,
    pub priority: String,
    pub environment: String,
    pub browser: String,
    pub owner: String,
    pub author: String,
    pub reviewer: String,
    pub test_case_id: String,
    pub issue_links: String,
    pub test_case_links: String,
    #[serde(serialize_with = "lenient::serialize_list")]
    pub tags: Vec<String>,
    pub status: String,
    pub test_type: String,
    pub steps: Vec<TestCaseStep>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Default for TestCase {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: NEW_CASE_NAME.to_string(),
            description: String::new(),
            preconditions: String::new(),
            expected_result: String::new(),
            epic: String::new(),
            feature: String::new(),
            story: String::new(),
            component: String::new(),
            test_layer: DEFAULT_TEST_LAYER.to_string(),
            severity: DEFAULT_SEVERITY.to_string(),
            priority: DEFAULT_PRIORITY.to_string(),
            environment: String::new(),
            browser: String::new(),
            owner: String::new(),
            author: String::new(),
            reviewer: String::new(),
            test_case_id: String::new(),
            issue_links: String::new(),
            test_case_links: String::new(),
            tags: Vec::new(),
            status: DEFAULT_STATUS.to_string(),
            test_type: DEFAULT_TEST_TYPE.to_string(),
            steps: Vec::new(),
            created_at: Timestamp::ZERO,
            updated_at: Timestamp::ZERO,
        }
    }
}

impl TestCase {
    /// Blank case as offered by "new test case": fresh id, timestamps set to
    /// now and a single empty step
    pub fn new_blank() -> Self {
        let now = Timestamp::now();
        Self {
            id: new_id(),
            steps: vec![TestCaseStep::new("Step 1")],
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    /// Parse a case from a JSON value
    pub fn from_json(value: serde_json::Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Canonical JSON value of the case
    pub fn to_json(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Known workflow status, if the stored string is one
    pub fn case_status(&self) -> Option<CaseStatus> {
        CaseStatus::parse(&self.status)
    }

    /// Whether a step index is valid for this case
    pub fn has_step(&self, index: usize) -> bool {
        index < self.steps.len()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawTestCase {
    #[serde(deserialize_with = "lenient::string")]
    id: String,
    #[serde(deserialize_with = "lenient::string")]
    name: String,
    #[serde(deserialize_with = "lenient::string")]
    description: String,
    #[serde(deserialize_with = "lenient::string")]
    preconditions: String,
    #[serde(deserialize_with = "lenient::string")]
    expected_result: String,
    #[serde(deserialize_with = "lenient::string")]
    epic: String,
    #[serde(deserialize_with = "lenient::string")]
    feature: String,
    #[serde(deserialize_with = "lenient::string")]
    story: String,
    #[serde(deserialize_with = "lenient::string")]
    component: String,
    #[serde(deserialize_with = "lenient::string")]
    test_layer: String,
    #[serde(deserialize_with = "lenient::string")]
    severity: String,
    #[serde(deserialize_with = "lenient::string")]
    priority: String,
    #[serde(deserialize_with = "lenient::string")]
    environment: String,
    #[serde(deserialize_with = "lenient::string")]
    browser: String,
    #[serde(deserialize_with = "lenient::string")]
    owner: String,
    #[serde(deserialize_with = "lenient::string")]
    author: String,
    #[serde(deserialize_with = "lenient::string")]
    reviewer: String,
    #[serde(deserialize_with = "lenient::string")]
    test_case_id: String,
    #[serde(deserialize_with = "lenient::string")]
    issue_links: String,
    #[serde(deserialize_with = "lenient::string")]
    test_case_links: String,
    #[serde(deserialize_with = "lenient::list")]
    tags: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    status: String,
    #[serde(deserialize_with = "lenient::string")]
    test_type: String,
    #[serde(deserialize_with = "steps_skipping_non_objects")]
    steps: Vec<TestCaseStep>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Default for RawTestCase {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            preconditions: String::new(),
            expected_result: String::new(),
            epic: String::new(),
            feature: String::new(),
            story: String::new(),
            component: String::new(),
            test_layer: String::new(),
            severity: String::new(),
            priority: String::new(),
            environment: String::new(),
            browser: String::new(),
            owner: String::new(),
            author: String::new(),
            reviewer: String::new(),
            test_case_id: String::new(),
            issue_links: String::new(),
            test_case_links: String::new(),
            tags: Vec::new(),
            status: String::new(),
            test_type: String::new(),
            steps: Vec::new(),
            created_at: Timestamp::ZERO,
            updated_at: Timestamp::ZERO,
        }
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

impl From<RawTestCase> for TestCase {
    fn from(raw: RawTestCase) -> Self {
        Self {
            id: raw.id,
            name: or_default(raw.name, UNTITLED_CASE_NAME),
            description: raw.description,
            preconditions: raw.preconditions,
            expected_result: raw.expected_result,
            epic: raw.epic,
            feature: raw.feature,
            story: raw.story,
            component: raw.component,
            test_layer: or_default(raw.test_layer, DEFAULT_TEST_LAYER),
            severity: or_default(raw.severity, DEFAULT_SEVERITY),
            priority: or_default(raw.priority, DEFAULT_PRIORITY),
            environment: raw.environment,
            browser: raw.browser,
            owner: raw.owner,
            author: raw.author,
            reviewer: raw.reviewer,
            test_case_id: raw.test_case_id,
            issue_links: raw.issue_links,
            test_case_links: raw.test_case_links,
            tags: raw.tags,
            status: or_default(raw.status, DEFAULT_STATUS),
            test_type: or_default(raw.test_type, DEFAULT_TEST_TYPE),
            steps: raw.steps,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

/// Steps array where non-object entries are dropped instead of failing the file
fn steps_skipping_non_objects<'de, D>(deserializer: D) -> Result<Vec<TestCaseStep>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let items = match value {
        Some(serde_json::Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    items
        .into_iter()
        .filter(serde_json::Value::is_object)
        .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_status_parse() {
        assert_eq!(StepStatus::parse(""), StepStatus::Pending);
        assert_eq!(StepStatus::parse(" PASSED "), StepStatus::Passed);
        assert_eq!(StepStatus::parse("Failed"), StepStatus::Failed);
        assert_eq!(StepStatus::parse("skipped"), StepStatus::Skipped);
        assert_eq!(
            StepStatus::parse("blocked"),
            StepStatus::Other("blocked".into())
        );
    }

    #[test]
    fn test_case_status_roundtrip_strings() {
        for status in CaseStatus::ALL {
            assert_eq!(CaseStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CaseStatus::parse("Unknown"), None);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let case = TestCase::from_json(json!({})).unwrap();
        assert_eq!(case.name, UNTITLED_CASE_NAME);
        assert_eq!(case.test_layer, "E2E");
        assert_eq!(case.severity, "NORMAL");
        assert_eq!(case.priority, "MEDIUM");
        assert_eq!(case.status, "Draft");
        assert_eq!(case.test_type, "manual");
        assert!(case.steps.is_empty());
        assert!(case.created_at.is_zero());
    }

    #[test]
    fn test_strings_trimmed_and_scalars_accepted() {
        let case = TestCase::from_json(json!({
            "id": 42,
            "name": "  Login works  ",
            "owner": null,
            "testCaseId": true,
        }))
        .unwrap();
        assert_eq!(case.id, "42");
        assert_eq!(case.name, "Login works");
        assert_eq!(case.owner, "");
        assert_eq!(case.test_case_id, "true");
    }

    #[test]
    fn test_tags_from_string_or_array() {
        let a = TestCase::from_json(json!({"tags": "smoke, api ,"})).unwrap();
        assert_eq!(a.tags, vec!["smoke", "api"]);
        let b = TestCase::from_json(json!({"tags": ["smoke", " ", "ui"]})).unwrap();
        assert_eq!(b.tags, vec!["smoke", "ui"]);
    }

    #[test]
    fn test_non_object_steps_ignored() {
        let case = TestCase::from_json(json!({
            "steps": ["bogus", 3, {"description": "Open page", "status": "passed"}]
        }))
        .unwrap();
        assert_eq!(case.steps.len(), 1);
        assert_eq!(case.steps[0].status, StepStatus::Passed);
        assert!(!case.steps[0].id.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut case = TestCase::new_blank();
        case.tags = vec!["smoke".into(), "api".into()];
        case.steps[0].description = "Open page\nthen wait".into();
        case.steps[0].name.clear();
        case.steps[0].attachments = vec!["a.png".into(), "b.png".into()];

        let value = case.to_json().unwrap();
        assert_eq!(value["tags"], json!("smoke, api"));
        assert_eq!(value["testLayer"], json!("E2E"));
        assert_eq!(value["status"], json!("Draft"));
        assert!(value["createdAt"].is_i64());
        assert_eq!(value["steps"][0]["name"], json!("Open page"));
        assert_eq!(value["steps"][0]["attachments"], json!("a.png, b.png"));
        assert_eq!(value["steps"][0]["expectedResult"], json!(""));
    }

    #[test]
    fn test_reload_is_stable() {
        let mut case = TestCase::new_blank();
        case.name = "Checkout".into();
        case.steps[0].status = StepStatus::Other("blocked".into());
        let reloaded = TestCase::from_json(case.to_json().unwrap()).unwrap();
        assert_eq!(reloaded, case);
    }

    #[test]
    fn test_new_blank() {
        let case = TestCase::new_blank();
        assert!(!case.id.is_empty());
        assert_eq!(case.name, NEW_CASE_NAME);
        assert_eq!(case.steps.len(), 1);
        assert_eq!(case.steps[0].name, "Step 1");
        assert_eq!(case.created_at, case.updated_at);
        assert!(!case.created_at.is_zero());
    }
}
