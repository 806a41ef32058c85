//! Azure DevOps test-case export import
//!
//! The export is a JSON document with a `value` array; each entry carries a
//! `workItem` whose `workItemFields` list holds the step XML
//! (`Microsoft.VSTS.TCM.Steps`) and assorted system fields. Exports produced
//! by hand often contain trailing commas, so [`load_payload`] retries after
//! stripping them.

use casebook_core::{new_id, Error, Result, TestCase, TestCaseStep, Timestamp};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

const STEPS_FIELD: &str = "Microsoft.VSTS.TCM.Steps";
const UNTITLED: &str = "Untitled";

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\s*[\]}])").expect("valid regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("valid regex"));
static STEP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<step id="(\d+)" type="(\w+)">(.*?)</step>"#).expect("valid regex")
});
static PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<parameterizedString[^>]*>(.*?)</parameterizedString>")
        .expect("valid regex")
});
static UNSAFE_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-zА-Яа-я0-9_-]+").expect("valid regex"));

/// Entities decoded by [`clean_text`], applied in order
const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
    ("&nbsp;", " "),
    ("&BR/&gt;", "\n"),
    ("&BR/", "\n"),
    ("&amp;nbsp;", " "),
];

// =============================================================================
// Parsed records
// =============================================================================

/// One step extracted from the step XML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureStep {
    /// Step id attribute
    pub id: String,
    /// Step type, e.g. `ActionStep` or `ValidateStep`
    pub kind: String,
    /// Cleaned action text
    pub action: String,
    /// Cleaned expected result
    pub expected: String,
}

/// A test case read from the export, before conversion
#[derive(Debug, Clone, PartialEq)]
pub struct AzureTestCase {
    /// Work item id, if present
    pub id: Option<String>,
    /// Work item title
    pub title: String,
    /// Parsed steps
    pub steps: Vec<AzureStep>,
    /// `testPlan` object
    pub plan: Map<String, Value>,
    /// `testSuite` object
    pub suite: Map<String, Value>,
    /// `project` object
    pub project: Map<String, Value>,
    /// Every work item field other than the steps, merged
    pub fields: Map<String, Value>,
}

/// Outcome of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Number of case files written
    pub created: usize,
    /// One message per failure
    pub errors: Vec<String>,
}

// =============================================================================
// Payload loading and text cleanup
// =============================================================================

/// Read and parse an export file, tolerating trailing commas
pub fn load_payload(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(_) => Ok(serde_json::from_str(&remove_trailing_commas(&raw))?),
    }
}

/// Drop commas that directly precede `]` or `}`, until none are left
pub fn remove_trailing_commas(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = TRAILING_COMMA.replace_all(&current, "$1").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Turn the HTML fragments Azure stores into plain text
pub fn clean_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let mut text = html.replace("\r\n", "\n");
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }
    let text = TAG.replace_all(&text, "");
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    let text = SPACES.replace_all(&text, " ");
    let text = text.replace("\n ", "\n");
    text.trim().to_string()
}

/// Extract the steps from a step XML document
pub fn extract_steps(xml: &str) -> Vec<AzureStep> {
    STEP.captures_iter(xml)
        .map(|caps| {
            let content = caps.get(3).map_or("", |m| m.as_str());
            let mut params = PARAM
                .captures_iter(content)
                .map(|p| clean_text(p.get(1).map_or("", |m| m.as_str())));
            let action = params.next().unwrap_or_default();
            let expected = params.next().unwrap_or_default();
            AzureStep {
                id: caps[1].to_string(),
                kind: caps[2].to_string(),
                action,
                expected,
            }
        })
        .collect()
}

fn object(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

/// Render a scalar the way it should read in text
fn scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read every entry of the export's `value` array
pub fn parse_test_cases(payload: &Value) -> Vec<AzureTestCase> {
    let entries = match payload.get("value") {
        Some(Value::Array(entries)) => entries.as_slice(),
        _ => &[],
    };

    entries
        .iter()
        .map(|entry| {
            let work_item = object(entry.get("workItem"));
            let mut steps_xml = String::new();
            let mut fields = Map::new();
            if let Some(Value::Array(items)) = work_item.get("workItemFields") {
                for item in items {
                    let Value::Object(field) = item else { continue };
                    match field.get(STEPS_FIELD) {
                        Some(xml) => steps_xml = scalar(xml),
                        None => fields.extend(field.clone()),
                    }
                }
            }

            let id = work_item
                .get("id")
                .map(scalar)
                .filter(|id| !id.is_empty());
            let title = work_item
                .get("name")
                .map(scalar)
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string());

            AzureTestCase {
                id,
                title,
                steps: extract_steps(&steps_xml),
                plan: object(entry.get("testPlan")),
                suite: object(entry.get("testSuite")),
                project: object(entry.get("project")),
                fields,
            }
        })
        .collect()
}

// =============================================================================
// Conversion
// =============================================================================

fn named_line(label: &str, map: &Map<String, Value>) -> Option<String> {
    let name = map.get("name").map(scalar).unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    let id = map.get("id").map(scalar).unwrap_or_default();
    Some(format!("{}: {} (ID: {})", label, name, id))
}

/// Description assembled from project, plan, suite and selected fields
pub fn compose_description(source: &AzureTestCase) -> String {
    let mut parts = Vec::new();
    parts.extend(named_line("Project", &source.project));
    parts.extend(named_line("Test plan", &source.plan));
    parts.extend(named_line("Test suite", &source.suite));

    if let Some(priority) = source.fields.get("Microsoft.VSTS.Common.Priority") {
        if !priority.is_null() {
            parts.push(format!("Priority: {}", scalar(priority)));
        }
    }
    let automation = source
        .fields
        .get("Microsoft.VSTS.TCM.AutomationStatus")
        .map(scalar)
        .unwrap_or_default();
    if !automation.is_empty() {
        parts.push(format!("Automation status: {}", automation));
    }
    let changed = source
        .fields
        .get("Microsoft.VSTS.Common.StateChangeDate")
        .map(scalar)
        .unwrap_or_default();
    if !changed.is_empty() {
        parts.push(format!("State change date: {}", changed));
    }
    parts.join("\n").trim().to_string()
}

fn step_prefix(kind: &str) -> String {
    match kind {
        "ActionStep" => "Action: ".to_string(),
        "ValidateStep" => "Check: ".to_string(),
        "" => String::new(),
        other => format!("{}: ", other),
    }
}

/// Convert parsed steps, dropping those with neither action nor expectation
pub fn build_steps(steps: &[AzureStep]) -> Vec<TestCaseStep> {
    steps
        .iter()
        .filter_map(|step| {
            let action = step.action.trim();
            let expected = step.expected.trim();
            if action.is_empty() && expected.is_empty() {
                return None;
            }
            let prefix = step_prefix(&step.kind);
            let text = if action.is_empty() { expected } else { action };
            let text = if !prefix.is_empty() && !text.starts_with(&prefix) {
                format!("{}{}", prefix, text)
            } else {
                text.to_string()
            };
            Some(TestCaseStep {
                description: text.trim().to_string(),
                expected_result: expected.to_string(),
                ..TestCaseStep::default()
            })
        })
        .collect()
}

fn assigned_to(value: Option<&Value>) -> String {
    match value {
        Some(Value::Object(person)) => person
            .get("displayName")
            .or_else(|| person.get("uniqueName"))
            .map(scalar)
            .unwrap_or_default(),
        Some(other) => scalar(other),
        None => String::new(),
    }
}

/// Build a test case from a parsed record
pub fn build_case(source: &AzureTestCase) -> TestCase {
    let id = source.id.clone().unwrap_or_else(new_id);
    let status = source
        .fields
        .get("System.State")
        .map(scalar)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let now = Timestamp::now();

    let mut case = TestCase {
        id,
        name: source.title.clone(),
        description: compose_description(source),
        author: assigned_to(source.fields.get("System.AssignedTo")).trim().to_string(),
        steps: build_steps(&source.steps),
        created_at: now,
        updated_at: now,
        ..TestCase::default()
    };
    if let Some(status) = status {
        case.status = status;
    }
    case
}

/// File name for an imported case that is not taken in `folder`
///
/// The title is reduced to letters, digits, `_` and `-`, cut to `max_len`
/// characters, and suffixed with `_1`, `_2`, ... on collision.
pub fn unique_filename(title: &str, case_id: &str, folder: &Path, max_len: usize) -> String {
    let sanitized = UNSAFE_FILENAME.replace_all(title, "_");
    let sanitized = sanitized.trim_matches('_');
    let base = if sanitized.is_empty() {
        format!("test_case_{}", UNSAFE_FILENAME.replace_all(case_id, "_"))
    } else {
        sanitized.to_string()
    };
    let base: String = base.chars().take(max_len.max(1)).collect();

    let mut candidate = format!("{}.json", base);
    let mut index = 1;
    while folder.join(&candidate).exists() {
        candidate = format!("{}_{}.json", base, index);
        index += 1;
    }
    candidate
}
