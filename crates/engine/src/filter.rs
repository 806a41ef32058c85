//! Case filtering
//!
//! A [`CaseFilter`] holds, per [`Field`], the set of accepted values. A case
//! matches when every non-empty set contains the case's value (for tags: any
//! of its tags), the description contains the description needle and the
//! name contains the query. Text comparisons for the needle and the query
//! ignore case; field values must match exactly after trimming.

use casebook_core::TestCase;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Filterable attribute of a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Author,
    Owner,
    Reviewer,
    Status,
    TestLayer,
    TestType,
    Severity,
    Priority,
    Environment,
    Browser,
    TestCaseId,
    IssueLinks,
    TestCaseLinks,
    Epic,
    Feature,
    Story,
    Component,
    Tags,
}

impl Field {
    /// Every field, in display order
    pub const ALL: [Field; 18] = [
        Field::Author,
        Field::Owner,
        Field::Reviewer,
        Field::Status,
        Field::TestLayer,
        Field::TestType,
        Field::Severity,
        Field::Priority,
        Field::Environment,
        Field::Browser,
        Field::TestCaseId,
        Field::IssueLinks,
        Field::TestCaseLinks,
        Field::Epic,
        Field::Feature,
        Field::Story,
        Field::Component,
        Field::Tags,
    ];

    /// Key used on the command line, matching the JSON key
    pub fn key(&self) -> &'static str {
        match self {
            Field::Author => "author",
            Field::Owner => "owner",
            Field::Reviewer => "reviewer",
            Field::Status => "status",
            Field::TestLayer => "testLayer",
            Field::TestType => "testType",
            Field::Severity => "severity",
            Field::Priority => "priority",
            Field::Environment => "environment",
            Field::Browser => "browser",
            Field::TestCaseId => "testCaseId",
            Field::IssueLinks => "issueLinks",
            Field::TestCaseLinks => "testCaseLinks",
            Field::Epic => "epic",
            Field::Feature => "feature",
            Field::Story => "story",
            Field::Component => "component",
            Field::Tags => "tags",
        }
    }

    /// Values of this field on `case`, trimmed, blanks removed
    pub fn values_of<'a>(&self, case: &'a TestCase) -> Vec<&'a str> {
        let single = match self {
            Field::Author => &case.author,
            Field::Owner => &case.owner,
            Field::Reviewer => &case.reviewer,
            Field::Status => &case.status,
            Field::TestLayer => &case.test_layer,
            Field::TestType => &case.test_type,
            Field::Severity => &case.severity,
            Field::Priority => &case.priority,
            Field::Environment => &case.environment,
            Field::Browser => &case.browser,
            Field::TestCaseId => &case.test_case_id,
            Field::IssueLinks => &case.issue_links,
            Field::TestCaseLinks => &case.test_case_links,
            Field::Epic => &case.epic,
            Field::Feature => &case.feature,
            Field::Story => &case.story,
            Field::Component => &case.component,
            Field::Tags => {
                return case
                    .tags
                    .iter()
                    .map(|t| t.trim())
                    .filter(|t| !t.is_empty())
                    .collect()
            }
        };
        let value = single.trim();
        if value.is_empty() {
            Vec::new()
        } else {
            vec![value]
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = String;

    /// Accepts the camelCase key or its snake_case / kebab-case spelling
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.key().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// Selection of cases by attribute values and text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    values: BTreeMap<Field, BTreeSet<String>>,
    description: Option<String>,
    query: Option<String>,
}

impl CaseFilter {
    /// Filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `value` for `field` (values for one field are alternatives)
    pub fn with_value(mut self, field: Field, value: impl Into<String>) -> Self {
        self.add_value(field, value);
        self
    }

    /// In-place form of [`CaseFilter::with_value`]
    pub fn add_value(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into().trim().to_string();
        if !value.is_empty() {
            self.values.entry(field).or_default().insert(value);
        }
    }

    /// Require the description to contain `needle`
    pub fn with_description(mut self, needle: impl Into<String>) -> Self {
        let needle = needle.into().trim().to_lowercase();
        self.description = (!needle.is_empty()).then_some(needle);
        self
    }

    /// Require the name to contain `query`
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into().trim().to_lowercase();
        self.query = (!query.is_empty()).then_some(query);
        self
    }

    /// Whether no criterion is set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.description.is_none() && self.query.is_none()
    }

    /// Whether `case` satisfies every criterion
    pub fn matches(&self, case: &TestCase) -> bool {
        for (field, accepted) in &self.values {
            let present = field.values_of(case);
            if !present.iter().any(|v| accepted.contains(*v)) {
                return false;
            }
        }
        if let Some(needle) = &self.description {
            if !case.description.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(query) = &self.query {
            if !case.name.to_lowercase().contains(query.as_str()) {
                return false;
            }
        }
        true
    }

    /// Keep only matching items; `case_of` projects an item to its case
    pub fn apply<'a, T, F>(&self, items: &'a [T], case_of: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> &TestCase,
    {
        items.iter().filter(|item| self.matches(case_of(*item))).collect()
    }
}

/// Distinct non-blank values of `field` across `cases`, sorted
pub fn distinct_values<'a, I>(cases: I, field: Field) -> Vec<String>
where
    I: IntoIterator<Item = &'a TestCase>,
{
    let mut seen = BTreeSet::new();
    for case in cases {
        for value in field.values_of(case) {
            seen.insert(value.to_string());
        }
    }
    seen.into_iter().collect()
}
