//! Plain-text artifacts generated from a case
//!
//! - [`case_summary`]: a readable digest for pasting into reviews or chats
//! - [`pytest_skeleton`]: a starting point for automating the case with
//!   pytest and allure

use casebook_core::{join_list, TestCase};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9]+").expect("valid regex"));
static NON_SNAKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9a-z]+").expect("valid regex"));

const EPIC_PLACEHOLDER: &str = "EPIC name";
const FEATURE_PLACEHOLDER: &str = "FEATURE name";
const STORY_PLACEHOLDER: &str = "STORY name";
const TESTCASE_ID_PLACEHOLDER: &str = "tc.id";

const STEP_INDENT: &str = "        ";
const BODY_INDENT: &str = "            ";

fn or_dash(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "-"
    } else {
        trimmed
    }
}

/// Multi-line text summary of a case; blank values print as `-`
pub fn case_summary(case: &TestCase) -> String {
    let tags = join_list(&case.tags);
    let steps = if case.steps.is_empty() {
        "-".to_string()
    } else {
        case.steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                format!(
                    "{}. {} → {}",
                    i + 1,
                    or_dash(&step.description),
                    or_dash(&step.expected_result)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut out = String::new();
    let _ = writeln!(out, "Name: {}", or_dash(&case.name));
    let _ = writeln!(out, "ID: {}", or_dash(&case.id));
    let _ = writeln!(out, "Status: {}", or_dash(&case.status));
    let _ = writeln!(out, "Test Layer: {}", or_dash(&case.test_layer));
    let _ = writeln!(out, "Test type: {}", or_dash(&case.test_type));
    let _ = writeln!(
        out,
        "Severity/Priority: {}/{}",
        or_dash(&case.severity),
        or_dash(&case.priority)
    );
    let _ = writeln!(
        out,
        "Epic/Feature/Story/Component: {}/{}/{}/{}",
        or_dash(&case.epic),
        or_dash(&case.feature),
        or_dash(&case.story),
        or_dash(&case.component)
    );
    let _ = writeln!(
        out,
        "Environment/Browser: {}/{}",
        or_dash(&case.environment),
        or_dash(&case.browser)
    );
    let _ = writeln!(
        out,
        "Author/Owner/Reviewer: {} / {} / {}",
        or_dash(&case.author),
        or_dash(&case.owner),
        or_dash(&case.reviewer)
    );
    let _ = writeln!(out, "TestCaseId: {}", or_dash(&case.test_case_id));
    let _ = writeln!(out, "Issue Links: {}", or_dash(&case.issue_links));
    let _ = writeln!(out, "Test Case Links: {}", or_dash(&case.test_case_links));
    let _ = writeln!(out, "Tags: {}", or_dash(&tags));
    let _ = writeln!(out, "Description:\n{}", or_dash(&case.description));
    let _ = writeln!(out, "Preconditions:\n{}", or_dash(&case.preconditions));
    let _ = writeln!(out, "Expected result:\n{}", or_dash(&case.expected_result));
    let _ = write!(out, "Steps:\n{}", steps);
    out
}

/// Upper-case every letter that follows a non-letter, lower-case the rest
fn title_case(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut prev_alpha = false;
    for c in source.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// `Test<CamelCase>` body for a class name
///
/// Only ASCII letters and digits survive; an empty result becomes
/// `Generated`, a leading digit gets `Generated` in front.
pub fn class_name(title: &str) -> String {
    let titled = title_case(title.trim());
    let mut name: String = WORD.find_iter(&titled).map(|m| m.as_str()).collect();
    if name.is_empty() {
        return "Generated".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "Generated");
    }
    name
}

/// snake_case method name; `tc_` in front of a leading digit
pub fn method_name(title: &str) -> String {
    let lower = title.to_lowercase();
    let slug = NON_SNAKE.replace_all(&lower, "_");
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        return "generated".to_string();
    }
    if slug.starts_with(|c: char| c.is_ascii_digit()) {
        format!("tc_{}", slug)
    } else {
        slug.to_string()
    }
}

fn docstring_text(value: &str) -> String {
    or_dash(value)
        .replace("\"\"\"", "\\\"\\\"\\\"")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', &format!("\n{}", BODY_INDENT))
}

fn quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn step_block(index: usize, action: &str, expected: &str) -> String {
    format!(
        "{s}with allure.step(\"Step{n}\"):\n\
         {b}\"\"\"\n\
         {b}Action: {action}\n\
         {b}Expected result: {expected}\n\
         {b}\"\"\"\n\
         {b}pass",
        s = STEP_INDENT,
        b = BODY_INDENT,
        n = index,
        action = docstring_text(action),
        expected = docstring_text(expected),
    )
}

/// Python source for a pytest/allure test automating `case`
pub fn pytest_skeleton(case: &TestCase) -> String {
    let epic = if case.epic.trim().is_empty() {
        EPIC_PLACEHOLDER
    } else {
        case.epic.trim()
    };
    let feature = if case.feature.trim().is_empty() {
        FEATURE_PLACEHOLDER
    } else {
        case.feature.trim()
    };
    let story = if case.story.trim().is_empty() {
        STORY_PLACEHOLDER
    } else {
        case.story.trim()
    };
    let testcase_id = [case.test_case_id.trim(), case.id.trim()]
        .into_iter()
        .find(|v| !v.is_empty())
        .unwrap_or(TESTCASE_ID_PLACEHOLDER);
    let title = if case.name.trim().is_empty() {
        "Untitled"
    } else {
        case.name.trim()
    };

    let steps = if case.steps.is_empty() {
        step_block(1, "", "")
    } else {
        case.steps
            .iter()
            .enumerate()
            .map(|(i, s)| step_block(i + 1, &s.description, &s.expected_result))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    format!(
        "import os\n\
         import allure\n\
         \n\
         \n\
         @allure.epic(\"{epic}\")\n\
         @allure.feature(\"{feature}\")\n\
         @allure.story(\"{story}\")\n\
         class Test{cls}:\n\
         \n    \
             @allure.testcase(\"{id}\", \"{id}\")\n    \
             @allure.title(\"{title}\")\n    \
             def test_{method}(self):\n\
         {steps}\n",
        epic = quoted(epic),
        feature = quoted(feature),
        story = quoted(story),
        cls = class_name(&case.name),
        id = quoted(testcase_id),
        title = quoted(title),
        method = method_name(&case.name),
        steps = steps,
    )
}
