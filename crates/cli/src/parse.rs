//! ArgMatches → CliAction conversion.
//!
//! Step numbers are 1-based on the command line and converted to indices
//! here.

use std::path::PathBuf;

use clap::ArgMatches;

use casebook::{CaseFilter, Field};

/// A parsed command.
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    Tree { pattern: Option<String> },
    List { filter: CaseFilter },
    Values { field: Field },
    Show { case: PathBuf },
    Summary { case: PathBuf },
    Skeleton { case: PathBuf },
    New { folder: Option<PathBuf>, name: Option<String> },
    Duplicate { case: PathBuf },
    Remove { paths: Vec<PathBuf> },
    Move { paths: Vec<PathBuf>, to: PathBuf },
    Rename { path: PathBuf, name: String },
    Mkdir { parent: Option<PathBuf>, name: String },
    Set { case: PathBuf, assignments: Vec<(String, String)> },
    StepAdd { case: PathBuf, name: String, at: Option<usize> },
    StepSet { case: PathBuf, index: usize, assignments: Vec<(String, String)> },
    StepRemove { case: PathBuf, index: usize },
    StepMove { case: PathBuf, from: usize, to: usize },
    Attach { case: PathBuf, file: PathBuf, index: usize, alias: Option<String> },
    Detach { case: PathBuf, name: String },
    Attachments { case: PathBuf },
    /// `None` resets every case
    StatusReset { case: Option<PathBuf> },
    StatusPass { case: PathBuf },
    Stats,
    Import { files: Vec<PathBuf> },
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, m) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "tree" => Ok(CliAction::Tree {
            pattern: m.get_one::<String>("pattern").cloned(),
        }),
        "list" => parse_list(m),
        "values" => {
            let field = required(m, "field")?.parse::<Field>()?;
            Ok(CliAction::Values { field })
        }
        "show" => Ok(CliAction::Show { case: case(m)? }),
        "summary" => Ok(CliAction::Summary { case: case(m)? }),
        "skeleton" => Ok(CliAction::Skeleton { case: case(m)? }),
        "new" => Ok(CliAction::New {
            folder: m.get_one::<String>("folder").map(PathBuf::from),
            name: m.get_one::<String>("name").cloned(),
        }),
        "duplicate" => Ok(CliAction::Duplicate { case: case(m)? }),
        "rm" => Ok(CliAction::Remove { paths: paths(m)? }),
        "mv" => Ok(CliAction::Move {
            paths: paths(m)?,
            to: PathBuf::from(required(m, "to")?),
        }),
        "rename" => Ok(CliAction::Rename {
            path: PathBuf::from(required(m, "path")?),
            name: required(m, "name")?.to_string(),
        }),
        "mkdir" => Ok(CliAction::Mkdir {
            parent: m.get_one::<String>("parent").map(PathBuf::from),
            name: required(m, "name")?.to_string(),
        }),
        "set" => Ok(CliAction::Set {
            case: case(m)?,
            assignments: assignments(m)?,
        }),
        "step" => parse_step(m),
        "attach" => Ok(CliAction::Attach {
            case: case(m)?,
            file: PathBuf::from(required(m, "file")?),
            index: step_index(m, "step")?,
            alias: m.get_one::<String>("alias").cloned(),
        }),
        "detach" => Ok(CliAction::Detach {
            case: case(m)?,
            name: required(m, "name")?.to_string(),
        }),
        "attachments" => Ok(CliAction::Attachments { case: case(m)? }),
        "status" => parse_status(m),
        "stats" => Ok(CliAction::Stats),
        "import" => Ok(CliAction::Import {
            files: m
                .get_many::<String>("file")
                .ok_or("No export file given")?
                .map(PathBuf::from)
                .collect(),
        }),
        other => Err(format!("Unknown command: {}", other)),
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn required<'a>(m: &'a ArgMatches, id: &str) -> Result<&'a str, String> {
    m.get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing argument: {}", id))
}

fn case(m: &ArgMatches) -> Result<PathBuf, String> {
    required(m, "case").map(PathBuf::from)
}

fn paths(m: &ArgMatches) -> Result<Vec<PathBuf>, String> {
    Ok(m.get_many::<String>("paths")
        .ok_or("No paths given")?
        .map(PathBuf::from)
        .collect())
}

fn step_index(m: &ArgMatches, id: &str) -> Result<usize, String> {
    let number = *m
        .get_one::<usize>(id)
        .ok_or_else(|| format!("Missing argument: {}", id))?;
    to_index(number)
}

fn to_index(number: usize) -> Result<usize, String> {
    number
        .checked_sub(1)
        .ok_or_else(|| "Step numbers start at 1".to_string())
}

/// Split `key=value` pairs; the value may itself contain `=`.
fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Expected key=value, got '{}'", raw)),
    }
}

fn assignments(m: &ArgMatches) -> Result<Vec<(String, String)>, String> {
    m.get_many::<String>("assignments")
        .ok_or("No assignments given")?
        .map(|raw| parse_assignment(raw))
        .collect()
}

// =========================================================================
// list / step
// =========================================================================

fn parse_list(m: &ArgMatches) -> Result<CliAction, String> {
    let mut filter = CaseFilter::new();
    for field in Field::ALL {
        if let Some(values) = m.get_many::<String>(field.key()) {
            for value in values {
                filter.add_value(field, value.clone());
            }
        }
    }
    if let Some(needle) = m.get_one::<String>("description") {
        filter = filter.with_description(needle.clone());
    }
    if let Some(query) = m.get_one::<String>("query") {
        filter = filter.with_query(query.clone());
    }
    Ok(CliAction::List { filter })
}

fn parse_step(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub, m) = matches.subcommand().ok_or("No step subcommand")?;
    match sub {
        "add" => Ok(CliAction::StepAdd {
            case: case(m)?,
            name: required(m, "name")?.to_string(),
            at: m.get_one::<usize>("at").map(|n| to_index(*n)).transpose()?,
        }),
        "set" => Ok(CliAction::StepSet {
            case: case(m)?,
            index: step_index(m, "step")?,
            assignments: assignments(m)?,
        }),
        "rm" => Ok(CliAction::StepRemove {
            case: case(m)?,
            index: step_index(m, "step")?,
        }),
        "mv" => Ok(CliAction::StepMove {
            case: case(m)?,
            from: step_index(m, "step")?,
            to: step_index(m, "to")?,
        }),
        other => Err(format!("Unknown step subcommand: {}", other)),
    }
}

fn parse_status(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub, m) = matches.subcommand().ok_or("No status subcommand")?;
    match sub {
        "reset" if m.get_flag("all") => Ok(CliAction::StatusReset { case: None }),
        "reset" => Ok(CliAction::StatusReset {
            case: Some(case(m)?),
        }),
        "pass" => Ok(CliAction::StatusPass { case: case(m)? }),
        other => Err(format!("Unknown status subcommand: {}", other)),
    }
}
