//! casebook CLI: manage a directory of JSON test cases from the shell.
//!
//! `casebook [--root DIR] [--config FILE] [--json] COMMAND ...`
//!
//! Log output goes to stderr and is controlled by `CASEBOOK_LOG`
//! (e.g. `CASEBOOK_LOG=casebook_engine=debug`), default `warn`.

mod commands;
mod format;
mod parse;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use casebook::{Casebook, Config, TestCaseStep};

use commands::build_cli;
use format::{format_error, format_output, Output, OutputMode};
use parse::{matches_to_action, CliAction};

fn main() {
    init_logging();

    let matches = build_cli().get_matches();
    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let book = match open_casebook(&matches) {
        Ok(book) => book,
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            process::exit(1);
        }
    };

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("{}", format_error(&anyhow::anyhow!(e), mode));
            process::exit(2);
        }
    };

    match execute(&book, action) {
        Ok(output) => {
            let formatted = format_output(&output, book.root(), mode);
            if !formatted.is_empty() {
                println!("{}", formatted);
            }
            if output.has_failures() {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("CASEBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `--root` wins; otherwise the config file (explicit or `./casebook.toml`)
/// may name the root; otherwise the current directory is used.
fn open_casebook(matches: &clap::ArgMatches) -> anyhow::Result<Casebook> {
    let root = matches.get_one::<String>("root").map(PathBuf::from);
    let config = match matches.get_one::<String>("config") {
        Some(path) => Some(Config::load(Path::new(path))?),
        None if root.is_none() => Some(Config::discover(Path::new("."))?),
        None => None,
    };

    let mut builder = Casebook::builder();
    if let Some(config) = config {
        if root.is_none() && config.root.is_none() {
            builder = builder.root(".");
        }
        builder = builder.config(config);
    }
    if let Some(root) = root {
        builder = builder.root(root);
    }
    builder.open().context("failed to open test-case directory")
}

fn execute(book: &Casebook, action: CliAction) -> anyhow::Result<Output> {
    debug!(?action, "executing");
    let output = match action {
        CliAction::Tree { pattern } => {
            let tree = book.tree()?;
            match pattern {
                Some(pattern) => Output::Tree(tree.filtered(&pattern)),
                None => Output::Tree(tree),
            }
        }
        CliAction::List { filter } => Output::Cases(book.filter(&filter)?),
        CliAction::Values { field } => Output::Values(book.distinct_values(field)?),
        CliAction::Show { case } => {
            let file = book.load(&case)?;
            Output::Document(file.case.to_json().map_err(casebook::Error::from)?)
        }
        CliAction::Summary { case } => Output::Text(book.summary(&book.load(&case)?.case)),
        CliAction::Skeleton { case } => Output::Text(book.skeleton(&book.load(&case)?.case)),
        CliAction::New { folder, name } => {
            let mut file = book.create_new(folder)?;
            if let Some(name) = name {
                file.case.set_field("name", &name).map_err(casebook::Error::from)?;
                book.save(&mut file)?;
            }
            Output::Created(file.path)
        }
        CliAction::Duplicate { case } => {
            let file = book.load(&case)?;
            Output::Created(book.duplicate(&file)?.path)
        }
        CliAction::Remove { paths } => Output::Bulk(book.bulk_delete(&paths)),
        CliAction::Move { paths, to } => {
            if let [source] = paths.as_slice() {
                let outcome = book.move_item(source, &to)?;
                Output::Moved(vec![(book.resolve(source), outcome)])
            } else {
                Output::Bulk(book.bulk_move(&paths, &to))
            }
        }
        CliAction::Rename { path, name } => Output::Updated(book.rename(&path, &name)?),
        CliAction::Mkdir { parent, name } => {
            Output::Created(book.create_folder(parent.unwrap_or_default(), &name)?)
        }
        CliAction::Set { case, assignments } => {
            let mut file = book.load(&case)?;
            for (key, value) in &assignments {
                file.case
                    .set_field(key, value)
                    .map_err(casebook::Error::from)?;
            }
            book.save(&mut file)?;
            Output::Updated(file.path)
        }
        CliAction::StepAdd { case, name, at } => {
            let mut file = book.load(&case)?;
            let step = TestCaseStep::new(name);
            match at {
                Some(index) => file.case.insert_step(index, step),
                None => file.case.add_step(step),
            };
            book.save(&mut file)?;
            Output::Updated(file.path)
        }
        CliAction::StepSet {
            case,
            index,
            assignments,
        } => {
            let mut file = book.load(&case)?;
            let count = file.case.steps.len();
            let Some(step) = file.case.steps.get_mut(index) else {
                bail!("step {} not found (case has {} steps)", index + 1, count);
            };
            for (key, value) in &assignments {
                step.set_field(key, value).map_err(casebook::Error::from)?;
            }
            book.save(&mut file)?;
            Output::Updated(file.path)
        }
        CliAction::StepRemove { case, index } => {
            let mut file = book.load(&case)?;
            file.case
                .remove_step(index)
                .map_err(casebook::Error::from)?;
            book.save(&mut file)?;
            Output::Updated(file.path)
        }
        CliAction::StepMove { case, from, to } => {
            let mut file = book.load(&case)?;
            file.case
                .move_step(from, to)
                .map_err(casebook::Error::from)?;
            book.save(&mut file)?;
            Output::Updated(file.path)
        }
        CliAction::Attach {
            case,
            file: source,
            index,
            alias,
        } => {
            let mut file = book.load(&case)?;
            let name = book.attach(&mut file, &source, index, alias.as_deref())?;
            Output::Text(format!("attached {} to step {}", name, index + 1))
        }
        CliAction::Detach { case, name } => {
            let mut file = book.load(&case)?;
            if !book.detach(&mut file, &name)? {
                bail!("no attachment named '{}'", name);
            }
            Output::Updated(file.path)
        }
        CliAction::Attachments { case } => {
            let file = book.load(&case)?;
            Output::Attachments(book.attachments(&file)?)
        }
        CliAction::StatusReset { case: None } => Output::Bulk(book.reset_all_statuses()?),
        CliAction::StatusReset { case: Some(case) } => {
            let mut file = book.load(&case)?;
            if !book.reset_statuses(&mut file)? {
                bail!("{} has no steps", file.file_name());
            }
            Output::Updated(file.path)
        }
        CliAction::StatusPass { case } => {
            let mut file = book.load(&case)?;
            if !book.pass_all(&mut file)? {
                bail!("{} has no steps", file.file_name());
            }
            Output::Updated(file.path)
        }
        CliAction::Stats => Output::Stats(book.statistics()?),
        CliAction::Import { files } => Output::Import(
            files
                .into_iter()
                .map(|path| {
                    let report = book.import_azure(&path);
                    (path, report)
                })
                .collect(),
        ),
    };
    Ok(output)
}
