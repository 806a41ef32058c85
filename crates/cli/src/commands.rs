//! clap command tree for the `casebook` binary.

use clap::{Arg, ArgAction, Command};

use casebook::Field;

fn case_arg() -> Arg {
    Arg::new("case")
        .required(true)
        .help("Case file, relative to the root")
}

fn step_arg() -> Arg {
    Arg::new("step")
        .required(true)
        .value_parser(clap::value_parser!(usize))
        .help("Step number, starting at 1")
}

fn field_args(cmd: Command) -> Command {
    Field::ALL.iter().fold(cmd, |cmd, field| {
        cmd.arg(
            Arg::new(field.key())
                .long(field.key())
                .action(ArgAction::Append)
                .value_name("VALUE")
                .help(format!("Keep cases whose {} is VALUE (repeatable)", field)),
        )
    })
}

/// Build the full command tree.
pub fn build_cli() -> Command {
    Command::new("casebook")
        .about("Manage a directory of JSON test cases")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("root")
                .long("root")
                .short('r')
                .global(true)
                .help("Test-case directory (default: config root, then the current directory)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file (default: casebook.toml in the root)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print JSON instead of text"),
        )
        .subcommand(
            Command::new("tree")
                .about("Show the folder tree")
                .arg(Arg::new("pattern").help("Only show cases whose name contains this")),
        )
        .subcommand(field_args(
            Command::new("list")
                .about("List cases, optionally filtered")
                .arg(
                    Arg::new("query")
                        .long("query")
                        .short('q')
                        .help("Name contains this text"),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .help("Description contains this text"),
                ),
        ))
        .subcommand(
            Command::new("values")
                .about("Distinct values of a field across all cases")
                .arg(Arg::new("field").required(true)),
        )
        .subcommand(
            Command::new("show")
                .about("Print the stored JSON of a case")
                .arg(case_arg()),
        )
        .subcommand(
            Command::new("summary")
                .about("Print a plain-text summary of a case")
                .arg(case_arg()),
        )
        .subcommand(
            Command::new("skeleton")
                .about("Print a pytest skeleton for a case")
                .arg(case_arg()),
        )
        .subcommand(
            Command::new("new")
                .about("Create a blank case")
                .arg(Arg::new("folder").help("Folder for the new case (default: root)"))
                .arg(Arg::new("name").long("name").short('n').help("Case name")),
        )
        .subcommand(
            Command::new("duplicate")
                .about("Copy a case next to the original")
                .arg(case_arg()),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete cases or folders")
                .arg(
                    Arg::new("paths")
                        .required(true)
                        .num_args(1..)
                        .help("Case files or folders"),
                ),
        )
        .subcommand(
            Command::new("mv")
                .about("Move cases or folders into a folder")
                .arg(Arg::new("paths").required(true).num_args(1..))
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .required(true)
                        .help("Target folder"),
                ),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename a case file or folder")
                .arg(Arg::new("path").required(true))
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("mkdir")
                .about("Create a folder")
                .arg(Arg::new("name").required(true))
                .arg(
                    Arg::new("parent")
                        .long("parent")
                        .short('p')
                        .help("Parent folder (default: root)"),
                ),
        )
        .subcommand(
            Command::new("set")
                .about("Set case fields, e.g. `set login.json priority=High tags=smoke,api`")
                .arg(case_arg())
                .arg(Arg::new("assignments").required(true).num_args(1..)),
        )
        .subcommand(
            Command::new("step")
                .about("Edit the steps of a case")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Add a step")
                        .arg(case_arg())
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("at")
                                .long("at")
                                .value_parser(clap::value_parser!(usize))
                                .help("Insert before this step number"),
                        ),
                )
                .subcommand(
                    Command::new("set")
                        .about("Set step fields, e.g. `status=failed bugLink=...`")
                        .arg(case_arg())
                        .arg(step_arg())
                        .arg(Arg::new("assignments").required(true).num_args(1..)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a step")
                        .arg(case_arg())
                        .arg(step_arg()),
                )
                .subcommand(
                    Command::new("mv")
                        .about("Move a step to another position")
                        .arg(case_arg())
                        .arg(step_arg())
                        .arg(
                            Arg::new("to")
                                .required(true)
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ),
        )
        .subcommand(
            Command::new("attach")
                .about("Attach a file to a step")
                .arg(case_arg())
                .arg(Arg::new("file").required(true))
                .arg(
                    Arg::new("step")
                        .long("step")
                        .short('s')
                        .required(true)
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(Arg::new("alias").long("alias").help("Stored name without extension")),
        )
        .subcommand(
            Command::new("detach")
                .about("Remove an attachment")
                .arg(case_arg())
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("attachments")
                .about("List the attachment files of a case")
                .arg(case_arg()),
        )
        .subcommand(
            Command::new("status")
                .about("Reset or pass the step statuses of a test run")
                .subcommand_required(true)
                .subcommand(
                    Command::new("reset")
                        .about("Set steps back to pending and clear skip reasons")
                        .arg(
                            Arg::new("case")
                                .required_unless_present("all")
                                .help("Case file, relative to the root"),
                        )
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("case")
                                .help("Reset every case under the root"),
                        ),
                )
                .subcommand(
                    Command::new("pass")
                        .about("Mark every step of a case passed")
                        .arg(case_arg()),
                ),
        )
        .subcommand(Command::new("stats").about("Count cases by outcome"))
        .subcommand(
            Command::new("import")
                .about("Import an Azure DevOps test-case export")
                .arg(Arg::new("file").required(true).num_args(1..)),
        )
}
