//! Clap argument definitions for the `pubq` CLI.

use std::{env, ffi::OsString, process::exit};

use clap::{
    ArgAction, ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand,
    error::ErrorKind,
};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "pubq")]
#[command(about = "PubMed query builder - validate, format and edit boolean queries")]
pub struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Query text taken from the command line or stdin.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryInput {
    /// Query text, or '-' to read it from stdin [default: -]
    pub query: Option<String>,
}

/// Arguments for `pubq fmt`.
#[derive(Args, Debug, Clone)]
pub struct FmtCommand {
    #[command(flatten)]
    /// Query to format.
    pub input: QueryInput,

    /// Put the whole query on one line
    #[arg(long)]
    pub inline: bool,

    /// Salvage groups and terms from a query that does not parse
    #[arg(long)]
    pub lenient: bool,
}

/// Arguments for `pubq parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    #[command(flatten)]
    /// Query to parse.
    pub input: QueryInput,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// One edit applied by `pubq edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Append a group holding the given OR-terms (empty for an empty group).
    AddGroup(String),
    /// Remove the group at an index.
    RemoveGroup(usize),
    /// Add a term to a group.
    AddTerm(usize, String),
    /// Remove a term from a group.
    RemoveTerm(usize, String),
    /// Replace a group's terms with OR-term text.
    SetGroup(usize, String),
}

/// Arguments for `pubq edit`.
///
/// Edit flags may be repeated and mixed; they are applied in command-line order. Group
/// indices start at 0.
#[derive(Args, Debug, Clone)]
pub struct EditCommand {
    #[command(flatten)]
    /// Query to edit; '-' reads stdin, and an empty query starts from scratch.
    pub input: QueryInput,

    /// Append a group with these OR-terms ("" for an empty group)
    #[arg(long, value_name = "TERMS", value_parser = parse_add_group)]
    pub add_group: Vec<EditOp>,

    /// Remove group N
    #[arg(long, value_name = "N", value_parser = parse_remove_group)]
    pub remove_group: Vec<EditOp>,

    /// Add TERM to group N
    #[arg(long, value_name = "N=TERM", value_parser = parse_add_term)]
    pub add_term: Vec<EditOp>,

    /// Remove TERM from group N
    #[arg(long, value_name = "N=TERM", value_parser = parse_remove_term)]
    pub remove_term: Vec<EditOp>,

    /// Replace group N's terms with OR-term TEXT
    #[arg(long, value_name = "N=TEXT", value_parser = parse_set_group)]
    pub set_group: Vec<EditOp>,

    /// Put the whole query on one line
    #[arg(long)]
    pub inline: bool,

    /// All edits in command-line order.
    #[arg(skip)]
    pub ops: Vec<EditOp>,
}

/// Argument ids of the edit flags.
const EDIT_ARGS: [&str; 5] = [
    "add_group",
    "remove_group",
    "add_term",
    "remove_term",
    "set_group",
];

/// Parses `--add-group TERMS`.
fn parse_add_group(s: &str) -> Result<EditOp, String> {
    Ok(EditOp::AddGroup(s.to_string()))
}

/// Parses `--remove-group N`.
fn parse_remove_group(s: &str) -> Result<EditOp, String> {
    parse_index(s).map(EditOp::RemoveGroup)
}

/// Parses `--add-term N=TERM`.
fn parse_add_term(s: &str) -> Result<EditOp, String> {
    parse_indexed(s).map(|(i, term)| EditOp::AddTerm(i, term))
}

/// Parses `--remove-term N=TERM`.
fn parse_remove_term(s: &str) -> Result<EditOp, String> {
    parse_indexed(s).map(|(i, term)| EditOp::RemoveTerm(i, term))
}

/// Parses `--set-group N=TEXT`.
fn parse_set_group(s: &str) -> Result<EditOp, String> {
    parse_indexed(s).map(|(i, text)| EditOp::SetGroup(i, text))
}

/// Parses a group index.
fn parse_index(s: &str) -> Result<usize, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a group index"))
}

/// Parses `N=VALUE`.
fn parse_indexed(s: &str) -> Result<(usize, String), String> {
    let (index, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected N=VALUE, found '{s}'"))?;
    Ok((parse_index(index)?, value.to_string()))
}

/// Collects the edit flags of `matches` in the order they were given.
fn ordered_edit_ops(matches: &ArgMatches) -> Vec<EditOp> {
    let mut indexed: Vec<(usize, EditOp)> = Vec::new();
    for id in EDIT_ARGS {
        if let (Some(indices), Some(values)) =
            (matches.indices_of(id), matches.get_many::<EditOp>(id))
        {
            indexed.extend(indices.zip(values.cloned()));
        }
    }
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, op)| op).collect()
}

/// Arguments for `pubq record`.
#[derive(Clone, Subcommand)]
pub enum RecordCommand {
    /// Show a saved query record
    Show {
        /// Record file (JSON)
        file: String,
    },
    /// Replace the query stored in a record
    SetQuery {
        /// Record file (JSON)
        file: String,
        /// New query text, or '-' to read it from stdin
        query: Option<String>,
    },
}

/// Arguments for `pubq init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.pubq.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `pubq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a query; exits non-zero if it is invalid
    #[command(after_help = "\
QUERY SYNTAX:
  (term OR term)            A concept group: alternatives joined by OR
  (a) AND (b)               Groups are joined by AND
  \"multiple sclerosis\"      Quoted phrase
  \"breast cancer\"[MeSH]     Field tags are kept as written

EXAMPLES:
  pubq check '(covid OR coronavirus) AND (vaccine OR vaccination)'
  pbpaste | pubq check")]
    Check(QueryInput),

    /// Print a query in canonical form
    Fmt(FmtCommand),

    /// Show the concept groups of a query
    Parse(ParseCommand),

    /// Apply group and term edits to a query
    #[command(after_help = "\
EXAMPLES:
  pubq edit '(covid)' --add-term 0=coronavirus
  pubq edit '(a) AND (b) AND (c)' --remove-group 1
  pubq edit '' --add-group 'covid OR coronavirus' --add-group vaccine")]
    Edit(EditCommand),

    /// Inspect and update saved query records
    Record {
        /// Record operation.
        #[command(subcommand)]
        what: RecordCommand,
    },

    /// Initialize pubq configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}

/// Parses CLI arguments, printing hierarchical help for top-level `--help`.
pub fn parse_cli() -> Cli {
    match parse_cli_from(env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp && env::args_os().len() <= 2 {
                print_hierarchical_help();
                exit(0);
            }
            e.exit();
        }
    }
}

/// Parses CLI arguments from an explicit argument list.
pub fn parse_cli_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Cli::command().try_get_matches_from(args)?;
    let mut cli = Cli::from_arg_matches(&matches)?;
    if let Commands::Edit(cmd) = &mut cli.command
        && let Some(edit) = matches.subcommand_matches("edit")
    {
        cmd.ops = ordered_edit_ops(edit);
    }
    Ok(cli)
}

/// Prints custom help with hierarchical subcommand display.
fn print_hierarchical_help() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: pubq [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");

    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }

        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:10} {about}");

        for subsub in sub.get_subcommands() {
            let subname = subsub.get_name();
            if subname == "help" {
                continue;
            }
            let subabout = subsub
                .get_about()
                .map(|s| s.to_string())
                .unwrap_or_default();
            println!("    {subname:10} {subabout}");
        }
    }

    println!(
        "  {:<10} Print this message or the help of the given subcommand(s)",
        "help"
    );
    println!();
    println!("Options:");
    println!("  -v, --verbose...  Log verbosity (-v info, -vv debug, -vvv trace)");
    println!("      --no-color    Disable colored output");
    println!("  -h, --help        Print help");
}
