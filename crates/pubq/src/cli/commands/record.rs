//! Implementation of `pubq record`.

use std::{path::Path, process::ExitCode};

use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use pubq_session::{QueryRecord, Session};

use crate::cli::{
    args::RecordCommand,
    commands::shared::{print_query, read_query, report},
    context::CommandContext,
};

/// Runs a record subcommand.
pub fn run(ctx: &CommandContext, what: &RecordCommand) -> ExitCode {
    match what {
        RecordCommand::Show { file } => show(ctx, &ctx.cwd.join(file)),
        RecordCommand::SetQuery { file, query } => {
            set_query(ctx, &ctx.cwd.join(file), query.as_deref())
        }
    }
}

/// Loads a record and the session stored in it.
fn load(path: &Path) -> Result<(QueryRecord, Session), ExitCode> {
    let record = QueryRecord::load(path).map_err(|e| report(&e))?;
    let session = Session::from_record(&record).map_err(|e| report(&e.into()))?;
    Ok((record, session))
}

/// Prints a record: its questions, its query, and the collection statistics.
fn show(ctx: &CommandContext, path: &Path) -> ExitCode {
    let (record, session) = match load(path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let painter = ctx.painter;

    let title = if record.name.is_empty() {
        record.id.as_str()
    } else {
        record.name.as_str()
    };
    println!("{}", painter.header(title));
    if !record.description.is_empty() {
        println!("{}", painter.dim(&record.description));
    }
    println!();

    if !record.questions.is_empty() {
        println!("{}", painter.subheader("Questions:"));
        for question in &record.questions {
            println!("  - {question}");
            if let Some(answer) = record.answers.get(question) {
                println!("    {}", painter.dim(answer));
            }
        }
        println!();
    }

    println!("{}", painter.subheader("Query:"));
    if session.query().is_empty() {
        println!("  {}", painter.dim("(none yet)"));
    } else {
        print_query(ctx, session.query(), ctx.config.format.separator);
    }
    println!();

    let docs = &record.collected_documents;
    println!("{}", painter.subheader("Collected:"));
    let mut counts = vec![
        ("papers", record.paper_count),
        ("free full text", record.free_full_text_count),
        ("pubmed", docs.pubmed),
        ("semantic scholar", docs.semantic_scholar),
    ];
    if let Some(removed) = docs.removed_duplicates {
        counts.push(("duplicates removed", removed));
    }
    for (label, count) in counts {
        println!("  {:<20}{count}", format!("{label}:"));
    }

    if !record.year_distribution.is_empty() {
        println!();
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec!["year", "papers"]);
        for (year, count) in &record.year_distribution {
            table.add_row(vec![year.to_string(), count.to_string()]);
        }
        println!("{table}");
    }

    ExitCode::SUCCESS
}

/// Replaces the query stored in a record. The file is left untouched if the query is invalid.
fn set_query(ctx: &CommandContext, path: &Path, query: Option<&str>) -> ExitCode {
    let (mut record, mut session) = match load(path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let text = match read_query(query) {
        Ok(text) => text,
        Err(code) => return code,
    };

    if let Err(e) = session.apply_pasted(&text) {
        return report(&e);
    }
    if let Err(e) = session.save_into(&mut record) {
        return report(&e);
    }
    if let Err(e) = record.save(path) {
        return report(&e);
    }

    println!("{} {}", ctx.painter.success("Updated"), path.display());
    ExitCode::SUCCESS
}
