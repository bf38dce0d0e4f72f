//! Terminal front end for the notes API.
//!
//! Each invocation loads the collection, applies one action through the
//! notes view and prints the result.

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use notes_client::{ApiClient, NoteRecord, NotesView, Outcome, Prompter, DEFAULT_BASE_URL};

#[derive(Debug, Parser)]
#[command(name = "notes", version, about = "Manage notes on a notes server")]
struct Cli {
    /// Notes collection URL.
    #[arg(long, env = "NOTES_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// trace|debug|info|warn|error
    #[arg(long, env = "NOTES_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all notes, oldest first.
    List {
        #[arg(long)]
        newest_first: bool,
    },
    /// Create a note.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Change the title and/or content of a note.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Prompts on stdin and reports errors on stderr.
struct TerminalPrompter {
    assume_yes: bool,
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{message} [y/N] ");
        if io::stderr().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn alert(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    notes_core::init_logging(&cli.log_level, None).map_err(|err| anyhow!(err))?;

    let assume_yes = matches!(cli.command, Command::Delete { yes: true, .. });
    let client = ApiClient::new(&cli.base_url)?;
    let view = NotesView::new(client, TerminalPrompter { assume_yes });

    expect_applied(view.load().await)?;

    match cli.command {
        Command::List { newest_first } => {
            if newest_first {
                view.toggle_sort();
            }
            let notes = view.notes();
            if notes.is_empty() {
                println!("No notes yet.");
            }
            for note in &notes {
                print_note(note);
            }
        }
        Command::Add { title, content } => {
            view.open_add();
            view.set_title(title);
            view.set_content(content);
            expect_applied(view.save().await)?;
            if let Some(note) = view.notes().last() {
                print_note(note);
            }
        }
        Command::Edit { id, title, content } => {
            if !view.open_edit(&id) {
                bail!("Note with ID {id} not found");
            }
            if let Some(title) = title {
                view.set_title(title);
            }
            if let Some(content) = content {
                view.set_content(content);
            }
            expect_applied(view.save().await)?;
            if let Some(note) = view.notes().iter().find(|note| note.id == id) {
                print_note(note);
            }
        }
        Command::Delete { id, .. } => match view.delete(Some(&id)).await {
            Outcome::Applied => println!("Deleted {id}"),
            Outcome::Cancelled => println!("Kept {id}"),
            outcome => expect_applied(outcome)?,
        },
    }

    Ok(())
}

fn expect_applied(outcome: Outcome) -> anyhow::Result<()> {
    match outcome {
        Outcome::Applied => Ok(()),
        other => bail!("action did not complete ({other:?})"),
    }
}

fn print_note(note: &NoteRecord) {
    println!("{}  [{}]  {}", note.id, note.created_at, note.title);
    for line in note.content.lines() {
        println!("    {line}");
    }
}
