use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{load_settings, FirestoreStore, Interaction, OpStatus, TodoListController};
use shared::domain::{TodoId, TodoItem};

#[derive(Parser, Debug)]
#[command(name = "todo", about = "Cloud-backed todo list")]
struct Cli {
    /// Path to the TOML config naming the Firestore project, collection,
    /// and optional API key. Defaults to ./todo.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current todo list.
    List,
    /// Add a new todo.
    Add { text: String },
    /// Edit a todo. Prompts for replacement text; press Enter to keep the
    /// suggested text, Ctrl-D to cancel.
    Edit { id: String },
    /// Delete a todo.
    Rm {
        id: String,
        /// Skip the confirmation question.
        #[arg(long)]
        yes: bool,
    },
    /// Delete every todo in the collection.
    Clear {
        /// Skip the confirmation question.
        #[arg(long)]
        yes: bool,
    },
}

struct StdinInteraction {
    assume_yes: bool,
}

fn is_affirmative(reply: &str) -> bool {
    matches!(reply.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

impl Interaction for StdinInteraction {
    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        eprint!("{message} [{default}] ");
        let _ = io::stderr().flush();
        let mut reply = String::new();
        match io::stdin().lock().read_line(&mut reply) {
            // EOF before any input means the user backed out.
            Ok(0) => None,
            Ok(_) => {
                let reply = reply.trim_end_matches(['\r', '\n']);
                if reply.is_empty() {
                    Some(default.to_string())
                } else {
                    Some(reply.to_string())
                }
            }
            Err(_) => None,
        }
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{message} [y/N] ");
        let _ = io::stderr().flush();
        let mut reply = String::new();
        match io::stdin().lock().read_line(&mut reply) {
            Ok(_) => is_affirmative(&reply),
            Err(_) => false,
        }
    }

    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

fn print_list(items: &[TodoItem]) {
    if items.is_empty() {
        println!("(no todos)");
        return;
    }
    for item in items {
        println!("{}  {}", item.id, item.text);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref());
    let store = FirestoreStore::new(&settings)?;

    let assume_yes = match &cli.command {
        Command::Rm { yes, .. } | Command::Clear { yes } => *yes,
        _ => false,
    };
    let interaction = StdinInteraction { assume_yes };
    let mut controller = TodoListController::new(store, interaction);
    controller.load().await;

    let status = match cli.command {
        Command::List => OpStatus::Completed,
        Command::Add { text } => {
            controller.set_draft(text);
            controller.submit().await
        }
        Command::Edit { id } => controller.begin_edit(&TodoId::new(id)).await,
        Command::Rm { id, .. } => controller.remove(&TodoId::new(id)).await,
        Command::Clear { .. } => controller.remove_all().await,
    };

    print_list(controller.items());

    match status {
        OpStatus::Completed | OpStatus::Cancelled => Ok(()),
        OpStatus::Ignored => {
            eprintln!("nothing to do: unknown id or empty text");
            std::process::exit(2);
        }
        OpStatus::Failed => std::process::exit(1),
    }
}

#[cfg(test)]
mod tests {
    use super::is_affirmative;

    #[test]
    fn only_explicit_yes_replies_confirm() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Yes\n"));
        assert!(is_affirmative("  Y  "));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("yep"));
    }
}
