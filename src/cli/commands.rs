use std::path::PathBuf;

use clap::{Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "todoman",
    version = VERSION,
    about = "Single-user todo list manager",
    after_help = "\
NOTE:
  Without a subcommand, starts the interactive menu.
  Tasks are stored in ./tasks.json unless --file or TODOMAN_FILE says otherwise.
  Set TODOMAN_LOG=debug for diagnostic logs on stderr.

EXIT CODES:
  0  Success
  1  Error (unknown task ID, storage write failure, etc.)

BEHAVIOR NOTES:
  An empty title becomes \"Untitled Task\".
  An unknown status becomes `pending`.
  `delete` of an unknown ID is not an error; it reports 0 removed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task data file
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive menu (the default)
    Menu,

    #[command(flatten)]
    Task(TaskCommands),
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// Task title
        title: Option<String>,
        /// pending, in-progress or completed
        #[arg(long)]
        status: Option<String>,
        /// Due date, free text
        #[arg(long)]
        due: Option<String>,
        /// Reminder time, free text
        #[arg(long)]
        remind: Option<String>,
    },
    /// List tasks, optionally only those with one status
    List {
        #[arg(long, value_parser = ["pending", "in-progress", "completed"])]
        status: Option<String>,
    },
    /// Show task details
    Show {
        id: String,
    },
    /// Mark a task completed
    Done {
        id: String,
    },
    /// Set a task's status
    Status {
        id: String,
        /// pending, in-progress or completed
        status: String,
    },
    /// Rename a task
    Title {
        id: String,
        title: String,
    },
    /// Set or clear (no value) the due date
    Due {
        id: String,
        value: Option<String>,
    },
    /// Set or clear (no value) the reminder time
    Remind {
        id: String,
        value: Option<String>,
    },
    /// Delete a task
    Delete {
        id: String,
    },
    /// Case-insensitive title search
    Search {
        keyword: String,
    },
}
