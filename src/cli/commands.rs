use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tk", about = concat!("tk v", env!("CARGO_PKG_VERSION"), " - a small personal task list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Data file (default: [storage] file from the config, or tasks.json)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<String>,

    /// Config file (default: tasker.toml in the working directory)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// Edit fields of a task
    Edit(EditArgs),
    /// Mark a task completed
    Done(RefArgs),
    /// Mark a task pending again
    Undo(RefArgs),
    /// Delete a task
    Rm(RefArgs),
    /// Show task details
    Show(RefArgs),
    /// List tasks, optionally filtered
    List(ListArgs),
    /// Show total, completed, due today, overdue and upcoming counts
    Summary,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Due date (YYYY-MM-DD, or "today"/"tomorrow")
    #[arg(long)]
    pub due: Option<String>,
    /// Category (Work, Personal, School, Home, Other)
    #[arg(long)]
    pub category: Option<String>,
    /// Priority (High, Medium, Low)
    #[arg(long)]
    pub priority: Option<String>,
    /// Longer description
    #[arg(short, long, default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task number as shown by `tk list`
    pub number: usize,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct RefArgs {
    /// Task number as shown by `tk list`
    pub number: usize,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Keyword to search for (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,
    /// Filter by category
    #[arg(long)]
    pub category: Option<String>,
    /// Filter by status (all, completed, pending)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by priority
    #[arg(long)]
    pub priority: Option<String>,
    /// Only tasks due on this date (YYYY-MM-DD, or "today"/"tomorrow")
    #[arg(long)]
    pub date: Option<String>,
    /// Only tasks due today
    #[arg(long, conflicts_with_all = ["date", "upcoming"])]
    pub today: bool,
    /// Only pending tasks
    #[arg(long, conflicts_with = "status")]
    pub upcoming: bool,
    /// What the keyword searches: title, or all (title and description)
    #[arg(long)]
    pub scope: Option<String>,
}
