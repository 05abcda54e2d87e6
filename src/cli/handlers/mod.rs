use std::error::Error;
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, DEFAULT_CONFIG_FILE};
use crate::io::lock::FileLock;
use crate::logging;
use crate::model::filter::{
    CategoryFilter, FilterCriteria, KeywordScope, PriorityFilter, QuickFilter, StatusFilter,
};
use crate::model::task::{TaskDraft, TaskPatch, ValidationErrors};
use crate::ops::store::TaskRef;
use crate::ops::tracker::Tracker;

type CmdResult = Result<(), Box<dyn Error>>;

/// Resolved settings shared by every command
pub struct Context {
    pub data_file: PathBuf,
    pub scope: KeywordScope,
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Load config, start logging, run the command
pub fn run(cli: Cli) -> CmdResult {
    let cwd = std::env::current_dir()?;
    let (config_path, explicit) = match &cli.config {
        Some(path) => (PathBuf::from(path), true),
        None => (cwd.join(DEFAULT_CONFIG_FILE), false),
    };
    let config = config_io::read_config(&config_path, explicit)?;
    logging::init_logging(&config.log.level);

    let ctx = Context {
        data_file: config_io::resolve_data_file(&config, cli.file.as_deref().map(Path::new), &cwd),
        scope: config.search.scope,
        json: cli.json,
    };
    tracing::debug!(data_file = %ctx.data_file.display(), "resolved data file");

    dispatch(cli.command, &ctx)
}

pub fn dispatch(command: Commands, ctx: &Context) -> CmdResult {
    match command {
        // Write commands
        Commands::Add(args) => cmd_add(args, ctx),
        Commands::Edit(args) => cmd_edit(args, ctx),
        Commands::Done(args) => cmd_set_completed(args, true, ctx),
        Commands::Undo(args) => cmd_set_completed(args, false, ctx),
        Commands::Rm(args) => cmd_rm(args, ctx),

        // Read commands
        Commands::Show(args) => cmd_show(args, ctx),
        Commands::List(args) => cmd_list(args, ctx),
        Commands::Summary => cmd_summary(ctx),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Lock the data file and load it. The lock must outlive the tracker's saves.
fn open_for_write(ctx: &Context) -> Result<(FileLock, Tracker), Box<dyn Error>> {
    let lock = FileLock::acquire_default(&ctx.data_file)?;
    let mut tracker = Tracker::open(&ctx.data_file, ctx.scope);
    tracker.subscribe(|notice| {
        if !notice.persisted {
            eprintln!("warning: change kept in memory only; the data file could not be written");
        }
    });
    Ok((lock, tracker))
}

fn open_for_read(ctx: &Context) -> Tracker {
    Tracker::open(&ctx.data_file, ctx.scope)
}

/// Print every validation message and turn them into a command failure
fn rejected(errors: ValidationErrors) -> Box<dyn Error> {
    for message in errors.iter() {
        eprintln!("{}", message);
    }
    "task not saved".into()
}

/// Report a reference that matched nothing. Not an error.
fn report_missing(action: &str, number: usize, ctx: &Context) -> CmdResult {
    if ctx.json {
        let out = ChangeJson {
            action,
            number,
            found: false,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("no task #{}; nothing changed", number);
    }
    Ok(())
}

fn report_change(action: &str, at: TaskRef, title: &str, ctx: &Context) -> CmdResult {
    if ctx.json {
        let out = ChangeJson {
            action,
            number: at.position(),
            found: true,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{} {} {}", action, at, title);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, ctx: &Context) -> CmdResult {
    let (_lock, mut tracker) = open_for_write(ctx)?;
    let today = tracker.today();
    let due_date = args
        .due
        .as_deref()
        .map(|s| parse_date(s, today))
        .transpose()?;

    let draft = TaskDraft {
        title: args.title,
        description: args.description,
        due_date,
        category: args.category,
        priority: args.priority,
    };
    let at = tracker.add_task(&draft).map_err(rejected)?;
    let title = tracker.get(at).map(|t| t.title.clone()).unwrap_or_default();
    report_change("added", at, &title, ctx)
}

fn cmd_edit(args: EditArgs, ctx: &Context) -> CmdResult {
    let (_lock, mut tracker) = open_for_write(ctx)?;
    let today = tracker.today();
    let patch = TaskPatch {
        title: args.title,
        description: args.description,
        due_date: args.due.as_deref().map(|s| parse_date(s, today)).transpose()?,
        category: args.category,
        priority: args.priority,
        completed: None,
    };
    if patch.is_empty() {
        return Err(
            "nothing to edit (pass --title, --description, --due, --category or --priority)".into(),
        );
    }

    let Some(at) = TaskRef::from_position(args.number) else {
        return report_missing("updated", args.number, ctx);
    };
    if tracker.patch_task(at, &patch).map_err(rejected)? {
        let title = tracker.get(at).map(|t| t.title.clone()).unwrap_or_default();
        report_change("updated", at, &title, ctx)
    } else {
        report_missing("updated", args.number, ctx)
    }
}

fn cmd_set_completed(args: RefArgs, completed: bool, ctx: &Context) -> CmdResult {
    let action = if completed { "completed" } else { "reopened" };
    let (_lock, mut tracker) = open_for_write(ctx)?;
    let Some(at) = TaskRef::from_position(args.number) else {
        return report_missing(action, args.number, ctx);
    };
    if tracker.set_completed(at, completed) {
        let title = tracker.get(at).map(|t| t.title.clone()).unwrap_or_default();
        report_change(action, at, &title, ctx)
    } else {
        report_missing(action, args.number, ctx)
    }
}

fn cmd_rm(args: RefArgs, ctx: &Context) -> CmdResult {
    let (_lock, mut tracker) = open_for_write(ctx)?;
    let Some(at) = TaskRef::from_position(args.number) else {
        return report_missing("deleted", args.number, ctx);
    };
    match tracker.delete_task(at) {
        Some(task) => report_change("deleted", at, &task.title, ctx),
        None => report_missing("deleted", args.number, ctx),
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_show(args: RefArgs, ctx: &Context) -> CmdResult {
    let tracker = open_for_read(ctx);
    let found = TaskRef::from_position(args.number).and_then(|at| tracker.get(at).map(|t| (at, t)));
    let Some((at, task)) = found else {
        return Err(format!("no task #{}", args.number).into());
    };

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(at, task))?);
    } else {
        for line in format_task_detail(at, task, tracker.today()) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Build criteria from list flags. Shortcuts come first; explicit flags
/// refine them.
fn criteria_from_args(args: &ListArgs, tracker: &Tracker) -> Result<FilterCriteria, Box<dyn Error>> {
    let today = tracker.today();
    let mut criteria = if args.today {
        tracker.today_filter().criteria(tracker.criteria())
    } else if args.upcoming {
        QuickFilter::Upcoming.criteria(tracker.criteria())
    } else {
        FilterCriteria::default()
    };

    if let Some(keyword) = &args.search {
        criteria.keyword = keyword.clone();
    }
    if let Some(category) = &args.category {
        criteria.category = CategoryFilter::parse(category);
    }
    if let Some(status) = &args.status {
        criteria.status = StatusFilter::parse(status)?;
    }
    if let Some(priority) = &args.priority {
        criteria.priority = PriorityFilter::parse(priority);
    }
    if let Some(date) = &args.date {
        criteria.due_date = Some(parse_date(date, today)?);
    }
    Ok(criteria)
}

fn cmd_list(args: ListArgs, ctx: &Context) -> CmdResult {
    let mut tracker = open_for_read(ctx);
    if let Some(scope) = &args.scope {
        tracker.set_scope(KeywordScope::parse(scope)?);
    }
    let criteria = criteria_from_args(&args, &tracker)?;
    tracker.set_filter(criteria);

    let rows = tracker.visible();
    if ctx.json {
        let out = ListJson {
            tasks: rows.iter().map(|(at, task)| task_to_json(*at, task)).collect(),
            shown: rows.len(),
            total: tracker.len(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_listing(&rows, tracker.len(), tracker.today()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_summary(ctx: &Context) -> CmdResult {
    let tracker = open_for_read(ctx);
    let summary = tracker.summary();
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for line in format_summary(&summary) {
            println!("{}", line);
        }
    }
    Ok(())
}
