use serde_json::json;
use tracing::debug;

use crate::cli::commands::TaskCommands;
use crate::cli::{report_error, session};
use crate::collection;
use crate::config::Settings;
use crate::error::TodoError;
use crate::models::{Task, TaskStatus};
use crate::output;
use crate::storage::{JsonFileStore, TaskStore};

pub fn run(cmd: TaskCommands, settings: &Settings) -> i32 {
    let store = JsonFileStore::new(&settings.data_file);
    match run_with(cmd, &store, settings.json_output) {
        Ok(code) => code,
        Err(e) => {
            report_error(&e, settings.json_output);
            1
        }
    }
}

pub fn run_with<S: TaskStore>(
    cmd: TaskCommands,
    store: &S,
    json_output: bool,
) -> Result<i32, TodoError> {
    match cmd {
        TaskCommands::Add { title, status, due, remind } => run_add(
            store,
            title.as_deref().unwrap_or(""),
            status.as_deref(),
            non_blank(due),
            non_blank(remind),
            json_output,
        ),
        TaskCommands::List { status } => run_list(store, status.as_deref(), json_output),
        TaskCommands::Show { id } => run_show(store, &id, json_output),
        TaskCommands::Done { id } => {
            let task = update_task(store, &id, Task::mark_completed)?;
            print_updated(&task, json_output);
            Ok(0)
        }
        TaskCommands::Status { id, status } => {
            let task = update_task(store, &id, |t| t.update_status(&status))?;
            print_updated(&task, json_output);
            Ok(0)
        }
        TaskCommands::Title { id, title } => {
            let task = update_task(store, &id, |t| t.update_title(&title))?;
            print_updated(&task, json_output);
            Ok(0)
        }
        TaskCommands::Due { id, value } => {
            let task = update_task(store, &id, |t| t.set_due_date(non_blank(value)))?;
            print_updated(&task, json_output);
            Ok(0)
        }
        TaskCommands::Remind { id, value } => {
            let task = update_task(store, &id, |t| t.set_reminder_time(non_blank(value)))?;
            print_updated(&task, json_output);
            Ok(0)
        }
        TaskCommands::Delete { id } => run_delete(store, &id, json_output),
        TaskCommands::Search { keyword } => run_search(store, &keyword, json_output),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn run_add<S: TaskStore>(
    store: &S,
    title: &str,
    status: Option<&str>,
    due: Option<String>,
    remind: Option<String>,
    json_output: bool,
) -> Result<i32, TodoError> {
    let mut tasks = session::load(store);
    let task = collection::add(&mut tasks, title, status, due, remind).clone();
    session::save(store, &tasks)?;
    debug!(id = task.id().unwrap_or_default(), "added task");

    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_json(&task)
        })));
    } else {
        println!("Added task: {} ({})", task.title(), task.id().unwrap_or_default());
    }
    Ok(0)
}

fn run_list<S: TaskStore>(
    store: &S,
    status: Option<&str>,
    json_output: bool,
) -> Result<i32, TodoError> {
    let tasks = session::load(store);
    let (heading, selected) = match status.and_then(TaskStatus::parse) {
        Some(s) => (
            format!("{} TASKS", s.as_str().to_uppercase()),
            collection::filter_by_status(&tasks, s),
        ),
        None => ("ALL TASKS".to_string(), tasks.iter().collect()),
    };

    if json_output {
        output::json::print(&output::json::success(json!({
            "tasks": output::json::task_list_json(&selected),
            "count": selected.len()
        })));
    } else {
        output::text::print_task_table(&heading, &selected);
        if status.is_none() {
            output::text::print_counts(&tasks);
        }
    }
    Ok(0)
}

fn run_show<S: TaskStore>(store: &S, id: &str, json_output: bool) -> Result<i32, TodoError> {
    let tasks = session::load(store);
    let task = collection::find_by_id(&tasks, id).ok_or_else(|| TodoError::task_not_found(id))?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_json(task)
        })));
    } else {
        output::text::print_task(task);
    }
    Ok(0)
}

/// Applies `f` to one task and saves the list. Returns the updated task.
fn update_task<S: TaskStore>(
    store: &S,
    id: &str,
    f: impl FnOnce(&mut Task),
) -> Result<Task, TodoError> {
    let mut tasks = session::load(store);
    let task = collection::find_by_id_mut(&mut tasks, id)
        .ok_or_else(|| TodoError::task_not_found(id))?;
    f(task);
    let updated = task.clone();
    session::save(store, &tasks)?;
    Ok(updated)
}

fn print_updated(task: &Task, json_output: bool) {
    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_json(task)
        })));
    } else {
        println!(
            "Task {} -> {}: {}",
            task.id().unwrap_or_default(),
            task.status(),
            task.title()
        );
    }
}

fn run_delete<S: TaskStore>(store: &S, id: &str, json_output: bool) -> Result<i32, TodoError> {
    let mut tasks = session::load(store);
    let removed = collection::delete(&mut tasks, id);
    if removed > 0 {
        session::save(store, &tasks)?;
    }

    if json_output {
        output::json::print(&output::json::success(json!({
            "id": id,
            "removed": removed
        })));
    } else if removed > 0 {
        println!("Removed task {id}");
    } else {
        println!("No task with ID {id}; nothing removed.");
    }
    Ok(0)
}

fn run_search<S: TaskStore>(store: &S, keyword: &str, json_output: bool) -> Result<i32, TodoError> {
    let tasks = session::load(store);
    let found = collection::search(&tasks, keyword);

    if json_output {
        output::json::print(&output::json::success(json!({
            "keyword": keyword,
            "tasks": output::json::task_list_json(&found),
            "count": found.len()
        })));
    } else {
        output::text::print_task_table(&format!("Search Results: '{}'", keyword.trim()), &found);
    }
    Ok(0)
}
