use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::session;
use crate::collection;
use crate::config::Settings;
use crate::models::{Task, TaskStatus};
use crate::output::text;
use crate::storage::{JsonFileStore, TaskStore};

pub fn run(settings: &Settings) -> i32 {
    let store = JsonFileStore::new(&settings.data_file);
    info!(path = %store.path().display(), "starting interactive menu");
    let stdin = io::stdin();
    match run_loop(&store, stdin.lock()) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}

/// Loads once, then saves after every menu action and again on exit.
/// End of input is treated like choosing Exit.
pub fn run_loop<S: TaskStore, R: BufRead>(store: &S, mut input: R) -> Result<()> {
    let mut tasks = session::load(store);

    loop {
        print_menu();
        let Some(choice) = prompt(&mut input, "Choose option: ")? else {
            break;
        };

        match choice.as_str() {
            "1" => handle_add(&mut tasks, &mut input)?,
            "2" => text::print_task_table("ALL TASKS", &tasks.iter().collect::<Vec<_>>()),
            "3" => handle_complete(&mut tasks, &mut input)?,
            "4" => handle_title(&mut tasks, &mut input)?,
            "5" => handle_status(&mut tasks, &mut input)?,
            "6" => handle_delete(&mut tasks, &mut input)?,
            "7" => show_status(&tasks, TaskStatus::Pending),
            "8" => show_status(&tasks, TaskStatus::InProgress),
            "9" => show_status(&tasks, TaskStatus::Completed),
            "10" => handle_search(&tasks, &mut input)?,
            "11" => handle_due_date(&mut tasks, &mut input)?,
            "12" => handle_reminder(&mut tasks, &mut input)?,
            "0" => break,
            _ => println!("Invalid option."),
        }

        persist(store, &tasks);
    }

    persist(store, &tasks);
    println!("Data saved. Goodbye!");
    Ok(())
}

fn print_menu() {
    println!();
    println!("======== TODO MANAGER ========");
    println!("1.  Add Task");
    println!("2.  List All Tasks");
    println!("3.  Mark as Completed");
    println!("4.  Update Task Title");
    println!("5.  Update Task Status");
    println!("6.  Delete Task");
    println!("------------------------------");
    println!("7.  View Pending");
    println!("8.  View In-Progress");
    println!("9.  View Completed");
    println!("10. Search Tasks");
    println!("11. Set Due Date");
    println!("12. Set Reminder");
    println!("0.  Exit");
    println!("==============================");
}

/// Returns the trimmed line, or `None` at end of input.
fn prompt<R: BufRead>(input: &mut R, label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush().context("flush stdout")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("read from stdin")?;
    if read == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt_or_empty<R: BufRead>(input: &mut R, label: &str) -> Result<String> {
    Ok(prompt(input, label)?.unwrap_or_default())
}

fn optional(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn persist<S: TaskStore>(store: &S, tasks: &[Task]) {
    if let Err(e) = session::save(store, tasks) {
        warn!(error = %e, "saving tasks failed");
        eprintln!("Warning: tasks not saved: {}", e.message);
    }
}

fn with_task<'a, R: BufRead>(
    tasks: &'a mut [Task],
    input: &mut R,
    label: &str,
) -> Result<Option<&'a mut Task>> {
    let id = prompt_or_empty(input, label)?;
    let task = collection::find_by_id_mut(tasks, &id);
    if task.is_none() {
        println!("Error: Task not found.");
    }
    Ok(task)
}

fn handle_add<R: BufRead>(tasks: &mut Vec<Task>, input: &mut R) -> Result<()> {
    println!();
    println!("[ ADD NEW TASK ]");
    let title = prompt_or_empty(input, "Enter title: ")?;
    let due = prompt_or_empty(input, "Enter due date (YYYY-MM-DD) [optional]: ")?;
    let reminder = prompt_or_empty(input, "Enter reminder time [optional]: ")?;

    let task = collection::add(tasks, &title, None, optional(due), optional(reminder));
    println!("Added task {}: {}", task.id().unwrap_or_default(), task.title());
    Ok(())
}

fn handle_complete<R: BufRead>(tasks: &mut [Task], input: &mut R) -> Result<()> {
    if let Some(task) = with_task(tasks, input, "ID of task to complete: ")? {
        task.mark_completed();
        println!("Task marked as done.");
    }
    Ok(())
}

fn handle_title<R: BufRead>(tasks: &mut [Task], input: &mut R) -> Result<()> {
    if let Some(task) = with_task(tasks, input, "ID to update title: ")? {
        let title = prompt_or_empty(input, "New title: ")?;
        task.update_title(&title);
        println!("Title updated: {}", task.title());
    }
    Ok(())
}

fn handle_status<R: BufRead>(tasks: &mut [Task], input: &mut R) -> Result<()> {
    let Some(task) = with_task(tasks, input, "Enter Task ID to update status: ")? else {
        return Ok(());
    };

    println!();
    println!("Select New Status:");
    for (n, status) in TaskStatus::ALL.iter().enumerate() {
        println!("{}. {status}", n + 1);
    }
    let choice = prompt_or_empty(input, "Choice: ")?;
    let selected = choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|n| TaskStatus::ALL.get(n).copied());

    match selected {
        Some(status) => {
            task.set_status(status);
            println!("Success: Status updated to {status}.");
        }
        None => println!("Skipped: Invalid selection."),
    }
    Ok(())
}

fn handle_delete<R: BufRead>(tasks: &mut Vec<Task>, input: &mut R) -> Result<()> {
    let id = prompt_or_empty(input, "ID to delete: ")?;
    if collection::delete(tasks, &id) > 0 {
        println!("Task removed.");
    } else {
        println!("No task with that ID.");
    }
    Ok(())
}

fn handle_due_date<R: BufRead>(tasks: &mut [Task], input: &mut R) -> Result<()> {
    if let Some(task) = with_task(tasks, input, "ID to set due date: ")? {
        let due = prompt_or_empty(input, "Due date (empty clears): ")?;
        task.set_due_date(optional(due));
        println!("Due date updated.");
    }
    Ok(())
}

fn handle_reminder<R: BufRead>(tasks: &mut [Task], input: &mut R) -> Result<()> {
    if let Some(task) = with_task(tasks, input, "ID to set reminder: ")? {
        let reminder = prompt_or_empty(input, "Reminder time (empty clears): ")?;
        task.set_reminder_time(optional(reminder));
        println!("Reminder updated.");
    }
    Ok(())
}

fn show_status(tasks: &[Task], status: TaskStatus) {
    let heading = format!("{} TASKS", status.as_str().to_uppercase());
    text::print_task_table(&heading, &collection::filter_by_status(tasks, status));
}

fn handle_search<R: BufRead>(tasks: &[Task], input: &mut R) -> Result<()> {
    let keyword = prompt_or_empty(input, "Search keyword: ")?;
    let found = collection::search(tasks, &keyword);
    text::print_task_table(&format!("Search Results: '{keyword}'"), &found);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn drive(store: &MemoryStore, script: &str) {
        run_loop(store, script.as_bytes()).unwrap();
    }

    #[test]
    fn add_and_complete_through_menu() {
        let store = MemoryStore::default();
        drive(&store, "1\nBuy Milk\n2025-01-01\n\n3\n1\n0\n");

        let tasks = session::load(&store);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title(), "Buy Milk");
        assert_eq!(tasks[0].due_date(), Some("2025-01-01"));
        assert_eq!(tasks[0].reminder_time(), None);
        assert!(tasks[0].is_completed());
    }

    #[test]
    fn status_submenu_and_invalid_choice() {
        let store = MemoryStore::default();
        drive(&store, "1\na\n\n\n5\n1\n2\n1\nb\n\n\n5\n2\n7\n");

        let tasks = session::load(&store);
        assert_eq!(tasks[0].status(), TaskStatus::InProgress);
        assert_eq!(tasks[1].status(), TaskStatus::Pending);
    }

    #[test]
    fn delete_and_rename() {
        let store = MemoryStore::default();
        drive(&store, "1\na\n\n\n1\nb\n\n\n6\n1\n4\n2\n  Renamed \n0\n");

        let tasks = session::load(&store);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id(), Some("2"));
        assert_eq!(tasks[0].title(), "Renamed");
    }

    #[test]
    fn end_of_input_saves_and_exits() {
        let store = MemoryStore::default();
        drive(&store, "1\n\n");

        let tasks = session::load(&store);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title(), crate::models::DEFAULT_TITLE);
    }

    #[test]
    fn unknown_id_leaves_tasks_alone() {
        let store = MemoryStore::default();
        drive(&store, "1\na\n\n\n3\n42\n11\n42\n99\n");

        let tasks = session::load(&store);
        assert_eq!(tasks.len(), 1);
        assert!(!tasks[0].is_completed());
    }
}
