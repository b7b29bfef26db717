use crate::models::{format_timestamp, Task, TaskStatus};

const RULE_WIDTH: usize = 60;

pub fn print_header(title: &str) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("{:^width$}", title, width = RULE_WIDTH);
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub fn print_task(t: &Task) {
    println!("Task: {} ({})", t.title(), t.id().unwrap_or("-"));
    println!("  Status: {}", t.status());
    println!("  Created: {}", format_timestamp(&t.created_at()));
    if let Some(due) = t.due_date() {
        println!("  Due: {due}");
    }
    if let Some(reminder) = t.reminder_time() {
        println!("  Reminder: {reminder}");
    }
    if let Some(ref completed) = t.completed_at() {
        println!("  Completed: {}", format_timestamp(completed));
    }
}

/// ID / status / title / due-date table under a centered heading.
pub fn print_task_table(heading: &str, tasks: &[&Task]) {
    print_header(heading);
    if tasks.is_empty() {
        println!("No tasks found in this section.");
        return;
    }
    println!("{:<10} {:<15} {:<20} {:<12}", "ID", "Status", "Title", "Due Date");
    println!("{}", "-".repeat(RULE_WIDTH));
    for t in tasks {
        println!(
            "{:<10} {:<15} {:<20} {:<12}",
            t.id().unwrap_or("-"),
            t.status().as_str(),
            t.title(),
            t.due_date().unwrap_or("---")
        );
    }
    println!("{}", "-".repeat(RULE_WIDTH));
}

pub fn print_counts(tasks: &[Task]) {
    let counts: Vec<String> = TaskStatus::ALL
        .iter()
        .map(|s| {
            let n = tasks.iter().filter(|t| t.status() == *s).count();
            format!("{s}={n}")
        })
        .collect();
    println!("Total: {} ({})", tasks.len(), counts.join(" "));
}
