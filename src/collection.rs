//! Operations over the in-memory task list.
//!
//! The list is always passed in explicitly. Taking `&mut Vec<Task>` in
//! [`add`] makes ID assignment and append a single exclusive step; callers
//! sharing a list across threads must wrap it in a lock and hold it for the
//! whole call.

use std::collections::{BTreeSet, HashSet};

use crate::models::{Task, TaskInit, TaskRecord, TaskStatus};

/// One past the highest numeric ID in `tasks`, or 1 if there is none.
/// When the highest ID is `u64::MAX`, the smallest unused ID is returned.
pub fn next_id(tasks: &[Task]) -> u64 {
    let ids: BTreeSet<u64> = tasks
        .iter()
        .filter_map(|t| t.id()?.parse::<u64>().ok())
        .collect();
    match ids.last() {
        None => 1,
        Some(max) => max
            .checked_add(1)
            .or_else(|| (1..=u64::MAX).find(|n| !ids.contains(n)))
            .unwrap_or(1),
    }
}

pub fn add<'a>(
    tasks: &'a mut Vec<Task>,
    title: &str,
    status: Option<&str>,
    due_date: Option<String>,
    reminder_time: Option<String>,
) -> &'a mut Task {
    let mut task = Task::new(TaskInit {
        status: status.map(str::to_string),
        due_date,
        reminder_time,
        ..TaskInit::titled(title)
    });
    task.assign_id(next_id(tasks));
    tasks.push(task);
    let last = tasks.len() - 1;
    &mut tasks[last]
}

pub fn find_by_id<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id() == Some(id))
}

pub fn find_by_id_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    tasks.iter_mut().find(|t| t.id() == Some(id))
}

/// Removes every task with the given ID and returns how many were removed.
/// An unknown ID leaves the list untouched.
pub fn delete(tasks: &mut Vec<Task>, id: &str) -> usize {
    let before = tasks.len();
    tasks.retain(|t| t.id() != Some(id));
    before - tasks.len()
}

pub fn filter_by_status(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status() == status).collect()
}

/// Case-insensitive substring match on titles. A blank keyword matches
/// nothing.
pub fn search<'a>(tasks: &'a [Task], keyword: &str) -> Vec<&'a Task> {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    tasks
        .iter()
        .filter(|t| t.title().to_lowercase().contains(&needle))
        .collect()
}

/// Gives a fresh ID to every task that lost its ID during loading or
/// repeats an ID seen earlier in the list. Returns the IDs assigned, in
/// list order.
pub fn repair_ids(tasks: &mut [Task]) -> Vec<u64> {
    let mut seen = HashSet::new();
    let mut assigned = Vec::new();
    for i in 0..tasks.len() {
        let needs_id = match tasks[i].id() {
            Some(id) => !seen.insert(id.to_string()),
            None => true,
        };
        if needs_id {
            let id = next_id(tasks);
            tasks[i].assign_id(id);
            seen.insert(id.to_string());
            assigned.push(id);
        }
    }
    assigned
}

pub fn from_records(records: &[TaskRecord]) -> Vec<Task> {
    records.iter().map(Task::from_record).collect()
}

pub fn to_records(tasks: &[Task]) -> Vec<TaskRecord> {
    tasks.iter().map(Task::to_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ids(ids: &[&str]) -> Vec<Task> {
        ids.iter()
            .map(|id| {
                Task::new(TaskInit {
                    id: Some((*id).to_string()),
                    ..TaskInit::titled(format!("task {id}"))
                })
            })
            .collect()
    }

    fn ids(tasks: &[Task]) -> Vec<String> {
        tasks.iter().filter_map(|t| t.id().map(str::to_string)).collect()
    }

    #[test]
    fn next_id_on_empty_is_one() {
        assert_eq!(next_id(&[]), 1);
    }

    #[test]
    fn next_id_is_max_plus_one() {
        assert_eq!(next_id(&with_ids(&["1", "2", "5"])), 6);
        assert_eq!(next_id(&with_ids(&["5", "1"])), 6);
    }

    #[test]
    fn next_id_skips_tasks_without_id() {
        let tasks = vec![Task::new(TaskInit::titled("no id"))];
        assert_eq!(next_id(&tasks), 1);
    }

    #[test]
    fn sequential_adds_get_one_to_n() {
        let mut tasks = Vec::new();
        for i in 0..5 {
            add(&mut tasks, &format!("t{i}"), None, None, None);
        }
        assert_eq!(ids(&tasks), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn add_after_delete_does_not_reuse_highest() {
        let mut tasks = Vec::new();
        add(&mut tasks, "a", None, None, None);
        add(&mut tasks, "b", None, None, None);
        add(&mut tasks, "c", None, None, None);
        delete(&mut tasks, "2");
        let task = add(&mut tasks, "d", None, None, None);
        assert_eq!(task.id(), Some("4"));
    }

    #[test]
    fn add_with_empty_title_uses_default() {
        let mut tasks = Vec::new();
        let task = add(&mut tasks, "", None, None, None);
        assert_eq!(task.title(), crate::models::DEFAULT_TITLE);
    }

    #[test]
    fn add_passes_optional_fields_through() {
        let mut tasks = Vec::new();
        let task = add(
            &mut tasks,
            "Pay rent",
            Some("in-progress"),
            Some("2025-02-01".into()),
            Some("08:00".into()),
        );
        assert_eq!(task.status(), TaskStatus::InProgress);
        assert_eq!(task.due_date(), Some("2025-02-01"));
        assert_eq!(task.reminder_time(), Some("08:00"));
    }

    #[test]
    fn find_by_id_exact_match() {
        let tasks = with_ids(&["1", "10"]);
        assert_eq!(find_by_id(&tasks, "10").unwrap().title(), "task 10");
        assert!(find_by_id(&tasks, "0").is_none());
        assert!(find_by_id(&tasks, " 1").is_none());
    }

    #[test]
    fn find_by_id_mut_allows_update() {
        let mut tasks = with_ids(&["1"]);
        find_by_id_mut(&mut tasks, "1").unwrap().mark_completed();
        assert!(tasks[0].is_completed());
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let mut tasks = with_ids(&["1", "2", "3"]);
        let before = tasks.clone();
        assert_eq!(delete(&mut tasks, "9"), 0);
        assert_eq!(tasks, before);
    }

    #[test]
    fn delete_removes_match_and_keeps_order() {
        let mut tasks = with_ids(&["1", "2", "3"]);
        assert_eq!(delete(&mut tasks, "2"), 1);
        assert_eq!(ids(&tasks), vec!["1", "3"]);
    }

    #[test]
    fn filter_by_status_partitions() {
        let mut tasks = Vec::new();
        add(&mut tasks, "a", None, None, None);
        add(&mut tasks, "b", Some("in-progress"), None, None);
        add(&mut tasks, "c", Some("completed"), None, None);
        add(&mut tasks, "d", Some("nonsense"), None, None);
        add(&mut tasks, "e", Some("completed"), None, None);

        let mut seen: Vec<&str> = TaskStatus::ALL
            .iter()
            .flat_map(|s| filter_by_status(&tasks, *s))
            .filter_map(|t| t.id())
            .collect();
        seen.sort();
        assert_eq!(seen, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(filter_by_status(&tasks, TaskStatus::Pending).len(), 2);
        assert_eq!(filter_by_status(&tasks, TaskStatus::InProgress).len(), 1);
        assert_eq!(filter_by_status(&tasks, TaskStatus::Completed).len(), 2);
        assert!(filter_by_status(&[], TaskStatus::Pending).is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut tasks = Vec::new();
        add(&mut tasks, "Buy Milk", None, None, None);
        add(&mut tasks, "Walk dog", None, None, None);
        let found = search(&tasks, "milk");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title(), "Buy Milk");
        assert_eq!(search(&tasks, "  MILK ").len(), 1);
    }

    #[test]
    fn search_blank_keyword_or_empty_list_is_empty() {
        let mut tasks = Vec::new();
        add(&mut tasks, "Buy Milk", None, None, None);
        assert!(search(&tasks, "").is_empty());
        assert!(search(&tasks, "   ").is_empty());
        assert!(search(&[], "foo").is_empty());
        assert!(search(&tasks, "bread").is_empty());
    }

    #[test]
    fn next_id_at_u64_max_falls_back_to_smallest_unused() {
        let max = u64::MAX.to_string();
        let mut tasks = with_ids(&[max.as_str(), "1"]);
        assert_eq!(next_id(&tasks), 2);

        add(&mut tasks, "a", None, None, None);
        add(&mut tasks, "b", None, None, None);
        assert_eq!(ids(&tasks), vec![max.as_str(), "1", "2", "3"]);
    }

    #[test]
    fn repair_ids_replaces_duplicates() {
        let mut tasks = with_ids(&["1", "2", "1", "2"]);
        let assigned = repair_ids(&mut tasks);
        assert_eq!(assigned, vec![3, 4]);
        assert_eq!(ids(&tasks), vec!["1", "2", "3", "4"]);
        assert_eq!(delete(&mut tasks, "1"), 1);
    }

    #[test]
    fn repair_ids_continues_after_max() {
        let mut tasks = with_ids(&["3", "bad", "1", ""]);
        let assigned = repair_ids(&mut tasks);
        assert_eq!(assigned, vec![4, 5]);
        assert_eq!(ids(&tasks), vec!["3", "4", "1", "5"]);
    }

    #[test]
    fn records_round_trip() {
        let mut tasks = Vec::new();
        add(&mut tasks, "a", None, Some("tomorrow".into()), None);
        add(&mut tasks, "b", Some("completed"), None, None);
        let records = to_records(&tasks);
        assert_eq!(to_records(&from_records(&records)), records);
    }
}
