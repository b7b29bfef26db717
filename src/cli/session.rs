use tracing::{debug, warn};

use crate::collection;
use crate::error::TodoError;
use crate::models::Task;
use crate::storage::TaskStore;

/// Loads the list and repairs tasks whose stored ID was unusable or
/// duplicated.
pub fn load<S: TaskStore + ?Sized>(store: &S) -> Vec<Task> {
    let mut tasks = collection::from_records(&store.load());
    let repaired = collection::repair_ids(&mut tasks);
    if !repaired.is_empty() {
        warn!(ids = ?repaired, "assigned fresh IDs to tasks stored with a missing or duplicate one");
    }
    debug!(count = tasks.len(), "loaded tasks");
    tasks
}

pub fn save<S: TaskStore + ?Sized>(store: &S, tasks: &[Task]) -> Result<(), TodoError> {
    store.save(&collection::to_records(tasks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskRecord;
    use crate::storage::MemoryStore;

    #[test]
    fn load_assigns_ids_to_unusable_ones() {
        let store = MemoryStore::new(vec![
            TaskRecord {
                id: Some("2".into()),
                title: Some("ok".into()),
                ..TaskRecord::default()
            },
            TaskRecord {
                id: Some("x7".into()),
                title: Some("bad id".into()),
                ..TaskRecord::default()
            },
        ]);
        let tasks = load(&store);
        assert_eq!(tasks[0].id(), Some("2"));
        assert_eq!(tasks[1].id(), Some("3"));
    }

    #[test]
    fn load_gives_duplicate_ids_fresh_ones() {
        let record = |title: &str| TaskRecord {
            id: Some("1".into()),
            title: Some(title.into()),
            ..TaskRecord::default()
        };
        let store = MemoryStore::new(vec![record("first"), record("second")]);
        let mut tasks = load(&store);
        assert_eq!(tasks[0].id(), Some("1"));
        assert_eq!(tasks[1].id(), Some("2"));

        assert_eq!(collection::delete(&mut tasks, "1"), 1);
        assert_eq!(tasks[0].title(), "second");
    }

    #[test]
    fn save_then_load_keeps_tasks() {
        let store = MemoryStore::default();
        let mut tasks = Vec::new();
        collection::add(&mut tasks, "one", None, None, None);
        collection::add(&mut tasks, "two", Some("completed"), None, None);
        save(&store, &tasks).unwrap();
        assert_eq!(
            collection::to_records(&load(&store)),
            collection::to_records(&tasks)
        );
    }
}
