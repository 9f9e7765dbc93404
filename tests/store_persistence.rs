use chrono::NaiveDate;
use tdo::store::TodoStore;
use tdo::task::{Filter, LoadStatus, Task};

mod support;

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
}

fn task(id: &str, deadline: &str) -> Task {
    Task::new(id, format!("Task {id}"), "details", date(deadline))
}

#[test]
fn mutations_survive_a_reopen() {
    let home = support::TestHome::new();

    let mut store = TodoStore::open(home.storage());
    store.add_task(task("1", "2000-01-01")).expect("add 1");
    store.add_task(task("2", "2999-01-01")).expect("add 2");
    store.add_task(task("3", "2999-06-01")).expect("add 3");
    store.toggle_complete("2");
    store.set_filter(Filter::Incomplete);
    store
        .replace_order(&["3".to_string(), "1".to_string(), "2".to_string()])
        .expect("reorder");

    let reopened = TodoStore::open(home.storage());
    let ids: Vec<&str> = reopened.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["3", "1", "2"]);
    assert!(reopened.task_by_id("2").expect("task 2").completed);
    assert_eq!(reopened.filter(), Filter::Incomplete);
    assert_eq!(reopened.status(), LoadStatus::Idle);
}

#[test]
fn delete_survives_a_reopen() {
    let home = support::TestHome::new();

    let mut store = TodoStore::open(home.storage());
    store.add_task(task("keep", "2024-06-01")).expect("add");
    store.add_task(task("drop", "2024-06-01")).expect("add");
    assert!(store.delete_task("drop"));

    let reopened = TodoStore::open(home.storage());
    assert!(reopened.task_by_id("drop").is_none());
    assert!(reopened.task_by_id("keep").is_some());
}

#[test]
fn overdue_flags_are_persisted_consistently() {
    let home = support::TestHome::new();

    let mut store = TodoStore::open(home.storage());
    store.add_task(task("past", "2000-01-01")).expect("add");
    store.add_task(task("done", "2000-01-01")).expect("add");
    store.toggle_complete("done");
    store.set_overdue_for_all();

    let reopened = TodoStore::open(home.storage());
    for stored in reopened.tasks() {
        assert!(
            !(stored.overdue && stored.completed),
            "task {} persisted as both overdue and completed",
            stored.id
        );
    }
    assert!(reopened.task_by_id("past").expect("past").overdue);
}

#[test]
fn corrupt_snapshot_degrades_to_empty_store() {
    let home = support::TestHome::new();
    std::fs::create_dir_all(home.path()).expect("data dir");
    std::fs::write(home.state_file(), "{\"items\": [trailing garbage").expect("write");

    let store = TodoStore::open(home.storage());
    assert!(store.tasks().is_empty());

    // The store stays usable and the next mutation rewrites the slot.
    let mut store = store;
    store.add_task(task("fresh", "2024-06-01")).expect("add");
    let reopened = TodoStore::open(home.storage());
    assert_eq!(reopened.tasks().len(), 1);
}

#[test]
fn remote_load_success_is_mirrored() {
    let home = support::TestHome::new();

    let mut store = TodoStore::open(home.storage());
    store.add_task(task("local", "2024-06-01")).expect("add");
    store.begin_remote_load();
    store.remote_load_succeeded(vec![task("r1", "2024-06-01"), task("r2", "2024-07-01")]);

    let reopened = TodoStore::open(home.storage());
    let ids: Vec<&str> = reopened.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["r1", "r2"]);
}
