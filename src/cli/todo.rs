//! tdo command implementations.

use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::remote;
use crate::storage::Storage;
use crate::store::TodoStore;
use crate::task::{parse_deadline, Filter, Task};

/// Shared per-invocation context: resolved storage, config, output options.
pub struct Context {
    pub storage: Storage,
    pub config: Config,
    pub options: OutputOptions,
}

impl Context {
    pub fn resolve(data_dir: Option<PathBuf>, json: bool, quiet: bool) -> Result<Self> {
        let storage = Storage::resolve(data_dir)?;
        let config = Config::load_from_file(&storage.config_file())?;
        // The config may redirect where the snapshot lives.
        let storage = match &config.storage.dir {
            Some(dir) => Storage::new(dir.clone()),
            None => storage,
        };
        Ok(Self {
            storage,
            config,
            options: OutputOptions { json, quiet },
        })
    }

    fn open_store(&self) -> TodoStore {
        TodoStore::open(self.storage.clone())
    }
}

pub struct AddOptions {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub id: Option<String>,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<String>,
}

#[derive(Serialize)]
struct ListData<'a> {
    filter: &'a str,
    count: usize,
    tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
struct MutationData<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<bool>,
}

#[derive(Serialize)]
struct FetchData {
    status: &'static str,
    count: usize,
}

pub fn run_add(context: Context, options: AddOptions) -> Result<()> {
    let deadline = parse_deadline(&options.deadline)?;
    let id = match options.id {
        Some(id) => id,
        None => Uuid::new_v4().to_string(),
    };
    let task = Task::new(id, options.title, options.description, deadline);
    task.validate()?;

    let mut store = context.open_store();
    store.add_task(task.clone())?;

    let mut human = HumanOutput::new(format!("Added task {}", short_id(&task.id)));
    human.push_summary("title", &task.title);
    human.push_summary("deadline", task.deadline.to_string());
    human.push_summary("id", &task.id);
    emit_success(context.options, "add", &task, Some(&human))
}

pub fn run_list(context: Context, filter: Option<String>) -> Result<()> {
    let mut store = context.open_store();
    store.set_overdue_for_all();
    if let Some(raw) = filter {
        store.set_filter(raw.parse::<Filter>()?);
    }

    let filter = store.filter();
    let tasks = store.filtered_tasks();

    let mut human = HumanOutput::new(format!(
        "{} task(s), filter: {}",
        tasks.len(),
        filter.as_str()
    ));
    for task in &tasks {
        human.push_detail(format_row(task));
    }

    let data = ListData {
        filter: filter.as_str(),
        count: tasks.len(),
        tasks,
    };
    emit_success(context.options, "list", &data, Some(&human))
}

pub fn run_show(context: Context, id: &str) -> Result<()> {
    let mut store = context.open_store();
    store.set_overdue_for_all();

    let task = store
        .task_by_id(id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

    let mut human = HumanOutput::new(task.title.clone());
    human.push_summary("id", &task.id);
    human.push_summary("deadline", task.deadline.to_string());
    human.push_summary("completed", if task.completed { "yes" } else { "no" });
    human.push_summary("overdue", if task.overdue { "yes" } else { "no" });
    human.push_detail(task.description.clone());
    emit_success(context.options, "show", task, Some(&human))
}

pub fn run_done(context: Context, id: &str) -> Result<()> {
    let mut store = context.open_store();
    if !store.toggle_complete(id) {
        return Err(Error::TaskNotFound(id.to_string()));
    }

    let completed = store
        .task_by_id(id)
        .map(|task| task.completed)
        .unwrap_or_default();
    let header = if completed {
        format!("Completed task {}", short_id(id))
    } else {
        format!("Reopened task {}", short_id(id))
    };
    let human = HumanOutput::new(header);
    let data = MutationData {
        id,
        completed: Some(completed),
    };
    emit_success(context.options, "done", &data, Some(&human))
}

pub fn run_edit(context: Context, options: EditOptions) -> Result<()> {
    if options.title.is_none() && options.description.is_none() && options.deadline.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to edit (pass --title, --desc, or --deadline)".to_string(),
        ));
    }

    let mut store = context.open_store();
    let current = store
        .task_by_id(&options.id)
        .ok_or_else(|| Error::TaskNotFound(options.id.clone()))?
        .clone();

    let mut updated = current;
    if let Some(title) = options.title {
        updated.title = title;
    }
    if let Some(description) = options.description {
        updated.description = description;
    }
    if let Some(deadline) = options.deadline {
        updated.deadline = parse_deadline(&deadline)?;
    }

    if !store.edit_task(updated.clone())? {
        return Err(Error::TaskNotFound(options.id));
    }

    let mut human = HumanOutput::new(format!("Updated task {}", short_id(&updated.id)));
    human.push_summary("title", &updated.title);
    human.push_summary("deadline", updated.deadline.to_string());
    emit_success(context.options, "edit", &updated, Some(&human))
}

pub fn run_rm(context: Context, id: &str) -> Result<()> {
    let mut store = context.open_store();
    if !store.delete_task(id) {
        return Err(Error::TaskNotFound(id.to_string()));
    }

    let human = HumanOutput::new(format!("Deleted task {}", short_id(id)));
    let data = MutationData {
        id,
        completed: None,
    };
    emit_success(context.options, "rm", &data, Some(&human))
}

pub fn run_move(context: Context, id: &str, to: usize) -> Result<()> {
    let mut store = context.open_store();
    if store.task_by_id(id).is_none() {
        return Err(Error::TaskNotFound(id.to_string()));
    }

    // Build the full permutation locally; the store validates it wholesale.
    let mut ids: Vec<String> = store.tasks().iter().map(|task| task.id.clone()).collect();
    let from = ids
        .iter()
        .position(|current| current == id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    let moved = ids.remove(from);
    let target = to.saturating_sub(1).min(ids.len());
    ids.insert(target, moved);
    store.replace_order(&ids)?;

    let mut human = HumanOutput::new(format!("Moved task {}", short_id(id)));
    human.push_summary("position", (target + 1).to_string());
    let data = MutationData {
        id,
        completed: None,
    };
    emit_success(context.options, "move", &data, Some(&human))
}

pub fn run_filter(context: Context, value: &str) -> Result<()> {
    let filter = value.parse::<Filter>()?;
    let mut store = context.open_store();
    store.set_filter(filter);

    let human = HumanOutput::new(format!("Filter set to {}", filter.as_str()));
    #[derive(Serialize)]
    struct FilterData<'a> {
        filter: &'a str,
    }
    emit_success(
        context.options,
        "filter",
        &FilterData {
            filter: filter.as_str(),
        },
        Some(&human),
    )
}

pub fn run_fetch(context: Context, url: Option<&str>) -> Result<()> {
    let url = context.config.remote_url(url).ok_or_else(|| {
        Error::InvalidArgument(
            "no remote endpoint (pass --url, set TDO_REMOTE_URL, or configure remote.url)"
                .to_string(),
        )
    })?;

    let mut store = context.open_store();
    let count = remote::run_fetch(&mut store, &url)?;

    let mut human = HumanOutput::new(format!("Fetched {count} task(s)"));
    human.push_summary("endpoint", &url);
    let data = FetchData {
        status: "succeeded",
        count,
    };
    emit_success(context.options, "fetch", &data, Some(&human))
}

pub fn run_view(context: Context) -> Result<()> {
    let store = context.open_store();
    crate::ui::viewer::run(store, context.storage)
}

fn short_id(id: &str) -> &str {
    let end = id
        .char_indices()
        .nth(8)
        .map(|(index, _)| index)
        .unwrap_or(id.len());
    &id[..end]
}

fn format_row(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut row = format!(
        "[{mark}] {}  {}  due {}",
        short_id(&task.id),
        task.title,
        task.deadline
    );
    if task.overdue {
        row.push_str("  OVERDUE");
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates_uuids_only() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("0123456789abcdef"), "01234567");
    }

    #[test]
    fn format_row_marks_state() {
        let mut task = Task::new(
            "0123456789",
            "Write report",
            "d",
            crate::task::parse_deadline("2024-06-01").unwrap(),
        );
        task.overdue = true;
        let row = format_row(&task);
        assert!(row.contains("[ ]"));
        assert!(row.contains("Write report"));
        assert!(row.ends_with("OVERDUE"));

        task.overdue = false;
        task.completed = true;
        assert!(format_row(&task).contains("[x]"));
    }
}
