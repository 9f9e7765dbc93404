//! Remote loader: seeds the store from an HTTP task-list endpoint.
//!
//! The endpoint returns a JSON array of task records. The store is driven
//! through its discrete transitions; any transport error or non-success
//! status surfaces through `remote_load_failed` with the fixed fallback
//! message when nothing more specific is available. There is no retry and no
//! cancellation; a request that never completes leaves the status at
//! `loading`.

use crate::error::{Error, Result};
use crate::store::{TodoStore, REMOTE_LOAD_FALLBACK_MESSAGE};
use crate::task::Task;

/// Fetch the task list from `url`.
async fn fetch_tasks(url: &str) -> Result<Vec<Task>> {
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| Error::RemoteLoad(err.to_string()))?;

    if !response.status().is_success() {
        return Err(Error::RemoteLoad(format!(
            "{} ({})",
            REMOTE_LOAD_FALLBACK_MESSAGE,
            response.status()
        )));
    }

    response
        .json::<Vec<Task>>()
        .await
        .map_err(|err| Error::RemoteLoad(err.to_string()))
}

/// Run a remote load to completion, driving the store's status transitions.
///
/// Returns the number of fetched tasks, or the failure that was also recorded
/// on the store.
pub fn run_fetch(store: &mut TodoStore, url: &str) -> Result<usize> {
    store.begin_remote_load();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Error::OperationFailed(err.to_string()))?;

    match runtime.block_on(fetch_tasks(url)) {
        Ok(tasks) => {
            let count = tasks.len();
            store.remote_load_succeeded(tasks);
            Ok(count)
        }
        Err(err) => {
            let message = match &err {
                Error::RemoteLoad(message) => message.clone(),
                _ => REMOTE_LOAD_FALLBACK_MESSAGE.to_string(),
            };
            store.remote_load_failed(message);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use crate::task::LoadStatus;
    use tempfile::TempDir;

    #[test]
    fn unreachable_endpoint_records_failure() {
        let temp = TempDir::new().expect("tempdir");
        let storage = Storage::new(temp.path().to_path_buf());
        let mut store = TodoStore::open(storage);

        // Port 1 on localhost; nothing listens there.
        let result = run_fetch(&mut store, "http://127.0.0.1:1/api/todos");
        assert!(result.is_err());
        assert_eq!(store.status(), LoadStatus::Failed);
        assert!(store.last_error().is_some());
    }
}
