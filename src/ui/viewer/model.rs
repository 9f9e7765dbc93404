//! View-model helpers for the viewer: which rows are visible and where the
//! selection lands after the list changes underneath it.

use crate::task::{Filter, Task};

/// Indices into the full task list that the current filter lets through,
/// in stored order.
pub fn visible_indices(tasks: &[Task], filter: Filter) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| filter.matches(task))
        .map(|(index, _)| index)
        .collect()
}

/// Keep the selection inside the visible range, dropping it when the list is
/// empty.
pub fn clamp_selection(selected: Option<usize>, visible_len: usize) -> Option<usize> {
    if visible_len == 0 {
        return None;
    }
    Some(selected.unwrap_or(0).min(visible_len - 1))
}

/// Move the selection by `delta`, saturating at the ends.
pub fn step_selection(selected: Option<usize>, visible_len: usize, delta: isize) -> Option<usize> {
    let current = clamp_selection(selected, visible_len)?;
    let stepped = current.saturating_add_signed(delta).min(visible_len - 1);
    Some(stepped)
}

/// After moving task `id`, find where the selection should follow it to.
pub fn selection_for_id(tasks: &[Task], filter: Filter, id: &str) -> Option<usize> {
    visible_indices(tasks, filter)
        .iter()
        .position(|&index| tasks[index].id == id)
}
