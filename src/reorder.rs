//! Drag-and-drop reordering.
//!
//! A board is a single task sequence; a column is every task in it with a
//! given status, in sequence order. A drag is three events: `start` records
//! the dragged task, `over` only reports whether a drop is allowed, and
//! `drop` moves the task:
//!
//! 1. the dragged task is removed from the sequence,
//! 2. its status becomes the destination column,
//! 3. with a target that is still in the sequence, it is inserted right
//!    before the target,
//! 4. otherwise it goes right after the last task of the destination column,
//!    or at the very end when that column is empty,
//! 5. the session is cleared.
//!
//! Dropping a task onto itself takes the fallback in step 4, since the
//! target has already been removed.
//!
//! Every task also carries a `rank`. After a drop the moved task gets a rank
//! between its neighbours in the destination column; when no integer fits,
//! the column is renumbered. The tasks reported in `DropOutcome::changed` are
//! exactly the ones that must be persisted.

use crate::fields::Status;
use crate::task::Task;

/// Spacing between consecutive ranks after a renumber and at column ends.
pub const RANK_STEP: i64 = 1024;

/// Result of a completed drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropOutcome {
    /// Final index of the dragged task in the sequence.
    pub index: usize,
    /// Ids of every task whose status or rank changed, dragged task first.
    pub changed: Vec<String>,
}

/// Drag state for one board.
#[derive(Debug, Default, Clone)]
pub struct DragSession {
    active: Option<String>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// drag-start: remember which task is being carried.
    pub fn start(&mut self, task_id: impl Into<String>) {
        self.active = Some(task_id.into());
    }

    /// Id of the task being carried, if any.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// drag-over: no state change. Any column accepts a drop while a drag is active.
    pub fn over(&self, _column: Status) -> bool {
        self.active.is_some()
    }

    /// Abandon the drag without touching any sequence.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// drop: move the carried task into `column`, before `target` when given.
    ///
    /// Returns `None` without mutating `tasks` when nothing is being dragged or
    /// the dragged id is not in the sequence. The session is cleared either way.
    pub fn drop(
        &mut self,
        tasks: &mut Vec<Task>,
        column: Status,
        target: Option<&str>,
    ) -> Option<DropOutcome> {
        let dragged = self.active.take()?;
        move_task(tasks, &dragged, column, target)
    }
}

/// Index just past the last task with `status`, or the sequence length if there is none.
pub fn column_tail(tasks: &[Task], status: Status) -> usize {
    tasks
        .iter()
        .rposition(|t| t.status == status)
        .map(|i| i + 1)
        .unwrap_or(tasks.len())
}

/// Move `dragged_id` into `column`, before `target` if it is present.
pub fn move_task(
    tasks: &mut Vec<Task>,
    dragged_id: &str,
    column: Status,
    target: Option<&str>,
) -> Option<DropOutcome> {
    let from = tasks.iter().position(|t| t.id == dragged_id)?;
    let mut dragged = tasks.remove(from);
    dragged.status = column;

    let index = target
        .and_then(|id| tasks.iter().position(|t| t.id == id))
        .unwrap_or_else(|| column_tail(tasks, column));
    tasks.insert(index, dragged);

    let mut changed = vec![dragged_id.to_string()];
    for id in rank_at(tasks, index) {
        if id != dragged_id {
            changed.push(id);
        }
    }
    Some(DropOutcome { index, changed })
}

/// Give `tasks[index]` a rank that sorts between its column neighbours.
/// Returns the ids of tasks whose rank changed.
fn rank_at(tasks: &mut [Task], index: usize) -> Vec<String> {
    let status = tasks[index].status;
    let prev = tasks[..index]
        .iter()
        .rev()
        .find(|t| t.status == status)
        .map(|t| t.rank);
    let next = tasks[index + 1..]
        .iter()
        .find(|t| t.status == status)
        .map(|t| t.rank);

    let rank = match (prev, next) {
        (None, None) => Some(RANK_STEP),
        (Some(p), None) => p.checked_add(RANK_STEP),
        (None, Some(n)) => n.checked_sub(RANK_STEP),
        (Some(p), Some(n)) => n
            .checked_sub(p)
            .filter(|gap| *gap >= 2)
            .map(|gap| p + gap / 2),
    };

    match rank {
        Some(rank) => {
            tasks[index].rank = rank;
            vec![tasks[index].id.clone()]
        }
        None => renumber_column(tasks, status),
    }
}

/// Reassign ranks `RANK_STEP, 2*RANK_STEP, ...` to a column in sequence order.
/// Returns the ids of tasks whose rank changed.
pub fn renumber_column(tasks: &mut [Task], status: Status) -> Vec<String> {
    let mut changed = Vec::new();
    let mut rank = 0;
    for task in tasks.iter_mut().filter(|t| t.status == status) {
        rank += RANK_STEP;
        if task.rank != rank {
            task.rank = rank;
            changed.push(task.id.clone());
        }
    }
    changed
}

/// Rank for a task appended to the end of a column holding `ranks`.
pub fn tail_rank(ranks: impl IntoIterator<Item = i64>) -> i64 {
    ranks
        .into_iter()
        .max()
        .map(|max| max.saturating_add(RANK_STEP))
        .unwrap_or(RANK_STEP)
}

/// Sort into board order: column order first, then rank. The sort is stable,
/// so equal ranks keep their sequence order.
pub fn sort_board(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| (t.status.column_index(), t.rank));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;

    fn task(id: &str, status: Status, rank: i64) -> Task {
        let mut draft = TaskDraft::new("p", id);
        draft.status = status;
        draft.into_task(id.to_string(), rank)
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    /// a, b pending; c, d in progress; e complete.
    fn board() -> Vec<Task> {
        vec![
            task("a", Status::Pending, 1024),
            task("b", Status::Pending, 2048),
            task("c", Status::InProgress, 1024),
            task("d", Status::InProgress, 2048),
            task("e", Status::Complete, 1024),
        ]
    }

    fn column_ranks_ascend(tasks: &[Task], status: Status) -> bool {
        let ranks: Vec<i64> = tasks.iter().filter(|t| t.status == status).map(|t| t.rank).collect();
        ranks.windows(2).all(|w| w[0] < w[1])
    }

    #[test]
    fn test_drop_before_target() {
        let mut tasks = board();
        let mut session = DragSession::new();
        session.start("a");
        assert!(session.over(Status::InProgress));

        let outcome = session.drop(&mut tasks, Status::InProgress, Some("d")).unwrap();
        assert_eq!(ids(&tasks), vec!["b", "c", "a", "d", "e"]);
        assert_eq!(outcome.index, 2);
        assert_eq!(tasks[outcome.index + 1].id, "d");
        assert_eq!(tasks[2].status, Status::InProgress);
        assert_eq!(tasks[2].rank, 1536);
        assert_eq!(outcome.changed, vec!["a".to_string()]);
        assert!(!session.is_dragging());
    }

    #[test]
    fn test_drop_on_column_appends_after_last_in_column() {
        let mut tasks = board();
        let mut session = DragSession::new();
        session.start("e");

        let outcome = session.drop(&mut tasks, Status::Pending, None).unwrap();
        assert_eq!(ids(&tasks), vec!["a", "b", "e", "c", "d"]);
        assert_eq!(outcome.index, 2);
        assert_eq!(tasks[2].status, Status::Pending);
        assert_eq!(tasks[2].rank, 3072);
        assert!(column_ranks_ascend(&tasks, Status::Pending));
    }

    #[test]
    fn test_drop_on_empty_column_goes_to_end() {
        let mut tasks = board();
        tasks.retain(|t| t.status != Status::Complete);
        let mut session = DragSession::new();
        session.start("a");

        let outcome = session.drop(&mut tasks, Status::Complete, None).unwrap();
        assert_eq!(outcome.index, tasks.len() - 1);
        let last = tasks.last().unwrap();
        assert_eq!(last.id, "a");
        assert_eq!(last.status, Status::Complete);
        assert_eq!(tasks.iter().filter(|t| t.status == Status::Complete).count(), 1);
    }

    #[test]
    fn test_drop_onto_itself_falls_back_to_column_tail() {
        let mut tasks = board();
        let mut session = DragSession::new();
        session.start("c");

        let outcome = session.drop(&mut tasks, Status::InProgress, Some("c")).unwrap();
        assert_eq!(ids(&tasks), vec!["a", "b", "d", "c", "e"]);
        assert_eq!(outcome.index, 3);
        assert!(column_ranks_ascend(&tasks, Status::InProgress));
    }

    #[test]
    fn test_unknown_target_falls_back_to_column_tail() {
        let mut tasks = board();
        let mut session = DragSession::new();
        session.start("a");

        session.drop(&mut tasks, Status::InProgress, Some("nope")).unwrap();
        assert_eq!(ids(&tasks), vec!["b", "c", "d", "a", "e"]);
    }

    #[test]
    fn test_drop_without_drag_is_noop() {
        let mut tasks = board();
        let before = tasks.clone();
        let mut session = DragSession::new();
        assert!(!session.over(Status::Pending));
        assert!(session.drop(&mut tasks, Status::Pending, None).is_none());
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_drop_of_missing_task_clears_session() {
        let mut tasks = board();
        let mut session = DragSession::new();
        session.start("ghost");
        assert!(session.drop(&mut tasks, Status::Pending, None).is_none());
        assert!(!session.is_dragging());
        assert_eq!(tasks.len(), 5);
    }

    #[test]
    fn test_cancel_leaves_sequence_alone() {
        let tasks = board();
        let mut session = DragSession::new();
        session.start("b");
        session.cancel();
        assert!(session.active().is_none());
        assert_eq!(tasks, board());
    }

    #[test]
    fn test_drop_before_column_head() {
        let mut tasks = board();
        let mut session = DragSession::new();
        session.start("e");
        session.drop(&mut tasks, Status::Pending, Some("a")).unwrap();
        assert_eq!(ids(&tasks), vec!["e", "a", "b", "c", "d"]);
        assert_eq!(tasks[0].rank, 0);
        assert!(column_ranks_ascend(&tasks, Status::Pending));
    }

    #[test]
    fn test_no_gap_renumbers_column() {
        let mut tasks = vec![
            task("a", Status::Pending, 0),
            task("b", Status::Pending, 0),
            task("c", Status::Pending, 0),
            task("x", Status::Complete, 0),
        ];
        let mut session = DragSession::new();
        session.start("x");
        let outcome = session.drop(&mut tasks, Status::Pending, Some("b")).unwrap();

        assert_eq!(ids(&tasks), vec!["a", "x", "b", "c"]);
        let ranks: Vec<i64> = tasks.iter().map(|t| t.rank).collect();
        assert_eq!(ranks, vec![1024, 2048, 3072, 4096]);
        assert_eq!(outcome.changed[0], "x");
        assert_eq!(outcome.changed.len(), 4);
    }

    #[test]
    fn test_renumber_reports_only_changed() {
        let mut tasks = vec![
            task("a", Status::Pending, 1024),
            task("b", Status::Pending, 1024),
            task("c", Status::Complete, 5),
        ];
        let changed = renumber_column(&mut tasks, Status::Pending);
        assert_eq!(changed, vec!["b".to_string()]);
        assert_eq!(tasks[2].rank, 5);
    }

    #[test]
    fn test_tail_rank() {
        assert_eq!(tail_rank(Vec::new()), RANK_STEP);
        assert_eq!(tail_rank(vec![1024, 4096, 2048]), 4096 + RANK_STEP);
    }

    #[test]
    fn test_sort_board_is_stable_on_ties() {
        let mut tasks = vec![
            task("done", Status::Complete, 0),
            task("p2", Status::Pending, 0),
            task("wip", Status::InProgress, 0),
            task("p1", Status::Pending, 0),
        ];
        sort_board(&mut tasks);
        assert_eq!(ids(&tasks), vec!["p2", "p1", "wip", "done"]);
    }
}
