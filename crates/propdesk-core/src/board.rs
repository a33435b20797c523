// ── Kanban board ──
//
// Three fixed columns keyed by task status. A drag ends either outside
// any column, on the card's own column, or on another column; only the
// last one reports a move, and it reports it exactly once.

use propdesk_api::models::{Id, Role, Task, TaskStatus};

/// A board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Pending,
    InProgress,
    Completed,
}

impl Column {
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn status(self) -> TaskStatus {
        match self {
            Self::Pending => TaskStatus::Pending,
            Self::InProgress => TaskStatus::InProgress,
            Self::Completed => TaskStatus::Completed,
        }
    }

    /// Column for a status; unknown statuses have none.
    pub fn for_status(status: &TaskStatus) -> Option<Self> {
        match status {
            TaskStatus::Pending => Some(Self::Pending),
            TaskStatus::InProgress => Some(Self::InProgress),
            TaskStatus::Completed => Some(Self::Completed),
            TaskStatus::Other(_) => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
        }
    }

    /// Column to the right, saturating at the last one.
    pub fn next(self) -> Self {
        match self {
            Self::Pending => Self::InProgress,
            Self::InProgress | Self::Completed => Self::Completed,
        }
    }

    /// Column to the left, saturating at the first one.
    pub fn prev(self) -> Self {
        match self {
            Self::Pending | Self::InProgress => Self::Pending,
            Self::Completed => Self::InProgress,
        }
    }
}

/// What the current user may do with cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardCapabilities {
    pub can_edit: bool,
    pub can_delete: bool,
}

impl BoardCapabilities {
    /// Managers and above may edit and delete; everyone may move cards.
    pub fn for_role(role: Option<&Role>) -> Self {
        let elevated = role.is_some_and(Role::can_edit);
        Self {
            can_edit: elevated,
            can_delete: elevated,
        }
    }

    pub fn full() -> Self {
        Self {
            can_edit: true,
            can_delete: true,
        }
    }
}

/// A completed move, as reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub task_id: Id,
    pub from: Column,
    pub to: Column,
}

/// Task cards grouped by column.
#[derive(Debug, Clone, Default)]
pub struct Board {
    columns: [Vec<Task>; 3],
    capabilities: BoardCapabilities,
}

impl Board {
    /// Group `tasks` by status. Tasks with an unknown status are not shown.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>, capabilities: BoardCapabilities) -> Self {
        let mut columns: [Vec<Task>; 3] = Default::default();
        for task in tasks {
            let column = task.status.as_ref().and_then(Column::for_status);
            if let Some(column) = column {
                columns[column.index()].push(task);
            }
        }
        Self {
            columns,
            capabilities,
        }
    }

    pub fn capabilities(&self) -> BoardCapabilities {
        self.capabilities
    }

    pub fn column(&self, column: Column) -> &[Task] {
        &self.columns[column.index()]
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locate a card: its column and position within it.
    pub fn find(&self, task_id: Id) -> Option<(Column, usize)> {
        Column::ALL.into_iter().find_map(|column| {
            self.column(column)
                .iter()
                .position(|t| t.id == task_id)
                .map(|pos| (column, pos))
        })
    }

    pub fn task(&self, task_id: Id) -> Option<&Task> {
        self.find(task_id)
            .and_then(|(column, pos)| self.column(column).get(pos))
    }

    /// Finish a drag of `task_id` onto `destination`.
    ///
    /// `None` (dropped outside the board), an unknown card, or the card's
    /// current column leaves the board alone and never calls `on_move`.
    /// Otherwise `on_move(task_id, new_status)` runs once and the card is
    /// appended to the destination column.
    pub fn drag_end<F>(&mut self, task_id: Id, destination: Option<Column>, on_move: F) -> Option<Move>
    where
        F: FnOnce(Id, TaskStatus),
    {
        let to = destination?;
        let (from, pos) = self.find(task_id)?;
        if from == to {
            return None;
        }

        on_move(task_id, to.status());

        let mut task = self.columns[from.index()].remove(pos);
        task.status = Some(to.status());
        self.columns[to.index()].push(task);
        Some(Move { task_id, from, to })
    }
}

/// Keyboard drag in progress: a picked-up card and where it would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub task_id: Id,
    pub origin: Column,
    pub target: Column,
}

impl Drag {
    /// Pick up `task_id` if it is on the board.
    pub fn pick(board: &Board, task_id: Id) -> Option<Self> {
        let (origin, _) = board.find(task_id)?;
        Some(Self {
            task_id,
            origin,
            target: origin,
        })
    }

    pub fn move_left(&mut self) {
        self.target = self.target.prev();
    }

    pub fn move_right(&mut self) {
        self.target = self.target.next();
    }

    /// Drop onto the current target.
    pub fn drop_on<F>(self, board: &mut Board, on_move: F) -> Option<Move>
    where
        F: FnOnce(Id, TaskStatus),
    {
        board.drag_end(self.task_id, Some(self.target), on_move)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;

    fn task(id: Id, status: &str) -> Task {
        Task {
            id,
            property_id: Some(1),
            title: format!("Task {id}"),
            description: None,
            priority: None,
            status: Some(TaskStatus::parse(status)),
            assigned_to_id: None,
            due_date: None,
            ticket_id: None,
            room_id: None,
        }
    }

    fn board() -> Board {
        Board::from_tasks(
            vec![
                task(1, "pending"),
                task(2, "in progress"),
                task(3, "completed"),
                task(4, "archived"),
                task(5, "pending"),
            ],
            BoardCapabilities::full(),
        )
    }

    #[test]
    fn tasks_are_grouped_and_unknown_statuses_hidden() {
        let board = board();
        assert_eq!(board.column(Column::Pending).len(), 2);
        assert_eq!(board.column(Column::InProgress).len(), 1);
        assert_eq!(board.column(Column::Completed).len(), 1);
        assert_eq!(board.len(), 4);
        assert!(board.find(4).is_none());
    }

    #[test]
    fn drag_to_other_column_calls_back_once() {
        let mut board = board();
        let calls = RefCell::new(Vec::new());

        let moved = board.drag_end(1, Some(Column::Completed), |id, status| {
            calls.borrow_mut().push((id, status));
        });

        assert_eq!(calls.into_inner(), vec![(1, TaskStatus::Completed)]);
        assert_eq!(
            moved,
            Some(Move {
                task_id: 1,
                from: Column::Pending,
                to: Column::Completed
            })
        );
        assert_eq!(board.find(1), Some((Column::Completed, 1)));
        assert_eq!(board.task(1).unwrap().status, Some(TaskStatus::Completed));
        assert_eq!(board.column(Column::Pending).len(), 1);
    }

    #[test]
    fn drop_in_place_or_outside_is_a_no_op() {
        let mut board = board();
        let mut calls = 0;

        assert!(board.drag_end(2, Some(Column::InProgress), |_, _| calls += 1).is_none());
        assert!(board.drag_end(2, None, |_, _| calls += 1).is_none());
        assert!(board.drag_end(99, Some(Column::Pending), |_, _| calls += 1).is_none());

        assert_eq!(calls, 0);
        assert_eq!(board.find(2), Some((Column::InProgress, 0)));
    }

    #[test]
    fn keyboard_drag_moves_target_and_drops() {
        let mut board = board();
        let mut drag = Drag::pick(&board, 5).unwrap();
        drag.move_left();
        assert_eq!(drag.target, Column::Pending);
        drag.move_right();
        drag.move_right();
        drag.move_right();
        assert_eq!(drag.target, Column::Completed);

        let mut seen = None;
        drag.drop_on(&mut board, |id, status| seen = Some((id, status)));
        assert_eq!(seen, Some((5, TaskStatus::Completed)));
    }

    #[test]
    fn capabilities_follow_role() {
        assert!(!BoardCapabilities::for_role(Some(&Role::User)).can_edit);
        assert!(BoardCapabilities::for_role(Some(&Role::Manager)).can_delete);
        assert!(!BoardCapabilities::for_role(None).can_edit);
    }
}
