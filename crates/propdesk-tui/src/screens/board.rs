//! Board screen — three-column kanban with keyboard drag and drop.
//!
//! `Space` lifts the selected card, `h`/`l` choose the drop column, `Space`
//! drops, `Esc` puts it back. `Shift+←/→` moves a card one column in a
//! single keystroke. Moves are applied locally at once and confirmed (or
//! reverted by a reload) when the server answers. Confirmed creates,
//! updates, and deletes patch the task list, and the board is regrouped
//! from it.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use propdesk_core::models::{Id, Priority, Role, Task};
use propdesk_core::{Board, BoardCapabilities, Column, CoreError, Drag, EntityList};

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::theme;

pub struct BoardScreen {
    focused: bool,
    property: Option<Id>,
    tasks: EntityList<Task>,
    board: Board,
    capabilities: BoardCapabilities,
    /// Column holding the cursor.
    column: Column,
    /// Cursor row per column.
    rows: [usize; 3],
    drag: Option<Drag>,
    /// Title being typed for a new task in the cursor column.
    new_title: Option<String>,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl BoardScreen {
    pub fn new(property: Option<Id>) -> Self {
        Self {
            focused: false,
            property,
            tasks: EntityList::new("Task"),
            board: Board::default(),
            capabilities: BoardCapabilities::default(),
            column: Column::Pending,
            rows: [0; 3],
            drag: None,
            new_title: None,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    // ── Selection ────────────────────────────────────────────────

    fn selected_task(&self) -> Option<&Task> {
        self.board
            .column(self.column)
            .get(self.rows[self.column.index()])
    }

    fn move_row(&mut self, delta: isize) {
        let len = self.board.column(self.column).len();
        let row = &mut self.rows[self.column.index()];
        *row = if delta.is_negative() {
            row.saturating_sub(delta.unsigned_abs())
        } else {
            (*row + delta.unsigned_abs()).min(len.saturating_sub(1))
        };
    }

    fn clamp_rows(&mut self) {
        for column in Column::ALL {
            let len = self.board.column(column).len();
            let row = &mut self.rows[column.index()];
            *row = (*row).min(len.saturating_sub(1));
        }
    }

    /// Put the cursor on `task_id`, wherever it now lives.
    fn follow(&mut self, task_id: Id) {
        if let Some((column, pos)) = self.board.find(task_id) {
            self.column = column;
            self.rows[column.index()] = pos;
        }
    }

    fn rebuild(&mut self, tasks: Vec<Task>) {
        self.board = Board::from_tasks(tasks, self.capabilities);
        if self
            .drag
            .is_some_and(|drag| self.board.find(drag.task_id).is_none())
        {
            self.drag = None;
        }
        self.clamp_rows();
    }

    /// Regroup the board from the confirmed task list.
    fn sync_board(&mut self) {
        let tasks = self.tasks.items().to_vec();
        self.rebuild(tasks);
    }

    fn cards(&self) -> Vec<Task> {
        Column::ALL
            .into_iter()
            .flat_map(|column| self.board.column(column).iter().cloned())
            .collect()
    }

    fn set_role(&mut self, role: Option<&Role>) {
        self.capabilities = BoardCapabilities::for_role(role);
        let cards = self.cards();
        self.rebuild(cards);
    }

    fn start_load(&mut self) -> Action {
        Action::FetchTasks(self.tasks.begin_load())
    }

    // ── Drag and drop ────────────────────────────────────────────

    fn pick_up(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            self.drag = Drag::pick(&self.board, id);
        }
    }

    /// Drop the lifted card on its target. Returns the server request,
    /// or `None` when the card landed where it started.
    fn drop_card(&mut self) -> Option<Action> {
        let drag = self.drag.take()?;
        let mut request = None;
        let moved = drag.drop_on(&mut self.board, |task_id, status| {
            request = Some(Action::MoveTask { task_id, status });
        });
        if let Some(moved) = moved {
            self.follow(moved.task_id);
        }
        request
    }

    /// Shift+arrow: lift, shift one column, drop.
    fn shift_card(&mut self, right: bool) -> Option<Action> {
        self.pick_up();
        let drag = self.drag.as_mut()?;
        if right {
            drag.move_right();
        } else {
            drag.move_left();
        }
        self.drop_card()
    }

    fn handle_drag_key(&mut self, key: KeyEvent) -> Option<Action> {
        let drag = self.drag.as_mut()?;
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => drag.move_left(),
            KeyCode::Char('l') | KeyCode::Right => drag.move_right(),
            KeyCode::Char(' ') | KeyCode::Enter => return self.drop_card(),
            KeyCode::Esc => self.drag = None,
            _ => {}
        }
        None
    }

    fn handle_title_key(&mut self, key: KeyEvent) -> Option<Action> {
        let title = self.new_title.as_mut()?;
        match key.code {
            KeyCode::Char(c) => title.push(c),
            KeyCode::Backspace => {
                title.pop();
            }
            KeyCode::Esc => self.new_title = None,
            KeyCode::Enter => {
                let title = self.new_title.take()?.trim().to_owned();
                if title.is_empty() {
                    return None;
                }
                return Some(Action::CreateTask {
                    title,
                    status: self.column.status(),
                });
            }
            _ => {}
        }
        None
    }

    // ── Rendering ────────────────────────────────────────────────

    fn card_item(&self, task: &Task, selected: bool) -> ListItem<'static> {
        let lifted = self.drag.is_some_and(|d| d.task_id == task.id);
        let title_style = if lifted {
            theme::card_dragging()
        } else if selected {
            theme::table_selected()
        } else {
            Style::default().fg(theme::NEON_CYAN)
        };
        let prefix = if selected { "▸ " } else { "  " };

        let priority = task
            .priority
            .as_ref()
            .map_or_else(|| "-".to_owned(), ToString::to_string);
        let mut meta = vec![
            Span::raw("    "),
            Span::styled(
                priority,
                Style::default().fg(theme::priority_color(task.priority.as_ref())),
            ),
        ];
        if let Some(due) = &task.due_date {
            meta.push(Span::styled(format!("  due {due}"), theme::table_row()));
        }
        if let Some(user) = task.assigned_to_id {
            meta.push(Span::styled(format!("  @{user}"), theme::key_hint()));
        }

        ListItem::new(vec![
            Line::from(vec![
                Span::styled(prefix, title_style),
                Span::styled(format!("#{} ", task.id), theme::key_hint()),
                Span::styled(task.title.clone(), title_style),
            ]),
            Line::from(meta),
        ])
    }

    fn render_column(&self, frame: &mut Frame, area: Rect, column: Column) {
        let cards = self.board.column(column);
        let is_target = self.drag.is_some_and(|d| d.target == column && d.origin != column);
        let border_style = if is_target {
            theme::border_drop_target()
        } else if self.focused && self.column == column {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let title = if is_target {
            format!(" ▼ {} ({}) ", column.title(), cards.len())
        } else {
            format!(" {} ({}) ", column.title(), cards.len())
        };

        let block = Block::default()
            .title(title)
            .title_style(
                Style::default()
                    .fg(theme::task_status_color(Some(&column.status())))
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        let cursor = (self.column == column).then_some(self.rows[column.index()]);
        let items: Vec<ListItem> = cards
            .iter()
            .enumerate()
            .map(|(i, task)| self.card_item(task, cursor == Some(i)))
            .collect();

        let list = List::new(items).block(block);
        let mut state = ListState::default().with_selected(cursor);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let scope = self
            .property
            .map_or_else(|| "all properties".to_owned(), |id| format!("property #{id}"));
        let mut spans = vec![
            Span::styled(" Task Board ", theme::title_style()),
            Span::styled(format!("· {scope} · {} cards", self.board.len()), theme::key_hint()),
        ];
        if let Some(drag) = &self.drag {
            let title = self
                .board
                .task(drag.task_id)
                .map_or_else(String::new, |t| t.title.clone());
            spans.push(Span::styled(
                format!("   moving \"{title}\" → {}", drag.target.title()),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            ));
        }
        if let Some(title) = &self.new_title {
            spans.push(Span::styled(
                format!("   new task in {}: {title}_", self.column.title()),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            ));
        } else if let Some(error) = self.tasks.error() {
            spans.push(Span::styled(
                format!("   {error}"),
                Style::default().fg(theme::ERROR_RED),
            ));
        } else if let Some(success) = self.tasks.success() {
            spans.push(Span::styled(
                format!("   {success}"),
                Style::default().fg(theme::SUCCESS_GREEN),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        let mut hint = |key: &'static str, label: &'static str| {
            spans.push(Span::styled(key, theme::key_hint_key()));
            spans.push(Span::styled(label, theme::key_hint()));
        };
        if self.new_title.is_some() {
            hint("  Enter ", "create  ");
            hint("Esc ", "cancel");
        } else if self.drag.is_some() {
            hint("  h/l ", "choose column  ");
            hint("Space ", "drop  ");
            hint("Esc ", "cancel");
        } else {
            hint("  h/l ", "column  ");
            hint("j/k ", "card  ");
            hint("Space ", "pick up  ");
            hint("S-←/→ ", "move  ");
            hint("n ", "new  ");
            if self.capabilities.can_edit {
                hint("p ", "priority  ");
            }
            if self.capabilities.can_delete {
                hint("x ", "delete  ");
            }
            hint("r ", "reload");
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn next_priority(current: Option<&Priority>) -> Priority {
    let known = Priority::KNOWN;
    let next = current
        .and_then(|p| known.iter().position(|k| k == p))
        .map_or(0, |idx| (idx + 1) % known.len());
    known.get(next).cloned().unwrap_or(Priority::Medium)
}

impl Component for BoardScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        action_tx.send(self.start_load())?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.new_title.is_some() {
            return Ok(self.handle_title_key(key));
        }
        if self.drag.is_some() {
            return Ok(self.handle_drag_key(key));
        }
        self.tasks.dismiss();

        if key.modifiers.contains(KeyModifiers::SHIFT) {
            match key.code {
                KeyCode::Left => return Ok(self.shift_card(false)),
                KeyCode::Right => return Ok(self.shift_card(true)),
                _ => {}
            }
        }

        let action = match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.column = self.column.prev();
                None
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.column = self.column.next();
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_row(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_row(-1);
                None
            }
            KeyCode::Char('g') => {
                self.rows[self.column.index()] = 0;
                None
            }
            KeyCode::Char('G') => {
                self.rows[self.column.index()] = self.board.column(self.column).len().saturating_sub(1);
                None
            }
            KeyCode::Char(' ') => {
                self.pick_up();
                None
            }
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('n') => {
                self.new_title = Some(String::new());
                None
            }
            KeyCode::Char('p') if self.capabilities.can_edit => {
                self.selected_task().map(|task| Action::SetTaskPriority {
                    priority: next_priority(task.priority.as_ref()),
                    task: Box::new(task.clone()),
                })
            }
            KeyCode::Char('x') if self.capabilities.can_delete => self.selected_task().map(|task| {
                Action::ShowConfirm(ConfirmAction::DeleteTask {
                    id: task.id,
                    title: task.title.clone(),
                })
            }),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        let follow_up = match action {
            Action::Refresh => Some(self.start_load()),

            Action::TasksLoaded { token, result } => {
                let loaded = result.is_ok();
                let result = result
                    .clone()
                    .map_err(|message| CoreError::Rejected { message });
                if self.tasks.finish_load(*token, result) && loaded {
                    self.sync_board();
                }
                None
            }

            Action::SessionVerified { role, .. } => {
                self.set_role(role.as_ref());
                None
            }

            Action::TaskMoved { task_id, result } => match result {
                Ok(task) => {
                    self.tasks.apply_updated(task.clone());
                    self.sync_board();
                    self.follow(*task_id);
                    let column = task
                        .status
                        .as_ref()
                        .and_then(Column::for_status)
                        .map_or("the board", Column::title);
                    Some(Action::Notify(Notification::info(format!(
                        "Task #{task_id} moved to {column}"
                    ))))
                }
                // Reload so the card goes back where the server has it
                Err(_) => Some(self.start_load()),
            },

            Action::TaskCreated(Ok(task)) => {
                self.tasks.apply_created(task.clone());
                self.sync_board();
                self.follow(task.id);
                None
            }

            Action::TaskUpdated(Ok(task)) => {
                self.tasks.apply_updated(task.clone());
                self.sync_board();
                self.follow(task.id);
                None
            }

            Action::TaskDeleted(Ok(id)) => {
                self.tasks.apply_deleted(*id);
                self.sync_board();
                None
            }

            Action::TaskCreated(Err(message))
            | Action::TaskUpdated(Err(message))
            | Action::TaskDeleted(Err(message)) => {
                self.tasks.fail(message.clone());
                None
            }

            Action::Tick => {
                if self.tasks.is_loading() {
                    self.throbber_state.calc_next();
                }
                None
            }

            _ => None,
        };
        Ok(follow_up)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        self.render_header(frame, layout[0]);

        if self.tasks.is_loading() && self.board.is_empty() {
            let throbber = throbber_widgets_tui::Throbber::default()
                .label("  Loading tasks...")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            let middle = Layout::vertical([Constraint::Min(0), Constraint::Length(1), Constraint::Min(0)])
                .split(layout[1]);
            frame.render_stateful_widget(throbber, middle[1], &mut self.throbber_state.clone());
        } else if self.board.is_empty() {
            frame.render_widget(
                Paragraph::new("No tasks on the board")
                    .alignment(Alignment::Center)
                    .style(theme::key_hint()),
                layout[1],
            );
        } else {
            let columns = Layout::horizontal([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(layout[1]);
            for (column, area) in Column::ALL.into_iter().zip(columns.iter()) {
                self.render_column(frame, *area, column);
            }
        }

        self.render_hints(frame, layout[2]);
    }

    fn captures_input(&self) -> bool {
        self.drag.is_some() || self.new_title.is_some()
    }

    fn key_hints(&self) -> &'static str {
        "Space pick/drop  S-←/→ move"
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use propdesk_core::models::TaskStatus;

    use super::*;

    fn task(id: Id, status: &str) -> Task {
        Task {
            id,
            property_id: Some(1),
            title: format!("Task {id}"),
            description: None,
            priority: Some(Priority::Medium),
            status: Some(TaskStatus::parse(status)),
            assigned_to_id: None,
            due_date: None,
            ticket_id: None,
            room_id: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_screen() -> BoardScreen {
        let mut screen = BoardScreen::new(Some(1));
        let Some(Action::FetchTasks(token)) = screen.update(&Action::Refresh).unwrap() else {
            panic!("refresh should request tasks");
        };
        screen
            .update(&Action::TasksLoaded {
                token,
                result: Ok(vec![task(1, "pending"), task(2, "pending"), task(3, "in progress")]),
            })
            .unwrap();
        screen
    }

    #[test]
    fn pick_move_drop_requests_one_move() {
        let mut screen = loaded_screen();
        assert!(screen.handle_key_event(key(KeyCode::Char(' '))).unwrap().is_none());
        assert!(screen.captures_input());

        screen.handle_key_event(key(KeyCode::Char('l'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('l'))).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();

        match action {
            Some(Action::MoveTask { task_id, status }) => {
                assert_eq!(task_id, 1);
                assert_eq!(status, TaskStatus::Completed);
            }
            other => panic!("expected MoveTask, got {other:?}"),
        }
        assert!(!screen.captures_input());
        assert_eq!(screen.board.find(1), Some((Column::Completed, 0)));
        assert_eq!(screen.column, Column::Completed);
    }

    #[test]
    fn dropping_in_place_sends_nothing() {
        let mut screen = loaded_screen();
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert!(action.is_none());
        assert_eq!(screen.board.find(1), Some((Column::Pending, 0)));
    }

    #[test]
    fn escape_cancels_drag() {
        let mut screen = loaded_screen();
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('l'))).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(action.is_none());
        assert!(screen.drag.is_none());
        assert_eq!(screen.board.find(1), Some((Column::Pending, 0)));
    }

    #[test]
    fn shift_arrow_moves_one_column() {
        let mut screen = loaded_screen();
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT))
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::MoveTask { task_id: 1, status: TaskStatus::InProgress })
        ));
        assert_eq!(screen.board.column(Column::InProgress).len(), 2);
    }

    #[test]
    fn stale_task_loads_are_ignored() {
        let mut screen = BoardScreen::new(None);
        let Some(Action::FetchTasks(first)) = screen.update(&Action::Refresh).unwrap() else {
            panic!("expected fetch");
        };
        let Some(Action::FetchTasks(second)) = screen.update(&Action::Refresh).unwrap() else {
            panic!("expected fetch");
        };

        screen
            .update(&Action::TasksLoaded {
                token: second,
                result: Ok(vec![task(7, "completed")]),
            })
            .unwrap();
        screen
            .update(&Action::TasksLoaded {
                token: first,
                result: Ok(vec![task(1, "pending"), task(2, "pending")]),
            })
            .unwrap();

        assert_eq!(screen.board.len(), 1);
        assert!(screen.board.task(7).is_some());
    }

    #[test]
    fn failed_move_triggers_reload() {
        let mut screen = loaded_screen();
        let follow_up = screen
            .update(&Action::TaskMoved {
                task_id: 1,
                result: Err("Failed to update task".into()),
            })
            .unwrap();
        assert!(matches!(follow_up, Some(Action::FetchTasks(_))));
    }

    #[test]
    fn edit_and_delete_need_a_manager() {
        let mut screen = loaded_screen();
        assert!(screen.handle_key_event(key(KeyCode::Char('x'))).unwrap().is_none());
        assert!(screen.handle_key_event(key(KeyCode::Char('p'))).unwrap().is_none());

        screen
            .update(&Action::SessionVerified {
                username: "gm".into(),
                role: Some(Role::Manager),
            })
            .unwrap();
        assert_eq!(screen.board.len(), 3);
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Char('x'))).unwrap(),
            Some(Action::ShowConfirm(ConfirmAction::DeleteTask { id: 1, .. }))
        ));
        match screen.handle_key_event(key(KeyCode::Char('p'))).unwrap() {
            Some(Action::SetTaskPriority { task, priority }) => {
                assert_eq!(task.id, 1);
                assert_eq!(priority, Priority::High);
            }
            other => panic!("expected SetTaskPriority, got {other:?}"),
        }
    }

    #[test]
    fn confirmed_delete_removes_only_that_task() {
        let mut screen = loaded_screen();
        screen.update(&Action::TaskDeleted(Ok(2))).unwrap();

        assert_eq!(screen.tasks.len(), 2);
        assert!(screen.tasks.get(2).is_none());
        assert_eq!(screen.board.len(), 2);
        assert_eq!(screen.board.find(1), Some((Column::Pending, 0)));
        assert_eq!(screen.tasks.success(), Some("Task deleted successfully"));
    }

    #[test]
    fn confirmed_update_patches_list_and_board() {
        let mut screen = loaded_screen();
        let mut edited = task(1, "completed");
        edited.priority = Some(Priority::High);
        screen.update(&Action::TaskUpdated(Ok(edited))).unwrap();

        assert_eq!(screen.tasks.get(1).unwrap().priority, Some(Priority::High));
        assert_eq!(screen.board.find(1), Some((Column::Completed, 0)));
        assert_eq!(screen.column, Column::Completed);
        assert_eq!(screen.tasks.len(), 3);
    }

    #[test]
    fn confirmed_move_lands_in_the_task_list() {
        let mut screen = loaded_screen();
        screen
            .handle_key_event(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT))
            .unwrap();
        screen
            .update(&Action::TaskMoved {
                task_id: 1,
                result: Ok(task(1, "in progress")),
            })
            .unwrap();

        assert_eq!(
            screen.tasks.get(1).unwrap().status,
            Some(TaskStatus::InProgress)
        );
        assert_eq!(screen.board.column(Column::InProgress).len(), 2);
        assert_eq!(screen.board.column(Column::Pending).len(), 1);
    }

    #[test]
    fn new_task_prompt_creates_in_cursor_column() {
        let mut screen = loaded_screen();
        screen.handle_key_event(key(KeyCode::Char('l'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        assert!(screen.captures_input());
        for c in "Fix sink".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }

        match screen.handle_key_event(key(KeyCode::Enter)).unwrap() {
            Some(Action::CreateTask { title, status }) => {
                assert_eq!(title, "Fix sink");
                assert_eq!(status, TaskStatus::InProgress);
            }
            other => panic!("expected CreateTask, got {other:?}"),
        }
        assert!(!screen.captures_input());

        screen.update(&Action::TaskCreated(Ok(task(9, "in progress")))).unwrap();
        assert_eq!(screen.tasks.len(), 4);
        assert_eq!(screen.board.find(9), Some((Column::InProgress, 1)));
        assert_eq!(screen.tasks.success(), Some("Task created successfully"));
    }

    #[test]
    fn blank_title_creates_nothing() {
        let mut screen = loaded_screen();
        screen.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert!(screen.handle_key_event(key(KeyCode::Enter)).unwrap().is_none());
        assert!(!screen.captures_input());
    }

    #[test]
    fn failed_command_shows_banner_and_keeps_tasks() {
        let mut screen = loaded_screen();
        screen
            .update(&Action::TaskUpdated(Err("Failed to update task".into())))
            .unwrap();
        assert_eq!(screen.tasks.error(), Some("Failed to update task"));
        assert_eq!(screen.board.len(), 3);

        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        assert!(screen.tasks.error().is_none());
    }

    #[test]
    fn priority_cycles_through_known_values() {
        assert_eq!(next_priority(None), Priority::Low);
        assert_eq!(next_priority(Some(&Priority::Low)), Priority::Medium);
        assert_eq!(next_priority(Some(&Priority::Critical)), Priority::Low);
        assert_eq!(next_priority(Some(&Priority::Other("urgent".into()))), Priority::Low);
    }
}
