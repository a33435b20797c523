//! Reports screen — tickets, tasks, and service requests for the current
//! scope, with the related-items index one keystroke away.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use tokio::sync::mpsc::UnboundedSender;

use propdesk_core::models::{Id, Priority};
use propdesk_core::{RelatedItems, ReportData, ReportKind, ReportQuery, RequestSequencer};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::sub_tabs;

/// Filter a prompt edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterField {
    Date,
    Room,
    Assignee,
}

impl FilterField {
    fn label(self) -> &'static str {
        match self {
            Self::Date => "date (YYYY-MM-DD)",
            Self::Room => "room id",
            Self::Assignee => "assignee user id",
        }
    }
}

#[derive(Debug)]
struct Prompt {
    field: FilterField,
    input: String,
}

/// One table row, flattened from whichever entity the report lists.
#[derive(Debug, Clone, PartialEq)]
struct ReportRow {
    id: Id,
    title: String,
    priority: Option<Priority>,
    status: String,
    place: String,
}

fn text_or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_owned())
}

fn report_rows(data: &ReportData, kind: ReportKind) -> Vec<ReportRow> {
    let rows = &data.rows;
    match kind {
        ReportKind::Tickets => rows
            .tickets
            .iter()
            .map(|t| ReportRow {
                id: t.id,
                title: t.title.clone(),
                priority: t.priority.clone(),
                status: text_or_dash(t.status.as_ref().map(ToString::to_string)),
                place: text_or_dash(t.room_id.map(|r| format!("room #{r}"))),
            })
            .collect(),
        ReportKind::Tasks => rows
            .tasks
            .iter()
            .map(|t| ReportRow {
                id: t.id,
                title: t.title.clone(),
                priority: t.priority.clone(),
                status: text_or_dash(t.status.as_ref().map(ToString::to_string)),
                place: text_or_dash(t.assigned_to_id.map(|u| format!("user #{u}"))),
            })
            .collect(),
        ReportKind::Requests => rows
            .requests
            .iter()
            .map(|r| {
                let what = r
                    .request_type
                    .clone()
                    .or_else(|| r.request_group.clone())
                    .unwrap_or_else(|| "Request".to_owned());
                let title = match &r.guest_name {
                    Some(guest) => format!("{what} ({guest})"),
                    None => what,
                };
                ReportRow {
                    id: r.id,
                    title,
                    priority: r.priority.clone(),
                    status: text_or_dash(r.status.as_ref().map(ToString::to_string)),
                    place: text_or_dash(r.room_id.map(|id| format!("room #{id}"))),
                }
            })
            .collect(),
    }
}

fn place_header(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Tasks => "Assignee",
        ReportKind::Tickets | ReportKind::Requests => "Room",
    }
}

/// "N related items" text for the table column.
fn related_label(count: usize) -> String {
    match count {
        0 => String::new(),
        1 => "1 related item".to_owned(),
        n => format!("{n} related items"),
    }
}

/// Popup body: one section per non-empty collection.
fn related_lines(items: &RelatedItems) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut section = |title: &str, entries: Vec<String>| {
        if entries.is_empty() {
            return;
        }
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            format!("  {title} ({})", entries.len()),
            Style::default().fg(theme::NEON_CYAN),
        )));
        for entry in entries {
            lines.push(Line::from(Span::styled(format!("    {entry}"), theme::table_row())));
        }
    };

    section(
        "Tickets",
        items
            .tickets
            .iter()
            .map(|t| format!("#{} {}", t.id, t.title))
            .collect(),
    );
    section(
        "Tasks",
        items
            .tasks
            .iter()
            .map(|t| {
                let status = t.status.as_ref().map_or_else(String::new, |s| format!(" [{s}]"));
                format!("#{} {}{status}", t.id, t.title)
            })
            .collect(),
    );
    section(
        "Service Requests",
        items
            .requests
            .iter()
            .map(|r| {
                let what = r.request_type.as_deref().unwrap_or("Request");
                let room = r.room_id.map_or_else(String::new, |id| format!(" · room #{id}"));
                format!("#{} {what}{room}", r.id)
            })
            .collect(),
    );
    lines
}

/// Accept `YYYY-MM-DD` with a plausible month and day.
fn parse_date(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    let month: u8 = input[5..7].parse().ok()?;
    let day: u8 = input[8..10].parse().ok()?;
    ((1..=12).contains(&month) && (1..=31).contains(&day)).then(|| input.to_owned())
}

pub struct ReportScreen {
    focused: bool,
    query: ReportQuery,
    sequencer: RequestSequencer,
    loading: bool,
    error: Option<String>,
    data: Option<Arc<ReportData>>,
    kind: ReportKind,
    table_state: TableState,
    related_open: bool,
    prompt: Option<Prompt>,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl ReportScreen {
    pub fn new(property: Option<Id>) -> Self {
        Self {
            focused: false,
            query: ReportQuery {
                property_id: property,
                ..ReportQuery::default()
            },
            sequencer: RequestSequencer::new(),
            loading: false,
            error: None,
            data: None,
            kind: ReportKind::Tickets,
            table_state: TableState::default().with_selected(Some(0)),
            related_open: false,
            prompt: None,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    fn start_load(&mut self) -> Action {
        self.loading = true;
        Action::FetchReport {
            token: self.sequencer.begin(),
            query: self.query.clone(),
        }
    }

    fn rows(&self) -> Vec<ReportRow> {
        self.data
            .as_deref()
            .map(|data| report_rows(data, self.kind))
            .unwrap_or_default()
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected_related(&self) -> Option<&RelatedItems> {
        let data = self.data.as_deref()?;
        let row = report_rows(data, self.kind).into_iter().nth(self.selected_index())?;
        data.related_for(self.kind.entity(), row.id)
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn move_selection(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let current = self.selected_index() as isize;
        let next = current.saturating_add(delta).clamp(0, len as isize - 1) as usize;
        self.table_state.select(Some(next));
    }

    fn switch_kind(&mut self, step: isize) {
        let count = ReportKind::ALL.len();
        let current = ReportKind::ALL
            .iter()
            .position(|k| *k == self.kind)
            .unwrap_or(0);
        let next = current.checked_add_signed(step).map_or(count - 1, |i| i % count);
        self.kind = ReportKind::ALL[next];
        self.table_state.select(Some(0));
    }

    fn open_prompt(&mut self, field: FilterField) {
        let input = match field {
            FilterField::Date => self.query.date.clone().unwrap_or_default(),
            FilterField::Room => self.query.room_id.map(|id| id.to_string()).unwrap_or_default(),
            FilterField::Assignee => self
                .query
                .assigned_to_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        };
        self.prompt = Some(Prompt { field, input });
    }

    /// Apply the prompt's value. An empty value clears the filter.
    fn submit_prompt(&mut self) -> Option<Action> {
        let prompt = self.prompt.take()?;
        let value = prompt.input.trim();
        match prompt.field {
            FilterField::Date if value.is_empty() => self.query.date = None,
            FilterField::Date => match parse_date(value) {
                Some(date) => self.query.date = Some(date),
                None => {
                    return Some(Action::Notify(Notification::warning(format!(
                        "'{value}' is not a YYYY-MM-DD date"
                    ))));
                }
            },
            FilterField::Room | FilterField::Assignee => {
                let id = if value.is_empty() {
                    None
                } else if let Ok(id) = value.parse::<Id>() {
                    Some(id)
                } else {
                    return Some(Action::Notify(Notification::warning(format!(
                        "'{value}' is not a numeric id"
                    ))));
                };
                if prompt.field == FilterField::Room {
                    self.query.room_id = id;
                } else {
                    self.query.assigned_to_id = id;
                }
            }
        }
        self.table_state.select(Some(0));
        Some(self.start_load())
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Option<Action> {
        let prompt = self.prompt.as_mut()?;
        match key.code {
            KeyCode::Enter => return self.submit_prompt(),
            KeyCode::Esc => self.prompt = None,
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char(c) => prompt.input.push(c),
            _ => {}
        }
        None
    }

    // ── Rendering ────────────────────────────────────────────────

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" Reports ", theme::title_style()),
            Span::styled(self.query.describe(None).join(" · "), theme::key_hint()),
        ];
        if let Some(error) = &self.error {
            spans.push(Span::styled(
                format!("   {error}"),
                Style::default().fg(theme::ERROR_RED),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ", self.kind.label()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let rows = self.rows();
        if rows.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            if self.loading {
                let throbber = throbber_widgets_tui::Throbber::default()
                    .label("  Loading report...")
                    .style(Style::default().fg(theme::NEON_CYAN))
                    .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
                frame.render_stateful_widget(throbber, inner, &mut self.throbber_state.clone());
            } else {
                frame.render_widget(
                    Paragraph::new(format!("  No {} match this scope", self.kind.label().to_lowercase()))
                        .style(theme::key_hint()),
                    inner,
                );
            }
            return;
        }

        let header = Row::new(vec![
            Cell::from("ID").style(theme::table_header()),
            Cell::from(if self.kind == ReportKind::Requests { "Request" } else { "Title" })
                .style(theme::table_header()),
            Cell::from("Priority").style(theme::table_header()),
            Cell::from("Status").style(theme::table_header()),
            Cell::from(place_header(self.kind)).style(theme::table_header()),
            Cell::from("Related").style(theme::table_header()),
        ]);

        let selected = self.selected_index();
        let data = self.data.as_deref();
        let table_rows: Vec<Row> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let prefix = if i == selected { "▸" } else { " " };
                let related = data
                    .and_then(|d| d.related_for(self.kind.entity(), row.id))
                    .map_or(0, RelatedItems::total);
                let priority = row
                    .priority
                    .as_ref()
                    .map_or_else(|| "-".to_owned(), ToString::to_string);

                Row::new(vec![
                    Cell::from(format!("{prefix}{}", row.id)),
                    Cell::from(row.title.clone()),
                    Cell::from(priority)
                        .style(Style::default().fg(theme::priority_color(row.priority.as_ref()))),
                    Cell::from(row.status.clone()),
                    Cell::from(row.place.clone()),
                    Cell::from(related_label(related)).style(Style::default().fg(theme::LIGHT_BLUE)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(13),
            Constraint::Length(12),
            Constraint::Length(18),
        ];

        let table = Table::new(table_rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(prompt) = &self.prompt {
            Line::from(vec![
                Span::styled(
                    format!(" {}: ", prompt.field.label()),
                    Style::default().fg(theme::ELECTRIC_PURPLE),
                ),
                Span::styled(prompt.input.clone(), Style::default().fg(theme::NEON_CYAN)),
                Span::styled("█", Style::default().fg(theme::NEON_CYAN)),
                Span::styled("  Enter apply  Esc cancel  (empty clears)", theme::key_hint()),
            ])
        } else {
            Line::from(vec![
                Span::styled("  h/l ", theme::key_hint_key()),
                Span::styled("report  ", theme::key_hint()),
                Span::styled("j/k ", theme::key_hint_key()),
                Span::styled("row  ", theme::key_hint()),
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("related  ", theme::key_hint()),
                Span::styled("d/o/a ", theme::key_hint_key()),
                Span::styled("date/room/assignee  ", theme::key_hint()),
                Span::styled("c ", theme::key_hint_key()),
                Span::styled("clear  ", theme::key_hint()),
                Span::styled("r ", theme::key_hint_key()),
                Span::styled("reload", theme::key_hint()),
            ])
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_related(&self, frame: &mut Frame, area: Rect, items: &RelatedItems) {
        let lines = related_lines(items);
        let width = 64u16.min(area.width.saturating_sub(4));
        let wanted = u16::try_from(lines.len() + 4).unwrap_or(u16::MAX);
        let height = wanted.min(area.height.saturating_sub(2));

        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let popup = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            popup,
        );

        let row_id = self
            .data
            .as_deref()
            .and_then(|d| report_rows(d, self.kind).into_iter().nth(self.selected_index()))
            .map_or(0, |r| r.id);
        let block = Block::default()
            .title(format!(
                " {} related to {} #{row_id} ",
                items.total(),
                self.kind.entity().prefix()
            ))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut body = vec![Line::from("")];
        body.extend(lines);
        body.push(Line::from(""));
        body.push(Line::from(Span::styled("  Esc to close", theme::key_hint())));
        frame.render_widget(Paragraph::new(body), inner);
    }
}

impl Component for ReportScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        action_tx.send(self.start_load())?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.prompt.is_some() {
            return Ok(self.handle_prompt_key(key));
        }

        if self.related_open {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.related_open = false;
            }
            return Ok(None);
        }

        let action = match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.switch_kind(-1);
                None
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.switch_kind(1);
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') => {
                self.table_state.select(Some(0));
                None
            }
            KeyCode::Char('G') => {
                self.move_selection(isize::MAX);
                None
            }
            KeyCode::Enter => {
                if self.selected_related().is_some() {
                    self.related_open = true;
                    None
                } else {
                    Some(Action::Notify(Notification::info("No related items")))
                }
            }
            KeyCode::Char('d') => {
                self.open_prompt(FilterField::Date);
                None
            }
            KeyCode::Char('o') => {
                self.open_prompt(FilterField::Room);
                None
            }
            KeyCode::Char('a') => {
                self.open_prompt(FilterField::Assignee);
                None
            }
            KeyCode::Char('c') => {
                self.query = ReportQuery {
                    property_id: self.query.property_id,
                    ..ReportQuery::default()
                };
                self.table_state.select(Some(0));
                Some(self.start_load())
            }
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        let follow_up = match action {
            Action::Refresh => Some(self.start_load()),

            Action::ReportLoaded { token, result } => {
                if !self.sequencer.is_current(*token) {
                    return Ok(None);
                }
                self.loading = false;
                match result {
                    Ok(data) => {
                        self.data = Some(Arc::clone(data));
                        self.error = None;
                        let len = self.rows().len();
                        if self.selected_index() >= len {
                            self.table_state.select(Some(len.saturating_sub(1)));
                        }
                    }
                    Err(e) => self.error = Some(e.clone()),
                }
                None
            }

            // Board edits change what the report shows
            Action::TaskMoved { result: Ok(_), .. }
            | Action::TaskCreated(Ok(_))
            | Action::TaskUpdated(Ok(_))
            | Action::TaskDeleted(Ok(_)) => Some(self.start_load()),

            Action::Tick => {
                if self.loading {
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
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        self.render_header(frame, layout[0]);

        let tabs: Vec<(&str, usize)> = ReportKind::ALL
            .iter()
            .map(|kind| {
                let count = self.data.as_deref().map_or(0, |d| d.rows.count(*kind));
                (kind.label(), count)
            })
            .collect();
        let active = ReportKind::ALL
            .iter()
            .position(|k| *k == self.kind)
            .unwrap_or(0);
        frame.render_widget(Paragraph::new(sub_tabs::render_sub_tabs(&tabs, active)), layout[1]);

        self.render_table(frame, layout[2]);
        self.render_footer(frame, layout[3]);

        if self.related_open {
            if let Some(items) = self.selected_related() {
                self.render_related(frame, area, items);
            }
        }
    }

    fn captures_input(&self) -> bool {
        self.related_open || self.prompt.is_some()
    }

    fn key_hints(&self) -> &'static str {
        "Enter related  d/o/a filter"
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
