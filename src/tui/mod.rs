// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Provides the interactive board shell (ratatui + crossterm): a compose form
//! on top, the threaded comment list below, and a one-line status bar.

use std::{io, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::model::{Board, CommentId, CommentIdSource, Timestamp};
use crate::ops::{apply_ops, DraftComment, Op, SortOrder};
use crate::query::{self, ThreadRow};
use crate::store::BoardFolder;

use theme::TuiTheme;

mod theme;

/// Runs the interactive terminal UI against the built-in demo board.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    run_with_board(demo_board(), None)
}

/// Runs the interactive terminal UI.
///
/// When `folder` is given, every accepted mutation is written back to it and
/// pending transcript exports are flushed on exit.
pub fn run_with_board(
    board: Board,
    folder: Option<BoardFolder>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(board, folder);

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    if let Some(folder) = &app.folder {
        folder.flush_transcript_exports();
    }

    Ok(())
}

pub fn demo_board() -> Board {
    crate::model::fixtures::demo_board()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    NameInput,
    BodyInput,
    Thread,
}

/// A compose submission target other than a fresh top-level comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    ReplyTo(CommentId),
    Edit(CommentId),
}

struct App {
    board: Board,
    folder: Option<BoardFolder>,
    id_source: CommentIdSource,
    theme: TuiTheme,
    focus: Focus,
    name_input: String,
    body_input: String,
    pending: Option<PendingAction>,
    sort_order: SortOrder,
    rows: Vec<ThreadRow>,
    thread_state: ListState,
    toast: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(board: Board, folder: Option<BoardFolder>) -> Self {
        let mut id_source = CommentIdSource::new();
        for comment in board.comments() {
            id_source.observe(comment.comment_id());
            for reply in comment.replies() {
                id_source.observe(reply.comment_id());
            }
        }

        let theme = match TuiTheme::from_env() {
            Ok(theme) => theme,
            Err(_) => TuiTheme::default(),
        };

        let rows = query::thread_rows(&board);
        let mut thread_state = ListState::default();
        if !rows.is_empty() {
            thread_state.select(Some(0));
        }

        Self {
            board,
            folder,
            id_source,
            theme,
            focus: Focus::NameInput,
            name_input: String::new(),
            body_input: String::new(),
            pending: None,
            sort_order: SortOrder::NewestFirst,
            rows,
            thread_state,
            toast: None,
            should_quit: false,
        }
    }

    fn selected_row(&self) -> Option<ThreadRow> {
        self.thread_state
            .selected()
            .and_then(|idx| self.rows.get(idx))
            .copied()
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.toast = None;

        match key.code {
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::NameInput => Focus::BodyInput,
                    Focus::BodyInput => Focus::Thread,
                    Focus::Thread => Focus::NameInput,
                };
                return;
            }
            KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::NameInput => Focus::Thread,
                    Focus::BodyInput => Focus::NameInput,
                    Focus::Thread => Focus::BodyInput,
                };
                return;
            }
            KeyCode::Esc => {
                if self.pending.is_some() {
                    self.cancel_pending();
                } else if self.focus != Focus::Thread {
                    self.focus = Focus::Thread;
                }
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::NameInput => self.handle_name_key(key),
            Focus::BodyInput => self.handle_body_key(key),
            Focus::Thread => self.handle_thread_key(key),
        }
    }

    fn handle_name_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.focus = Focus::BodyInput,
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.name_input.push(ch);
            }
            _ => {}
        }
    }

    fn handle_body_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_compose(),
            KeyCode::Backspace => {
                self.body_input.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.body_input.push(ch);
            }
            _ => {}
        }
    }

    fn handle_thread_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Enter => self.focus = Focus::NameInput,
            KeyCode::Char('r') => self.begin_reply(),
            KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('s') => self.toggle_sort(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn select_previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let idx = self.thread_state.selected().unwrap_or(0);
        self.thread_state.select(Some(idx.saturating_sub(1)));
    }

    fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let idx = self.thread_state.selected().unwrap_or(0);
        self.thread_state
            .select(Some((idx + 1).min(self.rows.len() - 1)));
    }

    fn begin_reply(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        // Replies cannot themselves be replied to; the tree is one level deep.
        if row.depth != 0 {
            self.set_toast("Cannot reply to a reply");
            return;
        }
        self.pending = Some(PendingAction::ReplyTo(row.comment_id));
        self.focus = Focus::NameInput;
    }

    fn begin_edit(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let Some(comment) = query::find_comment(&self.board, row.comment_id) else {
            return;
        };
        self.name_input = comment.author().to_owned();
        self.body_input = comment.body().to_owned();
        self.pending = Some(PendingAction::Edit(row.comment_id));
        self.focus = Focus::BodyInput;
    }

    fn delete_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        self.commit(Op::Delete {
            comment_id: row.comment_id,
        });
    }

    fn toggle_sort(&mut self) {
        let order = self.sort_order;
        self.sort_order = match order {
            SortOrder::NewestFirst => SortOrder::OldestFirst,
            SortOrder::OldestFirst => SortOrder::NewestFirst,
        };
        self.commit(Op::SortByTime { order });
    }

    fn submit_compose(&mut self) {
        let draft = DraftComment {
            author: self.name_input.trim().to_owned(),
            body: self.body_input.clone(),
        };
        if let Err(err) = draft.validate() {
            self.set_toast(format!("Not posted: {err}"));
            return;
        }

        let op = match self.pending {
            Some(PendingAction::Edit(comment_id)) => Op::Edit {
                comment_id,
                body: draft.body,
                time: Timestamp::now(),
            },
            pending => Op::Post {
                comment_id: self.id_source.next(),
                author: draft.author,
                body: draft.body,
                time: Timestamp::now(),
                parent_id: match pending {
                    Some(PendingAction::ReplyTo(parent_id)) => Some(parent_id),
                    _ => None,
                },
            },
        };

        let posted_id = match &op {
            Op::Post { comment_id, .. } | Op::Edit { comment_id, .. } => Some(*comment_id),
            _ => None,
        };

        if self.commit(op) {
            self.name_input.clear();
            self.body_input.clear();
            self.pending = None;
            if let Some(comment_id) = posted_id {
                self.select_comment(comment_id);
            }
        }
    }

    fn cancel_pending(&mut self) {
        self.pending = None;
        self.name_input.clear();
        self.body_input.clear();
        self.focus = Focus::Thread;
    }

    /// Applies one op against the current revision and persists on success.
    /// Returns whether the op was applied.
    fn commit(&mut self, op: Op) -> bool {
        let base_rev = self.board.rev();
        match apply_ops(&mut self.board, base_rev, &[op]) {
            Ok(_) => {
                self.rebuild_rows();
                self.persist();
                true
            }
            Err(err) => {
                self.set_toast(format!("Not applied: {err}"));
                false
            }
        }
    }

    fn persist(&mut self) {
        let Some(folder) = &self.folder else {
            return;
        };
        if let Err(err) = folder.save_board(&self.board) {
            self.set_toast(format!("Save failed: {err}"));
        }
    }

    fn rebuild_rows(&mut self) {
        self.rows = query::thread_rows(&self.board);
        if self.rows.is_empty() {
            self.thread_state.select(None);
            return;
        }
        let idx = self
            .thread_state
            .selected()
            .unwrap_or(0)
            .min(self.rows.len() - 1);
        self.thread_state.select(Some(idx));
    }

    fn select_comment(&mut self, comment_id: CommentId) {
        if let Some(idx) = self.rows.iter().position(|row| row.comment_id == comment_id) {
            self.thread_state.select(Some(idx));
        }
    }

    fn compose_title(&self) -> String {
        match self.pending {
            Some(PendingAction::ReplyTo(parent_id)) => {
                match query::find_comment(&self.board, parent_id) {
                    Some(parent) => format!("Reply to {}", parent.author()),
                    None => "Reply".to_owned(),
                }
            }
            Some(PendingAction::Edit(_)) => "Edit comment".to_owned(),
            None => "New comment".to_owned(),
        }
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let name_area = layout[0];
    let body_area = layout[1];
    let thread_area = layout[2];
    let status_area = layout[3];

    let name = Paragraph::new(app.name_input.as_str())
        .style(app.theme.base_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Name")
                .border_style(app.theme.panel_border_style(app.focus == Focus::NameInput)),
        );
    frame.render_widget(name, name_area);

    let body = Paragraph::new(app.body_input.as_str())
        .style(app.theme.base_style())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.compose_title())
                .border_style(app.theme.panel_border_style(app.focus == Focus::BodyInput)),
        );
    frame.render_widget(body, body_area);

    let thread_title = format!(
        "{} ({} comments, {} replies)",
        app.board.board_id(),
        query::comment_count(&app.board),
        query::reply_count(&app.board),
    );
    let items = app
        .rows
        .iter()
        .map(|row| thread_row_item(app, *row))
        .collect::<Vec<_>>();
    let thread = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(thread_title)
                .border_style(app.theme.panel_border_style(app.focus == Focus::Thread)),
        )
        .highlight_style(app.theme.selection_style());
    frame.render_stateful_widget(thread, thread_area, &mut app.thread_state);

    let status = match &app.toast {
        Some(toast) => Paragraph::new(toast.as_str()).style(app.theme.error_style()),
        None => Paragraph::new(
            "Tab focus | Enter post | r reply | e edit | d delete | s sort | q quit",
        )
        .style(app.theme.notice_style()),
    };
    frame.render_widget(status, status_area);
}

fn thread_row_item(app: &App, row: ThreadRow) -> ListItem<'static> {
    let Some(comment) = query::find_comment(&app.board, row.comment_id) else {
        return ListItem::new("");
    };

    let indent = "    ".repeat(row.depth);
    let first_line = comment.body().lines().next().unwrap_or_default();
    let label = format!(
        "{indent}[{}] {}: {}",
        comment.time().format_utc(),
        comment.author(),
        first_line,
    );

    let style = if row.depth == 0 {
        app.theme.base_style()
    } else {
        app.theme.reply_style()
    };
    ListItem::new(label).style(style)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
