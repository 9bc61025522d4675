//! Application state and event handling.
//!
//! [`App`] is the local, in-memory mirror of the remote task store: the
//! task list, the shared title input, the edit-mode indicator, and the
//! transient notice line. Key handling turns user actions into
//! [`SyncCommand`]s; [`App::apply_sync_event`] reconciles store responses
//! back into local state. The list only ever diverges from the store while
//! a request is in flight.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use taskdeck_proto::{MAX_TASK_TITLE_LENGTH, Task, TaskId};

use crate::sync::{SyncCommand, SyncEvent};

/// Which panel is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Title input is focused (default).
    Input,
    /// Task list is focused.
    Tasks,
}

/// Edit-mode indicator: either browsing the list or editing one task.
///
/// A single tagged state; the edited task is referenced by id only, the
/// task itself lives in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    /// No task is being edited; the input creates new tasks.
    Viewing,
    /// The task with this id is being edited; the input holds its title.
    Editing(TaskId),
}

/// Default lifetime of a notice, in event-loop ticks.
const DEFAULT_NOTICE_TICKS: u16 = 60;

/// Main application state.
pub struct App {
    /// Tasks mirrored from the store, in store order.
    pub tasks: Vec<Task>,
    /// Current text input, shared between the create and edit forms.
    pub input: String,
    /// Cursor position in input (character index).
    pub cursor_position: usize,
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// Selected task index in the list.
    pub selected_task: usize,
    /// Edit-mode indicator.
    pub edit: EditMode,
    /// Transient notice shown in the status bar (validation, failures).
    pub notice: Option<String>,
    /// Remaining ticks before the current notice expires.
    notice_ticks: u16,
    /// How long a fresh notice lives, in ticks.
    notice_duration: u16,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// chrono format string for rendering creation timestamps.
    pub timestamp_format: String,
    /// Label for the status bar (the store base URL).
    pub store_label: String,
    /// Maximum accepted title length in characters.
    max_title_len: usize,
    /// Next Load sequence number to mint.
    next_load_seq: u64,
    /// Highest Load sequence number applied so far.
    applied_load_seq: u64,
}

impl App {
    /// Create a new application with an empty task list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            input: String::new(),
            cursor_position: 0,
            focus: PanelFocus::Input,
            selected_task: 0,
            edit: EditMode::Viewing,
            notice: None,
            notice_ticks: 0,
            notice_duration: DEFAULT_NOTICE_TICKS,
            should_quit: false,
            timestamp_format: "%d/%m/%Y %H:%M:%S".to_string(),
            store_label: String::new(),
            max_title_len: MAX_TASK_TITLE_LENGTH,
            next_load_seq: 0,
            applied_load_seq: 0,
        }
    }

    /// Set the maximum accepted title length.
    #[must_use]
    pub const fn with_max_title_len(mut self, max: usize) -> Self {
        self.max_title_len = max;
        self
    }

    /// Set the timestamp display format (chrono format string).
    #[must_use]
    pub fn with_timestamp_format(mut self, format: String) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Set the notice lifetime in event-loop ticks.
    #[must_use]
    pub const fn with_notice_ticks(mut self, ticks: u16) -> Self {
        self.notice_duration = ticks;
        self
    }

    /// Set the store label shown in the status bar.
    #[must_use]
    pub fn with_store_label(mut self, label: String) -> Self {
        self.store_label = label;
        self
    }

    /// Mint the initial (or any subsequent) Load command.
    ///
    /// Each Load carries a fresh sequence number; stale responses are
    /// discarded in [`Self::apply_sync_event`].
    pub const fn load_command(&mut self) -> SyncCommand {
        self.next_load_seq += 1;
        SyncCommand::Load {
            seq: self.next_load_seq,
        }
    }

    /// Handle a key event, returning a command when the action requires
    /// a store request.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        // Global shortcuts
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return None;
            }
            (KeyCode::Esc, _) => {
                // Esc leaves edit mode first, quits from viewing mode.
                if self.edit == EditMode::Viewing {
                    self.should_quit = true;
                } else {
                    self.cancel_edit();
                }
                return None;
            }
            (KeyCode::Tab | KeyCode::BackTab, _) => {
                self.toggle_focus();
                return None;
            }
            _ => {}
        }

        // Focus-specific shortcuts
        match self.focus {
            PanelFocus::Input => self.handle_input_key(key),
            PanelFocus::Tasks => self.handle_tasks_key(key),
        }
    }

    /// Handle key event when the input is focused.
    fn handle_input_key(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Char(c) => {
                self.enter_char(c);
                None
            }
            KeyCode::Backspace => {
                self.delete_char();
                None
            }
            KeyCode::Left => {
                self.move_cursor_left();
                None
            }
            KeyCode::Right => {
                self.move_cursor_right();
                None
            }
            KeyCode::Home => {
                self.cursor_position = 0;
                None
            }
            KeyCode::End => {
                self.cursor_position = self.input.chars().count();
                None
            }
            _ => None,
        }
    }

    /// Handle key event when the task list is focused.
    fn handle_tasks_key(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.prev_task();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.next_task();
                None
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(id) = self.selected_task_id() {
                    self.toggle_edit(id);
                }
                None
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                let id = self.selected_task_id()?;
                Some(SyncCommand::Delete { id })
            }
            KeyCode::Char('r') => Some(self.load_command()),
            _ => None,
        }
    }

    /// Submit the input: create a task while viewing, update while editing.
    ///
    /// The validation gate is shared: an exact empty string aborts with a
    /// notice and no store request (whitespace-only titles pass), as does
    /// an over-long title.
    fn submit(&mut self) -> Option<SyncCommand> {
        if self.input.is_empty() {
            self.set_notice("fill in the task field".to_string());
            return None;
        }
        if self.input.chars().count() > self.max_title_len {
            self.set_notice(format!(
                "task title too long (max {} characters)",
                self.max_title_len
            ));
            return None;
        }

        let title = self.input.clone();
        match self.edit.clone() {
            EditMode::Viewing => {
                // The input clears at dispatch time, success or not.
                self.clear_input();
                Some(SyncCommand::Create { title })
            }
            EditMode::Editing(id) => Some(SyncCommand::Update { id, title }),
        }
    }

    /// Apply a store response to local state.
    ///
    /// Returns a follow-up command when the event warrants one (a scoped
    /// re-fetch after a successful update).
    pub fn apply_sync_event(&mut self, event: SyncEvent) -> Option<SyncCommand> {
        match event {
            SyncEvent::Loaded { seq, tasks } => {
                if seq > self.applied_load_seq {
                    self.applied_load_seq = seq;
                    self.tasks = tasks;
                    self.clamp_selection();
                } else {
                    tracing::debug!(seq, applied = self.applied_load_seq, "stale load discarded");
                }
                None
            }
            SyncEvent::Created { task } => {
                self.tasks.push(task);
                None
            }
            SyncEvent::Deleted { id } => {
                self.tasks.retain(|t| t.id != id);
                self.clamp_selection();
                None
            }
            SyncEvent::Updated { id, title } => {
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                    // Keep the old title if the update carried an empty one.
                    if !title.is_empty() {
                        task.title = title;
                    }
                }
                self.cancel_edit();
                self.clear_input();
                // Re-fetch so the final state converges to the store.
                Some(self.load_command())
            }
            SyncEvent::Failed { op, message } => {
                self.set_notice(format!("{op} failed: {message}"));
                None
            }
        }
    }

    /// Enter edit mode for the given task id.
    ///
    /// Pre-fills the shared input with the task's current title when the id
    /// is present locally; the id itself is not validated. Valid from any
    /// prior state.
    pub fn toggle_edit(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.iter().find(|t| t.id == id) {
            self.input = task.title.clone();
            self.cursor_position = self.input.chars().count();
        }
        self.edit = EditMode::Editing(id);
        self.focus = PanelFocus::Input;
    }

    /// Leave edit mode. Idempotent.
    pub fn cancel_edit(&mut self) {
        self.edit = EditMode::Viewing;
    }

    /// Show a transient notice in the status bar.
    pub fn set_notice(&mut self, message: String) {
        self.notice = Some(message);
        self.notice_ticks = self.notice_duration;
    }

    /// Advance the notice timer; called once per event-loop tick.
    pub fn tick_notice(&mut self) {
        if self.notice_ticks > 0 {
            self.notice_ticks -= 1;
            if self.notice_ticks == 0 {
                self.notice = None;
            }
        }
    }

    /// The id of the currently selected task, if any.
    #[must_use]
    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.tasks.get(self.selected_task).map(|t| t.id.clone())
    }

    /// Toggle focus between the input and the task list.
    const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Input => PanelFocus::Tasks,
            PanelFocus::Tasks => PanelFocus::Input,
        };
    }

    /// Insert a character at the cursor position.
    fn enter_char(&mut self, c: char) {
        let byte_idx = self.byte_index(self.cursor_position);
        self.input.insert(byte_idx, c);
        self.cursor_position += 1;
    }

    /// Delete the character before the cursor.
    fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_idx = self.byte_index(self.cursor_position - 1);
            self.input.remove(byte_idx);
            self.cursor_position -= 1;
        }
    }

    /// Byte offset of the given character index in the input.
    fn byte_index(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(i, _)| i)
    }

    /// Clear the input and reset the cursor.
    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Move cursor left.
    const fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    /// Move cursor right.
    fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    /// Select the previous task.
    const fn prev_task(&mut self) {
        if self.selected_task > 0 {
            self.selected_task -= 1;
        }
    }

    /// Select the next task.
    fn next_task(&mut self) {
        if self.selected_task < self.tasks.len().saturating_sub(1) {
            self.selected_task += 1;
        }
    }

    /// Keep the selection within the current list bounds.
    fn clamp_selection(&mut self) {
        if self.selected_task >= self.tasks.len() {
            self.selected_task = self.tasks.len().saturating_sub(1);
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
