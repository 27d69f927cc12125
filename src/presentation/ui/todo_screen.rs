//! To-do list screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};

use crate::application::services::TodoListState;
use crate::domain::entities::{TodoId, TodoItem};
use crate::presentation::events::EventHandler;
use crate::presentation::widgets::{StatusBar, TextInput, TodoList, TodoListSelection};

const INPUT_HINTS: &str = "Enter: Add | Tab: List | Ctrl+O: Sign out | Esc: Quit";
const LIST_HINTS: &str = "d: Delete | j/k: Move | Tab: Input | Ctrl+O: Sign out | Esc: Quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoFocus {
    Input,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoAction {
    None,
    /// The form text changed.
    DraftChanged(String),
    /// Add the current form text.
    Submit,
    Delete(TodoId),
    SignOut,
}

/// Input form above the fetched list.
pub struct TodoScreen {
    input: TextInput,
    selection: TodoListSelection,
    items: Vec<TodoItem>,
    user_label: Option<String>,
    focus: TodoFocus,
    status: StatusBar,
}

impl TodoScreen {
    #[must_use]
    pub fn new() -> Self {
        let mut input = TextInput::new(" New item ").placeholder("What needs doing?");
        input.set_focused(true);

        Self {
            input,
            selection: TodoListSelection::new(),
            items: Vec::new(),
            user_label: None,
            focus: TodoFocus::Input,
            status: StatusBar::info("Ready"),
        }
    }

    #[must_use]
    pub const fn focus(&self) -> TodoFocus {
        self.focus
    }

    #[must_use]
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        self.input.value()
    }

    #[must_use]
    pub fn status(&self) -> &StatusBar {
        &self.status
    }

    pub fn set_status(&mut self, status: StatusBar) {
        self.status = status;
    }

    /// Mirrors the controller state into the view.
    pub fn sync(&mut self, state: &TodoListState) {
        self.items.clone_from(&state.items);
        self.selection.clamp(self.items.len());
        self.user_label = state
            .user
            .as_ref()
            .map(|user| user.display_name().to_string());

        if self.input.value() != state.draft {
            self.input.set_value(state.draft.as_str());
        }
    }

    fn set_focus(&mut self, focus: TodoFocus) {
        self.focus = focus;
        self.input.set_focused(focus == TodoFocus::Input);
        self.selection.set_focused(focus == TodoFocus::List);
        if focus == TodoFocus::List && self.selection.selected().is_none() {
            self.selection.select_next(self.items.len());
        }
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> TodoAction {
        if EventHandler::is_sign_out_event(&key) {
            return TodoAction::SignOut;
        }

        if EventHandler::is_focus_switch_event(&key) {
            let next = match self.focus {
                TodoFocus::Input => TodoFocus::List,
                TodoFocus::List => TodoFocus::Input,
            };
            self.set_focus(next);
            return TodoAction::None;
        }

        match self.focus {
            TodoFocus::Input => self.handle_input_key(key),
            TodoFocus::List => self.handle_list_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> TodoAction {
        if EventHandler::is_submit_event(&key) {
            return if self.input.value().trim().is_empty() {
                TodoAction::None
            } else {
                TodoAction::Submit
            };
        }

        let before = self.input.value().to_string();
        if self.input.handle_key(key) && self.input.value() != before {
            return TodoAction::DraftChanged(self.input.value().to_string());
        }
        TodoAction::None
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> TodoAction {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.selection.select_next(self.items.len());
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selection.select_previous(self.items.len());
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selection.selected_id(&self.items) {
                    return TodoAction::Delete(id);
                }
            }
            _ => {}
        }
        TodoAction::None
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(
            "Oxitodo",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(label) = &self.user_label {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(label.as_str(), Style::default().fg(Color::Gray)));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

impl Default for TodoScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &mut TodoScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [header, input, list, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(header, buf);
        (&self.input).render(input, buf);
        TodoList::new(&self.items).render(list, buf, &mut self.selection);

        let hints = match self.focus {
            TodoFocus::Input => INPUT_HINTS,
            TodoFocus::List => LIST_HINTS,
        };
        let status = self.status.clone().hints(hints);
        (&status).render(footer, buf);
    }
}
