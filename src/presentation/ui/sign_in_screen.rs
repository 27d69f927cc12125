//! Sign-in screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::domain::entities::Credentials;
use crate::presentation::events::EventHandler;
use crate::presentation::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInState {
    Input,
    SigningIn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInAction {
    None,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
}

/// Email/password sign-in form.
pub struct SignInScreen {
    email_input: TextInput,
    password_input: TextInput,
    focus: Field,
    state: SignInState,
    error_message: Option<String>,
    remember: bool,
}

impl SignInScreen {
    #[must_use]
    pub fn new(remember: bool) -> Self {
        let mut email_input = TextInput::new(" Email ").placeholder("you@example.com");
        email_input.set_focused(true);
        let password_input = TextInput::new(" Password ").password();

        Self {
            email_input,
            password_input,
            focus: Field::Email,
            state: SignInState::Input,
            error_message: None,
            remember,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SignInState {
        self.state
    }

    #[must_use]
    pub fn email(&self) -> &str {
        self.email_input.value()
    }

    #[must_use]
    pub const fn should_remember(&self) -> bool {
        self.remember
    }

    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email_input.value(), self.password_input.value())
    }

    /// Pre-fills the email field, e.g. from the command line.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email_input.set_value(email);
    }

    pub fn set_signing_in(&mut self) {
        self.state = SignInState::SigningIn;
        self.error_message = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = SignInState::Error;
        self.error_message = Some(message.into());
        self.password_input.clear();
    }

    pub fn reset(&mut self) {
        self.state = SignInState::Input;
        self.error_message = None;
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
        self.email_input.set_focused(self.focus == Field::Email);
        self.password_input.set_focused(self.focus == Field::Password);
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Email => &mut self.email_input,
            Field::Password => &mut self.password_input,
        }
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> SignInAction {
        if self.state == SignInState::SigningIn {
            return SignInAction::None;
        }

        if self.state == SignInState::Error {
            self.reset();
        }

        if EventHandler::is_submit_event(&key) {
            if self.credentials().is_complete() {
                return SignInAction::Submit;
            }
            if self.focus == Field::Email {
                self.switch_focus();
            }
            return SignInAction::None;
        }

        if EventHandler::is_focus_switch_event(&key) {
            self.switch_focus();
            return SignInAction::None;
        }

        if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.remember = !self.remember;
            return SignInAction::None;
        }

        self.focused_input().handle_key(key);
        SignInAction::None
    }

    fn render_inner(&self, area: Rect, buf: &mut Buffer) {
        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(14),
            Constraint::Fill(1),
        ]);
        let [_, center, _] = vertical.areas(area);

        let horizontal = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Min(50),
            Constraint::Fill(1),
        ]);
        let [_, content_area, _] = horizontal.areas(center);

        Clear.render(content_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Oxitodo Sign In ");

        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let [title, _, email, password, _, remember, _, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new("Sign in to see your to-do list")
            .style(Style::default().fg(Color::White))
            .render(title, buf);

        (&self.email_input).render(email, buf);
        (&self.password_input).render(password, buf);

        let checkbox = if self.remember { "[x]" } else { "[ ]" };
        Paragraph::new(Line::from(vec![
            Span::styled(checkbox, Style::default().fg(Color::Yellow)),
            Span::raw(" Remember me (Ctrl+R to toggle)"),
        ]))
        .render(remember, buf);

        let status_line = match self.state {
            SignInState::Input => Line::from(vec![
                Span::styled("Enter: Sign in", Style::default().fg(Color::DarkGray)),
                Span::raw(" | "),
                Span::styled("Tab: Next field", Style::default().fg(Color::DarkGray)),
                Span::raw(" | "),
                Span::styled("Esc: Quit", Style::default().fg(Color::DarkGray)),
            ]),
            SignInState::SigningIn => Line::from(Span::styled(
                "Signing in...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            SignInState::Error => {
                let msg = self.error_message.as_deref().unwrap_or("Unknown error");
                Line::from(Span::styled(
                    format!("Error: {msg}"),
                    Style::default().fg(Color::Red),
                ))
            }
        };
        Paragraph::new(status_line).render(status, buf);
    }
}

impl Default for SignInScreen {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Widget for &SignInScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_inner(area, buf);
    }
}
