//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Status bar severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

impl StatusLevel {
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Error => Color::Red,
        }
    }
}

/// One-line bar with a message on the left and key hints on the right.
#[derive(Debug, Clone)]
pub struct StatusBar {
    message: String,
    hints: String,
    level: StatusLevel,
}

impl StatusBar {
    #[must_use]
    pub fn new(message: impl Into<String>, level: StatusLevel) -> Self {
        Self {
            message: message.into(),
            hints: String::new(),
            level,
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, StatusLevel::Info)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, StatusLevel::Error)
    }

    /// Sets the right-aligned key hints.
    #[must_use]
    pub fn hints(mut self, hints: impl Into<String>) -> Self {
        self.hints = hints.into();
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn level(&self) -> StatusLevel {
        self.level
    }
}

impl Widget for &StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let message_style = Style::default()
            .fg(self.level.color())
            .add_modifier(Modifier::BOLD);
        let hint_style = Style::default().fg(Color::DarkGray);

        let width = area.width as usize;
        let message_len = self.message.chars().count();
        let hints_len = self.hints.chars().count();
        let padding = width.saturating_sub(message_len + hints_len);

        let mut spans = vec![Span::styled(self.message.as_str(), message_style)];
        if !self.hints.is_empty() {
            spans.push(Span::raw(" ".repeat(padding)));
            spans.push(Span::styled(self.hints.as_str(), hint_style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
