//! Key classification shared by the screens.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Result of handling a terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Keep running.
    Continue,
    /// Leave the application.
    Exit,
}

/// Terminal key helpers.
pub struct EventHandler;

impl EventHandler {
    /// Only presses are handled; repeats and releases are ignored.
    #[must_use]
    pub fn is_press(key: &KeyEvent) -> bool {
        key.kind == KeyEventKind::Press
    }

    /// Ctrl+C or Esc.
    #[must_use]
    pub fn is_quit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } | KeyEvent {
                code: KeyCode::Esc,
                modifiers: KeyModifiers::NONE,
                ..
            }
        )
    }

    #[must_use]
    pub fn is_submit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Enter,
                ..
            }
        )
    }

    /// Tab or Shift+Tab.
    #[must_use]
    pub fn is_focus_switch_event(key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Tab | KeyCode::BackTab)
    }

    /// Ctrl+O.
    #[must_use]
    pub fn is_sign_out_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('o'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
        )
    }
}
