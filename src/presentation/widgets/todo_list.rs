//! To-do item list widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use crate::domain::entities::{TodoId, TodoItem, TodoStatus};

/// Selection state for [`TodoList`].
#[derive(Debug, Default)]
pub struct TodoListSelection {
    list_state: ListState,
    focused: bool,
}

impl TodoListSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn select_next(&mut self, count: usize) {
        if count == 0 {
            self.list_state.select(None);
            return;
        }
        let next = self.list_state.selected().map_or(0, |idx| (idx + 1).min(count - 1));
        self.list_state.select(Some(next));
    }

    pub fn select_previous(&mut self, count: usize) {
        if count == 0 {
            self.list_state.select(None);
            return;
        }
        let previous = self
            .list_state
            .selected()
            .map_or(count - 1, |idx| idx.saturating_sub(1));
        self.list_state.select(Some(previous));
    }

    /// Keeps the selection inside a list that now has `count` items.
    pub fn clamp(&mut self, count: usize) {
        match self.list_state.selected() {
            _ if count == 0 => self.list_state.select(None),
            Some(idx) if idx >= count => self.list_state.select(Some(count - 1)),
            _ => {}
        }
    }

    /// Id of the selected item, if any.
    #[must_use]
    pub fn selected_id(&self, items: &[TodoItem]) -> Option<TodoId> {
        self.list_state
            .selected()
            .and_then(|idx| items.get(idx))
            .map(|item| item.id().clone())
    }
}

/// Renders the fetched items in remote order.
pub struct TodoList<'a> {
    items: &'a [TodoItem],
}

impl<'a> TodoList<'a> {
    #[must_use]
    pub const fn new(items: &'a [TodoItem]) -> Self {
        Self { items }
    }

    fn list_item(item: &TodoItem) -> ListItem<'_> {
        let marker = match item.status() {
            TodoStatus::Active => Span::styled("• ", Style::default().fg(Color::Cyan)),
            TodoStatus::Other(_) => Span::styled("✓ ", Style::default().fg(Color::DarkGray)),
        };

        let mut spans = vec![marker, Span::raw(item.text())];
        if let Some(created_at) = item.created_at() {
            spans.push(Span::styled(
                format!("  {}", created_at.format("%Y-%m-%d %H:%M")),
                Style::default().fg(Color::DarkGray),
            ));
        }

        ListItem::new(Line::from(spans))
    }
}

impl StatefulWidget for TodoList<'_> {
    type State = TodoListSelection;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let border_style = if state.is_focused() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" Items ({}) ", self.items.len()));

        if self.items.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new("Nothing to do.")
                .style(Style::default().fg(Color::DarkGray))
                .render(inner, buf);
            return;
        }

        let list = List::new(self.items.iter().map(Self::list_item))
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        StatefulWidget::render(list, area, buf, &mut state.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(count: usize) -> Vec<TodoItem> {
        (0..count)
            .map(|i| TodoItem::new(format!("doc-{i}"), format!("item {i}"), TodoStatus::Active))
            .collect()
    }

    #[test]
    fn test_select_next_stops_at_end() {
        let mut selection = TodoListSelection::new();
        selection.select_next(2);
        assert_eq!(selection.selected(), Some(0));
        selection.select_next(2);
        selection.select_next(2);
        assert_eq!(selection.selected(), Some(1));
    }

    #[test]
    fn test_select_previous_from_nothing_picks_last() {
        let mut selection = TodoListSelection::new();
        selection.select_previous(3);
        assert_eq!(selection.selected(), Some(2));
    }

    #[test]
    fn test_clamp_after_list_shrinks() {
        let mut selection = TodoListSelection::new();
        selection.select_previous(3);
        selection.clamp(1);
        assert_eq!(selection.selected(), Some(0));
        selection.clamp(0);
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn test_selected_id() {
        let list = items(2);
        let mut selection = TodoListSelection::new();
        assert!(selection.selected_id(&list).is_none());

        selection.select_next(list.len());
        selection.select_next(list.len());
        assert_eq!(selection.selected_id(&list), Some(TodoId::new("doc-1")));
    }
}
