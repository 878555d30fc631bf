//! Logs panel component
//!
//! Shows the entries captured by `TuiLogLayer`. The panel holds a handle to
//! the shared `LogBuffer`, so it can draw itself without App passing data.
//! While the panel holds focus the data table is `Outside` focus.

use super::scrollbar::{render_scrollbar, ScrollbarStyle};
use crate::logging::{LogBuffer, LogEntry, LogLevel};
use crate::theme::Theme;
use crate::tui::scroll::ScrollState;
use crate::tui::traits::{Component, Handled, Interactive, RenderContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub struct LogsPanel {
    buffer: LogBuffer,
    scroll: ScrollState,
    /// Selected entry; `None` follows the tail
    selected: Option<usize>,
    entry_count: usize,
}

impl LogsPanel {
    pub fn new(buffer: LogBuffer) -> Self {
        Self {
            buffer,
            scroll: ScrollState::new(),
            selected: None,
            entry_count: 0,
        }
    }

    /// Text of the selected entry, for the clipboard
    pub fn selected_text(&self) -> Option<String> {
        let entries = self.buffer.get_all();
        self.selected
            .and_then(|idx| entries.get(idx))
            .map(format_log_entry)
    }

    fn select_previous(&mut self) {
        match self.selected {
            Some(idx) if idx > 0 => {
                self.selected = Some(idx - 1);
                self.scroll.ensure_visible(idx - 1);
            }
            None if self.entry_count > 0 => self.selected = Some(self.entry_count - 1),
            _ => {}
        }
    }

    fn select_next(&mut self) {
        match self.selected {
            Some(idx) if idx + 1 < self.entry_count => {
                self.selected = Some(idx + 1);
                self.scroll.ensure_visible(idx + 1);
            }
            None if self.entry_count > 0 => self.selected = Some(self.entry_count - 1),
            _ => {}
        }
    }
}

impl Component for LogsPanel {
    fn title(&self) -> String {
        if self.selected.is_some() {
            " Logs [select] ".to_string()
        } else if self.scroll.auto_follow {
            " Logs ".to_string()
        } else {
            " Logs [scroll] ".to_string()
        }
    }

    fn render(&mut self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let entries = self.buffer.get_all();
        self.entry_count = entries.len();
        if let Some(idx) = self.selected {
            if idx >= entries.len() {
                self.selected = entries.len().checked_sub(1);
            }
        }
        self.scroll
            .update_dimensions(entries.len(), area.height.saturating_sub(2) as usize);

        let (start, end) = self.scroll.visible_range();
        let items: Vec<ListItem> = entries[start..end]
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if ctx.focused && self.selected == Some(start + i) {
                    Style::default()
                        .fg(ctx.theme.selection_fg)
                        .bg(ctx.theme.selection)
                        .add_modifier(Modifier::BOLD)
                } else {
                    level_style(entry.level, ctx.theme)
                };
                ListItem::new(format_log_entry(entry)).style(style)
            })
            .collect();

        let border = if ctx.focused {
            ctx.theme.highlight
        } else {
            ctx.theme.border
        };
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(ctx.theme.border_type)
                .border_style(Style::default().fg(border))
                .title(self.title()),
        );

        f.render_widget(list, area);
        render_scrollbar(f, area, &self.scroll, ScrollbarStyle::Arrows);
    }
}

impl Interactive for LogsPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Home => {
                self.scroll.scroll_to_top();
                self.selected = (self.entry_count > 0).then_some(0);
            }
            KeyCode::End => {
                self.scroll.scroll_to_bottom();
                self.selected = self.entry_count.checked_sub(1);
            }
            KeyCode::Esc if self.selected.is_some() => {
                self.selected = None;
                self.scroll.scroll_to_bottom();
            }
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓:select  y:copy  Esc:clear  Tab:table")
    }
}

fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {:5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

fn level_style(level: LogLevel, theme: &Theme) -> Style {
    match level {
        LogLevel::Error => Style::default()
            .fg(theme.error)
            .add_modifier(Modifier::BOLD),
        LogLevel::Warn => Style::default().fg(theme.warning),
        LogLevel::Info => Style::default().fg(theme.foreground),
        LogLevel::Debug | LogLevel::Trace => Style::default().fg(theme.muted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crossterm::event::KeyModifiers;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            target: "lana_admin".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn first_selection_starts_at_newest() {
        let buffer = LogBuffer::new();
        buffer.add(entry("first"));
        buffer.add(entry("second"));
        let mut panel = LogsPanel::new(buffer);
        panel.entry_count = 2;

        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert!(panel.handle_key(up).was_handled());
        assert!(panel.selected_text().unwrap().ends_with("second"));

        panel.handle_key(up);
        assert!(panel.selected_text().unwrap().ends_with("first"));
    }

    #[test]
    fn esc_without_selection_bubbles() {
        let mut panel = LogsPanel::new(LogBuffer::new());
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(panel.handle_key(esc), Handled::No);
    }
}
