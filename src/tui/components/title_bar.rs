// Title bar component
//
// Renders the app name, the numbered view tabs and the API endpoint.

use crate::tui::app::App;
use crate::tui::layout::Breakpoint;
use crate::tui::router::ViewKind;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the title bar at the top of the screen
///
/// Shows:
/// - App name
/// - View tabs with their digit shortcut; only the current one when compact
/// - Endpoint, on wide terminals
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let bp = Breakpoint::from_width(area.width);
    let current = app.router.current().view_kind();

    let mut spans = vec![Span::styled(
        " Lana Admin ",
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    )];

    for (i, kind) in ViewKind::ALL.iter().enumerate() {
        let is_current = current == Some(*kind);
        if !bp.at_least(Breakpoint::Normal) && !is_current {
            continue;
        }
        let style = if is_current {
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("{}:{}", i + 1, kind.title()), style));
    }

    if bp.at_least(Breakpoint::Wide) {
        spans.push(Span::styled(
            format!("  ── {}", app.client.endpoint()),
            Style::default().fg(theme.muted),
        ));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.title))
            .title_top(Line::from(" ? ").right_aligned()),
    );

    f.render_widget(title, area);
}
