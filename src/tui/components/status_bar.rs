// Status bar component
//
// Renders the current path, the key hint for whatever has focus, the page
// selection and the signed-in user.

use crate::tui::app::App;
use crate::tui::layout::Breakpoint;
use crate::tui::traits::RenderContext;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the status bar
///
/// Adapts to terminal width:
/// - Wide: path, hint, selection and user
/// - Narrow: hint and a loading spinner only
pub fn render(f: &mut Frame, area: Rect, app: &App, hint: &str) {
    let bp = Breakpoint::from_width(area.width);
    let route = app.router.current();

    let loading = if app.pages.is_loading(route) {
        let ctx = RenderContext::new(&app.theme, false, app.animation_frame);
        format!("{} ", ctx.spinner_char())
    } else {
        String::new()
    };

    let status_text = if !bp.at_least(Breakpoint::Wide) {
        format!(" {}{}", loading, hint)
    } else {
        let user = app.session_email.as_deref().unwrap_or("not logged in");
        let selection = app
            .context
            .summary()
            .map(|s| format!(" │ {}", s))
            .unwrap_or_default();
        format!(
            " {}{} │ {}{} │ {}",
            loading,
            route.path(),
            hint,
            selection,
            user
        )
    };

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(app.theme.status_bar))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
