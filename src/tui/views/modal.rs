// Modal overlay rendering
//
// Dialogs are drawn last, centered over the page:
// - Help: keybindings and current config
// - Decisions and confirmations for mutations
// - Text-input forms
// - CSV export progress

use crate::theme::Theme;
use crate::tui::modal::{ExportState, Form, Modal};
use crate::tui::traits::RenderContext;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render a modal dialog as a centered overlay
pub fn render(f: &mut Frame, modal: &Modal, ctx: &RenderContext) {
    match modal {
        Modal::Help => render_help(f, ctx.theme),
        Modal::ApprovalDecision { description, .. } => render_choice(
            f,
            ctx.theme,
            " Approval ",
            description,
            &[("a", "Approve"), ("d", "Deny"), ("Esc", "Close")],
        ),
        Modal::WithdrawalDecision { description, .. } => render_choice(
            f,
            ctx.theme,
            " Withdrawal ",
            description,
            &[("c", "Confirm"), ("x", "Cancel withdrawal"), ("Esc", "Close")],
        ),
        Modal::Confirm { prompt, .. } => render_choice(
            f,
            ctx.theme,
            " Confirm ",
            prompt,
            &[("y/Enter", "Yes"), ("n/Esc", "No")],
        ),
        Modal::Form(form) => render_form(f, ctx.theme, form),
        Modal::Export { csv_id, state } => render_export(f, ctx, csv_id, state),
    }
}

/// Calculate centered rect for modal dialog
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn dialog_block<'a>(theme: &Theme, title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .border_type(theme.border_type)
        .title(title)
}

fn draw(f: &mut Frame, theme: &Theme, area: Rect, content: Text<'_>, block: Block<'_>) {
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(content)
        .style(Style::default().bg(theme.background))
        .wrap(Wrap { trim: false })
        .block(block);
    f.render_widget(paragraph, area);
}

/// Render the help modal overlay
fn render_help(f: &mut Frame, theme: &Theme) {
    let key_style = Style::default().fg(theme.link);
    let desc_style = Style::default().fg(theme.foreground);
    let header_style = Style::default()
        .fg(theme.highlight)
        .add_modifier(Modifier::BOLD);

    // "    key         description"
    let kb = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("  Views", header_style)),
        kb("1-7", "Customers … Actions"),
        kb("Esc", "Back / clear selection"),
        Line::raw(""),
        Line::from(Span::styled("  Tables", header_style)),
        kb("↑/↓, j/k", "Move between rows"),
        kb("Enter", "Open / select row"),
        kb("n", "Load next page"),
        kb("r", "Refresh"),
        kb("t", "Switch facility table"),
        Line::raw(""),
        Line::from(Span::styled("  Actions", header_style)),
        kb("a", "Approve or deny"),
        kb("d", "Record deposit"),
        kb("w", "Initiate withdrawal"),
        kb("c", "Create committee"),
        kb("x", "Export ledger CSV"),
        kb("N", "New customer"),
        kb("f", "New credit facility"),
        kb("u", "Update collateral"),
        kb("D", "Initiate disbursal"),
        Line::raw(""),
        Line::from(Span::styled("  General", header_style)),
        kb("Tab", "Focus logs / table"),
        kb("L", "Show / hide logs"),
        kb("y", "Copy selected log"),
        kb("?", "Toggle this help"),
        kb("q", "Quit"),
    ]);

    let area = centered_rect(44, 35, f.area());
    let block = dialog_block(theme, " Help ")
        .title_bottom(Line::from(" Press ? or Esc to close ").centered());
    draw(f, theme, area, content, block);
}

fn render_choice(f: &mut Frame, theme: &Theme, title: &str, message: &str, keys: &[(&str, &str)]) {
    let key_style = Style::default()
        .fg(theme.link)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(theme.foreground);

    let mut lines = vec![
        Line::raw(""),
        Line::styled(format!("  {}", message), desc_style),
        Line::raw(""),
    ];
    let mut choices = vec![Span::raw("  ")];
    for (key, desc) in keys {
        choices.push(Span::styled(format!("[{}]", key), key_style));
        choices.push(Span::styled(format!(" {}   ", desc), desc_style));
    }
    lines.push(Line::from(choices));

    let area = centered_rect(56, 8, f.area());
    draw(f, theme, area, Text::from(lines), dialog_block(theme, title.to_string()));
}

fn render_form(f: &mut Frame, theme: &Theme, form: &Form) {
    let label_style = Style::default().fg(theme.muted);
    let value_style = Style::default().fg(theme.foreground);
    let focus_style = Style::default()
        .fg(theme.selection_fg)
        .bg(theme.selection);

    let mut lines = vec![Line::raw("")];
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let marker = if focused { "▸ " } else { "  " };
        let cursor = if focused { "▏" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<20}", marker, field.label), label_style),
            Span::styled(
                format!("{}{}", field.value, cursor),
                if focused { focus_style } else { value_style },
            ),
        ]));
    }
    lines.push(Line::raw(""));
    if let Some(error) = &form.error {
        lines.push(Line::styled(
            format!("  {}", error),
            Style::default().fg(theme.error),
        ));
    }

    let height = form.fields.len() as u16 + 6;
    let area = centered_rect(64, height, f.area());
    let block = dialog_block(theme, form.title())
        .title_bottom(Line::from(" Enter:submit  Tab:next field  Esc:cancel ").centered());
    draw(f, theme, area, Text::from(lines), block);
}

fn render_export(f: &mut Frame, ctx: &RenderContext, csv_id: &str, state: &ExportState) {
    let theme = ctx.theme;
    let (status, hint) = match state {
        ExportState::Pending => (
            Line::from(format!("  {} Generating CSV…", ctx.spinner_char())),
            " Esc:cancel ",
        ),
        ExportState::Ready(link) => (
            Line::from(vec![
                Span::styled("  Ready: ", Style::default().fg(theme.success)),
                Span::styled(link.clone(), Style::default().fg(theme.link)),
            ]),
            " y:copy link  Esc:close ",
        ),
        ExportState::Failed(message) => (
            Line::styled(format!("  Failed: {}", message), Style::default().fg(theme.error)),
            " Esc:close ",
        ),
    };

    let lines = vec![
        Line::raw(""),
        Line::styled(format!("  CSV {}", csv_id), Style::default().fg(theme.muted)),
        Line::raw(""),
        status,
    ];

    let area = centered_rect(72, 8, f.area());
    let block = dialog_block(theme, " Ledger export ").title_bottom(Line::from(hint).centered());
    draw(f, theme, area, Text::from(lines), block);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(modal: &Modal) -> String {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal
            .draw(|f| render(f, modal, &RenderContext::new(&theme, true, 0)))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn form_shows_validation_error() {
        let mut form = Form::committee();
        form.error = Some("Name is required".to_string());
        let screen = rendered(&Modal::Form(form));
        assert!(screen.contains("Create committee"));
        assert!(screen.contains("Name is required"));
    }

    #[test]
    fn export_shows_link_when_ready() {
        let screen = rendered(&Modal::Export {
            csv_id: "csv-1".to_string(),
            state: ExportState::Ready("https://dl/x.csv".to_string()),
        });
        assert!(screen.contains("https://dl/x.csv"));
        assert!(screen.contains("y:copy link"));
    }
}
