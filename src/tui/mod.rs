// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard, mouse, timer ticks, finished requests)
// - Rendering the UI

pub mod app;
pub mod clipboard;
pub mod components;
pub mod context;
pub mod layout;
pub mod modal;
pub mod router;
pub mod scroll;
pub mod traits;
pub mod views;

use crate::config::Config;
use crate::graphql::GraphqlClient;
use crate::logging::LogBuffer;
use crate::session::Session;
use anyhow::{Context, Result};
use app::App;
use components::data_table::ActiveElement;
use components::toast::Toast;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use modal::{Modal, ModalAction};
use ratatui::{backend::CrosstermBackend, layout::Position, Terminal};
use router::ViewKind;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use traits::{Handled, Interactive};

/// Run the TUI
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// when done, even if the loop failed.
pub async fn run_tui(
    config: Config,
    client: GraphqlClient,
    session: Option<Session>,
    log_buffer: LogBuffer,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(64);
    let (export_tx, mut export_rx) = mpsc::channel(8);
    let mouse = config.ui.mouse;

    let mut app = App::new(config, client, session, log_buffer, tx, export_tx);
    app.start();

    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    if mouse {
        execute!(stdout, EnableMouseCapture).context("Failed to enable mouse")?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &mut rx, &mut export_rx).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on whichever comes first:
/// 1. Keyboard or mouse input
/// 2. Timer ticks (spinners, toasts, deferred auto-focus)
/// 3. Finished requests from spawned tasks
/// 4. Export poller updates
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::Receiver<app::AppMessage>,
    export_rx: &mut mpsc::Receiver<crate::export::ExportUpdate>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            _ = tick_interval.tick() => app.tick(),

            Some(message) = rx.recv() => app.handle_message(message),

            Some(update) = export_rx.recv() => app.handle_export(update),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Modal → Global → Logs panel or page → Esc fallback
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    // Layer 1: Modal captures all input when open
    if handle_modal_input(app, key_event) {
        return;
    }

    // Layer 2: Global keys
    if handle_global_keys(app, key_event) {
        return;
    }

    // Layer 3: Whatever holds focus
    let handled = if app.active == ActiveElement::Outside {
        handle_logs_key(app, key_event)
    } else {
        dispatch_to_page(app, key_event)
    };

    // Layer 4: Esc clears the selection, then goes back
    if !handled.was_handled() && key_event.code == KeyCode::Esc {
        if app.active == ActiveElement::Outside {
            app.set_active(ActiveElement::Body);
        } else if !app.context.is_empty() {
            app.context.clear();
        } else {
            app.back();
        }
    }
}

/// Forward a key to the current page and pick up any navigation it did
fn dispatch_to_page(app: &mut App, key_event: KeyEvent) -> Handled {
    let route = app.router.current().clone();
    let active = app.active;
    let page = app.pages.page_mut(&route);
    let handled = page.handle_key(key_event, &active, &mut app.router);
    match page.focused_row() {
        Some(index) => app.active = ActiveElement::TableRow(index),
        // The page moved focus off its rows, e.g. to its other table
        None if matches!(app.active, ActiveElement::TableRow(_)) => app.active = ActiveElement::Body,
        None => {}
    }
    app.after_navigation();
    handled
}

fn handle_logs_key(app: &mut App, key_event: KeyEvent) -> Handled {
    if key_event.code == KeyCode::Char('y') {
        if let Some(text) = app.logs_panel.selected_text() {
            copy(app, &text);
        }
        return Handled::Yes;
    }
    app.logs_panel.handle_key(key_event)
}

fn copy(app: &mut App, text: &str) {
    app.toast = Some(match clipboard::copy_to_clipboard(text) {
        Ok(()) => Toast::success("Copied to clipboard"),
        Err(e) => {
            tracing::debug!(error = %e, "Clipboard unavailable");
            Toast::error("Failed to copy")
        }
    });
}

/// Handle mouse input
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    if app.modal.is_some() {
        return;
    }
    let position = Position::new(mouse_event.column, mouse_event.row);

    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.logs_area.is_some_and(|area| area.contains(position)) {
                app.set_active(ActiveElement::Outside);
                return;
            }
            if !app.content_area.is_some_and(|area| area.contains(position)) {
                return;
            }
            let route = app.router.current().clone();
            let clicked = app.pages.page_mut(&route).handle_click(
                mouse_event.column,
                mouse_event.row,
                &mut app.router,
            );
            if let Some(index) = clicked {
                app.set_active(ActiveElement::TableRow(index));
            }
            app.after_navigation();
        }
        MouseEventKind::ScrollUp => {
            handle_key_event(app, KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        }
        MouseEventKind::ScrollDown => {
            handle_key_event(app, KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        }
        _ => {}
    }
}

/// Handle modal input - returns true if modal absorbed the input
fn handle_modal_input(app: &mut App, key_event: KeyEvent) -> bool {
    let Some(modal) = app.modal.as_mut() else {
        return false;
    };

    match modal.handle_input(key_event.code) {
        ModalAction::None => {}
        ModalAction::Close => app.close_modal(),
        ModalAction::Submit(submission) => app.submit(submission),
        ModalAction::Replace(next) => app.open_modal(next),
        ModalAction::Copy(text) => copy(app, &text),
    }

    true
}

/// Handle global keys - returns true if handled
/// Global keys work the same regardless of the current page
fn handle_global_keys(app: &mut App, key_event: KeyEvent) -> bool {
    match key_event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        KeyCode::Char('?') => app.open_modal(Modal::Help),
        KeyCode::Char(c @ '1'..='7') => {
            if let Some(kind) = ViewKind::from_digit(c) {
                app.navigate(router::Route::list(kind));
            }
        }
        KeyCode::Tab => app.toggle_logs_focus(),
        KeyCode::Char('L') => app.toggle_logs(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('n') => app.next_page(),
        KeyCode::Char('a') => app.decide(),
        KeyCode::Char('d') => app.record_deposit(),
        KeyCode::Char('w') => app.initiate_withdrawal(),
        KeyCode::Char('c') => app.create_committee(),
        KeyCode::Char('x') => app.start_export_form(),
        KeyCode::Char('N') => app.create_customer(),
        KeyCode::Char('f') => app.create_credit_facility(),
        KeyCode::Char('u') => app.update_collateral(),
        KeyCode::Char('D') => app.initiate_disbursal(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::router::Route;

    fn app() -> (App, mpsc::Receiver<app::AppMessage>) {
        let (tx, rx) = mpsc::channel(16);
        let (export_tx, _) = mpsc::channel(4);
        let config = Config::default();
        let client = GraphqlClient::new(&config.api).unwrap();
        (App::new(config, client, None, LogBuffer::new(), tx, export_tx), rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[tokio::test]
    async fn digits_switch_views_and_esc_goes_back() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('6'));
        assert_eq!(app.router.current(), &Route::list(ViewKind::Policies));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.router.current(), &Route::list(ViewKind::Customers));
    }

    #[tokio::test]
    async fn modal_swallows_global_keys() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.modal, Some(Modal::Help)));

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.router.current(), &Route::list(ViewKind::Customers));

        press(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn tab_moves_focus_to_logs_and_back() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active, ActiveElement::Outside);
        assert!(app.show_logs);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.active, ActiveElement::Body);
    }

    #[tokio::test]
    async fn shifted_keys_open_creation_forms() {
        let (mut app, _rx) = app();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT));
        assert!(matches!(app.modal, Some(Modal::Form(_))));
        press(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());

        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT));
        assert!(app.modal.is_none(), "no facility open");
    }

    #[tokio::test]
    async fn release_events_are_ignored() {
        let (mut app, _rx) = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut app, key);
        assert!(!app.should_quit);
    }
}
