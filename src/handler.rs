use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{App, InputMode};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize => {}
        AppEvent::InputClosed => {
            tracing::warn!("terminal input closed, quitting");
            app.should_quit = true;
        }
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::Completed { pane, ticket, outcome } => {
            app.complete(pane, ticket, outcome);
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }
    if key.code == KeyCode::Tab {
        app.toggle_focus();
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('x') => app.clear_focused(),
        KeyCode::Char('r') => app.submit_focused(),

        // Switch panes with h/l as well as Tab
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('l') | KeyCode::Right => {
            app.toggle_focus();
        }

        // Result scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('g') => app.scroll_top(),
        KeyCode::Char('G') => app.scroll_bottom(),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    // Ctrl-L clears the focused pane without leaving the input
    if key.code == KeyCode::Char('l') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.clear_focused();
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.submit_focused();
        }
        KeyCode::Backspace => app.focused_mut().backspace(),
        KeyCode::Delete => app.focused_mut().delete(),
        KeyCode::Left => app.focused_mut().cursor_left(),
        KeyCode::Right => app.focused_mut().cursor_right(),
        KeyCode::Home => app.focused_mut().cursor_home(),
        KeyCode::End => app.focused_mut().cursor_end(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::Up => app.scroll_up(),
        // Chords like Ctrl-A or Alt-x are not text
        KeyCode::Char(c)
            if key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT =>
        {
            app.focused_mut().insert_char(c)
        }
        _ => {}
    }
}
