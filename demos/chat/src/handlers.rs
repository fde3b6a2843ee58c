use crate::app::App;
use crossterm::event::{KeyCode, KeyModifiers};

pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
    // Ignore typing while a request is in flight
    if app.pending.is_some() {
        return;
    }

    match key {
        KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Tab => app.toggle_mode(),
        KeyCode::Enter => app.queue_input(),
        KeyCode::Char(c) => {
            // Clear status message when typing
            if app.status_message.is_some() {
                app.clear_status_message();
            }
            app.input.push(c);
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
}
