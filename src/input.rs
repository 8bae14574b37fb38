use crossterm::event::KeyCode;
use arboard::Clipboard;
use anyhow::Result;
use crate::app::App;
use crate::models::Popup;
use crate::utils::{next_index, prev_index};

/// Handles one key press. Returns `Ok(false)` when the app should quit.
pub fn handle_key(key: KeyCode, app: &mut App) -> Result<bool> {
    // Popups swallow everything except closing and quitting.
    if app.popup != Popup::None {
        match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') => {
                app.popup = Popup::None;
                app.controller.close_details();
            }
            KeyCode::Char('q') => return Ok(false),
            _ => {}
        }
        return Ok(true);
    }

    let len = app.controller.documents().len();
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.cursor = prev_index(app.cursor),
        KeyCode::Down | KeyCode::Char('j') => app.cursor = next_index(app.cursor, len),
        KeyCode::Home | KeyCode::Char('g') => app.cursor = 0,
        KeyCode::End | KeyCode::Char('G') => app.cursor = len.saturating_sub(1),
        KeyCode::Char(' ') => {
            if let Some(id) = app.current_id() {
                app.controller.toggle(&id);
            }
        }
        KeyCode::Char('a') => app.controller.master_toggle(),
        KeyCode::Char('d') | KeyCode::Delete => {
            if app.controller.selection().is_empty() {
                app.status = Some("Nothing selected.".to_string());
            } else {
                let removed = app.controller.bulk_delete();
                app.status = Some(format!("Deleted {} document{}.", removed, if removed == 1 { "" } else { "s" }));
                app.clamp_cursor();
            }
        }
        KeyCode::Char('r') => {
            app.controller.load_documents();
            app.status = None;
        }
        KeyCode::Enter => {
            if let Some(id) = app.current_id() {
                app.controller.request_details(&id);
                app.popup = Popup::Details;
            }
        }
        KeyCode::Char('c') => {
            let names: Vec<&str> = app.controller.selected_documents().iter().map(|d| d.name.as_str()).collect();
            if names.is_empty() {
                app.status = Some("Nothing selected.".to_string());
            } else {
                let copied = Clipboard::new().and_then(|mut cb| cb.set_text(names.join("\n"))).is_ok();
                app.status = Some(if copied {
                    format!("Copied {} name(s) to clipboard.", names.len())
                } else {
                    "Clipboard unavailable.".to_string()
                });
            }
        }
        KeyCode::Char('?') => app.popup = Popup::Help,
        KeyCode::Esc => app.status = None,
        KeyCode::Char('q') => return Ok(false),
        _ => {}
    }
    Ok(true)
}
