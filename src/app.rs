use tracing::debug;
use crate::controller::DocumentListController;
use crate::models::Popup;
use crate::theme::Theme;

/// Terminal-side state wrapped around the controller.
pub struct App {
    pub controller: DocumentListController,
    pub cursor: usize,
    pub popup: Popup,
    pub status: Option<String>,
    pub theme: Theme,
}

impl App {
    pub fn new(mut controller: DocumentListController) -> Self {
        controller.subscribe_selection(|change| {
            let added: Vec<&str> = change.added.iter().map(|d| d.id.as_str()).collect();
            let removed: Vec<&str> = change.removed.iter().map(|d| d.id.as_str()).collect();
            debug!(?added, ?removed, "selection changed");
        });
        Self {
            controller,
            cursor: 0,
            popup: Popup::None,
            status: None,
            theme: Theme::default(),
        }
    }

    /// Id of the document under the cursor, if any.
    pub fn current_id(&self) -> Option<String> {
        self.controller.documents().get(self.cursor).map(|d| d.id.clone())
    }

    /// Applies finished fetches and keeps the cursor inside the list.
    pub fn tick(&mut self) {
        if self.controller.try_apply_pending() > 0 {
            self.clamp_cursor();
        }
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.controller.documents().len();
        self.cursor = if len == 0 { 0 } else { self.cursor.min(len - 1) };
    }
}
