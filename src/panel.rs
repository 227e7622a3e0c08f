//! Per-pane UI state for one lookup pipeline.
//!
//! A pane shows at most one of: nothing, a loading indicator, a rendered
//! result, or an error message. Each submit takes a ticket from a monotonic
//! sequence; a completion is applied only if its ticket is still the latest,
//! so a slow early response cannot overwrite a later one.

use crate::render::Rendered;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Display {
    #[default]
    Idle,
    Fetching,
    Rendered(Rendered),
    Error(String),
}

/// Sequence number issued for one submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct PanelState {
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars
    pub display: Display,
    pub scroll: u16,
    // Measured during render: result area height and wrapped row count
    view_height: u16,
    content_rows: u16,
    latest: u64,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request: show the loading state and issue a fresh ticket.
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        self.display = Display::Fetching;
        self.scroll = 0;
        Ticket(self.latest)
    }

    /// Apply a finished request. Returns false if the ticket is stale and the
    /// outcome was discarded.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<Rendered, String>) -> bool {
        if ticket.0 != self.latest {
            tracing::debug!(ticket = ticket.0, latest = self.latest, "discarding stale response");
            return false;
        }
        self.display = match outcome {
            Ok(rendered) => Display::Rendered(rendered),
            Err(message) => Display::Error(message),
        };
        self.scroll = 0;
        true
    }

    /// Report a validation failure that never reached the network. Also
    /// supersedes anything still in flight.
    pub fn reject(&mut self, message: &str) {
        self.latest += 1;
        self.display = Display::Error(message.to_string());
        self.scroll = 0;
    }

    /// Reset input, result, and error. Requests already in flight are fenced off.
    pub fn clear(&mut self) {
        self.latest += 1;
        self.input.clear();
        self.cursor = 0;
        self.display = Display::Idle;
        self.scroll = 0;
    }

    pub fn is_fetching(&self) -> bool {
        self.display == Display::Fetching
    }

    pub fn rendered(&self) -> Option<&Rendered> {
        match &self.display {
            Display::Rendered(rendered) => Some(rendered),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.display {
            Display::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Record the result area size and the wrapped height of its content,
    /// pulling `scroll` back in range if the content shrank.
    pub fn set_viewport(&mut self, view_height: u16, content_rows: u16) {
        self.view_height = view_height;
        self.content_rows = content_rows;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn max_scroll(&self) -> u16 {
        self.content_rows.saturating_sub(self.view_height.max(1))
    }

    pub fn scroll_down(&mut self) {
        self.scroll = (self.scroll + 1).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderedLine;

    fn rendered(header: &str) -> Rendered {
        Rendered {
            header: Some(header.to_string()),
            lines: vec![RenderedLine {
                label: "1".to_string(),
                text: "text".to_string(),
            }],
            notice: None,
        }
    }

    #[test]
    fn test_success_replaces_error() {
        let mut panel = PanelState::new();
        panel.reject("Please enter a surah number.");
        assert_eq!(panel.error(), Some("Please enter a surah number."));

        let ticket = panel.begin();
        assert!(panel.is_fetching());
        assert!(panel.complete(ticket, Ok(rendered("Al-Faatiha"))));
        assert_eq!(panel.error(), None);
        assert_eq!(panel.rendered().and_then(|r| r.header.as_deref()), Some("Al-Faatiha"));
    }

    #[test]
    fn test_failure_clears_prior_result() {
        let mut panel = PanelState::new();
        let ticket = panel.begin();
        panel.complete(ticket, Ok(rendered("Al-Faatiha")));

        let ticket = panel.begin();
        assert!(panel.rendered().is_none());
        panel.complete(ticket, Err("Failed to fetch Quran data.".to_string()));
        assert!(panel.rendered().is_none());
        assert_eq!(panel.error(), Some("Failed to fetch Quran data."));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut panel = PanelState::new();
        let first = panel.begin();
        let second = panel.begin();

        assert!(panel.complete(second, Ok(rendered("second"))));
        assert!(!panel.complete(first, Ok(rendered("first"))));
        assert_eq!(panel.rendered().and_then(|r| r.header.as_deref()), Some("second"));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut panel = PanelState::new();
        for c in "24".chars() {
            panel.insert_char(c);
        }
        let ticket = panel.begin();
        panel.complete(ticket, Err("Surah not found.".to_string()));
        panel.scroll = 3;

        panel.clear();
        assert!(panel.input.is_empty());
        assert_eq!(panel.cursor, 0);
        assert_eq!(panel.display, Display::Idle);
        assert_eq!(panel.scroll, 0);
    }

    #[test]
    fn test_clear_fences_in_flight_request() {
        let mut panel = PanelState::new();
        let ticket = panel.begin();
        panel.clear();
        assert!(!panel.complete(ticket, Ok(rendered("late"))));
        assert_eq!(panel.display, Display::Idle);
    }

    #[test]
    fn test_reject_fences_in_flight_request() {
        let mut panel = PanelState::new();
        let ticket = panel.begin();
        panel.reject("Please enter a keyword.");
        assert!(!panel.complete(ticket, Ok(rendered("late"))));
        assert_eq!(panel.error(), Some("Please enter a keyword."));
    }

    #[test]
    fn test_utf8_editing() {
        let mut panel = PanelState::new();
        for c in "نور".chars() {
            panel.insert_char(c);
        }
        panel.cursor_left();
        panel.backspace();
        assert_eq!(panel.input, "نر");
        panel.cursor_home();
        panel.delete();
        assert_eq!(panel.input, "ر");
        panel.cursor_end();
        assert_eq!(panel.cursor, 1);
    }

    #[test]
    fn test_scroll_is_bounded_by_wrapped_rows() {
        let mut panel = PanelState::new();
        let ticket = panel.begin();
        panel.complete(ticket, Ok(rendered("h")));
        // two logical lines that wrap to 12 rows in a 5-row view
        panel.set_viewport(5, 12);
        for _ in 0..20 {
            panel.scroll_down();
        }
        assert_eq!(panel.scroll, 7);
        panel.scroll_top();
        assert_eq!(panel.scroll, 0);
        panel.scroll_bottom();
        assert_eq!(panel.scroll, 7);
        panel.scroll_up();
        assert_eq!(panel.scroll, 6);
    }

    #[test]
    fn test_viewport_growth_clamps_scroll() {
        let mut panel = PanelState::new();
        panel.set_viewport(5, 40);
        panel.scroll_bottom();
        assert_eq!(panel.scroll, 35);
        panel.set_viewport(30, 40);
        assert_eq!(panel.scroll, 10);
    }
}
