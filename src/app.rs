use std::sync::Arc;
use tokio::sync::mpsc;

use crate::api::{Endpoints, Fetcher};
use crate::config::Config;
use crate::panel::{PanelState, Ticket};
use crate::quran::{self, parse_keyword, parse_surah_number};
use crate::render::{render_chapter, render_matches, Rendered};
use crate::tui::{AppEvent, Pane};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: Pane,

    // One pane per pipeline
    pub chapter: PanelState,
    pub keyword: PanelState,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Data
    fetcher: Arc<dyn Fetcher>,
    endpoints: Endpoints,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn Fetcher>,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            focus: Pane::Chapter,

            chapter: PanelState::new(),
            keyword: PanelState::new(),

            animation_frame: 0,

            fetcher,
            endpoints: Endpoints::from_config(config),
            events,
        }
    }

    pub fn panel(&self, pane: Pane) -> &PanelState {
        match pane {
            Pane::Chapter => &self.chapter,
            Pane::Keyword => &self.keyword,
        }
    }

    pub fn panel_mut(&mut self, pane: Pane) -> &mut PanelState {
        match pane {
            Pane::Chapter => &mut self.chapter,
            Pane::Keyword => &mut self.keyword,
        }
    }

    pub fn focused_mut(&mut self) -> &mut PanelState {
        self.panel_mut(self.focus)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Pane::Chapter => Pane::Keyword,
            Pane::Keyword => Pane::Chapter,
        };
    }

    /// Validate the focused pane's input and, if it passes, start its lookup.
    pub fn submit_focused(&mut self) {
        match self.focus {
            Pane::Chapter => self.submit_chapter(),
            Pane::Keyword => self.submit_keyword(),
        }
    }

    pub fn submit_chapter(&mut self) {
        if let Err(e) = parse_surah_number(&self.chapter.input) {
            self.chapter.reject(e.user_message());
            return;
        }

        let ticket = self.chapter.begin();
        let input = self.chapter.input.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let endpoints = self.endpoints.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let outcome = quran::lookup_chapter(fetcher.as_ref(), &endpoints, &input)
                .await
                .map(|chapter| render_chapter(&chapter))
                .map_err(|e| {
                    tracing::info!(error = %e, "surah lookup failed");
                    e.user_message().to_string()
                });
            let _ = events.send(AppEvent::Completed {
                pane: Pane::Chapter,
                ticket,
                outcome,
            });
        });
    }

    pub fn submit_keyword(&mut self) {
        if let Err(e) = parse_keyword(&self.keyword.input) {
            self.keyword.reject(e.user_message());
            return;
        }

        let ticket = self.keyword.begin();
        let input = self.keyword.input.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let endpoints = self.endpoints.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let outcome = quran::search_keyword(fetcher.as_ref(), &endpoints, &input)
                .await
                .map(|result| render_matches(&result))
                .map_err(|e| {
                    tracing::info!(error = %e, "keyword search failed");
                    e.user_message().to_string()
                });
            let _ = events.send(AppEvent::Completed {
                pane: Pane::Keyword,
                ticket,
                outcome,
            });
        });
    }

    /// Apply a finished lookup to its pane, unless a newer submit or a clear superseded it.
    pub fn complete(&mut self, pane: Pane, ticket: Ticket, outcome: Result<Rendered, String>) {
        self.panel_mut(pane).complete(ticket, outcome);
    }

    pub fn clear_focused(&mut self) {
        self.focused_mut().clear();
    }

    pub fn scroll_down(&mut self) {
        self.focused_mut().scroll_down();
    }

    pub fn scroll_up(&mut self) {
        self.focused_mut().scroll_up();
    }

    pub fn scroll_top(&mut self) {
        self.focused_mut().scroll_top();
    }

    pub fn scroll_bottom(&mut self) {
        self.focused_mut().scroll_bottom();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.chapter.is_fetching() || self.keyword.is_fetching() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}
