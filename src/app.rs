use anyhow::{Context, Result};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::{Frame, Terminal};
use std::rc::Rc;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crate::logging::FlashMessage;
use crate::models::Document;
use crate::search::{
    Clock, InMemorySearchManager, SearchError, SearchHit, SearchInputController, SearchManager,
    Translations,
};
use crate::storage::Config;
use crate::ui;
use crate::ui::Theme;

/// Longest wait for terminal input when no search is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Main application state
pub struct App {
    /// Search box bound to the manager's query accessor
    pub controller: SearchInputController,

    /// Document search backend
    manager: Rc<InMemorySearchManager>,

    /// Application configuration
    pub config: Config,

    theme: Theme,

    /// Hits of the last search the app has seen
    results: Vec<SearchHit>,

    /// Manager search count when `results` was refreshed
    seen_search_count: usize,

    /// Currently selected index in the results list
    pub selected_index: usize,

    /// Flag to request application exit
    pub should_quit: bool,

    /// Flash messages displayed above the keyboard hints
    pub flash_messages: Vec<FlashMessage>,

    /// Receiver for flash messages from logger
    flash_rx: Option<Receiver<FlashMessage>>,
}

impl App {
    /// Mount the search box over the given documents and run the initial search
    pub fn new(
        config: Config,
        documents: Vec<Document>,
        clock: Rc<dyn Clock>,
        flash_rx: Option<Receiver<FlashMessage>>,
    ) -> Result<Self> {
        let manager = Rc::new(
            InMemorySearchManager::new(documents).with_max_results(config.general.max_results),
        );

        let props = config.search_box.to_props();
        let controller = SearchInputController::mount(&props, manager.clone(), clock)
            .context("Failed to mount search box")?
            .with_translator(Translations::new(config.translations.clone()));

        // Show everything before the first keystroke
        manager
            .perform_search()
            .context("Initial search failed")?;

        let mut app = App {
            controller,
            manager,
            config,
            theme: Theme::default(),
            results: Vec::new(),
            seen_search_count: 0,
            selected_index: 0,
            should_quit: false,
            flash_messages: Vec::new(),
            flash_rx,
        };
        app.refresh_results();

        Ok(app)
    }

    /// Poll flash message receiver and add to queue
    pub fn poll_flash_messages(&mut self) {
        if let Some(rx) = &self.flash_rx {
            while let Ok(msg) = rx.try_recv() {
                self.flash_messages.push(msg);
            }
        }
    }

    /// Remove expired flash messages (based on config duration)
    pub fn prune_flash_messages(&mut self) {
        if self.flash_messages.is_empty() {
            return;
        }

        let now = Instant::now();
        let duration_ms = self.config.general.flash_message_duration_ms;
        self.flash_messages
            .retain(|msg| now.duration_since(msg.timestamp).as_millis() < duration_ms as u128);
    }

    /// Clear all flash messages
    pub fn clear_flash_messages(&mut self) {
        self.flash_messages.clear();
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub fn selected_hit(&self) -> Option<&SearchHit> {
        self.results.get(self.selected_index)
    }

    pub fn search_count(&self) -> usize {
        self.manager.search_count()
    }

    /// Pick up new results after the manager ran a search
    fn refresh_results(&mut self) {
        let count = self.manager.search_count();
        if count == self.seen_search_count {
            return;
        }
        self.seen_search_count = count;
        self.results = self.manager.results();
        self.selected_index = 0;
    }

    /// Search failures go to the log (and from there to the flash line)
    fn report(&self, result: Result<(), SearchError>) {
        if let Err(e) = result {
            log::error!("Search failed: {}", e);
        }
    }

    /// How long the event loop may block waiting for input
    pub fn poll_timeout(&self) -> Duration {
        self.controller
            .time_until_due()
            .map_or(IDLE_POLL, |due| due.min(IDLE_POLL))
    }

    /// Run due throttled searches; call once per event loop iteration
    pub fn tick(&mut self) {
        let result = self.controller.tick().map(|_| ());
        self.report(result);
        self.refresh_results();
    }

    pub fn move_up(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    pub fn move_down(&mut self, n: usize) {
        let last = self.results.len().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(last);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Handle keyboard event: the search box gets keys while focused
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        if self.controller.is_focused() {
            match self.controller.handle_key(key) {
                Ok(true) => {}
                Ok(false) => self.handle_navigation_key(key),
                Err(e) => self.report(Err(e)),
            }
        } else {
            self.handle_normal_key(key);
        }

        self.refresh_results();
    }

    /// Keys while the search box is not focused
    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('/') | KeyCode::Char('i') | KeyCode::Tab => {
                self.controller.on_focus();
            }
            KeyCode::Char('c') => {
                self.clear_flash_messages();
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit();
            }
            _ => self.handle_navigation_key(key),
        }
    }

    fn handle_navigation_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.move_up(1),
            KeyCode::Down => self.move_down(1),
            KeyCode::Char('k') if !self.controller.is_focused() => self.move_up(1),
            KeyCode::Char('j') if !self.controller.is_focused() => self.move_down(1),
            KeyCode::PageUp => self.move_up(10),
            KeyCode::PageDown => self.move_down(10),
            _ => {}
        }
    }

    /// Event loop: draw, wait for a key or the next due search, then tick
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<()> {
        loop {
            self.poll_flash_messages();
            self.prune_flash_messages();

            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(self.poll_timeout())?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }

            self.tick();

            if self.should_quit {
                // Nothing left to search for once the UI is gone
                self.controller.unmount();
                return Ok(());
            }
        }
    }

    /// Render the TUI
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();

        frame.render_widget(
            ratatui::widgets::Block::default()
                .style(ratatui::prelude::Style::default().bg(self.theme.default_bg)),
            size,
        );

        let layout = ui::create_main_layout(size);

        ui::render_search_box(frame, layout.search_box, &self.controller, &self.theme);
        ui::render_results(
            frame,
            layout.results,
            &self.results,
            self.selected_index,
            self.manager.documents().len(),
            &self.theme,
        );
        ui::render_flash_message(frame, layout.flash, &self.flash_messages, &self.theme);
        ui::render_keyboard_hints(
            frame,
            layout.keyboard_hints,
            self.controller.is_focused(),
            &self.theme,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ManualClock;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn documents() -> Vec<Document> {
        vec![
            Document::new("1").with_field("title", "The Matrix"),
            Document::new("2").with_field("title", "Mad Max"),
            Document::new("3").with_field("title", "Heat"),
        ]
    }

    fn app(search_on_change: bool) -> (App, ManualClock) {
        let mut config = Config::default();
        config.search_box.search_on_change = search_on_change;
        config.search_box.query_fields = Some(vec!["title".to_string()]);
        config
            .translations
            .insert("searchbox.placeholder".to_string(), "search movies".to_string());

        let clock = ManualClock::new();
        let app = App::new(config, documents(), Rc::new(clock.clone()), None).unwrap();
        (app, clock)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_initial_results_show_everything() {
        let (app, _clock) = app(false);
        assert_eq!(app.results().len(), 3);
        assert_eq!(app.search_count(), 1);
        assert!(!app.controller.is_focused());
    }

    #[test]
    fn test_typing_requires_focus() {
        let (mut app, _clock) = app(false);

        // 'j' navigates, 'q' would quit: nothing reaches the input
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_index, 1);
        assert_eq!(app.controller.query(), "");

        press(&mut app, KeyCode::Char('/'));
        assert!(app.controller.is_focused());
        type_text(&mut app, "heat");
        assert_eq!(app.controller.query(), "heat");
    }

    #[test]
    fn test_submit_mode_searches_on_enter() {
        let (mut app, _clock) = app(false);

        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Heat");
        assert_eq!(app.search_count(), 1);
        assert_eq!(app.results().len(), 3);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.search_count(), 2);
        assert_eq!(app.results().len(), 1);
        assert_eq!(app.selected_hit().unwrap().title, "Heat");
    }

    #[test]
    fn test_change_mode_throttles_then_catches_up() {
        let (mut app, clock) = app(true);

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "Mad");
        // First keystroke searched, the rest are throttled
        assert_eq!(app.search_count(), 2);
        assert!(app.poll_timeout() <= IDLE_POLL);

        clock.advance(Duration::from_millis(400));
        app.tick();
        assert_eq!(app.search_count(), 3);
        assert_eq!(app.results()[0].title, "Mad Max");
    }

    #[test]
    fn test_escape_blurs_then_quits() {
        let (mut app, _clock) = app(false);

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        assert!(!app.controller.is_focused());
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_while_focused() {
        let (mut app, _clock) = app(false);
        press(&mut app, KeyCode::Char('/'));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_draw_shows_placeholder_and_results() {
        let (mut app, _clock) = app(false);
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();

        terminal.draw(|frame| app.draw(frame)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("search movies"));
        assert!(text.contains("The Matrix"));
        assert!(text.contains("Results 3/3"));
    }
}
