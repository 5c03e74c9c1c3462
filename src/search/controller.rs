use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use super::throttle::{Clock, DEFAULT_THROTTLE, ThrottledSearchTrigger};
use super::{SearchError, SearchManager, Translate, Translations};
use crate::models::{
    DEFAULT_ACCESSOR_KEY, PrefixFieldsConfig, QueryAccessor, QueryAccessorOptions, QueryOptions,
};

/// Translation key for the input placeholder
pub const PLACEHOLDER_KEY: &str = "searchbox.placeholder";

const DEFAULT_PLACEHOLDER: &str = "search";

/// Search box configuration, read once at mount time
#[derive(Debug, Clone, PartialEq)]
pub struct SearchBoxProps {
    /// Accessor key
    pub id: String,
    /// Search while typing (throttled) instead of only on submit
    pub search_on_change: bool,
    pub query_fields: Option<Vec<String>>,
    pub prefix_query_fields: PrefixFieldsConfig,
    pub query_options: QueryOptions,
    /// Minimum interval between searches while typing
    pub throttle: Duration,
}

impl Default for SearchBoxProps {
    fn default() -> Self {
        SearchBoxProps {
            id: DEFAULT_ACCESSOR_KEY.to_string(),
            search_on_change: false,
            query_fields: None,
            prefix_query_fields: PrefixFieldsConfig::Default,
            query_options: QueryOptions::new(),
            throttle: DEFAULT_THROTTLE,
        }
    }
}

impl SearchBoxProps {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn search_on_change(mut self, search_on_change: bool) -> Self {
        self.search_on_change = search_on_change;
        self
    }

    pub fn query_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn prefix_query_fields(mut self, prefix_query_fields: PrefixFieldsConfig) -> Self {
        self.prefix_query_fields = prefix_query_fields;
        self
    }

    pub fn query_options(mut self, query_options: QueryOptions) -> Self {
        self.query_options = query_options;
        self
    }

    pub fn throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Accessor options derived from these props
    pub fn accessor_options(&self) -> QueryAccessorOptions {
        QueryAccessorOptions::derive(
            self.query_fields.as_deref(),
            &self.prefix_query_fields,
            Some(&self.query_options),
            self.search_on_change,
        )
    }
}

/// Observable widget state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBoxState {
    pub focused: bool,
}

/// Form submission; the controller always prevents its default action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Events delivered to the search box by its host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchBoxEvent {
    /// Text changed to the given value
    Input(String),
    Submit,
    Focus,
    Blur,
}

/// Stateful search box: binds input to the query accessor and dispatches searches
pub struct SearchInputController {
    search_on_change: bool,
    accessor: Rc<QueryAccessor>,
    manager: Rc<dyn SearchManager>,
    throttled_search: ThrottledSearchTrigger,
    state: SearchBoxState,
    /// Text editing state (cursor, scroll) for terminal rendering
    input: Input,
    translator: Box<dyn Translate>,
    mounted: bool,
}

impl SearchInputController {
    /// Create the accessor, register it with the manager and bind the throttle
    pub fn mount(
        props: &SearchBoxProps,
        manager: Rc<dyn SearchManager>,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, SearchError> {
        let accessor = Rc::new(QueryAccessor::with_key(
            props.id.clone(),
            props.accessor_options(),
        ));
        manager.register_accessor(Rc::clone(&accessor))?;

        let target = Rc::clone(&manager);
        let throttled_search =
            ThrottledSearchTrigger::new(move || target.perform_search(), props.throttle, clock);

        log::debug!(
            "Mounted search box '{}' (search_on_change={}, throttle={:?})",
            props.id,
            props.search_on_change,
            props.throttle
        );

        Ok(SearchInputController {
            search_on_change: props.search_on_change,
            input: Input::new(accessor.value()),
            accessor,
            manager,
            throttled_search,
            state: SearchBoxState::default(),
            translator: Box::new(Translations::default()),
            mounted: true,
        })
    }

    /// Install the translation lookup used for display strings
    pub fn with_translator(mut self, translator: impl Translate + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    /// Dispatch a host event to its handler
    pub fn handle_event(&mut self, event: SearchBoxEvent) -> Result<(), SearchError> {
        match event {
            SearchBoxEvent::Input(value) => self.on_input(value),
            SearchBoxEvent::Submit => self.on_submit(&mut SubmitEvent::new()),
            SearchBoxEvent::Focus => {
                self.on_focus();
                Ok(())
            }
            SearchBoxEvent::Blur => {
                self.on_blur();
                Ok(())
            }
        }
    }

    /// Text changed: overwrite the query value, then search if searching on change
    pub fn on_input(&mut self, value: impl Into<String>) -> Result<(), SearchError> {
        if !self.mounted {
            return Ok(());
        }

        // A trailing search that fell due before this event belongs to the previous value
        let trailing = self.throttled_search.poll();

        let value = value.into();
        if self.input.value() != value {
            self.input = Input::new(value.clone());
        }
        log::trace!("Query '{}' = {:?}", self.accessor.key(), value);
        self.accessor.state.set_value(value);

        if self.search_on_change {
            self.throttled_search.call()?;
        }
        trailing.map(|_| ())
    }

    /// Form submitted: search now, bypassing the throttle
    pub fn on_submit(&mut self, event: &mut SubmitEvent) -> Result<(), SearchError> {
        event.prevent_default();
        if !self.mounted {
            return Ok(());
        }

        // This search already covers the latest value
        self.throttled_search.cancel();
        log::debug!("Search submitted: {:?}", self.accessor.value());
        self.manager.perform_search()
    }

    pub fn on_focus(&mut self) {
        self.state.focused = true;
    }

    pub fn on_blur(&mut self) {
        self.state.focused = false;
    }

    /// Terminal key binding: Enter submits, Esc blurs, other keys edit the text
    /// Returns true if the key was consumed. Keys are ignored while unfocused.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool, SearchError> {
        if !self.state.focused || !self.mounted {
            return Ok(false);
        }

        match key.code {
            KeyCode::Enter => {
                self.on_submit(&mut SubmitEvent::new())?;
            }
            KeyCode::Esc => {
                self.on_blur();
            }
            _ => {
                // Delegate editing keys to tui-input (characters, backspace,
                // delete, left/right arrows, Ctrl+A/E, Ctrl+W, etc.)
                let before = self.input.value().to_string();
                if self.input.handle_event(&Event::Key(key)).is_none() {
                    return Ok(false);
                }
                if self.input.value() != before {
                    let value = self.input.value().to_string();
                    self.on_input(value)?;
                }
            }
        }
        Ok(true)
    }

    /// Run a trailing search whose window has closed; call once per loop iteration
    pub fn tick(&mut self) -> Result<bool, SearchError> {
        self.throttled_search.poll()
    }

    /// Run a pending trailing search immediately
    pub fn flush(&mut self) -> Result<bool, SearchError> {
        self.throttled_search.flush()
    }

    /// Tear down the throttle and unregister the accessor
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.throttled_search.teardown();
        self.manager.unregister_accessor(self.accessor.key());
        log::debug!("Unmounted search box '{}'", self.accessor.key());
    }

    pub fn state(&self) -> SearchBoxState {
        self.state
    }

    pub fn is_focused(&self) -> bool {
        self.state.focused
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn search_on_change(&self) -> bool {
        self.search_on_change
    }

    pub fn accessor(&self) -> &Rc<QueryAccessor> {
        &self.accessor
    }

    /// Current query value
    pub fn query(&self) -> String {
        self.accessor.value()
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn throttled_search(&self) -> &ThrottledSearchTrigger {
        &self.throttled_search
    }

    /// When the next trailing search is due, for event loop timeouts
    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttled_search.deadline()
    }

    /// Time until the next trailing search is due
    pub fn time_until_due(&self) -> Option<Duration> {
        self.throttled_search.time_until_due()
    }

    /// Placeholder text, translated when a translation exists
    pub fn placeholder(&self) -> String {
        self.translator
            .translate(PLACEHOLDER_KEY)
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string())
    }
}

impl Drop for SearchInputController {
    fn drop(&mut self) {
        self.unmount();
    }
}
