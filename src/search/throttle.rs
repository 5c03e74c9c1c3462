use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::SearchError;

/// Default minimum interval between throttled searches
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(400);

/// Source of the current time for throttle windows
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic tests and replays
/// Clones share the same time
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

type SearchTarget = Box<dyn FnMut() -> Result<(), SearchError>>;

/// Throttle around a single search target
///
/// The first call in a quiet period runs immediately and opens a window of
/// `interval`. Calls inside the window arm one trailing execution, which runs
/// when the host loop calls [`poll`](Self::poll) after the window closes, or
/// on [`flush`](Self::flush). After [`teardown`](Self::teardown) every
/// operation is a no-op.
pub struct ThrottledSearchTrigger {
    target: Option<SearchTarget>,
    interval: Duration,
    clock: Rc<dyn Clock>,
    /// End of the current throttle window
    window_end: Option<Instant>,
    /// Trailing execution armed
    pending: bool,
}

impl ThrottledSearchTrigger {
    pub fn new<F>(target: F, interval: Duration, clock: Rc<dyn Clock>) -> Self
    where
        F: FnMut() -> Result<(), SearchError> + 'static,
    {
        ThrottledSearchTrigger {
            target: Some(Box::new(target)),
            interval,
            clock,
            window_end: None,
            pending: false,
        }
    }

    /// Request an execution of the target
    pub fn call(&mut self) -> Result<(), SearchError> {
        if self.target.is_none() {
            return Ok(());
        }

        let now = self.clock.now();
        match self.window_end {
            Some(end) if now < end => {
                if !self.pending {
                    log::trace!("Search throttled, trailing run due in {:?}", end - now);
                }
                self.pending = true;
                Ok(())
            }
            // Window closed: this run also covers any call still armed from it
            _ => {
                self.pending = false;
                self.window_end = Some(now + self.interval);
                self.execute()
            }
        }
    }

    /// Run the trailing execution if its window has closed
    /// Returns true if the target ran
    pub fn poll(&mut self) -> Result<bool, SearchError> {
        if !self.pending || self.target.is_none() {
            return Ok(false);
        }

        let now = self.clock.now();
        if self.window_end.is_some_and(|end| now < end) {
            return Ok(false);
        }

        self.pending = false;
        self.window_end = Some(now + self.interval);
        self.execute()?;
        Ok(true)
    }

    /// Run the armed trailing execution now and reset the window
    /// Returns false without running anything if nothing was armed
    pub fn flush(&mut self) -> Result<bool, SearchError> {
        if !self.pending || self.target.is_none() {
            return Ok(false);
        }

        self.pending = false;
        self.window_end = None;
        self.execute()?;
        Ok(true)
    }

    /// Disarm any trailing execution and reset the window
    pub fn cancel(&mut self) {
        if self.pending {
            log::trace!("Cancelled pending throttled search");
        }
        self.pending = false;
        self.window_end = None;
    }

    /// Cancel and release the target; the trigger is inert afterwards
    pub fn teardown(&mut self) {
        self.cancel();
        if self.target.take().is_some() {
            log::debug!("Throttled search torn down");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_torn_down(&self) -> bool {
        self.target.is_none()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the armed trailing execution becomes due
    pub fn deadline(&self) -> Option<Instant> {
        if self.pending { self.window_end } else { None }
    }

    /// Time left until the trailing execution is due (zero if overdue)
    pub fn time_until_due(&self) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(self.clock.now()))
    }

    fn execute(&mut self) -> Result<(), SearchError> {
        match self.target.as_mut() {
            Some(target) => target(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for ThrottledSearchTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThrottledSearchTrigger")
            .field("interval", &self.interval)
            .field("window_end", &self.window_end)
            .field("pending", &self.pending)
            .field("torn_down", &self.target.is_none())
            .finish()
    }
}
