//! Searchbox - search input core with throttled search-on-change
//!
//! This library exports the core modules for testing and potential reuse.

pub mod app;
pub mod logging;
pub mod models;
pub mod search;
pub mod storage;
pub mod ui;
