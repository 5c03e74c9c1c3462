pub mod layout;
pub mod results;
pub mod search_box;
pub mod status;
pub mod theme;

pub use layout::{MainLayout, create_main_layout};
pub use results::render_results;
pub use search_box::render_search_box;
pub use status::{render_flash_message, render_keyboard_hints};
pub use theme::Theme;
