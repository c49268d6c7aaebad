pub mod handlers;
pub mod index;

pub use handlers::{AppState, router};
pub use index::{FilterParams, IndexError, PoemIndex, QueryResult, parse_filter_text};
