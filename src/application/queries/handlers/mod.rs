//! Query Handlers 实现

mod progress_handlers;

pub use progress_handlers::*;
