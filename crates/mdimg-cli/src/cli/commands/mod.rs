//! CLI command handlers.

mod localize;

pub use localize::run_localize;
