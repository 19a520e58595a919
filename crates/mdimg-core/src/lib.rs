pub mod config;
pub mod logging;

pub mod document;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod storage;
pub mod url_model;
