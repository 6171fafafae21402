pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod report;
pub mod source;
