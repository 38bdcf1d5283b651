pub mod config;
pub mod database;
pub mod error;
pub mod event;
pub mod http_error;
pub mod merge;
pub mod validation;
