pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod models;
pub mod repl;
pub mod speech;
pub mod ui;
