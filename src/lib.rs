pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod paths;
pub mod store;
pub mod view;
pub mod viewmodel;
pub mod watchdog;
pub mod watcher;
