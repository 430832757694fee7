//! UI layer for the desktop book browser.

pub mod app;

pub use app::{BookBrowserApp, StartupConfig};
