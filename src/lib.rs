// Library root: re-exports all modules so integration tests and the
// `statcard` binary share one public API.

pub mod card;
pub mod config;
pub mod export;
pub mod html;
pub mod images;
pub mod stats;
pub mod tui;
