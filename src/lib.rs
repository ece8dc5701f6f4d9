pub mod config;
pub mod hierarchy;
pub mod preview;
pub mod source;
pub mod task;
pub mod tui;
